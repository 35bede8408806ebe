//! Indentation style options.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Recognized indentation options. Pure data: constructed once, shared
/// read-only across any number of formatting runs.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IndentStyle {
    /// Indent with tab characters instead of spaces.
    pub use_tab_character: bool,
    /// Column width one tab advances, for tab/space conversion.
    pub tab_size: usize,
    /// Columns per block-nesting level.
    pub indent_size: usize,
    /// Extra columns for wrapped constructs beyond their block indent.
    pub continuation_indent_size: usize,
    pub function_declaration_parameters: FunctionDeclarationParameters,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FunctionDeclarationParameters {
    /// Wrapped parameter lists align under the first parameter's column
    /// instead of taking flat continuation indent.
    pub align_when_multiple: bool,
}

impl Default for IndentStyle {
    fn default() -> Self {
        Self {
            use_tab_character: false,
            tab_size: 4,
            indent_size: 4,
            continuation_indent_size: 8,
            function_declaration_parameters: FunctionDeclarationParameters {
                align_when_multiple: true,
            },
        }
    }
}

impl IndentStyle {
    pub fn with_tabs(mut self, use_tab_character: bool) -> Self {
        self.use_tab_character = use_tab_character;
        self
    }

    pub fn with_tab_size(mut self, tab_size: usize) -> Self {
        self.tab_size = tab_size;
        self
    }

    pub fn with_indent_size(mut self, indent_size: usize) -> Self {
        self.indent_size = indent_size;
        self
    }

    pub fn with_continuation_indent_size(mut self, continuation_indent_size: usize) -> Self {
        self.continuation_indent_size = continuation_indent_size;
        self
    }

    pub fn with_align_parameters(mut self, align_when_multiple: bool) -> Self {
        self.function_declaration_parameters = FunctionDeclarationParameters {
            align_when_multiple,
        };
        self
    }
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;

    #[test]
    fn test_serde_roundtrip() {
        let style = IndentStyle::default().with_tabs(true).with_tab_size(8);
        let json = serde_json::to_string(&style).unwrap();
        assert_eq!(serde_json::from_str::<IndentStyle>(&json).unwrap(), style);
    }
}
