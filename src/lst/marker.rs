//! Side-annotations recording source-level facts a node's structure cannot
//! express.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Marker {
    /// The statement carried an explicit trailing `;` in source.
    Semicolon,
    /// The class body was elided because no braces existed in source.
    EmptyBody,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Markers {
    markers: Vec<Marker>,
}

impl Markers {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn contains(&self, marker: Marker) -> bool {
        self.markers.contains(&marker)
    }

    pub fn add_if_absent(mut self, marker: Marker) -> Self {
        if !self.markers.contains(&marker) {
            self.markers.push(marker);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_if_absent() {
        let markers = Markers::empty()
            .add_if_absent(Marker::Semicolon)
            .add_if_absent(Marker::Semicolon);
        assert!(markers.contains(Marker::Semicolon));
        assert!(!markers.contains(Marker::EmptyBody));
        assert_eq!(
            markers,
            Markers::empty().add_if_absent(Marker::Semicolon)
        );
    }
}
