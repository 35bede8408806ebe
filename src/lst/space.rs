//! Whitespace and comments between significant tokens, as a first-class
//! value.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A comment embedded in a [`Space`]. `text` excludes the comment markers;
/// `suffix` is the whitespace run between this comment and whatever follows,
/// nested here so it is not lost.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Comment {
    pub multiline: bool,
    pub text: String,
    pub suffix: String,
}

/// The exact bytes between the end of one significant token and the start of
/// the next: a leading whitespace run followed by comments, each carrying its
/// own trailing whitespace.
///
/// Invariant: `space.print()` reproduces the captured byte range exactly,
/// including carriage returns.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Space {
    pub whitespace: String,
    pub comments: Vec<Comment>,
}

fn is_space(c: u8) -> bool {
    c == b' ' || c == b'\t' || c == b'\n' || c == b'\r' || c == 0x0c
}

impl Space {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.whitespace.is_empty() && self.comments.is_empty()
    }

    /// Whether any whitespace segment contains a line break, i.e. whether the
    /// token following this space starts a new line or a comment inside it
    /// does.
    pub fn has_newline(&self) -> bool {
        self.whitespace.contains('\n') || self.comments.iter().any(|c| c.suffix.contains('\n'))
    }

    /// Split a raw trivia run into whitespace and comments. The input must be
    /// exactly what the scanner captured: whitespace and complete comments,
    /// nothing else.
    pub fn parse(text: &str) -> Space {
        let bytes = text.as_bytes();

        let mut ws_end = 0;
        while ws_end < bytes.len() && is_space(bytes[ws_end]) {
            ws_end += 1;
        }
        let whitespace = text[..ws_end].to_string();
        let mut i = ws_end;

        let mut comments = Vec::new();
        while i < bytes.len() {
            if text[i..].starts_with("//") {
                let mut end = i + 2;
                while end < bytes.len() && bytes[end] != b'\n' && bytes[end] != b'\r' {
                    end += 1;
                }
                let content = text[i + 2..end].to_string();
                i = end;
                let suffix_start = i;
                while i < bytes.len() && is_space(bytes[i]) {
                    i += 1;
                }
                comments.push(Comment {
                    multiline: false,
                    text: content,
                    suffix: text[suffix_start..i].to_string(),
                });
            } else if text[i..].starts_with("/*") {
                let mut depth = 1usize;
                let mut end = i + 2;
                while end < bytes.len() {
                    if text[end..].starts_with("/*") {
                        depth += 1;
                        end += 2;
                    } else if text[end..].starts_with("*/") {
                        depth -= 1;
                        if depth == 0 {
                            break;
                        }
                        end += 2;
                    } else {
                        end += 1;
                    }
                }
                if depth != 0 {
                    // unterminated comment; should not reach a Space
                    debug_assert!(false, "unterminated block comment in trivia");
                    break;
                }
                let content = text[i + 2..end].to_string();
                i = end + 2;
                let suffix_start = i;
                while i < bytes.len() && is_space(bytes[i]) {
                    i += 1;
                }
                comments.push(Comment {
                    multiline: true,
                    text: content,
                    suffix: text[suffix_start..i].to_string(),
                });
            } else {
                // not trivia; keep the bytes so printing stays exact
                debug_assert!(false, "non-trivia text in whitespace capture");
                match comments.last_mut() {
                    Some(last) => last.suffix.push_str(&text[i..]),
                    None => {
                        let mut ws = whitespace;
                        ws.push_str(&text[i..]);
                        return Space {
                            whitespace: ws,
                            comments,
                        };
                    }
                }
                break;
            }
        }

        Space {
            whitespace,
            comments,
        }
    }

    pub fn print_into(&self, out: &mut String) {
        out.push_str(&self.whitespace);
        for comment in &self.comments {
            if comment.multiline {
                out.push_str("/*");
                out.push_str(&comment.text);
                out.push_str("*/");
            } else {
                out.push_str("//");
                out.push_str(&comment.text);
            }
            out.push_str(&comment.suffix);
        }
    }

    pub fn print(&self) -> String {
        let mut out = String::new();
        self.print_into(&mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(text: &str) {
        assert_eq!(Space::parse(text).print(), text);
    }

    #[test]
    fn test_parse_print_identity() {
        roundtrip("");
        roundtrip("   ");
        roundtrip("\n\n    ");
        roundtrip("\r\n\t");
        roundtrip(" // note\n  ");
        roundtrip("  /* a */ ");
        roundtrip("\n// one\n// two\n");
        roundtrip(" /* a\n * b\n */\n  // tail");
        roundtrip(" /* outer /* inner */ outer */ ");
    }

    #[test]
    fn test_comment_split() {
        let space = Space::parse("  // note\n    ");
        assert_eq!(space.whitespace, "  ");
        assert_eq!(space.comments.len(), 1);
        assert!(!space.comments[0].multiline);
        assert_eq!(space.comments[0].text, " note");
        assert_eq!(space.comments[0].suffix, "\n    ");
    }

    #[test]
    fn test_crlf_kept_out_of_line_comment_text() {
        let space = Space::parse("// c\r\n");
        assert_eq!(space.comments[0].text, " c");
        assert_eq!(space.comments[0].suffix, "\r\n");
    }

    #[test]
    fn test_has_newline() {
        assert!(!Space::parse("  ").has_newline());
        assert!(Space::parse(" \n ").has_newline());
        // the break lives in the comment suffix, not the leading whitespace
        assert!(Space::parse(" // c\n").has_newline());
        // a newline only inside comment text does not start a new line
        assert!(!Space::parse(" /* a\nb */ ").has_newline());
    }

    #[test]
    fn test_structural_equality() {
        assert_eq!(Space::parse(" // x\n"), Space::parse(" // x\n"));
        assert_ne!(Space::parse(" "), Space::parse("  "));
    }
}
