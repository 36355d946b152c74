//! Error types for tree addressing and option parsing.

// ---------------------------------------------------------------------------
// LayoutError
// ---------------------------------------------------------------------------

/// Errors raised by tree addressing and option handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// A tree path step addressed a daughter that does not exist.
    ///
    /// `depth` is the index into the path where resolution failed and
    /// `index` is the offending daughter position as given by the caller
    /// (negative indices count from the right).
    InvalidPath { depth: usize, index: isize },
    /// Option keys that no setting recognizes.
    UnknownOptions { keys: Vec<String> },
    /// A recognized option key with a value that does not parse.
    InvalidOptionValue { key: String, value: String },
}

impl std::fmt::Display for LayoutError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPath { depth, index } => {
                write!(f, "invalid tree path at index {depth} (daughter {index})")
            }
            Self::UnknownOptions { keys } => {
                if keys.len() == 1 {
                    write!(f, "unknown tree option '{}'", keys[0])
                } else {
                    write!(f, "unknown tree options: {}", keys.join(", "))
                }
            }
            Self::InvalidOptionValue { key, value } => {
                write!(f, "invalid value '{value}' for tree option '{key}'")
            }
        }
    }
}

impl std::error::Error for LayoutError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_path_names_step_and_daughter() {
        let err = LayoutError::InvalidPath { depth: 1, index: 2 };
        assert_eq!(err.to_string(), "invalid tree path at index 1 (daughter 2)");
    }

    #[test]
    fn unknown_options_message_switches_on_plurality() {
        let one = LayoutError::UnknownOptions {
            keys: vec!["horiz_spaceing".into()],
        };
        assert_eq!(one.to_string(), "unknown tree option 'horiz_spaceing'");
        let many = LayoutError::UnknownOptions {
            keys: vec!["a".into(), "b".into()],
        };
        assert_eq!(many.to_string(), "unknown tree options: a, b");
    }

    #[test]
    fn invalid_value_names_key_and_value() {
        let err = LayoutError::InvalidOptionValue {
            key: "font_size".into(),
            value: "big".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid value 'big' for tree option 'font_size'"
        );
    }
}
