//! Bracket-notation parser for constituent trees.
//!
//! Accepts the usual linguistics format: `(S (NP I) (VP (V saw) (NP it)))`.
//! A bare token is a leaf; a parenthesized group is a branch whose first
//! token is the label. Labels may be double-quoted to include whitespace or
//! parens, with `\n`, `\t`, `\"`, and `\\` escapes (a quoted `\n` produces a
//! multi-line label).
//!
//! # Example
//!
//! ```
//! use lingtree_core::parse_tree;
//!
//! let tree = parse_tree("(S (NP I) (VP (V saw) (NP it)))").unwrap();
//! assert_eq!(tree.to_string(), "(S (NP I) (VP (V saw) (NP it)))");
//! ```

use crate::adapter::TreeValue;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Parse a bracket-notation tree expression.
///
/// # Errors
///
/// Returns a [`ParseError`] with the failing line and column for malformed
/// input: unbalanced parens, a group without a label, an unterminated
/// quote, or trailing text after the expression.
pub fn parse_tree(input: &str) -> Result<TreeValue, ParseError> {
    let mut parser = TreeParser::new(input);
    parser.skip_whitespace();
    if parser.at_end() {
        return Err(parser.error("expected a tree expression"));
    }
    let tree = parser.parse_expr()?;
    parser.skip_whitespace();
    if !parser.at_end() {
        return Err(parser.error("unexpected trailing input"));
    }
    Ok(tree)
}

/// Error type for unrecoverable tree-expression parse failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub line: usize,
    pub col: usize,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "tree parse error at {}:{}: {}",
            self.line, self.col, self.message
        )
    }
}

impl std::error::Error for ParseError {}

// ---------------------------------------------------------------------------
// Internal parser
// ---------------------------------------------------------------------------

struct TreeParser<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
    line: usize,
    col: usize,
}

impl<'a> TreeParser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            bytes: input.as_bytes(),
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    // -- Cursor helpers --

    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        if self.at_end() {
            return None;
        }
        let b = self.bytes[self.pos];
        self.pos += 1;
        if b == b'\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(b)
    }

    fn skip_whitespace(&mut self) {
        while let Some(b) = self.peek() {
            if b == b' ' || b == b'\t' || b == b'\n' || b == b'\r' {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError {
            message: message.into(),
            line: self.line,
            col: self.col,
        }
    }

    // -- Grammar --

    fn parse_expr(&mut self) -> Result<TreeValue, ParseError> {
        self.skip_whitespace();
        match self.peek() {
            Some(b'(') => self.parse_branch(),
            Some(b')') => Err(self.error("unexpected ')'")),
            Some(_) => Ok(TreeValue::leaf(self.parse_label()?)),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn parse_branch(&mut self) -> Result<TreeValue, ParseError> {
        self.advance();
        self.skip_whitespace();
        let label = match self.peek() {
            Some(b'(') | Some(b')') | None => return Err(self.error("expected a node label")),
            Some(_) => self.parse_label()?,
        };
        let mut children = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some(b')') => {
                    self.advance();
                    break;
                }
                None => return Err(self.error("unclosed '('")),
                Some(_) => children.push(self.parse_expr()?),
            }
        }
        Ok(TreeValue::branch(label, children))
    }

    fn parse_label(&mut self) -> Result<String, ParseError> {
        if self.peek() == Some(b'"') {
            self.read_quoted()
        } else {
            Ok(self.read_bare())
        }
    }

    fn read_bare(&mut self) -> String {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if matches!(b, b' ' | b'\t' | b'\n' | b'\r' | b'(' | b')' | b'"') {
                break;
            }
            self.advance();
        }
        // delimiters are ASCII, so the slice stays on char boundaries
        self.input[start..self.pos].to_string()
    }

    fn read_quoted(&mut self) -> Result<String, ParseError> {
        let (open_line, open_col) = (self.line, self.col);
        self.advance();
        let mut out = String::new();
        let mut run_start = self.pos;
        loop {
            match self.peek() {
                None => {
                    return Err(ParseError {
                        message: "unterminated quoted label".into(),
                        line: open_line,
                        col: open_col,
                    });
                }
                Some(b'"') => {
                    out.push_str(&self.input[run_start..self.pos]);
                    self.advance();
                    return Ok(out);
                }
                Some(b'\\') => {
                    out.push_str(&self.input[run_start..self.pos]);
                    self.advance();
                    match self.peek() {
                        Some(b'n') => {
                            out.push('\n');
                            self.advance();
                        }
                        Some(b't') => {
                            out.push('\t');
                            self.advance();
                        }
                        Some(b'"') => {
                            out.push('"');
                            self.advance();
                        }
                        Some(b'\\') => {
                            out.push('\\');
                            self.advance();
                        }
                        // unknown escape: keep the backslash, let the next
                        // char flow through the following run
                        _ => out.push('\\'),
                    }
                    run_start = self.pos;
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
    }
}
