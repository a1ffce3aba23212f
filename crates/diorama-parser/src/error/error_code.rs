//! Error codes for the Diorama diagnostic system.
//!
//! - `E1xx` - Block macro and attribute list errors
//! - `W0xx` - Document structure warnings

use std::fmt;

/// Error codes for categorizing diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Unterminated attribute list.
    ///
    /// A block macro opened its attribute list with `[` but the line does
    /// not end with `]`.
    E100,

    /// Unterminated quoted value.
    ///
    /// A quoted attribute value was opened but never closed.
    E101,

    /// Empty attribute name.
    ///
    /// An attribute list entry starts with `=`.
    E102,

    /// Unexpected text after a quoted value.
    ///
    /// Only whitespace may follow the closing quote before the next `,`.
    E103,

    /// Unclosed delimited block.
    ///
    /// A listing, literal, passthrough or comment block runs to the end of
    /// the document. Directives inside it are not processed.
    W001,
}

impl ErrorCode {
    /// Returns the code as a string (e.g., "E100").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            ErrorCode::E103 => "E103",
            ErrorCode::W001 => "W001",
        }
    }

    /// Returns a short description of what this code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E100 => "unterminated attribute list",
            ErrorCode::E101 => "unterminated quoted value",
            ErrorCode::E102 => "empty attribute name",
            ErrorCode::E103 => "unexpected text after quoted value",
            ErrorCode::W001 => "unclosed delimited block",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
