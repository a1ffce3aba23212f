//! Error and diagnostic system for the Diorama parser.
//!
//! This module provides an error handling system with:
//! - Error codes for documentation and searchability
//! - Multiple labeled spans for rich error context
//! - Severity levels
//! - Diagnostic collector for accumulating multiple errors
//!
//! # Overview
//!
//! The error system is built around the [`Diagnostic`] type, which represents
//! a single error or warning message with optional error code, multiple source
//! locations, and help text. Multiple diagnostics are wrapped in [`ParseError`]
//! for returning from [`parse`](crate::parse).
//!
//! # Example
//!
//! ```
//! # use diorama_parser::error::{Diagnostic, ErrorCode};
//! # use diorama_parser::Span;
//!
//! let list_span = Span::new(20..42);
//! let open_span = Span::new(20..21);
//!
//! let diag = Diagnostic::error("unterminated attribute list")
//!     .with_code(ErrorCode::E100)
//!     .with_label(list_span, "expected `]` at the end of the line")
//!     .with_secondary_label(open_span, "list opened here")
//!     .with_help("close the attribute list with `]`");
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod parse_error;
mod severity;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use parse_error::ParseError;
pub use severity::Severity;
