//! Error handling types and utilities for the oberc toolchain.
//!
//! Every stage (lexing, parsing, registration, type resolution and code
//! generation) reports failures through the same [`Error`] type. An error
//! pairs an [`ErrorKind`] with the [`Position`] of the node or token that
//! triggered it, so the driver can render one uniform diagnostic:
//!
//! ```text
//! main.ob, Line: 3, Col: 17, Incompatible type: cannot add BOOLEAN and INTEGER
//! ```
//!
//! There is no recovery: the first error aborts the whole run and is
//! propagated with `?` up to the driver.
//!
//! # Examples
//!
//! ```rust
//! use oberc_syntax::error::{error_at, ErrorKind, Result};
//! use oberc_syntax::Position;
//!
//! fn check_positive(n: i64, pos: &Position) -> Result<i64> {
//!     if n < 0 {
//!         error_at(pos, ErrorKind::Expression(format!("{} is negative", n)))
//!     } else {
//!         Ok(n)
//!     }
//! }
//!
//! let pos = Position::new("demo.ob", 1, 1);
//! let err = check_positive(-1, &pos).unwrap_err();
//! assert_eq!(err.to_string(), "demo.ob, Line: 1, Col: 1, -1 is negative");
//! ```

use std::fmt;
use std::rc::Rc;

use thiserror::Error as ThisError;

/// A location in a source unit.
///
/// Lines and columns are 1-based. The file name is shared between every
/// node of a unit, so cloning a position is cheap.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Position {
    pub file: Rc<str>,
    pub line: usize,
    pub col: usize,
}

impl Position {
    pub fn new(file: impl Into<Rc<str>>, line: usize, col: usize) -> Self {
        Self { file: file.into(), line, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, Line: {}, Col: {}", self.file, self.line, self.col)
    }
}

/// The category of an [`Error`].
///
/// `Statement` and `Expression` are the catch-all categories for failures
/// raised while a backend walks the tree; the more specific kinds are used
/// wherever the cause is known.
#[derive(Debug, Clone, PartialEq, ThisError)]
pub enum ErrorKind {
    /// Lexical or syntactic error, including name-binding failures.
    #[error("{0}")]
    Parse(String),

    /// Boolean/string misuse in arithmetic or VOID used as a value.
    #[error("Incompatible type: {0}")]
    IncompatibleType(String),

    /// No registered function has the requested signature.
    #[error("No function matches the call '{0}'")]
    Lookup(String),

    /// Two definitions share the same overload key.
    #[error("Duplicate definition of function '{name}' with signature '{key}'")]
    DuplicateDefinition { name: String, key: String },

    #[error("{0}")]
    Statement(String),

    #[error("{0}")]
    Expression(String),

    /// Driver-level failure (reading inputs, writing the artifact).
    #[error("{0}")]
    Io(String),
}

/// An error raised anywhere in the toolchain.
///
/// `pos` is `None` only for driver-level failures that have no source
/// location, such as a missing input file.
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    pub kind: ErrorKind,
    pub pos: Option<Position>,
}

impl Error {
    /// Creates an error without source location.
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, pos: None }
    }

    /// Creates an error located at `pos`.
    pub fn at(pos: &Position, kind: ErrorKind) -> Self {
        Self { kind, pos: Some(pos.clone()) }
    }

    /// The human-readable message, without the location prefix.
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.pos {
            Some(pos) => write!(f, "{}, {}", pos, self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl std::error::Error for Error {}

/// A specialized `Result` type for oberc operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Shorthand for `Err(Error::at(pos, kind))`.
pub fn error_at<T>(pos: &Position, kind: ErrorKind) -> Result<T> {
    Err(Error::at(pos, kind))
}

/// Shorthand for a positioned [`ErrorKind::Parse`] error.
pub fn parse_error<T>(pos: &Position, msg: impl Into<String>) -> Result<T> {
    error_at(pos, ErrorKind::Parse(msg.into()))
}

/// Shorthand for a positioned [`ErrorKind::IncompatibleType`] error.
pub fn type_error<T>(pos: &Position, msg: impl Into<String>) -> Result<T> {
    error_at(pos, ErrorKind::IncompatibleType(msg.into()))
}
