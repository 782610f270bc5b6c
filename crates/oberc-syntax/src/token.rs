//! Token definitions produced by the oberc lexer.
//!
//! Keywords are upper case, as in Oberon: `FUNCTION`, `VAR`, `IF`, `ELSE`,
//! `FOR`, `RETURN`, `AND`, `OR`, `TRUE`, `FALSE` and the type names
//! `INTEGER`, `DOUBLE`, `BOOLEAN`, `STRING`, `VOID`.
//!
//! ```rust
//! use oberc_syntax::{Token, TokenKind};
//!
//! let keyword = Token { kind: TokenKind::Function, line: 1, col: 1 };
//! let name = Token { kind: TokenKind::Ident("main".to_string()), line: 1, col: 10 };
//! assert_ne!(keyword.kind, name.kind);
//! ```

use crate::ast::Type;

/// Token types that can be produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // === Literals ===
    /// Variable and function names.
    Ident(String),

    /// Unsigned integer literal; a leading `-` is handled by the parser.
    Integer(i64),

    /// Unsigned floating point literal such as `1.5`.
    Double(f64),

    /// String literal with escapes already resolved.
    String(String),

    // === Keywords ===
    Function,
    Var,
    If,
    Else,
    For,
    Return,
    And,
    Or,
    True,
    False,

    /// One of the built-in type names.
    Type(Type),

    // === Punctuation ===
    Comma,
    Colon,
    Semicolon,
    LParen,
    RParen,
    LBrace,
    RBrace,

    // === Operators ===
    /// Assignment `:=`
    Assign,
    Plus,
    Minus,
    Star,
    Slash,
    /// Equality `=`
    Equal,
    /// Inequality `#`
    Hash,
    Less,
    LessEq,
    Greater,
    GreaterEq,

    /// End-of-file marker.
    Eof,
}

impl TokenKind {
    /// Short description used in "expected X, found Y" messages.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Ident(name) => format!("identifier '{}'", name),
            TokenKind::Integer(n) => format!("integer {}", n),
            TokenKind::Double(d) => format!("number {:?}", d),
            TokenKind::String(s) => format!("string \"{}\"", s),
            TokenKind::Function => "'FUNCTION'".into(),
            TokenKind::Var => "'VAR'".into(),
            TokenKind::If => "'IF'".into(),
            TokenKind::Else => "'ELSE'".into(),
            TokenKind::For => "'FOR'".into(),
            TokenKind::Return => "'RETURN'".into(),
            TokenKind::And => "'AND'".into(),
            TokenKind::Or => "'OR'".into(),
            TokenKind::True => "'TRUE'".into(),
            TokenKind::False => "'FALSE'".into(),
            TokenKind::Type(t) => format!("'{}'", t),
            TokenKind::Comma => "','".into(),
            TokenKind::Colon => "':'".into(),
            TokenKind::Semicolon => "';'".into(),
            TokenKind::LParen => "'('".into(),
            TokenKind::RParen => "')'".into(),
            TokenKind::LBrace => "'{'".into(),
            TokenKind::RBrace => "'}'".into(),
            TokenKind::Assign => "':='".into(),
            TokenKind::Plus => "'+'".into(),
            TokenKind::Minus => "'-'".into(),
            TokenKind::Star => "'*'".into(),
            TokenKind::Slash => "'/'".into(),
            TokenKind::Equal => "'='".into(),
            TokenKind::Hash => "'#'".into(),
            TokenKind::Less => "'<'".into(),
            TokenKind::LessEq => "'<='".into(),
            TokenKind::Greater => "'>'".into(),
            TokenKind::GreaterEq => "'>='".into(),
            TokenKind::Eof => "end of file".into(),
        }
    }
}

/// A token with its 1-based source location.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
    pub col: usize,
}
