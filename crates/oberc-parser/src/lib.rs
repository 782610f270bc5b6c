pub mod parser;

use std::fs;
use std::path::Path;

use oberc_lexer::Lexer;
use oberc_syntax::ast::FunctionDefinition;
use oberc_syntax::error::{Error, ErrorKind, Result};

pub use parser::Parser;

/// Lexes and parses one source unit held in memory.
pub fn parse_source(file: &str, src: &str) -> Result<Vec<FunctionDefinition>> {
    let tokens = Lexer::new(file, src).tokenize()?;
    Parser::new(file, tokens).parse_unit()
}

/// Reads and parses one source file. Positions use the path as given.
pub fn parse_file(path: &Path) -> Result<Vec<FunctionDefinition>> {
    let src = fs::read_to_string(path)
        .map_err(|e| Error::new(ErrorKind::Io(format!("Failed to read {}: {}", path.display(), e))))?;
    parse_source(&path.display().to_string(), &src)
}
