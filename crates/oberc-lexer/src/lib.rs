//! oberc lexer: converts source text into tokens.
use std::rc::Rc;

use oberc_syntax::ast::Type;
use oberc_syntax::error::{parse_error, Position, Result};
use oberc_syntax::token::{Token, TokenKind};

/// Character scanner that produces tokens with positions.
pub struct Lexer {
    file: Rc<str>,
    src: Vec<char>,
    pos: usize,
    line: usize,
    col: usize,
}

impl Lexer {
    /// Create a new lexer over `input`; `file` is only used for diagnostics.
    pub fn new(file: impl Into<Rc<str>>, input: &str) -> Self {
        Self {
            file: file.into(),
            src: input.chars().collect(),
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    fn peek(&self) -> Option<char> {
        self.src.get(self.pos).copied()
    }
    fn peek_next(&self) -> Option<char> {
        self.src.get(self.pos + 1).copied()
    }
    fn advance(&mut self) -> Option<char> {
        let ch = self.src.get(self.pos).copied();
        if let Some(c) = ch {
            self.pos += 1;
            if c == '\n' {
                self.line += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
        }
        ch
    }

    fn position(&self, line: usize, col: usize) -> Position {
        Position::new(self.file.clone(), line, col)
    }

    fn skip_whitespace(&mut self) -> Result<()> {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.advance();
                }
                Some('(') if self.peek_next() == Some('*') => self.skip_comment()?,
                _ => return Ok(()),
            }
        }
    }

    // Comments nest, as in Oberon.
    fn skip_comment(&mut self) -> Result<()> {
        let (line, col) = (self.line, self.col);
        self.advance();
        self.advance();
        let mut depth = 1usize;
        while depth > 0 {
            match self.advance() {
                Some('(') if self.peek() == Some('*') => {
                    self.advance();
                    depth += 1;
                }
                Some('*') if self.peek() == Some(')') => {
                    self.advance();
                    depth -= 1;
                }
                Some(_) => {}
                None => return parse_error(&self.position(line, col), "Unterminated comment"),
            }
        }
        Ok(())
    }

    fn read_number(&mut self, line: usize, col: usize) -> Result<TokenKind> {
        let mut s = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                s.push(c);
                self.advance();
            } else {
                break;
            }
        }
        let is_double = self.peek() == Some('.') && self.peek_next().map_or(false, |c| c.is_ascii_digit());
        if is_double {
            s.push('.');
            self.advance();
            while let Some(c) = self.peek() {
                if c.is_ascii_digit() {
                    s.push(c);
                    self.advance();
                } else {
                    break;
                }
            }
            return match s.parse::<f64>() {
                Ok(d) => Ok(TokenKind::Double(d)),
                Err(_) => parse_error(&self.position(line, col), format!("Invalid number '{}'", s)),
            };
        }
        match s.parse::<i64>() {
            Ok(n) => Ok(TokenKind::Integer(n)),
            Err(_) => parse_error(&self.position(line, col), format!("Invalid number '{}'", s)),
        }
    }

    fn read_ident_or_keyword(&mut self) -> TokenKind {
        let mut s = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                s.push(c);
                self.advance();
            } else {
                break;
            }
        }
        if let Some(ty) = Type::from_keyword(&s) {
            return TokenKind::Type(ty);
        }
        match s.as_str() {
            "FUNCTION" => TokenKind::Function,
            "VAR" => TokenKind::Var,
            "IF" => TokenKind::If,
            "ELSE" => TokenKind::Else,
            "FOR" => TokenKind::For,
            "RETURN" => TokenKind::Return,
            "AND" => TokenKind::And,
            "OR" => TokenKind::Or,
            "TRUE" => TokenKind::True,
            "FALSE" => TokenKind::False,
            _ => TokenKind::Ident(s),
        }
    }

    fn read_string(&mut self, line: usize, col: usize) -> Result<TokenKind> {
        // opening quote
        self.advance();
        let mut s = String::new();
        while let Some(c) = self.advance() {
            match c {
                '"' => return Ok(TokenKind::String(s)),
                '\\' => match self.advance() {
                    Some(n) => s.push(match n {
                        'n' => '\n',
                        't' => '\t',
                        'r' => '\r',
                        other => other,
                    }),
                    None => break,
                },
                other => s.push(other),
            }
        }
        parse_error(&self.position(line, col), "Unterminated string")
    }

    /// Tokenize the entire input into a vector of tokens ending with `Eof`.
    pub fn tokenize(&mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            self.skip_whitespace()?;
            let line = self.line;
            let col = self.col;
            let c = match self.peek() {
                None => {
                    tokens.push(Token { kind: TokenKind::Eof, line, col });
                    break;
                }
                Some(c) => c,
            };
            let kind = match c {
                '"' => self.read_string(line, col)?,
                c if c.is_ascii_digit() => self.read_number(line, col)?,
                c if c.is_ascii_alphabetic() || c == '_' => self.read_ident_or_keyword(),
                _ => {
                    self.advance();
                    match c {
                        '(' => TokenKind::LParen,
                        ')' => TokenKind::RParen,
                        '{' => TokenKind::LBrace,
                        '}' => TokenKind::RBrace,
                        ',' => TokenKind::Comma,
                        ';' => TokenKind::Semicolon,
                        '+' => TokenKind::Plus,
                        '-' => TokenKind::Minus,
                        '*' => TokenKind::Star,
                        '/' => TokenKind::Slash,
                        '=' => TokenKind::Equal,
                        '#' => TokenKind::Hash,
                        ':' => {
                            if self.peek() == Some('=') {
                                self.advance();
                                TokenKind::Assign
                            } else {
                                TokenKind::Colon
                            }
                        }
                        '<' => {
                            if self.peek() == Some('=') {
                                self.advance();
                                TokenKind::LessEq
                            } else {
                                TokenKind::Less
                            }
                        }
                        '>' => {
                            if self.peek() == Some('=') {
                                self.advance();
                                TokenKind::GreaterEq
                            } else {
                                TokenKind::Greater
                            }
                        }
                        other => {
                            return parse_error(
                                &self.position(line, col),
                                format!("Unexpected character '{}'", other),
                            );
                        }
                    }
                }
            };
            tokens.push(Token { kind, line, col });
        }
        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        Lexer::new("test.ob", input)
            .tokenize()
            .expect("Lexing should succeed")
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_keywords_and_types() {
        assert_eq!(
            kinds("FUNCTION VAR IF ELSE FOR RETURN AND OR TRUE FALSE"),
            vec![
                TokenKind::Function,
                TokenKind::Var,
                TokenKind::If,
                TokenKind::Else,
                TokenKind::For,
                TokenKind::Return,
                TokenKind::And,
                TokenKind::Or,
                TokenKind::True,
                TokenKind::False,
                TokenKind::Eof,
            ]
        );
        assert_eq!(
            kinds("INTEGER DOUBLE BOOLEAN STRING VOID"),
            vec![
                TokenKind::Type(Type::Integer),
                TokenKind::Type(Type::Double),
                TokenKind::Type(Type::Boolean),
                TokenKind::Type(Type::String),
                TokenKind::Type(Type::Void),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_keywords_are_case_sensitive() {
        assert_eq!(kinds("function"), vec![TokenKind::Ident("function".into()), TokenKind::Eof]);
    }

    #[test]
    fn test_numbers() {
        assert_eq!(kinds("42"), vec![TokenKind::Integer(42), TokenKind::Eof]);
        assert_eq!(kinds("1.5"), vec![TokenKind::Double(1.5), TokenKind::Eof]);
        assert_eq!(kinds("2.0"), vec![TokenKind::Double(2.0), TokenKind::Eof]);
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            kinds(":= : = # < <= > >= + - * /"),
            vec![
                TokenKind::Assign,
                TokenKind::Colon,
                TokenKind::Equal,
                TokenKind::Hash,
                TokenKind::Less,
                TokenKind::LessEq,
                TokenKind::Greater,
                TokenKind::GreaterEq,
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Star,
                TokenKind::Slash,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(
            kinds(r#""a\"b\n""#),
            vec![TokenKind::String("a\"b\n".into()), TokenKind::Eof]
        );
    }

    #[test]
    fn test_nested_comments_are_skipped() {
        assert_eq!(
            kinds("(* outer (* inner *) still *) x (y)"),
            vec![
                TokenKind::Ident("x".into()),
                TokenKind::LParen,
                TokenKind::Ident("y".into()),
                TokenKind::RParen,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_token_positions() {
        let tokens = Lexer::new("t.ob", "VAR\n  x").tokenize().unwrap();
        assert_eq!((tokens[0].line, tokens[0].col), (1, 1));
        assert_eq!((tokens[1].line, tokens[1].col), (2, 3));
    }

    #[test]
    fn test_errors_carry_file_and_position() {
        let err = Lexer::new("bad.ob", "x := 1 $").tokenize().unwrap_err();
        assert_eq!(err.to_string(), "bad.ob, Line: 1, Col: 8, Unexpected character '$'");

        let err = Lexer::new("bad.ob", "\"open").tokenize().unwrap_err();
        assert!(err.to_string().contains("Unterminated string"));

        let err = Lexer::new("bad.ob", "(* never closed").tokenize().unwrap_err();
        assert!(err.to_string().contains("Unterminated comment"));
    }
}
