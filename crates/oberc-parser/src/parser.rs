//! Recursive-descent parser with lexical name binding.
//!
//! Besides building the tree, the parser binds every variable reference to
//! the type of its declaration, so later stages never re-derive it.

use std::collections::HashMap;
use std::rc::Rc;

use oberc_syntax::ast::*;
use oberc_syntax::error::{parse_error, Position, Result};
use oberc_syntax::token::{Token, TokenKind};

pub struct Parser {
    file: Rc<str>,
    tokens: Vec<Token>,
    pos: usize,
    scopes: Vec<HashMap<String, Type>>,
}

impl Parser {
    /// `tokens` must end with `Eof`, as produced by the lexer.
    pub fn new(file: impl Into<Rc<str>>, mut tokens: Vec<Token>) -> Self {
        if tokens.is_empty() {
            tokens.push(Token { kind: TokenKind::Eof, line: 1, col: 1 });
        }
        Self { file: file.into(), tokens, pos: 0, scopes: Vec::new() }
    }

    /// Parses a whole unit: a sequence of function definitions.
    pub fn parse_unit(&mut self) -> Result<Vec<FunctionDefinition>> {
        let mut functions = Vec::new();
        while !self.check(&TokenKind::Eof) {
            functions.push(self.parse_function()?);
        }
        Ok(functions)
    }

    pub fn parse_function(&mut self) -> Result<FunctionDefinition> {
        let pos = self.expect(TokenKind::Function)?;
        let name = self.expect_ident()?;
        self.expect(TokenKind::LParen)?;
        let mut params = Vec::new();
        if !self.check(&TokenKind::RParen) {
            loop {
                let param_pos = self.current_pos();
                let param_name = self.expect_ident()?;
                self.expect(TokenKind::Colon)?;
                let ty = self.expect_value_type()?;
                if params.iter().any(|p: &Param| p.name == param_name) {
                    return parse_error(&param_pos, format!("Duplicate parameter '{}'", param_name));
                }
                params.push(Param { name: param_name, ty });
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen)?;
        let return_type = if self.eat(&TokenKind::Colon) { self.expect_type()? } else { Type::Void };

        self.push_scope();
        for p in &params {
            self.declare_unchecked(&p.name, p.ty);
        }
        let body = self.parse_block_contents();
        self.pop_scope();

        Ok(FunctionDefinition { name, return_type, params, body: body?, pos })
    }

    fn parse_block(&mut self) -> Result<Block> {
        self.push_scope();
        let block = self.parse_block_contents();
        self.pop_scope();
        block
    }

    fn parse_block_contents(&mut self) -> Result<Block> {
        self.expect(TokenKind::LBrace)?;
        let mut stmts = Vec::new();
        while !self.check(&TokenKind::RBrace) {
            if self.check(&TokenKind::Eof) {
                return parse_error(&self.current_pos(), "Expected '}' before end of file");
            }
            stmts.push(self.parse_stmt()?);
        }
        self.expect(TokenKind::RBrace)?;
        Ok(Block::new(stmts))
    }

    pub fn parse_stmt(&mut self) -> Result<Stmt> {
        let pos = self.current_pos();
        match self.peek().clone() {
            TokenKind::Var => {
                let decl = self.parse_declaration()?;
                self.expect(TokenKind::Semicolon)?;
                Ok(Stmt::Declaration(decl))
            }
            TokenKind::Return => {
                self.advance();
                let value = if self.check(&TokenKind::Semicolon) { None } else { Some(self.parse_expr()?) };
                self.expect(TokenKind::Semicolon)?;
                Ok(Stmt::Return { value, pos })
            }
            TokenKind::If => self.parse_if(),
            TokenKind::For => self.parse_for(),
            TokenKind::Ident(name) => {
                if matches!(self.peek_next(), TokenKind::LParen) {
                    self.advance();
                    let call = self.parse_call_args(name)?;
                    self.expect(TokenKind::Semicolon)?;
                    Ok(Stmt::Call { call, pos })
                } else {
                    let assign = self.parse_assignment()?;
                    self.expect(TokenKind::Semicolon)?;
                    Ok(Stmt::Assignment(assign))
                }
            }
            other => parse_error(&pos, format!("Expected statement, found {}", other.describe())),
        }
    }

    /// `VAR name: TYPE [:= expr]`, without the trailing `;`.
    fn parse_declaration(&mut self) -> Result<Declaration> {
        let pos = self.expect(TokenKind::Var)?;
        let name = self.expect_ident()?;
        self.expect(TokenKind::Colon)?;
        let ty = self.expect_value_type()?;
        let init = if self.eat(&TokenKind::Assign) { Some(self.parse_expr()?) } else { None };
        // declared after the initializer, which cannot see the new name
        self.declare(&name, ty, &pos)?;
        Ok(Declaration { name, ty, init, pos })
    }

    /// `name := expr`, without the trailing `;`.
    fn parse_assignment(&mut self) -> Result<Assignment> {
        let pos = self.current_pos();
        let target = self.expect_ident()?;
        if self.resolve(&target).is_none() {
            return parse_error(&pos, format!("Assignment to undeclared variable '{}'", target));
        }
        self.expect(TokenKind::Assign)?;
        let value = self.parse_expr()?;
        Ok(Assignment { target, value, pos })
    }

    fn parse_if(&mut self) -> Result<Stmt> {
        let pos = self.expect(TokenKind::If)?;
        let cond = self.parse_expr()?;
        let then_block = self.parse_block()?;
        let else_block = if self.eat(&TokenKind::Else) {
            if self.check(&TokenKind::If) {
                // ELSE IF chains nest into a single-statement else arm
                let nested = self.parse_if()?;
                Block::new(vec![nested])
            } else {
                self.parse_block()?
            }
        } else {
            Block::default()
        };
        Ok(Stmt::If(IfElse { cond, then_block, else_block, pos }))
    }

    fn parse_for(&mut self) -> Result<Stmt> {
        let pos = self.expect(TokenKind::For)?;
        self.expect(TokenKind::LParen)?;
        self.push_scope();
        let parsed = self.parse_for_header().and_then(|header| Ok((header, self.parse_block()?)));
        self.pop_scope();
        let ((init, cond, step), body) = parsed?;
        Ok(Stmt::For(ForLoop { init, cond, step, body, pos }))
    }

    fn parse_for_header(&mut self) -> Result<(ForInit, Expr, Assignment)> {
        let init = if self.check(&TokenKind::Var) {
            ForInit::Declaration(self.parse_declaration()?)
        } else {
            ForInit::Assignment(self.parse_assignment()?)
        };
        self.expect(TokenKind::Semicolon)?;
        let cond = self.parse_expr()?;
        self.expect(TokenKind::Semicolon)?;
        let step = self.parse_assignment()?;
        self.expect(TokenKind::RParen)?;
        Ok((init, cond, step))
    }

    pub fn parse_expr(&mut self) -> Result<Expr> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> Result<Expr> {
        let mut lhs = self.parse_and()?;
        while self.check(&TokenKind::Or) {
            let pos = self.expect(TokenKind::Or)?;
            let rhs = self.parse_and()?;
            lhs = Expr::new(ExprKind::Logical { op: LogicOp::Or, lhs: Box::new(lhs), rhs: Box::new(rhs) }, pos);
        }
        Ok(lhs)
    }

    fn parse_and(&mut self) -> Result<Expr> {
        let mut lhs = self.parse_comparison()?;
        while self.check(&TokenKind::And) {
            let pos = self.expect(TokenKind::And)?;
            let rhs = self.parse_comparison()?;
            lhs = Expr::new(ExprKind::Logical { op: LogicOp::And, lhs: Box::new(lhs), rhs: Box::new(rhs) }, pos);
        }
        Ok(lhs)
    }

    fn parse_comparison(&mut self) -> Result<Expr> {
        let lhs = self.parse_additive()?;
        let op = match self.peek() {
            TokenKind::Equal => CmpOp::Eq,
            TokenKind::Hash => CmpOp::Neq,
            TokenKind::Less => CmpOp::Lt,
            TokenKind::LessEq => CmpOp::Lte,
            TokenKind::Greater => CmpOp::Gt,
            TokenKind::GreaterEq => CmpOp::Gte,
            _ => return Ok(lhs),
        };
        let pos = self.current_pos();
        self.advance();
        let rhs = self.parse_additive()?;
        Ok(Expr::new(ExprKind::Comparison { op, lhs: Box::new(lhs), rhs: Box::new(rhs) }, pos))
    }

    fn parse_additive(&mut self) -> Result<Expr> {
        let mut lhs = self.parse_term()?;
        loop {
            let op = match self.peek() {
                TokenKind::Plus => ArithOp::Add,
                TokenKind::Minus => ArithOp::Sub,
                _ => return Ok(lhs),
            };
            let pos = self.current_pos();
            self.advance();
            let rhs = self.parse_term()?;
            lhs = Expr::new(ExprKind::Arithmetic { op, lhs: Box::new(lhs), rhs: Box::new(rhs) }, pos);
        }
    }

    fn parse_term(&mut self) -> Result<Expr> {
        let mut lhs = self.parse_primary()?;
        loop {
            let op = match self.peek() {
                TokenKind::Star => ArithOp::Mul,
                TokenKind::Slash => ArithOp::Div,
                _ => return Ok(lhs),
            };
            let pos = self.current_pos();
            self.advance();
            let rhs = self.parse_primary()?;
            lhs = Expr::new(ExprKind::Arithmetic { op, lhs: Box::new(lhs), rhs: Box::new(rhs) }, pos);
        }
    }

    fn parse_primary(&mut self) -> Result<Expr> {
        let pos = self.current_pos();
        let kind = match self.peek().clone() {
            TokenKind::True => {
                self.advance();
                ExprKind::Boolean(true)
            }
            TokenKind::False => {
                self.advance();
                ExprKind::Boolean(false)
            }
            TokenKind::Integer(n) => {
                self.advance();
                ExprKind::Integer(n)
            }
            TokenKind::Double(d) => {
                self.advance();
                ExprKind::Double(d)
            }
            TokenKind::String(s) => {
                self.advance();
                ExprKind::Str(s)
            }
            TokenKind::Minus => {
                self.advance();
                match self.peek().clone() {
                    TokenKind::Integer(n) => {
                        self.advance();
                        ExprKind::Integer(-n)
                    }
                    TokenKind::Double(d) => {
                        self.advance();
                        ExprKind::Double(-d)
                    }
                    other => {
                        return parse_error(
                            &self.current_pos(),
                            format!("Expected number after '-', found {}", other.describe()),
                        )
                    }
                }
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(TokenKind::RParen)?;
                ExprKind::Bracketed(Box::new(inner))
            }
            TokenKind::Ident(name) => {
                self.advance();
                if self.check(&TokenKind::LParen) {
                    ExprKind::Call(self.parse_call_args(name)?)
                } else {
                    match self.resolve(&name) {
                        Some(ty) => ExprKind::Variable { name, ty },
                        None => return parse_error(&pos, format!("Undeclared variable '{}'", name)),
                    }
                }
            }
            other => return parse_error(&pos, format!("Expected expression, found {}", other.describe())),
        };
        Ok(Expr::new(kind, pos))
    }

    /// Parses `( args )` after a callee name has been consumed.
    fn parse_call_args(&mut self, name: String) -> Result<Call> {
        self.expect(TokenKind::LParen)?;
        let mut args = Vec::new();
        if !self.check(&TokenKind::RParen) {
            loop {
                args.push(self.parse_expr()?);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen)?;
        Ok(Call { name, args })
    }

    // --- scopes ---

    fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    fn declare(&mut self, name: &str, ty: Type, pos: &Position) -> Result<()> {
        if let Some(scope) = self.scopes.last() {
            if scope.contains_key(name) {
                return parse_error(pos, format!("Variable '{}' already declared in this scope", name));
            }
        }
        self.declare_unchecked(name, ty);
        Ok(())
    }

    fn declare_unchecked(&mut self, name: &str, ty: Type) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string(), ty);
        }
    }

    fn resolve(&self, name: &str) -> Option<Type> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name).copied())
    }

    // --- token helpers ---

    fn peek(&self) -> &TokenKind {
        &self.tokens[self.pos.min(self.tokens.len() - 1)].kind
    }

    fn peek_next(&self) -> &TokenKind {
        &self.tokens[(self.pos + 1).min(self.tokens.len() - 1)].kind
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
    }

    fn check(&self, kind: &TokenKind) -> bool {
        self.peek() == kind
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn current_pos(&self) -> Position {
        let tok = &self.tokens[self.pos.min(self.tokens.len() - 1)];
        Position::new(self.file.clone(), tok.line, tok.col)
    }

    /// Consumes a token of `kind` and returns its position.
    fn expect(&mut self, kind: TokenKind) -> Result<Position> {
        let pos = self.current_pos();
        if self.check(&kind) {
            self.advance();
            Ok(pos)
        } else {
            parse_error(&pos, format!("Expected {}, found {}", kind.describe(), self.peek().describe()))
        }
    }

    fn expect_ident(&mut self) -> Result<String> {
        match self.peek().clone() {
            TokenKind::Ident(name) => {
                self.advance();
                Ok(name)
            }
            other => parse_error(&self.current_pos(), format!("Expected identifier, found {}", other.describe())),
        }
    }

    fn expect_type(&mut self) -> Result<Type> {
        match self.peek().clone() {
            TokenKind::Type(ty) => {
                self.advance();
                Ok(ty)
            }
            other => parse_error(&self.current_pos(), format!("Expected type, found {}", other.describe())),
        }
    }

    /// Like [`Parser::expect_type`] but rejects `VOID`.
    fn expect_value_type(&mut self) -> Result<Type> {
        let pos = self.current_pos();
        match self.expect_type()? {
            Type::Void => parse_error(&pos, "VOID is only valid as a return type"),
            ty => Ok(ty),
        }
    }
}
