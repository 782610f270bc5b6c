//! AST (abstract syntax tree) types for the oberc language.
//!
//! Nodes are built once by the parser and read-only afterwards. Composite
//! nodes own their children exclusively, so the tree never shares or cycles.

use std::fmt;

use crate::error::Position;

/// Static types of the language.
///
/// `Void` is only valid as a declared return type; it never types a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Integer,
    Double,
    Boolean,
    String,
    Void,
}

impl Type {
    pub fn name(self) -> &'static str {
        match self {
            Type::Integer => "INTEGER",
            Type::Double => "DOUBLE",
            Type::Boolean => "BOOLEAN",
            Type::String => "STRING",
            Type::Void => "VOID",
        }
    }

    /// Looks up a type by its keyword spelling.
    pub fn from_keyword(word: &str) -> Option<Type> {
        match word {
            "INTEGER" => Some(Type::Integer),
            "DOUBLE" => Some(Type::Double),
            "BOOLEAN" => Some(Type::Boolean),
            "STRING" => Some(Type::String),
            "VOID" => Some(Type::Void),
            _ => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl ArithOp {
    pub fn symbol(self) -> &'static str {
        match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
}

impl CmpOp {
    pub fn symbol(self) -> &'static str {
        match self {
            CmpOp::Eq => "=",
            CmpOp::Neq => "#",
            CmpOp::Lt => "<",
            CmpOp::Lte => "<=",
            CmpOp::Gt => ">",
            CmpOp::Gte => ">=",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicOp {
    And,
    Or,
}

impl LogicOp {
    pub fn symbol(self) -> &'static str {
        match self {
            LogicOp::And => "AND",
            LogicOp::Or => "OR",
        }
    }
}

/// A function call: callee name plus ordered arguments.
///
/// Shared by call expressions and call statements.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub name: String,
    pub args: Vec<Expr>,
}

/// An expression node and its source position.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub pos: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Boolean(bool),
    Integer(i64),
    Double(f64),
    Str(String),
    /// Variable reference; `ty` is bound by the parser from the declaration.
    Variable { name: String, ty: Type },
    /// Parenthesized expression.
    Bracketed(Box<Expr>),
    Arithmetic { op: ArithOp, lhs: Box<Expr>, rhs: Box<Expr> },
    Comparison { op: CmpOp, lhs: Box<Expr>, rhs: Box<Expr> },
    Logical { op: LogicOp, lhs: Box<Expr>, rhs: Box<Expr> },
    Call(Call),
}

impl Expr {
    pub fn new(kind: ExprKind, pos: Position) -> Self {
        Self { kind, pos }
    }
}

/// `VAR name: TYPE [:= init]`
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub name: String,
    pub ty: Type,
    pub init: Option<Expr>,
    pub pos: Position,
}

/// `target := value`
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub target: String,
    pub value: Expr,
    pub pos: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfElse {
    pub cond: Expr,
    pub then_block: Block,
    /// Empty when the source has no `ELSE` arm.
    pub else_block: Block,
    pub pos: Position,
}

/// The two loop shapes: a fresh loop variable or an existing one.
#[derive(Debug, Clone, PartialEq)]
pub enum ForInit {
    Declaration(Declaration),
    Assignment(Assignment),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForLoop {
    pub init: ForInit,
    pub cond: Expr,
    pub step: Assignment,
    pub body: Block,
    pub pos: Position,
}

/// Statements.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Declaration(Declaration),
    Assignment(Assignment),
    Call { call: Call, pos: Position },
    Return { value: Option<Expr>, pos: Position },
    If(IfElse),
    For(ForLoop),
}

impl Stmt {
    pub fn pos(&self) -> &Position {
        match self {
            Stmt::Declaration(d) => &d.pos,
            Stmt::Assignment(a) => &a.pos,
            Stmt::Call { pos, .. } | Stmt::Return { pos, .. } => pos,
            Stmt::If(s) => &s.pos,
            Stmt::For(s) => &s.pos,
        }
    }
}

/// An ordered statement sequence, fixed once the parser has built it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Block {
    stmts: Vec<Stmt>,
}

impl Block {
    pub fn new(stmts: Vec<Stmt>) -> Self {
        Self { stmts }
    }

    pub fn stmts(&self) -> &[Stmt] {
        &self.stmts
    }

    pub fn is_empty(&self) -> bool {
        self.stmts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.stmts.len()
    }
}

/// Function parameter; order is part of the overload signature.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub ty: Type,
}

/// Function definition.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDefinition {
    pub name: String,
    pub return_type: Type,
    pub params: Vec<Param>,
    pub body: Block,
    pub pos: Position,
}

impl FunctionDefinition {
    pub fn param_types(&self) -> Vec<Type> {
        self.params.iter().map(|p| p.ty).collect()
    }
}
