//! Double-dispatch protocol between AST nodes and backends.
//!
//! The node variants are closed (`ExprKind`, `Stmt`); the set of operations
//! over them is open. A backend implements [`ExprVisitor`] and
//! [`StmtVisitor`], and each node's `accept` matches on its own variant and
//! calls the one method for it. Because the match is exhaustive, adding a
//! variant fails to compile until every backend handles it.
//!
//! Backends decide themselves whether and in which order to recurse into
//! children, which is what lets the code generator evaluate right operands
//! before left ones.

use crate::ast::*;
use crate::error::{Position, Result};

pub trait ExprVisitor {
    type Output;

    fn visit_boolean(&mut self, value: bool, pos: &Position) -> Result<Self::Output>;
    fn visit_integer(&mut self, value: i64, pos: &Position) -> Result<Self::Output>;
    fn visit_double(&mut self, value: f64, pos: &Position) -> Result<Self::Output>;
    fn visit_string(&mut self, value: &str, pos: &Position) -> Result<Self::Output>;
    fn visit_variable(&mut self, name: &str, ty: Type, pos: &Position) -> Result<Self::Output>;
    fn visit_bracketed(&mut self, inner: &Expr, pos: &Position) -> Result<Self::Output>;
    fn visit_arithmetic(
        &mut self,
        op: ArithOp,
        lhs: &Expr,
        rhs: &Expr,
        pos: &Position,
    ) -> Result<Self::Output>;
    fn visit_comparison(
        &mut self,
        op: CmpOp,
        lhs: &Expr,
        rhs: &Expr,
        pos: &Position,
    ) -> Result<Self::Output>;
    fn visit_logical(
        &mut self,
        op: LogicOp,
        lhs: &Expr,
        rhs: &Expr,
        pos: &Position,
    ) -> Result<Self::Output>;
    fn visit_call(&mut self, call: &Call, pos: &Position) -> Result<Self::Output>;
}

pub trait StmtVisitor {
    type Output;

    fn visit_declaration(&mut self, decl: &Declaration) -> Result<Self::Output>;
    fn visit_assignment(&mut self, assign: &Assignment) -> Result<Self::Output>;
    fn visit_call_stmt(&mut self, call: &Call, pos: &Position) -> Result<Self::Output>;
    fn visit_return(&mut self, value: Option<&Expr>, pos: &Position) -> Result<Self::Output>;
    fn visit_if(&mut self, stmt: &IfElse) -> Result<Self::Output>;
    fn visit_for(&mut self, stmt: &ForLoop) -> Result<Self::Output>;
    fn visit_block(&mut self, block: &Block) -> Result<Self::Output>;
    fn visit_function(&mut self, function: &FunctionDefinition) -> Result<Self::Output>;
}

impl Expr {
    pub fn accept<V: ExprVisitor + ?Sized>(&self, v: &mut V) -> Result<V::Output> {
        let pos = &self.pos;
        match &self.kind {
            ExprKind::Boolean(b) => v.visit_boolean(*b, pos),
            ExprKind::Integer(n) => v.visit_integer(*n, pos),
            ExprKind::Double(d) => v.visit_double(*d, pos),
            ExprKind::Str(s) => v.visit_string(s, pos),
            ExprKind::Variable { name, ty } => v.visit_variable(name, *ty, pos),
            ExprKind::Bracketed(inner) => v.visit_bracketed(inner, pos),
            ExprKind::Arithmetic { op, lhs, rhs } => v.visit_arithmetic(*op, lhs, rhs, pos),
            ExprKind::Comparison { op, lhs, rhs } => v.visit_comparison(*op, lhs, rhs, pos),
            ExprKind::Logical { op, lhs, rhs } => v.visit_logical(*op, lhs, rhs, pos),
            ExprKind::Call(call) => v.visit_call(call, pos),
        }
    }
}

impl Stmt {
    pub fn accept<V: StmtVisitor + ?Sized>(&self, v: &mut V) -> Result<V::Output> {
        match self {
            Stmt::Declaration(d) => v.visit_declaration(d),
            Stmt::Assignment(a) => v.visit_assignment(a),
            Stmt::Call { call, pos } => v.visit_call_stmt(call, pos),
            Stmt::Return { value, pos } => v.visit_return(value.as_ref(), pos),
            Stmt::If(s) => v.visit_if(s),
            Stmt::For(s) => v.visit_for(s),
        }
    }
}

impl Block {
    pub fn accept<V: StmtVisitor + ?Sized>(&self, v: &mut V) -> Result<V::Output> {
        v.visit_block(self)
    }
}

impl FunctionDefinition {
    pub fn accept<V: StmtVisitor + ?Sized>(&self, v: &mut V) -> Result<V::Output> {
        v.visit_function(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records which visitor method each node dispatched to.
    struct Tracer(Vec<&'static str>);

    impl ExprVisitor for Tracer {
        type Output = ();
        fn visit_boolean(&mut self, _: bool, _: &Position) -> Result<()> { self.0.push("boolean"); Ok(()) }
        fn visit_integer(&mut self, _: i64, _: &Position) -> Result<()> { self.0.push("integer"); Ok(()) }
        fn visit_double(&mut self, _: f64, _: &Position) -> Result<()> { self.0.push("double"); Ok(()) }
        fn visit_string(&mut self, _: &str, _: &Position) -> Result<()> { self.0.push("string"); Ok(()) }
        fn visit_variable(&mut self, _: &str, _: Type, _: &Position) -> Result<()> { self.0.push("variable"); Ok(()) }
        fn visit_bracketed(&mut self, inner: &Expr, _: &Position) -> Result<()> {
            self.0.push("bracketed");
            inner.accept(self)
        }
        fn visit_arithmetic(&mut self, _: ArithOp, lhs: &Expr, rhs: &Expr, _: &Position) -> Result<()> {
            self.0.push("arithmetic");
            lhs.accept(self)?;
            rhs.accept(self)
        }
        fn visit_comparison(&mut self, _: CmpOp, _: &Expr, _: &Expr, _: &Position) -> Result<()> { self.0.push("comparison"); Ok(()) }
        fn visit_logical(&mut self, _: LogicOp, _: &Expr, _: &Expr, _: &Position) -> Result<()> { self.0.push("logical"); Ok(()) }
        fn visit_call(&mut self, _: &Call, _: &Position) -> Result<()> { self.0.push("call"); Ok(()) }
    }

    fn pos() -> Position {
        Position::new("t.ob", 1, 1)
    }

    #[test]
    fn accept_dispatches_on_the_variant() {
        let expr = Expr::new(
            ExprKind::Arithmetic {
                op: ArithOp::Add,
                lhs: Box::new(Expr::new(ExprKind::Integer(1), pos())),
                rhs: Box::new(Expr::new(
                    ExprKind::Bracketed(Box::new(Expr::new(ExprKind::Str("a".into()), pos()))),
                    pos(),
                )),
            },
            pos(),
        );
        let mut tracer = Tracer(Vec::new());
        expr.accept(&mut tracer).unwrap();
        assert_eq!(tracer.0, vec!["arithmetic", "integer", "bracketed", "string"]);
    }
}
