//! Expression type inference.
//!
//! Types are computed bottom-up on demand, with no caching. For `+`, a
//! STRING on the left concatenates and a STRING only on the right is an
//! error. Comparison and logical operators always yield BOOLEAN
//! without looking at their operand types.

use oberc_syntax::ast::*;
use oberc_syntax::error::{type_error, Position, Result};
use oberc_syntax::visit::ExprVisitor;

use crate::mangle::mangle;
use crate::table::FunctionTable;

/// Returns the type of `expr`, resolving calls against `table`.
pub fn type_of(expr: &Expr, table: &FunctionTable<'_>) -> Result<Type> {
    expr.accept(&mut TypeResolver { table })
}

/// Key a call site looks up: callee name plus its mangled argument types.
pub fn call_key(call: &Call, pos: &Position, table: &FunctionTable<'_>) -> Result<String> {
    let arg_types = call
        .args
        .iter()
        .map(|arg| type_of(arg, table))
        .collect::<Result<Vec<_>>>()?;
    Ok(format!("{}{}", call.name, mangle(&arg_types, pos)?))
}

/// Resolves a call to the exact-signature definition it targets.
pub fn resolve_call<'ast>(
    call: &Call,
    pos: &Position,
    table: &FunctionTable<'ast>,
) -> Result<&'ast FunctionDefinition> {
    let key = call_key(call, pos, table)?;
    table.lookup(&key, pos)
}

/// Result type of an arithmetic operator applied to two operand types.
pub fn arithmetic_result(op: ArithOp, lhs: Type, rhs: Type, pos: &Position) -> Result<Type> {
    if lhs == Type::Boolean || rhs == Type::Boolean {
        return type_error(
            pos,
            format!("operator '{}' cannot be applied to {} and {}", op.symbol(), lhs, rhs),
        );
    }
    match op {
        ArithOp::Add if lhs == Type::String => return Ok(Type::String),
        ArithOp::Add if rhs == Type::String => {
            return type_error(pos, format!("cannot add STRING to {}; the left operand must be the STRING", lhs));
        }
        ArithOp::Sub | ArithOp::Mul | ArithOp::Div if lhs == Type::String || rhs == Type::String => {
            return type_error(
                pos,
                format!("operator '{}' cannot be applied to {} and {}", op.symbol(), lhs, rhs),
            );
        }
        _ => {}
    }
    if lhs == Type::Double || rhs == Type::Double {
        Ok(Type::Double)
    } else {
        Ok(Type::Integer)
    }
}

fn value_type(ty: Type, pos: &Position) -> Result<Type> {
    match ty {
        Type::Void => type_error(pos, "VOID cannot be used as a value"),
        ty => Ok(ty),
    }
}

struct TypeResolver<'t, 'ast> {
    table: &'t FunctionTable<'ast>,
}

impl ExprVisitor for TypeResolver<'_, '_> {
    type Output = Type;

    fn visit_boolean(&mut self, _: bool, _: &Position) -> Result<Type> {
        Ok(Type::Boolean)
    }

    fn visit_integer(&mut self, _: i64, _: &Position) -> Result<Type> {
        Ok(Type::Integer)
    }

    fn visit_double(&mut self, _: f64, _: &Position) -> Result<Type> {
        Ok(Type::Double)
    }

    fn visit_string(&mut self, _: &str, _: &Position) -> Result<Type> {
        Ok(Type::String)
    }

    fn visit_variable(&mut self, _: &str, ty: Type, pos: &Position) -> Result<Type> {
        value_type(ty, pos)
    }

    fn visit_bracketed(&mut self, inner: &Expr, _: &Position) -> Result<Type> {
        inner.accept(self)
    }

    fn visit_arithmetic(&mut self, op: ArithOp, lhs: &Expr, rhs: &Expr, pos: &Position) -> Result<Type> {
        let lt = lhs.accept(self)?;
        let rt = rhs.accept(self)?;
        arithmetic_result(op, lt, rt, pos)
    }

    fn visit_comparison(&mut self, _: CmpOp, lhs: &Expr, rhs: &Expr, _: &Position) -> Result<Type> {
        // operands must still be well-typed, but are not compared to each other
        lhs.accept(self)?;
        rhs.accept(self)?;
        Ok(Type::Boolean)
    }

    fn visit_logical(&mut self, _: LogicOp, lhs: &Expr, rhs: &Expr, _: &Position) -> Result<Type> {
        lhs.accept(self)?;
        rhs.accept(self)?;
        Ok(Type::Boolean)
    }

    fn visit_call(&mut self, call: &Call, pos: &Position) -> Result<Type> {
        let function = resolve_call(call, pos, self.table)?;
        match function.return_type {
            Type::Void => type_error(
                pos,
                format!("'{}' returns VOID and cannot be used as a value", call.name),
            ),
            ty => Ok(ty),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oberc_lexer::Lexer;
    use oberc_parser::{parse_source, Parser};
    use oberc_syntax::ErrorKind;

    fn expr(input: &str) -> Expr {
        let tokens = Lexer::new("t.ob", input).tokenize().unwrap();
        Parser::new("t.ob", tokens).parse_expr().unwrap()
    }

    fn infer(input: &str) -> Result<Type> {
        type_of(&expr(input), &FunctionTable::new())
    }

    #[test]
    fn test_literals() {
        assert_eq!(infer("TRUE").unwrap(), Type::Boolean);
        assert_eq!(infer("7").unwrap(), Type::Integer);
        assert_eq!(infer("7.5").unwrap(), Type::Double);
        assert_eq!(infer("\"s\"").unwrap(), Type::String);
        assert_eq!(infer("(((1)))").unwrap(), Type::Integer);
    }

    #[test]
    fn test_arithmetic_table() {
        assert_eq!(infer("1 + 2").unwrap(), Type::Integer);
        assert_eq!(infer("1.0 + 2").unwrap(), Type::Double);
        assert_eq!(infer("2 * 1.0").unwrap(), Type::Double);
        assert_eq!(infer("\"a\" + 3").unwrap(), Type::String);
        assert_eq!(infer("\"a\" + \"b\"").unwrap(), Type::String);
        assert_eq!(infer("(\"a\" + 1) + 2.5").unwrap(), Type::String);
    }

    #[test]
    fn test_string_add_is_asymmetric() {
        let err = infer("3 + \"a\"").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::IncompatibleType(_)));
        assert_eq!(err.pos, Some(Position::new("t.ob", 1, 3)));
    }

    #[test]
    fn test_boolean_and_string_misuse() {
        assert!(infer("TRUE + 1").is_err());
        assert!(infer("1 - FALSE").is_err());
        assert!(infer("\"a\" + TRUE").is_err());
        assert!(infer("\"a\" - 1").is_err());
        assert!(infer("2 * \"a\"").is_err());
        assert!(infer("\"a\" / \"b\"").is_err());
    }

    #[test]
    fn test_nested_errors_surface() {
        assert!(infer("(TRUE + 1) = 2").is_err());
        assert!(infer("1 < 2 AND (\"x\" - 1) > 0").is_err());
    }

    #[test]
    fn test_comparisons_and_logic_do_not_check_operands() {
        assert_eq!(infer("1 = \"a\"").unwrap(), Type::Boolean);
        assert_eq!(infer("1 < 2.0").unwrap(), Type::Boolean);
        assert_eq!(infer("\"s\" # TRUE").unwrap(), Type::Boolean);
        assert_eq!(infer("1 AND \"x\"").unwrap(), Type::Boolean);
        assert_eq!(infer("TRUE OR 2.5").unwrap(), Type::Boolean);
    }

    const LIBRARY: &str = "
        FUNCTION half(x: DOUBLE): DOUBLE { RETURN x / 2.0; }
        FUNCTION name(x: INTEGER): STRING { RETURN \"n\"; }
        FUNCTION ping() { }
    ";

    #[test]
    fn test_calls_take_the_return_type() {
        let lib = parse_source("lib.ob", LIBRARY).unwrap();
        let mut table = FunctionTable::new();
        table.register_unit(&lib).unwrap();
        assert_eq!(type_of(&expr("half(1.0)"), &table).unwrap(), Type::Double);
        assert_eq!(type_of(&expr("name(1) + 1"), &table).unwrap(), Type::String);
        assert_eq!(type_of(&expr("half(half(0.5))"), &table).unwrap(), Type::Double);
    }

    #[test]
    fn test_calls_do_not_widen_arguments() {
        let lib = parse_source("lib.ob", LIBRARY).unwrap();
        let mut table = FunctionTable::new();
        table.register_unit(&lib).unwrap();
        let err = type_of(&expr("half(1)"), &table).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Lookup("half$i".into()));
        let err = type_of(&expr("name(1.0)"), &table).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Lookup("name$d".into()));
    }

    #[test]
    fn test_void_calls_are_not_values() {
        let lib = parse_source("lib.ob", LIBRARY).unwrap();
        let mut table = FunctionTable::new();
        table.register_unit(&lib).unwrap();
        let err = type_of(&expr("ping()"), &table).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::IncompatibleType(_)));
        // resolution itself still works for call statements
        let call = Call { name: "ping".into(), args: vec![] };
        let pos = Position::new("t.ob", 1, 1);
        assert_eq!(resolve_call(&call, &pos, &table).unwrap().name, "ping");
    }

    #[test]
    fn test_call_key_uses_argument_types() {
        let table = FunctionTable::new();
        let ExprKind::Call(call) = expr("f(1, 2.0, TRUE, \"s\" + 1)").kind else { panic!("Expected call") };
        let pos = Position::new("t.ob", 1, 1);
        assert_eq!(call_key(&call, &pos, &table).unwrap(), "f$idbs");
    }
}
