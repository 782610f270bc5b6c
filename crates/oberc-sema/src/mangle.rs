//! Name mangling for overloaded functions.
//!
//! Scheme: function name + `$` + one code per parameter type, in order.
//!
//! | type    | code |
//! |---------|------|
//! | DOUBLE  | `d`  |
//! | INTEGER | `i`  |
//! | BOOLEAN | `b`  |
//! | STRING  | `s`  |
//!
//! Examples: `max(a: INTEGER, b: INTEGER)` → `max$ii`, `main()` → `main$`.
//! The same scheme applied to argument types gives the key a call site
//! looks up, which is why there is no implicit widening: an INTEGER
//! argument produces `i` and never matches a `d` slot.

use oberc_syntax::ast::{FunctionDefinition, Type};
use oberc_syntax::error::{type_error, Position, Result};

pub const SIGNATURE_SEPARATOR: char = '$';

/// Mangling code of a value type; `None` for VOID.
pub fn type_code(ty: Type) -> Option<char> {
    match ty {
        Type::Double => Some('d'),
        Type::Integer => Some('i'),
        Type::Boolean => Some('b'),
        Type::String => Some('s'),
        Type::Void => None,
    }
}

/// Encodes an ordered type sequence. VOID anywhere in the sequence fails
/// with an incompatible-type error at `pos`.
pub fn mangle(types: &[Type], pos: &Position) -> Result<String> {
    let mut signature = String::with_capacity(types.len() + 1);
    signature.push(SIGNATURE_SEPARATOR);
    for &ty in types {
        match type_code(ty) {
            Some(code) => signature.push(code),
            None => return type_error(pos, "VOID cannot appear in a function signature"),
        }
    }
    Ok(signature)
}

/// The registry key of a definition: name plus mangled parameter types.
pub fn overload_key(function: &FunctionDefinition) -> Result<String> {
    Ok(format!("{}{}", function.name, mangle(&function.param_types(), &function.pos)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos() -> Position {
        Position::new("m.ob", 2, 3)
    }

    #[test]
    fn test_codes_follow_parameter_order() {
        assert_eq!(mangle(&[Type::Double, Type::Integer, Type::Boolean, Type::String], &pos()).unwrap(), "$dibs");
        assert_eq!(mangle(&[], &pos()).unwrap(), "$");
    }

    #[test]
    fn test_mangling_is_deterministic_and_order_sensitive() {
        let ib = mangle(&[Type::Integer, Type::Boolean], &pos()).unwrap();
        assert_eq!(ib, mangle(&[Type::Integer, Type::Boolean], &pos()).unwrap());
        assert_ne!(ib, mangle(&[Type::Boolean, Type::Integer], &pos()).unwrap());
    }

    #[test]
    fn test_void_is_rejected_with_position() {
        let err = mangle(&[Type::Integer, Type::Void], &pos()).unwrap_err();
        assert_eq!(err.pos, Some(pos()));
        assert!(err.to_string().contains("VOID"));
    }

    #[test]
    fn test_overload_key_uses_name_and_parameters() {
        let units = oberc_parser::parse_source("m.ob", "FUNCTION max(a: INTEGER, b: DOUBLE): DOUBLE { RETURN b; }").unwrap();
        assert_eq!(overload_key(&units[0]).unwrap(), "max$id");
    }
}
