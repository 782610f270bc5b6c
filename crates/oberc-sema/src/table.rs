//! The function registry used for overload resolution.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use log::{debug, trace};
use oberc_syntax::ast::FunctionDefinition;
use oberc_syntax::error::{error_at, ErrorKind, Position, Result};

use crate::mangle::overload_key;

/// Maps overload keys to the definitions that own them.
///
/// The table borrows the parsed units rather than owning them. It is filled
/// through `&mut self` while every unit is registered; backends only get a
/// shared reference, so nothing can be inserted once resolution starts.
/// Entries are never removed or replaced.
#[derive(Debug, Default)]
pub struct FunctionTable<'ast> {
    entries: HashMap<String, &'ast FunctionDefinition>,
}

impl<'ast> FunctionTable<'ast> {
    pub fn new() -> Self {
        Self { entries: HashMap::new() }
    }

    /// Registers `function` under its overload key and returns the key.
    ///
    /// Fails with a duplicate-definition error, positioned at the second
    /// definition, when the key is already taken.
    pub fn insert(&mut self, function: &'ast FunctionDefinition) -> Result<String> {
        let key = overload_key(function)?;
        match self.entries.entry(key) {
            Entry::Occupied(slot) => {
                let first = slot.get();
                debug!("{} already defined at {}", slot.key(), first.pos);
                error_at(
                    &function.pos,
                    ErrorKind::DuplicateDefinition { name: function.name.clone(), key: slot.key().clone() },
                )
            }
            Entry::Vacant(slot) => {
                debug!("registered {} from {}", slot.key(), function.pos.file);
                let key = slot.key().clone();
                slot.insert(function);
                Ok(key)
            }
        }
    }

    /// Registers every definition of one unit, stopping at the first error.
    pub fn register_unit(&mut self, functions: &'ast [FunctionDefinition]) -> Result<()> {
        for function in functions {
            self.insert(function)?;
        }
        Ok(())
    }

    /// Looks up `key`, failing with a lookup error at `pos` when absent.
    pub fn lookup(&self, key: &str, pos: &Position) -> Result<&'ast FunctionDefinition> {
        trace!("lookup {}", key);
        match self.entries.get(key).copied() {
            Some(function) => Ok(function),
            None => error_at(pos, ErrorKind::Lookup(key.to_string())),
        }
    }

    pub fn get(&self, key: &str) -> Option<&'ast FunctionDefinition> {
        self.entries.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered keys, sorted.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oberc_parser::parse_source;
    use oberc_syntax::ast::Type;

    #[test]
    fn test_overloads_with_distinct_signatures_coexist() {
        let a = parse_source("a.ob", "FUNCTION main() { } FUNCTION f(x: INTEGER) { }").unwrap();
        let b = parse_source("b.ob", "FUNCTION main(argc: INTEGER) { } FUNCTION g(x: INTEGER) { }").unwrap();
        let mut table = FunctionTable::new();
        table.register_unit(&a).unwrap();
        table.register_unit(&b).unwrap();
        assert_eq!(table.keys(), vec!["f$i", "g$i", "main$", "main$i"]);
    }

    #[test]
    fn test_same_name_and_parameter_types_is_a_duplicate() {
        let a = parse_source("a.ob", "FUNCTION f(x: INTEGER): INTEGER { RETURN x; }").unwrap();
        let b = parse_source("b.ob", "\nFUNCTION f(y: INTEGER) { }").unwrap();
        let mut table = FunctionTable::new();
        table.register_unit(&a).unwrap();
        let err = table.register_unit(&b).unwrap_err();
        assert_eq!(
            err.kind,
            ErrorKind::DuplicateDefinition { name: "f".into(), key: "f$i".into() }
        );
        assert_eq!(err.to_string(), "b.ob, Line: 2, Col: 1, Duplicate definition of function 'f' with signature 'f$i'");
        // the first definition stays in place
        assert_eq!(table.get("f$i").map(|f| f.return_type), Some(Type::Integer));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_parameter_order_distinguishes_overloads() {
        let unit = parse_source("a.ob", "FUNCTION f(a: INTEGER, b: BOOLEAN) { } FUNCTION f(a: BOOLEAN, b: INTEGER) { }").unwrap();
        let mut table = FunctionTable::new();
        table.register_unit(&unit).unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_lookup_of_unknown_key_fails_at_call_site() {
        let table = FunctionTable::new();
        let pos = Position::new("c.ob", 7, 9);
        let err = table.lookup("nope$", &pos).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Lookup("nope$".into()));
        assert_eq!(err.pos, Some(pos));
        assert!(table.is_empty());
    }
}
