//! Static stack-frame size estimation.
//!
//! Every declared variable gets its own slot; nothing is packed or reused.
//! Both arms of an `IF` are summed, so the result is an upper bound rather
//! than what a liveness-aware allocator would reserve. Parameters are not
//! part of the frame.

use oberc_syntax::ast::*;

/// Width of INTEGER, DOUBLE and STRING slots.
pub const SLOT_BYTES: usize = 8;

/// Width of a BOOLEAN slot unless overridden.
pub const DEFAULT_BYTES_PER_BOOLEAN: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameLayout {
    pub bytes_per_boolean: usize,
}

impl Default for FrameLayout {
    fn default() -> Self {
        Self { bytes_per_boolean: DEFAULT_BYTES_PER_BOOLEAN }
    }
}

impl FrameLayout {
    pub fn new(bytes_per_boolean: usize) -> Self {
        Self { bytes_per_boolean }
    }

    pub fn type_bytes(&self, ty: Type) -> usize {
        match ty {
            Type::Integer | Type::Double | Type::String => SLOT_BYTES,
            Type::Boolean => self.bytes_per_boolean,
            // never declared; the parser rejects VOID variables
            Type::Void => 0,
        }
    }

    pub fn declaration_bytes(&self, decl: &Declaration) -> usize {
        self.type_bytes(decl.ty)
    }

    pub fn stmt_bytes(&self, stmt: &Stmt) -> usize {
        match stmt {
            Stmt::Declaration(decl) => self.declaration_bytes(decl),
            Stmt::If(s) => self.block_bytes(&s.then_block) + self.block_bytes(&s.else_block),
            Stmt::For(s) => {
                let init = match &s.init {
                    ForInit::Declaration(decl) => self.declaration_bytes(decl),
                    ForInit::Assignment(_) => 0,
                };
                init + self.block_bytes(&s.body)
            }
            Stmt::Assignment(_) | Stmt::Call { .. } | Stmt::Return { .. } => 0,
        }
    }

    pub fn block_bytes(&self, block: &Block) -> usize {
        block.stmts().iter().map(|s| self.stmt_bytes(s)).sum()
    }

    pub fn function_bytes(&self, function: &FunctionDefinition) -> usize {
        self.block_bytes(&function.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oberc_parser::parse_source;

    fn frame(src: &str, layout: FrameLayout) -> usize {
        let units = parse_source("f.ob", src).unwrap();
        layout.function_bytes(&units[0])
    }

    const TWO_INTS_ONE_BOOL: &str = "FUNCTION f() {
        VAR a: INTEGER;
        VAR b: INTEGER := 2;
        VAR c: BOOLEAN;
    }";

    #[test]
    fn test_default_boolean_width() {
        assert_eq!(frame(TWO_INTS_ONE_BOOL, FrameLayout::default()), 24);
    }

    #[test]
    fn test_overridden_boolean_width() {
        assert_eq!(frame(TWO_INTS_ONE_BOOL, FrameLayout::new(1)), 17);
    }

    #[test]
    fn test_if_else_sums_both_arms() {
        let src = "FUNCTION f() {
            IF TRUE { VAR a: INTEGER; VAR b: DOUBLE; } ELSE { VAR c: STRING; }
        }";
        assert_eq!(frame(src, FrameLayout::default()), 24);
    }

    #[test]
    fn test_loops_count_their_declaration_and_body() {
        let src = "FUNCTION f() {
            VAR n: INTEGER;
            FOR (VAR i: INTEGER := 0; i < 3; i := i + 1) { VAR flag: BOOLEAN; }
            FOR (n := 0; n < 3; n := n + 1) { VAR s: STRING; }
        }";
        assert_eq!(frame(src, FrameLayout::new(2)), 8 + 8 + 2 + 8);
    }

    #[test]
    fn test_parameters_and_plain_statements_cost_nothing() {
        let src = "FUNCTION f(a: INTEGER, b: BOOLEAN): INTEGER { a := a + 1; g(a); RETURN a; }";
        assert_eq!(frame(src, FrameLayout::default()), 0);
    }
}
