//! Oberc re-printer: renders the AST back to indented source text.

use oberc_sema::{overload_key, resolve_call, type_of, FrameLayout, FunctionTable};
use oberc_syntax::ast::*;
use oberc_syntax::error::{Position, Result};
use oberc_syntax::visit::{ExprVisitor, StmtVisitor};

const INDENT: &str = "    ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrintOptions {
    /// Annotate each function with its overload key and frame size.
    pub use_mangled_names: bool,
    pub layout: FrameLayout,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self { use_mangled_names: true, layout: FrameLayout::default() }
    }
}

/// Re-prints every function in order, separated by blank lines.
///
/// Every statement's expressions are typed against `table` as they are
/// printed, so an ill-typed program or an unresolved call fails here too.
pub fn print_functions<'f, I>(functions: I, table: &FunctionTable<'_>, options: PrintOptions) -> Result<String>
where
    I: IntoIterator<Item = &'f FunctionDefinition>,
{
    let mut printer = Printer::new(table, options);
    for (i, f) in functions.into_iter().enumerate() {
        if i > 0 {
            printer.out.push('\n');
        }
        printer.print_function(f)?;
    }
    Ok(printer.finish())
}

/// Renders one expression without typing it.
pub fn print_expr(expr: &Expr) -> Result<String> {
    expr.accept(&mut Printer::new(&FunctionTable::new(), PrintOptions::default()))
}

/// Quotes a string literal so the lexer reads it back unchanged.
pub fn quote(value: &str) -> String {
    let mut s = String::with_capacity(value.len() + 2);
    s.push('"');
    for c in value.chars() {
        match c {
            '"' => s.push_str("\\\""),
            '\\' => s.push_str("\\\\"),
            '\n' => s.push_str("\\n"),
            '\t' => s.push_str("\\t"),
            '\r' => s.push_str("\\r"),
            other => s.push(other),
        }
    }
    s.push('"');
    s
}

pub struct Printer<'t, 'ast> {
    table: &'t FunctionTable<'ast>,
    options: PrintOptions,
    out: String,
    depth: usize,
}

impl<'t, 'ast> Printer<'t, 'ast> {
    pub fn new(table: &'t FunctionTable<'ast>, options: PrintOptions) -> Self {
        Self { table, options, out: String::new(), depth: 0 }
    }

    pub fn print_function(&mut self, function: &FunctionDefinition) -> Result<()> {
        function.accept(self)
    }

    pub fn finish(self) -> String {
        self.out
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn nested(&mut self, block: &Block) -> Result<()> {
        self.depth += 1;
        let res = block.accept(self);
        self.depth -= 1;
        res
    }

    /// Types a statement-level expression, then renders it.
    fn typed(&mut self, expr: &Expr) -> Result<String> {
        type_of(expr, self.table)?;
        expr.accept(self)
    }

    fn declaration_text(&mut self, decl: &Declaration) -> Result<String> {
        let mut s = format!("VAR {}: {}", decl.name, decl.ty);
        if let Some(init) = &decl.init {
            s.push_str(" := ");
            s.push_str(&self.typed(init)?);
        }
        Ok(s)
    }

    fn assignment_text(&mut self, assign: &Assignment) -> Result<String> {
        Ok(format!("{} := {}", assign.target, self.typed(&assign.value)?))
    }

    fn call_text(&mut self, call: &Call) -> Result<String> {
        let args = call.args.iter().map(|a| a.accept(self)).collect::<Result<Vec<_>>>()?;
        Ok(format!("{}({})", call.name, args.join(", ")))
    }

    fn binary(&mut self, symbol: &str, lhs: &Expr, rhs: &Expr) -> Result<String> {
        Ok(format!("{} {} {}", lhs.accept(self)?, symbol, rhs.accept(self)?))
    }
}

impl StmtVisitor for Printer<'_, '_> {
    type Output = ();

    fn visit_declaration(&mut self, decl: &Declaration) -> Result<()> {
        let text = self.declaration_text(decl)?;
        self.line(&format!("{};", text));
        Ok(())
    }

    fn visit_assignment(&mut self, assign: &Assignment) -> Result<()> {
        let text = self.assignment_text(assign)?;
        self.line(&format!("{};", text));
        Ok(())
    }

    fn visit_call_stmt(&mut self, call: &Call, pos: &Position) -> Result<()> {
        resolve_call(call, pos, self.table)?;
        let text = self.call_text(call)?;
        self.line(&format!("{};", text));
        Ok(())
    }

    fn visit_return(&mut self, value: Option<&Expr>, _: &Position) -> Result<()> {
        match value {
            Some(value) => {
                let text = self.typed(value)?;
                self.line(&format!("RETURN {};", text));
            }
            None => self.line("RETURN;"),
        }
        Ok(())
    }

    fn visit_if(&mut self, stmt: &IfElse) -> Result<()> {
        let cond = self.typed(&stmt.cond)?;
        self.line(&format!("IF {} {{", cond));
        self.nested(&stmt.then_block)?;
        if !stmt.else_block.is_empty() {
            self.line("} ELSE {");
            self.nested(&stmt.else_block)?;
        }
        self.line("}");
        Ok(())
    }

    fn visit_for(&mut self, stmt: &ForLoop) -> Result<()> {
        let init = match &stmt.init {
            ForInit::Declaration(decl) => self.declaration_text(decl)?,
            ForInit::Assignment(assign) => self.assignment_text(assign)?,
        };
        let cond = self.typed(&stmt.cond)?;
        let step = self.assignment_text(&stmt.step)?;
        self.line(&format!("FOR ({}; {}; {}) {{", init, cond, step));
        self.nested(&stmt.body)?;
        self.line("}");
        Ok(())
    }

    fn visit_block(&mut self, block: &Block) -> Result<()> {
        for stmt in block.stmts() {
            stmt.accept(self)?;
        }
        Ok(())
    }

    fn visit_function(&mut self, function: &FunctionDefinition) -> Result<()> {
        if self.options.use_mangled_names {
            let key = overload_key(function)?;
            let frame = self.options.layout.function_bytes(function);
            self.line(&format!("(* {}, frame {} bytes *)", key, frame));
        }
        let params = function
            .params
            .iter()
            .map(|p| format!("{}: {}", p.name, p.ty))
            .collect::<Vec<_>>()
            .join(", ");
        let ret = match function.return_type {
            Type::Void => String::new(),
            ty => format!(": {}", ty),
        };
        self.line(&format!("FUNCTION {}({}){} {{", function.name, params, ret));
        self.nested(&function.body)?;
        self.line("}");
        Ok(())
    }
}

impl ExprVisitor for Printer<'_, '_> {
    type Output = String;

    fn visit_boolean(&mut self, value: bool, _: &Position) -> Result<String> {
        Ok(if value { "TRUE" } else { "FALSE" }.to_string())
    }

    fn visit_integer(&mut self, value: i64, _: &Position) -> Result<String> {
        Ok(value.to_string())
    }

    fn visit_double(&mut self, value: f64, _: &Position) -> Result<String> {
        Ok(format!("{:?}", value))
    }

    fn visit_string(&mut self, value: &str, _: &Position) -> Result<String> {
        Ok(quote(value))
    }

    fn visit_variable(&mut self, name: &str, _: Type, _: &Position) -> Result<String> {
        Ok(name.to_string())
    }

    fn visit_bracketed(&mut self, inner: &Expr, _: &Position) -> Result<String> {
        Ok(format!("({})", inner.accept(self)?))
    }

    fn visit_arithmetic(&mut self, op: ArithOp, lhs: &Expr, rhs: &Expr, _: &Position) -> Result<String> {
        self.binary(op.symbol(), lhs, rhs)
    }

    fn visit_comparison(&mut self, op: CmpOp, lhs: &Expr, rhs: &Expr, _: &Position) -> Result<String> {
        self.binary(op.symbol(), lhs, rhs)
    }

    fn visit_logical(&mut self, op: LogicOp, lhs: &Expr, rhs: &Expr, _: &Position) -> Result<String> {
        self.binary(op.symbol(), lhs, rhs)
    }

    fn visit_call(&mut self, call: &Call, _: &Position) -> Result<String> {
        self.call_text(call)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oberc_parser::parse_source;
    use pretty_assertions::assert_eq;

    fn plain() -> PrintOptions {
        PrintOptions { use_mangled_names: false, ..PrintOptions::default() }
    }

    fn try_reprint(src: &str, options: PrintOptions) -> Result<String> {
        let units = parse_source("t.ob", src).unwrap();
        let mut table = FunctionTable::new();
        table.register_unit(&units)?;
        print_functions(&units, &table, options)
    }

    fn reprint(src: &str, options: PrintOptions) -> String {
        try_reprint(src, options).unwrap()
    }

    const MESSY: &str = "FUNCTION add(a: INTEGER, b: INTEGER): INTEGER { VAR sum: INTEGER := a + b;
        VAR flag: BOOLEAN; flag := sum > 10 AND TRUE;
    IF flag { log(sum); } ELSE { }
      FOR (VAR i: INTEGER := 0; i < 3; i := i + 1) { sum := (sum + i) * 2; }
        IF FALSE { } ELSE { RETURN -1; }
    RETURN sum; }
    FUNCTION main() { VAR s: STRING := \"hi\" + 2.5; }
    FUNCTION log(x: INTEGER) { }";

    #[test]
    fn test_reprint_layout() {
        let expected = "\
FUNCTION add(a: INTEGER, b: INTEGER): INTEGER {
    VAR sum: INTEGER := a + b;
    VAR flag: BOOLEAN;
    flag := sum > 10 AND TRUE;
    IF flag {
        log(sum);
    }
    FOR (VAR i: INTEGER := 0; i < 3; i := i + 1) {
        sum := (sum + i) * 2;
    }
    IF FALSE {
    } ELSE {
        RETURN -1;
    }
    RETURN sum;
}

FUNCTION main() {
    VAR s: STRING := \"hi\" + 2.5;
}

FUNCTION log(x: INTEGER) {
}
";
        assert_eq!(reprint(MESSY, plain()), expected);
    }

    #[test]
    fn test_reprint_is_stable() {
        let once = reprint(MESSY, PrintOptions::default());
        let twice = reprint(&once, PrintOptions::default());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_functions_are_annotated_when_mangling() {
        let src = "FUNCTION max(a: INTEGER, b: INTEGER): INTEGER { VAR m: INTEGER := a; RETURN m; }";
        let out = reprint(src, PrintOptions { layout: FrameLayout::new(1), ..PrintOptions::default() });
        assert!(out.starts_with("(* max$ii, frame 8 bytes *)\nFUNCTION max("), "{}", out);
    }

    #[test]
    fn test_literals() {
        let src = "FUNCTION f() { g(TRUE, FALSE, 3, 1.0, 0.25, \"a b\", -2); }
            FUNCTION g(a: BOOLEAN, b: BOOLEAN, c: INTEGER, d: DOUBLE, e: DOUBLE, s: STRING, n: INTEGER) { }";
        let out = reprint(src, plain());
        assert!(out.starts_with("FUNCTION f() {\n    g(TRUE, FALSE, 3, 1.0, 0.25, \"a b\", -2);\n}\n"), "{}", out);
    }

    #[test]
    fn test_print_expr() {
        let expr = Expr::new(
            ExprKind::Comparison {
                op: CmpOp::Neq,
                lhs: Box::new(Expr::new(ExprKind::Integer(1), Position::new("t.ob", 1, 1))),
                rhs: Box::new(Expr::new(ExprKind::Str("x".into()), Position::new("t.ob", 1, 5))),
            },
            Position::new("t.ob", 1, 3),
        );
        assert_eq!(print_expr(&expr).unwrap(), "1 # \"x\"");
    }

    #[test]
    fn test_strings_with_quotes_and_escapes_reparse() {
        let src = "FUNCTION f(): STRING { RETURN \"say \\\"hi\\\"\\n\\tend\\\\\"; }";
        let once = reprint(src, plain());
        assert!(once.contains(r#"RETURN "say \"hi\"\n\tend\\";"#), "{}", once);
        assert_eq!(reprint(&once, plain()), once);
        assert_eq!(quote("a\"b\\c"), r#""a\"b\\c""#);
    }

    #[test]
    fn test_type_errors_fail_the_reprint() {
        let err = try_reprint("FUNCTION main() { VAR s: STRING := 3 + \"a\"; }", plain()).unwrap_err();
        assert!(matches!(err.kind, oberc_syntax::ErrorKind::IncompatibleType(_)));
        let err = try_reprint("FUNCTION main() { IF TRUE { RETURN 1 - FALSE; } }", plain()).unwrap_err();
        assert!(matches!(err.kind, oberc_syntax::ErrorKind::IncompatibleType(_)));
    }

    #[test]
    fn test_unresolved_calls_fail_the_reprint() {
        let err = try_reprint("FUNCTION main() { nothere(1); }", plain()).unwrap_err();
        assert_eq!(err.kind, oberc_syntax::ErrorKind::Lookup("nothere$i".into()));
        let err = try_reprint("FUNCTION v() { } FUNCTION main() { VAR x: INTEGER := v(); }", plain()).unwrap_err();
        assert!(matches!(err.kind, oberc_syntax::ErrorKind::IncompatibleType(_)));
    }
}
