//! Stack-machine code generation from a fully registered AST.

use log::debug;
use oberc_bytecode::{Function as BcFunction, Program as BcProgram};
use oberc_sema::{overload_key, FrameLayout, FunctionTable};
use oberc_syntax::ast::*;
use oberc_syntax::error::Result;

use crate::builder::FuncBuilder;

/// Code generator settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodegenOptions {
    /// Use overload keys (`max$ii`) for labels and call targets instead of
    /// plain function names.
    pub use_mangled_names: bool,
    pub layout: FrameLayout,
}

impl Default for CodegenOptions {
    fn default() -> Self {
        Self { use_mangled_names: true, layout: FrameLayout::default() }
    }
}

/// Hands out `L0`, `L1`, ... for the whole run; never reset between
/// functions, so labels are unique across the entire listing.
#[derive(Debug, Default)]
pub struct LabelCounter {
    next: usize,
}

impl LabelCounter {
    pub fn next_label(&mut self) -> String {
        let label = format!("L{}", self.next);
        self.next += 1;
        label
    }

    /// Number of labels issued so far.
    pub fn issued(&self) -> usize {
        self.next
    }
}

pub struct Compiler<'t, 'ast> {
    table: &'t FunctionTable<'ast>,
    options: CodegenOptions,
    labels: LabelCounter,
}

impl<'t, 'ast> Compiler<'t, 'ast> {
    /// `table` must already hold every unit of the run.
    pub fn new(table: &'t FunctionTable<'ast>, options: CodegenOptions) -> Self {
        Self { table, options, labels: LabelCounter::default() }
    }

    pub fn labels_issued(&self) -> usize {
        self.labels.issued()
    }

    /// Compiles `functions` in the order given.
    pub fn compile<'f, I>(&mut self, functions: I) -> Result<BcProgram>
    where
        I: IntoIterator<Item = &'f FunctionDefinition>,
    {
        let mut program = BcProgram::default();
        for f in functions {
            program.functions.push(self.compile_function(f)?);
        }
        Ok(program)
    }

    pub fn compile_function(&mut self, f: &FunctionDefinition) -> Result<BcFunction> {
        let label = if self.options.use_mangled_names { overload_key(f)? } else { f.name.clone() };
        let frame_bytes = self.options.layout.function_bytes(f);
        let mut b = FuncBuilder::new(self.table, self.options, &mut self.labels);
        f.accept(&mut b)?;
        let code = b.finish();
        debug!("compiled {} ({} instructions, frame {} bytes)", label, code.len(), frame_bytes);
        Ok(BcFunction { label, frame_bytes, code })
    }
}
