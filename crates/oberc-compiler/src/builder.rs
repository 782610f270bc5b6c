//! Function builder: the visitor that lowers one function body.

use oberc_bytecode::Instruction as BC;
use oberc_sema::{arithmetic_result, mangle, FunctionTable};
use oberc_syntax::ast::*;
use oberc_syntax::error::{type_error, Position, Result};
use oberc_syntax::visit::{ExprVisitor, StmtVisitor};

use crate::compiler::{CodegenOptions, LabelCounter};

pub(crate) struct FuncBuilder<'c, 't, 'ast> {
    table: &'t FunctionTable<'ast>,
    options: CodegenOptions,
    labels: &'c mut LabelCounter,
    code: Vec<BC>,
}

impl<'c, 't, 'ast> FuncBuilder<'c, 't, 'ast> {
    pub(crate) fn new(table: &'t FunctionTable<'ast>, options: CodegenOptions, labels: &'c mut LabelCounter) -> Self {
        Self { table, options, labels, code: Vec::new() }
    }

    pub(crate) fn finish(self) -> Vec<BC> {
        self.code
    }

    fn emit(&mut self, i: BC) {
        self.code.push(i);
    }

    fn emit_label(&mut self, label: String) {
        self.emit(BC::Label(label));
    }

    /// Right operand first, then left, then the operator. Returns the
    /// operand types as (left, right).
    fn emit_binary(&mut self, lhs: &Expr, rhs: &Expr, op: BC) -> Result<(Type, Type)> {
        let rt = rhs.accept(self)?;
        let lt = lhs.accept(self)?;
        self.emit(op);
        Ok((lt, rt))
    }

    /// Arguments in order, then the call; the target must resolve exactly.
    fn emit_call(&mut self, call: &Call, pos: &Position) -> Result<Type> {
        let arg_types = call.args.iter().map(|arg| arg.accept(self)).collect::<Result<Vec<_>>>()?;
        let key = format!("{}{}", call.name, mangle(&arg_types, pos)?);
        let function = self.table.lookup(&key, pos)?;
        let target = if self.options.use_mangled_names { key } else { call.name.clone() };
        self.emit(BC::Call(target));
        Ok(function.return_type)
    }

    fn emit_store(&mut self, name: &str, value: &Expr) -> Result<()> {
        value.accept(self)?;
        self.emit(BC::Pop(name.to_string()));
        Ok(())
    }
}

impl StmtVisitor for FuncBuilder<'_, '_, '_> {
    type Output = ();

    fn visit_declaration(&mut self, decl: &Declaration) -> Result<()> {
        match &decl.init {
            Some(init) => self.emit_store(&decl.name, init),
            None => Ok(()),
        }
    }

    fn visit_assignment(&mut self, assign: &Assignment) -> Result<()> {
        self.emit_store(&assign.target, &assign.value)
    }

    fn visit_call_stmt(&mut self, call: &Call, pos: &Position) -> Result<()> {
        self.emit_call(call, pos)?;
        Ok(())
    }

    fn visit_return(&mut self, value: Option<&Expr>, _: &Position) -> Result<()> {
        if let Some(value) = value {
            value.accept(self)?;
        }
        self.emit(BC::Return);
        Ok(())
    }

    // Labels mark the arm boundaries; no conditional jumps are emitted yet.
    fn visit_if(&mut self, stmt: &IfElse) -> Result<()> {
        let else_label = self.labels.next_label();
        let end_label = self.labels.next_label();
        stmt.cond.accept(self)?;
        stmt.then_block.accept(self)?;
        self.emit_label(else_label);
        stmt.else_block.accept(self)?;
        self.emit_label(end_label);
        Ok(())
    }

    fn visit_for(&mut self, stmt: &ForLoop) -> Result<()> {
        let cond_label = self.labels.next_label();
        let end_label = self.labels.next_label();
        match &stmt.init {
            ForInit::Declaration(decl) => self.visit_declaration(decl)?,
            ForInit::Assignment(assign) => self.visit_assignment(assign)?,
        }
        self.emit_label(cond_label);
        stmt.cond.accept(self)?;
        stmt.body.accept(self)?;
        self.visit_assignment(&stmt.step)?;
        self.emit_label(end_label);
        Ok(())
    }

    fn visit_block(&mut self, block: &Block) -> Result<()> {
        for stmt in block.stmts() {
            stmt.accept(self)?;
        }
        Ok(())
    }

    fn visit_function(&mut self, function: &FunctionDefinition) -> Result<()> {
        function.body.accept(self)?;
        // fallthrough epilogue
        self.emit(BC::Return);
        Ok(())
    }
}

/// Emits an expression's code and yields its type.
impl ExprVisitor for FuncBuilder<'_, '_, '_> {
    type Output = Type;

    fn visit_boolean(&mut self, value: bool, _: &Position) -> Result<Type> {
        self.emit(BC::PushBoolean(value));
        Ok(Type::Boolean)
    }

    fn visit_integer(&mut self, value: i64, _: &Position) -> Result<Type> {
        self.emit(BC::PushInteger(value));
        Ok(Type::Integer)
    }

    fn visit_double(&mut self, value: f64, _: &Position) -> Result<Type> {
        self.emit(BC::PushDouble(value));
        Ok(Type::Double)
    }

    fn visit_string(&mut self, value: &str, _: &Position) -> Result<Type> {
        self.emit(BC::PushString(value.to_string()));
        Ok(Type::String)
    }

    fn visit_variable(&mut self, name: &str, ty: Type, pos: &Position) -> Result<Type> {
        if ty == Type::Void {
            return type_error(pos, "VOID cannot be used as a value");
        }
        self.emit(BC::Push(name.to_string()));
        Ok(ty)
    }

    fn visit_bracketed(&mut self, inner: &Expr, _: &Position) -> Result<Type> {
        inner.accept(self)
    }

    fn visit_arithmetic(&mut self, op: ArithOp, lhs: &Expr, rhs: &Expr, pos: &Position) -> Result<Type> {
        let instr = match op {
            ArithOp::Add => BC::Add,
            ArithOp::Sub => BC::Sub,
            ArithOp::Mul => BC::Mul,
            ArithOp::Div => BC::Div,
        };
        let (lt, rt) = self.emit_binary(lhs, rhs, instr)?;
        arithmetic_result(op, lt, rt, pos)
    }

    fn visit_comparison(&mut self, op: CmpOp, lhs: &Expr, rhs: &Expr, _: &Position) -> Result<Type> {
        let instr = match op {
            CmpOp::Eq => BC::Eq,
            CmpOp::Neq => BC::Neq,
            CmpOp::Lt => BC::Lt,
            CmpOp::Lte => BC::Lte,
            CmpOp::Gt => BC::Gt,
            CmpOp::Gte => BC::Gte,
        };
        self.emit_binary(lhs, rhs, instr)?;
        Ok(Type::Boolean)
    }

    fn visit_logical(&mut self, op: LogicOp, lhs: &Expr, rhs: &Expr, _: &Position) -> Result<Type> {
        let instr = match op {
            LogicOp::And => BC::And,
            LogicOp::Or => BC::Or,
        };
        self.emit_binary(lhs, rhs, instr)?;
        Ok(Type::Boolean)
    }

    fn visit_call(&mut self, call: &Call, pos: &Position) -> Result<Type> {
        match self.emit_call(call, pos)? {
            Type::Void => type_error(pos, format!("'{}' returns VOID and cannot be used as a value", call.name)),
            ty => Ok(ty),
        }
    }
}
