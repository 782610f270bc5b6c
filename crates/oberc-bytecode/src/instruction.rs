//! Instruction set for the oberc stack machine.
//!
//! Each instruction renders as one line of text: the mnemonic followed by
//! its operands. The listing is consumed by an external assembler, so these
//! spellings are a compatibility surface.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    // Constants
    PushBoolean(bool),
    PushInteger(i64),
    PushDouble(f64),
    PushString(String),

    // Variables, by name; slots are assigned by the assembler
    Push(String),
    Pop(String),

    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,

    // Comparisons
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,

    // Logical
    And,
    Or,

    // Calls
    Call(String),
    Return,

    // Label marker; function entry points and control-flow boundaries
    Label(String),
}

impl Instruction {
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Instruction::PushBoolean(_) => "push_boolean",
            Instruction::PushInteger(_) => "push_integer",
            Instruction::PushDouble(_) => "push_double",
            Instruction::PushString(_) => "push_string",
            Instruction::Push(_) => "push",
            Instruction::Pop(_) => "pop",
            Instruction::Add => "add",
            Instruction::Sub => "sub",
            Instruction::Mul => "mul",
            Instruction::Div => "div",
            Instruction::Eq => "eq",
            Instruction::Neq => "neq",
            Instruction::Lt => "lt",
            Instruction::Lte => "lte",
            Instruction::Gt => "gt",
            Instruction::Gte => "gte",
            Instruction::And => "and",
            Instruction::Or => "or",
            Instruction::Call(_) => "call",
            Instruction::Return => "return",
            Instruction::Label(_) => "label",
        }
    }
}

/// Length operand of `push_string`: characters plus the terminator.
pub fn string_length(s: &str) -> usize {
    s.chars().count() + 1
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::PushBoolean(b) => write!(f, "{} {}", self.mnemonic(), u8::from(*b)),
            Instruction::PushInteger(n) => write!(f, "{} {}", self.mnemonic(), n),
            // `{:?}` keeps the fraction on whole numbers (1.0, not 1)
            Instruction::PushDouble(d) => write!(f, "{} {:?}", self.mnemonic(), d),
            Instruction::PushString(s) => write!(f, "{} {} {:?}", self.mnemonic(), string_length(s), s),
            Instruction::Push(name) | Instruction::Pop(name) | Instruction::Call(name) => {
                write!(f, "{} {}", self.mnemonic(), name)
            }
            Instruction::Label(name) => write!(f, "{}:", name),
            other => f.write_str(other.mnemonic()),
        }
    }
}
