//! Stack-machine instruction listing for oberc.
//!
//! This crate defines the instruction set emitted by the code generator and
//! its textual form, one instruction per line, as read by the downstream
//! assembler.

pub mod instruction;
pub mod program;

pub use instruction::{string_length, Instruction};
pub use program::{Function, Program};
