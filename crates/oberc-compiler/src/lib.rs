//! Oberc code generator: AST -> stack-machine listing.

mod builder;
pub mod compiler;

pub use compiler::{CodegenOptions, Compiler, LabelCounter};
