pub mod ast;
pub mod error;
pub mod token;
pub mod visit;

pub use ast::*;
pub use error::*;
pub use token::*;
pub use visit::*;
