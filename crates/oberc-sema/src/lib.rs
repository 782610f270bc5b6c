//! Semantic analysis for oberc: type resolution, overload keys, the
//! function registry and static frame-size estimation.
//!
//! Every unit of a run is registered in a [`FunctionTable`] before any call
//! is resolved, because a call may name a function from a unit that comes
//! later on the command line.

pub mod frame;
pub mod mangle;
pub mod table;
pub mod types;

pub use frame::{FrameLayout, DEFAULT_BYTES_PER_BOOLEAN, SLOT_BYTES};
pub use mangle::{mangle, overload_key, type_code, SIGNATURE_SEPARATOR};
pub use table::FunctionTable;
pub use types::{arithmetic_result, call_key, resolve_call, type_of};
