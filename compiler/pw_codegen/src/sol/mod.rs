//! Solidity backend.

mod accessors;
mod contract;
mod dynamic_refs;
mod fixed_refs;
mod generic;
mod pack;
mod types;
mod wrapper;

pub use contract::{emit_implementation, inheritance};
pub use wrapper::emit_wrapper;
