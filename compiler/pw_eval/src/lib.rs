//! Executable model of the storage generated contracts operate on.
//!
//! Every routine here performs the same word arithmetic as the Solidity the
//! generator emits, over [`U256`](alloy_primitives::U256) words:
//!
//! - [`pack`] / [`unpack`]: the `Metadata` record and the packed word array.
//! - [`Entity`]: per-field load/store with permission guards, raw slot
//!   access.
//! - [`FixedRefs`]: first-fit references inside the packed layout.
//! - [`DynamicRefs`]: growable reference list with a swap-remove index.
//!
//! Failures carry the exact revert identifier the generated code uses
//! ([`EvalError::Runtime`]), so layout and reference properties can be
//! checked without a chain.

mod dynamic_refs;
mod entity;
mod error;
mod fixed_refs;
mod record;
mod value;
pub mod word;

pub use dynamic_refs::DynamicRefs;
pub use entity::{Entity, WriteAuth};
pub use error::EvalError;
pub use fixed_refs::FixedRefs;
pub use record::{pack, unpack, Record};
pub use value::{decode_element, elements, encode_element, Encoded, Value};
