//! Contract schema compilation for packed storage.
//!
//! This crate turns a contract configuration into a [`ContractSchema`]:
//!
//! - **Field catalog** ([`FieldType`]): closed set of storable types with
//!   their exact bit widths.
//! - **Layout planner** ([`StorageLayout`]): packs fields into 256-bit
//!   words, assigning every field a slot and a bit offset.
//! - **Validator** ([`ContractSchema::validate`]): feature exclusivity,
//!   feature dependencies and field-set consistency.
//!
//! # Architecture
//!
//! ```text
//! ContractConfig (fields + features)
//!        ↓
//!   StorageLayout::plan   (resolve types, sort, bin-pack, place)
//!        ↓
//!   ContractSchema        (immutable; read by codegen and the storage model)
//!        ↓
//!   validate()
//! ```
//!
//! Everything here is a pure function of its input. Schemas share no state
//! and can be built on any number of threads.

mod config;
mod entry;
mod error;
mod feature;
mod field_type;
mod layout;
mod runtime_error;
mod schema;
mod validate;

pub use config::{ContractConfig, Uris};
pub use entry::{Entry, FieldShape};
pub use error::SchemaError;
pub use feature::{Capabilities, Feature, FeatureSet, FragmentKind, PatchKind, ReferenceMode};
pub use field_type::{FieldType, FieldTypeInfo, ScalarKind, WORD_BITS};
pub use layout::{
    Chunk, SlotCursor, StorageField, StorageLayout, StorageSlot, MAX_FIELD_BITS, MAX_LAYOUT_WORDS,
};
pub use runtime_error::RuntimeError;
pub use schema::ContractSchema;
