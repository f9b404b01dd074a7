//! Generator-time errors.
//!
//! Any of these aborts the schema it was raised for. Nothing is rendered
//! for a schema that failed to build or validate.

use thiserror::Error;

/// A failure while building, planning or validating a contract schema.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Error)]
pub enum SchemaError {
    /// A field declares a type name the catalog does not know.
    #[error("unknown field type `{name}`")]
    UnknownFieldType { name: String },

    /// Two features from the same exclusive group are both present.
    #[error("features `{first}` and `{second}` are mutually exclusive")]
    MutuallyExclusiveFeatures {
        first: &'static str,
        second: &'static str,
    },

    /// A feature is present without the feature or field it builds on.
    #[error("feature `{feature}` requires {requires}")]
    MissingDependency {
        feature: &'static str,
        requires: &'static str,
    },

    /// `arrayLength == 0` on a type other than `literef`.
    #[error("field `{key}` of type `{field_type}` cannot have dynamic length")]
    DynamicLengthNotSupported { key: String, field_type: &'static str },

    /// An array whose elements would straddle storage words.
    #[error("field `{key}`: arrays of `{field_type}` do not tile 256-bit words")]
    UnalignedArrayElement { key: String, field_type: &'static str },

    /// More than one reference field was declared.
    #[error("only one `literef` field is allowed, found `{first}` and `{second}`")]
    MultipleReferenceFields { first: String, second: String },

    /// A field whose total size exceeds [`crate::MAX_FIELD_BITS`].
    #[error("field `{key}`: array length {array_length} is too large")]
    FieldTooLarge { key: String, array_length: u32 },

    /// The fields together need more words than a layout may address.
    #[error("layout needs up to {words} storage words, more than the supported maximum")]
    LayoutTooLarge { words: u64 },

    /// Two fields share an id or a key.
    #[error("duplicate field {what} `{value}`")]
    DuplicateField { what: &'static str, value: String },

    /// A permission id that does not name a bit of a 256-bit permission word.
    #[error("field `{key}`: permission id {permission_id} is outside 1..=256")]
    InvalidPermissionId { key: String, permission_id: u32 },
}
