//! Raw field declarations.

use serde::{Deserialize, Serialize};

/// How many elements a declaration stores.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum FieldShape {
    /// `arrayLength == 0`: a growable collection kept outside the packed
    /// layout. Only references may be dynamic.
    Dynamic,
    /// `arrayLength == 1`.
    Scalar,
    /// `arrayLength > 1`: a fixed-size array, always word-aligned.
    Array(u32),
}

impl FieldShape {
    pub const fn from_array_length(array_length: u32) -> Self {
        match array_length {
            0 => FieldShape::Dynamic,
            1 => FieldShape::Scalar,
            n => FieldShape::Array(n),
        }
    }

    /// Element count used for sizing. Dynamic fields count as one element.
    pub const fn element_count(self) -> u32 {
        match self {
            FieldShape::Dynamic | FieldShape::Scalar => 1,
            FieldShape::Array(n) => n,
        }
    }
}

/// A field as declared in the contract configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: u32,
    pub key: String,
    #[serde(rename = "fieldType", alias = "type")]
    pub field_type: String,
    #[serde(default = "default_array_length")]
    pub array_length: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permission_id: Option<u32>,
    #[serde(default)]
    pub description: String,
}

fn default_array_length() -> u32 {
    1
}

impl Entry {
    /// Convenience constructor for a field without permission or description.
    pub fn new(id: u32, key: impl Into<String>, field_type: impl Into<String>, array_length: u32) -> Self {
        Self {
            id,
            key: key.into(),
            field_type: field_type.into(),
            array_length,
            permission_id: None,
            description: String::new(),
        }
    }

    #[must_use]
    pub fn with_permission(mut self, permission_id: u32) -> Self {
        self.permission_id = Some(permission_id);
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[inline]
    pub fn shape(&self) -> FieldShape {
        FieldShape::from_array_length(self.array_length)
    }
}
