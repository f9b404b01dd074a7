//! Field type catalog.
//!
//! Every type name a field declaration may use maps to exactly one
//! [`FieldType`]. The catalog is closed: lookup is an exhaustive match and
//! an unrecognized name fails with [`SchemaError::UnknownFieldType`] instead
//! of falling back to a default width.
//!
//! Widths are the number of bits a single element occupies inside a packed
//! 256-bit storage word.

use std::fmt;

use crate::error::SchemaError;

/// Width of one storage word in bits.
pub const WORD_BITS: u32 = 256;

/// The underlying scalar representation of a field type.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ScalarKind {
    Bool,
    Unsigned,
    Signed,
    Address,
    /// Fixed-width character string, stored left-aligned as raw bytes.
    FixedString,
    /// 64-bit reference to another entity. Zero is never a valid reference.
    Reference,
}

/// Catalog entry for a field type.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct FieldTypeInfo {
    pub bit_width: u32,
    pub scalar_kind: ScalarKind,
    pub is_fixed_string: bool,
}

/// A storable field type.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum FieldType {
    Boolean,
    Int8,
    Int16,
    Int32,
    Int64,
    Int128,
    Int256,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Uint128,
    Uint256,
    Address,
    Char8,
    Char16,
    Char32,
    Char64,
    LiteRef,
}

impl FieldType {
    /// Every catalog entry, in catalog order.
    pub const ALL: [FieldType; 19] = [
        FieldType::Boolean,
        FieldType::Int8,
        FieldType::Int16,
        FieldType::Int32,
        FieldType::Int64,
        FieldType::Int128,
        FieldType::Int256,
        FieldType::Uint8,
        FieldType::Uint16,
        FieldType::Uint32,
        FieldType::Uint64,
        FieldType::Uint128,
        FieldType::Uint256,
        FieldType::Address,
        FieldType::Char8,
        FieldType::Char16,
        FieldType::Char32,
        FieldType::Char64,
        FieldType::LiteRef,
    ];

    /// Look up a type by its declared name.
    pub fn from_name(name: &str) -> Result<Self, SchemaError> {
        let ty = match name {
            "boolean" => FieldType::Boolean,
            "int8" => FieldType::Int8,
            "int16" => FieldType::Int16,
            "int32" => FieldType::Int32,
            "int64" => FieldType::Int64,
            "int128" => FieldType::Int128,
            "int256" => FieldType::Int256,
            "uint8" => FieldType::Uint8,
            "uint16" => FieldType::Uint16,
            "uint32" => FieldType::Uint32,
            "uint64" => FieldType::Uint64,
            "uint128" => FieldType::Uint128,
            "uint256" => FieldType::Uint256,
            "address" => FieldType::Address,
            "char8" => FieldType::Char8,
            "char16" => FieldType::Char16,
            "char32" => FieldType::Char32,
            "char64" => FieldType::Char64,
            "literef" => FieldType::LiteRef,
            _ => {
                return Err(SchemaError::UnknownFieldType {
                    name: name.to_string(),
                })
            }
        };
        Ok(ty)
    }

    /// The declared name of this type.
    pub const fn name(self) -> &'static str {
        match self {
            FieldType::Boolean => "boolean",
            FieldType::Int8 => "int8",
            FieldType::Int16 => "int16",
            FieldType::Int32 => "int32",
            FieldType::Int64 => "int64",
            FieldType::Int128 => "int128",
            FieldType::Int256 => "int256",
            FieldType::Uint8 => "uint8",
            FieldType::Uint16 => "uint16",
            FieldType::Uint32 => "uint32",
            FieldType::Uint64 => "uint64",
            FieldType::Uint128 => "uint128",
            FieldType::Uint256 => "uint256",
            FieldType::Address => "address",
            FieldType::Char8 => "char8",
            FieldType::Char16 => "char16",
            FieldType::Char32 => "char32",
            FieldType::Char64 => "char64",
            FieldType::LiteRef => "literef",
        }
    }

    /// Full catalog entry.
    pub const fn info(self) -> FieldTypeInfo {
        FieldTypeInfo {
            bit_width: self.bit_width(),
            scalar_kind: self.scalar_kind(),
            is_fixed_string: self.is_fixed_string(),
        }
    }

    /// Bits one element occupies in packed storage.
    ///
    /// Booleans occupy a whole byte, the smallest unit the packer hands out.
    pub const fn bit_width(self) -> u32 {
        match self {
            FieldType::Boolean | FieldType::Int8 | FieldType::Uint8 => 8,
            FieldType::Int16 | FieldType::Uint16 => 16,
            FieldType::Int32 | FieldType::Uint32 => 32,
            FieldType::Int64 | FieldType::Uint64 | FieldType::Char8 | FieldType::LiteRef => 64,
            FieldType::Int128 | FieldType::Uint128 | FieldType::Char16 => 128,
            FieldType::Address => 160,
            FieldType::Int256 | FieldType::Uint256 | FieldType::Char32 => 256,
            FieldType::Char64 => 512,
        }
    }

    pub const fn scalar_kind(self) -> ScalarKind {
        match self {
            FieldType::Boolean => ScalarKind::Bool,
            FieldType::Int8
            | FieldType::Int16
            | FieldType::Int32
            | FieldType::Int64
            | FieldType::Int128
            | FieldType::Int256 => ScalarKind::Signed,
            FieldType::Uint8
            | FieldType::Uint16
            | FieldType::Uint32
            | FieldType::Uint64
            | FieldType::Uint128
            | FieldType::Uint256 => ScalarKind::Unsigned,
            FieldType::Address => ScalarKind::Address,
            FieldType::Char8 | FieldType::Char16 | FieldType::Char32 | FieldType::Char64 => {
                ScalarKind::FixedString
            }
            FieldType::LiteRef => ScalarKind::Reference,
        }
    }

    pub const fn is_fixed_string(self) -> bool {
        matches!(self.scalar_kind(), ScalarKind::FixedString)
    }

    #[inline]
    pub const fn is_reference(self) -> bool {
        matches!(self, FieldType::LiteRef)
    }

    /// Character capacity of a fixed-string type (bytes), `None` otherwise.
    pub const fn string_capacity(self) -> Option<usize> {
        match self {
            FieldType::Char8 => Some(8),
            FieldType::Char16 => Some(16),
            FieldType::Char32 => Some(32),
            FieldType::Char64 => Some(64),
            _ => None,
        }
    }

    /// Whether consecutive array elements of this type tile storage words
    /// without straddling a word boundary.
    pub const fn tiles_words(self) -> bool {
        let bits = self.bit_width();
        if bits < WORD_BITS {
            WORD_BITS % bits == 0
        } else {
            bits % WORD_BITS == 0
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
