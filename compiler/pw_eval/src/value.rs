//! Field values and their storage encoding.
//!
//! An element is encoded into one chunk per storage word it occupies: one
//! for everything up to 256 bits, two for `char64`. Encodings match the
//! generated Solidity:
//!
//! | kind | encoding |
//! |------|----------|
//! | bool | `1` / `0` |
//! | unsigned | the value |
//! | signed | two's complement truncated to the width |
//! | address | the 160-bit address as an integer |
//! | fixed string | bytes left-aligned, zero-padded (first char most significant) |
//! | reference | the 64-bit value |

use alloy_primitives::{Address, I256, U256};
use pw_schema::{FieldType, ScalarKind, StorageField, WORD_BITS};
use smallvec::{smallvec, SmallVec};

use crate::error::EvalError;
use crate::word::field_mask;

/// Encoded element: one `U256` per storage word the element covers.
pub type Encoded = SmallVec<[U256; 2]>;

/// A decoded field value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    Bool(bool),
    Uint(U256),
    Int(I256),
    Address(Address),
    Str(String),
    Ref(u64),
    Array(Vec<Value>),
}

impl Value {
    pub fn uint(value: u64) -> Self {
        Value::Uint(U256::from(value))
    }

    pub fn str(value: &str) -> Self {
        Value::Str(value.to_string())
    }

    /// The all-zero value of a field: what `unpack` yields for fresh storage.
    pub fn zero_for(field: &StorageField) -> Self {
        let element = zero_element(field.field_type);
        if field.is_array() {
            Value::Array(vec![element; field.element_count() as usize])
        } else {
            element
        }
    }
}

fn zero_element(ty: FieldType) -> Value {
    match ty.scalar_kind() {
        ScalarKind::Bool => Value::Bool(false),
        ScalarKind::Unsigned => Value::Uint(U256::ZERO),
        ScalarKind::Signed => Value::Int(I256::ZERO),
        ScalarKind::Address => Value::Address(Address::ZERO),
        ScalarKind::FixedString => Value::Str(String::new()),
        ScalarKind::Reference => Value::Ref(0),
    }
}

/// The elements of a field value, checked against the field's shape.
pub fn elements<'v>(field: &StorageField, value: &'v Value) -> Result<&'v [Value], EvalError> {
    if field.is_array() {
        match value {
            Value::Array(items) if items.len() == field.element_count() as usize => Ok(items),
            _ => Err(EvalError::TypeMismatch {
                key: field.key().to_string(),
                expected: "an array of the declared length",
            }),
        }
    } else {
        Ok(std::slice::from_ref(value))
    }
}

/// Encode one element of `field`.
pub fn encode_element(field: &StorageField, value: &Value) -> Result<Encoded, EvalError> {
    let ty = field.field_type;
    let bits = field.element_bits;
    let mismatch = |expected| EvalError::TypeMismatch {
        key: field.key().to_string(),
        expected,
    };
    let out_of_range = || EvalError::ValueOutOfRange {
        key: field.key().to_string(),
        bits,
    };

    match (ty.scalar_kind(), value) {
        (ScalarKind::Bool, Value::Bool(b)) => Ok(smallvec![U256::from(u8::from(*b))]),
        (ScalarKind::Unsigned, Value::Uint(v)) => {
            if *v & !field_mask(bits) != U256::ZERO {
                return Err(out_of_range());
            }
            Ok(smallvec![*v])
        }
        (ScalarKind::Signed, Value::Int(v)) => {
            let raw = v.into_raw();
            let truncated = raw & field_mask(bits);
            if sign_extend(truncated, bits) != raw {
                return Err(out_of_range());
            }
            Ok(smallvec![truncated])
        }
        (ScalarKind::Address, Value::Address(addr)) => {
            Ok(smallvec![U256::from_be_slice(addr.as_slice())])
        }
        (ScalarKind::FixedString, Value::Str(s)) => {
            let capacity = ty.string_capacity().unwrap_or(0);
            if s.len() > capacity || s.as_bytes().contains(&0) {
                return Err(out_of_range());
            }
            let mut buf = vec![0u8; capacity];
            buf[..s.len()].copy_from_slice(s.as_bytes());
            Ok(buf.chunks(32).map(U256::from_be_slice).collect())
        }
        (ScalarKind::Reference, Value::Ref(r)) => Ok(smallvec![U256::from(*r)]),
        (kind, _) => Err(mismatch(expected_for(kind))),
    }
}

/// Decode one element of type `ty` from its chunks.
pub fn decode_element(ty: FieldType, chunks: &[U256]) -> Value {
    let bits = ty.bit_width().min(WORD_BITS);
    let first = chunks.first().copied().unwrap_or(U256::ZERO);
    match ty.scalar_kind() {
        ScalarKind::Bool => Value::Bool(!first.is_zero()),
        ScalarKind::Unsigned => Value::Uint(first),
        ScalarKind::Signed => Value::Int(I256::from_raw(sign_extend(first, bits))),
        ScalarKind::Address => {
            let bytes = first.to_be_bytes::<32>();
            Value::Address(Address::from_slice(&bytes[12..]))
        }
        ScalarKind::FixedString => {
            let capacity = ty.string_capacity().unwrap_or(0);
            let mut bytes = Vec::with_capacity(capacity);
            for chunk in chunks {
                let word = chunk.to_be_bytes::<32>();
                let width = (capacity - bytes.len()).min(32);
                bytes.extend_from_slice(&word[32 - width..]);
            }
            while bytes.last() == Some(&0) {
                bytes.pop();
            }
            Value::Str(String::from_utf8_lossy(&bytes).into_owned())
        }
        ScalarKind::Reference => Value::Ref(first.as_limbs()[0]),
    }
}

fn sign_extend(value: U256, bits: u32) -> U256 {
    if bits < WORD_BITS && value.bit(bits as usize - 1) {
        value | !field_mask(bits)
    } else {
        value
    }
}

fn expected_for(kind: ScalarKind) -> &'static str {
    match kind {
        ScalarKind::Bool => "a boolean",
        ScalarKind::Unsigned => "an unsigned integer",
        ScalarKind::Signed => "a signed integer",
        ScalarKind::Address => "an address",
        ScalarKind::FixedString => "a string",
        ScalarKind::Reference => "a reference",
    }
}
