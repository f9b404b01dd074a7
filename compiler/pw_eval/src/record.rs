//! Materialized metadata records and their packed form.
//!
//! [`pack`] and [`unpack`] are the model of the generated `packMetadata` /
//! `unpackMetadata` pair. Pack walks the layout slot by slot and ORs every
//! chunk placed in that slot into its word. Unpack walks fields in
//! declaration order and reads each chunk back from the position the
//! planner assigned. Dynamic fields are not part of the record.

use alloy_primitives::U256;
use pw_schema::{ContractSchema, RuntimeError, StorageField, WORD_BITS};
use rustc_hash::FxHashMap;

use crate::error::EvalError;
use crate::value::{decode_element, elements, encode_element, Value};
use crate::word::extract;

/// Decoded view of every packed field of an entity, in declaration order.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Record {
    values: Vec<(String, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// A record of all-zero values for `schema`.
    pub fn zeroed(schema: &ContractSchema) -> Self {
        Self {
            values: schema
                .storage
                .fixed_fields()
                .map(|f| (f.key().to_string(), Value::zero_for(f)))
                .collect(),
        }
    }

    /// Set `key`, replacing an existing value.
    pub fn set(&mut self, key: &str, value: Value) {
        match self.values.iter_mut().find(|(k, _)| k == key) {
            Some(slot) => slot.1 = value,
            None => self.values.push((key.to_string(), value)),
        }
    }

    #[must_use]
    pub fn with(mut self, key: &str, value: Value) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Encode every chunk of `field`, in the order of [`StorageField::chunks`].
pub(crate) fn encode_field(field: &StorageField, value: &Value) -> Result<Vec<U256>, EvalError> {
    let mut encoded = Vec::new();
    for element in elements(field, value)? {
        encoded.extend(encode_element(field, element)?);
    }
    Ok(encoded)
}

/// Decode `field` from the packed words.
pub(crate) fn decode_field(field: &StorageField, words: &[U256]) -> Value {
    let chunks = field.chunks();
    let parts = (field.element_bits / WORD_BITS).max(1) as usize;
    let mut decoded = Vec::with_capacity(field.element_count() as usize);

    for element in chunks.chunks(parts) {
        let raw: Vec<U256> = element
            .iter()
            .map(|c| extract(words[c.slot as usize], c.offset, c.bits))
            .collect();
        decoded.push(decode_element(field.field_type, &raw));
    }

    if field.is_array() {
        Value::Array(decoded)
    } else {
        decoded
            .into_iter()
            .next()
            .unwrap_or_else(|| Value::zero_for(field))
    }
}

/// Pack a record into the entity's word array.
///
/// Every packed field must be present in the record.
pub fn pack(schema: &ContractSchema, record: &Record) -> Result<Vec<U256>, EvalError> {
    let layout = &schema.storage;

    let mut contributions: FxHashMap<u32, Vec<U256>> = FxHashMap::default();
    for field in layout.fixed_fields() {
        let value = record
            .get(field.key())
            .ok_or_else(|| EvalError::UnknownField(field.key().to_string()))?;
        contributions.insert(field.id(), encode_field(field, value)?);
    }

    let mut words = vec![U256::ZERO; layout.slot_count()];
    for (slot_index, slot) in layout.slots().iter().enumerate() {
        let mut word = U256::ZERO;
        for &id in &slot.field_ids {
            let (Some(field), Some(encoded)) = (layout.field(id), contributions.get(&id)) else {
                continue;
            };
            for (chunk, value) in field.chunks().iter().zip(encoded) {
                if chunk.slot as usize == slot_index {
                    word |= *value << chunk.offset as usize;
                }
            }
        }
        words[slot_index] = word;
    }

    Ok(words)
}

/// Unpack the entity's word array into a record.
///
/// Fails with `BadInputLengths` unless exactly one word per slot is given.
pub fn unpack(schema: &ContractSchema, words: &[U256]) -> Result<Record, EvalError> {
    if words.len() != schema.slot_count() {
        return Err(RuntimeError::BadInputLengths.into());
    }
    Ok(Record {
        values: schema
            .storage
            .fixed_fields()
            .map(|f| (f.key().to_string(), decode_field(f, words)))
            .collect(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
