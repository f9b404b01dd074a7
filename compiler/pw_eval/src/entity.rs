//! A single entity's storage: packed words plus its growable reference
//! list.
//!
//! Mirrors the generated per-field accessors and the generic metadata
//! functions, including their authorization guards.

use alloy_primitives::U256;
use pw_schema::{ContractSchema, ReferenceMode, RuntimeError, StorageField};

use crate::dynamic_refs::DynamicRefs;
use crate::error::EvalError;
use crate::fixed_refs::FixedRefs;
use crate::record::{decode_field, encode_field, pack, unpack, Record};
use crate::value::Value;
use crate::word::insert;

/// The caller's write authority over one entity.
///
/// `can_write_entity` is general write access (owner, scope operator).
/// `permissions` is the per-address bitmask set through `setPermissions`;
/// bit `n - 1` grants fields declared with `permissionId == n`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct WriteAuth {
    pub can_write_entity: bool,
    pub permissions: U256,
}

impl WriteAuth {
    pub const fn owner() -> Self {
        Self {
            can_write_entity: true,
            permissions: U256::ZERO,
        }
    }

    pub const fn none() -> Self {
        Self {
            can_write_entity: false,
            permissions: U256::ZERO,
        }
    }

    /// A caller with only the given permission bits.
    pub const fn with_permissions(permissions: U256) -> Self {
        Self {
            can_write_entity: false,
            permissions,
        }
    }

    /// Whether a field guarded by `permission_id` may be written.
    pub fn allows(&self, permission_id: Option<u32>) -> bool {
        if self.can_write_entity {
            return true;
        }
        match permission_id {
            Some(id) if (1..=256).contains(&id) => self.permissions.bit(id as usize - 1),
            _ => false,
        }
    }
}

/// Storage of one entity under a schema.
#[derive(Clone, Debug)]
pub struct Entity<'s> {
    schema: &'s ContractSchema,
    words: Vec<U256>,
    dynamic: DynamicRefs,
}

impl<'s> Entity<'s> {
    /// Fresh, all-zero storage.
    pub fn new(schema: &'s ContractSchema) -> Self {
        Self {
            schema,
            words: vec![U256::ZERO; schema.slot_count()],
            dynamic: DynamicRefs::new(),
        }
    }

    pub fn schema(&self) -> &'s ContractSchema {
        self.schema
    }

    /// The packed words.
    pub fn words(&self) -> &[U256] {
        &self.words
    }

    fn packed_field(&self, key: &str) -> Result<&'s StorageField, EvalError> {
        self.schema
            .storage
            .field_by_key(key)
            .filter(|f| !f.is_dynamic())
            .ok_or_else(|| EvalError::UnknownField(key.to_string()))
    }

    /// Per-field load.
    pub fn load(&self, key: &str) -> Result<Value, EvalError> {
        let field = self.packed_field(key)?;
        Ok(decode_field(field, &self.words))
    }

    /// Per-field store. Only the field's bits change.
    pub fn store(&mut self, key: &str, value: &Value, auth: &WriteAuth) -> Result<(), EvalError> {
        let field = self.packed_field(key)?;
        if !auth.allows(field.entry.permission_id) {
            return Err(RuntimeError::NotAuthorized.into());
        }
        let encoded = encode_field(field, value)?;
        for (chunk, part) in field.chunks().iter().zip(encoded) {
            let word = &mut self.words[chunk.slot as usize];
            *word = insert(*word, chunk.offset, chunk.bits, part);
        }
        tracing::trace!(key, slot = field.slot, offset = field.offset, "field stored");
        Ok(())
    }

    /// Overwrite every packed field from `record`.
    pub fn store_metadata(&mut self, record: &Record, auth: &WriteAuth) -> Result<(), EvalError> {
        if !auth.can_write_entity {
            return Err(RuntimeError::NotAuthorized.into());
        }
        self.words = pack(self.schema, record)?;
        Ok(())
    }

    pub fn load_metadata(&self) -> Result<Record, EvalError> {
        unpack(self.schema, &self.words)
    }

    /// Raw word `slot`.
    pub fn load_slot(&self, slot: usize) -> Result<U256, EvalError> {
        self.words
            .get(slot)
            .copied()
            .ok_or(EvalError::Runtime(RuntimeError::UnsupportedMetadataId))
    }

    /// Overwrite raw word `slot`.
    pub fn store_slot(&mut self, slot: usize, word: U256, auth: &WriteAuth) -> Result<(), EvalError> {
        if !auth.can_write_entity {
            return Err(RuntimeError::NotAuthorized.into());
        }
        let target = self
            .words
            .get_mut(slot)
            .ok_or(RuntimeError::UnsupportedMetadataId)?;
        *target = word;
        Ok(())
    }

    /// The fixed-capacity reference store.
    pub fn fixed_refs(&mut self) -> Result<FixedRefs<'_>, EvalError> {
        let ReferenceMode::Fixed { field_id, .. } = self.schema.reference_mode() else {
            return Err(EvalError::NoFixedReferences);
        };
        let field = self
            .schema
            .storage
            .field(field_id)
            .ok_or(EvalError::NoFixedReferences)?;
        Ok(FixedRefs::new(&mut self.words, field))
    }

    /// The growable reference store.
    pub fn dynamic_refs(&mut self) -> Result<&mut DynamicRefs, EvalError> {
        if !self.schema.reference_mode().is_dynamic() {
            return Err(EvalError::NoDynamicReferences);
        }
        Ok(&mut self.dynamic)
    }
}
