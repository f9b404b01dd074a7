//! The compiled contract schema.

use crate::config::{ContractConfig, Uris};
use crate::entry::Entry;
use crate::error::SchemaError;
use crate::feature::{Capabilities, FeatureSet, ReferenceMode};
use crate::layout::{StorageField, StorageLayout};

/// A contract description with its storage layout computed.
///
/// Built once; the layout is a pure function of the declared fields and
/// nothing mutates the schema afterwards. Code generators and the storage
/// model only read it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContractSchema {
    pub scope_name: String,
    pub name: String,
    pub symbol: String,
    pub uris: Uris,
    pub fields: Vec<Entry>,
    pub features: FeatureSet,
    pub storage: StorageLayout,
}

impl ContractSchema {
    /// Resolve field types and plan the layout.
    ///
    /// Cross-feature rules are checked separately by [`Self::validate`].
    pub fn new(config: &ContractConfig) -> Result<Self, SchemaError> {
        let storage = StorageLayout::plan(&config.fields)?;
        Ok(Self {
            scope_name: config.scope_name.clone(),
            name: config.name.clone(),
            symbol: config.symbol.clone(),
            uris: config.uris.clone(),
            fields: config.fields.clone(),
            features: FeatureSet::new(&config.features),
            storage,
        })
    }

    /// Build and validate in one step.
    pub fn compile(config: &ContractConfig) -> Result<Self, SchemaError> {
        let schema = Self::new(config)?;
        schema.validate()?;
        Ok(schema)
    }

    /// The reference field, if any. Validation guarantees there is at most
    /// one.
    pub fn reference_field(&self) -> Option<&StorageField> {
        self.storage
            .fields()
            .iter()
            .find(|f| f.field_type.is_reference())
    }

    pub fn has_reference_field(&self) -> bool {
        self.reference_field().is_some()
    }

    /// Which reference store the generated code uses.
    pub fn reference_mode(&self) -> ReferenceMode {
        match self.reference_field() {
            None => ReferenceMode::None,
            Some(field) if field.is_dynamic() => ReferenceMode::Dynamic {
                field_id: field.id(),
            },
            Some(field) => ReferenceMode::Fixed {
                field_id: field.id(),
                capacity: field.element_count(),
            },
        }
    }

    /// Capabilities with `LITEREF` implied by a reference field.
    pub fn capabilities(&self) -> Capabilities {
        let mut caps = self.features.capabilities();
        if self.reference_field().is_some() {
            caps |= Capabilities::LITEREF;
        }
        caps
    }

    /// Number of packed words per entity.
    #[inline]
    pub fn slot_count(&self) -> usize {
        self.storage.slot_count()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
