//! Cross-feature and cross-field validation.
//!
//! Rules that concern a single declaration (unknown type, dynamic length on
//! a non-reference type, straddling array elements) are enforced while the
//! layout is planned, since planning depends on them. The rules here look
//! at the contract as a whole.

use rustc_hash::FxHashSet;

use crate::error::SchemaError;
use crate::feature::{Feature, FeatureSet};
use crate::schema::ContractSchema;

impl ContractSchema {
    /// Check feature exclusivity, feature dependencies and field-set
    /// consistency. Reports the first violation found.
    pub fn validate(&self) -> Result<(), SchemaError> {
        let result = validate_features(&self.features, self)
            .and_then(|()| validate_fields(self));
        if let Err(err) = &result {
            tracing::debug!(contract = %self.name, error = %err, "schema rejected");
        }
        result
    }
}

fn validate_features(features: &FeatureSet, schema: &ContractSchema) -> Result<(), SchemaError> {
    exclusive(features, &[Feature::Patch, Feature::Patch1155, Feature::AccountPatch])?;
    exclusive(features, &[Feature::FragmentMulti, Feature::FragmentSingle])?;

    if features.contains(Feature::Reversible) && features.patch_kinds().is_empty() {
        return Err(SchemaError::MissingDependency {
            feature: Feature::Reversible.tag(),
            requires: "a PATCH, 1155PATCH or ACCOUNTPATCH feature",
        });
    }

    if features.contains(Feature::WeakRef) && !features.contains(Feature::FragmentSingle) {
        return Err(SchemaError::MissingDependency {
            feature: Feature::WeakRef.tag(),
            requires: "the FRAGMENTSINGLE feature",
        });
    }

    if features.contains(Feature::LiteRef) && schema.reference_field().is_none() {
        return Err(SchemaError::MissingDependency {
            feature: Feature::LiteRef.tag(),
            requires: "a literef field",
        });
    }

    if features.contains(Feature::DynamicRefLibrary)
        && !schema.storage.dynamic_fields().any(|f| f.field_type.is_reference())
    {
        return Err(SchemaError::MissingDependency {
            feature: Feature::DynamicRefLibrary.tag(),
            requires: "a literef field with arrayLength 0",
        });
    }

    Ok(())
}

/// At most one member of `group` may be declared.
fn exclusive(features: &FeatureSet, group: &[Feature]) -> Result<(), SchemaError> {
    let mut present = features.declared().iter().filter(|f| group.contains(f));
    match (present.next(), present.next()) {
        (Some(first), Some(second)) => Err(SchemaError::MutuallyExclusiveFeatures {
            first: first.tag(),
            second: second.tag(),
        }),
        _ => Ok(()),
    }
}

fn validate_fields(schema: &ContractSchema) -> Result<(), SchemaError> {
    let mut ids = FxHashSet::default();
    let mut keys = FxHashSet::default();
    let mut reference: Option<&str> = None;

    for field in schema.storage.fields() {
        if !ids.insert(field.id()) {
            return Err(SchemaError::DuplicateField {
                what: "id",
                value: field.id().to_string(),
            });
        }
        if !keys.insert(field.key()) {
            return Err(SchemaError::DuplicateField {
                what: "key",
                value: field.key().to_string(),
            });
        }

        if let Some(permission_id) = field.entry.permission_id {
            if !(1..=256).contains(&permission_id) {
                return Err(SchemaError::InvalidPermissionId {
                    key: field.key().to_string(),
                    permission_id,
                });
            }
        }

        if field.field_type.is_reference() {
            if let Some(first) = reference {
                return Err(SchemaError::MultipleReferenceFields {
                    first: first.to_string(),
                    second: field.key().to_string(),
                });
            }
            reference = Some(field.key());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests;
