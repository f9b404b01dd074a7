use pretty_assertions::assert_eq;

use crate::config::ContractConfig;
use crate::entry::Entry;
use crate::error::SchemaError;
use crate::feature::Feature;
use crate::schema::ContractSchema;

fn build(fields: Vec<Entry>, features: Vec<Feature>) -> Result<ContractSchema, SchemaError> {
    ContractSchema::compile(
        &ContractConfig::new("test", "Thing", "THG")
            .with_fields(fields)
            .with_features(features),
    )
}

fn features(features: Vec<Feature>) -> Result<ContractSchema, SchemaError> {
    build(vec![Entry::new(1, "level", "uint8", 1)], features)
}

#[test]
fn plain_contract_is_valid() {
    assert!(features(vec![]).is_ok());
    assert!(features(vec![Feature::Mintable]).is_ok());
}

#[test]
fn patch_kinds_are_exclusive() {
    assert_eq!(
        features(vec![Feature::Patch, Feature::AccountPatch]).err(),
        Some(SchemaError::MutuallyExclusiveFeatures {
            first: "PATCH",
            second: "ACCOUNTPATCH",
        })
    );
    assert!(features(vec![Feature::Patch1155, Feature::Patch]).is_err());
}

#[test]
fn fragment_kinds_are_exclusive() {
    assert_eq!(
        features(vec![Feature::FragmentSingle, Feature::FragmentMulti]).err(),
        Some(SchemaError::MutuallyExclusiveFeatures {
            first: "FRAGMENTSINGLE",
            second: "FRAGMENTMULTI",
        })
    );
}

#[test]
fn a_patch_may_also_be_a_fragment() {
    assert!(features(vec![Feature::Patch, Feature::FragmentMulti]).is_ok());
}

#[test]
fn reversible_requires_a_patch() {
    assert!(matches!(
        features(vec![Feature::Reversible]),
        Err(SchemaError::MissingDependency {
            feature: "REVERSIBLE",
            ..
        })
    ));
    assert!(features(vec![Feature::Reversible, Feature::Patch1155]).is_ok());
}

#[test]
fn weakref_requires_single_fragment() {
    assert!(matches!(
        features(vec![Feature::WeakRef, Feature::FragmentMulti]),
        Err(SchemaError::MissingDependency {
            feature: "WEAKREF",
            ..
        })
    ));
    assert!(features(vec![Feature::WeakRef, Feature::FragmentSingle]).is_ok());
}

#[test]
fn dynamic_ref_library_requires_a_dynamic_reference() {
    assert!(matches!(
        features(vec![Feature::DynamicRefLibrary]),
        Err(SchemaError::MissingDependency {
            feature: "DYNAMICREFLIBRARY",
            ..
        })
    ));

    let fixed = build(
        vec![Entry::new(1, "refs", "literef", 4)],
        vec![Feature::DynamicRefLibrary],
    );
    assert!(fixed.is_err());

    let dynamic = build(
        vec![Entry::new(1, "refs", "literef", 0)],
        vec![Feature::DynamicRefLibrary],
    );
    assert!(dynamic.is_ok());
}

#[test]
fn only_one_reference_field() {
    let result = build(
        vec![
            Entry::new(1, "a", "literef", 1),
            Entry::new(2, "b", "literef", 0),
        ],
        vec![],
    );
    assert_eq!(
        result.err(),
        Some(SchemaError::MultipleReferenceFields {
            first: "a".to_string(),
            second: "b".to_string(),
        })
    );
}

#[test]
fn duplicate_ids_and_keys_are_rejected() {
    let ids = build(
        vec![Entry::new(1, "a", "uint8", 1), Entry::new(1, "b", "uint8", 1)],
        vec![],
    );
    assert!(matches!(ids, Err(SchemaError::DuplicateField { what: "id", .. })));

    let keys = build(
        vec![Entry::new(1, "a", "uint8", 1), Entry::new(2, "a", "uint8", 1)],
        vec![],
    );
    assert!(matches!(keys, Err(SchemaError::DuplicateField { what: "key", .. })));
}

#[test]
fn permission_ids_name_a_bit() {
    let zero = build(vec![Entry::new(1, "a", "uint8", 1).with_permission(0)], vec![]);
    assert!(matches!(zero, Err(SchemaError::InvalidPermissionId { permission_id: 0, .. })));

    let high = build(vec![Entry::new(1, "a", "uint8", 1).with_permission(257)], vec![]);
    assert!(high.is_err());

    let ok = build(vec![Entry::new(1, "a", "uint8", 1).with_permission(256)], vec![]);
    assert!(ok.is_ok());
}

#[test]
fn literef_feature_requires_a_reference_field() {
    assert_eq!(
        features(vec![Feature::LiteRef]).err(),
        Some(SchemaError::MissingDependency {
            feature: "LITEREF",
            requires: "a literef field",
        })
    );
    assert!(build(vec![Entry::new(1, "refs", "literef", 2)], vec![Feature::LiteRef]).is_ok());
}
