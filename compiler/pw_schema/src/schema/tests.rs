use pretty_assertions::assert_eq;

use super::*;
use crate::feature::Feature;

fn config(fields: Vec<Entry>) -> ContractConfig {
    ContractConfig::new("scope", "Thing", "THG").with_fields(fields)
}

#[test]
fn layout_is_computed_on_construction() {
    let schema = ContractSchema::new(&config(vec![
        Entry::new(1, "a", "uint128", 1),
        Entry::new(2, "b", "uint16", 4),
    ]))
    .unwrap();

    assert_eq!(schema.slot_count(), 2);
    assert_eq!(schema.fields.len(), 2);
    assert_eq!(schema.storage.field(2).unwrap().slot, 1);
}

#[test]
fn reference_mode_follows_the_reference_field() {
    let none = ContractSchema::new(&config(vec![Entry::new(1, "a", "uint8", 1)])).unwrap();
    assert_eq!(none.reference_mode(), ReferenceMode::None);
    assert!(!none.has_reference_field());

    let fixed = ContractSchema::new(&config(vec![Entry::new(1, "refs", "literef", 8)])).unwrap();
    assert_eq!(
        fixed.reference_mode(),
        ReferenceMode::Fixed {
            field_id: 1,
            capacity: 8
        }
    );
    assert!(fixed.has_reference_field());

    let scalar = ContractSchema::new(&config(vec![Entry::new(4, "r", "literef", 1)])).unwrap();
    assert_eq!(
        scalar.reference_mode(),
        ReferenceMode::Fixed {
            field_id: 4,
            capacity: 1
        }
    );

    let dynamic = ContractSchema::new(&config(vec![Entry::new(2, "refs", "literef", 0)])).unwrap();
    assert_eq!(dynamic.reference_mode(), ReferenceMode::Dynamic { field_id: 2 });
    assert_eq!(dynamic.slot_count(), 0);
}

#[test]
fn literef_capability_is_implied_by_a_reference_field() {
    let schema = ContractSchema::new(&config(vec![Entry::new(1, "refs", "literef", 2)])).unwrap();
    assert!(schema.capabilities().contains(Capabilities::LITEREF));

    let declared = ContractSchema::new(
        &config(vec![Entry::new(1, "a", "uint8", 1)]).with_features(vec![Feature::LiteRef]),
    )
    .unwrap();
    assert!(!declared.has_reference_field());
    assert_eq!(declared.reference_mode(), ReferenceMode::None);
    assert!(declared.validate().is_err());
}

#[test]
fn config_parses_from_json() {
    let json = r#"{
        "scopeName": "test",
        "name": "Character",
        "symbol": "CHAR",
        "baseURI": "https://example.com/",
        "schemaURI": "https://example.com/schema.json",
        "imageURI": "https://example.com/image/{tokenID}.png",
        "features": ["MINTABLE", "LITEREF"],
        "fields": [
            {"id": 1, "key": "name", "fieldType": "char32", "description": "Name"},
            {"id": 2, "key": "attributes", "fieldType": "literef", "arrayLength": 0},
            {"id": 3, "key": "xp", "fieldType": "uint16", "permissionId": 1}
        ]
    }"#;
    let config: ContractConfig = serde_json::from_str(json).unwrap();
    assert_eq!(config.uris.base, "https://example.com/");
    assert_eq!(config.fields[0].array_length, 1);
    assert_eq!(config.fields[1].array_length, 0);
    assert_eq!(config.fields[2].permission_id, Some(1));
    assert_eq!(config.features, vec![Feature::Mintable, Feature::LiteRef]);

    let schema = ContractSchema::compile(&config).unwrap();
    assert!(schema.reference_mode().is_dynamic());
}
