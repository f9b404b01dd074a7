use pretty_assertions::assert_eq;
use pw_schema::{ContractConfig, ContractSchema, Entry, Uris};
use serde_json::{json, Value};

use super::*;

fn config() -> ContractConfig {
    ContractConfig::new("scope", "Map", "MAP")
        .with_uris(Uris {
            base: "b/".to_string(),
            schema: "s.json".to_string(),
            image: "i/".to_string(),
        })
        .with_fields(vec![
            Entry::new(0, "x", "uint128", 1).with_description("horizontal"),
            Entry::new(1, "tiles", "uint16", 4).with_permission(1),
            Entry::new(2, "visitors", "literef", 0),
        ])
}

#[test]
fn mirror_lists_fields_in_declaration_order() {
    let schema = ContractSchema::compile(&config()).unwrap();
    let mirror: Value = serde_json::from_str(&emit_schema_json(&schema).unwrap()).unwrap();

    assert_eq!(mirror["scopeName"], json!("scope"));
    assert_eq!(mirror["schemaURI"], json!("s.json"));
    assert_eq!(mirror["imageURI"], json!("i/"));
    assert_eq!(
        mirror["fields"],
        json!([
            {"id": 0, "key": "x", "type": "uint128", "arrayLength": 1,
             "description": "horizontal", "slot": 0, "offset": 0},
            {"id": 1, "key": "tiles", "type": "uint16", "arrayLength": 4,
             "description": "", "permissionId": 1, "slot": 1, "offset": 0},
            {"id": 2, "key": "visitors", "type": "literef", "arrayLength": 0,
             "description": "", "slot": 0, "offset": 0},
        ])
    );
}

#[test]
fn mirror_reloads_as_configuration() {
    let original = config();
    let schema = ContractSchema::compile(&original).unwrap();
    let reloaded: ContractConfig = serde_json::from_str(&emit_schema_json(&schema).unwrap()).unwrap();
    assert_eq!(reloaded.fields, original.fields);
    assert_eq!(reloaded.uris.schema, original.uris.schema);
    assert_eq!(
        ContractSchema::compile(&reloaded).unwrap().storage,
        schema.storage
    );
}
