//! JSON mirror of the schema, with the planned placement of every field.

use pw_schema::{ContractSchema, StorageField};
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SchemaMirror<'a> {
    scope_name: &'a str,
    name: &'a str,
    symbol: &'a str,
    #[serde(rename = "schemaURI")]
    schema_uri: &'a str,
    #[serde(rename = "imageURI")]
    image_uri: &'a str,
    fields: Vec<FieldMirror<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FieldMirror<'a> {
    id: u32,
    key: &'a str,
    #[serde(rename = "type")]
    field_type: &'static str,
    array_length: u32,
    description: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    permission_id: Option<u32>,
    slot: u32,
    offset: u32,
}

impl<'a> FieldMirror<'a> {
    fn new(field: &'a StorageField) -> Self {
        // dynamic fields are outside the packed words
        let (slot, offset) = if field.is_dynamic() {
            (0, 0)
        } else {
            (field.slot, field.offset)
        };
        Self {
            id: field.id(),
            key: field.key(),
            field_type: field.field_type.name(),
            array_length: field.entry.array_length,
            description: &field.entry.description,
            permission_id: field.entry.permission_id,
            slot,
            offset,
        }
    }
}

/// Render the mirror document, fields in declaration order.
pub fn emit_schema_json(schema: &ContractSchema) -> Result<String, serde_json::Error> {
    let mirror = SchemaMirror {
        scope_name: &schema.scope_name,
        name: &schema.name,
        symbol: &schema.symbol,
        schema_uri: &schema.uris.schema,
        image_uri: &schema.uris.image,
        fields: schema.storage.fields().iter().map(FieldMirror::new).collect(),
    };
    let mut out = serde_json::to_string_pretty(&mirror)?;
    out.push('\n');
    Ok(out)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
