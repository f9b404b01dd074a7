//! The `Metadata` record and its pack/unpack pair.

use pw_schema::StorageField;

use super::types::{decode, encode, member_type, shifted};
use crate::context::CodegenContext;

/// Most OR-terms in a single assignment; keeps expressions within the
/// compiler's stack limits.
pub const MAX_TERMS_PER_STATEMENT: usize = 8;

/// `struct Metadata`, packed fields in declaration order.
pub fn emit_metadata_struct(ctx: &mut CodegenContext<'_>) {
    let schema = ctx.schema;
    ctx.open("struct Metadata {");
    for field in schema.storage.fixed_fields() {
        ctx.writeln(&format!("{} {};", member_type(field), field.key()));
    }
    ctx.close();
    ctx.newline();
}

/// `packMetadata` and `unpackMetadata`.
pub fn emit_pack_unpack(ctx: &mut CodegenContext<'_>) {
    emit_pack(ctx);
    emit_unpack(ctx);
}

/// Value expression of element `element` of `field` inside `data`.
fn member(field: &StorageField, element: u32) -> String {
    if field.is_array() {
        format!("data.{}[{element}]", field.key())
    } else {
        format!("data.{}", field.key())
    }
}

fn emit_pack(ctx: &mut CodegenContext<'_>) {
    let schema = ctx.schema;
    let layout = &schema.storage;
    let slot_count = layout.slot_count();

    ctx.open("function packMetadata(Metadata memory data) public pure returns (uint256[] memory slots) {");
    ctx.writeln(&format!("slots = new uint256[]({slot_count});"));

    for (index, slot) in layout.slots().iter().enumerate() {
        let mut terms = Vec::new();
        for field in slot.field_ids.iter().filter_map(|&id| layout.field(id)) {
            for chunk in field.chunks() {
                if chunk.slot as usize != index {
                    continue;
                }
                let encoded = encode(ctx, field.field_type, &member(field, chunk.element));
                let Some(raw) = encoded.into_iter().nth(chunk.part as usize) else {
                    continue;
                };
                terms.push(if chunk.offset == 0 {
                    raw
                } else {
                    format!("{raw} << {}", chunk.offset)
                });
            }
        }

        for (batch, group) in terms.chunks(MAX_TERMS_PER_STATEMENT).enumerate() {
            let op = if batch == 0 { "=" } else { "|=" };
            ctx.writeln(&format!("slots[{index}] {op} {};", group.join(" | ")));
        }
    }

    ctx.writeln("return slots;");
    ctx.close();
    ctx.newline();
}

fn emit_unpack(ctx: &mut CodegenContext<'_>) {
    let schema = ctx.schema;

    ctx.open("function unpackMetadata(uint256[] memory slots) public pure returns (Metadata memory data) {");
    ctx.open(&format!("if (slots.length != {}) {{", schema.slot_count()));
    ctx.writeln("revert BadInputLengths();");
    ctx.close();

    for field in schema.storage.fixed_fields() {
        let chunks = field.chunks();
        for element in 0..field.element_count() {
            let raw: Vec<String> = chunks
                .iter()
                .filter(|c| c.element == element)
                .map(|c| shifted(&format!("slots[{}]", c.slot), c.offset))
                .collect();
            ctx.writeln(&format!(
                "{} = {};",
                member(field, element),
                decode(field.field_type, &raw)
            ));
        }
    }

    ctx.writeln("return data;");
    ctx.close();
    ctx.newline();
}
