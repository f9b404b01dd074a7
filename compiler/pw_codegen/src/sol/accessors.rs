//! Per-field load/store accessors.
//!
//! Every packed field gets `load<Key>(tokenId)` and
//! `store<Key>(tokenId, value)`. Dynamic fields have no accessor; the
//! reference store routines cover them.

use pw_schema::{StorageField, WORD_BITS};

use super::types::{accessor_suffix, decode, encode, mask_literal, param_type, shifted};
use crate::context::CodegenContext;

const STORAGE: &str = "_metadataStorage[tokenId]";

/// Emit accessors for every packed field, in declaration order.
pub fn emit_accessors(ctx: &mut CodegenContext<'_>) {
    let schema = ctx.schema;
    for field in schema.storage.fixed_fields() {
        emit_load(ctx, field);
        emit_store(ctx, field);
    }
}

/// Authorization guard for a store of `field`.
///
/// A permission id lets holders of that bit write the field without
/// general write access to the token.
pub fn emit_write_guard(ctx: &mut CodegenContext<'_>, permission_id: Option<u32>) {
    match permission_id {
        Some(id) => ctx.open(&format!(
            "if (!_checkTokenWriteAuth(tokenId) && (_permissionsAllow[msg.sender] & (1 << {})) == 0) {{",
            id.saturating_sub(1)
        )),
        None => ctx.open("if (!_checkTokenWriteAuth(tokenId)) {"),
    }
    ctx.writeln("revert NotAuthorized(msg.sender);");
    ctx.close();
}

/// Zero marks an empty reference sub-slot, so it is never a reference.
pub fn emit_reference_guard(ctx: &mut CodegenContext<'_>, reference: &str) {
    ctx.open(&format!("if ({reference} == 0) {{"));
    ctx.writeln("revert NoReference();");
    ctx.close();
}

fn emit_load(ctx: &mut CodegenContext<'_>, field: &StorageField) {
    let suffix = accessor_suffix(field.key());
    ctx.writeln(&format!("// Load only {}", field.key()));
    ctx.open(&format!(
        "function load{suffix}(uint256 tokenId) public view returns ({}) {{",
        param_type(field)
    ));

    if field.is_array() {
        emit_array_load(ctx, field);
    } else {
        let raw: Vec<String> = field
            .chunks()
            .iter()
            .map(|c| shifted(&format!("{STORAGE}[{}]", c.slot), c.offset))
            .collect();
        ctx.writeln(&format!("return {};", decode(field.field_type, &raw)));
    }

    ctx.close();
    ctx.newline();
}

fn emit_array_load(ctx: &mut CodegenContext<'_>, field: &StorageField) {
    let count = field.element_count();
    let element = param_type(field);
    let ty = field.field_type;

    ctx.writeln(&format!("uint256[] storage slots = {STORAGE};"));
    ctx.writeln(&format!("{element} result;"));

    if field.element_bits >= WORD_BITS {
        let parts = field.element_bits / WORD_BITS;
        ctx.open(&format!("for (uint256 i = 0; i < {count}; i++) {{"));
        let raw: Vec<String> = (0..parts)
            .map(|p| word_at(field.slot, parts, p))
            .collect();
        ctx.writeln(&format!("result[i] = {};", decode(ty, &raw)));
        ctx.close();
    } else {
        ctx.writeln(&format!("uint256 slotNumber = {};", field.slot));
        ctx.writeln("uint256 shift = 0;");
        ctx.open(&format!("for (uint256 i = 0; i < {count}; i++) {{"));
        ctx.writeln(&format!(
            "result[i] = {};",
            decode(ty, &["slots[slotNumber] >> shift".to_string()])
        ));
        ctx.writeln(&format!("shift += {};", field.element_bits));
        ctx.open("if (shift == 256) {");
        ctx.writeln("shift = 0;");
        ctx.writeln("slotNumber++;");
        ctx.close();
        ctx.close();
    }
    ctx.writeln("return result;");
}

/// `slots[S + i]`, `slots[S + 2 * i + 1]`, ... for word-sized elements.
fn word_at(slot: u32, parts: u32, part: u32) -> String {
    let index = if parts == 1 { "i".to_string() } else { format!("{parts} * i") };
    match part {
        0 => format!("slots[{slot} + {index}]"),
        p => format!("slots[{slot} + {index} + {p}]"),
    }
}

fn emit_store(ctx: &mut CodegenContext<'_>, field: &StorageField) {
    let key = field.key();
    let suffix = accessor_suffix(key);
    ctx.writeln(&format!("// Store only {key}"));
    ctx.open(&format!(
        "function store{suffix}(uint256 tokenId, {} {key}) public {{",
        param_type(field)
    ));
    emit_write_guard(ctx, field.entry.permission_id);

    if field.is_array() {
        emit_array_store(ctx, field);
    } else if field.element_bits >= WORD_BITS {
        let encoded = encode(ctx, field.field_type, key);
        for (chunk, value) in field.chunks().iter().zip(encoded) {
            ctx.writeln(&format!("{STORAGE}[{}] = {value};", chunk.slot));
        }
    } else {
        let encoded = encode(ctx, field.field_type, key).join("");
        let word = format!("{STORAGE}[{}]", field.slot);
        ctx.writeln(&format!("uint256 mask = {};", mask_literal(field.element_bits)));
        if field.offset == 0 {
            ctx.writeln(&format!("uint256 cleared = {word} & ~mask;"));
            ctx.writeln(&format!("{word} = cleared | ({encoded} & mask);"));
        } else {
            let offset = field.offset;
            ctx.writeln(&format!("uint256 cleared = {word} & ~(mask << {offset});"));
            ctx.writeln(&format!("{word} = cleared | (({encoded} & mask) << {offset});"));
        }
    }

    ctx.close();
    ctx.newline();
}

fn emit_array_store(ctx: &mut CodegenContext<'_>, field: &StorageField) {
    let key = field.key();
    let count = field.element_count();
    let ty = field.field_type;

    ctx.writeln(&format!("uint256[] storage slots = {STORAGE};"));

    if field.element_bits >= WORD_BITS {
        let parts = field.element_bits / WORD_BITS;
        ctx.open(&format!("for (uint256 i = 0; i < {count}; i++) {{"));
        let encoded = encode(ctx, ty, &format!("{key}[i]"));
        for (p, value) in (0..parts).zip(encoded) {
            ctx.writeln(&format!("{} = {value};", word_at(field.slot, parts, p)));
        }
        ctx.close();
        return;
    }

    let element = encode(ctx, ty, &format!("{key}[i]")).join("");
    ctx.writeln(&format!("uint256 slotNumber = {};", field.slot));
    ctx.writeln("uint256 shift = 0;");
    ctx.writeln("uint256 word = 0;");
    ctx.open(&format!("for (uint256 i = 0; i < {count}; i++) {{"));
    ctx.writeln(&format!(
        "word |= ({element} & ({})) << shift;",
        mask_literal(field.element_bits)
    ));
    ctx.writeln(&format!("shift += {};", field.element_bits));
    ctx.open("if (shift == 256) {");
    ctx.writeln("slots[slotNumber] = word;");
    ctx.writeln("word = 0;");
    ctx.writeln("shift = 0;");
    ctx.writeln("slotNumber++;");
    ctx.close();
    ctx.close();

    if field.total_bits % WORD_BITS != 0 {
        // neighbours above the last element keep their bits
        ctx.writeln("uint256 keep = ~((uint256(1) << shift) - 1);");
        ctx.writeln("slots[slotNumber] = (slots[slotNumber] & keep) | word;");
    }
}
