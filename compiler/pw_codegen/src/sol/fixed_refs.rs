//! Fixed-capacity reference store routines.
//!
//! References occupy the reference field's 64-bit sub-slots, zero meaning
//! empty. An array field starts at offset 0, so element `i` lives in word
//! `slot + i / 4` at shift `(i % 4) * 64`. A scalar field has one sub-slot
//! at its own offset.

use pw_schema::StorageField;

use super::accessors::{emit_reference_guard, emit_write_guard};
use crate::context::CodegenContext;

const SUB_SLOT_MASK: &str = "uint256(type(uint64).max)";

pub fn emit_fixed_refs(ctx: &mut CodegenContext<'_>, field: &StorageField) {
    ctx.banner("References");
    if field.is_array() {
        emit_array_store(ctx, field);
    } else {
        emit_scalar_store(ctx, field);
    }
}

fn emit_scalar_store(ctx: &mut CodegenContext<'_>, field: &StorageField) {
    let word = format!("_metadataStorage[tokenId][{}]", field.slot);
    let offset = field.offset;
    let at = |value: &str| {
        if offset == 0 {
            value.to_string()
        } else {
            format!("{value} << {offset}")
        }
    };
    let current = if offset == 0 {
        "uint64(slot)".to_string()
    } else {
        format!("uint64(slot >> {offset})")
    };

    ctx.open("function addReference(uint256 tokenId, uint64 liteRef) public {");
    emit_write_guard(ctx, None);
    emit_reference_guard(ctx, "liteRef");
    ctx.writeln(&format!("uint256 slot = {word};"));
    ctx.open(&format!("if ({current} != 0) {{"));
    ctx.writeln("revert NoReferenceSlotsAvailable();");
    ctx.close();
    ctx.writeln(&format!("{word} = slot | ({});", at("uint256(liteRef)")));
    ctx.close();
    ctx.newline();

    ctx.open("function addReferenceBatch(uint256 tokenId, uint64[] calldata liteRefs) public {");
    emit_write_guard(ctx, None);
    ctx.writeln(&format!("uint256 slot = {word};"));
    ctx.open(&format!("if ({current} != 0) {{"));
    ctx.writeln("revert AlreadyHaveReferences();");
    ctx.close();
    ctx.open("if (liteRefs.length > 1) {");
    ctx.writeln("revert TooManyReferences();");
    ctx.close();
    ctx.open("if (liteRefs.length == 1) {");
    emit_reference_guard(ctx, "liteRefs[0]");
    ctx.writeln(&format!("{word} = slot | ({});", at("uint256(liteRefs[0])")));
    ctx.close();
    ctx.close();
    ctx.newline();

    ctx.open("function removeReference(uint256 tokenId, uint64 liteRef) public {");
    emit_write_guard(ctx, None);
    emit_reference_guard(ctx, "liteRef");
    ctx.writeln(&format!("uint256 slot = {word};"));
    ctx.open(&format!("if ({current} != liteRef) {{"));
    ctx.writeln("revert NoReference();");
    ctx.close();
    ctx.writeln(&format!("{word} = slot & ~({});", at(SUB_SLOT_MASK)));
    ctx.close();
    ctx.newline();

    ctx.open("function loadReferenceAt(uint256 tokenId, uint256 idx) public view returns (uint64) {");
    ctx.open("if (idx >= 1) {");
    ctx.writeln("revert NoReference();");
    ctx.close();
    let load = if offset == 0 {
        format!("uint64({word})")
    } else {
        format!("uint64({word} >> {offset})")
    };
    ctx.writeln(&format!("return {load};"));
    ctx.close();
    ctx.newline();
}

/// Word and shift of sub-slot `i` inside the loop bodies below.
fn emit_position(ctx: &mut CodegenContext<'_>, slot: u32, index: &str) {
    ctx.writeln(&format!("uint256 slotNumber = {slot} + {index} / 4;"));
    ctx.writeln(&format!("uint256 shift = ({index} % 4) * 64;"));
}

fn emit_array_store(ctx: &mut CodegenContext<'_>, field: &StorageField) {
    let slot = field.slot;
    let capacity = field.element_count();

    ctx.open("function addReference(uint256 tokenId, uint64 liteRef) public {");
    emit_write_guard(ctx, None);
    emit_reference_guard(ctx, "liteRef");
    ctx.writeln("uint256[] storage slots = _metadataStorage[tokenId];");
    ctx.open(&format!("for (uint256 i = 0; i < {capacity}; i++) {{"));
    emit_position(ctx, slot, "i");
    ctx.open("if (uint64(slots[slotNumber] >> shift) == 0) {");
    ctx.writeln("slots[slotNumber] = slots[slotNumber] | (uint256(liteRef) << shift);");
    ctx.writeln("return;");
    ctx.close();
    ctx.close();
    ctx.writeln("revert NoReferenceSlotsAvailable();");
    ctx.close();
    ctx.newline();

    ctx.open("function addReferenceBatch(uint256 tokenId, uint64[] calldata liteRefs) public {");
    emit_write_guard(ctx, None);
    ctx.writeln("uint256[] storage slots = _metadataStorage[tokenId];");
    ctx.open(&format!("for (uint256 i = 0; i < {capacity}; i++) {{"));
    ctx.open(&format!(
        "if (uint64(slots[{slot} + i / 4] >> ((i % 4) * 64)) != 0) {{"
    ));
    ctx.writeln("revert AlreadyHaveReferences();");
    ctx.close();
    ctx.close();
    ctx.open(&format!("if (liteRefs.length > {capacity}) {{"));
    ctx.writeln("revert TooManyReferences();");
    ctx.close();
    ctx.open("for (uint256 i = 0; i < liteRefs.length; i++) {");
    emit_reference_guard(ctx, "liteRefs[i]");
    emit_position(ctx, slot, "i");
    ctx.writeln("slots[slotNumber] = slots[slotNumber] | (uint256(liteRefs[i]) << shift);");
    ctx.close();
    ctx.close();
    ctx.newline();

    ctx.open("function removeReference(uint256 tokenId, uint64 liteRef) public {");
    emit_write_guard(ctx, None);
    emit_reference_guard(ctx, "liteRef");
    ctx.writeln("uint256[] storage slots = _metadataStorage[tokenId];");
    ctx.open(&format!("for (uint256 i = 0; i < {capacity}; i++) {{"));
    emit_position(ctx, slot, "i");
    ctx.open("if (uint64(slots[slotNumber] >> shift) == liteRef) {");
    ctx.writeln(&format!(
        "slots[slotNumber] = slots[slotNumber] & ~({SUB_SLOT_MASK} << shift);"
    ));
    ctx.writeln("return;");
    ctx.close();
    ctx.close();
    ctx.writeln("revert NoReference();");
    ctx.close();
    ctx.newline();

    ctx.open("function loadReferenceAt(uint256 tokenId, uint256 idx) public view returns (uint64) {");
    ctx.open(&format!("if (idx >= {capacity}) {{"));
    ctx.writeln("revert NoReference();");
    ctx.close();
    ctx.writeln(&format!(
        "return uint64(_metadataStorage[tokenId][{slot} + idx / 4] >> ((idx % 4) * 64));"
    ));
    ctx.close();
    ctx.newline();
}
