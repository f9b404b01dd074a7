//! Growable reference store routines.
//!
//! Per token: a `uint256[]` of words holding four 64-bit references each,
//! filled from the low sub-slot up, and an index from reference to
//! `wordIndex + 1` (zero means absent). The routine bodies are written once
//! against two local storage pointers, `slots` and `liteRefIndex`; the
//! [`Binding`] decides where those point and whether the bodies live in
//! the contract or in a separate library.

use super::accessors::{emit_reference_guard, emit_write_guard};
use crate::context::CodegenContext;

const COUNT_FN: &str = "_countLiteRefs";

/// Where the growable store's routines live.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Binding {
    /// Routines inline in the contract over two per-token mappings.
    Inline,
    /// Routines in `library <name>` over a `DynamicLiteRefs` struct.
    Library { name: String },
}

impl Binding {
    pub fn for_contract(ctx: &CodegenContext<'_>, library: bool) -> Self {
        if library {
            Binding::Library {
                name: format!("{}DynamicRefs", ctx.contract_name()),
            }
        } else {
            Binding::Inline
        }
    }

    /// Contract member declarations for the store.
    pub fn emit_members(&self, ctx: &mut CodegenContext<'_>) {
        match self {
            Binding::Inline => {
                ctx.writeln("mapping(uint256 => uint256[]) internal _dynamicLiterefStorage;");
                ctx.writeln(
                    "mapping(uint256 => mapping(uint64 => uint256)) internal _dynamicLiterefIndex;",
                );
            }
            Binding::Library { name } => {
                ctx.writeln(&format!(
                    "mapping(uint256 => {name}.DynamicLiteRefs) internal _dynamicLiterefStorage;"
                ));
            }
        }
    }

    fn emit_slots_pointer(&self, ctx: &mut CodegenContext<'_>) {
        match self {
            Binding::Inline => {
                ctx.writeln("uint256[] storage slots = _dynamicLiterefStorage[tokenId];");
            }
            Binding::Library { .. } => ctx.writeln("uint256[] storage slots = refs.slots;"),
        }
    }

    fn emit_index_pointer(&self, ctx: &mut CodegenContext<'_>) {
        match self {
            Binding::Inline => ctx.writeln(
                "mapping(uint64 => uint256) storage liteRefIndex = _dynamicLiterefIndex[tokenId];",
            ),
            Binding::Library { .. } => {
                ctx.writeln("mapping(uint64 => uint256) storage liteRefIndex = refs.idx;");
            }
        }
    }
}

/// The growable store's library document section (library mode only).
pub fn emit_library(ctx: &mut CodegenContext<'_>, binding: &Binding) {
    let Binding::Library { name } = binding else {
        return;
    };
    ctx.open(&format!("library {name} {{"));
    ctx.open("struct DynamicLiteRefs {");
    ctx.writeln("uint256[] slots;");
    ctx.writeln("mapping(uint64 => uint256) idx;");
    ctx.close();
    ctx.newline();
    // library routines report the same identifiers as the contract
    for error in ["NoReference", "AlreadyHaveReferences", "StorageIntegrityError"] {
        ctx.writeln(&format!("error {error}();"));
    }
    ctx.newline();

    ctx.open("function add(DynamicLiteRefs storage refs, uint64 liteRef) internal {");
    emit_add_body(ctx, binding);
    ctx.close();
    ctx.newline();

    ctx.open("function addBatch(DynamicLiteRefs storage refs, uint64[] memory liteRefs) internal {");
    emit_add_batch_body(ctx, binding);
    ctx.close();
    ctx.newline();

    ctx.open("function remove(DynamicLiteRefs storage refs, uint64 liteRef) internal {");
    emit_remove_body(ctx, binding);
    ctx.close();
    ctx.newline();

    ctx.open("function count(DynamicLiteRefs storage refs) internal view returns (uint256) {");
    ctx.writeln(&format!("return {COUNT_FN}(refs.slots);"));
    ctx.close();
    ctx.newline();

    ctx.open("function loadAt(DynamicLiteRefs storage refs, uint256 position) internal view returns (uint64) {");
    emit_load_at_body(ctx, binding);
    ctx.close();
    ctx.newline();

    ctx.open("function loadPage(DynamicLiteRefs storage refs, uint256 offset, uint256 limit) internal view returns (uint64[] memory result) {");
    emit_load_page_body(ctx, binding);
    ctx.close();
    ctx.newline();

    emit_count_fn(ctx, "private");
    ctx.close();
    ctx.newline();
}

/// Public reference routines of the contract.
pub fn emit_dynamic_refs(ctx: &mut CodegenContext<'_>, binding: &Binding) {
    ctx.banner("References");
    let library = match binding {
        Binding::Library { name } => Some(name.clone()),
        Binding::Inline => None,
    };
    let target = "_dynamicLiterefStorage[tokenId]";

    ctx.open("function addReference(uint256 tokenId, uint64 liteRef) public {");
    emit_write_guard(ctx, None);
    match &library {
        Some(lib) => ctx.writeln(&format!("{lib}.add({target}, liteRef);")),
        None => emit_add_body(ctx, binding),
    }
    ctx.close();
    ctx.newline();

    ctx.open("function addReferenceBatch(uint256 tokenId, uint64[] calldata liteRefs) public {");
    emit_write_guard(ctx, None);
    match &library {
        Some(lib) => ctx.writeln(&format!("{lib}.addBatch({target}, liteRefs);")),
        None => emit_add_batch_body(ctx, binding),
    }
    ctx.close();
    ctx.newline();

    ctx.open("function removeReference(uint256 tokenId, uint64 liteRef) public {");
    emit_write_guard(ctx, None);
    match &library {
        Some(lib) => ctx.writeln(&format!("{lib}.remove({target}, liteRef);")),
        None => emit_remove_body(ctx, binding),
    }
    ctx.close();
    ctx.newline();

    ctx.open("function getDynamicReferenceCount(uint256 tokenId) public view returns (uint256) {");
    match &library {
        Some(lib) => ctx.writeln(&format!("return {lib}.count({target});")),
        None => ctx.writeln(&format!("return {COUNT_FN}({target});")),
    }
    ctx.close();
    ctx.newline();

    ctx.open("function loadReferenceAt(uint256 tokenId, uint256 position) public view returns (uint64) {");
    match &library {
        Some(lib) => ctx.writeln(&format!("return {lib}.loadAt({target}, position);")),
        None => emit_load_at_body(ctx, binding),
    }
    ctx.close();
    ctx.newline();

    ctx.open("function loadDynamicReferencePage(uint256 tokenId, uint256 offset, uint256 limit) public view returns (uint64[] memory result) {");
    match &library {
        Some(lib) => ctx.writeln(&format!("return {lib}.loadPage({target}, offset, limit);")),
        None => emit_load_page_body(ctx, binding),
    }
    ctx.close();
    ctx.newline();

    if library.is_none() {
        emit_count_fn(ctx, "internal");
    }
}

fn emit_count_fn(ctx: &mut CodegenContext<'_>, visibility: &str) {
    ctx.open(&format!(
        "function {COUNT_FN}(uint256[] storage slots) {visibility} view returns (uint256) {{"
    ));
    ctx.writeln("uint256 len = slots.length;");
    ctx.open("if (len == 0) {");
    ctx.writeln("return 0;");
    ctx.close();
    ctx.writeln("uint256 last = slots[len - 1];");
    ctx.writeln("uint256 filled = 0;");
    ctx.open("if (uint64(last >> 192) != 0) {");
    ctx.writeln("filled = 4;");
    ctx.dedent();
    ctx.open("} else if (uint64(last >> 128) != 0) {");
    ctx.writeln("filled = 3;");
    ctx.dedent();
    ctx.open("} else if (uint64(last >> 64) != 0) {");
    ctx.writeln("filled = 2;");
    ctx.dedent();
    ctx.open("} else if (uint64(last) != 0) {");
    ctx.writeln("filled = 1;");
    ctx.close();
    ctx.writeln("return (len - 1) * 4 + filled;");
    ctx.close();
    ctx.newline();
}

fn emit_add_body(ctx: &mut CodegenContext<'_>, binding: &Binding) {
    emit_reference_guard(ctx, "liteRef");
    binding.emit_slots_pointer(ctx);
    binding.emit_index_pointer(ctx);
    ctx.writeln("uint256 len = slots.length;");
    ctx.open("if (len == 0 || uint64(slots[len - 1] >> 192) != 0) {");
    ctx.writeln("slots.push(uint256(liteRef));");
    ctx.writeln("liteRefIndex[liteRef] = len + 1;");
    ctx.dedent();
    ctx.open("} else {");
    ctx.writeln("uint256 wordIdx = len - 1;");
    ctx.writeln("uint256 last = slots[wordIdx];");
    ctx.open("if (uint64(last >> 128) != 0) {");
    ctx.writeln("slots[wordIdx] = last | (uint256(liteRef) << 192);");
    ctx.dedent();
    ctx.open("} else if (uint64(last >> 64) != 0) {");
    ctx.writeln("slots[wordIdx] = last | (uint256(liteRef) << 128);");
    ctx.dedent();
    ctx.open("} else {");
    ctx.writeln("slots[wordIdx] = last | (uint256(liteRef) << 64);");
    ctx.close();
    ctx.writeln("liteRefIndex[liteRef] = wordIdx + 1;");
    ctx.close();
}

fn emit_add_batch_body(ctx: &mut CodegenContext<'_>, binding: &Binding) {
    binding.emit_slots_pointer(ctx);
    binding.emit_index_pointer(ctx);
    ctx.open("if (slots.length != 0) {");
    ctx.writeln("revert AlreadyHaveReferences();");
    ctx.close();
    ctx.open("for (uint256 i = 0; i < liteRefs.length; i += 4) {");
    ctx.writeln("uint256 word = 0;");
    ctx.open("for (uint256 j = 0; j < 4 && i + j < liteRefs.length; j++) {");
    emit_reference_guard(ctx, "liteRefs[i + j]");
    ctx.writeln("word = word | (uint256(liteRefs[i + j]) << (j * 64));");
    ctx.writeln("liteRefIndex[liteRefs[i + j]] = i / 4 + 1;");
    ctx.close();
    ctx.writeln("slots.push(word);");
    ctx.close();
}

fn emit_remove_body(ctx: &mut CodegenContext<'_>, binding: &Binding) {
    emit_reference_guard(ctx, "liteRef");
    binding.emit_slots_pointer(ctx);
    binding.emit_index_pointer(ctx);
    ctx.writeln(&format!("uint256 total = {COUNT_FN}(slots);"));
    ctx.open("if (total == 0) {");
    ctx.writeln("revert NoReference();");
    ctx.close();
    ctx.writeln("uint256 lastWordIdx = (total - 1) / 4;");
    ctx.writeln("uint256 lastShift = ((total - 1) % 4) * 64;");
    ctx.writeln("uint64 lastRef = uint64(slots[lastWordIdx] >> lastShift);");
    ctx.open("if (lastRef != liteRef) {");
    ctx.writeln("uint256 wordIdx = liteRefIndex[liteRef];");
    ctx.open("if (wordIdx == 0) {");
    ctx.writeln("revert NoReference();");
    ctx.close();
    ctx.writeln("wordIdx = wordIdx - 1;");
    ctx.open("if (wordIdx >= slots.length) {");
    ctx.writeln("revert StorageIntegrityError();");
    ctx.close();
    ctx.writeln("uint256 word = slots[wordIdx];");
    ctx.writeln("uint256 shift;");
    ctx.open("if (uint64(word) == liteRef) {");
    ctx.writeln("shift = 0;");
    ctx.dedent();
    for shift in [64, 128, 192] {
        ctx.open(&format!("}} else if (uint64(word >> {shift}) == liteRef) {{"));
        ctx.writeln(&format!("shift = {shift};"));
        ctx.dedent();
    }
    ctx.open("} else {");
    ctx.writeln("revert StorageIntegrityError();");
    ctx.close();
    ctx.writeln(
        "slots[wordIdx] = (word & ~(uint256(type(uint64).max) << shift)) | (uint256(lastRef) << shift);",
    );
    ctx.writeln("liteRefIndex[lastRef] = wordIdx + 1;");
    ctx.close();
    ctx.open("if (lastShift == 0) {");
    ctx.writeln("slots.pop();");
    ctx.dedent();
    ctx.open("} else {");
    ctx.writeln(
        "slots[lastWordIdx] = slots[lastWordIdx] & ~(uint256(type(uint64).max) << lastShift);",
    );
    ctx.close();
    ctx.writeln("delete liteRefIndex[liteRef];");
}

fn emit_load_at_body(ctx: &mut CodegenContext<'_>, binding: &Binding) {
    binding.emit_slots_pointer(ctx);
    ctx.open(&format!("if (position >= {COUNT_FN}(slots)) {{"));
    ctx.writeln("revert NoReference();");
    ctx.close();
    ctx.writeln("return uint64(slots[position / 4] >> ((position % 4) * 64));");
}

fn emit_load_page_body(ctx: &mut CodegenContext<'_>, binding: &Binding) {
    binding.emit_slots_pointer(ctx);
    ctx.writeln(&format!("uint256 total = {COUNT_FN}(slots);"));
    ctx.writeln("uint256 available = offset >= total ? 0 : total - offset;");
    ctx.open("if (limit > available) {");
    ctx.writeln("limit = available;");
    ctx.close();
    ctx.writeln("result = new uint64[](limit);");
    ctx.open("for (uint256 i = 0; i < limit; i++) {");
    ctx.writeln("uint256 position = offset + i;");
    ctx.writeln("result[i] = uint64(slots[position / 4] >> ((position % 4) * 64));");
    ctx.close();
    ctx.writeln("return result;");
}

#[cfg(test)]
mod tests;
