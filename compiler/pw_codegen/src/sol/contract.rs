//! Implementation document assembler.
//!
//! Sections are concatenated in a fixed order:
//!
//! 1. header and imports
//! 2. dynamic reference library (library mode only)
//! 3. contract declaration
//! 4. errors
//! 5. `Metadata`
//! 6. members
//! 7. constructor
//! 8. generic entity functions
//! 9. pack/unpack
//! 10. field accessors
//! 11. reference store routines
//! 12. helpers and closing brace

use pw_schema::{Capabilities, ContractSchema, FragmentKind, PatchKind, ReferenceMode, RuntimeError};

use super::accessors::emit_accessors;
use super::dynamic_refs::{emit_dynamic_refs, emit_library, Binding};
use super::fixed_refs::emit_fixed_refs;
use super::generic::{emit_constructor, emit_generic_functions, emit_members, has_packed_fields};
use super::pack::{emit_metadata_struct, emit_pack_unpack};
use super::types::emit_helpers;
use crate::context::CodegenContext;

pub const SOLIDITY_VERSION: &str = "^0.8.23";

/// Base contracts, in inheritance order.
pub fn inheritance(schema: &ContractSchema) -> Vec<&'static str> {
    let caps = schema.capabilities();
    let reversible = caps.contains(Capabilities::REVERSIBLE);
    let mut bases = Vec::new();

    if let Some(kind) = schema.features.patch() {
        bases.push(match (kind, reversible) {
            (PatchKind::Token, false) => "PatchworkPatch",
            (PatchKind::Token, true) => "PatchworkReversiblePatch",
            (PatchKind::TokenSet1155, false) => "Patchwork1155Patch",
            (PatchKind::TokenSet1155, true) => "PatchworkReversible1155Patch",
            (PatchKind::Account, false) => "PatchworkAccountPatch",
            (PatchKind::Account, true) => "PatchworkReversibleAccountPatch",
        });
    }
    if let Some(kind) = schema.features.fragment() {
        bases.push(match kind {
            FragmentKind::Single => "PatchworkFragmentSingle",
            FragmentKind::Multi => "PatchworkFragmentMulti",
        });
        if caps.contains(Capabilities::WEAK_REF) {
            bases.push("PatchworkWeakRef");
        }
    }
    if bases.is_empty() {
        bases.push("Patchwork721");
    }
    if caps.contains(Capabilities::LITEREF) {
        bases.push("PatchworkLiteRef");
    }
    if caps.contains(Capabilities::MINTABLE) {
        bases.push("IPatchworkMintable");
    }
    bases
}

fn import_path(base: &str) -> String {
    if base.starts_with('I') {
        format!("@patchwork/interfaces/{base}.sol")
    } else {
        format!("@patchwork/{base}.sol")
    }
}

fn emit_header(ctx: &mut CodegenContext<'_>, bases: &[&str]) {
    ctx.writeln("// SPDX-License-Identifier: UNLICENSED");
    ctx.writeln(&format!("pragma solidity {SOLIDITY_VERSION};"));
    ctx.newline();
    ctx.writeln("// Generated file. Edits are overwritten; extend the wrapper contract instead.");
    ctx.newline();
    ctx.writeln("import \"@openzeppelin/contracts/utils/Strings.sol\";");
    if !bases.contains(&"Patchwork721") {
        ctx.writeln("import \"@patchwork/Patchwork721.sol\";");
    }
    for base in bases {
        ctx.writeln(&format!("import \"{}\";", import_path(base)));
    }
    let schema = ctx.schema;
    if schema.storage.fields().iter().any(|f| f.field_type.is_fixed_string()) {
        ctx.writeln("import \"@patchwork/PatchworkUtils.sol\";");
    }
    ctx.newline();
}

fn emit_errors(ctx: &mut CodegenContext<'_>, mode: &ReferenceMode) {
    for error in RuntimeError::declared_for(mode) {
        ctx.writeln(error.declaration());
    }
    ctx.newline();
}

/// Render the implementation document.
pub fn emit_implementation(ctx: &mut CodegenContext<'_>) -> String {
    let schema = ctx.schema;
    let bases = inheritance(schema);
    let mode = schema.reference_mode();
    let binding = if mode.is_dynamic() {
        let library = schema.capabilities().contains(Capabilities::DYNAMIC_REF_LIBRARY);
        Some(Binding::for_contract(ctx, library))
    } else {
        None
    };

    emit_header(ctx, &bases);
    if let Some(binding) = &binding {
        emit_library(ctx, binding);
    }

    let name = ctx.contract_name();
    ctx.open(&format!(
        "abstract contract {name}Generated is {} {{",
        bases.join(", ")
    ));
    emit_errors(ctx, &mode);
    let packed = has_packed_fields(schema);
    if packed {
        emit_metadata_struct(ctx);
    }
    emit_members(ctx, binding.as_ref());
    emit_constructor(ctx);

    ctx.banner("Entity");
    emit_generic_functions(ctx);

    if packed {
        ctx.banner("Packing");
        emit_pack_unpack(ctx);
    }

    ctx.banner("Fields");
    emit_accessors(ctx);

    match (&mode, &binding) {
        (ReferenceMode::Fixed { field_id, .. }, _) => {
            if let Some(field) = schema.storage.field(*field_id) {
                emit_fixed_refs(ctx, field);
            }
        }
        (ReferenceMode::Dynamic { .. }, Some(binding)) => emit_dynamic_refs(ctx, binding),
        _ => {}
    }

    emit_helpers(ctx);
    ctx.close();

    let source = ctx.take_output();
    tracing::debug!(contract = %name, bytes = source.len(), "rendered implementation");
    source
}
