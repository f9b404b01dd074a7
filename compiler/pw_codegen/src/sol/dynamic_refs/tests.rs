use pw_schema::{ContractConfig, ContractSchema, Entry, Feature};

use super::*;

fn schema(features: Vec<Feature>) -> ContractSchema {
    ContractSchema::compile(
        &ContractConfig::new("scope", "Bag", "BAG")
            .with_fields(vec![
                Entry::new(0, "size", "uint16", 1),
                Entry::new(1, "items", "literef", 0),
            ])
            .with_features(features),
    )
    .unwrap_or_else(|e| panic!("{e}"))
}

#[test]
fn inline_binding_uses_per_token_mappings() {
    let s = schema(vec![]);
    let mut ctx = CodegenContext::new(&s);
    let binding = Binding::for_contract(&ctx, false);
    assert_eq!(binding, Binding::Inline);

    binding.emit_members(&mut ctx);
    emit_library(&mut ctx, &binding);
    emit_dynamic_refs(&mut ctx, &binding);
    let out = ctx.take_output();

    assert!(out.contains("mapping(uint256 => uint256[]) internal _dynamicLiterefStorage;"));
    assert!(!out.contains("library "));
    assert!(out.contains("uint256[] storage slots = _dynamicLiterefStorage[tokenId];"));
    assert!(out.contains(
        "mapping(uint64 => uint256) storage liteRefIndex = _dynamicLiterefIndex[tokenId];"
    ));
    assert!(out.contains("function _countLiteRefs(uint256[] storage slots) internal view returns (uint256) {"));
    assert!(out.contains("return _countLiteRefs(_dynamicLiterefStorage[tokenId]);"));
}

#[test]
fn add_scans_the_last_word_from_the_top() {
    let s = schema(vec![]);
    let mut ctx = CodegenContext::new(&s);
    emit_dynamic_refs(&mut ctx, &Binding::Inline);
    let out = ctx.take_output();

    let top = out.find("if (uint64(last >> 128) != 0) {");
    let middle = out.find("} else if (uint64(last >> 64) != 0) {");
    assert!(top.is_some() && middle.is_some());
    assert!(top < middle);
    assert!(out.contains("slots.push(uint256(liteRef));"));
    assert!(out.contains("liteRefIndex[liteRef] = len + 1;"));
}

#[test]
fn remove_swaps_in_the_last_reference() {
    let s = schema(vec![]);
    let mut ctx = CodegenContext::new(&s);
    emit_dynamic_refs(&mut ctx, &Binding::Inline);
    let out = ctx.take_output();

    assert!(out.contains("uint64 lastRef = uint64(slots[lastWordIdx] >> lastShift);"));
    assert!(out.contains("revert StorageIntegrityError();"));
    assert!(out.contains("liteRefIndex[lastRef] = wordIdx + 1;"));
    assert!(out.contains("slots.pop();"));
    assert!(out.contains("delete liteRefIndex[liteRef];"));
}

#[test]
fn pages_are_clamped() {
    let s = schema(vec![]);
    let mut ctx = CodegenContext::new(&s);
    emit_dynamic_refs(&mut ctx, &Binding::Inline);
    let out = ctx.take_output();

    assert!(out.contains("uint256 available = offset >= total ? 0 : total - offset;"));
    assert!(out.contains("limit = available;"));
    assert!(out.contains("result = new uint64[](limit);"));
}

#[test]
fn library_binding_delegates() {
    let s = schema(vec![Feature::DynamicRefLibrary]);
    let mut ctx = CodegenContext::new(&s);
    let binding = Binding::for_contract(&ctx, true);
    assert_eq!(
        binding,
        Binding::Library {
            name: "BagDynamicRefs".to_string()
        }
    );

    emit_library(&mut ctx, &binding);
    let library = ctx.take_output();
    assert!(library.starts_with("library BagDynamicRefs {"));
    assert!(library.contains("struct DynamicLiteRefs {"));
    assert!(library.contains("uint256[] storage slots = refs.slots;"));
    assert!(library.contains("mapping(uint64 => uint256) storage liteRefIndex = refs.idx;"));
    assert!(library.contains("function _countLiteRefs(uint256[] storage slots) private view returns (uint256) {"));

    binding.emit_members(&mut ctx);
    emit_dynamic_refs(&mut ctx, &binding);
    let contract = ctx.take_output();
    assert!(contract.contains(
        "mapping(uint256 => BagDynamicRefs.DynamicLiteRefs) internal _dynamicLiterefStorage;"
    ));
    assert!(contract.contains("BagDynamicRefs.add(_dynamicLiterefStorage[tokenId], liteRef);"));
    assert!(contract.contains("return BagDynamicRefs.loadPage(_dynamicLiterefStorage[tokenId], offset, limit);"));
    assert!(!contract.contains("using "));
    assert!(!contract.contains("liteRefIndex"));
    assert!(!contract.contains("function _countLiteRefs"));
}

#[test]
fn zero_reference_is_rejected() {
    let s = schema(vec![]);
    let mut ctx = CodegenContext::new(&s);
    emit_dynamic_refs(&mut ctx, &Binding::Inline);
    let out = ctx.take_output();

    // add and remove guard the scalar argument, the batch guards each element
    assert_eq!(out.matches("if (liteRef == 0) {").count(), 2);
    assert!(out.contains("if (liteRefs[i + j] == 0) {"));

    let binding = Binding::for_contract(&ctx, true);
    emit_library(&mut ctx, &binding);
    let library = ctx.take_output();
    assert_eq!(library.matches("if (liteRef == 0) {").count(), 2);
    assert!(library.contains("if (liteRefs[i + j] == 0) {"));
}
