use pretty_assertions::assert_eq;
use pw_schema::{ContractConfig, ContractSchema, FieldType};

use super::*;

fn empty_schema() -> ContractSchema {
    ContractSchema::new(&ContractConfig::new("scope", "Types", "TYP")).unwrap_or_else(|e| panic!("{e}"))
}

#[test]
fn element_types() {
    assert_eq!(element_type(FieldType::Boolean), "bool");
    assert_eq!(element_type(FieldType::Int128), "int128");
    assert_eq!(element_type(FieldType::LiteRef), "uint64");
    assert_eq!(element_type(FieldType::Char16), "string");
    assert_eq!(schema_enum(FieldType::LiteRef), "FieldType.LITEREF");
    assert_eq!(schema_enum(FieldType::Uint256), "FieldType.UINT256");
}

#[test]
fn encodings() {
    let s = empty_schema();
    let mut ctx = CodegenContext::new(&s);
    assert_eq!(
        encode(&mut ctx, FieldType::Boolean, "flag"),
        vec!["(flag ? uint256(1) : uint256(0))"]
    );
    assert_eq!(encode(&mut ctx, FieldType::Int16, "d"), vec!["uint256(uint16(d))"]);
    assert_eq!(encode(&mut ctx, FieldType::Int256, "d"), vec!["uint256(d)"]);
    assert_eq!(encode(&mut ctx, FieldType::Uint256, "n"), vec!["n"]);
    assert_eq!(
        encode(&mut ctx, FieldType::Address, "who"),
        vec!["uint256(uint160(who))"]
    );
    assert_eq!(
        encode(&mut ctx, FieldType::Char8, "name"),
        vec!["(PatchworkUtils.strToUint256(name) >> 192)"]
    );
    assert!(!ctx.has_helper(STR_AT_HELPER));
}

#[test]
fn long_strings_use_the_helper() {
    let s = empty_schema();
    let mut ctx = CodegenContext::new(&s);
    let parts = encode(&mut ctx, FieldType::Char64, "title");
    assert_eq!(
        parts,
        vec!["_strToUint256At(title, 0)", "_strToUint256At(title, 32)"]
    );
    assert!(ctx.has_helper(STR_AT_HELPER));

    emit_helpers(&mut ctx);
    let out = ctx.take_output();
    assert!(out.starts_with(
        "function _strToUint256At(string memory str, uint256 start) internal pure returns (uint256 result) {"
    ));
}

#[test]
fn helpers_are_skipped_when_unused() {
    let s = empty_schema();
    let mut ctx = CodegenContext::new(&s);
    emit_helpers(&mut ctx);
    assert_eq!(ctx.take_output(), "");
}

#[test]
fn decodings() {
    let raw = |s: &str| vec![s.to_string()];
    assert_eq!(decode(FieldType::Int16, &raw("w >> 8")), "int16(uint16(w >> 8))");
    assert_eq!(decode(FieldType::Boolean, &raw("w")), "(uint8(w) != 0)");
    assert_eq!(decode(FieldType::Uint256, &raw("w")), "w");
    assert_eq!(decode(FieldType::Address, &raw("w")), "address(uint160(w))");
    assert_eq!(
        decode(FieldType::Char16, &raw("w >> 64")),
        "PatchworkUtils.toString16(uint128(w >> 64))"
    );
    assert_eq!(
        decode(FieldType::Char64, &["a".to_string(), "b".to_string()]),
        "string.concat(PatchworkUtils.toString32(a), PatchworkUtils.toString32(b))"
    );
}

#[test]
fn accessor_suffixes() {
    assert_eq!(accessor_suffix("level"), "Level");
    assert_eq!(accessor_suffix("max-hp"), "Max_hp");
    assert_eq!(shifted("w", 0), "w");
    assert_eq!(shifted("w", 64), "w >> 64");
}
