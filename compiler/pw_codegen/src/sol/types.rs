//! Solidity type mapping and element encode/decode expressions.
//!
//! Encoding turns a Solidity value into the raw, unshifted bits of one
//! storage chunk (one expression per word the element covers). Decoding
//! takes the raw bits, already shifted down to bit 0, and rebuilds the
//! value; the cast to the element width does the truncation.

use pw_schema::{FieldType, StorageField, WORD_BITS};

use crate::context::CodegenContext;

/// Helper for reading 32 string bytes from an arbitrary start.
pub const STR_AT_HELPER: &str = "_strToUint256At";

/// The Solidity type of one element.
pub fn element_type(ty: FieldType) -> &'static str {
    match ty {
        FieldType::Boolean => "bool",
        FieldType::Int8 => "int8",
        FieldType::Int16 => "int16",
        FieldType::Int32 => "int32",
        FieldType::Int64 => "int64",
        FieldType::Int128 => "int128",
        FieldType::Int256 => "int256",
        FieldType::Uint8 => "uint8",
        FieldType::Uint16 => "uint16",
        FieldType::Uint32 => "uint32",
        FieldType::Uint64 | FieldType::LiteRef => "uint64",
        FieldType::Uint128 => "uint128",
        FieldType::Uint256 => "uint256",
        FieldType::Address => "address",
        FieldType::Char8 | FieldType::Char16 | FieldType::Char32 | FieldType::Char64 => "string",
    }
}

/// The `FieldType` enum member used by the on-chain schema.
pub fn schema_enum(ty: FieldType) -> String {
    format!("FieldType.{}", ty.name().to_ascii_uppercase())
}

/// Type of the field inside the `Metadata` struct.
pub fn member_type(field: &StorageField) -> String {
    let element = element_type(field.field_type);
    if field.is_array() {
        format!("{element}[{}]", field.element_count())
    } else {
        element.to_string()
    }
}

/// Type of the field as a function parameter or return value.
pub fn param_type(field: &StorageField) -> String {
    let ty = member_type(field);
    if field.is_array() || field.field_type.is_fixed_string() {
        format!("{ty} memory")
    } else {
        ty
    }
}

/// Accessor suffix for a key: `level` becomes `Level`.
pub fn accessor_suffix(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for (i, c) in key.chars().enumerate() {
        if i == 0 {
            out.push(c.to_ascii_uppercase());
        } else if c.is_ascii_alphanumeric() || c == '_' {
            out.push(c);
        } else {
            out.push('_');
        }
    }
    out
}

/// `word >> offset`, without the no-op shift.
pub fn shifted(word: &str, offset: u32) -> String {
    if offset == 0 {
        word.to_string()
    } else {
        format!("{word} >> {offset}")
    }
}

/// `(1 << bits) - 1` for a field narrower than a word.
pub fn mask_literal(bits: u32) -> String {
    debug_assert!(bits < WORD_BITS);
    format!("(1 << {bits}) - 1")
}

/// Raw chunk expressions for one element held in `value`.
pub fn encode(ctx: &mut CodegenContext<'_>, ty: FieldType, value: &str) -> Vec<String> {
    let bits = ty.bit_width();
    let single = match ty {
        FieldType::Boolean => format!("({value} ? uint256(1) : uint256(0))"),
        FieldType::Int256 => format!("uint256({value})"),
        FieldType::Int8
        | FieldType::Int16
        | FieldType::Int32
        | FieldType::Int64
        | FieldType::Int128 => format!("uint256(uint{bits}({value}))"),
        FieldType::Uint256 => value.to_string(),
        FieldType::Uint8
        | FieldType::Uint16
        | FieldType::Uint32
        | FieldType::Uint64
        | FieldType::Uint128
        | FieldType::LiteRef => format!("uint256({value})"),
        FieldType::Address => format!("uint256(uint160({value}))"),
        FieldType::Char8 | FieldType::Char16 => {
            format!("(PatchworkUtils.strToUint256({value}) >> {})", WORD_BITS - bits)
        }
        FieldType::Char32 => format!("PatchworkUtils.strToUint256({value})"),
        FieldType::Char64 => {
            ctx.mark_helper(STR_AT_HELPER);
            return vec![
                format!("{STR_AT_HELPER}({value}, 0)"),
                format!("{STR_AT_HELPER}({value}, 32)"),
            ];
        }
    };
    vec![single]
}

/// Value expression of type [`element_type`] from its raw chunks.
pub fn decode(ty: FieldType, raw: &[String]) -> String {
    let first = raw.first().map_or("0", String::as_str);
    let bits = ty.bit_width();
    match ty {
        FieldType::Boolean => format!("(uint8({first}) != 0)"),
        FieldType::Int256 => format!("int256({first})"),
        FieldType::Int8
        | FieldType::Int16
        | FieldType::Int32
        | FieldType::Int64
        | FieldType::Int128 => format!("int{bits}(uint{bits}({first}))"),
        FieldType::Uint256 => first.to_string(),
        FieldType::Uint8
        | FieldType::Uint16
        | FieldType::Uint32
        | FieldType::Uint64
        | FieldType::Uint128
        | FieldType::LiteRef => format!("uint{bits}({first})"),
        FieldType::Address => format!("address(uint160({first}))"),
        FieldType::Char8 => format!("PatchworkUtils.toString8(uint64({first}))"),
        FieldType::Char16 => format!("PatchworkUtils.toString16(uint128({first}))"),
        FieldType::Char32 => format!("PatchworkUtils.toString32({first})"),
        FieldType::Char64 => {
            let second = raw.get(1).map_or("0", String::as_str);
            format!(
                "string.concat(PatchworkUtils.toString32({first}), PatchworkUtils.toString32({second}))"
            )
        }
    }
}

/// Emit the requested helper functions.
pub fn emit_helpers(ctx: &mut CodegenContext<'_>) {
    if !ctx.has_helper(STR_AT_HELPER) {
        return;
    }
    ctx.open(&format!(
        "function {STR_AT_HELPER}(string memory str, uint256 start) internal pure returns (uint256 result) {{"
    ));
    ctx.writeln("bytes memory b = bytes(str);");
    ctx.open("for (uint256 i = start; i < b.length && i < start + 32; i++) {");
    ctx.writeln("result |= uint256(uint8(b[i])) << (8 * (31 - (i - start)));");
    ctx.close();
    ctx.close();
    ctx.newline();
}

#[cfg(test)]
mod tests;
