//! Members, constructor and the entity functions every contract carries.

use pw_schema::{Capabilities, ContractSchema, PatchKind, StorageField};

use super::dynamic_refs::Binding;
use super::types::schema_enum;
use crate::context::CodegenContext;

/// Whether the contract mints its own token ids.
pub fn mints_tokens(ctx: &CodegenContext<'_>) -> bool {
    ctx.schema.capabilities().contains(Capabilities::MINTABLE)
        || ctx.schema.features.patch().is_some()
}

/// Whether any field lives in the packed words. Without one there is no
/// `Metadata` record; Solidity rejects empty structs.
pub fn has_packed_fields(schema: &ContractSchema) -> bool {
    schema.storage.fixed_fields().next().is_some()
}

pub fn emit_members(ctx: &mut CodegenContext<'_>, binding: Option<&Binding>) {
    ctx.writeln("mapping(uint256 => uint256[]) internal _metadataStorage;");
    ctx.writeln("mapping(address => uint256) internal _permissionsAllow;");
    if mints_tokens(ctx) {
        ctx.writeln("uint256 internal _nextTokenId;");
    }
    if let Some(binding) = binding {
        binding.emit_members(ctx);
    }
    ctx.newline();
}

pub fn emit_constructor(ctx: &mut CodegenContext<'_>) {
    let schema = ctx.schema;
    ctx.writeln("constructor(address _manager, address _owner)");
    ctx.indent();
    ctx.writeln(&format!(
        "Patchwork721({}, {}, {}, _manager, _owner)",
        quoted(&schema.scope_name),
        quoted(&schema.name),
        quoted(&schema.symbol)
    ));
    ctx.dedent();
    ctx.writeln("{}");
    ctx.newline();
}

/// Solidity string literal.
pub fn quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

pub fn emit_generic_functions(ctx: &mut CodegenContext<'_>) {
    emit_uris(ctx);
    emit_schema(ctx);
    if has_packed_fields(ctx.schema) {
        emit_metadata_functions(ctx);
    }
    emit_slot_functions(ctx);
    emit_permissions(ctx);
    if mints_tokens(ctx) {
        emit_mint_single(ctx);
    }
    if ctx.schema.capabilities().contains(Capabilities::MINTABLE) {
        emit_mintable(ctx);
    }
    if let Some(kind) = ctx.schema.features.patch() {
        emit_mint_patch(ctx, kind);
    }
}

fn emit_uris(ctx: &mut CodegenContext<'_>) {
    let uris = ctx.schema.uris.clone();

    ctx.open("function schemaURI() external pure override returns (string memory) {");
    ctx.writeln(&format!("return {};", quoted(&uris.schema)));
    ctx.close();
    ctx.newline();

    ctx.open("function imageURI(uint256 tokenId) external pure override returns (string memory) {");
    ctx.writeln(&format!(
        "return string.concat({}, Strings.toString(tokenId));",
        quoted(&uris.image)
    ));
    ctx.close();
    ctx.newline();

    ctx.open("function _baseURI() internal pure virtual override returns (string memory) {");
    ctx.writeln(&format!("return {};", quoted(&uris.base)));
    ctx.close();
    ctx.newline();
}

fn schema_entry(field: &StorageField) -> String {
    let (slot, offset) = if field.is_dynamic() {
        (0, 0)
    } else {
        (field.slot, field.offset)
    };
    format!(
        "MetadataSchemaEntry({}, {}, {}, {}, {slot}, {offset}, {})",
        field.id(),
        field.entry.permission_id.unwrap_or(0),
        schema_enum(field.field_type),
        field.entry.array_length,
        quoted(field.key())
    )
}

fn emit_schema(ctx: &mut CodegenContext<'_>) {
    let schema = ctx.schema;
    let fields = schema.storage.fields();

    ctx.open("function schema() external pure override returns (MetadataSchema memory) {");
    ctx.writeln(&format!(
        "MetadataSchemaEntry[] memory entries = new MetadataSchemaEntry[]({});",
        fields.len()
    ));
    for (i, field) in fields.iter().enumerate() {
        ctx.writeln(&format!("entries[{i}] = {};", schema_entry(field)));
    }
    ctx.writeln("return MetadataSchema(1, entries);");
    ctx.close();
    ctx.newline();
}

fn emit_metadata_functions(ctx: &mut CodegenContext<'_>) {
    ctx.open("function storeMetadata(uint256 tokenId, Metadata memory data) public {");
    ctx.open("if (!_checkTokenWriteAuth(tokenId)) {");
    ctx.writeln("revert NotAuthorized(msg.sender);");
    ctx.close();
    ctx.writeln("_metadataStorage[tokenId] = packMetadata(data);");
    ctx.close();
    ctx.newline();

    ctx.open("function loadMetadata(uint256 tokenId) public view returns (Metadata memory data) {");
    ctx.writeln("return unpackMetadata(_metadataStorage[tokenId]);");
    ctx.close();
    ctx.newline();
}

fn emit_slot_functions(ctx: &mut CodegenContext<'_>) {
    let slot_count = ctx.schema.slot_count();

    ctx.open("function loadPackedMetadataSlot(uint256 tokenId, uint256 slot) external view returns (uint256) {");
    ctx.open(&format!("if (slot >= {slot_count}) {{"));
    ctx.writeln("revert UnsupportedMetadataId(slot);");
    ctx.close();
    ctx.writeln("return _metadataStorage[tokenId][slot];");
    ctx.close();
    ctx.newline();

    ctx.open("function storePackedMetadataSlot(uint256 tokenId, uint256 slot, uint256 data) public {");
    ctx.open("if (!_checkTokenWriteAuth(tokenId)) {");
    ctx.writeln("revert NotAuthorized(msg.sender);");
    ctx.close();
    ctx.open(&format!("if (slot >= {slot_count}) {{"));
    ctx.writeln("revert UnsupportedMetadataId(slot);");
    ctx.close();
    ctx.writeln("_metadataStorage[tokenId][slot] = data;");
    ctx.close();
    ctx.newline();
}

fn emit_permissions(ctx: &mut CodegenContext<'_>) {
    ctx.open("function setPermissions(address to, uint256 permissions) public {");
    ctx.open("if (!_checkWriteAuth()) {");
    ctx.writeln("revert NotAuthorized(msg.sender);");
    ctx.close();
    ctx.writeln("_permissionsAllow[to] = permissions;");
    ctx.close();
    ctx.newline();
}

fn emit_manager_guard(ctx: &mut CodegenContext<'_>) {
    ctx.open("if (msg.sender != _manager) {");
    ctx.writeln("revert NotAuthorized(msg.sender);");
    ctx.close();
}

fn emit_mint_single(ctx: &mut CodegenContext<'_>) {
    let slot_count = ctx.schema.slot_count();
    ctx.open("function _mintSingle(address to) internal returns (uint256 tokenId) {");
    ctx.writeln("tokenId = _nextTokenId;");
    ctx.writeln("_nextTokenId++;");
    ctx.writeln(&format!("_metadataStorage[tokenId] = new uint256[]({slot_count});"));
    ctx.writeln("_safeMint(to, tokenId);");
    ctx.close();
    ctx.newline();
}

fn emit_mintable(ctx: &mut CodegenContext<'_>) {
    ctx.open("function mint(address to, bytes calldata) public payable returns (uint256 tokenId) {");
    emit_manager_guard(ctx);
    ctx.writeln("return _mintSingle(to);");
    ctx.close();
    ctx.newline();

    ctx.open("function mintBatch(address to, bytes calldata, uint256 quantity) public payable returns (uint256[] memory tokenIds) {");
    emit_manager_guard(ctx);
    ctx.writeln("tokenIds = new uint256[](quantity);");
    ctx.open("for (uint256 i = 0; i < quantity; i++) {");
    ctx.writeln("tokenIds[i] = _mintSingle(to);");
    ctx.close();
    ctx.close();
    ctx.newline();
}

fn emit_mint_patch(ctx: &mut CodegenContext<'_>, kind: PatchKind) {
    let (params, target) = match kind {
        PatchKind::Token => (
            "address to, address originalAddress, uint256 originalTokenId",
            "originalAddress, originalTokenId",
        ),
        PatchKind::TokenSet1155 => (
            "address to, address originalAddress, uint256 originalTokenId, address originalAccount",
            "originalAddress, originalTokenId, originalAccount",
        ),
        PatchKind::Account => ("address to, address originalAddress", "originalAddress"),
    };

    ctx.open(&format!(
        "function mintPatch({params}) external payable returns (uint256 tokenId) {{"
    ));
    emit_manager_guard(ctx);
    ctx.writeln("tokenId = _mintSingle(to);");
    ctx.writeln(&format!("_storePatch(tokenId, {target});"));
    ctx.close();
    ctx.newline();
}
