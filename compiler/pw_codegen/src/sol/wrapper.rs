//! User-editable wrapper document.

use super::contract::SOLIDITY_VERSION;
use crate::context::CodegenContext;

/// `contract <Name> is <Name>Generated`, forwarding the constructor.
pub fn emit_wrapper(ctx: &mut CodegenContext<'_>) -> String {
    let name = ctx.contract_name();
    ctx.writeln("// SPDX-License-Identifier: UNLICENSED");
    ctx.writeln(&format!("pragma solidity {SOLIDITY_VERSION};"));
    ctx.newline();
    ctx.writeln(&format!("import \"./{name}Generated.sol\";"));
    ctx.newline();
    ctx.open(&format!("contract {name} is {name}Generated {{"));
    ctx.writeln("constructor(address _manager, address _owner)");
    ctx.indent();
    ctx.writeln(&format!("{name}Generated(_manager, _owner)"));
    ctx.dedent();
    ctx.writeln("{}");
    ctx.close();
    ctx.take_output()
}
