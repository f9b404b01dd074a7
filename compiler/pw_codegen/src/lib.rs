//! Solidity and JSON generation for packed-storage contracts.
//!
//! Given a validated [`ContractSchema`], this crate produces three
//! documents:
//!
//! 1. **Implementation** (`<Name>Generated.sol`): storage layout, per-field
//!    accessors, pack/unpack and the reference store routines.
//! 2. **Wrapper** (`<Name>.sol`): a user-editable contract extending the
//!    implementation. Drivers write it only when it does not exist yet.
//! 3. **Schema mirror** (`<Name>-schema.json`): fields with their planned
//!    slot and offset.
//!
//! # Architecture
//!
//! ```text
//! ContractSchema
//!        ↓
//!   validate()        (no output for an invalid schema)
//!        ↓
//!   CodegenContext    (one per document)
//!        ↓
//!   sol / json        (section emitters)
//!        ↓
//!   GeneratedDocuments
//! ```
//!
//! Rendering is a pure function of the schema, so [`render_all`] renders
//! independent schemas in parallel.

mod context;
mod json;
pub mod sol;

use pw_schema::{ContractSchema, SchemaError};
use rayon::prelude::*;
use thiserror::Error;

pub use context::CodegenContext;
pub use json::emit_schema_json;

/// A code generation error.
#[derive(Debug, Error)]
pub enum CodegenError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("failed to serialize schema mirror: {0}")]
    Json(#[from] serde_json::Error),
}

/// The documents generated for one contract.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedDocuments {
    /// Solidity identifier of the wrapper contract.
    pub contract_name: String,
    pub implementation: String,
    pub wrapper: String,
    pub schema_json: String,
}

impl GeneratedDocuments {
    pub fn implementation_file(&self) -> String {
        format!("{}Generated.sol", self.contract_name)
    }

    pub fn wrapper_file(&self) -> String {
        format!("{}.sol", self.contract_name)
    }

    pub fn schema_file(&self) -> String {
        format!("{}-schema.json", self.contract_name)
    }
}

/// Validate `schema` and render all of its documents.
pub fn render(schema: &ContractSchema) -> Result<GeneratedDocuments, CodegenError> {
    schema.validate()?;

    let mut ctx = CodegenContext::new(schema);
    let contract_name = ctx.contract_name();
    let implementation = sol::emit_implementation(&mut ctx);
    let wrapper = sol::emit_wrapper(&mut CodegenContext::new(schema));
    let schema_json = emit_schema_json(schema)?;

    Ok(GeneratedDocuments {
        contract_name,
        implementation,
        wrapper,
        schema_json,
    })
}

/// Render independent schemas in parallel, one result per schema in input
/// order.
pub fn render_all(schemas: &[ContractSchema]) -> Vec<Result<GeneratedDocuments, CodegenError>> {
    schemas.par_iter().map(render).collect()
}
