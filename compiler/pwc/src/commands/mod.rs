//! Command handlers for the `pwc` binary.
//!
//! Each submodule implements one command. Configuration loading is shared
//! and lives here.

use std::path::Path;

use pw_schema::{ContractConfig, ContractSchema};

use crate::DriverError;

mod check;
mod generate;
mod layout;

pub use check::check_file;
pub use generate::{generate, GenerateOptions, WriteOutcome};
pub use layout::{format_layout, layout_file};

/// Read and deserialize a configuration document.
pub fn load_config(path: &Path) -> Result<ContractConfig, DriverError> {
    let text = std::fs::read_to_string(path).map_err(|e| DriverError::io(path, e))?;
    serde_json::from_str(&text).map_err(|source| DriverError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a configuration and compile it into a validated schema.
pub fn compile_config(path: &Path) -> Result<ContractSchema, DriverError> {
    let config = load_config(path)?;
    ContractSchema::compile(&config).map_err(|source| DriverError::Schema {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
