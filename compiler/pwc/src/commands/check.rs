//! The `check` command: validate a configuration without writing output.

use std::path::Path;

use pw_schema::ContractSchema;

use super::compile_config;
use crate::DriverError;

/// Compile and validate the configuration at `path`.
pub fn check_file(path: &Path) -> Result<ContractSchema, DriverError> {
    let schema = compile_config(path)?;
    tracing::debug!(
        path = %path.display(),
        contract = %schema.name,
        words = schema.slot_count(),
        "configuration is valid"
    );
    Ok(schema)
}
