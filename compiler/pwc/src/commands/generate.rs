//! The `generate` command: render and write the contract documents.

use std::path::{Path, PathBuf};

use super::compile_config;
use crate::DriverError;

/// Options for [`generate`].
#[derive(Clone, Debug, Default)]
pub struct GenerateOptions {
    /// Directory for all outputs. Defaults to each configuration's own
    /// directory.
    pub output_dir: Option<PathBuf>,
    /// Overwrite an existing wrapper contract.
    pub force_wrapper: bool,
}

/// What happened to one output file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WriteOutcome {
    Written(PathBuf),
    /// An existing wrapper was left untouched.
    Kept(PathBuf),
}

impl WriteOutcome {
    pub fn path(&self) -> &Path {
        match self {
            WriteOutcome::Written(path) | WriteOutcome::Kept(path) => path,
        }
    }
}

/// Generate the documents for every configuration in `paths`.
///
/// All configurations are compiled and rendered before anything is written,
/// so a single invalid configuration leaves the output directory untouched.
/// The wrapper is user-owned: it is written only when absent unless
/// `force_wrapper` is set.
pub fn generate(
    paths: &[PathBuf],
    options: &GenerateOptions,
) -> Result<Vec<WriteOutcome>, DriverError> {
    let schemas = paths
        .iter()
        .map(|path| compile_config(path))
        .collect::<Result<Vec<_>, _>>()?;

    let mut rendered = Vec::with_capacity(schemas.len());
    for (path, result) in paths.iter().zip(pw_codegen::render_all(&schemas)) {
        rendered.push(result.map_err(|source| DriverError::Codegen {
            path: path.clone(),
            source,
        })?);
    }

    let mut outcomes = Vec::with_capacity(rendered.len() * 3);
    for (path, documents) in paths.iter().zip(&rendered) {
        let dir = output_dir(path, options);
        std::fs::create_dir_all(&dir).map_err(|e| DriverError::io(&dir, e))?;

        outcomes.push(write(
            dir.join(documents.implementation_file()),
            &documents.implementation,
        )?);
        outcomes.push(write(dir.join(documents.schema_file()), &documents.schema_json)?);

        let wrapper = dir.join(documents.wrapper_file());
        if wrapper.exists() && !options.force_wrapper {
            tracing::debug!(path = %wrapper.display(), "keeping existing wrapper");
            outcomes.push(WriteOutcome::Kept(wrapper));
        } else {
            outcomes.push(write(wrapper, &documents.wrapper)?);
        }
    }

    Ok(outcomes)
}

fn output_dir(config: &Path, options: &GenerateOptions) -> PathBuf {
    match &options.output_dir {
        Some(dir) => dir.clone(),
        None => config.parent().map(Path::to_path_buf).unwrap_or_default(),
    }
}

fn write(path: PathBuf, contents: &str) -> Result<WriteOutcome, DriverError> {
    std::fs::write(&path, contents).map_err(|e| DriverError::io(&path, e))?;
    tracing::debug!(path = %path.display(), bytes = contents.len(), "wrote");
    Ok(WriteOutcome::Written(path))
}
