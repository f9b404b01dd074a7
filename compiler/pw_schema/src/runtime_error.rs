//! Errors raised by generated contracts at run time.
//!
//! The generator never raises these itself. It selects which identifiers a
//! contract declares and which one each guard reverts with; the storage
//! model in `pw_eval` returns the same identifiers so both stay in lockstep.

use thiserror::Error;

use crate::feature::ReferenceMode;

/// A revert reason emitted by generated code.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Error)]
pub enum RuntimeError {
    #[error("no reference slots available")]
    NoReferenceSlotsAvailable,
    #[error("too many references")]
    TooManyReferences,
    #[error("no such reference")]
    NoReference,
    #[error("references already present")]
    AlreadyHaveReferences,
    #[error("reference index is inconsistent with storage")]
    StorageIntegrityError,
    #[error("unsupported metadata id")]
    UnsupportedMetadataId,
    #[error("not authorized")]
    NotAuthorized,
    #[error("bad input lengths")]
    BadInputLengths,
}

impl RuntimeError {
    /// The exact error identifier used in generated source.
    pub const fn identifier(self) -> &'static str {
        match self {
            RuntimeError::NoReferenceSlotsAvailable => "NoReferenceSlotsAvailable",
            RuntimeError::TooManyReferences => "TooManyReferences",
            RuntimeError::NoReference => "NoReference",
            RuntimeError::AlreadyHaveReferences => "AlreadyHaveReferences",
            RuntimeError::StorageIntegrityError => "StorageIntegrityError",
            RuntimeError::UnsupportedMetadataId => "UnsupportedMetadataId",
            RuntimeError::NotAuthorized => "NotAuthorized",
            RuntimeError::BadInputLengths => "BadInputLengths",
        }
    }

    /// Solidity declaration, e.g. `error NotAuthorized(address addr);`.
    pub const fn declaration(self) -> &'static str {
        match self {
            RuntimeError::NoReferenceSlotsAvailable => "error NoReferenceSlotsAvailable();",
            RuntimeError::TooManyReferences => "error TooManyReferences();",
            RuntimeError::NoReference => "error NoReference();",
            RuntimeError::AlreadyHaveReferences => "error AlreadyHaveReferences();",
            RuntimeError::StorageIntegrityError => "error StorageIntegrityError();",
            RuntimeError::UnsupportedMetadataId => "error UnsupportedMetadataId(uint256 id);",
            RuntimeError::NotAuthorized => "error NotAuthorized(address addr);",
            RuntimeError::BadInputLengths => "error BadInputLengths();",
        }
    }

    /// Errors a contract with the given reference mode can revert with, in
    /// declaration order.
    pub fn declared_for(mode: &ReferenceMode) -> Vec<RuntimeError> {
        let mut errors = vec![
            RuntimeError::NotAuthorized,
            RuntimeError::UnsupportedMetadataId,
            RuntimeError::BadInputLengths,
        ];
        match mode {
            ReferenceMode::None => {}
            ReferenceMode::Fixed { .. } => errors.extend([
                RuntimeError::NoReferenceSlotsAvailable,
                RuntimeError::TooManyReferences,
                RuntimeError::NoReference,
                RuntimeError::AlreadyHaveReferences,
            ]),
            ReferenceMode::Dynamic { .. } => errors.extend([
                RuntimeError::NoReference,
                RuntimeError::AlreadyHaveReferences,
                RuntimeError::StorageIntegrityError,
            ]),
        }
        errors
    }
}
