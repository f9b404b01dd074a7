use pw_schema::RuntimeError;
use thiserror::Error;

/// Failure of a storage-model operation.
///
/// `Runtime` carries the exact revert the generated contract would raise.
/// The other variants are caller mistakes the Solidity type system rules
/// out statically (wrong value kind, out-of-range literal).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("reverted with {}", .0.identifier())]
    Runtime(#[from] RuntimeError),

    #[error("no packed field `{0}`")]
    UnknownField(String),

    #[error("field `{key}` expects {expected}")]
    TypeMismatch { key: String, expected: &'static str },

    #[error("value for field `{key}` does not fit its {bits}-bit encoding")]
    ValueOutOfRange { key: String, bits: u32 },

    #[error("contract has no fixed reference field")]
    NoFixedReferences,

    #[error("contract has no dynamic reference field")]
    NoDynamicReferences,
}
