//! Error types for the update protocol.

use thiserror::Error;

/// Structured failures of `update_with`.
///
/// Comparison itself never fails; only reconfiguring a differ tree does.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum UpdateError {
    /// The path has steps left after reaching a differ with no children.
    #[error("path too long: {differ} has no children but `{remaining}` remains")]
    PathTooLong { differ: String, remaining: String },

    /// The operation is not supported by this differ kind at this position.
    #[error("invalid operation {op} for {differ}")]
    InvalidDifferOp { differ: String, op: String },

    /// A field step names a field the record differ does not have.
    #[error("record {differ} has no field `{field}` (fields: {})", .known.join(", "))]
    NonExistentField {
        differ: String,
        field: String,
        known: Vec<String>,
    },

    /// The step kind does not match this differ's shape.
    #[error("unexpected differ type: cannot apply step `{step}` to {differ}")]
    UnexpectedDifferType { differ: String, step: String },

    /// A type parameter index out of range for this differ.
    #[error("invalid type parameter index {index} for {differ}")]
    InvalidTypeParamIndex { differ: String, index: usize },

    /// A key function's declared input type differs from the element type.
    #[error("match-by function expects `{actual}` but elements are `{expected}`")]
    MatchByTypeMismatch { expected: String, actual: String },
}

/// Convenience alias for update results.
pub type UpdateResult<T> = Result<T, UpdateError>;
