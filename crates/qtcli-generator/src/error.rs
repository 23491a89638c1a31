//! Errors returned by [`Generator::run`](crate::Generator::run).

use std::path::PathBuf;

use crate::expander::ExpandError;
use crate::fields::FieldError;
use crate::manifest::ManifestError;
use crate::target::TargetCategory;

/// Every way a generation request can fail.
///
/// Files written before the failing entry stay on disk.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    #[error("invalid new type, given = '{category}', '{type_name}'")]
    InvalidTarget {
        category: TargetCategory,
        type_name: String,
    },

    #[error(transparent)]
    ManifestLoad(#[from] ManifestError),

    #[error(transparent)]
    FieldExpansion(#[from] FieldError),

    #[error("failed to evaluate 'when' condition for '{entry}': {source}")]
    GuardEvaluation { entry: String, source: ExpandError },

    #[error("failed to render '{entry}': {source}")]
    Render { entry: String, source: ExpandError },

    #[error("failed to write {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub type GeneratorResult<T> = Result<T, GeneratorError>;
