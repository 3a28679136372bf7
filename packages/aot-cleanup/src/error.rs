use thiserror::Error;
use ts::HostError;

/// Errors that abort a transformation. Semantic lookups that merely fail
/// degrade the generated metadata instead of surfacing here.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error(transparent)]
    Host(#[from] HostError),

    #[error("transformation of {file_name} produced no root node")]
    MissingRoot { file_name: String },
}

pub type TransformResult<T> = Result<T, TransformError>;
