use thiserror::Error;

/// Failures of the syntax host. These are the only fatal errors a pass can
/// observe; everything else degrades to less precise output.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("failed to parse {file_name}: {message}")]
    Parse { file_name: String, message: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration in {path}: {message}")]
    Config { path: String, message: String },

    #[error("file not found: {0}")]
    MissingFile(String),
}

pub type HostResult<T> = Result<T, HostError>;
