use pipfile2req_core::RequirementError;
use std::path::PathBuf;
use thiserror::Error;

/// Error types for manifest conversion.
///
/// Every variant aborts the whole conversion; there is no partial output.
/// Missing hash data is not an error and is reported through
/// [`crate::convert::Diagnostic`] instead.
///
/// # Examples
///
/// ```
/// use pipfile2req::error::ConvertError;
/// use std::path::PathBuf;
///
/// let error = ConvertError::FileNotFound {
///     searched: vec![PathBuf::from("Pipfile.lock"), PathBuf::from("Pipfile")],
/// };
/// assert!(error.to_string().starts_with("no Pipfile* found"));
/// ```
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("no Pipfile* found (searched: {})", display_paths(searched))]
    FileNotFound { searched: Vec<PathBuf> },

    #[error(
        "{} is neither a Pipfile.lock nor a Pipfile (as JSON: {json}; as TOML: {toml})",
        path.display()
    )]
    UnrecognizedFormat {
        path: PathBuf,
        json: String,
        toml: String,
    },

    #[error("invalid manifest {}: {message}", path.display())]
    InvalidManifest { path: PathBuf, message: String },

    #[error("invalid entry in [{section}]: {source}")]
    Requirement {
        section: String,
        #[source]
        source: RequirementError,
    },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Convenience type alias for `Result<T, ConvertError>`.
pub type Result<T> = std::result::Result<T, ConvertError>;
