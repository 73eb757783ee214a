use thiserror::Error;

/// failures of the version engine; the repository value is left untouched
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VersionError {
    #[error("no files staged for commit")]
    NoStagedChanges,

    #[error("repository not initialised (run `pagesmith init`)")]
    NotInitialized,

    #[error("unknown commit: {0}")]
    UnknownCommit(String),
}

/// the file set cannot be turned into a previewable document
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ComposeError {
    #[error("project has no html file, nothing to preview")]
    NotComposable,
}

#[derive(Debug, Error)]
pub enum SandboxError {
    #[error("failed to construct preview context: {0}")]
    ConstructionFailed(String),

    #[error("preview is unmounted")]
    Unmounted,
}
