//! Error types for epigram modules using thiserror.

use thiserror::Error;

/// Errors from configuration resolution and the persisted store.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(
        "No API key configured. Get one at https://openrouter.ai/keys and run:\n  epigram config set key <your-api-key>"
    )]
    MissingApiKey,

    #[error("Unknown config action '{0}'. Available actions: get, set")]
    InvalidAction(String),

    #[error(
        "'config set' requires a key and a non-empty value.\nUsage: epigram config set <key> <value>"
    )]
    MissingSetArguments,

    #[error("Could not determine the user config directory")]
    NoConfigDir,

    #[error("Failed to read config store at {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write config store at {path}: {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from git operations.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Not a git repository (or any parent up to the filesystem root): {0}")]
    OpenRepository(#[source] git2::Error),

    #[error("Failed to collect staged diff: {0}")]
    DiffFailed(#[source] git2::Error),

    #[error("Failed to stage changes: {0}")]
    StagingFailed(#[source] git2::Error),
}

/// Errors from the OpenRouter completion API.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Request to the completion API failed: {0}")]
    Http(#[source] reqwest::Error),

    #[error("Completion API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Completion API returned no choices")]
    EmptyResponse,

    #[error("Failed to decode completion response: {0}")]
    MalformedResponse(#[source] reqwest::Error),
}
