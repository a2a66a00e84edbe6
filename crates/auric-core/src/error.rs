use thiserror::Error;

/// Construction-time mistakes. These abort tree assembly.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("a unit must be registered under a non-empty key")]
    MissingKey,
    #[error("key `{0}` is already registered")]
    DuplicateKey(String),
    #[error("{0} requires at least one item")]
    Empty(&'static str),
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum FocusError {
    /// A transition named a child that was never registered.
    #[error("no unit registered under key `{0}`")]
    UnknownKey(String),
    #[error("`{to}` refused entry and `{from}` could not be re-entered")]
    Stranded { from: String, to: String },
    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type FocusResult<T> = Result<T, FocusError>;
