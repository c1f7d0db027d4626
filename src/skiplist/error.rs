use std::path::PathBuf;
use thiserror::Error;

/// Structural problems in a skip-list document
///
/// Raised only while loading; lookups never fail.
#[derive(Error, Debug)]
pub enum MalformedInput {
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("top level must be a mapping of operator names, found {found}")]
    NotAMapping { found: &'static str },

    #[error("operator names must be strings, found key {key}")]
    NonStringKey { key: String },

    #[error("entry for operator '{operator}' must be empty or a list of implementation names, found {found}")]
    InvalidEntry {
        operator: String,
        found: &'static str,
    },

    #[error("implementation #{index} of operator '{operator}' must be a string, found {found}")]
    NonStringImplementation {
        operator: String,
        index: usize,
        found: &'static str,
    },
}

/// Errors that can occur while loading a skip list
#[derive(Error, Debug)]
pub enum SkipListError {
    #[error("failed to read skip list {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed skip list: {0}")]
    Malformed(#[from] MalformedInput),

    #[error("duplicate operator '{0}' in skip list")]
    DuplicateOperator(String),
}

/// Result type for skip-list loading
pub type Result<T> = std::result::Result<T, SkipListError>;
