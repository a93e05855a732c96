use anyhow::Context as _;
use thiserror::Error;

/// Failures raised by the feature engine itself
#[derive(Debug, Error, PartialEq)]
pub enum FeatureError {
    #[error("user '{user_id}' has no entry in the community partition")]
    UnknownUser { user_id: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to parse date: {0}")]
    InvalidDate(String),
}

/// Add context to read errors
pub fn read_context(data_type: &str, path: &std::path::Path) -> String {
    format!("Failed to read {} from {}", data_type, path.display())
}

/// Add context to write errors
pub fn write_context(data_type: &str, path: &std::path::Path) -> String {
    format!("Failed to write {} to {}", data_type, path.display())
}

/// Add context to parse errors
pub fn parse_context(data_type: &str) -> String {
    format!("Failed to parse {}", data_type)
}

/// Wrap result with parse context
pub fn with_parse_context<T, E>(result: Result<T, E>, data_type: &str) -> anyhow::Result<T>
where
    E: std::error::Error + Send + Sync + 'static,
{
    result.context(parse_context(data_type))
}
