//! CLI error handling

use std::fmt;

use ghfetch_errors::UserFacingError;

/// CLI-specific error type
#[derive(Debug)]
pub enum CliError {
    /// Configuration error
    Config(ghfetch_errors::Error),
    /// Download or lookup error
    Fetch(ghfetch_errors::Error),
    /// Invalid command arguments
    InvalidArguments(String),
    /// I/O error
    Io(std::io::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(e) => write!(f, "Configuration error: {e}"),
            CliError::Fetch(e) => {
                let message = e.user_message();
                write!(f, "{message}")?;
                if let Some(code) = e.user_code() {
                    write!(f, "\n  Code: {code}")?;
                }
                if let Some(hint) = e.user_hint() {
                    write!(f, "\n  Hint: {hint}")?;
                }
                if e.is_retryable() {
                    write!(f, "\n  Retry: safe to retry this operation.")?;
                }
                Ok(())
            }
            CliError::InvalidArguments(msg) => write!(f, "Invalid arguments: {msg}"),
            CliError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) | CliError::Fetch(e) => Some(e),
            CliError::Io(e) => Some(e),
            CliError::InvalidArguments(_) => None,
        }
    }
}

impl From<ghfetch_errors::Error> for CliError {
    fn from(e: ghfetch_errors::Error) -> Self {
        match e {
            ghfetch_errors::Error::Config(_) => CliError::Config(e),
            other => CliError::Fetch(other),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ghfetch_errors::{ConfigError, GitHubError};

    #[test]
    fn test_fetch_error_shows_hint() {
        let err: CliError = ghfetch_errors::Error::from(GitHubError::AccessDenied {
            owner: "acme".into(),
            repo: "widget".into(),
        })
        .into();
        let rendered = err.to_string();
        assert!(rendered.contains("acme/widget"));
        assert!(rendered.contains("Hint:"));
    }

    #[test]
    fn test_config_errors_are_classified() {
        let err: CliError = ghfetch_errors::Error::from(ConfigError::ParseError {
            message: "bad".into(),
        })
        .into();
        assert!(matches!(err, CliError::Config(_)));
        assert!(err.to_string().starts_with("Configuration error"));
    }
}
