use serde::{Deserialize, Serialize};

use ghfetch_errors::UserFacingError;

/// Structured failure information shared across domains.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureContext {
    /// Optional stable error code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Short user-facing message.
    pub message: String,
    /// Optional remediation hint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    /// Whether retrying the operation might succeed.
    pub retryable: bool,
}

impl FailureContext {
    /// Build failure context from a `UserFacingError` implementation.
    #[must_use]
    pub fn from_error<E: UserFacingError + ?Sized>(error: &E) -> Self {
        Self {
            code: error.user_code().map(Into::into),
            message: error.user_message().into_owned(),
            hint: error.user_hint().map(Into::into),
            retryable: error.is_retryable(),
        }
    }
}

pub mod download;
pub mod general;
pub mod github;

pub use download::*;
pub use general::*;
pub use github::*;

/// Top-level application event enum that aggregates all domain-specific events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "domain", content = "event", rename_all = "snake_case")]
pub enum AppEvent {
    /// Operation lifecycle
    General(GeneralEvent),

    /// Transfer events
    Download(DownloadEvent),

    /// Repository access and release resolution
    #[serde(rename = "github")]
    GitHub(GitHubEvent),
}

impl AppEvent {
    /// Determine the appropriate tracing log level for this event
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        use tracing::Level;

        match self {
            Self::General(GeneralEvent::OperationFailed { .. })
            | Self::Download(DownloadEvent::Failed { .. })
            | Self::GitHub(GitHubEvent::AccessDenied { .. } | GitHubEvent::AssetNotFound { .. }) => {
                Level::ERROR
            }

            Self::GitHub(GitHubEvent::DuplicateAssets { .. }) => Level::WARN,

            Self::Download(DownloadEvent::Progress { .. })
            | Self::GitHub(GitHubEvent::ValidatingAccess { .. } | GitHubEvent::ResolvingAsset { .. }) => {
                Level::DEBUG
            }

            _ => Level::INFO,
        }
    }

    /// Get the log target for this event (for structured logging)
    #[must_use]
    pub fn log_target(&self) -> &'static str {
        match self {
            Self::General(_) => "ghfetch::events::general",
            Self::Download(_) => "ghfetch::events::download",
            Self::GitHub(_) => "ghfetch::events::github",
        }
    }
}
