//! GitHub access and release resolution error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum GitHubError {
    #[error("invalid url pattern for {kind}: {url}")]
    InvalidUrlPattern { kind: String, url: String },

    #[error("environment variable {var} is required")]
    MissingCredential { var: String },

    #[error("token can not access the repository: {owner}/{repo}")]
    AccessDenied { owner: String, repo: String },

    #[error("GitHub authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("GitHub resource not found: {resource}")]
    NotFound { resource: String },

    #[error("asset {filename} not found in release {tag} of {owner}/{repo}")]
    AssetNotFound {
        owner: String,
        repo: String,
        tag: String,
        filename: String,
    },

    #[error("GitHub API error {status} for {resource}: {message}")]
    ApiError {
        status: u16,
        resource: String,
        message: String,
    },

    #[error("invalid GitHub API response for {resource}: {message}")]
    InvalidResponse { resource: String, message: String },
}

impl UserFacingError for GitHubError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::InvalidUrlPattern { .. } => Some(
                "Use https://github.com/{owner}/{repo}/{path} for repository files or \
                 https://github.com/{owner}/{repo}/releases/download/{tag}/{file} for release assets.",
            ),
            Self::MissingCredential { .. } => {
                Some("Export a GitHub personal access token in the named environment variable.")
            }
            Self::AccessDenied { .. } => Some(
                "This token may not have permission to access the repository or the url may be incorrect.",
            ),
            Self::AuthenticationFailed { .. } => {
                Some("The token was rejected by GitHub. Check that it is valid and not expired.")
            }
            Self::AssetNotFound { .. } => {
                Some("Check the release tag and asset file name on the repository's releases page.")
            }
            _ => None,
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, Self::ApiError { status, .. } if *status >= 500)
    }

    fn user_code(&self) -> Option<&'static str> {
        Some(match self {
            Self::InvalidUrlPattern { .. } => "github.invalid_url_pattern",
            Self::MissingCredential { .. } => "github.missing_credential",
            Self::AccessDenied { .. } => "github.access_denied",
            Self::AuthenticationFailed { .. } => "github.authentication_failed",
            Self::NotFound { .. } => "github.not_found",
            Self::AssetNotFound { .. } => "github.asset_not_found",
            Self::ApiError { .. } => "github.api_error",
            Self::InvalidResponse { .. } => "github.invalid_response",
        })
    }
}
