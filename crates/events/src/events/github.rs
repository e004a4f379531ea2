use serde::{Deserialize, Serialize};

/// Repository access and release resolution events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GitHubEvent {
    /// Repository metadata query about to run
    ValidatingAccess { owner: String, repo: String },

    /// Token can read the repository
    AccessValidated { owner: String, repo: String },

    /// Token cannot see the repository
    AccessDenied { owner: String, repo: String },

    /// Release metadata lookup started
    ResolvingAsset {
        owner: String,
        repo: String,
        tag: String,
        filename: String,
    },

    /// Asset id found in the release
    AssetResolved {
        owner: String,
        repo: String,
        tag: String,
        filename: String,
        asset_id: String,
    },

    /// More than one asset carries the requested name; the first is used
    DuplicateAssets {
        tag: String,
        filename: String,
        count: usize,
    },

    /// No asset carries the requested name
    AssetNotFound {
        owner: String,
        repo: String,
        tag: String,
        filename: String,
    },
}
