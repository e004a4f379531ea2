//! GitHub REST models used by the download strategies
//!
//! Only the fields the strategies read are modelled; everything else in the
//! API payloads is ignored during deserialization.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Repository coordinates (`owner/repo`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoSlug {
    pub owner: String,
    pub repo: String,
}

impl RepoSlug {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// Release asset identifier used by the asset download endpoint
///
/// GitHub answers with a number, but the id is only ever echoed back into a
/// URL path, so string ids are kept as they come.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AssetId {
    Number(u64),
    Text(String),
}

impl From<u64> for AssetId {
    fn from(id: u64) -> Self {
        Self::Number(id)
    }
}

impl From<&str> for AssetId {
    fn from(id: &str) -> Self {
        Self::Text(id.to_string())
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(id) => write!(f, "{id}"),
            Self::Text(id) => f.write_str(id),
        }
    }
}

/// Response of `GET /repos/{owner}/{repo}`
///
/// The query only matters for its status code, so every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Repository {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub private: bool,
}

/// Response of `GET /repos/{owner}/{repo}/releases/tags/{tag}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Release {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub tag_name: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

impl Release {
    /// All assets whose name equals `filename`, in API order
    pub fn assets_named<'a>(&'a self, filename: &'a str) -> impl Iterator<Item = &'a ReleaseAsset> {
        self.assets.iter().filter(move |asset| asset.name == filename)
    }
}

/// A binary attached to a release
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseAsset {
    pub id: AssetId,
    pub name: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub content_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_deserialize_ignores_unknown_fields() {
        let json = r#"{
            "id": 7,
            "tag_name": "v1.0.0",
            "draft": false,
            "assets": [
                {"id": 1, "name": "a.tar.gz", "size": 10, "browser_download_url": "x"},
                {"id": 2, "name": "b.tar.gz"}
            ]
        }"#;
        let release: Release = serde_json::from_str(json).unwrap();
        assert_eq!(release.tag_name, "v1.0.0");
        assert_eq!(release.name, None);
        assert_eq!(release.assets.len(), 2);
        assert_eq!(release.assets[1].id, AssetId::Number(2));
        assert_eq!(release.assets[1].size, 0);
    }

    #[test]
    fn test_assets_named_keeps_api_order() {
        let release = Release {
            id: 1,
            tag_name: "v1".into(),
            name: None,
            assets: vec![
                ReleaseAsset {
                    id: AssetId::Number(5),
                    name: "dup.zip".into(),
                    size: 0,
                    content_type: None,
                },
                ReleaseAsset {
                    id: AssetId::Number(3),
                    name: "dup.zip".into(),
                    size: 0,
                    content_type: None,
                },
            ],
        };
        let ids: Vec<_> = release.assets_named("dup.zip").map(|a| a.id.clone()).collect();
        assert_eq!(ids, vec![AssetId::Number(5), AssetId::Number(3)]);
        assert_eq!(release.assets_named("other.zip").count(), 0);
    }

    #[test]
    fn test_minimal_payloads() {
        let repo: Repository = serde_json::from_str(r#"{"name": "widget"}"#).unwrap();
        assert_eq!(repo.id, None);
        assert!(!repo.private);

        let release: Release =
            serde_json::from_str(r#"{"assets": [{"name": "b.tar.gz", "id": "2"}]}"#).unwrap();
        assert_eq!(release.tag_name, "");
        assert_eq!(release.assets[0].id, AssetId::from("2"));
        assert_eq!(release.assets[0].id.to_string(), "2");
    }

    #[test]
    fn test_repo_slug_display() {
        assert_eq!(RepoSlug::new("acme", "widget").to_string(), "acme/widget");
    }
}
