//! URL shapes accepted by the download strategies

use ghfetch_errors::{Error, GitHubError};
use ghfetch_types::{Credential, RepoSlug};
use regex::Regex;
use url::Url;

const DEFAULT_WEB: &str = "https://github.com";
const DEFAULT_API: &str = "https://api.github.com";

/// Web host the download URLs point at and the API root used for metadata
/// and asset downloads. Stored without trailing slashes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitHubHosts {
    web: String,
    api: String,
}

impl Default for GitHubHosts {
    fn default() -> Self {
        Self {
            web: DEFAULT_WEB.to_string(),
            api: DEFAULT_API.to_string(),
        }
    }
}

impl GitHubHosts {
    #[must_use]
    pub fn new(web: &Url, api: &Url) -> Self {
        Self {
            web: web.as_str().trim_end_matches('/').to_string(),
            api: api.as_str().trim_end_matches('/').to_string(),
        }
    }

    #[must_use]
    pub fn web(&self) -> &str {
        &self.web
    }

    #[must_use]
    pub fn api(&self) -> &str {
        &self.api
    }
}

/// What a parsed URL points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A file inside the repository tree
    RawFile { filepath: String },
    /// A binary attached to a tagged release
    ReleaseAsset { tag: String, filename: String },
}

/// A download URL split into its GitHub coordinates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    url: String,
    slug: RepoSlug,
    target: Target,
}

impl DownloadRequest {
    /// The URL exactly as supplied
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    #[must_use]
    pub fn slug(&self) -> &RepoSlug {
        &self.slug
    }

    #[must_use]
    pub fn owner(&self) -> &str {
        &self.slug.owner
    }

    #[must_use]
    pub fn repo(&self) -> &str {
        &self.slug.repo
    }

    #[must_use]
    pub fn target(&self) -> &Target {
        &self.target
    }
}

fn compile(pattern: &str) -> Result<Regex, Error> {
    Regex::new(pattern).map_err(|e| Error::internal(e.to_string()))
}

fn invalid_pattern(kind: &str, url: &str) -> Error {
    GitHubError::InvalidUrlPattern {
        kind: kind.to_string(),
        url: url.to_string(),
    }
    .into()
}

/// `{web}/{owner}/{repo}/{filepath...}`
pub(crate) fn parse_raw_url(url: &str, hosts: &GitHubHosts) -> Result<DownloadRequest, Error> {
    let re = compile(&format!(
        r"^{}/([^/\s]+)/([^/\s]+)/(\S+)$",
        regex::escape(hosts.web())
    ))?;
    let caps = re
        .captures(url)
        .ok_or_else(|| invalid_pattern("GitHub Repository", url))?;

    Ok(DownloadRequest {
        url: url.to_string(),
        slug: RepoSlug::new(&caps[1], &caps[2]),
        target: Target::RawFile {
            filepath: caps[3].to_string(),
        },
    })
}

/// `{web}/{owner}/{repo}/releases/download/{tag}/{filename}`
pub(crate) fn parse_release_url(url: &str, hosts: &GitHubHosts) -> Result<DownloadRequest, Error> {
    let re = compile(&format!(
        r"^{}/([^/\s]+)/([^/\s]+)/releases/download/([^/\s]+)/(\S+)$",
        regex::escape(hosts.web())
    ))?;
    let caps = re
        .captures(url)
        .ok_or_else(|| invalid_pattern("GitHub Release", url))?;

    Ok(DownloadRequest {
        url: url.to_string(),
        slug: RepoSlug::new(&caps[1], &caps[2]),
        target: Target::ReleaseAsset {
            tag: caps[3].to_string(),
            filename: caps[4].to_string(),
        },
    })
}

/// Insert the token as userinfo: `https://host` becomes `https://{token}@host`
pub(crate) fn with_userinfo(base: &str, credential: &Credential) -> Result<String, Error> {
    let (scheme, rest) = base
        .split_once("://")
        .ok_or_else(|| Error::internal(format!("base URL has no scheme: {base}")))?;
    Ok(format!("{scheme}://{}@{rest}", credential.expose()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hosts() -> GitHubHosts {
        GitHubHosts::default()
    }

    #[test]
    fn test_raw_url_extraction() {
        let req = parse_raw_url("https://github.com/acme/widget/main/file.zip", &hosts()).unwrap();
        assert_eq!(req.owner(), "acme");
        assert_eq!(req.repo(), "widget");
        assert_eq!(
            req.target(),
            &Target::RawFile {
                filepath: "main/file.zip".into()
            }
        );

        let req = parse_raw_url(
            "https://github.com/acme/widget/raw/v1.2/dist/deep/tool.tar.gz",
            &hosts(),
        )
        .unwrap();
        assert_eq!(
            req.target(),
            &Target::RawFile {
                filepath: "raw/v1.2/dist/deep/tool.tar.gz".into()
            }
        );
        assert_eq!(
            req.url(),
            "https://github.com/acme/widget/raw/v1.2/dist/deep/tool.tar.gz"
        );
    }

    #[test]
    fn test_raw_url_rejects_malformed() {
        for url in [
            "",
            "https://github.com/acme/widget",
            "https://github.com/acme/widget/",
            "https://github.com/acme",
            "https://gitlab.com/acme/widget/main/file.zip",
            "http://github.com/acme/widget/main/file.zip",
            "https://GitHub.com/acme/widget/main/file.zip",
            "https://github.com/acme/widget/main/has space.zip",
            "see https://github.com/acme/widget/main/file.zip",
        ] {
            let err = parse_raw_url(url, &hosts()).unwrap_err();
            assert!(
                matches!(err, Error::GitHub(GitHubError::InvalidUrlPattern { .. })),
                "{url} should be rejected"
            );
        }
    }

    #[test]
    fn test_release_url_extraction() {
        let req = parse_release_url(
            "https://github.com/mindvalley/wukong-cli/releases/download/0.0.1-dev/wukong-v0.0.1-dev-macOS-arm.tar.gz",
            &hosts(),
        )
        .unwrap();
        assert_eq!(req.owner(), "mindvalley");
        assert_eq!(req.repo(), "wukong-cli");
        assert_eq!(
            req.target(),
            &Target::ReleaseAsset {
                tag: "0.0.1-dev".into(),
                filename: "wukong-v0.0.1-dev-macOS-arm.tar.gz".into(),
            }
        );
    }

    #[test]
    fn test_release_url_requires_download_segment() {
        for url in [
            "https://github.com/acme/widget/main/file.zip",
            "https://github.com/acme/widget/releases/v1/file.zip",
            "https://github.com/acme/widget/releases/download/v1",
            "https://github.com/acme/widget/releases/download/v1/",
        ] {
            let err = parse_release_url(url, &hosts()).unwrap_err();
            assert!(
                matches!(err, Error::GitHub(GitHubError::InvalidUrlPattern { ref kind, .. }) if kind == "GitHub Release"),
                "{url} should be rejected"
            );
        }
    }

    #[test]
    fn test_custom_web_host() {
        let web = Url::parse("http://127.0.0.1:8080/").unwrap();
        let api = Url::parse("http://127.0.0.1:8080/api/v3").unwrap();
        let hosts = GitHubHosts::new(&web, &api);
        assert_eq!(hosts.web(), "http://127.0.0.1:8080");
        assert_eq!(hosts.api(), "http://127.0.0.1:8080/api/v3");

        let req = parse_raw_url("http://127.0.0.1:8080/acme/widget/a.txt", &hosts).unwrap();
        assert_eq!(req.owner(), "acme");
        // Regex metacharacters in the host are escaped
        assert!(parse_raw_url("http://127x0.0.1:8080/acme/widget/a.txt", &hosts).is_err());
    }

    #[test]
    fn test_with_userinfo() {
        let credential = Credential::new("T").unwrap();
        assert_eq!(
            with_userinfo("https://github.com", &credential).unwrap(),
            "https://T@github.com"
        );
        assert!(with_userinfo("github.com", &credential).is_err());
    }
}
