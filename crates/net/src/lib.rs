#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Network operations for ghfetch
//!
//! This crate owns all HTTP traffic: the pooled client, resumable file
//! transfers, and the GitHub metadata queries used to validate access and
//! resolve release assets.

mod client;
mod github;
mod transfer;

pub use client::{NetClient, NetConfig};
pub use github::{GitHubApi, GitHubClient};
pub use transfer::{
    partial_size, HttpTransport, Transport, TransferOutcome, TransferRequest,
};

use url::Url;

/// Render a URL without its userinfo so it can be logged
#[must_use]
pub fn redact_url(url: &Url) -> String {
    if url.username().is_empty() && url.password().is_none() {
        return url.to_string();
    }
    let mut redacted = url.clone();
    // Only fails for cannot-be-a-base URLs, which carry no userinfo anyway
    let _ = redacted.set_username("");
    let _ = redacted.set_password(None);
    redacted.to_string()
}

/// [`redact_url`] for a string that may not parse
#[must_use]
pub fn redact_url_str(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => redact_url(&parsed),
        Err(_) => "<invalid url>".to_string(),
    }
}

/// Render a URL with its userinfo replaced by `***`, keeping its shape visible
#[must_use]
pub fn mask_url(url: &Url) -> String {
    if url.username().is_empty() && url.password().is_none() {
        return url.to_string();
    }
    let mut masked = url.clone();
    let _ = masked.set_username("***");
    let _ = masked.set_password(None);
    masked.to_string()
}

/// [`mask_url`] for a string that may not parse
#[must_use]
pub fn mask_url_str(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => mask_url(&parsed),
        Err(_) => "<invalid url>".to_string(),
    }
}
