#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Core type definitions for ghfetch
//!
//! This crate provides the data types shared between the network layer, the
//! download strategies and the CLI: credentials, repository coordinates, and
//! the subset of the GitHub REST models the strategies consume.

pub mod credential;
pub mod github;
pub mod package;

pub use credential::{Credential, DEFAULT_TOKEN_ENV};
pub use github::{AssetId, Release, ReleaseAsset, RepoSlug, Repository};
pub use package::PackageRef;

use serde::{Deserialize, Serialize};

/// Color output choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    Always,
    #[default]
    Auto,
    Never,
}

impl clap::ValueEnum for ColorChoice {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Always, Self::Auto, Self::Never]
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(match self {
            Self::Always => clap::builder::PossibleValue::new("always"),
            Self::Auto => clap::builder::PossibleValue::new("auto"),
            Self::Never => clap::builder::PossibleValue::new("never"),
        })
    }
}
