use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Transfer events
///
/// `url` is always the public URL the caller supplied, never the
/// authenticated one, so events are safe to log.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DownloadEvent {
    /// Transfer started
    Started {
        url: String,
        package: Option<String>,
        total_size: Option<u64>,
    },

    /// Transfer continuing from bytes already on disk
    Resuming {
        url: String,
        resume_offset: u64,
    },

    /// Transfer progress update
    Progress {
        url: String,
        bytes_downloaded: u64,
        total_bytes: Option<u64>,
    },

    /// Transfer finished
    Completed {
        url: String,
        package: Option<String>,
        final_size: u64,
        total_time: Duration,
    },

    /// Partial file already held every byte the server has
    AlreadyComplete { url: String, size: u64 },

    /// Transfer failed
    Failed {
        url: String,
        package: Option<String>,
        error: String,
        bytes_downloaded: u64,
    },
}
