//! Structured logging integration for events
//!
//! Every event that reaches the CLI is also recorded through `tracing` with
//! its fields attached, so `--debug` log files carry the full history of a
//! download.

use ghfetch_events::{AppEvent, DownloadEvent, GeneralEvent, GitHubEvent};
use tracing::{debug, error, info, warn};

/// Log an `AppEvent` using the tracing infrastructure with structured fields
pub fn log_event_with_tracing(event: &AppEvent) {
    match event {
        AppEvent::General(general_event) => log_general(general_event),
        AppEvent::Download(download_event) => log_download(download_event),
        AppEvent::GitHub(github_event) => log_github(github_event),
    }
}

fn log_general(event: &GeneralEvent) {
    match event {
        GeneralEvent::OperationStarted { operation } => {
            info!(target: "ghfetch::events::general", operation = %operation, "Operation started");
        }
        GeneralEvent::OperationCompleted { operation, success } => {
            info!(
                target: "ghfetch::events::general",
                operation = %operation,
                success = success,
                "Operation completed"
            );
        }
        GeneralEvent::OperationFailed { operation, error } => {
            error!(
                target: "ghfetch::events::general",
                operation = %operation,
                error = %error,
                "Operation failed"
            );
        }
    }
}

fn log_download(event: &DownloadEvent) {
    match event {
        DownloadEvent::Started {
            url,
            package,
            total_size,
        } => {
            info!(
                target: "ghfetch::events::download",
                url = %url,
                package = ?package,
                total_size = ?total_size,
                "Download started"
            );
        }
        DownloadEvent::Resuming { url, resume_offset } => {
            info!(
                target: "ghfetch::events::download",
                url = %url,
                resume_offset = resume_offset,
                "Resuming download"
            );
        }
        DownloadEvent::Progress {
            url,
            bytes_downloaded,
            total_bytes,
        } => {
            debug!(
                target: "ghfetch::events::download",
                url = %url,
                bytes_downloaded = bytes_downloaded,
                total_bytes = ?total_bytes,
                "Download progress"
            );
        }
        DownloadEvent::Completed {
            url,
            package,
            final_size,
            total_time,
        } => {
            info!(
                target: "ghfetch::events::download",
                url = %url,
                package = ?package,
                final_size = final_size,
                elapsed_ms = u64::try_from(total_time.as_millis()).unwrap_or(u64::MAX),
                "Download completed"
            );
        }
        DownloadEvent::AlreadyComplete { url, size } => {
            info!(
                target: "ghfetch::events::download",
                url = %url,
                size = size,
                "Download already complete"
            );
        }
        DownloadEvent::Failed {
            url,
            package,
            error,
            bytes_downloaded,
        } => {
            error!(
                target: "ghfetch::events::download",
                url = %url,
                package = ?package,
                bytes_downloaded = bytes_downloaded,
                error = %error,
                "Download failed"
            );
        }
    }
}

fn log_github(event: &GitHubEvent) {
    match event {
        GitHubEvent::ValidatingAccess { owner, repo } => {
            debug!(target: "ghfetch::events::github", owner = %owner, repo = %repo, "Validating repository access");
        }
        GitHubEvent::AccessValidated { owner, repo } => {
            info!(target: "ghfetch::events::github", owner = %owner, repo = %repo, "Repository access validated");
        }
        GitHubEvent::AccessDenied { owner, repo } => {
            error!(target: "ghfetch::events::github", owner = %owner, repo = %repo, "Repository access denied");
        }
        GitHubEvent::ResolvingAsset {
            owner,
            repo,
            tag,
            filename,
        } => {
            debug!(
                target: "ghfetch::events::github",
                owner = %owner,
                repo = %repo,
                tag = %tag,
                filename = %filename,
                "Resolving release asset"
            );
        }
        GitHubEvent::AssetResolved {
            owner,
            repo,
            tag,
            filename,
            asset_id,
        } => {
            info!(
                target: "ghfetch::events::github",
                owner = %owner,
                repo = %repo,
                tag = %tag,
                filename = %filename,
                asset_id = %asset_id,
                "Release asset resolved"
            );
        }
        GitHubEvent::DuplicateAssets {
            tag,
            filename,
            count,
        } => {
            warn!(
                target: "ghfetch::events::github",
                tag = %tag,
                filename = %filename,
                count = count,
                "Release has several assets with this name, using the first"
            );
        }
        GitHubEvent::AssetNotFound {
            owner,
            repo,
            tag,
            filename,
        } => {
            error!(
                target: "ghfetch::events::github",
                owner = %owner,
                repo = %repo,
                tag = %tag,
                filename = %filename,
                "Release asset not found"
            );
        }
    }
}
