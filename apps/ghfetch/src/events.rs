//! Event handling and progress display

use crate::logging::log_event_with_tracing;
use console::{style, Term};
use ghfetch_events::{AppEvent, DownloadEvent, GitHubEvent};
use std::collections::HashSet;

/// Event handler for progress display and user feedback
///
/// All output goes to stderr so stdout stays clean for results.
pub struct EventHandler {
    term: Term,
    colors_enabled: bool,
    debug_enabled: bool,
    quiet: bool,
    /// URLs with a progress line currently on screen
    progress_lines: HashSet<String>,
}

impl EventHandler {
    pub fn new(colors_enabled: bool, debug_enabled: bool, quiet: bool) -> Self {
        Self {
            term: Term::stderr(),
            colors_enabled,
            debug_enabled,
            quiet,
            progress_lines: HashSet::new(),
        }
    }

    /// Handle incoming event
    pub fn handle_event(&mut self, event: AppEvent) {
        if self.debug_enabled {
            log_event_with_tracing(&event);
        }
        if self.quiet {
            return;
        }

        match event {
            // Operation lifecycle is logged only; the final error is reported once by main
            AppEvent::General(_) => {}
            AppEvent::Download(download) => self.handle_download(download),
            AppEvent::GitHub(github) => self.handle_github(github),
        }
    }

    fn handle_download(&mut self, event: DownloadEvent) {
        match event {
            DownloadEvent::Started { url, package, .. } => {
                let label = package.unwrap_or_else(|| file_name(&url).to_string());
                self.show_status(&format!("Downloading {label}"));
            }
            DownloadEvent::Resuming { resume_offset, .. } => {
                self.show_dim(&format!("Resuming after {}", format_bytes(resume_offset)));
            }
            DownloadEvent::Progress {
                url,
                bytes_downloaded,
                total_bytes,
            } => self.show_progress(&url, bytes_downloaded, total_bytes),
            DownloadEvent::Completed {
                url,
                final_size,
                total_time,
                ..
            } => {
                self.finish_progress(&url);
                self.show_success(&format!(
                    "Downloaded {} ({}) in {:.1}s",
                    file_name(&url),
                    format_bytes(final_size),
                    total_time.as_secs_f64()
                ));
            }
            DownloadEvent::AlreadyComplete { url, size } => {
                self.show_dim(&format!(
                    "{} already complete ({})",
                    file_name(&url),
                    format_bytes(size)
                ));
            }
            DownloadEvent::Failed { url, .. } => {
                // The error itself is reported once by main
                self.finish_progress(&url);
            }
        }
    }

    fn handle_github(&mut self, event: GitHubEvent) {
        match event {
            GitHubEvent::ValidatingAccess { owner, repo } => {
                if self.debug_enabled {
                    self.show_dim(&format!("Checking access to {owner}/{repo}"));
                }
            }
            GitHubEvent::AssetResolved {
                filename, asset_id, ..
            } => {
                self.show_dim(&format!("Resolved {filename} to asset {asset_id}"));
            }
            GitHubEvent::DuplicateAssets {
                tag,
                filename,
                count,
            } => {
                self.show_warning(&format!(
                    "release {tag} has {count} assets named {filename}, using the first"
                ));
            }
            GitHubEvent::AccessValidated { .. }
            | GitHubEvent::AccessDenied { .. }
            | GitHubEvent::ResolvingAsset { .. }
            | GitHubEvent::AssetNotFound { .. } => {}
        }
    }

    fn show_progress(&mut self, url: &str, bytes: u64, total: Option<u64>) {
        let line = match total {
            Some(total) if total > 0 => {
                #[allow(clippy::cast_precision_loss)]
                let percent = bytes as f64 / total as f64 * 100.0;
                format!(
                    "  {} / {} ({percent:.0}%)",
                    format_bytes(bytes),
                    format_bytes(total)
                )
            }
            _ => format!("  {}", format_bytes(bytes)),
        };

        if !self.term.is_term() {
            return;
        }
        if !self.progress_lines.insert(url.to_string()) {
            let _ = self.term.clear_line();
        }
        let _ = self.term.write_str(&line);
    }

    fn finish_progress(&mut self, url: &str) {
        if self.progress_lines.remove(url) {
            let _ = self.term.clear_line();
        }
    }

    fn paint(&self, message: &str, styled: console::StyledObject<&str>) -> String {
        if self.colors_enabled {
            styled.to_string()
        } else {
            message.to_string()
        }
    }

    fn show_status(&self, message: &str) {
        let _ = self.term.write_line(&self.paint(message, style(message).bold()));
    }

    fn show_success(&self, message: &str) {
        let _ = self.term.write_line(&self.paint(message, style(message).green()));
    }

    fn show_dim(&self, message: &str) {
        let _ = self.term.write_line(&self.paint(message, style(message).dim()));
    }

    fn show_warning(&self, message: &str) {
        let text = format!("warning: {message}");
        let _ = self.term.write_line(&self.paint(&text, style(text.as_str()).yellow()));
    }
}

/// Last path segment of a URL
fn file_name(url: &str) -> &str {
    url.rsplit('/').find(|s| !s.is_empty()).unwrap_or(url)
}

/// Human-readable byte count
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KiB", "MiB", "GiB", "TiB"];
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    #[allow(clippy::cast_precision_loss)]
    let mut value = bytes as f64 / 1024.0;
    let mut unit = UNITS[0];
    for next in UNITS.iter().skip(1).copied() {
        if value < 1024.0 {
            break;
        }
        value /= 1024.0;
        unit = next;
    }
    format!("{value:.1} {unit}")
}
