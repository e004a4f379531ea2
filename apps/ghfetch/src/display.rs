//! Output rendering and formatting

use crate::events::format_bytes;
use console::Style;
use ghfetch_types::AssetId;
use serde::Serialize;
use std::io;
use std::path::PathBuf;

/// Result of a command, rendered once the command has finished
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum CommandOutput {
    Fetched {
        url: String,
        strategy: String,
        path: PathBuf,
        size: u64,
        resumed_from: u64,
    },
    Resolved {
        owner: String,
        repo: String,
        tag: String,
        filename: String,
        asset_id: AssetId,
    },
    DownloadUrl {
        strategy: String,
        url: String,
    },
}

/// Output renderer for CLI results
#[derive(Clone)]
pub struct OutputRenderer {
    json_output: bool,
    colors_enabled: bool,
}

impl OutputRenderer {
    pub fn new(json_output: bool, colors_enabled: bool) -> Self {
        Self {
            json_output,
            colors_enabled,
        }
    }

    /// Render a command result to stdout
    pub fn render_result(&self, output: &CommandOutput) -> io::Result<()> {
        if self.json_output {
            let json = serde_json::to_string_pretty(output).map_err(io::Error::other)?;
            println!("{json}");
        } else {
            println!("{}", self.render_text(output));
        }
        Ok(())
    }

    fn label(&self, text: &str) -> String {
        if self.colors_enabled {
            Style::new().bold().apply_to(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn render_text(&self, output: &CommandOutput) -> String {
        match output {
            CommandOutput::Fetched {
                path,
                size,
                resumed_from,
                ..
            } => {
                let mut text = format!(
                    "{} {} ({})",
                    self.label("Saved"),
                    path.display(),
                    format_bytes(*size)
                );
                if *resumed_from > 0 {
                    text.push_str(&format!(", resumed after {}", format_bytes(*resumed_from)));
                }
                text
            }
            CommandOutput::Resolved {
                owner,
                repo,
                tag,
                filename,
                asset_id,
            } => [
                format!("{}  {owner}/{repo}", self.label("repository:")),
                format!("{}     {tag}", self.label("release:")),
                format!("{}       {filename}", self.label("asset:")),
                format!("{}    {asset_id}", self.label("asset id:")),
            ]
            .join("\n"),
            CommandOutput::DownloadUrl { url, .. } => url.clone(),
        }
    }
}
