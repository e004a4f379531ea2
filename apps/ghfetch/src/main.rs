//! ghfetch - Download from private GitHub repositories
//!
//! Thin CLI over the download strategies: loads configuration, wires the
//! HTTP collaborators and renders events and results.

mod cli;
mod display;
mod error;
mod events;
mod logging;
mod setup;

use crate::cli::{Cli, Commands};
use crate::display::{CommandOutput, OutputRenderer};
use crate::error::CliError;
use crate::events::EventHandler;
use crate::setup::FetchSetup;
use clap::Parser;
use ghfetch_config::Config;
use ghfetch_events::{EventEmitter, EventReceiver, EventSender, FailureContext};
use ghfetch_strategy::{DownloadRequest, StrategyKind, Target};
use ghfetch_types::{ColorChoice, PackageRef};
use std::path::PathBuf;
use std::process;
use tokio::select;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Parse command line arguments first to check for JSON mode
    let cli = Cli::parse();
    let json_mode = cli.global.json;

    init_tracing(json_mode, cli.global.debug);

    if let Err(e) = run(cli).await {
        error!("Application error: {}", e);
        if json_mode {
            println!("{}", json_error(&e));
        } else {
            eprintln!("Error: {e}");
        }
        process::exit(1);
    }
}

/// Main application logic
async fn run(cli: Cli) -> Result<(), CliError> {
    info!("Starting ghfetch v{}", env!("CARGO_PKG_VERSION"));

    // 1. File config (or defaults)
    let mut config = Config::load_or_default(cli.global.config.as_deref()).await?;

    // 2. Environment variables
    config.merge_env()?;

    // 3. CLI flags (highest precedence)
    apply_cli_config(&mut config, &cli.global);
    config.validate()?;

    let colors_enabled = match config.general.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => console::Term::stderr().features().colors_supported(),
    };

    let (event_sender, event_receiver) = ghfetch_events::channel();
    let mut event_handler = EventHandler::new(colors_enabled, cli.global.debug, cli.global.json);

    let output = execute_command_with_events(
        cli.command,
        &config,
        event_sender,
        event_receiver,
        &mut event_handler,
    )
    .await?;

    OutputRenderer::new(cli.global.json, colors_enabled).render_result(&output)?;

    info!("Command completed successfully");
    Ok(())
}

/// Execute command with concurrent event handling
async fn execute_command_with_events(
    command: Commands,
    config: &Config,
    event_sender: EventSender,
    mut event_receiver: EventReceiver,
    event_handler: &mut EventHandler,
) -> Result<CommandOutput, CliError> {
    let mut command_future = Box::pin(execute_command(command, config, event_sender));

    loop {
        select! {
            result = &mut command_future => {
                // Drain any remaining events
                while let Ok(event) = event_receiver.try_recv() {
                    event_handler.handle_event(event);
                }
                return result;
            }

            event = event_receiver.recv() => {
                match event {
                    Some(event) => event_handler.handle_event(event),
                    None => { /* Channel closed: keep waiting for command to finish */ }
                }
            }
        }
    }
}

/// Execute the specified command
async fn execute_command(
    command: Commands,
    config: &Config,
    tx: EventSender,
) -> Result<CommandOutput, CliError> {
    let setup = FetchSetup::new(config, tx.clone())?;

    match command {
        Commands::Fetch {
            url,
            output,
            strategy,
            name,
            version,
        } => {
            let kind = strategy.strategy.resolve(&url);
            let package = name
                .map(|name| PackageRef::new(name, version))
                .unwrap_or_default();

            tx.emit_operation_started(format!("fetch {url}"));
            let downloader = setup.downloader(kind, &url, package).await?;
            let dest = match output {
                Some(path) => path,
                None => default_destination(downloader.request())?,
            };

            let result = match downloader.download_to(&dest).await {
                Ok(result) => result,
                Err(e) => {
                    tx.emit_operation_failed(format!("fetch {url}"), e.to_string());
                    return Err(e.into());
                }
            };
            tx.emit_operation_completed(format!("fetch {url}"), true);

            Ok(CommandOutput::Fetched {
                url,
                strategy: kind.to_string(),
                path: result.path,
                size: result.size,
                resumed_from: result.resumed_from,
            })
        }

        Commands::Resolve { url } => {
            let downloader = setup
                .downloader(StrategyKind::ReleaseAsset, &url, PackageRef::default())
                .await?;
            let asset_id = downloader.resolve_asset_id().await?;

            let request = downloader.request();
            let Target::ReleaseAsset { tag, filename } = request.target() else {
                return Err(CliError::InvalidArguments(format!(
                    "{url} is not a release download URL"
                )));
            };

            Ok(CommandOutput::Resolved {
                owner: request.owner().to_string(),
                repo: request.repo().to_string(),
                tag: tag.clone(),
                filename: filename.clone(),
                asset_id,
            })
        }

        Commands::Url { url, strategy } => {
            let kind = strategy.strategy.resolve(&url);
            let downloader = setup.downloader(kind, &url, PackageRef::default()).await?;
            let download_url = downloader.download_url().await?;

            Ok(CommandOutput::DownloadUrl {
                strategy: kind.to_string(),
                url: ghfetch_net::mask_url_str(&download_url),
            })
        }
    }
}

/// File name the download is saved under when `--output` is not given
fn default_destination(request: &DownloadRequest) -> Result<PathBuf, CliError> {
    let name = match request.target() {
        Target::RawFile { filepath } => filepath.rsplit('/').next().unwrap_or_default(),
        Target::ReleaseAsset { filename, .. } => filename.as_str(),
    };
    if name.is_empty() || name == "." || name == ".." {
        return Err(CliError::InvalidArguments(format!(
            "cannot derive a file name from {}, use --output",
            request.url()
        )));
    }
    Ok(PathBuf::from(name))
}

/// Error object printed on stdout in `--json` mode
fn json_error(e: &CliError) -> serde_json::Value {
    let failure = match e {
        CliError::Config(err) | CliError::Fetch(err) => FailureContext::from_error(err),
        other => FailureContext {
            code: None,
            message: other.to_string(),
            hint: None,
            retryable: false,
        },
    };
    serde_json::json!({ "error": failure })
}

/// Initialize tracing/logging
fn init_tracing(json_mode: bool, debug_enabled_flag: bool) {
    let debug_enabled = std::env::var("RUST_LOG").is_ok() || debug_enabled_flag;
    let debug_filter = || {
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            tracing_subscriber::EnvFilter::new(
                "info,ghfetch=debug,ghfetch_strategy=debug,ghfetch_net=debug",
            )
        })
    };

    if debug_enabled {
        // Debug mode: structured JSON logs to file
        let log_dir = Config::logs_dir();
        if let Err(e) = std::fs::create_dir_all(&log_dir) {
            if !json_mode {
                eprintln!("Warning: Failed to create log directory: {e}");
            }
        }

        let log_file = log_dir.join(format!(
            "ghfetch-{}.log",
            chrono::Utc::now().format("%Y%m%d-%H%M%S")
        ));

        match std::fs::File::create(&log_file) {
            Ok(file) => {
                tracing_subscriber::fmt()
                    .json()
                    .with_writer(file)
                    .with_env_filter(debug_filter())
                    .init();
                if !json_mode {
                    eprintln!("Debug logging enabled: {}", log_file.display());
                }
                return;
            }
            Err(e) => {
                if !json_mode {
                    eprintln!("Warning: Failed to create log file: {e}");
                }
            }
        }
    }

    if json_mode {
        // JSON mode: suppress all console output to avoid contaminating JSON
        tracing_subscriber::fmt()
            .with_writer(std::io::sink)
            .with_env_filter("off")
            .init();
    } else {
        // Normal mode: minimal logging to stderr
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                    tracing_subscriber::EnvFilter::new("warn")
                }),
            )
            .init();
    }
}

/// Apply CLI configuration overrides (highest precedence)
fn apply_cli_config(config: &mut Config, global: &cli::GlobalArgs) {
    if let Some(color) = global.color {
        config.general.color = color;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ghfetch_strategy::GitHubHosts;

    #[test]
    fn test_json_error() {
        let err = CliError::from(ghfetch_errors::Error::from(
            ghfetch_errors::GitHubError::MissingCredential {
                var: "HOMEBREW_GITHUB_API_TOKEN".into(),
            },
        ));
        let value = json_error(&err);
        assert_eq!(value["error"]["code"], "github.missing_credential");
        assert_eq!(value["error"]["retryable"], false);

        let value = json_error(&CliError::InvalidArguments("no file name".into()));
        assert_eq!(value["error"]["message"], "Invalid arguments: no file name");
        assert!(value["error"].get("code").is_none());
    }

    #[test]
    fn test_default_destination() {
        let hosts = GitHubHosts::default();
        let raw = StrategyKind::RawFile
            .parse_url("https://github.com/acme/widget/raw/main/dist/tool.tar.gz", &hosts)
            .unwrap();
        assert_eq!(
            default_destination(&raw).unwrap(),
            PathBuf::from("tool.tar.gz")
        );

        let release = StrategyKind::ReleaseAsset
            .parse_url(
                "https://github.com/acme/widget/releases/download/v1/b.tar.gz",
                &hosts,
            )
            .unwrap();
        assert_eq!(
            default_destination(&release).unwrap(),
            PathBuf::from("b.tar.gz")
        );

        let dir = StrategyKind::RawFile
            .parse_url("https://github.com/acme/widget/main/dist/", &hosts)
            .unwrap();
        assert!(default_destination(&dir).is_err());
    }
}
