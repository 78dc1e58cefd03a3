use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use vendor_expiry_service::background_jobs::jobs::{ExpiryAlertJob, VendorReportJob};
use vendor_expiry_service::background_jobs::{wait_for_stop, DailyScheduler, JobContext};
use vendor_expiry_service::config::{self, AppConfig, ConfigSource, TomlConfigFile};
use vendor_expiry_service::logging;
use vendor_expiry_service::notifier::SmtpNotifier;

/// How long to wait for a running job after Ctrl+C.
const SHUTDOWN_GRACE_PERIOD: Duration = Duration::from_secs(30);

fn parse_path(s: &str) -> Result<PathBuf, String> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(format!("Error resolving path '{}': {}", s, msg));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir().map_err(|e| format!("Failed to get current dir: {}", e))?;
    Ok(cwd.join(original_path))
}

/// Directory holding the running binary; default config and log files live there.
fn binary_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("Failed to locate the running binary")?;
    Ok(exe
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".")))
}

#[derive(Parser, Debug)]
#[clap(version, about = "Daily vendor document expiry alerts and reports")]
struct CliArgs {
    /// Path to TOML configuration file. Defaults to config.toml next to the binary.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Path to the append-only log file. Defaults to log.txt next to the binary.
    /// The `log_file` key in the config file takes precedence.
    #[clap(long, value_parser = parse_path)]
    pub log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    let cli_config = config::CliConfig {
        base_dir: binary_dir()?,
        config_path: cli_args.config.clone(),
        log_file: cli_args.log_file.clone(),
    };
    let config_source = TomlConfigFile::new(cli_config.config_path());
    let config_exists = config_source.path().exists();
    let file_config = config_source.load();

    // Logging first, so a broken config file is reported in the log file too
    let log_file = cli_config.log_file_for(file_config.as_ref().ok());
    logging::init_logging(&log_file)?;

    info!(
        "Vendor expiry service {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH")
    );

    let app_config = file_config
        .and_then(|file_config| AppConfig::resolve(&cli_config, Some(file_config)))
        .map_err(|e| {
            error!("Failed to start: {:#}", e);
            e
        })?;
    info!("Logging to {:?}", app_config.log_file);
    if config_exists {
        info!("Using config file {:?}", app_config.config_path);
    } else {
        warn!(
            "Config file {:?} not found, jobs will skip until it is created",
            app_config.config_path
        );
    }
    info!(
        "Sending mail through {}:{}",
        app_config.smtp.host, app_config.smtp.port
    );

    let notifier = Arc::new(SmtpNotifier::new(app_config.smtp.clone())?);

    let shutdown_token = CancellationToken::new();
    let job_context = JobContext::new(
        shutdown_token.child_token(),
        Arc::new(config_source),
        notifier,
    );

    let mut scheduler = DailyScheduler::new(shutdown_token.clone(), job_context);
    scheduler.register_job(Arc::new(ExpiryAlertJob::new()));
    scheduler.register_job(Arc::new(VendorReportJob::new()));

    let scheduler_handle = tokio::spawn(async move {
        scheduler.run().await;
    });
    info!("Service started.");

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl+C: {}", e);
    }
    info!("Received Ctrl+C, initiating graceful shutdown");
    shutdown_token.cancel();

    let stopped = wait_for_stop(scheduler_handle, SHUTDOWN_GRACE_PERIOD).await;
    info!("Service stopped.");

    if !stopped {
        // A job stuck in blocking I/O would keep the runtime from shutting down
        std::process::exit(1);
    }
    Ok(())
}
