// # cfdns - DNS record updater
//
// Thin command-line front end over `cfdns-core`:
// 1. Read configuration from environment variables
// 2. Initialize logging and the runtime
// 3. Run one name-addressed record update
// 4. Map the outcome to an exit code
//
// All API and workflow logic lives in `cfdns-core`.
//
// ## Configuration
//
// - `CFDNS_API_TOKEN`: API token (required)
// - `CFDNS_ZONE`: Zone name, e.g. `example.com` (required)
// - `CFDNS_RECORD_NAME`: Record name, e.g. `www.example.com` (required)
// - `CFDNS_CONTENT`: New record content, e.g. `1.2.3.4` (required)
// - `CFDNS_RECORD_TYPE`: Record type (default: `A`)
// - `CFDNS_BASE_URL`: API base endpoint (default: Cloudflare API v4)
// - `CFDNS_TIMEOUT_SECS`: Per-request timeout and overall deadline scale (default: 30)
// - `CFDNS_LOG_LEVEL`: trace, debug, info, warn, error (default: info)
//
// ## Example
//
// ```bash
// export CFDNS_API_TOKEN=your_token
// export CFDNS_ZONE=example.com
// export CFDNS_RECORD_NAME=www.example.com
// export CFDNS_CONTENT=1.2.3.4
//
// cfdns
// ```

use anyhow::{Context, Result};
use cfdns_core::config::DEFAULT_BASE_URL;
use cfdns_core::{CancellationToken, Client, ClientConfig, RecordUpdate, updater};
use cfdns_http::HttpTransport;
use std::env;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Each of the three API calls gets one transport timeout; the whole run
/// gets this many of them before it is cancelled.
const DEADLINE_CALLS: u32 = 3;

/// Exit codes for different termination scenarios
#[derive(Debug, Clone, Copy)]
enum CfdnsExitCode {
    /// Record updated
    Success = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// The update failed
    UpdateFailed = 2,
    /// Interrupted by a signal or the overall deadline
    Cancelled = 3,
}

impl From<CfdnsExitCode> for ExitCode {
    fn from(code: CfdnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration
struct Config {
    client: ClientConfig,
    update: RecordUpdate,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        let api_token =
            env::var("CFDNS_API_TOKEN").context("CFDNS_API_TOKEN is required")?;

        let timeout_secs = match env::var("CFDNS_TIMEOUT_SECS") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("CFDNS_TIMEOUT_SECS is not a number: {raw}"))?,
            Err(_) => 30,
        };

        let client = ClientConfig::new(api_token)
            .with_base_url(
                env::var("CFDNS_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            )
            .with_timeout_secs(timeout_secs);

        let update = RecordUpdate::new(
            env::var("CFDNS_ZONE").unwrap_or_default(),
            env::var("CFDNS_RECORD_TYPE").unwrap_or_else(|_| "A".to_string()),
            env::var("CFDNS_RECORD_NAME").unwrap_or_default(),
            env::var("CFDNS_CONTENT").unwrap_or_default(),
        );

        Ok(Self {
            client,
            update,
            log_level: env::var("CFDNS_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        self.client.validate()?;
        self.update.validate()?;

        if self.client.timeout_secs > 300 {
            anyhow::bail!(
                "CFDNS_TIMEOUT_SECS must be between 1 and 300 seconds. Got: {}",
                self.client.timeout_secs
            );
        }

        if self.client.base_url.starts_with("http://") {
            eprintln!(
                "WARNING: CFDNS_BASE_URL uses HTTP (not HTTPS). \
                The API token will be sent in clear text."
            );
        }

        parse_log_level(&self.log_level)?;
        Ok(())
    }
}

fn parse_log_level(raw: &str) -> Result<Level> {
    match raw.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => anyhow::bail!(
            "CFDNS_LOG_LEVEL '{}' is not valid. \
            Valid levels: trace, debug, info, warn, error",
            raw
        ),
    }
}

fn main() -> ExitCode {
    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return CfdnsExitCode::ConfigError.into();
        }
    };

    // Validate configuration
    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return CfdnsExitCode::ConfigError.into();
    }

    // Initialize tracing
    let log_level = parse_log_level(&config.log_level).unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return CfdnsExitCode::ConfigError.into();
    }

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return CfdnsExitCode::ConfigError.into();
        }
    };

    rt.block_on(run(config)).into()
}

/// Run one update, racing it against signals and the overall deadline
async fn run(config: Config) -> CfdnsExitCode {
    let timeout = Duration::from_secs(config.client.timeout_secs);
    let transport = match HttpTransport::new(timeout) {
        Ok(transport) => transport,
        Err(e) => {
            error!("{}", e);
            return CfdnsExitCode::ConfigError;
        }
    };

    let client = match Client::from_config(&config.client, Arc::new(transport)) {
        Ok(client) => client,
        Err(e) => {
            error!("{}", e);
            return CfdnsExitCode::ConfigError;
        }
    };

    let cancel = CancellationToken::new();
    let watcher = tokio::spawn(cancel_on_signal_or_deadline(
        cancel.clone(),
        timeout * DEADLINE_CALLS,
    ));

    info!(
        zone = %config.update.zone,
        record_type = %config.update.record_type,
        record_name = %config.update.record_name,
        "Updating record"
    );

    let result = updater::apply(&client, &cancel, &config.update).await;
    watcher.abort();

    match result {
        Ok(()) => {
            info!(
                record_name = %config.update.record_name,
                content = %config.update.content,
                "Record updated"
            );
            CfdnsExitCode::Success
        }
        Err(e) if e.is_cancelled() => {
            warn!("Update cancelled: {}", e);
            CfdnsExitCode::Cancelled
        }
        Err(e) => {
            error!("{}", e);
            CfdnsExitCode::UpdateFailed
        }
    }
}

/// Cancel `cancel` on SIGTERM/SIGINT or once `deadline` has passed
async fn cancel_on_signal_or_deadline(cancel: CancellationToken, deadline: Duration) {
    cancel_when(cancel, deadline, wait_for_shutdown_with_timeout(deadline)).await
}

/// Cancel once `wait` reports a signal or the deadline
///
/// If signal handling could not be set up, only the deadline cancels.
async fn cancel_when<F>(cancel: CancellationToken, deadline: Duration, wait: F)
where
    F: Future<Output = Result<Option<&'static str>>>,
{
    let started = tokio::time::Instant::now();
    match wait.await {
        Ok(Some(signal)) => info!("Received shutdown signal: {}", signal),
        Ok(None) => warn!("Deadline of {:?} exceeded", deadline),
        Err(e) => {
            warn!("{:#}; cancelling on the deadline only", e);
            tokio::time::sleep_until(started + deadline).await;
            warn!("Deadline of {:?} exceeded", deadline);
        }
    }
    cancel.cancel();
}

/// Wait for shutdown signals (SIGTERM, SIGINT) with a timeout
///
/// # Returns
///
/// Returns the name of the signal received, `None` once the timeout passes,
/// or an error if the signal handlers could not be installed.
#[cfg(unix)]
async fn wait_for_shutdown_with_timeout(timeout_duration: Duration) -> Result<Option<&'static str>> {
    use tokio::time::timeout;

    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {}", e))?;

    let received = timeout(timeout_duration, async {
        tokio::select! {
            _ = sigterm.recv() => "SIGTERM",
            _ = sigint.recv() => "SIGINT",
        }
    })
    .await;

    Ok(received.ok())
}

/// Wait for shutdown signals (SIGINT only) with a timeout
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
async fn wait_for_shutdown_with_timeout(timeout_duration: Duration) -> Result<Option<&'static str>> {
    use tokio::time::timeout;

    match timeout(timeout_duration, tokio::signal::ctrl_c()).await {
        Ok(Ok(())) => Ok(Some("SIGINT")),
        Ok(Err(e)) => Err(anyhow::anyhow!("Failed to wait for CTRL-C: {}", e)),
        Err(_) => Ok(None),
    }
}
