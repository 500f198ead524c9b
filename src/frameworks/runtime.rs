// Framework bootstrap: logging, configuration and task wiring for a replay session.

use crate::frameworks::config::{self, ConfigError, SettingsFile};
use crate::interface_adapters::report::report_serializer;
use crate::interface_adapters::script::{ScriptError, feed_script};
use crate::use_cases::{GrenadeFlag, Session, SimulatedHost, session_task};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncWrite};
use tokio::sync::{Notify, mpsc};

/// Loads `.env`, installs the tracing subscriber and the panic hook. Call once per process.
pub fn init_runtime() {
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    // Reports own stdout; logs go to stderr.
    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

/// Knobs for a single replay run.
#[derive(Debug, Clone)]
pub struct ReplayOptions {
    pub command_channel_capacity: usize,
    pub report_channel_capacity: usize,
    pub rng_seed: Option<u64>,
    pub settings: Option<SettingsFile>,
}

impl Default for ReplayOptions {
    fn default() -> Self {
        Self {
            command_channel_capacity: config::DEFAULT_COMMAND_CHANNEL_CAPACITY,
            report_channel_capacity: config::DEFAULT_REPORT_CHANNEL_CAPACITY,
            rng_seed: None,
            settings: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplaySummary {
    pub commands_sent: u64,
    pub commands_processed: u64,
    pub reports_written: u64,
}

#[derive(Debug)]
pub enum ReplayError {
    Config(ConfigError),
    Script(ScriptError),
    Io(std::io::Error),
    Task(tokio::task::JoinError),
}

impl std::fmt::Display for ReplayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReplayError::Config(e) => write!(f, "{e}"),
            ReplayError::Script(e) => write!(f, "{e}"),
            ReplayError::Io(e) => write!(f, "failed to write reports: {e}"),
            ReplayError::Task(e) => write!(f, "session task failed: {e}"),
        }
    }
}

impl std::error::Error for ReplayError {}

impl From<ConfigError> for ReplayError {
    fn from(e: ConfigError) -> Self {
        ReplayError::Config(e)
    }
}

impl From<ScriptError> for ReplayError {
    fn from(e: ScriptError) -> Self {
        ReplayError::Script(e)
    }
}

impl From<std::io::Error> for ReplayError {
    fn from(e: std::io::Error) -> Self {
        ReplayError::Io(e)
    }
}

impl From<tokio::task::JoinError> for ReplayError {
    fn from(e: tokio::task::JoinError) -> Self {
        ReplayError::Task(e)
    }
}

/// Replays a host command script through the grenade plugin, writing reports to `out`.
pub async fn run<R, W>(script: R, out: W, options: ReplayOptions) -> Result<ReplaySummary, ReplayError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let rng = match options.rng_seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    let mut session = Session::new(SimulatedHost::new(), GrenadeFlag::new(rng));
    // Overrides land after registration so they win over plugin defaults.
    if let Some(settings) = &options.settings {
        settings.apply(&mut session.host);
    }

    // command_tx/rx: host commands go to the single session task, in order.
    let (command_tx, command_rx) = mpsc::channel(options.command_channel_capacity);
    // report_tx/rx: session reports go to the serializer.
    let (report_tx, report_rx) = mpsc::channel(options.report_channel_capacity);
    let shutdown = Arc::new(Notify::new());

    let session_handle = tokio::spawn(session_task(command_rx, report_tx, session, shutdown.clone()));
    let serializer_handle = tokio::spawn(report_serializer(report_rx, out));

    // Dropping the sender after the script ends lets the session drain and exit.
    let fed = feed_script(script, command_tx).await;
    if fed.is_err() {
        shutdown.notify_one();
    }

    let session = session_handle.await?;
    let reports_written = serializer_handle.await??;
    let commands_sent = fed?;

    tracing::info!(commands_sent, reports_written, "replay finished");
    Ok(ReplaySummary {
        commands_sent,
        commands_processed: session.commands_processed,
        reports_written,
    })
}

/// Runs a replay configured from the environment and `GRENADE_CONFIG`.
pub async fn run_with_config<R, W>(script: R, out: W) -> Result<ReplaySummary, ReplayError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let settings = match config::settings_path() {
        Some(path) => {
            let file = SettingsFile::load(&path).inspect_err(|e| {
                tracing::error!(path = %path.display(), error = %e, "failed to load settings");
            })?;
            tracing::debug!(path = %path.display(), "settings loaded");
            Some(file)
        }
        None => None,
    };

    run(
        script,
        out,
        ReplayOptions {
            command_channel_capacity: config::command_channel_capacity(),
            report_channel_capacity: config::report_channel_capacity(),
            rng_seed: config::rng_seed(),
            settings,
        },
    )
    .await
}
