use std::time::Duration;

use bon::Builder;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::filter::LevelFilter;

use crate::cli::control::ControlArgs;
use crate::cli::decode::DecodeArgs;
use crate::cli::encode::EncodeArgs;
use crate::cli::listen::ListenArgs;
use crate::error::{CliConfigError, FixtureError};
use crate::hw::{FakeBackendConfig, HexPayload, NotificationPayloads, ScanFixture};

/// Command-line options for the AQ-S control tool.
#[derive(Debug, Parser)]
#[command(
    name = "aqs",
    about = "Drive AQ-S aquarium light fixtures over their frame protocol."
)]
pub struct Args {
    /// Overrides the telemetry log level.
    #[arg(long, global = true, value_enum)]
    log_level: Option<LogLevel>,
    /// Output format; defaults to pretty on a terminal and JSON otherwise.
    #[arg(long, global = true, value_enum)]
    output: Option<OutputFormat>,
    /// Uses the fake transport backend with fixture-driven discovery and payloads.
    #[arg(long, global = true)]
    fake: bool,
    /// Fake scan fixtures in the form `adapter|device_id|local_name|rssi;...`.
    #[arg(long, global = true, requires = "fake", required_if_eq("fake", "true"))]
    fake_scan: Option<ScanFixture>,
    /// Fake initial state read as hexadecimal frame bytes.
    #[arg(long, global = true, requires = "fake")]
    fake_read: Option<HexPayload>,
    /// Fake notification frames as comma-separated hexadecimal payloads.
    #[arg(long, global = true, requires = "fake")]
    fake_notifications: Option<NotificationPayloads>,
    /// Artificial fake scan delay (e.g. `250ms`, `2s`).
    #[arg(long, global = true, requires = "fake", value_parser = parse_duration)]
    fake_discovery_delay: Option<Duration>,
    #[command(subcommand)]
    command: Command,
}

impl Args {
    /// Creates argument values directly without CLI parsing.
    ///
    /// ```
    /// use aqs::{Args, Command, ListenArgs};
    ///
    /// let listen = Args::new(Command::Listen(ListenArgs::new(Some(10))));
    /// let _ = listen;
    /// ```
    #[must_use]
    pub fn new(command: Command) -> Self {
        Self {
            log_level: None,
            output: None,
            fake: false,
            fake_scan: None,
            fake_read: None,
            fake_notifications: None,
            fake_discovery_delay: None,
            command,
        }
    }

    /// Enables fake transport mode with pre-parsed fake configuration.
    #[must_use]
    pub fn with_fake(mut self, fake: FakeArgs) -> Self {
        let FakeArgs {
            scan_fixture,
            initial_read,
            notifications,
            discovery_delay,
        } = fake;

        self.fake = true;
        self.fake_scan = Some(scan_fixture);
        self.fake_read = initial_read;
        self.fake_notifications = notifications;
        self.fake_discovery_delay = Some(discovery_delay);
        self
    }

    /// Returns the telemetry log-level override, if any.
    #[must_use]
    pub fn log_level(&self) -> Option<LogLevel> {
        self.log_level
    }

    /// Returns the explicitly requested output format, if any.
    #[must_use]
    pub fn output_format(&self) -> Option<OutputFormat> {
        self.output
    }

    /// Splits parsed CLI arguments into command and optional fake settings.
    ///
    /// # Errors
    ///
    /// Returns an error if CLI backend configuration is invalid.
    pub fn into_command_and_fake_args(self) -> anyhow::Result<(Command, Option<FakeArgs>)> {
        let Args {
            log_level: _,
            output: _,
            fake,
            fake_scan,
            fake_read,
            fake_notifications,
            fake_discovery_delay,
            command,
        } = self;

        let fake_args = if fake {
            let Some(scan_fixture) = fake_scan else {
                return Err(CliConfigError::MissingFakeScanFixture.into());
            };
            Some(FakeArgs {
                scan_fixture,
                initial_read: fake_read,
                notifications: fake_notifications,
                discovery_delay: fake_discovery_delay.unwrap_or(Duration::ZERO),
            })
        } else {
            None
        };

        Ok((command, fake_args))
    }
}

/// Fake transport arguments for programmatic runs.
#[derive(Debug, Builder)]
pub struct FakeArgs {
    #[builder(with = |value: &str| -> std::result::Result<_, FixtureError> { value.parse() })]
    scan_fixture: ScanFixture,
    #[builder(with = |value: &str| -> std::result::Result<_, FixtureError> { value.parse() })]
    initial_read: Option<HexPayload>,
    #[builder(with = |value: &str| -> std::result::Result<_, FixtureError> { value.parse() })]
    notifications: Option<NotificationPayloads>,
    #[builder(default)]
    discovery_delay: Duration,
}

impl FakeArgs {
    pub(crate) fn into_backend_config(self) -> FakeBackendConfig {
        let Self {
            scan_fixture,
            initial_read,
            notifications,
            discovery_delay,
        } = self;

        FakeBackendConfig::builder()
            .scan_fixture(scan_fixture)
            .maybe_initial_read(initial_read)
            .maybe_notifications(notifications)
            .discovery_delay(discovery_delay)
            .build()
    }
}

/// Telemetry log level selected on the command line.
#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
pub enum LogLevel {
    /// Errors only.
    Error,
    /// Warnings and errors.
    Warn,
    /// Informational logging.
    Info,
    /// Debug logging.
    Debug,
    /// Full trace logging.
    Trace,
}

impl LogLevel {
    pub(crate) fn as_level_filter(self) -> LevelFilter {
        match self {
            Self::Error => LevelFilter::ERROR,
            Self::Warn => LevelFilter::WARN,
            Self::Info => LevelFilter::INFO,
            Self::Debug => LevelFilter::DEBUG,
            Self::Trace => LevelFilter::TRACE,
        }
    }
}

/// Output rendering selected on the command line.
#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Human-oriented tables and colour.
    Pretty,
    /// Machine-oriented JSON lines.
    Json,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Encode one textual command into a wire frame without connecting.
    Encode(EncodeArgs),
    /// Decode one hexadecimal state frame without connecting.
    Decode(DecodeArgs),
    /// Scan until the first AQ-S fixture is found, connect, then send one control command.
    Control(ControlArgs),
    /// Scan until the first AQ-S fixture is found, connect, read once, then stream state notifications.
    Listen(ListenArgs),
}

fn parse_duration(value: &str) -> Result<Duration, String> {
    humantime::parse_duration(value).map_err(|error| error.to_string())
}
