use std::io;

use anyhow::Result;
use owo_colors::OwoColorize;
use tracing::instrument;
use tracing_indicatif::span_ext::IndicatifSpanExt;

use crate::cli::{Command, FakeArgs, LogLevel, OutputFormat};
use crate::hw::{
    DeviceSession, HardwareClient, fake_hardware_client as build_fake_hardware_client,
    unconfigured_hardware_client as build_unconfigured_hardware_client,
};
use crate::telemetry;
use crate::terminal::{SystemTerminalClient, TerminalClient};

const DEFAULT_DEVICE_NAME_PREFIX: &str = "AQ-S";

/// Creates a hardware client backed by fake transport fixtures.
#[must_use]
pub fn fake_hardware_client(fake_args: FakeArgs) -> Box<dyn HardwareClient> {
    build_fake_hardware_client(fake_args.into_backend_config())
}

/// Creates a hardware client for runs with no transport configured.
///
/// Device-bound commands fail at connect time with guidance; the codec
/// commands (`encode`, `decode`) never touch it.
#[must_use]
pub fn unconfigured_hardware_client() -> Box<dyn HardwareClient> {
    build_unconfigured_hardware_client()
}

/// Session-level app helper for acquiring an AQ-S connection.
pub struct SessionHandler {
    hardware_client: Box<dyn HardwareClient>,
    name_prefix: String,
}

impl SessionHandler {
    /// Creates a session handler using the default AQ-S name prefix.
    ///
    /// ```
    /// # async fn demo() -> anyhow::Result<()> {
    /// let handler = aqs::SessionHandler::new(aqs::unconfigured_hardware_client());
    /// let _ = handler;
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn new(hardware_client: Box<dyn HardwareClient>) -> Self {
        Self {
            hardware_client,
            name_prefix: DEFAULT_DEVICE_NAME_PREFIX.to_string(),
        }
    }

    /// Overrides the local-name prefix used when scanning for fixtures.
    ///
    /// ```
    /// # async fn demo() -> anyhow::Result<()> {
    /// let handler = aqs::SessionHandler::new(aqs::unconfigured_hardware_client())
    ///     .with_name_prefix("AQS_");
    /// let _ = handler;
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn with_name_prefix(mut self, name_prefix: impl Into<String>) -> Self {
        self.name_prefix = name_prefix.into();
        self
    }

    /// Connects to the first matching AQ-S fixture.
    ///
    /// # Errors
    ///
    /// Returns an error if discovery or connection fails.
    #[instrument(skip(self), level = "info", fields(name_prefix = %self.name_prefix))]
    pub async fn connect_first(self) -> Result<DeviceSession> {
        let span = tracing::Span::current();
        span.pb_set_message("Scanning for AQ-S fixtures and connecting");

        let name_prefix = self.name_prefix;
        let hardware_client = self.hardware_client;
        match hardware_client
            .connect_first_device(name_prefix.as_str())
            .await
        {
            Ok(session) => {
                span.pb_set_finish_message(&format!("{} Connected", "✓".green()));
                Ok(session)
            }
            Err(error) => {
                span.pb_set_finish_message(&format!("{} Connection failed", "✗".red()));
                Err(error.into())
            }
        }
    }
}

/// Runs the CLI command with an injected hardware client.
///
/// ```
/// # async fn run() -> anyhow::Result<()> {
/// use clap::Parser;
///
/// let args = aqs::Args::try_parse_from(["aqs", "encode", "POWER_ON"])?;
/// let (command, maybe_fake_args) = args.into_command_and_fake_args()?;
/// let hardware_client = match maybe_fake_args {
///     Some(fake_args) => aqs::fake_hardware_client(fake_args),
///     None => aqs::unconfigured_hardware_client(),
/// };
/// let mut out = Vec::new();
/// aqs::run(command, &mut out, hardware_client, aqs::OutputFormat::Pretty).await?;
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns an error if tracing initialisation fails, transport interaction
/// fails, or output writing fails.
pub async fn run<W>(
    command: Command,
    out: &mut W,
    hardware_client: Box<dyn HardwareClient>,
    output_format: OutputFormat,
) -> Result<()>
where
    W: io::Write,
{
    run_with_log_level(command, out, hardware_client, None, output_format).await
}

/// Runs the CLI command with an explicit telemetry log-level override.
///
/// # Errors
///
/// Returns an error if tracing initialisation fails, transport interaction
/// fails, or output writing fails.
pub async fn run_with_log_level<W>(
    command: Command,
    out: &mut W,
    hardware_client: Box<dyn HardwareClient>,
    log_level: Option<LogLevel>,
    output_format: OutputFormat,
) -> Result<()>
where
    W: io::Write,
{
    run_with_clients_and_log_level(
        command,
        out,
        &SystemTerminalClient,
        hardware_client,
        log_level,
        output_format,
    )
    .await
}

/// Runs the CLI command with injected clients.
///
/// # Errors
///
/// Returns an error if tracing initialisation fails, transport interaction
/// fails, or output writing fails.
pub async fn run_with_clients<W>(
    command: Command,
    out: &mut W,
    terminal_client: &dyn TerminalClient,
    hardware_client: Box<dyn HardwareClient>,
    output_format: OutputFormat,
) -> Result<()>
where
    W: io::Write,
{
    run_with_clients_and_log_level(
        command,
        out,
        terminal_client,
        hardware_client,
        None,
        output_format,
    )
    .await
}

/// Runs the CLI command with injected clients and explicit telemetry settings.
///
/// ```
/// # async fn run() -> anyhow::Result<()> {
/// use clap::Parser;
///
/// struct FakeTerminal;
/// impl aqs::TerminalClient for FakeTerminal {
///     fn stdout_is_terminal(&self) -> bool { false }
///     fn stderr_is_terminal(&self) -> bool { false }
/// }
///
/// let args = aqs::Args::try_parse_from([
///     "aqs",
///     "--log-level",
///     "debug",
///     "--fake",
///     "--fake-scan",
///     "hci0|AA:BB:CC|AQ-S 90cm|-43",
///     "listen",
///     "--max-notifications",
///     "1",
/// ])?;
/// let log_level = args.log_level();
/// let (command, maybe_fake_args) = args.into_command_and_fake_args()?;
/// let hardware_client = match maybe_fake_args {
///     Some(fake_args) => aqs::fake_hardware_client(fake_args),
///     None => aqs::unconfigured_hardware_client(),
/// };
/// let mut out = Vec::new();
/// aqs::run_with_clients_and_log_level(
///     command,
///     &mut out,
///     &FakeTerminal,
///     hardware_client,
///     log_level,
///     aqs::OutputFormat::Pretty,
/// ).await?;
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns an error if tracing initialisation fails, transport interaction
/// fails, or output writing fails.
#[instrument(
    skip(out, terminal_client, hardware_client),
    level = "info",
    fields(command = %command_name(&command), ?log_level)
)]
pub async fn run_with_clients_and_log_level<W>(
    command: Command,
    out: &mut W,
    terminal_client: &dyn TerminalClient,
    hardware_client: Box<dyn HardwareClient>,
    log_level: Option<LogLevel>,
    output_format: OutputFormat,
) -> Result<()>
where
    W: io::Write,
{
    telemetry::initialise_tracing(
        "aqs",
        terminal_client.stderr_is_terminal(),
        log_level.map(LogLevel::as_level_filter),
    )?;

    match command {
        Command::Encode(args) => crate::cli::encode::run(&args, out, terminal_client, output_format),
        Command::Decode(args) => crate::cli::decode::run(&args, out, terminal_client, output_format),
        Command::Control(args) => {
            crate::cli::control::run(hardware_client, &args, out, terminal_client, output_format)
                .await
        }
        Command::Listen(args) => {
            crate::cli::listen::run(hardware_client, &args, out, terminal_client).await
        }
    }
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Encode(_args) => "encode",
        Command::Decode(_args) => "decode",
        Command::Control(_args) => "control",
        Command::Listen(_args) => "listen",
    }
}
