use std::io;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use tracing::instrument;

use crate::cli::OutputFormat;
use crate::cli::ui::{FrameView, Painter};
use crate::command::LightCommand;
use crate::terminal::TerminalClient;

/// Arguments for the `encode` command.
#[derive(Debug, Args)]
pub struct EncodeArgs {
    /// Colon-delimited command, e.g. `BRIGHTNESS:42` or `SPECTRUM:10:20:30:40:50`.
    command: String,
}

impl EncodeArgs {
    /// Creates encode arguments.
    ///
    /// ```
    /// use aqs::EncodeArgs;
    ///
    /// let args = EncodeArgs::new("POWER_ON");
    /// let _ = args;
    /// ```
    #[must_use]
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

/// JSON result emitted by `encode`.
#[derive(Serialize)]
struct EncodeResult {
    command: &'static str,
    opcode: String,
    payload: String,
    checksum: String,
    frame: String,
}

/// Executes the `encode` command.
#[instrument(skip(args, out, terminal_client), level = "info", fields(?output_format))]
pub(crate) fn run<W>(
    args: &EncodeArgs,
    out: &mut W,
    terminal_client: &dyn TerminalClient,
    output_format: OutputFormat,
) -> Result<()>
where
    W: io::Write,
{
    let command: LightCommand = args
        .command
        .parse()
        .with_context(|| format!("failed to parse command `{}`", args.command))?;
    let frame = command
        .to_frame()
        .with_context(|| format!("failed to encode command `{}`", args.command))?;

    match output_format {
        OutputFormat::Pretty => {
            let painter = Painter::new(terminal_client.stdout_is_terminal());
            writeln!(out, "{}", FrameView::new(&command, &frame, &painter))?;
        }
        OutputFormat::Json => {
            let result = EncodeResult {
                command: command.name(),
                opcode: hex::encode([command.opcode()]),
                payload: hex::encode(command.payload()),
                checksum: hex::encode([frame[frame.len() - 2]]),
                frame: hex::encode(&frame),
            };
            serde_json::to_writer_pretty(&mut *out, &result)?;
            writeln!(out)?;
        }
    }

    Ok(())
}
