use std::io;

use anyhow::{Context, Result};
use clap::Args;
use tracing::instrument;

use crate::cli::OutputFormat;
use crate::cli::ui::{Painter, StateView};
use crate::notification::NotificationHandler;
use crate::terminal::TerminalClient;
use crate::utils::parse_hex;

/// Arguments for the `decode` command.
#[derive(Debug, Args)]
pub struct DecodeArgs {
    /// Frame bytes as hexadecimal, e.g. `7E 07 81 01 4B 02 3B 82 F6 86 EF` (spaces allowed).
    frame: String,
}

impl DecodeArgs {
    /// Creates decode arguments.
    ///
    /// ```
    /// use aqs::DecodeArgs;
    ///
    /// let args = DecodeArgs::new("7E02010100EF");
    /// let _ = args;
    /// ```
    #[must_use]
    pub fn new(frame: impl Into<String>) -> Self {
        Self {
            frame: frame.into(),
        }
    }
}

/// Executes the `decode` command.
#[instrument(skip(args, out, terminal_client), level = "info", fields(?output_format))]
pub(crate) fn run<W>(
    args: &DecodeArgs,
    out: &mut W,
    terminal_client: &dyn TerminalClient,
    output_format: OutputFormat,
) -> Result<()>
where
    W: io::Write,
{
    let payload = parse_hex(&args.frame)
        .with_context(|| format!("failed to parse hex frame `{}`", args.frame))?;
    let snapshot = NotificationHandler::decode(&payload)
        .with_context(|| format!("failed to decode frame `{}`", args.frame))?;

    match output_format {
        OutputFormat::Pretty => {
            let painter = Painter::new(terminal_client.stdout_is_terminal());
            writeln!(out, "{}", painter.heading("Decoded state:"))?;
            writeln!(out, "{}", StateView::new(&snapshot, &painter))?;
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &snapshot)?;
            writeln!(out)?;
        }
    }

    Ok(())
}
