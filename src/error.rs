use derive_more::From;
use thiserror::Error;

use crate::command::CommandParseError;
use crate::handlers::{BrightnessError, FrameCodecError};
use crate::notification::NotificationDecodeError;

/// Errors returned by transport interaction operations.
#[derive(Debug, Error)]
pub enum InteractionError {
    #[error("no AQ-S fixture matching `{prefix}*` was found in the fake fixture")]
    NoMatchingFixtureDevice { prefix: String },
    #[error(
        "no transport backend is configured; pass --fake with fixtures or connect through a custom hardware client"
    )]
    MissingTransportBackend,
    #[error(transparent)]
    Fixture(#[from] FixtureError),
}

/// Errors returned when parsing fake interaction fixtures.
#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("the fake discovery fixture is empty")]
    EmptyFixture,
    #[error("fixture records must contain four pipe-delimited fields")]
    InvalidRecordFieldCount,
    #[error("fixture records cannot contain empty mandatory fields")]
    EmptyRecordField,
    #[error("failed to parse RSSI value")]
    InvalidRssi(#[from] std::num::ParseIntError),
    #[error("failed to parse hexadecimal payload")]
    InvalidHexPayload(#[from] hex::FromHexError),
}

/// Errors returned when validating runtime backend options.
#[derive(Debug, Error)]
pub(crate) enum CliConfigError {
    #[error("missing fake scan fixture while fake mode is enabled")]
    MissingFakeScanFixture,
}

/// Errors returned by telemetry initialisation.
#[derive(Debug, Error)]
pub(crate) enum TelemetryError {
    #[error("failed to install tracing subscriber")]
    Subscriber(#[from] tracing_subscriber::util::TryInitError),
}

/// Top-level protocol errors wrapping module-specific error types.
#[derive(Debug, Error, From)]
pub enum ProtocolError {
    #[error(transparent)]
    #[from(CommandParseError, Box<CommandParseError>)]
    Command(Box<CommandParseError>),
    #[error(transparent)]
    #[from(FrameCodecError, Box<FrameCodecError>)]
    FrameCodec(Box<FrameCodecError>),
    #[error(transparent)]
    #[from(NotificationDecodeError, Box<NotificationDecodeError>)]
    Notification(Box<NotificationDecodeError>),
    #[error(transparent)]
    #[from(BrightnessError, Box<BrightnessError>)]
    Brightness(Box<BrightnessError>),
    #[error(transparent)]
    #[from(InteractionError, Box<InteractionError>)]
    Interaction(Box<InteractionError>),
}
