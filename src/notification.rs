use serde::Serialize;
use thiserror::Error;
use tracing::instrument;

use crate::handlers::{FrameCodec, FrameCodecError, Preset, Rgb, SpectrumLevels};

/// Opcode of the state-update frames AQ-S fixtures emit on the notify
/// channel.
pub const STATE_UPDATE_OPCODE: u8 = 0x81;

const MODE_PRESET: u8 = 0x01;
const MODE_SOLID: u8 = 0x02;
const MODE_SPECTRUM: u8 = 0x03;

const BASE_STATE_LEN: usize = 3;

/// Errors returned while decoding notification frames.
///
/// Every variant is routine for a physical BLE peer: callers log at debug
/// level, discard the frame, and mutate nothing.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum NotificationDecodeError {
    /// The buffer is not a well-formed frame.
    #[error(transparent)]
    Frame(#[from] FrameCodecError),
    /// The frame verified but carries an opcode this decoder does not know.
    #[error("unrecognised notification opcode 0x{opcode:02X}")]
    UnknownOpcode { opcode: u8 },
    /// The state payload ends before its mode-specific bytes.
    #[error("state payload is truncated: expected {expected} bytes, got {actual}")]
    TruncatedState { expected: usize, actual: usize },
}

/// The fixture mode carried by a state update.
///
/// Exactly one mode is active at a time; merging a snapshot into
/// longer-lived state replaces whatever the previous mode carried.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum LightMode {
    /// A colour preset is active; unknown codes report no preset.
    Preset {
        /// Active preset, if the code was recognised.
        preset: Option<Preset>,
    },
    /// A solid colour fill is active.
    Solid {
        /// The active colour.
        colour: Rgb,
    },
    /// Explicit five-channel spectrum levels are active.
    Spectrum {
        /// The active channel levels.
        levels: SpectrumLevels,
    },
    /// The light is off or in a mode this decoder does not know.
    Off,
}

/// Device state carried by one decoded state-update frame.
///
/// A snapshot is constructed fresh per frame and carries only what the
/// frame conveys: power, brightness, and the active mode.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub struct StateSnapshot {
    power: bool,
    brightness: u8,
    #[serde(flatten)]
    mode: LightMode,
}

impl StateSnapshot {
    /// Returns whether the fixture reports itself powered on.
    #[must_use]
    pub fn power(&self) -> bool {
        self.power
    }

    /// Returns the reported brightness percentage.
    #[must_use]
    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    /// Returns the active mode.
    #[must_use]
    pub fn mode(&self) -> LightMode {
        self.mode
    }
}

/// Decodes notify-channel frames into typed state snapshots.
pub struct NotificationHandler;

impl NotificationHandler {
    /// Decodes one notification payload.
    ///
    /// # Errors
    ///
    /// Returns an error when the frame is malformed, truncated, or carries
    /// an unknown opcode. These occur routinely with partial BLE
    /// notifications; callers discard the frame and keep listening.
    ///
    /// ```
    /// use aqs::{LightMode, NotificationHandler, Rgb};
    ///
    /// let frame = [0x7E, 0x07, 0x81, 0x01, 0x4B, 0x02, 0x3B, 0x82, 0xF6, 0x86, 0xEF];
    /// let snapshot = NotificationHandler::decode(&frame)?;
    /// assert!(snapshot.power());
    /// assert_eq!(75, snapshot.brightness());
    /// assert_eq!(
    ///     LightMode::Solid { colour: Rgb::new(0x3B, 0x82, 0xF6) },
    ///     snapshot.mode()
    /// );
    /// # Ok::<(), aqs::NotificationDecodeError>(())
    /// ```
    #[instrument(skip(payload), level = "trace", fields(payload_len = payload.len()))]
    pub fn decode(payload: &[u8]) -> Result<StateSnapshot, NotificationDecodeError> {
        let frame = FrameCodec::decode(payload)?;
        if frame.opcode() != STATE_UPDATE_OPCODE {
            return Err(NotificationDecodeError::UnknownOpcode {
                opcode: frame.opcode(),
            });
        }

        let state = frame.payload();
        if state.len() < BASE_STATE_LEN {
            return Err(NotificationDecodeError::TruncatedState {
                expected: BASE_STATE_LEN,
                actual: state.len(),
            });
        }

        let power = state[0] == 0x01;
        let brightness = state[1];
        let mode = match state[2] {
            MODE_PRESET => {
                let code = *require_state_byte(state, BASE_STATE_LEN + 1)?;
                LightMode::Preset {
                    preset: Preset::from_code(code),
                }
            }
            MODE_SOLID => {
                let channels = require_state_bytes(state, BASE_STATE_LEN + 3)?;
                LightMode::Solid {
                    colour: Rgb::new(channels[3], channels[4], channels[5]),
                }
            }
            MODE_SPECTRUM => {
                let channels = require_state_bytes(state, BASE_STATE_LEN + 5)?;
                LightMode::Spectrum {
                    levels: SpectrumLevels::new(
                        channels[3],
                        channels[4],
                        channels[5],
                        channels[6],
                        channels[7],
                    ),
                }
            }
            _unknown_mode => LightMode::Off,
        };

        Ok(StateSnapshot {
            power,
            brightness,
            mode,
        })
    }
}

fn require_state_byte(
    state: &[u8],
    expected: usize,
) -> Result<&u8, NotificationDecodeError> {
    state
        .get(expected - 1)
        .ok_or(NotificationDecodeError::TruncatedState {
            expected,
            actual: state.len(),
        })
}

fn require_state_bytes(
    state: &[u8],
    expected: usize,
) -> Result<&[u8], NotificationDecodeError> {
    if state.len() < expected {
        return Err(NotificationDecodeError::TruncatedState {
            expected,
            actual: state.len(),
        });
    }
    Ok(state)
}
