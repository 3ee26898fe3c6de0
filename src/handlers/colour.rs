use std::fmt;
use std::str::FromStr;

use serde_with::SerializeDisplay;
use thiserror::Error;

use crate::command::LightCommand;
use crate::error::ProtocolError;
use crate::hw::DeviceSession;

use super::write_command;

const HEX_COLOUR_LEN: usize = 6;

/// Errors returned while parsing hex colour strings.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum RgbParseError {
    /// The value does not have exactly six hex digits.
    #[error("hex colour must have {HEX_COLOUR_LEN} digits, got {actual}")]
    InvalidLength { actual: usize },
    /// The value contains a non-hexadecimal character.
    #[error("hex colour contains invalid digits: `{value}`")]
    InvalidHexDigit { value: String },
}

/// RGB colour value.
#[derive(Debug, Clone, Copy, Eq, PartialEq, SerializeDisplay)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Creates an RGB colour.
    ///
    /// ```
    /// use aqs::Rgb;
    ///
    /// let colour = Rgb::new(255, 136, 0);
    /// assert_eq!(255, colour.r);
    /// ```
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses a six-digit hex colour with an optional leading `#`.
    ///
    /// # Errors
    ///
    /// Returns an error when the value is not exactly six hex digits.
    ///
    /// ```
    /// use aqs::Rgb;
    ///
    /// assert_eq!(Rgb::new(0x3B, 0x82, 0xF6), Rgb::from_hex("#3b82f6")?);
    /// assert_eq!(Rgb::new(0xFF, 0x88, 0x00), Rgb::from_hex("ff8800")?);
    /// # Ok::<(), aqs::RgbParseError>(())
    /// ```
    pub fn from_hex(value: &str) -> Result<Self, RgbParseError> {
        let digits = value.strip_prefix('#').unwrap_or(value);
        if digits.len() != HEX_COLOUR_LEN {
            return Err(RgbParseError::InvalidLength {
                actual: digits.len(),
            });
        }
        if !digits.is_ascii() {
            return Err(RgbParseError::InvalidHexDigit {
                value: digits.to_string(),
            });
        }

        let parse_channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_invalid| {
                RgbParseError::InvalidHexDigit {
                    value: digits.to_string(),
                }
            })
        };

        Ok(Self {
            r: parse_channel(0..2)?,
            g: parse_channel(2..4)?,
            b: parse_channel(4..6)?,
        })
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = RgbParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::from_hex(value)
    }
}

/// Handler for solid-colour fill commands.
pub struct SolidColourHandler;

impl SolidColourHandler {
    /// Fills the fixture with a single colour.
    ///
    /// ```
    /// # async fn demo(session: aqs::DeviceSession) -> Result<(), aqs::ProtocolError> {
    /// use aqs::{Rgb, SolidColourHandler};
    ///
    /// SolidColourHandler::set_colour(&session, Rgb::new(0x3B, 0x82, 0xF6)).await?;
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error when frame encoding fails or the transport write fails.
    pub async fn set_colour(session: &DeviceSession, colour: Rgb) -> Result<(), ProtocolError> {
        write_command(session, &LightCommand::SolidColour(colour)).await
    }
}

/// Handler for two-colour gradient commands.
pub struct GradientHandler;

impl GradientHandler {
    /// Runs a gradient between a start and end colour.
    ///
    /// ```
    /// # async fn demo(session: aqs::DeviceSession) -> Result<(), aqs::ProtocolError> {
    /// use aqs::{GradientHandler, Rgb};
    ///
    /// GradientHandler::set_gradient(&session, Rgb::new(0, 0, 255), Rgb::new(255, 128, 0)).await?;
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error when frame encoding fails or the transport write fails.
    pub async fn set_gradient(
        session: &DeviceSession,
        start: Rgb,
        end: Rgb,
    ) -> Result<(), ProtocolError> {
        write_command(session, &LightCommand::Gradient { start, end }).await
    }
}
