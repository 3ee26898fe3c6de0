use thiserror::Error;

use crate::command::LightCommand;
use crate::error::ProtocolError;
use crate::hw::DeviceSession;

use super::write_command;

const MIN_BRIGHTNESS: u8 = 0;
const MAX_BRIGHTNESS: u8 = 100;

/// Errors returned by brightness validation.
#[derive(Debug, Error, Clone, Copy, Eq, PartialEq)]
pub enum BrightnessError {
    /// The brightness value was outside the accepted range.
    #[error("brightness {value} is out of range ({min}..={max})")]
    OutOfRange { value: u8, min: u8, max: u8 },
}

/// Validated brightness percentage in the inclusive range `0..=100`.
///
/// The encoder itself passes brightness bytes through unclamped; this type
/// is the caller-side constraint applied before a value reaches it.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Brightness(u8);

impl Brightness {
    /// Creates a validated brightness value.
    ///
    /// # Errors
    ///
    /// Returns an error when `value` is outside `0..=100`.
    ///
    /// ```
    /// use aqs::Brightness;
    ///
    /// let value = Brightness::new(42)?;
    /// assert_eq!(42, value.value());
    /// # Ok::<(), aqs::BrightnessError>(())
    /// ```
    pub fn new(value: u8) -> Result<Self, BrightnessError> {
        if !(MIN_BRIGHTNESS..=MAX_BRIGHTNESS).contains(&value) {
            return Err(BrightnessError::OutOfRange {
                value,
                min: MIN_BRIGHTNESS,
                max: MAX_BRIGHTNESS,
            });
        }

        Ok(Self(value))
    }

    /// Returns the underlying brightness byte.
    ///
    /// ```
    /// use aqs::Brightness;
    ///
    /// let value = Brightness::new(12)?;
    /// assert_eq!(12, value.value());
    /// # Ok::<(), aqs::BrightnessError>(())
    /// ```
    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }
}

/// Handler for brightness commands.
pub struct BrightnessHandler;

impl BrightnessHandler {
    /// Sends a brightness command.
    ///
    /// ```
    /// # async fn demo(session: aqs::DeviceSession) -> Result<(), aqs::ProtocolError> {
    /// use aqs::{Brightness, BrightnessHandler};
    ///
    /// let brightness = Brightness::new(60)?;
    /// BrightnessHandler::set_brightness(&session, brightness).await?;
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error when frame encoding fails or the transport write fails.
    pub async fn set_brightness(
        session: &DeviceSession,
        brightness: Brightness,
    ) -> Result<(), ProtocolError> {
        write_command(session, &LightCommand::Brightness(brightness.value())).await
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(0)]
    #[case(50)]
    #[case(100)]
    fn brightness_accepts_range(#[case] value: u8) {
        let brightness = Brightness::new(value).expect("valid brightness should construct");
        assert_eq!(value, brightness.value());
    }

    #[rstest]
    #[case(101)]
    #[case(255)]
    fn brightness_rejects_out_of_range(#[case] value: u8) {
        let result = Brightness::new(value);
        assert_matches!(
            result,
            Err(BrightnessError::OutOfRange {
                value: rejected,
                min: MIN_BRIGHTNESS,
                max: MAX_BRIGHTNESS,
            }) if rejected == value
        );
    }

    #[test]
    fn brightness_frame_matches_protocol() {
        let frame = LightCommand::Brightness(80)
            .to_frame()
            .expect("brightness command frame should encode cleanly");
        assert_eq!(vec![0x7E, 0x02, 0x02, 0x50, 0x52, 0xEF], frame);
    }
}
