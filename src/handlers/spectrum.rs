use serde::Serialize;

use crate::command::LightCommand;
use crate::error::ProtocolError;
use crate::hw::DeviceSession;

use super::write_command;

/// Five-channel spectrum levels, one byte per channel.
///
/// Channels are expressed as 0–100 percentages on the wire; the encoder
/// passes the bytes through as given, so callers constrain the range.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub struct SpectrumLevels {
    /// Red channel level.
    pub red: u8,
    /// Green channel level.
    pub green: u8,
    /// Blue channel level.
    pub blue: u8,
    /// White channel level.
    pub white: u8,
    /// UV channel level.
    pub uv: u8,
}

impl SpectrumLevels {
    /// Spectrum tuned for coral growth.
    pub const REEF_GROWTH: Self = Self::new(30, 50, 100, 80, 90);
    /// Spectrum tuned for planted freshwater tanks.
    pub const PLANTED_TANK: Self = Self::new(95, 70, 85, 90, 10);
    /// Spectrum tuned to bring out fish colouration.
    pub const VIVID_FISH: Self = Self::new(80, 80, 95, 100, 5);

    /// Creates spectrum levels from per-channel values.
    ///
    /// ```
    /// use aqs::SpectrumLevels;
    ///
    /// let levels = SpectrumLevels::new(10, 20, 30, 40, 50);
    /// assert_eq!(30, levels.blue);
    /// ```
    #[must_use]
    pub const fn new(red: u8, green: u8, blue: u8, white: u8, uv: u8) -> Self {
        Self {
            red,
            green,
            blue,
            white,
            uv,
        }
    }

    pub(crate) fn as_payload(self) -> [u8; 5] {
        [self.red, self.green, self.blue, self.white, self.uv]
    }
}

/// Handler for five-channel spectrum commands.
pub struct SpectrumHandler;

impl SpectrumHandler {
    /// Applies explicit per-channel spectrum levels.
    ///
    /// ```
    /// # async fn demo(session: aqs::DeviceSession) -> Result<(), aqs::ProtocolError> {
    /// use aqs::{SpectrumHandler, SpectrumLevels};
    ///
    /// SpectrumHandler::set_spectrum(&session, SpectrumLevels::REEF_GROWTH).await?;
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error when frame encoding fails or the transport write fails.
    pub async fn set_spectrum(
        session: &DeviceSession,
        levels: SpectrumLevels,
    ) -> Result<(), ProtocolError> {
        write_command(session, &LightCommand::Spectrum(levels)).await
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[test]
    fn spectrum_frame_matches_protocol() {
        let frame = LightCommand::Spectrum(SpectrumLevels::new(10, 20, 30, 40, 50))
            .to_frame()
            .expect("spectrum command frame should encode cleanly");
        assert_eq!(
            vec![0x7E, 0x06, 0x05, 10, 20, 30, 40, 50, 0x05 ^ 10 ^ 20 ^ 30 ^ 40 ^ 50, 0xEF],
            frame
        );
    }

    #[rstest]
    #[case(SpectrumLevels::REEF_GROWTH, [30, 50, 100, 80, 90])]
    #[case(SpectrumLevels::PLANTED_TANK, [95, 70, 85, 90, 10])]
    #[case(SpectrumLevels::VIVID_FISH, [80, 80, 95, 100, 5])]
    fn named_spectra_encode_expected_channels(
        #[case] levels: SpectrumLevels,
        #[case] expected: [u8; 5],
    ) {
        assert_eq!(expected, levels.as_payload());
    }
}
