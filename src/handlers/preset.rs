use serde_with::SerializeDisplay;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use crate::command::LightCommand;
use crate::error::ProtocolError;
use crate::hw::DeviceSession;

use super::write_command;

/// Built-in colour presets understood by AQ-S fixtures.
#[derive(
    Debug,
    Clone,
    Copy,
    Eq,
    PartialEq,
    Display,
    EnumIter,
    EnumString,
    SerializeDisplay,
    clap::ValueEnum,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Preset {
    /// Sunrise/Sunset.
    Sunrise,
    /// Clear White.
    Clear,
    /// Crystal Water.
    Crystal,
    /// Deep Ocean.
    Deep,
    /// Coral Reef.
    Coral,
    /// Natural Day.
    Natural,
}

impl Preset {
    /// Returns the one-byte wire code for this preset.
    ///
    /// ```
    /// use aqs::Preset;
    ///
    /// assert_eq!(1, Preset::Sunrise.code());
    /// assert_eq!(6, Preset::Natural.code());
    /// ```
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Sunrise => 0x01,
            Self::Clear => 0x02,
            Self::Crystal => 0x03,
            Self::Deep => 0x04,
            Self::Coral => 0x05,
            Self::Natural => 0x06,
        }
    }

    /// Maps a wire code back to a preset.
    ///
    /// ```
    /// use aqs::Preset;
    ///
    /// assert_eq!(Some(Preset::Clear), Preset::from_code(2));
    /// assert_eq!(None, Preset::from_code(0x2A));
    /// ```
    #[must_use]
    pub fn from_code(code: u8) -> Option<Self> {
        Self::iter().find(|preset| preset.code() == code)
    }

    /// Looks up a preset by its lowercase identifier.
    ///
    /// Unknown names return `None`; the encoder maps them to the zero byte.
    ///
    /// ```
    /// use aqs::Preset;
    ///
    /// assert_eq!(Some(Preset::Coral), Preset::from_name("Coral"));
    /// assert_eq!(None, Preset::from_name("bogus"));
    /// ```
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        name.parse().ok()
    }

    /// Returns the human-readable preset name shown in control surfaces.
    ///
    /// ```
    /// use aqs::Preset;
    ///
    /// assert_eq!("Deep Ocean", Preset::Deep.display_name());
    /// ```
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Sunrise => "Sunrise/Sunset",
            Self::Clear => "Clear White",
            Self::Crystal => "Crystal Water",
            Self::Deep => "Deep Ocean",
            Self::Coral => "Coral Reef",
            Self::Natural => "Natural Day",
        }
    }
}

/// Handler for preset selection commands.
pub struct PresetHandler;

impl PresetHandler {
    /// Activates one of the built-in colour presets.
    ///
    /// ```
    /// # async fn demo(session: aqs::DeviceSession) -> Result<(), aqs::ProtocolError> {
    /// use aqs::{Preset, PresetHandler};
    ///
    /// PresetHandler::select_preset(&session, Preset::Crystal).await?;
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error when frame encoding fails or the transport write fails.
    pub async fn select_preset(session: &DeviceSession, preset: Preset) -> Result<(), ProtocolError> {
        write_command(session, &LightCommand::Preset(Some(preset))).await
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use strum::IntoEnumIterator;

    use super::*;

    #[rstest]
    #[case(Preset::Sunrise, 1)]
    #[case(Preset::Clear, 2)]
    #[case(Preset::Crystal, 3)]
    #[case(Preset::Deep, 4)]
    #[case(Preset::Coral, 5)]
    #[case(Preset::Natural, 6)]
    fn codes_match_device_table(#[case] preset: Preset, #[case] expected: u8) {
        assert_eq!(expected, preset.code());
    }

    #[test]
    fn code_lookup_round_trips_every_preset() {
        for preset in Preset::iter() {
            assert_eq!(Some(preset), Preset::from_code(preset.code()));
        }
    }

    #[rstest]
    #[case(0x00)]
    #[case(0x07)]
    #[case(0xFF)]
    fn unknown_codes_map_to_none(#[case] code: u8) {
        assert_eq!(None, Preset::from_code(code));
    }

    #[rstest]
    #[case("sunrise", Some(Preset::Sunrise))]
    #[case("NATURAL", Some(Preset::Natural))]
    #[case("bogus", None)]
    fn name_lookup_is_case_insensitive(#[case] name: &str, #[case] expected: Option<Preset>) {
        assert_eq!(expected, Preset::from_name(name));
    }

    #[test]
    fn display_uses_lowercase_identifier() {
        assert_eq!("crystal", Preset::Crystal.to_string());
    }
}
