use std::fmt;
use std::str::FromStr;

use bon::Builder;
use serde_with::SerializeDisplay;
use thiserror::Error;

use crate::command::LightCommand;
use crate::error::ProtocolError;
use crate::hw::DeviceSession;

use super::colour::Rgb;
use super::preset::Preset;
use super::write_command;

const DAY_MASK_LEN: usize = 7;

const ACTION_TAG_PRESET: u8 = 0x01;
const ACTION_TAG_COLOUR: u8 = 0x02;
const ACTION_TAG_POWER_OFF: u8 = 0x03;

/// Errors returned while parsing schedule fields.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum ScheduleError {
    /// The day mask is not a 7-character string of `0`/`1`.
    #[error("day mask `{value}` must be 7 characters of 0 or 1, Monday first")]
    InvalidDayMask { value: String },
    /// The time is not an `HH:MM` pair of integers.
    #[error("time `{value}` must use the HH:MM form")]
    InvalidTime { value: String },
}

/// Wall-clock time of day carried in schedule slots.
///
/// Values are encoded as given; the device owns range interpretation.
#[derive(Debug, Clone, Copy, Eq, PartialEq, SerializeDisplay)]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
}

impl TimeOfDay {
    /// Creates a time of day from hour and minute bytes.
    ///
    /// ```
    /// use aqs::TimeOfDay;
    ///
    /// let time = TimeOfDay::new(8, 30);
    /// assert_eq!(8, time.hour());
    /// assert_eq!(30, time.minute());
    /// ```
    #[must_use]
    pub const fn new(hour: u8, minute: u8) -> Self {
        Self { hour, minute }
    }

    /// Returns the hour byte.
    #[must_use]
    pub fn hour(self) -> u8 {
        self.hour
    }

    /// Returns the minute byte.
    #[must_use]
    pub fn minute(self) -> u8 {
        self.minute
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for TimeOfDay {
    type Err = ScheduleError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || ScheduleError::InvalidTime {
            value: value.to_string(),
        };
        let (hour, minute) = value.split_once(':').ok_or_else(invalid)?;
        Ok(Self {
            hour: hour.parse().map_err(|_unparsed| invalid())?,
            minute: minute.parse().map_err(|_unparsed| invalid())?,
        })
    }
}

/// Seven-bit day-of-week mask, Monday in the lowest bit.
///
/// The textual form is seven `0`/`1` characters ordered Monday..Sunday;
/// it is reversed before the binary parse so the first character lands in
/// bit 0. The device requires this exact bit assignment.
#[derive(Debug, Clone, Copy, Eq, PartialEq, SerializeDisplay)]
pub struct DayMask(u8);

impl DayMask {
    /// Mask selecting all seven days.
    pub const EVERY_DAY: Self = Self(0b111_1111);
    /// Mask selecting Monday through Friday.
    pub const WEEKDAYS: Self = Self(0b001_1111);
    /// Mask selecting Saturday and Sunday.
    pub const WEEKEND: Self = Self(0b110_0000);

    /// Creates a mask from raw bits; anything above the seventh bit is
    /// discarded.
    ///
    /// ```
    /// use aqs::DayMask;
    ///
    /// assert_eq!(0x1F, DayMask::from_bits(0x1F).bits());
    /// assert_eq!(0x7F, DayMask::from_bits(0xFF).bits());
    /// ```
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & 0b111_1111)
    }

    /// Returns the wire byte.
    #[must_use]
    pub fn bits(self) -> u8 {
        self.0
    }
}

impl fmt::Display for DayMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for day in 0..DAY_MASK_LEN {
            let set = self.0 & (1 << day) != 0;
            write!(f, "{}", if set { '1' } else { '0' })?;
        }
        Ok(())
    }
}

impl FromStr for DayMask {
    type Err = ScheduleError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || ScheduleError::InvalidDayMask {
            value: value.to_string(),
        };
        if value.len() != DAY_MASK_LEN {
            return Err(invalid());
        }

        let reversed: String = value.chars().rev().collect();
        let bits = u8::from_str_radix(&reversed, 2).map_err(|_unparsed| invalid())?;
        Ok(Self(bits))
    }
}

/// Action the fixture applies when a schedule window opens.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ScheduleAction {
    /// Activate a colour preset; an unknown preset encodes as code zero.
    Preset(Option<Preset>),
    /// Apply an explicit solid colour.
    Colour(Rgb),
    /// Switch the light off.
    PowerOff,
}

impl ScheduleAction {
    pub(crate) fn extend_payload(self, payload: &mut Vec<u8>) {
        match self {
            Self::Preset(preset) => {
                payload.push(ACTION_TAG_PRESET);
                payload.push(preset.map_or(0x00, Preset::code));
            }
            Self::Colour(colour) => {
                payload.push(ACTION_TAG_COLOUR);
                payload.extend_from_slice(&[colour.r, colour.g, colour.b]);
            }
            Self::PowerOff => payload.push(ACTION_TAG_POWER_OFF),
        }
    }
}

/// One schedule slot as encoded into a schedule-add command.
///
/// The codec encodes slots as given; it neither stores schedules nor
/// validates them beyond the field types.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Builder)]
pub struct ScheduleSlot {
    index: u8,
    #[builder(default = true)]
    enabled: bool,
    start: TimeOfDay,
    end: TimeOfDay,
    days: DayMask,
    action: ScheduleAction,
}

impl ScheduleSlot {
    /// Returns the slot index on the device.
    #[must_use]
    pub fn index(&self) -> u8 {
        self.index
    }

    /// Returns whether the slot is stored enabled.
    #[must_use]
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Returns the window start time.
    #[must_use]
    pub fn start(&self) -> TimeOfDay {
        self.start
    }

    /// Returns the window end time.
    #[must_use]
    pub fn end(&self) -> TimeOfDay {
        self.end
    }

    /// Returns the day-of-week mask.
    #[must_use]
    pub fn days(&self) -> DayMask {
        self.days
    }

    /// Returns the scheduled action.
    #[must_use]
    pub fn action(&self) -> ScheduleAction {
        self.action
    }

    pub(crate) fn payload_bytes(&self) -> Vec<u8> {
        let mut payload = vec![
            self.index,
            u8::from(self.enabled),
            self.start.hour(),
            self.start.minute(),
            self.end.hour(),
            self.end.minute(),
            self.days.bits(),
        ];
        self.action.extend_payload(&mut payload);
        payload
    }
}

/// Handler for schedule maintenance commands.
pub struct ScheduleHandler;

impl ScheduleHandler {
    /// Removes every stored schedule slot from the fixture.
    ///
    /// ```
    /// # async fn demo(session: aqs::DeviceSession) -> Result<(), aqs::ProtocolError> {
    /// use aqs::ScheduleHandler;
    ///
    /// ScheduleHandler::clear_schedules(&session).await?;
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error when frame encoding fails or the transport write fails.
    pub async fn clear_schedules(session: &DeviceSession) -> Result<(), ProtocolError> {
        write_command(session, &LightCommand::ScheduleClear).await
    }

    /// Stores one schedule slot on the fixture.
    ///
    /// ```
    /// # async fn demo(session: aqs::DeviceSession) -> Result<(), aqs::ProtocolError> {
    /// use aqs::{DayMask, Preset, ScheduleAction, ScheduleHandler, ScheduleSlot, TimeOfDay};
    ///
    /// let slot = ScheduleSlot::builder()
    ///     .index(0)
    ///     .start(TimeOfDay::new(8, 0))
    ///     .end(TimeOfDay::new(18, 0))
    ///     .days(DayMask::WEEKDAYS)
    ///     .action(ScheduleAction::Preset(Some(Preset::Clear)))
    ///     .build();
    /// ScheduleHandler::add_schedule(&session, slot).await?;
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error when frame encoding fails or the transport write fails.
    pub async fn add_schedule(
        session: &DeviceSession,
        slot: ScheduleSlot,
    ) -> Result<(), ProtocolError> {
        write_command(session, &LightCommand::ScheduleAdd(slot)).await
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("1111100", 0b001_1111)]
    #[case("0000001", 0b100_0000)]
    #[case("1000000", 0b000_0001)]
    #[case("1111111", 0b111_1111)]
    #[case("0000000", 0b000_0000)]
    fn day_mask_reverses_before_binary_parse(#[case] value: &str, #[case] expected: u8) {
        let mask: DayMask = value.parse().expect("valid mask should parse");
        assert_eq!(expected, mask.bits());
    }

    #[rstest]
    #[case("111110")]
    #[case("11111000")]
    #[case("11111x0")]
    #[case("")]
    fn day_mask_rejects_malformed_strings(#[case] value: &str) {
        let result: Result<DayMask, _> = value.parse();
        assert_matches!(
            result,
            Err(ScheduleError::InvalidDayMask { value: rejected }) if rejected == value
        );
    }

    #[rstest]
    #[case(DayMask::WEEKDAYS, "1111100")]
    #[case(DayMask::WEEKEND, "0000011")]
    #[case(DayMask::EVERY_DAY, "1111111")]
    fn day_mask_display_round_trips(#[case] mask: DayMask, #[case] expected: &str) {
        assert_eq!(expected, mask.to_string());
        assert_eq!(mask, expected.parse().expect("rendered mask should parse"));
    }

    #[rstest]
    #[case("08:00", TimeOfDay::new(8, 0))]
    #[case("23:59", TimeOfDay::new(23, 59))]
    fn time_of_day_parses_hh_mm(#[case] value: &str, #[case] expected: TimeOfDay) {
        let time: TimeOfDay = value.parse().expect("valid time should parse");
        assert_eq!(expected, time);
    }

    #[rstest]
    #[case("0800")]
    #[case("8:")]
    #[case(":30")]
    #[case("eight:00")]
    fn time_of_day_rejects_malformed_strings(#[case] value: &str) {
        let result: Result<TimeOfDay, _> = value.parse();
        assert_matches!(
            result,
            Err(ScheduleError::InvalidTime { value: rejected }) if rejected == value
        );
    }

    #[rstest]
    #[case(ScheduleAction::Preset(Some(Preset::Clear)), vec![0x01, 0x02])]
    #[case(ScheduleAction::Preset(None), vec![0x01, 0x00])]
    #[case(ScheduleAction::Colour(Rgb::new(0xFF, 0x00, 0x00)), vec![0x02, 0xFF, 0x00, 0x00])]
    #[case(ScheduleAction::PowerOff, vec![0x03])]
    fn action_trailers_match_protocol(#[case] action: ScheduleAction, #[case] expected: Vec<u8>) {
        let mut payload = Vec::new();
        action.extend_payload(&mut payload);
        assert_eq!(expected, payload);
    }

    #[test]
    fn slot_payload_lays_out_window_then_action() {
        let slot = ScheduleSlot::builder()
            .index(2)
            .enabled(false)
            .start(TimeOfDay::new(8, 0))
            .end(TimeOfDay::new(18, 0))
            .days(DayMask::WEEKDAYS)
            .action(ScheduleAction::PowerOff)
            .build();

        assert_eq!(vec![2, 0, 8, 0, 18, 0, 0x1F, 0x03], slot.payload_bytes());
    }

    #[test]
    fn slot_builder_defaults_to_enabled() {
        let slot = ScheduleSlot::builder()
            .index(0)
            .start(TimeOfDay::new(6, 30))
            .end(TimeOfDay::new(9, 0))
            .days(DayMask::EVERY_DAY)
            .action(ScheduleAction::Preset(Some(Preset::Sunrise)))
            .build();

        assert!(slot.enabled());
    }
}
