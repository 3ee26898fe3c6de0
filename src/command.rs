use std::str::FromStr;

use thiserror::Error;
use time::OffsetDateTime;

use crate::handlers::{
    DayMask, FrameCodec, FrameCodecError, LightPower, Preset, Rgb, RgbParseError, ScheduleAction,
    ScheduleError, ScheduleSlot, SpectrumLevels, TimeOfDay,
};

const OPCODE_POWER: u8 = 0x01;
const OPCODE_BRIGHTNESS: u8 = 0x02;
const OPCODE_PRESET: u8 = 0x03;
const OPCODE_SOLID_COLOUR: u8 = 0x04;
const OPCODE_SPECTRUM: u8 = 0x05;
const OPCODE_SUNRISE: u8 = 0x06;
const OPCODE_SUNSET: u8 = 0x07;
const OPCODE_GRADIENT: u8 = 0x08;
const OPCODE_SCHEDULE_CLEAR: u8 = 0x10;
const OPCODE_SCHEDULE_ADD: u8 = 0x11;
const OPCODE_REQUEST_STATE: u8 = 0x20;
const OPCODE_SYNC_TIME: u8 = 0x21;
const OPCODE_FACTORY_RESET: u8 = 0xFE;

const SCHEDULE_ADD_MIN_PARAMS: usize = 8;
const SPECTRUM_CHANNELS: usize = 5;

/// Errors returned while parsing the textual command grammar.
///
/// These are caller-input errors: the caller surfaces a warning and skips
/// the transport write. Nothing in here is fatal.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum CommandParseError {
    /// The leading token names no known command.
    #[error("unknown command `{name}`")]
    UnknownCommand { name: String },
    /// A required parameter is absent.
    #[error("command {command} is missing its `{parameter}` parameter")]
    MissingParameter {
        command: &'static str,
        parameter: &'static str,
    },
    /// The command has the wrong number of parameters.
    #[error("command {command} expects {expected} parameters, got {actual}")]
    InvalidParameterCount {
        command: &'static str,
        expected: usize,
        actual: usize,
    },
    /// A numeric parameter is not a base-10 byte.
    #[error("parameter `{value}` is not an integer in 0..=255")]
    InvalidInteger { value: String },
    /// A colour parameter is not six hex digits.
    #[error(transparent)]
    InvalidColour(#[from] RgbParseError),
    /// A schedule time or day-mask parameter is malformed.
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
    /// The schedule action type is not `preset`, `color`, or `power_off`.
    #[error("unknown schedule action `{value}`")]
    UnknownScheduleAction { value: String },
}

/// One logical command addressed to an AQ-S fixture.
///
/// Each variant carries the typed fields its opcode encodes; constructing
/// a value is all the validation the encoder performs. The textual
/// colon-delimited grammar (`"BRIGHTNESS:42"`,
/// `"SPECTRUM:10:20:30:40:50"`) parses into the same variants via
/// [`FromStr`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightCommand {
    /// Switch the fixture on or off.
    Power(LightPower),
    /// Set overall brightness. The byte passes through unclamped; callers
    /// constrain it to `0..=100`.
    Brightness(u8),
    /// Activate a colour preset; `None` encodes the unknown-preset byte.
    Preset(Option<Preset>),
    /// Fill with a single colour.
    SolidColour(Rgb),
    /// Run a two-colour gradient.
    Gradient {
        /// Gradient start colour.
        start: Rgb,
        /// Gradient end colour.
        end: Rgb,
    },
    /// Apply explicit five-channel spectrum levels.
    Spectrum(SpectrumLevels),
    /// Start a sunrise transition lasting the given minutes.
    Sunrise(u8),
    /// Start a sunset transition lasting the given minutes.
    Sunset(u8),
    /// Remove every stored schedule slot.
    ScheduleClear,
    /// Store one schedule slot.
    ScheduleAdd(ScheduleSlot),
    /// Ask the fixture to report its state on the notify channel.
    RequestState,
    /// Synchronise the fixture clock to the given timestamp.
    SyncTime {
        /// Wall-clock timestamp encoded into the frame.
        timestamp: OffsetDateTime,
    },
    /// Restore factory defaults.
    FactoryReset,
}

impl LightCommand {
    /// Returns the grammar-level command name, used for logging.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Power(LightPower::On) => "POWER_ON",
            Self::Power(LightPower::Off) => "POWER_OFF",
            Self::Brightness(_) => "BRIGHTNESS",
            Self::Preset(_) => "PRESET",
            Self::SolidColour(_) => "COLOR_HEX",
            Self::Gradient { .. } => "GRADIENT_HEX",
            Self::Spectrum(_) => "SPECTRUM",
            Self::Sunrise(_) => "SUNRISE",
            Self::Sunset(_) => "SUNSET",
            Self::ScheduleClear => "SCHEDULE_CLEAR",
            Self::ScheduleAdd(_) => "SCHEDULE_ADD",
            Self::RequestState => "REQUEST_STATE",
            Self::SyncTime { .. } => "SYNC_TIME",
            Self::FactoryReset => "FACTORY_RESET",
        }
    }

    /// Returns the one-byte opcode for this command.
    ///
    /// ```
    /// use aqs::LightCommand;
    ///
    /// assert_eq!(0x10, LightCommand::ScheduleClear.opcode());
    /// assert_eq!(0xFE, LightCommand::FactoryReset.opcode());
    /// ```
    #[must_use]
    pub fn opcode(&self) -> u8 {
        match self {
            Self::Power(_) => OPCODE_POWER,
            Self::Brightness(_) => OPCODE_BRIGHTNESS,
            Self::Preset(_) => OPCODE_PRESET,
            Self::SolidColour(_) => OPCODE_SOLID_COLOUR,
            Self::Spectrum(_) => OPCODE_SPECTRUM,
            Self::Sunrise(_) => OPCODE_SUNRISE,
            Self::Sunset(_) => OPCODE_SUNSET,
            Self::Gradient { .. } => OPCODE_GRADIENT,
            Self::ScheduleClear => OPCODE_SCHEDULE_CLEAR,
            Self::ScheduleAdd(_) => OPCODE_SCHEDULE_ADD,
            Self::RequestState => OPCODE_REQUEST_STATE,
            Self::SyncTime { .. } => OPCODE_SYNC_TIME,
            Self::FactoryReset => OPCODE_FACTORY_RESET,
        }
    }

    /// Returns the opcode-specific payload bytes.
    #[must_use]
    pub fn payload(&self) -> Vec<u8> {
        match self {
            Self::Power(power) => vec![power.as_payload_byte()],
            Self::Brightness(value) => vec![*value],
            Self::Preset(preset) => vec![preset.map_or(0x00, Preset::code)],
            Self::SolidColour(colour) => vec![colour.r, colour.g, colour.b],
            Self::Gradient { start, end } => {
                vec![start.r, start.g, start.b, end.r, end.g, end.b]
            }
            Self::Spectrum(levels) => levels.as_payload().to_vec(),
            Self::Sunrise(minutes) | Self::Sunset(minutes) => vec![*minutes],
            Self::ScheduleClear | Self::RequestState | Self::FactoryReset => Vec::new(),
            Self::ScheduleAdd(slot) => slot.payload_bytes(),
            Self::SyncTime { timestamp } => sync_time_payload(*timestamp).to_vec(),
        }
    }

    /// Encodes this command into a ready-to-transmit frame.
    ///
    /// Encoding a typed command is deterministic: the same value always
    /// yields byte-identical frames.
    ///
    /// # Errors
    ///
    /// Returns an error when the payload exceeds the frame size limit,
    /// which no current command shape can reach.
    ///
    /// ```
    /// use aqs::{LightCommand, LightPower};
    ///
    /// let frame = LightCommand::Power(LightPower::On).to_frame()?;
    /// assert_eq!(vec![0x7E, 0x02, 0x01, 0x01, 0x00, 0xEF], frame);
    /// # Ok::<(), aqs::FrameCodecError>(())
    /// ```
    pub fn to_frame(&self) -> Result<Vec<u8>, FrameCodecError> {
        FrameCodec::encode(self.opcode(), &self.payload())
    }
}

impl FromStr for LightCommand {
    type Err = CommandParseError;

    /// Parses the colon-delimited command grammar.
    ///
    /// `SYNC_TIME` captures the current UTC wall clock at parse time; every
    /// other command parses into a value-determined, time-independent
    /// variant.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let mut tokens = value.split(':');
        let name = tokens.next().unwrap_or_default();
        let params: Vec<&str> = tokens.collect();

        match name {
            "POWER_ON" => Ok(Self::Power(LightPower::On)),
            "POWER_OFF" => Ok(Self::Power(LightPower::Off)),
            "BRIGHTNESS" => {
                let value = require_param(&params, 0, "BRIGHTNESS", "value")?;
                Ok(Self::Brightness(parse_byte(value)?))
            }
            "PRESET" => {
                let name = require_param(&params, 0, "PRESET", "name")?;
                Ok(Self::Preset(Preset::from_name(name)))
            }
            "COLOR_HEX" => {
                let hex = require_param(&params, 0, "COLOR_HEX", "colour")?;
                Ok(Self::SolidColour(Rgb::from_hex(hex)?))
            }
            "GRADIENT_HEX" => {
                let start = require_param(&params, 0, "GRADIENT_HEX", "start colour")?;
                let end = require_param(&params, 1, "GRADIENT_HEX", "end colour")?;
                Ok(Self::Gradient {
                    start: Rgb::from_hex(start)?,
                    end: Rgb::from_hex(end)?,
                })
            }
            "SPECTRUM" => {
                if params.len() != SPECTRUM_CHANNELS {
                    return Err(CommandParseError::InvalidParameterCount {
                        command: "SPECTRUM",
                        expected: SPECTRUM_CHANNELS,
                        actual: params.len(),
                    });
                }
                Ok(Self::Spectrum(SpectrumLevels::new(
                    parse_byte(params[0])?,
                    parse_byte(params[1])?,
                    parse_byte(params[2])?,
                    parse_byte(params[3])?,
                    parse_byte(params[4])?,
                )))
            }
            "SUNRISE" => {
                let minutes = require_param(&params, 0, "SUNRISE", "minutes")?;
                Ok(Self::Sunrise(parse_byte(minutes)?))
            }
            "SUNSET" => {
                let minutes = require_param(&params, 0, "SUNSET", "minutes")?;
                Ok(Self::Sunset(parse_byte(minutes)?))
            }
            "SCHEDULE_CLEAR" => Ok(Self::ScheduleClear),
            "SCHEDULE_ADD" => parse_schedule_add(&params),
            "REQUEST_STATE" => Ok(Self::RequestState),
            "SYNC_TIME" => Ok(Self::SyncTime {
                timestamp: OffsetDateTime::now_utc(),
            }),
            "FACTORY_RESET" => Ok(Self::FactoryReset),
            unknown => Err(CommandParseError::UnknownCommand {
                name: unknown.to_string(),
            }),
        }
    }
}

/// Builds the six-byte clock payload: years since 2000, month, day, hour,
/// minute, second.
fn sync_time_payload(timestamp: OffsetDateTime) -> [u8; 6] {
    let year = u8::try_from((timestamp.year() - 2000).rem_euclid(256))
        .expect("year offset modulo 256 should always fit in u8");
    [
        year,
        timestamp.month() as u8,
        timestamp.day(),
        timestamp.hour(),
        timestamp.minute(),
        timestamp.second(),
    ]
}

/// Parses `SCHEDULE_ADD` parameters. The top-level split already broke the
/// two `HH:MM` times into separate hour and minute tokens, so the window
/// occupies four positions.
fn parse_schedule_add(params: &[&str]) -> Result<LightCommand, CommandParseError> {
    if params.len() < SCHEDULE_ADD_MIN_PARAMS {
        return Err(CommandParseError::InvalidParameterCount {
            command: "SCHEDULE_ADD",
            expected: SCHEDULE_ADD_MIN_PARAMS,
            actual: params.len(),
        });
    }

    let index = parse_byte(params[0])?;
    let enabled = parse_byte(params[1])? != 0;
    let start = parse_time_pair(params[2], params[3])?;
    let end = parse_time_pair(params[4], params[5])?;
    let days: DayMask = params[6].parse()?;
    let action = parse_schedule_action(params[7], params.get(8).copied())?;

    Ok(LightCommand::ScheduleAdd(
        ScheduleSlot::builder()
            .index(index)
            .enabled(enabled)
            .start(start)
            .end(end)
            .days(days)
            .action(action)
            .build(),
    ))
}

fn parse_schedule_action(
    action_type: &str,
    action_value: Option<&str>,
) -> Result<ScheduleAction, CommandParseError> {
    match action_type {
        "preset" => {
            let name = action_value.ok_or(CommandParseError::MissingParameter {
                command: "SCHEDULE_ADD",
                parameter: "preset name",
            })?;
            Ok(ScheduleAction::Preset(Preset::from_name(name)))
        }
        "color" => {
            let hex = action_value.ok_or(CommandParseError::MissingParameter {
                command: "SCHEDULE_ADD",
                parameter: "colour",
            })?;
            Ok(ScheduleAction::Colour(Rgb::from_hex(hex)?))
        }
        "power_off" => Ok(ScheduleAction::PowerOff),
        unknown => Err(CommandParseError::UnknownScheduleAction {
            value: unknown.to_string(),
        }),
    }
}

fn parse_time_pair(hour: &str, minute: &str) -> Result<TimeOfDay, CommandParseError> {
    let invalid = || {
        CommandParseError::Schedule(ScheduleError::InvalidTime {
            value: format!("{hour}:{minute}"),
        })
    };
    Ok(TimeOfDay::new(
        hour.parse().map_err(|_unparsed| invalid())?,
        minute.parse().map_err(|_unparsed| invalid())?,
    ))
}

fn require_param<'a>(
    params: &[&'a str],
    index: usize,
    command: &'static str,
    parameter: &'static str,
) -> Result<&'a str, CommandParseError> {
    params
        .get(index)
        .copied()
        .filter(|value| !value.is_empty())
        .ok_or(CommandParseError::MissingParameter { command, parameter })
}

fn parse_byte(value: &str) -> Result<u8, CommandParseError> {
    value
        .parse()
        .map_err(|_unparsed| CommandParseError::InvalidInteger {
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use crate::handlers::{END_MARKER, START_MARKER};

    use super::*;

    fn parse(value: &str) -> LightCommand {
        value.parse().expect("command grammar should parse")
    }

    #[test]
    fn power_on_matches_documented_frame() {
        let frame = parse("POWER_ON").to_frame().expect("should encode");
        assert_eq!(vec![0x7E, 0x02, 0x01, 0x01, 0x00, 0xEF], frame);
    }

    #[test]
    fn colour_hex_matches_documented_frame() {
        let command = parse("COLOR_HEX:ff8800");
        assert_eq!(0x04, command.opcode());
        assert_eq!(vec![0xFF, 0x88, 0x00], command.payload());

        let frame = command.to_frame().expect("should encode");
        assert_eq!(0x04, frame[1], "length byte counts opcode plus payload");
    }

    #[test]
    fn schedule_add_reverses_day_mask() {
        let command = parse("SCHEDULE_ADD:0:1:08:00:18:00:1111100:preset:clear");
        assert_eq!(0x11, command.opcode());
        assert_eq!(vec![0, 1, 8, 0, 18, 0, 0b001_1111, 0x01, 0x02], command.payload());
    }

    #[rstest]
    #[case("SCHEDULE_ADD:1:1:06:30:08:00:1111111:color:#00ff80", vec![1, 1, 6, 30, 8, 0, 0x7F, 0x02, 0x00, 0xFF, 0x80])]
    #[case("SCHEDULE_ADD:2:0:22:00:06:00:0000011:power_off", vec![2, 0, 22, 0, 6, 0, 0x60, 0x03])]
    #[case("SCHEDULE_ADD:3:1:08:00:18:00:1111100:preset:bogus", vec![3, 1, 8, 0, 18, 0, 0x1F, 0x01, 0x00])]
    fn schedule_add_encodes_action_trailers(#[case] input: &str, #[case] expected: Vec<u8>) {
        assert_eq!(expected, parse(input).payload());
    }

    #[test]
    fn unknown_preset_name_encodes_zero_byte() {
        let command = parse("PRESET:bogus");
        assert_eq!(0x03, command.opcode());
        assert_eq!(vec![0x00], command.payload());
    }

    #[rstest]
    #[case("BRIGHTNESS:0", 0)]
    #[case("BRIGHTNESS:100", 100)]
    #[case::no_clamping("BRIGHTNESS:150", 150)]
    fn brightness_bytes_pass_through_unclamped(#[case] input: &str, #[case] expected: u8) {
        assert_eq!(vec![expected], parse(input).payload());
    }

    #[test]
    fn encoding_is_deterministic() {
        let command = parse("SPECTRUM:10:20:30:40:50");
        assert_eq!(
            command.to_frame().expect("should encode"),
            command.to_frame().expect("should encode"),
        );
    }

    #[rstest]
    #[case("POWER_ON")]
    #[case("POWER_OFF")]
    #[case("BRIGHTNESS:42")]
    #[case("PRESET:coral")]
    #[case("COLOR_HEX:3b82f6")]
    #[case("GRADIENT_HEX:0000ff:ff8000")]
    #[case("SPECTRUM:10:20:30:40:50")]
    #[case("SUNRISE:30")]
    #[case("SUNSET:45")]
    #[case("SCHEDULE_CLEAR")]
    #[case("SCHEDULE_ADD:0:1:08:00:18:00:1111100:preset:clear")]
    #[case("REQUEST_STATE")]
    #[case("SYNC_TIME")]
    #[case("FACTORY_RESET")]
    fn every_command_produces_a_well_formed_frame(#[case] input: &str) {
        let command = parse(input);
        let frame = command.to_frame().expect("should encode");

        assert_eq!(START_MARKER, frame[0]);
        assert_eq!(END_MARKER, *frame.last().expect("frame is never empty"));
        assert_eq!(usize::from(frame[1]), 1 + command.payload().len());

        let decoded = FrameCodec::decode(&frame).expect("own frames should verify");
        assert_eq!(command.opcode(), decoded.opcode());
        assert_eq!(command.payload(), decoded.payload());
    }

    #[test]
    fn sync_time_parses_into_six_byte_payload() {
        let command = parse("SYNC_TIME");
        assert_eq!(0x21, command.opcode());
        assert_eq!(6, command.payload().len());
    }

    #[test]
    fn unknown_command_is_rejected() {
        let result: Result<LightCommand, _> = "DISCO_MODE:1".parse();
        assert_matches!(
            result,
            Err(CommandParseError::UnknownCommand { name }) if name == "DISCO_MODE"
        );
    }

    #[rstest]
    #[case("BRIGHTNESS", "value")]
    #[case("PRESET", "name")]
    #[case("COLOR_HEX", "colour")]
    #[case("SUNRISE", "minutes")]
    fn missing_parameters_are_rejected(#[case] input: &str, #[case] parameter: &'static str) {
        let result: Result<LightCommand, _> = input.parse();
        assert_matches!(
            result,
            Err(CommandParseError::MissingParameter { parameter: p, .. }) if p == parameter
        );
    }

    #[test]
    fn invalid_hex_colour_is_an_encoder_failure() {
        let result: Result<LightCommand, _> = "COLOR_HEX:zzzzzz".parse();
        assert_matches!(result, Err(CommandParseError::InvalidColour(_)));
    }

    #[rstest]
    #[case("SPECTRUM:10:20:30", 3)]
    #[case("SPECTRUM:10:20:30:40:50:60", 6)]
    fn spectrum_requires_exactly_five_channels(#[case] input: &str, #[case] actual: usize) {
        let result: Result<LightCommand, _> = input.parse();
        assert_matches!(
            result,
            Err(CommandParseError::InvalidParameterCount {
                command: "SPECTRUM",
                expected: 5,
                actual: a,
            }) if a == actual
        );
    }

    #[test]
    fn brightness_rejects_non_integer_values() {
        let result: Result<LightCommand, _> = "BRIGHTNESS:bright".parse();
        assert_matches!(
            result,
            Err(CommandParseError::InvalidInteger { value }) if value == "bright"
        );
    }

    #[test]
    fn schedule_add_rejects_short_parameter_lists() {
        let result: Result<LightCommand, _> = "SCHEDULE_ADD:0:1:08:00".parse();
        assert_matches!(
            result,
            Err(CommandParseError::InvalidParameterCount {
                command: "SCHEDULE_ADD",
                ..
            })
        );
    }

    #[test]
    fn schedule_add_rejects_unknown_action() {
        let result: Result<LightCommand, _> =
            "SCHEDULE_ADD:0:1:08:00:18:00:1111100:strobe:fast".parse();
        assert_matches!(
            result,
            Err(CommandParseError::UnknownScheduleAction { value }) if value == "strobe"
        );
    }

    #[test]
    fn schedule_add_rejects_malformed_day_mask() {
        let result: Result<LightCommand, _> =
            "SCHEDULE_ADD:0:1:08:00:18:00:11100:preset:clear".parse();
        assert_matches!(
            result,
            Err(CommandParseError::Schedule(ScheduleError::InvalidDayMask { .. }))
        );
    }
}
