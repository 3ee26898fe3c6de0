use std::io;

use anyhow::{Context, Result};
use clap::{ArgGroup, Args, Subcommand, ValueEnum};
use serde::Serialize;
use time::OffsetDateTime;
use tracing::instrument;

use crate::cli::OutputFormat;
use crate::cli::ui::{Painter, StateView};
use crate::hw::HardwareClient;
use crate::notification::{NotificationHandler, StateSnapshot};
use crate::protocol::EndpointId;
use crate::terminal::TerminalClient;
use crate::{
    Brightness, BrightnessHandler, DayMask, FactoryResetHandler, GradientHandler, LightPower,
    PowerHandler, Preset, PresetHandler, Rgb, ScheduleAction, ScheduleHandler, ScheduleSlot,
    SolidColourHandler, SpectrumHandler, SpectrumLevels, StateRequestHandler, SunTransition,
    SunTransitionHandler, TimeOfDay, TimeSyncHandler,
};

/// JSON result emitted by a `control` action.
#[derive(Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
enum ControlResult {
    Power {
        state: String,
    },
    Brightness {
        value: u8,
    },
    Preset {
        preset: Preset,
    },
    Colour {
        colour: Rgb,
    },
    Gradient {
        start: Rgb,
        end: Rgb,
    },
    Spectrum {
        levels: SpectrumLevels,
    },
    Transition {
        direction: String,
        minutes: u8,
    },
    ScheduleClear,
    ScheduleAdd {
        index: u8,
        enabled: bool,
        start: TimeOfDay,
        end: TimeOfDay,
        days: DayMask,
        #[serde(rename = "schedule_action")]
        action: String,
    },
    SyncTime {
        unix_timestamp: i64,
    },
    RequestState {
        snapshot: Option<StateSnapshot>,
    },
    FactoryReset,
}

/// Arguments for the `control` command.
#[derive(Debug, Args)]
pub struct ControlArgs {
    #[command(subcommand)]
    action: ControlAction,
}

impl ControlArgs {
    /// Creates control arguments for one action.
    ///
    /// ```
    /// use aqs::{ControlAction, ControlArgs, SyncTimeArgs};
    ///
    /// let args = ControlArgs::new(ControlAction::SyncTime(SyncTimeArgs::new(None)));
    /// let _ = args;
    /// ```
    #[must_use]
    pub fn new(action: ControlAction) -> Self {
        Self { action }
    }
}

/// Action performed by the `control` command.
#[derive(Debug, Subcommand)]
pub enum ControlAction {
    /// Turn the light on or off.
    Power(PowerArgs),
    /// Set overall brightness (0..=100).
    Brightness(BrightnessArgs),
    /// Activate a built-in colour preset.
    Preset(PresetArgs),
    /// Fill with a single hex colour.
    Colour(ColourArgs),
    /// Run a gradient between two hex colours.
    Gradient(GradientArgs),
    /// Apply explicit five-channel spectrum levels (each 0..=100).
    Spectrum(SpectrumArgs),
    /// Ramp the light up over the given minutes.
    Sunrise(TransitionArgs),
    /// Ramp the light down over the given minutes.
    Sunset(TransitionArgs),
    /// Remove every stored schedule slot.
    ScheduleClear,
    /// Store one schedule slot.
    ScheduleAdd(ScheduleAddArgs),
    /// Synchronise the fixture clock.
    SyncTime(SyncTimeArgs),
    /// Request a state snapshot and decode the reply.
    RequestState,
    /// Restore factory defaults.
    FactoryReset,
}

/// Arguments for `control power`.
#[derive(Debug, Args)]
pub struct PowerArgs {
    #[arg(value_enum)]
    state: PowerState,
}

impl PowerArgs {
    /// Creates power-control arguments.
    ///
    /// ```
    /// use aqs::{PowerArgs, PowerState};
    ///
    /// let args = PowerArgs::new(PowerState::On);
    /// let _ = args;
    /// ```
    #[must_use]
    pub fn new(state: PowerState) -> Self {
        Self { state }
    }
}

/// Requested power state.
#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
pub enum PowerState {
    /// Turn the light off.
    Off,
    /// Turn the light on.
    On,
}

impl PowerState {
    fn to_handler_power(self) -> LightPower {
        match self {
            Self::Off => LightPower::Off,
            Self::On => LightPower::On,
        }
    }
}

impl std::fmt::Display for PowerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Off => write!(f, "off"),
            Self::On => write!(f, "on"),
        }
    }
}

/// Arguments for `control brightness`.
#[derive(Debug, Args)]
pub struct BrightnessArgs {
    #[arg(value_parser = parse_brightness)]
    brightness: Brightness,
}

impl BrightnessArgs {
    /// Creates brightness-control arguments.
    ///
    /// # Errors
    ///
    /// Returns an error when `value` is outside `0..=100`.
    ///
    /// ```
    /// use aqs::BrightnessArgs;
    ///
    /// let args = BrightnessArgs::new(75)?;
    /// assert_eq!(75, args.value());
    /// # Ok::<(), aqs::BrightnessError>(())
    /// ```
    pub fn new(value: u8) -> Result<Self, crate::BrightnessError> {
        let brightness = Brightness::new(value)?;
        Ok(Self { brightness })
    }

    /// Returns the validated brightness value.
    #[must_use]
    pub fn value(&self) -> u8 {
        self.brightness.value()
    }
}

/// Arguments for `control preset`.
#[derive(Debug, Args)]
pub struct PresetArgs {
    #[arg(value_enum)]
    preset: Preset,
}

impl PresetArgs {
    /// Creates preset-control arguments.
    ///
    /// ```
    /// use aqs::{Preset, PresetArgs};
    ///
    /// let args = PresetArgs::new(Preset::Coral);
    /// let _ = args;
    /// ```
    #[must_use]
    pub fn new(preset: Preset) -> Self {
        Self { preset }
    }
}

/// Arguments for `control colour`.
#[derive(Debug, Args)]
pub struct ColourArgs {
    /// Six-digit hex colour, with or without a leading `#`.
    #[arg(value_parser = parse_colour)]
    colour: Rgb,
}

impl ColourArgs {
    /// Creates colour-control arguments.
    ///
    /// ```
    /// use aqs::{ColourArgs, Rgb};
    ///
    /// let args = ColourArgs::new(Rgb::new(0x3B, 0x82, 0xF6));
    /// let _ = args;
    /// ```
    #[must_use]
    pub fn new(colour: Rgb) -> Self {
        Self { colour }
    }
}

/// Arguments for `control gradient`.
#[derive(Debug, Args)]
pub struct GradientArgs {
    /// Gradient start colour as six hex digits.
    #[arg(value_parser = parse_colour)]
    start: Rgb,
    /// Gradient end colour as six hex digits.
    #[arg(value_parser = parse_colour)]
    end: Rgb,
}

impl GradientArgs {
    /// Creates gradient-control arguments.
    #[must_use]
    pub fn new(start: Rgb, end: Rgb) -> Self {
        Self { start, end }
    }
}

/// Arguments for `control spectrum`.
#[derive(Debug, Args)]
pub struct SpectrumArgs {
    /// Red channel level.
    #[arg(value_parser = parse_channel)]
    red: u8,
    /// Green channel level.
    #[arg(value_parser = parse_channel)]
    green: u8,
    /// Blue channel level.
    #[arg(value_parser = parse_channel)]
    blue: u8,
    /// White channel level.
    #[arg(value_parser = parse_channel)]
    white: u8,
    /// UV channel level.
    #[arg(value_parser = parse_channel)]
    uv: u8,
}

impl SpectrumArgs {
    /// Creates spectrum-control arguments from channel levels.
    #[must_use]
    pub fn new(levels: SpectrumLevels) -> Self {
        Self {
            red: levels.red,
            green: levels.green,
            blue: levels.blue,
            white: levels.white,
            uv: levels.uv,
        }
    }

    fn levels(&self) -> SpectrumLevels {
        SpectrumLevels::new(self.red, self.green, self.blue, self.white, self.uv)
    }
}

/// Arguments for `control sunrise` and `control sunset`.
#[derive(Debug, Args)]
pub struct TransitionArgs {
    /// Transition duration in minutes.
    minutes: u8,
}

impl TransitionArgs {
    /// Creates transition arguments.
    #[must_use]
    pub fn new(minutes: u8) -> Self {
        Self { minutes }
    }
}

/// Arguments for `control schedule-add`.
#[derive(Debug, Args)]
#[command(group(ArgGroup::new("schedule_action").required(true)))]
pub struct ScheduleAddArgs {
    /// Schedule slot index on the device.
    index: u8,
    /// Window start time as HH:MM.
    #[arg(value_parser = parse_time)]
    start: TimeOfDay,
    /// Window end time as HH:MM.
    #[arg(value_parser = parse_time)]
    end: TimeOfDay,
    /// Seven-character day mask, Monday first (e.g. 1111100).
    #[arg(value_parser = parse_day_mask)]
    days: DayMask,
    /// Activate a colour preset when the window opens.
    #[arg(long, value_enum, group = "schedule_action")]
    preset: Option<Preset>,
    /// Apply a solid hex colour when the window opens.
    #[arg(long, value_parser = parse_colour, group = "schedule_action")]
    colour: Option<Rgb>,
    /// Switch the light off when the window opens.
    #[arg(long, group = "schedule_action")]
    power_off: bool,
    /// Store the slot disabled.
    #[arg(long)]
    disabled: bool,
}

impl ScheduleAddArgs {
    fn to_slot(&self) -> ScheduleSlot {
        let action = if let Some(preset) = self.preset {
            ScheduleAction::Preset(Some(preset))
        } else if let Some(colour) = self.colour {
            ScheduleAction::Colour(colour)
        } else {
            ScheduleAction::PowerOff
        };

        ScheduleSlot::builder()
            .index(self.index)
            .enabled(!self.disabled)
            .start(self.start)
            .end(self.end)
            .days(self.days)
            .action(action)
            .build()
    }
}

/// Arguments for `control sync-time`.
#[derive(Debug, Args)]
pub struct SyncTimeArgs {
    /// Unix timestamp in UTC seconds. Uses current UTC time when omitted.
    #[arg(long)]
    unix: Option<i64>,
}

impl SyncTimeArgs {
    /// Creates sync-time arguments.
    ///
    /// ```
    /// use aqs::SyncTimeArgs;
    ///
    /// let args = SyncTimeArgs::new(Some(1_700_000_000));
    /// let _ = args;
    /// ```
    #[must_use]
    pub fn new(unix: Option<i64>) -> Self {
        Self { unix }
    }

    fn resolve_timestamp(&self) -> Result<OffsetDateTime> {
        match self.unix {
            Some(value) => OffsetDateTime::from_unix_timestamp(value)
                .with_context(|| format!("invalid unix timestamp: {value}")),
            None => Ok(OffsetDateTime::now_utc()),
        }
    }
}

/// Executes the `control` command.
#[instrument(
    skip(client, args, out, terminal_client),
    level = "info",
    fields(action = ?args.action, ?output_format)
)]
pub(crate) async fn run<W>(
    client: Box<dyn HardwareClient>,
    args: &ControlArgs,
    out: &mut W,
    terminal_client: &dyn TerminalClient,
    output_format: OutputFormat,
) -> Result<()>
where
    W: io::Write,
{
    let session = crate::SessionHandler::new(client).connect_first().await?;

    let command_result =
        run_with_session(&session, args, out, terminal_client, output_format).await;
    let close_result = session.close().await;

    if let Err(error) = close_result {
        if command_result.is_ok() {
            return Err(error.into());
        }
        tracing::trace!(?error, "failed to close control session cleanly");
    }

    command_result
}

async fn run_with_session<W>(
    session: &crate::DeviceSession,
    args: &ControlArgs,
    out: &mut W,
    terminal_client: &dyn TerminalClient,
    output_format: OutputFormat,
) -> Result<()>
where
    W: io::Write,
{
    match &args.action {
        ControlAction::Power(power_args) => {
            PowerHandler::set_power(session, power_args.state.to_handler_power()).await?;
            match output_format {
                OutputFormat::Pretty => {
                    writeln!(out, "Applied power state: {}", power_args.state)?;
                }
                OutputFormat::Json => {
                    write_json_line(
                        out,
                        &ControlResult::Power {
                            state: power_args.state.to_string(),
                        },
                    )?;
                }
            }
        }
        ControlAction::Brightness(brightness_args) => {
            BrightnessHandler::set_brightness(session, brightness_args.brightness).await?;
            match output_format {
                OutputFormat::Pretty => {
                    writeln!(out, "Applied brightness: {}", brightness_args.value())?;
                }
                OutputFormat::Json => {
                    write_json_line(
                        out,
                        &ControlResult::Brightness {
                            value: brightness_args.value(),
                        },
                    )?;
                }
            }
        }
        ControlAction::Preset(preset_args) => {
            PresetHandler::select_preset(session, preset_args.preset).await?;
            match output_format {
                OutputFormat::Pretty => {
                    writeln!(
                        out,
                        "Applied preset: {}",
                        preset_args.preset.display_name()
                    )?;
                }
                OutputFormat::Json => {
                    write_json_line(
                        out,
                        &ControlResult::Preset {
                            preset: preset_args.preset,
                        },
                    )?;
                }
            }
        }
        ControlAction::Colour(colour_args) => {
            SolidColourHandler::set_colour(session, colour_args.colour).await?;
            match output_format {
                OutputFormat::Pretty => {
                    writeln!(out, "Applied solid colour: {}", colour_args.colour)?;
                }
                OutputFormat::Json => {
                    write_json_line(
                        out,
                        &ControlResult::Colour {
                            colour: colour_args.colour,
                        },
                    )?;
                }
            }
        }
        ControlAction::Gradient(gradient_args) => {
            GradientHandler::set_gradient(session, gradient_args.start, gradient_args.end).await?;
            match output_format {
                OutputFormat::Pretty => {
                    writeln!(
                        out,
                        "Applied gradient: {} -> {}",
                        gradient_args.start, gradient_args.end
                    )?;
                }
                OutputFormat::Json => {
                    write_json_line(
                        out,
                        &ControlResult::Gradient {
                            start: gradient_args.start,
                            end: gradient_args.end,
                        },
                    )?;
                }
            }
        }
        ControlAction::Spectrum(spectrum_args) => {
            let levels = spectrum_args.levels();
            SpectrumHandler::set_spectrum(session, levels).await?;
            match output_format {
                OutputFormat::Pretty => {
                    writeln!(
                        out,
                        "Applied spectrum: r={} g={} b={} w={} uv={}",
                        levels.red, levels.green, levels.blue, levels.white, levels.uv
                    )?;
                }
                OutputFormat::Json => {
                    write_json_line(out, &ControlResult::Spectrum { levels })?;
                }
            }
        }
        ControlAction::Sunrise(transition_args) => {
            run_transition(
                session,
                SunTransition::Sunrise,
                transition_args.minutes,
                out,
                output_format,
            )
            .await?;
        }
        ControlAction::Sunset(transition_args) => {
            run_transition(
                session,
                SunTransition::Sunset,
                transition_args.minutes,
                out,
                output_format,
            )
            .await?;
        }
        ControlAction::ScheduleClear => {
            ScheduleHandler::clear_schedules(session).await?;
            match output_format {
                OutputFormat::Pretty => writeln!(out, "Cleared all schedule slots")?,
                OutputFormat::Json => write_json_line(out, &ControlResult::ScheduleClear)?,
            }
        }
        ControlAction::ScheduleAdd(schedule_args) => {
            let slot = schedule_args.to_slot();
            ScheduleHandler::add_schedule(session, slot).await?;
            match output_format {
                OutputFormat::Pretty => {
                    writeln!(
                        out,
                        "Stored schedule slot {}: {} -> {} on {} ({})",
                        slot.index(),
                        slot.start(),
                        slot.end(),
                        slot.days(),
                        action_label(slot.action()),
                    )?;
                }
                OutputFormat::Json => {
                    write_json_line(
                        out,
                        &ControlResult::ScheduleAdd {
                            index: slot.index(),
                            enabled: slot.enabled(),
                            start: slot.start(),
                            end: slot.end(),
                            days: slot.days(),
                            action: action_label(slot.action()),
                        },
                    )?;
                }
            }
        }
        ControlAction::SyncTime(sync_time_args) => {
            let timestamp = sync_time_args.resolve_timestamp()?;
            TimeSyncHandler::sync_time(session, timestamp).await?;
            match output_format {
                OutputFormat::Pretty => {
                    writeln!(
                        out,
                        "Synced time (UTC unix): {}",
                        timestamp.unix_timestamp()
                    )?;
                }
                OutputFormat::Json => {
                    write_json_line(
                        out,
                        &ControlResult::SyncTime {
                            unix_timestamp: timestamp.unix_timestamp(),
                        },
                    )?;
                }
            }
        }
        ControlAction::RequestState => {
            let snapshot = request_state_snapshot(session).await?;
            match output_format {
                OutputFormat::Pretty => {
                    let painter = Painter::new(terminal_client.stdout_is_terminal());
                    match &snapshot {
                        Some(snapshot) => {
                            writeln!(out, "{}", painter.heading("Fixture state:"))?;
                            writeln!(out, "{}", StateView::new(snapshot, &painter))?;
                        }
                        None => {
                            writeln!(
                                out,
                                "{}",
                                painter.warning("No decodable state notification received")
                            )?;
                        }
                    }
                }
                OutputFormat::Json => {
                    write_json_line(out, &ControlResult::RequestState { snapshot })?;
                }
            }
        }
        ControlAction::FactoryReset => {
            FactoryResetHandler::factory_reset(session).await?;
            match output_format {
                OutputFormat::Pretty => writeln!(out, "Requested factory reset")?,
                OutputFormat::Json => write_json_line(out, &ControlResult::FactoryReset)?,
            }
        }
    }

    Ok(())
}

async fn run_transition<W>(
    session: &crate::DeviceSession,
    direction: SunTransition,
    minutes: u8,
    out: &mut W,
    output_format: OutputFormat,
) -> Result<()>
where
    W: io::Write,
{
    SunTransitionHandler::start(session, direction, minutes).await?;
    let direction_label = match direction {
        SunTransition::Sunrise => "sunrise",
        SunTransition::Sunset => "sunset",
    };
    match output_format {
        OutputFormat::Pretty => {
            writeln!(out, "Started {direction_label} over {minutes} minute(s)")?;
        }
        OutputFormat::Json => {
            write_json_line(
                out,
                &ControlResult::Transition {
                    direction: direction_label.to_string(),
                    minutes,
                },
            )?;
        }
    }
    Ok(())
}

/// Sends a state request, then decodes the first notification that arrives.
async fn request_state_snapshot(
    session: &crate::DeviceSession,
) -> Result<Option<StateSnapshot>> {
    let endpoint = EndpointId::ReadNotifyCharacteristic;
    StateRequestHandler::request_state(session).await?;
    session.subscribe_endpoint(endpoint).await?;

    let mut snapshot = None;
    let run_result = session
        .run_notifications(endpoint, Some(1), |_index, payload| {
            match NotificationHandler::decode(payload) {
                Ok(decoded) => snapshot = Some(decoded),
                Err(error) => {
                    tracing::debug!(?error, "discarding undecodable state notification");
                }
            }
        })
        .await;

    if let Err(error) = session.unsubscribe_endpoint(endpoint).await {
        tracing::debug!(?error, "failed to unsubscribe cleanly");
    }
    run_result?;
    Ok(snapshot)
}

fn action_label(action: ScheduleAction) -> String {
    match action {
        ScheduleAction::Preset(Some(preset)) => format!("preset:{preset}"),
        ScheduleAction::Preset(None) => "preset:<unknown>".to_string(),
        ScheduleAction::Colour(colour) => format!("colour:{colour}"),
        ScheduleAction::PowerOff => "power_off".to_string(),
    }
}

fn write_json_line(out: &mut impl io::Write, value: &impl Serialize) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

fn parse_brightness(value: &str) -> Result<Brightness, String> {
    let parsed = value.parse::<u8>().map_err(|error| error.to_string())?;
    Brightness::new(parsed).map_err(|error| error.to_string())
}

fn parse_colour(value: &str) -> Result<Rgb, String> {
    Rgb::from_hex(value).map_err(|error| error.to_string())
}

fn parse_channel(value: &str) -> Result<u8, String> {
    let parsed = value.parse::<u8>().map_err(|error| error.to_string())?;
    if parsed > 100 {
        return Err(format!("channel level {parsed} is out of range (0..=100)"));
    }
    Ok(parsed)
}

fn parse_time(value: &str) -> Result<TimeOfDay, String> {
    value.parse().map_err(|error: crate::ScheduleError| error.to_string())
}

fn parse_day_mask(value: &str) -> Result<DayMask, String> {
    value.parse().map_err(|error: crate::ScheduleError| error.to_string())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("0", 0)]
    #[case("100", 100)]
    fn parse_brightness_accepts_range(#[case] value: &str, #[case] expected: u8) {
        let brightness = parse_brightness(value).expect("in-range brightness should parse");
        assert_eq!(expected, brightness.value());
    }

    #[test]
    fn parse_brightness_rejects_out_of_range() {
        let error = parse_brightness("101").expect_err("101 should be rejected");
        assert!(error.contains("out of range"));
    }

    #[test]
    fn parse_channel_rejects_out_of_range() {
        let error = parse_channel("120").expect_err("120 should be rejected");
        assert!(error.contains("out of range"));
    }

    #[test]
    fn schedule_args_resolve_preset_action() {
        let args = ScheduleAddArgs {
            index: 1,
            start: TimeOfDay::new(8, 0),
            end: TimeOfDay::new(18, 0),
            days: DayMask::WEEKDAYS,
            preset: Some(Preset::Clear),
            colour: None,
            power_off: false,
            disabled: false,
        };
        let slot = args.to_slot();

        assert!(slot.enabled());
        assert_eq!(ScheduleAction::Preset(Some(Preset::Clear)), slot.action());
        assert_eq!("preset:clear", action_label(slot.action()));
    }

    #[test]
    fn schedule_args_resolve_power_off_action() {
        let args = ScheduleAddArgs {
            index: 2,
            start: TimeOfDay::new(22, 0),
            end: TimeOfDay::new(6, 0),
            days: DayMask::EVERY_DAY,
            preset: None,
            colour: None,
            power_off: true,
            disabled: true,
        };
        let slot = args.to_slot();

        assert!(!slot.enabled());
        assert_eq!(ScheduleAction::PowerOff, slot.action());
    }
}
