mod brightness;
mod colour;
mod frame_codec;
mod maintenance;
mod power;
mod preset;
mod schedule;
mod spectrum;
mod time_sync;
mod transition;

pub use self::brightness::{Brightness, BrightnessError, BrightnessHandler};
pub use self::colour::{GradientHandler, Rgb, RgbParseError, SolidColourHandler};
pub use self::frame_codec::{
    END_MARKER, FrameCodec, FrameCodecError, RawFrame, START_MARKER,
};
pub use self::maintenance::{FactoryResetHandler, StateRequestHandler};
pub use self::power::{LightPower, PowerHandler};
pub use self::preset::{Preset, PresetHandler};
pub use self::schedule::{
    DayMask, ScheduleAction, ScheduleError, ScheduleHandler, ScheduleSlot, TimeOfDay,
};
pub use self::spectrum::{SpectrumHandler, SpectrumLevels};
pub use self::time_sync::TimeSyncHandler;
pub use self::transition::{SunTransition, SunTransitionHandler};

use crate::command::LightCommand;
use crate::error::ProtocolError;
use crate::hw::{DeviceSession, WriteMode};
use crate::protocol::EndpointId;

/// Encodes one command and writes the frame to the control characteristic.
///
/// Encoding happens before every write; a command that fails to encode
/// never reaches the transport.
pub(crate) async fn write_command(
    session: &DeviceSession,
    command: &LightCommand,
) -> Result<(), ProtocolError> {
    let frame = command.to_frame()?;
    session
        .write_endpoint(
            EndpointId::WriteCharacteristic,
            &frame,
            WriteMode::WithoutResponse,
        )
        .await?;
    Ok(())
}
