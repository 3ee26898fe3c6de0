mod app;
mod cli;
mod command;
mod error;
mod handlers;
mod hw;
mod notification;
mod protocol;
mod telemetry;
mod terminal;
mod utils;

pub use app::{
    SessionHandler, fake_hardware_client, run, run_with_clients,
    run_with_clients_and_log_level, run_with_log_level, unconfigured_hardware_client,
};
pub use cli::{
    Args, BrightnessArgs, ColourArgs, Command, ControlAction, ControlArgs, DecodeArgs, EncodeArgs,
    FakeArgs, GradientArgs, ListenArgs, LogLevel, OutputFormat, PowerArgs, PowerState, PresetArgs,
    ScheduleAddArgs, SpectrumArgs, SyncTimeArgs, TransitionArgs,
};
pub use command::{CommandParseError, LightCommand};
pub use error::{FixtureError, InteractionError, ProtocolError};
pub use handlers::{
    Brightness, BrightnessError, BrightnessHandler, DayMask, END_MARKER, FactoryResetHandler,
    FrameCodec, FrameCodecError, GradientHandler, LightPower, PowerHandler, Preset, PresetHandler,
    RawFrame, Rgb, RgbParseError, START_MARKER, ScheduleAction, ScheduleError, ScheduleHandler,
    ScheduleSlot, SolidColourHandler, SpectrumHandler, SpectrumLevels, StateRequestHandler,
    SunTransition, SunTransitionHandler, TimeOfDay, TimeSyncHandler,
};
pub use hw::{
    DeviceSession, FoundDevice, HardwareClient, ListenStopReason, ListenSummary,
    NotificationRunSummary, SessionTransport, WriteMode,
};
pub use notification::{
    LightMode, NotificationDecodeError, NotificationHandler, STATE_UPDATE_OPCODE, StateSnapshot,
};
pub use protocol::EndpointId;
pub use terminal::{SystemTerminalClient, TerminalClient};
