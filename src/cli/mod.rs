pub(crate) mod command;
pub(crate) mod control;
pub(crate) mod decode;
pub(crate) mod encode;
pub(crate) mod listen;
pub(crate) mod ui;

pub use self::command::{Args, Command, FakeArgs, LogLevel, OutputFormat};
pub use self::control::{
    BrightnessArgs, ColourArgs, ControlAction, ControlArgs, GradientArgs, PowerArgs, PowerState,
    PresetArgs, ScheduleAddArgs, SpectrumArgs, SyncTimeArgs, TransitionArgs,
};
pub use self::decode::DecodeArgs;
pub use self::encode::EncodeArgs;
pub use self::listen::ListenArgs;
