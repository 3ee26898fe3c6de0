mod fake_backend;
mod hardware;
mod model;
mod session;

pub(crate) use self::fake_backend::{
    FakeBackendConfig, HexPayload, NotificationPayloads, ScanFixture,
};
pub use self::hardware::HardwareClient;
pub(crate) use self::hardware::{fake_hardware_client, unconfigured_hardware_client};
pub use self::model::{FoundDevice, ListenStopReason, ListenSummary, NotificationRunSummary};
pub use self::session::{DeviceSession, SessionTransport, WriteMode};
