use async_trait::async_trait;
use tracing::info;

use super::fake_backend::{FakeBackend, FakeBackendConfig};
use super::session::DeviceSession;
use crate::error::InteractionError;

/// Connects sessions to AQ-S fixtures.
///
/// The crate ships a fixture-driven fake client; real Bluetooth transports
/// live outside this crate and plug in through this trait.
#[async_trait]
pub trait HardwareClient: Send + Sync {
    /// Connects to the first fixture whose local name starts with the prefix.
    async fn connect_first_device(
        self: Box<Self>,
        name_prefix: &str,
    ) -> Result<DeviceSession, InteractionError>;
}

/// Builds a hardware client backed by fake fixtures.
pub(crate) fn fake_hardware_client(config: FakeBackendConfig) -> Box<dyn HardwareClient> {
    info!("using fake transport backend");
    Box::new(FakeHardwareClient {
        backend: FakeBackend::new(config),
    })
}

/// Builds a hardware client for runs with no transport configured.
pub(crate) fn unconfigured_hardware_client() -> Box<dyn HardwareClient> {
    Box::new(UnconfiguredHardwareClient)
}

#[derive(Debug)]
struct FakeHardwareClient {
    backend: FakeBackend,
}

#[async_trait]
impl HardwareClient for FakeHardwareClient {
    async fn connect_first_device(
        self: Box<Self>,
        name_prefix: &str,
    ) -> Result<DeviceSession, InteractionError> {
        let Self { backend } = *self;
        backend.connect_first_matching_device(name_prefix).await
    }
}

/// Placeholder client that fails with guidance instead of connecting.
#[derive(Debug)]
struct UnconfiguredHardwareClient;

#[async_trait]
impl HardwareClient for UnconfiguredHardwareClient {
    async fn connect_first_device(
        self: Box<Self>,
        _name_prefix: &str,
    ) -> Result<DeviceSession, InteractionError> {
        Err(InteractionError::MissingTransportBackend)
    }
}
