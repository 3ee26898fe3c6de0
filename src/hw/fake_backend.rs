use std::collections::VecDeque;
use std::str::FromStr;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use bon::Builder;
use tokio::time::sleep;
use tracing::trace;

use super::model::FoundDevice;
use super::session::{DeviceSession, SessionTransport, WriteMode};
use crate::error::{FixtureError, InteractionError};
use crate::handlers::{FrameCodec, Preset};
use crate::notification::STATE_UPDATE_OPCODE;
use crate::protocol::EndpointId;
use crate::utils::parse_hex;

/// Parsed fake scan fixture records.
#[derive(Debug, Clone, derive_more::Into)]
pub(crate) struct ScanFixture {
    devices: Vec<FoundDevice>,
}

impl FromStr for ScanFixture {
    type Err = FixtureError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let devices = parse_scan_fixture(value)?;
        Ok(Self { devices })
    }
}

/// Parsed fake hex payload.
#[derive(Debug, Clone, derive_more::Into)]
pub(crate) struct HexPayload {
    payload: Vec<u8>,
}

impl FromStr for HexPayload {
    type Err = FixtureError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let payload = parse_hex(value)?;
        Ok(Self { payload })
    }
}

/// Parsed fake notification payload fixtures.
#[derive(Debug, Clone, derive_more::Into)]
pub(crate) struct NotificationPayloads {
    payloads: Vec<Vec<u8>>,
}

impl FromStr for NotificationPayloads {
    type Err = FixtureError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let payloads = parse_notifications(value)?;
        Ok(Self { payloads })
    }
}

/// Settings for constructing a fake transport backend.
#[derive(Debug, Builder)]
pub(crate) struct FakeBackendConfig {
    scan_fixture: ScanFixture,
    initial_read: Option<HexPayload>,
    notifications: Option<NotificationPayloads>,
    #[builder(default)]
    discovery_delay: Duration,
}

/// Fixture-driven transport used in tests and non-hardware environments.
#[derive(Debug)]
pub(crate) struct FakeBackend {
    devices: Vec<FoundDevice>,
    initial_read: Option<Vec<u8>>,
    notifications: Vec<Vec<u8>>,
    discovery_delay: Duration,
}

impl FakeBackend {
    /// Creates a fake backend from explicit settings.
    pub(crate) fn new(config: FakeBackendConfig) -> Self {
        let initial_read = config
            .initial_read
            .map(Into::into)
            .or_else(|| Some(default_state_frame()));
        let notifications = config
            .notifications
            .map_or_else(|| vec![default_state_frame()], Into::into);

        Self {
            devices: config.scan_fixture.into(),
            initial_read,
            notifications,
            discovery_delay: config.discovery_delay,
        }
    }

    /// Connects to the first matching fake peripheral.
    pub(crate) async fn connect_first_matching_device(
        self,
        name_prefix: &str,
    ) -> Result<DeviceSession, InteractionError> {
        let Self {
            devices,
            initial_read,
            notifications,
            discovery_delay,
        } = self;
        let device = first_matching_device(devices, discovery_delay, name_prefix).await?;
        Ok(DeviceSession::new(Box::new(FakeTransport {
            device,
            initial_read,
            notifications: Mutex::new(notifications.into()),
        })))
    }
}

/// Session transport that replays fixture payloads.
#[derive(Debug)]
struct FakeTransport {
    device: FoundDevice,
    initial_read: Option<Vec<u8>>,
    notifications: Mutex<VecDeque<Vec<u8>>>,
}

#[async_trait]
impl SessionTransport for FakeTransport {
    fn device(&self) -> &FoundDevice {
        &self.device
    }

    async fn write(
        &self,
        endpoint: EndpointId,
        payload: &[u8],
        mode: WriteMode,
    ) -> Result<(), InteractionError> {
        trace!(%endpoint, payload_len = payload.len(), ?mode, "accepted fake write");
        Ok(())
    }

    async fn read_optional(
        &self,
        endpoint: EndpointId,
    ) -> Result<Option<Vec<u8>>, InteractionError> {
        if endpoint != EndpointId::ReadNotifyCharacteristic {
            return Ok(None);
        }
        Ok(self.initial_read.clone())
    }

    async fn subscribe(&self, endpoint: EndpointId) -> Result<(), InteractionError> {
        trace!(%endpoint, "subscribed to fake notifications");
        Ok(())
    }

    async fn unsubscribe(&self, endpoint: EndpointId) -> Result<(), InteractionError> {
        trace!(%endpoint, "unsubscribed from fake notifications");
        Ok(())
    }

    async fn next_notification(&self) -> Result<Option<Vec<u8>>, InteractionError> {
        let mut notifications = self
            .notifications
            .lock()
            .expect("fake notification queue lock should not be poisoned");
        Ok(notifications.pop_front())
    }

    async fn close(self: Box<Self>) -> Result<(), InteractionError> {
        Ok(())
    }
}

/// A plausible idle fixture: powered on, 75% brightness, Clear White preset.
fn default_state_frame() -> Vec<u8> {
    FrameCodec::encode(STATE_UPDATE_OPCODE, &[0x01, 75, 0x01, Preset::Clear.code()])
        .expect("default state payload is below the frame size limit")
}

async fn first_matching_device(
    devices: Vec<FoundDevice>,
    discovery_delay: Duration,
    name_prefix: &str,
) -> Result<FoundDevice, InteractionError> {
    if !discovery_delay.is_zero() {
        sleep(discovery_delay).await;
    }

    devices
        .into_iter()
        .find(|device| device.local_name_starts_with(name_prefix))
        .ok_or_else(|| InteractionError::NoMatchingFixtureDevice {
            prefix: name_prefix.to_string(),
        })
}

fn parse_scan_fixture(raw_fixture: &str) -> Result<Vec<FoundDevice>, FixtureError> {
    if raw_fixture.trim().is_empty() {
        return Err(FixtureError::EmptyFixture);
    }

    raw_fixture
        .split(';')
        .map(parse_scan_record)
        .collect::<Result<Vec<_>, _>>()
}

fn parse_scan_record(raw_record: &str) -> Result<FoundDevice, FixtureError> {
    let fields: Vec<&str> = raw_record.split('|').map(str::trim).collect();
    if fields.len() != 4 {
        return Err(FixtureError::InvalidRecordFieldCount);
    }
    if fields.iter().any(|field| field.is_empty()) {
        return Err(FixtureError::EmptyRecordField);
    }

    let local_name = if fields[2] == "-" {
        None
    } else {
        Some(fields[2].to_string())
    };
    let rssi = if fields[3] == "-" {
        None
    } else {
        Some(fields[3].parse::<i16>()?)
    };

    Ok(FoundDevice::new(
        fields[0].to_string(),
        fields[1].to_string(),
        local_name,
        rssi,
    ))
}

fn parse_notifications(raw_value: &str) -> Result<Vec<Vec<u8>>, FixtureError> {
    if raw_value.trim().is_empty() {
        return Ok(Vec::new());
    }
    raw_value.split(',').map(parse_hex).collect()
}
