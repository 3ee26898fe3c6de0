use async_trait::async_trait;
use tracing::instrument;

use super::model::{FoundDevice, ListenStopReason, NotificationRunSummary};
use crate::error::InteractionError;
use crate::protocol::EndpointId;

/// GATT write mode for command frames.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum WriteMode {
    /// Write with a link-layer acknowledgement.
    WithResponse,
    /// Write without waiting for an acknowledgement.
    WithoutResponse,
}

/// Transport backing a connected session.
///
/// The crate ships a fixture-driven fake implementation; integrators bind a
/// real Bluetooth stack by implementing this trait and handing the session
/// to the handlers.
#[async_trait]
pub trait SessionTransport: Send + Sync {
    /// Returns details for the connected device.
    fn device(&self) -> &FoundDevice;

    /// Writes one frame to an endpoint.
    async fn write(
        &self,
        endpoint: EndpointId,
        payload: &[u8],
        mode: WriteMode,
    ) -> Result<(), InteractionError>;

    /// Reads the current value of an endpoint, when the transport supports
    /// reads on it.
    async fn read_optional(
        &self,
        endpoint: EndpointId,
    ) -> Result<Option<Vec<u8>>, InteractionError>;

    /// Enables notifications on an endpoint.
    async fn subscribe(&self, endpoint: EndpointId) -> Result<(), InteractionError>;

    /// Disables notifications on an endpoint.
    async fn unsubscribe(&self, endpoint: EndpointId) -> Result<(), InteractionError>;

    /// Returns the next notification payload, or `None` once the stream is
    /// exhausted.
    async fn next_notification(&self) -> Result<Option<Vec<u8>>, InteractionError>;

    /// Releases the connection.
    async fn close(self: Box<Self>) -> Result<(), InteractionError>;
}

/// A connected AQ-S session.
pub struct DeviceSession {
    transport: Box<dyn SessionTransport>,
}

impl DeviceSession {
    pub(crate) fn new(transport: Box<dyn SessionTransport>) -> Self {
        Self { transport }
    }

    /// Returns details for the connected device.
    #[must_use]
    pub fn device(&self) -> &FoundDevice {
        self.transport.device()
    }

    /// Writes one frame to an endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error when the transport write fails.
    #[instrument(
        skip(self, payload),
        level = "debug",
        fields(%endpoint, payload_len = payload.len(), ?mode)
    )]
    pub async fn write_endpoint(
        &self,
        endpoint: EndpointId,
        payload: &[u8],
        mode: WriteMode,
    ) -> Result<(), InteractionError> {
        self.transport.write(endpoint, payload, mode).await
    }

    /// Reads the current value of an endpoint, if it supports reads.
    ///
    /// # Errors
    ///
    /// Returns an error when the transport read fails.
    pub async fn read_endpoint_optional(
        &self,
        endpoint: EndpointId,
    ) -> Result<Option<Vec<u8>>, InteractionError> {
        self.transport.read_optional(endpoint).await
    }

    /// Enables notifications on an endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error when the subscription fails.
    pub async fn subscribe_endpoint(&self, endpoint: EndpointId) -> Result<(), InteractionError> {
        self.transport.subscribe(endpoint).await
    }

    /// Disables notifications on an endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error when the unsubscription fails.
    pub async fn unsubscribe_endpoint(&self, endpoint: EndpointId) -> Result<(), InteractionError> {
        self.transport.unsubscribe(endpoint).await
    }

    /// Drains notifications, invoking the callback per payload, until the
    /// stream closes or `max_notifications` is reached.
    ///
    /// # Errors
    ///
    /// Returns an error when receiving a notification fails.
    #[instrument(skip(self, on_notification), level = "debug", fields(%endpoint, ?max_notifications))]
    pub async fn run_notifications<F>(
        &self,
        endpoint: EndpointId,
        max_notifications: Option<usize>,
        mut on_notification: F,
    ) -> Result<NotificationRunSummary, InteractionError>
    where
        F: FnMut(usize, &[u8]),
    {
        if let Some(limit) = max_notifications
            && limit == 0
        {
            return Ok(NotificationRunSummary::new(
                0,
                ListenStopReason::ReachedLimit(0),
            ));
        }

        let mut received = 0usize;
        loop {
            let Some(payload) = self.transport.next_notification().await? else {
                return Ok(NotificationRunSummary::new(
                    received,
                    ListenStopReason::NotificationStreamClosed,
                ));
            };

            received += 1;
            on_notification(received, &payload);

            if let Some(limit) = max_notifications
                && received >= limit
            {
                return Ok(NotificationRunSummary::new(
                    received,
                    ListenStopReason::ReachedLimit(limit),
                ));
            }
        }
    }

    /// Releases the connection.
    ///
    /// # Errors
    ///
    /// Returns an error when transport teardown fails.
    pub async fn close(self) -> Result<(), InteractionError> {
        self.transport.close().await
    }
}

impl std::fmt::Debug for DeviceSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceSession")
            .field("device", self.transport.device())
            .finish_non_exhaustive()
    }
}
