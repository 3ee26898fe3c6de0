/// A discovered peripheral that matched a scan predicate.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct FoundDevice {
    adapter_name: String,
    device_id: String,
    local_name: Option<String>,
    rssi: Option<i16>,
}

impl FoundDevice {
    /// Creates a new discovered-device record.
    pub(crate) fn new(
        adapter_name: String,
        device_id: String,
        local_name: Option<String>,
        rssi: Option<i16>,
    ) -> Self {
        Self {
            adapter_name,
            device_id,
            local_name,
            rssi,
        }
    }

    /// Returns the adapter name used to discover this device.
    #[must_use]
    pub fn adapter_name(&self) -> &str {
        &self.adapter_name
    }

    /// Returns the backend-specific device identifier.
    #[must_use]
    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    /// Returns the advertised local name, if present.
    #[must_use]
    pub fn local_name(&self) -> Option<&str> {
        self.local_name.as_deref()
    }

    /// Returns the latest observed RSSI value, if present.
    #[must_use]
    pub fn rssi(&self) -> Option<i16> {
        self.rssi
    }

    /// Returns whether the local name starts with a prefix.
    pub(crate) fn local_name_starts_with(&self, prefix: &str) -> bool {
        self.local_name
            .as_deref()
            .is_some_and(|name| name.starts_with(prefix))
    }
}

/// Why a listening session ended.
#[derive(Debug, Clone, Eq, PartialEq, derive_more::Display)]
pub enum ListenStopReason {
    /// The listener reached the requested max notification count.
    #[display("reached max notifications ({_0})")]
    ReachedLimit(usize),
    /// The notification stream ended naturally.
    #[display("notification stream closed")]
    NotificationStreamClosed,
}

/// Summary of a notification stream run.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct NotificationRunSummary {
    received_notifications: usize,
    stop_reason: ListenStopReason,
}

impl NotificationRunSummary {
    /// Creates a notification run summary.
    pub(crate) fn new(received_notifications: usize, stop_reason: ListenStopReason) -> Self {
        Self {
            received_notifications,
            stop_reason,
        }
    }

    /// Returns the number of notifications received.
    #[must_use]
    pub fn received_notifications(&self) -> usize {
        self.received_notifications
    }

    /// Returns why notification listening ended.
    #[must_use]
    pub fn stop_reason(&self) -> &ListenStopReason {
        &self.stop_reason
    }
}

/// Summary returned when a listen session exits.
#[derive(Debug, Eq, PartialEq)]
pub struct ListenSummary {
    device: FoundDevice,
    initial_read: Option<Vec<u8>>,
    received_notifications: usize,
    stop_reason: ListenStopReason,
}

impl ListenSummary {
    /// Creates a listen summary.
    pub(crate) fn new(
        device: FoundDevice,
        initial_read: Option<Vec<u8>>,
        received_notifications: usize,
        stop_reason: ListenStopReason,
    ) -> Self {
        Self {
            device,
            initial_read,
            received_notifications,
            stop_reason,
        }
    }

    /// Returns connected device details.
    #[must_use]
    pub fn device(&self) -> &FoundDevice {
        &self.device
    }

    /// Returns the initial state read, if any.
    #[must_use]
    pub fn initial_read(&self) -> Option<&[u8]> {
        self.initial_read.as_deref()
    }

    /// Returns the number of notifications received.
    #[must_use]
    pub fn received_notifications(&self) -> usize {
        self.received_notifications
    }

    /// Returns the reason the listen session ended.
    #[must_use]
    pub fn stop_reason(&self) -> &ListenStopReason {
        &self.stop_reason
    }
}
