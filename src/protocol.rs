use strum_macros::Display;

/// Known AQ-S protocol endpoints.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Display)]
pub enum EndpointId {
    /// AQ-S primary control service.
    #[strum(to_string = "control_service")]
    ControlService,
    /// Characteristic used for command writes.
    #[strum(to_string = "write_characteristic")]
    WriteCharacteristic,
    /// Characteristic used for reads and state notifications.
    #[strum(to_string = "read_notify_characteristic")]
    ReadNotifyCharacteristic,
}

/// Endpoint category in GATT.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Display)]
pub(crate) enum EndpointKind {
    /// GATT service endpoint.
    #[strum(to_string = "service")]
    Service,
    /// GATT characteristic endpoint.
    #[strum(to_string = "characteristic")]
    Characteristic,
}

/// Descriptive metadata for one protocol endpoint.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub(crate) struct EndpointMetadata {
    name: &'static str,
    uuid: &'static str,
    kind: EndpointKind,
}

impl EndpointMetadata {
    /// Human-readable endpoint name.
    pub(crate) fn name(self) -> &'static str {
        self.name
    }

    /// Endpoint UUID.
    pub(crate) fn uuid(self) -> &'static str {
        self.uuid
    }

    /// Endpoint kind.
    pub(crate) fn kind(self) -> EndpointKind {
        self.kind
    }
}

/// Returns metadata for one endpoint.
pub(crate) fn endpoint_metadata(endpoint: EndpointId) -> EndpointMetadata {
    match endpoint {
        EndpointId::ControlService => EndpointMetadata {
            name: "AQ-S control service",
            uuid: "0000fff0-0000-1000-8000-00805f9b34fb",
            kind: EndpointKind::Service,
        },
        EndpointId::WriteCharacteristic => EndpointMetadata {
            name: "AQ-S command write",
            uuid: "0000fff1-0000-1000-8000-00805f9b34fb",
            kind: EndpointKind::Characteristic,
        },
        EndpointId::ReadNotifyCharacteristic => EndpointMetadata {
            name: "AQ-S state read/notify",
            uuid: "0000fff2-0000-1000-8000-00805f9b34fb",
            kind: EndpointKind::Characteristic,
        },
    }
}
