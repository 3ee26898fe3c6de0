use std::fmt::{self, Display, Formatter};

use crate::hw::{FoundDevice, ListenStopReason, ListenSummary};
use crate::protocol::{self, EndpointId};
use crate::utils::format_hex;

use super::device_view::DeviceView;
use super::painter::Painter;
use super::table::Table;

/// Renders the listen-session readiness output.
pub(crate) struct ListenReadyView<'a> {
    device: &'a FoundDevice,
    initial_read: Option<&'a [u8]>,
    painter: &'a Painter,
}

impl<'a> ListenReadyView<'a> {
    pub(crate) fn new(
        device: &'a FoundDevice,
        initial_read: Option<&'a [u8]>,
        painter: &'a Painter,
    ) -> Self {
        Self {
            device,
            initial_read,
            painter,
        }
    }
}

impl Display for ListenReadyView<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let endpoint = protocol::endpoint_metadata(EndpointId::ReadNotifyCharacteristic);
        let initial_read_value = match self.initial_read {
            Some(payload) => self.painter.value(&format_hex(payload)),
            None => self.painter.warning("<none>"),
        };

        let session_table = Table::key_value(
            self.painter,
            vec![
                ("initial_read", initial_read_value),
                (
                    "listening_on",
                    format!(
                        "{} {}",
                        self.painter.value(endpoint.uuid()),
                        self.painter
                            .muted(&format!("({} {})", endpoint.name(), endpoint.kind())),
                    ),
                ),
            ],
        );

        let device = DeviceView::new(self.device, self.painter);

        write!(f, "{}", self.painter.heading("Connected device:"))?;
        write!(f, "\n{device}")?;
        writeln!(f)?;
        write!(f, "\n{}", self.painter.heading("Listen session:"))?;
        write!(f, "\n{session_table}")
    }
}

/// Renders a single notification line.
pub(crate) struct ListenNotificationView<'a> {
    index: usize,
    payload: &'a [u8],
    label: String,
    painter: &'a Painter,
}

impl<'a> ListenNotificationView<'a> {
    pub(crate) fn new(index: usize, payload: &'a [u8], label: String, painter: &'a Painter) -> Self {
        Self {
            index,
            payload,
            label,
            painter,
        }
    }
}

impl Display for ListenNotificationView<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let index_label = self.painter.muted(&format!("[{:04}]", self.index));
        let raw_payload = self
            .painter
            .muted(&format!("raw={}", format_hex(self.payload)));
        write!(
            f,
            "{index_label} {} {raw_payload}",
            self.painter.value(&self.label),
        )
    }
}

/// Renders the listen session summary.
pub(crate) struct ListenSummaryView<'a> {
    summary: &'a ListenSummary,
    painter: &'a Painter,
}

impl<'a> ListenSummaryView<'a> {
    pub(crate) fn new(summary: &'a ListenSummary, painter: &'a Painter) -> Self {
        Self { summary, painter }
    }
}

impl Display for ListenSummaryView<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let stop_reason = match self.summary.stop_reason() {
            ListenStopReason::ReachedLimit(_) => {
                self.painter.success(&self.summary.stop_reason().to_string())
            }
            ListenStopReason::NotificationStreamClosed => {
                self.painter.warning(&self.summary.stop_reason().to_string())
            }
        };
        write!(
            f,
            "{} {stop_reason} {}",
            self.painter.heading("Stopped:"),
            self.painter.value(&format!(
                "- received {} notification(s)",
                self.summary.received_notifications()
            ))
        )
    }
}
