use time::OffsetDateTime;
use tracing::instrument;

use crate::command::LightCommand;
use crate::error::ProtocolError;
use crate::hw::DeviceSession;

use super::write_command;

/// Handler for fixture clock synchronisation.
pub struct TimeSyncHandler;

impl TimeSyncHandler {
    /// Sends a time synchronisation frame for the given timestamp.
    ///
    /// ```
    /// # async fn demo(session: aqs::DeviceSession) -> Result<(), aqs::ProtocolError> {
    /// use aqs::TimeSyncHandler;
    /// use time::OffsetDateTime;
    ///
    /// TimeSyncHandler::sync_time(&session, OffsetDateTime::now_utc()).await?;
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error when frame encoding fails or the transport write fails.
    #[instrument(
        skip(session),
        level = "debug",
        fields(unix_timestamp = timestamp.unix_timestamp())
    )]
    pub async fn sync_time(
        session: &DeviceSession,
        timestamp: OffsetDateTime,
    ) -> Result<(), ProtocolError> {
        write_command(session, &LightCommand::SyncTime { timestamp }).await
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use time::{Date, Month, PrimitiveDateTime, Time, UtcOffset};

    use super::*;

    fn timestamp_utc(
        year: i32,
        month: Month,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
    ) -> OffsetDateTime {
        let date = Date::from_calendar_date(year, month, day)
            .expect("calendar date used in tests should be valid");
        let time =
            Time::from_hms(hour, minute, second).expect("time used in tests should be valid");
        PrimitiveDateTime::new(date, time).assume_offset(UtcOffset::UTC)
    }

    #[test]
    fn sync_time_payload_maps_timestamp_fields() {
        let timestamp = timestamp_utc(2026, Month::February, 15, 21, 4, 5);
        let payload = LightCommand::SyncTime { timestamp }.payload();
        assert_eq!(vec![26, 2, 15, 21, 4, 5], payload);
    }

    #[test]
    fn sync_time_frame_matches_protocol_shape() {
        let timestamp = timestamp_utc(2026, Month::February, 16, 9, 30, 45);
        let frame = LightCommand::SyncTime { timestamp }
            .to_frame()
            .expect("time sync frame should encode cleanly");
        let checksum = 0x21 ^ 26 ^ 2 ^ 16 ^ 9 ^ 30 ^ 45;
        assert_eq!(
            vec![0x7E, 0x07, 0x21, 26, 2, 16, 9, 30, 45, checksum, 0xEF],
            frame
        );
    }
}
