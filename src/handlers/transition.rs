use crate::command::LightCommand;
use crate::error::ProtocolError;
use crate::hw::DeviceSession;

use super::write_command;

/// Direction of a timed dawn/dusk light transition.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SunTransition {
    /// Ramp the light up over the given duration.
    Sunrise,
    /// Ramp the light down over the given duration.
    Sunset,
}

impl SunTransition {
    pub(crate) fn command(self, minutes: u8) -> LightCommand {
        match self {
            Self::Sunrise => LightCommand::Sunrise(minutes),
            Self::Sunset => LightCommand::Sunset(minutes),
        }
    }
}

/// Handler for timed sunrise/sunset transitions.
pub struct SunTransitionHandler;

impl SunTransitionHandler {
    /// Starts a timed transition lasting `minutes`.
    ///
    /// ```
    /// # async fn demo(session: aqs::DeviceSession) -> Result<(), aqs::ProtocolError> {
    /// use aqs::{SunTransition, SunTransitionHandler};
    ///
    /// SunTransitionHandler::start(&session, SunTransition::Sunrise, 30).await?;
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error when frame encoding fails or the transport write fails.
    pub async fn start(
        session: &DeviceSession,
        transition: SunTransition,
        minutes: u8,
    ) -> Result<(), ProtocolError> {
        write_command(session, &transition.command(minutes)).await
    }
}
