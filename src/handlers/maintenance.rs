use crate::command::LightCommand;
use crate::error::ProtocolError;
use crate::hw::DeviceSession;

use super::write_command;

/// Handler for state-snapshot requests.
pub struct StateRequestHandler;

impl StateRequestHandler {
    /// Asks the fixture to report its current state on the notify channel.
    ///
    /// The reply arrives asynchronously as a state-update frame; route it
    /// through [`crate::NotificationHandler::decode`].
    ///
    /// ```
    /// # async fn demo(session: aqs::DeviceSession) -> Result<(), aqs::ProtocolError> {
    /// use aqs::StateRequestHandler;
    ///
    /// StateRequestHandler::request_state(&session).await?;
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error when frame encoding fails or the transport write fails.
    pub async fn request_state(session: &DeviceSession) -> Result<(), ProtocolError> {
        write_command(session, &LightCommand::RequestState).await
    }
}

/// Handler for the factory-reset command.
pub struct FactoryResetHandler;

impl FactoryResetHandler {
    /// Restores the fixture to factory defaults.
    ///
    /// ```
    /// # async fn demo(session: aqs::DeviceSession) -> Result<(), aqs::ProtocolError> {
    /// use aqs::FactoryResetHandler;
    ///
    /// FactoryResetHandler::factory_reset(&session).await?;
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error when frame encoding fails or the transport write fails.
    pub async fn factory_reset(session: &DeviceSession) -> Result<(), ProtocolError> {
        write_command(session, &LightCommand::FactoryReset).await
    }
}
