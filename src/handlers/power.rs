use crate::command::LightCommand;
use crate::error::ProtocolError;
use crate::hw::DeviceSession;

use super::write_command;

/// Fixture power state.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum LightPower {
    /// Turn the light off.
    Off,
    /// Turn the light on.
    On,
}

impl LightPower {
    pub(crate) fn as_payload_byte(self) -> u8 {
        match self {
            Self::Off => 0x00,
            Self::On => 0x01,
        }
    }

    /// Returns whether this state represents a powered-on fixture.
    ///
    /// ```
    /// use aqs::LightPower;
    ///
    /// assert!(LightPower::On.is_on());
    /// assert!(!LightPower::Off.is_on());
    /// ```
    #[must_use]
    pub fn is_on(self) -> bool {
        matches!(self, Self::On)
    }
}

/// Handler for fixture power commands.
pub struct PowerHandler;

impl PowerHandler {
    /// Sends a power command.
    ///
    /// ```
    /// # async fn demo(session: aqs::DeviceSession) -> Result<(), aqs::ProtocolError> {
    /// use aqs::{LightPower, PowerHandler};
    ///
    /// PowerHandler::set_power(&session, LightPower::On).await?;
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error when frame encoding fails or the transport write fails.
    pub async fn set_power(
        session: &DeviceSession,
        power: LightPower,
    ) -> Result<(), ProtocolError> {
        write_command(session, &LightCommand::Power(power)).await
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(LightPower::Off, vec![0x7E, 0x02, 0x01, 0x00, 0x01, 0xEF])]
    #[case(LightPower::On, vec![0x7E, 0x02, 0x01, 0x01, 0x00, 0xEF])]
    fn power_frames_match_protocol(#[case] power: LightPower, #[case] expected: Vec<u8>) {
        let frame = LightCommand::Power(power)
            .to_frame()
            .expect("power command frame should encode cleanly");
        assert_eq!(expected, frame);
    }
}
