use std::fmt::{self, Display, Formatter};

use crate::command::LightCommand;
use crate::utils::format_hex;

use super::painter::Painter;
use super::table::Table;

/// Renders an encoded command frame with its field breakdown.
pub(crate) struct FrameView<'a> {
    command: &'a LightCommand,
    frame: &'a [u8],
    painter: &'a Painter,
}

impl<'a> FrameView<'a> {
    pub(crate) fn new(command: &'a LightCommand, frame: &'a [u8], painter: &'a Painter) -> Self {
        Self {
            command,
            frame,
            painter,
        }
    }
}

impl Display for FrameView<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let payload = self.command.payload();
        let checksum = self.frame[self.frame.len() - 2];

        let table = Table::key_value(
            self.painter,
            vec![
                ("command", self.painter.value(self.command.name())),
                (
                    "opcode",
                    self.painter.value(&format!("0x{:02X}", self.command.opcode())),
                ),
                ("payload", self.painter.value(&format_hex(&payload))),
                ("checksum", self.painter.value(&format!("0x{checksum:02X}"))),
                ("frame", self.painter.value(&format_hex(self.frame))),
            ],
        );
        write!(f, "{table}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_view_breaks_out_fields() {
        let command: LightCommand = "POWER_ON".parse().expect("command should parse");
        let frame = command.to_frame().expect("command should encode");
        let painter = Painter::new(false);
        let rendered = FrameView::new(&command, &frame, &painter).to_string();

        assert!(rendered.contains("POWER_ON"));
        assert!(rendered.contains("0x01"));
        assert!(rendered.contains("7E 02 01 01 00 EF"));
    }
}
