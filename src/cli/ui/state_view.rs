use std::fmt::{self, Display, Formatter};

use crate::notification::{LightMode, StateSnapshot};

use super::painter::Painter;
use super::table::Table;

/// Renders a decoded state snapshot as a key-value table.
pub(crate) struct StateView<'a> {
    snapshot: &'a StateSnapshot,
    painter: &'a Painter,
}

impl<'a> StateView<'a> {
    pub(crate) fn new(snapshot: &'a StateSnapshot, painter: &'a Painter) -> Self {
        Self { snapshot, painter }
    }
}

impl Display for StateView<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let power = if self.snapshot.power() {
            self.painter.success("on")
        } else {
            self.painter.muted("off")
        };

        let mut rows = vec![
            ("power", power),
            (
                "brightness",
                self.painter.value(&format!("{}%", self.snapshot.brightness())),
            ),
        ];

        match self.snapshot.mode() {
            LightMode::Preset { preset } => {
                rows.push(("mode", self.painter.value("preset")));
                let label = match preset {
                    Some(preset) => self.painter.value(preset.display_name()),
                    None => self.painter.warning("<unknown preset>"),
                };
                rows.push(("preset", label));
            }
            LightMode::Solid { colour } => {
                rows.push(("mode", self.painter.value("solid")));
                rows.push(("colour", self.painter.value(&colour.to_string())));
            }
            LightMode::Spectrum { levels } => {
                rows.push(("mode", self.painter.value("spectrum")));
                rows.push((
                    "channels",
                    self.painter.value(&format!(
                        "r={} g={} b={} w={} uv={}",
                        levels.red, levels.green, levels.blue, levels.white, levels.uv
                    )),
                ));
            }
            LightMode::Off => rows.push(("mode", self.painter.muted("off"))),
        }

        write!(f, "{}", Table::key_value(self.painter, rows))
    }
}

/// One-line summary of a snapshot, used for notification streams.
pub(crate) fn snapshot_label(snapshot: &StateSnapshot) -> String {
    let power = if snapshot.power() { "on" } else { "off" };
    let mode = match snapshot.mode() {
        LightMode::Preset { preset: Some(preset) } => format!("preset:{preset}"),
        LightMode::Preset { preset: None } => "preset:<unknown>".to_string(),
        LightMode::Solid { colour } => format!("solid:{colour}"),
        LightMode::Spectrum { levels } => format!(
            "spectrum:{}/{}/{}/{}/{}",
            levels.red, levels.green, levels.blue, levels.white, levels.uv
        ),
        LightMode::Off => "off".to_string(),
    };
    format!(
        "power={power} brightness={}% mode={mode}",
        snapshot.brightness()
    )
}
