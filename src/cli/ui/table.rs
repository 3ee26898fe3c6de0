use std::fmt::{self, Display, Formatter};

use tabled::{builder::Builder, settings::Style as TableStyle};

use super::painter::Painter;

/// A two-column field/value table that renders via `Display`.
#[derive(Debug)]
pub(crate) struct Table {
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Creates a field/value table with muted field names.
    pub(crate) fn key_value(painter: &Painter, rows: Vec<(&str, String)>) -> Self {
        let rows = rows
            .into_iter()
            .map(|(field, value)| vec![painter.muted(field), value])
            .collect();
        Self { rows }
    }
}

impl Display for Table {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut builder = Builder::default();
        for row in &self.rows {
            builder.push_record(row);
        }
        let mut table = builder.build();
        table.with(TableStyle::rounded().remove_horizontals());
        write!(f, "{table}")
    }
}
