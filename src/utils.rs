use crate::error::FixtureError;

/// Formats bytes as uppercase hexadecimal pairs separated by spaces.
pub(crate) fn format_hex(bytes: &[u8]) -> String {
    if bytes.is_empty() {
        return "<empty>".to_string();
    }

    bytes
        .iter()
        .map(|value| format!("{value:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parses hexadecimal payload text, ignoring interior whitespace.
pub(crate) fn parse_hex(raw_value: &str) -> Result<Vec<u8>, FixtureError> {
    let cleaned: String = raw_value.chars().filter(|c| !c.is_whitespace()).collect();
    Ok(hex::decode(cleaned)?)
}

/// Formats an optional RSSI for terminal output.
pub(crate) fn format_rssi(rssi: Option<i16>) -> String {
    match rssi {
        Some(value) => value.to_string(),
        None => "-".to_string(),
    }
}
