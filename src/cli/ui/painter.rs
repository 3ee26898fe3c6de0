use owo_colors::OwoColorize;

/// Applies colour and style to terminal text, or passes it through when
/// colour is disabled.
#[derive(Debug)]
pub(crate) struct Painter {
    coloured: bool,
}

impl Painter {
    /// Creates a painter with explicit colour control.
    pub(crate) fn new(coloured: bool) -> Self {
        Self { coloured }
    }

    pub(crate) fn heading(&self, text: &str) -> String {
        if self.coloured {
            text.bold().cyan().to_string()
        } else {
            text.to_string()
        }
    }

    pub(crate) fn success(&self, text: &str) -> String {
        if self.coloured {
            text.bold().green().to_string()
        } else {
            text.to_string()
        }
    }

    pub(crate) fn warning(&self, text: &str) -> String {
        if self.coloured {
            text.bold().yellow().to_string()
        } else {
            text.to_string()
        }
    }

    pub(crate) fn muted(&self, text: &str) -> String {
        if self.coloured {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }

    pub(crate) fn value(&self, text: &str) -> String {
        if self.coloured {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn apply(painter: &Painter, style: &str, text: &str) -> String {
        match style {
            "heading" => painter.heading(text),
            "success" => painter.success(text),
            "warning" => painter.warning(text),
            "muted" => painter.muted(text),
            "value" => painter.value(text),
            other => panic!("unknown style: {other}"),
        }
    }

    #[rstest]
    #[case::heading("heading")]
    #[case::success("success")]
    #[case::warning("warning")]
    #[case::muted("muted")]
    #[case::value("value")]
    fn plain_returns_unstyled_text(#[case] style: &str) {
        let painter = Painter::new(false);
        assert_eq!("sample", apply(&painter, style, "sample"));
    }

    #[rstest]
    #[case::heading("heading")]
    #[case::success("success")]
    #[case::warning("warning")]
    #[case::muted("muted")]
    #[case::value("value")]
    fn coloured_wraps_text_in_escapes(#[case] style: &str) {
        let painter = Painter::new(true);
        let styled = apply(&painter, style, "sample");
        assert_ne!("sample", styled);
        assert!(styled.contains("sample"));
    }
}
