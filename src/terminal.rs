use std::io::{self, IsTerminal};

/// Abstraction over the terminal capabilities output formatting depends on.
pub trait TerminalClient: Send + Sync {
    /// Returns whether stdout is an interactive terminal.
    fn stdout_is_terminal(&self) -> bool;

    /// Returns whether stderr is an interactive terminal.
    fn stderr_is_terminal(&self) -> bool;
}

/// Terminal client backed by the process's real stdio handles.
#[derive(Debug, Default)]
pub struct SystemTerminalClient;

impl TerminalClient for SystemTerminalClient {
    fn stdout_is_terminal(&self) -> bool {
        io::stdout().is_terminal()
    }

    fn stderr_is_terminal(&self) -> bool {
        io::stderr().is_terminal()
    }
}
