//! Raw-mode terminal session.

use std::io::{self, stdout};

use crossterm::{
    cursor, execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};

/// Holds the terminal in raw mode on the alternate screen until dropped.
pub struct TerminalSession {
    _private: (),
}

impl TerminalSession {
    /// Enter raw mode and the alternate screen. Also installs a panic hook
    /// that restores the terminal before the panic message prints.
    pub fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        if let Err(err) = execute!(stdout(), EnterAlternateScreen, cursor::Hide) {
            restore_terminal();
            return Err(err);
        }

        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            restore_terminal();
            original_hook(panic_info);
        }));

        Ok(Self { _private: () })
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        restore_terminal();
    }
}

/// Restore terminal to normal state. Safe to call more than once.
fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(stdout(), cursor::Show, LeaveAlternateScreen);
}
