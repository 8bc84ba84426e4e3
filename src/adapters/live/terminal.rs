//! Terminal notifier that writes alerts to stderr.

use std::io::Write;

use crate::ports::Notifier;

/// Writes alerts to stderr, one line each.
#[derive(Debug, Default)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn alert(&self, message: &str) {
        let mut stderr = std::io::stderr().lock();
        // Nothing sensible to do if stderr is gone.
        let _ = writeln!(stderr, "Alert: {message}");
        let _ = stderr.flush();
    }
}
