//! Output sink handed to utility functions
//!
//! Functions print through a [`Console`] instead of stdout. The GUI drains
//! the receiving end once per frame, the headless runner prints it directly.

use std::fmt::Display;
use std::sync::mpsc::{self, Receiver, Sender};

#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleEvent {
    Text(String),
    /// Worker finished; `success` is false when the function failed
    Finished { success: bool },
}

#[derive(Debug, Clone)]
pub struct Console {
    tx: Sender<ConsoleEvent>,
}

impl Console {
    pub fn new() -> (Self, Receiver<ConsoleEvent>) {
        let (tx, rx) = mpsc::channel();
        (Self { tx }, rx)
    }

    /// Append `text` followed by a newline
    pub fn println(&self, text: impl Display) {
        self.write(format!("{text}\n"));
    }

    pub fn write(&self, text: impl Into<String>) {
        // Receiver gone means the window closed; output has nowhere to go.
        let _ = self.tx.send(ConsoleEvent::Text(text.into()));
    }

    pub(crate) fn finished(&self, success: bool) {
        let _ = self.tx.send(ConsoleEvent::Finished { success });
    }
}

/// Collect all pending text without blocking
pub fn drain_text(rx: &Receiver<ConsoleEvent>) -> String {
    let mut out = String::new();
    while let Ok(event) = rx.try_recv() {
        if let ConsoleEvent::Text(text) = event {
            out.push_str(&text);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_println_appends_newline() {
        let (console, rx) = Console::new();
        console.println("one");
        console.write("two");
        assert_eq!(drain_text(&rx), "one\ntwo");
    }

    #[test]
    fn test_send_after_receiver_dropped_is_silent() {
        let (console, rx) = Console::new();
        drop(rx);
        console.println("nobody listening");
        console.finished(true);
    }

    #[test]
    fn test_drain_skips_finished_marker() {
        let (console, rx) = Console::new();
        console.println("done");
        console.finished(false);
        assert_eq!(drain_text(&rx), "done\n");
    }
}
