//! Log-and-continue helper for errors that must not change control flow.

use std::fmt::Display;
use std::panic::Location;

/// Log an error together with an optional note and the caller's location.
pub trait LogError {
    fn log_error(&self, note: Option<&str>);
}

impl<E: Display + ?Sized> LogError for E {
    #[track_caller]
    fn log_error(&self, note: Option<&str>) {
        let location = Location::caller();
        tracing::error!(
            file = location.file(),
            line = location.line(),
            "{}",
            format_error(note, self)
        );
    }
}

// Alternate form so `anyhow` errors include their context chain.
fn format_error(note: Option<&str>, error: &(impl Display + ?Sized)) -> String {
    match note {
        Some(note) => format!("{} error: {:#}", note, error),
        None => format!("{:#}", error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::log_capture::LogBuffer;
    use anyhow::anyhow;

    #[test]
    fn test_format_with_and_without_note() {
        assert_eq!(
            format_error(Some("Unable to open link"), "no handler"),
            "Unable to open link error: no handler"
        );
        assert_eq!(format_error(None, "no handler"), "no handler");

        let chained = anyhow::anyhow!("exit status 3").context("Failed to launch `xdg-open`");
        assert_eq!(
            format_error(None, &chained),
            "Failed to launch `xdg-open`: exit status 3"
        );
    }

    #[test]
    fn test_log_error_reaches_subscriber_with_location() {
        let buffer = LogBuffer::new();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(buffer.clone())
            .with_ansi(false)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            anyhow!("disk on fire").log_error(Some("Saving draft"));
            std::io::Error::other("pipe closed").log_error(None);
        });

        let lines = buffer.drain();
        assert_eq!(lines.len(), 2, "lines: {:?}", lines);
        assert!(lines[0].contains("ERROR"));
        assert!(lines[0].contains("Saving draft error: disk on fire"));
        assert!(lines[0].contains("log_error.rs"));
        assert!(lines[1].contains("pipe closed"));
        assert!(!lines[1].contains(" error: "));
    }
}
