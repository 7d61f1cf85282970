//! Terminal implementation of the platform services.
//!
//! Opening runs the configured opener command to completion, copying uses the OSC 52
//! clipboard escape, and sharing is handed to the app to show in a popup.

use std::io::{self, Write};
use std::process::{Command, Stdio};

use anyhow::{bail, Context, Result};
use base64::prelude::*;
use tokio::sync::mpsc;
use url::Url;

use crate::dispatch::PlatformServices;
use crate::log_error::LogError;

/// Schemes we hand to the system opener.
const OPENABLE_SCHEMES: &[&str] = &["http", "https", "mailto", "tel"];

/// What the platform did, reported back to the app for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformNotice {
    Opened(Url),
    OpenFailed(Url),
    Shared(Url),
    Copied(Url),
}

pub struct TerminalPlatform {
    opener: String,
    notices: mpsc::UnboundedSender<PlatformNotice>,
}

impl TerminalPlatform {
    pub fn new(opener: impl Into<String>) -> (Self, mpsc::UnboundedReceiver<PlatformNotice>) {
        let (notices, rx) = mpsc::unbounded_channel();
        let platform = Self {
            opener: opener.into(),
            notices,
        };
        (platform, rx)
    }

    fn notify(&self, notice: PlatformNotice) {
        // Nobody listening outside the preview app.
        let _ = self.notices.send(notice);
    }

    /// Run the opener and wait for it; desktop openers exit once the
    /// handler has been launched.
    fn run_opener(&self, url: &Url) -> Result<()> {
        let status = Command::new(&self.opener)
            .arg(url.as_str())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .with_context(|| format!("Failed to launch `{}`", self.opener))?;
        if !status.success() {
            bail!("`{}` exited with {}", self.opener, status);
        }
        Ok(())
    }
}

impl PlatformServices for TerminalPlatform {
    fn can_open_url(&self, url: &Url) -> bool {
        OPENABLE_SCHEMES.contains(&url.scheme())
    }

    fn open_url(&self, url: &Url) -> Result<()> {
        tracing::info!("Opening {} with {}", url, self.opener);
        match self.run_opener(url) {
            Ok(()) => {
                self.notify(PlatformNotice::Opened(url.clone()));
                Ok(())
            }
            Err(e) => {
                self.notify(PlatformNotice::OpenFailed(url.clone()));
                Err(e)
            }
        }
    }

    fn share_url(&self, url: &Url) {
        self.notify(PlatformNotice::Shared(url.clone()));
    }

    fn copy_url(&self, url: &Url) {
        let mut stdout = io::stdout();
        let written = stdout
            .write_all(osc52_sequence(url.as_str()).as_bytes())
            .and_then(|_| stdout.flush());
        match written {
            Ok(()) => self.notify(PlatformNotice::Copied(url.clone())),
            Err(e) => e.log_error(Some("Copying link to clipboard")),
        }
    }
}

/// OSC 52 "set clipboard" escape for `text`.
fn osc52_sequence(text: &str) -> String {
    format!("\x1b]52;c;{}\x07", BASE64_STANDARD.encode(text))
}
