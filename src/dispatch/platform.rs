//! Platform services used by leaf renderers (open, share, copy).

use anyhow::Result;
use url::Url;

use crate::log_error::LogError;

/// Operating-system integration points.
///
/// The dispatcher only ever asks `can_open_url` and `open_url`; sharing and
/// copying are reached from leaf renderers.
pub trait PlatformServices {
    fn can_open_url(&self, url: &Url) -> bool;

    fn open_url(&self, url: &Url) -> Result<()>;

    fn share_url(&self, url: &Url);

    fn copy_url(&self, url: &Url);
}

/// Default link handling: open when the platform says it can, otherwise do
/// nothing. Failures are logged, never returned.
pub fn open_link(platform: &dyn PlatformServices, url: &Url) {
    if !platform.can_open_url(url) {
        tracing::debug!("Ignoring link the platform cannot open: {}", url);
        return;
    }

    if let Err(e) = platform.open_url(url) {
        e.log_error(Some("Unable to open link"));
    }
}
