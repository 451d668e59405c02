// src/infrastructure/browser.rs
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::services::browser::BrowserService;
use tracing::{debug, instrument, warn};

#[cfg(target_os = "macos")]
mod apps {
    pub const CHROME: &str = "Google Chrome";
    pub const EDGE: &str = "Microsoft Edge";
    pub const FIREFOX: &str = "Firefox";
}

#[cfg(target_os = "windows")]
mod apps {
    pub const CHROME: &str = "chrome";
    pub const EDGE: &str = "msedge";
    pub const FIREFOX: &str = "firefox";
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
mod apps {
    pub const CHROME: &str = "google-chrome";
    pub const EDGE: &str = "microsoft-edge";
    pub const FIREFOX: &str = "firefox";
}

/// Application to launch for a stored `defaultBrowser` value.
///
/// `chrome`, `edge` and `firefox` (any case) map to the platform's program
/// name; anything else is passed through as a program name. Blank means none.
pub fn browser_app(name: &str) -> Option<String> {
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    let app = match name.to_ascii_lowercase().as_str() {
        "chrome" => apps::CHROME,
        "edge" => apps::EDGE,
        "firefox" => apps::FIREFOX,
        _ => name,
    };
    Some(app.to_string())
}

/// Opens URLs through the operating system
#[derive(Debug, Default)]
pub struct SystemBrowser;

impl SystemBrowser {
    pub fn new() -> Self {
        Self
    }
}

impl BrowserService for SystemBrowser {
    #[instrument(level = "debug")]
    fn open_url(&self, url: &str, browser: Option<&str>) -> DomainResult<()> {
        if let Some(app) = browser.and_then(browser_app) {
            debug!("Opening {} with {}", url, app);
            match open::with(url, app.as_str()) {
                Ok(()) => return Ok(()),
                Err(e) => warn!("Cannot open with {}: {}, using the default browser", app, e),
            }
        }

        debug!("Opening URL with default OS command: {}", url);
        open::that(url).map_err(|e| DomainError::Other(format!("Failed to open URL: {}", e)))
    }
}
