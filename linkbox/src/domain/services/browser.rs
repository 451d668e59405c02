// src/domain/services/browser.rs
use crate::domain::error::DomainResult;
use std::fmt::Debug;

pub trait BrowserService: Debug + Send + Sync {
    /// Open `url` in `browser` when it names one, otherwise in the system default
    fn open_url(&self, url: &str, browser: Option<&str>) -> DomainResult<()>;
}
