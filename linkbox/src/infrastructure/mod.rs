pub mod browser;
pub mod di;
pub mod http;
pub mod repositories;
