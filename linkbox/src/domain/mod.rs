pub mod bookmark;
pub mod caller;
pub mod error;
pub mod import;
pub mod repositories;
pub mod services;
