// src/application/services/mod.rs
pub mod bookmark_service;
pub mod bookmark_service_impl;
pub mod import_service;
pub mod import_service_impl;

pub use bookmark_service::BookmarkService;
pub use import_service::ImportService;
