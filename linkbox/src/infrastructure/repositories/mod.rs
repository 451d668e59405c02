pub mod sqlite;
pub mod text_import_repository;
