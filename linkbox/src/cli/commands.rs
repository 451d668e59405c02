// src/cli/commands.rs
use crate::application::services::BookmarkService;
use crate::cli::error::{CliError, CliResult};
use crate::config::Settings;
use crate::domain::bookmark::{Bookmark, BookmarkCandidate};
use crate::domain::caller::CallerId;
use crate::domain::error::DomainError;
use crate::domain::repositories::import_repository::ImportRepository;
use crate::domain::services::browser::BrowserService;
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::http;
use crate::infrastructure::repositories::sqlite::migration;
use crate::infrastructure::repositories::sqlite::repository::SqliteBookmarkRepository;
use crate::infrastructure::repositories::text_import_repository::TextImportRepository;
use crate::server;
use crossterm::style::Stylize;
use std::fs;
use std::path::Path;
use tokio::runtime::Runtime;
use tracing::{debug, instrument};

fn runtime() -> CliResult<Runtime> {
    Runtime::new().map_err(|e| CliError::Other(format!("Failed to create async runtime: {}", e)))
}

#[instrument(skip(settings))]
pub fn serve(settings: &Settings, bind: Option<String>) -> CliResult<()> {
    let mut opts = settings.server.clone();
    if let Some(bind) = bind {
        opts.bind = bind;
    }
    let services = ServiceContainer::new_or_create(settings)?;

    eprintln!("Serving {} on http://{}", settings.db_url, opts.bind);
    runtime()?
        .block_on(server::run_server(&opts, services.app_state()))
        .map_err(|e| CliError::CommandFailed(format!("Server on {} failed: {}", opts.bind, e)))
}

#[instrument(skip(settings))]
pub fn import(
    settings: &Settings,
    path: &Path,
    user: CallerId,
    server_url: Option<&str>,
    dry_run: bool,
) -> CliResult<()> {
    let candidates = read_candidates(path)?;

    if dry_run {
        return print_candidates(&candidates);
    }
    if let Some(url) = server_url {
        let summary = http::post_import(url, user, &candidates)?;
        println!("Imported {} bookmarks via {}", summary.count, url);
        return Ok(());
    }

    let services = ServiceContainer::new(settings)?;
    let summary = runtime()?.block_on(
        services
            .import_service
            .import_candidates(user, candidates),
    )?;
    println!(
        "Imported {} bookmarks for user {} ({} policy)",
        summary.count,
        user,
        services.import_service.policy()
    );
    Ok(())
}

/// Every import mode reads its input through here
fn read_candidates(path: &Path) -> CliResult<Vec<BookmarkCandidate>> {
    let candidates = TextImportRepository::new()
        .import_text_file(path)
        .map_err(|e| CliError::from(e).context(format!("Reading {}", path.display())))?;
    debug!("Parsed {} records", candidates.len());
    Ok(candidates)
}

fn print_candidates(candidates: &[BookmarkCandidate]) -> CliResult<()> {
    let json = serde_json::to_string_pretty(candidates)
        .map_err(|e| CliError::Other(format!("Failed to serialize records: {}", e)))?;
    println!("{}", json);
    Ok(())
}

#[instrument(skip(settings))]
pub fn list(
    settings: &Settings,
    category: Option<&str>,
    user: Option<CallerId>,
    is_json: bool,
) -> CliResult<()> {
    let services = ServiceContainer::new(settings)?;
    let bookmarks = match (category, user) {
        (Some(category), _) => services.bookmark_service.get_bookmarks_in(category)?,
        (None, Some(user)) => services.bookmark_service.get_bookmarks_for(user)?,
        (None, None) => services.bookmark_service.get_all_bookmarks()?,
    };

    if is_json {
        let json = serde_json::to_string_pretty(&bookmarks)
            .map_err(|e| CliError::Other(format!("Failed to serialize bookmarks: {}", e)))?;
        println!("{}", json);
        return Ok(());
    }

    if bookmarks.is_empty() {
        eprintln!("{}", "No bookmarks found".yellow());
        return Ok(());
    }
    for bookmark in &bookmarks {
        println!("{}", bookmark);
    }
    Ok(())
}

#[instrument(skip(settings))]
pub fn categories(settings: &Settings) -> CliResult<()> {
    let services = ServiceContainer::new(settings)?;
    for category in services.bookmark_service.get_categories()? {
        println!("{}", category);
    }
    Ok(())
}

#[instrument(skip(settings))]
pub fn open(settings: &Settings, id: i32) -> CliResult<()> {
    let services = ServiceContainer::new(settings)?;
    let bookmark = open_bookmark(
        services.bookmark_service.as_ref(),
        services.browser_service.as_ref(),
        id,
    )?;
    eprintln!("Opened {}", bookmark);
    Ok(())
}

/// Look up bookmark `id` and open its url in its stored browser
pub fn open_bookmark(
    bookmarks: &dyn BookmarkService,
    browser: &dyn BrowserService,
    id: i32,
) -> CliResult<Bookmark> {
    let bookmark = bookmarks
        .get_bookmark(id)?
        .ok_or_else(|| DomainError::BookmarkNotFound(id.to_string()))?;
    browser.open_url(&bookmark.url, Some(&bookmark.default_browser))?;
    Ok(bookmark)
}

#[instrument]
pub fn create_db(path: &str) -> CliResult<()> {
    if Path::new(path).exists() {
        return Err(CliError::InvalidInput(format!(
            "Database already exists at: {}. Please choose a different path or delete the existing file.",
            path
        )));
    }

    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)
                .map_err(|e| CliError::from(e).context("Failed to create parent directories"))?;
        }
    }

    println!("Creating new database at: {}", path);
    let repository = SqliteBookmarkRepository::from_url(path)?;
    let mut conn = repository.get_connection()?;
    migration::init_db(&mut conn)?;
    repository.empty_bookmark_table()?;
    println!("Database created successfully at: {}", path);
    Ok(())
}

pub fn show_config() -> CliResult<()> {
    println!("{}", crate::config::generate_default_config());
    Ok(())
}
