// src/infrastructure/repositories/sqlite/repository.rs

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::Integer;
use tracing::{debug, instrument};

use super::connection::{ConnectionPool, PooledConnection};
use super::error::{SqliteRepositoryError, SqliteResult};
use crate::domain::bookmark::Bookmark;
use crate::domain::error::DomainError;
use crate::domain::repositories::repository::BookmarkRepository;
use crate::infrastructure::repositories::sqlite::model::{DbBookmark, NewBookmark};
use crate::infrastructure::repositories::sqlite::schema::bookmarks::dsl;

#[derive(Clone, Debug)]
pub struct SqliteBookmarkRepository {
    pool: ConnectionPool,
}

impl SqliteBookmarkRepository {
    /// Create a new SQLite repository with the provided connection pool
    pub fn new(pool: ConnectionPool) -> Self {
        Self { pool }
    }

    /// Create a new SQLite repository with the provided database URL
    #[instrument(skip_all, level = "debug")]
    pub fn from_url(database_url: &str) -> SqliteResult<Self> {
        let pool = super::connection::init_pool(database_url)?;
        Ok(Self { pool })
    }

    /// Get a connection from the pool
    #[instrument(skip_all, level = "trace")]
    pub fn get_connection(&self) -> SqliteResult<PooledConnection> {
        self.pool
            .get()
            .map_err(|e| SqliteRepositoryError::ConnectionPoolError(e.to_string()))
    }

    /// Deletes every bookmark
    #[instrument(skip_all, level = "debug")]
    pub fn empty_bookmark_table(&self) -> SqliteResult<()> {
        let mut conn = self.get_connection()?;

        sql_query("DELETE FROM bookmarks;")
            .execute(&mut conn)
            .map_err(SqliteRepositoryError::DatabaseError)?;

        debug!("Cleaned table.");
        Ok(())
    }

    fn to_domain_model(db_bookmark: DbBookmark) -> Bookmark {
        Bookmark::from_storage(
            db_bookmark.id,
            db_bookmark.user_id,
            db_bookmark.category,
            db_bookmark.title,
            db_bookmark.url,
            db_bookmark.username,
            db_bookmark.default_browser,
            DateTime::<Utc>::from_naive_utc_and_offset(db_bookmark.created_ts, Utc),
        )
    }

    fn to_new_model(bookmark: &Bookmark) -> NewBookmark {
        NewBookmark {
            user_id: bookmark.user_id,
            category: bookmark.category.clone(),
            title: bookmark.title.clone(),
            url: bookmark.url.clone(),
            username: bookmark.username.clone(),
            default_browser: bookmark.default_browser.clone(),
            created_ts: bookmark.created_at.naive_utc(),
        }
    }

    /// Insert one row on an open connection and return its ID
    fn insert(conn: &mut SqliteConnection, bookmark: &Bookmark) -> QueryResult<i32> {
        let db_bookmark = Self::to_new_model(bookmark);
        debug!("Inserting bookmark: {}", db_bookmark);

        let result = diesel::insert_into(dsl::bookmarks)
            .values(&db_bookmark)
            .execute(conn)?;

        if result == 0 {
            return Err(diesel::result::Error::NotFound);
        }

        diesel::select(diesel::dsl::sql::<Integer>("last_insert_rowid()")).get_result::<i32>(conn)
    }
}

impl BookmarkRepository for SqliteBookmarkRepository {
    #[instrument(skip_all, level = "debug")]
    fn get_by_id(&self, id: i32) -> Result<Option<Bookmark>, DomainError> {
        let mut conn = self.get_connection()?;

        let result = dsl::bookmarks
            .filter(dsl::id.eq(id))
            .select(DbBookmark::as_select())
            .first(&mut conn)
            .optional()
            .map_err(SqliteRepositoryError::DatabaseError)?;

        Ok(result.map(Self::to_domain_model))
    }

    #[instrument(skip_all, level = "debug")]
    fn get_all(&self) -> Result<Vec<Bookmark>, DomainError> {
        let mut conn = self.get_connection()?;

        let db_bookmarks = dsl::bookmarks
            .order(dsl::id.asc())
            .select(DbBookmark::as_select())
            .load(&mut conn)
            .map_err(SqliteRepositoryError::DatabaseError)?;

        Ok(db_bookmarks.into_iter().map(Self::to_domain_model).collect())
    }

    #[instrument(skip(self), level = "debug")]
    fn get_by_user(&self, user_id: i32) -> Result<Vec<Bookmark>, DomainError> {
        let mut conn = self.get_connection()?;

        let db_bookmarks = dsl::bookmarks
            .filter(dsl::user_id.eq(user_id))
            .order(dsl::id.asc())
            .select(DbBookmark::as_select())
            .load(&mut conn)
            .map_err(SqliteRepositoryError::DatabaseError)?;

        Ok(db_bookmarks.into_iter().map(Self::to_domain_model).collect())
    }

    #[instrument(skip(self), level = "debug")]
    fn get_by_category(&self, category: &str) -> Result<Vec<Bookmark>, DomainError> {
        let mut conn = self.get_connection()?;

        let db_bookmarks = dsl::bookmarks
            .filter(dsl::category.eq(category))
            .order(dsl::id.asc())
            .select(DbBookmark::as_select())
            .load(&mut conn)
            .map_err(SqliteRepositoryError::DatabaseError)?;

        Ok(db_bookmarks.into_iter().map(Self::to_domain_model).collect())
    }

    #[instrument(skip_all, level = "debug")]
    fn get_categories(&self) -> Result<Vec<String>, DomainError> {
        let mut conn = self.get_connection()?;

        let categories = dsl::bookmarks
            .select(dsl::category)
            .distinct()
            .order(dsl::category.asc())
            .load::<String>(&mut conn)
            .map_err(SqliteRepositoryError::DatabaseError)?;

        Ok(categories)
    }

    #[instrument(skip_all, level = "debug")]
    fn add(&self, bookmark: &mut Bookmark) -> Result<(), DomainError> {
        let mut conn = self.get_connection()?;

        let id = conn
            .transaction::<_, diesel::result::Error, _>(|conn| Self::insert(conn, bookmark))
            .map_err(SqliteRepositoryError::DatabaseError)?;

        bookmark.set_id(id);
        Ok(())
    }

    #[instrument(skip_all, level = "debug", fields(batch = bookmarks.len()))]
    fn add_all(&self, bookmarks: &mut [Bookmark]) -> Result<usize, DomainError> {
        let mut conn = self.get_connection()?;

        // IDs are assigned only after commit so a rolled back batch leaves
        // the entities untouched
        let ids = conn
            .immediate_transaction::<_, diesel::result::Error, _>(|conn| {
                bookmarks
                    .iter()
                    .map(|bookmark| Self::insert(conn, bookmark))
                    .collect::<QueryResult<Vec<i32>>>()
            })
            .map_err(SqliteRepositoryError::DatabaseError)?;

        for (bookmark, id) in bookmarks.iter_mut().zip(ids) {
            bookmark.set_id(id);
        }
        Ok(bookmarks.len())
    }

    #[instrument(skip_all, level = "trace")]
    fn count(&self) -> Result<usize, DomainError> {
        let mut conn = self.get_connection()?;

        let n = dsl::bookmarks
            .count()
            .get_result::<i64>(&mut conn)
            .map_err(SqliteRepositoryError::DatabaseError)?;

        Ok(n as usize)
    }
}
