use chrono::NaiveDateTime;
use diesel::{Insertable, Queryable, Selectable};
use std::fmt;

#[derive(Queryable, Selectable, Clone, Debug)]
#[diesel(table_name = crate::infrastructure::repositories::sqlite::schema::bookmarks)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DbBookmark {
    pub id: i32,
    pub user_id: i32,
    pub category: String,
    pub title: String,
    pub url: String,
    pub username: String,
    pub default_browser: String,
    pub created_ts: NaiveDateTime,
}

impl fmt::Display for DbBookmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "id: {}, user_id: {}, category: {}, title: {}, url: {}, username: {}, default_browser: {}, created_ts: {}",
            self.id,
            self.user_id,
            self.category,
            self.title,
            self.url,
            self.username,
            self.default_browser,
            self.created_ts
        )
    }
}

/// New bookmark for insertion
#[derive(Insertable, Debug)]
#[diesel(table_name = crate::infrastructure::repositories::sqlite::schema::bookmarks)]
pub struct NewBookmark {
    pub user_id: i32,
    pub category: String,
    pub title: String,
    pub url: String,
    pub username: String,
    pub default_browser: String,
    pub created_ts: NaiveDateTime,
}

impl fmt::Display for NewBookmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "user_id: {}, category: {}, title: {}, url: {}, username: {}, default_browser: {}",
            self.user_id, self.category, self.title, self.url, self.username, self.default_browser
        )
    }
}
