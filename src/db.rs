//! Connection handling and the table layout of the publishing application.
//! The tables are owned by the application that writes posts; this crate only
//! reads them. [`init_schema`] exists so a fresh database (development, tests)
//! has something to read from.

use crate::error::Result;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, OpenFlags, Row};
use std::path::Path;

pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens (creating if needed) a writable database and makes sure the
    /// tables exist.
    pub fn open(path: &Path) -> Result<Database> {
        let db = Database {
            conn: Connection::open(path)?,
        };
        init_schema(&db.conn)?;
        Ok(db)
    }

    /// Opens an existing database for reading. Page requests go through this.
    pub fn open_read_only(path: &Path) -> Result<Database> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(Database { conn })
    }

    pub fn open_in_memory() -> Result<Database> {
        let db = Database {
            conn: Connection::open_in_memory()?,
        };
        init_schema(&db.conn)?;
        Ok(db)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn connection_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS auth_user (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL UNIQUE
        );

        CREATE TABLE IF NOT EXISTS blog_post (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            text TEXT NOT NULL,
            slug TEXT NOT NULL UNIQUE,
            image TEXT,
            published_at TEXT NOT NULL,
            author_id INTEGER NOT NULL REFERENCES auth_user(id)
        );

        CREATE TABLE IF NOT EXISTS blog_tag (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL UNIQUE
        );

        CREATE TABLE IF NOT EXISTS blog_post_tags (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            post_id INTEGER NOT NULL REFERENCES blog_post(id),
            tag_id INTEGER NOT NULL REFERENCES blog_tag(id),
            UNIQUE (post_id, tag_id)
        );

        CREATE TABLE IF NOT EXISTS blog_post_likes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            post_id INTEGER NOT NULL REFERENCES blog_post(id),
            user_id INTEGER NOT NULL REFERENCES auth_user(id),
            UNIQUE (post_id, user_id)
        );

        CREATE TABLE IF NOT EXISTS blog_comment (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            text TEXT NOT NULL,
            published_at TEXT NOT NULL,
            author_id INTEGER NOT NULL REFERENCES auth_user(id),
            post_id INTEGER NOT NULL REFERENCES blog_post(id)
        );

        CREATE INDEX IF NOT EXISTS idx_post_published ON blog_post(published_at DESC);
        CREATE INDEX IF NOT EXISTS idx_post_tags_tag ON blog_post_tags(tag_id);
        CREATE INDEX IF NOT EXISTS idx_post_likes_post ON blog_post_likes(post_id);
        CREATE INDEX IF NOT EXISTS idx_comment_post ON blog_comment(post_id);
        "#,
    )?;
    Ok(())
}

/// The text layout timestamps are stored in. Fractional seconds are optional.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Reads the UTC timestamp stored as text in column `idx`.
pub fn timestamp(row: &Row, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let text: String = row.get(idx)?;
    NaiveDateTime::parse_from_str(&text, TIMESTAMP_FORMAT)
        .map(|naive| Utc.from_utc_datetime(&naive))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
