//! Seeds databases for tests. The crate itself never writes rows; these
//! helpers stand in for the publishing application.

use crate::db::Database;
use crate::error::Result;
use rusqlite::{params, Connection};
use std::cell::Cell;
use std::path::Path;

thread_local! {
    static STATEMENTS: Cell<usize> = Cell::new(0);
}

fn count_statement(_sql: &str) {
    STATEMENTS.with(|n| n.set(n.get() + 1));
}

pub struct Fixture {
    db: Database,
}

impl Fixture {
    pub fn new() -> Result<Fixture> {
        Ok(Fixture {
            db: Database::open_in_memory()?,
        })
    }

    /// Seeds a database file, e.g. one that HTTP handlers open separately.
    pub fn at(path: &Path) -> Result<Fixture> {
        Ok(Fixture {
            db: Database::open(path)?,
        })
    }

    pub fn conn(&self) -> &Connection {
        self.db.connection()
    }

    /// Runs `f` on a traced connection and returns its result with the
    /// number of statements it executed.
    pub fn count_statements<T, F>(&mut self, f: F) -> Result<(T, usize)>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.db.connection_mut();
        STATEMENTS.with(|n| n.set(0));
        conn.trace(Some(count_statement));
        let result = f(&*conn);
        conn.trace(None);
        Ok((result?, STATEMENTS.with(|n| n.get())))
    }

    pub fn user(&self, username: &str) -> Result<i64> {
        self.conn()
            .execute("INSERT INTO auth_user (username) VALUES (?1)", [username])?;
        Ok(self.conn().last_insert_rowid())
    }

    pub fn tag(&self, title: &str) -> Result<i64> {
        self.conn()
            .execute("INSERT INTO blog_tag (title) VALUES (?1)", [title])?;
        Ok(self.conn().last_insert_rowid())
    }

    /// Inserts a post titled `Title of {slug}` whose text is `Text of {slug}`.
    pub fn post(&self, slug: &str, author: i64, published_at: &str) -> Result<i64> {
        self.conn().execute(
            "INSERT INTO blog_post (title, text, slug, image, published_at, author_id)
             VALUES (?1, ?2, ?3, NULL, ?4, ?5)",
            params![
                format!("Title of {}", slug),
                format!("Text of {}", slug),
                slug,
                published_at,
                author
            ],
        )?;
        Ok(self.conn().last_insert_rowid())
    }

    pub fn set_text(&self, post: i64, text: &str) -> Result<()> {
        self.conn()
            .execute("UPDATE blog_post SET text = ?1 WHERE id = ?2", params![text, post])?;
        Ok(())
    }

    pub fn set_image(&self, post: i64, image: &str) -> Result<()> {
        self.conn()
            .execute("UPDATE blog_post SET image = ?1 WHERE id = ?2", params![image, post])?;
        Ok(())
    }

    pub fn tag_post(&self, post: i64, tag: i64) -> Result<()> {
        self.conn().execute(
            "INSERT INTO blog_post_tags (post_id, tag_id) VALUES (?1, ?2)",
            params![post, tag],
        )?;
        Ok(())
    }

    pub fn like(&self, post: i64, user: i64) -> Result<()> {
        self.conn().execute(
            "INSERT INTO blog_post_likes (post_id, user_id) VALUES (?1, ?2)",
            params![post, user],
        )?;
        Ok(())
    }

    pub fn comment(&self, post: i64, author: i64, text: &str, published_at: &str) -> Result<()> {
        self.conn().execute(
            "INSERT INTO blog_comment (text, published_at, author_id, post_id)
             VALUES (?1, ?2, ?3, ?4)",
            params![text, published_at, author, post],
        )?;
        Ok(())
    }
}
