//! Defines the [`Tag`] type, which represents a [`crate::post::Post`] tag as
//! loaded by the [`crate::planner`].

use rusqlite::Row;

/// A tag together with the number of posts it's attached to. The count is
/// computed by the query that loaded the tag, so it reflects the database at
/// query time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tag {
    pub id: i64,

    /// The tag's title. Titles are unique, so this doubles as the key in tag
    /// page URLs.
    pub title: String,

    /// The number of distinct posts carrying this tag.
    pub posts_count: u64,
}

impl Tag {
    /// Builds a [`Tag`] from a row whose columns start at `offset` in the
    /// order `id, title, posts_count`.
    pub(crate) fn from_row(row: &Row, offset: usize) -> rusqlite::Result<Tag> {
        Ok(Tag {
            id: row.get(offset)?,
            title: row.get(offset + 1)?,
            posts_count: row.get(offset + 2)?,
        })
    }
}
