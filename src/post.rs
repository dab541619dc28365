//! Defines the loaded post types. Each type spells out which related rows
//! have already been fetched: a [`PostCard`] carries everything a post listing
//! shows, a [`PostDetail`] everything the post page shows. The projector only
//! accepts these types, so it can't reach for a relation that wasn't loaded.

use crate::comment::Comment;
use crate::db::timestamp;
use crate::tag::Tag;
use chrono::{DateTime, Utc};
use rusqlite::Row;

/// The number of characters of a post's text shown in listings.
pub const TEASER_LENGTH: usize = 200;

/// The columns of a post row with its author's username resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub text: String,

    /// Unique; identifies the post in URLs.
    pub slug: String,

    /// The author's username.
    pub author: String,

    pub published_at: DateTime<Utc>,

    /// The image path relative to the media root, if the post has one.
    pub image: Option<String>,
}

impl Post {
    /// Returns the first [`TEASER_LENGTH`] characters of the post's text, or
    /// the whole text if it's shorter. Characters are Unicode scalar values,
    /// so the cut never lands inside a multi-byte sequence.
    pub fn teaser(&self) -> &str {
        match self.text.char_indices().nth(TEASER_LENGTH) {
            Some((i, _)) => &self.text[..i],
            None => &self.text,
        }
    }

    /// Builds a [`Post`] from a row that begins with the columns `id, title,
    /// text, slug, author, published_at, image`.
    pub(crate) fn from_row(row: &Row) -> rusqlite::Result<Post> {
        let image: Option<String> = row.get(6)?;
        Ok(Post {
            id: row.get(0)?,
            title: row.get(1)?,
            text: row.get(2)?,
            slug: row.get(3)?,
            author: row.get(4)?,
            published_at: timestamp(row, 5)?,
            // an empty path means "no image"
            image: image.filter(|path| !path.is_empty()),
        })
    }
}

/// A [`Post`] loaded for a listing: its tags, each with its own post count,
/// and the number of comments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PostCard {
    pub post: Post,

    /// The post's tags in the order they were attached.
    pub tags: Vec<Tag>,

    pub comments_count: u64,
}

/// A [`Post`] loaded for its own page: tags, comments with their authors, and
/// the number of likes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PostDetail {
    pub post: Post,
    pub tags: Vec<Tag>,

    /// Oldest first.
    pub comments: Vec<Comment>,

    pub likes_count: u64,
}
