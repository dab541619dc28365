//! The fetch planner: functions that load posts and tags together with every
//! related row and aggregate the pages need. Each function runs a fixed number
//! of statements regardless of how many rows it returns; related rows for a
//! whole page of posts are fetched with one `IN (...)` statement rather than
//! one statement per post.

use crate::comment::Comment;
use crate::db::timestamp;
use crate::error::{Error, Result};
use crate::post::{Post, PostCard, PostDetail};
use crate::tag::Tag;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use std::collections::HashMap;

/// The number of entries in the homepage lists and sidebar widgets.
pub const HOMEPAGE_LIMIT: usize = 5;

/// The maximum number of posts listed on a tag page.
pub const TAG_PAGE_LIMIT: usize = 20;

// Columns consumed by `Post::from_row`, followed by the comment count.
const POST_CARD_COLUMNS: &str = r#"
    p.id, p.title, p.text, p.slug, u.username, p.published_at, p.image,
    (SELECT COUNT(*) FROM blog_comment c WHERE c.post_id = p.id) AS comments_count
"#;

const LIKES_COUNT: &str = "(SELECT COUNT(*) FROM blog_post_likes l WHERE l.post_id = p.id)";

/// Loads the `limit` most liked posts. Ties go to the newer post.
pub fn popular_posts(conn: &Connection, limit: usize) -> Result<Vec<PostCard>> {
    let sql = format!(
        "SELECT {} FROM blog_post p JOIN auth_user u ON u.id = p.author_id
         ORDER BY {} DESC, p.published_at DESC, p.id DESC
         LIMIT ?1",
        POST_CARD_COLUMNS, LIKES_COUNT
    );
    let cards = post_cards(conn, &sql, params![limit as i64])?;
    tracing::debug!(posts = cards.len(), "loaded popular posts");
    Ok(cards)
}

/// Loads the `limit` most recently published posts, newest first.
pub fn fresh_posts(conn: &Connection, limit: usize) -> Result<Vec<PostCard>> {
    let sql = format!(
        "SELECT {} FROM blog_post p JOIN auth_user u ON u.id = p.author_id
         ORDER BY p.published_at DESC, p.id DESC
         LIMIT ?1",
        POST_CARD_COLUMNS
    );
    let cards = post_cards(conn, &sql, params![limit as i64])?;
    tracing::debug!(posts = cards.len(), "loaded fresh posts");
    Ok(cards)
}

/// Loads up to `limit` posts carrying `tag`, newest first.
pub fn tag_posts(conn: &Connection, tag: &Tag, limit: usize) -> Result<Vec<PostCard>> {
    let sql = format!(
        "SELECT {} FROM blog_post p
         JOIN auth_user u ON u.id = p.author_id
         JOIN blog_post_tags pt ON pt.post_id = p.id
         WHERE pt.tag_id = ?1
         ORDER BY p.published_at DESC, p.id DESC
         LIMIT ?2",
        POST_CARD_COLUMNS
    );
    let cards = post_cards(conn, &sql, params![tag.id, limit as i64])?;
    tracing::debug!(tag = %tag.title, posts = cards.len(), "loaded tag posts");
    Ok(cards)
}

/// Loads the post identified by `slug` with its tags, comments, and likes
/// count. Returns [`Error::NotFound`] if no post has that slug.
pub fn post_detail(conn: &Connection, slug: &str) -> Result<PostDetail> {
    let sql = format!(
        "SELECT p.id, p.title, p.text, p.slug, u.username, p.published_at, p.image,
                {} AS likes_count
         FROM blog_post p JOIN auth_user u ON u.id = p.author_id
         WHERE p.slug = ?1",
        LIKES_COUNT
    );
    let (post, likes_count) = conn
        .query_row(&sql, [slug], |row| {
            Ok((Post::from_row(row)?, row.get::<_, u64>(7)?))
        })
        .optional()?
        .ok_or_else(|| Error::not_found("post", slug))?;

    let tags = tags_by_post(conn, &[post.id])?
        .remove(&post.id)
        .unwrap_or_default();
    let comments = comments(conn, post.id)?;
    tracing::debug!(
        slug,
        tags = tags.len(),
        comments = comments.len(),
        "loaded post detail"
    );

    Ok(PostDetail {
        post,
        tags,
        comments,
        likes_count,
    })
}

/// Loads the `limit` tags with the most posts. Ties are broken by title.
pub fn popular_tags(conn: &Connection, limit: usize) -> Result<Vec<Tag>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT t.id, t.title, COUNT(DISTINCT pt.post_id) AS posts_count
        FROM blog_tag t
        LEFT JOIN blog_post_tags pt ON pt.tag_id = t.id
        GROUP BY t.id, t.title
        ORDER BY posts_count DESC, t.title ASC
        LIMIT ?1
        "#,
    )?;
    let tags = stmt
        .query_map([limit as i64], |row| Tag::from_row(row, 0))?
        .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;
    tracing::debug!(tags = tags.len(), "loaded popular tags");
    Ok(tags)
}

/// Loads the tag titled `title` with its post count. Returns
/// [`Error::NotFound`] if there's no such tag.
pub fn tag_by_title(conn: &Connection, title: &str) -> Result<Tag> {
    conn.query_row(
        r#"
        SELECT t.id, t.title,
               (SELECT COUNT(DISTINCT pt.post_id) FROM blog_post_tags pt WHERE pt.tag_id = t.id)
        FROM blog_tag t
        WHERE t.title = ?1
        "#,
        [title],
        |row| Tag::from_row(row, 0),
    )
    .optional()?
    .ok_or_else(|| Error::not_found("tag", title))
}

// Runs a statement selecting `POST_CARD_COLUMNS`, then attaches the tags of
// every returned post with a single extra statement.
fn post_cards<P: rusqlite::Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> Result<Vec<PostCard>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params, |row| {
            Ok((Post::from_row(row)?, row.get::<_, u64>(7)?))
        })?
        .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;

    let ids: Vec<i64> = rows.iter().map(|(post, _)| post.id).collect();
    let mut tags = tags_by_post(conn, &ids)?;

    Ok(rows
        .into_iter()
        .map(|(post, comments_count)| PostCard {
            tags: tags.remove(&post.id).unwrap_or_default(),
            post,
            comments_count,
        })
        .collect())
}

// Loads the tags of each of `post_ids`, every tag annotated with its total
// post count. Tags are listed in the order they were attached to the post.
fn tags_by_post(conn: &Connection, post_ids: &[i64]) -> Result<HashMap<i64, Vec<Tag>>> {
    let mut by_post: HashMap<i64, Vec<Tag>> = HashMap::new();
    if post_ids.is_empty() {
        return Ok(by_post);
    }

    let placeholders = vec!["?"; post_ids.len()].join(", ");
    let sql = format!(
        r#"
        SELECT pt.post_id, t.id, t.title,
               (SELECT COUNT(DISTINCT x.post_id) FROM blog_post_tags x WHERE x.tag_id = t.id)
        FROM blog_post_tags pt
        JOIN blog_tag t ON t.id = pt.tag_id
        WHERE pt.post_id IN ({})
        ORDER BY pt.id
        "#,
        placeholders
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(post_ids.iter()), |row| {
        Ok((row.get::<_, i64>(0)?, Tag::from_row(row, 1)?))
    })?;
    for row in rows {
        let (post_id, tag) = row?;
        by_post.entry(post_id).or_default().push(tag);
    }
    Ok(by_post)
}

// Loads the comments on a post with their authors, oldest first.
fn comments(conn: &Connection, post_id: i64) -> Result<Vec<Comment>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT c.text, c.published_at, u.username
        FROM blog_comment c
        JOIN auth_user u ON u.id = c.author_id
        WHERE c.post_id = ?1
        ORDER BY c.published_at ASC, c.id ASC
        "#,
    )?;
    let comments = stmt
        .query_map([post_id], |row| {
            Ok(Comment {
                text: row.get(0)?,
                published_at: timestamp(row, 1)?,
                author: row.get(2)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;
    Ok(comments)
}
