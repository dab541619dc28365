//! The view-model projector. Maps loaded values ([`PostCard`], [`PostDetail`],
//! [`Tag`], [`Comment`]) onto flat view models holding only what templates
//! display. Nothing here touches the database; every input has already been
//! fully loaded by the [`crate::planner`].

use crate::comment::Comment;
use crate::error::{Error, Result};
use crate::markdown;
use crate::post::{PostCard, PostDetail};
use crate::tag::Tag;
use crate::url::Urls;
use chrono::{DateTime, Utc};

/// A post as shown in listings and sidebar widgets.
#[derive(Clone, Debug, PartialEq)]
pub struct PostView {
    pub title: String,

    /// See [`crate::post::Post::teaser`].
    pub teaser_text: String,

    /// The author's username.
    pub author: String,

    pub comments_amount: u64,
    pub image_url: Option<String>,
    pub published_at: DateTime<Utc>,
    pub slug: String,
    pub url: String,
    pub tags: Vec<TagView>,
    pub first_tag_title: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TagView {
    pub title: String,
    pub posts_with_tag: u64,
    pub url: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CommentView {
    pub text: String,
    pub published_at: DateTime<Utc>,
    pub author: String,
}

/// A post as shown on its own page.
#[derive(Clone, Debug, PartialEq)]
pub struct PostDetailView {
    pub title: String,

    /// The raw post text.
    pub text: String,

    /// The post text rendered from markdown.
    pub body_html: String,

    pub author: String,
    pub comments: Vec<CommentView>,
    pub likes_amount: u64,
    pub image_url: Option<String>,
    pub published_at: DateTime<Utc>,
    pub slug: String,
    pub url: String,
    pub tags: Vec<TagView>,
}

/// Projects a post card. Fails with [`Error::EmptyTagList`] when the post has
/// no tags, because listings show the first tag of every post.
pub fn post(card: &PostCard, urls: &Urls) -> Result<PostView> {
    let p = &card.post;
    let first_tag_title = match card.tags.first() {
        Some(tag) => tag.title.clone(),
        None => {
            return Err(Error::EmptyTagList {
                slug: p.slug.clone(),
            })
        }
    };

    Ok(PostView {
        title: p.title.clone(),
        teaser_text: p.teaser().to_owned(),
        author: p.author.clone(),
        comments_amount: card.comments_count,
        image_url: image_url(p.image.as_deref(), urls)?,
        published_at: p.published_at,
        slug: p.slug.clone(),
        url: urls.post(&p.slug),
        tags: card.tags.iter().map(|t| tag(t, urls)).collect(),
        first_tag_title,
    })
}

pub fn posts(cards: &[PostCard], urls: &Urls) -> Result<Vec<PostView>> {
    cards.iter().map(|card| post(card, urls)).collect()
}

pub fn tag(tag: &Tag, urls: &Urls) -> TagView {
    TagView {
        title: tag.title.clone(),
        posts_with_tag: tag.posts_count,
        url: urls.tag(&tag.title),
    }
}

pub fn tags(tags: &[Tag], urls: &Urls) -> Vec<TagView> {
    tags.iter().map(|t| tag(t, urls)).collect()
}

pub fn comment(comment: &Comment) -> CommentView {
    CommentView {
        text: comment.text.clone(),
        published_at: comment.published_at,
        author: comment.author.clone(),
    }
}

/// Projects a post for its own page. Unlike [`post`], a post without tags is
/// fine here.
pub fn post_detail(detail: &PostDetail, urls: &Urls) -> Result<PostDetailView> {
    let p = &detail.post;
    let mut body_html = String::new();
    markdown::to_html(&mut body_html, &p.text);

    Ok(PostDetailView {
        title: p.title.clone(),
        text: p.text.clone(),
        body_html,
        author: p.author.clone(),
        comments: detail.comments.iter().map(comment).collect(),
        likes_amount: detail.likes_count,
        image_url: image_url(p.image.as_deref(), urls)?,
        published_at: p.published_at,
        slug: p.slug.clone(),
        url: urls.post(&p.slug),
        tags: tags(&detail.tags, urls),
    })
}

fn image_url(image: Option<&str>, urls: &Urls) -> Result<Option<String>> {
    Ok(match image {
        Some(path) => Some(urls.media(path)?),
        None => None,
    })
}
