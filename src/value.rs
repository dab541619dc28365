//! Converts view models and page contexts into [`Value`]s for templating.
//! Text is HTML-escaped on the way in, so templates can print any field
//! directly; the one exception is [`PostDetailView::body_html`], which is
//! already HTML.

use crate::markdown::escape_html;
use crate::pages::{ContactsPage, IndexPage, PostDetailPage, TagPage};
use crate::project::{CommentView, PostDetailView, PostView, TagView};
use chrono::{DateTime, Utc};
use gtmpl_value::Value;
use std::collections::HashMap;

/// How timestamps are displayed.
pub const DISPLAY_TIME_FORMAT: &str = "%d %B %Y, %H:%M";

fn text(s: &str) -> Value {
    Value::String(escape_html(s))
}

fn optional_text(s: &Option<String>) -> Value {
    match s {
        Some(s) => text(s),
        None => Value::Nil,
    }
}

fn time(t: &DateTime<Utc>) -> Value {
    Value::String(t.format(DISPLAY_TIME_FORMAT).to_string())
}

fn list<'a, T: 'a>(items: &'a [T]) -> Value
where
    Value: From<&'a T>,
{
    Value::Array(items.iter().map(Value::from).collect())
}

fn object(fields: Vec<(&str, Value)>) -> Value {
    let mut m: HashMap<String, Value> = HashMap::with_capacity(fields.len());
    for (key, value) in fields {
        m.insert(key.to_owned(), value);
    }
    Value::Object(m)
}

impl From<&TagView> for Value {
    fn from(t: &TagView) -> Value {
        object(vec![
            ("title", text(&t.title)),
            ("posts_with_tag", Value::from(t.posts_with_tag)),
            ("url", text(&t.url)),
        ])
    }
}

impl From<&CommentView> for Value {
    fn from(c: &CommentView) -> Value {
        object(vec![
            ("text", text(&c.text)),
            ("published_at", time(&c.published_at)),
            ("author", text(&c.author)),
        ])
    }
}

impl From<&PostView> for Value {
    fn from(p: &PostView) -> Value {
        object(vec![
            ("title", text(&p.title)),
            ("teaser_text", text(&p.teaser_text)),
            ("author", text(&p.author)),
            ("comments_amount", Value::from(p.comments_amount)),
            ("image_url", optional_text(&p.image_url)),
            ("published_at", time(&p.published_at)),
            ("slug", text(&p.slug)),
            ("url", text(&p.url)),
            ("tags", list(&p.tags)),
            ("first_tag_title", text(&p.first_tag_title)),
        ])
    }
}

impl From<&PostDetailView> for Value {
    fn from(p: &PostDetailView) -> Value {
        object(vec![
            ("title", text(&p.title)),
            ("text", text(&p.text)),
            ("body_html", Value::String(p.body_html.clone())),
            ("author", text(&p.author)),
            ("comments", list(&p.comments)),
            ("likes_amount", Value::from(p.likes_amount)),
            ("image_url", optional_text(&p.image_url)),
            ("published_at", time(&p.published_at)),
            ("slug", text(&p.slug)),
            ("url", text(&p.url)),
            ("tags", list(&p.tags)),
        ])
    }
}

impl From<&IndexPage> for Value {
    fn from(page: &IndexPage) -> Value {
        object(vec![
            ("most_popular_posts", list(&page.most_popular_posts)),
            ("page_posts", list(&page.page_posts)),
            ("popular_tags", list(&page.popular_tags)),
        ])
    }
}

impl From<&PostDetailPage> for Value {
    fn from(page: &PostDetailPage) -> Value {
        object(vec![
            ("post", Value::from(&page.post)),
            ("popular_tags", list(&page.popular_tags)),
            ("most_popular_posts", list(&page.most_popular_posts)),
        ])
    }
}

impl From<&TagPage> for Value {
    fn from(page: &TagPage) -> Value {
        object(vec![
            ("tag", text(&page.tag)),
            ("posts", list(&page.posts)),
            ("popular_tags", list(&page.popular_tags)),
            ("most_popular_posts", list(&page.most_popular_posts)),
        ])
    }
}

impl From<&ContactsPage> for Value {
    fn from(_: &ContactsPage) -> Value {
        object(Vec::new())
    }
}
