use chrono::{DateTime, Utc};

/// A comment on a post with its author's username resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Comment {
    pub text: String,
    pub published_at: DateTime<Utc>,
    pub author: String,
}
