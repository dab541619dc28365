//! Defines the crate-wide [`Error`] type. Every fallible operation between the
//! HTTP handlers and the database returns [`Result`], and the [`web`] module
//! maps each variant onto a status code.
//!
//! [`web`]: crate::web

use std::fmt;

/// The result of a fallible blog operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a problem loading, projecting, or rendering a page.
#[derive(Debug)]
pub enum Error {
    /// Returned when a post slug or a tag title doesn't match any row. `kind`
    /// names the entity (`"post"`, `"tag"`) and `key` is the lookup value.
    NotFound { kind: &'static str, key: String },

    /// Returned when the first tag of a post is read but the post has no tags.
    /// Pages that show post cards require every listed post to be tagged.
    EmptyTagList { slug: String },

    /// Returned for SQLite errors.
    Database(rusqlite::Error),

    /// Returned for errors parsing or executing templates.
    Template(String),

    /// Returned when a media or page URL can't be built.
    Url(url::ParseError),

    /// Returned for other I/O errors.
    Io(std::io::Error),

    /// Returned when the blocking thread pool dropped a database task.
    Blocking,
}

impl Error {
    /// Shorthand for [`Error::NotFound`].
    pub fn not_found(kind: &'static str, key: &str) -> Error {
        Error::NotFound {
            kind,
            key: key.to_owned(),
        }
    }

    /// Returns `true` for [`Error::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::NotFound { kind, key } => write!(f, "{} `{}` not found", kind, key),
            Error::EmptyTagList { slug } => {
                write!(f, "post `{}` has no tags to take the first of", slug)
            }
            Error::Database(err) => write!(f, "database: {}", err),
            Error::Template(err) => write!(f, "template: {}", err),
            Error::Url(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
            Error::Blocking => write!(f, "database worker pool is gone"),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::NotFound { .. } => None,
            Error::EmptyTagList { .. } => None,
            Error::Database(err) => Some(err),
            Error::Template(_) => None,
            Error::Url(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::Blocking => None,
        }
    }
}

impl From<rusqlite::Error> for Error {
    /// Converts a [`rusqlite::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator on statements.
    fn from(err: rusqlite::Error) -> Error {
        Error::Database(err)
    }
}

impl From<url::ParseError> for Error {
    /// Converts a [`url::ParseError`] into an [`Error`]. It allows us to use
    /// the `?` operator for URL joining functions.
    fn from(err: url::ParseError) -> Error {
        Error::Url(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<actix_web::error::BlockingError> for Error {
    fn from(_: actix_web::error::BlockingError) -> Error {
        Error::Blocking
    }
}
