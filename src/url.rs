//! Builds the links that appear in rendered pages: post pages, tag pages, and
//! media files.

use url::{ParseError, Url};

/// The roots every page link is built from. `site_root` and `media_root`
/// should end with a trailing slash; otherwise [`Url::join`] treats their last
/// path segment as a file name and drops it.
#[derive(Clone, Debug)]
pub struct Urls {
    pub site_root: Url,
    pub media_root: Url,
    pub static_root: Url,
}

impl Urls {
    pub fn new(site_root: Url, media_root: Url, static_root: Url) -> Urls {
        Urls {
            site_root,
            media_root,
            static_root,
        }
    }

    /// `{site_root}/posts/{slug}/`
    pub fn post(&self, slug: &str) -> String {
        self.route("posts", slug)
    }

    /// `{site_root}/tags/{title}/`. The title is percent-encoded, so tags
    /// with spaces or slashes still produce a single path segment.
    pub fn tag(&self, title: &str) -> String {
        self.route("tags", title)
    }

    /// Resolves an image path stored on a post against the media root.
    pub fn media(&self, path: &str) -> Result<String, ParseError> {
        Ok(self.media_root.join(path.trim_start_matches('/'))?.to_string())
    }

    fn route(&self, prefix: &str, key: &str) -> String {
        let mut url = self.site_root.clone();
        // `path_segments_mut` only fails for cannot-be-a-base URLs, which the
        // config loader rejects
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(prefix).push(key).push("");
        }
        url.to_string()
    }
}

#[cfg(test)]
pub(crate) fn fixture() -> Urls {
    Urls::new(
        Url::parse("https://example.org/").unwrap(),
        Url::parse("https://example.org/media/").unwrap(),
        Url::parse("https://example.org/static/").unwrap(),
    )
}
