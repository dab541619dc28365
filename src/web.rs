//! The HTTP surface: routes, handlers, and the mapping from [`Error`] to
//! responses.
//!
//! Handlers open a read-only connection per request and run the page
//! assembler on actix's blocking pool; the page context comes back to the
//! worker for templating. Each worker parses its own templates (see
//! [`Site::from_config`]), so nothing but configuration crosses threads.

use crate::config::Config;
use crate::db::Database;
use crate::error::{Error, Result};
use crate::pages;
use crate::render::{PageKind, Renderer};
use crate::url::Urls;
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use gtmpl_value::Value;
use std::path::PathBuf;

/// Per-worker state. Nothing in it changes after startup.
pub struct Site {
    pub database: PathBuf,
    pub urls: Urls,
    pub renderer: Renderer,
}

impl Site {
    pub fn from_config(config: &Config) -> Result<Site> {
        Ok(Site {
            database: config.database.clone(),
            urls: config.urls.clone(),
            renderer: Renderer::from_theme(&config.theme_directory, config.urls.clone())?,
        })
    }

    // Runs `load` against a fresh read-only connection on the blocking pool.
    async fn load<T, F>(site: &web::Data<Site>, load: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Database, &Urls) -> Result<T> + Send + 'static,
    {
        let database = site.database.clone();
        let urls = site.urls.clone();
        web::block(move || {
            let db = Database::open_read_only(&database)?;
            load(&db, &urls)
        })
        .await?
    }

    fn html(&self, kind: PageKind, value: Value) -> Result<HttpResponse> {
        let body = self.renderer.render(kind, value)?;
        Ok(HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(body))
    }
}

/// Registers the site's routes. Paths end with a slash, like the links built
/// by [`Urls`].
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/posts/{slug}/", web::get().to(post_detail))
        .route("/tags/{tag_title}/", web::get().to(tag_filter))
        .route("/contacts/", web::get().to(contacts));
}

async fn index(site: web::Data<Site>) -> Result<HttpResponse> {
    let page = Site::load(&site, |db, urls| pages::index(db.connection(), urls)).await?;
    site.html(PageKind::Index, Value::from(&page))
}

async fn post_detail(site: web::Data<Site>, slug: web::Path<String>) -> Result<HttpResponse> {
    let slug = slug.into_inner();
    let page = Site::load(&site, move |db, urls| {
        pages::post_detail(db.connection(), urls, &slug)
    })
    .await?;
    site.html(PageKind::PostDetail, Value::from(&page))
}

async fn tag_filter(site: web::Data<Site>, tag_title: web::Path<String>) -> Result<HttpResponse> {
    let tag_title = tag_title.into_inner();
    let page = Site::load(&site, move |db, urls| {
        pages::tag_filter(db.connection(), urls, &tag_title)
    })
    .await?;
    site.html(PageKind::TagFilter, Value::from(&page))
}

async fn contacts(site: web::Data<Site>) -> Result<HttpResponse> {
    site.html(PageKind::Contacts, Value::from(&pages::contacts()))
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }

        let body = match status {
            StatusCode::NOT_FOUND => "Not Found",
            _ => "Server Error",
        };
        HttpResponse::build(status)
            .content_type("text/plain; charset=utf-8")
            .body(body)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::testutil::Fixture;
    use crate::url::fixture as urls;
    use actix_web::{test, App};
    use std::path::Path;

    fn site(database: PathBuf) -> Result<web::Data<Site>> {
        Ok(web::Data::new(Site {
            database,
            urls: urls(),
            renderer: Renderer::from_theme(Path::new("theme"), urls())?,
        }))
    }

    // Seeds a small blog: two tagged posts, one with comments and likes.
    fn seed(path: &Path) -> Result<()> {
        let f = Fixture::at(path)?;
        let craig = f.user("craig")?;
        let ada = f.user("ada")?;
        let rust = f.tag("rust")?;
        let web_dev = f.tag("web dev")?;

        let hello = f.post("hello", craig, "2021-04-16 10:00:00")?;
        f.set_text(hello, "# Hello\n\nFirst post & more")?;
        f.tag_post(hello, rust)?;
        f.tag_post(hello, web_dev)?;
        f.comment(hello, ada, "Welcome!", "2021-04-16 11:00:00")?;
        f.like(hello, ada)?;

        let second = f.post("second", ada, "2021-04-17 10:00:00")?;
        f.tag_post(second, rust)?;
        Ok(())
    }

    async fn get(site: web::Data<Site>, uri: &str) -> (StatusCode, String) {
        let app = test::init_service(App::new().app_data(site).configure(configure)).await;
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        let status = resp.status();
        let bytes = test::read_body(resp).await;
        (status, String::from_utf8_lossy(&bytes).into_owned())
    }

    #[actix_web::test]
    async fn test_index() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let db = dir.path().join("blog.sqlite3");
        seed(&db)?;

        let (status, html) = get(site(db)?, "/").await;
        assert_eq!(StatusCode::OK, status);
        assert!(html.contains("Title of hello"));
        assert!(html.contains("Title of second"));
        assert!(html.contains("https://example.org/tags/web%20dev/"));
        Ok(())
    }

    #[actix_web::test]
    async fn test_post_detail() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let db = dir.path().join("blog.sqlite3");
        seed(&db)?;

        let (status, html) = get(site(db)?, "/posts/hello/").await;
        assert_eq!(StatusCode::OK, status);
        assert!(html.contains("<h2>Hello</h2>"));
        assert!(html.contains("Welcome!"));
        assert!(html.contains("First post &amp; more"));
        Ok(())
    }

    #[actix_web::test]
    async fn test_post_detail_unknown_slug() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let db = dir.path().join("blog.sqlite3");
        seed(&db)?;

        let (status, _) = get(site(db)?, "/posts/missing/").await;
        assert_eq!(StatusCode::NOT_FOUND, status);
        Ok(())
    }

    #[actix_web::test]
    async fn test_tag_filter() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let db = dir.path().join("blog.sqlite3");
        seed(&db)?;

        let (status, html) = get(site(db.clone())?, "/tags/web%20dev/").await;
        assert_eq!(StatusCode::OK, status);
        assert!(html.contains("Title of hello"));

        let (status, _) = get(site(db)?, "/tags/golang/").await;
        assert_eq!(StatusCode::NOT_FOUND, status);
        Ok(())
    }

    #[actix_web::test]
    async fn test_contacts_needs_no_database() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let (status, _) = get(site(dir.path().join("absent.sqlite3"))?, "/contacts/").await;
        assert_eq!(StatusCode::OK, status);
        Ok(())
    }

    #[actix_web::test]
    async fn test_untagged_post_is_a_server_error() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let db = dir.path().join("blog.sqlite3");
        seed(&db)?;
        let f = Fixture::at(&db)?;
        let author = f.user("grace")?;
        f.post("untagged", author, "2021-05-01 10:00:00")?;

        let (status, _) = get(site(db)?, "/").await;
        assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, status);
        Ok(())
    }
}
