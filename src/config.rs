//! Loads the site configuration from a `blog.yaml` project file.
//!
//! ```yaml
//! site_root: https://blog.example.org/
//! media_url: media/          # optional, relative to site_root
//! static_url: static/        # optional, relative to site_root
//! database: blog.sqlite3     # optional, relative to the project file
//! bind: 127.0.0.1:8000       # optional
//! ```
//!
//! The theme is read from the `theme` directory next to the project file.

use crate::url::Urls;
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs::File;
use std::path::{Path, PathBuf};
use url::Url;

pub const PROJECT_FILE: &str = "blog.yaml";

#[derive(Deserialize)]
struct MediaUrl(String);
impl Default for MediaUrl {
    fn default() -> Self {
        MediaUrl(String::from("media/"))
    }
}

#[derive(Deserialize)]
struct StaticUrl(String);
impl Default for StaticUrl {
    fn default() -> Self {
        StaticUrl(String::from("static/"))
    }
}

#[derive(Deserialize)]
struct DatabasePath(PathBuf);
impl Default for DatabasePath {
    fn default() -> Self {
        DatabasePath(PathBuf::from("blog.sqlite3"))
    }
}

#[derive(Deserialize)]
struct Bind(String);
impl Default for Bind {
    fn default() -> Self {
        Bind(String::from("127.0.0.1:8000"))
    }
}

#[derive(Deserialize)]
struct Project {
    site_root: Url,

    #[serde(default)]
    media_url: MediaUrl,

    #[serde(default)]
    static_url: StaticUrl,

    #[serde(default)]
    database: DatabasePath,

    #[serde(default)]
    bind: Bind,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub urls: Urls,
    pub database: PathBuf,
    pub theme_directory: PathBuf,
    pub bind: String,
}

impl Config {
    /// Looks for `blog.yaml` in `dir` and then in each of its ancestors.
    pub fn from_directory(dir: &Path) -> Result<Config> {
        let path = dir.join(PROJECT_FILE);
        if path.exists() {
            Config::from_project_file(&path)
                .with_context(|| format!("Loading configuration from `{}`", path.display()))
        } else {
            match dir.parent() {
                Some(parent) => Config::from_directory(parent),
                None => Err(anyhow!(
                    "Could not find `{}` in any parent directory",
                    PROJECT_FILE
                )),
            }
        }
    }

    pub fn from_project_file(path: &Path) -> Result<Config> {
        let file = File::open(path)
            .with_context(|| format!("Opening project file `{}`", path.display()))?;
        let project: Project = serde_yaml::from_reader(file)?;
        let project_root = path.parent().ok_or_else(|| {
            anyhow!(
                "Can't get parent directory for provided project file path '{:?}'",
                path
            )
        })?;
        Config::from_project(project, project_root)
    }

    fn from_project(project: Project, project_root: &Path) -> Result<Config> {
        if project.site_root.cannot_be_a_base() {
            return Err(anyhow!(
                "`site_root` must be a hierarchical URL, got `{}`",
                project.site_root
            ));
        }
        let site_root = with_trailing_slash(project.site_root);
        let media_root = with_trailing_slash(
            site_root
                .join(&project.media_url.0)
                .context("Resolving `media_url`")?,
        );
        let static_root = with_trailing_slash(
            site_root
                .join(&project.static_url.0)
                .context("Resolving `static_url`")?,
        );

        Ok(Config {
            urls: Urls::new(site_root, media_root, static_root),
            database: project_root.join(project.database.0),
            theme_directory: project_root.join("theme"),
            bind: project.bind.0,
        })
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs;

    #[test]
    fn test_defaults() -> Result<()> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join(PROJECT_FILE), "site_root: https://example.org/blog\n")?;

        let config = Config::from_directory(dir.path())?;
        assert_eq!("https://example.org/blog/", config.urls.site_root.as_str());
        assert_eq!("https://example.org/blog/media/", config.urls.media_root.as_str());
        assert_eq!("https://example.org/blog/static/", config.urls.static_root.as_str());
        assert_eq!(dir.path().join("blog.sqlite3"), config.database);
        assert_eq!(dir.path().join("theme"), config.theme_directory);
        assert_eq!("127.0.0.1:8000", config.bind);
        Ok(())
    }

    #[test]
    fn test_explicit_values() -> Result<()> {
        let dir = tempfile::tempdir()?;
        fs::write(
            dir.path().join(PROJECT_FILE),
            "site_root: https://example.org/\n\
             media_url: https://cdn.example.org/uploads\n\
             database: data/site.db\n\
             bind: 0.0.0.0:9000\n",
        )?;

        let config = Config::from_directory(dir.path())?;
        assert_eq!("https://cdn.example.org/uploads/", config.urls.media_root.as_str());
        assert_eq!(dir.path().join("data/site.db"), config.database);
        assert_eq!("0.0.0.0:9000", config.bind);
        Ok(())
    }

    #[test]
    fn test_found_in_parent_directory() -> Result<()> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join(PROJECT_FILE), "site_root: https://example.org/\n")?;
        let nested = dir.path().join("a").join("b");
        fs::create_dir_all(&nested)?;

        let config = Config::from_directory(&nested)?;
        assert_eq!(dir.path().join("theme"), config.theme_directory);
        Ok(())
    }

    #[test]
    fn test_rejects_cannot_be_a_base_site_root() -> Result<()> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join(PROJECT_FILE), "site_root: \"mailto:me@example.org\"\n")?;
        assert!(Config::from_directory(dir.path()).is_err());
        Ok(())
    }
}
