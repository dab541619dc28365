//! Loads the theme's templates and renders page contexts into HTML.
//!
//! A theme is a directory holding a `theme.yaml` file that lists, for each
//! page, the template files that make up that page's template. The files are
//! concatenated in order before parsing, so shared `{{define}}` blocks (a
//! base layout, the sidebar) go first and the page body goes last.

use crate::error::{Error, Result};
use crate::url::Urls;
use gtmpl::{Context, Template};
use gtmpl_value::Value;
use serde::Deserialize;
use std::fs::File;
use std::path::{Path, PathBuf};

/// The file in a theme directory that lists the template files.
pub const THEME_FILE: &str = "theme.yaml";

/// The four kinds of page the site serves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageKind {
    Index,
    PostDetail,
    TagFilter,
    Contacts,
}

#[derive(Deserialize)]
struct Theme {
    index_template: Vec<PathBuf>,
    post_template: Vec<PathBuf>,
    tag_template: Vec<PathBuf>,
    contacts_template: Vec<PathBuf>,
}

/// Holds one parsed template per [`PageKind`].
pub struct Renderer {
    index: Template,
    post_detail: Template,
    tag_filter: Template,
    contacts: Template,
    urls: Urls,
}

impl Renderer {
    /// Parses every template listed in `{theme_dir}/theme.yaml`. Template
    /// paths are relative to `theme_dir`.
    pub fn from_theme(theme_dir: &Path, urls: Urls) -> Result<Renderer> {
        let theme_path = theme_dir.join(THEME_FILE);
        let file = File::open(&theme_path).map_err(|e| {
            Error::Template(format!("opening `{}`: {}", theme_path.display(), e))
        })?;
        let theme: Theme = serde_yaml::from_reader(file)
            .map_err(|e| Error::Template(format!("{}: {}", theme_path.display(), e)))?;

        let files = |paths: &[PathBuf]| -> Vec<PathBuf> {
            paths.iter().map(|relpath| theme_dir.join(relpath)).collect()
        };

        let renderer = Renderer {
            index: parse_template(&files(&theme.index_template))?,
            post_detail: parse_template(&files(&theme.post_template))?,
            tag_filter: parse_template(&files(&theme.tag_template))?,
            contacts: parse_template(&files(&theme.contacts_template))?,
            urls,
        };
        tracing::info!(theme = %theme_dir.display(), "loaded templates");
        Ok(renderer)
    }

    fn template(&self, kind: PageKind) -> &Template {
        match kind {
            PageKind::Index => &self.index,
            PageKind::PostDetail => &self.post_detail,
            PageKind::TagFilter => &self.tag_filter,
            PageKind::Contacts => &self.contacts,
        }
    }

    /// Renders a page context. `site_root` and `static_url` are added to the
    /// top-level context object so layouts can link to the home page and to
    /// stylesheets.
    pub fn render(&self, kind: PageKind, mut value: Value) -> Result<String> {
        if let Value::Object(obj) = &mut value {
            obj.insert(
                "site_root".to_owned(),
                Value::String(self.urls.site_root.to_string()),
            );
            obj.insert(
                "static_url".to_owned(),
                Value::String(self.urls.static_root.to_string()),
            );
        }

        let mut out: Vec<u8> = Vec::new();
        self.template(kind)
            .execute(&mut out, &Context::from(value))
            .map_err(|e| Error::Template(format!("rendering {:?} page: {}", kind, e)))?;
        String::from_utf8(out).map_err(|e| Error::Template(e.to_string()))
    }
}

// Loads the template file contents, concatenates them, and parses the result
// into a template.
fn parse_template(template_files: &[PathBuf]) -> Result<Template> {
    let mut contents = String::new();
    for template_file in template_files {
        use std::io::Read;
        File::open(template_file)
            .map_err(|e| Error::Template(format!("opening `{}`: {}", template_file.display(), e)))?
            .read_to_string(&mut contents)?;
        contents.push(' ');
    }

    let mut template = Template::default();
    template
        .parse(&contents)
        .map_err(|e| Error::Template(format!("parsing {:?}: {}", template_files, e)))?;
    Ok(template)
}
