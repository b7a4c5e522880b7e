//! Layout registry.
//!
//! All templates in `layouts/` are loaded and compiled once, before anything
//! is rendered, into a [`Layouts`] value that rendering code borrows. The
//! registry is never mutated after [`Layouts::load`] returns.
//!
//! ## Known Layouts
//!
//! | File | Required | Renders |
//! |------|----------|---------|
//! | `site.html.j2` | yes | Page shell around every other layout |
//! | `post.html.j2` | yes | A single post |
//! | `links.html.j2` | no | Prev/next fragment handed to the post layout |
//! | `list.html.j2` | no | Archive of all posts (`list.html`) |
//!
//! Templates use minijinja syntax. Auto-escaping is on for `.html.j2`, so
//! rendered HTML fragments must be passed in as safe values (see
//! [`minijinja::Value::from_safe_string`]).

use crate::entries::{collect_entries, file_name};
use minijinja::{AutoEscape, Environment, Value};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Every file in the layouts directory must end with this.
pub const LAYOUT_SUFFIX: &str = ".html.j2";

pub const SITE_LAYOUT: &str = "site.html.j2";
pub const POST_LAYOUT: &str = "post.html.j2";
pub const LINKS_LAYOUT: &str = "links.html.j2";
pub const LIST_LAYOUT: &str = "list.html.j2";

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Layout {} is not a {LAYOUT_SUFFIX} template", .0.display())]
    InvalidLayout(PathBuf),
    #[error("Layout {0} not found")]
    Missing(String),
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),
}

/// Compiled layouts keyed by file name.
#[derive(Debug)]
pub struct Layouts {
    env: Environment<'static>,
}

impl Layouts {
    /// Load every template in `dir` (non-recursive).
    ///
    /// Fails on the first entry whose name lacks [`LAYOUT_SUFFIX`] and on
    /// the first template with a syntax error.
    pub fn load(dir: &Path) -> Result<Self, LayoutError> {
        let mut env = new_environment();

        for path in collect_entries(dir)? {
            let name = file_name(&path);
            if !name.ends_with(LAYOUT_SUFFIX) {
                return Err(LayoutError::InvalidLayout(path));
            }
            let source = fs::read_to_string(&path)?;
            env.add_template_owned(name.clone(), source)?;
            debug!(layout = %name, "loaded layout");
        }

        Ok(Self { env })
    }

    /// Build a registry from in-memory templates.
    pub fn from_sources<'a>(
        sources: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<Self, LayoutError> {
        let mut env = new_environment();
        for (name, source) in sources {
            env.add_template_owned(name.to_string(), source.to_string())?;
        }
        Ok(Self { env })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.env.get_template(name).is_ok()
    }

    /// Layout names in lexical order.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .env
            .templates()
            .map(|(name, _)| name.to_string())
            .collect();
        names.sort();
        names
    }

    /// Render layout `name` with `ctx`.
    pub fn render(&self, name: &str, ctx: Value) -> Result<String, LayoutError> {
        let template = self
            .env
            .get_template(name)
            .map_err(|_| LayoutError::Missing(name.to_string()))?;
        Ok(template.render(ctx)?)
    }
}

fn new_environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_auto_escape_callback(|name| {
        if name.ends_with(LAYOUT_SUFFIX) {
            AutoEscape::Html
        } else {
            AutoEscape::None
        }
    });
    env
}
