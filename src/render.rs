//! Page rendering.
//!
//! Each page is rendered in layers: the Markdown body becomes HTML, that HTML
//! is placed in the post layout, and the result is wrapped in the site
//! layout. Inner layers are handed to outer ones as safe strings so they are
//! not escaped twice.
//!
//! ## Layout Data
//!
//! | Layout | Variables |
//! |--------|-----------|
//! | `links.html.j2` | `prev_url`, `next_url` |
//! | `post.html.j2` | `title`, `subtitle`, `summary`, `date`, `date_display`, `content`, `prev_url`, `next_url`, `links`, `site_title` |
//! | `list.html.j2` | `title`, `posts` (newest first: `title`, `subtitle`, `summary`, `date`, `date_display`, `url`), `site_title` |
//! | `site.html.j2` | `title`, `content`, `css_paths`, `site_title` |
//!
//! `date` is ISO (`2021-03-03`); `date_display` uses `site.date_format`.
//! `links` is only set when the links layout exists. URLs are escaped for
//! use inside a quoted attribute but keep `/` literal.

use crate::config::SiteConfig;
use crate::layouts::{LINKS_LAYOUT, LIST_LAYOUT, LayoutError, Layouts, POST_LAYOUT, SITE_LAYOUT};
use crate::markdown::MarkdownRenderer;
use crate::posts::Post;
use chrono::NaiveDate;
use minijinja::{Value, context};
use serde::Serialize;
use std::fmt::Write;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Output file for the archive page, relative to the site root.
pub const LIST_FILE: &str = "list.html";

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// One row of the archive page.
#[derive(Debug, Serialize)]
struct ListEntry<'a> {
    title: &'a str,
    subtitle: &'a str,
    summary: &'a str,
    date: String,
    date_display: String,
    url: Value,
}

/// Everything a page render needs, borrowed for the length of the build.
pub struct Renderer<'a> {
    pub layouts: &'a Layouts,
    pub markdown: &'a MarkdownRenderer,
    pub config: &'a SiteConfig,
    /// Public stylesheet URLs, in `<link>` order.
    pub css_paths: &'a [String],
}

/// Attribute-escape a site URL. minijinja's own escaping would also turn
/// every `/` into `&#x2f;`.
fn url(path: &str) -> Value {
    let mut escaped = String::with_capacity(path.len());
    for c in path.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            c => escaped.push(c),
        }
    }
    Value::from_safe_string(escaped)
}

fn opt_url(path: Option<&str>) -> Value {
    path.map(url).unwrap_or_default()
}

impl Renderer<'_> {
    /// Falls back to ISO when the format needs more than a date, which
    /// [`SiteConfig::validate`] rejects up front.
    fn date_display(&self, date: NaiveDate) -> String {
        let mut out = String::new();
        match write!(out, "{}", date.format(&self.config.site.date_format)) {
            Ok(()) => out,
            Err(_) => date.to_string(),
        }
    }

    /// Title for `<title>`, falling back to the site title.
    fn page_title<'t>(&'t self, title: &'t str) -> &'t str {
        if title.is_empty() {
            &self.config.site.title
        } else {
            title
        }
    }

    /// Wrap an already rendered fragment in the site layout.
    pub fn wrap_site(&self, title: &str, content: String) -> Result<String, RenderError> {
        Ok(self.layouts.render(
            SITE_LAYOUT,
            context! {
                title => self.page_title(title),
                site_title => &self.config.site.title,
                content => Value::from_safe_string(content),
                css_paths => self.css_paths.iter().map(|p| url(p)).collect::<Vec<_>>(),
            },
        )?)
    }

    /// Render the prev/next fragment, if a links layout exists.
    pub fn render_links(&self, post: &Post) -> Result<Option<String>, RenderError> {
        if !self.layouts.contains(LINKS_LAYOUT) {
            return Ok(None);
        }
        let html = self.layouts.render(
            LINKS_LAYOUT,
            context! {
                prev_url => opt_url(post.prev_url.as_deref()),
                next_url => opt_url(post.next_url.as_deref()),
            },
        )?;
        Ok(Some(html))
    }

    /// Render a post to a complete HTML document.
    pub fn render_post_html(&self, post: &Post) -> Result<String, RenderError> {
        let content = self.markdown.render(&post.body);
        let links = self
            .render_links(post)?
            .map(Value::from_safe_string)
            .unwrap_or_default();

        let post_html = self.layouts.render(
            POST_LAYOUT,
            context! {
                title => &post.title,
                subtitle => &post.subtitle,
                summary => &post.summary,
                date => post.date.to_string(),
                date_display => self.date_display(post.date),
                content => Value::from_safe_string(content),
                prev_url => opt_url(post.prev_url.as_deref()),
                next_url => opt_url(post.next_url.as_deref()),
                links => links,
                site_title => &self.config.site.title,
            },
        )?;

        self.wrap_site(&post.title, post_html)
    }

    /// Render a post and write it to its output path.
    pub fn render_post(&self, post: &Post) -> Result<(), RenderError> {
        let html = self.render_post_html(post)?;
        write_page(&post.output_path, &html)
    }

    /// Render the archive page for `posts` (given oldest first).
    pub fn render_list_html(&self, posts: &[Post]) -> Result<String, RenderError> {
        let entries: Vec<ListEntry> = posts
            .iter()
            .rev()
            .map(|p| ListEntry {
                title: &p.title,
                subtitle: &p.subtitle,
                summary: &p.summary,
                date: p.date.to_string(),
                date_display: self.date_display(p.date),
                url: url(&p.site_url),
            })
            .collect();

        let title = &self.config.archive.title;
        let list_html = self.layouts.render(
            LIST_LAYOUT,
            context! {
                title => title,
                posts => entries,
                site_title => &self.config.site.title,
            },
        )?;
        self.wrap_site(title, list_html)
    }

    /// Write the archive page to `<site_dir>/list.html`.
    pub fn render_list(&self, posts: &[Post], site_dir: &Path) -> Result<PathBuf, RenderError> {
        let html = self.render_list_html(posts)?;
        let path = site_dir.join(LIST_FILE);
        write_page(&path, &html)?;
        Ok(path)
    }
}

fn write_page(path: &Path, html: &str) -> Result<(), RenderError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, html)?;
    Ok(())
}
