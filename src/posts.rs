//! Post discovery and cross-post navigation.
//!
//! Reads every file in `posts/`, turns each into a [`Post`], orders them by
//! the date in their filename and then links neighbours together:
//!
//! ```text
//! posts/2020-01-01-hello.md     → site/posts/hello.html      prev: -              next: /posts/summer.html
//! posts/2020-06-15-summer.md    → site/posts/summer.html     prev: /posts/hello…  next: /index.html
//! posts/2021-03-03-spring.md    → site/index.html            prev: /posts/summ…   next: -
//! ```
//!
//! The most recent post is the site's front page. It still takes part in
//! prev/next linking under its `/index.html` URL.
//!
//! Collection is all-or-nothing: one misnamed file or one unreadable value
//! fails the whole call.

use crate::entries::{collect_entries, file_name};
use crate::frontmatter::{self, PostMeta};
use crate::naming::{self, NameError};
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Post output subdirectory and URL prefix.
pub const POSTS_DIR: &str = "posts";
/// File the most recent post is written to.
pub const INDEX_FILE: &str = "index.html";

#[derive(Error, Debug)]
pub enum PostError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Post filename does not match YYYY-MM-DD-slug.md: {}", .0.display())]
    MalformedFilename(PathBuf),
    #[error("Post filename is not a valid calendar date: {}", .0.display())]
    InvalidDate(PathBuf),
    #[error("Invalid value {value:?} for '{key}' in {}", path.display())]
    InvalidMetadata {
        path: PathBuf,
        key: String,
        value: String,
    },
}

impl From<NameError> for PostError {
    fn from(err: NameError) -> Self {
        match err {
            NameError::MalformedFilename(path) => PostError::MalformedFilename(path),
            NameError::InvalidDate(path) => PostError::InvalidDate(path),
        }
    }
}

/// A single blog post, ready to render.
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    /// Filename slug, e.g. `spring-cleaning`.
    pub slug: String,
    pub date: NaiveDate,
    /// Empty when the front-matter has no title.
    pub title: String,
    pub subtitle: String,
    pub summary: String,
    /// Markdown after the front-matter block.
    pub body: String,
    pub source_path: PathBuf,
    /// Where the rendered page is written.
    pub output_path: PathBuf,
    /// Site-relative URL, `/posts/<slug>.html` or `/index.html`.
    pub site_url: String,
    pub prev_url: Option<String>,
    pub next_url: Option<String>,
}

impl Post {
    /// True for the post that was moved to the site root.
    pub fn is_index(&self) -> bool {
        self.site_url == format!("/{INDEX_FILE}")
    }
}

/// Read and parse one post file.
///
/// The returned post has its provisional location under `posts/` and no
/// neighbour links yet. Posts marked `published: false` give `None`.
pub fn read_post(path: &Path, site_dir: &Path) -> Result<Option<Post>, PostError> {
    let name = naming::parse_post_filename(path)?;
    let contents = fs::read_to_string(path)?;
    let fm = frontmatter::split(&contents);

    let (meta, unknown) =
        PostMeta::from_fields(&fm.fields).map_err(|invalid| PostError::InvalidMetadata {
            path: path.to_path_buf(),
            key: invalid.key,
            value: invalid.value,
        })?;
    for key in unknown {
        warn!(file = %path.display(), key = %key, "ignoring unknown front-matter key");
    }
    if !meta.published {
        debug!(file = %file_name(path), "skipping unpublished post");
        return Ok(None);
    }

    let page = format!("{}.html", name.slug);
    Ok(Some(Post {
        date: name.date(),
        title: meta.title.unwrap_or_default(),
        subtitle: meta.subtitle.unwrap_or_default(),
        summary: meta.summary.unwrap_or_default(),
        body: fm.body,
        source_path: path.to_path_buf(),
        output_path: site_dir.join(POSTS_DIR).join(&page),
        site_url: format!("/{POSTS_DIR}/{page}"),
        prev_url: None,
        next_url: None,
        slug: name.slug,
    }))
}

/// Sort oldest first. Posts sharing a date keep their incoming order.
pub fn sort_posts(posts: &mut [Post]) {
    posts.sort_by_key(|p| p.date);
}

/// Move the last post to the site index, then link every post to its
/// neighbours. Expects `posts` sorted oldest first.
pub fn link_posts(posts: &mut [Post], site_dir: &Path) {
    if let Some(latest) = posts.last_mut() {
        latest.output_path = site_dir.join(INDEX_FILE);
        latest.site_url = format!("/{INDEX_FILE}");
    }

    let urls: Vec<String> = posts.iter().map(|p| p.site_url.clone()).collect();
    for (idx, post) in posts.iter_mut().enumerate() {
        post.prev_url = idx.checked_sub(1).map(|i| urls[i].clone());
        post.next_url = urls.get(idx + 1).cloned();
    }
}

/// Collect every published post in `posts_dir`, sorted and linked.
///
/// Files are read in file-name order, which is also the tie-break for posts
/// sharing a date. Unpublished posts are dropped before linking, so they
/// never become the index page or anyone's neighbour.
pub fn collect_posts(posts_dir: &Path, site_dir: &Path) -> Result<Vec<Post>, PostError> {
    let mut posts = Vec::new();
    for path in collect_entries(posts_dir)? {
        if !path.is_file() {
            continue;
        }
        if let Some(post) = read_post(&path, site_dir)? {
            posts.push(post);
        }
    }

    sort_posts(&mut posts);
    link_posts(&mut posts, site_dir);
    Ok(posts)
}
