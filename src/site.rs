//! Whole-site build.
//!
//! The build runs in two halves. [`plan`] does every read and every check:
//! config, layouts, stylesheet compilation, post collection. Only when all of
//! that succeeded does [`build`] touch the output directory: CSS is written,
//! stale post pages are removed, every post is rendered and finally the
//! archive page, if there is a layout for it.
//!
//! Any error aborts the run. Files already written by the failing run stay
//! where they are.
//!
//! ## Directory Layout
//!
//! ```text
//! build/                      site/
//! ├── config.toml             ├── index.html        # most recent post
//! ├── layouts/                ├── list.html         # archive (optional)
//! │   ├── site.html.j2        ├── css/
//! │   ├── post.html.j2        │   └── main.css
//! │   ├── links.html.j2       └── posts/
//! │   └── list.html.j2            ├── hello.html
//! ├── posts/                      └── summer.html
//! │   └── 2020-01-01-hello.md
//! └── styles/
//!     ├── _colors.scss
//!     └── main.scss
//! ```

use crate::config::{self, ConfigError, SiteConfig};
use crate::layouts::{LIST_LAYOUT, LayoutError, Layouts, POST_LAYOUT, SITE_LAYOUT};
use crate::markdown::MarkdownRenderer;
use crate::posts::{self, POSTS_DIR, Post, PostError};
use crate::render::{LIST_FILE, RenderError, Renderer};
use crate::styles::{self, CompiledStyle, StyleError};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

pub const LAYOUTS_DIR: &str = "layouts";
pub const STYLES_DIR: &str = "styles";

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),
    #[error("Style error: {0}")]
    Style(#[from] StyleError),
    #[error("Post error: {0}")]
    Post(#[from] PostError),
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}

/// Source and output roots.
#[derive(Debug, Clone)]
pub struct SitePaths {
    /// Holds `config.toml`, `layouts/`, `posts/` and `styles/`.
    pub build: PathBuf,
    /// Output root.
    pub site: PathBuf,
}

impl SitePaths {
    pub fn new(build: impl Into<PathBuf>, site: impl Into<PathBuf>) -> Self {
        Self {
            build: build.into(),
            site: site.into(),
        }
    }

    pub fn layouts_dir(&self) -> PathBuf {
        self.build.join(LAYOUTS_DIR)
    }

    pub fn styles_dir(&self) -> PathBuf {
        self.build.join(STYLES_DIR)
    }

    pub fn posts_dir(&self) -> PathBuf {
        self.build.join(POSTS_DIR)
    }

    pub fn posts_output_dir(&self) -> PathBuf {
        self.site.join(POSTS_DIR)
    }
}

/// Everything read and validated before the first write.
#[derive(Debug)]
pub struct BuildPlan {
    pub config: SiteConfig,
    pub layouts: Layouts,
    pub styles: Vec<CompiledStyle>,
    /// Sorted oldest first and linked.
    pub posts: Vec<Post>,
}

impl BuildPlan {
    pub fn has_list_page(&self) -> bool {
        self.layouts.contains(LIST_LAYOUT)
    }
}

/// What a build produced (or, for `check`, would produce).
#[derive(Debug)]
pub struct BuildReport {
    pub layouts: Vec<String>,
    /// Public CSS paths in `<link>` order.
    pub stylesheets: Vec<String>,
    pub posts: Vec<Post>,
    /// Stale files deleted from `<site>/posts`.
    pub removed: usize,
    pub list_page: Option<PathBuf>,
}

/// Read and validate all inputs without writing anything.
pub fn plan(paths: &SitePaths) -> Result<BuildPlan, BuildError> {
    let config = config::load_config(&paths.build)?;

    let layouts = Layouts::load(&paths.layouts_dir())?;
    for required in [SITE_LAYOUT, POST_LAYOUT] {
        if !layouts.contains(required) {
            return Err(LayoutError::Missing(required.to_string()).into());
        }
    }
    info!(count = layouts.names().len(), "loaded layouts");

    let styles = styles::compile_styles(&paths.styles_dir(), config.styles.compressed)?;
    info!(count = styles.len(), "compiled stylesheets");

    let posts = posts::collect_posts(&paths.posts_dir(), &paths.site)?;
    info!(count = posts.len(), "collected posts");

    Ok(BuildPlan {
        config,
        layouts,
        styles,
        posts,
    })
}

/// Report for a plan without executing it.
pub fn dry_run(plan: &BuildPlan, paths: &SitePaths) -> BuildReport {
    BuildReport {
        layouts: plan.layouts.names(),
        stylesheets: plan.styles.iter().map(|s| s.public_path()).collect(),
        posts: plan.posts.clone(),
        removed: 0,
        list_page: plan.has_list_page().then(|| paths.site.join(LIST_FILE)),
    }
}

/// Validate inputs only. Nothing is written.
pub fn check(paths: &SitePaths) -> Result<BuildReport, BuildError> {
    let plan = plan(paths)?;
    Ok(dry_run(&plan, paths))
}

/// Build the whole site.
pub fn build(paths: &SitePaths) -> Result<BuildReport, BuildError> {
    let plan = plan(paths)?;

    let css_paths = styles::write_styles(&plan.styles, &paths.site)?;
    let removed = clean_dir(&paths.posts_output_dir())?;
    info!(removed, "cleaned post output");

    let markdown = MarkdownRenderer::new(&plan.config.markdown);
    let renderer = Renderer {
        layouts: &plan.layouts,
        markdown: &markdown,
        config: &plan.config,
        css_paths: &css_paths,
    };

    for post in &plan.posts {
        renderer.render_post(post)?;
        debug!(slug = %post.slug, path = %post.output_path.display(), "rendered post");
    }
    info!(count = plan.posts.len(), "rendered posts");

    let list_page = if plan.has_list_page() {
        let path = renderer.render_list(&plan.posts, &paths.site)?;
        info!(path = %path.display(), "rendered archive");
        Some(path)
    } else {
        None
    };

    Ok(BuildReport {
        layouts: plan.layouts.names(),
        stylesheets: css_paths,
        posts: plan.posts,
        removed,
        list_page,
    })
}

/// Delete every regular file directly inside `dir`, creating `dir` if it
/// does not exist. Subdirectories are left alone. Returns how many files
/// were removed.
pub fn clean_dir(dir: &Path) -> io::Result<usize> {
    fs::create_dir_all(dir)?;
    let mut removed = 0;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            fs::remove_file(entry.path())?;
            removed += 1;
        }
    }
    Ok(removed)
}
