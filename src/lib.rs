//! # Quire
//!
//! A minimal static site generator for a personal Markdown blog. Posts are
//! plain Markdown files whose names carry their date; layouts are minijinja
//! templates; styles are Sass. One command turns a build directory into a
//! browsable site.
//!
//! # Pipeline
//!
//! A build is a single linear pass with no state carried between runs:
//!
//! ```text
//! 1. Config    build/config.toml  →  SiteConfig      (optional, sparse)
//! 2. Layouts   build/layouts/     →  Layouts         (compiled templates)
//! 3. Styles    build/styles/      →  compiled CSS    (held in memory)
//! 4. Posts     build/posts/       →  Vec<Post>       (sorted, linked)
//! 5. Write     CSS → site/css/, clean site/posts/, render every post,
//!              render site/list.html when a list layout exists
//! ```
//!
//! Steps 1–4 only read. If any of them fails, nothing has been written.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`naming`] | `YYYY-MM-DD-slug.md` filename parser |
//! | [`frontmatter`] | `* key: value` metadata block and the `PostMeta` record |
//! | [`posts`] | Post discovery, chronological order, index page, prev/next links |
//! | [`layouts`] | Layout registry backed by minijinja |
//! | [`markdown`] | pulldown-cmark options and the code-block highlight hook |
//! | [`styles`] | Sass/CSS compilation with grass |
//! | [`render`] | Layered page rendering: body → post → site |
//! | [`site`] | Orchestrator: plan, then build |
//! | [`config`] | `config.toml` loading, merging and validation |
//! | [`output`] | CLI output formatting of build reports |
//! | [`entries`] | Sorted, one-level directory listing |
//!
//! # Design Decisions
//!
//! ## The Filename Is the Schedule
//!
//! A post's date and slug come from its filename and nowhere else. Sorting is
//! by that date; the newest post is the front page (`/index.html`). There is
//! no draft directory and no publish date; the only workflow switch is a
//! `published: false` line in the front-matter.
//!
//! ## Fail Fast, Whole Build
//!
//! A misnamed post, a layout with the wrong extension or a Sass error stops
//! the build. Skipping bad input silently would publish a site that is
//! missing content nobody noticed was missing.
//!
//! ## Runtime Templates
//!
//! Layouts live next to the content and change without recompiling, so they
//! are minijinja templates loaded at build time. Auto-escaping is on; inner
//! layers are passed outward as safe strings.

pub mod config;
pub mod entries;
pub mod frontmatter;
pub mod layouts;
pub mod markdown;
pub mod naming;
pub mod output;
pub mod posts;
pub mod render;
pub mod site;
pub mod styles;

#[cfg(test)]
pub(crate) mod test_helpers;
