//! CLI output formatting for builds.
//!
//! Output is information-first: every post is listed by its position and
//! title, with the page it lands on and its source file as indented context.
//!
//! ```text
//! Layouts
//!     links.html.j2
//!     post.html.j2
//!     site.html.j2
//!
//! Stylesheets
//!     /css/main.css
//!
//! Posts
//! 001 Hello, World → posts/hello-world.html
//!     Date: 2020-01-01
//!     Source: 2020-01-01-hello-world.md
//! 002 (midsummer) → index.html
//!     Date: 2020-06-15
//!     Source: 2020-06-15-midsummer.md
//!
//! Archive → list.html
//!
//! Built 2 posts, 1 stylesheet
//! ```
//!
//! Untitled posts show their slug in parentheses. `format_*` functions are
//! pure and return lines; `print_*` writes them to stdout.

use crate::entries::file_name;
use crate::posts::Post;
use crate::site::BuildReport;
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

/// Path relative to the site root, with `/` separators.
fn site_relative(path: &Path, site_root: &Path) -> String {
    let rel = path.strip_prefix(site_root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn post_line(index: usize, post: &Post, site_root: &Path) -> String {
    let label = if post.title.is_empty() {
        format!("({})", post.slug)
    } else {
        post.title.clone()
    };
    format!(
        "{} {} → {}",
        format_index(index),
        label,
        site_relative(&post.output_path, site_root)
    )
}

/// Format a build (or check) report.
///
/// `verb` is the summary's leading word, "Built" or "Checked".
pub fn format_build_output(report: &BuildReport, site_root: &Path, verb: &str) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push("Layouts".to_string());
    for name in &report.layouts {
        lines.push(format!("{}{}", indent(1), name));
    }

    if !report.stylesheets.is_empty() {
        lines.push(String::new());
        lines.push("Stylesheets".to_string());
        for path in &report.stylesheets {
            lines.push(format!("{}{}", indent(1), path));
        }
    }

    if !report.posts.is_empty() {
        lines.push(String::new());
        lines.push("Posts".to_string());
        for (i, post) in report.posts.iter().enumerate() {
            lines.push(post_line(i + 1, post, site_root));
            lines.push(format!("{}Date: {}", indent(1), post.date));
            lines.push(format!(
                "{}Source: {}",
                indent(1),
                file_name(&post.source_path)
            ));
        }
    }

    if let Some(list) = &report.list_page {
        lines.push(String::new());
        lines.push(format!("Archive → {}", site_relative(list, site_root)));
    }

    lines.push(String::new());
    if report.removed > 0 {
        lines.push(format!(
            "Removed {} from posts/",
            plural(report.removed, "stale file")
        ));
    }
    lines.push(format!(
        "{verb} {}, {}",
        plural(report.posts.len(), "post"),
        plural(report.stylesheets.len(), "stylesheet")
    ));

    lines
}

pub fn print_build_output(report: &BuildReport, site_root: &Path, verb: &str) {
    for line in format_build_output(report, site_root, verb) {
        println!("{}", line);
    }
}
