//! Stylesheet compilation.
//!
//! Every `.scss`, `.sass` or `.css` file in `styles/` becomes one file in
//! `<site>/css/`. Files starting with `_` are partials: they are only pulled
//! in through `@use`/`@import` and never produce output of their own.
//!
//! ```text
//! build/styles/              site/css/
//! ├── _colors.scss     →     (nothing)
//! ├── main.scss        →     main.css
//! └── print.css.scss   →     print.css
//! ```
//!
//! Compilation and writing are separate steps so the whole build can finish
//! every fallible read before the first file lands in the output directory.

use crate::entries::{collect_entries, file_name};
use grass::{Options, OutputStyle};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

const STYLE_EXTENSIONS: &[&str] = &["scss", "sass", "css"];

/// Public URL prefix and output subdirectory for compiled CSS.
pub const CSS_DIR: &str = "css";

#[derive(Error, Debug)]
pub enum StyleError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to compile {}: {message}", path.display())]
    Compile { path: PathBuf, message: String },
}

/// One compiled stylesheet held in memory.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledStyle {
    pub source: PathBuf,
    /// Output file name, always ending in a single `.css`.
    pub file_name: String,
    pub css: String,
}

impl CompiledStyle {
    /// Site-relative URL, e.g. `/css/main.css`.
    pub fn public_path(&self) -> String {
        format!("/{CSS_DIR}/{}", self.file_name)
    }
}

/// Output file name for a stylesheet source.
///
/// The last extension is replaced by `.css`; `print.css.scss` becomes
/// `print.css`, not `print.css.css`.
pub fn output_file_name(source_name: &str) -> String {
    let stem = match source_name.rsplit_once('.') {
        Some((stem, _)) => stem,
        None => source_name,
    };
    if stem.ends_with(".css") {
        stem.to_string()
    } else {
        format!("{stem}.css")
    }
}

fn is_partial(name: &str) -> bool {
    name.starts_with('_')
}

fn is_stylesheet(path: &Path) -> bool {
    if !path.is_file() {
        return false;
    }
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    STYLE_EXTENSIONS.contains(&ext.as_str())
}

/// Compile every non-partial stylesheet in `dir`, in file-name order.
pub fn compile_styles(dir: &Path, compressed: bool) -> Result<Vec<CompiledStyle>, StyleError> {
    let style = if compressed {
        OutputStyle::Compressed
    } else {
        OutputStyle::Expanded
    };
    let options = Options::default().load_path(dir).style(style);

    let mut compiled = Vec::new();
    for path in collect_entries(dir)? {
        let name = file_name(&path);
        if !is_stylesheet(&path) || is_partial(&name) {
            continue;
        }
        let css = grass::from_path(&path, &options).map_err(|e| StyleError::Compile {
            path: path.clone(),
            message: e.to_string(),
        })?;
        debug!(source = %name, "compiled stylesheet");
        compiled.push(CompiledStyle {
            file_name: output_file_name(&name),
            source: path,
            css,
        });
    }
    Ok(compiled)
}

/// Write compiled stylesheets into `<site_dir>/css/`.
///
/// Returns their public paths in the same order.
pub fn write_styles(styles: &[CompiledStyle], site_dir: &Path) -> Result<Vec<String>, StyleError> {
    let out_dir = site_dir.join(CSS_DIR);
    fs::create_dir_all(&out_dir)?;
    let mut paths = Vec::with_capacity(styles.len());
    for style in styles {
        fs::write(out_dir.join(&style.file_name), &style.css)?;
        paths.push(style.public_path());
    }
    Ok(paths)
}

/// Compile and write in one go.
pub fn build_styles(
    styles_dir: &Path,
    site_dir: &Path,
    compressed: bool,
) -> Result<Vec<String>, StyleError> {
    let compiled = compile_styles(styles_dir, compressed)?;
    write_styles(&compiled, site_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn output_name_replaces_extension() {
        assert_eq!(output_file_name("main.scss"), "main.css");
        assert_eq!(output_file_name("layout.sass"), "layout.css");
        assert_eq!(output_file_name("reset.css"), "reset.css");
    }

    #[test]
    fn output_name_collapses_double_css() {
        assert_eq!(output_file_name("print.css.scss"), "print.css");
    }

    #[test]
    fn partials_produce_no_output() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("styles");
        let site = tmp.path().join("site");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("_partial.scss"), "$c: red;").unwrap();
        fs::write(src.join("main.scss"), "@import 'partial';\nbody { color: $c; }").unwrap();

        let paths = build_styles(&src, &site, false).unwrap();

        assert_eq!(paths, vec!["/css/main.css"]);
        assert!(site.join("css/main.css").exists());
        assert!(!site.join("css/_partial.css").exists());
        assert!(!site.join("css/partial.css").exists());
        let css = fs::read_to_string(site.join("css/main.css")).unwrap();
        assert!(css.contains("color: red"));
    }

    #[test]
    fn paths_follow_file_name_order() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("b.scss"), "b { x: 1; }").unwrap();
        fs::write(tmp.path().join("a.css"), "a { x: 1; }").unwrap();
        fs::write(tmp.path().join("c.css.scss"), "c { x: 1; }").unwrap();

        let compiled = compile_styles(tmp.path(), false).unwrap();
        let paths: Vec<String> = compiled.iter().map(|s| s.public_path()).collect();
        assert_eq!(paths, vec!["/css/a.css", "/css/b.css", "/css/c.css"]);
    }

    #[test]
    fn non_stylesheets_are_ignored() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("README.md"), "# notes").unwrap();
        fs::create_dir(tmp.path().join("vendor")).unwrap();
        assert!(compile_styles(tmp.path(), false).unwrap().is_empty());
    }

    #[test]
    fn compressed_output_has_no_newlines_inside_rules() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("main.scss"), "a {\n  color: red;\n  margin: 0;\n}\n").unwrap();
        let compiled = compile_styles(tmp.path(), true).unwrap();
        let css = compiled[0].css.trim();
        assert!(!css.contains('\n'));
        assert!(css.contains("color:red"));
    }

    #[test]
    fn compile_error_names_the_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("broken.scss"), "a { color: $undefined; }").unwrap();
        match compile_styles(tmp.path(), false) {
            Err(StyleError::Compile { path, .. }) => {
                assert_eq!(path.file_name().unwrap(), "broken.scss")
            }
            other => panic!("expected compile error, got {other:?}"),
        }
    }

    #[test]
    fn compiling_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("styles");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("main.scss"), "a { b: c; }").unwrap();

        let compiled = compile_styles(&src, false).unwrap();
        assert_eq!(compiled.len(), 1);
        assert!(!tmp.path().join("site").exists());
    }
}
