//! Shared test utilities for the quire test suite.
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let posts = collect_posts(&tmp.path().join("posts"), &tmp.path().join("site")).unwrap();
//! let post = find_post(&posts, "midsummer");
//! assert_eq!(post.title, "Midsummer");
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::posts::Post;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/blog/` to a temp directory and return it.
///
/// The copy is the build directory: `config.toml`, `layouts/`, `posts/`,
/// `styles/`. Tests may mutate it freely.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/blog");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Post lookups: panic with a clear message on miss
// =========================================================================

/// Find a post by slug. Panics if not found.
pub fn find_post<'a>(posts: &'a [Post], slug: &str) -> &'a Post {
    posts.iter().find(|p| p.slug == slug).unwrap_or_else(|| {
        let slugs = post_slugs(posts);
        panic!("post '{slug}' not found. Available: {slugs:?}")
    })
}

/// All slugs in sequence order.
pub fn post_slugs(posts: &[Post]) -> Vec<&str> {
    posts.iter().map(|p| p.slug.as_str()).collect()
}
