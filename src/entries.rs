//! Directory listing shared by every build step.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// List the direct children of `dir`, sorted by path.
///
/// Hidden entries (`.DS_Store`, editor swap files) are skipped. A missing
/// directory is an error.
pub fn collect_entries(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        entries.push(entry.path());
    }
    entries.sort();
    Ok(entries)
}

/// Base file name as a string, lossily converted.
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn entries_are_sorted_and_skip_hidden() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("b.md"), "").unwrap();
        fs::write(tmp.path().join("a.md"), "").unwrap();
        fs::write(tmp.path().join(".DS_Store"), "").unwrap();
        fs::create_dir(tmp.path().join("c")).unwrap();

        let names: Vec<String> = collect_entries(tmp.path())
            .unwrap()
            .iter()
            .map(|p| file_name(p))
            .collect();
        assert_eq!(names, vec!["a.md", "b.md", "c"]);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let err = collect_entries(&tmp.path().join("missing")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
