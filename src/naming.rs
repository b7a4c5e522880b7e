//! Post filename parsing for the `YYYY-MM-DD-slug.md` convention.
//!
//! Every post carries its publication date and URL slug in its filename.
//! Nothing else (front-matter, file timestamps) is consulted for either.
//!
//! - `2020-06-15-midsummer.md` → 2020-06-15, slug `midsummer`
//! - `2021-03-03-spring-cleaning.html.md` → 2021-03-03, slug `spring-cleaning`
//! - `notes.md` → rejected
//!
//! A name that does not follow the convention is an error, never skipped:
//! a misnamed draft would otherwise vanish from the site without a trace.

use chrono::NaiveDate;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;

static POST_FILENAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]+)-([0-9]+)-([0-9]+)-([^.]+)(?:\.html)?\.md$").expect("post filename regex")
});

#[derive(Error, Debug, PartialEq)]
pub enum NameError {
    #[error("Post filename does not match YYYY-MM-DD-slug.md: {0}")]
    MalformedFilename(PathBuf),
    #[error("Post filename is not a valid calendar date: {0}")]
    InvalidDate(PathBuf),
}

/// Result of parsing a post filename like `2020-06-15-midsummer.md`.
#[derive(Debug, Clone, PartialEq)]
pub struct PostName {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    /// Everything between the date and the extension, dashes preserved.
    pub slug: String,
}

impl PostName {
    /// Calendar date built from the filename parts.
    ///
    /// Only meaningful after [`parse_post_filename`] succeeded, which already
    /// rejected impossible dates.
    pub fn date(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day).unwrap_or_default()
    }
}

/// Parse the base filename of `path`.
///
/// The directory part is ignored. Fails with [`NameError::MalformedFilename`]
/// when the shape or extension is wrong and with [`NameError::InvalidDate`]
/// when the digits do not form a real date (`2021-02-30`, `2020-13-01`).
pub fn parse_post_filename(path: &Path) -> Result<PostName, NameError> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .ok_or_else(|| NameError::MalformedFilename(path.to_path_buf()))?;

    let caps = POST_FILENAME
        .captures(&file_name)
        .ok_or_else(|| NameError::MalformedFilename(path.to_path_buf()))?;

    let invalid_date = || NameError::InvalidDate(path.to_path_buf());
    let year: i32 = caps[1].parse().map_err(|_| invalid_date())?;
    let month: u32 = caps[2].parse().map_err(|_| invalid_date())?;
    let day: u32 = caps[3].parse().map_err(|_| invalid_date())?;

    if NaiveDate::from_ymd_opt(year, month, day).is_none() {
        return Err(invalid_date());
    }

    Ok(PostName {
        year,
        month,
        day,
        slug: caps[4].to_string(),
    })
}
