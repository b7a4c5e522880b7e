//! Front-matter parsing.
//!
//! Posts open with zero or more metadata lines of the form `* key: value`.
//! The metadata block is the maximal run of such lines at the very top of the
//! file; the first line that does not start with `* ` ends it for good.
//!
//! ```text
//! * title: Spring Cleaning
//! * subtitle: Notes from the garage
//! * published: true
//!
//! The body starts here.
//! ```
//!
//! Parsing is two-layered. [`split`] is purely syntactic and returns every
//! key it saw. [`PostMeta::from_fields`] then maps the known keys onto a
//! fixed record and reports the rest.

use std::collections::BTreeMap;

const MARKER: &str = "* ";

/// Raw result of splitting a post into metadata and body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrontMatter {
    /// Lower-cased keys to trimmed values. Later duplicates win.
    pub fields: BTreeMap<String, String>,
    /// Markdown remaining after the metadata lines, trimmed.
    pub body: String,
}

/// Split raw post contents into front-matter fields and a Markdown body.
///
/// A metadata line without `:` yields the whole remainder as the key and an
/// empty value.
pub fn split(contents: &str) -> FrontMatter {
    let lines: Vec<&str> = contents.lines().collect();
    let consumed = lines
        .iter()
        .take_while(|line| line.starts_with(MARKER))
        .count();

    let fields = lines[..consumed]
        .iter()
        .map(|line| {
            let rest = &line[MARKER.len()..];
            let (key, value) = rest.split_once(':').unwrap_or((rest, ""));
            (key.trim().to_lowercase(), value.trim().to_string())
        })
        .collect();

    let body = lines[consumed..].join("\n").trim().to_string();

    FrontMatter { fields, body }
}

/// Known post metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct PostMeta {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub summary: Option<String>,
    /// Unpublished posts are left out of the site entirely.
    pub published: bool,
}

impl Default for PostMeta {
    fn default() -> Self {
        Self {
            title: None,
            subtitle: None,
            summary: None,
            published: true,
        }
    }
}

/// A front-matter value that could not be interpreted.
#[derive(Debug, Clone, PartialEq)]
pub struct InvalidField {
    pub key: String,
    pub value: String,
}

impl PostMeta {
    /// Build the fixed-schema record from parsed fields.
    ///
    /// Returns the record together with the keys that were not recognised,
    /// so the caller can report them. Empty `title`/`subtitle`/`summary`
    /// values count as absent.
    pub fn from_fields(
        fields: &BTreeMap<String, String>,
    ) -> Result<(PostMeta, Vec<String>), InvalidField> {
        let mut meta = PostMeta::default();
        let mut unknown = Vec::new();

        for (key, value) in fields {
            let text = (!value.is_empty()).then(|| value.clone());
            match key.as_str() {
                "title" => meta.title = text,
                "subtitle" => meta.subtitle = text,
                "summary" => meta.summary = text,
                "published" => {
                    meta.published = parse_bool(value).ok_or_else(|| InvalidField {
                        key: key.clone(),
                        value: value.clone(),
                    })?;
                }
                _ => unknown.push(key.clone()),
            }
        }

        Ok((meta, unknown))
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" => Some(true),
        "false" | "no" => Some(false),
        _ => None,
    }
}
