//! Plain-text export format.
//!
//! Each entry is written as its text (or [`IMAGE_PLACEHOLDER`] for images)
//! followed by a line holding only [`SEPARATOR`]. Images cannot be recovered
//! from this format; parsing reports them as placeholders.

use crate::entry::Entry;

pub const SEPARATOR: &str = "---ENTRY---";
pub const IMAGE_PLACEHOLDER: &str = "[Image]";

/// One non-empty chunk of an export file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    ImagePlaceholder,
}

fn delimiter() -> String {
    format!("\n{}\n", SEPARATOR)
}

pub fn render<'a>(entries: impl IntoIterator<Item = &'a Entry>) -> String {
    let delimiter = delimiter();
    let mut out = String::new();
    for entry in entries {
        match entry {
            Entry::Text(text) => out.push_str(text),
            Entry::Image(_) => out.push_str(IMAGE_PLACEHOLDER),
        }
        out.push_str(&delimiter);
    }
    out
}

/// Split on the delimiter, trim each chunk and drop the empty ones.
pub fn parse(text: &str) -> Vec<Segment> {
    text.split(delimiter().as_str())
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .map(|chunk| {
            if chunk == IMAGE_PLACEHOLDER {
                Segment::ImagePlaceholder
            } else {
                Segment::Text(chunk.to_string())
            }
        })
        .collect()
}
