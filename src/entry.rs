use serde::{Deserialize, Serialize};

use crate::clipboard;

/// One clipboard-history record.
///
/// Serialized as `{"type": "Text" | "Image", "content": ...}`. Image content
/// holds PNG bytes and is written as base64 so the document stays valid JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content")]
pub enum Entry {
    Text(String),
    Image(#[serde(with = "base64_bytes")] Vec<u8>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Text,
    Image,
}

impl Entry {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn kind(&self) -> EntryKind {
        match self {
            Self::Text(_) => EntryKind::Text,
            Self::Image(_) => EntryKind::Image,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Image(_) => None,
        }
    }

    /// Single-line summary for list views.
    pub fn preview(&self, max_chars: usize) -> String {
        match self {
            Self::Text(text) => make_preview(text, max_chars),
            Self::Image(png) => match clipboard::png_dimensions(png) {
                Ok((w, h)) => format!("[Image] ({}x{}, {} KB)", w, h, png.len() / 1024),
                Err(_) => "[Image]".to_string(),
            },
        }
    }
}

fn make_preview(text: &str, max_chars: usize) -> String {
    let single_line: String = text
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();
    let trimmed = single_line.trim();
    if trimmed.chars().count() > max_chars {
        trimmed.chars().take(max_chars).collect::<String>() + "…"
    } else {
        trimmed.to_string()
    }
}

mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_entry_json_shape() {
        let json = serde_json::to_string(&Entry::text("hello")).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["type"], "Text");
        assert_eq!(parsed["content"], "hello");
        assert_eq!(parsed.as_object().unwrap().len(), 2);
    }

    #[test]
    fn test_image_entry_is_base64() {
        let entry = Entry::Image(vec![0x89, 0x50, 0x4E, 0x47]);
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(json, r#"{"type":"Image","content":"iVBORw=="}"#);

        let back: Entry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn test_unknown_type_rejected() {
        let result: Result<Entry, _> = serde_json::from_str(r#"{"type":"Html","content":"x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_bad_base64_rejected() {
        let result: Result<Entry, _> =
            serde_json::from_str(r#"{"type":"Image","content":"not base64!"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_kind_follows_variant() {
        assert_eq!(Entry::text("a").kind(), EntryKind::Text);
        assert_eq!(Entry::Image(vec![1]).kind(), EntryKind::Image);
        assert_eq!(Entry::text("a").as_text(), Some("a"));
        assert_eq!(Entry::Image(vec![1]).as_text(), None);
    }

    #[test]
    fn test_preview_flattens_and_truncates() {
        let entry = Entry::text("  line one\nline two  ");
        assert_eq!(entry.preview(80), "line one line two");
        assert_eq!(entry.preview(4), "line…");
    }

    #[test]
    fn test_preview_of_unreadable_image() {
        assert_eq!(Entry::Image(vec![1, 2, 3]).preview(80), "[Image]");
    }
}
