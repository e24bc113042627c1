use std::io::Read;

use serde::Deserialize;

use crate::Result;

/// A raw word record as produced by the transcription backend.
///
/// Every field is optional: real payloads routinely omit timing for filler
/// words and carry either `word`, `punctuated_word`, or both. Validation and
/// repair happen in [`crate::index::TimingIndex::build`]; this type only
/// mirrors the wire shape. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawWord {
    /// Plain token text.
    #[serde(default)]
    pub word: Option<String>,

    /// Token text with punctuation and casing restored. Preferred over
    /// `word` when both are present.
    #[serde(default)]
    pub punctuated_word: Option<String>,

    /// Start time in seconds.
    #[serde(default)]
    pub start: Option<f64>,

    /// End time in seconds.
    #[serde(default)]
    pub end: Option<f64>,
}

impl RawWord {
    /// The display text for this record, or `None` when the record carries no
    /// usable text and should be dropped.
    pub(crate) fn display_text(&self) -> Option<&str> {
        usable(&self.punctuated_word).or_else(|| usable(&self.word))
    }
}

fn usable(text: &Option<String>) -> Option<&str> {
    text.as_deref().map(str::trim).filter(|t| !t.is_empty())
}

/// Parse a raw word-timing payload (a JSON array of word records).
///
/// We accept a generic `Read` rather than a filename so callers can pass a
/// `File`, stdin, an HTTP body, or an in-memory buffer.
pub fn parse_raw_words<R: Read>(r: R) -> Result<Vec<RawWord>> {
    let words = serde_json::from_reader(r)?;
    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_punctuated_word() {
        let raw = RawWord {
            word: Some("hello".to_string()),
            punctuated_word: Some("Hello,".to_string()),
            ..Default::default()
        };
        assert_eq!(raw.display_text(), Some("Hello,"));
    }

    #[test]
    fn falls_back_to_plain_word() {
        let raw = RawWord {
            word: Some("hello".to_string()),
            punctuated_word: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(raw.display_text(), Some("hello"));
    }

    #[test]
    fn no_usable_text_yields_none() {
        let raw = RawWord::default();
        assert_eq!(raw.display_text(), None);
    }

    #[test]
    fn parses_payload_with_missing_fields() -> anyhow::Result<()> {
        let payload = r#"[
            {"word": "go", "punctuated_word": "Go", "start": 0.0, "end": 0.3},
            {"word": "to", "start": 0.3},
            {"punctuated_word": "sleep.", "end": 1.0, "confidence": 0.98}
        ]"#;
        let words = parse_raw_words(payload.as_bytes())?;
        assert_eq!(words.len(), 3);
        assert_eq!(words[0].display_text(), Some("Go"));
        assert_eq!(words[1].end, None);
        assert_eq!(words[2].start, None);
        Ok(())
    }

    #[test]
    fn rejects_non_array_payload() {
        let err = parse_raw_words(r#"{"words": []}"#.as_bytes());
        assert!(err.is_err());
    }
}
