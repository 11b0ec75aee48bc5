// Analysis payload: the issues found in one text plus request metadata.

use serde::{Deserialize, Serialize};

use crate::issue::Issue;
use crate::offset;

/// Metadata describing the analyzed text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisMeta {
    /// Language the caller asked for.
    pub language: String,

    /// Length of the analyzed text in UTF-16 code units.
    pub char_count: usize,

    /// Language detected by the grammar service, if it reported one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detected_language: Option<String>,
}

/// The full analysis returned for a text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analysis {
    pub issues: Vec<Issue>,
    pub meta: AnalysisMeta,
}

impl Analysis {
    /// Build an analysis of `text`, recording its length in `meta`.
    pub fn new(text: &str, language: impl Into<String>, issues: Vec<Issue>) -> Self {
        Self {
            issues,
            meta: AnalysisMeta {
                language: language.into(),
                char_count: offset::utf16_len(text),
                detected_language: None,
            },
        }
    }

    pub fn with_detected_language(mut self, language: Option<String>) -> Self {
        self.meta.detected_language = language;
        self
    }

    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }

    /// Whether `text` has the length this analysis was computed for.
    ///
    /// A mismatch proves the text changed. A match does not prove it didn't;
    /// `Document` tracks revisions for that.
    pub fn matches_len(&self, text: &str) -> bool {
        self.meta.char_count == offset::utf16_len(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_counts_utf16_units() {
        let analysis = Analysis::new("a😀", "en", Vec::new());
        assert_eq!(analysis.meta.char_count, 3);
        assert_eq!(analysis.meta.language, "en");
        assert!(!analysis.has_issues());
    }

    #[test]
    fn serializes_camel_case_meta() {
        let analysis = Analysis::new("I has", "en", vec![Issue::new(2, 5)])
            .with_detected_language(Some("en-US".to_string()));
        let json = serde_json::to_value(&analysis).unwrap();
        assert_eq!(json["meta"]["charCount"], 5);
        assert_eq!(json["meta"]["detectedLanguage"], "en-US");
        assert_eq!(json["issues"][0]["end"], 5);
    }

    #[test]
    fn detected_language_omitted_when_absent() {
        let json = serde_json::to_value(Analysis::new("x", "fr", Vec::new())).unwrap();
        assert!(json["meta"].get("detectedLanguage").is_none());
    }

    #[test]
    fn deserializes_without_detected_language() {
        let analysis: Analysis = serde_json::from_str(
            r#"{"issues":[],"meta":{"language":"de","charCount":4}}"#,
        )
        .unwrap();
        assert_eq!(analysis.meta.detected_language, None);
        assert!(analysis.matches_len("abcd"));
        assert!(!analysis.matches_len("abc"));
    }
}
