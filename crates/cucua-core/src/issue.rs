// Issue public API type
//
// An `Issue` is produced by the external grammar service for one analysis
// call. Its offsets only make sense against the exact text that was analyzed.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Default category and upstream severity labels
// ---------------------------------------------------------------------------

/// Category used when the grammar service does not report one.
pub const DEFAULT_ISSUE_TYPE: &str = "grammar";

/// Upstream severity label used when the grammar service does not report one.
pub const DEFAULT_ISSUE_LEVEL: &str = "minor";

/// How serious an issue is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    /// Map an upstream issue-type label (LanguageTool's `rule.issueType`) to
    /// a severity.
    ///
    /// Spelling and grammar mistakes are `High`. Stylistic, typographic and
    /// uncategorized findings are `Low`. Anything unrecognized is `Medium`.
    pub fn from_issue_type(label: &str) -> Self {
        match label.to_ascii_lowercase().as_str() {
            "misspelling" | "grammar" | "high" => Severity::High,
            "style" | "locale-violation" | "register" | "whitespace" | "typographical"
            | "uncategorized" | "minor" | "low" => Severity::Low,
            _ => Severity::Medium,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single issue detected in the user's text.
///
/// `start` and `end` are zero-based UTF-16 code-unit offsets into the
/// original text, `end` exclusive. `start == end` marks an insertion point.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Issue {
    pub start: usize,
    pub end: usize,

    /// Free-form category tag, e.g. `TYPOS` or `GRAMMAR`.
    #[serde(rename = "type")]
    pub kind: String,

    /// Human-readable explanation.
    pub message: String,

    /// Literal replacement for `[start, end)`. Empty means no fix is available.
    pub suggestion: String,

    pub severity: Severity,
}

impl Issue {
    /// Create an issue with the default category, no message and no suggestion.
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            kind: DEFAULT_ISSUE_TYPE.to_string(),
            message: String::new(),
            suggestion: String::new(),
            severity: Severity::Medium,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = suggestion.into();
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Length of the span in UTF-16 code units (0 for insertions and
    /// reversed spans).
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether applying this issue would change the text.
    pub fn has_suggestion(&self) -> bool {
        !self.suggestion.is_empty()
    }
}
