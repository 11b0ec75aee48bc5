// Document: editor state that ties an analysis to the exact text it was
// computed against.
//
// Every edit produces a new revision and drops the attached analysis. An
// analysis can only be attached through a `TextSnapshot` of the current
// revision, so issue offsets are never applied to text they were not
// computed for.

use std::fmt;

use crate::analysis::Analysis;
use crate::apply;
use crate::issue::Issue;
use crate::segment::{self, Segment, SpanError};

/// Monotonically increasing edit counter of a `Document`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Revision(u64);

impl Revision {
    pub fn get(self) -> u64 {
        self.0
    }

    fn next(self) -> Self {
        Revision(self.0 + 1)
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

/// Error type for document operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentError {
    /// The analysis was computed for an older revision of the text.
    #[error("analysis is for revision {analyzed}, but the document is at {current}")]
    StaleAnalysis { analyzed: Revision, current: Revision },

    /// The analysis reports a different text length than the snapshot.
    #[error("analysis covers {expected} code units, but the text has {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// The analysis was computed for a different text, e.g. a snapshot of
    /// another document.
    #[error("analysis was computed for a different text")]
    TextMismatch,

    /// No analysis is attached to the document.
    #[error("document has no analysis")]
    NoAnalysis,

    /// The issue index is out of range.
    #[error("no issue at index {index} (analysis has {count})")]
    UnknownIssue { index: usize, count: usize },
}

/// A copy of a document's text, tagged with the revision it was taken at.
///
/// This is what gets sent for analysis; the result comes back through
/// [`TextSnapshot::check`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSnapshot {
    text: String,
    revision: Revision,
}

impl TextSnapshot {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn revision(&self) -> Revision {
        self.revision
    }

    /// Bind `analysis` to this snapshot.
    pub fn check(self, analysis: Analysis) -> Result<CheckedText, DocumentError> {
        if !analysis.matches_len(&self.text) {
            return Err(DocumentError::LengthMismatch {
                expected: analysis.meta.char_count,
                actual: crate::offset::utf16_len(&self.text),
            });
        }
        Ok(CheckedText {
            snapshot: self,
            analysis,
        })
    }
}

/// A text together with the analysis computed for exactly that text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckedText {
    snapshot: TextSnapshot,
    analysis: Analysis,
}

impl CheckedText {
    pub fn text(&self) -> &str {
        &self.snapshot.text
    }

    pub fn revision(&self) -> Revision {
        self.snapshot.revision
    }

    pub fn analysis(&self) -> &Analysis {
        &self.analysis
    }

    pub fn issues(&self) -> &[Issue] {
        &self.analysis.issues
    }

    /// Segments for rendering. See [`segment::build_segments`].
    pub fn segments(&self) -> Vec<Segment<'_>> {
        segment::build_segments(self.text(), self.issues())
    }

    /// Segments for rendering, rejecting malformed issue spans.
    pub fn try_segments(&self) -> Result<Vec<Segment<'_>>, SpanError> {
        segment::try_build_segments(self.text(), self.issues())
    }

    /// The text with every available suggestion applied.
    pub fn apply_all(&self) -> String {
        apply::apply_all_suggestions(self.text(), self.issues())
    }

    /// The text with the suggestion of issue `index` applied.
    pub fn apply(&self, index: usize) -> Result<String, DocumentError> {
        let issue = self
            .issues()
            .get(index)
            .ok_or(DocumentError::UnknownIssue {
                index,
                count: self.issues().len(),
            })?;
        Ok(apply::apply_suggestion(self.text(), issue))
    }
}

/// The text being edited plus the analysis of its current revision, if any.
#[derive(Debug, Clone, Default)]
pub struct Document {
    text: String,
    revision: Revision,
    checked: Option<CheckedText>,
}

impl Document {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            revision: Revision::default(),
            checked: None,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn revision(&self) -> Revision {
        self.revision
    }

    pub fn analysis(&self) -> Option<&Analysis> {
        self.checked.as_ref().map(CheckedText::analysis)
    }

    pub fn checked(&self) -> Option<&CheckedText> {
        self.checked.as_ref()
    }

    /// Snapshot the current text for an analysis request.
    pub fn snapshot(&self) -> TextSnapshot {
        TextSnapshot {
            text: self.text.clone(),
            revision: self.revision,
        }
    }

    /// Replace the text. Always starts a new revision and drops the analysis.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.revision = self.revision.next();
        self.checked = None;
    }

    /// Attach an analysis result. Fails if the document changed since the
    /// snapshot was taken, or if the snapshot came from another text.
    pub fn attach(&mut self, checked: CheckedText) -> Result<(), DocumentError> {
        if checked.revision() != self.revision {
            return Err(DocumentError::StaleAnalysis {
                analyzed: checked.revision(),
                current: self.revision,
            });
        }
        if checked.text() != self.text {
            return Err(DocumentError::TextMismatch);
        }
        self.checked = Some(checked);
        Ok(())
    }

    /// Segments of the current text; a single plain segment when no analysis
    /// is attached.
    pub fn segments(&self) -> Vec<Segment<'_>> {
        match &self.checked {
            Some(checked) => checked.segments(),
            None => vec![Segment::plain(&self.text)],
        }
    }

    /// Apply the suggestion of issue `index` and start a new revision.
    pub fn apply_suggestion(&mut self, index: usize) -> Result<(), DocumentError> {
        let checked = self.checked.as_ref().ok_or(DocumentError::NoAnalysis)?;
        let text = checked.apply(index)?;
        self.set_text(text);
        Ok(())
    }

    /// Apply every available suggestion and start a new revision.
    ///
    /// Returns `false` and leaves the document untouched when there is no
    /// analysis or it found no issues.
    pub fn apply_all(&mut self) -> bool {
        let text = match &self.checked {
            Some(checked) if checked.analysis().has_issues() => checked.apply_all(),
            _ => return false,
        };
        self.set_text(text);
        true
    }
}
