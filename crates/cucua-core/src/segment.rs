// Segment building: partition a text into plain and issue-bearing slices
// for rendering highlights.

use serde::Serialize;

use crate::issue::Issue;
use crate::offset;

/// A contiguous slice of the analyzed text, optionally annotated with the
/// issue it corresponds to.
///
/// Segments borrow both the text and the issues; they are rebuilt on every
/// render and carry no identity beyond their position in the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Segment<'a> {
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue: Option<&'a Issue>,
}

impl<'a> Segment<'a> {
    pub fn plain(text: &'a str) -> Self {
        Self { text, issue: None }
    }

    pub fn flagged(text: &'a str, issue: &'a Issue) -> Self {
        Self {
            text,
            issue: Some(issue),
        }
    }

    pub fn is_issue(&self) -> bool {
        self.issue.is_some()
    }
}

/// A span precondition that `try_build_segments` refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpanError {
    #[error("issue {index} ends before it starts ({start}..{end})")]
    Reversed {
        index: usize,
        start: usize,
        end: usize,
    },

    #[error("issue {index} ends at {end}, past the end of the text ({len})")]
    OutOfBounds { index: usize, end: usize, len: usize },

    #[error("issue {index} starts at {start}, before issue {previous} which starts at {previous_start}")]
    Unordered {
        index: usize,
        start: usize,
        previous: usize,
        previous_start: usize,
    },

    #[error("issue {index} ({start}..{end}) overlaps issue {previous} which ends at {previous_end}")]
    Overlap {
        index: usize,
        start: usize,
        end: usize,
        previous: usize,
        previous_end: usize,
    },
}

/// Split `text` into segments according to `issues`.
///
/// Issues are walked in the order given and are expected to be sorted by
/// `start` and not to overlap. Nothing is checked: out-of-order or
/// overlapping issues produce empty or duplicated slices instead of a panic.
/// Use [`try_build_segments`] to reject such input.
///
/// With well-formed issues, concatenating the segment texts yields `text`.
pub fn build_segments<'a>(text: &'a str, issues: &'a [Issue]) -> Vec<Segment<'a>> {
    if issues.is_empty() {
        return vec![Segment::plain(text)];
    }

    let mut segments = Vec::with_capacity(issues.len() * 2 + 1);
    let mut cursor = 0;

    for issue in issues {
        if cursor < issue.start {
            segments.push(Segment::plain(offset::slice(text, cursor, issue.start)));
        }
        segments.push(Segment::flagged(
            offset::slice(text, issue.start, issue.end),
            issue,
        ));
        cursor = issue.end;
    }

    if cursor < offset::utf16_len(text) {
        segments.push(Segment::plain(offset::slice_from(text, cursor)));
    }

    segments
}

/// Like [`build_segments`], but fails on reversed, out-of-bounds,
/// unordered or overlapping issues.
pub fn try_build_segments<'a>(
    text: &'a str,
    issues: &'a [Issue],
) -> Result<Vec<Segment<'a>>, SpanError> {
    validate_spans(text, issues)?;
    Ok(build_segments(text, issues))
}

/// Check that `issues` are in-bounds for `text`, sorted ascending by
/// `start`, and pairwise non-overlapping.
///
/// Insertion points (`start == end`) may touch a neighbouring span but not
/// sit strictly inside one.
pub fn validate_spans(text: &str, issues: &[Issue]) -> Result<(), SpanError> {
    let len = offset::utf16_len(text);
    let mut previous: Option<(usize, &Issue)> = None;

    for (index, issue) in issues.iter().enumerate() {
        if issue.end < issue.start {
            return Err(SpanError::Reversed {
                index,
                start: issue.start,
                end: issue.end,
            });
        }
        if issue.end > len {
            return Err(SpanError::OutOfBounds {
                index,
                end: issue.end,
                len,
            });
        }
        if let Some((prev_index, prev)) = previous {
            if issue.start < prev.start {
                return Err(SpanError::Unordered {
                    index,
                    start: issue.start,
                    previous: prev_index,
                    previous_start: prev.start,
                });
            }
            if issue.start < prev.end {
                return Err(SpanError::Overlap {
                    index,
                    start: issue.start,
                    end: issue.end,
                    previous: prev_index,
                    previous_end: prev.end,
                });
            }
        }
        previous = Some((index, issue));
    }

    Ok(())
}

/// Sort issues ascending by `start`, keeping the relative order of issues
/// that start at the same offset.
pub fn sort_issues(issues: &mut [Issue]) {
    issues.sort_by_key(|issue| issue.start);
}
