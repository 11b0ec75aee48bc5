// Suggestion application: rewrite a text by splicing in issue suggestions.

use crate::issue::Issue;
use crate::offset;

/// Apply every non-empty suggestion in `issues` to `text`.
///
/// The order of `issues` does not matter. They are applied from the highest
/// `start` down so that each splice happens before any replacement to its
/// left can shift the offsets it refers to. Issues with an empty suggestion
/// are skipped.
///
/// Offsets refer to `text` only. Feeding the result back in with the same
/// issues is not meaningful, and overlapping issues with suggestions give an
/// unspecified (but non-panicking) result.
pub fn apply_all_suggestions(text: &str, issues: &[Issue]) -> String {
    let mut ordered: Vec<&Issue> = issues.iter().collect();
    ordered.sort_by(|a, b| b.start.cmp(&a.start));

    let mut result = text.to_string();
    for issue in ordered {
        if issue.has_suggestion() {
            result = splice(&result, issue.start, issue.end, &issue.suggestion);
        }
    }
    result
}

/// Apply a single issue to `text`, replacing `[start, end)` with its
/// suggestion.
///
/// Unlike [`apply_all_suggestions`], an empty suggestion is applied too and
/// deletes the span.
pub fn apply_suggestion(text: &str, issue: &Issue) -> String {
    splice(text, issue.start, issue.end, &issue.suggestion)
}

fn splice(text: &str, start: usize, end: usize, replacement: &str) -> String {
    let before = offset::slice_to(text, start);
    let after = offset::slice_from(text, end);
    let mut out = String::with_capacity(before.len() + replacement.len() + after.len());
    out.push_str(before);
    out.push_str(replacement);
    out.push_str(after);
    out
}
