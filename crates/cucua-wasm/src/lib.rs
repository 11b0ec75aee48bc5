// WASM bindings for Cucua.
//
// Exposes segment building and suggestion application to a browser front
// end, plus a `WasmDocument` class that keeps the text and its analysis
// together so stale issue offsets are never applied. Issues and analyses
// cross the boundary as plain JS objects via serde-wasm-bindgen.
//
// Usage from JavaScript:
//
//   const doc = new WasmDocument("I has a apple.");
//   const snap = doc.snapshot();
//   const analysis = await (await fetch("/api/analyze", {...})).json();
//   doc.attach(snap, analysis);       // throws if the text changed meanwhile
//   doc.segments();                   // => [{ text: "I " }, { text: "has", issueIndex: 0, issue: {...} }, ...]
//   doc.applySuggestion(0);           // text updated, analysis dropped
//
//   applyAllSuggestions("abcdefg", issues);  // => "XbcdeYg"

use serde::Serialize;
use wasm_bindgen::prelude::*;

use cucua_core::{
    Analysis, Document, Issue, Segment, SpanError, TextSnapshot, apply_all_suggestions,
    apply_suggestion, build_segments, try_build_segments,
};

// ============================================================================
// Serde-serializable DTO types for JS interop
// ============================================================================

/// Serializable representation of a segment.
///
/// `issueIndex` is the position of the issue in the array that was passed
/// in, so the front end can call `applySuggestion(issueIndex)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
struct JsSegment {
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    issue_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    issue: Option<Issue>,
}

// ============================================================================
// Conversion helpers
// ============================================================================

fn to_js_segments(issues: &[Issue], segments: &[Segment<'_>]) -> Vec<JsSegment> {
    segments
        .iter()
        .map(|s| JsSegment {
            text: s.text.to_string(),
            issue_index: s
                .issue
                .and_then(|issue| issues.iter().position(|i| std::ptr::eq(i, issue))),
            issue: s.issue.cloned(),
        })
        .collect()
}

fn issues_from_js(issues: JsValue) -> Result<Vec<Issue>, JsError> {
    serde_wasm_bindgen::from_value(issues).map_err(|e| JsError::new(&format!("invalid issues: {e}")))
}

fn span_error_to_js(e: SpanError) -> JsError {
    JsError::new(&e.to_string())
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsError> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsError::new(&e.to_string()))
}

// ============================================================================
// Free functions
// ============================================================================

/// Split `text` into plain and issue segments.
///
/// Issues must be sorted by `start` and must not overlap; malformed input
/// gives malformed segments rather than an exception.
#[wasm_bindgen(js_name = "buildSegments")]
pub fn build_segments_js(text: &str, issues: JsValue) -> Result<JsValue, JsError> {
    let issues = issues_from_js(issues)?;
    let segments = build_segments(text, &issues);
    to_js(&to_js_segments(&issues, &segments))
}

/// Like `buildSegments`, but throws on unordered or overlapping issues.
#[wasm_bindgen(js_name = "tryBuildSegments")]
pub fn try_build_segments_js(text: &str, issues: JsValue) -> Result<JsValue, JsError> {
    let issues = issues_from_js(issues)?;
    let segments = try_build_segments(text, &issues).map_err(span_error_to_js)?;
    to_js(&to_js_segments(&issues, &segments))
}

/// Apply every non-empty suggestion, in any input order.
#[wasm_bindgen(js_name = "applyAllSuggestions")]
pub fn apply_all_suggestions_js(text: &str, issues: JsValue) -> Result<String, JsError> {
    let issues = issues_from_js(issues)?;
    Ok(apply_all_suggestions(text, &issues))
}

/// Apply a single issue's suggestion.
#[wasm_bindgen(js_name = "applySuggestion")]
pub fn apply_suggestion_js(text: &str, issue: JsValue) -> Result<String, JsError> {
    let issue: Issue = serde_wasm_bindgen::from_value(issue)
        .map_err(|e| JsError::new(&format!("invalid issue: {e}")))?;
    Ok(apply_suggestion(text, &issue))
}

// ============================================================================
// WasmSnapshot / WasmDocument
// ============================================================================

/// The text sent for analysis, tagged with the document revision it came
/// from. Consumed by `WasmDocument.attach`.
#[wasm_bindgen]
pub struct WasmSnapshot {
    inner: TextSnapshot,
}

#[wasm_bindgen]
impl WasmSnapshot {
    /// The text to send to `/api/analyze`.
    #[wasm_bindgen(getter)]
    pub fn text(&self) -> String {
        self.inner.text().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn revision(&self) -> u64 {
        self.inner.revision().get()
    }
}

/// Editor state: the current text and, when available, its analysis.
#[wasm_bindgen]
pub struct WasmDocument {
    inner: Document,
}

#[wasm_bindgen]
impl WasmDocument {
    #[wasm_bindgen(constructor)]
    pub fn new(text: &str) -> WasmDocument {
        WasmDocument {
            inner: Document::new(text),
        }
    }

    #[wasm_bindgen(getter)]
    pub fn text(&self) -> String {
        self.inner.text().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn revision(&self) -> u64 {
        self.inner.revision().get()
    }

    /// Replace the text; drops the analysis.
    #[wasm_bindgen(js_name = "setText")]
    pub fn set_text(&mut self, text: &str) {
        self.inner.set_text(text);
    }

    pub fn snapshot(&self) -> WasmSnapshot {
        WasmSnapshot {
            inner: self.inner.snapshot(),
        }
    }

    /// Attach the analysis returned for `snapshot`. Throws if the document
    /// was edited since the snapshot was taken or the snapshot belongs to
    /// another document.
    pub fn attach(&mut self, snapshot: WasmSnapshot, analysis: JsValue) -> Result<(), JsError> {
        let analysis: Analysis = serde_wasm_bindgen::from_value(analysis)
            .map_err(|e| JsError::new(&format!("invalid analysis: {e}")))?;
        let checked = snapshot
            .inner
            .check(analysis)
            .map_err(|e| JsError::new(&e.to_string()))?;
        self.inner
            .attach(checked)
            .map_err(|e| JsError::new(&e.to_string()))
    }

    /// The attached analysis, or `null`.
    pub fn analysis(&self) -> Result<JsValue, JsError> {
        match self.inner.analysis() {
            Some(analysis) => to_js(analysis),
            None => Ok(JsValue::NULL),
        }
    }

    /// Segments for rendering the current text.
    pub fn segments(&self) -> Result<JsValue, JsError> {
        let issues = self.inner.analysis().map(|a| a.issues.as_slice()).unwrap_or(&[]);
        to_js(&to_js_segments(issues, &self.inner.segments()))
    }

    /// Apply issue `index` and drop the analysis.
    #[wasm_bindgen(js_name = "applySuggestion")]
    pub fn apply_suggestion(&mut self, index: usize) -> Result<(), JsError> {
        self.inner
            .apply_suggestion(index)
            .map_err(|e| JsError::new(&e.to_string()))
    }

    /// Apply every suggestion. Returns false when there was nothing to apply.
    #[wasm_bindgen(js_name = "applyAll")]
    pub fn apply_all(&mut self) -> bool {
        self.inner.apply_all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn js_segments_carry_issue_index() {
        let issues = vec![Issue::new(0, 1), Issue::new(5, 6)];
        let segments = build_segments("abcdefg", &issues);
        let js = to_js_segments(&issues, &segments);
        let indices: Vec<Option<usize>> = js.iter().map(|s| s.issue_index).collect();
        assert_eq!(indices, vec![Some(0), None, Some(1), None]);
        assert_eq!(js[2].issue.as_ref().map(|i| i.start), Some(5));
    }

    #[test]
    fn identical_issues_get_distinct_indices() {
        let issues = vec![Issue::new(1, 1), Issue::new(1, 1)];
        let segments = build_segments("ab", &issues);
        let js = to_js_segments(&issues, &segments);
        let indices: Vec<Option<usize>> = js.iter().map(|s| s.issue_index).collect();
        assert_eq!(indices, vec![None, Some(0), Some(1), None]);
    }

    #[test]
    fn document_segments_without_analysis() {
        let doc = WasmDocument::new("plain");
        let js = to_js_segments(&[], &doc.inner.segments());
        assert_eq!(
            js,
            vec![JsSegment {
                text: "plain".to_string(),
                issue_index: None,
                issue: None,
            }]
        );
    }
}
