// cucua-check: boundary between callers and the external grammar service.
//
// Validates analyze requests, forwards them to a `GrammarService`
// (LanguageTool by default) and shapes the result into an `Analysis`.
// The whole analysis either succeeds with every issue or fails with none.

pub mod config;
pub mod correct;
pub mod error;
pub mod languagetool;
pub mod request;
pub mod server;

use tracing::debug;

use cucua_core::analysis::Analysis;
use cucua_core::issue::Issue;

pub use config::Config;
pub use correct::{Correction, Corrector, HuggingFaceCorrector};
pub use error::{CheckError, ErrorBody};
pub use languagetool::LanguageToolClient;
pub use request::AnalyzeRequest;

/// Issues reported by a grammar service for one text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckReport {
    /// Sorted ascending by `start`.
    pub issues: Vec<Issue>,
    pub detected_language: Option<String>,
}

/// Trait for external grammar services.
pub trait GrammarService {
    /// Check `text` written in `language`.
    ///
    /// Implementations return issues sorted ascending by `start`, with
    /// offsets in UTF-16 code units of `text`.
    fn check(&self, text: &str, language: &str) -> Result<CheckReport, CheckError>;
}

impl<S: GrammarService + ?Sized> GrammarService for &S {
    fn check(&self, text: &str, language: &str) -> Result<CheckReport, CheckError> {
        (**self).check(text, language)
    }
}

/// Validate `request`, call `service` once, and build the analysis.
///
/// `meta.language` echoes the requested language, not the variant sent
/// upstream.
pub fn analyze<S>(service: &S, request: &AnalyzeRequest) -> Result<Analysis, CheckError>
where
    S: GrammarService + ?Sized,
{
    let (text, language) = request.validate()?;
    let report = service.check(text, language)?;
    debug!(language, issues = report.issues.len(), "analysis complete");
    Ok(Analysis::new(text, language, report.issues).with_detected_language(report.detected_language))
}
