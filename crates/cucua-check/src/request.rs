// Analyze request contract.

use serde::{Deserialize, Serialize};

use crate::error::CheckError;

/// Body of `POST /api/analyze`.
///
/// Both fields are optional at parse time so that a missing field is
/// reported as `MissingInput` rather than as malformed JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

impl AnalyzeRequest {
    pub fn new(text: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            language: Some(language.into()),
        }
    }

    /// Return `(text, language)`, or `MissingInput` if either is absent or
    /// empty.
    pub fn validate(&self) -> Result<(&str, &str), CheckError> {
        match (self.text.as_deref(), self.language.as_deref()) {
            (Some(text), Some(language)) if !text.is_empty() && !language.is_empty() => {
                Ok((text, language))
            }
            _ => Err(CheckError::MissingInput),
        }
    }
}
