// LanguageTool client: forwards text to `/v2/check` and maps the returned
// matches onto `Issue`s.

use serde::Deserialize;
use tracing::{debug, warn};

use cucua_core::issue::{DEFAULT_ISSUE_LEVEL, DEFAULT_ISSUE_TYPE, Issue, Severity};
use cucua_core::segment::sort_issues;

use crate::config::Config;
use crate::error::CheckError;
use crate::{CheckReport, GrammarService};

const SERVICE_NAME: &str = "LanguageTool";

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// Response of `POST /v2/check`. Only the fields we map are declared.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckResponse {
    #[serde(default)]
    pub language: Option<ResponseLanguage>,
    #[serde(default)]
    pub matches: Vec<Match>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseLanguage {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub detected_language: Option<DetectedLanguage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DetectedLanguage {
    #[serde(default)]
    pub code: Option<String>,
}

/// A single problem reported by LanguageTool.
///
/// `offset` and `length` are UTF-16 code units.
#[derive(Debug, Clone, Deserialize)]
pub struct Match {
    #[serde(default)]
    pub message: String,
    pub offset: usize,
    pub length: usize,
    #[serde(default)]
    pub replacements: Vec<Replacement>,
    #[serde(default)]
    pub rule: Option<Rule>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Replacement {
    pub value: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub issue_type: Option<String>,
    #[serde(default)]
    pub category: Option<Category>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Category {
    #[serde(default)]
    pub id: Option<String>,
}

// ---------------------------------------------------------------------------
// Mapping
// ---------------------------------------------------------------------------

/// LanguageTool is more accurate with a regional variant for English.
pub fn upstream_language(language: &str) -> &str {
    if language == "en" { "en-US" } else { language }
}

/// Convert one LanguageTool match into an `Issue`.
pub fn map_match(m: &Match) -> Issue {
    let rule = m.rule.as_ref();
    let kind = rule
        .and_then(|r| r.category.as_ref())
        .and_then(|c| c.id.clone())
        .unwrap_or_else(|| DEFAULT_ISSUE_TYPE.to_string());
    let level = rule
        .and_then(|r| r.issue_type.as_deref())
        .unwrap_or(DEFAULT_ISSUE_LEVEL);

    Issue {
        start: m.offset,
        end: m.offset.saturating_add(m.length),
        kind,
        message: m.message.clone(),
        suggestion: m
            .replacements
            .first()
            .map(|r| r.value.clone())
            .unwrap_or_default(),
        severity: Severity::from_issue_type(level),
    }
}

/// Convert a whole response, sorted ascending by `start`.
pub fn map_response(response: &CheckResponse) -> CheckReport {
    let mut issues: Vec<Issue> = response.matches.iter().map(map_match).collect();
    sort_issues(&mut issues);

    let detected_language = response
        .language
        .as_ref()
        .and_then(|l| l.detected_language.as_ref())
        .and_then(|d| d.code.clone());

    CheckReport {
        issues,
        detected_language,
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Blocking client for a LanguageTool server.
pub struct LanguageToolClient {
    client: reqwest::blocking::Client,
    check_url: String,
}

impl LanguageToolClient {
    /// Create a client for the server at `base_url` (e.g.
    /// `https://api.languagetool.org`).
    pub fn new(client: reqwest::blocking::Client, base_url: &str) -> Self {
        Self {
            client,
            check_url: format!("{}/v2/check", base_url.trim_end_matches('/')),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, CheckError> {
        Ok(Self::new(config.http_client()?, &config.languagetool_url))
    }

    pub fn check_url(&self) -> &str {
        &self.check_url
    }
}

impl GrammarService for LanguageToolClient {
    fn check(&self, text: &str, language: &str) -> Result<CheckReport, CheckError> {
        let language = upstream_language(language);
        debug!(url = %self.check_url, language, chars = text.len(), "calling LanguageTool");

        let response = self
            .client
            .post(&self.check_url)
            .form(&[("text", text), ("language", language)])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            warn!(status = status.as_u16(), %body, "LanguageTool API error");
            return Err(CheckError::Upstream {
                service: SERVICE_NAME,
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text()?;
        let parsed: CheckResponse = serde_json::from_str(&body)?;
        let report = map_response(&parsed);
        debug!(issues = report.issues.len(), "LanguageTool answered");
        Ok(report)
    }
}
