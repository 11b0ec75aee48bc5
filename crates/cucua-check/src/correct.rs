// Whole-text correction through a hosted text-to-text model.
//
// The hosted inference API is unreliable: under load it answers with HTML or
// an error object instead of the expected JSON array. Those answers become
// `Correction::Unavailable` so the caller keeps the original text.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use cucua_core::offset;

use crate::config::Config;
use crate::error::CheckError;

/// Longest prefix, in UTF-16 code units, sent to the model.
pub const MAX_CORRECTION_CHARS: usize = 300;

/// Outcome of a correction request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Correction {
    /// The model proposed a different text.
    Corrected(String),
    /// The model returned the text unchanged.
    Unchanged,
    /// No usable answer; the original text should be kept.
    Unavailable { reason: String },
}

impl Correction {
    /// The text to show: the correction if there is one, else `original`.
    pub fn text_or<'a>(&'a self, original: &'a str) -> &'a str {
        match self {
            Correction::Corrected(text) => text,
            Correction::Unchanged | Correction::Unavailable { .. } => original,
        }
    }

    pub fn status(&self) -> &'static str {
        match self {
            Correction::Corrected(_) => "corrected",
            Correction::Unchanged => "unchanged",
            Correction::Unavailable { .. } => "unavailable",
        }
    }
}

/// Anything that can propose a corrected version of a whole text.
pub trait Corrector {
    fn correct(&self, text: &str) -> Result<Correction, CheckError>;
}

#[derive(Debug, Deserialize)]
struct Generated {
    #[serde(default)]
    generated_text: Option<String>,
}

/// JSON body of a correction response from `cucua-serve`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrectionBody {
    pub text: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl CorrectionBody {
    pub fn new(original: &str, correction: &Correction) -> Self {
        Self {
            text: correction.text_or(original).to_string(),
            status: correction.status().to_string(),
            reason: match correction {
                Correction::Unavailable { reason } => Some(reason.clone()),
                _ => None,
            },
        }
    }
}

/// Interpret a raw model response for `original`, of which only
/// `sent` was submitted.
///
/// The untouched tail beyond `sent` is re-attached to the correction.
pub fn parse_correction(original: &str, sent: &str, body: &str) -> Correction {
    if !body.trim_start().starts_with('[') {
        return Correction::Unavailable {
            reason: "model returned a non-JSON response".to_string(),
        };
    }

    let generated: Vec<Generated> = match serde_json::from_str(body) {
        Ok(generated) => generated,
        Err(e) => {
            return Correction::Unavailable {
                reason: format!("model returned malformed JSON: {e}"),
            };
        }
    };

    let Some(corrected) = generated.into_iter().next().and_then(|g| g.generated_text) else {
        return Correction::Unavailable {
            reason: "model response has no generated_text".to_string(),
        };
    };

    let mut full = corrected;
    full.push_str(original.get(sent.len()..).unwrap_or_default());
    if full == original {
        Correction::Unchanged
    } else {
        Correction::Corrected(full)
    }
}

/// Corrector backed by the Hugging Face inference API.
pub struct HuggingFaceCorrector {
    client: reqwest::blocking::Client,
    model_url: String,
    api_key: String,
}

impl HuggingFaceCorrector {
    pub fn new(
        client: reqwest::blocking::Client,
        model_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            model_url: model_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Fails when no API key is configured.
    pub fn from_config(config: &Config) -> Result<Self, CheckError> {
        let api_key = config.hf_api_key.clone().ok_or_else(|| {
            CheckError::Config("missing Hugging Face API key (set CUCUA_HF_API_KEY)".to_string())
        })?;
        Ok(Self::new(config.http_client()?, &config.hf_model_url, api_key))
    }
}

impl Corrector for HuggingFaceCorrector {
    fn correct(&self, text: &str) -> Result<Correction, CheckError> {
        let sent = offset::slice_to(text, MAX_CORRECTION_CHARS);
        debug!(url = %self.model_url, chars = sent.len(), "calling correction model");

        let response = self
            .client
            .post(&self.model_url)
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({ "inputs": sent }))
            .send()?;
        let body = response.text()?;

        let correction = parse_correction(text, sent, &body);
        if let Correction::Unavailable { reason } = &correction {
            warn!(%reason, "correction unavailable, keeping original text");
        }
        Ok(correction)
    }
}
