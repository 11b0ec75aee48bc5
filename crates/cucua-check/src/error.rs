// Error type for the grammar service boundary.

use serde::Serialize;

/// Everything that can go wrong between receiving an analyze request and
/// returning issues.
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    /// `text` or `language` was absent or empty. No upstream call was made.
    #[error("Missing text or language")]
    MissingInput,

    /// The upstream service answered with a non-success status.
    #[error("{service} API failed")]
    Upstream {
        service: &'static str,
        status: u16,
        body: String,
    },

    /// The upstream service could not be reached or the connection failed.
    #[error("request to grammar service failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// A request or upstream payload was not the JSON we expected.
    #[error("invalid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    /// Missing or invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl CheckError {
    /// HTTP status for this error: 400 for caller mistakes, 500 otherwise.
    pub fn status_code(&self) -> u16 {
        match self {
            CheckError::MissingInput => 400,
            _ => 500,
        }
    }

    /// Whether the caller, rather than the service, is at fault.
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }

    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            error: self.to_string(),
        }
    }
}

/// JSON body of an error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, serde::Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_input_is_client_error() {
        let err = CheckError::MissingInput;
        assert_eq!(err.status_code(), 400);
        assert!(err.is_client_error());
        assert_eq!(err.to_body().error, "Missing text or language");
    }

    #[test]
    fn upstream_failure_hides_body() {
        let err = CheckError::Upstream {
            service: "LanguageTool",
            status: 503,
            body: "<html>overloaded</html>".to_string(),
        };
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.to_string(), "LanguageTool API failed");
    }

    #[test]
    fn decode_error_is_server_error() {
        let err: CheckError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert_eq!(err.status_code(), 500);
        assert!(err.to_string().starts_with("invalid JSON"));
    }

    #[test]
    fn error_body_serializes() {
        let json = serde_json::to_string(&CheckError::MissingInput.to_body()).unwrap();
        assert_eq!(json, r#"{"error":"Missing text or language"}"#);
    }
}
