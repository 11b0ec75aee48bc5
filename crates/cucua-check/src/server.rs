// HTTP front end for the analyze and correct endpoints.
//
// Requests are handled one at a time on the calling thread, so there is
// never more than one upstream call in flight. Every failure becomes a JSON
// error response; nothing here panics on bad input.

use std::io::{self, Read};

use serde::{Deserialize, Serialize};
use tiny_http::{Header, Request, Response, Server};
use tracing::{error, info, warn};

use crate::correct::{CorrectionBody, Corrector};
use crate::error::{CheckError, ErrorBody};
use crate::request::AnalyzeRequest;
use crate::{GrammarService, analyze};

pub const ANALYZE_PATH: &str = "/api/analyze";
pub const CORRECT_PATH: &str = "/api/correct";
pub const HEALTH_PATH: &str = "/health";

/// Largest request body accepted, in bytes. Larger bodies get a 413.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// A response ready to be written: status code plus JSON body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn json<T: Serialize>(status: u16, value: &T) -> Self {
        match serde_json::to_string(value) {
            Ok(body) => Self { status, body },
            Err(e) => Self::error(500, &e.to_string()),
        }
    }

    pub fn error(status: u16, message: &str) -> Self {
        let body = serde_json::json!({ "error": message }).to_string();
        Self { status, body }
    }

    fn from_check_error(err: &CheckError) -> Self {
        if err.is_client_error() {
            warn!(error = %err, "rejected request");
        } else {
            error!(error = ?err, "request failed");
        }
        Self::json(err.status_code(), &err.to_body())
    }
}

#[derive(Debug, Deserialize)]
struct CorrectRequest {
    #[serde(default)]
    text: Option<String>,
}

/// Routes requests to the grammar service and the optional corrector.
pub struct Router {
    service: Box<dyn GrammarService + Send>,
    corrector: Option<Box<dyn Corrector + Send>>,
    max_body_bytes: usize,
}

/// Read at most `limit` bytes from `reader`. `Ok(None)` when the body is
/// longer than that.
fn read_limited<R: Read>(reader: R, limit: usize) -> io::Result<Option<Vec<u8>>> {
    let mut body = Vec::new();
    reader.take((limit as u64).saturating_add(1)).read_to_end(&mut body)?;
    if body.len() > limit {
        return Ok(None);
    }
    Ok(Some(body))
}

impl Router {
    pub fn new(service: impl GrammarService + Send + 'static) -> Self {
        Self {
            service: Box::new(service),
            corrector: None,
            max_body_bytes: MAX_BODY_BYTES,
        }
    }

    pub fn with_max_body_bytes(mut self, limit: usize) -> Self {
        self.max_body_bytes = limit;
        self
    }

    pub fn with_corrector(mut self, corrector: impl Corrector + Send + 'static) -> Self {
        self.corrector = Some(Box::new(corrector));
        self
    }

    /// Handle one request. `path` may carry a query string; it is ignored.
    pub fn handle(&self, method: &str, path: &str, body: &[u8]) -> ApiResponse {
        let path = path.split('?').next().unwrap_or(path);
        match (method, path) {
            ("POST", ANALYZE_PATH) => self.analyze(body),
            ("POST", CORRECT_PATH) => self.correct(body),
            ("GET", HEALTH_PATH) => ApiResponse::json(200, &serde_json::json!({ "status": "ok" })),
            (_, ANALYZE_PATH | CORRECT_PATH | HEALTH_PATH) => {
                ApiResponse::error(405, "Method not allowed")
            }
            _ => ApiResponse::error(404, "Not found"),
        }
    }

    fn analyze(&self, body: &[u8]) -> ApiResponse {
        let result = serde_json::from_slice::<AnalyzeRequest>(body)
            .map_err(CheckError::from)
            .and_then(|request| analyze(self.service.as_ref(), &request));
        match result {
            Ok(analysis) => ApiResponse::json(200, &analysis),
            Err(err) => ApiResponse::from_check_error(&err),
        }
    }

    fn correct(&self, body: &[u8]) -> ApiResponse {
        let Some(corrector) = &self.corrector else {
            return ApiResponse::json(
                500,
                &ErrorBody {
                    error: "correction is not configured".to_string(),
                },
            );
        };
        let request: CorrectRequest = match serde_json::from_slice(body) {
            Ok(request) => request,
            Err(e) => return ApiResponse::from_check_error(&CheckError::from(e)),
        };
        let text = match request.text {
            Some(text) if !text.is_empty() => text,
            _ => return ApiResponse::error(400, "Missing text"),
        };
        match corrector.correct(&text) {
            Ok(correction) => ApiResponse::json(200, &CorrectionBody::new(&text, &correction)),
            Err(err) => ApiResponse::from_check_error(&err),
        }
    }

    /// Read, handle and answer one `tiny_http` request.
    pub fn respond(&self, mut request: Request) {
        let method = request.method().as_str().to_string();
        let path = request.url().to_string();

        let too_large = request
            .body_length()
            .is_some_and(|len| len > self.max_body_bytes);
        let response = if too_large {
            ApiResponse::error(413, "Request body too large")
        } else {
            match read_limited(request.as_reader(), self.max_body_bytes) {
                Ok(Some(body)) => self.handle(&method, &path, &body),
                Ok(None) => ApiResponse::error(413, "Request body too large"),
                Err(e) => ApiResponse::error(500, &format!("failed to read request body: {e}")),
            }
        };
        info!(%method, %path, status = response.status, "handled request");

        let mut reply = Response::from_string(response.body).with_status_code(response.status);
        if let Ok(header) = Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]) {
            reply = reply.with_header(header);
        }
        if let Err(e) = request.respond(reply) {
            warn!(error = %e, "failed to write response");
        }
    }

    /// Serve requests from `server` until it shuts down.
    pub fn serve(&self, server: &Server) {
        for request in server.incoming_requests() {
            self.respond(request);
        }
    }
}
