//! Integration tests against a local HTTP server standing in for the
//! LanguageTool and Hugging Face APIs.

use std::io::Read;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use pretty_assertions::assert_eq;
use tiny_http::{Response, Server};

use cucua_check::server::Router;
use cucua_check::{
    AnalyzeRequest, CheckError, Correction, Corrector, GrammarService, HuggingFaceCorrector,
    LanguageToolClient, analyze,
};
use cucua_core::{Severity, apply_all_suggestions, build_segments};

const CHECK_FIXTURE: &str = include_str!("fixtures/languagetool_check.json");

// ---------------------------------------------------------------------------
// Mock upstream
// ---------------------------------------------------------------------------

/// A request as seen by the mock upstream.
struct Captured {
    method: String,
    url: String,
    body: String,
    headers: Vec<(String, String)>,
}

impl Captured {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Start a server that answers the given `(status, body)` pairs in order,
/// then stops. Returns its base URL and a channel of captured requests.
fn mock_upstream(responses: Vec<(u16, &'static str)>) -> (String, mpsc::Receiver<Captured>) {
    let server = Server::http("127.0.0.1:0").expect("bind mock server");
    let port = server
        .server_addr()
        .to_ip()
        .expect("mock server has an IP address")
        .port();
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        for (status, body) in responses {
            let Ok(mut request) = server.recv() else {
                return;
            };
            let mut content = String::new();
            let _ = request.as_reader().read_to_string(&mut content);
            let captured = Captured {
                method: request.method().to_string(),
                url: request.url().to_string(),
                body: content,
                headers: request
                    .headers()
                    .iter()
                    .map(|h| (h.field.to_string(), h.value.to_string()))
                    .collect(),
            };
            let _ = tx.send(captured);
            let _ = request.respond(Response::from_string(body).with_status_code(status));
        }
    });

    (format!("http://127.0.0.1:{port}"), rx)
}

fn client() -> reqwest::blocking::Client {
    reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .expect("build HTTP client")
}

// ===========================================================================
// LanguageTool
// ===========================================================================

#[test]
fn languagetool_request_is_form_encoded() {
    let (url, requests) = mock_upstream(vec![(200, CHECK_FIXTURE)]);
    let lt = LanguageToolClient::new(client(), &url);

    lt.check("I has a apple.", "en").expect("check succeeds");

    let captured = requests.recv().expect("request captured");
    assert_eq!(captured.method, "POST");
    assert_eq!(captured.url, "/v2/check");
    assert_eq!(
        captured.header("Content-Type"),
        Some("application/x-www-form-urlencoded")
    );
    assert!(captured.body.contains("text=I+has+a+apple."), "{}", captured.body);
    assert!(captured.body.contains("language=en-US"), "{}", captured.body);
}

#[test]
fn languagetool_matches_become_sorted_issues() {
    let (url, _requests) = mock_upstream(vec![(200, CHECK_FIXTURE)]);
    let lt = LanguageToolClient::new(client(), &url);

    let analysis = analyze(&lt, &AnalyzeRequest::new("I has a apple.", "en")).unwrap();

    let starts: Vec<usize> = analysis.issues.iter().map(|i| i.start).collect();
    assert_eq!(starts, vec![2, 6]);

    let first = &analysis.issues[0];
    assert_eq!(first.end, 5);
    assert_eq!(first.kind, "GRAMMAR");
    assert_eq!(first.suggestion, "have");
    assert_eq!(first.severity, Severity::High);

    assert_eq!(analysis.meta.language, "en");
    assert_eq!(analysis.meta.char_count, 14);
    assert_eq!(analysis.meta.detected_language.as_deref(), Some("en-US"));

    let texts: Vec<&str> = build_segments("I has a apple.", &analysis.issues)
        .iter()
        .map(|s| s.text)
        .collect();
    assert_eq!(texts, vec!["I ", "has", " ", "a", " apple."]);
    assert_eq!(
        apply_all_suggestions("I has a apple.", &analysis.issues),
        "I have an apple."
    );
}

#[test]
fn languagetool_error_status_is_upstream_failure() {
    let (url, _requests) = mock_upstream(vec![(500, "Internal error")]);
    let lt = LanguageToolClient::new(client(), &url);

    let err = lt.check("I has", "en").unwrap_err();
    match err {
        CheckError::Upstream {
            service,
            status,
            body,
        } => {
            assert_eq!(service, "LanguageTool");
            assert_eq!(status, 500);
            assert_eq!(body, "Internal error");
        }
        other => panic!("expected Upstream, got: {other}"),
    }
}

#[test]
fn languagetool_garbage_is_decode_error() {
    let (url, _requests) = mock_upstream(vec![(200, "<html>oops</html>")]);
    let lt = LanguageToolClient::new(client(), &url);
    assert!(matches!(lt.check("I has", "en"), Err(CheckError::Decode(_))));
}

// ===========================================================================
// Hugging Face correction
// ===========================================================================

#[test]
fn correction_sends_bearer_token_and_inputs() {
    let (url, requests) = mock_upstream(vec![(200, r#"[{"generated_text":"I have an apple."}]"#)]);
    let corrector = HuggingFaceCorrector::new(client(), url, "hf_test");

    let correction = corrector.correct("I has a apple.").unwrap();
    assert_eq!(correction, Correction::Corrected("I have an apple.".to_string()));

    let captured = requests.recv().expect("request captured");
    assert_eq!(captured.header("Authorization"), Some("Bearer hf_test"));
    let sent: serde_json::Value = serde_json::from_str(&captured.body).unwrap();
    assert_eq!(sent["inputs"], "I has a apple.");
}

#[test]
fn correction_html_answer_keeps_original() {
    let (url, _requests) = mock_upstream(vec![(503, "<!DOCTYPE html><p>Model is overloaded</p>")]);
    let corrector = HuggingFaceCorrector::new(client(), url, "hf_test");

    let correction = corrector.correct("I has a apple.").unwrap();
    assert!(matches!(correction, Correction::Unavailable { .. }));
    assert_eq!(correction.text_or("I has a apple."), "I has a apple.");
}

#[test]
fn correction_input_is_truncated() {
    let (url, requests) = mock_upstream(vec![(200, r#"[{"generated_text":"x"}]"#)]);
    let corrector = HuggingFaceCorrector::new(client(), url, "hf_test");
    let long = "a".repeat(450);

    let correction = corrector.correct(&long).unwrap();

    let captured = requests.recv().expect("request captured");
    let sent: serde_json::Value = serde_json::from_str(&captured.body).unwrap();
    assert_eq!(sent["inputs"].as_str().map(str::len), Some(300));
    assert_eq!(correction.text_or(&long).len(), 1 + 150);
}

// ===========================================================================
// End to end: router in front of the mock LanguageTool
// ===========================================================================

#[test]
fn analyze_endpoint_end_to_end() {
    let (lt_url, _requests) = mock_upstream(vec![(200, CHECK_FIXTURE)]);
    let router = Router::new(LanguageToolClient::new(client(), &lt_url));

    let server = Server::http("127.0.0.1:0").expect("bind cucua server");
    let port = server.server_addr().to_ip().expect("ip").port();
    thread::spawn(move || {
        if let Ok(request) = server.recv() {
            router.respond(request);
        }
    });

    let response = client()
        .post(format!("http://127.0.0.1:{port}/api/analyze"))
        .json(&serde_json::json!({ "text": "I has a apple.", "language": "en" }))
        .send()
        .expect("send analyze request");
    assert_eq!(response.status().as_u16(), 200);
    let json: serde_json::Value = response.json().expect("JSON body");
    assert_eq!(json["issues"].as_array().map(Vec::len), Some(2));
    assert_eq!(json["meta"]["charCount"], 14);
}
