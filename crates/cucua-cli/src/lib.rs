// cucua-cli: shared utilities for the command-line tools.

use std::process;

use tracing_subscriber::EnvFilter;

use cucua_check::Config;
use cucua_core::issue::Issue;
use cucua_core::segment::Segment;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise `info`, or `debug` with `verbose`.
/// Logs go to stderr so they never mix with tool output.
pub fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "debug" } else { "info" })
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Read configuration from the environment, exiting on error.
pub fn load_config() -> Config {
    Config::from_env().unwrap_or_else(|e| fatal(&e.to_string()))
}

/// Print an error message and exit with code 1.
pub fn fatal(msg: &str) -> ! {
    eprintln!("error: {msg}");
    process::exit(1);
}

/// Render segments as one line, wrapping issue spans in brackets.
///
/// Insertion points show up as `[]`.
pub fn render_segments(segments: &[Segment<'_>]) -> String {
    let mut out = String::new();
    for segment in segments {
        if segment.is_issue() {
            out.push('[');
            out.push_str(segment.text);
            out.push(']');
        } else {
            out.push_str(segment.text);
        }
    }
    out
}

/// One-line description of an issue for listings.
pub fn describe_issue(issue: &Issue) -> String {
    let suggestion = if issue.has_suggestion() {
        format!("\"{}\"", issue.suggestion)
    } else {
        "(no suggestion)".to_string()
    };
    format!(
        "{}: {} → {} • Range: [{}, {}) • Severity: {}",
        issue.kind.to_uppercase(),
        issue.message,
        suggestion,
        issue.start,
        issue.end,
        issue.severity
    )
}

#[cfg(test)]
mod tests {
    use cucua_core::build_segments;
    use cucua_core::issue::Severity;

    use super::*;

    #[test]
    fn render_brackets_issues() {
        let issues = vec![Issue::new(2, 5), Issue::new(14, 14)];
        let segments = build_segments("I has a apple.", &issues);
        assert_eq!(render_segments(&segments), "I [has] a apple.[]");
    }

    #[test]
    fn render_plain_text() {
        let segments = build_segments("Fine.", &[]);
        assert_eq!(render_segments(&segments), "Fine.");
    }

    #[test]
    fn describe_with_suggestion() {
        let issue = Issue::new(2, 5)
            .with_kind("grammar")
            .with_message("Use 'have'.")
            .with_suggestion("have")
            .with_severity(Severity::High);
        assert_eq!(
            describe_issue(&issue),
            "GRAMMAR: Use 'have'. → \"have\" • Range: [2, 5) • Severity: high"
        );
    }

    #[test]
    fn describe_without_suggestion() {
        let issue = Issue::new(0, 4).with_kind("STYLE").with_message("Vague.");
        assert!(describe_issue(&issue).contains("(no suggestion)"));
    }
}
