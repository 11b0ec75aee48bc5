// cucua-check: check the grammar of a text and print the issues found.
//
// Reads the text from stdin (or --text), sends it to LanguageTool and prints
// the text with issue spans in brackets followed by one line per issue.
//
// Usage:
//   echo "I has a apple." | cucua-check -l en
//   cucua-check --text "I has a apple." --apply-all
//   cucua-check --text "I has a apple." --json
//   cucua-check --text "I has a apple." --correct

use std::io::{self, Read, Write};

use clap::Parser;
use tracing::warn;

use cucua_check::{
    AnalyzeRequest, Correction, Corrector, HuggingFaceCorrector, LanguageToolClient, analyze,
};
use cucua_cli::{describe_issue, fatal, init_logging, load_config, render_segments};
use cucua_core::Document;

/// Check grammar with LanguageTool and show or apply the suggestions.
#[derive(Debug, Parser)]
#[command(name = "cucua-check", version, about)]
struct Args {
    /// Language code, e.g. en, fr, de (default: CUCUA_LANGUAGE or en)
    #[arg(short, long)]
    language: Option<String>,

    /// Text to check instead of reading stdin
    #[arg(short, long)]
    text: Option<String>,

    /// Print the text with every suggestion applied
    #[arg(long, conflicts_with_all = ["json", "correct"])]
    apply_all: bool,

    /// Print the analysis as JSON
    #[arg(long, conflicts_with = "correct")]
    json: bool,

    /// Reject overlapping or unordered issues instead of rendering them
    #[arg(long)]
    strict: bool,

    /// Rewrite the text with the correction model instead of LanguageTool
    #[arg(long)]
    correct: bool,

    /// LanguageTool server base URL
    #[arg(long, value_name = "URL")]
    languagetool_url: Option<String>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn read_text(args: &Args) -> String {
    if let Some(text) = &args.text {
        return text.clone();
    }
    let mut text = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut text) {
        fatal(&format!("error reading stdin: {e}"));
    }
    let trimmed = text.trim_end_matches(['\n', '\r']).len();
    text.truncate(trimmed);
    text
}

fn run_correction(text: &str, config: &cucua_check::Config, out: &mut impl Write) {
    let corrector = HuggingFaceCorrector::from_config(config).unwrap_or_else(|e| fatal(&e.to_string()));
    let correction = corrector
        .correct(text)
        .unwrap_or_else(|e| fatal(&e.to_string()));
    if let Correction::Unavailable { reason } = &correction {
        warn!(%reason, "correction unavailable");
        eprintln!("note: correction unavailable ({reason}); showing original text");
    }
    let _ = writeln!(out, "{}", correction.text_or(text));
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut config = load_config();
    if let Some(url) = &args.languagetool_url {
        config.languagetool_url = url.trim_end_matches('/').to_string();
    }
    let language = args
        .language
        .clone()
        .unwrap_or_else(|| config.default_language.clone());

    let text = read_text(&args);
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());

    if args.correct {
        run_correction(&text, &config, &mut out);
        return;
    }

    let client = LanguageToolClient::from_config(&config).unwrap_or_else(|e| fatal(&e.to_string()));
    let mut document = Document::new(text);
    let snapshot = document.snapshot();
    let analysis = analyze(&client, &AnalyzeRequest::new(snapshot.text(), &language))
        .unwrap_or_else(|e| fatal(&e.to_string()));
    let checked = snapshot
        .check(analysis)
        .unwrap_or_else(|e| fatal(&e.to_string()));
    document
        .attach(checked)
        .unwrap_or_else(|e| fatal(&e.to_string()));

    let Some(checked) = document.checked() else {
        fatal("analysis was not attached");
    };

    if args.json {
        let json = serde_json::to_string_pretty(checked.analysis())
            .unwrap_or_else(|e| fatal(&e.to_string()));
        let _ = writeln!(out, "{json}");
        return;
    }

    if args.apply_all {
        document.apply_all();
        let _ = writeln!(out, "{}", document.text());
        return;
    }

    let segments = if args.strict {
        checked.try_segments().unwrap_or_else(|e| fatal(&e.to_string()))
    } else {
        checked.segments()
    };
    let _ = writeln!(out, "{}", render_segments(&segments));

    let issues = checked.issues();
    if issues.is_empty() {
        let _ = writeln!(out, "No issues found.");
        return;
    }
    let _ = writeln!(out);
    for (i, issue) in issues.iter().enumerate() {
        let _ = writeln!(out, "{:>3}. {}", i + 1, describe_issue(issue));
    }
}
