// cucua-serve: HTTP server exposing the analyze endpoint.
//
// Routes:
//   POST /api/analyze   {"text": "...", "language": "en"}  -> Analysis JSON
//   POST /api/correct   {"text": "..."}                    -> correction JSON
//   GET  /health
//
// Requests are served one at a time.

use clap::Parser;
use tracing::{info, warn};

use cucua_check::server::Router;
use cucua_check::{HuggingFaceCorrector, LanguageToolClient};
use cucua_cli::{fatal, init_logging, load_config};

/// Serve the Cucua analyze API over HTTP.
#[derive(Debug, Parser)]
#[command(name = "cucua-serve", version, about)]
struct Args {
    /// Address to listen on (default: CUCUA_BIND or 127.0.0.1:3000)
    #[arg(short, long, value_name = "ADDR")]
    bind: Option<String>,

    /// LanguageTool server base URL
    #[arg(long, value_name = "URL")]
    languagetool_url: Option<String>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut config = load_config();
    if let Some(bind) = args.bind {
        config.bind = bind;
    }
    if let Some(url) = args.languagetool_url {
        config.languagetool_url = url.trim_end_matches('/').to_string();
    }

    let client = LanguageToolClient::from_config(&config).unwrap_or_else(|e| fatal(&e.to_string()));
    let mut router = Router::new(client);
    match HuggingFaceCorrector::from_config(&config) {
        Ok(corrector) => router = router.with_corrector(corrector),
        Err(e) => warn!(error = %e, "correction endpoint disabled"),
    }

    let server = tiny_http::Server::http(&config.bind)
        .unwrap_or_else(|e| fatal(&format!("failed to bind {}: {e}", config.bind)));
    info!(bind = %config.bind, languagetool = %config.languagetool_url, "listening");

    router.serve(&server);
}
