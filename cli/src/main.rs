//! Sentence Search entry point

use clap::Parser;
use sentence_search_cli::{run, Args};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    let args = Args::parse();

    // Initialize logging
    let log_filter = if args.verbose {
        "sentence_search=debug,sentence_search_cli=debug"
    } else {
        "sentence_search=info,sentence_search_cli=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(&args) {
        Ok(output) => print!("{}", output),
        Err(e) => {
            tracing::error!("{:#}", e);
            std::process::exit(1);
        }
    }
}
