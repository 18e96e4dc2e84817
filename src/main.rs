use clap::Parser;
use docbrief::{
    config::Config,
    logging,
    service::{ErrorKind, SummaryRequest, SummaryService},
};
use std::path::PathBuf;
use std::process::ExitCode;

/// Summarize a PDF or plain-text document through the configured generation provider.
#[derive(Parser)]
#[command(name = "docbrief", version, about)]
struct Cli {
    /// Path to the document to summarize (.pdf or .txt).
    file: PathBuf,

    /// Language code for the summary (defaults to the configured language).
    #[arg(long)]
    language: Option<String>,

    /// Extra instruction layered onto the summarization prompt.
    #[arg(long)]
    prompt: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_tracing();

    let config = match Config::load() {
        Ok(config) => config,
        Err(error) => {
            eprintln!("Configuration error: {error}");
            return ExitCode::from(2);
        }
    };

    let service = match SummaryService::new(&config) {
        Ok(service) => service,
        Err(error) => {
            eprintln!("Failed to initialize pipeline: {error}");
            return ExitCode::FAILURE;
        }
    };

    let request = SummaryRequest {
        language: cli.language,
        custom_prompt: cli.prompt,
    };

    match service.summarize_file(&cli.file, request).await {
        Ok(summary) => {
            println!("{}", summary.summary_text);
            ExitCode::SUCCESS
        }
        Err(error) => {
            tracing::error!(kind = ?error.kind(), error = %error, "Summarization failed");
            eprintln!("{error}");
            match error.kind() {
                ErrorKind::Input | ErrorKind::UnsupportedFormat => ExitCode::from(2),
                ErrorKind::Generation => ExitCode::FAILURE,
            }
        }
    }
}
