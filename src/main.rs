//! Reddit Harvester - CLI entry point.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{fmt, EnvFilter};

use reddit_harvester::{
    api::RedditApi,
    cli::Args,
    config::{strip_subreddit_prefix, validate_config, Config},
    download::{Harvester, StopReason},
    error::{exit_codes, Error, Result},
    fs::CursorStore,
    media::ContentFilter,
    output::{
        create_spinner, print_banner, print_config_summary, print_error, print_harvest_summary,
        print_info, print_success, print_warning,
    },
    shutdown::spawn_signal_listener,
};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(e) => {
            print_error(&format!("{}", e));
            match e {
                Error::Config(_)
                | Error::ConfigValidation { .. }
                | Error::MissingConfig(_)
                | Error::TomlParse(_) => ExitCode::from(exit_codes::CONFIG_ERROR as u8),
                Error::Api(_) | Error::RateLimited | Error::Http(_) => {
                    ExitCode::from(exit_codes::API_ERROR as u8)
                }
                Error::Io(_) => ExitCode::from(exit_codes::IO_ERROR as u8),
                _ => ExitCode::from(exit_codes::UNEXPECTED_ERROR as u8),
            }
        }
    }
}

async fn run() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt().with_env_filter(filter).with_target(false).init();

    print_banner();

    // Load configuration
    let config_path = args.config.clone();
    let mut config = if config_path.exists() {
        Config::load(&config_path)?
    } else {
        print_warning(&format!(
            "Configuration file not found: {}",
            config_path.display()
        ));
        print_info("Using default configuration with CLI arguments");
        Config::default()
    };

    args.merge_into_config(&mut config);
    validate_config(&config)?;

    let store = CursorStore::new(config.cursor_path());
    let cursor = store.load().await?;
    let source = match &config.target.query {
        Some(query) => format!(
            "search \"{}\" in r/{} ({})",
            query,
            strip_subreddit_prefix(&config.target.subreddit),
            config.target.sort
        ),
        None => format!(
            "r/{} ({})",
            strip_subreddit_prefix(&config.target.subreddit),
            config.target.sort
        ),
    };
    print_config_summary(
        &source,
        &ContentFilter::from_config(&config.filter)?.to_string(),
        &config.options.download_directory.display().to_string(),
        &cursor.to_string(),
    );

    let api = Arc::new(RedditApi::from_config(&config)?);
    let cancel = CancellationToken::new();
    let listener = spawn_signal_listener(cancel.clone());

    let spinner = create_spinner("Fetching first page...");
    let harvester = Harvester::new(&config, api, cancel.clone())?.with_progress(spinner.clone());
    let result = harvester.run().await;
    spinner.finish_and_clear();

    // Release the signal listener
    cancel.cancel();
    let _ = listener.await;

    let summary = result?;
    print_harvest_summary(&summary);

    match summary.stop_reason {
        StopReason::EndOfResults => {
            print_success("Nothing more to fetch. Delete the cursor file to start over.")
        }
        StopReason::BatchLimit => print_info("Page limit reached. Run again to continue."),
        StopReason::Cancelled => print_info("Stopped. Run again to resume from the saved cursor."),
    }

    Ok(())
}
