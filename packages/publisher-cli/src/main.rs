// Command-line entry point for batch article publishing

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use publisher::clients::{GeminiClient, IndexNowClient, TelegramNotifier, WordPressClient};
use publisher::compose::TextFitEngine;
use publisher::pipeline::load_and_run;
use publisher::source::XlsxJobSource;
use publisher::traits::{Indexer, LogNotifier, Notifier, NullNotifier};

mod config;

use config::Config;

/// Generate, illustrate, and publish one article per workbook row.
#[derive(Parser, Debug)]
#[command(name = "autopost", version, about)]
struct Args {
    /// Job workbook with the accounts and keywords sheets
    workbook: PathBuf,

    /// Font file for composed images (overrides FONT_PATH)
    #[arg(long)]
    font: Option<PathBuf>,

    /// Scratch directory for composed images
    #[arg(long, default_value = "scratch")]
    scratch_dir: PathBuf,

    /// Suppress progress notifications (errors still go to the log)
    #[arg(long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,publisher=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config = Config::from_env().context("Failed to load configuration")?;

    let font_path = match args.font.or_else(|| config.font_path.clone().map(PathBuf::from)) {
        Some(path) => path,
        None => bail!("no font configured: pass --font or set FONT_PATH"),
    };

    let engine = TextFitEngine::from_font_path(&font_path, &args.scratch_dir)
        .context("Failed to initialize the image engine")?;
    let ai = GeminiClient::new(config.gemini_api_key);
    let wordpress = WordPressClient::new();

    let notifier: Box<dyn Notifier> = if args.quiet {
        Box::new(NullNotifier)
    } else {
        match config.telegram {
            Some(telegram) => Box::new(TelegramNotifier::new(telegram.token, telegram.chat_id)),
            None => Box::new(LogNotifier),
        }
    };

    let indexer = config.indexnow_key.map(IndexNowClient::new);

    tracing::info!(workbook = %args.workbook.display(), "starting batch");
    let summary = load_and_run(
        &XlsxJobSource,
        &args.workbook,
        &engine,
        &ai,
        &wordpress,
        &notifier,
        indexer.as_ref().map(|i| i as &dyn Indexer),
    )
    .await
    .context("Batch run failed")?;

    for result in &summary.results {
        match &result.outcome {
            Ok(post) => tracing::info!(row = result.row, link = %post.link, "published"),
            Err(e) => tracing::warn!(row = result.row, stage = %e.stage(), "failed: {e}"),
        }
    }
    tracing::info!(
        published = summary.published(),
        failed = summary.failed(),
        "batch complete"
    );

    if summary.published() == 0 && summary.failed() > 0 {
        bail!("every row failed");
    }
    Ok(())
}
