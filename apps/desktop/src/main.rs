mod blocking;
mod clipboard;
mod speech;
mod terminal;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use client_core::{
    FetchOutcome, QuoteWidget, SelectionMode, WidgetConfig, DEFAULT_API_URL, DEFAULT_SHARE_URL,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{
    clipboard::ArboardClipboard,
    speech::CommandSpeech,
    terminal::{ConsoleOpener, StdinEvents, TerminalControl, TerminalDisplay, TerminalNotifier},
};

#[derive(Parser, Debug)]
#[command(about = "Random quote widget for the terminal")]
struct Args {
    /// Quote proxy endpoint.
    #[arg(long, env = "QUOTE_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,
    /// Page shared on Facebook.
    #[arg(long, env = "QUOTE_SHARE_URL", default_value = DEFAULT_SHARE_URL)]
    share_url: String,
    /// Keep the whole upstream batch and draw from it at random.
    #[arg(long)]
    library: bool,
    #[arg(long)]
    no_speech: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();
    let args = Args::parse();

    let config = WidgetConfig {
        api_url: args.api_url,
        share_url: args.share_url,
        selection: if args.library {
            SelectionMode::Library
        } else {
            SelectionMode::First
        },
        ..WidgetConfig::default()
    };
    info!(api_url = %config.api_url, selection = ?config.selection, "starting quote widget");

    let mut builder = QuoteWidget::builder(config)
        .display(Arc::new(TerminalDisplay::default()))
        .control(Arc::new(TerminalControl))
        .notifier(Arc::new(TerminalNotifier))
        .clipboard(Arc::new(ArboardClipboard::default()))
        .opener(Arc::new(ConsoleOpener));
    if !args.no_speech {
        if let Some(engine) = CommandSpeech::detect() {
            builder = builder.speech(Arc::new(engine));
        }
    }
    let widget = builder.build()?;

    println!("{}", terminal::HELP);
    let mut events = StdinEvents::default();
    if let FetchOutcome::Failed(err) = widget.run(&mut events).await {
        info!(%err, "initial quote failed");
    }
    Ok(())
}
