use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::{anyhow, bail, Context, Result};
use catalog_core::{
    presenter, BrowseEvent, CatalogBrowser, HttpCatalogSource, MemoryHistory, NavigationHistory,
    RequestEnvelope,
};
use clap::{Parser, Subcommand};
use futures::StreamExt;
use tokio_stream::wrappers::BroadcastStream;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod config;

use config::load_settings;

#[derive(Parser, Debug)]
#[command(about = "Browse the storefront catalog from the terminal")]
struct Cli {
    /// Config file (defaults to ./shop_browse.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Catalog API base URL; overrides config and environment
    #[arg(long)]
    catalog_url: Option<String>,
    /// Shop location query string to start from, e.g. "category=shoes&page=2"
    #[arg(long, default_value = "")]
    query: String,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply filter changes in order and print the resulting page
    Show {
        /// Filter change as field=value; an empty value clears the field
        #[arg(long = "set", value_parser = parse_assignment)]
        set: Vec<(String, String)>,
        /// Jump to a page, clamped to the available range
        #[arg(long)]
        page: Option<i64>,
        /// Reset every filter before applying --set
        #[arg(long)]
        clear: bool,
    },
    /// List category slugs usable with --set category=...
    Categories,
}

fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    let (field, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected field=value, got '{raw}'"))?;
    Ok((field.trim().to_string(), value.to_string()))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let mut settings = load_settings(cli.config.as_deref())?;
    if let Some(url) = cli.catalog_url {
        settings.catalog_url = url;
    }
    info!(catalog_url = %settings.catalog_url, "shop_browse: starting");

    let source = Arc::new(HttpCatalogSource::new(
        settings.catalog_url.clone(),
        settings.request_timeout,
    ));
    let history = Arc::new(MemoryHistory::new(&cli.query));
    let browser = CatalogBrowser::mount(source, history.clone(), settings.browser_options()).await;
    let settle_within = settings.request_timeout + Duration::from_secs(1);

    match cli.command.unwrap_or(Command::Show {
        set: Vec::new(),
        page: None,
        clear: false,
    }) {
        Command::Show { set, page, clear } => {
            let mut events = BroadcastStream::new(browser.subscribe_events());
            let mut last = None;
            if clear {
                last = browser.clear_filters().await.or(last);
            }
            for (field, value) in &set {
                last = browser.set_field(field, value).await.or(last);
            }
            if let Some(page) = page {
                // clamping needs the current page count
                settle(&browser, &mut events, last.take(), settle_within).await?;
                last = browser.go_to_page(page).await;
            }
            settle(&browser, &mut events, last, settle_within).await?;

            println!("?{}", history.current());
            print!("{}", presenter::render(&browser.view().await));
        }
        Command::Categories => {
            let categories = browser
                .categories()
                .await
                .context("failed to load categories")?;
            for category in categories {
                println!("{}\t{}", category.slug, category.name);
            }
        }
    }

    browser.unmount().await;
    Ok(())
}

/// Waits until the given request (or, with none, the latest one) has been
/// accepted or has failed.
async fn settle(
    browser: &CatalogBrowser,
    events: &mut BroadcastStream<BrowseEvent>,
    envelope: Option<RequestEnvelope>,
    within: Duration,
) -> Result<()> {
    let view = browser.view().await;
    if !view.loading {
        return Ok(());
    }
    let target = envelope.map(|envelope| envelope.seq);
    debug!(?target, "shop_browse: waiting for results");

    tokio::time::timeout(within, async {
        while let Some(event) = events.next().await {
            let seq = match event {
                Ok(BrowseEvent::ResultsAccepted(results)) => results.seq,
                Ok(BrowseEvent::FetchFailed(failure)) => failure.seq,
                Ok(_) => continue,
                Err(lagged) => {
                    debug!(error = %lagged, "shop_browse: event stream lagged");
                    if !browser.view().await.loading {
                        return Ok(());
                    }
                    continue;
                }
            };
            if target.map_or(true, |target| seq >= target) {
                return Ok(());
            }
        }
        bail!("browse event stream closed")
    })
    .await
    .map_err(|_| anyhow!("catalog did not answer within {within:?}"))?
}
