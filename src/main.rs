//! flash-expand - run the expansion pipeline from the command line
//!
//! ```bash
//! flash-expand list fix
//! flash-expand expand --text "hello /fi" --fill "{{null pointer}}"
//! flash-expand watch
//! ```

use std::path::PathBuf;
use std::process;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info, warn};

use flash_expand::config::{self, Config};
use flash_expand::logging;
use flash_expand::ranking::rank_candidates;
use flash_expand::snippet::Snippet;
use flash_expand::storage::{JsonFileStore, SnippetCache, SnippetStore};
use flash_expand::surface::HostElement;
use flash_expand::ExpandEngine;

/// How often `watch` checks for a reload
const WATCH_POLL_MS: u64 = 250;

#[derive(Parser)]
#[command(author, version, about = "Trigger-driven snippet expansion", long_about = None)]
struct Cli {
    /// Snippet file (overrides storagePath from the config)
    #[arg(long, global = true)]
    store: Option<PathBuf>,
    /// Trigger character (overrides the config)
    #[arg(long, global = true)]
    trigger: Option<char>,
    /// Config file (default: ~/.flash-expand/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the ranked candidates for a query
    List { query: Option<String> },
    /// Run one expansion over a text field and print the result
    Expand {
        /// Field contents
        #[arg(long)]
        text: String,
        /// Caret position in chars (default: end of text)
        #[arg(long)]
        caret: Option<usize>,
        /// Menu index to commit
        #[arg(long, default_value_t = 0)]
        pick: usize,
        /// Fill form input, e.g. "{{Ann}}{{Friday}}"; omitted means cancel
        #[arg(long)]
        fill: Option<String>,
    },
    /// Print the ranked list again whenever the snippet file changes
    Watch { query: Option<String> },
}

fn main() {
    let cli = Cli::parse();
    let _guard = logging::init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => config::load_config_from(path),
        None => config::load_config(),
    };
    if let Some(trigger) = cli.trigger {
        config.trigger = trigger;
    }
    config.validate()?;

    let store = match &cli.store {
        Some(path) => JsonFileStore::new(path),
        None => JsonFileStore::from_config_path(config.get_storage_path()),
    };
    debug!(path = %store.path().display(), "Using snippet store");

    match cli.command {
        Commands::List { query } => list(&store, &config, query.as_deref().unwrap_or("")),
        Commands::Expand {
            text,
            caret,
            pick,
            fill,
        } => expand(store, config, &text, caret, pick, fill.as_deref()),
        Commands::Watch { query } => watch(&store, &config, query.as_deref().unwrap_or("")),
    }
}

fn print_ranked(snippets: &[Snippet], config: &Config, query: &str) {
    let ranked = rank_candidates(snippets, query);
    if ranked.is_empty() {
        println!("(no matches)");
    }
    for snippet in ranked {
        let star = if snippet.is_favorite { "*" } else { " " };
        let tags = snippet
            .tags
            .iter()
            .take(config.menu.max_tags_shown)
            .cloned()
            .collect::<Vec<_>>()
            .join(", ");
        println!("{star} {}{}  [{tags}]", config.trigger, snippet.title);
    }
}

fn list(store: &JsonFileStore, config: &Config, query: &str) -> Result<()> {
    let snippets = store.load()?;
    print_ranked(&snippets, config, query);
    Ok(())
}

fn expand(
    store: JsonFileStore,
    config: Config,
    text: &str,
    caret: Option<usize>,
    pick: usize,
    fill: Option<&str>,
) -> Result<()> {
    let mut element = HostElement::textarea("cli", text);
    if let Some(caret) = caret {
        element = element.with_caret(caret);
    }

    let mut engine = ExpandEngine::new(store, config);
    engine.focus(element)?;

    let state = engine.handle_input();
    if engine.menu().is_open() {
        for item in engine.menu_items() {
            let marker = if item.selected { ">" } else { " " };
            eprintln!("{marker} {}  {}", item.label, item.preview);
        }
        let shown = engine.menu().candidates().len();
        if !engine.commit(pick) {
            bail!("could not commit candidate {pick} ({shown} shown)");
        }
    } else {
        info!(state = ?state, "No active lookup, text unchanged");
    }

    if engine.form().is_some() {
        match fill {
            Some(fill) => {
                engine.set_form_text(fill);
                engine.submit_form();
            }
            None => engine.cancel_form(),
        }
    }
    engine.run_pending();

    let surface = engine
        .active_surface()
        .context("text field session was lost")?;
    let output = serde_json::json!({
        "text": surface.text(),
        "caret": surface.caret(),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn watch(store: &JsonFileStore, config: &Config, query: &str) -> Result<()> {
    let mut cache = SnippetCache::new();
    if !config.watch_storage {
        warn!("watchStorage is off, printing the current list once");
        return list(store, config, query);
    }
    cache.subscribe(store);
    store.watch()?;
    info!(path = %store.path().display(), "Watching snippet file, Ctrl+C to stop");

    loop {
        if cache.refresh_if_stale(store) {
            println!("--- revision {} ---", cache.revision());
            print_ranked(cache.snippets(), config, query);
        }
        std::thread::sleep(Duration::from_millis(WATCH_POLL_MS));
    }
}
