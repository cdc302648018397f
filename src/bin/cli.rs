//! CLI binary for cord-search.
//!
//! All tracing output goes to stderr so stdout stays clean for results and
//! for the host protocol.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use cord_search::controller::Command as RuntimeCommand;
use cord_search::display::{render_card, render_window};
use cord_search::host::stdio::run_stdio_bridge;
use cord_search::query::last_token;
use cord_search::runtime::wait_settled;
use cord_search::suggest::MIN_TOKEN_CHARS;
use cord_search::{ClientConfig, SearchMode, SessionPhase, Snapshot, spawn_runtime};
use cord_search_api::{HttpBackend, SearchBackend};
use tracing_subscriber::EnvFilter;

/// Search the CORD-19 research corpus.
#[derive(Parser)]
#[command(name = "cord-search", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Ranking service root, overriding the config file.
    #[arg(long, env = "CORD_SEARCH_API_BASE", global = true)]
    api_base: Option<String>,

    /// Request timeout in seconds, overriding the config file.
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Option<Command>,
}

/// Available commands.
#[derive(Subcommand)]
enum Command {
    /// Run one search and print a page of results.
    Search {
        /// Query terms.
        #[arg(required = true)]
        query: Vec<String>,

        /// Match any term (`or`) or all terms (`and`).
        #[arg(short, long)]
        mode: Option<SearchMode>,

        /// Page of results to print.
        #[arg(short, long, default_value_t = 1)]
        page: usize,

        /// Output format.
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Plain)]
        format: OutputFormat,
    },

    /// Print autocomplete suggestions for the last word of the input.
    Suggest {
        #[arg(required = true)]
        input: Vec<String>,
    },

    /// Serve the JSON host protocol on stdin/stdout.
    Host,

    /// Print the effective configuration as TOML.
    Config,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Plain,
    Json,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("cord_search=info,cord_search_api=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command.unwrap_or(Command::Host) {
        Command::Search {
            query,
            mode,
            page,
            format,
        } => run_search(&config, &query.join(" "), mode, page, format).await,
        Command::Suggest { input } => run_suggest(&config, &input.join(" ")).await,
        Command::Host => run_host(&config).await,
        Command::Config => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<ClientConfig> {
    let mut config = match &cli.config {
        Some(path) => ClientConfig::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => ClientConfig::load_or_default(&ClientConfig::default_config_path())?,
    };
    if let Some(base) = &cli.api_base {
        config.api.base_url.clone_from(base);
    }
    if let Some(timeout) = cli.timeout {
        config.api.timeout_seconds = timeout;
    }
    config.validate()?;
    Ok(config)
}

async fn run_search(
    config: &ClientConfig,
    text: &str,
    mode: Option<SearchMode>,
    page: usize,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let backend = Arc::new(HttpBackend::new(config.api.clone())?);
    let (runtime, task) = spawn_runtime(backend, mode.unwrap_or(config.search.default_mode));
    let mut events = runtime.subscribe();

    runtime.send(RuntimeCommand::SetInput(text.to_owned())).await?;
    let submitted = runtime.send(RuntimeCommand::Submit).await?;
    if submitted.snapshot.phase == SessionPhase::Idle {
        anyhow::bail!("query is empty");
    }

    wait_settled(&mut events).await?;

    let snapshot = runtime.send(RuntimeCommand::GotoPage(page)).await?.snapshot;
    drop(runtime);
    let _ = task.await;

    if snapshot.phase == SessionPhase::Error {
        anyhow::bail!(snapshot.error.unwrap_or_default());
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&snapshot)?),
        OutputFormat::Plain => print_plain(&snapshot),
    }
    Ok(())
}

fn print_plain(snapshot: &Snapshot) {
    if let Some(summary) = &snapshot.summary {
        println!("{summary}");
    }
    for card in &snapshot.page.items {
        println!();
        print!("{}", render_card(card));
    }
    if snapshot.page.total_pages > 1 {
        println!();
        println!(
            "Page {}",
            render_window(&snapshot.page.window, snapshot.page.current_page)
        );
    }
}

async fn run_suggest(config: &ClientConfig, input: &str) -> anyhow::Result<()> {
    let token = last_token(input);
    if token.chars().count() < MIN_TOKEN_CHARS {
        tracing::info!("last word is too short for suggestions");
        return Ok(());
    }

    let backend = HttpBackend::new(config.api.clone())?;
    match backend.autocomplete(token).await {
        Ok(suggestions) => {
            for suggestion in suggestions {
                println!("{suggestion}");
            }
        }
        Err(e) => tracing::warn!(error = %e, "autocomplete failed"),
    }
    Ok(())
}

async fn run_host(config: &ClientConfig) -> anyhow::Result<()> {
    tracing::info!(base_url = %config.api.base_url, "cord-search host starting");

    let backend = Arc::new(HttpBackend::new(config.api.clone())?);
    let (runtime, task) = spawn_runtime(backend, config.search.default_mode);

    run_stdio_bridge(runtime).await.map_err(|e| {
        tracing::error!(error = %e, "host bridge exited with error");
        anyhow::anyhow!("host bridge failed: {e}")
    })?;
    let _ = task.await;

    tracing::info!("cord-search host shut down cleanly");
    Ok(())
}
