//! Lexcite CLI - Ask questions about legal documents and check the citations.

use clap::Parser;
use lexcite_cli::commands;
use lexcite_cli::input::{collect_inputs, read_queries};
use lexcite_cli::repl;
use lexcite_cli::{Cli, CliError, Config, Coordinator, Formatter, Mode};
use lexcite_llm::OllamaProvider;
use lexcite_store::ExtractionCache;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> lexcite_cli::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(std::io::stderr)
        .init();

    // Defaults, then the config file, then flags
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    config.apply_cli(&cli);
    config.validate()?;

    let formatter = Formatter::new(config.settings.color);

    let cache = ExtractionCache::open(config.cache_dir()?)?;
    if cli.clear_cache {
        let removed = cache.clear();
        println!("{}", formatter.success(&format!("Cleared {} cached extraction(s)", removed)));
    }

    let Some(mode) = cli.mode() else {
        if cli.clear_cache {
            return Ok(());
        }
        return Err(CliError::InvalidInput(
            "one of --query, --queries or --interactive is required".into(),
        ));
    };

    let files = collect_inputs(cli.folder.as_deref(), &cli.files)?;

    // Read the question file before the slow ingestion step
    let questions = match &mode {
        Mode::Batch(path) => read_queries(path)?,
        _ => Vec::new(),
    };

    let mut coordinator = Coordinator::<OllamaProvider>::new(&config.worker);
    let task = commands::build_ingest_task(files, &config, Some(Arc::new(cache)))?;
    let outcome = commands::execute_ingest(&mut coordinator, task, &formatter).await?;
    commands::open_session(&mut coordinator, &outcome, &config, cli.show_log)?;

    match mode {
        Mode::Single(question) => {
            commands::execute_ask(&mut coordinator, &question, &formatter, cli.show_log).await?;
        }
        Mode::Batch(_) => {
            let failed = commands::execute_batch(&mut coordinator, &questions, &formatter, cli.show_log).await?;
            if failed > 0 {
                println!("{}", formatter.warning(&format!("{} of {} question(s) failed", failed, questions.len())));
            }
        }
        Mode::Interactive => {
            repl::run_repl(
                &mut coordinator,
                &outcome,
                &formatter,
                config.settings.history_size,
                cli.show_log,
            )
            .await?;
        }
    }

    println!("{}", formatter.success("Done."));
    Ok(())
}
