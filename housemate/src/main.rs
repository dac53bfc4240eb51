//! HouseMate CLI - test driver for the knowledge engine and the home model.
//!
//! # Usage
//!
//! ```bash
//! # Import statements, then run a query file
//! housemate knowledge triples.nt queries.txt
//!
//! # Run a command script against a fresh model
//! housemate commands setup.txt --policy fail-fast
//!
//! # One-off query and store statistics
//! housemate query triples.nt house1 contains_room ?
//! housemate stats triples.nt --json
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use housemate::{CommandProcessor, HouseMateConfig, HouseMateService};
use knowledge_engine::{
    ErrorPolicy, ImportReport, Importer, KnowledgeGraph, QueryEngine, SharedGraph,
};

const DEFAULT_LOG_FILTER: &str = "housemate=info,knowledge_engine=info";

#[derive(Parser)]
#[command(name = "housemate")]
#[command(about = "Knowledge graph and home model driver", long_about = None)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import statements, then run every query in a query file
    Knowledge {
        /// Statement file, one `subject predicate object.` per line
        triples: PathBuf,

        /// Query file, one pattern per line
        queries: PathBuf,

        /// Error policy for the import
        #[arg(long)]
        import_policy: Option<ErrorPolicy>,

        /// Error policy for the queries
        #[arg(long)]
        query_policy: Option<ErrorPolicy>,

        /// Print each outcome as a JSON line
        #[arg(long)]
        json: bool,
    },

    /// Run a command file against a fresh home model
    Commands {
        /// Command file
        file: PathBuf,

        /// Statements to load before running the commands
        #[arg(long)]
        triples: Option<PathBuf>,

        /// Error policy for the commands
        #[arg(long)]
        policy: Option<ErrorPolicy>,
    },

    /// Import statements and run a single query
    Query {
        /// Statement file
        triples: PathBuf,

        /// Pattern tokens, e.g. `house1 contains_room ?`
        #[arg(required = true, num_args = 1..)]
        pattern: Vec<String>,
    },

    /// Show statistics about a statement file
    Stats {
        /// Statement file
        triples: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => HouseMateConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => HouseMateConfig::default(),
    };

    match cli.command {
        Commands::Knowledge {
            triples,
            queries,
            import_policy,
            query_policy,
            json,
        } => {
            let mut config = config;
            if let Some(policy) = import_policy {
                config.engine.import_policy = policy;
            }
            if let Some(policy) = query_policy {
                config.engine.query_policy = policy;
            }
            cmd_knowledge(&config, &triples, &queries, json)
        }
        Commands::Commands { file, triples, policy } => {
            let policy = policy.unwrap_or(config.command_policy);
            cmd_commands(&config, &file, triples.as_deref(), policy)
        }
        Commands::Query { triples, pattern } => cmd_query(&config, &triples, &pattern),
        Commands::Stats { triples, json } => cmd_stats(&config, &triples, json),
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn load_graph(config: &HouseMateConfig, path: &Path) -> Result<(KnowledgeGraph, ImportReport)> {
    let mut graph = KnowledgeGraph::new();
    let report = Importer::from_config(&config.engine)
        .import_file(&mut graph, path)
        .with_context(|| format!("Failed to import {}", path.display()))?;
    Ok((graph, report))
}

fn cmd_knowledge(
    config: &HouseMateConfig,
    triples: &Path,
    queries: &Path,
    json: bool,
) -> Result<()> {
    let (graph, _) = load_graph(config, triples)?;
    let engine = QueryEngine::new(&config.engine);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    engine
        .execute_file(&graph, queries, |outcome| {
            if json {
                serde_json::to_writer(&mut out, outcome)?;
                writeln!(out)
            } else {
                outcome.write_to(&mut out, engine.sentinel())
            }
        })
        .with_context(|| format!("Failed to run queries from {}", queries.display()))?;
    Ok(())
}

fn cmd_commands(
    config: &HouseMateConfig,
    file: &Path,
    triples: Option<&Path>,
    policy: ErrorPolicy,
) -> Result<()> {
    let graph = SharedGraph::new();
    if let Some(triples) = triples {
        Importer::from_config(&config.engine)
            .import_file(&mut graph.write(), triples)
            .with_context(|| format!("Failed to import {}", triples.display()))?;
    }

    let service = HouseMateService::with_config(graph, &config.engine);
    let mut processor = CommandProcessor::new(service, policy);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let report = processor
        .execute_file(file, &mut out)
        .with_context(|| format!("Failed to run commands from {}", file.display()))?;

    for err in &report.errors {
        eprintln!("ERROR: {err}");
    }
    Ok(())
}

fn cmd_query(config: &HouseMateConfig, triples: &Path, pattern: &[String]) -> Result<()> {
    let (graph, _) = load_graph(config, triples)?;
    let engine = QueryEngine::new(&config.engine);

    let line = pattern.join(" ");
    let outcome = engine
        .execute_query(&graph, &line)
        .with_context(|| format!("Invalid query `{line}`"))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if let Some(outcome) = outcome {
        outcome.write_to(&mut out, engine.sentinel())?;
    }
    Ok(())
}

fn cmd_stats(config: &HouseMateConfig, triples: &Path, json: bool) -> Result<()> {
    let (graph, report) = load_graph(config, triples)?;
    let stats = graph.stats();

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("Graph:      {}", stats.graph_id);
    println!("Triples:    {}", stats.triple_count);
    println!("Nodes:      {}", stats.node_count);
    println!("Predicates: {}", stats.predicate_count);
    println!("Buckets:    {}", stats.bucket_count);
    println!("Duplicates: {}", report.duplicates);
    println!("Skipped:    {}", report.skipped());
    Ok(())
}
