pub mod config;
pub mod corpus;
pub mod export;
pub mod model;
pub mod search;
pub mod state;

use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand};
use std::num::NonZeroUsize;
use std::path::PathBuf;

use config::{ConfigError, SearchConfig};
use export::{ExportFormat, ExportOptions, export_results};
use search::facets::FacetOptions;
use search::{SearchClient, SearchFilters, SortOption};
use state::QueryState;

/// Command-line interface.
#[derive(Parser, Debug)]
#[command(
    name = "propsearch",
    version,
    about = "Ranked search over CIP and CPS proposals"
)]
pub struct Cli {
    /// Path to the config file (defaults to the platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search the corpus
    Search(SearchArgs),
    /// List the facet values present in the corpus
    Facets {
        #[command(flatten)]
        corpus: CorpusArg,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
pub struct CorpusArg {
    /// Corpus JSON produced by the content pipeline
    #[arg(long, env = "PROPSEARCH_CORPUS")]
    pub corpus: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Free-text query; omit to list everything that passes the filters
    #[arg(default_value = "")]
    pub query: String,

    #[command(flatten)]
    pub corpus: CorpusArg,

    /// Category facet (repeatable or comma separated)
    #[arg(long = "category", value_delimiter = ',')]
    pub categories: Vec<String>,

    /// Status facet, lower-case (e.g. draft, active)
    #[arg(long = "status", value_delimiter = ',')]
    pub statuses: Vec<String>,

    /// Document type facet (CIP or CPS)
    #[arg(long = "type", value_delimiter = ',')]
    pub types: Vec<String>,

    #[arg(long = "author", value_delimiter = ',')]
    pub authors: Vec<String>,

    #[arg(long = "implementor", value_delimiter = ',')]
    pub implementors: Vec<String>,

    /// number-asc, relevance, number-desc, title-asc, title-desc, created-asc, created-desc
    #[arg(long)]
    pub sort: Option<SortOption>,

    /// Maximum number of results
    #[arg(long)]
    pub limit: Option<NonZeroUsize>,

    /// Output format: markdown, json or plain
    #[arg(long, default_value = "markdown")]
    pub format: ExportFormat,

    /// Snippet window in characters
    #[arg(long)]
    pub snippet_length: Option<NonZeroUsize>,

    /// Include full document content in the output
    #[arg(long)]
    pub content: bool,
}

impl SearchArgs {
    fn query_state(&self, config: &SearchConfig) -> QueryState {
        QueryState {
            text: self.query.clone(),
            filters: SearchFilters {
                categories: self.categories.iter().cloned().collect(),
                statuses: self.statuses.iter().cloned().collect(),
                types: self.types.iter().cloned().collect(),
                authors: self.authors.iter().cloned().collect(),
                implementors: self.implementors.iter().cloned().collect(),
            },
            sort: self.sort.unwrap_or(config.default_sort),
        }
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Search(args) => run_search(&config, args),
        Commands::Facets { corpus, json } => run_facets(&config, corpus, json),
    }
}

/// Install the stderr subscriber. Safe to call more than once.
pub fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_config(explicit: Option<&PathBuf>) -> Result<SearchConfig> {
    if let Some(path) = explicit {
        return SearchConfig::load_from(path)
            .with_context(|| format!("loading config {}", path.display()));
    }
    match SearchConfig::load() {
        Ok(config) => Ok(config),
        Err(ConfigError::NoConfigDir) => {
            tracing::warn!("no config directory available, using defaults");
            Ok(SearchConfig::default())
        }
        Err(err) => Err(err).context("loading config"),
    }
}

fn open_client(config: &SearchConfig, corpus: CorpusArg) -> Result<SearchClient> {
    let path = corpus
        .corpus
        .or_else(|| config.resolved_corpus_path())
        .ok_or_else(|| anyhow!("no corpus given: pass --corpus or set corpus_path in the config"))?;
    SearchClient::open(&path).with_context(|| format!("loading corpus {}", path.display()))
}

fn run_search(config: &SearchConfig, args: SearchArgs) -> Result<()> {
    let state = args.query_state(config);
    let limit = args.limit.map(NonZeroUsize::get).or(config.default_limit);
    let client = open_client(config, args.corpus)?;

    let results = client.search(&state, limit)?;
    tracing::info!(query = %state.text, returned = results.len(), "search complete");

    let options = ExportOptions {
        include_content: args.content,
        include_score: true,
        snippet_length: args
            .snippet_length
            .map_or(config.snippet_length, NonZeroUsize::get),
        query: Some(state.text),
    };
    print!("{}", export_results(&results, args.format, &options));
    Ok(())
}

fn run_facets(config: &SearchConfig, corpus: CorpusArg, json: bool) -> Result<()> {
    let client = open_client(config, corpus)?;
    let facets = client.facets()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&facets)?);
    } else {
        print!("{}", render_facets(&facets));
    }
    Ok(())
}

fn render_facets(facets: &FacetOptions) -> String {
    let sections = [
        ("Categories", &facets.categories),
        ("Statuses", &facets.statuses),
        ("Types", &facets.types),
        ("Authors", &facets.authors),
        ("Implementors", &facets.implementors),
    ];
    let mut out = String::new();
    for (heading, options) in sections {
        out.push_str(&format!("{heading} ({}):\n", options.len()));
        for option in options.iter() {
            out.push_str(&format!("  {}\n", option.label));
        }
    }
    out
}
