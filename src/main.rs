//! `paper-sim` command line entry point.
//!
//! ```bash
//! paper-sim normalize --input raw/arxiv.tsv --output normalized/arxiv.csv
//! paper-sim build --corpus arxiv --input normalized/arxiv.csv
//! paper-sim search --corpus arxiv --title "Graph neural networks" --abstract "..."
//! paper-sim list --corpus arxiv
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use paper_sim::{
    config::{DEFAULT_ARTIFACT_DIR, DEFAULT_TOP_K},
    normalize_corpus, ArtifactStore, EngineConfig, FeatureConfig, FsArtifactStore, Granularity,
    Hits, QueryDocument, QueryPipeline, RepresentationBuilder, Table, TextNormalizer, Weighting,
};
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Result output format
#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Aligned text table
    Table,
    /// JSON array of hits
    Json,
}

/// Title/abstract similarity search over pre-indexed article corpora
#[derive(Parser, Debug)]
#[command(name = "paper-sim", version, about)]
struct Cli {
    /// Root directory of the stored vectorizers and matrices
    #[arg(
        long,
        value_name = "DIR",
        env = "PAPER_SIM_ARTIFACT_DIR",
        default_value = DEFAULT_ARTIFACT_DIR,
        global = true
    )]
    artifact_dir: PathBuf,

    /// Logging verbosity level (RUST_LOG takes precedence)
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Normalize the Title and Abstract columns of a raw corpus table
    Normalize {
        /// Raw table (.tsv is tab separated, anything else comma separated)
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Normalized table to write
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },

    /// Build the vector representations of a corpus
    Build {
        /// Corpus name (e.g. arxiv, pubmed)
        #[arg(long)]
        corpus: String,

        /// Corpus table with Title and Abstract columns
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Rebuild only this granularity (requires --weighting)
        #[arg(long)]
        granularity: Option<Granularity>,

        /// Rebuild only this weighting (requires --granularity)
        #[arg(long)]
        weighting: Option<Weighting>,
    },

    /// Rank corpus documents against a query title and abstract
    Search {
        #[arg(long)]
        corpus: String,

        #[arg(long, default_value = "")]
        title: String,

        #[arg(long = "abstract", default_value = "")]
        abstract_text: String,

        #[arg(long, default_value = "unigram")]
        granularity: Granularity,

        #[arg(long, default_value = "tfidf")]
        weighting: Weighting,

        /// Number of results
        #[arg(long, default_value_t = DEFAULT_TOP_K)]
        top_k: usize,

        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// List the configurations built for a corpus
    List {
        #[arg(long)]
        corpus: String,
    },
}

/// Initialize logging subsystem with the specified level
fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    Ok(())
}

fn run_normalize(input: &Path, output: &Path) -> Result<()> {
    let raw = Table::read(input).with_context(|| format!("Failed to read {}", input.display()))?;
    info!(rows = raw.len(), input = %input.display(), "normalizing corpus");
    let normalized = normalize_corpus(&TextNormalizer::english(), &raw)
        .context("Failed to normalize corpus")?;
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    normalized
        .write(output)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    info!(output = %output.display(), "normalized corpus written");
    Ok(())
}

fn run_build(
    store: &FsArtifactStore,
    corpus: &str,
    input: &Path,
    only: Option<FeatureConfig>,
) -> Result<()> {
    let table = Table::read(input).with_context(|| format!("Failed to read {}", input.display()))?;
    let documents = table
        .documents()
        .with_context(|| format!("Failed to read documents from {}", input.display()))?;
    let builder = RepresentationBuilder::new(TextNormalizer::english());

    match only {
        Some(config) => {
            builder
                .rebuild_one(corpus, &documents, config, store)
                .with_context(|| format!("Failed to rebuild {} for corpus {}", config, corpus))?;
            println!("rebuilt {}_{}", corpus, config);
        }
        None => {
            let report = builder
                .build(corpus, &documents, store)
                .with_context(|| format!("Failed to build corpus {}", corpus))?;
            for (config, artifact) in &report.artifacts {
                println!(
                    "{}_{}\t{} rows\t{} terms",
                    corpus,
                    config,
                    artifact.matrix.n_rows(),
                    artifact.vectorizer.dimension()
                );
            }
            if !report.malformed.is_empty() {
                println!("skipped {} blank rows", report.malformed.len());
            }
        }
    }
    Ok(())
}

fn print_hits(hits: &Hits, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(hits).context("Failed to encode results")?;
            println!("{}", json);
        }
        OutputFormat::Table => {
            println!("{:>4}  {:>8}  {:>8}  key", "rank", "index", "score");
            for (rank, hit) in hits.iter().enumerate() {
                println!("{:>4}  {:>8}  {:>8.4}  {}", rank + 1, hit.index, hit.score, hit.key);
            }
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level)?;
    debug!(?cli, "arguments parsed");

    let config = EngineConfig::new(cli.artifact_dir.clone());
    let store = FsArtifactStore::new(config.artifact_root.clone());

    match cli.command {
        Command::Normalize { input, output } => run_normalize(&input, &output),
        Command::Build {
            corpus,
            input,
            granularity,
            weighting,
        } => {
            let only = match (granularity, weighting) {
                (Some(g), Some(w)) => Some(FeatureConfig::new(g, w)),
                (None, None) => None,
                _ => bail!("--granularity and --weighting must be given together"),
            };
            run_build(&store, &corpus, &input, only)
        }
        Command::Search {
            corpus,
            title,
            abstract_text,
            granularity,
            weighting,
            top_k,
            format,
        } => {
            let config = config.with_top_k(top_k);
            let pipeline = QueryPipeline::new(TextNormalizer::english(), Arc::new(store), &config);
            let hits = pipeline
                .search(
                    QueryDocument::new(Some(&title), Some(&abstract_text)),
                    &corpus,
                    granularity,
                    weighting,
                )
                .with_context(|| format!("Search in corpus {} failed", corpus))?;
            print_hits(&hits, format)
        }
        Command::List { corpus } => {
            let built = store
                .list(&corpus)
                .with_context(|| format!("Failed to list artifacts of {}", corpus))?;
            if built.is_empty() {
                println!("no configurations built for {}", corpus);
            }
            for config in built {
                println!("{}\t{}", config.granularity, config.weighting);
            }
            Ok(())
        }
    }
}
