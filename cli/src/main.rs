use anyhow::Result;
use clap::Parser;
use qa_search::{answer, load_engine, run_interactive};
use qa_search_core::{EngineConfig, DEFAULT_LIMIT};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "qa-search")]
#[command(about = "Search question/answer pairs with a TF-IDF ranked inverted index", long_about = None)]
struct Cli {
    /// Catalog file, or a directory of .txt/.tsv catalogs, to index
    #[arg(short, long, default_value = "data/question_answer_pairs.txt")]
    data: PathBuf,
    /// Newline-delimited stop-word list; the built-in English list when omitted
    #[arg(long)]
    stop_words: Option<PathBuf>,
    /// Maximum number of results per query
    #[arg(short = 'k', long, default_value_t = DEFAULT_LIMIT)]
    limit: usize,
    /// Additive smoothing for document frequencies in the IDF
    #[arg(long, default_value_t = 1.0)]
    smoothing: f64,
    /// Run a single query and exit instead of prompting
    #[arg(short, long)]
    query: Option<String>,
    /// Print results as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(io::stderr).init();
    let cli = Cli::parse();

    let config = EngineConfig { smoothing: cli.smoothing, ..EngineConfig::default() };
    let engine = load_engine(&cli.data, cli.stop_words.as_deref(), config)?;

    match cli.query {
        Some(query) => {
            println!("{}", answer(&engine, &query, cli.limit, cli.json)?);
            Ok(())
        }
        None => run_interactive(&engine, io::stdin().lock(), io::stdout().lock(), cli.limit, cli.json),
    }
}
