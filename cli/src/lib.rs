use anyhow::{Context, Result};
use qa_search_core::{load_catalog, EngineConfig, QaPair, ScoredResult, SearchEngine, StopWordSet};
use serde::Serialize;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use walkdir::WalkDir;

pub const NO_RESULTS_MESSAGE: &str = "Sorry, no results.";
pub const PROMPT: &str = "Enter a query: ";

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Serialize)]
pub struct SearchHit {
    pub position: usize,
    pub id: String,
    pub score: f64,
    pub question: String,
    pub answer: String,
}

impl From<&ScoredResult<'_, QaPair>> for SearchHit {
    fn from(r: &ScoredResult<'_, QaPair>) -> Self {
        let pair = r.document.payload();
        SearchHit {
            position: r.position,
            id: pair.id.clone(),
            score: r.score,
            question: pair.question.clone(),
            answer: pair.answer.clone(),
        }
    }
}

/// Catalog files under `input`: the file itself, or every .txt/.tsv file of a
/// directory tree in path order.
pub fn catalog_files(input: &Path) -> Vec<PathBuf> {
    if input.is_file() {
        return vec![input.to_path_buf()];
    }
    let mut files: Vec<PathBuf> = WalkDir::new(input)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| p.is_file())
        .filter(|p| matches!(p.extension().and_then(|s| s.to_str()), Some("txt" | "tsv")))
        .collect();
    files.sort();
    files
}

/// Load stop words and every catalog under `data`, then build the engine.
pub fn load_engine(data: &Path, stop_words: Option<&Path>, config: EngineConfig) -> Result<SearchEngine<QaPair>> {
    let start = Instant::now();
    let stop_words = match stop_words {
        Some(path) => StopWordSet::load(path).context("loading stop words")?,
        None => StopWordSet::english(),
    };
    let files = catalog_files(data);
    if files.is_empty() {
        anyhow::bail!("no catalog files found at {}", data.display());
    }

    tracing::info!(data = %data.display(), files = files.len(), "loading dataset");
    let mut engine = SearchEngine::with_config(stop_words, config);
    for file in files {
        let docs = load_catalog(&file).with_context(|| format!("loading catalog {}", file.display()))?;
        engine.add_documents(docs)?;
    }
    engine.build().context("building search engine")?;
    tracing::info!(docs = engine.document_count(), took_s = start.elapsed().as_secs_f64(), "done loading dataset");
    Ok(engine)
}

pub fn search(engine: &SearchEngine<QaPair>, query: &str, k: usize) -> Result<SearchResponse> {
    let start = Instant::now();
    let (hits, total_hits) = engine.search_with_total(query, k)?;
    let results: Vec<SearchHit> = hits.iter().map(SearchHit::from).collect();
    let took_s = start.elapsed().as_secs_f64();
    tracing::info!(query, total_hits, took_s, "search");
    Ok(SearchResponse { query: query.to_string(), took_s, total_hits, results })
}

/// One line per result, or the no-results message.
pub fn render_text(results: &[ScoredResult<'_, QaPair>]) -> String {
    if results.is_empty() {
        return NO_RESULTS_MESSAGE.to_string();
    }
    results.iter().map(|r| r.to_string()).collect::<Vec<_>>().join("\n")
}

/// Answer one query in the requested output format.
pub fn answer(engine: &SearchEngine<QaPair>, query: &str, k: usize, json: bool) -> Result<String> {
    if json {
        let response = search(engine, query, k)?;
        return Ok(serde_json::to_string_pretty(&response)?);
    }
    let start = Instant::now();
    let results = engine.search(query, k)?;
    tracing::info!(query, hits = results.len(), took_s = start.elapsed().as_secs_f64(), "search");
    Ok(render_text(&results))
}

/// Prompt for queries until an empty line or end of input.
pub fn run_interactive<R: BufRead, W: Write>(engine: &SearchEngine<QaPair>, mut input: R, mut output: W, k: usize, json: bool) -> Result<()> {
    let mut line = String::new();
    loop {
        write!(output, "\n{PROMPT}")?;
        output.flush()?;
        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        let query = line.trim();
        if query.is_empty() {
            break;
        }
        writeln!(output, "{}", answer(engine, query, k, json)?)?;
    }
    Ok(())
}
