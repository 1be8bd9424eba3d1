use crate::document::Document;
use crate::error::{Result, SearchError};
use crate::index::InvertedIndex;
use crate::rank::TfidfRanker;
use crate::stopwords::{StopWordSet, TermFilter};
use crate::DocPosition;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of results returned when the caller does not ask for a limit.
pub const DEFAULT_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Additive smoothing applied to document counts in the IDF.
    pub smoothing: f64,
    /// Stop words longer than this many characters are still indexed.
    pub stop_word_max_len: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { smoothing: 1.0, stop_word_max_len: 5 }
    }
}

impl EngineConfig {
    /// Smoothing must be finite and non-negative, otherwise IDF weights stop
    /// being strictly positive and rows cannot be normalized.
    pub fn validate(&self) -> Result<()> {
        if !(self.smoothing.is_finite() && self.smoothing >= 0.0) {
            return Err(SearchError::InvalidConfig(format!(
                "smoothing must be a finite non-negative number, got {}",
                self.smoothing
            )));
        }
        Ok(())
    }
}

/// A matched document and its relevance score.
#[derive(Debug, Clone)]
pub struct ScoredResult<'a, P = String> {
    pub score: f64,
    pub position: DocPosition,
    pub document: &'a Document<P>,
}

impl<P: PartialEq> PartialEq for ScoredResult<'_, P> {
    /// Same document, scores equal within 1e-4.
    fn eq(&self, other: &Self) -> bool {
        (self.score - other.score).abs() < 1e-4 && self.document == other.document
    }
}

impl<P: fmt::Display> fmt::Display for ScoredResult<'_, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ranking score: {:.6}, {}", self.score, self.document.payload())
    }
}

#[derive(Debug)]
struct Built {
    index: InvertedIndex,
    ranker: TfidfRanker,
}

/// Build-once, query-many search engine.
///
/// Documents are added, then `build` seals the engine: afterwards it only
/// serves reads and can be shared across threads behind a shared reference.
#[derive(Debug)]
pub struct SearchEngine<P = String> {
    documents: Vec<Document<P>>,
    filter: TermFilter,
    config: EngineConfig,
    built: Option<Built>,
}

impl<P> SearchEngine<P> {
    pub fn new(stop_words: StopWordSet) -> Self {
        Self::with_config(stop_words, EngineConfig::default())
    }

    pub fn with_config(stop_words: StopWordSet, config: EngineConfig) -> Self {
        Self {
            documents: Vec::new(),
            filter: TermFilter::new(stop_words, config.stop_word_max_len),
            config,
            built: None,
        }
    }

    pub fn add_document(&mut self, doc: Document<P>) -> Result<()> {
        if self.built.is_some() {
            return Err(SearchError::AlreadyBuilt);
        }
        self.documents.push(doc);
        Ok(())
    }

    /// Add every document of `docs`, in order.
    pub fn add_documents<I: IntoIterator<Item = Document<P>>>(&mut self, docs: I) -> Result<()> {
        if self.built.is_some() {
            return Err(SearchError::AlreadyBuilt);
        }
        self.documents.extend(docs);
        Ok(())
    }

    /// Build the inverted index and the ranker over the documents added so far.
    pub fn build(&mut self) -> Result<()> {
        if self.built.is_some() {
            return Err(SearchError::AlreadyBuilt);
        }
        self.config.validate()?;
        tracing::info!(documents = self.documents.len(), "starting search engine");
        let index = InvertedIndex::build(&self.documents, &self.filter);
        let ranker = TfidfRanker::build(&self.documents, &self.filter, self.config.smoothing)?;
        tracing::debug!(terms = ranker.vocabulary().len(), postings = index.len(), "search engine built");
        self.built = Some(Built { index, ranker });
        Ok(())
    }

    /// Documents containing every query word, best first, at most `limit` of them.
    ///
    /// The query is lower-cased and split on whitespace. Ties keep document order.
    pub fn search(&self, query: &str, limit: usize) -> Result<Vec<ScoredResult<'_, P>>> {
        self.search_with_total(query, limit).map(|(results, _)| results)
    }

    /// Like `search`, also returning the number of matching documents before truncation.
    pub fn search_with_total(&self, query: &str, limit: usize) -> Result<(Vec<ScoredResult<'_, P>>, usize)> {
        let built = self.built.as_ref().ok_or(SearchError::NotBuilt)?;
        let terms = query_terms(query);
        if terms.is_empty() {
            return Ok((Vec::new(), 0));
        }
        let candidates = built.index.lookup(&terms);
        let total = candidates.len();
        let mut results: Vec<ScoredResult<'_, P>> = candidates
            .into_iter()
            .map(|pos| ScoredResult {
                score: built.ranker.score(pos, &terms),
                position: pos,
                document: &self.documents[pos],
            })
            .collect();
        results.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.position.cmp(&b.position)));
        results.truncate(limit);
        tracing::debug!(terms = terms.len(), candidates = total, returned = results.len(), "search");
        Ok((results, total))
    }

    /// Number of candidates for `query` before truncation.
    pub fn count_matches(&self, query: &str) -> Result<usize> {
        let built = self.built.as_ref().ok_or(SearchError::NotBuilt)?;
        Ok(built.index.lookup(&query_terms(query)).len())
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    pub fn document(&self, pos: DocPosition) -> Option<&Document<P>> {
        self.documents.get(pos)
    }

    pub fn is_built(&self) -> bool {
        self.built.is_some()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The ranker, once built.
    pub fn ranker(&self) -> Option<&TfidfRanker> {
        self.built.as_ref().map(|b| &b.ranker)
    }

    /// The inverted index, once built.
    pub fn index(&self) -> Option<&InvertedIndex> {
        self.built.as_ref().map(|b| &b.index)
    }
}

fn query_terms(query: &str) -> Vec<String> {
    query.to_lowercase().split_whitespace().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(texts: &[&str]) -> SearchEngine {
        let mut engine = SearchEngine::new(["the", "is"].into_iter().collect());
        for (i, t) in texts.iter().enumerate() {
            engine.add_document(Document::new((i + 1).to_string(), t, t.to_string())).unwrap();
        }
        engine.build().unwrap();
        engine
    }

    #[test]
    fn search_before_build_is_rejected() {
        let mut engine: SearchEngine = SearchEngine::new(StopWordSet::default());
        engine.add_document(Document::new("1", "cat", "cat".to_string())).unwrap();
        assert!(matches!(engine.search("cat", 10), Err(SearchError::NotBuilt)));
        assert!(matches!(engine.count_matches("cat"), Err(SearchError::NotBuilt)));
    }

    #[test]
    fn engine_is_sealed_after_build() {
        let mut engine = engine(&["the cat sat"]);
        let err = engine.add_document(Document::new("2", "dog", "dog".to_string())).unwrap_err();
        assert!(matches!(err, SearchError::AlreadyBuilt));
        assert!(matches!(engine.build(), Err(SearchError::AlreadyBuilt)));
        assert_eq!(engine.document_count(), 1);
    }

    #[test]
    fn both_documents_match_shared_term() {
        let engine = engine(&["the cat sat", "the dog sat quietly"]);
        let results = engine.search("sat", DEFAULT_LIMIT).unwrap();
        assert_eq!(results.len(), 2);
        // "sat" weighs more in the shorter document
        assert_eq!(results[0].document.id(), "1");
        assert!(results[0].score >= results[1].score);
    }

    #[test]
    fn query_is_case_insensitive_and_and_combined() {
        let engine = engine(&["apple banana", "apple cherry", "banana cherry apple"]);
        let ids: Vec<&str> = engine
            .search("  APPLE   Cherry ", 10)
            .unwrap()
            .iter()
            .map(|r| r.document.id())
            .collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec!["2", "3"]);
    }

    #[test]
    fn empty_and_unmatched_queries_return_nothing() {
        let engine = engine(&["the cat sat"]);
        assert!(engine.search("", 10).unwrap().is_empty());
        assert!(engine.search("   \t ", 10).unwrap().is_empty());
        assert!(engine.search("unicorn", 10).unwrap().is_empty());
        assert!(engine.search("cat unicorn", 10).unwrap().is_empty());
        assert!(engine.search("the", 10).unwrap().is_empty());
    }

    #[test]
    fn limit_truncates_to_best() {
        let engine = engine(&["sat sat mat", "sat cat dog fox", "sat"]);
        let all = engine.search("sat", 10).unwrap();
        let top = engine.search("sat", 1).unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!(top[0], all[0]);
        assert_eq!(all[0].document.id(), "3");
        assert!(engine.search("sat", 0).unwrap().is_empty());
        assert_eq!(engine.count_matches("sat").unwrap(), 3);
    }

    #[test]
    fn ties_keep_document_order() {
        let engine = engine(&["dup words", "other", "dup words"]);
        let results = engine.search("dup", 10).unwrap();
        let positions: Vec<usize> = results.iter().map(|r| r.position).collect();
        assert_eq!(positions, vec![0, 2]);
    }

    #[test]
    fn repeated_search_is_stable() {
        let engine = engine(&["apple banana", "banana banana", "banana cherry"]);
        let first = engine.search("banana", 10).unwrap();
        let second = engine.search("banana", 10).unwrap();
        assert_eq!(first, second);
        let order: Vec<usize> = first.iter().map(|r| r.position).collect();
        let again: Vec<usize> = second.iter().map(|r| r.position).collect();
        assert_eq!(order, again);
    }

    #[test]
    fn results_format_score_and_payload() {
        let engine = engine(&["lonely"]);
        let results = engine.search("lonely", 10).unwrap();
        assert_eq!(results[0].to_string(), "Ranking score: 1.000000, lonely");
    }

    #[test]
    fn result_equality_tolerates_small_score_drift() {
        let doc = Document::new("1", "a", "a".to_string());
        let a = ScoredResult { score: 0.5, position: 0, document: &doc };
        let b = ScoredResult { score: 0.50005, position: 0, document: &doc };
        let c = ScoredResult { score: 0.51, position: 0, document: &doc };
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn custom_config_changes_filter_threshold() {
        let config = EngineConfig { smoothing: 1.0, stop_word_max_len: 2 };
        let mut engine: SearchEngine = SearchEngine::with_config(["the", "is"].into_iter().collect(), config);
        engine.add_document(Document::new("1", "the cat is", "x".to_string())).unwrap();
        engine.build().unwrap();
        assert_eq!(engine.search("the", 10).unwrap().len(), 1);
        assert!(engine.search("is", 10).unwrap().is_empty());
    }

    #[test]
    fn add_documents_is_rejected_after_build() {
        let mut engine: SearchEngine = SearchEngine::new(StopWordSet::default());
        engine
            .add_documents(vec![
                Document::new("1", "a b", "1".to_string()),
                Document::new("2", "b c", "2".to_string()),
            ])
            .unwrap();
        engine.build().unwrap();
        let err = engine.add_documents(vec![Document::new("3", "c", "3".to_string())]).unwrap_err();
        assert!(matches!(err, SearchError::AlreadyBuilt));
        assert_eq!(engine.document_count(), 2);
        assert_eq!(engine.search("b", 10).unwrap().len(), 2);
    }

    #[test]
    fn invalid_smoothing_fails_build() {
        for smoothing in [-1.0, -0.5, -3.0, f64::NAN, f64::INFINITY] {
            let config = EngineConfig { smoothing, ..EngineConfig::default() };
            let mut engine: SearchEngine = SearchEngine::with_config(StopWordSet::default(), config);
            engine.add_documents(vec![Document::new("1", "a b", "1".to_string()), Document::new("2", "a", "2".to_string())]).unwrap();
            assert!(matches!(engine.build(), Err(SearchError::InvalidConfig(_))), "smoothing {smoothing} accepted");
            assert!(!engine.is_built());
        }
    }

    #[test]
    fn zero_smoothing_keeps_rows_normalized() {
        let config = EngineConfig { smoothing: 0.0, ..EngineConfig::default() };
        let mut engine: SearchEngine = SearchEngine::with_config(StopWordSet::default(), config);
        engine.add_documents(vec![Document::new("1", "a b", "1".to_string()), Document::new("2", "a", "2".to_string())]).unwrap();
        engine.build().unwrap();
        let results = engine.search("a", 10).unwrap();
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.score > 0.0));
        assert!((results[0].score - 1.0).abs() < 1e-12);
    }

    #[test]
    fn total_counts_matches_before_truncation() {
        let engine = engine(&["sat mat", "sat", "dog", "sat cat"]);
        let (results, total) = engine.search_with_total("sat", 1).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(total, 3);
        assert_eq!(total, engine.count_matches("sat").unwrap());
        assert_eq!(engine.search_with_total("", 5).unwrap().1, 0);
        assert_eq!(engine.search_with_total("unicorn", 5).unwrap().1, 0);
    }

    #[test]
    fn built_engine_is_shareable_across_threads() {
        fn assert_sync<T: Send + Sync>() {}
        assert_sync::<SearchEngine>();
        let engine = engine(&["the cat sat", "the dog sat quietly"]);
        std::thread::scope(|s| {
            let handles: Vec<_> = (0..4).map(|_| s.spawn(|| engine.search("sat", 10).unwrap().len())).collect();
            for h in handles {
                assert_eq!(h.join().unwrap(), 2);
            }
        });
    }
}
