//! In-memory question/answer search: an inverted index for candidate
//! generation and a TF-IDF vector-space model for ranking, built once over a
//! static corpus and queried many times.

pub mod catalog;
pub mod document;
pub mod engine;
pub mod error;
pub mod index;
pub mod preprocess;
pub mod rank;
pub mod stopwords;

/// Dense column index of a term in the ranking vocabulary.
pub type TermId = u32;
/// Position of a document in the engine's document sequence.
pub type DocPosition = usize;

pub use catalog::{load_catalog, parse_catalog, QaPair};
pub use document::{Document, WordCounts};
pub use engine::{EngineConfig, ScoredResult, SearchEngine, DEFAULT_LIMIT};
pub use error::{Result, SearchError};
pub use index::InvertedIndex;
pub use rank::{TfidfRanker, Vocabulary};
pub use stopwords::{StopWordSet, TermFilter};
