use std::io;
use std::path::PathBuf;

/// Errors raised by the search core.
#[derive(thiserror::Error, Debug)]
pub enum SearchError {
    /// The stop-word list could not be read.
    #[error("failed to read stop words from {}: {source}", path.display())]
    StopWords { path: PathBuf, source: io::Error },
    /// A catalog file could not be read.
    #[error("failed to read catalog {}: {source}", path.display())]
    Catalog { path: PathBuf, source: io::Error },
    /// `search` was called before `build`.
    #[error("search engine has not been built yet")]
    NotBuilt,
    /// An engine setting is out of range.
    #[error("invalid engine configuration: {0}")]
    InvalidConfig(String),
    /// More distinct terms than a `TermId` can address.
    #[error("vocabulary exceeds {} terms", crate::TermId::MAX)]
    VocabularyOverflow,
    /// The engine is sealed: documents cannot be added and it cannot be rebuilt.
    #[error("search engine is already built")]
    AlreadyBuilt,
}

pub type Result<T> = std::result::Result<T, SearchError>;
