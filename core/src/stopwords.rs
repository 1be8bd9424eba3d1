use crate::document::Document;
use crate::error::{Result, SearchError};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

const ENGLISH: &[&str] = &[
    "a","about","above","after","again","against","all","am","an","and","any","are","aren't","as","at",
    "be","because","been","before","being","below","between","both","but","by",
    "can","can't","cannot","could","couldn't",
    "did","didn't","do","does","doesn't","doing","don't","down","during",
    "each","few","for","from","further",
    "had","hadn't","has","hasn't","have","haven't","having","he","he'd","he'll","he's","her","here","here's","hers","herself","him","himself","his","how","how's",
    "i","i'd","i'll","i'm","i've","if","in","into","is","isn't","it","it's","its","itself",
    "let's","me","more","most","mustn't","my","myself",
    "no","nor","not","of","off","on","once","only","or","other","ought","our","ours","ourselves","out","over","own",
    "same","she","she'd","she'll","she's","should","shouldn't","so","some","such",
    "than","that","that's","the","their","theirs","them","themselves","then","there","there's","these","they","they'd","they'll","they're","they've","this","those","through","to","too",
    "under","until","up","very",
    "was","wasn't","we","we'd","we'll","we're","we've","were","weren't","what","what's","when","when's","where","where's","which","while","who","who's","whom","why","why's","with","won't","would","wouldn't",
    "you","you'd","you'll","you're","you've","your","yours","yourself","yourselves"
];

/// Immutable set of low-information words.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopWordSet {
    words: HashSet<String>,
}

impl StopWordSet {
    /// Built-in English list, used when no stop-word file is given.
    pub fn english() -> Self {
        ENGLISH.iter().copied().collect()
    }

    /// Parse a newline-delimited list. Lines are trimmed; blank lines are ignored.
    pub fn parse(text: &str) -> Self {
        text.lines().map(str::trim).filter(|w| !w.is_empty()).collect()
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|source| SearchError::StopWords { path: path.to_path_buf(), source })?;
        let set = Self::parse(&text);
        tracing::debug!(path = %path.display(), words = set.len(), "loaded stop words");
        Ok(set)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for StopWordSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self { words: iter.into_iter().map(Into::into).collect() }
    }
}

/// Decides which words of a document are indexed and ranked.
///
/// A word is kept unless it is a stop word of at most `max_len` characters.
/// Index and ranker must enumerate terms through the same filter, otherwise
/// postings and vocabulary drift apart.
#[derive(Debug, Clone)]
pub struct TermFilter {
    stop_words: StopWordSet,
    max_len: usize,
}

impl TermFilter {
    pub fn new(stop_words: StopWordSet, max_len: usize) -> Self {
        Self { stop_words, max_len }
    }

    pub fn keeps(&self, word: &str) -> bool {
        !self.stop_words.contains(word) || word.chars().count() > self.max_len
    }

    /// Eligible terms of `doc` with their counts, in the document's word order.
    pub fn terms<'a, P>(&'a self, doc: &'a Document<P>) -> impl Iterator<Item = (&'a str, u32)> + 'a {
        doc.word_counts().iter().filter(move |(w, _)| self.keeps(w))
    }

    pub fn stop_words(&self) -> &StopWordSet {
        &self.stop_words
    }
}
