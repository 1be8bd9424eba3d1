use std::collections::HashMap;
use std::fmt;

/// Per-document term counts. Iteration follows first-occurrence order so that
/// everything derived from it (vocabulary columns in particular) is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordCounts {
    order: Vec<String>,
    counts: HashMap<String, u32>,
}

impl WordCounts {
    /// Count whitespace-separated words of `text`.
    pub fn from_text(text: &str) -> Self {
        let mut wc = Self::default();
        for word in text.split_whitespace() {
            wc.add(word, 1);
        }
        wc
    }

    fn add(&mut self, word: &str, n: u32) {
        match self.counts.get_mut(word) {
            Some(c) => *c += n,
            None => {
                self.order.push(word.to_string());
                self.counts.insert(word.to_string(), n);
            }
        }
    }

    /// Count of `word`, zero when absent.
    pub fn count(&self, word: &str) -> u32 {
        self.counts.get(word).copied().unwrap_or(0)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.counts.contains_key(word)
    }

    /// Words with their counts, in first-occurrence order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.order.iter().map(move |w| (w.as_str(), self.counts[w]))
    }

    /// Number of distinct words.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<(S, u32)> for WordCounts {
    fn from_iter<I: IntoIterator<Item = (S, u32)>>(iter: I) -> Self {
        let mut wc = Self::default();
        for (word, n) in iter {
            wc.add(word.as_ref(), n);
        }
        wc
    }
}

/// One corpus record as a bag of words, plus the payload shown in results.
///
/// The word counts are fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Document<P = String> {
    id: String,
    word_counts: WordCounts,
    payload: P,
}

impl<P> Document<P> {
    /// Build a document whose word counts come from whitespace-splitting `text`.
    pub fn new(id: impl Into<String>, text: &str, payload: P) -> Self {
        Self::from_counts(id, WordCounts::from_text(text), payload)
    }

    pub fn from_counts(id: impl Into<String>, word_counts: WordCounts, payload: P) -> Self {
        Self { id: id.into(), word_counts, payload }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn word_counts(&self) -> &WordCounts {
        &self.word_counts
    }

    pub fn payload(&self) -> &P {
        &self.payload
    }
}

impl<P> fmt::Display for Document<P> {
    /// Shows the id and up to ten of the document's words.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let words: Vec<&str> = self.word_counts.iter().take(10).map(|(w, _)| w).collect();
        write!(f, "{}: {}", self.id, words.join(" "))
    }
}
