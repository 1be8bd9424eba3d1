use crate::document::Document;
use crate::stopwords::TermFilter;
use crate::DocPosition;
use std::collections::HashMap;

/// Maps each indexed term to the ascending positions of the documents containing it.
#[derive(Debug, Default)]
pub struct InvertedIndex {
    postings: HashMap<String, Vec<DocPosition>>,
}

impl InvertedIndex {
    /// Index `documents` in order. A document is listed at most once per term,
    /// so every postings list is strictly ascending.
    pub fn build<P>(documents: &[Document<P>], filter: &TermFilter) -> Self {
        let mut postings: HashMap<String, Vec<DocPosition>> = HashMap::new();
        for (pos, doc) in documents.iter().enumerate() {
            for (term, _count) in filter.terms(doc) {
                postings.entry(term.to_string()).or_default().push(pos);
            }
        }
        Self { postings }
    }

    /// Positions of documents containing every one of `terms`.
    ///
    /// Empty when `terms` is empty or any term is not indexed.
    pub fn lookup<S: AsRef<str>>(&self, terms: &[S]) -> Vec<DocPosition> {
        let mut lists: Vec<&[DocPosition]> = Vec::with_capacity(terms.len());
        for term in terms {
            match self.postings.get(term.as_ref()) {
                Some(list) => lists.push(list),
                None => return Vec::new(),
            }
        }
        lists.sort_by_key(|l| l.len());
        let mut lists = lists.into_iter();
        let mut result = match lists.next() {
            Some(first) => first.to_vec(),
            None => return Vec::new(),
        };
        for list in lists {
            if result.is_empty() {
                break;
            }
            result = intersect(&result, list);
        }
        result
    }

    pub fn postings(&self, term: &str) -> Option<&[DocPosition]> {
        self.postings.get(term).map(Vec::as_slice)
    }

    /// Number of indexed terms.
    pub fn len(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }
}

fn intersect(a: &[DocPosition], b: &[DocPosition]) -> Vec<DocPosition> {
    let mut out = Vec::with_capacity(a.len().min(b.len()));
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        if a[i] < b[j] {
            i += 1;
        } else if a[i] > b[j] {
            j += 1;
        } else {
            out.push(a[i]);
            i += 1;
            j += 1;
        }
    }
    out
}
