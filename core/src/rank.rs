//! TF-IDF vector-space ranking.
//!
//! The term-frequency matrix is stored row-sparse: one row per document, each
//! row a list of `(term, value)` pairs sorted by term id. Weights are
//! `tf * idf` with `idf = ln((N + s) / (df + s)) + 1`, and every row is scaled
//! to unit Euclidean norm (all-zero rows stay zero).

use crate::document::Document;
use crate::error::{Result, SearchError};
use crate::stopwords::TermFilter;
use crate::{DocPosition, TermId};
use std::collections::HashMap;

/// Term to dense column index, assigned in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    ids: HashMap<String, TermId>,
    terms: Vec<String>,
}

impl Vocabulary {
    pub fn build<P>(documents: &[Document<P>], filter: &TermFilter) -> Result<Self> {
        let mut vocab = Self::default();
        for doc in documents {
            for (term, _count) in filter.terms(doc) {
                if !vocab.ids.contains_key(term) {
                    vocab.ids.insert(term.to_string(), next_term_id(vocab.terms.len())?);
                    vocab.terms.push(term.to_string());
                }
            }
        }
        Ok(vocab)
    }

    pub fn id(&self, term: &str) -> Option<TermId> {
        self.ids.get(term).copied()
    }

    pub fn term(&self, id: TermId) -> Option<&str> {
        self.terms.get(id as usize).map(String::as_str)
    }

    /// Terms in column order.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

fn next_term_id(len: usize) -> Result<TermId> {
    TermId::try_from(len).map_err(|_| SearchError::VocabularyOverflow)
}

type SparseRow = Vec<(TermId, f64)>;

#[derive(Debug, Clone)]
pub struct TfidfRanker {
    vocabulary: Vocabulary,
    document_frequency: Vec<u32>,
    idf: Vec<f64>,
    rows: Vec<SparseRow>,
}

impl TfidfRanker {
    /// `smoothing` is expected to be finite and non-negative; see `EngineConfig::validate`.
    pub fn build<P>(documents: &[Document<P>], filter: &TermFilter, smoothing: f64) -> Result<Self> {
        let vocabulary = Vocabulary::build(documents, filter)?;
        let n_terms = vocabulary.len();

        let mut document_frequency = vec![0u32; n_terms];
        let mut rows: Vec<SparseRow> = Vec::with_capacity(documents.len());
        for doc in documents {
            let mut row: SparseRow = filter
                .terms(doc)
                .filter(|&(_, count)| count > 0)
                .filter_map(|(term, count)| vocabulary.id(term).map(|id| (id, count as f64)))
                .collect();
            row.sort_unstable_by_key(|&(id, _)| id);
            for &(id, _) in &row {
                document_frequency[id as usize] += 1;
            }
            rows.push(row);
        }

        let n_docs = documents.len() as f64;
        let idf: Vec<f64> = document_frequency
            .iter()
            .map(|&df| ((n_docs + smoothing) / (df as f64 + smoothing)).ln() + 1.0)
            .collect();

        for row in rows.iter_mut() {
            let mut norm = 0.0f64;
            for (id, w) in row.iter_mut() {
                *w *= idf[*id as usize];
                norm += *w * *w;
            }
            if norm > 0.0 {
                let inv = 1.0 / norm.sqrt();
                for (_, w) in row.iter_mut() {
                    *w *= inv;
                }
            }
        }

        Ok(Self { vocabulary, document_frequency, idf, rows })
    }

    /// Normalized weight of `term` in the document at `pos`; zero for unknown terms.
    pub fn weight(&self, pos: DocPosition, term: &str) -> f64 {
        let (Some(id), Some(row)) = (self.vocabulary.id(term), self.rows.get(pos)) else {
            return 0.0;
        };
        match row.binary_search_by_key(&id, |&(t, _)| t) {
            Ok(i) => row[i].1,
            Err(_) => 0.0,
        }
    }

    /// Sum of the document's weights for each query term. Terms outside the
    /// vocabulary contribute nothing.
    pub fn score<S: AsRef<str>>(&self, pos: DocPosition, terms: &[S]) -> f64 {
        terms.iter().map(|t| self.weight(pos, t.as_ref())).sum()
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Documents containing each term, indexed by term id (without smoothing).
    pub fn document_frequency(&self) -> &[u32] {
        &self.document_frequency
    }

    pub fn idf(&self) -> &[f64] {
        &self.idf
    }

    /// Non-zero normalized weights of one document, sorted by term id.
    pub fn row(&self, pos: DocPosition) -> Option<&[(TermId, f64)]> {
        self.rows.get(pos).map(Vec::as_slice)
    }

    pub fn num_documents(&self) -> usize {
        self.rows.len()
    }
}
