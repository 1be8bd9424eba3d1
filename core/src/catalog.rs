use crate::document::{Document, WordCounts};
use crate::error::{Result, SearchError};
use crate::preprocess::preprocess;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

const ID_FIELD: usize = 0;
const QUESTION_FIELD: usize = 1;
const ANSWER_FIELD: usize = 2;

/// Display payload of one question/answer record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaPair {
    pub id: String,
    pub question: String,
    pub answer: String,
}

impl fmt::Display for QaPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "question: {}, answer: {}, document: {}", self.question, self.answer, self.id)
    }
}

/// Turn one raw line into a document, or `None` when it has too few fields.
/// The question and every later field make up the indexed text.
fn parse_record(raw: &[u8]) -> Option<Document<QaPair>> {
    let fields = preprocess(raw);
    if fields.len() <= ANSWER_FIELD {
        return None;
    }
    let text = fields[QUESTION_FIELD..].join(" ");
    let pair = QaPair {
        id: fields[ID_FIELD].trim().to_string(),
        question: fields[QUESTION_FIELD].trim().to_string(),
        answer: fields[ANSWER_FIELD].trim().to_string(),
    };
    Some(Document::from_counts(pair.id.clone(), WordCounts::from_text(&text), pair))
}

/// Parse a whole catalog, one record per line in file order.
pub fn parse_catalog(bytes: &[u8]) -> Vec<Document<QaPair>> {
    let mut docs = Vec::new();
    for (i, line) in bytes.split(|&b| b == b'\n').enumerate() {
        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }
        match parse_record(line) {
            Some(doc) => docs.push(doc),
            None => tracing::warn!(line = i + 1, "skipping record with fewer than 3 fields"),
        }
    }
    docs
}

pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Vec<Document<QaPair>>> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| SearchError::Catalog { path: path.to_path_buf(), source })?;
    let docs = parse_catalog(&bytes);
    tracing::debug!(path = %path.display(), documents = docs.len(), "loaded catalog");
    Ok(docs)
}
