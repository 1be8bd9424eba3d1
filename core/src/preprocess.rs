use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Field separator after normalization; tabs in the raw record become this.
pub const FIELD_SEPARATOR: char = '|';

lazy_static! {
    static ref PUNCT_RE: Regex = Regex::new(r"[.?!:;(){}'\-\[\]$]+").expect("valid regex");
    // commas directly after a digit are kept, e.g. 1,000
    static ref COMMA_RE: Regex = Regex::new(r"(^|[^0-9]),+").expect("valid regex");
    static ref SPACE_RE: Regex = Regex::new(r"\s+").expect("valid regex");
}

/// Decode ISO-8859-1: each byte is the code point of the same value.
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// NFD-decompose and drop everything that is not ASCII.
pub fn strip_accents(text: &str) -> String {
    text.nfd().filter(char::is_ascii).collect()
}

/// Lower-case, turn tabs into field separators, strip accents, replace
/// punctuation runs with spaces and collapse whitespace.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase().replace('\t', "|");
    let stripped = strip_accents(lowered.trim());
    let no_punct = PUNCT_RE.replace_all(&stripped, " ");
    let no_commas = COMMA_RE.replace_all(&no_punct, "${1} ");
    SPACE_RE.replace_all(&no_commas, " ").into_owned()
}

/// Split one raw catalog line into its normalized fields.
pub fn preprocess(raw: &[u8]) -> Vec<String> {
    normalize(&decode_latin1(raw))
        .split(FIELD_SEPARATOR)
        .map(str::to_string)
        .collect()
}
