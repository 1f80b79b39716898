use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use tracing::{debug, warn};

static ARRAY_SPAN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\[.*\]").expect("array span regex"));

/// One source sentence and its translation. The index in the containing `Vec` is the alignment key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SentencePair {
    pub src: String,
    pub tgt: String,
}

/// Why a candidate text was not accepted as a pair array.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejection {
    Syntax,
    NotArray,
    Empty,
    MissingKeys,
    NoBrackets,
}

/// Recover sentence pairs from a model response.
///
/// The whole trimmed response is tried first; if that is not a usable pair array, the greedy
/// `[ ... ]` span (first `[` to last `]`) is tried. `None` means the response carries no structured
/// output and the caller should render it as plain text.
pub fn extract_pairs(response: &str) -> Option<Vec<SentencePair>> {
    let text = response.trim();
    let outcome = parse_pairs(text).or_else(|strict| {
        debug!(reason = ?strict, "strict pair parse rejected");
        bracket_span(text).ok_or(Rejection::NoBrackets).and_then(parse_pairs)
    });
    match outcome {
        Ok(pairs) => {
            debug!(pairs = pairs.len(), "sentence pairs extracted");
            Some(pairs)
        }
        Err(reason) => {
            debug!(?reason, "no sentence pairs in response");
            None
        }
    }
}

/// The greedy substring from the first `[` to the last `]`, inclusive.
pub fn bracket_span(text: &str) -> Option<&str> {
    ARRAY_SPAN_RE.find(text).map(|m| m.as_str())
}

/// Parse `candidate` as a JSON array of `{src, tgt}` objects.
///
/// Only the first element is shape-checked. Later elements are converted leniently: missing keys
/// become empty strings and non-object elements are skipped.
pub fn parse_pairs(candidate: &str) -> Result<Vec<SentencePair>, Rejection> {
    let value: Value = serde_json::from_str(candidate).map_err(|_| Rejection::Syntax)?;
    let Value::Array(items) = value else {
        return Err(Rejection::NotArray);
    };
    let first = items.first().ok_or(Rejection::Empty)?;
    match first {
        Value::Object(obj) if obj.contains_key("src") && obj.contains_key("tgt") => {}
        _ => return Err(Rejection::MissingKeys),
    }

    let mut pairs = Vec::with_capacity(items.len());
    for (idx, item) in items.iter().enumerate() {
        match item {
            Value::Object(obj) => pairs.push(SentencePair {
                src: field_text(obj, "src"),
                tgt: field_text(obj, "tgt"),
            }),
            other => warn!(idx, element = %other, "skipping non-object pair element"),
        }
    }
    Ok(pairs)
}

fn field_text(obj: &Map<String, Value>, key: &str) -> String {
    match obj.get(key) {
        Some(Value::String(s)) => s.clone(),
        None | Some(Value::Null) => String::new(),
        Some(other) => other.to_string(),
    }
}

/// The plain translation carried by a pair list.
pub fn joined_translation(pairs: &[SentencePair]) -> String {
    pairs
        .iter()
        .map(|p| p.tgt.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}
