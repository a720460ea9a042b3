use crate::case::PatternCase;
use crate::oracle::{Matched, Verdict};
use serde_json::{Map, Value};
use std::io::Write;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to serialize result document: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Failed to write result document: {0}")]
    Io(#[from] std::io::Error),
}

/// Adds the verdict's output fields to `document`.
///
/// Existing keys keep their position and get the new value; missing keys are
/// appended. Fields the verdict leaves unset are not touched.
pub fn merge_verdict(document: &mut Map<String, Value>, verdict: &Verdict) {
    if let Some(len) = verdict.input_length {
        document.insert("inputLength".to_string(), Value::from(len));
    }
    if let Some(matched) = verdict.matched {
        let value = match matched {
            Matched::Flag(flag) => Value::Bool(flag),
            Matched::Count(n) => Value::from(n),
        };
        document.insert("matched".to_string(), value);
    }
    document.insert(
        "exceptionString".to_string(),
        Value::String(verdict.exception_string.clone()),
    );
}

/// Writes the merged document as a single JSON line. This is the only thing
/// the prober ever writes to its output stream.
pub fn write_report<W: Write>(
    mut out: W,
    case: PatternCase,
    verdict: &Verdict,
) -> Result<(), ReportError> {
    let mut document = case.into_document();
    merge_verdict(&mut document, verdict);
    serde_json::to_writer(&mut out, &document)?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}
