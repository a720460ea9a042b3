use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading a pattern case. All of them are fatal: no
/// result document is produced for a case that cannot be loaded.
#[derive(Error, Debug)]
pub enum CaseError {
    #[error("Failed to read pattern case file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed JSON in pattern case: {0}")]
    Json(#[source] serde_json::Error),

    #[error("Pattern case must be a JSON object, found {0}")]
    NotAnObject(&'static str),

    #[error("Invalid pattern case: {0}")]
    Schema(#[source] serde_json::Error),
}

/// A literal prefix followed by the unit that gets repeated `nPumps` times.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PumpPair {
    #[serde(default)]
    pub prefix: String,
    pub pump: String,
}

impl PumpPair {
    pub fn new(prefix: impl Into<String>, pump: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            pump: pump.into(),
        }
    }
}

/// Recipe for the attack string: every pair in order, then the suffix.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct EvilInput {
    #[serde(default)]
    pub pump_pairs: Vec<PumpPair>,
    #[serde(default)]
    pub suffix: String,
}

/// The typed, validated view of the input fields of a pattern case.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PatternSpec {
    pub pattern: String,
    pub n_pumps: u64,
    /// Wall-clock match budget. Zero, negative, `null` or absent all mean
    /// "no budget".
    #[serde(default, rename = "timeoutMS")]
    pub timeout_ms: Option<i64>,
    pub evil_input: EvilInput,
}

/// A pattern case as loaded from disk.
///
/// Holds both the typed [`PatternSpec`] and the raw JSON object it came from.
/// The raw object is what gets written back, so fields this crate does not
/// understand (and their order) survive the run untouched.
#[derive(Debug, Clone)]
pub struct PatternCase {
    spec: PatternSpec,
    document: Map<String, Value>,
}

impl PatternCase {
    pub fn load_from_file(path: &Path) -> Result<Self, CaseError> {
        let content = std::fs::read_to_string(path).map_err(|source| CaseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> Result<Self, CaseError> {
        let value: Value = serde_json::from_str(content).map_err(CaseError::Json)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, CaseError> {
        let document = match value {
            Value::Object(map) => map,
            other => return Err(CaseError::NotAnObject(json_kind(&other))),
        };
        let spec = PatternSpec::deserialize(&Value::Object(document.clone()))
            .map_err(CaseError::Schema)?;
        Ok(Self { spec, document })
    }

    pub fn spec(&self) -> &PatternSpec {
        &self.spec
    }

    pub fn document(&self) -> &Map<String, Value> {
        &self.document
    }

    pub fn into_document(self) -> Map<String, Value> {
        self.document
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
