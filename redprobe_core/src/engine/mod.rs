//! Regex engine adapters.
//!
//! Every engine is a [`RegexEngine`]: a compiler that can reject a pattern
//! and a searcher that either answers "match / no match" or reports a fault in
//! its own vocabulary. The probing pipeline is written once against this trait.

pub mod automata;
pub mod backtrack;

pub use automata::AutomataEngine;
pub use backtrack::BacktrackEngine;

use crate::pump::PumpStrategy;
use std::borrow::Cow;
use thiserror::Error;

/// Fault name used when an engine panics instead of returning.
pub const ENGINE_PANIC: &str = "ENGINE_PANIC";

/// The engine refused to compile a pattern.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{engine} engine rejected the pattern: {message}")]
pub struct CompileError {
    pub engine: &'static str,
    pub message: String,
}

/// A search ended without a verdict for a reason other than the budget.
///
/// `name` is what gets reported as `exceptionString`; `detail` only goes to
/// diagnostics.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{name}: {detail}")]
pub struct EngineFault {
    pub name: Cow<'static, str>,
    pub detail: String,
}

impl EngineFault {
    pub fn new(name: impl Into<Cow<'static, str>>, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            detail: detail.into(),
        }
    }

    pub fn panic(detail: impl Into<String>) -> Self {
        Self::new(ENGINE_PANIC, detail)
    }
}

pub trait RegexEngine {
    /// A compiled pattern. It is shared with the budget watchdog's worker
    /// thread, hence the bounds.
    type Compiled: Send + Sync + 'static;

    fn name(&self) -> &'static str;

    /// Strategy used to build attack strings for this engine unless
    /// configured otherwise.
    fn default_pump_strategy(&self) -> PumpStrategy;

    fn compile(&self, pattern: &str) -> Result<Self::Compiled, CompileError>;

    /// One unanchored search: `Ok(true)` if the pattern matches anywhere in
    /// `haystack`.
    fn search(compiled: &Self::Compiled, haystack: &str) -> Result<bool, EngineFault>;
}

/// Which adapter to run. Selected by config or on the command line.
#[derive(serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum EngineKind {
    #[default]
    Backtrack,
    Automata,
}

impl EngineKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineKind::Backtrack => "backtrack",
            EngineKind::Automata => "automata",
        }
    }
}
