use super::{CompileError, EngineFault, RegexEngine};
use crate::pump::PumpStrategy;

/// Classical backtracking engine (`regress`, ECMAScript syntax).
///
/// Exhibits the super-linear behavior ReDoS probes look for and has no
/// runtime error surface of its own, so its only outcomes are match, no
/// match, or running out of budget.
#[derive(Debug, Default, Clone, Copy)]
pub struct BacktrackEngine;

impl RegexEngine for BacktrackEngine {
    type Compiled = regress::Regex;

    fn name(&self) -> &'static str {
        "backtrack"
    }

    fn default_pump_strategy(&self) -> PumpStrategy {
        PumpStrategy::Doubling
    }

    fn compile(&self, pattern: &str) -> Result<Self::Compiled, CompileError> {
        regress::Regex::new(pattern).map_err(|e| CompileError {
            engine: self.name(),
            message: e.to_string(),
        })
    }

    fn search(compiled: &Self::Compiled, haystack: &str) -> Result<bool, EngineFault> {
        Ok(compiled.find(haystack).is_some())
    }
}
