use super::{CompileError, EngineFault, RegexEngine};
use crate::config::AutomataSettings;
use crate::pump::PumpStrategy;
use regex_automata::hybrid::{dfa, regex::Regex};
use regex_automata::{Input, MatchError, MatchErrorKind};

/// Lazy-DFA engine (`regex-automata`'s hybrid regex).
///
/// Matching is linear in the haystack, but the engine has an internal error
/// surface: it can give up when its state cache thrashes, or quit on bytes it
/// was told not to handle. Those errors are reported by name, the way a PCRE
/// adapter would report `PREG_*_ERROR` codes.
#[derive(Debug, Default, Clone)]
pub struct AutomataEngine {
    settings: AutomataSettings,
}

impl AutomataEngine {
    pub fn new(settings: AutomataSettings) -> Self {
        Self { settings }
    }

    fn dfa_config(&self) -> dfa::Config {
        let mut config = dfa::Config::new()
            .minimum_cache_clear_count(self.settings.minimum_cache_clear_count)
            .skip_cache_capacity_check(self.settings.skip_cache_capacity_check);
        if let Some(capacity) = self.settings.cache_capacity {
            config = config.cache_capacity(capacity);
        }
        config
    }
}

impl RegexEngine for AutomataEngine {
    type Compiled = Regex;

    fn name(&self) -> &'static str {
        "automata"
    }

    fn default_pump_strategy(&self) -> PumpStrategy {
        PumpStrategy::Naive
    }

    fn compile(&self, pattern: &str) -> Result<Self::Compiled, CompileError> {
        Regex::builder()
            .dfa(self.dfa_config())
            .build(pattern)
            .map_err(|e| CompileError {
                engine: self.name(),
                message: e.to_string(),
            })
    }

    fn search(compiled: &Self::Compiled, haystack: &str) -> Result<bool, EngineFault> {
        let mut cache = compiled.create_cache();
        compiled
            .try_search(&mut cache, &Input::new(haystack))
            .map(|found| found.is_some())
            .map_err(fault_from_match_error)
    }
}

/// Error-name table for search failures.
pub fn fault_name(kind: &MatchErrorKind) -> &'static str {
    match kind {
        MatchErrorKind::GaveUp { .. } => "GAVE_UP_ERROR",
        MatchErrorKind::Quit { .. } => "QUIT_ERROR",
        MatchErrorKind::HaystackTooLong { .. } => "HAYSTACK_TOO_LONG_ERROR",
        MatchErrorKind::UnsupportedAnchored { .. } => "UNSUPPORTED_ANCHORED_ERROR",
        _ => "INTERNAL_ERROR",
    }
}

fn fault_from_match_error(err: MatchError) -> EngineFault {
    EngineFault::new(fault_name(err.kind()), err.to_string())
}
