use crate::case::PatternCase;
use crate::engine::{CompileError, RegexEngine};
use crate::executor::{BudgetedExecutor, MatchBudget, panic_message};
use crate::oracle::{Verdict, VerdictOracle};
use crate::pump::{PumpError, PumpStrategy, build_attack_string};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// The build / validate / match pipeline for one engine.
///
/// A run is a single attempt: `START -> VALIDATING -> {INVALID, VALID}`, then
/// `VALID -> MATCHING -> {MATCHED, NOT_MATCHED, TIMED_OUT, FAULTED}`. Nothing
/// is retried.
pub struct Prober<E: RegexEngine> {
    engine: E,
    strategy: PumpStrategy,
    oracle: VerdictOracle,
}

impl<E> Prober<E>
where
    E: RegexEngine + 'static,
{
    pub fn new(engine: E) -> Self {
        let strategy = engine.default_pump_strategy();
        Self {
            engine,
            strategy,
            oracle: VerdictOracle::new(),
        }
    }

    pub fn with_pump_strategy(mut self, strategy: PumpStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn pump_strategy(&self) -> PumpStrategy {
        self.strategy
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Runs one pattern case. Engine failures of any kind end up in the
    /// returned [`Verdict`]; only an attack string that cannot be built is an
    /// error.
    pub fn probe(&self, case: &PatternCase) -> Result<Verdict, PumpError> {
        let spec = case.spec();

        debug!(
            "Constructing attack string with {} strategy",
            self.strategy.as_str()
        );
        let attack = build_attack_string(spec.n_pumps, &spec.evil_input, self.strategy)?;
        info!(
            "Attack string: {} chars ({} bytes), {} pumps, md5 {}",
            attack.char_len(),
            attack.byte_len(),
            spec.n_pumps,
            attack.fingerprint()
        );

        let budget = MatchBudget::from_timeout_ms(spec.timeout_ms);
        match (spec.timeout_ms, budget.limit()) {
            (_, Some(limit)) => info!("Using timeoutMS {}", limit.as_millis()),
            (Some(ms), None) => {
                warn!("timeoutMS must be > 0 (got {ms}), using no timeout instead")
            }
            (None, None) => debug!("No timeoutMS given, matching without a budget"),
        }

        let compiled = match self.validate(&spec.pattern) {
            Ok(compiled) => Arc::new(compiled),
            Err(e) => {
                info!("Invalid pattern: {e}");
                return Ok(self.oracle.invalid_pattern());
            }
        };
        info!("Valid pattern for {} engine", self.engine.name());

        info!("Attempting match");
        let started = Instant::now();
        let status = BudgetedExecutor::new(budget).execute_sync::<E>(&compiled, &attack);
        info!("Match attempt ended after {:?}: {status:?}", started.elapsed());

        Ok(self.oracle.examine(&attack, &status))
    }

    /// Compiles the pattern on its own so a compile failure can never be
    /// mistaken for a match-time fault.
    fn validate(&self, pattern: &str) -> Result<E::Compiled, CompileError> {
        let compiled = catch_unwind(AssertUnwindSafe(|| self.engine.compile(pattern)));
        compiled.unwrap_or_else(|payload| {
            Err(CompileError {
                engine: self.engine.name(),
                message: format!("compiler panicked: {}", panic_message(payload.as_ref())),
            })
        })
    }
}
