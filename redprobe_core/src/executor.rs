use crate::engine::{EngineFault, RegexEngine};
use crate::input::AttackString;
use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

/// Optional wall-clock limit on a single match attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatchBudget(Option<Duration>);

impl MatchBudget {
    pub const UNBOUNDED: MatchBudget = MatchBudget(None);

    /// `timeoutMS` semantics: only a positive value bounds the match. Zero,
    /// negative and absent values all mean "run to completion".
    pub fn from_timeout_ms(timeout_ms: Option<i64>) -> Self {
        match timeout_ms {
            Some(ms) if ms > 0 => MatchBudget(Some(Duration::from_millis(ms.unsigned_abs()))),
            _ => MatchBudget::UNBOUNDED,
        }
    }

    pub fn limit(&self) -> Option<Duration> {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchStatus {
    Matched,
    NotMatched,
    TimedOut(Duration),
    Faulted(EngineFault),
}

/// Runs one search of a compiled pattern, enforcing the budget.
///
/// A bounded search runs on a worker thread while the caller waits on a
/// channel. When the budget expires the worker is abandoned, not joined: the
/// engine offers no way to interrupt it, and the process is expected to exit
/// once the verdict is reported.
#[derive(Debug, Clone, Copy, Default)]
pub struct BudgetedExecutor {
    budget: MatchBudget,
}

impl BudgetedExecutor {
    pub fn new(budget: MatchBudget) -> Self {
        Self { budget }
    }

    pub fn execute_sync<E>(
        &self,
        compiled: &Arc<E::Compiled>,
        input: &AttackString,
    ) -> MatchStatus
    where
        E: RegexEngine + 'static,
    {
        let Some(limit) = self.budget.limit() else {
            return search_guarded::<E>(compiled, input.as_str());
        };

        let (tx, rx) = mpsc::channel();
        let worker_compiled = Arc::clone(compiled);
        let haystack = input.shared();
        let spawned = thread::Builder::new()
            .name("redprobe-match".to_string())
            .spawn(move || {
                // The receiver is gone if the budget already expired.
                let _ = tx.send(search_guarded::<E>(&worker_compiled, &haystack));
            });
        if let Err(e) = spawned {
            return MatchStatus::Faulted(EngineFault::new(
                "WORKER_SPAWN_ERROR",
                format!("Failed to spawn match worker: {e}"),
            ));
        }

        match rx.recv_timeout(limit) {
            Ok(status) => status,
            Err(RecvTimeoutError::Timeout) => {
                warn!("Match exceeded budget of {limit:?}, abandoning worker");
                MatchStatus::TimedOut(limit)
            }
            Err(RecvTimeoutError::Disconnected) => MatchStatus::Faulted(EngineFault::panic(
                "Match worker exited without a verdict",
            )),
        }
    }
}

fn search_guarded<E: RegexEngine>(compiled: &E::Compiled, haystack: &str) -> MatchStatus {
    let result = catch_unwind(AssertUnwindSafe(|| E::search(compiled, haystack)));
    match result {
        Ok(Ok(true)) => MatchStatus::Matched,
        Ok(Ok(false)) => MatchStatus::NotMatched,
        Ok(Err(fault)) => {
            debug!("Engine fault during search: {fault}");
            MatchStatus::Faulted(fault)
        }
        Err(panic_payload) => MatchStatus::Faulted(EngineFault::panic(panic_message(
            panic_payload.as_ref(),
        ))),
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic type".to_string()
    }
}
