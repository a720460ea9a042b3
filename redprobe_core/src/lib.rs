pub mod case;
pub mod config;
pub mod engine;
pub mod executor;
pub mod input;
pub mod oracle;
pub mod probe;
pub mod pump;
pub mod report;

pub use case::{CaseError, EvilInput, PatternCase, PatternSpec, PumpPair};
pub use config::{AutomataSettings, ConfigError, RedprobeConfig};
pub use engine::{AutomataEngine, BacktrackEngine, EngineKind, RegexEngine};
pub use executor::{BudgetedExecutor, MatchBudget, MatchStatus};
pub use input::AttackString;
pub use oracle::{Matched, ProbeState, Verdict, VerdictOracle};
pub use probe::Prober;
pub use pump::{PumpError, PumpStrategy, build_attack_string};
pub use report::{ReportError, write_report};
