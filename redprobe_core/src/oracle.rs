use crate::executor::MatchStatus;
use crate::input::AttackString;
use serde::{Deserialize, Serialize};

pub const NO_EXCEPTION: &str = "No exception";
pub const INVALID_INPUT: &str = "INVALID_INPUT";
pub const MATCH_TIMED_OUT: &str = "Regex match timed out";

/// The value written to `matched`.
///
/// Completed searches report an integer (`1`/`0`); the invalid-pattern and
/// fault paths report boolean `false`. Both encodings are part of the output
/// contract.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(untagged)]
pub enum Matched {
    Flag(bool),
    Count(u8),
}

impl Matched {
    pub fn from_search(found: bool) -> Self {
        Matched::Count(u8::from(found))
    }
}

/// Terminal state of one probe run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeState {
    Invalid,
    Matched,
    NotMatched,
    TimedOut,
    Faulted,
}

/// The output fields of a pattern case, ready to be merged into the document.
///
/// `None` means the field is left alone: `inputLength` is absent when the
/// pattern never compiled, and `matched` is absent after a timeout so that no
/// result is claimed for a search that did not finish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub state: ProbeState,
    pub input_length: Option<usize>,
    pub matched: Option<Matched>,
    pub exception_string: String,
}

/// Maps pipeline outcomes onto [`Verdict`]s.
#[derive(Debug, Default, Clone, Copy)]
pub struct VerdictOracle;

impl VerdictOracle {
    pub fn new() -> Self {
        VerdictOracle
    }

    pub fn invalid_pattern(&self) -> Verdict {
        Verdict {
            state: ProbeState::Invalid,
            input_length: None,
            matched: Some(Matched::Flag(false)),
            exception_string: INVALID_INPUT.to_string(),
        }
    }

    pub fn examine(&self, input: &AttackString, status: &MatchStatus) -> Verdict {
        let input_length = Some(input.char_len());
        match status {
            MatchStatus::Matched | MatchStatus::NotMatched => {
                let found = matches!(status, MatchStatus::Matched);
                Verdict {
                    state: if found {
                        ProbeState::Matched
                    } else {
                        ProbeState::NotMatched
                    },
                    input_length,
                    matched: Some(Matched::from_search(found)),
                    exception_string: NO_EXCEPTION.to_string(),
                }
            }
            MatchStatus::TimedOut(_) => Verdict {
                state: ProbeState::TimedOut,
                input_length,
                matched: None,
                exception_string: MATCH_TIMED_OUT.to_string(),
            },
            MatchStatus::Faulted(fault) => Verdict {
                state: ProbeState::Faulted,
                input_length,
                matched: Some(Matched::Flag(false)),
                exception_string: fault.name.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineFault;
    use std::time::Duration;

    fn attack() -> AttackString {
        AttackString::from("aaaaab")
    }

    #[test]
    fn matched_search_reports_one() {
        let verdict = VerdictOracle::new().examine(&attack(), &MatchStatus::Matched);
        assert_eq!(verdict.state, ProbeState::Matched);
        assert_eq!(verdict.input_length, Some(6));
        assert_eq!(verdict.matched, Some(Matched::Count(1)));
        assert_eq!(verdict.exception_string, NO_EXCEPTION);
    }

    #[test]
    fn completed_miss_reports_zero() {
        let verdict = VerdictOracle::new().examine(&attack(), &MatchStatus::NotMatched);
        assert_eq!(verdict.state, ProbeState::NotMatched);
        assert_eq!(verdict.matched, Some(Matched::Count(0)));
        assert_eq!(verdict.exception_string, NO_EXCEPTION);
    }

    #[test]
    fn timeout_claims_no_match_result() {
        let status = MatchStatus::TimedOut(Duration::from_millis(100));
        let verdict = VerdictOracle::new().examine(&attack(), &status);
        assert_eq!(verdict.state, ProbeState::TimedOut);
        assert_eq!(verdict.matched, None);
        assert_eq!(verdict.input_length, Some(6));
        assert_eq!(verdict.exception_string, MATCH_TIMED_OUT);
    }

    #[test]
    fn fault_reports_engine_error_name() {
        let status = MatchStatus::Faulted(EngineFault::new("GAVE_UP_ERROR", "offset 12"));
        let verdict = VerdictOracle::new().examine(&attack(), &status);
        assert_eq!(verdict.state, ProbeState::Faulted);
        assert_eq!(verdict.matched, Some(Matched::Flag(false)));
        assert_eq!(verdict.exception_string, "GAVE_UP_ERROR");
    }

    #[test]
    fn invalid_pattern_has_no_length() {
        let verdict = VerdictOracle::new().invalid_pattern();
        assert_eq!(verdict.state, ProbeState::Invalid);
        assert_eq!(verdict.input_length, None);
        assert_eq!(verdict.matched, Some(Matched::Flag(false)));
        assert_eq!(verdict.exception_string, INVALID_INPUT);
    }

    #[test]
    fn matched_serializes_as_bool_or_int() {
        assert_eq!(serde_json::to_string(&Matched::Flag(false)).unwrap(), "false");
        assert_eq!(serde_json::to_string(&Matched::Count(1)).unwrap(), "1");
        let parsed: Matched = serde_json::from_str("true").unwrap();
        assert_eq!(parsed, Matched::Flag(true));
        let parsed: Matched = serde_json::from_str("0").unwrap();
        assert_eq!(parsed, Matched::Count(0));
    }
}
