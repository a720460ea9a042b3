//! Attack string construction.
//!
//! A recipe expands to `prefix_1 pump_1^n prefix_2 pump_2^n ... suffix`. Two
//! strategies exist and must agree byte for byte: plain repetition, and a
//! doubling expansion that needs only `O(log n)` appends per pair.

use crate::case::EvilInput;
use crate::input::AttackString;
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PumpError {
    #[error("nPumps {0} does not fit in this platform's address space")]
    PumpCountTooLarge(u64),
    #[error("Attack string for nPumps {0} is too long to allocate")]
    TooLong(u64),
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum PumpStrategy {
    /// Append the pump `nPumps` times.
    Naive,
    /// Double a copy of the pump until it covers the target, then truncate.
    Doubling,
}

impl PumpStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            PumpStrategy::Naive => "naive",
            PumpStrategy::Doubling => "doubling",
        }
    }
}

/// Byte length of the attack string `evil` expands to, or `None` on overflow.
pub fn expected_byte_len(n_pumps: usize, evil: &EvilInput) -> Option<usize> {
    evil.pump_pairs
        .iter()
        .try_fold(evil.suffix.len(), |total, pair| {
            let pumped = pair.pump.len().checked_mul(n_pumps)?;
            total.checked_add(pair.prefix.len())?.checked_add(pumped)
        })
}

pub fn build_attack_string(
    n_pumps: u64,
    evil: &EvilInput,
    strategy: PumpStrategy,
) -> Result<AttackString, PumpError> {
    let n = usize::try_from(n_pumps).map_err(|_| PumpError::PumpCountTooLarge(n_pumps))?;
    let capacity = expected_byte_len(n, evil).ok_or(PumpError::TooLong(n_pumps))?;

    let mut out = String::new();
    out.try_reserve_exact(capacity).map_err(|_| PumpError::TooLong(n_pumps))?;
    for pair in &evil.pump_pairs {
        out.push_str(&pair.prefix);
        match strategy {
            PumpStrategy::Naive => append_repeated(&mut out, &pair.pump, n),
            PumpStrategy::Doubling => append_doubled(&mut out, &pair.pump, n),
        }
    }
    out.push_str(&evil.suffix);

    debug_assert_eq!(out.len(), capacity);
    Ok(AttackString::from(out))
}

fn append_repeated(out: &mut String, pump: &str, n_pumps: usize) {
    for _ in 0..n_pumps {
        out.push_str(pump);
    }
}

// Callers have already checked that `n_pumps * pump.len()` does not overflow.
fn append_doubled(out: &mut String, pump: &str, n_pumps: usize) {
    let target = n_pumps * pump.len();
    if target == 0 {
        return;
    }
    let mut expanded = pump.to_owned();
    while expanded.len() < target {
        expanded = expanded.repeat(2);
    }
    // `expanded` is a whole number of pumps and `target` is a multiple of the
    // pump length, so the cut always lands on a char boundary.
    expanded.truncate(target);
    out.push_str(&expanded);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::case::PumpPair;
    use rand::Rng;
    use rand_chacha::ChaCha8Rng;
    use rand_core::SeedableRng;

    const ALPHABET: &[char] = &['a', 'b', '!', ' ', 'é', '€', '𝄞'];

    fn random_text(rng: &mut ChaCha8Rng, max_len: usize) -> String {
        let len = rng.random_range(0..=max_len);
        (0..len)
            .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())])
            .collect()
    }

    fn random_evil_input(rng: &mut ChaCha8Rng) -> EvilInput {
        let pairs = rng.random_range(0..4);
        EvilInput {
            pump_pairs: (0..pairs)
                .map(|_| PumpPair::new(random_text(rng, 5), random_text(rng, 4)))
                .collect(),
            suffix: random_text(rng, 5),
        }
    }

    fn expected_char_len(n_pumps: usize, evil: &EvilInput) -> usize {
        evil.pump_pairs
            .iter()
            .map(|p| p.prefix.chars().count() + n_pumps * p.pump.chars().count())
            .sum::<usize>()
            + evil.suffix.chars().count()
    }

    #[test]
    fn strategies_agree_on_random_recipes() {
        let mut rng = ChaCha8Rng::seed_from_u64(0x5eed);
        for _ in 0..200 {
            let evil = random_evil_input(&mut rng);
            for n_pumps in [0u64, 1, 2, 1000] {
                let naive = build_attack_string(n_pumps, &evil, PumpStrategy::Naive).unwrap();
                let doubled =
                    build_attack_string(n_pumps, &evil, PumpStrategy::Doubling).unwrap();
                assert_eq!(naive, doubled, "recipe {evil:?} with nPumps {n_pumps}");
                assert_eq!(
                    doubled.char_len(),
                    expected_char_len(n_pumps as usize, &evil),
                    "length invariant for {evil:?} with nPumps {n_pumps}"
                );
            }
        }
    }

    #[test]
    fn doubling_handles_non_power_of_two_counts() {
        let evil = EvilInput {
            pump_pairs: vec![PumpPair::new("<", "ab")],
            suffix: ">".to_string(),
        };
        for n_pumps in [3u64, 5, 7, 17, 33] {
            let built = build_attack_string(n_pumps, &evil, PumpStrategy::Doubling).unwrap();
            let expected = format!("<{}>", "ab".repeat(n_pumps as usize));
            assert_eq!(built.as_str(), expected);
        }
    }

    #[test]
    fn zero_pumps_keeps_only_prefixes_and_suffix() {
        let evil = EvilInput {
            pump_pairs: vec![PumpPair::new("p1", "xyz"), PumpPair::new("p2", "€")],
            suffix: "s".to_string(),
        };
        for strategy in [PumpStrategy::Naive, PumpStrategy::Doubling] {
            let built = build_attack_string(0, &evil, strategy).unwrap();
            assert_eq!(built.as_str(), "p1p2s");
        }
    }

    #[test]
    fn empty_pump_contributes_its_prefix_once() {
        let evil = EvilInput {
            pump_pairs: vec![PumpPair::new("pre", "")],
            suffix: "!".to_string(),
        };
        for strategy in [PumpStrategy::Naive, PumpStrategy::Doubling] {
            let built = build_attack_string(50, &evil, strategy).unwrap();
            assert_eq!(built.as_str(), "pre!");
        }
    }

    #[test]
    fn no_pairs_yields_the_suffix() {
        let evil = EvilInput {
            pump_pairs: Vec::new(),
            suffix: "just this".to_string(),
        };
        let built = build_attack_string(1000, &evil, PumpStrategy::Doubling).unwrap();
        assert_eq!(built.as_str(), "just this");
    }

    #[test]
    fn builds_simple_attack_string() {
        let evil = EvilInput {
            pump_pairs: vec![PumpPair::new("", "a")],
            suffix: "b".to_string(),
        };
        let built = build_attack_string(5, &evil, PumpStrategy::Doubling).unwrap();
        assert_eq!(built.as_str(), "aaaaab");
        assert_eq!(built.char_len(), 6);
    }

    #[test]
    fn overflowing_recipe_is_rejected() {
        let evil = EvilInput {
            pump_pairs: vec![PumpPair::new("", "aa")],
            suffix: String::new(),
        };
        let n_pumps = (usize::MAX / 2 + 1) as u64;
        assert_eq!(
            build_attack_string(n_pumps, &evil, PumpStrategy::Naive),
            Err(PumpError::TooLong(n_pumps))
        );
        assert_eq!(expected_byte_len(usize::MAX, &evil), None);
    }

    #[test]
    fn unallocatable_recipe_is_rejected() {
        let evil = EvilInput {
            pump_pairs: vec![PumpPair::new("", "aa")],
            suffix: String::new(),
        };
        let n_pumps = 1u64 << 62;
        for strategy in [PumpStrategy::Naive, PumpStrategy::Doubling] {
            let result = build_attack_string(n_pumps, &evil, strategy);
            assert!(
                matches!(
                    result,
                    Err(PumpError::TooLong(_) | PumpError::PumpCountTooLarge(_))
                ),
                "{strategy:?}: {result:?}"
            );
        }
    }
}
