//! Threshold-crossing evaluation
//!
//! Each alert kind moves through the same breach episode, independently of
//! the others:
//!
//! ```text
//! signal within threshold, not alerted  → Ok              (nothing to do)
//! signal exceeds,          not alerted  → StartsToExceed  (fire alert, mark breached)
//! signal exceeds,          alerted      → StillExceeding  (suppressed, no second alert)
//! signal within threshold, alerted      → BackToOk        (re-arm for the next episode)
//! ```
//!
//! This keeps a sustained breach down to exactly one webhook call and only
//! re-arms once the underlying signal has actually recovered.

/// Outcome of evaluating one signal against its threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreachEvaluation {
    Ok,
    StartsToExceed,
    StillExceeding,
    BackToOk,
}

impl BreachEvaluation {
    /// Evaluate one observation.
    ///
    /// `exceeds` is the kind-specific threshold comparison (the failure
    /// counter fires at the threshold, backlog and latency strictly above
    /// it); `alerted` is whether this kind is already in a breach episode.
    pub fn evaluate(exceeds: bool, alerted: bool) -> BreachEvaluation {
        if !exceeds {
            if alerted {
                return BreachEvaluation::BackToOk;
            }
            return BreachEvaluation::Ok;
        }

        if alerted {
            return BreachEvaluation::StillExceeding;
        }

        BreachEvaluation::StartsToExceed
    }
}
