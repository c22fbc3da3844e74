#![warn(missing_docs)]
//! Trialstat Statistical Engine
//!
//! Provides the non-parametric test primitives used by both analysis
//! pipelines:
//! - Friedman chi-square test with tie correction for repeated measures
//! - Nemenyi post-hoc pairwise comparison matrix
//! - Two-sided Mann-Whitney U test (exact and asymptotic)
//! - Descriptive summaries: median, quartiles, IQR
//!
//! All functions take plain `&[f64]` samples or row slices and return result
//! structs or a [`StatsError`]; nothing here touches I/O.

mod descriptive;
mod friedman;
mod mann_whitney;
mod nemenyi;
mod ranks;
mod studentized;

pub use descriptive::{quantile, summarize, GroupSummary};
pub use friedman::{friedman_test, FriedmanResult};
pub use mann_whitney::{mann_whitney_u, MannWhitneyResult};
pub use nemenyi::{nemenyi_friedman, PosthocMatrix};
pub use ranks::{average_ranks, tie_term};
pub use studentized::studentized_range_sf;

/// Minimum observations per group for the Mann-Whitney test
pub const MIN_GROUP_OBSERVATIONS: usize = 2;

/// Minimum evaluation rounds for the Friedman test
pub const MIN_FRIEDMAN_ROUNDS: usize = 3;

/// Minimum complete patients for the Friedman test
pub const MIN_FRIEDMAN_PATIENTS: usize = 2;

/// Errors from statistical computations
///
/// Every variant is a data-quality condition; callers treat them as
/// per-variable skip reasons, never as fatal failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StatsError {
    /// Fewer evaluation rounds than the test is defined for
    #[error("need at least {MIN_FRIEDMAN_ROUNDS} evaluation rounds, got {0}")]
    TooFewRounds(usize),

    /// Fewer complete patients than the test is defined for
    #[error("need at least {MIN_FRIEDMAN_PATIENTS} complete patients, got {0}")]
    TooFewPatients(usize),

    /// A group is below the minimum observation count
    #[error("group needs at least {MIN_GROUP_OBSERVATIONS} observations, got {0}")]
    TooFewObservations(usize),

    /// Every measurement is identical; the test statistic is undefined
    #[error("all measurements are identical")]
    ZeroVariance,

    /// The statistic or p-value evaluated to NaN
    #[error("statistic evaluated to NaN")]
    InvalidStatistic,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert_eq!(MIN_GROUP_OBSERVATIONS, 2);
        assert_eq!(MIN_FRIEDMAN_ROUNDS, 3);
        assert_eq!(MIN_FRIEDMAN_PATIENTS, 2);
    }
}
