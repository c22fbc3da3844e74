//! Statistical errors as skip reasons
//!
//! Every `StatsError` is a data-quality condition scoped to one unit of
//! work; the runner degrades it to a logged skip and moves on.

use trialstat_report::SkipReason;
use trialstat_stats::StatsError;

/// Map a statistical error to the skip reason recorded in the run summary
pub fn skip_reason(error: &StatsError) -> SkipReason {
    match error {
        StatsError::TooFewRounds(_) | StatsError::TooFewPatients(_) => {
            SkipReason::IncompleteDesign
        }
        StatsError::TooFewObservations(_) => SkipReason::InsufficientGroup,
        StatsError::ZeroVariance => SkipReason::ZeroVariance,
        StatsError::InvalidStatistic => SkipReason::InvalidStatistic,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_is_total() {
        assert_eq!(
            skip_reason(&StatsError::TooFewRounds(2)),
            SkipReason::IncompleteDesign
        );
        assert_eq!(
            skip_reason(&StatsError::TooFewPatients(1)),
            SkipReason::IncompleteDesign
        );
        assert_eq!(
            skip_reason(&StatsError::TooFewObservations(1)),
            SkipReason::InsufficientGroup
        );
        assert_eq!(
            skip_reason(&StatsError::ZeroVariance),
            SkipReason::ZeroVariance
        );
        assert_eq!(
            skip_reason(&StatsError::InvalidStatistic),
            SkipReason::InvalidStatistic
        );
    }
}
