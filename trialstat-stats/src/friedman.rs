//! Friedman chi-square test for repeated measures
//!
//! Input is one variable's wide matrix: one row of per-round values per
//! patient. Values are ranked within each patient row (ties averaged), the
//! chi-square statistic is tie-corrected, and the p-value comes from the
//! χ²(k − 1) survival function.

use statrs::distribution::{ChiSquared, ContinuousCDF};

use crate::ranks::{average_ranks, tie_term};
use crate::{StatsError, MIN_FRIEDMAN_PATIENTS, MIN_FRIEDMAN_ROUNDS};

/// Result of a Friedman test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FriedmanResult {
    /// Tie-corrected chi-square statistic
    pub statistic: f64,
    /// Degrees of freedom, rounds − 1
    pub df: usize,
    /// Two-sided p-value
    pub p_value: f64,
}

/// Run the Friedman test over patient rows of per-round values
///
/// Rows must be rectangular: every patient measured at every round.
pub fn friedman_test(rows: &[Vec<f64>]) -> Result<FriedmanResult, StatsError> {
    let n = rows.len();
    if n < MIN_FRIEDMAN_PATIENTS {
        return Err(StatsError::TooFewPatients(n));
    }
    let k = rows[0].len();
    if k < MIN_FRIEDMAN_ROUNDS {
        return Err(StatsError::TooFewRounds(k));
    }
    debug_assert!(rows.iter().all(|row| row.len() == k));

    // Column rank sums from within-patient ranks, plus the per-row tie term
    let mut rank_sums = vec![0.0; k];
    let mut ties = 0.0;
    for row in rows {
        for (sum, rank) in rank_sums.iter_mut().zip(average_ranks(row)) {
            *sum += rank;
        }
        ties += tie_term(row);
    }

    let nf = n as f64;
    let kf = k as f64;
    let correction = 1.0 - ties / (nf * (kf * kf * kf - kf));
    if correction <= 0.0 {
        // Every row fully tied
        return Err(StatsError::ZeroVariance);
    }

    let sum_sq: f64 = rank_sums.iter().map(|r| r * r).sum();
    let uncorrected = 12.0 * sum_sq / (nf * kf * (kf + 1.0)) - 3.0 * nf * (kf + 1.0);
    let statistic = uncorrected / correction;

    let df = k - 1;
    let chi2 = ChiSquared::new(df as f64).map_err(|_| StatsError::InvalidStatistic)?;
    let p_value = chi2.sf(statistic).clamp(0.0, 1.0);

    if statistic.is_nan() || p_value.is_nan() {
        return Err(StatsError::InvalidStatistic);
    }

    Ok(FriedmanResult {
        statistic,
        df,
        p_value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pain_score_scenario() {
        // 3 patients × 3 rounds; chi-square 5.0 after tie correction,
        // p = exp(-2.5) ≈ 0.0821 (matches scipy.stats.friedmanchisquare)
        let rows = vec![
            vec![1.0, 2.0, 3.0],
            vec![1.0, 2.0, 2.0],
            vec![2.0, 2.0, 3.0],
        ];
        let result = friedman_test(&rows).unwrap();
        assert!((result.statistic - 5.0).abs() < 1e-9);
        assert_eq!(result.df, 2);
        assert!((result.p_value - (-2.5f64).exp()).abs() < 1e-9);
        assert!(result.p_value > 0.0 && result.p_value < 1.0);
    }

    #[test]
    fn test_no_ties_matches_closed_form() {
        // Perfectly ordered rows: every patient ranks rounds 1 < 2 < 3,
        // statistic = 12*(3²+6²+9²)/(3*3*4) - 3*3*4 = 6, p = exp(-3)
        let rows = vec![
            vec![1.0, 2.0, 3.0],
            vec![4.0, 5.0, 6.0],
            vec![7.0, 8.0, 9.0],
        ];
        let result = friedman_test(&rows).unwrap();
        assert!((result.statistic - 6.0).abs() < 1e-9);
        assert!((result.p_value - (-3.0f64).exp()).abs() < 1e-9);
    }

    #[test]
    fn test_fully_tied_rows_rejected() {
        let rows = vec![vec![2.0, 2.0, 2.0], vec![5.0, 5.0, 5.0]];
        assert_eq!(friedman_test(&rows), Err(StatsError::ZeroVariance));
    }

    #[test]
    fn test_too_few_rounds() {
        let rows = vec![vec![1.0, 2.0], vec![2.0, 1.0]];
        assert_eq!(friedman_test(&rows), Err(StatsError::TooFewRounds(2)));
    }

    #[test]
    fn test_too_few_patients() {
        let rows = vec![vec![1.0, 2.0, 3.0]];
        assert_eq!(friedman_test(&rows), Err(StatsError::TooFewPatients(1)));
    }
}
