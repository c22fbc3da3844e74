//! Two-sided Mann-Whitney U test
//!
//! The reported statistic is U of the first group. Small samples (both
//! groups ≤ 8 observations, no ties) use the exact null distribution of U;
//! larger or tied samples use the normal approximation with tie and
//! continuity corrections. This is the same method switch SciPy's
//! `mannwhitneyu` applies with `method="auto"`, so p-values line up with
//! the standard Python tooling clinicians already use.

use statrs::distribution::{ContinuousCDF, Normal};

use crate::ranks::{average_ranks, tie_term};
use crate::{StatsError, MIN_GROUP_OBSERVATIONS};

/// Largest per-group size handled by the exact distribution
const EXACT_LIMIT: usize = 8;

/// Result of a Mann-Whitney U test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MannWhitneyResult {
    /// U statistic of the first group
    pub u_statistic: f64,
    /// Two-sided p-value
    pub p_value: f64,
}

/// Two-sided Mann-Whitney U test between two independent groups
pub fn mann_whitney_u(
    group_a: &[f64],
    group_b: &[f64],
) -> Result<MannWhitneyResult, StatsError> {
    for group in [group_a, group_b] {
        if group.len() < MIN_GROUP_OBSERVATIONS {
            return Err(StatsError::TooFewObservations(group.len()));
        }
    }

    let n_a = group_a.len() as f64;
    let n_b = group_b.len() as f64;

    let mut combined = Vec::with_capacity(group_a.len() + group_b.len());
    combined.extend_from_slice(group_a);
    combined.extend_from_slice(group_b);
    let ranks = average_ranks(&combined);

    let rank_sum_a: f64 = ranks[..group_a.len()].iter().sum();
    let u_a = rank_sum_a - n_a * (n_a + 1.0) / 2.0;
    let u_b = n_a * n_b - u_a;

    let ties = tie_term(&combined);
    let has_ties = ties > 0.0;

    let p_value = if group_a.len() <= EXACT_LIMIT && group_b.len() <= EXACT_LIMIT && !has_ties {
        exact_two_sided(u_a.min(u_b), group_a.len(), group_b.len())
    } else {
        asymptotic_two_sided(u_a.max(u_b), n_a, n_b, ties)?
    };

    if u_a.is_nan() || p_value.is_nan() {
        return Err(StatsError::InvalidStatistic);
    }

    Ok(MannWhitneyResult {
        u_statistic: u_a,
        p_value: p_value.clamp(0.0, 1.0),
    })
}

/// Exact two-sided p-value: doubled lower tail of the null U distribution
fn exact_two_sided(u_min: f64, n_a: usize, n_b: usize) -> f64 {
    let counts = u_counts(n_a, n_b);
    let total: f64 = counts.iter().sum();
    let cutoff = u_min.floor() as usize;
    let tail: f64 = counts.iter().take(cutoff + 1).sum();
    (2.0 * tail / total).min(1.0)
}

/// Number of rank arrangements achieving each U value
///
/// Classic recurrence c(m, n, u) = c(m−1, n, u−n) + c(m, n−1, u), with
/// c(0, n, 0) = c(m, 0, 0) = 1. Counts can exceed u64 only far beyond the
/// exact-limit sizes, so f64 accumulation is lossless here.
fn u_counts(n_a: usize, n_b: usize) -> Vec<f64> {
    let u_max = n_a * n_b;
    let mut table = vec![vec![vec![0.0; u_max + 1]; n_b + 1]; n_a + 1];
    for m in 0..=n_a {
        for n in 0..=n_b {
            table[m][n][0] = 1.0;
        }
    }
    for m in 1..=n_a {
        for n in 1..=n_b {
            for u in 1..=u_max {
                let with_last = if u >= n { table[m - 1][n][u - n] } else { 0.0 };
                let without_last = table[m][n - 1][u];
                table[m][n][u] = with_last + without_last;
            }
        }
    }
    table[n_a][n_b].clone()
}

/// Normal approximation with tie and continuity corrections
fn asymptotic_two_sided(u_big: f64, n_a: f64, n_b: f64, ties: f64) -> Result<f64, StatsError> {
    let n = n_a + n_b;
    let mean = n_a * n_b / 2.0;
    let variance = n_a * n_b / 12.0 * ((n + 1.0) - ties / (n * (n - 1.0)));
    if variance <= 0.0 {
        return Err(StatsError::ZeroVariance);
    }

    let z = (u_big - mean - 0.5) / variance.sqrt();
    let normal = Normal::new(0.0, 1.0).unwrap();
    Ok((2.0 * normal.sf(z)).min(1.0))
}
