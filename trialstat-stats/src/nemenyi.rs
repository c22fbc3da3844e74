//! Nemenyi post-hoc comparisons after a Friedman test
//!
//! Mean within-patient ranks are compared pairwise; the standardized rank
//! difference is referred to the studentized range distribution with ∞
//! degrees of freedom, which controls the family-wise error rate across all
//! C(k, 2) round pairs.

use crate::ranks::average_ranks;
use crate::studentized::studentized_range_sf;
use crate::{StatsError, MIN_FRIEDMAN_PATIENTS, MIN_FRIEDMAN_ROUNDS};

/// Symmetric k × k matrix of post-hoc p-values, diagonal 1.0
#[derive(Debug, Clone, PartialEq)]
pub struct PosthocMatrix {
    k: usize,
    p: Vec<Vec<f64>>,
}

impl PosthocMatrix {
    /// Number of compared rounds
    pub fn k(&self) -> usize {
        self.k
    }

    /// p-value for the (i, j) round pair
    pub fn p(&self, i: usize, j: usize) -> f64 {
        self.p[i][j]
    }

    /// Full matrix rows
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.p
    }

    /// Upper-triangle pairs (i, j, p) with i < j
    pub fn pairwise(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        (0..self.k).flat_map(move |i| ((i + 1)..self.k).map(move |j| (i, j, self.p[i][j])))
    }
}

/// Compute the Nemenyi pairwise p-value matrix over patient rows
///
/// Rows are the same wide matrix the Friedman test consumes: one row of
/// per-round values per patient.
pub fn nemenyi_friedman(rows: &[Vec<f64>]) -> Result<PosthocMatrix, StatsError> {
    let n = rows.len();
    if n < MIN_FRIEDMAN_PATIENTS {
        return Err(StatsError::TooFewPatients(n));
    }
    let k = rows[0].len();
    if k < MIN_FRIEDMAN_ROUNDS {
        return Err(StatsError::TooFewRounds(k));
    }
    debug_assert!(rows.iter().all(|row| row.len() == k));

    // Mean rank per round over within-patient ranks
    let mut mean_ranks = vec![0.0; k];
    for row in rows {
        for (mean, rank) in mean_ranks.iter_mut().zip(average_ranks(row)) {
            *mean += rank;
        }
    }
    let nf = n as f64;
    let kf = k as f64;
    for mean in &mut mean_ranks {
        *mean /= nf;
    }

    let standard_error = (kf * (kf + 1.0) / (12.0 * nf)).sqrt();

    let mut p = vec![vec![1.0; k]; k];
    for i in 0..k {
        for j in (i + 1)..k {
            let q = (mean_ranks[i] - mean_ranks[j]).abs() / standard_error;
            let p_value = studentized_range_sf(q, k).clamp(0.0, 1.0);
            p[i][j] = p_value;
            p[j][i] = p_value;
        }
    }

    Ok(PosthocMatrix { k, p })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_rounds_not_significant() {
        // Same ordering flipped per patient: mean ranks equalize, p → 1
        let rows = vec![
            vec![1.0, 2.0, 3.0],
            vec![3.0, 2.0, 1.0],
            vec![1.0, 2.0, 3.0],
            vec![3.0, 2.0, 1.0],
        ];
        let matrix = nemenyi_friedman(&rows).unwrap();
        assert!(matrix.p(0, 2) > 0.95);
    }

    #[test]
    fn test_consistent_ordering_is_significant() {
        // Every patient ranks round 3 highest and round 1 lowest
        let rows: Vec<Vec<f64>> = (0..12)
            .map(|i| vec![i as f64, i as f64 + 10.0, i as f64 + 20.0])
            .collect();
        let matrix = nemenyi_friedman(&rows).unwrap();
        assert!(matrix.p(0, 2) < 0.05);
        assert!(matrix.p(0, 2) < matrix.p(0, 1));
    }

    #[test]
    fn test_matrix_shape() {
        let rows = vec![
            vec![1.0, 2.0, 3.0],
            vec![1.0, 2.0, 2.0],
            vec![2.0, 2.0, 3.0],
        ];
        let matrix = nemenyi_friedman(&rows).unwrap();
        assert_eq!(matrix.k(), 3);
        assert_eq!(matrix.p(1, 1), 1.0);
        assert_eq!(matrix.p(0, 2), matrix.p(2, 0));
        assert_eq!(matrix.pairwise().count(), 3);
        for (_, _, p) in matrix.pairwise() {
            assert!((0.0..=1.0).contains(&p));
        }
    }

    #[test]
    fn test_guards() {
        assert_eq!(
            nemenyi_friedman(&[vec![1.0, 2.0, 3.0]]),
            Err(StatsError::TooFewPatients(1))
        );
        assert_eq!(
            nemenyi_friedman(&[vec![1.0, 2.0], vec![2.0, 1.0]]),
            Err(StatsError::TooFewRounds(2))
        );
    }
}
