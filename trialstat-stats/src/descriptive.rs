//! Descriptive summaries
//!
//! Quantiles use linear interpolation between nearest ranks, so medians and
//! quartiles agree with the usual spreadsheet and dataframe conventions.

/// Per-group descriptive summary
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupSummary {
    /// Number of observations
    pub n: usize,
    /// Median (50th percentile)
    pub median: f64,
    /// First quartile
    pub q1: f64,
    /// Third quartile
    pub q3: f64,
}

impl GroupSummary {
    /// Interquartile range, exactly Q3 − Q1
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }
}

/// Compute a quantile `q` in [0, 1] with linear interpolation
pub fn quantile(samples: &[f64], q: f64) -> f64 {
    if samples.is_empty() {
        return f64::NAN;
    }
    if samples.len() == 1 {
        return samples[0];
    }

    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let rank = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower_idx = rank.floor() as usize;
    let upper_idx = (lower_idx + 1).min(sorted.len() - 1);
    let fraction = rank - lower_idx as f64;

    sorted[lower_idx] + fraction * (sorted[upper_idx] - sorted[lower_idx])
}

/// Summarize one group: n, median, quartiles
pub fn summarize(samples: &[f64]) -> GroupSummary {
    GroupSummary {
        n: samples.len(),
        median: quantile(samples, 0.5),
        q1: quantile(samples, 0.25),
        q3: quantile(samples, 0.75),
    }
}
