//! Comparisons CSV Output
//!
//! One row per comparison record, headers from the record's serde fields.
//! A run that produced zero valid comparisons writes no file at all; an
//! empty artifact would read as "analyzed, nothing found" when the truth is
//! "nothing was analyzable".

use std::path::Path;

use serde::Serialize;
use tracing::warn;

use crate::text::ReportError;

/// Write comparison records as UTF-8 CSV
///
/// Returns `true` when a file was written, `false` (with a diagnostic) when
/// there were no records to write.
pub fn write_comparisons_csv<T: Serialize>(
    path: &Path,
    records: &[T],
) -> Result<bool, ReportError> {
    if records.is_empty() {
        warn!(
            path = %path.display(),
            "no valid comparisons were produced; comparisons file not written"
        );
        return Ok(false);
    }

    let mut writer = csv::Writer::from_path(path).map_err(|source| ReportError::Csv {
        path: path.to_path_buf(),
        source,
    })?;
    for record in records {
        writer.serialize(record).map_err(|source| ReportError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
    }
    writer.flush().map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{GroupComparison, PairwiseComparison};

    fn pairwise(round_a: &str, round_b: &str, p_value: f64) -> PairwiseComparison {
        PairwiseComparison {
            variable: "pain_score".to_string(),
            round_a: round_a.to_string(),
            round_b: round_b.to_string(),
            p_value,
        }
    }

    #[test]
    fn test_pairwise_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("comparisons.csv");
        let records = vec![
            pairwise("1", "2", 0.4573),
            pairwise("1", "3", 0.0553),
            pairwise("2", "3", 0.5731),
        ];

        assert!(write_comparisons_csv(&path, &records).unwrap());

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let parsed: Vec<PairwiseComparison> =
            reader.deserialize().collect::<Result<_, _>>().unwrap();
        assert_eq!(parsed, records);
    }

    #[test]
    fn test_group_comparison_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("comparisons.csv");
        let records = vec![GroupComparison {
            variable: "pain_score".to_string(),
            round: "1".to_string(),
            n_a: 3,
            median_a: 6.0,
            q1_a: 5.5,
            q3_a: 6.5,
            iqr_a: 1.0,
            n_b: 3,
            median_b: 2.0,
            q1_b: 1.5,
            q3_b: 2.5,
            iqr_b: 1.0,
            u_statistic: 9.0,
            p_value: 0.1,
        }];

        assert!(write_comparisons_csv(&path, &records).unwrap());

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let parsed: Vec<GroupComparison> =
            reader.deserialize().collect::<Result<_, _>>().unwrap();
        assert_eq!(parsed, records);
        assert_eq!(parsed[0].iqr_a, parsed[0].q3_a - parsed[0].q1_a);
    }

    #[test]
    fn test_zero_records_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("comparisons.csv");
        let records: Vec<PairwiseComparison> = Vec::new();

        assert!(!write_comparisons_csv(&path, &records).unwrap());
        assert!(!path.exists());
    }
}
