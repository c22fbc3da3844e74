//! Observation table and pivoted wide matrix
//!
//! The observation table is the long-format view of one input file: one row
//! per (patient, evaluation round), one `Option<f64>` cell per measured
//! variable. The wide matrix is one variable pivoted to patients × rounds,
//! keeping only patients present at every round.

use std::collections::{HashMap, HashSet};

use crate::DataError;

/// A (patient, round) key appeared more than once
#[derive(Debug, Clone, thiserror::Error)]
#[error("duplicate observation for patient '{patient}' at round '{round}'")]
pub struct DuplicateObservation {
    /// Offending patient id
    pub patient: String,
    /// Offending evaluation round
    pub round: String,
}

#[derive(Debug)]
struct Row {
    patient: String,
    round: String,
    values: Vec<Option<f64>>,
}

/// Long-format table of patient evaluations
///
/// Rows are keyed by (patient, round); the key is unique by construction.
/// Cells are `None` when the input cell was empty or failed numeric parsing;
/// in the latter case the whole variable is additionally flagged non-numeric.
#[derive(Debug)]
pub struct ObservationTable {
    variables: Vec<String>,
    rows: Vec<Row>,
    index: HashMap<(String, String), usize>,
    non_numeric: HashSet<String>,
}

impl ObservationTable {
    /// Create an empty table with the given measured-variable columns
    pub fn new(variables: Vec<String>) -> Self {
        Self {
            variables,
            rows: Vec::new(),
            index: HashMap::new(),
            non_numeric: HashSet::new(),
        }
    }

    /// Append one observation row
    ///
    /// `values` must be aligned with [`variables`](Self::variables); a repeated
    /// (patient, round) key is rejected.
    pub fn push_row(
        &mut self,
        patient: String,
        round: String,
        values: Vec<Option<f64>>,
    ) -> Result<(), DuplicateObservation> {
        debug_assert_eq!(values.len(), self.variables.len());
        let key = (patient.clone(), round.clone());
        if self.index.contains_key(&key) {
            return Err(DuplicateObservation { patient, round });
        }
        self.index.insert(key, self.rows.len());
        self.rows.push(Row {
            patient,
            round,
            values,
        });
        Ok(())
    }

    /// Flag a variable whose column contained a non-parseable cell
    pub fn mark_non_numeric(&mut self, variable: &str) {
        self.non_numeric.insert(variable.to_string());
    }

    /// Whether the variable held at least one non-numeric cell
    pub fn is_non_numeric(&self, variable: &str) -> bool {
        self.non_numeric.contains(variable)
    }

    /// Measured-variable names, in file column order
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// Number of observation rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table holds no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Unique patient ids in order of first appearance
    pub fn patients(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for row in &self.rows {
            if seen.insert(row.patient.as_str()) {
                out.push(row.patient.clone());
            }
        }
        out
    }

    /// Unique evaluation rounds in sorted order
    ///
    /// Labels that parse as numbers sort numerically and before any
    /// non-numeric label; the rest sort lexicographically.
    pub fn rounds(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for row in &self.rows {
            if seen.insert(row.round.as_str()) {
                out.push(row.round.clone());
            }
        }
        out.sort_by(|a, b| compare_rounds(a, b));
        out
    }

    /// One variable's cells in row order; empty if the variable is unknown
    pub fn column(&self, variable: &str) -> Vec<Option<f64>> {
        match self.variable_index(variable) {
            Some(idx) => self.rows.iter().map(|row| row.values[idx]).collect(),
            None => Vec::new(),
        }
    }

    /// Whether the variable has at least one missing cell
    pub fn has_missing(&self, variable: &str) -> bool {
        self.column(variable).iter().any(Option::is_none)
    }

    /// One variable's present values at one round, missing cells dropped
    pub fn values_for_round(&self, variable: &str, round: &str) -> Vec<f64> {
        let Some(idx) = self.variable_index(variable) else {
            return Vec::new();
        };
        self.rows
            .iter()
            .filter(|row| row.round == round)
            .filter_map(|row| row.values[idx])
            .collect()
    }

    /// Pivot one variable to patients × sorted rounds
    ///
    /// Patients missing a value at any round are dropped; the drop count is
    /// preserved on the matrix.
    pub fn pivot(&self, variable: &str) -> WideMatrix {
        let rounds = self.rounds();
        let patients = self.patients();
        let idx = self.variable_index(variable);

        let mut kept_patients = Vec::new();
        let mut rows = Vec::new();
        for patient in &patients {
            let mut row = Vec::with_capacity(rounds.len());
            for round in &rounds {
                let cell = idx.and_then(|i| {
                    self.index
                        .get(&(patient.clone(), round.clone()))
                        .and_then(|&r| self.rows[r].values[i])
                });
                match cell {
                    Some(v) => row.push(v),
                    None => {
                        row.clear();
                        break;
                    }
                }
            }
            if row.len() == rounds.len() {
                kept_patients.push(patient.clone());
                rows.push(row);
            }
        }

        let dropped_patients = patients.len() - kept_patients.len();
        WideMatrix {
            patients: kept_patients,
            rounds,
            rows,
            dropped_patients,
        }
    }

    /// Resolve an inclusive file-column index range to variable names
    ///
    /// Indices count file columns, so the first measured variable sits at
    /// index 2 (after the patient and round columns).
    pub fn select_columns(&self, start: usize, end: usize) -> Result<Vec<String>, DataError> {
        let columns = self.variables.len() + 2;
        if start < 2 || end < start || end >= columns {
            return Err(DataError::InvalidColumnRange {
                start,
                end,
                columns,
            });
        }
        Ok(self.variables[start - 2..=end - 2].to_vec())
    }

    fn variable_index(&self, variable: &str) -> Option<usize> {
        self.variables.iter().position(|v| v == variable)
    }
}

/// Numeric-aware round label ordering
fn compare_rounds(a: &str, b: &str) -> std::cmp::Ordering {
    use std::cmp::Ordering;
    match (a.parse::<f64>(), b.parse::<f64>()) {
        (Ok(x), Ok(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

/// One variable pivoted to patients × rounds, complete patients only
#[derive(Debug)]
pub struct WideMatrix {
    patients: Vec<String>,
    rounds: Vec<String>,
    rows: Vec<Vec<f64>>,
    dropped_patients: usize,
}

impl WideMatrix {
    /// Number of complete patients (matrix rows)
    pub fn n_patients(&self) -> usize {
        self.patients.len()
    }

    /// Number of evaluation rounds (matrix columns)
    pub fn n_rounds(&self) -> usize {
        self.rounds.len()
    }

    /// Sorted round labels, one per column
    pub fn rounds(&self) -> &[String] {
        &self.rounds
    }

    /// Patient ids kept in the matrix, one per row
    pub fn patients(&self) -> &[String] {
        &self.patients
    }

    /// Matrix rows: one `Vec<f64>` of per-round values per patient
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Patients dropped for missing at least one round
    pub fn dropped_patients(&self) -> usize {
        self.dropped_patients
    }

    /// Whether every cell holds the same value
    pub fn is_constant(&self) -> bool {
        let mut cells = self.rows.iter().flatten();
        match cells.next() {
            Some(first) => cells.all(|v| v == first),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_3x3() -> ObservationTable {
        // 3 patients × 3 rounds, spec pain-score scenario
        let mut table = ObservationTable::new(vec!["pain_score".to_string()]);
        let scores = [
            ("P1", [1.0, 2.0, 3.0]),
            ("P2", [1.0, 2.0, 2.0]),
            ("P3", [2.0, 2.0, 3.0]),
        ];
        for (patient, values) in scores {
            for (round, value) in values.iter().enumerate() {
                table
                    .push_row(
                        patient.to_string(),
                        (round + 1).to_string(),
                        vec![Some(*value)],
                    )
                    .unwrap();
            }
        }
        table
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let mut table = ObservationTable::new(vec!["x".to_string()]);
        table
            .push_row("P1".to_string(), "1".to_string(), vec![Some(1.0)])
            .unwrap();
        let err = table
            .push_row("P1".to_string(), "1".to_string(), vec![Some(2.0)])
            .unwrap_err();
        assert_eq!(err.patient, "P1");
        assert_eq!(err.round, "1");
    }

    #[test]
    fn test_rounds_sort_numerically() {
        let mut table = ObservationTable::new(vec!["x".to_string()]);
        for round in ["10", "2", "1"] {
            table
                .push_row(format!("P{round}"), round.to_string(), vec![Some(0.0)])
                .unwrap();
        }
        assert_eq!(table.rounds(), vec!["1", "2", "10"]);
    }

    #[test]
    fn test_rounds_mixed_labels() {
        let mut table = ObservationTable::new(vec!["x".to_string()]);
        for round in ["baseline", "2", "1"] {
            table
                .push_row(format!("P{round}"), round.to_string(), vec![Some(0.0)])
                .unwrap();
        }
        // Numeric labels first, then lexicographic
        assert_eq!(table.rounds(), vec!["1", "2", "baseline"]);
    }

    #[test]
    fn test_pivot_complete_patients() {
        let table = table_3x3();
        let matrix = table.pivot("pain_score");
        assert_eq!(matrix.n_patients(), 3);
        assert_eq!(matrix.n_rounds(), 3);
        assert_eq!(matrix.dropped_patients(), 0);
        assert_eq!(matrix.rows()[0], vec![1.0, 2.0, 3.0]);
        assert_eq!(matrix.rows()[2], vec![2.0, 2.0, 3.0]);
    }

    #[test]
    fn test_pivot_drops_incomplete_patient() {
        let mut table = table_3x3();
        // P4 only shows up at round 1
        table
            .push_row("P4".to_string(), "1".to_string(), vec![Some(5.0)])
            .unwrap();
        let matrix = table.pivot("pain_score");
        assert_eq!(matrix.n_patients(), 3);
        assert_eq!(matrix.dropped_patients(), 1);
    }

    #[test]
    fn test_pivot_drops_patient_with_missing_cell() {
        let mut table = ObservationTable::new(vec!["x".to_string()]);
        for (patient, v1, v2) in [("P1", Some(1.0), Some(2.0)), ("P2", Some(3.0), None)] {
            table
                .push_row(patient.to_string(), "1".to_string(), vec![v1])
                .unwrap();
            table
                .push_row(patient.to_string(), "2".to_string(), vec![v2])
                .unwrap();
        }
        let matrix = table.pivot("x");
        assert_eq!(matrix.n_patients(), 1);
        assert_eq!(matrix.dropped_patients(), 1);
    }

    #[test]
    fn test_values_for_round_drops_missing() {
        let mut table = ObservationTable::new(vec!["x".to_string()]);
        table
            .push_row("P1".to_string(), "1".to_string(), vec![Some(1.0)])
            .unwrap();
        table
            .push_row("P2".to_string(), "1".to_string(), vec![None])
            .unwrap();
        assert_eq!(table.values_for_round("x", "1"), vec![1.0]);
    }

    #[test]
    fn test_constant_matrix() {
        let mut table = ObservationTable::new(vec!["x".to_string()]);
        for patient in ["P1", "P2"] {
            for round in ["1", "2", "3"] {
                table
                    .push_row(patient.to_string(), round.to_string(), vec![Some(7.0)])
                    .unwrap();
            }
        }
        assert!(table.pivot("x").is_constant());
        assert!(!table_3x3().pivot("pain_score").is_constant());
    }

    #[test]
    fn test_select_columns() {
        let table = ObservationTable::new(vec!["a".to_string(), "b".to_string(), "c".to_string()]);
        assert_eq!(table.select_columns(2, 3).unwrap(), vec!["a", "b"]);
        assert_eq!(table.select_columns(4, 4).unwrap(), vec!["c"]);
        assert!(table.select_columns(2, 5).is_err());
        assert!(table.select_columns(0, 2).is_err());
    }
}
