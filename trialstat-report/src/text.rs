//! Text Report Output
//!
//! Human-readable report writing. One file handle is held for the whole run
//! and each block is flushed as soon as it is written, so the report on disk
//! is complete up to the last processed variable even if a later one fails.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::record::{FriedmanBlock, MannWhitneyBlock, ReportMeta, VariableBlock};

/// Errors from report output
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// Writing a report file failed
    #[error("failed to write {}", path.display())]
    Io {
        /// Output file path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Writing the comparisons CSV failed
    #[error("failed to write comparisons CSV {}", path.display())]
    Csv {
        /// Output file path
        path: PathBuf,
        /// Underlying CSV error
        #[source]
        source: ::csv::Error,
    },
}

/// Append-per-block text report writer
pub struct TextReport {
    writer: BufWriter<File>,
    path: PathBuf,
    current_variable: Option<String>,
}

impl TextReport {
    /// Create the report file and write its header
    pub fn create(path: &Path, title: &str, meta: &ReportMeta) -> Result<Self, ReportError> {
        let file = File::create(path).map_err(|source| ReportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut report = Self {
            writer: BufWriter::new(file),
            path: path.to_path_buf(),
            current_variable: None,
        };
        let header = format!(
            "{}\nGenerated: {} by trialstat {}\nInputs: {}\n\n",
            title,
            meta.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            meta.tool_version,
            meta.inputs.join(", "),
        );
        report.write_str(&header)?;
        Ok(report)
    }

    /// Append one block and flush it to disk
    pub fn write_block(&mut self, block: &VariableBlock) -> Result<(), ReportError> {
        match block {
            VariableBlock::Friedman(friedman) => {
                self.write_str(&format_friedman(friedman))?;
            }
            VariableBlock::MannWhitney(mann_whitney) => {
                if self.current_variable.as_deref() != Some(mann_whitney.variable.as_str()) {
                    self.write_str(&variable_header(&mann_whitney.variable))?;
                    self.current_variable = Some(mann_whitney.variable.clone());
                }
                self.write_str(&format_round_section(mann_whitney))?;
            }
        }
        self.flush()
    }

    fn write_str(&mut self, text: &str) -> Result<(), ReportError> {
        self.writer
            .write_all(text.as_bytes())
            .map_err(|source| ReportError::Io {
                path: self.path.clone(),
                source,
            })
    }

    fn flush(&mut self) -> Result<(), ReportError> {
        self.writer.flush().map_err(|source| ReportError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

/// Canonical text rendering of one block
pub fn format_block(block: &VariableBlock) -> String {
    match block {
        VariableBlock::Friedman(friedman) => format_friedman(friedman),
        VariableBlock::MannWhitney(mann_whitney) => format!(
            "{}{}",
            variable_header(&mann_whitney.variable),
            format_round_section(mann_whitney)
        ),
    }
}

fn variable_header(variable: &str) -> String {
    format!("=== Variable: {} ===\n", variable)
}

fn format_friedman(block: &FriedmanBlock) -> String {
    let mut out = variable_header(&block.variable);
    out.push_str(&format!("Chi-square: {:.4}\n", block.statistic));
    out.push_str(&format!("Degrees of freedom: {}\n", block.degrees_of_freedom));
    out.push_str(&format!("p-value: {:.4}\n", block.p_value));
    if block.dropped_patients > 0 {
        out.push_str(&format!(
            "Patients dropped (incomplete): {}\n",
            block.dropped_patients
        ));
    }
    out.push('\n');
    out.push_str("Pairwise comparisons (Nemenyi test):\n");
    out.push_str(&format_posthoc_matrix(&block.rounds, &block.posthoc));
    out.push('\n');
    out
}

/// Render the k × k p-value matrix with aligned columns; NaN cells print NA
fn format_posthoc_matrix(rounds: &[String], posthoc: &[Vec<f64>]) -> String {
    let label_width = rounds.iter().map(String::len).max().unwrap_or(1).max(6);

    let mut out = String::new();
    out.push_str(&" ".repeat(label_width));
    for round in rounds {
        out.push_str(&format!("  {:>width$}", round, width = label_width));
    }
    out.push('\n');

    for (i, round) in rounds.iter().enumerate() {
        out.push_str(&format!("{:<width$}", round, width = label_width));
        for j in 0..rounds.len() {
            let cell = posthoc[i][j];
            let text = if cell.is_nan() {
                "NA".to_string()
            } else {
                format!("{:.4}", cell)
            };
            out.push_str(&format!("  {:>width$}", text, width = label_width));
        }
        out.push('\n');
    }
    out
}

fn format_round_section(block: &MannWhitneyBlock) -> String {
    let mut out = format!("\nRound {}:\n", block.round);
    for group in [&block.group_a, &block.group_b] {
        out.push_str(&format!(
            "{} - n: {}, median (IQR): {:.2} ({:.2})\n",
            group.name, group.n, group.median, group.iqr
        ));
    }
    out.push_str(&format!("U statistic: {:.4}\n", block.u_statistic));
    out.push_str(&format!("p-value: {:.4}\n", block.p_value));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::GroupStats;

    fn friedman_block() -> FriedmanBlock {
        FriedmanBlock {
            variable: "pain_score".to_string(),
            statistic: 5.0,
            degrees_of_freedom: 2,
            p_value: 0.0821,
            rounds: vec!["1".to_string(), "2".to_string(), "3".to_string()],
            posthoc: vec![
                vec![1.0, 0.45, 0.05],
                vec![0.45, 1.0, f64::NAN],
                vec![0.05, f64::NAN, 1.0],
            ],
            dropped_patients: 1,
        }
    }

    fn mann_whitney_block(round: &str) -> MannWhitneyBlock {
        MannWhitneyBlock {
            variable: "pain_score".to_string(),
            round: round.to_string(),
            group_a: GroupStats {
                name: "Group A".to_string(),
                n: 3,
                median: 6.0,
                q1: 5.5,
                q3: 6.5,
                iqr: 1.0,
            },
            group_b: GroupStats {
                name: "Group B".to_string(),
                n: 3,
                median: 2.0,
                q1: 1.5,
                q3: 2.5,
                iqr: 1.0,
            },
            u_statistic: 9.0,
            p_value: 0.1,
        }
    }

    #[test]
    fn test_friedman_block_rendering() {
        let text = format_block(&VariableBlock::Friedman(friedman_block()));
        assert!(text.contains("=== Variable: pain_score ==="));
        assert!(text.contains("Chi-square: 5.0000"));
        assert!(text.contains("Degrees of freedom: 2"));
        assert!(text.contains("p-value: 0.0821"));
        assert!(text.contains("Patients dropped (incomplete): 1"));
        assert!(text.contains("Pairwise comparisons (Nemenyi test):"));
        // NaN post-hoc cells render as NA, never as a number
        assert!(text.contains("NA"));
        assert!(!text.contains("NaN"));
    }

    #[test]
    fn test_mann_whitney_block_rendering() {
        let text = format_block(&VariableBlock::MannWhitney(mann_whitney_block("1")));
        assert!(text.contains("=== Variable: pain_score ==="));
        assert!(text.contains("Round 1:"));
        assert!(text.contains("Group A - n: 3, median (IQR): 6.00 (1.00)"));
        assert!(text.contains("U statistic: 9.0000"));
        assert!(text.contains("p-value: 0.1000"));
    }

    #[test]
    fn test_append_per_block_survives_partial_run() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.txt");
        let meta = ReportMeta::new(vec!["a.csv".to_string()]);

        let mut report = TextReport::create(&path, "FRIEDMAN TEST RESULTS", &meta).unwrap();
        report
            .write_block(&VariableBlock::Friedman(friedman_block()))
            .unwrap();

        // Each block is flushed eagerly: the file is already complete
        // without dropping the writer.
        let on_disk = std::fs::read_to_string(&path).unwrap();
        assert!(on_disk.starts_with("FRIEDMAN TEST RESULTS\n"));
        assert!(on_disk.contains("Chi-square: 5.0000"));
    }

    #[test]
    fn test_variable_header_written_once_per_variable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.txt");
        let meta = ReportMeta::new(vec!["a.csv".to_string(), "b.csv".to_string()]);

        let mut report = TextReport::create(&path, "MANN-WHITNEY TEST RESULTS", &meta).unwrap();
        report
            .write_block(&VariableBlock::MannWhitney(mann_whitney_block("1")))
            .unwrap();
        report
            .write_block(&VariableBlock::MannWhitney(mann_whitney_block("2")))
            .unwrap();
        drop(report);

        let on_disk = std::fs::read_to_string(&path).unwrap();
        assert_eq!(on_disk.matches("=== Variable: pain_score ===").count(), 1);
        assert!(on_disk.contains("Round 1:"));
        assert!(on_disk.contains("Round 2:"));
    }
}
