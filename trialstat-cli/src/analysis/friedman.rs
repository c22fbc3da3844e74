//! Repeated-Measures Pipeline
//!
//! Friedman test with Nemenyi post-hoc comparisons, one variable at a time.
//! Variables are processed strictly sequentially; a degenerate column skips
//! with a logged reason and never aborts the run.

use std::path::PathBuf;

use tracing::{info, warn};

use trialstat_core::{load_observation_table, DataError, ObservationTable};
use trialstat_report::{
    generate_json_report, write_comparisons_csv, AnalysisReport, FriedmanBlock,
    PairwiseComparison, ReportMeta, RunSummary, SkipReason, TextReport, VariableBlock,
};
use trialstat_stats::{
    friedman_test, nemenyi_friedman, MIN_FRIEDMAN_PATIENTS, MIN_FRIEDMAN_ROUNDS,
};

use super::outcome::skip_reason;

/// Parameters of one Friedman run
#[derive(Debug, Clone)]
pub struct FriedmanRun {
    /// Input CSV path
    pub input: PathBuf,
    /// First variable column, as a 0-based file column index
    pub start_col: usize,
    /// Last variable column (inclusive); `None` means the last file column
    pub end_col: Option<usize>,
    /// Text report output path
    pub report: PathBuf,
    /// Comparisons CSV output path
    pub comparisons: PathBuf,
    /// Optional restriction to named variables
    pub variables: Option<Vec<String>>,
    /// Optional JSON report output path
    pub json: Option<PathBuf>,
}

/// Outcome of analyzing one variable
#[derive(Debug, Clone)]
pub enum FriedmanAnalysis {
    /// The variable produced a report block and its pairwise records
    Tested {
        /// Report block for the text/JSON outputs
        block: FriedmanBlock,
        /// One record per non-NaN unordered round pair
        comparisons: Vec<PairwiseComparison>,
    },
    /// The variable was skipped
    Skipped(SkipReason),
}

/// Run the Friedman pipeline end to end
pub fn run_friedman(params: &FriedmanRun) -> anyhow::Result<()> {
    let table = load_observation_table(&params.input)?;

    let end_col = params.end_col.unwrap_or(table.variables().len() + 1);
    let mut selected = table.select_columns(params.start_col, end_col)?;
    if let Some(filter) = &params.variables {
        for name in filter {
            if !table.variables().contains(name) {
                return Err(DataError::UnknownVariable {
                    variable: name.clone(),
                }
                .into());
            }
        }
        selected.retain(|variable| filter.contains(variable));
    }

    let meta = ReportMeta::new(vec![params.input.display().to_string()]);
    let mut text = TextReport::create(&params.report, "FRIEDMAN TEST RESULTS", &meta)?;

    let mut summary = RunSummary::default();
    let mut blocks = Vec::new();
    let mut pairwise = Vec::new();

    for variable in &selected {
        match analyze_variable(&table, variable) {
            FriedmanAnalysis::Tested { block, comparisons } => {
                info!(%variable, "variable processed");
                text.write_block(&VariableBlock::Friedman(block.clone()))?;
                blocks.push(VariableBlock::Friedman(block));
                pairwise.extend(comparisons);
                summary.record_processed();
            }
            FriedmanAnalysis::Skipped(reason) => {
                warn!(%variable, %reason, "variable skipped");
                summary.record_skip(variable, None, reason);
            }
        }
    }

    if write_comparisons_csv(&params.comparisons, &pairwise)? {
        println!("Comparisons written to: {}", params.comparisons.display());
    }

    if let Some(json_path) = &params.json {
        let report = AnalysisReport {
            meta,
            blocks,
            pairwise,
            groupwise: Vec::new(),
            summary: summary.clone(),
        };
        std::fs::write(json_path, generate_json_report(&report)?)?;
        println!("JSON report written to: {}", json_path.display());
    }

    println!(
        "Processed: {}  Skipped: {}",
        summary.processed,
        summary.skipped.len()
    );
    Ok(())
}

/// Analyze one variable, returning an explicit outcome
pub fn analyze_variable(table: &ObservationTable, variable: &str) -> FriedmanAnalysis {
    if table.is_non_numeric(variable) {
        return FriedmanAnalysis::Skipped(SkipReason::NonNumeric);
    }

    let column = table.column(variable);
    if column.is_empty() {
        return FriedmanAnalysis::Skipped(SkipReason::IncompleteDesign);
    }
    if column.iter().any(Option::is_none) {
        return FriedmanAnalysis::Skipped(SkipReason::MissingValues);
    }

    let values: Vec<f64> = column.into_iter().flatten().collect();
    if values.iter().all(|v| *v == values[0]) {
        return FriedmanAnalysis::Skipped(SkipReason::ZeroVariance);
    }

    let matrix = table.pivot(variable);
    if matrix.n_rounds() < MIN_FRIEDMAN_ROUNDS || matrix.n_patients() < MIN_FRIEDMAN_PATIENTS {
        return FriedmanAnalysis::Skipped(SkipReason::IncompleteDesign);
    }
    if matrix.is_constant() {
        return FriedmanAnalysis::Skipped(SkipReason::ZeroVariance);
    }

    let result = match friedman_test(matrix.rows()) {
        Ok(result) => result,
        Err(error) => return FriedmanAnalysis::Skipped(skip_reason(&error)),
    };
    let posthoc = match nemenyi_friedman(matrix.rows()) {
        Ok(posthoc) => posthoc,
        Err(error) => return FriedmanAnalysis::Skipped(skip_reason(&error)),
    };

    let rounds = matrix.rounds();
    let mut comparisons = Vec::new();
    for (i, j, p_value) in posthoc.pairwise() {
        if p_value.is_nan() {
            warn!(
                variable,
                round_a = %rounds[i],
                round_b = %rounds[j],
                "post-hoc p-value is NaN; comparison skipped"
            );
            continue;
        }
        comparisons.push(PairwiseComparison {
            variable: variable.to_string(),
            round_a: rounds[i].clone(),
            round_b: rounds[j].clone(),
            p_value,
        });
    }

    let block = FriedmanBlock {
        variable: variable.to_string(),
        statistic: result.statistic,
        degrees_of_freedom: result.df,
        p_value: result.p_value,
        rounds: rounds.to_vec(),
        posthoc: posthoc.rows().to_vec(),
        dropped_patients: matrix.dropped_patients(),
    };
    FriedmanAnalysis::Tested { block, comparisons }
}
