//! Two-Cohort Pipeline
//!
//! Mann-Whitney U test between two independent cohorts, one (variable,
//! round) cell at a time. Cells are independent; a skipped cell logs its
//! reason and the loop continues.

use std::path::PathBuf;

use tracing::{info, warn};

use trialstat_core::{load_observation_table, DataError, ObservationTable};
use trialstat_plot::{render_comparison_plots, ImageFormat, PlotOptions};
use trialstat_report::{
    generate_json_report, write_comparisons_csv, AnalysisReport, GroupComparison, GroupStats,
    MannWhitneyBlock, ReportMeta, RunSummary, SkipReason, TextReport, VariableBlock,
};
use trialstat_stats::{mann_whitney_u, summarize, GroupSummary, MIN_GROUP_OBSERVATIONS};

use super::outcome::skip_reason;

/// Parameters of one Mann-Whitney run
#[derive(Debug, Clone)]
pub struct MannWhitneyRun {
    /// First cohort CSV path
    pub input_a: PathBuf,
    /// Second cohort CSV path
    pub input_b: PathBuf,
    /// Text report output path
    pub report: PathBuf,
    /// Comparisons CSV output path
    pub comparisons: PathBuf,
    /// Optional restriction to named variables
    pub variables: Option<Vec<String>>,
    /// Optional JSON report output path
    pub json: Option<PathBuf>,
    /// Optional directory for comparison box plots
    pub plots: Option<PathBuf>,
    /// Display name of the first cohort
    pub group_a: String,
    /// Display name of the second cohort
    pub group_b: String,
    /// Plot width in pixels
    pub plot_width: u32,
    /// Plot height in pixels
    pub plot_height: u32,
    /// Plot image format
    pub plot_format: ImageFormat,
}

/// Outcome of analyzing one (variable, round) cell
#[derive(Debug, Clone)]
pub enum CellAnalysis {
    /// The cell produced a report block and a comparison record
    Tested {
        /// Report block for the text/JSON outputs
        block: MannWhitneyBlock,
        /// One CSV row with both cohorts' descriptives and the test result
        comparison: GroupComparison,
    },
    /// The cell was skipped
    Skipped(SkipReason),
}

/// Run the Mann-Whitney pipeline end to end
pub fn run_mann_whitney(params: &MannWhitneyRun) -> anyhow::Result<()> {
    let table_a = load_observation_table(&params.input_a)?;
    let table_b = load_observation_table(&params.input_b)?;

    let mut variables = table_a.variables().to_vec();
    if let Some(filter) = &params.variables {
        for name in filter {
            if !table_a.variables().contains(name) {
                return Err(DataError::UnknownVariable {
                    variable: name.clone(),
                }
                .into());
            }
        }
        variables.retain(|variable| filter.contains(variable));
    }
    let rounds = table_a.rounds();

    let meta = ReportMeta::new(vec![
        params.input_a.display().to_string(),
        params.input_b.display().to_string(),
    ]);
    let mut text = TextReport::create(&params.report, "MANN-WHITNEY TEST RESULTS", &meta)?;

    let mut summary = RunSummary::default();
    let mut blocks = Vec::new();
    let mut groupwise = Vec::new();

    for variable in &variables {
        if table_a.is_non_numeric(variable) || table_b.is_non_numeric(variable) {
            warn!(%variable, reason = %SkipReason::NonNumeric, "variable skipped");
            summary.record_skip(variable, None, SkipReason::NonNumeric);
            continue;
        }

        for round in &rounds {
            match analyze_cell(
                &table_a,
                &table_b,
                variable,
                round,
                &params.group_a,
                &params.group_b,
            ) {
                CellAnalysis::Tested { block, comparison } => {
                    info!(%variable, round = %round, "cell processed");
                    text.write_block(&VariableBlock::MannWhitney(block.clone()))?;
                    blocks.push(VariableBlock::MannWhitney(block));
                    groupwise.push(comparison);
                    summary.record_processed();
                }
                CellAnalysis::Skipped(reason) => {
                    warn!(%variable, round = %round, %reason, "cell skipped");
                    summary.record_skip(variable, Some(round.as_str()), reason);
                }
            }
        }
    }

    if write_comparisons_csv(&params.comparisons, &groupwise)? {
        println!("Comparisons written to: {}", params.comparisons.display());
    }

    if let Some(json_path) = &params.json {
        let report = AnalysisReport {
            meta,
            blocks,
            pairwise: Vec::new(),
            groupwise,
            summary: summary.clone(),
        };
        std::fs::write(json_path, generate_json_report(&report)?)?;
        println!("JSON report written to: {}", json_path.display());
    }

    if let Some(plot_dir) = &params.plots {
        render_plots(params, &table_a, &table_b, &variables, &rounds, plot_dir);
    }

    println!(
        "Processed: {}  Skipped: {}",
        summary.processed,
        summary.skipped.len()
    );
    Ok(())
}

/// Analyze one (variable, round) cell, returning an explicit outcome
pub fn analyze_cell(
    table_a: &ObservationTable,
    table_b: &ObservationTable,
    variable: &str,
    round: &str,
    label_a: &str,
    label_b: &str,
) -> CellAnalysis {
    let values_a = table_a.values_for_round(variable, round);
    let values_b = table_b.values_for_round(variable, round);
    if values_a.len() < MIN_GROUP_OBSERVATIONS || values_b.len() < MIN_GROUP_OBSERVATIONS {
        return CellAnalysis::Skipped(SkipReason::InsufficientGroup);
    }

    let result = match mann_whitney_u(&values_a, &values_b) {
        Ok(result) => result,
        Err(error) => return CellAnalysis::Skipped(skip_reason(&error)),
    };

    let summary_a = summarize(&values_a);
    let summary_b = summarize(&values_b);

    let block = MannWhitneyBlock {
        variable: variable.to_string(),
        round: round.to_string(),
        group_a: group_stats(label_a, &summary_a),
        group_b: group_stats(label_b, &summary_b),
        u_statistic: result.u_statistic,
        p_value: result.p_value,
    };
    let comparison = GroupComparison {
        variable: variable.to_string(),
        round: round.to_string(),
        n_a: summary_a.n,
        median_a: summary_a.median,
        q1_a: summary_a.q1,
        q3_a: summary_a.q3,
        iqr_a: summary_a.iqr(),
        n_b: summary_b.n,
        median_b: summary_b.median,
        q1_b: summary_b.q1,
        q3_b: summary_b.q3,
        iqr_b: summary_b.iqr(),
        u_statistic: result.u_statistic,
        p_value: result.p_value,
    };
    CellAnalysis::Tested { block, comparison }
}

fn group_stats(name: &str, summary: &GroupSummary) -> GroupStats {
    GroupStats {
        name: name.to_string(),
        n: summary.n,
        median: summary.median,
        q1: summary.q1,
        q3: summary.q3,
        iqr: summary.iqr(),
    }
}

/// Render comparison charts; failures never abort the run
fn render_plots(
    params: &MannWhitneyRun,
    table_a: &ObservationTable,
    table_b: &ObservationTable,
    variables: &[String],
    rounds: &[String],
    plot_dir: &std::path::Path,
) {
    let options = PlotOptions {
        width: params.plot_width,
        height: params.plot_height,
        format: params.plot_format,
        group_a_label: params.group_a.clone(),
        group_b_label: params.group_b.clone(),
    };
    match render_comparison_plots(table_a, table_b, variables, rounds, plot_dir, &options) {
        Ok(results) => {
            let mut rendered = 0;
            for (variable, outcome) in results {
                match outcome {
                    Ok(path) => {
                        info!(%variable, path = %path.display(), "chart saved");
                        rendered += 1;
                    }
                    Err(error) => {
                        warn!(%variable, %error, "chart skipped");
                    }
                }
            }
            println!("{} chart(s) written to: {}", rendered, plot_dir.display());
        }
        Err(error) => {
            warn!(%error, "plot rendering unavailable");
        }
    }
}
