//! Report Data Structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Complete analysis run, serializable as the JSON report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Run metadata
    pub meta: ReportMeta,
    /// One block per processed variable (or variable × round)
    pub blocks: Vec<VariableBlock>,
    /// Friedman/Nemenyi pairwise comparison records
    pub pairwise: Vec<PairwiseComparison>,
    /// Mann-Whitney group comparison records
    pub groupwise: Vec<GroupComparison>,
    /// Processed/skipped accounting
    pub summary: RunSummary,
}

/// Report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMeta {
    /// trialstat version that produced the report
    pub tool_version: String,
    /// Generation timestamp
    pub timestamp: DateTime<Utc>,
    /// Input file paths as given on the command line
    pub inputs: Vec<String>,
}

impl ReportMeta {
    /// Metadata stamped with the current time and crate version
    pub fn new(inputs: Vec<String>) -> Self {
        Self {
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now(),
            inputs,
        }
    }
}

/// One processed unit of analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "test", rename_all = "kebab-case")]
pub enum VariableBlock {
    /// Friedman test with Nemenyi post-hoc matrix
    Friedman(FriedmanBlock),
    /// Mann-Whitney comparison of two cohorts at one round
    MannWhitney(MannWhitneyBlock),
}

/// Friedman result for one variable
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FriedmanBlock {
    /// Variable name
    pub variable: String,
    /// Tie-corrected chi-square statistic
    pub statistic: f64,
    /// Degrees of freedom, rounds − 1
    pub degrees_of_freedom: usize,
    /// Two-sided p-value
    pub p_value: f64,
    /// Sorted round labels, indexing the post-hoc matrix
    pub rounds: Vec<String>,
    /// Full Nemenyi p-value matrix (NaN cells serialize as null)
    pub posthoc: Vec<Vec<f64>>,
    /// Patients dropped for missing at least one round
    pub dropped_patients: usize,
}

/// Mann-Whitney result for one variable at one round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MannWhitneyBlock {
    /// Variable name
    pub variable: String,
    /// Evaluation round
    pub round: String,
    /// First cohort descriptives
    pub group_a: GroupStats,
    /// Second cohort descriptives
    pub group_b: GroupStats,
    /// U statistic of the first cohort
    pub u_statistic: f64,
    /// Two-sided p-value
    pub p_value: f64,
}

/// Descriptive statistics for one cohort
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupStats {
    /// Display name of the cohort
    pub name: String,
    /// Valid observation count
    pub n: usize,
    /// Median
    pub median: f64,
    /// First quartile
    pub q1: f64,
    /// Third quartile
    pub q3: f64,
    /// Interquartile range, Q3 − Q1
    pub iqr: f64,
}

/// One Nemenyi pairwise comparison, one CSV row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairwiseComparison {
    /// Variable name
    pub variable: String,
    /// First round of the unordered pair
    pub round_a: String,
    /// Second round of the unordered pair
    pub round_b: String,
    /// Nemenyi post-hoc p-value
    pub p_value: f64,
}

/// One Mann-Whitney comparison, one CSV row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupComparison {
    /// Variable name
    pub variable: String,
    /// Evaluation round
    pub round: String,
    /// First cohort observation count
    pub n_a: usize,
    /// First cohort median
    pub median_a: f64,
    /// First cohort Q1
    pub q1_a: f64,
    /// First cohort Q3
    pub q3_a: f64,
    /// First cohort IQR
    pub iqr_a: f64,
    /// Second cohort observation count
    pub n_b: usize,
    /// Second cohort median
    pub median_b: f64,
    /// Second cohort Q1
    pub q1_b: f64,
    /// Second cohort Q3
    pub q3_b: f64,
    /// Second cohort IQR
    pub iqr_b: f64,
    /// U statistic of the first cohort
    pub u_statistic: f64,
    /// Two-sided p-value
    pub p_value: f64,
}

/// Why a unit of work was skipped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SkipReason {
    /// The variable has missing cells
    MissingValues,
    /// The variable has non-numeric cells
    NonNumeric,
    /// All values are identical; the test is undefined
    ZeroVariance,
    /// Too few complete patients or rounds for the repeated-measures design
    IncompleteDesign,
    /// A cohort has fewer than the minimum valid observations
    InsufficientGroup,
    /// The statistic or p-value evaluated to NaN
    InvalidStatistic,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            SkipReason::MissingValues => "missing values present",
            SkipReason::NonNumeric => "non-numeric data",
            SkipReason::ZeroVariance => "no variability in the data",
            SkipReason::IncompleteDesign => "incomplete repeated-measures design",
            SkipReason::InsufficientGroup => "insufficient observations in a group",
            SkipReason::InvalidStatistic => "invalid statistic result",
        };
        write!(f, "{}", text)
    }
}

/// One skipped unit of work
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedUnit {
    /// Variable name
    pub variable: String,
    /// Round, for per-round units; `None` when the whole variable skipped
    pub round: Option<String>,
    /// Why the unit was skipped
    pub reason: SkipReason,
}

/// Processed/skipped accounting for one run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunSummary {
    /// Units that produced a report block
    pub processed: usize,
    /// Units skipped, with their reasons
    pub skipped: Vec<SkippedUnit>,
}

impl RunSummary {
    /// Record one processed unit
    pub fn record_processed(&mut self) {
        self.processed += 1;
    }

    /// Record one skipped unit
    pub fn record_skip(&mut self, variable: &str, round: Option<&str>, reason: SkipReason) {
        self.skipped.push(SkippedUnit {
            variable: variable.to_string(),
            round: round.map(str::to_string),
            reason,
        });
    }
}
