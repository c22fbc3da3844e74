//! JSON Output

use crate::record::AnalysisReport;

/// Generate a prettified JSON report.
///
/// Serializes the analysis run into machine-readable JSON format. NaN
/// p-values (skipped post-hoc cells) serialize as `null`.
pub fn generate_json_report(report: &AnalysisReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}
