#![warn(missing_docs)]
//! Trialstat Plot - Comparison Charts
//!
//! Renders one image per variable: paired box plots of the two cohorts over
//! the evaluation rounds, with a median trend line per cohort and a dashed
//! linear trend overlay. Rendering failures are isolated per variable so one
//! degenerate column never aborts the remaining charts.

mod boxplot;

use std::path::{Path, PathBuf};

use plotters::prelude::*;

use trialstat_core::ObservationTable;

use crate::boxplot::{draw_variable, GroupSeries};

/// Output image format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// Raster PNG
    Png,
    /// Vector SVG
    Svg,
}

impl ImageFormat {
    /// File extension for the format
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Svg => "svg",
        }
    }
}

impl std::str::FromStr for ImageFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "png" => Ok(ImageFormat::Png),
            "svg" => Ok(ImageFormat::Svg),
            other => Err(format!("Unknown image format: {}", other)),
        }
    }
}

/// Chart rendering options
#[derive(Debug, Clone)]
pub struct PlotOptions {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Output format
    pub format: ImageFormat,
    /// Display name of the first cohort
    pub group_a_label: String,
    /// Display name of the second cohort
    pub group_b_label: String,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            format: ImageFormat::Png,
            group_a_label: "Group A".to_string(),
            group_b_label: "Group B".to_string(),
        }
    }
}

/// Errors from chart rendering
#[derive(Debug, thiserror::Error)]
pub enum PlotError {
    /// Output directory could not be created
    #[error("failed to create plot directory {}", path.display())]
    Io {
        /// The directory path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Neither cohort has any data for the variable
    #[error("no data to plot for '{variable}'")]
    NoData {
        /// The empty variable
        variable: String,
    },

    /// The drawing backend failed
    #[error("rendering failed: {0}")]
    Render(String),
}

/// Render one comparison chart per variable
///
/// Returns one entry per variable with the written path or the isolated
/// failure; the outer error covers only output-directory creation.
pub fn render_comparison_plots(
    table_a: &ObservationTable,
    table_b: &ObservationTable,
    variables: &[String],
    rounds: &[String],
    out_dir: &Path,
    options: &PlotOptions,
) -> Result<Vec<(String, Result<PathBuf, PlotError>)>, PlotError> {
    std::fs::create_dir_all(out_dir).map_err(|source| PlotError::Io {
        path: out_dir.to_path_buf(),
        source,
    })?;

    let results = variables
        .iter()
        .map(|variable| {
            let outcome = render_variable(table_a, table_b, variable, rounds, out_dir, options);
            (variable.clone(), outcome)
        })
        .collect();
    Ok(results)
}

fn render_variable(
    table_a: &ObservationTable,
    table_b: &ObservationTable,
    variable: &str,
    rounds: &[String],
    out_dir: &Path,
    options: &PlotOptions,
) -> Result<PathBuf, PlotError> {
    let collect = |table: &ObservationTable| -> Vec<Vec<f64>> {
        rounds
            .iter()
            .map(|round| table.values_for_round(variable, round))
            .collect()
    };
    let per_round_a = collect(table_a);
    let per_round_b = collect(table_b);

    if per_round_a.iter().all(Vec::is_empty) && per_round_b.iter().all(Vec::is_empty) {
        return Err(PlotError::NoData {
            variable: variable.to_string(),
        });
    }

    let groups = [
        GroupSeries {
            name: &options.group_a_label,
            color: BLUE,
            offset: -0.18,
            per_round: per_round_a,
        },
        GroupSeries {
            name: &options.group_b_label,
            color: RED,
            offset: 0.18,
            per_round: per_round_b,
        },
    ];

    let filename = format!(
        "{}.{}",
        sanitize_variable_name(variable),
        options.format.extension()
    );
    let path = out_dir.join(filename);

    match options.format {
        ImageFormat::Png => {
            let root =
                BitMapBackend::new(&path, (options.width, options.height)).into_drawing_area();
            draw_variable(&root, variable, rounds, &groups)?;
            root.present()
                .map_err(|e| PlotError::Render(e.to_string()))?;
        }
        ImageFormat::Svg => {
            let root = SVGBackend::new(&path, (options.width, options.height)).into_drawing_area();
            draw_variable(&root, variable, rounds, &groups)?;
            root.present()
                .map_err(|e| PlotError::Render(e.to_string()))?;
        }
    }

    Ok(path)
}

/// Make a variable name safe as a file stem
pub fn sanitize_variable_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            ' ' | '/' | '\\' => '_',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cohort(offset: f64) -> ObservationTable {
        let mut table = ObservationTable::new(vec!["pain score".to_string()]);
        for patient in 0..4 {
            for round in 1..=3 {
                let value = offset + patient as f64 + round as f64;
                table
                    .push_row(
                        format!("P{patient}"),
                        round.to_string(),
                        vec![Some(value)],
                    )
                    .unwrap();
            }
        }
        table
    }

    #[test]
    fn test_sanitize_variable_name() {
        assert_eq!(sanitize_variable_name("pain score"), "pain_score");
        assert_eq!(sanitize_variable_name("ROM flex/ext"), "ROM_flex_ext");
        assert_eq!(sanitize_variable_name("simple"), "simple");
    }

    #[test]
    fn test_renders_one_file_per_variable() {
        let dir = tempfile::tempdir().unwrap();
        let options = PlotOptions {
            format: ImageFormat::Svg,
            ..Default::default()
        };
        let rounds = vec!["1".to_string(), "2".to_string(), "3".to_string()];
        let variables = vec!["pain score".to_string()];

        let results = render_comparison_plots(
            &cohort(0.0),
            &cohort(5.0),
            &variables,
            &rounds,
            dir.path(),
            &options,
        )
        .unwrap();

        assert_eq!(results.len(), 1);
        let path = results[0].1.as_ref().unwrap();
        assert!(path.ends_with("pain_score.svg"));
        assert!(path.exists());
        assert!(std::fs::metadata(path).unwrap().len() > 0);
    }

    #[test]
    fn test_failure_isolated_per_variable() {
        let dir = tempfile::tempdir().unwrap();
        let options = PlotOptions {
            format: ImageFormat::Svg,
            ..Default::default()
        };
        let rounds = vec!["1".to_string(), "2".to_string(), "3".to_string()];
        // "ghost" exists in neither table: NoData for it, success for the rest
        let variables = vec!["ghost".to_string(), "pain score".to_string()];

        let results = render_comparison_plots(
            &cohort(0.0),
            &cohort(5.0),
            &variables,
            &rounds,
            dir.path(),
            &options,
        )
        .unwrap();

        assert!(matches!(results[0].1, Err(PlotError::NoData { .. })));
        assert!(results[1].1.is_ok());
    }
}
