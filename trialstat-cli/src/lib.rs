#![warn(missing_docs)]
//! Trialstat CLI Library
//!
//! Command-line surface for the two analysis pipelines. Entry points take
//! explicit parameters only: input paths, a column range or variable list,
//! output paths, and plot styling — there is no configuration file.
//!
//! # Example
//!
//! ```ignore
//! trialstat friedman evaluations.csv \
//!     --start-col 2 --end-col 15 \
//!     --report results_friedman.txt \
//!     --comparisons results_friedman.csv
//!
//! trialstat mann-whitney cohort_ff.csv cohort_r.csv \
//!     --report results_mw.txt --comparisons comparisons_mw.csv \
//!     --plots charts/ --group-a CH_FF --group-b CH_R
//! ```

pub mod analysis;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use analysis::{run_friedman, run_mann_whitney, FriedmanRun, MannWhitneyRun};
use trialstat_plot::ImageFormat;

/// Trialstat CLI arguments
#[derive(Parser, Debug)]
#[command(name = "trialstat")]
#[command(author, version, about = "trialstat - non-parametric clinical-trial analysis")]
pub struct Cli {
    /// Analysis to run
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Friedman test with Nemenyi post-hoc over repeated evaluations
    Friedman {
        /// Input CSV: paciente, evaluacion, then measured variables
        input: PathBuf,

        /// First variable column (0-based file column index)
        #[arg(long, default_value = "2")]
        start_col: usize,

        /// Last variable column, inclusive (defaults to the last column)
        #[arg(long)]
        end_col: Option<usize>,

        /// Text report output path
        #[arg(long)]
        report: PathBuf,

        /// Comparisons CSV output path
        #[arg(long)]
        comparisons: PathBuf,

        /// Restrict the analysis to these variables
        #[arg(long, value_delimiter = ',')]
        variables: Option<Vec<String>>,

        /// Also write the full run as a JSON report
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Mann-Whitney U test between two independent cohorts
    MannWhitney {
        /// First cohort CSV
        input_a: PathBuf,

        /// Second cohort CSV (same schema as the first)
        input_b: PathBuf,

        /// Text report output path
        #[arg(long)]
        report: PathBuf,

        /// Comparisons CSV output path
        #[arg(long)]
        comparisons: PathBuf,

        /// Restrict the analysis to these variables
        #[arg(long, value_delimiter = ',')]
        variables: Option<Vec<String>>,

        /// Also write the full run as a JSON report
        #[arg(long)]
        json: Option<PathBuf>,

        /// Render comparison box plots into this directory
        #[arg(long)]
        plots: Option<PathBuf>,

        /// Display name of the first cohort
        #[arg(long, default_value = "Group A")]
        group_a: String,

        /// Display name of the second cohort
        #[arg(long, default_value = "Group B")]
        group_b: String,

        /// Plot width in pixels
        #[arg(long, default_value = "1280")]
        plot_width: u32,

        /// Plot height in pixels
        #[arg(long, default_value = "720")]
        plot_height: u32,

        /// Plot image format: png or svg
        #[arg(long, default_value = "png")]
        plot_format: ImageFormat,
    },
}

/// Run the trialstat CLI.
///
/// This is the entry point for the `trialstat` binary.
pub fn run() -> anyhow::Result<()> {
    run_with_cli(Cli::parse())
}

/// Run the trialstat CLI with pre-parsed arguments.
pub fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    // Initialize logging
    if cli.verbose {
        tracing_subscriber::fmt().with_env_filter("debug").init();
    } else {
        tracing_subscriber::fmt().with_env_filter("info").init();
    }

    match cli.command {
        Commands::Friedman {
            input,
            start_col,
            end_col,
            report,
            comparisons,
            variables,
            json,
        } => run_friedman(&FriedmanRun {
            input,
            start_col,
            end_col,
            report,
            comparisons,
            variables,
            json,
        }),
        Commands::MannWhitney {
            input_a,
            input_b,
            report,
            comparisons,
            variables,
            json,
            plots,
            group_a,
            group_b,
            plot_width,
            plot_height,
            plot_format,
        } => run_mann_whitney(&MannWhitneyRun {
            input_a,
            input_b,
            report,
            comparisons,
            variables,
            json,
            plots,
            group_a,
            group_b,
            plot_width,
            plot_height,
            plot_format,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_friedman_args() {
        let cli = Cli::parse_from([
            "trialstat",
            "friedman",
            "data.csv",
            "--end-col",
            "15",
            "--report",
            "out.txt",
            "--comparisons",
            "out.csv",
        ]);
        match cli.command {
            Commands::Friedman {
                input,
                start_col,
                end_col,
                ..
            } => {
                assert_eq!(input, PathBuf::from("data.csv"));
                assert_eq!(start_col, 2);
                assert_eq!(end_col, Some(15));
            }
            _ => panic!("expected friedman subcommand"),
        }
    }

    #[test]
    fn test_parse_mann_whitney_args() {
        let cli = Cli::parse_from([
            "trialstat",
            "mann-whitney",
            "a.csv",
            "b.csv",
            "--report",
            "out.txt",
            "--comparisons",
            "out.csv",
            "--plots",
            "charts",
            "--plot-format",
            "svg",
            "--variables",
            "dolor,fuerza",
        ]);
        match cli.command {
            Commands::MannWhitney {
                plot_format,
                variables,
                group_a,
                plot_width,
                ..
            } => {
                assert_eq!(plot_format, ImageFormat::Svg);
                assert_eq!(
                    variables,
                    Some(vec!["dolor".to_string(), "fuerza".to_string()])
                );
                assert_eq!(group_a, "Group A");
                assert_eq!(plot_width, 1280);
            }
            _ => panic!("expected mann-whitney subcommand"),
        }
    }
}
