use crate::utils::parser;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tmdtune::core::response::{DEFAULT_MAIN_DAMPING_RATIO, ScanGrid};
use tmdtune::workflows::analysis::{ANALYSIS_GRID, SweptParameter};

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "The tmdtune Developers",
    version,
    about = "tmdtune CLI - Tune the mass, damping and frequency ratios of a tuned mass damper with the Bees Algorithm.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads used to evaluate candidates in parallel.
    /// Only effective when built with the `parallel` feature.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search for the absorber ratios that minimize the peak response of the main system.
    Tune(TuneArgs),
    /// Evaluate the response curve of a fixed absorber design.
    Scan(ScanArgs),
    /// Compare response curves around the optimal tuning, varying one design ratio.
    Analyze(AnalyzeArgs),
}

/// Arguments for the `tune` subcommand.
#[derive(Args, Debug, Default)]
pub struct TuneArgs {
    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // --- Main System ---
    /// Main-system mass in kg.
    #[arg(short = 'M', long, value_name = "KG")]
    pub main_mass: Option<f64>,

    /// Main-system natural frequency in rad/s.
    #[arg(short = 'W', long, value_name = "RAD_PER_S")]
    pub main_frequency: Option<f64>,

    /// Main-system damping ratio used by the response model.
    #[arg(long, value_name = "FLOAT")]
    pub main_damping: Option<f64>,

    // --- Tool Holder ---
    /// Derive the main mass and frequency from a cantilevered tool holder.
    /// Implied by any of the --tool-* options.
    #[arg(long)]
    pub tool: bool,

    /// Tool holder length in mm (default 808).
    #[arg(long, value_name = "MM")]
    pub tool_length: Option<f64>,

    /// Tool holder diameter in mm (default 20).
    #[arg(long, value_name = "MM")]
    pub tool_diameter: Option<f64>,

    /// Tool holder material: steel, aluminum or carbide (default steel).
    #[arg(long, value_name = "NAME")]
    pub tool_material: Option<String>,

    /// Tool holder mass in kg. Defaults to 3.94 for the reference holder and to
    /// density times volume for any other geometry or material.
    #[arg(long, value_name = "KG")]
    pub tool_mass: Option<f64>,

    // --- Search Space ---
    /// Bounds of the mass ratio (absorber mass / main mass).
    #[arg(long, value_name = "MIN,MAX", value_parser = parser::parse_bound_pair)]
    pub mass_ratio_bounds: Option<(f64, f64)>,

    /// Bounds of the absorber damping ratio.
    #[arg(long, value_name = "MIN,MAX", value_parser = parser::parse_bound_pair)]
    pub damping_ratio_bounds: Option<(f64, f64)>,

    /// Bounds of the frequency ratio (absorber frequency / main frequency).
    #[arg(long, value_name = "MIN,MAX", value_parser = parser::parse_bound_pair)]
    pub frequency_ratio_bounds: Option<(f64, f64)>,

    // --- Algorithm ---
    /// Optimization algorithm to use (e.g., 'bees').
    #[arg(short, long, value_name = "NAME")]
    pub algorithm: Option<String>,

    /// Number of scout bees per generation (n).
    #[arg(short = 'n', long, value_name = "INT")]
    pub scouts: Option<usize>,

    /// Number of sites selected for neighborhood search (m).
    #[arg(short = 'm', long, value_name = "INT")]
    pub selected_sites: Option<usize>,

    /// Number of the selected sites treated as elite (e).
    #[arg(short = 'e', long, value_name = "INT")]
    pub elite_sites: Option<usize>,

    /// Bees recruited around each elite site (nep).
    #[arg(long, value_name = "INT")]
    pub elite_recruits: Option<usize>,

    /// Bees recruited around each other selected site (nsp).
    #[arg(long, value_name = "INT")]
    pub selected_recruits: Option<usize>,

    /// Initial neighborhood size as a fraction of each range (ngh).
    #[arg(long, value_name = "FLOAT")]
    pub patch_size: Option<f64>,

    /// Number of generations to run.
    #[arg(long, value_name = "INT")]
    pub max_iterations: Option<usize>,

    /// Seed for the random number generator, for reproducible runs.
    #[arg(short, long, value_name = "INT")]
    pub seed: Option<u64>,

    /// Report the best value every 10 generations while searching.
    #[arg(long)]
    pub verbose_search: bool,

    // --- Output ---
    /// Write per-generation statistics to a CSV file.
    #[arg(long, value_name = "PATH")]
    pub history: Option<PathBuf>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S bees.max-iterations=200
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `scan` subcommand.
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Mass ratio of the absorber design.
    #[arg(long, value_name = "FLOAT")]
    pub mass_ratio: f64,

    /// Damping ratio of the absorber design.
    #[arg(long, value_name = "FLOAT")]
    pub damping_ratio: f64,

    /// Frequency ratio of the absorber design.
    #[arg(long, value_name = "FLOAT")]
    pub frequency_ratio: f64,

    /// Main-system damping ratio used by the response model.
    #[arg(long, value_name = "FLOAT", default_value_t = DEFAULT_MAIN_DAMPING_RATIO)]
    pub main_damping: f64,

    /// Range of forcing frequency ratios to scan.
    #[arg(long, value_name = "MIN,MAX", value_parser = parser::parse_bound_pair,
          default_value = "0.1,2.5")]
    pub range: (f64, f64),

    /// Number of evenly spaced points in the scanned range.
    #[arg(long, value_name = "INT", default_value_t = ScanGrid::DEFAULT_POINTS)]
    pub points: usize,

    /// Write the response curve to a CSV file instead of standard output.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Design ratio varied by the `analyze` subcommand.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SweepKind {
    /// Frequency ratios 0.5 to 1.0 at the optimal damping.
    Frequency,
    /// Four fixed damping ratios plus the optimum, at the optimal tuning.
    Damping,
    /// Mass ratios 0.05 to 0.55, each optimally tuned and damped.
    Mass,
}

impl From<SweepKind> for SweptParameter {
    fn from(kind: SweepKind) -> Self {
        match kind {
            SweepKind::Frequency => SweptParameter::FrequencyRatio,
            SweepKind::Damping => SweptParameter::DampingRatio,
            SweepKind::Mass => SweptParameter::MassRatio,
        }
    }
}

/// Arguments for the `analyze` subcommand.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Which design ratio to vary.
    #[arg(value_enum)]
    pub sweep: SweepKind,

    /// Mass ratio the optimal tuning and damping are computed for.
    #[arg(long, value_name = "FLOAT", default_value_t = 0.05)]
    pub mass_ratio: f64,

    /// Main-system damping ratio used by the response model.
    #[arg(long, value_name = "FLOAT", default_value_t = DEFAULT_MAIN_DAMPING_RATIO)]
    pub main_damping: f64,

    /// Range of forcing frequency ratios to scan.
    #[arg(long, value_name = "MIN,MAX", value_parser = parser::parse_bound_pair,
          default_value = "0.1,2.0")]
    pub range: (f64, f64),

    /// Number of evenly spaced points in the scanned range.
    #[arg(long, value_name = "INT", default_value_t = ANALYSIS_GRID.points)]
    pub points: usize,

    /// Write the curve family to a CSV file instead of standard output.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn tune_parses_bounds_and_hyperparameters() {
        let cli = Cli::try_parse_from([
            "tmdtune",
            "tune",
            "-M",
            "1000",
            "-W",
            "10",
            "--mass-ratio-bounds",
            "0.05,0.5",
            "-n",
            "30",
            "--seed",
            "7",
            "-S",
            "bees.nep=12",
        ])
        .unwrap();
        let Commands::Tune(args) = cli.command else {
            panic!("expected the tune subcommand");
        };
        assert_eq!(args.main_mass, Some(1000.0));
        assert_eq!(args.main_frequency, Some(10.0));
        assert_eq!(args.mass_ratio_bounds, Some((0.05, 0.5)));
        assert_eq!(args.scouts, Some(30));
        assert_eq!(args.seed, Some(7));
        assert_eq!(args.set_values, vec!["bees.nep=12".to_string()]);
    }

    #[test]
    fn tune_rejects_malformed_bounds() {
        assert!(
            Cli::try_parse_from(["tmdtune", "tune", "--damping-ratio-bounds", "0.5"]).is_err()
        );
    }

    #[test]
    fn scan_uses_default_grid() {
        let cli = Cli::try_parse_from([
            "tmdtune",
            "scan",
            "--mass-ratio",
            "0.1",
            "--damping-ratio",
            "0.1",
            "--frequency-ratio",
            "0.9",
        ])
        .unwrap();
        let Commands::Scan(args) = cli.command else {
            panic!("expected the scan subcommand");
        };
        assert_eq!(args.range, (ScanGrid::DEFAULT_START, ScanGrid::DEFAULT_END));
        assert_eq!(args.points, 100);
        assert_eq!(args.main_damping, 0.05);
    }

    #[test]
    fn tune_parses_tool_holder_options() {
        let cli = Cli::try_parse_from([
            "tmdtune",
            "tune",
            "--tool-length",
            "600",
            "--tool-material",
            "carbide",
        ])
        .unwrap();
        let Commands::Tune(args) = cli.command else {
            panic!("expected the tune subcommand");
        };
        assert!(!args.tool);
        assert_eq!(args.tool_length, Some(600.0));
        assert_eq!(args.tool_diameter, None);
        assert_eq!(args.tool_material.as_deref(), Some("carbide"));
    }

    #[test]
    fn analyze_takes_a_sweep_kind_and_defaults_to_the_analysis_grid() {
        let cli = Cli::try_parse_from(["tmdtune", "analyze", "damping"]).unwrap();
        let Commands::Analyze(args) = cli.command else {
            panic!("expected the analyze subcommand");
        };
        assert_eq!(args.sweep, SweepKind::Damping);
        assert_eq!(args.mass_ratio, 0.05);
        assert_eq!(args.range, (0.1, 2.0));
        assert_eq!(args.points, 381);
        assert_eq!(
            SweptParameter::from(args.sweep),
            SweptParameter::DampingRatio
        );

        assert!(Cli::try_parse_from(["tmdtune", "analyze", "stiffness"]).is_err());
    }
}
