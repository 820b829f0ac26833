use clap::{Args, Parser, Subcommand, ValueEnum};
use modloc::core::io::report::ReportFormat;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "The modloc developers",
    version,
    about = "modloc - localize post-translational modifications on peptides by maximum-weight site assignment.",
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

    /// Set the number of threads for batch localization.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Assign modification instances to peptide sites for every peptide of a problem file.
    Localize(LocalizeArgs),
    /// Realign reported modification positions onto the nearest allowed positions.
    Align(AlignArgs),
    /// List the built-in table of known modification masses.
    Catalog,
}

/// Arguments for the `localize` subcommand.
#[derive(Args, Debug)]
pub struct LocalizeArgs {
    /// Path to the problem file in TOML format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Optional CSV table of site scores merged over the problem file.
    #[arg(short, long, value_name = "PATH")]
    pub scores: Option<PathBuf>,

    /// Path for the report. The report goes to standard output when omitted.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Report format. Guessed from the output extension when omitted.
    #[arg(short, long, value_enum, value_name = "FORMAT")]
    pub format: Option<FormatArg>,

    /// Path to a solver configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the evidence threshold; scores at or below it are ignored.
    #[arg(short = 't', long, value_name = "FLOAT")]
    pub score_threshold: Option<f64>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S solver.tie-tolerance=1e-6
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatArg {
    Toml,
    Csv,
}

impl From<FormatArg> for ReportFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Toml => ReportFormat::Toml,
            FormatArg::Csv => ReportFormat::Csv,
        }
    }
}

/// Arguments for the `align` subcommand.
#[derive(Args, Debug)]
pub struct AlignArgs {
    /// Reported positions, comma separated.
    #[arg(long, required = true, value_delimiter = ',', value_name = "POS,...")]
    pub from: Vec<u32>,

    /// Allowed positions, comma separated.
    #[arg(long, required = true, value_delimiter = ',', value_name = "POS,...")]
    pub to: Vec<u32>,

    /// Keep claiming rounds going until no more positions can be placed.
    #[arg(long)]
    pub all: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_localize_with_global_flags() {
        let cli = Cli::parse_from([
            "modloc", "-vv", "localize", "-i", "problem.toml", "-s", "scores.csv", "--format",
            "csv", "-S", "solver.tie-tolerance=1e-6", "-j", "4",
        ]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.threads, Some(4));
        let Commands::Localize(args) = cli.command else {
            panic!("Expected 'localize' subcommand");
        };
        assert_eq!(args.input, PathBuf::from("problem.toml"));
        assert_eq!(args.scores, Some(PathBuf::from("scores.csv")));
        assert_eq!(args.format, Some(FormatArg::Csv));
        assert_eq!(args.set_values, vec!["solver.tie-tolerance=1e-6".to_string()]);
    }

    #[test]
    fn parses_comma_separated_positions() {
        let cli = Cli::parse_from(["modloc", "align", "--from", "1,5,9", "--to", "2,6", "--all"]);
        let Commands::Align(args) = cli.command else {
            panic!("Expected 'align' subcommand");
        };
        assert_eq!(args.from, vec![1, 5, 9]);
        assert_eq!(args.to, vec![2, 6]);
        assert!(args.all);
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["modloc", "-q", "-v", "catalog"]);
        assert!(result.is_err());
    }
}
