use crate::cli::{FormatArg, LocalizeArgs};
use crate::config::PartialSolverConfig;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use modloc::{
    core::io::{
        problem::ProblemSet,
        report::{self, ReportFormat},
        scores::ScoreTable,
    },
    engine::progress::ProgressReporter,
    workflows,
};
use std::path::Path;
use tracing::{info, warn};

pub fn run(args: LocalizeArgs) -> Result<()> {
    info!("Merging configuration from file and CLI arguments...");
    let solver_config = PartialSolverConfig::for_args(&args)?.merge_with_cli(&args)?;

    info!("Loading problem file from {:?}", &args.input);
    let mut problems = ProblemSet::load(&args.input)?;

    if let Some(scores_path) = &args.scores {
        info!("Merging site scores from {:?}", scores_path);
        let table = ScoreTable::load(scores_path)?;
        table.apply(&mut problems)?;
    }

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    eprintln!(
        "Localizing {} peptide(s)...",
        problems.peptides.len()
    );
    let outcomes = workflows::batch::run(&problems.peptides, &solver_config, &reporter);

    for outcome in &outcomes {
        match &outcome.result {
            Ok(localization) => info!(
                "{}: {} (score {:.4})",
                outcome.name,
                localization.assignments,
                localization.total_score()
            ),
            Err(e) => warn!("{}: {}", outcome.name, e),
        }
    }

    let format = resolve_format(args.format, args.output.as_deref());
    match &args.output {
        Some(path) => {
            report::write_report_file(path, &outcomes, &problems.catalog, format)?;
            eprintln!("✓ Report written to: {}", path.display());
        }
        None => {
            report::write_report(
                &outcomes,
                &problems.catalog,
                format,
                std::io::stdout().lock(),
            )?;
        }
    }

    let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
    if failed > 0 {
        warn!("{} peptide(s) could not be localized.", failed);
        eprintln!("Warning: {failed} peptide(s) could not be localized; see the report for details.");
    }

    Ok(())
}

/// An explicit `--format` wins, then the output extension, then TOML.
fn resolve_format(format: Option<FormatArg>, output: Option<&Path>) -> ReportFormat {
    format
        .map(ReportFormat::from)
        .or_else(|| output.and_then(ReportFormat::from_path))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use std::fs;
    use tempfile::tempdir;

    const PROBLEM: &str = r#"
        [[modification]]
        id = 1
        name = "Light"
        mass = 1.0

        [[modification]]
        id = 2
        name = "Heavy"
        mass = 2.0

        [[peptide]]
        name = "REFERENCE"
        [[peptide.modification]]
        id = 1
        count = 1
        scores = { "1" = 123.5, "3" = 10.4, "5" = 0.0 }
        [[peptide.modification]]
        id = 2
        count = 2
        scores = { "3" = 95.3, "10" = 4.9, "17" = 51.7 }

        [[peptide]]
        name = "INCOMPLETE"
        [[peptide.modification]]
        id = 1
        count = 1
        sites = ["2", "4"]
        scores = { "2" = 1.0 }
    "#;

    fn localize_args(argv: &[&str]) -> LocalizeArgs {
        match Cli::parse_from(argv).command {
            Commands::Localize(args) => args,
            _ => panic!("Expected 'localize' subcommand"),
        }
    }

    #[test]
    fn format_resolution_order() {
        assert_eq!(resolve_format(None, None), ReportFormat::Toml);
        assert_eq!(
            resolve_format(None, Some(Path::new("out.csv"))),
            ReportFormat::Csv
        );
        assert_eq!(
            resolve_format(Some(FormatArg::Toml), Some(Path::new("out.csv"))),
            ReportFormat::Toml
        );
    }

    #[test]
    fn localize_writes_csv_report_and_keeps_going_past_failures() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("problem.toml");
        let output = dir.path().join("report.csv");
        fs::write(&input, PROBLEM).unwrap();

        let args = localize_args(&[
            "modloc",
            "localize",
            "-i",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
        ]);
        run(args).unwrap();

        let content = fs::read_to_string(&output).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(
            lines,
            vec![
                "peptide,modification,name,mass,site,score",
                "REFERENCE,1,Light,1,1,123.5",
                "REFERENCE,2,Heavy,2,3,95.3",
                "REFERENCE,2,Heavy,2,17,51.7",
            ]
        );
    }

    #[test]
    fn score_table_overrides_problem_scores() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("problem.toml");
        let scores = dir.path().join("scores.csv");
        let output = dir.path().join("report.toml");
        fs::write(&input, PROBLEM).unwrap();
        fs::write(
            &scores,
            "peptide,modification,site,score\nINCOMPLETE,1,4,9.0\nINCOMPLETE,1,2,0.0\n",
        )
        .unwrap();

        let args = localize_args(&[
            "modloc",
            "localize",
            "-i",
            input.to_str().unwrap(),
            "-s",
            scores.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
        ]);
        run(args).unwrap();

        let report: toml::Table = toml::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        let peptides = report["peptide"].as_array().unwrap();
        let incomplete = peptides[1].as_table().unwrap();
        assert_eq!(incomplete["status"].as_str(), Some("localized"));
        let assignment = incomplete["assignment"].as_array().unwrap();
        assert_eq!(assignment.len(), 1);
        assert_eq!(assignment[0]["site"].as_str(), Some("4"));
    }

    #[test]
    fn missing_problem_file_is_an_error() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        let args = localize_args(&["modloc", "localize", "-i", missing.to_str().unwrap()]);
        assert!(run(args).is_err());
    }
}
