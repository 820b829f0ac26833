use crate::core::models::modification::ModificationCatalog;
use crate::workflows::batch::PeptideOutcome;
use crate::workflows::localize::Localization;
use serde::Serialize;
use std::fmt;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("CSV writing error: {0}")]
    Csv(#[from] csv::Error),
    #[error("TOML serialization error: {0}")]
    Toml(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Toml,
    Csv,
}

impl ReportFormat {
    /// Guesses the format from a file extension, if it is a known one.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?;
        extension.parse().ok()
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "toml" => Ok(Self::Toml),
            "csv" => Ok(Self::Csv),
            other => Err(format!("unknown report format '{other}'")),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Toml => write!(f, "toml"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

#[derive(Debug, Serialize)]
struct TomlReport<'a> {
    peptide: Vec<PeptideSection<'a>>,
}

// Scalars precede the arrays of tables so the document stays valid TOML.
#[derive(Debug, Serialize)]
struct PeptideSection<'a> {
    name: &'a str,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    total_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    assignment: Vec<AssignmentRow<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    unplaced: Vec<UnplacedRow>,
}

#[derive(Debug, Serialize)]
struct AssignmentRow<'a> {
    #[serde(skip)]
    peptide: &'a str,
    modification: u32,
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    mass: Option<f64>,
    site: String,
    score: f64,
}

#[derive(Debug, Serialize)]
struct UnplacedRow {
    modification: u32,
    name: String,
    count: u32,
}

fn assignment_rows<'a>(
    peptide: &'a str,
    localization: &Localization,
    catalog: &ModificationCatalog,
) -> Vec<AssignmentRow<'a>> {
    localization
        .assignments
        .iter()
        .flat_map(|(&id, sites)| sites.iter().map(move |&site| (id, site)))
        .map(|(id, site)| AssignmentRow {
            peptide,
            modification: id.0,
            name: catalog.label(id),
            mass: catalog.get(id).map(|m| m.mass),
            site: site.to_string(),
            score: localization.score_of(id, site).unwrap_or_default(),
        })
        .collect()
}

fn peptide_section<'a>(outcome: &'a PeptideOutcome, catalog: &ModificationCatalog) -> PeptideSection<'a> {
    match &outcome.result {
        Ok(localization) => PeptideSection {
            name: &outcome.name,
            status: if localization.is_fully_localized() {
                "localized"
            } else {
                "partial"
            },
            total_score: Some(localization.total_score()),
            error: None,
            assignment: assignment_rows(&outcome.name, localization, catalog),
            unplaced: localization
                .unplaced
                .iter()
                .map(|(&id, &count)| UnplacedRow {
                    modification: id.0,
                    name: catalog.label(id),
                    count,
                })
                .collect(),
        },
        Err(e) => PeptideSection {
            name: &outcome.name,
            status: "failed",
            total_score: None,
            error: Some(e.to_string()),
            assignment: Vec::new(),
            unplaced: Vec::new(),
        },
    }
}

/// Renders one `[[peptide]]` table per outcome, failures included.
pub fn render_toml(
    outcomes: &[PeptideOutcome],
    catalog: &ModificationCatalog,
) -> Result<String, ReportError> {
    let report = TomlReport {
        peptide: outcomes
            .iter()
            .map(|outcome| peptide_section(outcome, catalog))
            .collect(),
    };
    Ok(toml::to_string(&report)?)
}

/// Writes one row per assigned site. Failed peptides contribute no rows.
pub fn write_csv(
    outcomes: &[PeptideOutcome],
    catalog: &ModificationCatalog,
    writer: impl Write,
) -> Result<(), ReportError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    writer.write_record(["peptide", "modification", "name", "mass", "site", "score"])?;

    for outcome in outcomes {
        let Ok(localization) = &outcome.result else {
            continue;
        };
        for row in assignment_rows(&outcome.name, localization, catalog) {
            writer.write_record([
                row.peptide.to_string(),
                row.modification.to_string(),
                row.name,
                row.mass.map(|m| m.to_string()).unwrap_or_default(),
                row.site,
                row.score.to_string(),
            ])?;
        }
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

pub fn write_report(
    outcomes: &[PeptideOutcome],
    catalog: &ModificationCatalog,
    format: ReportFormat,
    mut writer: impl Write,
) -> Result<(), ReportError> {
    match format {
        ReportFormat::Toml => {
            let content = render_toml(outcomes, catalog)?;
            writer
                .write_all(content.as_bytes())
                .and_then(|()| writer.flush())
                .map_err(|e| ReportError::Io {
                    path: "<writer>".to_string(),
                    source: e,
                })
        }
        ReportFormat::Csv => write_csv(outcomes, catalog, writer),
    }
}

pub fn write_report_file(
    path: &Path,
    outcomes: &[PeptideOutcome],
    catalog: &ModificationCatalog,
    format: ReportFormat,
) -> Result<(), ReportError> {
    let file = std::fs::File::create(path).map_err(|e| ReportError::Io {
        path: path.to_string_lossy().to_string(),
        source: e,
    })?;
    write_report(outcomes, catalog, format, std::io::BufWriter::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::ids::ModificationId;
    use crate::core::models::input::LocalizationInput;
    use crate::core::models::modification::ModificationType;
    use crate::core::models::site::Site;
    use crate::engine::config::SolverConfig;
    use crate::engine::error::ConfigurationError;
    use crate::workflows::localize;
    use std::fs;
    use tempfile::tempdir;

    fn catalog() -> ModificationCatalog {
        let mut catalog = ModificationCatalog::new();
        catalog.insert(ModificationType::new(ModificationId(1), "Phospho", 79.966331));
        catalog
    }

    fn outcomes() -> Vec<PeptideOutcome> {
        let input = LocalizationInput::new()
            .with_modification(
                ModificationId(1),
                2,
                [(Site::Residue(3), 9.5), (Site::NTerminus, 2.0)],
            )
            .with_modification(ModificationId(5), 1, [(Site::Residue(8), 0.0)]);
        vec![
            PeptideOutcome {
                name: "PEPSK".to_string(),
                result: localize::run(&input, &SolverConfig::default()),
            },
            PeptideOutcome {
                name: "BROKEN".to_string(),
                result: Err(ConfigurationError::InconsistentGraph("test".to_string())),
            },
        ]
    }

    #[test]
    fn format_parses_names_and_extensions() {
        assert_eq!("CSV".parse::<ReportFormat>(), Ok(ReportFormat::Csv));
        assert!("xml".parse::<ReportFormat>().is_err());
        assert_eq!(
            ReportFormat::from_path(Path::new("out/report.toml")),
            Some(ReportFormat::Toml)
        );
        assert_eq!(ReportFormat::from_path(Path::new("report")), None);
    }

    #[test]
    fn toml_report_lists_assignments_unplaced_and_failures() {
        let rendered = render_toml(&outcomes(), &catalog()).unwrap();
        let value: toml::Table = toml::from_str(&rendered).unwrap();
        let peptides = value["peptide"].as_array().unwrap();
        assert_eq!(peptides.len(), 2);

        let first = peptides[0].as_table().unwrap();
        assert_eq!(first["status"].as_str(), Some("partial"));
        assert_eq!(first["total_score"].as_float(), Some(11.5));
        let assignments = first["assignment"].as_array().unwrap();
        let sites: Vec<&str> = assignments
            .iter()
            .map(|a| a["site"].as_str().unwrap())
            .collect();
        assert_eq!(sites, vec!["n-term", "3"]);
        let unplaced = first["unplaced"].as_array().unwrap();
        assert_eq!(unplaced[0]["name"].as_str(), Some("#5"));

        let second = peptides[1].as_table().unwrap();
        assert_eq!(second["status"].as_str(), Some("failed"));
        assert!(second["error"].as_str().unwrap().contains("test"));
        assert!(!second.contains_key("assignment"));
    }

    #[test]
    fn csv_report_has_one_row_per_assigned_site() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.csv");
        write_report_file(&path, &outcomes(), &catalog(), ReportFormat::Csv).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(
            lines,
            vec![
                "peptide,modification,name,mass,site,score",
                "PEPSK,1,Phospho,79.966331,n-term,2",
                "PEPSK,1,Phospho,79.966331,3,9.5",
            ]
        );
    }

    #[test]
    fn write_report_file_fails_for_missing_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("report.toml");
        assert!(matches!(
            write_report_file(&path, &outcomes(), &catalog(), ReportFormat::Toml),
            Err(ReportError::Io { .. })
        ));
    }
}
