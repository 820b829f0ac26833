use super::problem::ProblemSet;
use crate::core::models::ids::ModificationId;
use crate::core::models::site::{Site, SiteParseError};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ScoreTableError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("CSV parsing error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },
    #[error("Invalid site '{value}' on line {line} of '{path}': {source}")]
    InvalidSite {
        path: String,
        line: usize,
        value: String,
        source: SiteParseError,
    },
    #[error("Score table refers to unknown peptide '{0}'")]
    UnknownPeptide(String),
    #[error("Peptide '{peptide}' has no modification {id} to attach scores to")]
    UnknownModification { peptide: String, id: ModificationId },
}

#[derive(Debug, Deserialize)]
struct ScoreRecord {
    peptide: String,
    modification: u32,
    site: String,
    score: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreEntry {
    pub peptide: String,
    pub modification: ModificationId,
    pub site: Site,
    pub score: f64,
}

/// Site scores supplied separately from the problem file, typically exported
/// by a search engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreTable {
    entries: Vec<ScoreEntry>,
}

impl ScoreTable {
    pub fn load(path: &Path) -> Result<Self, ScoreTableError> {
        let file = std::fs::File::open(path).map_err(|e| ScoreTableError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Self::from_reader(file, &path.to_string_lossy())
    }

    /// Reads a table with the header `peptide,modification,site,score`.
    pub fn from_reader(reader: impl Read, origin: &str) -> Result<Self, ScoreTableError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut entries = Vec::new();
        for (index, result) in reader.deserialize::<ScoreRecord>().enumerate() {
            let record = result.map_err(|e| ScoreTableError::Csv {
                path: origin.to_string(),
                source: e,
            })?;
            let site = record
                .site
                .parse::<Site>()
                .map_err(|source| ScoreTableError::InvalidSite {
                    path: origin.to_string(),
                    line: index + 2,
                    value: record.site.clone(),
                    source,
                })?;
            entries.push(ScoreEntry {
                peptide: record.peptide,
                modification: ModificationId(record.modification),
                site,
                score: record.score,
            });
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Merges the table into `problems`.
    ///
    /// A row overrides any score the problem file gave the same site, and a
    /// site the problem file did not list becomes a candidate. The target
    /// peptide must already declare the modification with its count.
    pub fn apply(&self, problems: &mut ProblemSet) -> Result<(), ScoreTableError> {
        for entry in &self.entries {
            let peptide = problems
                .peptide_mut(&entry.peptide)
                .ok_or_else(|| ScoreTableError::UnknownPeptide(entry.peptide.clone()))?;
            let input = &mut peptide.input;

            let Some(candidates) = input.candidate_sites.get_mut(&entry.modification) else {
                return Err(ScoreTableError::UnknownModification {
                    peptide: entry.peptide.clone(),
                    id: entry.modification,
                });
            };
            if !candidates.contains(&entry.site) {
                candidates.push(entry.site);
            }
            input
                .site_scores
                .entry(entry.modification)
                .or_default()
                .insert(entry.site, entry.score);
        }
        debug!(rows = self.entries.len(), "Score table merged.");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const PROBLEM: &str = r#"
        [[modification]]
        id = 1
        name = "Acetyl"

        [[peptide]]
        name = "AKAK"
        [[peptide.modification]]
        id = 1
        count = 1
        scores = { "2" = 5.0 }
    "#;

    #[test]
    fn load_reads_rows_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scores.csv");
        fs::write(
            &path,
            "peptide,modification,site,score\nAKAK, 1, 4, 7.5\nAKAK,1,n-term,1.0\n",
        )
        .unwrap();

        let table = ScoreTable::load(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.entries()[0],
            ScoreEntry {
                peptide: "AKAK".to_string(),
                modification: ModificationId(1),
                site: Site::Residue(4),
                score: 7.5,
            }
        );
        assert_eq!(table.entries()[1].site, Site::NTerminus);
    }

    #[test]
    fn apply_overrides_scores_and_adds_candidates() {
        let mut problems = ProblemSet::from_toml_str(PROBLEM).unwrap();
        let csv = "peptide,modification,site,score\nAKAK,1,2,1.0\nAKAK,1,4,3.0\n";
        let table = ScoreTable::from_reader(csv.as_bytes(), "inline").unwrap();
        table.apply(&mut problems).unwrap();

        let input = &problems.peptides[0].input;
        assert_eq!(
            input.candidate_sites[&ModificationId(1)],
            vec![Site::Residue(2), Site::Residue(4)]
        );
        assert_eq!(input.site_scores[&ModificationId(1)][&Site::Residue(2)], 1.0);
        assert_eq!(input.site_scores[&ModificationId(1)][&Site::Residue(4)], 3.0);
    }

    #[test]
    fn apply_rejects_unknown_targets() {
        let mut problems = ProblemSet::from_toml_str(PROBLEM).unwrap();

        let table =
            ScoreTable::from_reader("peptide,modification,site,score\nGGG,1,2,1.0\n".as_bytes(), "t")
                .unwrap();
        assert!(matches!(
            table.apply(&mut problems),
            Err(ScoreTableError::UnknownPeptide(name)) if name == "GGG"
        ));

        let table =
            ScoreTable::from_reader("peptide,modification,site,score\nAKAK,9,2,1.0\n".as_bytes(), "t")
                .unwrap();
        assert!(matches!(
            table.apply(&mut problems),
            Err(ScoreTableError::UnknownModification { id: ModificationId(9), .. })
        ));
    }

    #[test]
    fn invalid_site_reports_its_line() {
        let csv = "peptide,modification,site,score\nAKAK,1,2,1.0\nAKAK,1,middle,1.0\n";
        match ScoreTable::from_reader(csv.as_bytes(), "t") {
            Err(ScoreTableError::InvalidSite { line, value, .. }) => {
                assert_eq!(line, 3);
                assert_eq!(value, "middle");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn malformed_rows_are_csv_errors() {
        let csv = "peptide,modification,site,score\nAKAK,one,2,1.0\n";
        assert!(matches!(
            ScoreTable::from_reader(csv.as_bytes(), "t"),
            Err(ScoreTableError::Csv { .. })
        ));
    }

    #[test]
    fn load_fails_for_missing_file() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            ScoreTable::load(&dir.path().join("absent.csv")),
            Err(ScoreTableError::Io { .. })
        ));
    }
}
