use crate::core::models::catalog::known_mass;
use crate::core::models::ids::ModificationId;
use crate::core::models::input::{LocalizationInput, PeptideProblem};
use crate::core::models::modification::{ModificationCatalog, ModificationType};
use crate::core::models::site::{Site, SiteParseError};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ProblemLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Peptide '{peptide}' refers to undeclared modification {id}")]
    UnknownModification { peptide: String, id: ModificationId },
    #[error("Modification {id} ('{name}') has no mass and is not a known modification")]
    MissingMass { id: ModificationId, name: String },
    #[error("Invalid site '{value}' in peptide '{peptide}': {source}")]
    InvalidSite {
        peptide: String,
        value: String,
        source: SiteParseError,
    },
    #[error("Modification {id} is declared more than once in {scope}")]
    DuplicateModification { id: ModificationId, scope: String },
    #[error("Peptide '{0}' is declared more than once")]
    DuplicatePeptide(String),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ProblemFile {
    #[serde(default, rename = "modification")]
    modifications: Vec<ModificationEntry>,
    #[serde(default, rename = "peptide")]
    peptides: Vec<PeptideEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ModificationEntry {
    id: u32,
    name: String,
    mass: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PeptideEntry {
    name: String,
    #[serde(default, rename = "modification")]
    modifications: Vec<PeptideModificationEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PeptideModificationEntry {
    id: u32,
    count: u32,
    sites: Option<Vec<String>>,
    #[serde(default)]
    scores: BTreeMap<String, f64>,
}

/// Declared modification types plus the peptides to localize.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProblemSet {
    pub catalog: ModificationCatalog,
    pub peptides: Vec<PeptideProblem>,
}

impl ProblemSet {
    pub fn load(path: &Path) -> Result<Self, ProblemLoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| ProblemLoadError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        let file: ProblemFile = toml::from_str(&content).map_err(|e| ProblemLoadError::Toml {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Self::from_file(file)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ProblemLoadError> {
        let file: ProblemFile = toml::from_str(content).map_err(|e| ProblemLoadError::Toml {
            path: "<inline>".to_string(),
            source: e,
        })?;
        Self::from_file(file)
    }

    fn from_file(file: ProblemFile) -> Result<Self, ProblemLoadError> {
        let catalog = build_catalog(file.modifications)?;

        let mut names = BTreeSet::new();
        if let Some(duplicate) = file.peptides.iter().find(|p| !names.insert(p.name.as_str())) {
            return Err(ProblemLoadError::DuplicatePeptide(duplicate.name.clone()));
        }

        let peptides = file
            .peptides
            .into_iter()
            .map(|peptide| build_peptide(peptide, &catalog))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            modifications = catalog.len(),
            peptides = peptides.len(),
            "Problem set loaded."
        );
        Ok(Self { catalog, peptides })
    }

    pub fn peptide_mut(&mut self, name: &str) -> Option<&mut PeptideProblem> {
        self.peptides.iter_mut().find(|p| p.name == name)
    }
}

fn build_catalog(entries: Vec<ModificationEntry>) -> Result<ModificationCatalog, ProblemLoadError> {
    let mut catalog = ModificationCatalog::new();
    for entry in entries {
        let id = ModificationId(entry.id);
        let mass = match entry.mass.or_else(|| known_mass(&entry.name)) {
            Some(mass) => mass,
            None => {
                return Err(ProblemLoadError::MissingMass {
                    id,
                    name: entry.name,
                });
            }
        };
        if catalog
            .insert(ModificationType::new(id, &entry.name, mass))
            .is_some()
        {
            return Err(ProblemLoadError::DuplicateModification {
                id,
                scope: "the modification table".to_string(),
            });
        }
    }
    Ok(catalog)
}

fn build_peptide(
    entry: PeptideEntry,
    catalog: &ModificationCatalog,
) -> Result<PeptideProblem, ProblemLoadError> {
    let parse_site = |value: &str| {
        value
            .parse::<Site>()
            .map_err(|source| ProblemLoadError::InvalidSite {
                peptide: entry.name.clone(),
                value: value.to_string(),
                source,
            })
    };

    let mut input = LocalizationInput::new();
    for modification in &entry.modifications {
        let id = ModificationId(modification.id);
        if !catalog.contains(id) {
            return Err(ProblemLoadError::UnknownModification {
                peptide: entry.name.clone(),
                id,
            });
        }
        if input.candidate_sites.contains_key(&id) {
            return Err(ProblemLoadError::DuplicateModification {
                id,
                scope: format!("peptide '{}'", entry.name),
            });
        }

        let scores = modification
            .scores
            .iter()
            .map(|(site, &score)| Ok::<_, ProblemLoadError>((parse_site(site.as_str())?, score)))
            .collect::<Result<BTreeMap<Site, f64>, _>>()?;
        let sites = match &modification.sites {
            Some(sites) => sites
                .iter()
                .map(|site| parse_site(site.as_str()))
                .collect::<Result<Vec<Site>, _>>()?,
            None => scores.keys().copied().collect(),
        };

        input.candidate_sites.insert(id, sites);
        input.occurrence_counts.insert(id, modification.count);
        input.site_scores.insert(id, scores);
    }

    Ok(PeptideProblem::new(&entry.name, input))
}
