use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum SiteParseError {
    #[error("Empty site")]
    Empty,
    #[error("Invalid site '{0}'. Expected 'n-term', 'c-term' or a 1-based residue number")]
    Invalid(String),
    #[error("Residue positions are 1-based, got 0")]
    ZeroPosition,
}

/// A position on the peptide that may carry a modification.
///
/// The derived ordering places the N-terminus first, residues by ascending
/// position, and the C-terminus last. The solver's tie-break relies on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Site {
    NTerminus,
    Residue(u32),
    CTerminus,
}

impl Site {
    /// The 1-based residue position, if this site is a residue.
    pub fn position(&self) -> Option<u32> {
        match self {
            Site::Residue(p) => Some(*p),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Site::Residue(_))
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Site::NTerminus => write!(f, "n-term"),
            Site::Residue(p) => write!(f, "{}", p),
            Site::CTerminus => write!(f, "c-term"),
        }
    }
}

impl FromStr for Site {
    type Err = SiteParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(SiteParseError::Empty);
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "n-term" | "nterm" => Ok(Site::NTerminus),
            "c-term" | "cterm" => Ok(Site::CTerminus),
            other => match other.parse::<u32>() {
                Ok(0) => Err(SiteParseError::ZeroPosition),
                Ok(p) => Ok(Site::Residue(p)),
                Err(_) => Err(SiteParseError::Invalid(trimmed.to_string())),
            },
        }
    }
}

impl TryFrom<String> for Site {
    type Error = SiteParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Site> for String {
    fn from(site: Site) -> Self {
        site.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn termini_bracket_residues_in_ordering() {
        let mut sites = vec![
            Site::CTerminus,
            Site::Residue(12),
            Site::NTerminus,
            Site::Residue(3),
        ];
        sites.sort();
        assert_eq!(
            sites,
            vec![
                Site::NTerminus,
                Site::Residue(3),
                Site::Residue(12),
                Site::CTerminus
            ]
        );
    }

    #[test]
    fn parses_residues_and_termini() {
        assert_eq!("17".parse::<Site>(), Ok(Site::Residue(17)));
        assert_eq!(" N-Term ".parse::<Site>(), Ok(Site::NTerminus));
        assert_eq!("cterm".parse::<Site>(), Ok(Site::CTerminus));
    }

    #[test]
    fn rejects_zero_and_garbage() {
        assert_eq!("0".parse::<Site>(), Err(SiteParseError::ZeroPosition));
        assert_eq!("".parse::<Site>(), Err(SiteParseError::Empty));
        assert!(matches!(
            "S12".parse::<Site>(),
            Err(SiteParseError::Invalid(_))
        ));
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for site in [Site::NTerminus, Site::Residue(8), Site::CTerminus] {
            assert_eq!(site.to_string().parse::<Site>(), Ok(site));
        }
    }

    #[test]
    fn position_is_only_defined_for_residues() {
        assert_eq!(Site::Residue(4).position(), Some(4));
        assert_eq!(Site::NTerminus.position(), None);
        assert!(Site::CTerminus.is_terminal());
    }
}
