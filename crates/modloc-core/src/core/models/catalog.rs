use phf::{Map, phf_map};

// Monoisotopic mass deltas (Da) from Unimod, keyed by lowercase name.
static KNOWN_MODIFICATIONS: Map<&'static str, f64> = phf_map! {
    // --- Phosphorylation & Sulfation ---
    "phosphorylation" => 79.966331, "phospho" => 79.966331,
    "sulfation" => 79.956815, "sulfo" => 79.956815,

    // --- Acylation ---
    "acetylation" => 42.010565, "acetyl" => 42.010565,
    "crotonylation" => 68.026215,
    "succinylation" => 100.016044,

    // --- Methylation ---
    "methylation" => 14.015650, "methyl" => 14.015650,
    "dimethylation" => 28.031300, "dimethyl" => 28.031300,
    "trimethylation" => 42.046950, "trimethyl" => 42.046950,

    // --- Oxidation family (isobaric) ---
    "oxidation" => 15.994915,
    "hydroxylation" => 15.994915,

    // --- Deamidation family (isobaric) ---
    "deamidation" => 0.984016, "deamidated" => 0.984016,
    "citrullination" => 0.984016,

    // --- Fixed & artefactual ---
    "carbamidomethyl" => 57.021464,
    "nitration" => 44.985078, "nitro" => 44.985078,

    // --- Ubiquitin remnant & glycans ---
    "glygly" => 114.042927, "gg" => 114.042927,
    "hexnac" => 203.079373,
    "hex" => 162.052824,
};

/// Looks up the monoisotopic mass delta of a well-known modification by name.
///
/// The lookup is case-insensitive.
pub fn known_mass(name: &str) -> Option<f64> {
    KNOWN_MODIFICATIONS
        .get(name.trim().to_ascii_lowercase().as_str())
        .copied()
}

/// All catalog entries sorted by name.
pub fn known_modifications() -> Vec<(&'static str, f64)> {
    let mut entries: Vec<_> = KNOWN_MODIFICATIONS
        .entries()
        .map(|(name, mass)| (*name, *mass))
        .collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(known_mass("Phosphorylation"), Some(79.966331));
        assert_eq!(known_mass("  ACETYL "), Some(42.010565));
    }

    #[test]
    fn unknown_names_return_none() {
        assert_eq!(known_mass("not-a-modification"), None);
    }

    #[test]
    fn isobaric_entries_share_a_mass() {
        assert_eq!(known_mass("oxidation"), known_mass("hydroxylation"));
    }

    #[test]
    fn listing_is_sorted() {
        let entries = known_modifications();
        assert!(entries.windows(2).all(|w| w[0].0 <= w[1].0));
        assert!(entries.iter().any(|(name, _)| *name == "glygly"));
    }
}
