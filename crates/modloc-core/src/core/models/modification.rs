use super::ids::ModificationId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModificationType {
    pub id: ModificationId,
    pub name: String,
    /// Monoisotopic mass delta in Dalton.
    pub mass: f64,
}

impl ModificationType {
    pub fn new(id: ModificationId, name: &str, mass: f64) -> Self {
        Self {
            id,
            name: name.to_string(),
            mass,
        }
    }
}

/// The modification types known to one analysis, keyed by identifier.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModificationCatalog {
    types: BTreeMap<ModificationId, ModificationType>,
}

impl ModificationCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a modification type, returning the previous entry with the same id.
    pub fn insert(&mut self, modification: ModificationType) -> Option<ModificationType> {
        self.types.insert(modification.id, modification)
    }

    pub fn get(&self, id: ModificationId) -> Option<&ModificationType> {
        self.types.get(&id)
    }

    pub fn contains(&self, id: ModificationId) -> bool {
        self.types.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModificationType> {
        self.types.values()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Display label for a modification id, falling back to the bare id.
    pub fn label(&self, id: ModificationId) -> String {
        self.get(id)
            .map(|m| m.name.clone())
            .unwrap_or_else(|| id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn isobaric_types_coexist_under_distinct_ids() {
        let mut catalog = ModificationCatalog::new();
        catalog.insert(ModificationType::new(ModificationId(1), "Oxidation", 15.994915));
        catalog.insert(ModificationType::new(
            ModificationId(2),
            "Hydroxylation",
            15.994915,
        ));
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(ModificationId(2)).unwrap().name, "Hydroxylation");
    }

    #[test]
    fn insert_returns_replaced_entry() {
        let mut catalog = ModificationCatalog::new();
        assert!(
            catalog
                .insert(ModificationType::new(ModificationId(1), "A", 1.0))
                .is_none()
        );
        let previous = catalog.insert(ModificationType::new(ModificationId(1), "B", 2.0));
        assert_eq!(previous.unwrap().name, "A");
    }

    #[test]
    fn label_falls_back_to_id() {
        let catalog = ModificationCatalog::new();
        assert_eq!(catalog.label(ModificationId(7)), "#7");
    }
}
