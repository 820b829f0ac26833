use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of a modification type.
///
/// Two chemically distinct modifications may share a nominal mass, so the mass is
/// carried as an attribute of [`ModificationType`](super::modification::ModificationType)
/// and never used as identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModificationId(pub u32);

impl fmt::Display for ModificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u32> for ModificationId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// One physical copy of a modification type awaiting placement.
///
/// Ordered by modification first, then by instance index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InstanceKey {
    pub modification: ModificationId,
    pub instance_index: u32,
}

impl InstanceKey {
    pub fn new(modification: ModificationId, instance_index: u32) -> Self {
        Self {
            modification,
            instance_index,
        }
    }
}

impl fmt::Display for InstanceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.modification, self.instance_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instance_keys_order_by_modification_then_index() {
        let a = InstanceKey::new(ModificationId(1), 5);
        let b = InstanceKey::new(ModificationId(2), 0);
        let c = InstanceKey::new(ModificationId(2), 1);
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn display_is_human_readable() {
        assert_eq!(InstanceKey::new(ModificationId(3), 1).to_string(), "#3[1]");
    }
}
