use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Subtype relation between capability types.
///
/// Each entry lists the direct supertypes (base classes or implemented
/// interfaces) of a capability type. Assignability is reflexive and
/// transitive; unknown types are only assignable to themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeRegistry {
    supertypes: BTreeMap<String, BTreeSet<String>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare that `type_name` derives from / implements `supertype`
    pub fn declare(&mut self, type_name: impl Into<String>, supertype: impl Into<String>) {
        self.supertypes
            .entry(type_name.into())
            .or_default()
            .insert(supertype.into());
    }

    /// Builder: declare a subtype edge
    #[must_use]
    pub fn with(mut self, type_name: impl Into<String>, supertype: impl Into<String>) -> Self {
        self.declare(type_name, supertype);
        self
    }

    /// Direct supertypes of `type_name`
    pub fn supertypes_of(&self, type_name: &str) -> impl Iterator<Item = &str> {
        self.supertypes
            .get(type_name)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    /// True when a capability of type `actual` satisfies a query for `query`
    pub fn is_assignable(&self, actual: &str, query: &str) -> bool {
        if actual == query {
            return true;
        }

        let mut visited = HashSet::new();
        let mut stack = vec![actual];

        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            for parent in self.supertypes_of(current) {
                if parent == query {
                    return true;
                }
                stack.push(parent);
            }
        }

        false
    }

    pub fn len(&self) -> usize {
        self.supertypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.supertypes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_and_transitive() {
        let types = TypeRegistry::new()
            .with("BoxCollider", "Collider")
            .with("Collider", "Component")
            .with("Gun", "IWeapon");

        assert!(types.is_assignable("Gun", "Gun"));
        assert!(types.is_assignable("Gun", "IWeapon"));
        assert!(types.is_assignable("BoxCollider", "Component"));
        assert!(!types.is_assignable("Collider", "BoxCollider"));
        assert!(!types.is_assignable("Gun", "Collider"));
    }

    #[test]
    fn test_unknown_type_only_matches_itself() {
        let types = TypeRegistry::new();
        assert!(types.is_assignable("Mystery", "Mystery"));
        assert!(!types.is_assignable("Mystery", "Component"));
    }

    #[test]
    fn test_cycles_terminate() {
        let types = TypeRegistry::new().with("A", "B").with("B", "A");
        assert!(types.is_assignable("A", "B"));
        assert!(!types.is_assignable("A", "C"));
    }

    #[test]
    fn test_deserialize_from_map() {
        let types: TypeRegistry =
            serde_json::from_str(r#"{"Gun": ["IWeapon", "Behaviour"]}"#).unwrap();
        assert!(types.is_assignable("Gun", "Behaviour"));
        assert_eq!(types.len(), 1);
    }
}
