//! Predefined catalog entries and their identity key.

use serde::{Deserialize, Serialize};

/// A predefined item the user can add inventory from.
///
/// `id` carries a serde default so catalog JSON exported by older builds
/// (or hand-edited files) without ids still decodes; missing ids are
/// assigned on the next write path that touches the entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub unit_type: String,
}

impl CatalogEntry {
    /// Identity of this entry for dedup purposes.
    pub fn composite_key(&self) -> CompositeKey {
        CompositeKey::new(&self.name, &self.category, &self.unit_type)
    }
}

/// Candidate catalog entry; ids are assigned by the catalog on insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEntry {
    pub name: String,
    pub category: String,
    pub unit_type: String,
}

impl NewEntry {
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        unit_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            unit_type: unit_type.into(),
        }
    }

    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.category = self.category.trim().to_string();
        self.unit_type = self.unit_type.trim().to_string();
        self
    }

    pub fn composite_key(&self) -> CompositeKey {
        CompositeKey::new(&self.name, &self.category, &self.unit_type)
    }
}

/// Catalog identity: case-folded name plus exact category and unit type.
///
/// Two entries are duplicates iff their composite keys are equal. Only the
/// name is case-insensitive; `("apples", "Food", "kg")` and
/// `("Apples", "Food", "kg")` collide, while the same name under a
/// different category or unit type is a distinct entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompositeKey {
    name_folded: String,
    category: String,
    unit_type: String,
}

impl CompositeKey {
    pub fn new(name: &str, category: &str, unit_type: &str) -> Self {
        Self {
            name_folded: name.trim().to_lowercase(),
            category: category.to_string(),
            unit_type: unit_type.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_composite_key_case_folds_name_only() {
        let a = CompositeKey::new("Apples", "Food", "kg");
        let b = CompositeKey::new("APPLES", "Food", "kg");
        let c = CompositeKey::new("Apples", "food", "kg");
        let d = CompositeKey::new("Apples", "Food", "lb");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
    }

    #[test]
    fn test_composite_key_trims_name() {
        let a = CompositeKey::new(" Apples ", "Food", "kg");
        let b = CompositeKey::new("apples", "Food", "kg");
        assert_eq!(a, b);
    }

    #[test]
    fn test_composite_key_works_in_a_set() {
        let mut seen = HashSet::new();
        seen.insert(CompositeKey::new("Milk", "Beverages", "liters"));
        assert!(seen.contains(&CompositeKey::new("MILK", "Beverages", "liters")));
        assert!(!seen.contains(&CompositeKey::new("Milk", "Food", "liters")));
    }

    #[test]
    fn test_entry_without_id_decodes() {
        let json = r#"{"name":"Bread","category":"Food","unitType":"pcs"}"#;
        let entry: CatalogEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.id, "");
        assert_eq!(entry.unit_type, "pcs");
    }

    #[test]
    fn test_entry_and_candidate_share_identity() {
        let entry = CatalogEntry {
            id: "1".to_string(),
            name: "Coffee".to_string(),
            category: "Beverages".to_string(),
            unit_type: "kg".to_string(),
        };
        let candidate = NewEntry::new("coffee", "Beverages", "kg");
        assert_eq!(entry.composite_key(), candidate.composite_key());
    }
}
