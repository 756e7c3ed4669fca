//! Curated lookup tables for the sample classifier
//!
//! The sets are configuration data, not logic: they are read from the curated
//! TOML document named by the `lookup_tables` setting and validated once
//! before any catalog row is classified. There is no built-in fallback.

use crate::error::IngestError;
use crate::types::Category;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;
use tracing::info;

/// The five outlier sets, in precedence order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutlierSet {
    Minerals,
    Mixtures,
    Organics,
    Rocks,
    Sediments,
}

impl OutlierSet {
    /// Precedence order used by the classifier
    pub const ORDER: [OutlierSet; 5] = [
        OutlierSet::Minerals,
        OutlierSet::Mixtures,
        OutlierSet::Organics,
        OutlierSet::Rocks,
        OutlierSet::Sediments,
    ];

    /// Category assigned when a triple is in this set
    pub fn category(self) -> Category {
        match self {
            OutlierSet::Minerals => Category::Mineral,
            OutlierSet::Mixtures => Category::Mixture,
            OutlierSet::Organics => Category::Organic,
            OutlierSet::Rocks => Category::Rock,
            OutlierSet::Sediments => Category::Sediment,
        }
    }

    fn name(self) -> &'static str {
        match self {
            OutlierSet::Minerals => "minerals_outliers",
            OutlierSet::Mixtures => "mixtures_outliers",
            OutlierSet::Organics => "organics_outliers",
            OutlierSet::Rocks => "rocks_outliers",
            OutlierSet::Sediments => "sediments_outliers",
        }
    }
}

/// On-disk form of the lookup tables
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LookupTablesDef {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub material_classes: Vec<String>,
    #[serde(default)]
    pub meteorites: Vec<String>,
    #[serde(default)]
    pub sediments: Vec<String>,
    #[serde(default)]
    pub organics: Vec<String>,
    #[serde(default)]
    pub minerals: Vec<String>,
    #[serde(default)]
    pub rocks: Vec<String>,
    #[serde(default)]
    pub synthetics: Vec<String>,
    #[serde(default)]
    pub minerals_outliers: Vec<String>,
    #[serde(default)]
    pub mixtures_outliers: Vec<String>,
    #[serde(default)]
    pub organics_outliers: Vec<String>,
    #[serde(default)]
    pub rocks_outliers: Vec<String>,
    #[serde(default)]
    pub sediments_outliers: Vec<String>,
    #[serde(default)]
    pub id_overrides: BTreeMap<String, String>,
}

/// Validated, read-only lookup tables
#[derive(Debug, Clone, Default)]
pub struct LookupTables {
    version: Option<String>,
    id_overrides: HashMap<String, Category>,
    outliers: HashMap<OutlierSet, HashSet<String>>,
    material_classes: HashSet<String>,
    meteorite_sources: HashSet<String>,
    sediments: HashSet<String>,
    organics: HashSet<String>,
    minerals: HashSet<String>,
    rocks: HashSet<String>,
    synthetics: HashSet<String>,
}

impl LookupTables {
    /// Load tables from a TOML file
    pub fn load(path: &Path) -> Result<Self, IngestError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            IngestError::LookupTables(format!("read {} failed: {}", path.display(), e))
        })?;
        let tables = Self::from_toml_str(&content)?;
        info!(
            "Loaded lookup tables from {} (version {})",
            path.display(),
            tables.version().unwrap_or("unversioned")
        );
        Ok(tables)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, IngestError> {
        let def: LookupTablesDef = toml::from_str(content)
            .map_err(|e| IngestError::LookupTables(format!("parse failed: {}", e)))?;
        Self::from_def(def)
    }

    /// Validate and index a table definition
    ///
    /// Outlier sets must be pairwise disjoint; override categories must be a
    /// builtin category or a listed material class.
    pub fn from_def(def: LookupTablesDef) -> Result<Self, IngestError> {
        let to_set = |v: Vec<String>| v.into_iter().collect::<HashSet<_>>();

        let mut outliers = HashMap::new();
        outliers.insert(OutlierSet::Minerals, to_set(def.minerals_outliers));
        outliers.insert(OutlierSet::Mixtures, to_set(def.mixtures_outliers));
        outliers.insert(OutlierSet::Organics, to_set(def.organics_outliers));
        outliers.insert(OutlierSet::Rocks, to_set(def.rocks_outliers));
        outliers.insert(OutlierSet::Sediments, to_set(def.sediments_outliers));

        for (i, a) in OutlierSet::ORDER.iter().enumerate() {
            for b in &OutlierSet::ORDER[i + 1..] {
                if let Some(shared) = outliers[a].intersection(&outliers[b]).next() {
                    return Err(IngestError::LookupTables(format!(
                        "'{}' appears in both {} and {}",
                        shared,
                        a.name(),
                        b.name()
                    )));
                }
            }
        }

        let material_classes = to_set(def.material_classes);

        let mut id_overrides = HashMap::new();
        for (id, label) in def.id_overrides {
            let category = Category::from_label(&label);
            if !category.is_builtin() && !material_classes.contains(&label) {
                return Err(IngestError::LookupTables(format!(
                    "override for {} names unknown category '{}'",
                    id, label
                )));
            }
            id_overrides.insert(id, category);
        }

        Ok(Self {
            version: def.version,
            id_overrides,
            outliers,
            material_classes,
            meteorite_sources: to_set(def.meteorites),
            sediments: to_set(def.sediments),
            organics: to_set(def.organics),
            minerals: to_set(def.minerals),
            rocks: to_set(def.rocks),
            synthetics: to_set(def.synthetics),
        })
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn id_override(&self, id: &str) -> Option<&Category> {
        self.id_overrides.get(id)
    }

    /// First outlier set (in precedence order) containing `triple`
    pub fn outlier_set_of(&self, triple: &str) -> Option<OutlierSet> {
        OutlierSet::ORDER
            .into_iter()
            .find(|set| self.outliers.get(set).is_some_and(|s| s.contains(triple)))
    }

    pub fn is_material_class(&self, gen_type: &str) -> bool {
        self.material_classes.contains(gen_type)
    }

    pub fn is_meteorite_source(&self, source: &str) -> bool {
        self.meteorite_sources.contains(source)
    }

    /// General-type sets in the order the classifier consults them
    pub fn general_type_sets(&self) -> [(&HashSet<String>, Category); 5] {
        [
            (&self.sediments, Category::Sediment),
            (&self.organics, Category::Organic),
            (&self.minerals, Category::Mineral),
            (&self.rocks, Category::Rock),
            (&self.synthetics, Category::Synthetic),
        ]
    }
}

/// Fixture tables shared by unit tests
#[cfg(test)]
pub(crate) fn fixture_tables() -> LookupTables {
    LookupTables::from_toml_str(include_str!("../tests/fixtures/lookup_tables.toml"))
        .expect("fixture lookup tables are valid")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_tables_are_valid() {
        let tables = fixture_tables();
        assert_eq!(tables.version(), Some("fixture"));
        assert_eq!(tables.id_override("DH-CMP-026"), Some(&Category::Reference));
        assert_eq!(tables.id_override("TT-CMP-001"), Some(&Category::Synthetic));
        assert!(tables.is_material_class("Mineral"));
        assert!(!tables.is_material_class("mineral"));
    }

    #[test]
    fn test_overlapping_outlier_sets_are_rejected() {
        let toml = r#"
            minerals_outliers = ["Rock, Olivine, "]
            rocks_outliers = ["Rock, Olivine, "]
        "#;
        let err = LookupTables::from_toml_str(toml).unwrap_err();
        assert!(err.to_string().contains("minerals_outliers"));
        assert!(err.to_string().contains("rocks_outliers"));
    }

    #[test]
    fn test_unknown_override_category_is_rejected() {
        let toml = r#"
            [id_overrides]
            "AB-CD-001" = "Plasma"
        "#;
        assert!(LookupTables::from_toml_str(toml).is_err());
    }

    #[test]
    fn test_override_may_name_listed_material_class() {
        let toml = r#"
            material_classes = ["Ice"]
            [id_overrides]
            "AB-CD-001" = "Ice"
        "#;
        let tables = LookupTables::from_toml_str(toml).unwrap();
        assert_eq!(
            tables.id_override("AB-CD-001"),
            Some(&Category::MaterialClass("Ice".to_string()))
        );
    }

    #[test]
    fn test_outlier_lookup_follows_precedence() {
        let toml = r#"
            organics_outliers = ["Mineral, Carbonate, Shell"]
            sediments_outliers = ["Sediment, Sand, "]
        "#;
        let tables = LookupTables::from_toml_str(toml).unwrap();
        assert_eq!(
            tables.outlier_set_of("Mineral, Carbonate, Shell"),
            Some(OutlierSet::Organics)
        );
        assert_eq!(tables.outlier_set_of("Sediment, Sand, "), Some(OutlierSet::Sediments));
        assert_eq!(tables.outlier_set_of("Sediment, Sand, Dune"), None);
    }
}
