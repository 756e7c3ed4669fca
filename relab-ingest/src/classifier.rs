//! Sample classifier
//!
//! Assigns each catalog sample exactly one VISOR material class from its
//! free-text metadata. Rules are evaluated strictly in order and the first
//! match wins:
//!
//! 1. Identifier overrides (manual curation)
//! 2. Outlier triples `"<genType1>, <type1>, <subtype>"`
//! 3. Source rules (synthetic, meteorite, lunar return, type mixture)
//! 4. General-type rules (material classes, curated general-type sets)
//! 5. Residual text rules
//!
//! Substring tests are case-insensitive; set membership is exact.
//! Reordering any rule changes real classification outcomes.

use crate::lookup::{LookupTables, OutlierSet};
use crate::types::Category;
use std::sync::Arc;

/// Metadata fields the classifier reads
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleAttributes<'a> {
    pub id: &'a str,
    pub source: &'a str,
    pub gen_type_1: &'a str,
    pub gen_type_2: &'a str,
    pub type_1: &'a str,
    pub type_2: &'a str,
    pub subtype: &'a str,
}

impl SampleAttributes<'_> {
    /// `"<genType1>, <type1>, <subtype>"`, the key for outlier sets and
    /// the text reported for unclassifiable samples
    pub fn triple(&self) -> String {
        format!("{}, {}, {}", self.gen_type_1, self.type_1, self.subtype)
    }
}

/// Which rule tier produced a classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchedRule {
    IdOverride,
    Outlier(OutlierSet),
    Source,
    GeneralType,
    Fallback,
}

/// Rule engine over a set of lookup tables
#[derive(Debug, Clone)]
pub struct SampleClassifier {
    tables: Arc<LookupTables>,
}

impl SampleClassifier {
    pub fn new(tables: Arc<LookupTables>) -> Self {
        Self { tables }
    }

    /// Classify a sample; `None` means unclassifiable
    pub fn classify(&self, attrs: &SampleAttributes<'_>) -> Option<Category> {
        self.classify_with_rule(attrs).map(|(category, _)| category)
    }

    /// Classify a sample and report the tier that matched
    pub fn classify_with_rule(
        &self,
        attrs: &SampleAttributes<'_>,
    ) -> Option<(Category, MatchedRule)> {
        if let Some(category) = self.tables.id_override(attrs.id) {
            return Some((category.clone(), MatchedRule::IdOverride));
        }

        if let Some(set) = self.tables.outlier_set_of(&attrs.triple()) {
            return Some((set.category(), MatchedRule::Outlier(set)));
        }

        if let Some(category) = self.source_rules(attrs) {
            return Some((category, MatchedRule::Source));
        }

        if let Some(category) = self.general_type_rules(attrs) {
            return Some((category, MatchedRule::GeneralType));
        }

        fallback_rules(attrs).map(|category| (category, MatchedRule::Fallback))
    }

    fn source_rules(&self, attrs: &SampleAttributes<'_>) -> Option<Category> {
        let source = attrs.source.to_lowercase();

        if source.contains("synthetic") {
            if contains_ci(attrs.gen_type_1, "sediment") {
                return Some(Category::Mixture);
            }
            if contains_ci(attrs.type_1, "standard") {
                return Some(Category::Reference);
            }
            return Some(Category::Synthetic);
        }

        if self.tables.is_meteorite_source(attrs.source) {
            if source.contains("other-met") && contains_ci(attrs.gen_type_1, "biological") {
                return Some(Category::Organic);
            }
            return Some(Category::Meteorites);
        }

        if source.contains("moon-ret") {
            return Some(Category::ReturnedPlanetarySamples);
        }

        if contains_ci(attrs.type_1, "mixture") {
            return Some(Category::Mixture);
        }

        None
    }

    fn general_type_rules(&self, attrs: &SampleAttributes<'_>) -> Option<Category> {
        let gen_type = attrs.gen_type_1;

        if self.tables.is_material_class(gen_type) {
            let gen_lower = gen_type.to_lowercase();
            let type_is_mixture = attrs.type_1.to_lowercase() == "mixture";
            if type_is_mixture && (gen_lower == "mineral" || gen_lower == "sediment") {
                return Some(Category::Mixture);
            }
            return Some(Category::from_label(gen_type));
        }

        if gen_type == "Glass" && attrs.type_1 == "Mixture" {
            return Some(Category::Mixture);
        }

        self.tables
            .general_type_sets()
            .into_iter()
            .find(|(set, _)| set.contains(gen_type))
            .map(|(_, category)| category)
    }
}

fn fallback_rules(attrs: &SampleAttributes<'_>) -> Option<Category> {
    if contains_ci(attrs.type_1, "dune sand") {
        return Some(Category::Sediment);
    }
    if contains_ci(attrs.gen_type_2, "mixture") {
        return Some(Category::Mixture);
    }
    // Some quartz KBr samples would otherwise land in Mixture upstream
    if contains_ci(attrs.subtype, "quartz kbr") {
        return Some(Category::Rock);
    }
    None
}

/// Case-insensitive substring test; `needle` must be lowercase
fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}
