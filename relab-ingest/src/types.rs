//! Shared ingest types

use std::fmt;

/// VISOR material class assigned to a sample
///
/// `MaterialClass` carries a General Type 1 value that is itself a recognized
/// material class label and passes through verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Reference,
    Rock,
    Synthetic,
    Mineral,
    Mixture,
    Organic,
    Sediment,
    Meteorites,
    ReturnedPlanetarySamples,
    MaterialClass(String),
}

impl Category {
    /// Label written to the "Material class" header field
    pub fn label(&self) -> &str {
        match self {
            Category::Reference => "Reference",
            Category::Rock => "Rock",
            Category::Synthetic => "Synthetic",
            Category::Mineral => "Mineral",
            Category::Mixture => "Mixture",
            Category::Organic => "Organic",
            Category::Sediment => "Sediment",
            Category::Meteorites => "Meteorites",
            Category::ReturnedPlanetarySamples => "Returned Planetary Samples",
            Category::MaterialClass(label) => label,
        }
    }

    /// Map a label onto its category; unknown labels become `MaterialClass`
    pub fn from_label(label: &str) -> Self {
        match label {
            "Reference" => Category::Reference,
            "Rock" => Category::Rock,
            "Synthetic" => Category::Synthetic,
            "Mineral" => Category::Mineral,
            "Mixture" => Category::Mixture,
            "Organic" => Category::Organic,
            "Sediment" => Category::Sediment,
            "Meteorites" => Category::Meteorites,
            "Returned Planetary Samples" => Category::ReturnedPlanetarySamples,
            other => Category::MaterialClass(other.to_string()),
        }
    }

    /// True for the fixed categories (not a passthrough label)
    pub fn is_builtin(&self) -> bool {
        !matches!(self, Category::MaterialClass(_))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
