//! Iris species labels and their static descriptions

use crate::core::unified_error::{errors, IrisError, IrisResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// The closed set of species the classifier can predict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SpeciesLabel {
    Setosa,
    Versicolor,
    Virginica,
}

impl SpeciesLabel {
    pub const ALL: [SpeciesLabel; 3] = [
        SpeciesLabel::Setosa,
        SpeciesLabel::Versicolor,
        SpeciesLabel::Virginica,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SpeciesLabel::Setosa => "Setosa",
            SpeciesLabel::Versicolor => "Versicolor",
            SpeciesLabel::Virginica => "Virginica",
        }
    }

    /// Parse a raw classifier label.
    ///
    /// Matching is case-insensitive and tolerates an `Iris-` / `Iris ` prefix,
    /// so "setosa", "Setosa" and "Iris-setosa" are all accepted.
    pub fn parse(raw: &str) -> IrisResult<Self> {
        let trimmed = raw.trim();
        let lower = trimmed.to_ascii_lowercase();
        let name = lower
            .strip_prefix("iris-")
            .or_else(|| lower.strip_prefix("iris "))
            .unwrap_or(lower.as_str());

        match name {
            "setosa" => Ok(SpeciesLabel::Setosa),
            "versicolor" => Ok(SpeciesLabel::Versicolor),
            "virginica" => Ok(SpeciesLabel::Virginica),
            _ => Err(errors::unknown_species(trimmed)),
        }
    }
}

impl fmt::Display for SpeciesLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SpeciesLabel {
    type Err = IrisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SpeciesLabel::parse(s)
    }
}

/// Descriptive record shown alongside a prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesInfo {
    pub label: SpeciesLabel,
    pub display_name: String,
    pub emoji: String,
    pub description: String,
    pub key_features: String,
}

/// Immutable species lookup table
#[derive(Debug, Clone)]
pub struct SpeciesCatalog {
    entries: HashMap<SpeciesLabel, SpeciesInfo>,
}

impl SpeciesCatalog {
    /// Catalog with the built-in descriptions for all three species
    pub fn builtin() -> Self {
        let entries = [
            (
                SpeciesLabel::Setosa,
                "🌸",
                "Characterized by smaller petals and distinctive sepal proportions. Typically found in cooler climates.",
                "Short, broad petals with wide sepals",
            ),
            (
                SpeciesLabel::Versicolor,
                "🌺",
                "Medium-sized flowers with balanced proportions. Common in temperate regions.",
                "Moderate petal and sepal dimensions",
            ),
            (
                SpeciesLabel::Virginica,
                "🌹",
                "Largest flowers with long petals and sepals. Often found in warmer climates.",
                "Long, narrow petals with large sepals",
            ),
        ]
        .into_iter()
        .map(|(label, emoji, description, key_features)| {
            (
                label,
                SpeciesInfo {
                    label,
                    display_name: format!("Iris {}", label),
                    emoji: emoji.to_string(),
                    description: description.to_string(),
                    key_features: key_features.to_string(),
                },
            )
        })
        .collect();

        Self { entries }
    }

    /// Build a catalog from explicit records, keyed by each record's label
    pub fn from_entries(infos: impl IntoIterator<Item = SpeciesInfo>) -> Self {
        Self {
            entries: infos.into_iter().map(|info| (info.label, info)).collect(),
        }
    }

    /// Look up the description for a species
    pub fn describe(&self, label: SpeciesLabel) -> IrisResult<&SpeciesInfo> {
        self.entries
            .get(&label)
            .ok_or_else(|| errors::unknown_species(label.as_str()))
    }

    /// All records in label order
    pub fn all(&self) -> Vec<&SpeciesInfo> {
        SpeciesLabel::ALL
            .iter()
            .filter_map(|label| self.entries.get(label))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for SpeciesCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
