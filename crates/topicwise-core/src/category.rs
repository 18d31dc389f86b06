//! Content category definitions with base selection weights.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A content category and its fixed base weight (higher = more priority).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryDef {
    pub name: String,
    pub base_weight: u32,
    pub description: String,
}

impl CategoryDef {
    pub fn new(name: impl Into<String>, base_weight: u32, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_weight,
            description: description.into(),
        }
    }
}

/// Default health categories.
const HEALTH_CATEGORIES: &[(&str, u32, &str)] = &[
    ("Nutrition", 8, "Healthy eating, vitamins, meal planning"),
    ("Fitness", 7, "Exercise routines, workout tips, physical activity"),
    ("Mental Health", 6, "Stress management, mindfulness, mental wellness"),
    ("Sleep", 6, "Sleep hygiene, rest optimization, bedtime routines"),
    ("Hydration", 5, "Water intake, hydration benefits, fluid balance"),
    ("Skincare", 4, "Natural skincare, skin health, beauty routines"),
    ("Wellness", 5, "General wellness, lifestyle tips, self-care"),
    ("Digestive Health", 4, "Gut health, digestion, digestive wellness"),
    ("Immune System", 5, "Immune support, cold prevention, health defense"),
    ("Weight Management", 4, "Healthy weight, metabolism, body composition"),
];

/// Ordered, non-empty set of category definitions.
#[derive(Debug, Clone, Serialize)]
pub struct CategorySet {
    categories: Vec<CategoryDef>,
}

impl CategorySet {
    /// Build a set; names must be unique and the set non-empty.
    pub fn new(categories: Vec<CategoryDef>) -> Result<Self> {
        if categories.is_empty() {
            return Err(Error::Config("category set must not be empty".into()));
        }
        for (i, def) in categories.iter().enumerate() {
            if categories[..i].iter().any(|c| c.name == def.name) {
                return Err(Error::Config(format!("duplicate category: {}", def.name)));
            }
        }
        Ok(Self { categories })
    }

    /// The ten built-in health categories.
    pub fn health() -> Self {
        Self {
            categories: HEALTH_CATEGORIES
                .iter()
                .map(|&(name, weight, desc)| CategoryDef::new(name, weight, desc))
                .collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &CategoryDef> {
        self.categories.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.name.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&CategoryDef> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl Default for CategorySet {
    fn default() -> Self {
        Self::health()
    }
}
