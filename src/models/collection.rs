//! A collection is the ordered set of duas the app browses and reviews
use super::{CardView, ContentProvider, Dua, ItemId};
use crate::error::ContentError;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

const BUNDLED_DUAS: &str = include_str!("../../data/duas.json");

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DuaCollection {
    pub name: String,
    pub duas: Vec<Dua>,
}

impl Default for DuaCollection {
    fn default() -> Self {
        Self {
            name: "My Duas".to_string(),
            duas: Vec::new(),
        }
    }
}

impl DuaCollection {
    /// Sample collection shipped with the binary
    pub fn bundled() -> Result<Self, ContentError> {
        Ok(serde_json::from_str(BUNDLED_DUAS)?)
    }

    pub fn get(&self, id: ItemId) -> Option<&Dua> {
        self.duas.iter().find(|d| d.id == id)
    }

    /// Distinct categories in first-seen order
    pub fn categories(&self) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for category in self.duas.iter().flat_map(|d| d.categories.iter()) {
            let category = category.trim();
            if !category.is_empty() && !seen.iter().any(|c| c == category) {
                seen.push(category.to_string());
            }
        }
        seen
    }

    /// Subset of this collection with the given ids, in collection order
    pub fn subset(&self, name: &str, ids: &[ItemId]) -> DuaCollection {
        DuaCollection {
            name: name.to_string(),
            duas: self
                .duas
                .iter()
                .filter(|d| ids.contains(&d.id))
                .cloned()
                .collect(),
        }
    }

    /// Dua of the day: rotates through the collection by day of year
    pub fn daily(&self, today: NaiveDate) -> Option<&Dua> {
        if self.duas.is_empty() {
            return None;
        }
        let index = today.ordinal() as usize % self.duas.len();
        self.duas.get(index)
    }

    pub fn len(&self) -> usize {
        self.duas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.duas.is_empty()
    }
}

impl ContentProvider for DuaCollection {
    fn cards(&self) -> Vec<CardView> {
        self.duas.iter().map(CardView::from).collect()
    }
}
