//! A dua is a supplication record: Arabic text with its translation,
//! transliteration and source reference.
use serde::{Deserialize, Serialize};

pub type ItemId = u32;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Dua {
    pub id: ItemId,
    pub title: String,
    pub arabic: String,
    #[serde(default)]
    pub transliteration: String,
    #[serde(default)]
    pub translation: String,
    #[serde(default)]
    pub reference: String,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl Dua {
    pub fn in_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c.trim() == category)
    }
}
