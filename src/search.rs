//! Text search and category filtering over a collection.

use crate::models::{Dua, DuaCollection};

/// Duas whose text or keywords contain `query`, case-insensitively.
/// An empty query matches everything.
pub fn filter<'a>(collection: &'a DuaCollection, query: &str) -> Vec<&'a Dua> {
    let query = query.trim().to_lowercase();
    collection
        .duas
        .iter()
        .filter(|dua| query.is_empty() || matches(dua, &query))
        .collect()
}

pub fn in_category<'a>(collection: &'a DuaCollection, category: &str) -> Vec<&'a Dua> {
    collection
        .duas
        .iter()
        .filter(|dua| dua.in_category(category))
        .collect()
}

fn matches(dua: &Dua, query: &str) -> bool {
    [
        &dua.title,
        &dua.arabic,
        &dua.transliteration,
        &dua.translation,
        &dua.reference,
    ]
    .into_iter()
    .chain(dua.keywords.iter())
    .any(|field| field.to_lowercase().contains(query))
}
