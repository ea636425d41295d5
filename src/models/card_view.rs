//! Flashcard view of a content item, as shown during a memorization session.
use super::{Dua, ItemId};

#[derive(Clone, Debug, PartialEq)]
pub struct CardView {
    pub item_id: ItemId,
    pub front: String,
    pub back: Vec<String>,
    pub reference: String,
    pub title: String,
}

impl CardView {
    /// Reference line to display, falling back to the title.
    pub fn reference_or_title(&self) -> &str {
        if self.reference.is_empty() {
            &self.title
        } else {
            &self.reference
        }
    }

    pub fn has_front(&self) -> bool {
        !self.front.trim().is_empty()
    }
}

impl From<&Dua> for CardView {
    fn from(dua: &Dua) -> Self {
        let back = [&dua.translation, &dua.transliteration]
            .into_iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        Self {
            item_id: dua.id,
            front: dua.arabic.trim().to_string(),
            back,
            reference: dua.reference.trim().to_string(),
            title: dua.title.trim().to_string(),
        }
    }
}

/// Supplies the ordered cards a flashcard session is built from.
pub trait ContentProvider {
    fn cards(&self) -> Vec<CardView>;
}

impl ContentProvider for Vec<CardView> {
    fn cards(&self) -> Vec<CardView> {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_from_dua() {
        let dua = Dua {
            id: 12,
            title: "Entering the home".to_string(),
            arabic: " بِسْمِ اللَّهِ ".to_string(),
            transliteration: "Bismillah".to_string(),
            translation: "In the name of Allah".to_string(),
            reference: String::new(),
            ..Default::default()
        };

        let card = CardView::from(&dua);
        assert_eq!(card.item_id, 12);
        assert_eq!(card.front, "بِسْمِ اللَّهِ");
        assert_eq!(card.back, vec!["In the name of Allah", "Bismillah"]);
        assert_eq!(card.reference_or_title(), "Entering the home");
    }

    #[test]
    fn test_blank_front() {
        let dua = Dua {
            id: 1,
            arabic: "   ".to_string(),
            ..Default::default()
        };
        assert!(!CardView::from(&dua).has_front());
    }
}
