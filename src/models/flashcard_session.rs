//! Memorization session: a linear pass over a queue of flashcards.
//! Each card is shown front first, flipped to reveal the back, then rated.

use super::schedule::Rating;
use super::{CardView, ContentProvider, ReviewEntry, ReviewScheduler};
use crate::error::SessionError;
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Closed,
    ShowingFront,
    ShowingBack,
}

/// Position within the queue, 1-based for display. `0 / 0` when empty.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Progress {
    pub current: usize,
    pub total: usize,
}

impl Progress {
    pub fn fraction(&self) -> f32 {
        if self.total == 0 {
            0.0
        } else {
            self.current as f32 / self.total as f32
        }
    }
}

/// What happened after a card was rated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RateOutcome {
    Advanced(ReviewEntry),
    /// The rated card was the last one; the session is now closed.
    Completed(ReviewEntry),
}

impl RateOutcome {
    pub fn entry(&self) -> &ReviewEntry {
        match self {
            RateOutcome::Advanced(entry) | RateOutcome::Completed(entry) => entry,
        }
    }
}

/// Horizontal swipe gesture over the card.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Swipe {
    Left,
    Right,
}

impl Swipe {
    pub const MIN_DISTANCE: f32 = 40.0;

    /// Recognizes a swipe from a drag delta; mostly-vertical or short drags are ignored.
    pub fn from_delta(dx: f32, dy: f32) -> Option<Swipe> {
        if dx.abs() < Self::MIN_DISTANCE || dx.abs() < dy.abs() * 1.2 {
            return None;
        }
        if dx < 0.0 {
            Some(Swipe::Left)
        } else {
            Some(Swipe::Right)
        }
    }
}

pub struct FlashcardSession {
    queue: Vec<CardView>,
    current_index: usize,
    is_flipped: bool,
    open: bool,
}

impl Default for FlashcardSession {
    fn default() -> Self {
        Self::new()
    }
}

impl FlashcardSession {
    pub fn new() -> Self {
        Self {
            queue: Vec::new(),
            current_index: 0,
            is_flipped: false,
            open: false,
        }
    }

    /// Builds the queue from `provider`, keeping only cards with a front face.
    /// An empty queue is a valid (if uneventful) session.
    pub fn open(&mut self, provider: &dyn ContentProvider) {
        self.queue = provider
            .cards()
            .into_iter()
            .filter(CardView::has_front)
            .collect();
        self.current_index = 0;
        self.is_flipped = false;
        self.open = true;
        debug!("Opened flashcard session with {} cards", self.queue.len());
    }

    pub fn state(&self) -> SessionState {
        if !self.open {
            SessionState::Closed
        } else if self.is_flipped {
            SessionState::ShowingBack
        } else {
            SessionState::ShowingFront
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_flipped(&self) -> bool {
        self.is_flipped
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn current_card(&self) -> Option<&CardView> {
        if !self.open {
            return None;
        }
        self.queue.get(self.current_index)
    }

    pub fn progress(&self) -> Progress {
        if self.current_card().is_none() {
            return Progress {
                current: 0,
                total: 0,
            };
        }
        Progress {
            current: self.current_index + 1,
            total: self.queue.len(),
        }
    }

    pub fn flip(&mut self) {
        if self.current_card().is_some() {
            self.is_flipped = !self.is_flipped;
        }
    }

    /// Moves forward, stopping at the last card.
    pub fn next(&mut self) {
        if !self.open || self.queue.is_empty() {
            return;
        }
        self.current_index = (self.current_index + 1).min(self.queue.len() - 1);
        self.is_flipped = false;
    }

    /// Moves back, stopping at the first card.
    pub fn previous(&mut self) {
        if !self.open || self.queue.is_empty() {
            return;
        }
        self.current_index = self.current_index.saturating_sub(1);
        self.is_flipped = false;
    }

    pub fn swipe(&mut self, direction: Swipe) {
        match direction {
            Swipe::Left => self.next(),
            Swipe::Right => self.previous(),
        }
    }

    /// Rates the current card and moves on. Rating the last card completes
    /// the session.
    ///
    /// The back of the card must be showing; otherwise the call is rejected
    /// and nothing changes.
    pub fn rate(
        &mut self,
        scheduler: &mut ReviewScheduler,
        rating: Rating,
    ) -> Result<RateOutcome, SessionError> {
        let item_id = self.current_card().ok_or(SessionError::NoCard)?.item_id;
        if !self.is_flipped {
            return Err(SessionError::NotFlipped);
        }

        let entry = scheduler.rate(item_id, rating);

        if self.current_index + 1 >= self.queue.len() {
            self.close();
            debug!("Flashcard session complete");
            Ok(RateOutcome::Completed(entry))
        } else {
            self.next();
            Ok(RateOutcome::Advanced(entry))
        }
    }

    pub fn close(&mut self) {
        self.queue.clear();
        self.current_index = 0;
        self.is_flipped = false;
        self.open = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{MS_PER_DAY, ManualClock};
    use crate::database::MemoryStore;
    use std::sync::Arc;

    const T0: i64 = 1_700_000_000_000;

    fn cards(n: u32) -> Vec<CardView> {
        (1..=n)
            .map(|id| CardView {
                item_id: id,
                front: format!("front {}", id),
                back: vec![format!("back {}", id)],
                reference: String::new(),
                title: format!("Dua {}", id),
            })
            .collect()
    }

    fn scheduler() -> ReviewScheduler {
        ReviewScheduler::load(Arc::new(MemoryStore::new()), Arc::new(ManualClock::new(T0)))
    }

    fn open_session(n: u32) -> FlashcardSession {
        let mut session = FlashcardSession::new();
        session.open(&cards(n));
        session
    }

    #[test]
    fn test_new_session_is_closed() {
        let session = FlashcardSession::new();
        assert_eq!(session.state(), SessionState::Closed);
        assert!(session.current_card().is_none());
    }

    #[test]
    fn test_open_filters_empty_fronts() {
        let mut queue = cards(3);
        queue[1].front = "  ".to_string();

        let mut session = FlashcardSession::new();
        session.open(&queue);

        assert_eq!(session.len(), 2);
        assert_eq!(session.state(), SessionState::ShowingFront);
        assert_eq!(session.current_card().unwrap().item_id, 1);
        assert_eq!(session.progress(), Progress { current: 1, total: 2 });
    }

    #[test]
    fn test_open_with_no_qualifying_cards() {
        let mut queue = cards(2);
        for card in &mut queue {
            card.front.clear();
        }

        let mut session = FlashcardSession::new();
        session.open(&queue);

        assert!(session.is_open());
        assert!(session.is_empty());
        assert!(session.current_card().is_none());
        assert_eq!(session.progress(), Progress { current: 0, total: 0 });

        session.flip();
        session.next();
        session.previous();
        assert!(!session.is_flipped());
        assert_eq!(session.current_index(), 0);
    }

    #[test]
    fn test_next_saturates_at_last_card() {
        let mut session = open_session(5);
        for _ in 0..6 {
            session.next();
        }
        assert_eq!(session.current_index(), 4);
        assert_eq!(session.progress(), Progress { current: 5, total: 5 });
    }

    #[test]
    fn test_previous_saturates_at_zero() {
        let mut session = open_session(3);
        session.next();
        session.previous();
        session.previous();
        assert_eq!(session.current_index(), 0);
    }

    #[test]
    fn test_flip_twice_restores_state() {
        let mut session = open_session(2);
        let before = session.is_flipped();
        session.flip();
        assert_eq!(session.state(), SessionState::ShowingBack);
        session.flip();
        assert_eq!(session.is_flipped(), before);
    }

    #[test]
    fn test_navigation_resets_flip() {
        let mut session = open_session(3);
        session.flip();
        session.next();
        assert!(!session.is_flipped());

        session.flip();
        session.previous();
        assert!(!session.is_flipped());
    }

    #[test]
    fn test_rate_requires_flip() {
        let mut session = open_session(3);
        let mut scheduler = scheduler();

        let result = session.rate(&mut scheduler, Rating::Good);
        assert_eq!(result, Err(SessionError::NotFlipped));
        assert_eq!(session.current_index(), 0);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_rate_on_closed_session() {
        let mut session = FlashcardSession::new();
        let mut scheduler = scheduler();
        assert_eq!(
            session.rate(&mut scheduler, Rating::Easy),
            Err(SessionError::NoCard)
        );
    }

    #[test]
    fn test_rate_advances_and_records() {
        let mut session = open_session(3);
        let mut scheduler = scheduler();

        session.flip();
        let outcome = session.rate(&mut scheduler, Rating::Hard).unwrap();

        assert!(matches!(outcome, RateOutcome::Advanced(_)));
        assert_eq!(outcome.entry().next_review_at, T0 + MS_PER_DAY);
        assert_eq!(session.current_index(), 1);
        assert!(!session.is_flipped());
        assert!(scheduler.entry(1).is_some());
    }

    #[test]
    fn test_rating_last_card_completes_session() {
        let mut session = open_session(5);
        let mut scheduler = scheduler();
        for _ in 0..4 {
            session.next();
        }

        session.flip();
        let outcome = session.rate(&mut scheduler, Rating::Good).unwrap();

        assert!(matches!(outcome, RateOutcome::Completed(_)));
        assert_eq!(session.state(), SessionState::Closed);
        assert!(session.current_card().is_none());
        assert!(scheduler.entry(5).is_some());
    }

    #[test]
    fn test_full_pass_rates_every_card() {
        let mut session = open_session(4);
        let mut scheduler = scheduler();

        let mut rated = 0;
        while session.is_open() {
            session.flip();
            session.rate(&mut scheduler, Rating::Easy).unwrap();
            rated += 1;
        }

        assert_eq!(rated, 4);
        assert_eq!(scheduler.len(), 4);
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut session = open_session(3);
        session.next();
        session.close();
        session.close();

        assert_eq!(session.state(), SessionState::Closed);
        assert!(session.is_empty());
        assert_eq!(session.current_index(), 0);
    }

    #[test]
    fn test_index_stays_in_bounds() {
        let mut session = open_session(3);
        let moves = [true, true, true, false, true, false, false, false, true];
        for forward in moves {
            if forward {
                session.next();
            } else {
                session.previous();
            }
            assert!(session.current_index() < session.len());
        }
    }

    #[test]
    fn test_swipe_mapping() {
        assert_eq!(Swipe::from_delta(-80.0, 10.0), Some(Swipe::Left));
        assert_eq!(Swipe::from_delta(60.0, 0.0), Some(Swipe::Right));
        assert_eq!(Swipe::from_delta(30.0, 0.0), None);
        assert_eq!(Swipe::from_delta(50.0, 45.0), None);

        let mut session = open_session(3);
        session.swipe(Swipe::Left);
        assert_eq!(session.current_index(), 1);
        session.swipe(Swipe::Right);
        assert_eq!(session.current_index(), 0);
    }
}
