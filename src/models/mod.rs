pub mod card_view;
pub mod collection;
pub mod dua;
pub mod flashcard_session;
pub mod review_entry;
pub mod review_scheduler;
pub mod schedule;

pub use card_view::{CardView, ContentProvider};
pub use collection::DuaCollection;
pub use dua::{Dua, ItemId};
pub use flashcard_session::{FlashcardSession, Progress, RateOutcome, SessionState, Swipe};
pub use review_entry::ReviewEntry;
pub use review_scheduler::ReviewScheduler;
pub use schedule::Rating;
