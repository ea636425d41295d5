pub mod clock;
pub mod config;
pub mod database;
pub mod error;
pub mod export;
pub mod models;
pub mod progress;
pub mod search;
pub mod tools;

pub use clock::{Clock, ManualClock, SystemClock};
pub use database::{MemoryStore, PersistenceStore, SqliteStore};
pub use models::{
    CardView, ContentProvider, Dua, DuaCollection, FlashcardSession, ItemId, Rating, ReviewEntry,
    ReviewScheduler,
};
pub use progress::ReadingProgress;
