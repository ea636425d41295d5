//! Reading progress: bookmarks, read marks, the daily streak and the
//! activity log. Each piece lives under its own key in the store.

use crate::database::{
    self, KEY_ACTIVITY, KEY_BOOKMARKS, KEY_LAST_VISIT, KEY_READ, KEY_STREAK, PersistenceStore,
};
use crate::models::{DuaCollection, ItemId};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{info, warn};

/// Days of activity history kept.
pub const ACTIVITY_WINDOW: usize = 90;

const DATE_FORMAT: &str = "%Y-%m-%d";

const BOOKWORM_BOOKMARKS: usize = 5;
const ON_FIRE_STREAK: u32 = 3;
const DEDICATED_STREAK: u32 = 7;
const EXPLORER_CATEGORIES: usize = 7;

/// A progress badge and whether it has been earned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Achievement {
    pub name: &'static str,
    pub description: String,
    pub earned: bool,
}

pub struct ReadingProgress {
    store: Arc<dyn PersistenceStore>,
    bookmarks: Vec<ItemId>,
    read: Vec<ItemId>,
    streak: u32,
    last_visit: Option<NaiveDate>,
    activity: Vec<String>,
}

impl ReadingProgress {
    pub fn load(store: Arc<dyn PersistenceStore>) -> Self {
        let bookmarks = database::load_json(store.as_ref(), KEY_BOOKMARKS);
        let read = database::load_json(store.as_ref(), KEY_READ);
        let streak = database::load_json(store.as_ref(), KEY_STREAK);
        let activity = database::load_json(store.as_ref(), KEY_ACTIVITY);
        let last_visit = store
            .get(KEY_LAST_VISIT)
            .ok()
            .flatten()
            .and_then(|raw| NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok());

        Self {
            store,
            bookmarks,
            read,
            streak,
            last_visit,
            activity,
        }
    }

    /// Adds or removes a bookmark. Returns true when the item is now bookmarked.
    pub fn toggle_bookmark(&mut self, id: ItemId) -> bool {
        let bookmarked = match self.bookmarks.iter().position(|&b| b == id) {
            Some(index) => {
                self.bookmarks.remove(index);
                false
            }
            None => {
                self.bookmarks.push(id);
                true
            }
        };
        self.persist(KEY_BOOKMARKS, &self.bookmarks);
        bookmarked
    }

    pub fn is_bookmarked(&self, id: ItemId) -> bool {
        self.bookmarks.contains(&id)
    }

    /// Bookmarked ids in the order they were added
    pub fn bookmarks(&self) -> &[ItemId] {
        &self.bookmarks
    }

    /// Marks an item as read. Returns false if it already was.
    pub fn mark_read(&mut self, id: ItemId) -> bool {
        if self.read.contains(&id) {
            return false;
        }
        self.read.push(id);
        self.persist(KEY_READ, &self.read);
        true
    }

    pub fn is_read(&self, id: ItemId) -> bool {
        self.read.contains(&id)
    }

    pub fn read_count(&self) -> usize {
        self.read.len()
    }

    /// Read items that belong to `collection`
    pub fn read_in(&self, collection: &DuaCollection) -> usize {
        collection
            .duas
            .iter()
            .filter(|d| self.read.contains(&d.id))
            .count()
    }

    /// Share of `collection` read, as a rounded percentage. 0 for an empty collection.
    pub fn read_percent(&self, collection: &DuaCollection) -> u32 {
        if collection.is_empty() {
            return 0;
        }
        let share = self.read_in(collection) as f64 / collection.len() as f64;
        (share * 100.0).round() as u32
    }

    /// Distinct categories touched by read duas
    pub fn explored_categories(&self, collection: &DuaCollection) -> usize {
        collection
            .duas
            .iter()
            .filter(|d| self.read.contains(&d.id))
            .flat_map(|d| d.categories.iter().map(|c| c.trim()))
            .filter(|c| !c.is_empty())
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Badges for reading, bookmarking, streaks and category coverage.
    /// Collection-wide goals scale with the size of `collection`.
    pub fn achievements(&self, collection: &DuaCollection) -> Vec<Achievement> {
        let read = self.read_in(collection);
        let total = collection.len();
        let explored = self.explored_categories(collection);
        let all_categories = collection.categories().len();
        let explorer_goal = EXPLORER_CATEGORIES.min(all_categories);
        let halfway = total.div_ceil(2);

        vec![
            Achievement {
                name: "First Step",
                description: "Read your first dua".to_string(),
                earned: read >= 1,
            },
            Achievement {
                name: "Bookworm",
                description: format!("Bookmark {} duas", BOOKWORM_BOOKMARKS),
                earned: self.bookmarks.len() >= BOOKWORM_BOOKMARKS,
            },
            Achievement {
                name: "On Fire",
                description: format!("{}-day streak", ON_FIRE_STREAK),
                earned: self.streak >= ON_FIRE_STREAK,
            },
            Achievement {
                name: "Dedicated",
                description: format!("{}-day streak", DEDICATED_STREAK),
                earned: self.streak >= DEDICATED_STREAK,
            },
            Achievement {
                name: "Explorer",
                description: format!("Explore {} categories", explorer_goal),
                earned: explorer_goal > 0 && explored >= explorer_goal,
            },
            Achievement {
                name: "Halfway",
                description: format!("Read {}+ duas", halfway),
                earned: total > 0 && read >= halfway,
            },
            Achievement {
                name: "Crown Master",
                description: format!("All {} duas", total),
                earned: total > 0 && read >= total,
            },
            Achievement {
                name: "Scholar",
                description: format!("All {} categories", all_categories),
                earned: all_categories > 0 && explored >= all_categories,
            },
        ]
    }

    /// Clears read marks; bookmarks are kept.
    pub fn reset_read(&mut self) {
        self.read.clear();
        self.persist(KEY_READ, &self.read);
        info!("Reading progress reset");
    }

    /// Updates the consecutive-day streak for a visit on `today`.
    pub fn check_streak(&mut self, today: NaiveDate) -> u32 {
        if self.last_visit == Some(today) {
            return self.streak;
        }

        let yesterday = today.pred_opt();
        if self.last_visit.is_some() && self.last_visit == yesterday {
            self.streak += 1;
        } else {
            self.streak = 1;
        }
        self.last_visit = Some(today);

        self.persist(KEY_STREAK, &self.streak);
        let date = today.format(DATE_FORMAT).to_string();
        if let Err(e) = self.store.set(KEY_LAST_VISIT, &date) {
            warn!("Failed to save last visit: {}", e);
        }
        self.streak
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    /// Records activity on `today`, once per day, keeping the newest 90 days.
    pub fn track_activity(&mut self, today: NaiveDate) {
        let date = today.format(DATE_FORMAT).to_string();
        if self.activity.contains(&date) {
            return;
        }
        self.activity.push(date);
        if self.activity.len() > ACTIVITY_WINDOW {
            let excess = self.activity.len() - ACTIVITY_WINDOW;
            self.activity.drain(..excess);
        }
        self.persist(KEY_ACTIVITY, &self.activity);
    }

    pub fn active_days(&self) -> usize {
        self.activity.len()
    }

    pub fn was_active(&self, day: NaiveDate) -> bool {
        let date = day.format(DATE_FORMAT).to_string();
        self.activity.contains(&date)
    }

    fn persist<T: Serialize>(&self, key: &str, value: &T) {
        if let Err(e) = database::save_json(self.store.as_ref(), key, value) {
            warn!("Failed to save '{}': {}", key, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryStore;
    use crate::models::Dua;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn setup() -> (Arc<MemoryStore>, ReadingProgress) {
        let store = Arc::new(MemoryStore::new());
        let progress = ReadingProgress::load(store.clone());
        (store, progress)
    }

    #[test]
    fn test_toggle_bookmark() {
        let (store, mut progress) = setup();

        assert!(progress.toggle_bookmark(7));
        assert!(progress.toggle_bookmark(3));
        assert_eq!(progress.bookmarks(), &[7, 3]);

        assert!(!progress.toggle_bookmark(7));
        assert!(!progress.is_bookmarked(7));
        assert_eq!(store.get(KEY_BOOKMARKS).unwrap().as_deref(), Some("[3]"));
    }

    #[test]
    fn test_mark_read_once() {
        let (_, mut progress) = setup();

        assert!(progress.mark_read(5));
        assert!(!progress.mark_read(5));
        assert_eq!(progress.read_count(), 1);
        assert!(progress.is_read(5));
    }

    fn numbered(n: u32) -> DuaCollection {
        DuaCollection {
            name: "Numbered".to_string(),
            duas: (1..=n)
                .map(|id| Dua {
                    id,
                    ..Default::default()
                })
                .collect(),
        }
    }

    fn earned(progress: &ReadingProgress, collection: &DuaCollection) -> Vec<&'static str> {
        progress
            .achievements(collection)
            .into_iter()
            .filter(|a| a.earned)
            .map(|a| a.name)
            .collect()
    }

    #[test]
    fn test_read_percent() {
        let (_, mut progress) = setup();
        for id in 1..=21 {
            progress.mark_read(id);
        }
        assert_eq!(progress.read_percent(&numbered(63)), 33);
        assert_eq!(progress.read_percent(&numbered(0)), 0);
    }

    #[test]
    fn test_reading_every_bundled_dua_is_complete() {
        let collection = DuaCollection::bundled().unwrap();
        let (_, mut progress) = setup();
        for dua in &collection.duas {
            progress.mark_read(dua.id);
        }

        assert_eq!(progress.read_in(&collection), collection.len());
        assert_eq!(progress.read_percent(&collection), 100);
        assert!(earned(&progress, &collection).contains(&"Crown Master"));
    }

    #[test]
    fn test_read_percent_ignores_ids_outside_collection() {
        let (_, mut progress) = setup();
        for id in [1, 2, 40, 41, 42] {
            progress.mark_read(id);
        }
        assert_eq!(progress.read_in(&numbered(4)), 2);
        assert_eq!(progress.read_percent(&numbered(4)), 50);
    }

    #[test]
    fn test_no_achievements_at_start() {
        let (_, progress) = setup();
        assert!(earned(&progress, &numbered(63)).is_empty());
    }

    #[test]
    fn test_reading_and_bookmark_achievements() {
        let (_, mut progress) = setup();
        let collection = numbered(63);

        progress.mark_read(1);
        assert_eq!(earned(&progress, &collection), vec!["First Step"]);

        for id in 1..=5 {
            progress.toggle_bookmark(id);
        }
        for id in 2..=32 {
            progress.mark_read(id);
        }
        assert_eq!(
            earned(&progress, &collection),
            vec!["First Step", "Bookworm", "Halfway"]
        );
    }

    #[test]
    fn test_streak_achievements() {
        let (_, mut progress) = setup();
        let start = date(2026, 5, 1);
        for offset in 0..7 {
            progress.check_streak(start + chrono::Days::new(offset));
        }
        assert_eq!(
            earned(&progress, &numbered(63)),
            vec!["On Fire", "Dedicated"]
        );
    }

    #[test]
    fn test_category_achievements() {
        let collection = DuaCollection::bundled().unwrap();
        let (_, mut progress) = setup();

        // Reading duas 1..=4 touches quran, guidance, scholars, prophets, forgiveness
        for id in 1..=4 {
            progress.mark_read(id);
        }
        assert_eq!(progress.explored_categories(&collection), 5);
        assert!(!earned(&progress, &collection).contains(&"Explorer"));

        for dua in &collection.duas {
            progress.mark_read(dua.id);
        }
        let names = earned(&progress, &collection);
        assert!(names.contains(&"Explorer"));
        assert!(names.contains(&"Scholar"));
    }

    #[test]
    fn test_reset_read_keeps_bookmarks() {
        let (store, mut progress) = setup();
        progress.mark_read(1);
        progress.toggle_bookmark(1);

        progress.reset_read();

        let reloaded = ReadingProgress::load(store);
        assert_eq!(reloaded.read_count(), 0);
        assert!(reloaded.is_bookmarked(1));
    }

    #[test]
    fn test_streak_counts_consecutive_days() {
        let (store, mut progress) = setup();

        assert_eq!(progress.check_streak(date(2026, 3, 1)), 1);
        assert_eq!(progress.check_streak(date(2026, 3, 1)), 1);
        assert_eq!(progress.check_streak(date(2026, 3, 2)), 2);
        assert_eq!(progress.check_streak(date(2026, 3, 3)), 3);

        let mut reloaded = ReadingProgress::load(store);
        assert_eq!(reloaded.streak(), 3);
        assert_eq!(reloaded.check_streak(date(2026, 3, 4)), 4);
    }

    #[test]
    fn test_streak_resets_after_gap() {
        let (_, mut progress) = setup();
        progress.check_streak(date(2026, 3, 1));
        progress.check_streak(date(2026, 3, 2));

        assert_eq!(progress.check_streak(date(2026, 3, 5)), 1);
    }

    #[test]
    fn test_activity_is_tracked_once_per_day() {
        let (_, mut progress) = setup();
        progress.track_activity(date(2026, 1, 1));
        progress.track_activity(date(2026, 1, 1));
        progress.track_activity(date(2026, 1, 2));

        assert_eq!(progress.active_days(), 2);
        assert!(progress.was_active(date(2026, 1, 2)));
    }

    #[test]
    fn test_activity_window() {
        let (_, mut progress) = setup();
        let start = date(2026, 1, 1);
        for offset in 0..100 {
            progress.track_activity(start + chrono::Days::new(offset));
        }

        assert_eq!(progress.active_days(), ACTIVITY_WINDOW);
        assert!(!progress.was_active(start));
        assert!(progress.was_active(start + chrono::Days::new(99)));
    }

    #[test]
    fn test_malformed_lists_start_empty() {
        let store = Arc::new(MemoryStore::new());
        store.set(KEY_READ, "[1,2,").unwrap();
        store.set(KEY_LAST_VISIT, "Fri Oct 16 2026").unwrap();

        let mut progress = ReadingProgress::load(store);
        assert_eq!(progress.read_count(), 0);
        assert_eq!(progress.check_streak(date(2026, 10, 17)), 1);
    }
}
