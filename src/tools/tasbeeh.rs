//! Tasbeeh (dhikr) counter with per-dhikr lifetime totals.

use crate::database::{self, KEY_DHIKR_SELECTED, KEY_DHIKR_TOTALS, PersistenceStore};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dhikr {
    pub id: &'static str,
    pub arabic: &'static str,
    pub english: &'static str,
    pub virtue: &'static str,
    pub default_target: u32,
}

pub const DHIKR_LIST: [Dhikr; 7] = [
    Dhikr {
        id: "subhanallah",
        arabic: "سُبْحَانَ ٱللَّهِ",
        english: "Subhanallah",
        virtue: "33× after every salah",
        default_target: 33,
    },
    Dhikr {
        id: "alhamdulillah",
        arabic: "ٱلْحَمْدُ لِلَّهِ",
        english: "Alhamdulillah",
        virtue: "33× after every salah",
        default_target: 33,
    },
    Dhikr {
        id: "allahuakbar",
        arabic: "ٱللَّهُ أَكْبَرُ",
        english: "Allahu Akbar",
        virtue: "34× after every salah",
        default_target: 34,
    },
    Dhikr {
        id: "lailaha",
        arabic: "لَا إِلَٰهَ إِلَّا ٱللَّهُ",
        english: "La ilaha illallah",
        virtue: "Best dhikr (Tirmidhi 3383)",
        default_target: 100,
    },
    Dhikr {
        id: "astaghfirullah",
        arabic: "أَسْتَغْفِرُ ٱللَّهَ",
        english: "Astaghfirullah",
        virtue: "100× daily (Muslim 2702)",
        default_target: 100,
    },
    Dhikr {
        id: "subhanwabi",
        arabic: "سُبْحَانَ ٱللَّهِ وَبِحَمْدِهِ",
        english: "Subhanallahi wa bihamdihi",
        virtue: "Plants a tree in Jannah (Tirmidhi 3464)",
        default_target: 100,
    },
    Dhikr {
        id: "lahawla",
        arabic: "لَا حَوْلَ وَلَا قُوَّةَ إِلَّا بِٱللَّهِ",
        english: "La hawla wala quwwata illa billah",
        virtue: "A treasure of Jannah (Bukhari 6384)",
        default_target: 33,
    },
];

/// Result of a single tap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapOutcome {
    Counted(u32),
    /// Target hit: the count was saved to the totals and reset.
    TargetReached(u32),
}

pub struct Tasbeeh {
    store: Arc<dyn PersistenceStore>,
    selected: usize,
    count: u32,
    /// Zero means open count
    target: u32,
}

impl Tasbeeh {
    /// Restores the last selected dhikr with its default target.
    pub fn open(store: Arc<dyn PersistenceStore>) -> Self {
        let saved: usize = database::load_json(store.as_ref(), KEY_DHIKR_SELECTED);
        let selected = if saved < DHIKR_LIST.len() { saved } else { 0 };
        Self {
            store,
            selected,
            count: 0,
            target: DHIKR_LIST[selected].default_target,
        }
    }

    pub fn dhikr(&self) -> &'static Dhikr {
        &DHIKR_LIST[self.selected]
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn target(&self) -> u32 {
        self.target
    }

    pub fn tap(&mut self) -> TapOutcome {
        self.count += 1;
        if self.target != 0 && self.count == self.target {
            let reached = self.count;
            self.add_to_total(reached);
            self.count = 0;
            debug!("Tasbeeh target {} reached for {}", reached, self.dhikr().id);
            TapOutcome::TargetReached(reached)
        } else {
            TapOutcome::Counted(self.count)
        }
    }

    /// Saves any partial count and starts over.
    pub fn reset(&mut self) {
        if self.count > 0 {
            self.add_to_total(self.count);
        }
        self.count = 0;
    }

    /// Sets a new target (0 for an open count) and resets the counter.
    pub fn set_target(&mut self, target: u32) {
        self.target = target;
        self.reset();
    }

    /// Switches to another dhikr. Out-of-range indices are ignored.
    pub fn select(&mut self, index: usize) {
        if index >= DHIKR_LIST.len() {
            return;
        }
        self.reset();
        self.selected = index;
        self.target = DHIKR_LIST[index].default_target;
        if let Err(e) = database::save_json(self.store.as_ref(), KEY_DHIKR_SELECTED, &index) {
            warn!("Failed to save selected dhikr: {}", e);
        }
    }

    /// Saves any partial count before the counter is put away.
    pub fn close(&mut self) {
        self.reset();
    }

    pub fn totals(&self) -> BTreeMap<String, u64> {
        database::load_json(self.store.as_ref(), KEY_DHIKR_TOTALS)
    }

    pub fn overall_total(&self) -> u64 {
        self.totals().values().sum()
    }

    fn add_to_total(&self, count: u32) {
        let mut totals = self.totals();
        *totals.entry(self.dhikr().id.to_string()).or_insert(0) += u64::from(count);
        if let Err(e) = database::save_json(self.store.as_ref(), KEY_DHIKR_TOTALS, &totals) {
            warn!("Failed to save dhikr totals: {}", e);
        }
    }
}
