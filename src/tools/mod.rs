pub mod lexicon;
pub mod qibla;
pub mod tasbeeh;

pub use qibla::{Needle, qibla_bearing};
pub use tasbeeh::{DHIKR_LIST, Dhikr, TapOutcome, Tasbeeh};
