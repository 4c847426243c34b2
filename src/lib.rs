//! # emotion_diary
//!
//! A personal diary that tags every entry with an inferred emotional profile
//! and summarises how those emotions move over time.
//!
//! ## Key Types
//!
//! - [`classify`] - keyword-based emotion inference for a piece of text
//! - [`DiaryState`] - the owned entry sequence, persisted after each change
//! - [`aggregate`] - frequency, intensity, daily, weekday and monthly stats
//! - [`filter_entries`] - keyword / emotion / date filtering and sorting
//! - [`EntryStore`] - JSON persistence over a [`KeyValueStore`]

pub mod classifier;
pub mod config;
pub mod diary_entry;
pub mod diary_state;
pub mod emotion;
pub mod error;
pub mod logging;
pub mod search;
pub mod stats;
pub mod storage;
pub mod theme;

pub use classifier::classify;
pub use config::DiaryConfig;
pub use diary_entry::DiaryEntry;
pub use diary_state::DiaryState;
pub use emotion::{color_for, label_for, Emotion, EmotionAnalysis, EmotionCategory};
pub use error::DiaryError;
pub use logging::{init_tracing, LogFormat};
pub use search::{
    filter_entries, quick_date_range, EmotionFilter, QuickRange, SearchFilters, SortKey, SortOrder,
};
pub use stats::{aggregate, aggregate_on, EmotionStats, EmotionWeights, StatsWindow};
pub use storage::{EntryStore, FileStore, KeyValueStore, MemoryStore};
pub use theme::{Palette, SystemAppearance, Theme, ThemeStore};
