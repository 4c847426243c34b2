use crate::diary_entry::DiaryEntry;
use crate::error::DiaryError;
use crate::search::{filter_entries, SearchFilters};
use crate::stats::{aggregate, EmotionStats, StatsWindow};
use crate::storage::{EntryStore, KeyValueStore};
use chrono::{DateTime, NaiveDate, Utc};
use tracing::info;

/// The diary: entries newest first, written back to the store after every
/// change.
pub struct DiaryState<S> {
    entries: Vec<DiaryEntry>,
    store: EntryStore<S>,
}

impl<S: KeyValueStore> DiaryState<S> {
    pub fn open(store: EntryStore<S>) -> Self {
        let entries = store.load();
        info!(count = entries.len(), "Opened diary");
        DiaryState { entries, store }
    }

    pub fn create_entry(
        &mut self,
        title: &str,
        content: &str,
        date: NaiveDate,
    ) -> Result<DiaryEntry, DiaryError> {
        self.create_entry_at(title, content, date, Utc::now())
    }

    pub fn create_entry_at(
        &mut self,
        title: &str,
        content: &str,
        date: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<DiaryEntry, DiaryError> {
        let entry = DiaryEntry::new(self.next_id(now), title, content, date, now)?;
        info!(
            id = %entry.id,
            primary = %entry.emotions.primary,
            "Created diary entry"
        );
        self.entries.insert(0, entry.clone());
        self.store.save(&self.entries);
        Ok(entry)
    }

    /// Creation time in milliseconds, bumped past any id already taken.
    fn next_id(&self, now: DateTime<Utc>) -> String {
        let mut candidate = now.timestamp_millis();
        while self.entries.iter().any(|e| e.id == candidate.to_string()) {
            candidate += 1;
        }
        candidate.to_string()
    }

    /// Returns whether an entry was removed.
    pub fn delete_entry(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        if self.entries.len() == before {
            return false;
        }
        info!(id, "Deleted diary entry");
        self.store.save(&self.entries);
        true
    }

    pub fn entries(&self) -> &[DiaryEntry] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&DiaryEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn stats(&self, window: StatsWindow) -> EmotionStats {
        aggregate(&self.entries, window)
    }

    pub fn search(&self, filters: &SearchFilters) -> Vec<DiaryEntry> {
        filter_entries(&self.entries, filters)
    }

    pub fn export(&self) -> String {
        self.store.export()
    }

    /// Replaces the diary with a backup; the current entries stay when the
    /// backup is rejected.
    pub fn import(&mut self, json: &str) -> bool {
        if !self.store.import(json) {
            return false;
        }
        self.entries = self.store.load();
        info!(count = self.entries.len(), "Imported diary entries");
        true
    }

    pub fn clear(&mut self) {
        self.store.clear();
        self.entries.clear();
        info!("Cleared diary");
    }
}
