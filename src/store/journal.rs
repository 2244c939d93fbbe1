use chrono::Utc;

use crate::models::{Draft, Mood, MoodEntry, WeekStats};
use crate::store::blob::BlobStore;

/// Length of the stats window in milliseconds.
const WEEK_MS: i64 = 7 * 24 * 60 * 60 * 1000;

/// Owner of the committed entry collection and the only writer to durable
/// storage. The collection is kept newest-first: after any commit the new
/// entry sits at index 0, and that order is what gets persisted.
///
/// Storage failures never escape this type. A corrupt or missing blob loads
/// as an empty history, and a failed write leaves the in-memory collection
/// authoritative for the rest of the session. Both cases are logged.
pub struct EntryStore<S: BlobStore> {
    backend: S,
    entries: Vec<MoodEntry>,
    /// Session-local counter folded into entry ids so that two commits within
    /// the same millisecond still get distinct ids.
    seq: u64,
}

impl<S: BlobStore> EntryStore<S> {
    /// Read the persisted collection from the backend. Absent storage and
    /// malformed payloads both degrade to "no history".
    pub fn load(backend: S) -> Self {
        let entries = match backend.get() {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<MoodEntry>>(&raw) {
                Ok(entries) => entries,
                Err(err) => {
                    tracing::warn!(%err, "stored entries are malformed, starting with an empty history");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(err) => {
                tracing::warn!(%err, "could not read stored entries, starting with an empty history");
                Vec::new()
            }
        };

        tracing::debug!(count = entries.len(), "entry store loaded");
        Self {
            backend,
            entries,
            seq: 0,
        }
    }

    /// Commit the draft into an immutable entry: assign id and timestamp,
    /// trim the note, prepend to the collection, and persist the whole blob.
    ///
    /// Returns `None` when the draft has no mood selected. The capture screen
    /// keeps the save action disabled until a mood is chosen, so a `None`
    /// here means the guard was bypassed, not that something broke.
    pub fn commit(&mut self, draft: &Draft) -> Option<MoodEntry> {
        let mood = draft.mood?;
        let timestamp = Utc::now().timestamp_millis();
        self.seq += 1;

        let entry = MoodEntry {
            id: format!("{timestamp}-{}", self.seq),
            mood,
            intensity: draft.intensity,
            contexts: draft.contexts.clone(),
            note: draft.note.trim().to_string(),
            timestamp,
        };

        self.entries.insert(0, entry.clone());
        self.persist();

        tracing::info!(id = %entry.id, mood = %entry.mood, "entry committed");
        Some(entry)
    }

    /// Serialize and write the full collection. Failures are logged and
    /// swallowed; the in-memory state stays authoritative for this session.
    fn persist(&mut self) {
        let payload = match serde_json::to_string(&self.entries) {
            Ok(payload) => payload,
            Err(err) => {
                tracing::error!(%err, "could not serialize entries, skipping persist");
                return;
            }
        };

        if let Err(err) = self.backend.set(&payload) {
            tracing::error!(%err, "could not persist entries, keeping in-memory history only");
        }
    }

    /// Aggregate the trailing seven days: the most frequent mood, its count,
    /// and the number of entries in the window. `None` means no entry falls
    /// inside the window, which the history screen renders as "no data"
    /// rather than a mood with a zero count.
    pub fn weekly_stats(&self) -> Option<WeekStats> {
        self.stats_since(Utc::now().timestamp_millis() - WEEK_MS)
    }

    fn stats_since(&self, cutoff_ms: i64) -> Option<WeekStats> {
        let mut counts = [0usize; Mood::ALL.len()];
        let mut first_seen = [usize::MAX; Mood::ALL.len()];
        let mut total = 0usize;

        for entry in self.entries.iter().filter(|e| e.timestamp >= cutoff_ms) {
            let idx = entry.mood.index();
            counts[idx] += 1;
            if first_seen[idx] == usize::MAX {
                first_seen[idx] = total;
            }
            total += 1;
        }

        if total == 0 {
            return None;
        }

        // Ties resolve to the mood seen first in the newest-first scan, i.e.
        // the most recently logged of the tied moods. Tallying into a fixed
        // array keeps the result independent of any hash iteration order.
        let top_mood = Mood::ALL.into_iter().max_by(|a, b| {
            counts[a.index()]
                .cmp(&counts[b.index()])
                .then(first_seen[b.index()].cmp(&first_seen[a.index()]))
        })?;

        Some(WeekStats {
            top_mood,
            count: counts[top_mood.index()],
            total,
        })
    }

    /// Read-only view of the committed entries, newest-first.
    pub fn entries(&self) -> &[MoodEntry] {
        &self.entries
    }

    /// Number of entries ever committed (within the loaded history).
    pub fn total(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Context;
    use crate::store::blob::{FailingStore, FileStore, MemoryStore};

    fn draft(mood: Mood) -> Draft {
        let mut draft = Draft::default();
        draft.select_mood(mood);
        draft
    }

    /// Build an entry with an explicit timestamp, bypassing `commit`, so
    /// tests can seed storage with stale history.
    fn entry_at(mood: Mood, timestamp: i64) -> MoodEntry {
        MoodEntry {
            id: format!("{timestamp}-0"),
            mood,
            intensity: 50,
            contexts: Vec::new(),
            note: String::new(),
            timestamp,
        }
    }

    #[test]
    fn commits_keep_the_collection_newest_first() {
        let mut store = EntryStore::load(MemoryStore::default());
        store.commit(&draft(Mood::Joyful)).expect("commit");
        store.commit(&draft(Mood::Sad)).expect("commit");
        store.commit(&draft(Mood::Calm)).expect("commit");

        let moods: Vec<Mood> = store.entries().iter().map(|e| e.mood).collect();
        assert_eq!(moods, vec![Mood::Calm, Mood::Sad, Mood::Joyful]);
    }

    #[test]
    fn commit_without_a_mood_is_refused() {
        let mut store = EntryStore::load(MemoryStore::default());
        assert!(store.commit(&Draft::default()).is_none());
        assert!(store.entries().is_empty());
    }

    #[test]
    fn commit_trims_the_note_and_copies_the_draft() {
        let mut store = EntryStore::load(MemoryStore::default());
        let mut d = draft(Mood::Anxious);
        d.set_intensity(90);
        d.toggle_context(Context::Work);
        d.toggle_context(Context::Sleep);
        d.set_note("  deadline week  ");

        let entry = store.commit(&d).expect("commit");
        assert_eq!(entry.note, "deadline week");
        assert_eq!(entry.intensity, 90);
        assert_eq!(entry.contexts, vec![Context::Work, Context::Sleep]);
    }

    #[test]
    fn ids_stay_unique_within_a_session() {
        let mut store = EntryStore::load(MemoryStore::default());
        let first = store.commit(&draft(Mood::Calm)).expect("commit");
        let second = store.commit(&draft(Mood::Calm)).expect("commit");
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn load_after_commit_returns_entries_in_reverse_commit_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("mood-entries.json");

        let mut store = EntryStore::load(FileStore::new(path.clone()).expect("open"));
        let first = store.commit(&draft(Mood::Joyful)).expect("commit");
        let second = store.commit(&draft(Mood::Angry)).expect("commit");

        let reloaded = EntryStore::load(FileStore::new(path).expect("reopen"));
        assert_eq!(reloaded.entries(), &[second, first]);
    }

    #[test]
    fn load_against_absent_storage_is_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = EntryStore::load(FileStore::new(dir.path().join("none.json")).expect("open"));
        assert!(store.entries().is_empty());
        assert!(store.weekly_stats().is_none());
    }

    #[test]
    fn load_against_corrupt_storage_is_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("mood-entries.json");
        std::fs::write(&path, "{not json at all").expect("write garbage");

        let store = EntryStore::load(FileStore::new(path).expect("open"));
        assert!(store.entries().is_empty());
    }

    #[test]
    fn failed_write_keeps_the_in_memory_entry() {
        let mut store = EntryStore::load(FailingStore);
        let entry = store.commit(&draft(Mood::Sad)).expect("commit");
        assert_eq!(store.entries(), &[entry]);
    }

    #[test]
    fn weekly_stats_matches_the_worked_example() {
        let mut store = EntryStore::load(MemoryStore::default());
        store.commit(&draft(Mood::Joyful)).expect("commit");
        store.commit(&draft(Mood::Joyful)).expect("commit");
        store.commit(&draft(Mood::Sad)).expect("commit");

        let stats = store.weekly_stats().expect("stats");
        assert_eq!(stats.top_mood, Mood::Joyful);
        assert_eq!(stats.count, 2);
        assert_eq!(stats.total, 3);
        assert!(stats.count <= stats.total);
    }

    #[test]
    fn weekly_stats_is_none_when_all_entries_are_stale() {
        let two_weeks_ago = Utc::now().timestamp_millis() - 2 * WEEK_MS;
        let stale = vec![
            entry_at(Mood::Calm, two_weeks_ago),
            entry_at(Mood::Calm, two_weeks_ago - 1000),
        ];
        let payload = serde_json::to_string(&stale).expect("serialize");

        let store = EntryStore::load(MemoryStore::seeded(payload));
        assert_eq!(store.total(), 2);
        assert!(store.weekly_stats().is_none());
    }

    #[test]
    fn weekly_stats_ignores_stale_entries_in_the_tally() {
        let now = Utc::now().timestamp_millis();
        let mixed = vec![
            entry_at(Mood::Sad, now - 1000),
            entry_at(Mood::Joyful, now - 2 * WEEK_MS),
            entry_at(Mood::Joyful, now - 2 * WEEK_MS - 1000),
        ];
        let payload = serde_json::to_string(&mixed).expect("serialize");

        let store = EntryStore::load(MemoryStore::seeded(payload));
        let stats = store.weekly_stats().expect("stats");
        assert_eq!(stats.top_mood, Mood::Sad);
        assert_eq!(stats.count, 1);
        assert_eq!(stats.total, 1);
    }

    #[test]
    fn weekly_stats_ties_resolve_to_the_most_recently_logged_mood() {
        let mut store = EntryStore::load(MemoryStore::default());
        store.commit(&draft(Mood::Joyful)).expect("commit");
        store.commit(&draft(Mood::Sad)).expect("commit");
        store.commit(&draft(Mood::Joyful)).expect("commit");
        store.commit(&draft(Mood::Sad)).expect("commit");

        // Both moods have two entries; the newest entry is Sad.
        let stats = store.weekly_stats().expect("stats");
        assert_eq!(stats.top_mood, Mood::Sad);
        assert_eq!(stats.count, 2);
        assert_eq!(stats.total, 4);
    }
}
