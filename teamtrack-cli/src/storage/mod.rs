// Local mirror of server state using a sled embedded database, plus the
// outbox of pending mutations replayed by the sync engine.

mod outbox;

pub use outbox::{EntityKind, MutationOp, OutboxEntry};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sled::Db;
use std::path::PathBuf;
use uuid::Uuid;

use crate::models::{Poll, TeamBranding, Video, Workout};

const WORKOUTS_TREE: &str = "workouts";
const POLLS_TREE: &str = "polls";
const VIDEOS_TREE: &str = "videos";
const OUTBOX_TREE: &str = "outbox";
const META_TREE: &str = "meta";

const META_BRANDING: &str = "branding";
const META_LAST_SYNC: &str = "last_sync_at";

/// Storage manager for the local embedded database
pub struct Storage {
    db: Db,
}

impl Storage {
    /// Database directory (~/.teamtrack/db), overridable for tests
    pub fn db_path() -> Result<PathBuf> {
        if let Ok(test_path) = std::env::var("TEAMTRACK_DB_PATH") {
            return Ok(PathBuf::from(test_path));
        }

        Ok(crate::config::Config::config_dir()?.join("db"))
    }

    pub fn init() -> Result<Self> {
        let db_path = Self::db_path()?;

        tracing::debug!("Opening sled database at {:?}", db_path);
        let db = sled::open(db_path).context("Failed to open sled database")?;

        Ok(Self { db })
    }

    pub fn init_with_path(path: PathBuf) -> Result<Self> {
        let db = sled::open(path).context("Failed to open sled database")?;
        Ok(Self { db })
    }

    // Workout mirror

    pub fn save_workout(&self, workout: &Workout) -> Result<()> {
        let tree = self
            .db
            .open_tree(WORKOUTS_TREE)
            .context("Failed to open workouts tree")?;

        let value = bincode::serialize(workout).context("Failed to serialize workout")?;
        tree.insert(workout.id.as_bytes(), value)
            .context("Failed to insert workout")?;

        self.db.flush().context("Failed to flush database")?;

        tracing::debug!("Saved workout {}", workout.id);
        Ok(())
    }

    pub fn get_workout(&self, id: &str) -> Result<Option<Workout>> {
        let tree = self
            .db
            .open_tree(WORKOUTS_TREE)
            .context("Failed to open workouts tree")?;

        match tree.get(id.as_bytes()).context("Failed to get workout")? {
            Some(value) => Ok(Some(
                bincode::deserialize(&value).context("Failed to deserialize workout")?,
            )),
            None => Ok(None),
        }
    }

    /// All workouts, most recent first
    pub fn list_workouts(&self) -> Result<Vec<Workout>> {
        let tree = self
            .db
            .open_tree(WORKOUTS_TREE)
            .context("Failed to open workouts tree")?;

        let mut workouts = Vec::new();
        for item in tree.iter() {
            let (_key, value) = item.context("Failed to iterate workouts")?;
            let workout: Workout =
                bincode::deserialize(&value).context("Failed to deserialize workout")?;
            workouts.push(workout);
        }

        workouts.sort_by(|a, b| b.date.cmp(&a.date));

        Ok(workouts)
    }

    pub fn delete_workout(&self, id: &str) -> Result<bool> {
        let tree = self
            .db
            .open_tree(WORKOUTS_TREE)
            .context("Failed to open workouts tree")?;

        let deleted = tree
            .remove(id.as_bytes())
            .context("Failed to delete workout")?
            .is_some();

        if deleted {
            self.db.flush().context("Failed to flush database")?;
            tracing::debug!("Deleted workout {}", id);
        }

        Ok(deleted)
    }

    /// Replace the workout mirror with server rows, keeping locally dirty
    /// ones (rows that still have queued mutations) untouched.
    pub fn replace_workouts(&self, server_workouts: &[Workout]) -> Result<()> {
        let tree = self
            .db
            .open_tree(WORKOUTS_TREE)
            .context("Failed to open workouts tree")?;

        let dirty: Vec<Workout> = self
            .list_workouts()?
            .into_iter()
            .filter(|w| !w.synced)
            .collect();

        tree.clear().context("Failed to clear workouts tree")?;

        for workout in server_workouts.iter().chain(dirty.iter()) {
            let value = bincode::serialize(workout).context("Failed to serialize workout")?;
            tree.insert(workout.id.as_bytes(), value)
                .context("Failed to insert workout")?;
        }

        self.db.flush().context("Failed to flush database")?;
        Ok(())
    }

    // Poll and video mirrors: pure server caches, always replaced wholesale

    pub fn replace_polls(&self, polls: &[Poll]) -> Result<()> {
        self.replace_tree(POLLS_TREE, polls, |p| p.id.clone())
    }

    pub fn list_polls(&self) -> Result<Vec<Poll>> {
        self.list_tree(POLLS_TREE)
    }

    pub fn replace_videos(&self, videos: &[Video]) -> Result<()> {
        self.replace_tree(VIDEOS_TREE, videos, |v| v.id.clone())
    }

    pub fn list_videos(&self) -> Result<Vec<Video>> {
        self.list_tree(VIDEOS_TREE)
    }

    fn replace_tree<T: serde::Serialize>(
        &self,
        tree_name: &str,
        rows: &[T],
        key: impl Fn(&T) -> String,
    ) -> Result<()> {
        let tree = self
            .db
            .open_tree(tree_name)
            .with_context(|| format!("Failed to open {tree_name} tree"))?;

        tree.clear()
            .with_context(|| format!("Failed to clear {tree_name} tree"))?;

        for row in rows {
            let value = bincode::serialize(row).context("Failed to serialize row")?;
            tree.insert(key(row).as_bytes(), value)
                .context("Failed to insert row")?;
        }

        self.db.flush().context("Failed to flush database")?;
        Ok(())
    }

    fn list_tree<T: serde::de::DeserializeOwned>(&self, tree_name: &str) -> Result<Vec<T>> {
        let tree = self
            .db
            .open_tree(tree_name)
            .with_context(|| format!("Failed to open {tree_name} tree"))?;

        let mut rows = Vec::new();
        for item in tree.iter() {
            let (_key, value) = item.context("Failed to iterate tree")?;
            rows.push(bincode::deserialize(&value).context("Failed to deserialize row")?);
        }

        Ok(rows)
    }

    // Branding cache and sync metadata

    pub fn save_branding(&self, branding: &TeamBranding) -> Result<()> {
        let tree = self
            .db
            .open_tree(META_TREE)
            .context("Failed to open meta tree")?;

        let value = bincode::serialize(branding).context("Failed to serialize branding")?;
        tree.insert(META_BRANDING, value)
            .context("Failed to insert branding")?;

        self.db.flush().context("Failed to flush database")?;
        Ok(())
    }

    pub fn get_branding(&self) -> Result<Option<TeamBranding>> {
        let tree = self
            .db
            .open_tree(META_TREE)
            .context("Failed to open meta tree")?;

        match tree.get(META_BRANDING).context("Failed to get branding")? {
            Some(value) => Ok(Some(
                bincode::deserialize(&value).context("Failed to deserialize branding")?,
            )),
            None => Ok(None),
        }
    }

    pub fn set_last_sync(&self, at: DateTime<Utc>) -> Result<()> {
        let tree = self
            .db
            .open_tree(META_TREE)
            .context("Failed to open meta tree")?;

        tree.insert(META_LAST_SYNC, at.to_rfc3339().as_bytes())
            .context("Failed to record last sync")?;

        self.db.flush().context("Failed to flush database")?;
        Ok(())
    }

    pub fn last_sync(&self) -> Result<Option<DateTime<Utc>>> {
        let tree = self
            .db
            .open_tree(META_TREE)
            .context("Failed to open meta tree")?;

        match tree.get(META_LAST_SYNC).context("Failed to get last sync")? {
            Some(value) => {
                let raw = String::from_utf8(value.to_vec()).context("Invalid last sync value")?;
                let at = DateTime::parse_from_rfc3339(&raw)
                    .context("Invalid last sync timestamp")?
                    .with_timezone(&Utc);
                Ok(Some(at))
            }
            None => Ok(None),
        }
    }

    // Outbox

    /// Queue a mutation for replay. Local-only write: this never touches the
    /// network and never fails because of connectivity.
    pub fn enqueue(
        &self,
        entity: EntityKind,
        op: MutationOp,
        local_id: &str,
        payload: serde_json::Value,
    ) -> Result<OutboxEntry> {
        let tree = self
            .db
            .open_tree(OUTBOX_TREE)
            .context("Failed to open outbox tree")?;

        let seq = self.db.generate_id().context("Failed to allocate sequence")?;
        let entry = OutboxEntry {
            id: Uuid::new_v4().to_string(),
            seq,
            entity,
            op,
            local_id: local_id.to_string(),
            payload_json: payload.to_string(),
            queued_at: Utc::now(),
            attempts: 0,
            last_error: None,
        };

        let value = bincode::serialize(&entry).context("Failed to serialize outbox entry")?;
        tree.insert(seq.to_be_bytes(), value)
            .context("Failed to insert outbox entry")?;

        self.db.flush().context("Failed to flush database")?;

        tracing::debug!("Queued {} (seq {})", entry.describe(), seq);
        Ok(entry)
    }

    /// Pending entries in FIFO order
    pub fn outbox_entries(&self) -> Result<Vec<OutboxEntry>> {
        let tree = self
            .db
            .open_tree(OUTBOX_TREE)
            .context("Failed to open outbox tree")?;

        let mut entries = Vec::new();
        for item in tree.iter() {
            let (_key, value) = item.context("Failed to iterate outbox")?;
            entries.push(
                bincode::deserialize::<OutboxEntry>(&value)
                    .context("Failed to deserialize outbox entry")?,
            );
        }

        Ok(entries)
    }

    pub fn outbox_len(&self) -> Result<usize> {
        Ok(self
            .db
            .open_tree(OUTBOX_TREE)
            .context("Failed to open outbox tree")?
            .len())
    }

    /// Drop a replayed entry from the queue
    pub fn remove_outbox_entry(&self, seq: u64) -> Result<()> {
        let tree = self
            .db
            .open_tree(OUTBOX_TREE)
            .context("Failed to open outbox tree")?;

        tree.remove(seq.to_be_bytes())
            .context("Failed to remove outbox entry")?;

        self.db.flush().context("Failed to flush database")?;
        Ok(())
    }

    /// Keep a failed entry for the next pass, recording why it failed
    pub fn record_outbox_failure(&self, seq: u64, error: &str) -> Result<()> {
        let tree = self
            .db
            .open_tree(OUTBOX_TREE)
            .context("Failed to open outbox tree")?;

        if let Some(value) = tree
            .get(seq.to_be_bytes())
            .context("Failed to get outbox entry")?
        {
            let mut entry: OutboxEntry =
                bincode::deserialize(&value).context("Failed to deserialize outbox entry")?;
            entry.attempts += 1;
            entry.last_error = Some(error.to_string());

            let value =
                bincode::serialize(&entry).context("Failed to serialize outbox entry")?;
            tree.insert(seq.to_be_bytes(), value)
                .context("Failed to update outbox entry")?;

            self.db.flush().context("Failed to flush database")?;
        }

        Ok(())
    }

    /// Cancel pending mutations for a local row (offline create then delete)
    pub fn remove_outbox_entries_for(&self, local_id: &str) -> Result<usize> {
        let mut removed = 0;
        for entry in self.outbox_entries()? {
            if entry.local_id == local_id {
                self.remove_outbox_entry(entry.seq)?;
                removed += 1;
            }
        }

        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn create_test_storage() -> Storage {
        let dir = tempdir().unwrap();
        Storage::init_with_path(dir.path().to_path_buf()).unwrap()
    }

    fn sample_workout() -> Workout {
        Workout::new(
            NaiveDate::from_ymd_opt(2025, 4, 12).unwrap(),
            Some("evening session".to_string()),
            Vec::new(),
        )
    }

    #[test]
    fn test_save_and_get_workout() {
        let storage = create_test_storage();
        let workout = sample_workout();

        storage.save_workout(&workout).unwrap();

        let retrieved = storage.get_workout(&workout.id).unwrap().unwrap();
        assert_eq!(retrieved.id, workout.id);
        assert_eq!(retrieved.notes.as_deref(), Some("evening session"));
        assert!(!retrieved.synced);
    }

    #[test]
    fn test_delete_workout() {
        let storage = create_test_storage();
        let workout = sample_workout();
        storage.save_workout(&workout).unwrap();

        assert!(storage.delete_workout(&workout.id).unwrap());
        assert!(storage.get_workout(&workout.id).unwrap().is_none());
        assert!(!storage.delete_workout(&workout.id).unwrap());
    }

    #[test]
    fn test_outbox_is_fifo() {
        let storage = create_test_storage();

        for i in 0..3 {
            storage
                .enqueue(
                    EntityKind::Workout,
                    MutationOp::Create,
                    &format!("local-{i}"),
                    serde_json::json!({ "n": i }),
                )
                .unwrap();
        }

        let entries = storage.outbox_entries().unwrap();
        assert_eq!(entries.len(), 3);
        let ids: Vec<&str> = entries.iter().map(|e| e.local_id.as_str()).collect();
        assert_eq!(ids, vec!["local-0", "local-1", "local-2"]);
        assert!(entries.windows(2).all(|w| w[0].seq < w[1].seq));
    }

    #[test]
    fn test_outbox_failure_keeps_entry_with_attempt_count() {
        let storage = create_test_storage();

        let entry = storage
            .enqueue(
                EntityKind::PollVote,
                MutationOp::Create,
                "poll-1",
                serde_json::json!({ "choice": "yes" }),
            )
            .unwrap();

        storage
            .record_outbox_failure(entry.seq, "connection refused")
            .unwrap();

        let entries = storage.outbox_entries().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].attempts, 1);
        assert_eq!(entries[0].last_error.as_deref(), Some("connection refused"));
    }

    #[test]
    fn test_remove_outbox_entry() {
        let storage = create_test_storage();

        let entry = storage
            .enqueue(
                EntityKind::Workout,
                MutationOp::Delete,
                "w-1",
                serde_json::json!({ "id": "w-1" }),
            )
            .unwrap();

        storage.remove_outbox_entry(entry.seq).unwrap();
        assert_eq!(storage.outbox_len().unwrap(), 0);
    }

    #[test]
    fn test_cancel_entries_for_local_row() {
        let storage = create_test_storage();

        storage
            .enqueue(
                EntityKind::Workout,
                MutationOp::Create,
                "w-1",
                serde_json::json!({}),
            )
            .unwrap();
        storage
            .enqueue(
                EntityKind::Workout,
                MutationOp::Create,
                "w-2",
                serde_json::json!({}),
            )
            .unwrap();

        let removed = storage.remove_outbox_entries_for("w-1").unwrap();
        assert_eq!(removed, 1);
        assert_eq!(storage.outbox_len().unwrap(), 1);
        assert_eq!(storage.outbox_entries().unwrap()[0].local_id, "w-2");
    }

    #[test]
    fn test_replace_workouts_keeps_dirty_rows() {
        let storage = create_test_storage();

        let local = sample_workout();
        storage.save_workout(&local).unwrap();

        let mut server_row = sample_workout();
        server_row.mark_synced();
        storage.replace_workouts(&[server_row.clone()]).unwrap();

        let workouts = storage.list_workouts().unwrap();
        assert_eq!(workouts.len(), 2);
        assert!(workouts.iter().any(|w| w.id == local.id));
        assert!(workouts.iter().any(|w| w.id == server_row.id));
    }

    #[test]
    fn test_branding_and_last_sync_roundtrip() {
        let storage = create_test_storage();
        assert!(storage.get_branding().unwrap().is_none());
        assert!(storage.last_sync().unwrap().is_none());

        let branding = TeamBranding {
            name: "FC Example".to_string(),
            motto: None,
            logo_url: None,
            primary_color: "#112233".to_string(),
            secondary_color: "#445566".to_string(),
        };
        storage.save_branding(&branding).unwrap();

        let now = Utc::now();
        storage.set_last_sync(now).unwrap();

        assert_eq!(storage.get_branding().unwrap().unwrap().name, "FC Example");
        let recorded = storage.last_sync().unwrap().unwrap();
        assert!((recorded - now).num_seconds().abs() < 2);
    }
}
