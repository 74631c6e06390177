// Sync engine: replay the outbox against the server, then refresh the local
// mirror. Best-effort and last-write-wins; being offline is a skipped pass,
// never an error.

use anyhow::Result;
use chrono::Utc;

use crate::api::ApiClient;
use crate::storage::{EntityKind, MutationOp, OutboxEntry, Storage};

/// What one sync pass did
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SyncReport {
    /// Entries replayed and removed from the outbox
    pub pushed: usize,
    /// Entries that failed and stay queued for the next pass
    pub failed: usize,
    /// Mirror collections refreshed during the pull phase
    pub pulled: usize,
    /// Pass skipped entirely because the server was unreachable
    pub offline: bool,
}

impl SyncReport {
    pub fn is_clean(&self) -> bool {
        !self.offline && self.failed == 0
    }
}

pub struct SyncEngine<'a> {
    storage: &'a Storage,
    api: &'a ApiClient,
}

impl<'a> SyncEngine<'a> {
    pub fn new(storage: &'a Storage, api: &'a ApiClient) -> Self {
        Self { storage, api }
    }

    /// One full pass: connectivity probe, push phase, pull phase.
    ///
    /// Each queued entry is attempted at most once per pass, in queue order.
    /// Failures are recorded and left for the next pass; the pass itself
    /// keeps going.
    pub async fn sync_pass(&self) -> Result<SyncReport> {
        let mut report = SyncReport::default();

        if !self.api.is_online().await {
            tracing::info!("Server unreachable, skipping sync pass");
            report.offline = true;
            return Ok(report);
        }

        self.push(&mut report).await?;
        self.pull(&mut report).await?;

        self.storage.set_last_sync(Utc::now())?;

        tracing::info!(
            "Sync pass done: {} pushed, {} failed, {} collections pulled",
            report.pushed,
            report.failed,
            report.pulled
        );

        Ok(report)
    }

    /// Preview what a pass would replay, without touching the network
    pub fn pending(&self) -> Result<Vec<OutboxEntry>> {
        self.storage.outbox_entries()
    }

    async fn push(&self, report: &mut SyncReport) -> Result<()> {
        // Snapshot first: entries queued while the pass runs wait for the next.
        let entries = self.storage.outbox_entries()?;

        for entry in entries {
            match self.replay(&entry).await {
                Ok(()) => {
                    self.storage.remove_outbox_entry(entry.seq)?;
                    report.pushed += 1;
                }
                Err(e) => {
                    tracing::warn!(
                        "Replay of {} (seq {}) failed: {e}",
                        entry.describe(),
                        entry.seq
                    );
                    self.storage.record_outbox_failure(entry.seq, &e.to_string())?;
                    report.failed += 1;
                }
            }
        }

        Ok(())
    }

    async fn replay(&self, entry: &OutboxEntry) -> Result<()> {
        match (entry.entity, entry.op) {
            (EntityKind::Workout, MutationOp::Create) => {
                let workout = self.api.create_workout(&entry.payload()?).await?;

                // The server assigned its own id; swap the local row over.
                self.storage.delete_workout(&entry.local_id)?;
                self.storage.save_workout(&workout)?;
                Ok(())
            }
            (EntityKind::Workout, MutationOp::Delete) => {
                self.api.delete_workout(&entry.local_id).await
            }
            (EntityKind::PollVote, MutationOp::Create) => {
                let payload = entry.payload()?;
                let choice = payload
                    .get("choice")
                    .and_then(|v| v.as_str())
                    .ok_or_else(|| anyhow::anyhow!("Vote payload missing choice"))?;
                self.api.vote(&entry.local_id, choice).await
            }
            (entity, op) => Err(anyhow::anyhow!(
                "No replay handler for {} {}",
                op.as_str(),
                entity.as_str()
            )),
        }
    }

    /// Refresh the local mirror, server wins. Rows with queued mutations are
    /// preserved by the storage layer. Individual fetch failures are logged
    /// and skipped; a pull never aborts the pass.
    async fn pull(&self, report: &mut SyncReport) -> Result<()> {
        match self.api.team_branding().await {
            Ok(branding) => {
                self.storage.save_branding(&branding)?;
                report.pulled += 1;
            }
            Err(e) => tracing::warn!("Branding pull failed: {e}"),
        }

        match self.api.list_workouts().await {
            Ok(workouts) => {
                self.storage.replace_workouts(&workouts)?;
                report.pulled += 1;
            }
            Err(e) => tracing::warn!("Workout pull failed: {e}"),
        }

        match self.api.list_polls().await {
            Ok(polls) => {
                self.storage.replace_polls(&polls)?;
                report.pulled += 1;
            }
            Err(e) => tracing::warn!("Poll pull failed: {e}"),
        }

        match self.api.list_videos().await {
            Ok(videos) => {
                self.storage.replace_videos(&videos)?;
                report.pulled += 1;
            }
            Err(e) => tracing::warn!("Video pull failed: {e}"),
        }

        Ok(())
    }
}
