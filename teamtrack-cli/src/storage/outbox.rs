use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Resource kind a queued mutation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Workout,
    PollVote,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Workout => "workout",
            EntityKind::PollVote => "poll_vote",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationOp {
    Create,
    Update,
    Delete,
}

impl MutationOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            MutationOp::Create => "create",
            MutationOp::Update => "update",
            MutationOp::Delete => "delete",
        }
    }
}

/// One pending mutation awaiting replay against the server.
///
/// Entries replay in FIFO order per entity kind; ordering across kinds is
/// incidental. A failed replay keeps the entry, bumps `attempts`, and records
/// the error for the status display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboxEntry {
    pub id: String,
    /// Monotonic queue position, also the sled key
    pub seq: u64,
    pub entity: EntityKind,
    pub op: MutationOp,
    /// Local row the mutation belongs to, used to link replays back
    pub local_id: String,
    /// Request body as JSON text; bincode cannot round-trip dynamic JSON
    pub payload_json: String,
    pub queued_at: DateTime<Utc>,
    pub attempts: u32,
    pub last_error: Option<String>,
}

impl OutboxEntry {
    pub fn payload(&self) -> anyhow::Result<serde_json::Value> {
        Ok(serde_json::from_str(&self.payload_json)?)
    }

    pub fn describe(&self) -> String {
        format!("{} {}", self.op.as_str(), self.entity.as_str())
    }
}
