use anyhow::Result;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{tally_votes, CreatePoll, Poll, PollResults, PollStatus, PollVote};

/// Options used when a poll is created without an explicit list
pub fn default_options() -> Vec<String> {
    vec!["yes".to_string(), "no".to_string(), "maybe".to_string()]
}

pub struct PollService {
    db: PgPool,
}

impl PollService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn create_poll(&self, created_by: Uuid, data: CreatePoll) -> Result<Poll> {
        let options = data.options.unwrap_or_else(default_options);
        let options_json = serde_json::to_value(&options)?;

        let poll = sqlx::query_as::<_, Poll>(
            "INSERT INTO polls (id, question, options, event_date, closes_at, created_by, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
             RETURNING id, question, options, event_date, closes_at, status, created_by, created_at, updated_at",
        )
        .bind(Uuid::new_v4())
        .bind(data.question.trim())
        .bind(options_json)
        .bind(data.event_date)
        .bind(data.closes_at)
        .bind(created_by)
        .bind(Utc::now())
        .fetch_one(&self.db)
        .await?;

        Ok(poll)
    }

    pub async fn get_poll_by_id(&self, poll_id: Uuid) -> Result<Option<Poll>> {
        let poll = sqlx::query_as::<_, Poll>(
            "SELECT id, question, options, event_date, closes_at, status, created_by, created_at, updated_at
             FROM polls WHERE id = $1",
        )
        .bind(poll_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(poll)
    }

    pub async fn list_polls(&self, status: Option<PollStatus>) -> Result<Vec<Poll>> {
        let polls = sqlx::query_as::<_, Poll>(
            "SELECT id, question, options, event_date, closes_at, status, created_by, created_at, updated_at
             FROM polls
             WHERE $1::text IS NULL OR status = $1
             ORDER BY created_at DESC",
        )
        .bind(status.map(|s| s.as_str()))
        .fetch_all(&self.db)
        .await?;

        Ok(polls)
    }

    /// One vote per user per poll: re-voting overwrites the previous choice
    pub async fn cast_vote(&self, poll_id: Uuid, user_id: Uuid, choice: &str) -> Result<PollVote> {
        let vote = sqlx::query_as::<_, PollVote>(
            r#"
            INSERT INTO poll_votes (id, poll_id, user_id, choice, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            ON CONFLICT (poll_id, user_id) DO UPDATE
            SET choice = $4, updated_at = $5
            RETURNING id, poll_id, user_id, choice, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(poll_id)
        .bind(user_id)
        .bind(choice)
        .bind(Utc::now())
        .fetch_one(&self.db)
        .await?;

        Ok(vote)
    }

    pub async fn get_results(&self, poll: Poll, caller: Uuid) -> Result<PollResults> {
        let votes = sqlx::query_as::<_, PollVote>(
            "SELECT id, poll_id, user_id, choice, created_at, updated_at
             FROM poll_votes WHERE poll_id = $1",
        )
        .bind(poll.id)
        .fetch_all(&self.db)
        .await?;

        let tally = tally_votes(&poll.options, &votes);
        let my_vote = votes
            .iter()
            .find(|v| v.user_id == caller)
            .map(|v| v.choice.clone());
        let total_votes = votes.len() as i64;

        Ok(PollResults {
            poll,
            tally,
            total_votes,
            my_vote,
        })
    }

    /// Closing an already-closed poll is a no-op
    pub async fn close_poll(&self, poll_id: Uuid) -> Result<Option<Poll>> {
        let poll = sqlx::query_as::<_, Poll>(
            "UPDATE polls SET status = 'closed', updated_at = $2
             WHERE id = $1
             RETURNING id, question, options, event_date, closes_at, status, created_by, created_at, updated_at",
        )
        .bind(poll_id)
        .bind(Utc::now())
        .fetch_optional(&self.db)
        .await?;

        Ok(poll)
    }

    /// Scheduler entry point: close every open poll whose deadline passed
    pub async fn close_expired_polls(&self) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE polls SET status = 'closed', updated_at = $1
             WHERE status = 'open' AND closes_at IS NOT NULL AND closes_at <= $1",
        )
        .bind(Utc::now())
        .execute(&self.db)
        .await?;

        Ok(result.rows_affected())
    }
}
