use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PollStatus {
    Open,
    Closed,
}

impl PollStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PollStatus::Open => "open",
            PollStatus::Closed => "closed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "open" => Some(PollStatus::Open),
            "closed" => Some(PollStatus::Closed),
            _ => None,
        }
    }
}

/// Attendance poll. Options are free-form; creation defaults to yes/no/maybe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Poll {
    pub id: Uuid,
    pub question: String,
    pub options: Vec<String>,
    pub event_date: Option<NaiveDate>,
    pub closes_at: Option<DateTime<Utc>>,
    pub status: PollStatus,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FromRow<'_, PgRow> for Poll {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        let options_raw: serde_json::Value = row.try_get("options")?;
        let options = serde_json::from_value(options_raw)
            .map_err(|e| super::column_decode("options", e.to_string()))?;

        let status_raw: String = row.try_get("status")?;
        let status = PollStatus::parse(&status_raw).ok_or_else(|| {
            super::column_decode("status", format!("unknown status '{status_raw}'"))
        })?;

        Ok(Poll {
            id: row.try_get("id")?,
            question: row.try_get("question")?,
            options,
            event_date: row.try_get("event_date")?,
            closes_at: row.try_get("closes_at")?,
            status,
            created_by: row.try_get("created_by")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PollVote {
    pub id: Uuid,
    pub poll_id: Uuid,
    pub user_id: Uuid,
    pub choice: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatePoll {
    pub question: String,
    pub options: Option<Vec<String>>,
    pub event_date: Option<NaiveDate>,
    pub closes_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CastVote {
    pub choice: String,
}

/// Per-option vote count
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionTally {
    pub option: String,
    pub votes: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PollResults {
    pub poll: Poll,
    pub tally: Vec<OptionTally>,
    pub total_votes: i64,
    pub my_vote: Option<String>,
}

/// Fold raw votes into per-option counts, preserving option order.
/// Votes for options no longer on the poll are dropped from the tally.
pub fn tally_votes(options: &[String], votes: &[PollVote]) -> Vec<OptionTally> {
    options
        .iter()
        .map(|option| OptionTally {
            option: option.clone(),
            votes: votes.iter().filter(|v| &v.choice == option).count() as i64,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vote(poll_id: Uuid, choice: &str) -> PollVote {
        PollVote {
            id: Uuid::new_v4(),
            poll_id,
            user_id: Uuid::new_v4(),
            choice: choice.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_tally_preserves_option_order() {
        let poll_id = Uuid::new_v4();
        let options = vec!["yes".to_string(), "no".to_string(), "maybe".to_string()];
        let votes = vec![
            vote(poll_id, "no"),
            vote(poll_id, "yes"),
            vote(poll_id, "yes"),
        ];

        let tally = tally_votes(&options, &votes);
        assert_eq!(tally.len(), 3);
        assert_eq!((tally[0].option.as_str(), tally[0].votes), ("yes", 2));
        assert_eq!((tally[1].option.as_str(), tally[1].votes), ("no", 1));
        assert_eq!((tally[2].option.as_str(), tally[2].votes), ("maybe", 0));
    }

    #[test]
    fn test_tally_drops_stale_choices() {
        let poll_id = Uuid::new_v4();
        let options = vec!["yes".to_string(), "no".to_string()];
        let votes = vec![vote(poll_id, "maybe")];

        let tally = tally_votes(&options, &votes);
        assert!(tally.iter().all(|t| t.votes == 0));
    }
}
