use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Attendance poll as mirrored from the server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Poll {
    pub id: String,
    pub question: String,
    pub options: Vec<String>,
    pub event_date: Option<NaiveDate>,
    pub closes_at: Option<DateTime<Utc>>,
    pub status: String,
}

impl Poll {
    pub fn is_open(&self) -> bool {
        self.status == "open"
    }
}

/// Tally shape returned by GET /api/polls/:id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollResults {
    pub poll: Poll,
    pub tally: Vec<OptionTally>,
    pub total_votes: i64,
    pub my_vote: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionTally {
    pub option: String,
    pub votes: i64,
}
