// Domain models shared by services and API handlers

pub mod exercise;
pub mod poll;
pub mod report;
pub mod team_settings;
pub mod template;
pub mod user;
pub mod validation;
pub mod video;
pub mod workout;

pub use exercise::*;
pub use poll::*;
pub use report::*;
pub use team_settings::*;
pub use template::*;
pub use user::*;
pub use validation::*;
pub use video::*;
pub use workout::*;

/// Decode failure for hand-written FromRow impls
pub(crate) fn column_decode(column: &str, message: String) -> sqlx::Error {
    sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: message.into(),
    }
}
