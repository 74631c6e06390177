// Local mirror models; shapes match the server's JSON surface

mod poll;
mod team;
mod video;
mod workout;

pub use poll::{OptionTally, Poll, PollResults};
pub use team::TeamBranding;
pub use video::Video;
pub use workout::{Workout, WorkoutEntry, WorkoutFilter};
