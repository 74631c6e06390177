mod config_cmd;
mod login;
mod logout;
mod polls;
mod status;
mod sync;
mod videos;
mod whoami;
mod workout;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

pub use login::LoginCommand;
pub use logout::LogoutCommand;
pub use status::StatusCommand;
pub use sync::SyncCommand;
pub use whoami::WhoamiCommand;
pub use workout::WorkoutLogCommand;

#[derive(Parser)]
#[command(name = "teamtrack-cli")]
#[command(about = "Offline-first client for TeamTrack", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Login to TeamTrack
    Login(LoginCommand),

    /// Logout from TeamTrack
    Logout(LogoutCommand),

    /// Show current user information
    Whoami(WhoamiCommand),

    /// Manage workouts
    #[command(subcommand)]
    Workout(WorkoutSubcommands),

    /// Attendance polls
    #[command(subcommand)]
    Polls(PollSubcommands),

    /// Video library
    #[command(subcommand)]
    Videos(VideoSubcommands),

    /// Sync data with server
    Sync(SyncCommand),

    /// Show sync status and pending mutations
    Status(StatusCommand),

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigSubcommands),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
enum WorkoutSubcommands {
    /// Log a new workout (works offline)
    Log(WorkoutLogCommand),

    /// List workouts from the local cache
    List {
        /// Filter from date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Filter to date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,

        /// Number of workouts to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Show workout details
    Show {
        /// Workout ID or unique prefix
        id: String,
    },

    /// Delete a workout
    Delete {
        /// Workout ID or unique prefix
        id: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Subcommand)]
enum PollSubcommands {
    /// List polls from the local cache
    List {
        /// Include closed polls
        #[arg(short, long)]
        all: bool,
    },

    /// Show a poll with its tally
    Show {
        /// Poll ID or unique prefix
        id: String,
    },

    /// Vote on a poll (queued when offline)
    Vote {
        /// Poll ID or unique prefix
        id: String,

        /// Chosen option
        choice: String,
    },
}

#[derive(Subcommand)]
enum VideoSubcommands {
    /// List videos from the local cache
    List {
        /// Filter by category
        #[arg(short, long)]
        category: Option<String>,
    },
}

#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Show current configuration
    Show,

    /// Initialize configuration with defaults
    Init {
        /// Overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        if self.verbose {
            tracing::info!("Verbose mode enabled");
        }

        match self.command {
            Commands::Login(cmd) => cmd.execute().await,
            Commands::Logout(cmd) => cmd.execute().await,
            Commands::Whoami(cmd) => cmd.execute().await,
            Commands::Workout(subcmd) => match subcmd {
                WorkoutSubcommands::Log(cmd) => cmd.execute().await,
                WorkoutSubcommands::List { from, to, limit } => {
                    workout::list_workouts(from, to, limit).await
                }
                WorkoutSubcommands::Show { id } => workout::show_workout(&id).await,
                WorkoutSubcommands::Delete { id, force } => {
                    workout::delete_workout(&id, force).await
                }
            },
            Commands::Polls(subcmd) => match subcmd {
                PollSubcommands::List { all } => polls::list_polls(all).await,
                PollSubcommands::Show { id } => polls::show_poll(&id).await,
                PollSubcommands::Vote { id, choice } => polls::vote(&id, &choice).await,
            },
            Commands::Videos(subcmd) => match subcmd {
                VideoSubcommands::List { category } => videos::list_videos(category).await,
            },
            Commands::Sync(cmd) => cmd.execute().await,
            Commands::Status(cmd) => cmd.execute().await,
            Commands::Config(subcmd) => match subcmd {
                ConfigSubcommands::Show => config_cmd::show_config().await,
                ConfigSubcommands::Init { force } => config_cmd::init_config(force).await,
            },
            Commands::Completions { shell } => {
                generate_completions(shell);
                Ok(())
            }
        }
    }
}

fn generate_completions(shell: clap_complete::Shell) {
    use clap::CommandFactory;
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}
