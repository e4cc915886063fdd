use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "moodlog")]
#[command(version, about = "A small mood journal with a monthly mood tracker")]
#[command(propagate_version = true)]
pub struct Cli {
    /// SQLite database file (defaults to $MOODLOG_DB or ./moodlog.db)
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new database
    Init,

    /// Run the HTTP server
    Serve {
        /// Address to listen on, e.g. 127.0.0.1:5000
        #[arg(long)]
        addr: Option<String>,

        /// Which same-day entry the tracker shows (earliest, latest)
        #[arg(long)]
        collision: Option<String>,
    },

    /// Manage users
    User(UserCommand),

    /// List a user's entries, newest first
    List {
        /// Username whose entries to list
        #[arg(long, short = 'u')]
        user: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a user's mood calendar
    Tracker {
        /// Username whose calendar to show
        #[arg(long, short = 'u')]
        user: String,

        /// Only count entries from this month (YYYY-MM)
        #[arg(long)]
        month: Option<String>,

        /// Which same-day entry wins (earliest, latest)
        #[arg(long)]
        collision: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
pub struct UserCommand {
    #[command(subcommand)]
    pub action: UserAction,
}

#[derive(Subcommand, Debug)]
pub enum UserAction {
    /// Register a user
    Add {
        /// Username
        username: String,
    },

    /// List registered users
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
