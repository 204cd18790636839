//! CLI command definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "kvnotes")]
#[command(about = "Notes kept in a key-value store", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new workspace
    Init {
        /// Directory to initialize (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Store backend (redis, file)
        #[arg(short, long, default_value = "redis")]
        backend: String,

        /// Redis connection URL
        #[arg(long)]
        redis_url: Option<String>,
    },

    /// View or modify configuration
    Config {
        /// Config key to get or set
        key: Option<String>,

        /// Value to set (if provided, sets the key)
        value: Option<String>,

        /// List all configuration
        #[arg(short, long)]
        list: bool,
    },

    /// Create a note
    Add {
        #[arg(short, long, default_value = "")]
        title: String,

        #[arg(short, long, default_value = "")]
        content: String,

        /// Mark the note as starred
        #[arg(short, long)]
        star: bool,
    },

    /// Create a sample note
    Sample,

    /// Show a note
    Show {
        id: String,
    },

    /// Edit a note; omitted fields keep their current value
    Edit {
        id: String,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        content: Option<String>,

        #[arg(long, conflicts_with = "unstar")]
        star: bool,

        #[arg(long)]
        unstar: bool,
    },

    /// Toggle a note's star
    Star {
        id: String,
    },

    /// Delete a note
    Rm {
        id: String,
    },

    /// Delete all notes
    Clear {
        /// Confirm deleting every note
        #[arg(long)]
        yes: bool,
    },

    /// List notes, newest first
    List {
        /// Only notes whose title or content contains this text
        #[arg(short, long, default_value = "")]
        search: String,

        /// Only starred notes
        #[arg(long)]
        starred: bool,

        /// Sort by 'updated' or 'created' time
        #[arg(long, default_value = "updated")]
        sort: String,
    },

    /// Show note counts
    Stats {
        #[arg(short, long, default_value = "")]
        search: String,

        #[arg(long)]
        starred: bool,
    },

    /// Write a note to a JSON file
    Export {
        id: String,

        /// Output file (default: note-<id>.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl Commands {
    /// Star flag requested by `edit --star/--unstar`
    pub fn star_change(star: bool, unstar: bool) -> Option<bool> {
        match (star, unstar) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}
