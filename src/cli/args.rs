use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{AppConfig, ENV_DATABASE, ENV_OMDB_KEY, ENV_OMDB_URL};

#[derive(Parser, Debug)]
#[command(name = "movietracker")]
#[command(about = "Track the movies you have seen, loved and want to see", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Slot database file (default: per-user data directory)
    #[arg(long, env = ENV_DATABASE, global = true)]
    pub db: Option<PathBuf>,

    /// Keep everything in memory for this run
    #[arg(long, global = true)]
    pub ephemeral: bool,

    #[arg(long, value_parser = ["plain", "json"], default_value = "plain", global = true)]
    pub format: String,

    #[arg(long, value_parser = ["error", "warn", "info", "debug", "trace"], default_value = "warn", global = true)]
    pub log_level: String,

    #[arg(long, env = ENV_OMDB_KEY, hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    #[arg(long, env = ENV_OMDB_URL, global = true)]
    pub api_url: Option<String>,

    /// Delay before a requested delete is applied
    #[arg(long, global = true)]
    pub delete_delay_ms: Option<i64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Search the movie database
    Search {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },

    /// Add a movie to the collection by its IMDb id
    Add { id: String },

    /// Show a movie's detail, optionally acting on it
    Open {
        id: String,

        /// Do not ask the provider for the full detail
        #[arg(long)]
        no_fetch: bool,

        #[arg(long)]
        fav: bool,

        #[arg(long)]
        wish: bool,

        #[arg(long)]
        rate: Option<i64>,
    },

    /// Close the open detail (shell only)
    Close,

    /// Toggle favorite on a tracked movie
    Fav { id: String },

    /// Toggle wishlist on a tracked movie
    Wish { id: String },

    /// Rate a tracked movie from 0 to 10
    Rate { id: String, rating: i64 },

    /// Remove the rating of a tracked movie
    Unrate { id: String },

    /// Delete the movie at a list index
    Delete { index: usize },

    /// List the collection
    List {
        #[arg(long, value_parser = ["all", "favorites", "fav", "rated", "wishlist", "wish"])]
        filter: Option<String>,
    },

    /// Switch page (home, search, collection)
    Page { name: String },

    /// Toggle light/dark theme
    Theme,

    /// Database statistics and integrity
    Info,

    /// Read commands from stdin, one per line
    Shell,
}

/// One line typed into the shell
#[derive(Parser, Debug)]
#[command(no_binary_name = true)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Environment defaults, then flags
    pub fn config(&self) -> AppConfig {
        let mut config = AppConfig::from_env();

        if let Some(db) = &self.db {
            config.database_path = Some(db.clone());
        }
        if let Some(key) = &self.api_key {
            config.omdb.api_key = key.clone();
        }
        if let Some(url) = &self.api_url {
            config.omdb.base_url = url.clone();
        }
        if let Some(delay) = self.delete_delay_ms {
            config.delete_delay_ms = delay;
        }
        config.ephemeral = self.ephemeral;

        config
    }
}
