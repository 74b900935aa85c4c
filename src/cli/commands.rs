//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line client for the authenticated file API
#[derive(Parser, Debug)]
#[command(name = "webui-auth")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Server origin, overrides the config file
    #[arg(long, global = true, env = "WEBUI_BASE_URL")]
    pub base_url: Option<String>,

    /// Log in as this user before running the command
    #[arg(short, long, global = true, env = "WEBUI_USER")]
    pub user: Option<String>,

    /// Password for --user
    #[arg(long, global = true, env = "WEBUI_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in with --user/--password and remember the session
    Login,

    /// Revoke the refresh token and forget the session
    Logout,

    /// Exchange the refresh token for a new access token
    Refresh,

    /// Show whether a session is remembered
    Status,

    /// Create a directory
    Mkdir {
        /// Remote path, relative to the files root
        path: String,
    },

    /// Delete a file or directory
    Rm {
        /// Remote path, relative to the files root
        path: String,

        /// Delete directories with their contents
        #[arg(short, long)]
        recursive: bool,
    },

    /// Move or rename an entry
    Mv {
        /// Remote source path
        from: String,

        /// Destination, relative to the source's directory
        to: String,
    },

    /// Download a file
    Get {
        /// Remote path, relative to the files root
        path: String,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Upload a file
    Put {
        /// Local file
        local: PathBuf,

        /// Remote path, relative to the files root
        remote: String,
    },
}
