// webpify/src/cli.rs
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "webpify", version, about = "Resize uploaded images and convert them to WebP")]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Settings file (TOML)
    #[arg(short, long, global = true, default_value = "webpify.toml", env = "WEBPIFY_CONFIG")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Post-process one upload and print the rewritten descriptor as JSON
    Process {
        /// Read the descriptor as JSON from a file, or `-` for stdin
        #[arg(short, long, conflicts_with_all = ["file", "url", "mime_type", "error"])]
        descriptor: Option<PathBuf>,

        /// Path of the uploaded file
        #[arg(long, required_unless_present = "descriptor")]
        file: Option<PathBuf>,

        /// Public URL of the uploaded file
        #[arg(long, default_value = "")]
        url: String,

        /// MIME type reported by the upload
        #[arg(long = "type", required_unless_present = "descriptor")]
        mime_type: Option<String>,

        /// Upstream upload error, if any
        #[arg(long)]
        error: Option<String>,

        /// Debug log file (defaults to awc_debug.log next to the upload)
        #[arg(long)]
        log_file: Option<PathBuf>,
    },

    /// Inspect or change the stored settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum SettingsAction {
    /// Print the effective settings
    Show,

    /// Store a setting (max_width, max_height, quality, delete_originals)
    Set { key: String, value: String },
}
