use std::path::PathBuf;

use clap::Parser;
use loom_fetch::config::{
    DEFAULT_MAX_SEGMENTS, DEFAULT_MAX_TOTAL_BYTES, DEFAULT_ORIGIN, DEFAULT_USER_AGENT,
};

/// Fetch a bounded media sample for accent analysis.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// HLS master playlist URL or direct media URL
    #[arg(required_unless_present = "file", conflicts_with = "file")]
    pub url: Option<String>,

    /// Use a local media file instead of a URL
    #[arg(short, long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// MIME type of the local file
    #[arg(long, default_value = "video/mp4")]
    pub mime: String,

    /// Write the retrieved media to this file, or to `sample.<ext>` inside this directory
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Write the analysis request body (inline base64 media + prompt) as JSON
    #[arg(long, value_name = "FILE")]
    pub request_json: Option<PathBuf>,

    /// Number of leading segments fetched from the playlist
    #[arg(long, default_value_t = DEFAULT_MAX_SEGMENTS)]
    pub max_segments: usize,

    /// Largest accepted payload in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_TOTAL_BYTES)]
    pub max_bytes: u64,

    /// Lowest acceptable variant bandwidth (bits/s)
    #[arg(long, default_value_t = 100_000)]
    pub min_bandwidth: u64,

    /// Highest acceptable variant bandwidth (bits/s)
    #[arg(long, default_value_t = 1_500_000)]
    pub max_bandwidth: u64,

    /// Origin sent with every request; Referer is derived from it
    #[arg(long, default_value = DEFAULT_ORIGIN, env = "LOOMFETCH_ORIGIN")]
    pub origin: String,

    /// User agent sent with every request
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Extra request header as name=value (repeatable)
    #[arg(short = 'H', long = "header", value_name = "NAME=VALUE")]
    pub headers: Vec<String>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}
