//! Library target for the `loomfetch` package.
//!
//! The deliverable is the `loomfetch` binary (`src/main.rs`); the pieces live here so
//! they can be tested without spawning a process.

pub mod cli;
pub mod error;
pub mod utils;

use std::path::{Path, PathBuf};

use bytes::Bytes;
use loom_fetch::{AnalysisRequest, FetchConfig, MediaMime, MediaPayload, Retriever};
use tracing::{debug, info};

use crate::cli::Args;
use crate::error::AppError;
use crate::utils::parse_params;

pub fn build_config(args: &Args) -> Result<FetchConfig, AppError> {
    if args.min_bandwidth > args.max_bandwidth {
        return Err(AppError::InvalidInput(format!(
            "--min-bandwidth {} is above --max-bandwidth {}",
            args.min_bandwidth, args.max_bandwidth
        )));
    }

    let mut builder = FetchConfig::builder()
        .origin(args.origin.clone())
        .user_agent(args.user_agent.clone())
        .max_segments(args.max_segments)
        .max_total_bytes(args.max_bytes)
        .bandwidth(args.min_bandwidth, args.max_bandwidth);

    for (name, value) in parse_params(&args.headers)? {
        debug!("Adding header {name}");
        builder = builder.header(&name, &value);
    }
    Ok(builder.build())
}

/// `path` itself, or `sample.<ext>` inside it when it names a directory.
pub fn output_path(path: &Path, mime: &MediaMime) -> PathBuf {
    if path.is_dir() {
        path.join(format!("sample.{}", mime.extension()))
    } else {
        path.to_path_buf()
    }
}

/// Retrieves the media named by `args` and writes the requested outputs.
pub async fn run(args: &Args) -> Result<MediaPayload, AppError> {
    let config = build_config(args)?;
    let retriever = Retriever::new(config)?;

    let payload = match (&args.url, &args.file) {
        (_, Some(path)) => {
            retriever
                .from_file(path, MediaMime::from_mime(&args.mime))
                .await?
        }
        (Some(url), None) => retriever.retrieve(url).await?,
        (None, None) => {
            return Err(AppError::InvalidInput(
                "either a URL or --file is required".to_string(),
            ));
        }
    };
    info!(
        bytes = payload.len(),
        mime = payload.mime.as_str(),
        "Retrieved media sample"
    );

    if let Some(path) = &args.output {
        let path = output_path(path, &payload.mime);
        tokio::fs::write(&path, &payload.data).await?;
        info!("Wrote media to {}", path.display());
    }

    if let Some(path) = &args.request_json {
        let body = serde_json::to_vec(&AnalysisRequest::accent(&payload))?;
        tokio::fs::write(path, Bytes::from(body)).await?;
        info!("Wrote analysis request to {}", path.display());
    }

    Ok(payload)
}
