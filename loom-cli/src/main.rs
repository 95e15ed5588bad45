use std::process;

use clap::Parser;
use loomfetch::{cli::Args, run};
use tracing::error;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args).await {
        Ok(payload) => {
            println!("{} bytes ({})", payload.len(), payload.mime.as_str());
        }
        Err(e) => {
            error!("Application error: {e}");
            eprintln!("Error: {}", e.user_message());
            process::exit(1);
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "loomfetch={default_level},loom_fetch={default_level}"
        ))
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}
