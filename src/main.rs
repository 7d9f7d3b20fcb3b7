mod cli;
mod commands;
mod layout_client;
mod model;
mod toc;
mod util;

use anyhow::Result;
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::layout_client::LayoutServiceError;
use crate::toc::SegmentBoxError;

const EXIT_FAILURE: i32 = 1;
const EXIT_INVALID_SEGMENTS: i32 = 2;
const EXIT_LAYOUT_SERVICE: i32 = 3;

fn main() {
    init_tracing();

    if let Err(err) = run() {
        error!(error = %err, "command failed");
        for cause in err.chain().skip(1) {
            error!(cause = %cause, "caused by");
        }
        std::process::exit(exit_code(&err));
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Extract(args) => commands::extract::run(args),
        Commands::Features(args) => commands::features::run(args),
    }
}

fn exit_code(err: &anyhow::Error) -> i32 {
    if err.downcast_ref::<LayoutServiceError>().is_some() {
        EXIT_LAYOUT_SERVICE
    } else if err.downcast_ref::<SegmentBoxError>().is_some() {
        EXIT_INVALID_SEGMENTS
    } else {
        EXIT_FAILURE
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use anyhow::{Context, anyhow};
    use reqwest::StatusCode;

    use super::*;

    #[test]
    fn exit_code_tells_backend_and_segment_failures_apart() {
        let layout = anyhow::Error::from(LayoutServiceError::Status {
            url: "http://layout:5060/".to_string(),
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: "boom".to_string(),
        });
        assert_eq!(exit_code(&layout), EXIT_LAYOUT_SERVICE);

        let segments = anyhow::Error::from(SegmentBoxError::MissingField {
            index: 0,
            field: "type",
        });
        assert_eq!(exit_code(&segments), EXIT_INVALID_SEGMENTS);

        let wrapped: Result<(), SegmentBoxError> = Err(SegmentBoxError::MissingField {
            index: 3,
            field: "left",
        });
        let wrapped = wrapped.context("while extracting the toc").unwrap_err();
        assert_eq!(exit_code(&wrapped), EXIT_INVALID_SEGMENTS);

        assert_eq!(exit_code(&anyhow!("document not found")), EXIT_FAILURE);
    }
}
