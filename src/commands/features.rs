use anyhow::Result;
use serde::Serialize;
use tracing::info;

use crate::cli::FeaturesArgs;
use crate::commands::source::load_inputs;
use crate::toc::{Modes, TitleFeatures, extract_title_features, merge_two_segments_titles};
use crate::util::emit_json;

#[derive(Debug, Serialize)]
struct FeaturesReport<'a> {
    modes: Modes,
    merged: bool,
    candidate_count: usize,
    title_candidate_count: usize,
    titles: &'a [TitleFeatures],
    warnings: Vec<String>,
}

pub fn run(args: FeaturesArgs) -> Result<()> {
    let inputs = load_inputs(&args.source)?;
    let extraction = extract_title_features(&inputs.pdf_features, &inputs.segment_boxes)?;
    let warnings = extraction
        .degenerate
        .iter()
        .map(ToString::to_string)
        .collect();

    let titles = if args.before_merge {
        extraction.titles
    } else {
        merge_two_segments_titles(extraction.titles, &inputs.pdf_features, &extraction.modes)
            .titles
    };

    let report = FeaturesReport {
        modes: extraction.modes,
        merged: !args.before_merge,
        candidate_count: extraction.candidate_count,
        title_candidate_count: extraction.title_candidate_count,
        titles: &titles,
        warnings,
    };

    emit_json(args.output.as_deref(), &report)?;
    info!(titles = titles.len(), merged = report.merged, "wrote title features");

    Ok(())
}
