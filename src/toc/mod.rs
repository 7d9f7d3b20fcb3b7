mod extractor;
mod markers;
mod merge;
mod modes;
mod segments;
mod title_features;

use tracing::{info, warn};

use crate::model::{PdfFeatures, SegmentBox, TocItem};

pub use merge::merge_two_segments_titles;
pub use modes::Modes;
pub use segments::SegmentBoxError;
pub use title_features::{DegenerateRegion, TitleFeatures};

use extractor::build_toc;
use segments::{PdfSegment, segments_from_boxes};

#[derive(Debug)]
pub struct TitleExtraction {
    pub modes: Modes,
    pub titles: Vec<TitleFeatures>,
    pub candidate_count: usize,
    pub title_candidate_count: usize,
    pub degenerate: Vec<DegenerateRegion>,
}

#[derive(Debug)]
pub struct TocExtraction {
    pub modes: Modes,
    pub toc: Vec<TocItem>,
    pub candidate_count: usize,
    pub title_candidate_count: usize,
    pub merge_count: usize,
    pub degenerate: Vec<DegenerateRegion>,
}

impl TocExtraction {
    pub fn warnings(&self) -> Vec<String> {
        self.degenerate.iter().map(ToString::to_string).collect()
    }
}

/// Validates the candidate boxes and builds one feature record per title candidate.
pub fn extract_title_features(
    pdf_features: &PdfFeatures,
    segment_boxes: &[SegmentBox],
) -> Result<TitleExtraction, SegmentBoxError> {
    let segments = segments_from_boxes(pdf_features, segment_boxes)?;
    let candidate_count = segments.len();

    let title_segments: Vec<PdfSegment> = segments
        .into_iter()
        .filter(|segment| segment.segment_type.is_title())
        .collect();
    let title_candidate_count = title_segments.len();

    let modes = Modes::from_pdf_features(pdf_features);

    let mut titles = Vec::with_capacity(title_candidate_count);
    let mut degenerate = Vec::new();
    for segment in title_segments {
        match TitleFeatures::from_segment(segment, pdf_features, &modes) {
            Ok(title) => titles.push(title),
            Err(region) => {
                warn!(
                    page = region.page_number,
                    left = region.left,
                    top = region.top,
                    text = %region.text,
                    "title candidate overlaps no tokens, skipping"
                );
                degenerate.push(region);
            }
        }
    }

    Ok(TitleExtraction {
        modes,
        titles,
        candidate_count,
        title_candidate_count,
        degenerate,
    })
}

pub fn extract_table_of_contents(
    pdf_features: &PdfFeatures,
    segment_boxes: &[SegmentBox],
) -> Result<TocExtraction, SegmentBoxError> {
    info!(
        file = %pdf_features.file_name,
        candidates = segment_boxes.len(),
        "getting toc"
    );

    let extraction = extract_title_features(pdf_features, segment_boxes)?;
    let merged = merge_two_segments_titles(extraction.titles, pdf_features, &extraction.modes);
    let toc = build_toc(&merged.titles);

    info!(
        titles = extraction.title_candidate_count,
        merged = merged.merge_count,
        entries = toc.len(),
        skipped = extraction.degenerate.len(),
        "toc extracted"
    );

    Ok(TocExtraction {
        modes: extraction.modes,
        toc,
        candidate_count: extraction.candidate_count,
        title_candidate_count: extraction.title_candidate_count,
        merge_count: merged.merge_count,
        degenerate: extraction.degenerate,
    })
}
