use tracing::{debug, warn};

use crate::model::PdfFeatures;
use crate::toc::modes::Modes;
use crate::toc::title_features::TitleFeatures;

const MAX_VERTICAL_GAP: f64 = 15.0;

#[derive(Debug, Default)]
pub struct MergeOutcome {
    pub titles: Vec<TitleFeatures>,
    pub merge_count: usize,
}

pub fn sort_titles(titles: &mut [TitleFeatures]) {
    titles.sort_by(|a, b| {
        a.page_number
            .cmp(&b.page_number)
            .then(a.top.total_cmp(&b.top))
    });
}

/// Fuses line-wrapped titles. After every merge the result is checked again against the title
/// before it, so a second pass over the output merges nothing.
pub fn merge_two_segments_titles(
    mut titles: Vec<TitleFeatures>,
    pdf_features: &PdfFeatures,
    modes: &Modes,
) -> MergeOutcome {
    sort_titles(&mut titles);

    let mut outcome = MergeOutcome {
        titles: Vec::with_capacity(titles.len()),
        merge_count: 0,
    };

    for title in titles {
        outcome.titles.push(title);
        while merge_last_pair(&mut outcome, pdf_features, modes) {}
    }

    outcome
}

fn merge_last_pair(
    outcome: &mut MergeOutcome,
    pdf_features: &PdfFeatures,
    modes: &Modes,
) -> bool {
    let Some(title) = outcome.titles.pop() else {
        return false;
    };
    let Some(previous) = outcome.titles.last_mut() else {
        outcome.titles.push(title);
        return false;
    };

    if !should_merge(previous, &title) {
        outcome.titles.push(title);
        return false;
    }

    match previous.merged_with(&title, pdf_features, modes) {
        Ok(merged) => {
            debug!(
                page = merged.page_number,
                label = %merged.text_content,
                "merged wrapped title"
            );
            *previous = merged;
            outcome.merge_count += 1;
            true
        }
        Err(err) => {
            warn!(error = %err, "merged region lost its tokens, keeping titles apart");
            outcome.titles.push(title);
            false
        }
    }
}

pub fn should_merge(title: &TitleFeatures, other_title: &TitleFeatures) -> bool {
    if title.page_number != other_title.page_number {
        return false;
    }

    if (other_title.top - title.bottom).abs() > MAX_VERTICAL_GAP {
        return false;
    }

    if title.vertically_overlaps(other_title) {
        return true;
    }

    if title.first_characters_type.is_numbering()
        && other_title.first_characters_type.is_numbering()
    {
        return false;
    }

    if title.bullet_points_type != 0 && other_title.bullet_points_type != 0 {
        return false;
    }

    title.features_to_merge() == other_title.features_to_merge()
}
