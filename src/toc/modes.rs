use std::collections::HashMap;

use serde::Serialize;

use crate::model::PdfFeatures;

/// Document-wide typical values used to normalise per-title measurements.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Modes {
    pub left_space_mode: f64,
    pub font_size_mode: f64,
}

impl Modes {
    pub fn from_pdf_features(pdf_features: &PdfFeatures) -> Self {
        let lefts = pdf_features
            .loop_tokens()
            .map(|(_, token)| token.bounding_box.left);
        let font_sizes = pdf_features
            .loop_tokens()
            .map(|(_, token)| token.font.font_size);

        Self {
            left_space_mode: rounded_mode(lefts),
            font_size_mode: rounded_mode(font_sizes),
        }
    }
}

/// Most frequent value after rounding; ties go to the value seen first, no values yield 0.
fn rounded_mode(values: impl Iterator<Item = f64>) -> f64 {
    let mut counts = HashMap::<i64, (usize, usize)>::new();
    for (order, value) in values.filter(|value| value.is_finite()).enumerate() {
        let entry = counts.entry(value.round() as i64).or_insert((0, order));
        entry.0 += 1;
    }

    counts
        .into_iter()
        .max_by(|(_, (count_a, order_a)), (_, (count_b, order_b))| {
            count_a.cmp(count_b).then(order_b.cmp(order_a))
        })
        .map_or(0.0, |(value, _)| value as f64)
}
