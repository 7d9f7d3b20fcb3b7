use thiserror::Error;
use tracing::debug;

use crate::model::{PdfFeatures, Rectangle, SegmentBox, TokenType};

#[derive(Debug, Error, PartialEq)]
pub enum SegmentBoxError {
    #[error("segment box {index} is missing required field `{field}`")]
    MissingField { index: usize, field: &'static str },

    #[error("segment box {index} has invalid `{field}`: {reason}")]
    InvalidField {
        index: usize,
        field: &'static str,
        reason: String,
    },
}

/// A validated candidate region.
#[derive(Debug, Clone, PartialEq)]
pub struct PdfSegment {
    pub page_number: u32,
    pub bounding_box: Rectangle,
    pub text_content: String,
    pub segment_type: TokenType,
    pub pdf_name: String,
}

impl PdfSegment {
    /// `self` is the upper fragment; its text comes first, not lower + upper.
    pub fn merged_with(&self, other: &PdfSegment) -> PdfSegment {
        PdfSegment {
            page_number: self.page_number,
            bounding_box: self.bounding_box.union(&other.bounding_box),
            text_content: format!("{}{}", self.text_content, other.text_content),
            segment_type: self.segment_type,
            pdf_name: self.pdf_name.clone(),
        }
    }
}

pub fn segments_from_boxes(
    pdf_features: &PdfFeatures,
    segment_boxes: &[SegmentBox],
) -> Result<Vec<PdfSegment>, SegmentBoxError> {
    segment_boxes
        .iter()
        .enumerate()
        .map(|(index, segment_box)| segment_from_box(pdf_features, index, segment_box))
        .collect()
}

fn segment_from_box(
    pdf_features: &PdfFeatures,
    index: usize,
    segment_box: &SegmentBox,
) -> Result<PdfSegment, SegmentBoxError> {
    let page_number = segment_box.page_number.ok_or(SegmentBoxError::MissingField {
        index,
        field: "page_number",
    })?;
    if pdf_features.page(page_number).is_none() {
        return Err(SegmentBoxError::InvalidField {
            index,
            field: "page_number",
            reason: format!(
                "page {page_number} not present in document with {} pages",
                pdf_features.pages.len()
            ),
        });
    }

    let left = required_coordinate(index, "left", segment_box.left)?;
    let top = required_coordinate(index, "top", segment_box.top)?;
    let width = required_extent(index, "width", segment_box.width)?;
    let height = required_extent(index, "height", segment_box.height)?;

    let raw_type = segment_box
        .segment_type
        .as_deref()
        .ok_or(SegmentBoxError::MissingField {
            index,
            field: "type",
        })?;
    let segment_type = TokenType::from_text(raw_type).unwrap_or_else(|| {
        debug!(index, segment_type = raw_type, "unknown segment type, treating as text");
        TokenType::Text
    });

    Ok(PdfSegment {
        page_number,
        bounding_box: Rectangle::from_width_height(left, top, width, height),
        text_content: segment_box.text.clone(),
        segment_type,
        pdf_name: pdf_features.file_name.clone(),
    })
}

fn required_coordinate(
    index: usize,
    field: &'static str,
    value: Option<f64>,
) -> Result<f64, SegmentBoxError> {
    let value = value.ok_or(SegmentBoxError::MissingField { index, field })?;
    if !value.is_finite() {
        return Err(SegmentBoxError::InvalidField {
            index,
            field,
            reason: format!("{value} is not finite"),
        });
    }
    Ok(value)
}

fn required_extent(
    index: usize,
    field: &'static str,
    value: Option<f64>,
) -> Result<f64, SegmentBoxError> {
    let value = required_coordinate(index, field, value)?;
    if value < 0.0 {
        return Err(SegmentBoxError::InvalidField {
            index,
            field,
            reason: format!("{value} is negative"),
        });
    }
    Ok(value)
}
