use serde::Serialize;
use thiserror::Error;

use crate::model::{PdfFeatures, PdfToken, SelectionRectangle, TocItem};
use crate::toc::markers::{
    FirstCharactersType, bullet_points_type, classify_first_characters, first_characters,
    inner_special_markers_count, previous_marker,
};
use crate::toc::modes::Modes;
use crate::toc::segments::PdfSegment;

const TOKEN_OVERLAP_PERCENTAGE: f64 = 50.0;
const CENTERED_TOLERANCE: f64 = 10.0;
const INDENTATION_STEP: f64 = 15.0;

#[derive(Debug, Clone, Error, PartialEq)]
#[error("candidate on page {page_number} at ({left}, {top}) overlaps no tokens: {text:?}")]
pub struct DegenerateRegion {
    pub page_number: u32,
    pub left: f64,
    pub top: f64,
    pub text: String,
}

impl DegenerateRegion {
    fn for_segment(pdf_segment: &PdfSegment) -> Self {
        Self {
            page_number: pdf_segment.page_number,
            left: pdf_segment.bounding_box.left,
            top: pdf_segment.bounding_box.top,
            text: pdf_segment.text_content.clone(),
        }
    }
}

/// Titles sharing this key sit at the same depth when no numbering links them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StyleKey {
    pub bold: bool,
    pub italics: bool,
    pub first_characters_type: FirstCharactersType,
    pub first_characters_special_markers_count: usize,
    pub bullet_points_type: usize,
    pub indentation: i32,
    pub half_point_font_size: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TitleFeatures {
    #[serde(skip)]
    pub pdf_segment: PdfSegment,
    #[serde(skip)]
    pub segment_tokens: Vec<PdfToken>,
    pub page_number: u32,
    pub text_content: String,
    pub first_characters: String,
    pub first_characters_type: FirstCharactersType,
    pub first_characters_special_markers_count: usize,
    pub bullet_points_type: usize,
    pub font_family: String,
    pub font_color: String,
    pub bold: f64,
    pub italics: f64,
    pub uppercase: bool,
    pub font_size: f64,
    pub line_height: f64,
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub text_centered: bool,
    pub is_left: bool,
    pub indentation: i32,
}

impl TitleFeatures {
    pub fn from_segment(
        pdf_segment: PdfSegment,
        pdf_features: &PdfFeatures,
        modes: &Modes,
    ) -> Result<Self, DegenerateRegion> {
        let Some(page) = pdf_features.page(pdf_segment.page_number) else {
            return Err(DegenerateRegion::for_segment(&pdf_segment));
        };

        let segment_tokens: Vec<PdfToken> = page
            .tokens
            .iter()
            .filter(|token| {
                token
                    .bounding_box
                    .intersection_percentage(&pdf_segment.bounding_box)
                    > TOKEN_OVERLAP_PERCENTAGE
            })
            .cloned()
            .collect();

        let Some(first_token) = segment_tokens.first() else {
            return Err(DegenerateRegion::for_segment(&pdf_segment));
        };

        let text_content = segment_tokens
            .iter()
            .map(|token| token.content.as_str())
            .collect::<Vec<&str>>()
            .join(" ");

        let first_characters = first_characters(&text_content).to_string();

        let token_count = segment_tokens.len() as f64;
        let bold = segment_tokens.iter().filter(|token| token.font.bold).count() as f64
            / token_count;
        let italics = segment_tokens
            .iter()
            .filter(|token| token.font.italics)
            .count() as f64
            / token_count;
        let font_size = segment_tokens
            .iter()
            .map(|token| token.font.font_size)
            .sum::<f64>()
            / token_count;

        let left = fold_tokens(&segment_tokens, f64::min, |token| token.bounding_box.left);
        let top = fold_tokens(&segment_tokens, f64::min, |token| token.bounding_box.top);
        let right = fold_tokens(&segment_tokens, f64::max, |token| token.bounding_box.right());
        let bottom = fold_tokens(&segment_tokens, f64::max, |token| {
            token.bounding_box.bottom()
        });

        let right_space = page.page_width - right;
        let text_centered = (left - right_space).abs() < CENTERED_TOLERANCE;
        let is_left = !text_centered && left < right_space;
        let indentation = if is_left {
            ((left - modes.left_space_mode) / INDENTATION_STEP)
                .floor()
                .max(0.0) as i32
        } else {
            -1
        };

        Ok(Self {
            page_number: pdf_segment.page_number,
            first_characters_type: classify_first_characters(&first_characters),
            first_characters_special_markers_count: inner_special_markers_count(
                &first_characters,
            ),
            bullet_points_type: bullet_points_type(&first_characters),
            font_family: first_token.font.font_id.clone(),
            font_color: first_token.font.color.clone(),
            line_height: first_token.font.font_size,
            uppercase: text_content.to_uppercase() == text_content,
            bold,
            italics,
            font_size,
            left,
            top,
            right,
            bottom,
            text_centered,
            is_left,
            indentation,
            first_characters,
            text_content,
            segment_tokens,
            pdf_segment,
        })
    }

    /// Rebuilds the features for the union of both regions.
    pub fn merged_with(
        &self,
        other: &TitleFeatures,
        pdf_features: &PdfFeatures,
        modes: &Modes,
    ) -> Result<Self, DegenerateRegion> {
        Self::from_segment(
            self.pdf_segment.merged_with(&other.pdf_segment),
            pdf_features,
            modes,
        )
    }

    pub fn features_to_merge(&self) -> (bool, bool) {
        (self.bold > 0.0, self.italics > 0.0)
    }

    pub fn style_key(&self) -> StyleKey {
        StyleKey {
            bold: self.bold > 0.0,
            italics: self.italics > 0.0,
            first_characters_type: self.first_characters_type,
            first_characters_special_markers_count: self.first_characters_special_markers_count,
            bullet_points_type: self.bullet_points_type,
            indentation: self.indentation,
            half_point_font_size: (self.font_size * 2.0).round() as i64,
        }
    }

    pub fn possible_previous_point(&self) -> Vec<String> {
        previous_marker(&self.first_characters)
    }

    pub fn vertically_overlaps(&self, other: &TitleFeatures) -> bool {
        self.top.max(other.top) < self.bottom.min(other.bottom)
    }

    pub fn to_toc_item(&self, indentation: u32) -> TocItem {
        TocItem {
            indentation,
            label: self.text_content.clone(),
            selection_rectangles: self
                .segment_tokens
                .iter()
                .map(|token| SelectionRectangle::from_pdf_token(token, self.page_number))
                .collect(),
        }
    }
}

fn fold_tokens(
    tokens: &[PdfToken],
    pick: fn(f64, f64) -> f64,
    value: impl Fn(&PdfToken) -> f64,
) -> f64 {
    tokens
        .iter()
        .map(value)
        .reduce(pick)
        .unwrap_or_default()
}
