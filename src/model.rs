use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rectangle {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rectangle {
    pub fn from_width_height(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn from_coordinates(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            width: right - left,
            height: bottom - top,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// Share of this rectangle's area covered by `other`, in percent.
    pub fn intersection_percentage(&self, other: &Rectangle) -> f64 {
        let area = self.area();
        if area <= 0.0 {
            return 0.0;
        }

        let width = self.right().min(other.right()) - self.left.max(other.left);
        let height = self.bottom().min(other.bottom()) - self.top.max(other.top);
        if width <= 0.0 || height <= 0.0 {
            return 0.0;
        }

        width * height / area * 100.0
    }

    pub fn union(&self, other: &Rectangle) -> Self {
        Self::from_coordinates(
            self.left.min(other.left),
            self.top.min(other.top),
            self.right().max(other.right()),
            self.bottom().max(other.bottom()),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdfFont {
    pub font_id: String,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italics: bool,
    pub font_size: f64,
    #[serde(default = "default_font_color")]
    pub color: String,
}

fn default_font_color() -> String {
    "#000000".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdfToken {
    #[serde(default)]
    pub id: String,
    pub content: String,
    pub font: PdfFont,
    pub bounding_box: Rectangle,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PdfPage {
    pub page_number: u32,
    pub page_width: f64,
    pub page_height: f64,
    #[serde(default)]
    pub tokens: Vec<PdfToken>,
}

/// Tokenized document produced by the external document-features extractor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PdfFeatures {
    #[serde(default)]
    pub file_name: String,
    pub pages: Vec<PdfPage>,
}

impl PdfFeatures {
    pub fn page(&self, page_number: u32) -> Option<&PdfPage> {
        self.pages
            .iter()
            .find(|page| page.page_number == page_number)
    }

    pub fn loop_tokens(&self) -> impl Iterator<Item = (&PdfPage, &PdfToken)> {
        self.pages
            .iter()
            .flat_map(|page| page.tokens.iter().map(move |token| (page, token)))
    }

    pub fn token_count(&self) -> usize {
        self.pages.iter().map(|page| page.tokens.len()).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    Formula,
    Footnote,
    ListItem,
    Table,
    Picture,
    Title,
    Text,
    PageHeader,
    SectionHeader,
    Caption,
    PageFooter,
}

impl TokenType {
    pub fn from_text(text: &str) -> Option<Self> {
        let normalized: String = text
            .trim()
            .chars()
            .map(|ch| match ch {
                ' ' | '-' => '_',
                other => other.to_ascii_lowercase(),
            })
            .collect();

        let token_type = match normalized.as_str() {
            "formula" => Self::Formula,
            "footnote" => Self::Footnote,
            "list_item" => Self::ListItem,
            "table" => Self::Table,
            "picture" => Self::Picture,
            "title" => Self::Title,
            "text" => Self::Text,
            "page_header" => Self::PageHeader,
            "section_header" => Self::SectionHeader,
            "caption" => Self::Caption,
            "page_footer" => Self::PageFooter,
            _ => return None,
        };

        Some(token_type)
    }

    pub fn is_title(self) -> bool {
        matches!(self, Self::Title | Self::SectionHeader)
    }
}

/// Candidate box as delivered by the layout backend, before validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SegmentBox {
    pub page_number: Option<u32>,
    pub left: Option<f64>,
    pub top: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    #[serde(rename = "type")]
    pub segment_type: Option<String>,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionRectangle {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub page_number: u32,
}

impl SelectionRectangle {
    pub fn from_pdf_token(token: &PdfToken, page_number: u32) -> Self {
        Self {
            left: token.bounding_box.left,
            top: token.bounding_box.top,
            width: token.bounding_box.width,
            height: token.bounding_box.height,
            page_number,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TocItem {
    pub indentation: u32,
    pub label: String,
    #[serde(rename = "selectionRectangles")]
    pub selection_rectangles: Vec<SelectionRectangle>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TocRunPaths {
    pub document_path: String,
    pub segments_source: String,
    pub output_path: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SourceHashes {
    pub document_sha256: String,
    pub pdf_sha256: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TocRunCounts {
    pub page_count: usize,
    pub token_count: usize,
    pub candidate_count: usize,
    pub title_candidate_count: usize,
    pub degenerate_skipped_count: usize,
    pub merge_count: usize,
    pub entry_count: usize,
    pub max_indentation: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct TocRunManifest {
    pub manifest_version: u32,
    pub run_id: String,
    pub generated_at: String,
    pub command: String,
    pub paths: TocRunPaths,
    pub source_hashes: SourceHashes,
    pub left_space_mode: f64,
    pub font_size_mode: f64,
    pub counts: TocRunCounts,
    pub warnings: Vec<String>,
}
