use std::path::Path;
use std::time::Duration;

use anyhow::{Result, bail};
use tracing::info;

use crate::cli::SegmentSourceArgs;
use crate::layout_client::LayoutClient;
use crate::model::{PdfFeatures, SegmentBox};
use crate::util::{parse_json_slice, read_file_bytes, sha256_hex};

pub struct LoadedInputs {
    pub pdf_features: PdfFeatures,
    pub document_sha256: String,
    pub pdf_sha256: Option<String>,
    pub segment_boxes: Vec<SegmentBox>,
    pub segments_source: String,
}

pub fn load_inputs(args: &SegmentSourceArgs) -> Result<LoadedInputs> {
    let document_bytes = read_file_bytes(&args.document)?;
    let document_sha256 = sha256_hex(&document_bytes);
    let pdf_features: PdfFeatures = parse_json_slice(&document_bytes, &args.document)?;

    info!(
        path = %args.document.display(),
        pages = pdf_features.pages.len(),
        tokens = pdf_features.token_count(),
        "loaded tokenized document"
    );

    let pdf_bytes = args
        .pdf
        .as_deref()
        .map(read_file_bytes)
        .transpose()?;
    let pdf_sha256 = pdf_bytes.as_deref().map(sha256_hex);

    let (segment_boxes, segments_source) = match (&args.segments, &args.layout_url) {
        (Some(segments_path), _) => (
            load_segment_boxes(segments_path)?,
            segments_path.display().to_string(),
        ),
        (None, Some(layout_url)) => {
            let (Some(pdf_path), Some(pdf_bytes)) = (args.pdf.as_deref(), pdf_bytes) else {
                bail!("--pdf is required when requesting candidates from the layout backend");
            };
            let client =
                LayoutClient::new(layout_url, args.layout_timeout_secs.map(Duration::from_secs))?;
            let boxes = client.segment_boxes(pdf_path, pdf_bytes, args.fast)?;
            (boxes, client.endpoint(args.fast))
        }
        (None, None) => {
            bail!("either --segments or --layout-url (or PDF_TOC_LAYOUT_URL) must be provided")
        }
    };

    Ok(LoadedInputs {
        pdf_features,
        document_sha256,
        pdf_sha256,
        segment_boxes,
        segments_source,
    })
}

fn load_segment_boxes(path: &Path) -> Result<Vec<SegmentBox>> {
    let raw = read_file_bytes(path)?;
    let boxes: Vec<SegmentBox> = parse_json_slice(&raw, path)?;
    info!(path = %path.display(), candidates = boxes.len(), "loaded candidate boxes");
    Ok(boxes)
}
