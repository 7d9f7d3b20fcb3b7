use anyhow::Result;
use chrono::Utc;
use tracing::info;

use crate::cli::{ExtractArgs, SegmentSourceArgs};
use crate::commands::source::{LoadedInputs, load_inputs};
use crate::model::{SourceHashes, TocRunCounts, TocRunManifest, TocRunPaths};
use crate::toc::{TocExtraction, extract_table_of_contents};
use crate::util::{emit_json, now_utc_string, utc_compact_string, write_json_pretty};

const MANIFEST_VERSION: u32 = 1;

pub fn run(args: ExtractArgs) -> Result<()> {
    let started_ts = Utc::now();
    let run_id = format!("run-{}", utc_compact_string(started_ts));

    info!(document = %args.source.document.display(), run_id = %run_id, "starting toc extraction");

    let inputs = load_inputs(&args.source)?;
    let extraction = extract_table_of_contents(&inputs.pdf_features, &inputs.segment_boxes)?;

    emit_json(args.output.as_deref(), &extraction.toc)?;
    if let Some(path) = &args.output {
        info!(path = %path.display(), entries = extraction.toc.len(), "wrote table of contents");
    }

    if let Some(manifest_path) = &args.manifest_path {
        let manifest = build_manifest(&args, run_id, &inputs, &extraction);
        write_json_pretty(manifest_path, &manifest)?;
        info!(path = %manifest_path.display(), "wrote run manifest");
    }

    Ok(())
}

fn build_manifest(
    args: &ExtractArgs,
    run_id: String,
    inputs: &LoadedInputs,
    extraction: &TocExtraction,
) -> TocRunManifest {
    TocRunManifest {
        manifest_version: MANIFEST_VERSION,
        run_id,
        generated_at: now_utc_string(),
        command: render_extract_command(args),
        paths: TocRunPaths {
            document_path: args.source.document.display().to_string(),
            segments_source: inputs.segments_source.clone(),
            output_path: args.output.as_ref().map(|path| path.display().to_string()),
        },
        source_hashes: SourceHashes {
            document_sha256: inputs.document_sha256.clone(),
            pdf_sha256: inputs.pdf_sha256.clone(),
        },
        left_space_mode: extraction.modes.left_space_mode,
        font_size_mode: extraction.modes.font_size_mode,
        counts: TocRunCounts {
            page_count: inputs.pdf_features.pages.len(),
            token_count: inputs.pdf_features.token_count(),
            candidate_count: extraction.candidate_count,
            title_candidate_count: extraction.title_candidate_count,
            degenerate_skipped_count: extraction.degenerate.len(),
            merge_count: extraction.merge_count,
            entry_count: extraction.toc.len(),
            max_indentation: extraction
                .toc
                .iter()
                .map(|item| item.indentation)
                .max()
                .unwrap_or(0),
        },
        warnings: extraction.warnings(),
    }
}

fn render_extract_command(args: &ExtractArgs) -> String {
    let mut command = vec!["pdf-toc".to_string(), "extract".to_string()];
    push_source_flags(&mut command, &args.source);

    if let Some(path) = &args.output {
        command.push("--output".to_string());
        command.push(path.display().to_string());
    }
    if let Some(path) = &args.manifest_path {
        command.push("--manifest-path".to_string());
        command.push(path.display().to_string());
    }

    command.join(" ")
}

fn push_source_flags(command: &mut Vec<String>, source: &SegmentSourceArgs) {
    command.push("--document".to_string());
    command.push(source.document.display().to_string());

    if let Some(path) = &source.segments {
        command.push("--segments".to_string());
        command.push(path.display().to_string());
    }
    if let Some(path) = &source.pdf {
        command.push("--pdf".to_string());
        command.push(path.display().to_string());
    }
    if source.segments.is_none() {
        if let Some(url) = &source.layout_url {
            command.push("--layout-url".to_string());
            command.push(url.clone());
        }
        if source.fast {
            command.push("--fast".to_string());
        }
        if let Some(secs) = source.layout_timeout_secs {
            command.push("--layout-timeout-secs".to_string());
            command.push(secs.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use serde_json::{Value, json};

    use super::*;

    fn source_args(document: PathBuf, segments: Option<PathBuf>) -> SegmentSourceArgs {
        SegmentSourceArgs {
            document,
            segments,
            pdf: None,
            layout_url: Some("http://layout:5060".to_string()),
            fast: true,
            layout_timeout_secs: None,
        }
    }

    #[test]
    fn render_extract_command_skips_backend_flags_for_segment_files() {
        let args = ExtractArgs {
            source: source_args(
                PathBuf::from("doc.json"),
                Some(PathBuf::from("boxes.json")),
            ),
            output: Some(PathBuf::from("toc.json")),
            manifest_path: None,
        };

        assert_eq!(
            render_extract_command(&args),
            "pdf-toc extract --document doc.json --segments boxes.json --output toc.json"
        );
    }

    #[test]
    fn run_writes_toc_and_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let document_path = dir.path().join("doc.json");
        let segments_path = dir.path().join("boxes.json");
        let output_path = dir.path().join("out").join("toc.json");
        let manifest_path = dir.path().join("out").join("manifest.json");

        let document = json!({
            "file_name": "report.pdf",
            "pages": [{
                "page_number": 1,
                "page_width": 600.0,
                "page_height": 800.0,
                "tokens": [
                    {"content": "1.", "font": {"font_id": "F1", "bold": true, "font_size": 14.0},
                     "bounding_box": {"left": 72.0, "top": 100.0, "width": 12.0, "height": 14.0}},
                    {"content": "Introduction", "font": {"font_id": "F1", "bold": true, "font_size": 14.0},
                     "bounding_box": {"left": 88.0, "top": 100.0, "width": 90.0, "height": 14.0}},
                    {"content": "Body", "font": {"font_id": "F2", "font_size": 10.0},
                     "bounding_box": {"left": 72.0, "top": 140.0, "width": 30.0, "height": 10.0}},
                    {"content": "2.", "font": {"font_id": "F1", "bold": true, "font_size": 14.0},
                     "bounding_box": {"left": 72.0, "top": 300.0, "width": 12.0, "height": 14.0}},
                    {"content": "Methods", "font": {"font_id": "F1", "bold": true, "font_size": 14.0},
                     "bounding_box": {"left": 88.0, "top": 300.0, "width": 60.0, "height": 14.0}}
                ]
            }]
        });
        let segments = json!([
            {"page_number": 1, "left": 70.0, "top": 98.0, "width": 120.0, "height": 18.0,
             "type": "Section header", "text": "1. Introduction"},
            {"page_number": 1, "left": 70.0, "top": 138.0, "width": 40.0, "height": 14.0,
             "type": "Text", "text": "Body"},
            {"page_number": 1, "left": 70.0, "top": 298.0, "width": 90.0, "height": 18.0,
             "type": "Section header", "text": "2. Methods"}
        ]);
        fs::write(&document_path, serde_json::to_vec(&document).unwrap()).unwrap();
        fs::write(&segments_path, serde_json::to_vec(&segments).unwrap()).unwrap();

        let args = ExtractArgs {
            source: source_args(document_path, Some(segments_path)),
            output: Some(output_path.clone()),
            manifest_path: Some(manifest_path.clone()),
        };
        run(args).unwrap();

        let toc: Value = serde_json::from_slice(&fs::read(&output_path).unwrap()).unwrap();
        assert_eq!(toc[0]["label"], "1. Introduction");
        assert_eq!(toc[0]["indentation"], 0);
        assert_eq!(toc[0]["selectionRectangles"].as_array().unwrap().len(), 2);
        assert_eq!(toc[1]["label"], "2. Methods");
        assert_eq!(toc[1]["indentation"], 0);

        let manifest: Value = serde_json::from_slice(&fs::read(&manifest_path).unwrap()).unwrap();
        assert_eq!(manifest["counts"]["candidate_count"], 3);
        assert_eq!(manifest["counts"]["title_candidate_count"], 2);
        assert_eq!(manifest["counts"]["entry_count"], 2);
        assert_eq!(manifest["left_space_mode"], 72.0);
        assert_eq!(manifest["source_hashes"]["pdf_sha256"], Value::Null);
    }
}
