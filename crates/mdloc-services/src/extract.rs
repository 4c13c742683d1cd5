use crate::{settings::ExtractSettings, util, Result};
use mdloc_core::{DocRecord, MdlocError};
use mdloc_domain::{ExtractSummary, SkippedFile, SCHEMA_VERSION};
use mdloc_parsers_md::{collect_documents, record_from_text, relative_source_path};

/// Records collected from the content tree, in traversal order.
#[derive(Debug, Clone, Default)]
pub struct Collected {
    pub records: Vec<DocRecord>,
    pub skipped: Vec<SkippedFile>,
    pub missing_dirs: Vec<String>,
    pub outside_dirs: Vec<String>,
}

/// Read every eligible document. Unreadable files are logged and skipped.
pub fn collect_records(settings: &ExtractSettings) -> Collected {
    let scan = collect_documents(&settings.root, &settings.content_dirs, &settings.extensions);
    let mut out = Collected {
        missing_dirs: scan
            .missing_dirs
            .iter()
            .map(|d| relative_source_path(&settings.root, d))
            .collect(),
        outside_dirs: scan
            .outside_dirs
            .iter()
            .map(|d| d.display().to_string())
            .collect(),
        ..Default::default()
    };

    for path in scan.files {
        let rel = relative_source_path(&settings.root, &path);
        match std::fs::read_to_string(&path) {
            Ok(text) => {
                tracing::info!(event = "extracted", path = %rel);
                out.records.push(record_from_text(rel, &text));
            }
            Err(e) => {
                tracing::error!(event = "extract_read_failed", path = %rel, error = %e);
                out.skipped.push(SkippedFile {
                    path: rel,
                    error: e.to_string(),
                });
            }
        }
    }
    out
}

/// Extract all documents into one bundle at `settings.out`, replacing any
/// previous bundle. Source files are only read.
pub fn extract(settings: &ExtractSettings) -> Result<ExtractSummary> {
    tracing::info!(
        event = "extract_start",
        root = %settings.root.display(),
        dirs = ?settings.content_dirs,
        extensions = ?settings.extensions
    );
    let collected = collect_records(settings);
    let text = mdloc_bundle::render_bundle(&collected.records, &settings.tokens);
    util::write_atomic(&settings.out, text.as_bytes())
        .map_err(|e| MdlocError::io(&settings.out, e))?;

    tracing::info!(
        event = "extract_done",
        files = collected.records.len(),
        skipped = collected.skipped.len(),
        out = %settings.out.display(),
        bytes = text.len()
    );
    Ok(ExtractSummary {
        schema_version: SCHEMA_VERSION,
        out: settings.out.display().to_string(),
        files: collected.records.len(),
        bytes: text.len(),
        skipped: collected.skipped,
        missing_dirs: collected.missing_dirs,
        outside_dirs: collected.outside_dirs,
    })
}
