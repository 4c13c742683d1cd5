use crate::{extract::collect_records, settings::ExtractSettings};
use mdloc_domain::{ScanDoc, SCHEMA_VERSION};

/// What `extract` would put into the bundle, without writing anything.
pub fn scan_documents(settings: &ExtractSettings) -> Vec<ScanDoc> {
    collect_records(settings)
        .records
        .into_iter()
        .map(|r| ScanDoc {
            schema_version: SCHEMA_VERSION,
            has_header: r.has_header(),
            header_lines: if r.has_header() { r.header.lines().count() } else { 0 },
            body_chars: r.body.chars().count(),
            path: r.source_path,
        })
        .collect()
}
