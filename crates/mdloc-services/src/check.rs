use crate::{util, Result};
use mdloc_bundle::{read_bundle, BundleTokens};
use mdloc_core::MdlocError;
use mdloc_domain::{BundleIssue, CheckReport, SCHEMA_VERSION};
use std::path::Path;

/// Parse a bundle and report its structural problems without writing
/// anything. Records whose path would be refused by `apply` are reported
/// as `unsafe-path` issues as well.
pub fn check_bundle(path: &Path, tokens: &BundleTokens) -> Result<CheckReport> {
    let parsed = read_bundle(path, tokens).map_err(|e| {
        tracing::error!(event = "bundle_read_failed", path = %path.display(), error = %e);
        MdlocError::MissingBundle(path.to_path_buf())
    })?;

    let mut issues: Vec<BundleIssue> = parsed.warnings.iter().map(util::to_issue).collect();
    for (idx, record) in parsed.records.iter().enumerate() {
        if util::safe_relative(&record.source_path).is_none() {
            issues.push(BundleIssue {
                section: idx + 1,
                kind: "unsafe-path".into(),
                path: Some(record.source_path.clone()),
                message: format!(
                    "record {} ({}): path is absolute or leaves the project root",
                    idx + 1,
                    record.source_path
                ),
            });
        }
    }

    let report = CheckReport {
        schema_version: SCHEMA_VERSION,
        bundle: path.display().to_string(),
        records: parsed.records.len(),
        with_header: parsed.records.iter().filter(|r| r.has_header()).count(),
        empty_body: parsed.records.iter().filter(|r| r.body.trim().is_empty()).count(),
        issues,
    };
    tracing::info!(
        event = "check_done",
        records = report.records,
        issues = report.issues.len()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdloc_bundle::render_bundle;
    use mdloc_core::DocRecord;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn clean_bundle_has_no_issues() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("b.txt");
        let tokens = BundleTokens::default();
        let records = vec![
            DocRecord::new("docs/a.md", "title: A", "A"),
            DocRecord::new("docs/b.md", "", ""),
        ];
        fs::write(&path, render_bundle(&records, &tokens)).unwrap();

        let report = check_bundle(&path, &tokens).unwrap();
        assert_eq!(report.records, 2);
        assert_eq!(report.with_header, 1);
        assert_eq!(report.empty_body, 1);
        assert!(report.issues.is_empty());
    }

    #[test]
    fn damaged_bundle_lists_issues() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("b.txt");
        fs::write(
            &path,
            "===FILE_INFO:../out.md===\n---CONTENT---\nx\n---END CONTENT---\n\n\
             ===FILE_SEPARATOR===\n\
             ===FILE_INFO:docs/a.md===\n---FRONTMATTER---\ntitle: A\n---CONTENT---\nA\n---END CONTENT---\n",
        )
        .unwrap();

        let report = check_bundle(&path, &BundleTokens::default()).unwrap();
        assert_eq!(report.records, 2);
        let kinds: Vec<_> = report.issues.iter().map(|i| i.kind.as_str()).collect();
        assert_eq!(kinds, vec!["unterminated-block", "unsafe-path"]);
    }

    #[test]
    fn missing_bundle_is_an_error() {
        let dir = tempdir().unwrap();
        let err = check_bundle(&dir.path().join("nope.txt"), &BundleTokens::default()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<MdlocError>(),
            Some(MdlocError::MissingBundle(_))
        ));
    }
}
