use mdloc_bundle::BundleWarning;
use mdloc_domain::BundleIssue;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Write `bytes` to `path` through a temp file in the same directory, so a
/// failed write never leaves a truncated destination behind.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let parent = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(p) => p,
        None => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;
    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(bytes)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// `docs/a.md` -> `docs/a.md.backup`
pub fn backup_path(path: &Path) -> PathBuf {
    let mut s = path.as_os_str().to_os_string();
    s.push(".backup");
    PathBuf::from(s)
}

/// Normalize a bundle path to `/`-separated segments, rejecting anything
/// that could point outside the project root.
pub fn safe_relative(source_path: &str) -> Option<String> {
    let normalized = source_path.trim().replace('\\', "/");
    if normalized.starts_with('/') || Path::new(&normalized).is_absolute() {
        return None;
    }
    let mut segments = Vec::new();
    for seg in normalized.split('/') {
        match seg {
            "" | "." => continue,
            ".." => return None,
            s if s.contains(':') => return None,
            s => segments.push(s),
        }
    }
    if segments.is_empty() {
        return None;
    }
    Some(segments.join("/"))
}

pub fn to_issue(w: &BundleWarning) -> BundleIssue {
    BundleIssue {
        section: w.section(),
        kind: w.kind().to_string(),
        path: w.path().map(str::to_string),
        message: w.to_string(),
    }
}
