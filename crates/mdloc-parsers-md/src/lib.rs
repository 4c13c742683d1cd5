//! Markdown/MDX document handling: splitting a file into its `---` metadata
//! block and body, putting the two back together, and finding the documents
//! under the configured content roots.

use mdloc_core::DocRecord;
use std::borrow::Cow;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

const FENCE: &str = "---";

fn is_fence(line: &str) -> bool {
    line.trim_end() == FENCE
}

/// Split a document into `(header, body)`.
///
/// The header exists only when the very first line is `---` and a later line
/// is `---` as well; it is the text between them. The body is everything after
/// the closing line, trimmed. Without a header the whole text is the body.
/// CRLF line endings come back as LF, the same as a bundle reads them.
pub fn split_document(text: &str) -> (String, String) {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let text: Cow<'_, str> = if text.contains("\r\n") {
        Cow::Owned(text.replace("\r\n", "\n"))
    } else {
        Cow::Borrowed(text)
    };
    let text = text.as_ref();
    let mut lines = text.split_inclusive('\n');
    let Some(first) = lines.next() else {
        return (String::new(), String::new());
    };
    if !is_fence(first) {
        return (String::new(), text.trim().to_string());
    }

    let mut consumed = first.len();
    let mut header: Vec<&str> = Vec::new();
    for line in lines {
        consumed += line.len();
        if is_fence(line) {
            return (header.join("\n"), text[consumed..].trim().to_string());
        }
        header.push(line.trim_end_matches('\n'));
    }
    // Opening fence without a closing one: not a metadata block.
    (String::new(), text.trim().to_string())
}

/// Build final file text from a header and a body.
pub fn render_document(header: &str, body: &str) -> String {
    let header = header.trim();
    let body = body.trim();
    let mut out = String::with_capacity(header.len() + body.len() + 10);
    if !header.is_empty() {
        out.push_str(FENCE);
        out.push('\n');
        out.push_str(header);
        out.push('\n');
        out.push_str(FENCE);
        out.push('\n');
    }
    if !body.is_empty() {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(body);
    }
    out
}

pub fn render_record(record: &DocRecord) -> String {
    render_document(&record.header, &record.body)
}

/// Read-side counterpart of [`render_document`]: file text to a record.
pub fn record_from_text(source_path: impl Into<String>, text: &str) -> DocRecord {
    let (header, body) = split_document(text);
    DocRecord::new(source_path, header, body)
}

#[derive(Debug, Clone, Default)]
pub struct DocumentScan {
    /// Matching files in traversal order.
    pub files: Vec<PathBuf>,
    /// Configured content dirs that do not exist under the root.
    pub missing_dirs: Vec<PathBuf>,
    /// Configured content dirs that point outside the root, as given.
    pub outside_dirs: Vec<PathBuf>,
}

/// Normalize an extension filter entry: `.MDX` -> `mdx`.
pub fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_ascii_lowercase()
}

fn has_wanted_extension(path: &Path, wanted: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| wanted.iter().any(|w| w.eq_ignore_ascii_case(ext)))
}

/// `dir` joined onto `root`, or `None` when it would leave the root. An
/// absolute `dir` is accepted only when it lies under `root`.
fn content_dir_under(root: &Path, dir: &Path) -> Option<PathBuf> {
    let rel = if dir.is_absolute() {
        match dir.strip_prefix(root) {
            Ok(rel) => rel.to_path_buf(),
            Err(_) => {
                let canon = root.canonicalize().ok()?;
                dir.strip_prefix(&canon).ok()?.to_path_buf()
            }
        }
    } else {
        dir.to_path_buf()
    };
    let inside = rel
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    inside.then(|| root.join(rel))
}

/// Walk every content dir below `root` and collect files whose extension is
/// in `extensions`. Dirs are visited in the given order, entries inside a dir
/// by file name, so repeated runs see the same order. Dirs outside `root` are
/// skipped and reported, since their files have no project-relative path.
pub fn collect_documents<D: AsRef<Path>>(
    root: &Path,
    content_dirs: &[D],
    extensions: &[String],
) -> DocumentScan {
    let wanted: Vec<String> = extensions.iter().map(|e| normalize_extension(e)).collect();
    let mut scan = DocumentScan::default();

    for dir in content_dirs {
        let Some(dir) = content_dir_under(root, dir.as_ref()) else {
            tracing::warn!(event = "content_dir_outside_root", dir = %dir.as_ref().display());
            scan.outside_dirs.push(dir.as_ref().to_path_buf());
            continue;
        };
        if !dir.is_dir() {
            tracing::info!(event = "content_dir_missing", dir = %dir.display());
            scan.missing_dirs.push(dir);
            continue;
        }
        tracing::debug!(event = "content_dir_scan", dir = %dir.display());
        for entry in WalkDir::new(&dir).sort_by_file_name() {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    tracing::warn!(event = "walk_error", error = %e);
                    continue;
                }
            };
            if entry.file_type().is_file() && has_wanted_extension(entry.path(), &wanted) {
                scan.files.push(entry.into_path());
            }
        }
    }
    scan
}

/// Project-relative, `/`-separated form of `path`.
pub fn relative_source_path(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
