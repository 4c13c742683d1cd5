use crate::{confirm::Confirm, settings::ApplySettings, settings::LocaleLayout, util, Result};
use mdloc_bundle::{read_bundle, BundleTokens, ParsedBundle};
use mdloc_core::{DocRecord, MdlocError};
use mdloc_domain::{ApplyFileStat, ApplyPlan, ApplySummary, PlannedWrite, SCHEMA_VERSION};
use mdloc_parsers_md::render_record;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

static CATEGORY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:(?P<cat>docs|blog)|src/pages)/(?P<rest>.+)$").unwrap());

/// Where applied documents are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// Back onto `root/<source_path>`, the file the record was extracted from.
    InPlace,
    /// Into a locale tree next to the originals.
    LocaleTree(LocaleLayout),
}

impl Placement {
    pub fn mode(&self) -> String {
        match self {
            Placement::InPlace => "in-place".to_string(),
            Placement::LocaleTree(layout) => format!("locale:{}", layout.code),
        }
    }
}

impl LocaleLayout {
    /// Project-relative destination of a normalized source path.
    ///
    /// `docs/<rest>` goes to the docs plugin's `current` version, `blog/<rest>`
    /// to the blog plugin, everything else to the pages plugin (minus a leading
    /// `src/pages/`).
    pub fn destination_for(&self, rel: &str) -> PathBuf {
        let base = PathBuf::from(&self.i18n_dir).join(&self.code);
        let Some(caps) = CATEGORY_RE.captures(rel) else {
            return base.join(&self.pages_plugin_dir).join(rel);
        };
        let rest = caps.name("rest").map(|m| m.as_str()).unwrap_or_default();
        match caps.name("cat").map(|m| m.as_str()) {
            Some("docs") => base.join(&self.docs_plugin_dir).join("current").join(rest),
            Some("blog") => base.join(&self.blog_plugin_dir).join(rest),
            _ => base.join(&self.pages_plugin_dir).join(rest),
        }
    }
}

pub fn resolve_destination(
    root: &Path,
    placement: &Placement,
    source_path: &str,
) -> std::result::Result<PathBuf, MdlocError> {
    let rel = util::safe_relative(source_path)
        .ok_or_else(|| MdlocError::UnsafePath(source_path.to_string()))?;
    Ok(match placement {
        Placement::InPlace => root.join(rel),
        Placement::LocaleTree(layout) => root.join(layout.destination_for(&rel)),
    })
}

/// Read and parse the bundle. A missing bundle or one without a single
/// usable record aborts before anything is written.
pub fn load_bundle(path: &Path, tokens: &BundleTokens) -> Result<ParsedBundle> {
    let parsed = match read_bundle(path, tokens) {
        Ok(p) => p,
        Err(e) => {
            tracing::error!(event = "bundle_read_failed", path = %path.display(), error = %e);
            return Err(MdlocError::MissingBundle(path.to_path_buf()).into());
        }
    };
    for w in &parsed.warnings {
        tracing::warn!(event = "bundle_warning", kind = w.kind(), section = w.section(), "{w}");
    }
    if parsed.records.is_empty() {
        return Err(MdlocError::EmptyBundle(path.to_path_buf()).into());
    }
    tracing::info!(
        event = "bundle_parsed",
        path = %path.display(),
        records = parsed.records.len(),
        warnings = parsed.warnings.len(),
        dropped = parsed.dropped_sections()
    );
    Ok(parsed)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileStatus {
    Created,
    Updated,
    Unchanged,
    Failed,
}

impl FileStatus {
    fn as_str(self) -> &'static str {
        match self {
            FileStatus::Created => "created",
            FileStatus::Updated => "updated",
            FileStatus::Unchanged => "unchanged",
            FileStatus::Failed => "failed",
        }
    }
}

fn write_record(
    record: &DocRecord,
    dest: &Path,
    settings: &ApplySettings,
) -> std::result::Result<(FileStatus, Option<PathBuf>), MdlocError> {
    let content = render_record(record);
    let existed = dest.exists();

    if settings.incremental && existed {
        if let Ok(old) = std::fs::read(dest) {
            if old == content.as_bytes() {
                return Ok((FileStatus::Unchanged, None));
            }
        }
    }

    let mut backup = None;
    if existed && settings.backs_up() {
        let bak = util::backup_path(dest);
        std::fs::copy(dest, &bak).map_err(|e| MdlocError::io(&bak, e))?;
        tracing::info!(event = "backup", from = %dest.display(), to = %bak.display());
        backup = Some(bak);
    }

    util::write_atomic(dest, content.as_bytes()).map_err(|e| MdlocError::io(dest, e))?;
    let status = if existed {
        FileStatus::Updated
    } else {
        FileStatus::Created
    };
    Ok((status, backup))
}

fn apply_record(record: &DocRecord, settings: &ApplySettings) -> (FileStatus, ApplyFileStat) {
    let failed = |dest: Option<&Path>, e: &MdlocError| {
        tracing::error!(event = "apply_failed", path = %record.source_path, error = %e);
        let stat = ApplyFileStat {
            source: record.source_path.clone(),
            dest: dest.map(|d| d.display().to_string()).unwrap_or_default(),
            status: FileStatus::Failed.as_str().into(),
            backup: None,
            error: Some(e.to_string()),
        };
        (FileStatus::Failed, stat)
    };

    let dest = match resolve_destination(&settings.root, &settings.placement, &record.source_path) {
        Ok(d) => d,
        Err(e) => return failed(None, &e),
    };
    match write_record(record, &dest, settings) {
        Ok((status, backup)) => {
            tracing::info!(event = "applied", path = %dest.display(), status = status.as_str());
            let stat = ApplyFileStat {
                source: record.source_path.clone(),
                dest: dest.display().to_string(),
                status: status.as_str().into(),
                backup: backup.map(|b| b.display().to_string()),
                error: None,
            };
            (status, stat)
        }
        Err(e) => failed(Some(dest.as_path()), &e),
    }
}

/// Write every record independently. A failing record is logged and counted;
/// the rest of the batch still runs. `progress` gets `(current, total, stat)`.
pub fn apply_records(
    parsed: &ParsedBundle,
    settings: &ApplySettings,
    mut progress: impl FnMut(usize, usize, &ApplyFileStat),
) -> ApplySummary {
    let total = parsed.records.len();
    let mut summary = ApplySummary {
        schema_version: SCHEMA_VERSION,
        mode: settings.placement.mode(),
        created: 0,
        updated: 0,
        unchanged: 0,
        succeeded: 0,
        failed: 0,
        total,
        files: Vec::with_capacity(total),
        warnings: parsed.warnings.iter().map(util::to_issue).collect(),
    };

    for (idx, record) in parsed.records.iter().enumerate() {
        let (status, stat) = apply_record(record, settings);
        match status {
            FileStatus::Created => summary.created += 1,
            FileStatus::Updated => summary.updated += 1,
            FileStatus::Unchanged => summary.unchanged += 1,
            FileStatus::Failed => summary.failed += 1,
        }
        progress(idx + 1, total, &stat);
        summary.files.push(stat);
    }
    summary.succeeded = summary.created + summary.updated + summary.unchanged;

    tracing::info!(
        event = "apply_done",
        succeeded = summary.succeeded,
        failed = summary.failed,
        total = summary.total
    );
    summary
}

/// Destinations the bundle would be written to, without touching anything.
pub fn plan_apply(parsed: &ParsedBundle, settings: &ApplySettings) -> ApplyPlan {
    let files = parsed
        .records
        .iter()
        .map(|r| match resolve_destination(&settings.root, &settings.placement, &r.source_path) {
            Ok(dest) => PlannedWrite {
                source: r.source_path.clone(),
                exists: dest.exists(),
                dest: Some(dest.display().to_string()),
                error: None,
            },
            Err(e) => PlannedWrite {
                source: r.source_path.clone(),
                dest: None,
                exists: false,
                error: Some(e.to_string()),
            },
        })
        .collect();
    ApplyPlan {
        schema_version: SCHEMA_VERSION,
        mode: settings.placement.mode(),
        files,
        warnings: parsed.warnings.iter().map(util::to_issue).collect(),
    }
}

fn confirmation_prompt(records: usize, settings: &ApplySettings) -> String {
    match &settings.placement {
        Placement::InPlace if settings.backup => format!(
            "Apply {records} translated document(s) over the original files? \
             Existing files are backed up as <file>.backup (y/N): "
        ),
        Placement::InPlace => format!(
            "Apply {records} translated document(s) over the original files WITHOUT backups? (y/N): "
        ),
        Placement::LocaleTree(layout) => format!(
            "Write {records} translated document(s) into {}/{}? (y/N): ",
            layout.i18n_dir, layout.code
        ),
    }
}

#[derive(Debug, Clone)]
pub enum ApplyOutcome {
    /// Confirmation refused; nothing was written.
    Declined { records: usize },
    Planned(ApplyPlan),
    Applied(ApplySummary),
}

/// Full apply phase: parse the bundle, ask for confirmation, then write.
/// With `dry_run` the plan is returned without prompting.
pub fn run_apply(
    settings: &ApplySettings,
    dry_run: bool,
    confirm: &mut dyn Confirm,
    progress: impl FnMut(usize, usize, &ApplyFileStat),
) -> Result<ApplyOutcome> {
    let parsed = load_bundle(&settings.bundle, &settings.tokens)?;
    if dry_run {
        return Ok(ApplyOutcome::Planned(plan_apply(&parsed, settings)));
    }

    let prompt = confirmation_prompt(parsed.records.len(), settings);
    if !confirm.confirm(&prompt)? {
        tracing::info!(event = "apply_declined", records = parsed.records.len());
        return Ok(ApplyOutcome::Declined {
            records: parsed.records.len(),
        });
    }
    Ok(ApplyOutcome::Applied(apply_records(&parsed, settings, progress)))
}
