use crate::OutputFormat;
use mdloc_services::ExtractSettings;
use std::path::PathBuf;

pub fn run_extract(
    root: Option<PathBuf>,
    out: Option<PathBuf>,
    dirs: Vec<String>,
    format: OutputFormat,
) -> color_eyre::Result<()> {
    tracing::debug!(event = "extract_args", root = ?root, out = ?out, dirs = ?dirs, format = ?format);

    let cfg = super::load_config(root)?;
    let mut settings = ExtractSettings::from_config(&cfg)?;
    if let Some(out) = out {
        settings = settings.with_out(out);
    }
    if !dirs.is_empty() {
        settings.content_dirs = dirs;
    }

    let summary = mdloc_services::extract(&settings)?;

    if format == OutputFormat::Json {
        return crate::ui::print_json(&summary);
    }
    for dir in &summary.missing_dirs {
        ui_warn!("Content directory not found, skipped: {dir}");
    }
    for dir in &summary.outside_dirs {
        ui_warn!("Content directory is outside the project root, skipped: {dir}");
    }
    for s in &summary.skipped {
        ui_warn!("Could not read {}: {}", s.path, s.error);
    }
    ui_ok!(
        "Extracted {} document(s) into {} ({:.1} KB)",
        summary.files,
        summary.out,
        summary.bytes as f64 / 1024.0
    );
    Ok(())
}
