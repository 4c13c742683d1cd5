use crate::OutputFormat;
use mdloc_services::{ApplySettings, Placement};
use std::path::PathBuf;

pub fn run_check(
    root: Option<PathBuf>,
    bundle: Option<PathBuf>,
    format: OutputFormat,
) -> color_eyre::Result<()> {
    tracing::debug!(event = "check_args", root = ?root, bundle = ?bundle, format = ?format);

    let cfg = super::load_config(root)?;
    let mut settings = ApplySettings::from_config(&cfg, Placement::InPlace)?;
    if let Some(bundle) = bundle {
        settings = settings.with_bundle(bundle);
    }
    let report = mdloc_services::check_bundle(&settings.bundle, &settings.tokens)?;

    if format == OutputFormat::Json {
        return crate::ui::print_json(&report);
    }
    for issue in &report.issues {
        ui_warn!("[{}] {}", issue.kind, issue.message);
    }
    ui_ok!(
        "{}: {} record(s), {} with frontmatter, {} with an empty body, {} issue(s)",
        report.bundle,
        report.records,
        report.with_header,
        report.empty_body,
        report.issues.len()
    );
    Ok(())
}
