use crate::OutputFormat;
use mdloc_domain::{ApplyFileStat, BundleIssue};
use mdloc_services::{
    ApplyOutcome, ApplySettings, AssumeYes, Confirm, LocaleLayout, Placement, PromptConfirm,
};
use owo_colors::OwoColorize;
use std::path::PathBuf;

fn print_warnings(warnings: &[BundleIssue]) {
    for w in warnings {
        ui_warn!("[{}] {}", w.kind, w.message);
    }
}

fn print_progress(current: usize, total: usize, stat: &ApplyFileStat, use_color: bool) {
    if let Some(err) = &stat.error {
        ui_err!("[{current}/{total}] {}: {err}", stat.source);
        return;
    }
    let status = if use_color {
        match stat.status.as_str() {
            "created" => stat.status.green().to_string(),
            "updated" => stat.status.cyan().to_string(),
            _ => stat.status.dimmed().to_string(),
        }
    } else {
        stat.status.clone()
    };
    ui_out!("[{current}/{total}] {status} {}", stat.dest);
}

#[allow(clippy::too_many_arguments)]
pub fn run_apply(
    root: Option<PathBuf>,
    bundle: Option<PathBuf>,
    locale: Option<String>,
    no_backup: bool,
    incremental: bool,
    dry_run: bool,
    yes: bool,
    format: OutputFormat,
    use_color: bool,
) -> color_eyre::Result<()> {
    tracing::debug!(
        event = "apply_args",
        root = ?root,
        bundle = ?bundle,
        locale = ?locale,
        no_backup = no_backup,
        incremental = incremental,
        dry_run = dry_run,
        yes = yes,
        format = ?format
    );

    let cfg = super::load_config(root)?;
    let placement = match locale.as_deref() {
        Some(code) => Placement::LocaleTree(LocaleLayout::from_config(&cfg, Some(code))),
        None => Placement::InPlace,
    };
    let mut settings = ApplySettings::from_config(&cfg, placement)?;
    if let Some(bundle) = bundle {
        settings = settings.with_bundle(bundle);
    }
    if no_backup {
        settings.backup = false;
    }
    if incremental {
        settings.incremental = true;
    }

    let mut confirm: Box<dyn Confirm> = if yes {
        Box::new(AssumeYes)
    } else {
        Box::new(PromptConfirm::stdio())
    };
    let text = format == OutputFormat::Text;
    let outcome = mdloc_services::run_apply(&settings, dry_run, confirm.as_mut(), |i, n, stat| {
        if text {
            print_progress(i, n, stat, use_color);
        }
    })?;

    match outcome {
        ApplyOutcome::Declined { records } => {
            if text {
                ui_info!("Cancelled; {records} document(s) left untouched");
            } else {
                crate::ui::print_json(&serde_json::json!({
                    "mode": settings.placement.mode(),
                    "declined": true,
                    "records": records,
                }))?;
            }
        }
        ApplyOutcome::Planned(plan) => {
            if !text {
                return crate::ui::print_json(&plan);
            }
            print_warnings(&plan.warnings);
            for f in &plan.files {
                match (&f.dest, &f.error) {
                    (Some(dest), _) => {
                        let note = if f.exists { "overwrite" } else { "create" };
                        ui_out!("DRY-RUN: {} -> {dest} ({note})", f.source);
                    }
                    (None, Some(err)) => ui_err!("DRY-RUN: {}: {err}", f.source),
                    (None, None) => {}
                }
            }
            ui_info!("Dry run: {} document(s), nothing written", plan.files.len());
        }
        ApplyOutcome::Applied(summary) => {
            if !text {
                return crate::ui::print_json(&summary);
            }
            print_warnings(&summary.warnings);
            let line = format!(
                "Applied {}/{} document(s): {} created, {} updated, {} unchanged, {} failed",
                summary.succeeded,
                summary.total,
                summary.created,
                summary.updated,
                summary.unchanged,
                summary.failed
            );
            if summary.failed > 0 {
                ui_warn!("{line}");
            } else {
                ui_ok!("{line}");
            }
        }
    }
    Ok(())
}
