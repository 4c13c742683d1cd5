use std::fs;

pub fn run_schema(out_dir: std::path::PathBuf) -> color_eyre::Result<()> {
    fs::create_dir_all(&out_dir)?;
    macro_rules! dump {
        ($ty:ty, $name:literal) => {{
            let schema = schemars::schema_for!($ty);
            let path = out_dir.join($name);
            let f = std::fs::File::create(&path)?;
            serde_json::to_writer_pretty(f, &schema)?;
            tracing::debug!(event = "schema_written", path = %path.display());
        }};
    }
    dump!(mdloc_domain::ScanDoc, "scan_doc.schema.json");
    dump!(mdloc_domain::ExtractSummary, "extract_summary.schema.json");
    dump!(mdloc_domain::ApplySummary, "apply_summary.schema.json");
    dump!(mdloc_domain::ApplyPlan, "apply_plan.schema.json");
    dump!(mdloc_domain::CheckReport, "check_report.schema.json");
    ui_ok!("Schemas written to {}", out_dir.display());
    Ok(())
}
