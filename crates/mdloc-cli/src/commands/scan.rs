use crate::OutputFormat;
use mdloc_services::ExtractSettings;
use owo_colors::OwoColorize;
use std::path::PathBuf;

pub fn run_scan(
    root: Option<PathBuf>,
    dirs: Vec<String>,
    format: OutputFormat,
    use_color: bool,
) -> color_eyre::Result<()> {
    tracing::debug!(event = "scan_args", root = ?root, dirs = ?dirs, format = ?format);

    let cfg = super::load_config(root)?;
    let mut settings = ExtractSettings::from_config(&cfg)?;
    if !dirs.is_empty() {
        settings.content_dirs = dirs;
    }
    let docs = mdloc_services::scan_documents(&settings);

    if format == OutputFormat::Json {
        return crate::ui::print_json(&docs);
    }
    for d in &docs {
        let header = if d.has_header {
            format!("frontmatter {} line(s)", d.header_lines)
        } else {
            "no frontmatter".to_string()
        };
        if use_color {
            ui_out!("{}  {}, {} chars", d.path.blue(), header.dimmed(), d.body_chars);
        } else {
            ui_out!("{}  {}, {} chars", d.path, header, d.body_chars);
        }
    }
    ui_info!("{} document(s) found", docs.len());
    Ok(())
}
