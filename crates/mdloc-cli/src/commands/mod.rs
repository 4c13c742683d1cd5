pub mod apply;
pub mod check;
pub mod extract;
pub mod scan;
pub mod schema;

use mdloc_config::MdlocConfig;
use std::path::PathBuf;

/// Layered config with `--root` taking precedence over the configured root.
pub(crate) fn load_config(root: Option<PathBuf>) -> color_eyre::Result<MdlocConfig> {
    let mut cfg = mdloc_config::load_config()?;
    if let Some(root) = root {
        cfg.root = Some(root.display().to_string());
    }
    tracing::debug!(event = "config_loaded", root = ?cfg.root);
    Ok(cfg)
}
