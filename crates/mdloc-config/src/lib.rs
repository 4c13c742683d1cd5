use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "mdloc.toml";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MdlocConfig {
    pub root: Option<String>,
    pub extract: Option<ExtractCfg>,
    pub apply: Option<ApplyCfg>,
    pub locale: Option<LocaleCfg>,
    pub bundle: Option<BundleCfg>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtractCfg {
    pub content_dirs: Option<Vec<String>>,
    pub extensions: Option<Vec<String>>,
    pub out: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplyCfg {
    pub bundle: Option<String>,
    pub backup: Option<bool>,
    pub incremental: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocaleCfg {
    pub code: Option<String>,
    pub i18n_dir: Option<String>,
    pub docs_plugin_dir: Option<String>,
    pub blog_plugin_dir: Option<String>,
    pub pages_plugin_dir: Option<String>,
}

/// Overrides for the bundle's structural lines.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BundleCfg {
    pub separator: Option<String>,
    pub info_prefix: Option<String>,
    pub info_suffix: Option<String>,
    pub header_start: Option<String>,
    pub header_end: Option<String>,
    pub body_start: Option<String>,
    pub body_end: Option<String>,
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub fn load_config() -> Result<MdlocConfig, ConfigError> {
    // Search order: CWD/mdloc.toml, $CONFIG/mdloc/mdloc.toml
    let cwd = std::env::current_dir().ok();
    let user = dirs::config_dir().map(|base| base.join("mdloc"));
    load_config_from(cwd.as_deref(), user.as_deref())
}

/// Load and merge `mdloc.toml` from the given directories; earlier wins.
pub fn load_config_from(
    project_dir: Option<&Path>,
    user_dir: Option<&Path>,
) -> Result<MdlocConfig, ConfigError> {
    let mut merged = MdlocConfig::default();
    for dir in [project_dir, user_dir].into_iter().flatten() {
        if let Some(cfg) = read_config_file(&dir.join(CONFIG_FILE_NAME))? {
            merged = merge(merged, cfg);
        }
    }
    Ok(merged)
}

fn read_config_file(path: &Path) -> Result<Option<MdlocConfig>, ConfigError> {
    let text = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    toml::from_str::<MdlocConfig>(&text)
        .map(Some)
        .map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

fn merge(mut a: MdlocConfig, b: MdlocConfig) -> MdlocConfig {
    if a.root.is_none() {
        a.root = b.root;
    }
    a.extract = merge_opt(a.extract, b.extract, merge_extract);
    a.apply = merge_opt(a.apply, b.apply, merge_apply);
    a.locale = merge_opt(a.locale, b.locale, merge_locale);
    a.bundle = merge_opt(a.bundle, b.bundle, merge_bundle);
    a
}

fn merge_opt<T: Default>(a: Option<T>, b: Option<T>, f: fn(T, T) -> T) -> Option<T> {
    match (a, b) {
        (Some(a), Some(b)) => Some(f(a, b)),
        (None, Some(b)) => Some(b),
        (Some(a), None) => Some(a),
        (None, None) => None,
    }
}

fn merge_extract(mut a: ExtractCfg, b: ExtractCfg) -> ExtractCfg {
    if a.content_dirs.is_none() {
        a.content_dirs = b.content_dirs;
    }
    if a.extensions.is_none() {
        a.extensions = b.extensions;
    }
    if a.out.is_none() {
        a.out = b.out;
    }
    a
}

fn merge_apply(mut a: ApplyCfg, b: ApplyCfg) -> ApplyCfg {
    if a.bundle.is_none() {
        a.bundle = b.bundle;
    }
    if a.backup.is_none() {
        a.backup = b.backup;
    }
    if a.incremental.is_none() {
        a.incremental = b.incremental;
    }
    a
}

fn merge_locale(mut a: LocaleCfg, b: LocaleCfg) -> LocaleCfg {
    if a.code.is_none() {
        a.code = b.code;
    }
    if a.i18n_dir.is_none() {
        a.i18n_dir = b.i18n_dir;
    }
    if a.docs_plugin_dir.is_none() {
        a.docs_plugin_dir = b.docs_plugin_dir;
    }
    if a.blog_plugin_dir.is_none() {
        a.blog_plugin_dir = b.blog_plugin_dir;
    }
    if a.pages_plugin_dir.is_none() {
        a.pages_plugin_dir = b.pages_plugin_dir;
    }
    a
}

fn merge_bundle(mut a: BundleCfg, b: BundleCfg) -> BundleCfg {
    if a.separator.is_none() {
        a.separator = b.separator;
    }
    if a.info_prefix.is_none() {
        a.info_prefix = b.info_prefix;
    }
    if a.info_suffix.is_none() {
        a.info_suffix = b.info_suffix;
    }
    if a.header_start.is_none() {
        a.header_start = b.header_start;
    }
    if a.header_end.is_none() {
        a.header_end = b.header_end;
    }
    if a.body_start.is_none() {
        a.body_start = b.body_start;
    }
    if a.body_end.is_none() {
        a.body_end = b.body_end;
    }
    a
}
