use crate::Result;
use color_eyre::eyre::eyre;
use mdloc_bundle::BundleTokens;
use mdloc_config::MdlocConfig;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONTENT_DIRS: &[&str] = &["docs", "blog"];
pub const DEFAULT_EXTENSIONS: &[&str] = &["md", "mdx"];
pub const DEFAULT_EXTRACT_OUT: &str = "translation-source.txt";
pub const DEFAULT_APPLY_BUNDLE: &str = "translation-source-translated.txt";
pub const DEFAULT_LOCALE: &str = "en";

fn resolve_under(root: &Path, p: impl AsRef<Path>) -> PathBuf {
    let p = p.as_ref();
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        root.join(p)
    }
}

pub fn project_root(cfg: &MdlocConfig) -> PathBuf {
    PathBuf::from(cfg.root.as_deref().unwrap_or("."))
}

/// Bundle tokens with any `[bundle]` overrides applied.
pub fn tokens_from_config(cfg: &MdlocConfig) -> Result<BundleTokens> {
    let mut tokens = BundleTokens::default();
    if let Some(b) = cfg.bundle.clone() {
        let fields = [
            (b.separator, &mut tokens.separator),
            (b.info_prefix, &mut tokens.info_prefix),
            (b.info_suffix, &mut tokens.info_suffix),
            (b.header_start, &mut tokens.header_start),
            (b.header_end, &mut tokens.header_end),
            (b.body_start, &mut tokens.body_start),
            (b.body_end, &mut tokens.body_end),
        ];
        for (value, slot) in fields {
            if let Some(v) = value {
                *slot = v;
            }
        }
    }
    tokens.validate().map_err(|e| eyre!(e))?;
    Ok(tokens)
}

#[derive(Debug, Clone)]
pub struct ExtractSettings {
    pub root: PathBuf,
    pub content_dirs: Vec<String>,
    pub extensions: Vec<String>,
    pub out: PathBuf,
    pub tokens: BundleTokens,
}

impl ExtractSettings {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            out: root.join(DEFAULT_EXTRACT_OUT),
            root,
            content_dirs: DEFAULT_CONTENT_DIRS.iter().map(|s| s.to_string()).collect(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            tokens: BundleTokens::default(),
        }
    }

    pub fn from_config(cfg: &MdlocConfig) -> Result<Self> {
        let mut s = Self::new(project_root(cfg));
        s.tokens = tokens_from_config(cfg)?;
        if let Some(ex) = &cfg.extract {
            if let Some(dirs) = &ex.content_dirs {
                s.content_dirs = dirs.clone();
            }
            if let Some(exts) = &ex.extensions {
                s.extensions = exts.clone();
            }
            if let Some(out) = &ex.out {
                s.out = resolve_under(&s.root, out);
            }
        }
        Ok(s)
    }

    pub fn with_out(mut self, out: impl AsRef<Path>) -> Self {
        self.out = resolve_under(&self.root, out);
        self
    }
}

/// Where translated documents go under the locale tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleLayout {
    pub code: String,
    pub i18n_dir: String,
    pub docs_plugin_dir: String,
    pub blog_plugin_dir: String,
    pub pages_plugin_dir: String,
}

impl LocaleLayout {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            i18n_dir: "i18n".into(),
            docs_plugin_dir: "docusaurus-plugin-content-docs".into(),
            blog_plugin_dir: "docusaurus-plugin-content-blog".into(),
            pages_plugin_dir: "docusaurus-plugin-content-pages".into(),
        }
    }

    /// Layout from `[locale]`; `code` overrides the configured locale code.
    pub fn from_config(cfg: &MdlocConfig, code: Option<&str>) -> Self {
        let loc = cfg.locale.clone().unwrap_or_default();
        let code = code
            .map(str::to_string)
            .or(loc.code)
            .unwrap_or_else(|| DEFAULT_LOCALE.to_string());
        let mut layout = Self::new(code);
        if let Some(v) = loc.i18n_dir {
            layout.i18n_dir = v;
        }
        if let Some(v) = loc.docs_plugin_dir {
            layout.docs_plugin_dir = v;
        }
        if let Some(v) = loc.blog_plugin_dir {
            layout.blog_plugin_dir = v;
        }
        if let Some(v) = loc.pages_plugin_dir {
            layout.pages_plugin_dir = v;
        }
        layout
    }
}

#[derive(Debug, Clone)]
pub struct ApplySettings {
    pub root: PathBuf,
    pub bundle: PathBuf,
    pub placement: crate::Placement,
    /// Copy an existing destination to `<path>.backup` before overwriting.
    /// Only honoured for in-place placement.
    pub backup: bool,
    /// Leave destinations alone when their content is already identical.
    pub incremental: bool,
    pub tokens: BundleTokens,
}

impl ApplySettings {
    pub fn new(root: impl Into<PathBuf>, placement: crate::Placement) -> Self {
        let root = root.into();
        Self {
            bundle: root.join(DEFAULT_APPLY_BUNDLE),
            root,
            placement,
            backup: true,
            incremental: false,
            tokens: BundleTokens::default(),
        }
    }

    pub fn from_config(cfg: &MdlocConfig, placement: crate::Placement) -> Result<Self> {
        let mut s = Self::new(project_root(cfg), placement);
        s.tokens = tokens_from_config(cfg)?;
        if let Some(ap) = &cfg.apply {
            if let Some(bundle) = &ap.bundle {
                s.bundle = resolve_under(&s.root, bundle);
            }
            if let Some(backup) = ap.backup {
                s.backup = backup;
            }
            if let Some(incremental) = ap.incremental {
                s.incremental = incremental;
            }
        }
        Ok(s)
    }

    pub fn with_bundle(mut self, bundle: impl AsRef<Path>) -> Self {
        self.bundle = resolve_under(&self.root, bundle);
        self
    }

    pub fn backs_up(&self) -> bool {
        self.backup && matches!(self.placement, crate::Placement::InPlace)
    }
}
