//! Orchestration over the lower-level crates: the extract and apply phases,
//! plus the read-only helpers (scan, check) the CLI exposes.

pub mod apply;
pub mod check;
pub mod confirm;
pub mod extract;
pub mod scan;
pub mod settings;
pub mod util;

pub use mdloc_core::{DocRecord, MdlocError, Result};

pub use apply::{run_apply, ApplyOutcome, Placement};
pub use check::check_bundle;
pub use confirm::{AssumeYes, Confirm, PromptConfirm};
pub use extract::extract;
pub use scan::scan_documents;
pub use settings::{ApplySettings, ExtractSettings, LocaleLayout};
