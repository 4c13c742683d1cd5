use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ScanDoc {
    pub schema_version: u32,
    pub path: String,
    pub has_header: bool,
    pub header_lines: usize,
    pub body_chars: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SkippedFile {
    pub path: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExtractSummary {
    pub schema_version: u32,
    pub out: String,
    pub files: usize,
    pub bytes: usize,
    pub skipped: Vec<SkippedFile>,
    pub missing_dirs: Vec<String>,
    pub outside_dirs: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BundleIssue {
    /// 1-based section index inside the bundle.
    pub section: usize,
    pub kind: String,
    pub path: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ApplyFileStat {
    pub source: String,
    pub dest: String,
    /// created / updated / unchanged / failed
    pub status: String,
    pub backup: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ApplySummary {
    pub schema_version: u32,
    pub mode: String,
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub total: usize,
    pub files: Vec<ApplyFileStat>,
    pub warnings: Vec<BundleIssue>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PlannedWrite {
    pub source: String,
    pub dest: Option<String>,
    pub exists: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ApplyPlan {
    pub schema_version: u32,
    pub mode: String,
    pub files: Vec<PlannedWrite>,
    pub warnings: Vec<BundleIssue>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CheckReport {
    pub schema_version: u32,
    pub bundle: String,
    pub records: usize,
    pub with_header: usize,
    pub empty_body: usize,
    pub issues: Vec<BundleIssue>,
}
