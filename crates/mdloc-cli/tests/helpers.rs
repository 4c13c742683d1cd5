#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::Path;

pub const INTRO: &str = "---\ntitle: Intro\n---\nHello";

/// `mdloc` running inside `dir`, with color and icons off so output is stable.
pub fn mdloc_in(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("mdloc").expect("mdloc binary built");
    cmd.current_dir(dir)
        .env("NO_COLOR", "1")
        .env("NO_ICONS", "1")
        .env("XDG_CONFIG_HOME", dir.join(".config"))
        .env_remove("RUST_LOG");
    cmd
}

pub fn write_file(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

pub fn read(root: &Path, rel: &str) -> String {
    fs::read_to_string(root.join(rel)).unwrap_or_else(|e| panic!("reading {rel}: {e}"))
}

/// A small site with one doc and one blog post.
pub fn site() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "docs/intro.md", INTRO);
    write_file(dir.path(), "blog/post.md", "Just a post.\n");
    dir
}

/// Run `extract`, then hand the bundle to the "translator": `edit` rewrites
/// the text and the result is stored where `apply` looks by default.
pub fn extract_and_translate(root: &Path, edit: impl FnOnce(String) -> String) {
    mdloc_in(root).arg("extract").assert().success();
    let bundle = read(root, "translation-source.txt");
    fs::write(root.join("translation-source-translated.txt"), edit(bundle)).unwrap();
}

pub fn parse_json_line(stdout: &[u8]) -> serde_json::Value {
    let text = String::from_utf8_lossy(stdout);
    let line = text
        .lines()
        .find(|l| l.trim_start().starts_with('{') || l.trim_start().starts_with('['))
        .unwrap_or_else(|| panic!("no JSON line in stdout:\n{text}"));
    serde_json::from_str(line).unwrap_or_else(|e| panic!("invalid JSON ({e}):\n{line}"))
}

pub fn assert_contains_with_context(haystack: &str, needle: &str, context_msg: &str) {
    if haystack.contains(needle) {
        return;
    }
    let head = haystack.lines().take(10).collect::<Vec<_>>().join("\n");
    panic!("{context_msg}\n--- needle ---\n{needle}\n--- head(10) ---\n{head}");
}

pub fn assert_no_ansi(s: &str, context_msg: &str) {
    if let Some(pos) = s.bytes().position(|b| b == 0x1B) {
        panic!("{context_msg}\nANSI escape at byte {pos}\n--- output ---\n{s}");
    }
}
