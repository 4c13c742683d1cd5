use crate::BundleTokens;
use mdloc_core::DocRecord;
use std::collections::HashMap;
use std::path::Path;

/// Something off in the bundle that did not stop parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BundleWarning {
    #[error("section {section}: no identifier line, section dropped (starts with {first_line:?})")]
    MissingIdentifier { section: usize, first_line: String },
    #[error("section {section}: identifier line carries an empty path, section dropped")]
    EmptyPath { section: usize },
    #[error("section {section} ({path}): {block} block is not terminated")]
    UnterminatedBlock {
        section: usize,
        path: String,
        block: &'static str,
    },
    #[error("section {section} ({path}): no content block, body left empty")]
    MissingBody { section: usize, path: String },
    #[error("section {section} ({path}): {block} block opened again, its lines are appended")]
    RepeatedBlock {
        section: usize,
        path: String,
        block: &'static str,
    },
    #[error("section {section} ({path}): record starts without a separator line before it")]
    MissingSeparator { section: usize, path: String },
    #[error("section {section} ({path}): path already seen in section {first}, last record wins")]
    DuplicatePath {
        section: usize,
        path: String,
        first: usize,
    },
}

impl BundleWarning {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingIdentifier { .. } => "missing-identifier",
            Self::EmptyPath { .. } => "empty-path",
            Self::UnterminatedBlock { .. } => "unterminated-block",
            Self::MissingBody { .. } => "missing-body",
            Self::RepeatedBlock { .. } => "repeated-block",
            Self::MissingSeparator { .. } => "missing-separator",
            Self::DuplicatePath { .. } => "duplicate-path",
        }
    }

    pub fn section(&self) -> usize {
        match self {
            Self::MissingIdentifier { section, .. }
            | Self::EmptyPath { section }
            | Self::UnterminatedBlock { section, .. }
            | Self::MissingBody { section, .. }
            | Self::RepeatedBlock { section, .. }
            | Self::MissingSeparator { section, .. }
            | Self::DuplicatePath { section, .. } => *section,
        }
    }

    pub fn path(&self) -> Option<&str> {
        match self {
            Self::UnterminatedBlock { path, .. }
            | Self::MissingBody { path, .. }
            | Self::RepeatedBlock { path, .. }
            | Self::MissingSeparator { path, .. }
            | Self::DuplicatePath { path, .. } => Some(path),
            Self::MissingIdentifier { .. } | Self::EmptyPath { .. } => None,
        }
    }

    /// Whether the warning means content was lost.
    pub fn drops_section(&self) -> bool {
        matches!(self, Self::MissingIdentifier { .. } | Self::EmptyPath { .. })
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParsedBundle {
    pub records: Vec<DocRecord>,
    pub warnings: Vec<BundleWarning>,
}

impl ParsedBundle {
    pub fn dropped_sections(&self) -> usize {
        self.warnings.iter().filter(|w| w.drops_section()).count()
    }
}

pub fn read_bundle(path: &Path, tokens: &BundleTokens) -> std::io::Result<ParsedBundle> {
    let text = std::fs::read_to_string(path)?;
    Ok(parse_bundle(&text, tokens))
}

#[derive(Clone, Copy)]
enum State {
    Outside,
    Header,
    Body,
}

/// One record being assembled from the lines after its identifier.
struct PendingRecord {
    section: usize,
    path: String,
    state: State,
    header: Vec<String>,
    body: Vec<String>,
    saw_header: bool,
    saw_body: bool,
}

impl PendingRecord {
    fn new(section: usize, path: &str) -> Self {
        Self {
            section,
            path: path.to_string(),
            state: State::Outside,
            header: Vec::new(),
            body: Vec::new(),
            saw_header: false,
            saw_body: false,
        }
    }

    fn repeated(&self, block: &'static str) -> BundleWarning {
        BundleWarning::RepeatedBlock {
            section: self.section,
            path: self.path.clone(),
            block,
        }
    }

    fn open_header(&mut self, warnings: &mut Vec<BundleWarning>) {
        if self.saw_header {
            warnings.push(self.repeated("frontmatter"));
        }
        self.saw_header = true;
        self.state = State::Header;
    }

    fn open_body(&mut self, warnings: &mut Vec<BundleWarning>) {
        if self.saw_body {
            warnings.push(self.repeated("content"));
        }
        self.saw_body = true;
        self.state = State::Body;
    }

    fn feed(&mut self, line: &str, tokens: &BundleTokens, warnings: &mut Vec<BundleWarning>) {
        match self.state {
            State::Outside => {
                if tokens.is_marker(line, &tokens.header_start) {
                    self.open_header(warnings);
                } else if tokens.is_marker(line, &tokens.body_start) {
                    self.open_body(warnings);
                }
            }
            State::Header => {
                if tokens.is_marker(line, &tokens.header_end) {
                    self.state = State::Outside;
                } else if tokens.is_marker(line, &tokens.body_start) {
                    // Header end marker lost in translation; recover at the body.
                    warnings.push(BundleWarning::UnterminatedBlock {
                        section: self.section,
                        path: self.path.clone(),
                        block: "frontmatter",
                    });
                    self.open_body(warnings);
                } else if tokens.is_marker(line, &tokens.header_start) {
                    warnings.push(self.repeated("frontmatter"));
                } else {
                    self.header.push(tokens.unescape_line(line).into_owned());
                }
            }
            State::Body => {
                if tokens.is_marker(line, &tokens.body_end) {
                    self.state = State::Outside;
                } else if tokens.is_marker(line, &tokens.body_start) {
                    warnings.push(self.repeated("content"));
                } else {
                    self.body.push(tokens.unescape_line(line).into_owned());
                }
            }
        }
    }

    fn finish(mut self, warnings: &mut Vec<BundleWarning>) -> DocRecord {
        match self.state {
            State::Header => warnings.push(BundleWarning::UnterminatedBlock {
                section: self.section,
                path: self.path.clone(),
                block: "frontmatter",
            }),
            State::Body => {
                // Blank lines before the next structural line belong to the framing.
                while self.body.last().is_some_and(|l| l.trim().is_empty()) {
                    self.body.pop();
                }
                warnings.push(BundleWarning::UnterminatedBlock {
                    section: self.section,
                    path: self.path.clone(),
                    block: "content",
                });
            }
            State::Outside => {}
        }
        if !self.saw_body {
            warnings.push(BundleWarning::MissingBody {
                section: self.section,
                path: self.path.clone(),
            });
        }
        DocRecord::new(self.path, self.header.join("\n"), self.body.join("\n"))
    }
}

/// Parse bundle text back into records. Never fails: anything that cannot be
/// turned into a record is reported in `warnings`.
pub fn parse_bundle(text: &str, tokens: &BundleTokens) -> ParsedBundle {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut sections: Vec<Vec<&str>> = vec![Vec::new()];
    for raw in text.split('\n') {
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        if tokens.is_marker(line, &tokens.separator) {
            sections.push(Vec::new());
        } else if let Some(current) = sections.last_mut() {
            current.push(line);
        }
    }

    let mut parsed = ParsedBundle::default();
    let mut first_seen: HashMap<String, usize> = HashMap::new();
    let mut section_no = 0usize;

    for lines in sections {
        if lines.iter().all(|l| l.trim().is_empty()) {
            continue;
        }
        section_no += 1;
        for record in parse_section(section_no, &lines, tokens, &mut parsed.warnings) {
            if let Some(first) = first_seen.get(&record.source_path) {
                parsed.warnings.push(BundleWarning::DuplicatePath {
                    section: section_no,
                    path: record.source_path.clone(),
                    first: *first,
                });
            } else {
                first_seen.insert(record.source_path.clone(), section_no);
            }
            parsed.records.push(record);
        }
    }
    parsed
}

/// Records of one separator-delimited section. Normally one; an unescaped
/// identifier line anywhere in the section starts another record, since
/// content never carries one unescaped.
fn parse_section(
    section: usize,
    lines: &[&str],
    tokens: &BundleTokens,
    warnings: &mut Vec<BundleWarning>,
) -> Vec<DocRecord> {
    let mut iter = lines.iter().skip_while(|l| l.trim().is_empty());
    let Some(first) = iter.next() else {
        return Vec::new();
    };
    let Some(path) = tokens.parse_identifier(first) else {
        warnings.push(BundleWarning::MissingIdentifier {
            section,
            first_line: first.trim().chars().take(80).collect(),
        });
        return Vec::new();
    };

    let start = |path: &str, warnings: &mut Vec<BundleWarning>| {
        if path.is_empty() {
            warnings.push(BundleWarning::EmptyPath { section });
            None
        } else {
            Some(PendingRecord::new(section, path))
        }
    };

    let mut records = Vec::new();
    let mut current = start(path, warnings);
    for line in iter {
        if let Some(next) = tokens.parse_identifier(line) {
            if let Some(done) = current.take() {
                records.push(done.finish(warnings));
            }
            warnings.push(BundleWarning::MissingSeparator {
                section,
                path: next.to_string(),
            });
            current = start(next, warnings);
            continue;
        }
        // Lines after an empty identifier have no record to go to.
        if let Some(pending) = current.as_mut() {
            pending.feed(line, tokens, warnings);
        }
    }
    if let Some(done) = current {
        records.push(done.finish(warnings));
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render_bundle;

    fn tokens() -> BundleTokens {
        BundleTokens::default()
    }

    #[test]
    fn parses_rendered_records_back() {
        let records = vec![
            DocRecord::new("docs/intro.md", "title: Intro", "Hello"),
            DocRecord::new("docs/empty.md", "", ""),
            DocRecord::new("blog/x.md", "a: 1\nb: 2", "Line 1\n\nLine 2"),
        ];
        let parsed = parse_bundle(&render_bundle(&records, &tokens()), &tokens());
        assert!(parsed.warnings.is_empty(), "{:?}", parsed.warnings);
        assert_eq!(parsed.records, records);
    }

    #[test]
    fn body_lines_that_look_like_structure_survive() {
        let body = "Intro\n===FILE_SEPARATOR===\n---END CONTENT---\n===FILE_INFO:evil.md===\n\\---CONTENT---";
        let header = "title: x\n---END FRONTMATTER---";
        let records = vec![
            DocRecord::new("docs/tricky.md", header, body),
            DocRecord::new("docs/next.md", "", "Next"),
        ];
        let parsed = parse_bundle(&render_bundle(&records, &tokens()), &tokens());
        assert!(parsed.warnings.is_empty(), "{:?}", parsed.warnings);
        assert_eq!(parsed.records, records);
    }

    #[test]
    fn section_without_identifier_is_reported() {
        let text = "===FILE_INFO:a.md===\n---CONTENT---\nA\n---END CONTENT---\n\n\
                    ===FILE_SEPARATOR===\n\
                    Translated by hand, identifier lost\n---CONTENT---\nB\n---END CONTENT---\n";
        let parsed = parse_bundle(text, &tokens());
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.dropped_sections(), 1);
        assert!(matches!(
            &parsed.warnings[0],
            BundleWarning::MissingIdentifier { section: 2, first_line } if first_line.starts_with("Translated")
        ));
    }

    #[test]
    fn missing_markers_give_empty_fields() {
        let parsed = parse_bundle("===FILE_INFO:a.md===\nstray text\n", &tokens());
        assert_eq!(parsed.records, vec![DocRecord::new("a.md", "", "")]);
        assert_eq!(parsed.warnings[0].kind(), "missing-body");
    }

    #[test]
    fn crlf_bundle_is_accepted() {
        let text = "===FILE_INFO:docs/a.md===\r\n---FRONTMATTER---\r\ntitle: A\r\n---END FRONTMATTER---\r\n\r\n---CONTENT---\r\nBody\r\n---END CONTENT---\r\n";
        let parsed = parse_bundle(text, &tokens());
        assert_eq!(parsed.records, vec![DocRecord::new("docs/a.md", "title: A", "Body")]);
    }

    #[test]
    fn lost_header_end_recovers_body() {
        let text = "===FILE_INFO:a.md===\n---FRONTMATTER---\ntitle: A\n---CONTENT---\nBody\n---END CONTENT---\n";
        let parsed = parse_bundle(text, &tokens());
        assert_eq!(parsed.records, vec![DocRecord::new("a.md", "title: A", "Body")]);
        assert_eq!(parsed.warnings.len(), 1);
        assert_eq!(parsed.warnings[0].kind(), "unterminated-block");
    }

    #[test]
    fn duplicate_paths_are_kept_in_order_and_flagged() {
        let records = vec![
            DocRecord::new("a.md", "", "first"),
            DocRecord::new("a.md", "", "second"),
        ];
        let parsed = parse_bundle(&render_bundle(&records, &tokens()), &tokens());
        assert_eq!(parsed.records.len(), 2);
        assert_eq!(parsed.records[1].body, "second");
        assert_eq!(
            parsed.warnings,
            vec![BundleWarning::DuplicatePath {
                section: 2,
                path: "a.md".into(),
                first: 1
            }]
        );
    }

    #[test]
    fn lost_separator_keeps_both_records() {
        let text = "===FILE_INFO:docs/a.md===\n---CONTENT---\nA body\n---END CONTENT---\n\n\
                    ===FILE_INFO:docs/b.md===\n---CONTENT---\nB body\n---END CONTENT---\n";
        let parsed = parse_bundle(text, &tokens());
        assert_eq!(
            parsed.records,
            vec![
                DocRecord::new("docs/a.md", "", "A body"),
                DocRecord::new("docs/b.md", "", "B body"),
            ]
        );
        assert_eq!(
            parsed.warnings,
            vec![BundleWarning::MissingSeparator {
                section: 1,
                path: "docs/b.md".into()
            }]
        );
        assert_eq!(parsed.dropped_sections(), 0);
    }

    #[test]
    fn lost_separator_and_end_marker_still_split() {
        let text = "===FILE_INFO:docs/a.md===\n---CONTENT---\nA body\n\n\
                    ===FILE_INFO:docs/b.md===\n---CONTENT---\nB body\n---END CONTENT---\n";
        let parsed = parse_bundle(text, &tokens());
        assert_eq!(parsed.records.len(), 2);
        assert_eq!(parsed.records[0].body, "A body");
        assert_eq!(parsed.records[1].body, "B body");
        let kinds: Vec<_> = parsed.warnings.iter().map(|w| w.kind()).collect();
        assert_eq!(kinds, vec!["unterminated-block", "missing-separator"]);
    }

    #[test]
    fn repeated_body_marker_appends_instead_of_replacing() {
        let text = "===FILE_INFO:docs/a.md===\n---CONTENT---\nFirst\n---END CONTENT---\n\
                    ---CONTENT---\nSecond\n---END CONTENT---\n";
        let parsed = parse_bundle(text, &tokens());
        assert_eq!(parsed.records, vec![DocRecord::new("docs/a.md", "", "First\nSecond")]);
        assert_eq!(
            parsed.warnings,
            vec![BundleWarning::RepeatedBlock {
                section: 1,
                path: "docs/a.md".into(),
                block: "content"
            }]
        );
    }

    #[test]
    fn repeated_header_marker_is_reported() {
        let text = "===FILE_INFO:a.md===\n---FRONTMATTER---\nx: 1\n---FRONTMATTER---\ny: 2\n\
                    ---END FRONTMATTER---\n---CONTENT---\nB\n---END CONTENT---\n";
        let parsed = parse_bundle(text, &tokens());
        assert_eq!(parsed.records, vec![DocRecord::new("a.md", "x: 1\ny: 2", "B")]);
        assert_eq!(parsed.warnings.len(), 1);
        assert_eq!(parsed.warnings[0].kind(), "repeated-block");
    }

    #[test]
    fn custom_tokens_are_honoured() {
        let t = BundleTokens {
            separator: "@@@".into(),
            body_start: "<<<".into(),
            body_end: ">>>".into(),
            ..BundleTokens::default()
        };
        let records = vec![DocRecord::new("a.md", "", "x"), DocRecord::new("b.md", "", "---CONTENT---")];
        let text = render_bundle(&records, &t);
        assert!(text.contains("\n@@@\n"));
        assert_eq!(parse_bundle(&text, &t).records, records);
    }
}
