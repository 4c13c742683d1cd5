//! The bundle: one plain-text file holding many documents, meant to be edited
//! by a translator between `extract` and `apply`.
//!
//! ```text
//! ===FILE_INFO:docs/intro.md===
//! ---FRONTMATTER---
//! title: Intro
//! ---END FRONTMATTER---
//!
//! ---CONTENT---
//! Hello
//! ---END CONTENT---
//!
//! ===FILE_SEPARATOR===
//! ===FILE_INFO:blog/post.md===
//! ...
//! ```
//!
//! Content lines that would read as one of the structural lines are written
//! with one extra leading `\` and unescaped on read.

use std::borrow::Cow;

mod read;
mod write;

pub use read::{parse_bundle, read_bundle, BundleWarning, ParsedBundle};
pub use write::render_bundle;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleTokens {
    pub separator: String,
    pub info_prefix: String,
    pub info_suffix: String,
    pub header_start: String,
    pub header_end: String,
    pub body_start: String,
    pub body_end: String,
}

impl Default for BundleTokens {
    fn default() -> Self {
        Self {
            separator: "===FILE_SEPARATOR===".into(),
            info_prefix: "===FILE_INFO:".into(),
            info_suffix: "===".into(),
            header_start: "---FRONTMATTER---".into(),
            header_end: "---END FRONTMATTER---".into(),
            body_start: "---CONTENT---".into(),
            body_end: "---END CONTENT---".into(),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("bundle token `{0}` must not be empty")]
    Empty(&'static str),
    #[error("bundle tokens `{0}` and `{1}` must differ")]
    Clash(&'static str, &'static str),
    #[error("bundle token `{0}` must not contain line breaks or surrounding whitespace")]
    Whitespace(&'static str),
}

impl BundleTokens {
    fn named(&self) -> [(&'static str, &str); 6] {
        [
            ("separator", self.separator.as_str()),
            ("info_prefix", self.info_prefix.as_str()),
            ("header_start", self.header_start.as_str()),
            ("header_end", self.header_end.as_str()),
            ("body_start", self.body_start.as_str()),
            ("body_end", self.body_end.as_str()),
        ]
    }

    fn markers(&self) -> [&str; 5] {
        [
            self.separator.as_str(),
            self.header_start.as_str(),
            self.header_end.as_str(),
            self.body_start.as_str(),
            self.body_end.as_str(),
        ]
    }

    /// Structural lines are compared after trimming, so tokens themselves
    /// must be non-empty, trimmed and distinct, and no marker may begin with
    /// the identifier prefix.
    pub fn validate(&self) -> Result<(), TokenError> {
        let named = self.named();
        for (name, tok) in named {
            if tok.is_empty() {
                return Err(TokenError::Empty(name));
            }
            if tok.trim() != tok || tok.contains('\n') {
                return Err(TokenError::Whitespace(name));
            }
        }
        if self.info_suffix.contains('\n') {
            return Err(TokenError::Whitespace("info_suffix"));
        }
        // A marker beginning with the identifier prefix would read as an identifier.
        for (name, tok) in named.into_iter().filter(|(name, _)| *name != "info_prefix") {
            if tok.starts_with(self.info_prefix.as_str()) {
                return Err(TokenError::Clash("info_prefix", name));
            }
        }
        for (i, (a_name, a)) in named.iter().enumerate() {
            for (b_name, b) in &named[i + 1..] {
                if a == b {
                    return Err(TokenError::Clash(*a_name, *b_name));
                }
            }
        }
        Ok(())
    }

    pub fn identifier_line(&self, source_path: &str) -> String {
        format!("{}{}{}", self.info_prefix, source_path, self.info_suffix)
    }

    /// Path carried by an identifier line, or `None` when the line is not one.
    /// A missing suffix is tolerated.
    pub fn parse_identifier<'a>(&self, line: &'a str) -> Option<&'a str> {
        let rest = line.trim().strip_prefix(self.info_prefix.as_str())?;
        let path = if self.info_suffix.is_empty() {
            rest
        } else {
            rest.strip_suffix(self.info_suffix.as_str()).unwrap_or(rest)
        };
        Some(path.trim())
    }

    pub fn is_marker(&self, line: &str, token: &str) -> bool {
        line.trim() == token
    }

    /// A content line that, ignoring surrounding whitespace and any leading
    /// backslashes, would be read as structure.
    pub fn is_reserved(&self, line: &str) -> bool {
        let core = line.trim().trim_start_matches('\\');
        self.markers().contains(&core) || core.starts_with(self.info_prefix.as_str())
    }

    pub fn escape_line<'a>(&self, line: &'a str) -> Cow<'a, str> {
        if self.is_reserved(line) {
            let indent = line.len() - line.trim_start().len();
            Cow::Owned(format!("{}\\{}", &line[..indent], &line[indent..]))
        } else {
            Cow::Borrowed(line)
        }
    }

    pub fn unescape_line<'a>(&self, line: &'a str) -> Cow<'a, str> {
        if !self.is_reserved(line) {
            return Cow::Borrowed(line);
        }
        let indent = line.len() - line.trim_start().len();
        if line[indent..].starts_with('\\') {
            let mut out = String::with_capacity(line.len() - 1);
            out.push_str(&line[..indent]);
            out.push_str(&line[indent + 1..]);
            Cow::Owned(out)
        } else {
            Cow::Borrowed(line)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escaping_is_reversible_for_reserved_lines() {
        let t = BundleTokens::default();
        for line in [
            "---CONTENT---",
            "  ---END CONTENT---",
            "\\---FRONTMATTER---",
            " \\\\===FILE_SEPARATOR=== ",
            "===FILE_INFO:docs/x.md===",
        ] {
            let escaped = t.escape_line(line);
            assert_ne!(escaped, line, "{line:?} should be escaped");
            assert!(!t.is_marker(&escaped, &t.body_start));
            assert_eq!(t.unescape_line(&escaped), line);
        }
    }

    #[test]
    fn ordinary_lines_pass_through() {
        let t = BundleTokens::default();
        for line in ["---", "text ---CONTENT---", "\\n escaped in code", ""] {
            assert_eq!(t.escape_line(line), line);
            assert_eq!(t.unescape_line(line), line);
        }
    }

    #[test]
    fn identifier_parsing() {
        let t = BundleTokens::default();
        assert_eq!(t.parse_identifier("===FILE_INFO:docs/intro.md==="), Some("docs/intro.md"));
        assert_eq!(t.parse_identifier("===FILE_INFO:blog/x.md  "), Some("blog/x.md"));
        assert_eq!(t.parse_identifier("---CONTENT---"), None);
    }

    #[test]
    fn validate_rejects_clashing_tokens() {
        let t = BundleTokens {
            body_end: "---CONTENT---".into(),
            ..BundleTokens::default()
        };
        assert_eq!(t.validate(), Err(TokenError::Clash("body_start", "body_end")));
        assert!(BundleTokens::default().validate().is_ok());

        let shadowed = BundleTokens {
            info_prefix: "---".into(),
            ..BundleTokens::default()
        };
        assert_eq!(
            shadowed.validate(),
            Err(TokenError::Clash("info_prefix", "header_start"))
        );
    }
}
