use crate::BundleTokens;
use mdloc_core::DocRecord;

fn push_block(out: &mut String, text: &str, tokens: &BundleTokens) {
    for line in text.split('\n') {
        out.push_str(&tokens.escape_line(line));
        out.push('\n');
    }
}

/// Serialize records into bundle text, in the given order.
pub fn render_bundle(records: &[DocRecord], tokens: &BundleTokens) -> String {
    let mut out = String::new();
    for (i, record) in records.iter().enumerate() {
        if i > 0 {
            out.push('\n');
            out.push_str(&tokens.separator);
            out.push('\n');
        }
        out.push_str(&tokens.identifier_line(&record.source_path));
        out.push('\n');

        if record.has_header() {
            out.push_str(&tokens.header_start);
            out.push('\n');
            push_block(&mut out, &record.header, tokens);
            out.push_str(&tokens.header_end);
            out.push_str("\n\n");
        }

        out.push_str(&tokens.body_start);
        out.push('\n');
        push_block(&mut out, &record.body, tokens);
        out.push_str(&tokens.body_end);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_header_and_body_blocks() {
        let records = vec![
            DocRecord::new("docs/intro.md", "title: Intro", "Hello"),
            DocRecord::new("blog/x.md", "", "Plain"),
        ];
        let text = render_bundle(&records, &BundleTokens::default());
        assert_eq!(
            text,
            "===FILE_INFO:docs/intro.md===\n\
             ---FRONTMATTER---\n\
             title: Intro\n\
             ---END FRONTMATTER---\n\
             \n\
             ---CONTENT---\n\
             Hello\n\
             ---END CONTENT---\n\
             \n\
             ===FILE_SEPARATOR===\n\
             ===FILE_INFO:blog/x.md===\n\
             ---CONTENT---\n\
             Plain\n\
             ---END CONTENT---\n"
        );
    }

    #[test]
    fn empty_body_keeps_content_block() {
        let text = render_bundle(&[DocRecord::new("a.md", "", "")], &BundleTokens::default());
        assert_eq!(text, "===FILE_INFO:a.md===\n---CONTENT---\n\n---END CONTENT---\n");
    }
}
