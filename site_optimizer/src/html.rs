use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::ops::Range;

static INLINE_SCRIPT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<script>(.*?)</script>").unwrap());

static HTML_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());

static BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").unwrap());

static BETWEEN_TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r">\s+<").unwrap());

/// The body of a bare `<script>` element and where it sits in the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineScript {
    pub content: String,
    content_range: Range<usize>,
}

/// Finds the first attribute-less `<script>` block. Later blocks are never
/// looked at.
pub fn extract_first_script(html: &str) -> Option<InlineScript> {
    let caps = INLINE_SCRIPT.captures(html)?;
    let body = caps.get(1)?;
    Some(InlineScript {
        content: body.as_str().to_string(),
        content_range: body.range(),
    })
}

/// Replaces the body of `script` (as found in `html`) with `replacement`.
pub fn splice_script(html: &str, script: &InlineScript, replacement: &str) -> String {
    let Range { start, end } = script.content_range.clone();
    let mut out = String::with_capacity(html.len() - (end - start) + replacement.len());
    out.push_str(&html[..start]);
    out.push_str(replacement);
    out.push_str(&html[end..]);
    out
}

/// Points references to `source_css` (with or without a `?v=` style query)
/// at `minified_css`.
pub fn rewrite_stylesheet_link(
    html: &str,
    source_css: &str,
    minified_css: &str,
) -> Result<String, regex::Error> {
    let pattern = format!(
        r#"(^|["'/=\s]){}(\?[^"'\s>]*)?(["'\s>]|$)"#,
        regex::escape(source_css)
    );
    let reference = Regex::new(&pattern)?;
    Ok(reference
        .replace_all(html, |caps: &Captures| {
            format!("{}{}{}", &caps[1], minified_css, &caps[3])
        })
        .into_owned())
}

/// Drops comments, blank lines and whitespace between adjacent tags.
pub fn minify_html(html: &str) -> String {
    let html = HTML_COMMENT.replace_all(html, "");
    let html = BLANK_LINES.replace_all(&html, "\n");
    BETWEEN_TAGS.replace_all(&html, "><").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_only_the_first_script() {
        let html = "<script>let a = 1;</script><p></p><script>let b = 2;</script>";
        let script = extract_first_script(html).unwrap();
        assert_eq!(script.content, "let a = 1;");
        let out = splice_script(html, &script, "X");
        assert_eq!(out, "<script>X</script><p></p><script>let b = 2;</script>");
    }

    #[test]
    fn scripts_with_attributes_are_ignored() {
        assert!(extract_first_script(r#"<script src="app.js"></script>"#).is_none());
    }

    #[test]
    fn rewrites_versioned_stylesheet_link() {
        let html = r#"<link rel="stylesheet" href="style.css?v=5">"#;
        assert_eq!(
            rewrite_stylesheet_link(html, "style.css", "style.min.css").unwrap(),
            r#"<link rel="stylesheet" href="style.min.css">"#
        );
    }

    #[test]
    fn leaves_similar_names_alone() {
        let html = r#"<link href="mystyle.css"><link href='style.css'>"#;
        assert_eq!(
            rewrite_stylesheet_link(html, "style.css", "style.min.css").unwrap(),
            r#"<link href="mystyle.css"><link href='style.min.css'>"#
        );
    }

    #[test]
    fn oversized_file_name_is_an_error() {
        let name = "a".repeat(1 << 24);
        assert!(rewrite_stylesheet_link("<link>", &name, "style.min.css").is_err());
    }

    #[test]
    fn minify_removes_comments_and_gaps() {
        let html = "<div>\n  <!-- note -->\n\n  <p>hi</p>\n</div>";
        assert_eq!(minify_html(html), "<div><p>hi</p></div>");
    }
}
