//! Comment and whitespace stripping for inline scripts.

use once_cell::sync::Lazy;
use regex::Regex;

// A `//` preceded by a colon is treated as part of a URL (`https://...`).
static LINE_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)(^|[^:])//.*$").unwrap());

static BLOCK_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)/\*.*?\*/").unwrap());

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

static SPACE_AROUND_PUNCT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*([{}();,:])\s*").unwrap());

/// String literals get no special treatment, so a `//` inside a string that
/// is not preceded by `:` truncates the rest of that line.
pub fn minify_js(js: &str) -> String {
    let js = LINE_COMMENT.replace_all(js, "$1");
    let js = BLOCK_COMMENT.replace_all(&js, "");
    let js = WHITESPACE_RUN.replace_all(&js, " ");
    let js = SPACE_AROUND_PUNCT.replace_all(&js, "$1");
    js.trim().to_string()
}
