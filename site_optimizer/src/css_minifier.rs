//! Text-level CSS minification.
//!
//! There is no CSS parser here: the stylesheet is rewritten by a fixed
//! sequence of patterns, each applied to the output of the previous one.
//! Braces or quotes inside string values are not protected.

use once_cell::sync::Lazy;
use regex::Regex;

static BLOCK_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)/\*.*?\*/").unwrap());

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

static SPACE_AROUND_PUNCT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*([{}:;,>+~])\s*").unwrap());

static SEMICOLON_BEFORE_CLOSE: Lazy<Regex> = Lazy::new(|| Regex::new(r";\s*\}").unwrap());

// The character before the opening quote and the last quoted character must
// not be a backslash.
static SINGLE_QUOTED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([^\\])'([^']*?[^\\])'").unwrap());

static DOUBLE_QUOTED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"([^\\])"([^"]*?[^\\])""#).unwrap());

pub fn minify_css(css: &str) -> String {
    let css = BLOCK_COMMENT.replace_all(css, "");
    let css = WHITESPACE_RUN.replace_all(&css, " ");
    let css = SPACE_AROUND_PUNCT.replace_all(&css, "$1");
    let css = SEMICOLON_BEFORE_CLOSE.replace_all(&css, "}");
    let css = SINGLE_QUOTED.replace_all(&css, "${1}${2}");
    let css = DOUBLE_QUOTED.replace_all(&css, "${1}${2}");
    css.trim().to_string()
}
