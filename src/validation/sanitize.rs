use regex::Regex;
use std::sync::LazyLock;

static HTML_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("html tag pattern"));

/// Trims free text and strips HTML tags pasted into form inputs.
pub fn sanitize_input(text: &str) -> String {
    HTML_TAG_RE.replace_all(text.trim(), "").trim().to_string()
}
