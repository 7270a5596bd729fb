use regex::Regex;
use std::sync::LazyLock;

static IMAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[.*?\]\((.*?)\)").expect("valid image regex"));

static IMAGE_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^!\[.*?\]\(.*?\)").expect("valid image line regex"));

/// Whether `line` opens with an inline image.
pub(crate) fn is_image_line(line: &str) -> bool {
    IMAGE_LINE_RE.is_match(line)
}

/// Resolves every inline image of `text` into an absolute URL.
///
/// `relative_path` is the document path relative to the repository root. Results
/// keep document order and duplicates.
pub fn extract_images(text: &str, relative_path: &str, media_base: &str) -> Vec<String> {
    let dir = containing_dir(relative_path);

    IMAGE_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|token| resolve(link_target(token.as_str()), &dir, media_base))
        .collect()
}

/// Path part of an image destination, without an optional `"title"`.
fn link_target(destination: &str) -> &str {
    let destination = destination.trim();
    destination
        .split_whitespace()
        .next()
        .unwrap_or(destination)
}

fn resolve(token: &str, dir: &str, media_base: &str) -> String {
    if token.starts_with("http://") || token.starts_with("https://") {
        return token.to_string();
    }

    let path = if let Some(rest) = token.strip_prefix("./") {
        format!("{dir}{rest}")
    } else if let Some(rest) = token.strip_prefix('/') {
        rest.to_string()
    } else {
        format!("{dir}{token}")
    };

    format!("{media_base}{path}")
}

/// Directory part of a repository-relative path, with a trailing slash.
///
/// Empty for documents at the repository root.
fn containing_dir(relative_path: &str) -> String {
    let normalized = relative_path.replace('\\', "/");
    match normalized.rfind('/') {
        Some(idx) => normalized[..=idx].to_string(),
        None => String::new(),
    }
}
