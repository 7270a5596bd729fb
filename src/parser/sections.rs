/// Returns the trimmed, non-empty lines under `## <label>`.
///
/// The section runs until the next heading of level two or deeper, or the end
/// of the document. A level-1 heading does not close it. The label is matched
/// case-insensitively against the start of the heading text; anything after
/// the label on the heading line is kept as the first line.
pub fn extract_section(text: &str, label: &str) -> Vec<String> {
    let label = label.trim().to_lowercase();
    let mut lines = text.lines();
    let mut captured = Vec::new();

    let found = lines.by_ref().any(|line| {
        let Some(rest) = heading_text(line).and_then(|heading| strip_label(heading, &label)) else {
            return false;
        };
        let rest = rest.trim();
        if !rest.is_empty() {
            captured.push(rest.to_string());
        }
        true
    });
    if !found {
        return Vec::new();
    }

    captured.extend(
        lines
            .take_while(|line| !line.trim_start().starts_with("##"))
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string),
    );
    captured
}

/// `heading` without its leading `label`, compared case-insensitively.
fn strip_label<'a>(heading: &'a str, label: &str) -> Option<&'a str> {
    let head = heading.get(..label.len())?;
    (head.to_lowercase() == label).then(|| &heading[label.len()..])
}

/// Text of a level-2 heading line, without the marker.
fn heading_text(line: &str) -> Option<&str> {
    let rest = line.trim().strip_prefix("##")?;
    if rest.starts_with('#') {
        return None;
    }
    let text = rest.trim_start();
    (text.len() < rest.len()).then_some(text)
}
