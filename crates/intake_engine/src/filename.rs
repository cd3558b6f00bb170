const MAX_DISPLAY_CHARS: usize = 80;

/// Lowercased extension of `name` without the dot, if any.
///
/// Handles both `/` and `\` separators since browser and Windows paths both
/// reach us.
pub fn extension_of(name: &str) -> Option<String> {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let (stem, ext) = base.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// A filename that is safe to embed in one-line log and toast messages.
pub fn display_name(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .collect();
    if cleaned.is_empty() {
        return "untitled".to_string();
    }
    if cleaned.chars().count() > MAX_DISPLAY_CHARS {
        let mut truncated: String = cleaned.chars().take(MAX_DISPLAY_CHARS).collect();
        truncated.push('…');
        return truncated;
    }
    cleaned
}

fn is_forbidden(c: char) -> bool {
    matches!(c, '\0'..='\u{1F}' | '\u{7F}')
}
