use url::Url;

const MAX_NAME_BYTES: usize = 120;
const UNTITLED: &str = "untitled";

/// Windows-safe file or folder name: forbidden characters are stripped,
/// surrounding dots/spaces trimmed, reserved device names suffixed with `_`.
pub fn sanitize_filename(input: &str) -> String {
    let cleaned: String = input.chars().filter(|c| !is_forbidden(*c)).collect();
    let mut name = cleaned.trim_matches(&[' ', '.'][..]).to_string();
    if name.is_empty() {
        name = UNTITLED.to_string();
    }
    if name.len() > MAX_NAME_BYTES {
        let mut end = MAX_NAME_BYTES;
        while end > 0 && !name.is_char_boundary(end) {
            end -= 1;
        }
        name.truncate(end);
        name = name.trim_end_matches(&[' ', '.'][..]).to_string();
    }
    if is_reserved_windows_name(&name) {
        name.push('_');
    }
    name
}

/// File name for a downloaded resource: the sanitized last path segment.
/// Returns `None` when the URL has no usable segment.
pub fn sanitize_url_filename(url: &Url) -> Option<String> {
    let last = url.path_segments()?.next_back()?;
    sanitize_segment(last)
}

/// Local file name of an image `src` attribute, absolute or relative.
/// Matches [`sanitize_url_filename`] for the same resolved URL.
pub fn image_file_name(src: &str) -> Option<String> {
    if let Ok(url) = Url::parse(src) {
        return sanitize_url_filename(&url);
    }
    let path = src.split(['?', '#']).next().unwrap_or(src);
    sanitize_segment(path.rsplit('/').next()?)
}

fn sanitize_segment(segment: &str) -> Option<String> {
    let decoded = urlencoding::decode(segment)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| segment.to_string());
    let cleaned: String = decoded.chars().filter(|c| !is_forbidden(*c)).collect();
    if cleaned.trim_matches(&[' ', '.'][..]).is_empty() {
        return None;
    }
    Some(sanitize_filename(&cleaned))
}

/// Per-site folder name: the host without a leading `www.`.
pub fn site_folder_name(url: &str) -> String {
    let host = Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_default();
    sanitize_filename(host.strip_prefix("www.").unwrap_or(&host))
}

/// `<sequence> - <sanitized title>`.
pub fn post_folder_name(sequence: u64, title: &str) -> String {
    format!("{sequence} - {}", sanitize_filename(title))
}

/// `<sanitized title>.<extension>`.
pub fn document_filename(title: &str, extension: &str) -> String {
    format!("{}.{extension}", sanitize_filename(title))
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}

fn is_reserved_windows_name(name: &str) -> bool {
    const RESERVED: &[&str] = &[
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
        "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(name))
}
