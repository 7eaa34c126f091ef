/// Decode bytes as UTF-8, dropping invalid sequences and a leading byte-order mark.
pub fn decode_lossy(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    let mut out = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        out.push_str(chunk.valid());
    }
    out
}

/// Normalize line endings to `\n` and, when `strip_control` is set, drop control characters
/// other than newline and tab. The result is trimmed.
///
/// Interior whitespace is preserved: paragraph breaks matter to sentence splitting and
/// section analysis downstream.
pub fn clean_text(text: &str, strip_control: bool) -> String {
    let unified = text.replace("\r\n", "\n").replace('\r', "\n");
    let cleaned: String = if strip_control {
        unified
            .chars()
            .filter(|&c| c == '\n' || c == '\t' || !c.is_control())
            .collect()
    } else {
        unified
    };
    cleaned.trim().to_string()
}
