/// Reserved directive tokens. Both are matched against the trimmed line.
pub const OPEN_TOKEN: &str = "BLOCK:";
pub const CLOSE_TOKEN: &str = "ENDBLOCK";

/// Classification of one trimmed source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// An open directive; carries the text after `BLOCK:`, unvalidated.
    Open(&'a str),
    /// A close directive.
    Close,
    /// Ordinary content.
    Content,
}

pub fn classify(trimmed: &str) -> LineKind<'_> {
    if let Some(rest) = trimmed.strip_prefix(OPEN_TOKEN) {
        LineKind::Open(rest)
    } else if trimmed.starts_with(CLOSE_TOKEN) {
        LineKind::Close
    } else {
        LineKind::Content
    }
}

/// Block-type identifier grammar: `[A-Za-z][A-Za-z0-9_]*`.
pub fn is_valid_block_id(id: &str) -> bool {
    let mut chars = id.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
