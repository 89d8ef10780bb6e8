pub(super) fn is_line_comment_start(bytes: &[u8], idx: usize) -> bool {
    // MySQL also treats `#` as a line comment.
    bytes.get(idx) == Some(&b'#')
        || (bytes.get(idx) == Some(&b'-') && bytes.get(idx + 1) == Some(&b'-'))
}

pub(super) fn is_block_comment_start(bytes: &[u8], idx: usize) -> bool {
    bytes.get(idx) == Some(&b'/') && bytes.get(idx + 1) == Some(&b'*')
}

pub(super) fn is_block_comment_end(bytes: &[u8], idx: usize) -> bool {
    bytes.get(idx) == Some(&b'*') && bytes.get(idx + 1) == Some(&b'/')
}

/// True when the byte at `idx` closes a quoted run opened by `quote`; doubled quotes are escapes.
pub(super) fn closes_quote(bytes: &[u8], idx: usize, quote: u8) -> bool {
    bytes[idx] == quote && bytes.get(idx + 1) != Some(&quote)
}
