/// Parses a block size such as `4096`, `64K`, `1M` or `2GiB`.
///
/// Suffixes are binary multiples and case-insensitive; a trailing `B` or `iB`
/// is accepted. Returns `None` for zero, malformed input, or a size the
/// platform cannot address (4 GiB or more on 32-bit targets).
pub(crate) fn parse_block_size(text: &str) -> Option<usize> {
    let text = text.trim();
    let digits_end = text
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len());
    if digits_end == 0 {
        return None;
    }

    let value: u64 = text[..digits_end].parse().ok()?;
    let suffix = text[digits_end..].to_ascii_lowercase();
    let shift = match suffix.as_str() {
        "" | "b" => 0,
        "k" | "kb" | "kib" => 10,
        "m" | "mb" | "mib" => 20,
        "g" | "gb" | "gib" => 30,
        _ => return None,
    };

    let bytes = value.checked_mul(1 << shift)?;
    if bytes == 0 {
        return None;
    }
    usize::try_from(bytes).ok()
}
