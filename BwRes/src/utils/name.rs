//! Fixed-width, NUL-padded name utilities

/// Strip trailing NUL padding from a fixed-width name field.
#[must_use]
pub fn trim_name(raw: &[u8]) -> &[u8] {
    let end = raw.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    &raw[..end]
}

/// Lossy, NUL-trimmed rendering of a name for logs and listings.
#[must_use]
pub fn display_name(raw: &[u8]) -> String {
    String::from_utf8_lossy(trim_name(raw)).into_owned()
}

/// A slot is absent iff every byte is NUL.
#[must_use]
pub fn is_blank_slot(raw: &[u8]) -> bool {
    raw.iter().all(|&b| b == 0)
}

/// Non-empty, and nothing but NULs after the first NUL.
pub(crate) fn is_valid_padded_name(raw: &[u8]) -> bool {
    match raw.iter().position(|&b| b == 0) {
        Some(0) => false,
        Some(first_nul) => raw[first_nul..].iter().all(|&b| b == 0),
        None => !raw.is_empty(),
    }
}
