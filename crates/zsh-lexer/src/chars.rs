//! Byte classification for scanner decisions
//!
//! The scanner only ever classifies single bytes; identifiers are ASCII by
//! contract, so these are plain match tables rather than Unicode lookups.

/// Whitespace as the scanner sees it: space, tab, newline, carriage return,
/// vertical tab, form feed.
pub fn is_space(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c)
}

/// First byte of an identifier-shaped variable name: `[A-Za-z_]`.
pub fn is_word_start(byte: u8) -> bool {
    byte.is_ascii_alphabetic() || byte == b'_'
}

/// Continuation byte of an identifier-shaped variable name: `[A-Za-z0-9_]`.
pub fn is_word_continue(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

/// Single-character special variables: `$*`, `$@`, `$?`, `$!`, `$#`, `$-`,
/// `$$`, `$_`, and the positional digits.
pub fn is_special_variable(byte: u8) -> bool {
    matches!(byte, b'*' | b'@' | b'?' | b'!' | b'#' | b'-' | b'$' | b'_') || byte.is_ascii_digit()
}
