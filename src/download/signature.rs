//! Magic-byte signature sniffing.

/// Number of leading bytes needed to match every known signature.
pub const SNIFF_LEN: usize = 8;

/// Known leading-byte signatures, checked in order.
const SIGNATURES: &[(&[u8], &str)] = &[
    (b"\xFF\xD8\xFF", ".jpg"),
    (b"\x89PNG\r\n\x1a\n", ".png"),
    (b"PK\x03\x04", ".zip"),
    (b"Rar!\x1a\x07\x00", ".rar"),
    (b"%PDF", ".pdf"),
    (b"GIF87a", ".gif"),
    (b"GIF89a", ".gif"),
    (b"\xD0\xCF\x11\xE0", ".doc"),
];

/// Guesses a file extension (with leading dot) from the first bytes of a body.
///
/// Returns an empty string when no signature matches.
#[must_use]
pub fn detect(prefix: &[u8]) -> &'static str {
    SIGNATURES
        .iter()
        .find(|(signature, _)| prefix.starts_with(signature))
        .map_or("", |(_, ext)| ext)
}
