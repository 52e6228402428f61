//! Console-output encoding recovery.
//!
//! Spawned interpreters and tools on Windows emit console output in the OS
//! code page (GBK on the reference platform), not UTF-8. Raw child output is
//! decoded as GBK first and only falls back to UTF-8 when that produces
//! replacement characters.

use std::borrow::Cow;

use encoding_rs::GBK;

const REPLACEMENT: char = '\u{FFFD}';

/// Decode raw child-process output into readable text. Never fails; the worst
/// case is a lossy UTF-8 decode with replacement characters left in place.
pub fn normalize_bytes(bytes: &[u8]) -> String {
    if bytes.is_empty() {
        return String::new();
    }

    let (decoded, _, had_errors) = GBK.decode(bytes);
    if !had_errors && !decoded.contains(REPLACEMENT) {
        return decoded.into_owned();
    }

    String::from_utf8_lossy(bytes).into_owned()
}

/// Repair text that was decoded under the wrong encoding. Text without
/// replacement characters is returned unchanged, so the function is
/// idempotent: a successfully repaired string contains no replacement
/// characters and passes through untouched on a second call.
pub fn normalize_text(text: &str) -> String {
    if !text.contains(REPLACEMENT) {
        return text.to_string();
    }

    // Reinterpret the mangled string byte-wise and retry as GBK, mirroring
    // the latin1 round-trip the reference platform needs.
    let bytes: Vec<u8> = text
        .chars()
        .map(|c| if (c as u32) <= 0xFF { c as u8 } else { b'?' })
        .collect();

    match GBK.decode_without_bom_handling_and_without_replacement(&bytes) {
        Some(Cow::Borrowed(s)) => s.to_string(),
        Some(Cow::Owned(s)) if !s.contains(REPLACEMENT) => s,
        _ => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_bytes_pass_through() {
        assert_eq!(normalize_bytes(b"OK"), "OK");
        assert_eq!(normalize_bytes(b""), "");
    }

    #[test]
    fn gbk_bytes_decode_to_chinese() {
        // "你好" encoded as GBK
        let gbk = [0xC4u8, 0xE3, 0xBA, 0xC3];
        assert_eq!(normalize_bytes(&gbk), "\u{4F60}\u{597D}");
    }

    #[test]
    fn invalid_everything_falls_back_to_lossy_utf8() {
        // 0x81 0x40 is valid GBK, but a lone 0xFF is not valid in either
        // encoding; the lossy fallback must still return something.
        let junk = [0xFFu8, 0xFF, 0x00];
        let out = normalize_bytes(&junk);
        assert!(!out.is_empty());
    }

    #[test]
    fn clean_text_is_unchanged() {
        assert_eq!(normalize_text("hello world"), "hello world");
        assert_eq!(normalize_text("\u{4F60}\u{597D}"), "\u{4F60}\u{597D}");
    }

    #[test]
    fn normalize_text_is_idempotent() {
        for input in ["plain", "bad \u{FFFD} text", "\u{4F60}\u{597D}", ""] {
            let once = normalize_text(input);
            let twice = normalize_text(&once);
            assert_eq!(once, twice);
        }
    }
}
