//! Plain-text extraction: UTF-8 with a lossy fallback for stray encodings.

pub fn extract_txt(bytes: &[u8]) -> String {
    String::from_utf8(bytes.to_vec()).unwrap_or_else(|_| String::from_utf8_lossy(bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_utf8_passes_through() {
        assert_eq!(extract_txt("Ünïcödé text".as_bytes()), "Ünïcödé text");
    }

    #[test]
    fn invalid_utf8_is_replaced_not_rejected() {
        let text = extract_txt(&[0x48, 0x69, 0xFF, 0xFE]);
        assert!(text.starts_with("Hi"));
        assert!(text.contains('\u{FFFD}'));
    }

    #[test]
    fn empty_input() {
        assert_eq!(extract_txt(b""), "");
    }
}
