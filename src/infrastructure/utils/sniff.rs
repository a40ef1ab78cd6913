/// Content type for an uploaded part.
///
/// The declared type wins unless it is missing or generic
/// (`application/octet-stream`); then the magic bytes decide.
pub fn resolve_content_type(declared: Option<&str>, bytes: &[u8]) -> String {
    match declared.map(str::trim) {
        Some(ct) if !ct.is_empty() && ct != "application/octet-stream" => ct.to_string(),
        _ => infer::get(bytes)
            .map(|kind| kind.mime_type().to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

    #[test]
    fn declared_type_is_kept() {
        assert_eq!(resolve_content_type(Some("video/mp4"), PNG_MAGIC), "video/mp4");
    }

    #[test]
    fn generic_type_falls_back_to_magic_bytes() {
        assert_eq!(resolve_content_type(Some("application/octet-stream"), PNG_MAGIC), "image/png");
        assert_eq!(resolve_content_type(None, PNG_MAGIC), "image/png");
        assert_eq!(resolve_content_type(None, b"plain"), "application/octet-stream");
    }
}
