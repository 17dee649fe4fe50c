/// Extension to MIME type, for blobs stored without a content type.
const EXTENSION_TABLE: &[(&str, &str)] = &[
    (".mp3", "audio/mpeg"),
    (".wav", "audio/wav"),
    (".ogg", "audio/ogg"),
    (".m4a", "audio/mp4"),
    (".png", "image/png"),
    (".jpg", "image/jpeg"),
    (".jpeg", "image/jpeg"),
    (".webp", "image/webp"),
    (".gif", "image/gif"),
];

pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Infer a content type from a storage key's file extension.
pub fn infer_from_key(key: &str) -> &'static str {
    for (extension, content_type) in EXTENSION_TABLE {
        if key.ends_with(extension) {
            return content_type;
        }
    }
    DEFAULT_CONTENT_TYPE
}

/// Stored metadata wins; the extension table is the fallback.
pub fn resolve(stored: Option<&str>, key: &str) -> String {
    match stored {
        Some(content_type) if !content_type.is_empty() => content_type.to_string(),
        _ => infer_from_key(key).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_extensions() {
        assert_eq!(infer_from_key("audio/tts-combined.mp3"), "audio/mpeg");
        assert_eq!(infer_from_key("notes/voice.wav"), "audio/wav");
        assert_eq!(infer_from_key("a.ogg"), "audio/ogg");
        assert_eq!(infer_from_key("a.m4a"), "audio/mp4");
        assert_eq!(infer_from_key("artwork/cover.png"), "image/png");
        assert_eq!(infer_from_key("photo.jpg"), "image/jpeg");
        assert_eq!(infer_from_key("photo.jpeg"), "image/jpeg");
        assert_eq!(infer_from_key("photo.webp"), "image/webp");
        assert_eq!(infer_from_key("anim.gif"), "image/gif");
    }

    #[test]
    fn test_unknown_extension_defaults_to_octet_stream() {
        assert_eq!(infer_from_key("data.bin"), DEFAULT_CONTENT_TYPE);
        assert_eq!(infer_from_key("no-extension"), DEFAULT_CONTENT_TYPE);
    }

    #[test]
    fn test_stored_metadata_takes_precedence() {
        assert_eq!(resolve(Some("audio/flac"), "track.mp3"), "audio/flac");
        assert_eq!(resolve(None, "track.mp3"), "audio/mpeg");
        assert_eq!(resolve(Some(""), "track.mp3"), "audio/mpeg");
    }
}
