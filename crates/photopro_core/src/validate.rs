/// Largest upload the server accepts.
pub const MAX_UPLOAD_BYTES: u64 = 20 * 1024 * 1024;

/// Declared media types accepted without looking at the file name.
pub const ALLOWED_MEDIA_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/webp",
    "image/bmp",
    "image/heic",
    "image/heif",
];

/// HEIC/HEIF files are often declared with an empty or generic media type,
/// so their extension alone is enough.
const HEIF_EXTENSIONS: &[&str] = &[".heic", ".heif"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadCandidate<'a> {
    pub name: &'a str,
    pub media_type: Option<&'a str>,
    pub size_bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please choose an image in a supported format (PNG, JPG, WEBP, BMP, HEIC).")]
    UnsupportedType,
    #[error(
        "Maximum file size: {}MB. Your file: {}MB",
        MAX_UPLOAD_BYTES / 1024 / 1024,
        size_mb(.size_bytes)
    )]
    TooLarge { size_bytes: u64 },
}

impl ValidationError {
    pub fn title(&self) -> &'static str {
        match self {
            ValidationError::UnsupportedType => "Unsupported file format",
            ValidationError::TooLarge { .. } => "File too large",
        }
    }
}

/// Type first, then size.
pub fn validate_upload(candidate: &UploadCandidate<'_>) -> Result<(), ValidationError> {
    let type_allowed = candidate
        .media_type
        .is_some_and(|media_type| ALLOWED_MEDIA_TYPES.contains(&media_type));
    if !type_allowed && !has_heif_extension(candidate.name) {
        return Err(ValidationError::UnsupportedType);
    }
    if candidate.size_bytes > MAX_UPLOAD_BYTES {
        return Err(ValidationError::TooLarge {
            size_bytes: candidate.size_bytes,
        });
    }
    Ok(())
}

fn size_mb(bytes: &u64) -> String {
    crate::format_mb(*bytes)
}

fn has_heif_extension(name: &str) -> bool {
    let lowered = name.to_ascii_lowercase();
    HEIF_EXTENSIONS.iter().any(|ext| lowered.ends_with(ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate<'a>(name: &'a str, media_type: Option<&'a str>, size: u64) -> UploadCandidate<'a> {
        UploadCandidate {
            name,
            media_type,
            size_bytes: size,
        }
    }

    #[test]
    fn accepts_every_allowed_media_type() {
        for media_type in ALLOWED_MEDIA_TYPES {
            assert_eq!(
                validate_upload(&candidate("x.bin", Some(media_type), 10)),
                Ok(())
            );
        }
    }

    #[test]
    fn heif_name_overrides_unknown_type() {
        assert_eq!(validate_upload(&candidate("IMG_1.HEIC", None, 10)), Ok(()));
        assert_eq!(
            validate_upload(&candidate("photo.heif", Some("application/octet-stream"), 10)),
            Ok(())
        );
    }

    #[test]
    fn rejects_other_types() {
        assert_eq!(
            validate_upload(&candidate("doc.gif", Some("image/gif"), 10)),
            Err(ValidationError::UnsupportedType)
        );
        assert_eq!(
            validate_upload(&candidate("heic.txt", None, 10)),
            Err(ValidationError::UnsupportedType)
        );
    }

    #[test]
    fn type_is_checked_before_size() {
        assert_eq!(
            validate_upload(&candidate("a.gif", Some("image/gif"), MAX_UPLOAD_BYTES * 2)),
            Err(ValidationError::UnsupportedType)
        );
    }

    #[test]
    fn cap_itself_is_accepted() {
        assert_eq!(
            validate_upload(&candidate("a.png", Some("image/png"), MAX_UPLOAD_BYTES)),
            Ok(())
        );
    }

    #[test]
    fn oversize_message_carries_two_decimal_size() {
        let err = validate_upload(&candidate(
            "a.png",
            Some("image/png"),
            MAX_UPLOAD_BYTES + 5 * 1024 * 1024 + 1024 * 1024 / 4,
        ))
        .unwrap_err();
        assert_eq!(err.title(), "File too large");
        assert_eq!(
            err.to_string(),
            "Maximum file size: 20MB. Your file: 25.25MB"
        );
    }
}
