//! Validation rules for uploaded proof images.

use thiserror::Error;

/// Errors raised while validating a proof image upload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MediaError {
    /// The uploaded part is not an image.
    #[error("uploaded file must be an image, got '{content_type}'")]
    NotAnImage {
        /// The rejected content type.
        content_type: String,
    },

    /// The image exceeds the configured byte cap.
    #[error("image size {size} bytes exceeds maximum allowed {max} bytes")]
    TooLarge {
        /// Actual size in bytes.
        size: u64,
        /// Configured maximum in bytes.
        max: u64,
    },
}

/// Policy applied to each uploaded proof image.
#[derive(Debug, Clone, Copy)]
pub struct MediaPolicy {
    /// Maximum accepted image size in bytes.
    pub max_bytes: u64,
}

impl MediaPolicy {
    /// Creates a policy with the given byte cap.
    #[must_use]
    pub const fn new(max_bytes: u64) -> Self {
        Self { max_bytes }
    }

    /// Validates a single uploaded image.
    ///
    /// # Errors
    ///
    /// * `MediaError::NotAnImage` for non-image content types
    /// * `MediaError::TooLarge` when the byte cap is exceeded
    pub fn validate(&self, content_type: &str, size: u64) -> Result<(), MediaError> {
        if !content_type.starts_with("image/") {
            return Err(MediaError::NotAnImage {
                content_type: content_type.to_string(),
            });
        }
        if size > self.max_bytes {
            return Err(MediaError::TooLarge {
                size,
                max: self.max_bytes,
            });
        }
        Ok(())
    }
}

/// Maps an image content type to a storage file extension.
#[must_use]
pub fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/png" => "png",
        "image/webp" => "webp",
        "image/gif" => "gif",
        "image/heic" => "heic",
        _ => "bin",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const FIVE_MIB: u64 = 5 * 1024 * 1024;

    #[test]
    fn test_accepts_image_within_cap() {
        let policy = MediaPolicy::new(FIVE_MIB);
        assert!(policy.validate("image/jpeg", 1024).is_ok());
    }

    #[test]
    fn test_rejects_non_image() {
        let policy = MediaPolicy::new(FIVE_MIB);
        assert_eq!(
            policy.validate("application/pdf", 1024),
            Err(MediaError::NotAnImage {
                content_type: "application/pdf".to_string()
            })
        );
    }

    #[test]
    fn test_rejects_oversized_image() {
        let policy = MediaPolicy::new(FIVE_MIB);
        assert_eq!(
            policy.validate("image/png", FIVE_MIB + 1),
            Err(MediaError::TooLarge {
                size: FIVE_MIB + 1,
                max: FIVE_MIB
            })
        );
    }

    #[test]
    fn test_exact_cap_is_allowed() {
        let policy = MediaPolicy::new(FIVE_MIB);
        assert!(policy.validate("image/webp", FIVE_MIB).is_ok());
    }

    #[rstest]
    #[case("image/jpeg", "jpg")]
    #[case("image/png", "png")]
    #[case("image/webp", "webp")]
    #[case("image/gif", "gif")]
    #[case("image/x-unknown", "bin")]
    fn test_extension_mapping(#[case] mime: &str, #[case] ext: &str) {
        assert_eq!(extension_for(mime), ext);
    }
}
