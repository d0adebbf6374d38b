//! Shared plumbing for the form view-models: required-field checks and the
//! locally held image file with its same-device preview.

use bytes::Bytes;
use lazy_static::lazy_static;
use regex::Regex;

use crate::error::AppError;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Presence check for a text field; trims before testing.
pub(crate) fn required<'a>(value: &'a str, field: &'static str) -> Result<&'a str, AppError> {
    let value = value.trim();
    if value.is_empty() {
        Err(AppError::MissingField(field))
    } else {
        Ok(value)
    }
}

/// An image file chosen into a form, held in memory until submit.
#[derive(Debug, Clone)]
pub struct SelectedImage {
    pub file_name: String,
    pub content_type: String,
    pub body: Bytes,
}

/// Same-device render of the chosen file. No network call is involved.
#[derive(Debug, Clone, Copy)]
pub struct ImagePreview<'a> {
    pub file_name: &'a str,
    pub content_type: &'a str,
    pub body: &'a Bytes,
}

impl SelectedImage {
    pub fn preview(&self) -> ImagePreview<'_> {
        ImagePreview {
            file_name: &self.file_name,
            content_type: &self.content_type,
            body: &self.body,
        }
    }

    /// Extension used when deriving the stored object path. Taken from the
    /// file name, with the content type as fallback.
    pub fn ext(&self) -> &str {
        match self.file_name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => ext,
            _ => ext_from_mime(&self.content_type).unwrap_or("bin"),
        }
    }
}

fn ext_from_mime(ct: &str) -> Option<&'static str> {
    match ct {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/heic" => Some("heic"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ext_from_mime() {
        assert_eq!(ext_from_mime("image/jpeg"), Some("jpg"));
        assert_eq!(ext_from_mime("image/jpg"), Some("jpg"));
        assert_eq!(ext_from_mime("image/png"), Some("png"));
        assert_eq!(ext_from_mime("image/webp"), Some("webp"));
        assert_eq!(ext_from_mime("application/octet-stream"), None);
    }

    #[test]
    fn ext_prefers_file_name_over_mime() {
        let img = SelectedImage {
            file_name: "dinner.png".into(),
            content_type: "image/jpeg".into(),
            body: Bytes::from_static(b"x"),
        };
        assert_eq!(img.ext(), "png");

        let no_ext = SelectedImage {
            file_name: "dinner".into(),
            content_type: "image/webp".into(),
            body: Bytes::from_static(b"x"),
        };
        assert_eq!(no_ext.ext(), "webp");

        let unknown = SelectedImage {
            file_name: "dinner".into(),
            content_type: "application/octet-stream".into(),
            body: Bytes::from_static(b"x"),
        };
        assert_eq!(unknown.ext(), "bin");
    }

    #[test]
    fn required_rejects_blank_values() {
        assert!(matches!(
            required("   ", "meal_name"),
            Err(AppError::MissingField("meal_name"))
        ));
        assert_eq!(required(" toast ", "meal_name").unwrap(), "toast");
    }

    #[test]
    fn preview_is_a_view_of_the_held_file() {
        let img = SelectedImage {
            file_name: "lunch.jpg".into(),
            content_type: "image/jpeg".into(),
            body: Bytes::from_static(b"pixels"),
        };
        let preview = img.preview();
        assert_eq!(preview.file_name, "lunch.jpg");
        assert_eq!(preview.body.as_ref(), b"pixels");
    }
}
