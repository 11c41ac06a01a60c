//! Uploaded photo bytes and their data URL encoding.

use crate::error::ClassificationError;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Declared format of an uploaded photo, sniffed from its magic bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Jpeg,
    Png,
    /// Anything else. Still sent; the adapter does not enforce a format.
    Unknown,
}

impl ImageFormat {
    /// Sniff the format from the leading bytes.
    pub fn detect(bytes: &[u8]) -> Self {
        match ::image::guess_format(bytes) {
            Ok(::image::ImageFormat::Jpeg) => ImageFormat::Jpeg,
            Ok(::image::ImageFormat::Png) => ImageFormat::Png,
            _ => ImageFormat::Unknown,
        }
    }

    /// MIME type matching the detected format.
    pub fn media_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg | ImageFormat::Unknown => "image/jpeg",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageFormat::Jpeg => write!(f, "jpeg"),
            ImageFormat::Png => write!(f, "png"),
            ImageFormat::Unknown => write!(f, "unknown"),
        }
    }
}

/// How the data URL media type is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaTypePolicy {
    /// Always `image/jpeg`, PNG uploads included.
    #[default]
    #[serde(alias = "always_jpeg")]
    Jpeg,
    /// Use the sniffed format's MIME type.
    Detected,
}

/// Raw bytes of one uploaded photo. Lives for a single request.
#[derive(Clone)]
pub struct ImageAsset {
    bytes: Vec<u8>,
    format: ImageFormat,
}

impl ImageAsset {
    /// Wrap raw bytes. Empty input is rejected before any request is built.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, ClassificationError> {
        if bytes.is_empty() {
            return Err(ClassificationError::InvalidImage {
                path: "<memory>".into(),
                message: "image is empty".to_string(),
            });
        }
        let format = ImageFormat::detect(&bytes);
        Ok(Self { bytes, format })
    }

    /// Read an image file from disk.
    pub fn from_path(path: &Path) -> Result<Self, ClassificationError> {
        let bytes = std::fs::read(path).map_err(|e| ClassificationError::InvalidImage {
            path: path.to_path_buf(),
            message: format!("Cannot read file: {e}"),
        })?;
        if bytes.is_empty() {
            return Err(ClassificationError::InvalidImage {
                path: path.to_path_buf(),
                message: "File is empty".to_string(),
            });
        }
        let format = ImageFormat::detect(&bytes);
        if format == ImageFormat::Unknown {
            tracing::warn!("{:?} is neither JPEG nor PNG, sending anyway", path);
        }
        Ok(Self { bytes, format })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Base64 data URL for the chat `image_url` part.
    pub fn data_url(&self, policy: MediaTypePolicy) -> String {
        let media_type = match policy {
            MediaTypePolicy::Jpeg => "image/jpeg",
            MediaTypePolicy::Detected => self.format.media_type(),
        };
        encode_data_url(&self.bytes, media_type)
    }
}

impl fmt::Debug for ImageAsset {
    // Keep multi-megabyte byte dumps out of logs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageAsset")
            .field("len", &self.bytes.len())
            .field("format", &self.format)
            .finish()
    }
}

/// Encode bytes as `data:<media_type>;base64,<payload>`.
pub fn encode_data_url(bytes: &[u8], media_type: &str) -> String {
    format!(
        "data:{};base64,{}",
        media_type,
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

/// Split a base64 data URL back into its media type and bytes.
pub fn decode_data_url(url: &str) -> Option<(String, Vec<u8>)> {
    let rest = url.strip_prefix("data:")?;
    let (header, payload) = rest.split_once(',')?;
    let media_type = header.strip_suffix(";base64")?;
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload)
        .ok()?;
    Some((media_type.to_string(), bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    const JPEG_STUB: [u8; 10] = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];
    const PNG_STUB: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_detect_jpeg() {
        assert_eq!(ImageFormat::detect(&JPEG_STUB), ImageFormat::Jpeg);
    }

    #[test]
    fn test_detect_png() {
        assert_eq!(ImageFormat::detect(&PNG_STUB), ImageFormat::Png);
    }

    #[test]
    fn test_detect_unknown() {
        assert_eq!(ImageFormat::detect(b"hello world"), ImageFormat::Unknown);
    }

    #[test]
    fn test_empty_bytes_rejected() {
        let err = ImageAsset::from_bytes(Vec::new()).unwrap_err();
        assert_eq!(err.kind(), "invalid_image");
    }

    #[test]
    fn test_jpeg_data_url() {
        let asset = ImageAsset::from_bytes(JPEG_STUB.to_vec()).unwrap();
        let url = asset.data_url(MediaTypePolicy::Jpeg);
        assert!(url.starts_with("data:image/jpeg;base64,"));
        assert_eq!(url, asset.data_url(MediaTypePolicy::Detected));
    }

    #[test]
    fn test_png_labelled_jpeg_by_default() {
        let asset = ImageAsset::from_bytes(PNG_STUB.to_vec()).unwrap();
        assert_eq!(asset.format(), ImageFormat::Png);
        assert!(asset
            .data_url(MediaTypePolicy::default())
            .starts_with("data:image/jpeg;base64,"));
    }

    #[test]
    fn test_png_detected_policy_uses_png_media_type() {
        let asset = ImageAsset::from_bytes(PNG_STUB.to_vec()).unwrap();
        assert!(asset
            .data_url(MediaTypePolicy::Detected)
            .starts_with("data:image/png;base64,"));
    }

    #[test]
    fn test_data_url_round_trip() {
        let bytes: Vec<u8> = (0u8..=255).collect();
        let url = encode_data_url(&bytes, "image/jpeg");
        let (media_type, decoded) = decode_data_url(&url).unwrap();
        assert_eq!(media_type, "image/jpeg");
        assert_eq!(decoded, bytes);
    }

    #[test]
    fn test_decode_rejects_non_data_url() {
        assert!(decode_data_url("https://example.com/a.jpg").is_none());
        assert!(decode_data_url("data:image/jpeg,notbase64").is_none());
    }

    #[test]
    fn test_from_path_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("customer.jpg");
        std::fs::write(&path, JPEG_STUB).unwrap();
        let asset = ImageAsset::from_path(&path).unwrap();
        assert_eq!(asset.len(), 10);
        assert_eq!(asset.format(), ImageFormat::Jpeg);
    }

    #[test]
    fn test_from_path_missing_file() {
        let err = ImageAsset::from_path(Path::new("/nonexistent/customer.jpg")).unwrap_err();
        assert!(matches!(err, ClassificationError::InvalidImage { .. }));
    }

    #[test]
    fn test_from_path_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.png");
        std::fs::write(&path, []).unwrap();
        let err = ImageAsset::from_path(&path).unwrap_err();
        assert!(err.to_string().contains("empty"));
    }
}
