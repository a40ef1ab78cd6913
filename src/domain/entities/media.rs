use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::constants::{MAX_IMAGE_UPLOAD_BYTES, MAX_MEDIA_UPLOAD_BYTES};

/// Kind of media a poster (or upload) carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Classifies a MIME type by its top-level prefix.
    pub fn from_mime(content_type: &str) -> Option<Self> {
        let lower = content_type.trim().to_ascii_lowercase();
        if lower.starts_with("image/") {
            Some(MediaKind::Image)
        } else if lower.starts_with("video/") {
            Some(MediaKind::Video)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MediaKind::Image => "Image",
            MediaKind::Video => "Video",
        }
    }
}

/// A file as the user picked it, before any processing.
#[derive(Clone, PartialEq)]
pub struct RawFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl RawFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        RawFile {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn kind(&self) -> Option<MediaKind> {
        MediaKind::from_mime(&self.content_type)
    }
}

impl std::fmt::Debug for RawFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawFile")
            .field("name", &self.name)
            .field("content_type", &self.content_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// Output of the media processor, ready for upload. Clones share the buffer.
#[derive(Clone, PartialEq)]
pub struct ProcessedMedia {
    pub kind: MediaKind,
    pub bytes: Bytes,
    pub content_type: &'static str,
    pub extension: &'static str,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl ProcessedMedia {
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

impl std::fmt::Debug for ProcessedMedia {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessedMedia")
            .field("kind", &self.kind)
            .field("content_type", &self.content_type)
            .field("size", &self.bytes.len())
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FileSizes {
    pub original: u64,
    pub processed: u64,
}

impl FileSizes {
    /// Percentage saved relative to the original, one decimal place.
    /// Negative when processing grew the file.
    pub fn reduction_percent(&self) -> f64 {
        if self.original == 0 {
            return 0.0;
        }
        let pct = (self.original as f64 - self.processed as f64) / self.original as f64 * 100.0;
        (pct * 10.0).round() / 10.0
    }
}

/// Which MIME prefixes and sizes an upload slot accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadPolicy {
    pub allow_video: bool,
    pub max_bytes: u64,
}

impl UploadPolicy {
    pub const IMAGES_ONLY: UploadPolicy = UploadPolicy {
        allow_video: false,
        max_bytes: MAX_IMAGE_UPLOAD_BYTES,
    };

    pub const IMAGES_AND_VIDEO: UploadPolicy = UploadPolicy {
        allow_video: true,
        max_bytes: MAX_MEDIA_UPLOAD_BYTES,
    };

    /// Returns the accepted kind, or the user-facing rejection message.
    pub fn check(&self, file: &RawFile) -> Result<MediaKind, String> {
        let kind = match (file.kind(), self.allow_video) {
            (Some(MediaKind::Image), _) => MediaKind::Image,
            (Some(MediaKind::Video), true) => MediaKind::Video,
            (_, false) => return Err("Please select an image file".to_string()),
            (_, true) => return Err("Please select an image or video file".to_string()),
        };

        if file.size() > self.max_bytes {
            let limit = format!("{}MB", self.max_bytes / (1024 * 1024));
            return Err(match self.allow_video {
                false => format!("Image size should be less than {}", limit),
                true => format!("File size should be less than {}", limit),
            });
        }

        Ok(kind)
    }
}

/// Human-readable size in 1024 steps, two decimals at most.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    const UNITS: [&str; 3] = ["Bytes", "KB", "MB"];
    let k = 1024f64;
    let i = ((bytes as f64).ln() / k.ln()).floor() as usize;
    let i = i.min(UNITS.len() - 1);
    let value = (bytes as f64 / k.powi(i as i32) * 100.0).round() / 100.0;
    format!("{} {}", value, UNITS[i])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_mime_prefixes() {
        assert_eq!(MediaKind::from_mime("image/png"), Some(MediaKind::Image));
        assert_eq!(MediaKind::from_mime("Video/MP4"), Some(MediaKind::Video));
        assert_eq!(MediaKind::from_mime("application/pdf"), None);
    }

    #[test]
    fn media_kind_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&MediaKind::Video).unwrap(), "\"video\"");
    }

    #[test]
    fn image_policy_rejects_video_and_oversize() {
        let video = RawFile::new("clip.mp4", "video/mp4", vec![0; 10]);
        assert_eq!(
            UploadPolicy::IMAGES_ONLY.check(&video),
            Err("Please select an image file".to_string())
        );

        let big = RawFile::new("big.png", "image/png", vec![0; (MAX_IMAGE_UPLOAD_BYTES + 1) as usize]);
        assert_eq!(
            UploadPolicy::IMAGES_ONLY.check(&big),
            Err("Image size should be less than 10MB".to_string())
        );
    }

    #[test]
    fn media_policy_accepts_video() {
        let video = RawFile::new("clip.mp4", "video/mp4", vec![0; 10]);
        assert_eq!(UploadPolicy::IMAGES_AND_VIDEO.check(&video), Ok(MediaKind::Video));

        let doc = RawFile::new("notes.txt", "text/plain", vec![0; 10]);
        assert!(UploadPolicy::IMAGES_AND_VIDEO.check(&doc).is_err());
    }

    #[test]
    fn formats_sizes() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(512), "512 Bytes");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(3 * 1024 * 1024), "3 MB");
    }

    #[test]
    fn reduction_percent_rounds_to_one_decimal() {
        let sizes = FileSizes { original: 3000, processed: 1000 };
        assert_eq!(sizes.reduction_percent(), 66.7);
    }
}
