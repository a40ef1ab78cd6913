use std::time::Duration;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

pub static START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

pub const MIB: u64 = 1024 * 1024;

// Carousel
pub const DESKTOP_BREAKPOINT_PX: u32 = 768;
pub const DESKTOP_ITEMS_PER_VIEW: usize = 3;
pub const MOBILE_ITEMS_PER_VIEW: usize = 1;
pub const SWIPE_THRESHOLD_PX: f64 = 75.0;
pub const EVENTS_ROTATION_PERIOD: Duration = Duration::from_secs(4);
pub const POSTERS_ROTATION_PERIOD: Duration = Duration::from_secs(5);

// Upload limits, checked before any processing
pub const MAX_IMAGE_UPLOAD_BYTES: u64 = 10 * MIB;
pub const MAX_MEDIA_UPLOAD_BYTES: u64 = 100 * MIB;

// Image compression targets
pub const IMAGE_TARGET_BYTES: u64 = MIB;
pub const IMAGE_MAX_EDGE_PX: u32 = 1920;
pub const IMAGE_START_QUALITY: u8 = 90;
pub const IMAGE_MIN_QUALITY: u8 = 40;
pub const IMAGE_QUALITY_STEP: u8 = 10;

// Video transcoding targets
pub const VIDEO_MAX_WIDTH_PX: u32 = 1280;
pub const VIDEO_MAX_HEIGHT_PX: u32 = 720;
pub const VIDEO_CRF: u8 = 28;
pub const VIDEO_PRESET: &str = "fast";
pub const AUDIO_BITRATE: &str = "128k";

// Processed file previews, served back to the admin panel
pub const EVENT_PREVIEW_PATH: &str = "/api/v1/admin/events/preview";
pub const POSTER_PREVIEW_PATH: &str = "/api/v1/admin/posters/preview";

// Blob uploads
pub const BLOB_CACHE_CONTROL: &str = "3600";

pub const STATUS_DISMISS_AFTER: Duration = Duration::from_secs(5);
