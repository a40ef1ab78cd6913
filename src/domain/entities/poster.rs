use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::media::MediaKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PosterRecord {
    pub id: i64,
    pub media_url: String,
    pub media_type: MediaKind,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewPoster {
    pub media_url: String,
    pub media_type: MediaKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_store_row() {
        let row = r#"{
            "id": 7,
            "media_url": "https://cdn.example.com/p/abc-1.mp4",
            "media_type": "video",
            "created_at": "2024-05-10T12:00:00+00:00"
        }"#;

        let poster: PosterRecord = serde_json::from_str(row).unwrap();
        assert_eq!(poster.id, 7);
        assert_eq!(poster.media_type, MediaKind::Video);
    }
}
