use async_trait::async_trait;

use crate::{
    entities::media::{ProcessedMedia, RawFile},
    errors::MediaError,
};

/// Normalizes a picked file (resize, recompress, transcode) before upload.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaProcessor: Send + Sync {
    async fn process(&self, file: RawFile) -> Result<ProcessedMedia, MediaError>;
}
