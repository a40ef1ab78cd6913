use async_trait::async_trait;

use crate::{
    entities::media::{format_file_size, MediaKind, ProcessedMedia, RawFile},
    errors::MediaError,
    media::{image_compressor::ImageCompressor, video_transcoder::VideoTranscoder},
    repositories::media_processor::MediaProcessor,
};

/// Dispatches on media kind: images are recompressed in-process,
/// videos go through ffmpeg.
#[derive(Debug, Clone)]
pub struct MediaPipeline {
    images: ImageCompressor,
    videos: VideoTranscoder,
}

impl MediaPipeline {
    pub fn new(images: ImageCompressor, videos: VideoTranscoder) -> Self {
        MediaPipeline { images, videos }
    }

    pub fn with_ffmpeg(ffmpeg_path: &str) -> Result<Self, MediaError> {
        Ok(MediaPipeline::new(ImageCompressor::default(), VideoTranscoder::new(ffmpeg_path)?))
    }
}

#[async_trait]
impl MediaProcessor for MediaPipeline {
    async fn process(&self, file: RawFile) -> Result<ProcessedMedia, MediaError> {
        let original = file.size();

        let processed = match file.kind() {
            Some(MediaKind::Image) => {
                let compressor = self.images;
                tokio::task::spawn_blocking(move || compressor.compress(&file.bytes))
                    .await
                    .map_err(|e| MediaError::Encode(format!("Compression task failed: {}", e)))??
            }
            Some(MediaKind::Video) => self.videos.transcode(&file.bytes).await?,
            None => {
                return Err(MediaError::Unsupported(format!(
                    "Unsupported content type: {}",
                    file.content_type
                )));
            }
        };

        tracing::info!(
            kind = processed.kind.as_str(),
            original = %format_file_size(original),
            processed = %format_file_size(processed.size()),
            "Media processed"
        );
        Ok(processed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unknown_kind_is_rejected_before_processing() {
        let pipeline = MediaPipeline::with_ffmpeg("ffmpeg").unwrap();
        let err = pipeline
            .process(RawFile::new("notes.pdf", "application/pdf", vec![1, 2, 3]))
            .await
            .unwrap_err();

        assert!(matches!(err, MediaError::Unsupported(_)));
    }
}
