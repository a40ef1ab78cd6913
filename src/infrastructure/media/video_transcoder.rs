use std::{path::Path, process::Stdio};

use tokio::process::Command;

use crate::{
    constants::{AUDIO_BITRATE, VIDEO_CRF, VIDEO_MAX_HEIGHT_PX, VIDEO_MAX_WIDTH_PX, VIDEO_PRESET},
    entities::media::{MediaKind, ProcessedMedia},
    errors::MediaError,
};

/// Re-encodes uploads to H.264/AAC MP4 within 1280x720 using an external ffmpeg.
#[derive(Debug, Clone)]
pub struct VideoTranscoder {
    ffmpeg_path: String,
}

impl VideoTranscoder {
    pub fn new(ffmpeg_path: impl Into<String>) -> Result<Self, MediaError> {
        let ffmpeg_path = ffmpeg_path.into();

        if ffmpeg_path.is_empty()
            || ffmpeg_path.contains("..")
            || !ffmpeg_path.chars().all(|c| {
                c.is_alphanumeric() || matches!(c, '/' | '\\' | '-' | '_' | '.' | ':')
            })
        {
            return Err(MediaError::Unsupported(format!(
                "Invalid ffmpeg path: {}",
                ffmpeg_path
            )));
        }

        Ok(VideoTranscoder { ffmpeg_path })
    }

    /// Arguments for one transcode run. Dimensions are capped, never enlarged,
    /// and rounded to even numbers as libx264 requires.
    pub fn transcode_args(input: &Path, output: &Path) -> Vec<String> {
        let scale = format!(
            "scale='min({w},iw)':'min({h},ih)':force_original_aspect_ratio=decrease,\
             scale=trunc(iw/2)*2:trunc(ih/2)*2",
            w = VIDEO_MAX_WIDTH_PX,
            h = VIDEO_MAX_HEIGHT_PX,
        );

        vec![
            "-y".into(),
            "-i".into(),
            input.to_string_lossy().into_owned(),
            "-c:v".into(),
            "libx264".into(),
            "-crf".into(),
            VIDEO_CRF.to_string(),
            "-preset".into(),
            VIDEO_PRESET.into(),
            "-vf".into(),
            scale,
            "-c:a".into(),
            "aac".into(),
            "-b:a".into(),
            AUDIO_BITRATE.into(),
            "-movflags".into(),
            "+faststart".into(),
            "-f".into(),
            "mp4".into(),
            output.to_string_lossy().into_owned(),
        ]
    }

    #[tracing::instrument(skip(self, bytes), fields(input_size = bytes.len()))]
    pub async fn transcode(&self, bytes: &[u8]) -> Result<ProcessedMedia, MediaError> {
        let started = std::time::Instant::now();

        let input = tempfile::NamedTempFile::new()?;
        tokio::fs::write(input.path(), bytes).await?;

        let output = tempfile::Builder::new().suffix(".mp4").tempfile()?;

        let result = Command::new(&self.ffmpeg_path)
            .args(Self::transcode_args(input.path(), output.path()))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| MediaError::Transcode(format!("Failed to execute ffmpeg: {}", e)))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            let tail: String = stderr.lines().rev().take(5).collect::<Vec<_>>().join(" | ");
            return Err(MediaError::Transcode(tail));
        }

        let encoded = tokio::fs::read(output.path()).await?;
        if encoded.is_empty() {
            return Err(MediaError::Transcode("ffmpeg produced an empty file".to_string()));
        }

        tracing::info!(
            duration_ms = started.elapsed().as_millis() as u64,
            output_size = encoded.len(),
            "Video transcoded"
        );

        Ok(ProcessedMedia {
            kind: MediaKind::Video,
            bytes: encoded.into(),
            content_type: "video/mp4",
            extension: "mp4",
            width: None,
            height: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn rejects_suspicious_binary_paths() {
        assert!(VideoTranscoder::new("ffmpeg; rm -rf /").is_err());
        assert!(VideoTranscoder::new("../ffmpeg").is_err());
        assert!(VideoTranscoder::new("").is_err());
        assert!(VideoTranscoder::new("/usr/local/bin/ffmpeg").is_ok());
    }

    #[test]
    fn args_encode_fixed_targets() {
        let args = VideoTranscoder::transcode_args(&PathBuf::from("/tmp/in"), &PathBuf::from("/tmp/out.mp4"));
        let joined = args.join(" ");

        assert!(joined.contains("-c:v libx264"));
        assert!(joined.contains("-crf 28"));
        assert!(joined.contains("-c:a aac -b:a 128k"));
        assert!(joined.contains("min(1280,iw)"));
        assert!(joined.contains("min(720,ih)"));
        assert!(joined.contains("force_original_aspect_ratio=decrease"));
        assert_eq!(args.last().map(String::as_str), Some("/tmp/out.mp4"));
    }

    #[tokio::test]
    async fn missing_binary_is_a_transcode_error() {
        let transcoder = VideoTranscoder::new("/nonexistent/ffmpeg-binary").unwrap();
        let err = transcoder.transcode(b"not really a video").await.unwrap_err();
        assert!(matches!(err, MediaError::Transcode(_)));
    }
}
