use serde::Serialize;

use crate::{
    entities::media::{FileSizes, MediaKind, ProcessedMedia, RawFile, UploadPolicy},
    errors::{AppError, MediaError},
    repositories::media_processor::MediaProcessor,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotState {
    Empty,
    Compressing,
    Ready,
    Submitting,
}

/// One file input of the admin forms: select → compress → preview → submit → reset.
#[derive(Debug, Clone)]
pub struct UploadSlot {
    policy: UploadPolicy,
    preview_path: String,
    state: SlotState,
    file_name: Option<String>,
    processed: Option<ProcessedMedia>,
    sizes: Option<FileSizes>,
    selections: u64,
}

/// What the panel shows for the slot. The processed bytes stay server-side;
/// `preview_url` points at the endpoint that serves them.
#[derive(Debug, Clone, Serialize)]
pub struct UploadSlotView {
    pub state: SlotState,
    pub file_name: Option<String>,
    pub kind: Option<MediaKind>,
    pub content_type: Option<&'static str>,
    pub sizes: Option<FileSizes>,
    pub preview_url: Option<String>,
}

/// Why a selection did not reach `Ready`.
#[derive(Debug)]
pub enum SelectError {
    Busy,
    Rejected(String),
    Processing { kind: MediaKind, error: MediaError },
}

impl From<SelectError> for AppError {
    fn from(err: SelectError) -> Self {
        match err {
            SelectError::Busy => AppError::Conflict("An upload is already in progress".to_string()),
            SelectError::Rejected(message) => AppError::invalid("file", message),
            SelectError::Processing { error, .. } => AppError::from(error),
        }
    }
}

impl UploadSlot {
    /// `preview_path` is where the processed file can be fetched while the slot holds one.
    pub fn new(policy: UploadPolicy, preview_path: impl Into<String>) -> Self {
        UploadSlot {
            policy,
            preview_path: preview_path.into(),
            state: SlotState::Empty,
            file_name: None,
            processed: None,
            sizes: None,
            selections: 0,
        }
    }

    pub fn state(&self) -> SlotState {
        self.state
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.state, SlotState::Compressing | SlotState::Submitting)
    }

    pub fn sizes(&self) -> Option<FileSizes> {
        self.sizes
    }

    pub fn processed(&self) -> Option<&ProcessedMedia> {
        self.processed.as_ref()
    }

    /// Validates the pick, then runs it through the processor.
    /// Any failure leaves the slot `Empty`.
    pub async fn select_file<P>(&mut self, file: RawFile, processor: &P) -> Result<FileSizes, SelectError>
    where
        P: MediaProcessor + ?Sized,
    {
        if self.is_busy() {
            return Err(SelectError::Busy);
        }

        let kind = match self.policy.check(&file) {
            Ok(kind) => kind,
            Err(message) => {
                self.reset();
                return Err(SelectError::Rejected(message));
            }
        };

        self.reset();
        self.state = SlotState::Compressing;
        self.file_name = Some(file.name.clone());
        let original = file.size();

        match processor.process(file).await {
            Ok(processed) => {
                let sizes = FileSizes {
                    original,
                    processed: processed.size(),
                };
                self.processed = Some(processed);
                self.sizes = Some(sizes);
                self.selections += 1;
                self.state = SlotState::Ready;
                Ok(sizes)
            }
            Err(error) => {
                tracing::error!("Error processing {}: {}", kind.as_str(), error);
                self.reset();
                Err(SelectError::Processing { kind, error })
            }
        }
    }

    /// `Ready → Submitting`, handing out the media to upload. The buffer is shared, not copied.
    pub fn begin_submit(&mut self) -> Option<ProcessedMedia> {
        if self.state != SlotState::Ready {
            return None;
        }
        self.state = SlotState::Submitting;
        self.processed.clone()
    }

    /// `Submitting → Empty` on success, `Submitting → Ready` otherwise.
    pub fn finish_submit(&mut self, succeeded: bool) {
        if self.state != SlotState::Submitting {
            return;
        }
        if succeeded {
            self.reset();
        } else {
            self.state = SlotState::Ready;
        }
    }

    pub fn reset(&mut self) {
        self.state = SlotState::Empty;
        self.file_name = None;
        self.processed = None;
        self.sizes = None;
    }

    pub fn view(&self) -> UploadSlotView {
        let processed = self.processed.as_ref();
        UploadSlotView {
            state: self.state,
            file_name: self.file_name.clone(),
            kind: processed.map(|p| p.kind),
            content_type: processed.map(|p| p.content_type),
            sizes: self.sizes,
            // The counter keeps a browser from showing the previous pick's cached preview.
            preview_url: processed.map(|_| format!("{}?v={}", self.preview_path, self.selections)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::media_processor::MockMediaProcessor;

    const PREVIEW: &str = "/api/v1/admin/events/preview";

    fn jpeg(size: usize) -> ProcessedMedia {
        ProcessedMedia {
            kind: MediaKind::Image,
            bytes: vec![0xFF; size].into(),
            content_type: "image/jpeg",
            extension: "jpg",
            width: Some(800),
            height: Some(600),
        }
    }

    #[tokio::test]
    async fn disallowed_type_never_reaches_processor() {
        let mut processor = MockMediaProcessor::new();
        processor.expect_process().times(0);

        let mut slot = UploadSlot::new(UploadPolicy::IMAGES_ONLY, PREVIEW);
        let result = slot
            .select_file(RawFile::new("doc.pdf", "application/pdf", vec![1; 64]), &processor)
            .await;

        assert!(matches!(result, Err(SelectError::Rejected(_))));
        assert_eq!(slot.state(), SlotState::Empty);
    }

    #[tokio::test]
    async fn successful_processing_makes_slot_ready() {
        let mut processor = MockMediaProcessor::new();
        processor
            .expect_process()
            .times(1)
            .returning(|_| Ok(jpeg(1_000)));

        let mut slot = UploadSlot::new(UploadPolicy::IMAGES_ONLY, PREVIEW);
        let sizes = slot
            .select_file(RawFile::new("photo.png", "image/png", vec![7; 4_000]), &processor)
            .await
            .unwrap();

        assert_eq!(sizes, FileSizes { original: 4_000, processed: 1_000 });
        assert_eq!(slot.state(), SlotState::Ready);
        let view = slot.view();
        assert_eq!(view.file_name.as_deref(), Some("photo.png"));
        assert_eq!(view.content_type, Some("image/jpeg"));
        assert_eq!(view.preview_url.as_deref(), Some("/api/v1/admin/events/preview?v=1"));
    }

    #[tokio::test]
    async fn view_carries_a_handle_not_the_bytes() {
        let mut processor = MockMediaProcessor::new();
        processor.expect_process().returning(|_| {
            Ok(ProcessedMedia {
                kind: MediaKind::Video,
                bytes: vec![0x42; 8 * 1024 * 1024].into(),
                content_type: "video/mp4",
                extension: "mp4",
                width: None,
                height: None,
            })
        });

        let mut slot = UploadSlot::new(UploadPolicy::IMAGES_AND_VIDEO, "/api/v1/admin/posters/preview");
        slot.select_file(RawFile::new("teaser.mov", "video/quicktime", vec![1; 64]), &processor)
            .await
            .unwrap();
        slot.select_file(RawFile::new("teaser2.mov", "video/quicktime", vec![1; 64]), &processor)
            .await
            .unwrap();

        let json = serde_json::to_string(&slot.view()).unwrap();
        assert!(json.len() < 512, "panel view grew to {} bytes", json.len());
        assert!(json.contains(r#""preview_url":"/api/v1/admin/posters/preview?v=2""#));

        let handed_out = slot.begin_submit().unwrap();
        assert_eq!(handed_out.bytes.as_ptr(), slot.processed().unwrap().bytes.as_ptr());
    }

    #[tokio::test]
    async fn processing_failure_returns_to_empty() {
        let mut processor = MockMediaProcessor::new();
        processor
            .expect_process()
            .returning(|_| Err(MediaError::Decode("corrupt".into())));

        let mut slot = UploadSlot::new(UploadPolicy::IMAGES_ONLY, PREVIEW);
        let result = slot
            .select_file(RawFile::new("photo.png", "image/png", vec![7; 10]), &processor)
            .await;

        assert!(matches!(result, Err(SelectError::Processing { kind: MediaKind::Image, .. })));
        assert_eq!(slot.state(), SlotState::Empty);
        assert!(slot.processed().is_none());
    }

    #[tokio::test]
    async fn submit_lifecycle() {
        let mut processor = MockMediaProcessor::new();
        processor.expect_process().returning(|_| Ok(jpeg(10)));

        let mut slot = UploadSlot::new(UploadPolicy::IMAGES_ONLY, PREVIEW);
        assert!(slot.begin_submit().is_none());

        slot.select_file(RawFile::new("a.png", "image/png", vec![1; 20]), &processor)
            .await
            .unwrap();

        assert!(slot.begin_submit().is_some());
        assert_eq!(slot.state(), SlotState::Submitting);
        assert!(slot.is_busy());

        slot.finish_submit(false);
        assert_eq!(slot.state(), SlotState::Ready);
        assert!(slot.processed().is_some());

        slot.begin_submit();
        slot.finish_submit(true);
        assert_eq!(slot.state(), SlotState::Empty);
        assert!(slot.sizes().is_none());
        assert!(slot.view().preview_url.is_none());
    }
}
