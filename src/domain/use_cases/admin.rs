use serde::Serialize;
use validator::Validate;

use crate::{
    constants::{EVENT_PREVIEW_PATH, POSTER_PREVIEW_PATH},
    entities::{
        event::{EventFields, EventRecord},
        media::{FileSizes, MediaKind, ProcessedMedia, RawFile, UploadPolicy},
        poster::{NewPoster, PosterRecord},
        status::{StatusBanner, StatusMessage},
    },
    errors::{AppError, FieldError, StoreError},
    repositories::{
        blob_store::BlobStore,
        media_processor::MediaProcessor,
        record_store::{Collection, RecordStore},
    },
    use_cases::upload_slot::{SelectError, UploadSlot, UploadSlotView},
    utils::blob_name::{blob_name_from_url, generate_blob_name},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeleteOutcome {
    Cancelled,
    Deleted,
}

#[derive(Debug, Clone, Serialize)]
pub struct EventPanelView {
    pub fields: EventFields,
    pub slot: UploadSlotView,
    pub events: Vec<EventRecord>,
    pub loading: bool,
    pub status: Option<StatusMessage>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PosterPanelView {
    pub slot: UploadSlotView,
    pub posters: Vec<PosterRecord>,
    pub loading: bool,
    pub status: Option<StatusMessage>,
}

/// Admin form for events: image only, with title, date and description.
pub struct EventAdmin<S, B, P> {
    store: S,
    blobs: B,
    processor: P,
    bucket: String,
    fields: EventFields,
    slot: UploadSlot,
    events: Vec<EventRecord>,
    loading: bool,
    status: StatusBanner,
}

impl<S, B, P> EventAdmin<S, B, P>
where
    S: RecordStore,
    B: BlobStore,
    P: MediaProcessor,
{
    pub fn new(store: S, blobs: B, processor: P, bucket: impl Into<String>) -> Self {
        EventAdmin {
            store,
            blobs,
            processor,
            bucket: bucket.into(),
            fields: EventFields::default(),
            slot: UploadSlot::new(UploadPolicy::IMAGES_ONLY, EVENT_PREVIEW_PATH),
            events: Vec::new(),
            loading: false,
            status: StatusBanner::default(),
        }
    }

    pub fn events(&self) -> &[EventRecord] {
        &self.events
    }

    pub fn fields(&self) -> &EventFields {
        &self.fields
    }

    pub fn slot(&self) -> &UploadSlot {
        &self.slot
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.current()
    }

    /// Re-fetches the full listing.
    pub async fn refresh(&mut self) -> Result<&[EventRecord], AppError> {
        self.loading = true;
        let result = self.store.list_events().await;
        self.loading = false;

        match result {
            Ok(events) => {
                self.events = events;
                Ok(&self.events)
            }
            Err(e) => {
                tracing::error!("Error fetching events: {}", e);
                self.status.error("Failed to load events");
                Err(e.into())
            }
        }
    }

    /// Listing reload after a write. A failure leaves the write's banner in
    /// place and the previous listing showing.
    async fn reload_after_change(&mut self) {
        self.loading = true;
        let result = self.store.list_events().await;
        self.loading = false;

        match result {
            Ok(events) => self.events = events,
            Err(e) => tracing::warn!("Event listing is stale after a change: {}", e),
        }
    }

    pub fn set_fields(&mut self, fields: EventFields) {
        self.fields = fields;
    }

    pub async fn select_file(&mut self, file: RawFile) -> Result<FileSizes, AppError> {
        select_into(&mut self.slot, &self.processor, &mut self.status, file).await
    }

    pub fn clear_selection(&mut self) {
        self.slot.reset();
    }

    /// Uploads the processed image, then inserts the event pointing at it.
    ///
    /// An upload that succeeds followed by a failed insert leaves the blob
    /// orphaned; fields and selection stay populated for a retry.
    pub async fn submit(&mut self) -> Result<EventRecord, AppError> {
        if self.slot.is_busy() {
            return Err(AppError::Conflict("An upload is already in progress".to_string()));
        }

        let mut problems = match self.fields.validate() {
            Ok(()) => Vec::new(),
            Err(errors) => match AppError::from(errors) {
                AppError::ValidationError(list) => list,
                _ => Vec::new(),
            },
        };
        let media = match self.slot.begin_submit() {
            Some(media) if problems.is_empty() => media,
            Some(_) => {
                self.slot.finish_submit(false);
                return Err(self.reject_submit(problems));
            }
            None => {
                problems.push(FieldError {
                    field: "file".to_string(),
                    message: "Please select an image".to_string(),
                });
                return Err(self.reject_submit(problems));
            }
        };

        let result = match upload_processed(&self.blobs, &self.bucket, &media).await {
            Ok(image_url) => {
                let new_event = self.fields.clone().into_new_event(image_url);
                self.store.insert_event(&new_event).await
            }
            Err(e) => Err(e),
        };

        match result {
            Ok(record) => {
                self.slot.finish_submit(true);
                self.fields = EventFields::default();
                self.status.success("Event added successfully!");
                tracing::info!(id = record.id, "Event created");
                self.reload_after_change().await;
                Ok(record)
            }
            Err(e) => {
                tracing::error!("Error adding event: {}", e);
                self.slot.finish_submit(false);
                self.status.error("Failed to add event. Please try again.");
                Err(e.into())
            }
        }
    }

    fn reject_submit(&mut self, problems: Vec<FieldError>) -> AppError {
        self.status.error("Please fill all fields and select an image");
        AppError::ValidationError(problems)
    }

    /// Removes the image, then the row. Nothing happens without confirmation.
    pub async fn delete(&mut self, id: i64, confirmed: bool) -> Result<DeleteOutcome, AppError> {
        if !confirmed {
            return Ok(DeleteOutcome::Cancelled);
        }

        if !self.events.iter().any(|e| e.id == id) {
            self.refresh().await?;
        }
        let image_url = self.events
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.image_url.clone())
            .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

        match remove_media_then_record(&self.store, &self.blobs, &self.bucket, Collection::Events, id, &image_url).await {
            Ok(()) => {
                self.status.success("Event and image deleted successfully");
                self.reload_after_change().await;
                Ok(DeleteOutcome::Deleted)
            }
            Err(DeleteFailure::Blob(e)) => {
                self.status.error("Failed to delete image from storage");
                Err(e.into())
            }
            Err(DeleteFailure::Record(e)) => {
                self.status.error("Failed to delete event");
                Err(e.into())
            }
        }
    }

    pub fn view(&self) -> EventPanelView {
        EventPanelView {
            fields: self.fields.clone(),
            slot: self.slot.view(),
            events: self.events.clone(),
            loading: self.loading,
            status: self.status.current().cloned(),
        }
    }
}

/// Admin form for posters: a single image or video, no text fields.
pub struct PosterAdmin<S, B, P> {
    store: S,
    blobs: B,
    processor: P,
    bucket: String,
    slot: UploadSlot,
    posters: Vec<PosterRecord>,
    loading: bool,
    status: StatusBanner,
}

impl<S, B, P> PosterAdmin<S, B, P>
where
    S: RecordStore,
    B: BlobStore,
    P: MediaProcessor,
{
    pub fn new(store: S, blobs: B, processor: P, bucket: impl Into<String>) -> Self {
        PosterAdmin {
            store,
            blobs,
            processor,
            bucket: bucket.into(),
            slot: UploadSlot::new(UploadPolicy::IMAGES_AND_VIDEO, POSTER_PREVIEW_PATH),
            posters: Vec::new(),
            loading: false,
            status: StatusBanner::default(),
        }
    }

    pub fn posters(&self) -> &[PosterRecord] {
        &self.posters
    }

    pub fn slot(&self) -> &UploadSlot {
        &self.slot
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.current()
    }

    pub async fn refresh(&mut self) -> Result<&[PosterRecord], AppError> {
        self.loading = true;
        let result = self.store.list_posters().await;
        self.loading = false;

        match result {
            Ok(posters) => {
                self.posters = posters;
                Ok(&self.posters)
            }
            Err(e) => {
                tracing::error!("Error fetching posters: {}", e);
                self.status.error("Failed to load posters");
                Err(e.into())
            }
        }
    }

    async fn reload_after_change(&mut self) {
        self.loading = true;
        let result = self.store.list_posters().await;
        self.loading = false;

        match result {
            Ok(posters) => self.posters = posters,
            Err(e) => tracing::warn!("Poster listing is stale after a change: {}", e),
        }
    }

    pub async fn select_file(&mut self, file: RawFile) -> Result<FileSizes, AppError> {
        select_into(&mut self.slot, &self.processor, &mut self.status, file).await
    }

    pub fn clear_selection(&mut self) {
        self.slot.reset();
    }

    pub async fn submit(&mut self) -> Result<PosterRecord, AppError> {
        if self.slot.is_busy() {
            return Err(AppError::Conflict("An upload is already in progress".to_string()));
        }

        let Some(media) = self.slot.begin_submit() else {
            self.status.error("Please select an image or video");
            return Err(AppError::invalid("file", "Please select an image or video"));
        };

        let result = match upload_processed(&self.blobs, &self.bucket, &media).await {
            Ok(media_url) => {
                let new_poster = NewPoster {
                    media_url,
                    media_type: media.kind,
                };
                self.store.insert_poster(&new_poster).await
            }
            Err(e) => Err(e),
        };

        match result {
            Ok(record) => {
                self.slot.finish_submit(true);
                self.status.success("Poster added successfully!");
                tracing::info!(id = record.id, kind = record.media_type.as_str(), "Poster created");
                self.reload_after_change().await;
                Ok(record)
            }
            Err(e) => {
                tracing::error!("Error adding poster: {}", e);
                self.slot.finish_submit(false);
                self.status.error("Failed to add poster. Please try again.");
                Err(e.into())
            }
        }
    }

    pub async fn delete(&mut self, id: i64, confirmed: bool) -> Result<DeleteOutcome, AppError> {
        if !confirmed {
            return Ok(DeleteOutcome::Cancelled);
        }

        if !self.posters.iter().any(|p| p.id == id) {
            self.refresh().await?;
        }
        let media_url = self.posters
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.media_url.clone())
            .ok_or_else(|| AppError::NotFound("Poster not found".to_string()))?;

        match remove_media_then_record(&self.store, &self.blobs, &self.bucket, Collection::Posters, id, &media_url).await {
            Ok(()) => {
                self.status.success("Poster and media deleted successfully");
                self.reload_after_change().await;
                Ok(DeleteOutcome::Deleted)
            }
            Err(DeleteFailure::Blob(e)) => {
                self.status.error("Failed to delete media from storage");
                Err(e.into())
            }
            Err(DeleteFailure::Record(e)) => {
                self.status.error("Failed to delete poster");
                Err(e.into())
            }
        }
    }

    pub fn view(&self) -> PosterPanelView {
        PosterPanelView {
            slot: self.slot.view(),
            posters: self.posters.clone(),
            loading: self.loading,
            status: self.status.current().cloned(),
        }
    }
}

async fn select_into<P>(
    slot: &mut UploadSlot,
    processor: &P,
    status: &mut StatusBanner,
    file: RawFile,
) -> Result<FileSizes, AppError>
where
    P: MediaProcessor,
{
    match slot.select_file(file, processor).await {
        Ok(sizes) => {
            let kind = slot.processed().map(|p| p.kind).unwrap_or(MediaKind::Image);
            status.success(format!(
                "{} compressed! Size reduced by {:.1}%",
                kind.label(),
                sizes.reduction_percent()
            ));
            Ok(sizes)
        }
        Err(err) => {
            match &err {
                SelectError::Busy => {}
                SelectError::Rejected(message) => status.error(message.clone()),
                SelectError::Processing { kind: MediaKind::Image, .. } => status.error("Failed to compress image"),
                SelectError::Processing { kind: MediaKind::Video, .. } => status.error("Failed to process media"),
            }
            Err(err.into())
        }
    }
}

async fn upload_processed<B>(blobs: &B, bucket: &str, media: &ProcessedMedia) -> Result<String, StoreError>
where
    B: BlobStore,
{
    let name = generate_blob_name(media.extension);
    blobs.put(bucket, &name, media.bytes.clone(), media.content_type).await?;
    Ok(blobs.public_url(bucket, &name))
}

enum DeleteFailure {
    Blob(StoreError),
    Record(StoreError),
}

/// Blob first; a failed blob removal keeps the row. A failed row removal
/// after the blob is gone is not rolled back.
async fn remove_media_then_record<S, B>(
    store: &S,
    blobs: &B,
    bucket: &str,
    collection: Collection,
    id: i64,
    media_url: &str,
) -> Result<(), DeleteFailure>
where
    S: RecordStore,
    B: BlobStore,
{
    let name = blob_name_from_url(media_url).ok_or_else(|| {
        DeleteFailure::Blob(StoreError::Decode(format!("No object name in {}", media_url)))
    })?;

    if let Err(e) = blobs.remove(bucket, &name).await {
        tracing::error!("Storage deletion error: {}", e);
        return Err(DeleteFailure::Blob(e));
    }

    store.delete(collection, id).await.map_err(|e| {
        tracing::error!(table = collection.table(), id, "Record deletion failed after blob removal: {}", e);
        DeleteFailure::Record(e)
    })
}
