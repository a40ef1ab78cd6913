mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;
pub mod background_task;

pub use domain::{entities, use_cases};
pub use interfaces::{handlers, repositories, routes};
pub use infrastructure::{media, utils};

use tokio::sync::Mutex;

use errors::AppError;
use media::pipeline::MediaPipeline;
use repositories::{
    blob_store::SupabaseBlobStore,
    form_webhook::SheetsWebhook,
    record_store::SupabaseRecordStore,
    supabase::SupabaseClient,
};
use settings::AppConfig;
use use_cases::admin::{EventAdmin, PosterAdmin};

pub type AppEventAdmin = EventAdmin<SupabaseRecordStore, SupabaseBlobStore, MediaPipeline>;
pub type AppPosterAdmin = PosterAdmin<SupabaseRecordStore, SupabaseBlobStore, MediaPipeline>;

pub struct AppState {
    pub config: AppConfig,
    pub records: SupabaseRecordStore,
    pub webhook: SheetsWebhook,
    pub event_admin: Mutex<AppEventAdmin>,
    pub poster_admin: Mutex<AppPosterAdmin>,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Result<Self, AppError> {
        let client = SupabaseClient::new(&config.supabase_url, &config.supabase_key)?;
        let records = SupabaseRecordStore::new(client.clone());
        let blobs = SupabaseBlobStore::new(client);
        let pipeline = MediaPipeline::with_ffmpeg(&config.ffmpeg_path)?;

        let event_admin = EventAdmin::new(
            records.clone(),
            blobs.clone(),
            pipeline.clone(),
            config.events_bucket.clone(),
        );
        let poster_admin = PosterAdmin::new(
            records.clone(),
            blobs,
            pipeline,
            config.posters_bucket.clone(),
        );

        Ok(AppState {
            config: config.clone(),
            records,
            webhook: SheetsWebhook::new(&config.form_webhook_url),
            event_admin: Mutex::new(event_admin),
            poster_admin: Mutex::new(poster_admin),
        })
    }
}
