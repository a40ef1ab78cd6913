pub mod blob_store;
pub mod form_webhook;
pub mod media_processor;
pub mod record_store;
pub mod supabase;
