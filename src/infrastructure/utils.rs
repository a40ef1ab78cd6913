pub mod blob_name;
pub mod sniff;
