pub mod admin;
pub mod carousel;
pub mod contact;
pub mod upload_slot;
