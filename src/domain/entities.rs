pub mod contact;
pub mod event;
pub mod media;
pub mod poster;
pub mod route;
pub mod status;
