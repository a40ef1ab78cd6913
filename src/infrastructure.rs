pub mod media;
pub mod utils;
