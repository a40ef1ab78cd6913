pub mod image_compressor;
pub mod pipeline;
pub mod video_transcoder;
