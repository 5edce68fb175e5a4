pub mod frame_annotator;
pub mod image_decoder;
pub mod image_writer;
