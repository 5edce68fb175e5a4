pub mod box_annotator;
pub mod image_codec;
pub mod image_file_writer;
