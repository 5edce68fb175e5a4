use crate::shared::face_box::FaceBox;
use crate::shared::frame::Frame;

/// Draws a face box and its caption onto a frame in place.
pub trait FrameAnnotator: Send {
    fn annotate(&self, frame: &mut Frame, face_box: &FaceBox, label: &str);
}

/// Leaves frames untouched.
pub struct NullFrameAnnotator;

impl FrameAnnotator for NullFrameAnnotator {
    fn annotate(&self, _frame: &mut Frame, _face_box: &FaceBox, _label: &str) {}
}
