use crate::shared::face_box::FaceBox;
use crate::shared::frame::Frame;

/// A face located in a frame, before any emotion is assigned.
#[derive(Clone, Debug, PartialEq)]
pub struct LocatedFace {
    pub face_box: FaceBox,
    pub score: f64,
}

/// Domain interface for face localization.
///
/// Implementations may hold inference sessions, hence `&mut self`.
pub trait FaceDetector: Send {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<LocatedFace>, Box<dyn std::error::Error>>;
}
