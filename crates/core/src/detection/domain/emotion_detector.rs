use crate::detection::domain::emotion::EmotionScores;
use crate::shared::face_box::FaceBox;
use crate::shared::frame::Frame;

/// One face found by an [`EmotionDetector`].
#[derive(Clone, Debug, PartialEq)]
pub struct DetectionResult {
    pub face_box: FaceBox,
    pub emotions: EmotionScores,
}

/// Domain interface for the opaque face + emotion detector.
///
/// Returns every face found, in the detector's native order. Finding no
/// faces is `Ok(vec![])`, not an error.
pub trait EmotionDetector: Send {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<DetectionResult>, Box<dyn std::error::Error>>;
}
