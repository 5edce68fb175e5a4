use crate::detection::domain::emotion::EmotionScores;
use crate::shared::frame::Frame;

/// Domain interface for classifying the emotion of an already-cropped face.
pub trait EmotionClassifier: Send {
    fn classify(&mut self, face: &Frame) -> Result<EmotionScores, Box<dyn std::error::Error>>;
}
