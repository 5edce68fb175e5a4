pub mod execution_provider;
pub mod math;
pub mod model_resolver;
pub mod onnx_ferplus_classifier;
pub mod onnx_yolo_detector;
pub mod two_stage_emotion_detector;

use std::path::Path;

use crate::detection::domain::emotion_detector::EmotionDetector;

use onnx_ferplus_classifier::OnnxFerPlusClassifier;
use onnx_yolo_detector::OnnxYoloDetector;
use two_stage_emotion_detector::TwoStageEmotionDetector;

/// Builds the default detector: YOLO face localization followed by FER+.
pub fn build_emotion_detector(
    face_model: &Path,
    emotion_model: &Path,
    face_confidence: f64,
) -> Result<Box<dyn EmotionDetector>, Box<dyn std::error::Error>> {
    let localizer = OnnxYoloDetector::new(face_model, face_confidence)?;
    let classifier = OnnxFerPlusClassifier::new(emotion_model)?;
    Ok(Box::new(TwoStageEmotionDetector::new(
        Box::new(localizer),
        Box::new(classifier),
    )))
}
