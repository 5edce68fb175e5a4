use crate::detection::domain::emotion_classifier::EmotionClassifier;
use crate::detection::domain::emotion_detector::{DetectionResult, EmotionDetector};
use crate::detection::domain::face_detector::FaceDetector;
use crate::shared::frame::Frame;

/// Emotion detector built from a face localizer and a per-face classifier.
///
/// Faces come out in the localizer's order. Boxes that fall entirely outside
/// the frame are dropped since there is nothing to classify.
pub struct TwoStageEmotionDetector {
    localizer: Box<dyn FaceDetector>,
    classifier: Box<dyn EmotionClassifier>,
}

impl TwoStageEmotionDetector {
    pub fn new(localizer: Box<dyn FaceDetector>, classifier: Box<dyn EmotionClassifier>) -> Self {
        Self {
            localizer,
            classifier,
        }
    }
}

impl EmotionDetector for TwoStageEmotionDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<DetectionResult>, Box<dyn std::error::Error>> {
        let faces = self.localizer.detect(frame)?;
        let mut results = Vec::with_capacity(faces.len());
        for face in faces {
            let Some(crop) = frame.crop(&face.face_box) else {
                log::debug!("Skipping face outside frame: {:?}", face.face_box);
                continue;
            };
            log::debug!("Face at {:?} (score {:.2})", face.face_box, face.score);
            let emotions = self.classifier.classify(&crop)?;
            results.push(DetectionResult {
                face_box: face.face_box,
                emotions,
            });
        }
        Ok(results)
    }
}
