pub mod emotion;
pub mod emotion_classifier;
pub mod emotion_detector;
pub mod face_detector;
