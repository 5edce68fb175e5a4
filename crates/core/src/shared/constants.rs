use std::time::Duration;

pub const FACE_MODEL_NAME: &str = "yolo11n-pose_widerface.onnx";
pub const FACE_MODEL_URL: &str =
    "https://github.com/neutrinographics/faceguard/releases/download/v0.1.0/yolo11n-pose_widerface.onnx";

pub const EMOTION_MODEL_NAME: &str = "emotion-ferplus-8.onnx";
pub const EMOTION_MODEL_URL: &str =
    "https://github.com/onnx/models/raw/main/validated/vision/body_analysis/emotion_ferplus/model/emotion-ferplus-8.onnx";

/// Minimum dominant-emotion confidence (0-100 scale) for a face to be reported.
pub const DEFAULT_THRESHOLD: f64 = 50.0;

/// Default face localizer confidence (0.0-1.0).
pub const DEFAULT_FACE_CONFIDENCE: f64 = 0.5;

/// Image types accepted for upload.
pub const UPLOAD_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Fixed export location, relative to the working directory.
pub const HISTORY_EXPORT_FILENAME: &str = "emotion_history.csv";

pub const DEFAULT_CAMERA_INDEX: u32 = 0;

/// Lets auto-exposure settle before a snapshot is taken.
pub const CAPTURE_WARMUP: Duration = Duration::from_secs(1);

pub const LIVE_INTERVAL: Duration = Duration::from_secs(5);
pub const LIVE_BUDGET: Duration = Duration::from_secs(60);

pub const JPEG_QUALITY: u8 = 95;
