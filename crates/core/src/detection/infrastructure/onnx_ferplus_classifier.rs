/// FER+ emotion classifier using ONNX Runtime.
///
/// The model takes a 64×64 single-channel face in raw 0–255 intensities and
/// emits eight unnormalized scores, turned into probabilities with softmax.
use std::path::Path;

use image::imageops::{self, FilterType};
use image::{GrayImage, RgbImage};

use crate::detection::domain::emotion::{Emotion, EmotionScores};
use crate::detection::domain::emotion_classifier::EmotionClassifier;
use crate::shared::frame::Frame;

use super::execution_provider::load_session;
use super::math::softmax;

const INPUT_SIZE: u32 = 64;

/// Output order of the FER+ model.
const LABELS: [&str; 8] = [
    "neutral",
    "happiness",
    "surprise",
    "sadness",
    "anger",
    "disgust",
    "fear",
    "contempt",
];

pub struct OnnxFerPlusClassifier {
    session: ort::session::Session,
}

impl OnnxFerPlusClassifier {
    pub fn new(model_path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Self {
            session: load_session(model_path)?,
        })
    }
}

impl EmotionClassifier for OnnxFerPlusClassifier {
    fn classify(&mut self, face: &Frame) -> Result<EmotionScores, Box<dyn std::error::Error>> {
        let input = preprocess(face)?;
        let input_value = ort::value::Tensor::from_array(input)?;
        let outputs = self.session.run(ort::inputs![input_value])?;
        if outputs.len() == 0 {
            return Err("FER+ model produced no outputs".into());
        }
        let logits = outputs[0].try_extract_array::<f32>()?;
        let logits = logits.as_slice().ok_or("Cannot get logits slice")?;
        if logits.len() != LABELS.len() {
            return Err(format!(
                "FER+ model returned {} scores, expected {}",
                logits.len(),
                LABELS.len()
            )
            .into());
        }

        Ok(LABELS
            .iter()
            .zip(softmax(logits))
            .map(|(label, p)| (Emotion::parse(label), p))
            .collect())
    }
}

/// Grayscale + resize to the model's `[1, 1, 64, 64]` input.
fn preprocess(face: &Frame) -> Result<ndarray::Array4<f32>, Box<dyn std::error::Error>> {
    if face.channels() != 3 {
        return Err(format!("Expected an RGB face crop, got {} channels", face.channels()).into());
    }
    let rgb = RgbImage::from_raw(face.width(), face.height(), face.data().to_vec())
        .ok_or("Face crop is not a packed RGB buffer")?;
    let gray: GrayImage = imageops::grayscale(&rgb);
    let resized = imageops::resize(&gray, INPUT_SIZE, INPUT_SIZE, FilterType::Triangle);

    let size = INPUT_SIZE as usize;
    let pixels: Vec<f32> = resized.into_raw().into_iter().map(f32::from).collect();
    Ok(ndarray::Array4::from_shape_vec((1, 1, size, size), pixels)?)
}
