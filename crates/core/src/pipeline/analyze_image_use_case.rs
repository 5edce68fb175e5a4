use std::time::Instant;

use chrono::NaiveDateTime;

use crate::detection::domain::emotion_detector::EmotionDetector;
use crate::history::domain::history_log::HistoryLog;
use crate::imaging::domain::image_decoder::{DecodeError, ImageDecoder};
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::pipeline::result_formatter::{FaceCard, ResultFormatter};
use crate::shared::frame::Frame;

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("Failed to encode frame: {0}")]
    Encode(String),
    #[error("Emotion detection failed: {0}")]
    Detection(String),
}

/// Cards for one image and the frame to display alongside them.
#[derive(Clone, Debug)]
pub struct Analysis {
    pub cards: Vec<FaceCard>,
    pub frame: Frame,
}

/// Single-image analysis: decode → detect → format → log → annotate.
pub struct AnalyzeImageUseCase {
    decoder: Box<dyn ImageDecoder>,
    detector: Box<dyn EmotionDetector>,
    formatter: ResultFormatter,
    logger: Box<dyn PipelineLogger>,
}

impl AnalyzeImageUseCase {
    pub fn new(
        decoder: Box<dyn ImageDecoder>,
        detector: Box<dyn EmotionDetector>,
        formatter: ResultFormatter,
        logger: Box<dyn PipelineLogger>,
    ) -> Self {
        Self {
            decoder,
            detector,
            formatter,
            logger,
        }
    }

    /// Analyzes one encoded image.
    ///
    /// Boxes are drawn onto `frame` when the caller supplies the raw pixels
    /// the bytes were encoded from, otherwise onto the decoded image. A
    /// failed call leaves `history` untouched.
    pub fn execute(
        &mut self,
        bytes: &[u8],
        frame: Option<Frame>,
        history: &mut dyn HistoryLog,
        now: NaiveDateTime,
    ) -> Result<Analysis, AnalysisError> {
        let t0 = Instant::now();
        let decoded = self.decoder.decode(bytes)?;
        self.logger.timing("decode", elapsed_ms(t0));

        let t0 = Instant::now();
        let detections = self
            .detector
            .detect(&decoded)
            .map_err(|e| AnalysisError::Detection(e.to_string()))?;
        self.logger.timing("detect", elapsed_ms(t0));

        let mut frame = frame.unwrap_or(decoded);
        let t0 = Instant::now();
        let cards = self
            .formatter
            .format(&detections, now, history, Some(&mut frame));
        self.logger.timing("format", elapsed_ms(t0));

        self.logger.metric("faces", detections.len() as f64);
        self.logger.metric("cards", cards.len() as f64);
        self.logger.frame_done(frame.index());

        Ok(Analysis { cards, frame })
    }

    pub fn logger(&mut self) -> &mut dyn PipelineLogger {
        self.logger.as_mut()
    }
}

fn elapsed_ms(since: Instant) -> f64 {
    since.elapsed().as_secs_f64() * 1000.0
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::detection::domain::emotion::{Emotion, EmotionScores};
    use crate::detection::domain::emotion_detector::DetectionResult;
    use crate::imaging::domain::frame_annotator::NullFrameAnnotator;
    use crate::imaging::infrastructure::image_codec::ImageCrateDecoder;
    use crate::pipeline::pipeline_logger::NullPipelineLogger;
    use crate::shared::face_box::FaceBox;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Detector that returns the same faces for every frame.
    pub struct FixedDetector {
        pub results: Vec<DetectionResult>,
        pub calls: Arc<AtomicUsize>,
    }

    impl EmotionDetector for FixedDetector {
        fn detect(
            &mut self,
            _frame: &Frame,
        ) -> Result<Vec<DetectionResult>, Box<dyn std::error::Error>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.results.clone())
        }
    }

    pub fn happy_detection() -> DetectionResult {
        DetectionResult {
            face_box: FaceBox::new(10, 10, 50, 50),
            emotions: EmotionScores::new(vec![
                (Emotion::Happy, 0.82),
                (Emotion::Sad, 0.10),
                (Emotion::Neutral, 0.08),
            ]),
        }
    }

    pub fn analyzer(results: Vec<DetectionResult>, threshold: f64) -> (AnalyzeImageUseCase, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let use_case = AnalyzeImageUseCase::new(
            Box::new(ImageCrateDecoder::new()),
            Box::new(FixedDetector {
                results,
                calls: calls.clone(),
            }),
            ResultFormatter::new(threshold, Box::new(NullFrameAnnotator)),
            Box::new(NullPipelineLogger),
        );
        (use_case, calls)
    }
}
