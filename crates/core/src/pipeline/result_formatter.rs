use chrono::NaiveDateTime;

use crate::detection::domain::emotion::Emotion;
use crate::detection::domain::emotion_detector::DetectionResult;
use crate::history::domain::history_entry::HistoryEntry;
use crate::history::domain::history_log::HistoryLog;
use crate::imaging::domain::frame_annotator::FrameAnnotator;
use crate::shared::face_box::FaceBox;
use crate::shared::frame::Frame;

/// Presentable result for one face that met the threshold.
#[derive(Clone, Debug, PartialEq)]
pub struct FaceCard {
    /// 1-based position in the detector's output, counting dropped faces too.
    pub index: u32,
    pub emotion: Emotion,
    /// Dominant probability on a 0-100 scale.
    pub confidence: f64,
    pub message: String,
    pub face_box: FaceBox,
}

impl FaceCard {
    pub fn title(&self) -> String {
        format!("Face {}", self.index)
    }

    /// Width of the confidence bar in whole percent.
    pub fn bar_percent(&self) -> u32 {
        self.confidence.round().clamp(0.0, 100.0) as u32
    }

    pub fn confidence_text(&self) -> String {
        format!("Confidence: {:.1}%", self.confidence)
    }

    /// Caption drawn above the face box.
    pub fn caption(&self) -> String {
        format!("{} ({:.1}%)", self.emotion.capitalized(), self.confidence)
    }
}

/// Turns raw detections into face cards, history entries, and annotations.
pub struct ResultFormatter {
    threshold: f64,
    annotator: Box<dyn FrameAnnotator>,
}

impl ResultFormatter {
    pub fn new(threshold: f64, annotator: Box<dyn FrameAnnotator>) -> Self {
        Self {
            threshold,
            annotator,
        }
    }

    /// Formats detections in order.
    ///
    /// Faces whose dominant confidence is below the threshold are skipped
    /// entirely. Every card produced is also appended to `history`, and drawn
    /// onto `frame` when one is given.
    pub fn format(
        &self,
        detections: &[DetectionResult],
        now: NaiveDateTime,
        history: &mut dyn HistoryLog,
        mut frame: Option<&mut Frame>,
    ) -> Vec<FaceCard> {
        let mut cards = Vec::new();
        for (position, detection) in detections.iter().enumerate() {
            let index = position as u32 + 1;
            let Some((emotion, probability)) = detection.emotions.dominant() else {
                log::debug!("Face {index} has no emotion scores");
                continue;
            };
            let confidence = probability * 100.0;
            if confidence < self.threshold {
                log::debug!(
                    "Face {index} dropped: {emotion} at {confidence:.1}% is below {:.1}%",
                    self.threshold
                );
                continue;
            }

            let card = FaceCard {
                index,
                emotion: emotion.clone(),
                confidence,
                message: emotion.message(),
                face_box: detection.face_box,
            };

            history.append(HistoryEntry::new(now, index, card.emotion.clone(), confidence));
            if let Some(frame) = frame.as_deref_mut() {
                self.annotator.annotate(frame, &card.face_box, &card.caption());
            }
            cards.push(card);
        }
        cards
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::domain::emotion::EmotionScores;
    use crate::history::domain::history_log::SessionHistory;
    use crate::imaging::domain::frame_annotator::NullFrameAnnotator;
    use rstest::rstest;
    use std::sync::{Arc, Mutex};

    struct RecordingAnnotator {
        calls: Arc<Mutex<Vec<(FaceBox, String)>>>,
    }

    impl FrameAnnotator for RecordingAnnotator {
        fn annotate(&self, _frame: &mut Frame, face_box: &FaceBox, label: &str) {
            self.calls
                .lock()
                .unwrap()
                .push((*face_box, label.to_string()));
        }
    }

    fn now() -> NaiveDateTime {
        chrono::NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    fn happy_face() -> DetectionResult {
        DetectionResult {
            face_box: FaceBox::new(10, 10, 50, 50),
            emotions: EmotionScores::new(vec![
                (Emotion::Happy, 0.82),
                (Emotion::Sad, 0.10),
                (Emotion::Neutral, 0.08),
            ]),
        }
    }

    fn face(emotion: Emotion, p: f64) -> DetectionResult {
        DetectionResult {
            face_box: FaceBox::new(0, 0, 10, 10),
            emotions: EmotionScores::new(vec![(emotion, p)]),
        }
    }

    #[test]
    fn test_happy_face_produces_card_and_history() {
        let formatter = ResultFormatter::new(50.0, Box::new(NullFrameAnnotator));
        let mut history = SessionHistory::new();

        let cards = formatter.format(&[happy_face()], now(), &mut history, None);

        assert_eq!(cards.len(), 1);
        let card = &cards[0];
        assert_eq!(card.index, 1);
        assert_eq!(card.emotion, Emotion::Happy);
        approx::assert_abs_diff_eq!(card.confidence, 82.0, epsilon = 1e-9);
        assert_eq!(card.message, "😊 You're radiating joy!");
        assert_eq!(card.bar_percent(), 82);

        assert_eq!(history.len(), 1);
        let entry = &history.entries()[0];
        assert_eq!(entry.face, 1);
        assert_eq!(entry.emotion, Emotion::Happy);
        approx::assert_abs_diff_eq!(entry.confidence, 82.0, epsilon = 1e-9);
        assert_eq!(entry.timestamp, now());
    }

    #[test]
    fn test_high_threshold_drops_everything() {
        let formatter = ResultFormatter::new(90.0, Box::new(NullFrameAnnotator));
        let mut history = SessionHistory::new();

        let cards = formatter.format(&[happy_face()], now(), &mut history, None);

        assert!(cards.is_empty());
        assert!(history.is_empty());
    }

    #[test]
    fn test_no_detections_leaves_frame_untouched() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let formatter = ResultFormatter::new(
            50.0,
            Box::new(RecordingAnnotator {
                calls: calls.clone(),
            }),
        );
        let mut history = SessionHistory::new();
        let mut frame = Frame::new(vec![0u8; 12], 2, 2, 3, 0);

        let cards = formatter.format(&[], now(), &mut history, Some(&mut frame));

        assert!(cards.is_empty());
        assert!(history.is_empty());
        assert!(calls.lock().unwrap().is_empty());
        assert!(frame.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_indices_count_dropped_faces() {
        let formatter = ResultFormatter::new(50.0, Box::new(NullFrameAnnotator));
        let mut history = SessionHistory::new();
        let detections = vec![
            face(Emotion::Sad, 0.3),
            face(Emotion::Angry, 0.7),
            face(Emotion::Fear, 0.2),
            face(Emotion::Surprise, 0.9),
        ];

        let cards = formatter.format(&detections, now(), &mut history, None);

        let indices: Vec<u32> = cards.iter().map(|c| c.index).collect();
        assert_eq!(indices, vec![2, 4]);
        let logged: Vec<u32> = history.entries().iter().map(|e| e.face).collect();
        assert_eq!(logged, vec![2, 4]);
    }

    #[rstest]
    #[case(0.5, 50.0, 1)]
    #[case(0.4999, 50.0, 0)]
    #[case(0.2, 0.0, 1)]
    #[case(1.0, 100.0, 1)]
    fn test_threshold_is_inclusive(#[case] p: f64, #[case] threshold: f64, #[case] expected: usize) {
        let formatter = ResultFormatter::new(threshold, Box::new(NullFrameAnnotator));
        let mut history = SessionHistory::new();
        let cards = formatter.format(&[face(Emotion::Happy, p)], now(), &mut history, None);
        assert_eq!(cards.len(), expected);
        assert!(cards.iter().all(|c| c.confidence >= threshold));
    }

    #[test]
    fn test_annotates_each_card_with_caption() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let formatter = ResultFormatter::new(
            50.0,
            Box::new(RecordingAnnotator {
                calls: calls.clone(),
            }),
        );
        let mut history = SessionHistory::new();
        let mut frame = Frame::new(vec![0u8; 100 * 100 * 3], 100, 100, 3, 0);

        formatter.format(
            &[happy_face(), face(Emotion::Sad, 0.1)],
            now(),
            &mut history,
            Some(&mut frame),
        );

        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, FaceBox::new(10, 10, 50, 50));
        assert_eq!(calls[0].1, "Happy (82.0%)");
    }

    #[test]
    fn test_unknown_emotion_gets_fallback_message() {
        let formatter = ResultFormatter::new(50.0, Box::new(NullFrameAnnotator));
        let mut history = SessionHistory::new();
        let cards = formatter.format(
            &[face(Emotion::Other("contempt".into()), 0.6)],
            now(),
            &mut history,
            None,
        );
        assert_eq!(cards[0].message, "😐 You seem contempt.");
        assert_eq!(cards[0].caption(), "Contempt (60.0%)");
    }

    #[test]
    fn test_card_text_helpers() {
        let card = FaceCard {
            index: 3,
            emotion: Emotion::Neutral,
            confidence: 66.66,
            message: Emotion::Neutral.message(),
            face_box: FaceBox::new(0, 0, 1, 1),
        };
        assert_eq!(card.title(), "Face 3");
        assert_eq!(card.confidence_text(), "Confidence: 66.7%");
        assert_eq!(card.bar_percent(), 67);
    }

    #[test]
    fn test_empty_scores_are_skipped() {
        let formatter = ResultFormatter::new(0.0, Box::new(NullFrameAnnotator));
        let mut history = SessionHistory::new();
        let detection = DetectionResult {
            face_box: FaceBox::new(0, 0, 5, 5),
            emotions: EmotionScores::default(),
        };
        assert!(formatter
            .format(&[detection], now(), &mut history, None)
            .is_empty());
    }
}
