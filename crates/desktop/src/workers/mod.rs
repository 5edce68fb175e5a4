pub mod analysis_worker;
pub mod live_worker;
pub mod model_cache;

use std::sync::atomic::AtomicBool;

use crossbeam_channel::{Receiver, Sender, TryRecvError};
use iced::widget::image::Handle;

use facemood_core::detection::infrastructure::build_emotion_detector;
use facemood_core::history::domain::history_entry::HistoryEntry;
use facemood_core::history::domain::history_log::{ForwardingHistoryLog, HistoryLog, SessionHistory};
use facemood_core::imaging::infrastructure::box_annotator::BoxAnnotator;
use facemood_core::imaging::infrastructure::image_codec::ImageCrateDecoder;
use facemood_core::pipeline::analyze_image_use_case::{Analysis, AnalyzeImageUseCase};
use facemood_core::pipeline::pipeline_logger::PipelineLogger;
use facemood_core::pipeline::result_formatter::{FaceCard, ResultFormatter};
use facemood_core::shared::constants::DEFAULT_FACE_CONFIDENCE;

use model_cache::ModelCache;

/// What a panel shows after one analysis: the annotated image and its cards.
#[derive(Debug, Clone)]
pub struct AnalysisView {
    pub image: Handle,
    pub cards: Vec<FaceCard>,
}

impl From<Analysis> for AnalysisView {
    fn from(analysis: Analysis) -> Self {
        let frame = &analysis.frame;
        Self {
            image: Handle::from_rgba(frame.width(), frame.height(), frame.to_rgba()),
            cards: analysis.cards,
        }
    }
}

/// Everything a worker channel held at poll time.
pub struct Drained<T> {
    pub messages: Vec<T>,
    /// The worker is gone; no further messages will arrive.
    pub disconnected: bool,
}

pub fn drain<T>(rx: &Receiver<T>) -> Drained<T> {
    let mut messages = Vec::new();
    loop {
        match rx.try_recv() {
            Ok(msg) => messages.push(msg),
            Err(TryRecvError::Empty) => {
                return Drained {
                    messages,
                    disconnected: false,
                }
            }
            Err(TryRecvError::Disconnected) => {
                return Drained {
                    messages,
                    disconnected: true,
                }
            }
        }
    }
}

/// History log for a worker. All workers share one channel, so entries
/// reach the UI in the order their analyses completed.
fn history_sink(tx: Sender<HistoryEntry>) -> ForwardingHistoryLog<impl FnMut(HistoryEntry) + Send> {
    ForwardingHistoryLog::new(move |entry| {
        let _ = tx.send(entry);
    })
}

/// Moves every pending entry from the shared channel into `history`.
pub fn append_pending(rx: &Receiver<HistoryEntry>, history: &mut SessionHistory) {
    for entry in rx.try_iter() {
        history.append(entry);
    }
}

/// Builds the analysis pipeline once both models are available.
fn build_analyzer(
    model_cache: &ModelCache,
    threshold: f64,
    logger: Box<dyn PipelineLogger>,
    on_progress: &dyn Fn(u64, u64),
    cancelled: &AtomicBool,
) -> Result<AnalyzeImageUseCase, Box<dyn std::error::Error>> {
    let face_model = model_cache.wait_for_face(on_progress, cancelled)?;
    let emotion_model = model_cache.wait_for_emotion(on_progress, cancelled)?;
    let detector = build_emotion_detector(&face_model, &emotion_model, DEFAULT_FACE_CONFIDENCE)?;

    Ok(AnalyzeImageUseCase::new(
        Box::new(ImageCrateDecoder::new()),
        detector,
        ResultFormatter::new(threshold, Box::new(BoxAnnotator::new())),
        logger,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    use facemood_core::detection::domain::emotion::Emotion;
    use facemood_core::shared::clock::{Clock, SystemClock};

    fn entry(face: u32, emotion: Emotion) -> HistoryEntry {
        HistoryEntry::new(SystemClock::new().timestamp(), face, emotion, 75.0)
    }

    #[test]
    fn test_history_from_two_workers_keeps_completion_order() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let mut live = history_sink(tx.clone());
        let mut upload = history_sink(tx.clone());

        live.append(entry(1, Emotion::Sad));
        upload.append(entry(1, Emotion::Happy));
        upload.append(entry(2, Emotion::Happy));
        live.append(entry(1, Emotion::Neutral));

        let mut history = SessionHistory::new();
        append_pending(&rx, &mut history);

        let logged: Vec<(u32, Emotion)> = history
            .entries()
            .iter()
            .map(|e| (e.face, e.emotion.clone()))
            .collect();
        assert_eq!(
            logged,
            vec![
                (1, Emotion::Sad),
                (1, Emotion::Happy),
                (2, Emotion::Happy),
                (1, Emotion::Neutral),
            ]
        );
    }

    #[test]
    fn test_history_from_worker_threads_in_completion_order() {
        let (tx, rx) = crossbeam_channel::unbounded();
        for emotion in [Emotion::Angry, Emotion::Fear, Emotion::Surprise] {
            let tx = tx.clone();
            thread::spawn(move || history_sink(tx).append(entry(1, emotion)))
                .join()
                .unwrap();
        }

        let mut history = SessionHistory::new();
        append_pending(&rx, &mut history);

        let emotions: Vec<Emotion> = history.entries().iter().map(|e| e.emotion.clone()).collect();
        assert_eq!(emotions, vec![Emotion::Angry, Emotion::Fear, Emotion::Surprise]);
    }

    #[test]
    fn test_drain_reports_pending_messages_while_connected() {
        let (tx, rx) = crossbeam_channel::unbounded();
        tx.send(1).unwrap();
        tx.send(2).unwrap();

        let drained = drain(&rx);

        assert_eq!(drained.messages, vec![1, 2]);
        assert!(!drained.disconnected);
    }

    #[test]
    fn test_drain_detects_worker_that_panicked() {
        let (tx, rx) = crossbeam_channel::unbounded::<u32>();
        let worker = thread::spawn(move || {
            tx.send(7).unwrap();
            panic!("inference crashed");
        });
        assert!(worker.join().is_err());

        let drained = drain(&rx);

        assert_eq!(drained.messages, vec![7]);
        assert!(drained.disconnected);
    }
}
