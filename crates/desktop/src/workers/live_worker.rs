use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};

use facemood_core::capture::domain::exclusive_camera::ExclusiveCamera;
use facemood_core::history::domain::history_entry::HistoryEntry;
use facemood_core::pipeline::live_session_use_case::{
    LiveFrame, LiveOutcome, LiveSessionUseCase, LiveSettings,
};
use facemood_core::pipeline::pipeline_logger::StdoutPipelineLogger;
use facemood_core::shared::clock::SystemClock;

use super::model_cache::ModelCache;
use super::{build_analyzer, history_sink, AnalysisView};

pub enum LiveMessage {
    DownloadProgress(u64, u64),
    Frame {
        index: usize,
        elapsed: Duration,
        result: Result<AnalysisView, String>,
    },
    Finished(LiveOutcome),
    Error(String),
}

pub struct LiveParams {
    pub camera: ExclusiveCamera,
    pub threshold: f64,
    pub model_cache: Arc<ModelCache>,
    pub history: Sender<HistoryEntry>,
}

/// Runs a bounded live session off the UI thread. Raise the returned flag
/// to stop it early.
pub fn spawn(params: LiveParams) -> (Receiver<LiveMessage>, Arc<AtomicBool>) {
    let (tx, rx) = crossbeam_channel::unbounded::<LiveMessage>();
    let cancelled = Arc::new(AtomicBool::new(false));
    let cancelled_clone = cancelled.clone();

    thread::spawn(move || {
        if let Err(e) = run_live(&tx, &cancelled_clone, params) {
            if cancelled_clone.load(Ordering::Relaxed) {
                let _ = tx.send(LiveMessage::Finished(LiveOutcome::Cancelled { frames: 0 }));
            } else {
                let _ = tx.send(LiveMessage::Error(e.to_string()));
            }
        }
    });

    (rx, cancelled)
}

fn run_live(
    tx: &Sender<LiveMessage>,
    cancelled: &AtomicBool,
    params: LiveParams,
) -> Result<(), Box<dyn std::error::Error>> {
    let tx_dl = tx.clone();
    let mut analyzer = build_analyzer(
        &params.model_cache,
        params.threshold,
        Box::new(StdoutPipelineLogger::new()),
        &|dl, total| {
            let _ = tx_dl.send(LiveMessage::DownloadProgress(dl, total));
        },
        cancelled,
    )?;

    let mut history = history_sink(params.history);

    let live = LiveSessionUseCase::new(
        params.camera,
        Box::new(SystemClock::new()),
        LiveSettings::default(),
    );
    let outcome = live.run(&mut analyzer, &mut history, cancelled, &mut |frame: LiveFrame| {
        let _ = tx.send(LiveMessage::Frame {
            index: frame.index,
            elapsed: frame.elapsed,
            result: frame.analysis.map(AnalysisView::from).map_err(|e| e.to_string()),
        });
    });

    analyzer.logger().summary();
    let _ = tx.send(LiveMessage::Finished(outcome));
    Ok(())
}
