use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{Receiver, Sender};

use facemood_core::capture::domain::exclusive_camera::ExclusiveCamera;
use facemood_core::history::domain::history_entry::HistoryEntry;
use facemood_core::pipeline::capture_snapshot_use_case::CaptureSnapshotUseCase;
use facemood_core::pipeline::pipeline_logger::NullPipelineLogger;
use facemood_core::shared::clock::{Clock, SystemClock};
use facemood_core::shared::constants::CAPTURE_WARMUP;

use super::model_cache::ModelCache;
use super::{build_analyzer, history_sink, AnalysisView};

pub enum AnalysisSource {
    Upload(PathBuf),
    Snapshot(ExclusiveCamera),
}

pub enum AnalysisMessage {
    DownloadProgress(u64, u64),
    Complete(AnalysisView),
    Error(String),
}

pub struct AnalysisParams {
    pub source: AnalysisSource,
    pub threshold: f64,
    pub model_cache: Arc<ModelCache>,
    /// Qualifying faces go here, for the UI to append to the session history.
    pub history: Sender<HistoryEntry>,
}

/// Runs one upload or snapshot analysis off the UI thread.
pub fn spawn(params: AnalysisParams) -> Receiver<AnalysisMessage> {
    let (tx, rx) = crossbeam_channel::unbounded::<AnalysisMessage>();

    thread::spawn(move || {
        if let Err(e) = run_analysis(&tx, params) {
            let _ = tx.send(AnalysisMessage::Error(e.to_string()));
        }
    });

    rx
}

fn run_analysis(
    tx: &Sender<AnalysisMessage>,
    params: AnalysisParams,
) -> Result<(), Box<dyn std::error::Error>> {
    let tx_dl = tx.clone();
    let mut analyzer = build_analyzer(
        &params.model_cache,
        params.threshold,
        Box::new(NullPipelineLogger),
        &|dl, total| {
            let _ = tx_dl.send(AnalysisMessage::DownloadProgress(dl, total));
        },
        &AtomicBool::new(false),
    )?;

    let mut history = history_sink(params.history);

    let clock = SystemClock::new();
    let analysis = match params.source {
        AnalysisSource::Upload(path) => {
            let bytes = std::fs::read(&path)
                .map_err(|e| format!("Cannot read {}: {e}", path.display()))?;
            analyzer.execute(&bytes, None, &mut history, clock.timestamp())?
        }
        AnalysisSource::Snapshot(camera) => {
            CaptureSnapshotUseCase::new(camera, Box::new(clock), CAPTURE_WARMUP)
                .execute(&mut analyzer, &mut history)?
        }
    };

    let _ = tx.send(AnalysisMessage::Complete(analysis.into()));
    Ok(())
}
