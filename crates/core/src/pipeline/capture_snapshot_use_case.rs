use std::sync::atomic::AtomicBool;
use std::time::Duration;

use crate::capture::domain::camera::CaptureError;
use crate::capture::domain::exclusive_camera::ExclusiveCamera;
use crate::history::domain::history_log::HistoryLog;
use crate::imaging::infrastructure::image_codec::encode_jpeg;
use crate::pipeline::analyze_image_use_case::{Analysis, AnalysisError, AnalyzeImageUseCase};
use crate::shared::clock::Clock;

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error(transparent)]
    Capture(#[from] CaptureError),
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

/// One webcam snapshot: open → warm up → read one frame → release → analyze.
pub struct CaptureSnapshotUseCase {
    camera: ExclusiveCamera,
    clock: Box<dyn Clock>,
    warmup: Duration,
}

impl CaptureSnapshotUseCase {
    pub fn new(camera: ExclusiveCamera, clock: Box<dyn Clock>, warmup: Duration) -> Self {
        Self {
            camera,
            clock,
            warmup,
        }
    }

    /// The camera is released before analysis starts, on every path.
    pub fn execute(
        &self,
        analyzer: &mut AnalyzeImageUseCase,
        history: &mut dyn HistoryLog,
    ) -> Result<Analysis, SnapshotError> {
        let frame = {
            let mut camera = self.camera.acquire()?;
            // Warm-up is not cancellable; the snapshot is one short action.
            self.clock.sleep(self.warmup, &AtomicBool::new(false));
            camera.read_frame()?
        };

        let bytes = encode_jpeg(&frame).map_err(|e| AnalysisError::Encode(e.to_string()))?;
        Ok(analyzer.execute(&bytes, Some(frame), history, self.clock.timestamp())?)
    }
}
