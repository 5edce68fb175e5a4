use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::capture::domain::camera::CaptureError;
use crate::capture::domain::exclusive_camera::ExclusiveCamera;
use crate::history::domain::history_log::HistoryLog;
use crate::imaging::infrastructure::image_codec::encode_jpeg;
use crate::pipeline::analyze_image_use_case::{Analysis, AnalysisError, AnalyzeImageUseCase};
use crate::shared::clock::Clock;
use crate::shared::constants::{LIVE_BUDGET, LIVE_INTERVAL};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LiveSettings {
    /// Total wall-clock time the session may run.
    pub budget: Duration,
    /// Wait between the end of one frame and the next read.
    pub interval: Duration,
}

impl Default for LiveSettings {
    fn default() -> Self {
        Self {
            budget: LIVE_BUDGET,
            interval: LIVE_INTERVAL,
        }
    }
}

/// One polled frame, handed to the caller as soon as it is analyzed.
#[derive(Debug)]
pub struct LiveFrame {
    pub index: usize,
    /// Time since the session started when the frame was read.
    pub elapsed: Duration,
    pub analysis: Result<Analysis, AnalysisError>,
}

#[derive(Debug)]
pub enum LiveOutcome {
    /// The time budget ran out.
    Completed { frames: usize },
    /// Opening or reading the camera failed.
    Failed { frames: usize, error: CaptureError },
    Cancelled { frames: usize },
}

impl LiveOutcome {
    pub fn frames(&self) -> usize {
        match self {
            LiveOutcome::Completed { frames }
            | LiveOutcome::Failed { frames, .. }
            | LiveOutcome::Cancelled { frames } => *frames,
        }
    }
}

/// Bounded webcam polling loop.
///
/// Opens the camera once, then reads, analyzes and reports a frame every
/// `interval` until the budget is spent, a read fails, or `cancelled` is
/// raised. Frames that fail to decode or analyze are reported and the loop
/// keeps going; camera errors end it. The camera is released exactly once.
pub struct LiveSessionUseCase {
    camera: ExclusiveCamera,
    clock: Box<dyn Clock>,
    settings: LiveSettings,
}

impl LiveSessionUseCase {
    pub fn new(camera: ExclusiveCamera, clock: Box<dyn Clock>, settings: LiveSettings) -> Self {
        Self {
            camera,
            clock,
            settings,
        }
    }

    pub fn run(
        &self,
        analyzer: &mut AnalyzeImageUseCase,
        history: &mut dyn HistoryLog,
        cancelled: &AtomicBool,
        on_frame: &mut dyn FnMut(LiveFrame),
    ) -> LiveOutcome {
        let mut camera = match self.camera.acquire() {
            Ok(camera) => camera,
            Err(error) => return LiveOutcome::Failed { frames: 0, error },
        };

        let start = self.clock.elapsed();
        let mut frames = 0;
        let outcome = loop {
            if cancelled.load(Ordering::Relaxed) {
                break LiveOutcome::Cancelled { frames };
            }
            let elapsed = self.clock.elapsed().saturating_sub(start);
            if elapsed >= self.settings.budget {
                break LiveOutcome::Completed { frames };
            }

            let frame = match camera.read_frame() {
                Ok(frame) => frame.with_index(frames),
                Err(error) => break LiveOutcome::Failed { frames, error },
            };

            let analysis = match encode_jpeg(&frame) {
                Ok(bytes) => analyzer.execute(&bytes, Some(frame), history, self.clock.timestamp()),
                Err(e) => Err(AnalysisError::Encode(e.to_string())),
            };
            if let Err(e) = &analysis {
                log::warn!("Frame {frames} skipped: {e}");
            }
            on_frame(LiveFrame {
                index: frames,
                elapsed,
                analysis,
            });
            frames += 1;

            if !self.clock.sleep(self.settings.interval, cancelled) {
                break LiveOutcome::Cancelled { frames };
            }
        };

        camera.release();
        log::info!("Live analysis ended after {} frames", outcome.frames());
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::domain::exclusive_camera::testing::{CameraCounters, StubCameraSource};
    use crate::history::domain::history_log::SessionHistory;
    use crate::pipeline::analyze_image_use_case::testing::{analyzer, happy_detection};
    use crate::shared::clock::testing::ManualClock;
    use std::sync::Arc;

    fn session(source: StubCameraSource, settings: LiveSettings) -> LiveSessionUseCase {
        LiveSessionUseCase::new(
            ExclusiveCamera::new(Box::new(source)),
            Box::new(ManualClock::new()),
            settings,
        )
    }

    #[test]
    fn test_runs_until_budget_at_fixed_interval() {
        let counters = CameraCounters::default();
        let live = session(StubCameraSource::working(counters.clone()), LiveSettings::default());
        let (mut analyzer, calls) = analyzer(vec![happy_detection()], 50.0);
        let mut history = SessionHistory::new();
        let mut seen = Vec::new();

        let outcome = live.run(
            &mut analyzer,
            &mut history,
            &AtomicBool::new(false),
            &mut |frame: LiveFrame| seen.push(frame),
        );

        assert!(matches!(outcome, LiveOutcome::Completed { frames: 12 }));
        assert_eq!(counters.opens(), 1);
        assert_eq!(counters.releases(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 12);
        assert_eq!(history.len(), 12);

        let offsets: Vec<u64> = seen.iter().map(|f| f.elapsed.as_secs()).collect();
        assert_eq!(offsets, (0..12).map(|i| i * 5).collect::<Vec<_>>());
        for pair in seen.windows(2) {
            assert_eq!(pair[1].elapsed - pair[0].elapsed, Duration::from_secs(5));
        }
        assert!(seen.iter().all(|f| f.analysis.is_ok()));
        let indices: Vec<usize> = seen.iter().map(|f| f.index).collect();
        assert_eq!(indices, (0..12).collect::<Vec<_>>());
    }

    #[test]
    fn test_read_failure_stops_loop_and_releases() {
        let counters = CameraCounters::default();
        let live = session(
            StubCameraSource {
                counters: counters.clone(),
                fail_open: false,
                fail_after: Some(3),
            },
            LiveSettings::default(),
        );
        let (mut analyzer, _) = analyzer(vec![happy_detection()], 50.0);
        let mut history = SessionHistory::new();

        let outcome = live.run(
            &mut analyzer,
            &mut history,
            &AtomicBool::new(false),
            &mut |_: LiveFrame| {},
        );

        match outcome {
            LiveOutcome::Failed { frames, error } => {
                assert_eq!(frames, 3);
                assert!(matches!(error, CaptureError::Read(_)));
            }
            other => panic!("expected failure, got {other:?}"),
        }
        assert_eq!(counters.releases(), 1);
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn test_open_failure_never_reads() {
        let counters = CameraCounters::default();
        let live = session(
            StubCameraSource {
                counters: counters.clone(),
                fail_open: true,
                fail_after: None,
            },
            LiveSettings::default(),
        );
        let (mut analyzer, calls) = analyzer(vec![], 50.0);

        let outcome = live.run(
            &mut analyzer,
            &mut SessionHistory::new(),
            &AtomicBool::new(false),
            &mut |_: LiveFrame| {},
        );

        assert!(matches!(
            outcome,
            LiveOutcome::Failed {
                frames: 0,
                error: CaptureError::Open(_)
            }
        ));
        assert_eq!(counters.reads(), 0);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_cancel_from_callback_ends_after_current_frame() {
        let counters = CameraCounters::default();
        let live = session(StubCameraSource::working(counters.clone()), LiveSettings::default());
        let (mut analyzer, _) = analyzer(vec![], 50.0);
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = cancelled.clone();

        let outcome = live.run(
            &mut analyzer,
            &mut SessionHistory::new(),
            &cancelled,
            &mut |frame: LiveFrame| {
                if frame.index == 1 {
                    flag.store(true, Ordering::SeqCst);
                }
            },
        );

        assert!(matches!(outcome, LiveOutcome::Cancelled { frames: 2 }));
        assert_eq!(counters.reads(), 2);
        assert_eq!(counters.releases(), 1);
    }

    #[test]
    fn test_cancelled_before_start_reads_nothing() {
        let counters = CameraCounters::default();
        let live = session(StubCameraSource::working(counters.clone()), LiveSettings::default());
        let (mut analyzer, _) = analyzer(vec![], 50.0);

        let outcome = live.run(
            &mut analyzer,
            &mut SessionHistory::new(),
            &AtomicBool::new(true),
            &mut |_: LiveFrame| {},
        );

        assert!(matches!(outcome, LiveOutcome::Cancelled { frames: 0 }));
        assert_eq!(counters.reads(), 0);
        assert_eq!(counters.releases(), 1);
    }

    #[test]
    fn test_custom_budget_and_interval() {
        let counters = CameraCounters::default();
        let live = session(
            StubCameraSource::working(counters.clone()),
            LiveSettings {
                budget: Duration::from_secs(10),
                interval: Duration::from_secs(3),
            },
        );
        let (mut analyzer, _) = analyzer(vec![], 50.0);

        let outcome = live.run(
            &mut analyzer,
            &mut SessionHistory::new(),
            &AtomicBool::new(false),
            &mut |_: LiveFrame| {},
        );

        // Reads at 0, 3, 6, 9
        assert!(matches!(outcome, LiveOutcome::Completed { frames: 4 }));
        assert_eq!(counters.releases(), 1);
    }
}
