use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};
use iced::widget::{button, column, container, row, scrollable, text};
use iced::{Element, Length, Subscription, Task, Theme};

use facemood_core::capture::domain::exclusive_camera::ExclusiveCamera;
use facemood_core::capture::infrastructure::default_camera_source;
use facemood_core::history::domain::history_exporter::HistoryExporter;
use facemood_core::history::domain::history_entry::HistoryEntry;
use facemood_core::history::domain::history_log::SessionHistory;
use facemood_core::history::infrastructure::csv_history_exporter::CsvHistoryExporter;
use facemood_core::pipeline::live_session_use_case::LiveOutcome;
use facemood_core::shared::constants::{HISTORY_EXPORT_FILENAME, UPLOAD_EXTENSIONS};

use crate::settings::{clamp_threshold, Settings};
use crate::tabs::live_tab::{LivePanel, LivePhase};
use crate::tabs::{self, PanelState};
use crate::theme;
use crate::workers::analysis_worker::{self, AnalysisMessage, AnalysisParams, AnalysisSource};
use crate::workers::live_worker::{self, LiveMessage, LiveParams};
use crate::workers::model_cache::ModelCache;
use crate::workers::{append_pending, drain};

const POLL_INTERVAL: Duration = Duration::from_millis(50);
const WORKER_STOPPED: &str = "The analysis stopped unexpectedly.";

// ---------------------------------------------------------------------------
// Tab enum
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Home,
    Upload,
    Capture,
    Live,
}

impl Tab {
    const ALL: &[Tab] = &[Tab::Home, Tab::Upload, Tab::Capture, Tab::Live];

    fn label(self) -> &'static str {
        match self {
            Tab::Home => "Home",
            Tab::Upload => "Upload Image",
            Tab::Capture => "Capture Image",
            Tab::Live => "Live Webcam",
        }
    }
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum Message {
    TabSelected(Tab),
    DarkModeToggled(bool),
    ThresholdChanged(u32),
    FontScaleChanged(f32),
    SelectImage,
    ImageSelected(Option<PathBuf>),
    Snap,
    StartLive,
    StopLive,
    ExportHistory,
    OpenExport,
    Tick,
}

#[derive(Debug, Clone, Default)]
pub enum ExportStatus {
    #[default]
    None,
    Saved { path: PathBuf, rows: usize },
    Failed(String),
}

/// Which single-shot panel a running analysis worker reports to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Panel {
    Upload,
    Capture,
}

struct ActiveAnalysis {
    panel: Panel,
    rx: Receiver<AnalysisMessage>,
}

struct ActiveLive {
    rx: Receiver<LiveMessage>,
    cancelled: Arc<AtomicBool>,
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App {
    active_tab: Tab,
    pub settings: Settings,
    /// Appended only here, on the UI thread, from the shared history channel.
    history: SessionHistory,
    history_tx: Sender<HistoryEntry>,
    history_rx: Receiver<HistoryEntry>,
    export: ExportStatus,
    model_cache: Arc<ModelCache>,
    camera: Option<ExclusiveCamera>,
    upload_path: Option<PathBuf>,
    upload: PanelState,
    capture: PanelState,
    live: LivePanel,
    analyses: Vec<ActiveAnalysis>,
    live_worker: Option<ActiveLive>,
}

impl App {
    pub fn new() -> (Self, Task<Message>) {
        let (history_tx, history_rx) = crossbeam_channel::unbounded();
        (
            Self {
                active_tab: Tab::Home,
                settings: Settings::load(),
                history: SessionHistory::new(),
                history_tx,
                history_rx,
                export: ExportStatus::None,
                model_cache: ModelCache::new(),
                camera: None,
                upload_path: None,
                upload: PanelState::Idle,
                capture: PanelState::Idle,
                live: LivePanel::default(),
                analyses: Vec::new(),
                live_worker: None,
            },
            Task::none(),
        )
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::TabSelected(tab) => {
                self.active_tab = tab;
            }
            Message::DarkModeToggled(enabled) => {
                self.settings.dark_mode = enabled;
                self.settings.save();
            }
            Message::ThresholdChanged(val) => {
                self.settings.threshold = clamp_threshold(val);
                self.settings.save();
            }
            Message::FontScaleChanged(scale) => {
                self.settings.font_scale = scale;
                self.settings.save();
            }
            Message::SelectImage => {
                return Task::perform(
                    async {
                        rfd::AsyncFileDialog::new()
                            .set_title("Select an image")
                            .add_filter("Images", UPLOAD_EXTENSIONS)
                            .pick_file()
                            .await
                            .map(|h| h.path().to_path_buf())
                    },
                    Message::ImageSelected,
                );
            }
            Message::ImageSelected(Some(path)) => {
                self.upload_path = Some(path.clone());
                self.start_analysis(Panel::Upload, AnalysisSource::Upload(path));
            }
            Message::ImageSelected(None) => {}
            Message::Snap => match self.camera() {
                Ok(camera) => self.start_analysis(Panel::Capture, AnalysisSource::Snapshot(camera)),
                Err(e) => self.capture = PanelState::Failed(e),
            },
            Message::StartLive => self.start_live(),
            Message::StopLive => {
                if let Some(active) = &self.live_worker {
                    active.cancelled.store(true, Ordering::Relaxed);
                    self.live.phase = LivePhase::Stopping;
                }
            }
            Message::ExportHistory => {
                let path = PathBuf::from(HISTORY_EXPORT_FILENAME);
                self.export = match CsvHistoryExporter::new().export(self.history.entries(), &path) {
                    Ok(rows) => {
                        log::info!("Exported {rows} history rows to {}", path.display());
                        ExportStatus::Saved { path, rows }
                    }
                    Err(e) => {
                        log::error!("History export failed: {e}");
                        ExportStatus::Failed(e.to_string())
                    }
                };
            }
            Message::OpenExport => {
                if let ExportStatus::Saved { path, .. } = &self.export {
                    if let Err(e) = open::that(path) {
                        log::warn!("Cannot open {}: {e}", path.display());
                    }
                }
            }
            Message::Tick => {
                self.drain_analyses();
                self.drain_live();
                // Workers log before they report completion, so this also
                // catches entries from workers that just finished.
                append_pending(&self.history_rx, &mut self.history);
            }
        }
        Task::none()
    }

    pub fn view(&self) -> Element<'_, Message> {
        let fs = self.settings.font_scale;
        let theme = self.theme();

        // Tab bar
        let tab_bar = row(Tab::ALL
            .iter()
            .map(|&tab| {
                let label = text(tab.label()).size(scaled(13.0, fs));
                let btn = button(label)
                    .on_press(Message::TabSelected(tab))
                    .padding([6, 14]);
                if tab == self.active_tab {
                    btn.style(button::primary).into()
                } else {
                    btn.style(button::text).into()
                }
            })
            .collect::<Vec<_>>())
        .spacing(2);

        // Tab content
        let content: Element<'_, Message> = match self.active_tab {
            Tab::Home => tabs::home_tab::view(&self.settings, self.history.len(), &self.export, &theme),
            Tab::Upload => {
                tabs::upload_tab::view(&self.upload, self.upload_path.as_deref(), fs, &theme)
            }
            Tab::Capture => tabs::capture_tab::view(&self.capture, self.live.is_running(), fs, &theme),
            Tab::Live => tabs::live_tab::view(&self.live, fs, &theme),
        };

        let tab_content = container(scrollable(content).height(Length::Fill))
            .padding(16)
            .height(Length::Fill);

        column![tab_bar, tab_content]
            .spacing(0)
            .height(Length::Fill)
            .into()
    }

    pub fn theme(&self) -> Theme {
        theme::resolve_theme(self.settings.dark_mode)
    }

    pub fn subscription(&self) -> Subscription<Message> {
        if self.analyses.is_empty() && self.live_worker.is_none() {
            Subscription::none()
        } else {
            iced::time::every(POLL_INTERVAL).map(|_| Message::Tick)
        }
    }

    fn threshold(&self) -> f64 {
        f64::from(self.settings.threshold)
    }

    /// The camera is opened lazily and shared by snapshot and live workers.
    fn camera(&mut self) -> Result<ExclusiveCamera, String> {
        if let Some(camera) = &self.camera {
            return Ok(camera.clone());
        }
        let source = default_camera_source(self.settings.camera_index).map_err(|e| e.to_string())?;
        let camera = ExclusiveCamera::new(source);
        self.camera = Some(camera.clone());
        Ok(camera)
    }

    fn panel_mut(&mut self, panel: Panel) -> &mut PanelState {
        match panel {
            Panel::Upload => &mut self.upload,
            Panel::Capture => &mut self.capture,
        }
    }

    fn start_analysis(&mut self, panel: Panel, source: AnalysisSource) {
        if self.panel_mut(panel).is_busy() {
            return;
        }
        *self.panel_mut(panel) = PanelState::Working;
        let rx = analysis_worker::spawn(AnalysisParams {
            source,
            threshold: self.threshold(),
            model_cache: self.model_cache.clone(),
            history: self.history_tx.clone(),
        });
        self.analyses.push(ActiveAnalysis { panel, rx });
    }

    fn start_live(&mut self) {
        if self.live.is_running() {
            return;
        }
        let camera = match self.camera() {
            Ok(camera) => camera,
            Err(e) => {
                self.live.phase = LivePhase::Failed(e);
                return;
            }
        };
        self.live.start();
        let (rx, cancelled) = live_worker::spawn(LiveParams {
            camera,
            threshold: self.threshold(),
            model_cache: self.model_cache.clone(),
            history: self.history_tx.clone(),
        });
        self.live_worker = Some(ActiveLive { rx, cancelled });
    }

    fn drain_analyses(&mut self) {
        let analyses = std::mem::take(&mut self.analyses);
        for active in analyses {
            let drained = drain(&active.rx);
            let mut finished = false;
            for msg in drained.messages {
                match msg {
                    AnalysisMessage::DownloadProgress(downloaded, total) => {
                        *self.panel_mut(active.panel) = PanelState::Downloading(downloaded, total);
                    }
                    AnalysisMessage::Complete(view) => {
                        *self.panel_mut(active.panel) = PanelState::Done(view);
                        finished = true;
                    }
                    AnalysisMessage::Error(e) => {
                        log::error!("Analysis failed: {e}");
                        *self.panel_mut(active.panel) = PanelState::Failed(e);
                        finished = true;
                    }
                }
            }
            if !finished && drained.disconnected {
                log::error!("Analysis worker exited without a result");
                *self.panel_mut(active.panel) = PanelState::Failed(WORKER_STOPPED.to_string());
                finished = true;
            }
            if !finished {
                self.analyses.push(active);
            }
        }
    }

    fn drain_live(&mut self) {
        let Some(active) = &self.live_worker else {
            return;
        };
        let drained = drain(&active.rx);
        let mut finished = false;
        for msg in drained.messages {
            match msg {
                LiveMessage::DownloadProgress(downloaded, total) => {
                    if !matches!(self.live.phase, LivePhase::Stopping) {
                        self.live.phase = LivePhase::Downloading(downloaded, total);
                    }
                }
                LiveMessage::Frame {
                    index,
                    elapsed,
                    result,
                } => {
                    if matches!(self.live.phase, LivePhase::Downloading(..)) {
                        self.live.phase = LivePhase::Running;
                    }
                    self.live.frames = index + 1;
                    self.live.elapsed = elapsed;
                    match result {
                        Ok(view) => {
                            self.live.latest = Some(view);
                            self.live.frame_error = None;
                        }
                        Err(e) => self.live.frame_error = Some(e),
                    }
                }
                LiveMessage::Finished(outcome) => {
                    self.live.phase = match outcome {
                        LiveOutcome::Completed { frames } => {
                            LivePhase::Ended(format!("Session finished after {frames} frames."))
                        }
                        LiveOutcome::Cancelled { frames } => {
                            LivePhase::Ended(format!("Stopped after {frames} frames."))
                        }
                        LiveOutcome::Failed { error, .. } => LivePhase::Failed(error.to_string()),
                    };
                    finished = true;
                }
                LiveMessage::Error(e) => {
                    log::error!("Live session failed: {e}");
                    self.live.phase = LivePhase::Failed(e);
                    finished = true;
                }
            }
        }
        if !finished && drained.disconnected {
            log::error!("Live worker exited without a result");
            self.live.phase = LivePhase::Failed(WORKER_STOPPED.to_string());
            finished = true;
        }
        if finished {
            self.live_worker = None;
        }
    }
}

/// Scale a base font size by the user's font_scale setting.
pub fn scaled(base: f32, font_scale: f32) -> f32 {
    (base * font_scale).round()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaled_rounds_to_whole_points() {
        assert_eq!(scaled(13.0, 1.0), 13.0);
        assert_eq!(scaled(13.0, 1.2), 16.0);
    }

    #[test]
    fn tab_labels_match_dashboard_sections() {
        let labels: Vec<_> = Tab::ALL.iter().map(|t| t.label()).collect();
        assert_eq!(labels, ["Home", "Upload Image", "Capture Image", "Live Webcam"]);
    }
}
