pub mod capture_tab;
pub mod home_tab;
pub mod live_tab;
pub mod upload_tab;

use iced::widget::{column, progress_bar, text};
use iced::{Element, Theme};

use crate::app::{scaled, Message};
use crate::theme::tertiary_color;
use crate::widgets::analysis_panel::analysis_panel;
use crate::workers::AnalysisView;

/// Status of the single-shot panels (upload and snapshot).
#[derive(Debug, Clone, Default)]
pub enum PanelState {
    #[default]
    Idle,
    Downloading(u64, u64),
    Working,
    Done(AnalysisView),
    Failed(String),
}

impl PanelState {
    pub fn is_busy(&self) -> bool {
        matches!(self, PanelState::Downloading(..) | PanelState::Working)
    }
}

/// Progress line, error, or result for a single-shot panel.
pub fn panel_body<'a>(
    state: &PanelState,
    working_label: &str,
    fs: f32,
    theme: &Theme,
) -> Element<'a, Message> {
    match state {
        PanelState::Idle => column![].into(),
        PanelState::Downloading(downloaded, total) => download_view(*downloaded, *total, fs, theme),
        PanelState::Working => text(working_label.to_string())
            .size(scaled(13.0, fs))
            .color(tertiary_color(theme))
            .into(),
        PanelState::Done(view) => analysis_panel(view, fs, theme),
        PanelState::Failed(error) => text(error.clone())
            .size(scaled(13.0, fs))
            .color(theme.palette().danger)
            .into(),
    }
}

pub fn download_view<'a>(downloaded: u64, total: u64, fs: f32, theme: &Theme) -> Element<'a, Message> {
    let mb = |bytes: u64| bytes as f64 / 1_048_576.0;
    let (fraction, label) = if total > 0 {
        (
            downloaded as f32 / total as f32,
            format!("Downloading models: {:.1} / {:.1} MB", mb(downloaded), mb(total)),
        )
    } else {
        (0.0, "Downloading models...".to_string())
    };
    column![
        progress_bar(0.0..=1.0, fraction),
        text(label).size(scaled(12.0, fs)).color(tertiary_color(theme)),
    ]
    .spacing(4)
    .into()
}
