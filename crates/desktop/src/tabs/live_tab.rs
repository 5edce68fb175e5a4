use std::time::Duration;

use iced::widget::{button, column, progress_bar, row, text, Space};
use iced::{Element, Length, Theme};

use facemood_core::shared::constants::{LIVE_BUDGET, LIVE_INTERVAL};

use crate::app::{scaled, Message};
use crate::theme::tertiary_color;
use crate::widgets::analysis_panel::analysis_panel;
use crate::workers::AnalysisView;

use super::download_view;

#[derive(Debug, Clone, Default)]
pub enum LivePhase {
    #[default]
    Idle,
    Downloading(u64, u64),
    Running,
    Stopping,
    Ended(String),
    Failed(String),
}

#[derive(Debug, Default)]
pub struct LivePanel {
    pub phase: LivePhase,
    pub frames: usize,
    pub elapsed: Duration,
    pub latest: Option<AnalysisView>,
    pub frame_error: Option<String>,
}

impl LivePanel {
    pub fn is_running(&self) -> bool {
        matches!(
            self.phase,
            LivePhase::Downloading(..) | LivePhase::Running | LivePhase::Stopping
        )
    }

    pub fn start(&mut self) {
        *self = Self {
            phase: LivePhase::Running,
            ..Self::default()
        };
    }
}

pub fn view<'a>(panel: &LivePanel, fs: f32, theme: &Theme) -> Element<'a, Message> {
    let tertiary = tertiary_color(theme);

    let control = if panel.is_running() {
        let stop = button(text("Stop").size(scaled(14.0, fs)))
            .style(button::danger)
            .padding([8, 20]);
        if matches!(panel.phase, LivePhase::Stopping) {
            stop
        } else {
            stop.on_press(Message::StopLive)
        }
    } else {
        button(text("Start").size(scaled(14.0, fs)))
            .style(button::primary)
            .padding([8, 20])
            .on_press(Message::StartLive)
    };

    let status: Element<'a, Message> = match &panel.phase {
        LivePhase::Idle => text(format!(
            "Analyzes one frame every {}s for up to {}s.",
            LIVE_INTERVAL.as_secs(),
            LIVE_BUDGET.as_secs()
        ))
        .size(scaled(12.0, fs))
        .color(tertiary)
        .into(),
        LivePhase::Downloading(downloaded, total) => download_view(*downloaded, *total, fs, theme),
        LivePhase::Running | LivePhase::Stopping => {
            let fraction = panel.elapsed.as_secs_f32() / LIVE_BUDGET.as_secs_f32();
            column![
                progress_bar(0.0..=1.0, fraction.min(1.0)),
                text(format!(
                    "Frame {} at {:.0}s of {}s",
                    panel.frames,
                    panel.elapsed.as_secs_f32(),
                    LIVE_BUDGET.as_secs()
                ))
                .size(scaled(12.0, fs))
                .color(tertiary),
            ]
            .spacing(4)
            .into()
        }
        LivePhase::Ended(summary) => text(summary.clone())
            .size(scaled(12.0, fs))
            .color(tertiary)
            .into(),
        LivePhase::Failed(error) => text(error.clone())
            .size(scaled(12.0, fs))
            .color(theme.palette().danger)
            .into(),
    };

    let mut content = column![
        text("Live analysis").size(scaled(18.0, fs)),
        Space::new().height(12),
        row![control].spacing(8),
        Space::new().height(12),
        status,
        Space::new().height(16),
    ]
    .width(Length::Fill);

    if let Some(error) = &panel.frame_error {
        content = content.push(
            text(error.clone())
                .size(scaled(12.0, fs))
                .color(theme.palette().danger),
        );
    }
    if let Some(latest) = &panel.latest {
        content = content.push(analysis_panel(latest, fs, theme));
    }

    content.into()
}
