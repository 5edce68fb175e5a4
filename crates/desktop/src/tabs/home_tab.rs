use iced::widget::{button, checkbox, column, row, slider, text, Space};
use iced::{Element, Length, Theme};

use crate::app::{scaled, ExportStatus, Message};
use crate::settings::Settings;
use crate::theme::tertiary_color;

const FONT_SCALE_MIN: f32 = 0.8;
const FONT_SCALE_MAX: f32 = 1.6;

pub fn view<'a>(
    settings: &Settings,
    history_len: usize,
    export: &ExportStatus,
    theme: &Theme,
) -> Element<'a, Message> {
    let fs = settings.font_scale;
    let tertiary = tertiary_color(theme);

    let intro = column![
        text("Emotion Dashboard").size(scaled(22.0, fs)),
        text("Analyze facial emotions from an uploaded photo, a webcam snapshot, or a short live session.")
            .size(scaled(13.0, fs))
            .color(tertiary),
    ]
    .spacing(4);

    let threshold = settings.threshold;
    let controls = column![
        checkbox(settings.dark_mode)
            .label("Dark mode")
            .on_toggle(Message::DarkModeToggled)
            .text_size(scaled(13.0, fs)),
        Space::new().height(12),
        text(format!("Confidence threshold: {threshold}%")).size(scaled(13.0, fs)),
        slider(0..=100, threshold, Message::ThresholdChanged).step(1u32),
        text("Faces below this confidence are hidden and not logged.")
            .size(scaled(11.0, fs))
            .color(tertiary),
        Space::new().height(12),
        text(format!("Font size: {:.0}%", fs * 100.0)).size(scaled(13.0, fs)),
        slider(FONT_SCALE_MIN..=FONT_SCALE_MAX, fs, Message::FontScaleChanged).step(0.1f32),
    ]
    .spacing(4);

    let mut history = column![
        text("Session history").size(scaled(16.0, fs)),
        text(match history_len {
            0 => "Nothing logged yet.".to_string(),
            1 => "1 face logged this session.".to_string(),
            n => format!("{n} faces logged this session."),
        })
        .size(scaled(13.0, fs))
        .color(tertiary),
    ]
    .spacing(6);

    if history_len > 0 {
        history = history.push(
            button(text("Export history as CSV").size(scaled(13.0, fs)))
                .on_press(Message::ExportHistory)
                .style(button::primary)
                .padding([8, 16]),
        );
    }

    match export {
        ExportStatus::None => {}
        ExportStatus::Saved { path, rows } => {
            history = history.push(
                row![
                    text(format!("Saved {rows} rows to {}", path.display()))
                        .size(scaled(12.0, fs))
                        .color(theme.palette().success),
                    Space::new().width(Length::Fill),
                    button(text("Open").size(scaled(12.0, fs)))
                        .on_press(Message::OpenExport)
                        .style(button::text),
                ]
                .align_y(iced::Alignment::Center),
            );
        }
        ExportStatus::Failed(error) => {
            history = history.push(
                text(error.clone())
                    .size(scaled(12.0, fs))
                    .color(theme.palette().danger),
            );
        }
    }

    column![intro, Space::new().height(20), controls, Space::new().height(24), history]
        .width(Length::Fill)
        .into()
}
