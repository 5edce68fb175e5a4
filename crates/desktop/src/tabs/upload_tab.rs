use std::path::Path;

use iced::widget::{button, column, row, text, Space};
use iced::{Element, Length, Theme};

use crate::app::{scaled, Message};
use crate::theme::tertiary_color;

use super::{panel_body, PanelState};

pub fn view<'a>(
    state: &PanelState,
    selected: Option<&Path>,
    fs: f32,
    theme: &Theme,
) -> Element<'a, Message> {
    let file_name = selected
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "No image selected".to_string());

    let mut choose = button(text("Choose image...").size(scaled(13.0, fs)))
        .style(button::primary)
        .padding([8, 16]);
    if !state.is_busy() {
        choose = choose.on_press(Message::SelectImage);
    }

    column![
        text("Upload an image").size(scaled(18.0, fs)),
        text("JPG, JPEG or PNG.")
            .size(scaled(12.0, fs))
            .color(tertiary_color(theme)),
        Space::new().height(12),
        row![
            choose,
            text(file_name).size(scaled(13.0, fs)),
        ]
        .spacing(12)
        .align_y(iced::Alignment::Center),
        Space::new().height(16),
        panel_body(state, "Analyzing image...", fs, theme),
    ]
    .width(Length::Fill)
    .into()
}
