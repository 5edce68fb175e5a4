use iced::widget::{button, column, text, Space};
use iced::{Element, Length, Theme};

use crate::app::{scaled, Message};
use crate::theme::tertiary_color;

use super::{panel_body, PanelState};

pub fn view<'a>(state: &PanelState, live_running: bool, fs: f32, theme: &Theme) -> Element<'a, Message> {
    let mut snap = button(text("📸 Snap").size(scaled(14.0, fs)))
        .style(button::primary)
        .padding([8, 20]);
    if !state.is_busy() && !live_running {
        snap = snap.on_press(Message::Snap);
    }

    let hint = if live_running {
        "The camera is in use by a live session."
    } else {
        "Takes one photo from the webcam after a short warm-up."
    };

    column![
        text("Webcam snapshot").size(scaled(18.0, fs)),
        text(hint).size(scaled(12.0, fs)).color(tertiary_color(theme)),
        Space::new().height(12),
        snap,
        Space::new().height(16),
        panel_body(state, "Capturing...", fs, theme),
    ]
    .width(Length::Fill)
    .into()
}
