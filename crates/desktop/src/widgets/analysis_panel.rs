use iced::widget::{column, image, text, Space};
use iced::{Element, Length, Theme};

use crate::app::{scaled, Message};
use crate::theme::tertiary_color;
use crate::workers::AnalysisView;

use super::emotion_card::emotion_card;

/// Annotated image followed by one card per qualifying face.
pub fn analysis_panel<'a>(view: &AnalysisView, fs: f32, theme: &Theme) -> Element<'a, Message> {
    let mut content = column![image(view.image.clone()).width(Length::Fill)].spacing(10);

    if view.cards.is_empty() {
        content = content.push(
            text("No faces above the confidence threshold.")
                .size(scaled(13.0, fs))
                .color(tertiary_color(theme)),
        );
    } else {
        for card in &view.cards {
            content = content.push(emotion_card(card, fs, theme));
        }
    }

    column![content, Space::new().height(8)].into()
}
