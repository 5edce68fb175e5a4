use iced::border::Border;
use iced::widget::{column, container, progress_bar, row, text, Space};
use iced::{Element, Length, Theme};

use facemood_core::pipeline::result_formatter::FaceCard;

use crate::app::{scaled, Message};
use crate::theme::{surface_color, tertiary_color};

const CORNER_RADIUS: f32 = 10.0;

/// One face: title, emotion, confidence bar, and the encouraging message.
pub fn emotion_card<'a>(card: &FaceCard, fs: f32, theme: &Theme) -> Element<'a, Message> {
    let surface = surface_color(theme);
    let tertiary = tertiary_color(theme);

    let header = row![
        text(card.title()).size(scaled(15.0, fs)).font(iced::Font {
            weight: iced::font::Weight::Bold,
            ..iced::Font::DEFAULT
        }),
        Space::new().width(Length::Fill),
        text(format!("Emotion: {}", card.emotion.capitalized())).size(scaled(14.0, fs)),
    ]
    .align_y(iced::Alignment::Center);

    let bar = column![
        progress_bar(0.0..=100.0, card.bar_percent() as f32),
        Space::new().height(4),
        text(card.confidence_text())
            .size(scaled(12.0, fs))
            .color(tertiary),
    ];

    container(
        column![
            header,
            Space::new().height(8),
            bar,
            Space::new().height(8),
            text(card.message.clone()).size(scaled(14.0, fs)),
        ]
        .width(Length::Fill),
    )
    .padding([12, 16])
    .width(Length::Fill)
    .style(move |_theme: &Theme| container::Style {
        background: Some(iced::Background::Color(surface)),
        border: Border {
            radius: CORNER_RADIUS.into(),
            ..Border::default()
        },
        ..container::Style::default()
    })
    .into()
}
