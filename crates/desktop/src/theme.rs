use iced::color;
use iced::theme::Palette;
use iced::{Color, Theme};

pub fn resolve_theme(dark_mode: bool) -> Theme {
    let palette = if dark_mode {
        dark_palette()
    } else {
        light_palette()
    };
    Theme::custom("FaceMood", palette)
}

fn dark_palette() -> Palette {
    Palette {
        background: color!(0x12, 0x12, 0x12),
        text: color!(0xff, 0xff, 0xff),
        primary: color!(0x90, 0xca, 0xf9),
        success: color!(0x66, 0xbb, 0x6a),
        warning: color!(0xff, 0xca, 0x28),
        danger: color!(0xef, 0x53, 0x50),
    }
}

fn light_palette() -> Palette {
    Palette {
        background: color!(0xff, 0xff, 0xff),
        text: color!(0x1d, 0x1d, 0x1f),
        primary: color!(0x42, 0x8b, 0xd6),
        success: color!(0x2e, 0x7d, 0x32),
        warning: color!(0xef, 0x6c, 0x00),
        danger: color!(0xc6, 0x28, 0x28),
    }
}

/// Card background, slightly lifted from the window background.
pub fn surface_color(theme: &Theme) -> Color {
    let p = theme.palette();
    Color { a: 0.06, ..p.text }
}

/// Secondary text, e.g. hints and captions.
pub fn tertiary_color(theme: &Theme) -> Color {
    let p = theme.palette();
    Color { a: 0.55, ..p.text }
}
