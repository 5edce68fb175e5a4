use std::path::{Path, PathBuf};

use ab_glyph::{FontVec, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;

use crate::imaging::domain::frame_annotator::FrameAnnotator;
use crate::shared::face_box::FaceBox;
use crate::shared::frame::Frame;

const BOX_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const TEXT_COLOR: Rgb<u8> = Rgb([255, 255, 255]);
const BOX_THICKNESS: i32 = 2;
const LABEL_SIZE: f32 = 18.0;
const LABEL_GAP: i32 = 10;

/// Common TrueType fonts, tried in order.
const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Draws a green box around each face and a white caption above it.
///
/// Captions need a system font; without one only boxes are drawn.
pub struct BoxAnnotator {
    font: Option<FontVec>,
}

impl BoxAnnotator {
    pub fn new() -> Self {
        let candidates: Vec<PathBuf> = FONT_CANDIDATES.iter().map(PathBuf::from).collect();
        Self::with_font_candidates(&candidates)
    }

    pub fn with_font_candidates(candidates: &[PathBuf]) -> Self {
        let font = candidates.iter().find_map(|path| load_font(path));
        if font.is_none() {
            log::warn!("No label font found; face boxes will be drawn without captions");
        }
        Self { font }
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }
}

impl Default for BoxAnnotator {
    fn default() -> Self {
        Self::new()
    }
}

fn load_font(path: &Path) -> Option<FontVec> {
    let bytes = std::fs::read(path).ok()?;
    match FontVec::try_from_vec(bytes) {
        Ok(font) => {
            log::debug!("Using label font {}", path.display());
            Some(font)
        }
        Err(e) => {
            log::debug!("Skipping unreadable font {}: {e}", path.display());
            None
        }
    }
}

impl FrameAnnotator for BoxAnnotator {
    fn annotate(&self, frame: &mut Frame, face_box: &FaceBox, label: &str) {
        if frame.channels() != 3 || face_box.width <= 0 || face_box.height <= 0 {
            return;
        }
        let Some(mut img) =
            RgbImage::from_raw(frame.width(), frame.height(), frame.data().to_vec())
        else {
            return;
        };

        for inset in 0..BOX_THICKNESS {
            let w = face_box.width - 2 * inset;
            let h = face_box.height - 2 * inset;
            if w <= 0 || h <= 0 {
                break;
            }
            let rect = Rect::at(face_box.x + inset, face_box.y + inset).of_size(w as u32, h as u32);
            draw_hollow_rect_mut(&mut img, rect, BOX_COLOR);
        }

        if let Some(font) = &self.font {
            let text_y = (face_box.y - LABEL_GAP - LABEL_SIZE as i32).max(0);
            draw_text_mut(
                &mut img,
                TEXT_COLOR,
                face_box.x.max(0),
                text_y,
                PxScale::from(LABEL_SIZE),
                font,
                label,
            );
        }

        frame.data_mut().copy_from_slice(img.as_raw());
    }
}
