//! The "No Image" tile shown when a game has no usable icon
use image::{Rgba, RgbaImage};

use super::thumbnail::{THUMB_HEIGHT, THUMB_WIDTH};

pub const PLACEHOLDER_LABEL: &str = "No Image";

const BACKGROUND: Rgba<u8> = Rgba([60, 60, 60, 255]);
const FOREGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);

const GLYPH_WIDTH: u32 = 5;
const GLYPH_HEIGHT: u32 = 7;
/// Blank column between glyphs
const GLYPH_SPACING: u32 = 1;

/// Build the placeholder bitmap: a neutral grey box with a centered label.
///
/// If the label cannot be drawn the result is the plain box. This never fails.
pub fn build_placeholder() -> RgbaImage {
    build_with_label(PLACEHOLDER_LABEL)
}

pub(crate) fn build_with_label(label: &str) -> RgbaImage {
    let mut img = blank_box();
    if draw_label(&mut img, label).is_none() {
        log::warn!("could not draw placeholder label {label:?}, using a blank box");
        img = blank_box();
    }
    img
}

fn blank_box() -> RgbaImage {
    RgbaImage::from_pixel(THUMB_WIDTH, THUMB_HEIGHT, BACKGROUND)
}

/// Draw `text` centered in `img`. `None` if a character has no glyph or the
/// text does not fit; `img` may be partially drawn in that case.
fn draw_label(img: &mut RgbaImage, text: &str) -> Option<()> {
    let chars = text.chars().count() as u32;
    if chars == 0 {
        return Some(());
    }
    let text_width = chars * (GLYPH_WIDTH + GLYPH_SPACING) - GLYPH_SPACING;
    if text_width > img.width() || GLYPH_HEIGHT > img.height() {
        return None;
    }

    let x0 = (img.width() - text_width) / 2;
    let y0 = (img.height() - GLYPH_HEIGHT) / 2;

    for (i, c) in text.chars().enumerate() {
        let rows = glyph(c)?;
        let gx = x0 + i as u32 * (GLYPH_WIDTH + GLYPH_SPACING);
        for (dy, bits) in rows.iter().enumerate() {
            for dx in 0..GLYPH_WIDTH {
                if bits & (1 << (GLYPH_WIDTH - 1 - dx)) != 0 {
                    img.put_pixel(gx + dx, y0 + dy as u32, FOREGROUND);
                }
            }
        }
    }
    Some(())
}

/// 5x7 bitmaps, one byte per row, high bit on the left
fn glyph(c: char) -> Option<[u8; GLYPH_HEIGHT as usize]> {
    let rows = match c {
        ' ' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000],
        'N' => [0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001, 0b10001],
        'I' => [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        'o' => [0b00000, 0b00000, 0b01110, 0b10001, 0b10001, 0b10001, 0b01110],
        'm' => [0b00000, 0b00000, 0b11010, 0b10101, 0b10101, 0b10101, 0b10101],
        'a' => [0b00000, 0b00000, 0b01110, 0b00001, 0b01111, 0b10001, 0b01111],
        'g' => [0b00000, 0b00000, 0b01111, 0b10001, 0b01111, 0b00001, 0b01110],
        'e' => [0b00000, 0b00000, 0b01110, 0b10001, 0b11111, 0b10000, 0b01110],
        _ => return None,
    };
    Some(rows)
}
