//! Icon decoding and thumbnailing for grid tiles
use image::{imageops::FilterType, ImageResult, RgbaImage};

/// Tile bounding box. PS3 ICON0.PNG is 320x176, which fits at 128x70.
pub const THUMB_WIDTH: u32 = 128;
pub const THUMB_HEIGHT: u32 = 85;

/// Largest size that fits `width`x`height` inside `max_width`x`max_height`
/// keeping the aspect ratio. Never scales up.
pub fn fit_within(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if width <= max_width && height <= max_height {
        return (width, height);
    }

    let scale = f64::min(
        f64::from(max_width) / f64::from(width),
        f64::from(max_height) / f64::from(height),
    );
    let fitted = |side: u32, max: u32| ((f64::from(side) * scale).round() as u32).clamp(1, max);

    (fitted(width, max_width), fitted(height, max_height))
}

/// Decode icon bytes (format sniffed from content) and shrink to the tile box
pub fn decode_thumbnail(bytes: &[u8]) -> ImageResult<RgbaImage> {
    let img = image::load_from_memory(bytes)?;
    let (width, height) = fit_within(img.width(), img.height(), THUMB_WIDTH, THUMB_HEIGHT);

    let img = if (width, height) == (img.width(), img.height()) {
        img
    } else {
        img.resize_exact(width, height, FilterType::Lanczos3)
    };

    Ok(img.into_rgba8())
}
