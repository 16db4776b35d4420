//! Turns result rows into grid tiles
use std::sync::Arc;

use image::RgbaImage;

use super::placeholder::build_placeholder;
use super::thumbnail::decode_thumbnail;
use crate::state::data::GameSummary;

/// Tiles per grid row
pub const GRID_COLUMNS: usize = 6;

/// A decoded icon or the shared placeholder
pub type Bitmap = Arc<RgbaImage>;

/// One rendered unit of the results grid
#[derive(Debug, Clone)]
pub struct Tile {
    pub game_id: String,
    pub title: String,
    pub bitmap: Bitmap,
}

/// Row-major grid cell `(row, column)` of the tile at `index`
pub fn grid_position(index: usize) -> (usize, usize) {
    (index / GRID_COLUMNS, index % GRID_COLUMNS)
}

/// Renders tiles, reusing one placeholder bitmap for every game without a
/// usable icon.
#[derive(Debug, Clone)]
pub struct TileRenderer {
    placeholder: Bitmap,
}

impl Default for TileRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TileRenderer {
    pub fn new() -> Self {
        Self {
            placeholder: Arc::new(build_placeholder()),
        }
    }

    pub fn placeholder(&self) -> &Bitmap {
        &self.placeholder
    }

    pub fn is_placeholder(&self, tile: &Tile) -> bool {
        Arc::ptr_eq(&tile.bitmap, &self.placeholder)
    }

    /// The thumbnail for `icon`, or the placeholder if it is absent or
    /// does not decode. Always returns a bitmap.
    pub fn bitmap_for(&self, game_id: &str, icon: Option<&[u8]>) -> Bitmap {
        let Some(bytes) = icon else {
            return Arc::clone(&self.placeholder);
        };

        match decode_thumbnail(bytes) {
            Ok(thumb) => Arc::new(thumb),
            Err(e) => {
                log::warn!("icon for {game_id} could not be decoded: {e}");
                Arc::clone(&self.placeholder)
            }
        }
    }

    pub fn render(&self, game: &GameSummary) -> Tile {
        Tile {
            game_id: game.game_id.clone(),
            title: game.title.clone(),
            bitmap: self.bitmap_for(&game.game_id, game.icon.as_deref()),
        }
    }

    /// Render a page of rows, in order
    pub fn render_page(&self, games: &[GameSummary]) -> Vec<Tile> {
        games.iter().map(|game| self.render(game)).collect()
    }
}
