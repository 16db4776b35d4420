/// Icon handling module
///
/// This module turns the icon blobs stored in the catalog into grid tiles and
/// exported files:
/// - `thumbnail.rs` - decode and scale icons to the tile box
/// - `placeholder.rs` - the shared "No Image" bitmap
/// - `tile.rs` - render result rows as tiles
/// - `export.rs` - save an icon to disk

pub mod export;
pub mod placeholder;
pub mod thumbnail;
pub mod tile;
