//! Replacing stored icons from image files on disk
use std::path::Path;
use walkdir::WalkDir;

use super::ImportError;
use crate::state::library::{Library, LibraryError};

/// File name RPCS3 uses for a game's icon
pub const ICON_FILE_NAME: &str = "ICON0.PNG";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    Updated,
    NotFound,
}

/// Result of importing a folder of icons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IconDirSummary {
    pub updated: usize,
    /// Icons whose folder name is not a GameId in the catalog
    pub unknown: usize,
    /// Icons that could not be read
    pub failed: usize,
}

/// Store the image at `image_path` as the icon of `game_id`.
///
/// Only the icon column changes. The bytes are stored as-is; a file that does
/// not decode as an image is still stored, with a warning.
pub fn patch_icon(
    library: &Library,
    game_id: &str,
    image_path: &Path,
) -> Result<PatchOutcome, ImportError> {
    let bytes = std::fs::read(image_path).map_err(|e| ImportError::read(image_path, e))?;
    store_icon(library, game_id, &bytes, image_path)
}

fn store_icon(
    library: &Library,
    game_id: &str,
    bytes: &[u8],
    source: &Path,
) -> Result<PatchOutcome, ImportError> {
    if let Err(e) = image::guess_format(bytes) {
        log::warn!("{} does not look like an image: {e}", source.display());
    }

    match library.update_icon(game_id, bytes) {
        Ok(()) => {
            log::info!("Updated IconBlob for GameId = {game_id}");
            Ok(PatchOutcome::Updated)
        }
        Err(LibraryError::NotFound { .. }) => Ok(PatchOutcome::NotFound),
        Err(e) => Err(e.into()),
    }
}

/// Walk `dir` for `ICON0.PNG` files laid out as `<GameId>/ICON0.PNG`
/// (the RPCS3 `dev_hdd0/game` layout) and store each one whose folder names
/// a game in the catalog.
pub fn import_icon_dir(library: &Library, dir: &Path) -> Result<IconDirSummary, ImportError> {
    let mut summary = IconDirSummary::default();

    for entry in WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !entry.file_type().is_file()
            || !entry
                .file_name()
                .to_string_lossy()
                .eq_ignore_ascii_case(ICON_FILE_NAME)
        {
            continue;
        }

        let Some(game_id) = path
            .parent()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned())
        else {
            continue;
        };

        if !library.contains(&game_id)? {
            log::debug!("skipping {}: {game_id} is not in the catalog", path.display());
            summary.unknown += 1;
            continue;
        }

        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                log::warn!("could not read {}: {e}", path.display());
                summary.failed += 1;
                continue;
            }
        };

        match store_icon(library, &game_id, &bytes, path)? {
            PatchOutcome::Updated => summary.updated += 1,
            PatchOutcome::NotFound => summary.unknown += 1,
        }
    }

    log::info!(
        "Icon import from {}: {} updated, {} unknown, {} failed",
        dir.display(),
        summary.updated,
        summary.unknown,
        summary.failed
    );
    Ok(summary)
}
