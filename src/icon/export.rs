//! Saving a game's icon to a file chosen by the user
use image::{DynamicImage, ImageFormat};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("icon data is not a readable image: {0}")]
    Decode(#[source] image::ImageError),
    #[error("could not encode icon: {0}")]
    Encode(#[source] image::ImageError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// What happened when the user asked to save an icon
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// The icon was written here
    Saved(PathBuf),
    /// The game has no icon; nothing was written
    NoImage,
    /// The user dismissed the chooser; nothing was written
    Cancelled,
}

/// Suggested file name for the save dialog
pub fn default_file_name(game_id: &str) -> String {
    format!("{game_id}.png")
}

/// Format for `path`, from its extension; PNG when absent or unknown
pub fn format_for(path: &Path) -> ImageFormat {
    ImageFormat::from_path(path).unwrap_or(ImageFormat::Png)
}

/// Write `icon` to `destination`.
///
/// The image is fully encoded into a temporary file next to `destination`
/// and renamed into place, so a failure leaves no file behind.
pub fn export_icon(
    icon: Option<&[u8]>,
    game_id: &str,
    destination: Option<&Path>,
) -> Result<ExportOutcome, ExportError> {
    let Some(bytes) = icon else {
        log::info!("{game_id} has no icon to export");
        return Ok(ExportOutcome::NoImage);
    };
    let Some(destination) = destination else {
        return Ok(ExportOutcome::Cancelled);
    };

    let img = image::load_from_memory(bytes).map_err(ExportError::Decode)?;
    let format = format_for(destination);
    let img = match format {
        // JPEG has no alpha channel
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(img.into_rgb8()),
        _ => img,
    };

    let dir = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    img.write_to(&mut tmp, format).map_err(ExportError::Encode)?;
    tmp.flush()?;
    tmp.persist(destination).map_err(|e| ExportError::Io(e.error))?;

    log::info!("saved icon for {game_id} to {}", destination.display());
    Ok(ExportOutcome::Saved(destination.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::library::tests::png_bytes;

    fn entries(dir: &Path) -> usize {
        std::fs::read_dir(dir).unwrap().count()
    }

    #[test]
    fn default_name_uses_game_id() {
        assert_eq!(default_file_name("BLES00001"), "BLES00001.png");
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(format_for(Path::new("a.png")), ImageFormat::Png);
        assert_eq!(format_for(Path::new("a.jpg")), ImageFormat::Jpeg);
        assert_eq!(format_for(Path::new("a.bmp")), ImageFormat::Bmp);
        assert_eq!(format_for(Path::new("a")), ImageFormat::Png);
        assert_eq!(format_for(Path::new("a.unknown")), ImageFormat::Png);
    }

    #[test]
    fn missing_icon_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("BLES00002.png");

        let outcome = export_icon(None, "BLES00002", Some(&dest)).unwrap();

        assert_eq!(outcome, ExportOutcome::NoImage);
        assert_eq!(entries(dir.path()), 0);
    }

    #[test]
    fn cancelled_chooser_writes_nothing() {
        let bytes = png_bytes(10, 10);
        let outcome = export_icon(Some(&bytes), "BLES00001", None).unwrap();
        assert_eq!(outcome, ExportOutcome::Cancelled);
    }

    #[test]
    fn valid_icon_is_written_and_decodable() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("BLES00001.png");
        let bytes = png_bytes(10, 10);

        let outcome = export_icon(Some(&bytes), "BLES00001", Some(&dest)).unwrap();

        assert_eq!(outcome, ExportOutcome::Saved(dest.clone()));
        let written = image::open(&dest).unwrap();
        assert_eq!((written.width(), written.height()), (10, 10));
        assert_eq!(entries(dir.path()), 1);
    }

    #[test]
    fn jpeg_destination_drops_alpha() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("icon.jpg");
        let bytes = png_bytes(16, 16);

        export_icon(Some(&bytes), "BLES00001", Some(&dest)).unwrap();

        assert_eq!(image::ImageFormat::from_path(&dest).unwrap(), ImageFormat::Jpeg);
        assert!(image::open(&dest).is_ok());
    }

    #[test]
    fn corrupt_icon_fails_without_leaving_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("bad.png");

        let err = export_icon(Some(b"not an image"), "BLES00003", Some(&dest)).unwrap_err();

        assert!(matches!(err, ExportError::Decode(_)));
        assert!(err.to_string().starts_with("icon data is not a readable image"));
        assert_eq!(entries(dir.path()), 0);
    }

    #[test]
    fn unwritable_destination_reports_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("missing-dir").join("icon.png");
        let bytes = png_bytes(10, 10);

        let err = export_icon(Some(&bytes), "BLES00001", Some(&dest)).unwrap_err();

        assert!(matches!(err, ExportError::Io(_)));
        assert!(!dest.exists());
    }
}
