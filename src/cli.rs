//! Command line: no subcommand opens the browser, subcommands maintain the catalog
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::settings::Settings;
use crate::state::library::Library;
use crate::tools::csv_import::import_csv;
use crate::tools::ImportError;
use crate::tools::icon_patch::{import_icon_dir, patch_icon, PatchOutcome, ICON_FILE_NAME};

#[derive(Parser)]
#[command(name = "rpcs3-icon-browser")]
#[command(about = "Browse and maintain a catalog of PS3 game icons", long_about = None)]
pub struct Cli {
    /// Catalog database (defaults to the configured one, then games.db beside the executable)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Insert or replace games from a CSV export
    ImportCsv {
        /// CSV file with a header row of games columns
        #[arg(default_value = "main_games.csv")]
        csv: PathBuf,

        /// Also read each row's Icon0 file into the catalog
        #[arg(long)]
        load_icons: bool,
    },

    /// Replace the icon of one game
    PatchIcon {
        /// GameId of the game to update
        game_id: String,

        /// Image file to store
        #[arg(default_value = ICON_FILE_NAME)]
        image: PathBuf,
    },

    /// Store every <GameId>/ICON0.PNG found under a folder
    ImportIcons {
        /// Folder to search, e.g. RPCS3's dev_hdd0/game
        dir: PathBuf,
    },

    /// Save --db and page size as the defaults
    Config {
        /// Games per page in the grid
        #[arg(long)]
        page_size: Option<usize>,
    },
}

/// Run a maintenance subcommand, printing its result
pub fn run(command: Command, db: Option<&Path>, settings: Settings) -> ExitCode {
    let result = match command {
        Command::Config { page_size } => return save_config(settings, db, page_size),
        Command::ImportCsv { csv, load_icons } => open_library(&settings, db)
            .and_then(|mut library| import_csv(&mut library, &csv, load_icons))
            .map(|s| {
                println!(
                    "Successfully imported {} entries from {} ({} skipped).",
                    s.imported,
                    csv.display(),
                    s.skipped
                )
            }),
        Command::PatchIcon { game_id, image } => open_library(&settings, db)
            .and_then(|library| patch_icon(&library, &game_id, &image))
            .map(|outcome| match outcome {
                PatchOutcome::Updated => println!("Updated IconBlob for GameId = {game_id}"),
                PatchOutcome::NotFound => println!("No row found with GameId = {game_id}"),
            }),
        Command::ImportIcons { dir } => open_library(&settings, db)
            .and_then(|library| import_icon_dir(&library, &dir))
            .map(|s| {
                println!(
                    "Updated {} icons ({} not in catalog, {} unreadable).",
                    s.updated, s.unknown, s.failed
                )
            }),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn open_library(settings: &Settings, db: Option<&Path>) -> Result<Library, ImportError> {
    Ok(Library::open(&settings.database_path(db))?)
}

fn save_config(mut settings: Settings, db: Option<&Path>, page_size: Option<usize>) -> ExitCode {
    let Some(path) = Settings::default_path() else {
        eprintln!("No config directory on this platform");
        return ExitCode::FAILURE;
    };

    if let Some(db) = db {
        settings.database = Some(db.to_path_buf());
    }
    if let Some(page_size) = page_size {
        settings.page_size = page_size.max(1);
    }

    match settings.save(&path) {
        Ok(()) => {
            println!("Saved settings to {}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to save {}: {e}", path.display());
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_opens_browser() {
        let cli = Cli::try_parse_from(["rpcs3-icon-browser"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.db.is_none());
    }

    #[test]
    fn patch_icon_defaults_to_icon0() {
        let cli =
            Cli::try_parse_from(["rpcs3-icon-browser", "patch-icon", "BLES00001", "--db", "x.db"])
                .unwrap();
        assert_eq!(cli.db, Some(PathBuf::from("x.db")));
        match cli.command {
            Some(Command::PatchIcon { game_id, image }) => {
                assert_eq!(game_id, "BLES00001");
                assert_eq!(image, PathBuf::from("ICON0.PNG"));
            }
            _ => panic!("expected patch-icon"),
        }
    }

    #[test]
    fn import_csv_defaults() {
        let cli = Cli::try_parse_from(["rpcs3-icon-browser", "import-csv"]).unwrap();
        match cli.command {
            Some(Command::ImportCsv { csv, load_icons }) => {
                assert_eq!(csv, PathBuf::from("main_games.csv"));
                assert!(!load_icons);
            }
            _ => panic!("expected import-csv"),
        }
    }

    #[test]
    fn import_csv_subcommand_writes_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("games.csv");
        std::fs::write(&csv, "GameId,GameTitle\nBLES00001,Alpha\n").unwrap();
        let db = dir.path().join("games.db");

        let code = run(
            Command::ImportCsv {
                csv,
                load_icons: false,
            },
            Some(db.as_path()),
            Settings::default(),
        );

        assert_eq!(code, ExitCode::SUCCESS);
        assert_eq!(Library::open(&db).unwrap().game_count().unwrap(), 1);
    }
}
