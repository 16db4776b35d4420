//! Bulk import of games from a CSV file
//!
//! The CSV carries one row per game with a header line naming the `games`
//! columns (`GameId`, `GameTitle`, `ArcadeGame`, ...). Missing or empty text
//! columns take the schema default, missing or empty flags are 0.
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use super::ImportError;
use crate::state::data::{GameRecord, Region, UNKNOWN};
use crate::state::library::Library;

/// Result of a CSV import
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
}

/// Parse games from CSV. Rows without a `GameId` and malformed rows are
/// skipped and counted.
pub fn parse_games<R: Read>(reader: R) -> Result<(Vec<GameRecord>, usize), ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let columns: HashMap<String, usize> = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, name)| (name.trim().to_string(), i))
        .collect();

    let mut games = Vec::new();
    let mut skipped = 0;

    for (line, result) in reader.records().enumerate() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                log::warn!("Skipping malformed CSV row {}: {e}", line + 2);
                skipped += 1;
                continue;
            }
        };

        let row = Row {
            columns: &columns,
            record: &record,
        };
        match row.to_game() {
            Some(game) => games.push(game),
            None => {
                log::warn!("Skipping CSV row {} without a GameId", line + 2);
                skipped += 1;
            }
        }
    }

    Ok((games, skipped))
}

struct Row<'a> {
    columns: &'a HashMap<String, usize>,
    record: &'a StringRecord,
}

impl Row<'_> {
    /// Trimmed value, `None` if the column is missing or empty
    fn get(&self, column: &str) -> Option<&str> {
        self.columns
            .get(column)
            .and_then(|&i| self.record.get(i))
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }

    fn text(&self, column: &str, default: &str) -> String {
        self.get(column).unwrap_or(default).to_string()
    }

    fn flag(&self, column: &str) -> bool {
        match self.get(column) {
            None => false,
            Some(v) => match v.parse::<i64>() {
                Ok(n) => n != 0,
                Err(_) => {
                    log::warn!("{column} value {v:?} is not a number, using 0");
                    false
                }
            },
        }
    }

    fn to_game(&self) -> Option<GameRecord> {
        let mut game = GameRecord::new(self.get("GameId")?);
        game.arcade_game = self.flag("ArcadeGame");
        game.eboot = self.text("Eboot", &game.eboot);
        game.favorite = self.flag("Favorite");
        game.title = self.text("GameTitle", &game.title);
        game.genre = self.text("Genre", &game.genre);
        game.icon0 = self.text("Icon0", &game.icon0);
        game.loader = self.text("Loader", &game.loader);
        game.param = self.text("Param", &game.param);
        game.pic1 = self.text("Pic1", &game.pic1);
        game.played = self.flag("Played");
        game.psn = self.flag("PSN");
        game.format = self.text("Format", &game.format);
        game.publisher = self.text("Publisher", &game.publisher);
        game.region = self.text("Region", &game.region);
        game.release_date = self.text("ReleaseDate", &game.release_date);
        game.snd0 = self.text("Snd0", &game.snd0);
        game.have = self.flag("Have");

        if game.region != UNKNOWN && Region::from_code(&game.region).is_none() {
            log::warn!("{} has unrecognized region {:?}", game.game_id, game.region);
        }
        Some(game)
    }
}

/// Read each game's `Icon0` file into its icon blob.
/// Relative paths resolve against `base_dir`; unreadable files are skipped.
pub fn load_icons(games: &mut [GameRecord], base_dir: &Path) -> usize {
    let mut loaded = 0;
    for game in games.iter_mut().filter(|g| !g.icon0.is_empty()) {
        let path = base_dir.join(&game.icon0);
        match std::fs::read(&path) {
            Ok(bytes) => {
                game.icon_blob = Some(bytes);
                loaded += 1;
            }
            Err(e) => log::debug!("no icon for {} at {}: {e}", game.game_id, path.display()),
        }
    }
    loaded
}

/// Import `csv_path` into the library, replacing rows with the same GameId.
///
/// Replaced rows lose their stored icon unless `with_icons` finds one
/// through their `Icon0` path.
pub fn import_csv(
    library: &mut Library,
    csv_path: &Path,
    with_icons: bool,
) -> Result<ImportSummary, ImportError> {
    let file = std::fs::File::open(csv_path).map_err(|e| ImportError::read(csv_path, e))?;
    let (mut games, skipped) = parse_games(file)?;

    if with_icons {
        let base_dir = csv_path.parent().unwrap_or(Path::new("."));
        let loaded = load_icons(&mut games, base_dir);
        log::info!("Loaded {loaded} icons from Icon0 paths");
    }

    let imported = library.upsert_games(&games)?;
    log::info!(
        "Imported {imported} games from {} ({skipped} skipped)",
        csv_path.display()
    );

    Ok(ImportSummary { imported, skipped })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::FilterState;
    use crate::state::query;

    const CSV: &str = "\
GameId,GameTitle,ArcadeGame,PSN,Region,Publisher,Format,Icon0
BLES00001,Alpha,0,0,EU,Sony,,
BLES00002,Beta,1,,US,,,icons/beta.png
,No Id,0,0,JP,,,
NPUB30001,  Gamma  ,x,1,,,PSN,";

    #[test]
    fn parse_applies_defaults() {
        let (games, skipped) = parse_games(CSV.as_bytes()).unwrap();
        assert_eq!(games.len(), 3);
        assert_eq!(skipped, 1);

        let alpha = &games[0];
        assert_eq!(alpha.game_id, "BLES00001");
        assert_eq!(alpha.publisher, "Sony");
        assert_eq!(alpha.format, "PlayStation 3");
        assert_eq!(alpha.genre, "Unknown");
        assert!(!alpha.arcade_game);

        let beta = &games[1];
        assert!(beta.arcade_game);
        assert!(!beta.psn);
        assert_eq!(beta.publisher, "Unknown");
        assert_eq!(beta.icon0, "icons/beta.png");

        let gamma = &games[2];
        assert_eq!(gamma.title, "Gamma");
        assert!(!gamma.arcade_game);
        assert!(gamma.psn);
        assert_eq!(gamma.region, "Unknown");
        assert_eq!(gamma.format, "PSN");
    }

    #[test]
    fn missing_columns_take_defaults() {
        let (games, _) = parse_games("GameId\nBLUS30001\n".as_bytes()).unwrap();
        assert_eq!(games[0], GameRecord::new("BLUS30001"));
    }

    #[test]
    fn import_upserts_and_loads_icons() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("icons")).unwrap();
        std::fs::write(dir.path().join("icons/beta.png"), [1, 2, 3]).unwrap();
        let csv_path = dir.path().join("main_games.csv");
        std::fs::write(&csv_path, CSV).unwrap();

        let mut library = Library::open_in_memory().unwrap();
        let summary = import_csv(&mut library, &csv_path, true).unwrap();
        assert_eq!(summary, ImportSummary { imported: 3, skipped: 1 });

        // Importing again replaces rather than duplicates
        import_csv(&mut library, &csv_path, false).unwrap();
        assert_eq!(library.game_count().unwrap(), 3);

        let filter = FilterState::default().with_text("Beta");
        let games = library.scan(&query::build(&filter)).unwrap();
        assert_eq!(games[0].icon, None);
    }

    #[test]
    fn import_with_icons_stores_blob() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("icons")).unwrap();
        std::fs::write(dir.path().join("icons/beta.png"), [1, 2, 3]).unwrap();
        let csv_path = dir.path().join("main_games.csv");
        std::fs::write(&csv_path, CSV).unwrap();

        let mut library = Library::open_in_memory().unwrap();
        import_csv(&mut library, &csv_path, true).unwrap();

        let filter = FilterState::default().with_arcade_only(true);
        let games = library.scan(&query::build(&filter)).unwrap();
        assert_eq!(games[0].icon.as_deref(), Some(&[1u8, 2, 3][..]));
    }

    #[test]
    fn missing_csv_reports_path() {
        let mut library = Library::open_in_memory().unwrap();
        let err = import_csv(&mut library, Path::new("/nonexistent/games.csv"), false)
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/games.csv"));
    }
}
