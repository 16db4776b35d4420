use chrono::Datelike;
use clap::Parser;
use iced::widget::image::Handle;
use iced::widget::{
    button, checkbox, column, container, image, pick_list, row, scrollable, text, text_input,
    Column, Row,
};
use iced::{Alignment, Element, Length, Size, Task, Theme};
use rfd::{FileDialog, MessageButtons, MessageDialog, MessageLevel};
use std::process::ExitCode;

mod cli;
mod icon;
mod settings;
mod state;
mod tools;

use icon::export::{default_file_name, export_icon, ExportOutcome};
use icon::thumbnail::{THUMB_HEIGHT, THUMB_WIDTH};
use icon::tile::{grid_position, Tile, TileRenderer};
use settings::Settings;
use state::data::{FilterState, RegionFilter};
use state::library::Library;
use state::session::BrowseSession;

const TILE_WIDTH: f32 = 140.0;
const TILE_HEIGHT: f32 = 230.0;

/// Main application state
struct IconBrowser {
    /// The game catalog
    library: Library,
    /// Active filter, its results and the current page
    session: BrowseSession,
    renderer: TileRenderer,
    /// Widget handle for the shared placeholder bitmap
    placeholder: Handle,
    /// Tiles of the current page with their widget handles
    tiles: Vec<(Tile, Handle)>,
    /// Search box contents; applied on submit or with any filter change
    search_input: String,
    /// Status line under the title
    status: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    SearchChanged(String),
    Search,
    ArcadeToggled(bool),
    PsnToggled(bool),
    RegionSelected(RegionFilter),
    Clear,
    NextPage,
    PreviousPage,
    /// Save the icon of the tile at this index on the current page
    SaveIcon(usize),
}

impl IconBrowser {
    fn new(library: Library, page_size: usize) -> (Self, Task<Message>) {
        let renderer = TileRenderer::new();
        let placeholder = to_handle(renderer.placeholder());

        let mut browser = IconBrowser {
            library,
            session: BrowseSession::new(page_size),
            renderer,
            placeholder,
            tiles: Vec::new(),
            search_input: String::new(),
            status: String::new(),
        };

        browser.run_query(FilterState::default());
        if let Ok(total) = browser.library.game_count() {
            log::info!(
                "Icon browser initialized with {total} games from {}",
                browser.library.path().display()
            );
            browser.status = format!("Total games found: {total}");
        }

        (browser, Task::none())
    }

    fn title(&self) -> String {
        format!(
            "RPCS3 Game Icon Browser - \u{a9} {}",
            chrono::Local::now().year()
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::SearchChanged(input) => {
                self.search_input = input;
            }
            Message::Search => {
                let filter = self.pending_filter();
                self.run_query(filter);
            }
            Message::ArcadeToggled(on) => {
                let filter = self.pending_filter().with_arcade_only(on);
                self.run_query(filter);
            }
            Message::PsnToggled(on) => {
                let filter = self.pending_filter().with_psn_only(on);
                self.run_query(filter);
            }
            Message::RegionSelected(region) => {
                let filter = self.pending_filter().with_region(region);
                self.run_query(filter);
            }
            Message::Clear => {
                if self.run_query(FilterState::default()) {
                    self.search_input.clear();
                }
            }
            Message::NextPage => {
                self.session.next_page();
                self.render_page();
            }
            Message::PreviousPage => {
                self.session.previous_page();
                self.render_page();
            }
            Message::SaveIcon(index) => self.save_icon(index),
        }

        Task::none()
    }

    /// The current filter with whatever is typed in the search box
    fn pending_filter(&self) -> FilterState {
        self.session
            .filter()
            .clone()
            .with_text(self.search_input.trim())
    }

    /// Apply `filter` and show its first page. Returns false if the query
    /// failed, in which case the previous results stay on screen.
    fn run_query(&mut self, filter: FilterState) -> bool {
        match self.session.apply_filter(filter, &self.library) {
            Ok(found) => {
                self.status = if found == 0 {
                    "No games found.".to_string()
                } else {
                    format!("Games found: {found}")
                };
                self.render_page();
                true
            }
            Err(e) => {
                log::error!("query failed: {e}");
                self.status = format!("Search failed: {e}");
                false
            }
        }
    }

    fn render_page(&mut self) {
        let tiles: Vec<(Tile, Handle)> = self
            .renderer
            .render_page(self.session.current_page())
            .into_iter()
            .map(|tile| {
                let handle = if self.renderer.is_placeholder(&tile) {
                    self.placeholder.clone()
                } else {
                    to_handle(&tile.bitmap)
                };
                (tile, handle)
            })
            .collect();
        self.tiles = tiles;
    }

    fn save_icon(&mut self, index: usize) {
        let Some(game) = self.session.current_page().get(index).cloned() else {
            return;
        };

        let destination = game.icon.as_ref().and_then(|_| {
            FileDialog::new()
                .set_title("Save Icon")
                .add_filter("PNG Images", &["png"])
                .set_file_name(default_file_name(&game.game_id))
                .save_file()
        });

        match export_icon(game.icon.as_deref(), &game.game_id, destination.as_deref()) {
            Ok(ExportOutcome::Saved(path)) => {
                notify(
                    MessageLevel::Info,
                    "Saved",
                    &format!("Icon saved as {}", path.display()),
                );
            }
            Ok(ExportOutcome::NoImage) => {
                notify(
                    MessageLevel::Info,
                    "No Image",
                    "No icon available to save for this game.",
                );
            }
            Ok(ExportOutcome::Cancelled) => {}
            Err(e) => {
                log::error!("saving icon for {} failed: {e}", game.game_id);
                notify(
                    MessageLevel::Error,
                    "Error",
                    &format!("Failed to save icon: {e}"),
                );
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let filter = self.session.filter();

        let header = column![
            text("Search on game id or game title").size(22),
            text(&self.status).size(16),
        ]
        .spacing(4);

        let search_bar = row![
            text_input("Game id or title", &self.search_input)
                .on_input(Message::SearchChanged)
                .on_submit(Message::Search)
                .padding(8)
                .size(16),
            checkbox("Arcade", filter.arcade_only).on_toggle(Message::ArcadeToggled),
            checkbox("PSN", filter.psn_only).on_toggle(Message::PsnToggled),
            pick_list(
                RegionFilter::OPTIONS,
                Some(filter.region),
                Message::RegionSelected
            ),
            button("Clear").on_press(Message::Clear).padding(8),
            button("Search").on_press(Message::Search).padding(8),
        ]
        .spacing(10)
        .align_y(Alignment::Center);

        let pager = row![
            button("Previous")
                .on_press_maybe(self.session.has_previous_page().then_some(Message::PreviousPage)),
            text(format!(
                "Page {} of {}",
                self.session.pages().current_page() + 1,
                self.session.total_pages()
            )),
            button("Next").on_press_maybe(self.session.has_next_page().then_some(Message::NextPage)),
        ]
        .spacing(12)
        .align_y(Alignment::Center);

        column![
            header,
            search_bar,
            scrollable(self.grid()).width(Length::Fill).height(Length::Fill),
            pager,
        ]
        .spacing(12)
        .padding(16)
        .into()
    }

    fn grid(&self) -> Element<Message> {
        if self.session.cache().is_empty() {
            return text("No games to show.").size(16).into();
        }

        let mut rows: Vec<Vec<Element<Message>>> = Vec::new();
        for (index, (tile, handle)) in self.tiles.iter().enumerate() {
            let (row, _column) = grid_position(index);
            if row == rows.len() {
                rows.push(Vec::new());
            }
            rows[row].push(tile_view(index, tile, handle));
        }

        Column::with_children(
            rows.into_iter()
                .map(|cells| Row::with_children(cells).spacing(16).into()),
        )
        .spacing(16)
        .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn tile_view<'a>(index: usize, tile: &'a Tile, handle: &Handle) -> Element<'a, Message> {
    let thumb = container(image(handle.clone()))
        .center_x(Length::Fixed(THUMB_WIDTH as f32))
        .center_y(Length::Fixed(THUMB_HEIGHT as f32));

    container(
        column![
            thumb,
            text(&tile.game_id).size(14),
            text(&tile.title).size(12).height(Length::Fixed(48.0)),
            button("Save Icon").on_press(Message::SaveIcon(index)),
        ]
        .spacing(4)
        .align_x(Alignment::Center),
    )
    .width(Length::Fixed(TILE_WIDTH))
    .height(Length::Fixed(TILE_HEIGHT))
    .padding(6)
    .style(container::bordered_box)
    .into()
}

fn to_handle(bitmap: &icon::tile::Bitmap) -> Handle {
    Handle::from_rgba(bitmap.width(), bitmap.height(), bitmap.as_raw().clone())
}

fn notify(level: MessageLevel, title: &str, description: &str) {
    MessageDialog::new()
        .set_level(level)
        .set_title(title)
        .set_description(description)
        .set_buttons(MessageButtons::Ok)
        .show();
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = cli::Cli::parse();
    let settings = Settings::load_or_default();

    if let Some(command) = cli.command {
        return cli::run(command, cli.db.as_deref(), settings);
    }

    let db_path = settings.database_path(cli.db.as_deref());
    let library = match Library::open(&db_path) {
        Ok(library) => library,
        Err(e) => {
            log::error!("failed to open {}: {e}", db_path.display());
            notify(
                MessageLevel::Error,
                "Error",
                &format!("Could not open the game database at {}: {e}", db_path.display()),
            );
            return ExitCode::FAILURE;
        }
    };
    let page_size = settings.page_size;

    let result = iced::application(IconBrowser::title, IconBrowser::update, IconBrowser::view)
        .theme(IconBrowser::theme)
        .window_size(Size::new(1000.0, 700.0))
        .resizable(false)
        .centered()
        .run_with(move || IconBrowser::new(library, page_size));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::library::tests::sample_library;

    fn browser() -> IconBrowser {
        IconBrowser::new(sample_library(), 1).0
    }

    #[test]
    fn startup_shows_the_whole_catalog() {
        let browser = browser();
        assert_eq!(browser.status, "Total games found: 2");
        assert_eq!(browser.tiles.len(), 1);
        assert_eq!(browser.tiles[0].0.title, "Alpha");
    }

    #[test]
    fn search_applies_typed_text() {
        let mut browser = browser();
        let _ = browser.update(Message::SearchChanged("  beta ".to_string()));
        let _ = browser.update(Message::Search);

        assert_eq!(browser.session.filter().text, "beta");
        assert_eq!(browser.status, "Games found: 1");
        assert_eq!(browser.tiles[0].0.game_id, "BLES00002");
    }

    #[test]
    fn clear_resets_filter_and_search_box() {
        let mut browser = browser();
        let _ = browser.update(Message::SearchChanged("Alpha".to_string()));
        let _ = browser.update(Message::Search);
        let _ = browser.update(Message::Clear);

        assert!(browser.search_input.is_empty());
        assert_eq!(browser.session.filter(), &FilterState::default());
        assert_eq!(browser.status, "Games found: 2");
    }

    #[test]
    fn failed_clear_keeps_search_box_in_step_with_filter() {
        let mut browser = browser();
        let _ = browser.update(Message::SearchChanged("Alpha".to_string()));
        let _ = browser.update(Message::Search);

        browser
            .library
            .conn_for_tests()
            .execute_batch("DROP TABLE games")
            .unwrap();
        let _ = browser.update(Message::Clear);

        assert!(browser.status.starts_with("Search failed"));
        assert_eq!(browser.search_input, "Alpha");
        assert_eq!(browser.session.filter().text, "Alpha");
        assert_eq!(browser.tiles[0].0.title, "Alpha");
    }
}
