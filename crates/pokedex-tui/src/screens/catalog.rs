//! Catalog screen: paged list with name/type filters.
//!
//! The row after the last entry is the scroll sentinel. When it scrolls
//! into view the listing controller is asked for the next page; the
//! controller refuses while a fetch is outstanding or the list is complete.

use std::cell::Cell;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use pokedex_api::PokedexClient;
use pokedex_core::display::format_pokedex_id;
use pokedex_core::{Completion, ListingController, PageRequest, Pokemon};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, BorderType, Borders, Cell as TableCell, Clear, Paragraph, Row, Table, TableState,
};
use throbber_widgets_tui::{Throbber, ThrobberState};
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use crate::action::Action;
use crate::component::Component;
use crate::fetch;
use crate::theme;

const EMPTY_MESSAGE: &str = "No Pokémon found. Try adjusting your filters.";
const END_MESSAGE: &str = "You've reached the end of the list!";
const SCROLL_STEP: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Browse,
    /// Typing a name query.
    Search,
    /// Choosing types in the popup.
    TypePicker,
}

pub struct CatalogScreen {
    focused: bool,
    action_tx: Option<UnboundedSender<Action>>,
    client: PokedexClient,
    listing: ListingController,
    table_state: TableState,
    mode: Mode,
    name_input: String,
    /// Bumped on every keystroke; only the newest debounce timer applies.
    name_generation: u64,
    picker_index: usize,
    throbber_state: ThrobberState,
    /// Whether the sentinel was on screen at the previous check.
    sentinel_seen: bool,
    // Table geometry from the last frame.
    viewport_rows: Cell<usize>,
    viewport_offset: Cell<usize>,
}

impl CatalogScreen {
    pub fn new(client: PokedexClient, page_size: u32) -> Self {
        Self {
            focused: false,
            action_tx: None,
            client,
            listing: ListingController::new(page_size),
            table_state: TableState::default(),
            mode: Mode::Browse,
            name_input: String::new(),
            name_generation: 0,
            picker_index: 0,
            throbber_state: ThrobberState::default(),
            sentinel_seen: false,
            viewport_rows: Cell::new(0),
            viewport_offset: Cell::new(0),
        }
    }

    // ── Fetching ────────────────────────────────────────────────────

    fn fetch(&self, request: PageRequest) {
        if let Some(tx) = &self.action_tx {
            fetch::spawn_page(&self.client, request, tx);
        }
    }

    fn fetch_types(&self) {
        if let Some(tx) = &self.action_tx {
            fetch::spawn_types(&self.client, tx);
        }
    }

    /// The sentinel row lies inside the drawn window.
    fn sentinel_in_view(&self) -> bool {
        let entries = self.listing.entries().len();
        entries > 0 && self.viewport_offset.get() + self.viewport_rows.get() > entries
    }

    /// Next page request if the sentinel has just come into view.
    fn poll_sentinel(&mut self) -> Option<PageRequest> {
        let visible = self.sentinel_in_view();
        let appeared = visible && !self.sentinel_seen;
        self.sentinel_seen = visible;
        if appeared {
            self.listing.sentinel_visible()
        } else {
            None
        }
    }

    fn check_sentinel(&mut self) {
        if let Some(request) = self.poll_sentinel() {
            debug!(page = request.page(), "sentinel visible, loading more");
            self.fetch(request);
        }
    }

    fn apply_name(&mut self) {
        let request = self.listing.set_name(&self.name_input);
        self.fetch(request);
    }

    // ── Selection ───────────────────────────────────────────────────

    fn selected_pokemon(&self) -> Option<&Pokemon> {
        self.listing
            .entries()
            .get(self.table_state.selected().unwrap_or(0))
    }

    fn select(&mut self, idx: usize) {
        let len = self.listing.entries().len();
        if len == 0 {
            self.table_state.select(None);
        } else {
            self.table_state.select(Some(idx.min(len - 1)));
        }
    }

    fn move_down(&mut self, by: usize) {
        let current = self.table_state.selected().unwrap_or(0);
        self.select(current.saturating_add(by));
    }

    fn move_up(&mut self, by: usize) {
        let current = self.table_state.selected().unwrap_or(0);
        self.select(current.saturating_sub(by));
    }

    fn page_rows(&self) -> usize {
        self.viewport_rows.get().max(1)
    }

    // ── Key handling per mode ───────────────────────────────────────

    fn handle_browse_key(&mut self, key: KeyEvent) -> Option<Action> {
        match (key.modifiers, key.code) {
            (_, KeyCode::Char('j') | KeyCode::Down) => self.move_down(1),
            (_, KeyCode::Char('k') | KeyCode::Up) => self.move_up(1),
            (_, KeyCode::Char('g') | KeyCode::Home) => self.select(0),
            (_, KeyCode::Char('G') | KeyCode::End) => self.select(usize::MAX),
            (KeyModifiers::CONTROL, KeyCode::Char('d')) | (_, KeyCode::PageDown) => {
                self.move_down(self.page_rows());
            }
            (KeyModifiers::CONTROL, KeyCode::Char('u')) | (_, KeyCode::PageUp) => {
                self.move_up(self.page_rows());
            }
            (_, KeyCode::Enter) => {
                return self
                    .selected_pokemon()
                    .map(|p| Action::OpenDetail(p.pokedex_id));
            }
            (_, KeyCode::Char('/')) => {
                self.name_input = self.listing.filters().name.clone().unwrap_or_default();
                self.mode = Mode::Search;
            }
            (_, KeyCode::Char('t')) => {
                self.picker_index = 0;
                self.mode = Mode::TypePicker;
                if self.listing.types().is_empty() {
                    self.fetch_types();
                }
            }
            (_, KeyCode::Char('l')) => {
                let request = self.listing.cycle_limit();
                self.fetch(request);
            }
            (_, KeyCode::Char('c')) => {
                self.name_input.clear();
                self.name_generation += 1;
                let request = self.listing.clear_filters();
                self.fetch(request);
            }
            (_, KeyCode::Char('r')) => {
                let request = self.listing.refresh();
                self.fetch(request);
                if self.listing.types().is_empty() {
                    self.fetch_types();
                }
            }
            _ => {}
        }
        None
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                // Invalidate any pending debounce timer.
                self.name_generation += 1;
                self.mode = Mode::Browse;
                self.apply_name();
            }
            KeyCode::Esc => self.mode = Mode::Browse,
            KeyCode::Backspace => {
                self.name_input.pop();
                self.schedule_name();
            }
            KeyCode::Char(c) => {
                self.name_input.push(c);
                self.schedule_name();
            }
            _ => {}
        }
    }

    fn schedule_name(&mut self) {
        self.name_generation += 1;
        if let Some(tx) = &self.action_tx {
            fetch::spawn_name_debounce(self.name_generation, tx);
        }
    }

    fn handle_picker_key(&mut self, key: KeyEvent) {
        let count = self.listing.types().len();
        match key.code {
            KeyCode::Esc | KeyCode::Char('t' | 'q') => self.mode = Mode::Browse,
            KeyCode::Char('j') | KeyCode::Down if count > 0 => {
                self.picker_index = (self.picker_index + 1) % count;
            }
            KeyCode::Char('k') | KeyCode::Up if count > 0 => {
                self.picker_index = (self.picker_index + count - 1) % count;
            }
            KeyCode::Char(' ') | KeyCode::Enter => {
                if let Some(type_id) = self.listing.types().get(self.picker_index).map(|t| t.id)
                {
                    let request = self.listing.toggle_type(type_id);
                    self.fetch(request);
                }
            }
            _ => {}
        }
    }

    // ── Rendering ───────────────────────────────────────────────────

    fn render_filters(&self, frame: &mut Frame, area: Rect) {
        let filters = self.listing.filters();
        let searching = self.mode == Mode::Search;

        let block = Block::default()
            .title(" Pokédex ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if searching {
                theme::border_focused()
            } else {
                theme::border_default()
            });

        let name = if searching {
            Span::styled(
                format!("{}▏", self.name_input),
                Style::default().fg(theme::ELECTRIC_YELLOW),
            )
        } else {
            Span::styled(
                filters.name.clone().unwrap_or_else(|| "─".into()),
                Style::default().fg(theme::NEON_CYAN),
            )
        };

        let mut spans = vec![Span::styled(" Name ", theme::key_hint()), name];
        spans.push(Span::styled("   Types ", theme::key_hint()));
        let selected: Vec<_> = self
            .listing
            .types()
            .iter()
            .filter(|t| self.listing.is_type_selected(t.id))
            .collect();
        if selected.is_empty() && filters.types.is_empty() {
            spans.push(Span::styled("all", Style::default().fg(theme::DIM_WHITE)));
        } else if selected.is_empty() {
            // Ids chosen before the taxonomy arrived.
            let ids: Vec<_> = filters.types.iter().map(ToString::to_string).collect();
            spans.push(Span::styled(ids.join(", "), Style::default().fg(theme::DIM_WHITE)));
        } else {
            for (i, t) in selected.iter().enumerate() {
                if i > 0 {
                    spans.push(Span::raw(" "));
                }
                spans.push(Span::styled(
                    t.name.clone(),
                    Style::default().fg(theme::type_color(&t.name)),
                ));
            }
        }
        spans.push(Span::styled("   Per page ", theme::key_hint()));
        spans.push(Span::styled(
            filters.limit_or_default().to_string(),
            Style::default().fg(theme::CORAL),
        ));
        spans.push(Span::styled("   Loaded ", theme::key_hint()));
        spans.push(Span::styled(
            self.listing.entries().len().to_string(),
            Style::default().fg(theme::DIM_WHITE),
        ));

        frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
    }

    fn render_table(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused && self.mode == Mode::Browse {
                theme::border_focused()
            } else {
                theme::border_default()
            });

        let entries = self.listing.entries();

        if entries.is_empty() {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            self.viewport_rows.set(0);
            if self.listing.is_loading() {
                let throbber = Throbber::default()
                    .label("  Loading Pokémon...")
                    .style(Style::default().fg(theme::NEON_CYAN))
                    .throbber_style(Style::default().fg(theme::ELECTRIC_PURPLE));
                let row = Layout::vertical([Constraint::Length(1)]).split(inner)[0];
                frame.render_stateful_widget(throbber, row, &mut self.throbber_state.clone());
            } else if self.listing.error().is_none() {
                frame.render_widget(
                    Paragraph::new(Span::styled(format!("  {EMPTY_MESSAGE}"), theme::key_hint())),
                    inner,
                );
            }
            return;
        }

        let header = Row::new(vec!["#", "Name", "Types"]).style(theme::table_header());

        let mut rows: Vec<Row> = entries
            .iter()
            .map(|p| {
                let types: Vec<Span> = p
                    .types
                    .iter()
                    .flat_map(|t| {
                        [
                            Span::styled(
                                t.name.clone(),
                                Style::default().fg(theme::type_color(&t.name)),
                            ),
                            Span::raw(" "),
                        ]
                    })
                    .collect();
                Row::new(vec![
                    TableCell::from(format_pokedex_id(p.pokedex_id)),
                    TableCell::from(p.name.clone()),
                    TableCell::from(Line::from(types)),
                ])
                .style(theme::table_row())
            })
            .collect();

        rows.push(self.sentinel_row());

        let table = Table::new(
            rows,
            [
                Constraint::Length(6),
                Constraint::Min(16),
                Constraint::Percentage(50),
            ],
        )
        .header(header)
        .block(block)
        .row_highlight_style(theme::table_selected())
        .highlight_symbol("▸ ");

        // Borders and header take three lines.
        self.viewport_rows
            .set(usize::from(area.height.saturating_sub(3)));

        let mut state = self.table_state.clone();
        frame.render_stateful_widget(table, area, &mut state);
        self.viewport_offset.set(state.offset());
    }

    fn sentinel_row(&self) -> Row<'static> {
        let (text, style) = if self.listing.is_loading_more() {
            ("Loading more...".to_owned(), Style::default().fg(theme::NEON_CYAN))
        } else if self.listing.reached_end() {
            (END_MESSAGE.to_owned(), theme::key_hint())
        } else if self.listing.has_more() {
            ("···".to_owned(), theme::key_hint())
        } else {
            (String::new(), theme::key_hint())
        };
        Row::new(vec![
            TableCell::from(""),
            TableCell::from(Span::styled(text, style.add_modifier(Modifier::ITALIC))),
            TableCell::from(""),
        ])
    }

    fn render_error(&self, frame: &mut Frame, area: Rect) {
        if let Some(message) = self.listing.error() {
            frame.render_widget(
                Paragraph::new(Span::styled(format!(" ✗ {message}"), theme::error_style())),
                area,
            );
        }
    }

    fn render_hints(&self, frame: &mut Frame, area: Rect) {
        let pairs: &[(&str, &str)] = match self.mode {
            Mode::Browse => &[
                ("/", "name"),
                ("t", "types"),
                ("l", "per page"),
                ("c", "clear"),
                ("r", "refresh"),
                ("Enter", "details"),
            ],
            Mode::Search => &[("Enter", "apply"), ("Esc", "done")],
            Mode::TypePicker => &[("Space", "toggle"), ("j/k", "move"), ("Esc", "close")],
        };
        let mut spans = vec![Span::raw(" ")];
        for (key, label) in pairs {
            spans.push(Span::styled(format!("{key} "), theme::key_hint_key()));
            spans.push(Span::styled(format!("{label}  "), theme::key_hint()));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_type_picker(&self, frame: &mut Frame, area: Rect) {
        let types = self.listing.types();
        let height = u16::try_from(types.len())
            .unwrap_or(u16::MAX)
            .saturating_add(2)
            .clamp(5, area.height.saturating_sub(2).max(5));
        let width = 34u16.min(area.width.saturating_sub(4));
        let popup = Rect::new(
            area.x + area.width.saturating_sub(width) / 2,
            area.y + area.height.saturating_sub(height) / 2,
            width,
            height.min(area.height),
        );

        frame.render_widget(Clear, popup);
        let block = Block::default()
            .title(" Types ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused())
            .style(Style::default().bg(theme::BG_DARK));
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        if types.is_empty() {
            let text = match self.listing.error() {
                Some(message) => Span::styled(format!(" {message}"), theme::error_style()),
                None => Span::styled(" Loading types...", theme::key_hint()),
            };
            frame.render_widget(Paragraph::new(text), inner);
            return;
        }

        // Keep the cursor inside the window.
        let visible = usize::from(inner.height).max(1);
        let skip = self.picker_index.saturating_sub(visible - 1);
        let lines: Vec<Line> = types
            .iter()
            .enumerate()
            .skip(skip)
            .take(visible)
            .map(|(i, t)| {
                let mark = if self.listing.is_type_selected(t.id) {
                    "[x]"
                } else {
                    "[ ]"
                };
                let mut style = Style::default().fg(theme::type_color(&t.name));
                if i == self.picker_index {
                    style = style.bg(theme::BG_HIGHLIGHT).add_modifier(Modifier::BOLD);
                }
                Line::from(vec![
                    Span::styled(format!(" {mark} "), theme::key_hint_key()),
                    Span::styled(t.name.clone(), style),
                ])
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), inner);
    }
}

impl Component for CatalogScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(action_tx);
        let request = self.listing.refresh();
        self.fetch(request);
        self.fetch_types();
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match self.mode {
            Mode::Browse => self.handle_browse_key(key),
            Mode::Search => {
                self.handle_search_key(key);
                None
            }
            Mode::TypePicker => {
                self.handle_picker_key(key);
                None
            }
        };
        Ok(action)
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        if self.mode == Mode::Browse {
            match mouse.kind {
                MouseEventKind::ScrollDown => self.move_down(SCROLL_STEP),
                MouseEventKind::ScrollUp => self.move_up(SCROLL_STEP),
                _ => {}
            }
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::Tick => {
                if self.listing.is_loading() || self.listing.is_loading_more() {
                    self.throbber_state.calc_next();
                }
                if self.focused {
                    self.check_sentinel();
                }
            }
            Action::NameSettled(generation) if *generation == self.name_generation => {
                self.apply_name();
            }
            Action::PageLoaded { request, result } => {
                match self.listing.complete(request, result.clone()) {
                    Completion::Replaced { count } => {
                        self.select(0);
                        debug!(count, "listing replaced");
                        self.sentinel_seen = false;
                    }
                    Completion::Appended { added } => {
                        debug!(added, "listing extended");
                        self.sentinel_seen = false;
                    }
                    Completion::Failed(_) | Completion::Stale => {}
                }
            }
            Action::TypesLoaded(result) => self.listing.types_loaded(result.clone()),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let layout = Layout::vertical([
            Constraint::Length(3), // filters
            Constraint::Length(1), // error
            Constraint::Min(3),    // table
            Constraint::Length(1), // hints
        ])
        .split(area);

        self.render_filters(frame, layout[0]);
        self.render_error(frame, layout[1]);
        self.render_table(frame, layout[2]);
        self.render_hints(frame, layout[3]);

        if self.mode == Mode::TypePicker {
            self.render_type_picker(frame, area);
        }
    }

    fn captures_input(&self) -> bool {
        self.mode != Mode::Browse
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
        // Coming back from the detail view counts as a fresh look.
        self.sentinel_seen = false;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crossterm::event::KeyEventKind;
    use pokedex_core::{ListResponse, PokemonType};
    use pretty_assertions::assert_eq;

    use super::*;

    fn client() -> PokedexClient {
        PokedexClient::new("http://localhost:9", &pokedex_api::TransportConfig::default()).unwrap()
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: crossterm::event::KeyEventState::NONE,
        }
    }

    fn pokemon(id: u32) -> Pokemon {
        Pokemon {
            id,
            name: format!("p{id}"),
            image: String::new(),
            pokedex_id: id,
            types: Vec::new(),
            sprite: None,
            generation: None,
        }
    }

    fn page(ids: std::ops::RangeInclusive<u32>, next: bool) -> ListResponse {
        ListResponse {
            count: 151,
            next: next.then(|| "next".into()),
            previous: None,
            results: ids.map(pokemon).collect(),
        }
    }

    /// Screen with page 1 already merged, without spawning any fetch.
    fn loaded_screen(next: bool) -> CatalogScreen {
        let mut screen = CatalogScreen::new(client(), 10);
        let request = screen.listing.refresh();
        screen
            .update(&Action::PageLoaded {
                request,
                result: Ok(page(1..=10, next)),
            })
            .unwrap();
        screen.focused = true;
        screen
    }

    #[test]
    fn enter_opens_selected_entry() {
        let mut screen = loaded_screen(true);
        screen.handle_key_event(key(KeyCode::Down)).unwrap();
        screen.handle_key_event(key(KeyCode::Down)).unwrap();
        let action = screen.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert!(matches!(action, Some(Action::OpenDetail(3))));
    }

    #[test]
    fn selection_is_clamped() {
        let mut screen = loaded_screen(false);
        screen.handle_key_event(key(KeyCode::End)).unwrap();
        assert_eq!(screen.table_state.selected(), Some(9));
        screen.move_up(50);
        assert_eq!(screen.table_state.selected(), Some(0));
    }

    #[test]
    fn sentinel_in_view_requests_one_page() {
        let mut screen = loaded_screen(true);
        // Ten entries plus the sentinel fit in the window.
        screen.viewport_rows.set(20);

        let request = screen.poll_sentinel().unwrap();
        assert_eq!(request.page(), 2);
        assert!(screen.listing.is_loading_more());

        // Still visible while the fetch is outstanding: nothing new.
        assert!(screen.poll_sentinel().is_none());
    }

    #[test]
    fn sentinel_out_of_view_does_nothing() {
        let mut screen = loaded_screen(true);
        screen.viewport_rows.set(5);
        assert!(screen.poll_sentinel().is_none());
        assert!(!screen.listing.is_loading_more());
    }

    #[test]
    fn appended_page_rearms_the_sentinel() {
        let mut screen = loaded_screen(true);
        screen.viewport_rows.set(40);
        let request = screen.poll_sentinel().unwrap();

        screen
            .update(&Action::PageLoaded {
                request,
                result: Ok(page(11..=20, true)),
            })
            .unwrap();
        assert_eq!(screen.listing.entries().len(), 20);

        // The short list still shows the sentinel, so page 3 follows.
        assert_eq!(screen.poll_sentinel().unwrap().page(), 3);
    }

    #[test]
    fn failed_continuation_waits_for_the_sentinel_to_reappear() {
        let mut screen = loaded_screen(true);
        screen.viewport_rows.set(20);
        let request = screen.poll_sentinel().unwrap();

        screen
            .update(&Action::PageLoaded {
                request,
                result: Err(pokedex_core::CoreError::Timeout),
            })
            .unwrap();
        assert!(screen.listing.error().is_some());

        // Sentinel never left the view, so no retry.
        assert!(screen.poll_sentinel().is_none());

        // Scrolled away and back: retry.
        screen.viewport_rows.set(0);
        assert!(screen.poll_sentinel().is_none());
        screen.viewport_rows.set(20);
        assert!(screen.poll_sentinel().is_some());
    }

    #[test]
    fn search_mode_captures_keys_and_debounces() {
        // No sender: fetches and timers are not spawned.
        let mut screen = loaded_screen(true);
        screen.handle_key_event(key(KeyCode::Char('/'))).unwrap();
        assert!(screen.captures_input());
        for c in "pika".chars() {
            screen.handle_key_event(key(KeyCode::Char(c))).unwrap();
        }
        assert_eq!(screen.name_input, "pika");
        assert_eq!(screen.name_generation, 4);

        // An old timer is ignored.
        screen.update(&Action::NameSettled(2)).unwrap();
        assert_eq!(screen.listing.filters().name, None);

        screen.update(&Action::NameSettled(4)).unwrap();
        assert_eq!(screen.listing.filters().name.as_deref(), Some("pika"));
        assert!(screen.listing.is_loading());
    }

    #[test]
    fn picker_toggles_types() {
        let mut screen = loaded_screen(true);
        screen
            .update(&Action::TypesLoaded(Ok(vec![
                PokemonType {
                    id: 10,
                    name: "Feu".into(),
                    image: None,
                },
                PokemonType {
                    id: 12,
                    name: "Plante".into(),
                    image: None,
                },
            ])))
            .unwrap();

        screen.handle_key_event(key(KeyCode::Char('t'))).unwrap();
        screen.handle_key_event(key(KeyCode::Down)).unwrap();
        screen.handle_key_event(key(KeyCode::Char(' '))).unwrap();
        assert_eq!(screen.listing.filters().types, vec![12]);

        screen.handle_key_event(key(KeyCode::Esc)).unwrap();
        assert!(!screen.captures_input());
    }
}
