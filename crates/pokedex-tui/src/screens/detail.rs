//! Detail screen: one entry with measurements, stat gauges and the
//! evolution chain. Evolutions can be opened in place.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use pokedex_api::PokedexClient;
use pokedex_core::display::{
    format_abilities, format_height, format_pokedex_id, format_weight, is_current_evolution,
    stat_label, stat_percentage, unique_stats,
};
use pokedex_core::{DetailCompletion, DetailController, DetailPhase, PokemonDetail};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Gauge, Paragraph};
use throbber_widgets_tui::{Throbber, ThrobberState};
use tokio::sync::mpsc::UnboundedSender;

use crate::action::Action;
use crate::component::Component;
use crate::fetch;
use crate::theme;

const NO_EVOLUTIONS: &str = "This Pokemon has no evolutions.";

pub struct DetailScreen {
    focused: bool,
    action_tx: Option<UnboundedSender<Action>>,
    client: PokedexClient,
    controller: DetailController,
    /// Highlighted entry in the evolution chain.
    evolution_index: usize,
    throbber_state: ThrobberState,
}

impl DetailScreen {
    pub fn new(client: PokedexClient) -> Self {
        Self {
            focused: false,
            action_tx: None,
            client,
            controller: DetailController::default(),
            evolution_index: 0,
            throbber_state: ThrobberState::default(),
        }
    }

    fn open(&mut self, pokedex_id: u32) {
        self.evolution_index = 0;
        if let Some(request) = self.controller.open(pokedex_id) {
            if let Some(tx) = &self.action_tx {
                fetch::spawn_detail(&self.client, request, tx);
            }
        }
    }

    /// Point the evolution cursor at the entry being shown.
    fn focus_current_evolution(&mut self) {
        if let Some(detail) = self.controller.detail() {
            self.evolution_index = detail
                .evolutions
                .iter()
                .position(|e| is_current_evolution(e, detail.pokemon.pokedex_id))
                .unwrap_or(0);
        }
    }

    fn evolution_count(&self) -> usize {
        self.controller.detail().map_or(0, |d| d.evolutions.len())
    }

    // ── Rendering ───────────────────────────────────────────────────

    fn render_header(detail: &PokemonDetail, frame: &mut Frame, area: Rect) {
        let p = &detail.pokemon;
        let mut type_spans = Vec::new();
        for t in &p.types {
            type_spans.push(Span::styled(
                format!(" {} ", t.name),
                Style::default()
                    .fg(theme::BG_DARK)
                    .bg(theme::type_color(&t.name))
                    .add_modifier(Modifier::BOLD),
            ));
            type_spans.push(Span::raw(" "));
        }

        let label = |text: &'static str| Span::styled(text, Style::default().fg(theme::DIM_WHITE));
        let value = |text: String| Span::styled(text, Style::default().fg(theme::NEON_CYAN));

        let mut types_line = vec![label("  Types      ")];
        types_line.extend(type_spans);

        let lines = vec![
            Line::from(""),
            Line::from(types_line),
            Line::from(vec![label("  Height     "), value(format_height(detail.height))]),
            Line::from(vec![label("  Weight     "), value(format_weight(detail.weight))]),
            Line::from(vec![
                label("  Abilities  "),
                value(format_abilities(&detail.abilities)),
            ]),
        ];
        frame.render_widget(Paragraph::new(lines), area);
    }

    fn render_stats(detail: &PokemonDetail, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Stats ")
            .title_style(theme::title_style())
            .borders(Borders::TOP)
            .border_style(theme::border_default());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let stats = unique_stats(&detail.stats);
        if stats.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled("  No stats available", theme::key_hint())),
                inner,
            );
            return;
        }

        let rows = Layout::vertical(stats.iter().map(|_| Constraint::Length(1))).split(inner);
        for (stat, row) in stats.iter().zip(rows.iter()) {
            let cols =
                Layout::horizontal([Constraint::Length(20), Constraint::Min(10)]).split(*row);
            frame.render_widget(
                Paragraph::new(Line::from(vec![
                    Span::styled(
                        format!("  {:<14}", stat_label(&stat.name)),
                        Style::default().fg(theme::DIM_WHITE),
                    ),
                    Span::styled(
                        format!("{:>3}", stat.value),
                        Style::default().fg(theme::NEON_CYAN),
                    ),
                ])),
                cols[0],
            );
            let percent = stat_percentage(stat.value);
            frame.render_widget(
                Gauge::default()
                    .gauge_style(Style::default().fg(theme::stat_color(percent)).bg(theme::BG_HIGHLIGHT))
                    .percent(u16::from(percent))
                    .label(""),
                cols[1],
            );
        }
    }

    fn render_evolutions(&self, detail: &PokemonDetail, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Evolutions ")
            .title_style(theme::title_style())
            .borders(Borders::TOP)
            .border_style(theme::border_default());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if detail.evolutions.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(format!("  {NO_EVOLUTIONS}"), theme::key_hint())),
                inner,
            );
            return;
        }

        let mut spans = vec![Span::raw("  ")];
        for (i, evo) in detail.evolutions.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled("  →  ", theme::key_hint()));
            }
            let mut style = if is_current_evolution(evo, detail.pokemon.pokedex_id) {
                Style::default()
                    .fg(theme::ELECTRIC_PURPLE)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme::DIM_WHITE)
            };
            if i == self.evolution_index {
                style = style.bg(theme::BG_HIGHLIGHT).add_modifier(Modifier::UNDERLINED);
            }
            spans.push(Span::styled(
                format!("{} {}", format_pokedex_id(evo.pokedex_id), evo.name),
                style,
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), inner);
    }

    fn render_hints(frame: &mut Frame, area: Rect) {
        let hints = Line::from(vec![
            Span::styled("  ←/→ ", theme::key_hint_key()),
            Span::styled("evolution  ", theme::key_hint()),
            Span::styled("Enter ", theme::key_hint_key()),
            Span::styled("open  ", theme::key_hint()),
            Span::styled("r ", theme::key_hint_key()),
            Span::styled("reload  ", theme::key_hint()),
            Span::styled("Esc ", theme::key_hint_key()),
            Span::styled("back", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(hints), area);
    }
}

impl Component for DetailScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(action_tx);
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let count = self.evolution_count();
        match key.code {
            KeyCode::Char('l') | KeyCode::Right if count > 0 => {
                self.evolution_index = (self.evolution_index + 1).min(count - 1);
            }
            KeyCode::Char('h') | KeyCode::Left => {
                self.evolution_index = self.evolution_index.saturating_sub(1);
            }
            KeyCode::Enter => {
                let target = self
                    .controller
                    .detail()
                    .and_then(|d| d.evolutions.get(self.evolution_index))
                    .map(|e| e.pokedex_id);
                if let Some(pokedex_id) = target {
                    return Ok(Some(Action::OpenDetail(pokedex_id)));
                }
            }
            KeyCode::Char('r') => {
                if let Some(pokedex_id) = self.controller.pokedex_id() {
                    self.open(pokedex_id);
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::OpenDetail(pokedex_id) => self.open(*pokedex_id),
            Action::CloseDetail => self.controller.close(),
            Action::DetailLoaded { request, result } => {
                if let DetailCompletion::Loaded = self.controller.complete(*request, result.clone())
                {
                    self.focus_current_evolution();
                }
            }
            Action::Tick if self.focused && self.controller.is_loading() => {
                self.throbber_state.calc_next();
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let title = match self.controller.phase() {
            DetailPhase::Loaded(detail) => format!(
                " {}  {} ",
                format_pokedex_id(detail.pokemon.pokedex_id),
                detail.pokemon.name
            ),
            DetailPhase::Loading { pokedex_id } => format!(" {} ", format_pokedex_id(*pokedex_id)),
            DetailPhase::Idle | DetailPhase::Error(_) => " Pokémon ".into(),
        };
        let block = Block::default()
            .title(title)
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let detail = match self.controller.phase() {
            DetailPhase::Loaded(detail) => detail,
            DetailPhase::Loading { .. } => {
                let throbber = Throbber::default()
                    .label("  Loading details...")
                    .style(Style::default().fg(theme::NEON_CYAN))
                    .throbber_style(Style::default().fg(theme::ELECTRIC_PURPLE));
                let row = Layout::vertical([Constraint::Length(1), Constraint::Length(1)])
                    .split(inner)[1];
                frame.render_stateful_widget(throbber, row, &mut self.throbber_state.clone());
                return;
            }
            DetailPhase::Error(message) => {
                frame.render_widget(
                    Paragraph::new(vec![
                        Line::from(""),
                        Line::from(Span::styled(format!("  ✗ {message}"), theme::error_style())),
                        Line::from(Span::styled("  r retry  Esc back", theme::key_hint())),
                    ]),
                    inner,
                );
                return;
            }
            DetailPhase::Idle => return,
        };

        let stat_rows = u16::try_from(unique_stats(&detail.stats).len().max(1))
            .unwrap_or(u16::MAX)
            .saturating_add(1);
        let layout = Layout::vertical([
            Constraint::Length(6),         // header
            Constraint::Length(stat_rows), // stats
            Constraint::Length(3),         // evolutions
            Constraint::Min(0),
            Constraint::Length(1), // hints
        ])
        .split(inner);

        Self::render_header(detail, frame, layout[0]);
        Self::render_stats(detail, frame, layout[1]);
        self.render_evolutions(detail, frame, layout[2]);
        Self::render_hints(frame, layout[4]);
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crossterm::event::{KeyEventKind, KeyEventState, KeyModifiers};
    use pokedex_core::{DetailRequest, Pokemon};
    use pretty_assertions::assert_eq;

    use super::*;

    fn screen() -> DetailScreen {
        let client =
            PokedexClient::new("http://localhost:9", &pokedex_api::TransportConfig::default())
                .unwrap();
        DetailScreen::new(client)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
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

    fn detail(id: u32) -> PokemonDetail {
        PokemonDetail {
            pokemon: pokemon(id),
            height: 10,
            weight: 130,
            abilities: Vec::new(),
            stats: Vec::new(),
            evolutions: vec![pokemon(1), pokemon(2), pokemon(3)],
        }
    }

    fn loaded(id: u32) -> DetailScreen {
        let mut screen = screen();
        screen.update(&Action::OpenDetail(id)).unwrap();
        screen
            .update(&Action::DetailLoaded {
                request: DetailRequest { seq: 1, pokedex_id: id },
                result: Ok(detail(id)),
            })
            .unwrap();
        screen
    }

    #[test]
    fn cursor_starts_on_current_evolution() {
        let screen = loaded(2);
        assert_eq!(screen.evolution_index, 1);
    }

    #[test]
    fn enter_opens_highlighted_evolution() {
        let mut screen = loaded(2);
        screen.handle_key_event(key(KeyCode::Right)).unwrap();
        screen.handle_key_event(key(KeyCode::Right)).unwrap();
        let action = screen.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert!(matches!(action, Some(Action::OpenDetail(3))));
    }

    #[test]
    fn reload_key_retries_a_failed_load() {
        let mut screen = screen();
        screen.update(&Action::OpenDetail(7)).unwrap();
        screen
            .update(&Action::DetailLoaded {
                request: DetailRequest { seq: 1, pokedex_id: 7 },
                result: Err(pokedex_core::CoreError::Timeout),
            })
            .unwrap();
        assert!(screen.controller.error().is_some());

        screen.handle_key_event(key(KeyCode::Char('r'))).unwrap();
        assert_eq!(
            screen.controller.phase(),
            &DetailPhase::Loading { pokedex_id: 7 }
        );
    }

    #[test]
    fn response_after_close_is_ignored() {
        let mut screen = screen();
        screen.update(&Action::OpenDetail(4)).unwrap();
        screen.update(&Action::CloseDetail).unwrap();
        screen
            .update(&Action::DetailLoaded {
                request: DetailRequest { seq: 1, pokedex_id: 4 },
                result: Ok(detail(4)),
            })
            .unwrap();
        assert!(screen.controller.detail().is_none());
    }
}
