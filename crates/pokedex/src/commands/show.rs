//! `pokedex show <id>`: one entry rendered as a card.

use std::fmt::Write as _;

use owo_colors::OwoColorize;
use pokedex_api::PokedexClient;
use pokedex_core::detail::{INVALID_ID_ERROR, parse_pokedex_id};
use pokedex_core::display::{
    format_abilities, format_height, format_pokedex_id, format_types, format_weight,
    is_current_evolution, stat_label, stat_percentage, unique_stats,
};
use pokedex_core::{DetailController, PokemonDetail, load_detail};

use crate::cli::{GlobalOpts, ShowArgs};
use crate::error::CliError;
use crate::output;

const BAR_WIDTH: usize = 20;

pub async fn handle(
    client: &PokedexClient,
    args: ShowArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let pokedex_id = parse_pokedex_id(&args.id).ok_or_else(|| CliError::Validation {
        field: "id".into(),
        reason: format!("{INVALID_ID_ERROR}: {}", args.id),
    })?;

    let mut controller = DetailController::default();
    load_detail(client, &mut controller, pokedex_id)
        .await
        .map_err(|e| CliError::from(e).for_identifier(&args.id))?;

    let Some(detail) = controller.detail() else {
        return Ok(());
    };
    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output,
        detail,
        |d| render_card(d, color),
        |d| d.pokemon.pokedex_id.to_string(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

// ── Card ────────────────────────────────────────────────────────────

fn render_card(detail: &PokemonDetail, color: bool) -> String {
    let p = &detail.pokemon;
    let mut card = String::new();

    let title = format!("{} {}", format_pokedex_id(p.pokedex_id), p.name);
    if color {
        let _ = writeln!(card, "{}", title.bold());
    } else {
        let _ = writeln!(card, "{title}");
    }
    let _ = writeln!(card, "  Types:     {}", format_types(p));
    let _ = writeln!(card, "  Height:    {}", format_height(detail.height));
    let _ = writeln!(card, "  Weight:    {}", format_weight(detail.weight));
    let _ = writeln!(card, "  Abilities: {}", format_abilities(&detail.abilities));

    let stats = unique_stats(&detail.stats);
    if !stats.is_empty() {
        let _ = writeln!(card, "\nStats");
        let width = stats
            .iter()
            .map(|s| stat_label(&s.name).chars().count())
            .max()
            .unwrap_or(0);
        for stat in &stats {
            let label = stat_label(&stat.name);
            let percent = stat_percentage(stat.value);
            let _ = writeln!(
                card,
                "  {label:<width$}  {:>3}  {}",
                stat.value,
                output::bar(percent, BAR_WIDTH, color)
            );
        }
    }

    let _ = writeln!(card, "\nEvolutions");
    if detail.evolutions.is_empty() {
        let _ = writeln!(card, "  This Pokemon has no evolutions.");
    } else {
        for evo in &detail.evolutions {
            let line = format!("{} {}", format_pokedex_id(evo.pokedex_id), evo.name);
            if is_current_evolution(evo, p.pokedex_id) {
                let marked = format!("{line}  (current)");
                if color {
                    let _ = writeln!(card, "  {}", marked.cyan());
                } else {
                    let _ = writeln!(card, "  {marked}");
                }
            } else {
                let _ = writeln!(card, "  {line}");
            }
        }
    }

    card.trim_end().to_owned()
}
