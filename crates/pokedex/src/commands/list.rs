//! `pokedex list`: drives the listing controller, treating every merged
//! page as the scroll sentinel coming into view.

use pokedex_api::PokedexClient;
use pokedex_core::display::{format_pokedex_id, format_types};
use pokedex_core::{Catalog, Completion, Filters, Pokemon};
use tabled::Tabled;

use crate::cli::{GlobalOpts, ListArgs, OutputFormat};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct PokemonRow {
    #[tabled(rename = "#")]
    number: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Types")]
    types: String,
}

impl From<&Pokemon> for PokemonRow {
    fn from(p: &Pokemon) -> Self {
        Self {
            number: format_pokedex_id(p.pokedex_id),
            name: p.name.clone(),
            types: format_types(p),
        }
    }
}

fn filters_from(args: &ListArgs, page_size: u32) -> Filters {
    let mut filters = Filters::default()
        .with_limit(args.limit.unwrap_or(page_size))
        .with_types(args.types.iter().copied());
    if let Some(name) = args.name.as_deref().filter(|n| !n.trim().is_empty()) {
        filters = filters.with_name(name.trim());
    }
    if let Some(type_id) = args.type_id {
        filters = filters.with_type_id(type_id);
    }
    filters
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &PokedexClient,
    args: ListArgs,
    page_size: u32,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let filters = filters_from(&args, page_size);
    let mut catalog = Catalog::new(client.clone(), page_size);

    tracing::debug!(?filters, page = args.page, "listing catalog");
    if let Completion::Failed(err) = catalog.apply_filters_from(filters, args.page).await {
        return Err(err.into());
    }

    let max_pages = if args.all { None } else { Some(args.pages.unwrap_or(1)) };
    catalog.load_remaining(max_pages).await?;

    let listing = catalog.listing();
    let out = output::render_list(
        &global.output,
        listing.entries(),
        |p| PokemonRow::from(p),
        |p| format!("{}\t{}", p.pokedex_id, p.name),
    );
    output::print_output(&out, global.quiet);

    if matches!(global.output, OutputFormat::Table) && !global.quiet {
        if listing.is_empty() {
            eprintln!("No Pokémon found. Try adjusting your filters.");
        } else if listing.reached_end() {
            eprintln!("You've reached the end of the list!");
        } else if listing.has_more() {
            eprintln!(
                "{} entries shown; more available (use --all or --page {})",
                listing.entries().len(),
                listing.filters().page_or_default() + 1
            );
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::{Cli, Command};

    fn list_args(args: &[&str]) -> ListArgs {
        let mut argv = vec!["pokedex", "list"];
        argv.extend_from_slice(args);
        match Cli::try_parse_from(argv).unwrap().command {
            Command::List(args) => args,
            other => panic!("expected list, got {other:?}"),
        }
    }

    #[test]
    fn flags_become_filters() {
        let filters = filters_from(
            &list_args(&["--name", " pika ", "-t", "13", "-t", "1", "--type-id", "13"]),
            50,
        );
        assert_eq!(filters.name.as_deref(), Some("pika"));
        assert_eq!(filters.types, vec![13, 1]);
        assert_eq!(filters.type_id, Some(13));
        assert_eq!(filters.limit, Some(50));
    }

    #[test]
    fn explicit_limit_wins_over_page_size() {
        let filters = filters_from(&list_args(&["--limit", "10"]), 50);
        assert_eq!(filters.limit, Some(10));
        assert_eq!(filters.name, None);
    }
}
