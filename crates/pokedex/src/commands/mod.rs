//! Command dispatch: bridges CLI args -> core controllers -> output formatting.

pub mod config_cmd;
pub mod list;
pub mod show;
pub mod types;

use pokedex_api::PokedexClient;
use pokedex_core::CatalogConfig;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a catalog-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    client: &PokedexClient,
    catalog: &CatalogConfig,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::List(args) => list::handle(client, args, catalog.page_size, global).await,
        Command::Show(args) => show::handle(client, args, global).await,
        Command::Types => types::handle(client, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
