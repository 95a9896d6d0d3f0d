//! Background fetches. Each request runs on its own task and reports back
//! as an [`Action`]; the controllers decide whether the result still
//! matters.

use std::time::Duration;

use pokedex_api::PokedexClient;
use pokedex_core::{CatalogSource, DetailRequest, PageRequest};
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use crate::action::Action;

/// Quiet period after the last keystroke before a name query is sent.
pub const NAME_DEBOUNCE: Duration = Duration::from_millis(300);

pub fn spawn_page(client: &PokedexClient, request: PageRequest, tx: &UnboundedSender<Action>) {
    let client = client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        debug!(seq = request.seq, page = request.page(), "fetching page");
        let result = CatalogSource::list_pokemon(&client, &request.filters).await;
        let _ = tx.send(Action::PageLoaded { request, result });
    });
}

pub fn spawn_types(client: &PokedexClient, tx: &UnboundedSender<Action>) {
    let client = client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = CatalogSource::pokemon_types(&client).await;
        let _ = tx.send(Action::TypesLoaded(result));
    });
}

pub fn spawn_detail(client: &PokedexClient, request: DetailRequest, tx: &UnboundedSender<Action>) {
    let client = client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        debug!(seq = request.seq, pokedex_id = request.pokedex_id, "fetching detail");
        let result = CatalogSource::pokemon_detail(&client, request.pokedex_id).await;
        let _ = tx.send(Action::DetailLoaded { request, result });
    });
}

/// Fire [`Action::NameSettled`] once the debounce window passes. Later
/// keystrokes bump the generation, so only the last timer counts.
pub fn spawn_name_debounce(generation: u64, tx: &UnboundedSender<Action>) {
    let tx = tx.clone();
    tokio::spawn(async move {
        tokio::time::sleep(NAME_DEBOUNCE).await;
        let _ = tx.send(Action::NameSettled(generation));
    });
}
