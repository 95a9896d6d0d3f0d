//! Screen implementations. Each screen is a top-level Component.

pub mod catalog;
pub mod detail;

use pokedex_api::PokedexClient;

use crate::component::Component;
use crate::screen::ScreenId;

/// Build every screen, each with its own handle on the client.
pub fn create_screens(
    client: &PokedexClient,
    page_size: u32,
) -> Vec<(ScreenId, Box<dyn Component>)> {
    vec![
        (
            ScreenId::Catalog,
            Box::new(catalog::CatalogScreen::new(client.clone(), page_size)),
        ),
        (
            ScreenId::Detail,
            Box::new(detail::DetailScreen::new(client.clone())),
        ),
    ]
}
