// ── Catalog source seam ──
//
// Controllers are sans-IO; the drivers fetch through `CatalogSource` so
// tests can substitute an in-memory catalog for the HTTP client.

use std::future::Future;

use pokedex_api::{Filters, ListResponse, PokedexClient, PokemonDetail, PokemonType};

use crate::error::CoreError;

/// Anything that can answer the three catalog queries.
pub trait CatalogSource: Send + Sync {
    fn list_pokemon(
        &self,
        filters: &Filters,
    ) -> impl Future<Output = Result<ListResponse, CoreError>> + Send;

    fn pokemon_detail(
        &self,
        pokedex_id: u32,
    ) -> impl Future<Output = Result<PokemonDetail, CoreError>> + Send;

    fn pokemon_types(&self) -> impl Future<Output = Result<Vec<PokemonType>, CoreError>> + Send;
}

impl CatalogSource for PokedexClient {
    async fn list_pokemon(&self, filters: &Filters) -> Result<ListResponse, CoreError> {
        Ok(PokedexClient::list_pokemon(self, filters).await?)
    }

    async fn pokemon_detail(&self, pokedex_id: u32) -> Result<PokemonDetail, CoreError> {
        Ok(PokedexClient::pokemon_detail(self, pokedex_id).await?)
    }

    async fn pokemon_types(&self) -> Result<Vec<PokemonType>, CoreError> {
        Ok(PokedexClient::pokemon_types(self).await?)
    }
}
