// pokedex-api: Async Rust client for the public Pokedex catalog API

pub mod client;
pub mod error;
pub mod models;
pub mod normalize;
pub mod transport;

pub use client::{DEFAULT_BASE_URL, DEFAULT_CATALOG_SIZE, PokedexClient};
pub use error::Error;
pub use models::{
    DEFAULT_LIMIT, DEFAULT_PAGE, Filters, ListResponse, Pokemon, PokemonDetail, PokemonType, Stat,
};
pub use transport::{DEFAULT_TIMEOUT, TransportConfig};
