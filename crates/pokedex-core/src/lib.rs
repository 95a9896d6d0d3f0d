// pokedex-core: Catalog controllers shared by the CLI and TUI.

pub mod config;
pub mod detail;
pub mod display;
pub mod error;
pub mod listing;
pub mod source;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::CatalogConfig;
pub use detail::{DetailCompletion, DetailController, DetailPhase, DetailRequest, load_detail};
pub use error::CoreError;
pub use listing::{
    Catalog, Completion, ListingController, ListingPhase, PAGE_SIZES, PageRequest, RequestKind,
};
pub use source::CatalogSource;

// Re-export model types at the crate root for ergonomics.
pub use pokedex_api::{
    DEFAULT_BASE_URL, DEFAULT_CATALOG_SIZE, DEFAULT_LIMIT, Filters, ListResponse, Pokemon,
    PokemonDetail, PokemonType, Stat,
};
