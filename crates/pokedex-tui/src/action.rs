//! All possible UI actions. Actions are the sole mechanism for state mutation.

use pokedex_core::{
    CoreError, DetailRequest, ListResponse, PageRequest, PokemonDetail, PokemonType,
};

#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ────────────────────────────────────────────────
    Quit,
    Tick,
    Render,

    // ── Navigation ───────────────────────────────────────────────
    ToggleHelp,
    /// Show the detail screen for a pokedex id.
    OpenDetail(u32),
    /// Leave the detail screen.
    CloseDetail,

    // ── Filters ──────────────────────────────────────────────────
    /// The name debounce window for keystroke `generation` elapsed.
    NameSettled(u64),

    // ── Fetch results ────────────────────────────────────────────
    PageLoaded {
        request: PageRequest,
        result: Result<ListResponse, CoreError>,
    },
    TypesLoaded(Result<Vec<PokemonType>, CoreError>),
    DetailLoaded {
        request: DetailRequest,
        result: Result<PokemonDetail, CoreError>,
    },
}
