// Catalog API types
//
// Canonical local shapes for the three endpoints. Wire names are camelCase.
// Fields use `#[serde(default)]` liberally because the upstream service is
// inconsistent about field presence; nested fields that arrive in a
// stringified pseudo-object format are repaired by `crate::normalize`.

use serde::{Deserialize, Serialize};

/// Page requested when a filter leaves `page` unset.
pub const DEFAULT_PAGE: u32 = 1;

/// Page size used when a filter leaves `limit` unset.
pub const DEFAULT_LIMIT: u32 = 50;

// ── Type ─────────────────────────────────────────────────────────────

/// A classification tag such as "Feu" or "Plante".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PokemonType {
    pub id: u32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

// ── Pokemon ──────────────────────────────────────────────────────────

/// A catalog entry as it appears in listings and evolution chains.
///
/// `pokedex_id` is the stable identity used for navigation and for matching
/// an evolution against the entry currently on screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pokemon {
    #[serde(default)]
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub image: String,
    pub pokedex_id: u32,
    #[serde(default, deserialize_with = "crate::normalize::deserialize_types")]
    pub types: Vec<PokemonType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sprite: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation: Option<u32>,
}

// ── Detail ───────────────────────────────────────────────────────────

/// A named numeric attribute. `value` is stored exactly as delivered;
/// clamping to the 0..=255 display range happens at render time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stat {
    pub name: String,
    pub value: i32,
}

/// Extended record returned by `/pokemons/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonDetail {
    #[serde(flatten)]
    pub pokemon: Pokemon,
    /// Height in decimetres.
    #[serde(default)]
    pub height: u32,
    /// Weight in hectograms.
    #[serde(default)]
    pub weight: u32,
    #[serde(default)]
    pub abilities: Vec<String>,
    #[serde(default)]
    pub stats: Vec<Stat>,
    /// Other entries of the chain, referenced by value.
    #[serde(default)]
    pub evolutions: Vec<Pokemon>,
}

// ── Listing ──────────────────────────────────────────────────────────

/// One page of results.
///
/// `next` and `previous` are only ever consumed as presence signals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListResponse {
    pub count: u32,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default)]
    pub results: Vec<Pokemon>,
}

impl ListResponse {
    /// Whether the server signalled another page.
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }
}

// ── Filters ──────────────────────────────────────────────────────────

/// Query criteria for the listing endpoint. Every field is optional and
/// only present fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_id: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Filters {
    /// First page with the default page size.
    pub fn first_page() -> Self {
        Self {
            page: Some(DEFAULT_PAGE),
            limit: Some(DEFAULT_LIMIT),
            ..Self::default()
        }
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_types(mut self, types: impl IntoIterator<Item = u32>) -> Self {
        self.types = types.into_iter().collect();
        self
    }

    pub fn with_type_id(mut self, type_id: u32) -> Self {
        self.type_id = Some(type_id);
        self
    }

    /// Page number, with an absent or zero page read as the first one.
    pub fn page_or_default(&self) -> u32 {
        self.page.filter(|p| *p > 0).unwrap_or(DEFAULT_PAGE)
    }

    /// Page size, with an absent or zero limit read as the default.
    pub fn limit_or_default(&self) -> u32 {
        self.limit.filter(|l| *l > 0).unwrap_or(DEFAULT_LIMIT)
    }

    /// Query parameters in wire order. A parameter appears only when its
    /// field is present; `types` repeats once per selected id and an empty
    /// name counts as absent.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(type_id) = self.type_id {
            pairs.push(("typeId", type_id.to_string()));
        }
        for type_id in &self.types {
            pairs.push(("types", type_id.to_string()));
        }
        if let Some(name) = self.name.as_deref().filter(|n| !n.is_empty()) {
            pairs.push(("name", name.to_owned()));
        }
        pairs
    }
}
