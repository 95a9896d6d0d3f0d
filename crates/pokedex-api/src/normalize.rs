// Response normalization
//
// The upstream service is not fully under our control. Depending on the
// deployment it serializes nested records as JSON objects, as JSON strings,
// or as stringified pseudo-objects of the form `@{k=v; k2=v2}`, and it may
// return listings either bare or wrapped in an envelope. Everything in this
// module reshapes those variants into the types of `crate::models`.
//
// Nested repair passes never fail: a field that cannot be decoded by either
// the pattern or the JSON strategy degrades to an empty collection.

use std::sync::LazyLock;

use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use tracing::debug;
use url::Url;

use crate::models::{Filters, ListResponse, Pokemon, PokemonDetail, PokemonType, Stat};

/// Official artwork location, keyed by pokedex id.
const SPRITE_BASE_URL: &str =
    "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/other/official-artwork";

/// `@{name=Ivysaur; pokedexId=2}`
static EVOLUTION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"@\{name=([^;]+); pokedexId=(\d+)\}").expect("evolution pattern is valid")
});

/// `@{id=4; name=Fire; image=http://x}`
static TYPE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"@\{id=(\d+); name=([^;]+); image=([^}]+)\}").expect("type pattern is valid")
});

/// Artwork URL for a pokedex id.
pub fn sprite_url(pokedex_id: u32) -> String {
    format!("{SPRITE_BASE_URL}/{pokedex_id}.png")
}

// ── Pseudo-object records ────────────────────────────────────────────

/// Parse one stringified evolution record.
pub fn parse_evolution_record(raw: &str) -> Option<Pokemon> {
    let caps = EVOLUTION_PATTERN.captures(raw)?;
    let pokedex_id: u32 = caps.get(2)?.as_str().parse().ok()?;
    Some(Pokemon {
        id: pokedex_id,
        name: caps.get(1)?.as_str().to_owned(),
        image: sprite_url(pokedex_id),
        pokedex_id,
        types: Vec::new(),
        sprite: None,
        generation: None,
    })
}

/// Parse one stringified type record.
pub fn parse_type_record(raw: &str) -> Option<PokemonType> {
    let caps = TYPE_PATTERN.captures(raw)?;
    Some(PokemonType {
        id: caps.get(1)?.as_str().parse().ok()?,
        name: caps.get(2)?.as_str().to_owned(),
        image: Some(caps.get(3)?.as_str().to_owned()),
    })
}

/// Decode a sequence of nested records, all or nothing.
///
/// When the first element is a string the whole sequence is treated as
/// stringified: each element goes through `parse_record` first and JSON
/// second. Otherwise the elements are decoded as they are. Any element that
/// fails every strategy empties the result.
fn decode_records<T: DeserializeOwned>(
    field: &'static str,
    items: &[Value],
    parse_record: fn(&str) -> Option<T>,
) -> Vec<T> {
    let stringified = matches!(items.first(), Some(Value::String(_)));

    let decoded: Option<Vec<T>> = if stringified {
        items
            .iter()
            .map(|item| match item {
                Value::String(raw) => {
                    parse_record(raw).or_else(|| serde_json::from_str(raw).ok())
                }
                _ => None,
            })
            .collect()
    } else {
        items.iter().map(|item| T::deserialize(item).ok()).collect()
    };

    decoded.unwrap_or_else(|| {
        debug!(field, count = items.len(), "discarding malformed nested records");
        Vec::new()
    })
}

// ── Field passes ─────────────────────────────────────────────────────

/// Repair the `evolutions` field of a detail record.
pub fn evolutions(raw: Option<&Value>) -> Vec<Pokemon> {
    match raw {
        Some(Value::Array(items)) => decode_records("evolutions", items, parse_evolution_record),
        _ => Vec::new(),
    }
}

/// Repair a `types` field, on a detail record or a listing entry.
pub fn types(raw: Option<&Value>) -> Vec<PokemonType> {
    match raw {
        Some(Value::Array(items)) => decode_records("types", items, parse_type_record),
        _ => Vec::new(),
    }
}

/// Repair the `stats` field of a detail record.
///
/// A mapping becomes a sequence in upstream key order with normalized names;
/// a sequence is kept; anything else is empty.
pub fn stats(raw: Option<&Value>) -> Vec<Stat> {
    match raw {
        Some(Value::Object(map)) => stats_from_mapping(map),
        Some(Value::Array(items)) => {
            let decoded: Option<Vec<Stat>> =
                items.iter().map(|item| Stat::deserialize(item).ok()).collect();
            decoded.unwrap_or_else(|| {
                debug!(count = items.len(), "discarding malformed stat sequence");
                Vec::new()
            })
        }
        _ => Vec::new(),
    }
}

fn stats_from_mapping(map: &Map<String, Value>) -> Vec<Stat> {
    map.iter()
        .filter_map(|(key, value)| match stat_value(value) {
            Some(value) => Some(Stat {
                name: stat_name(key),
                value,
            }),
            None => {
                debug!(stat = %key, "skipping non-numeric stat");
                None
            }
        })
        .collect()
}

#[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
fn stat_value(value: &Value) -> Option<i32> {
    if let Some(n) = value.as_i64() {
        return Some(n.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32);
    }
    // Saturating float cast.
    value.as_f64().map(|f| f.round() as i32)
}

/// Normalize a stat key: `special_attack` → `special-attack`,
/// `specialDefense` → `special-defense`.
pub fn stat_name(key: &str) -> String {
    let replaced = key.replacen("special_", "special-", 1);
    let mut out = String::with_capacity(replaced.len() + 2);
    for (idx, ch) in replaced.chars().enumerate() {
        if idx > 0 && ch.is_uppercase() {
            out.push('-');
        }
        out.extend(ch.to_lowercase());
    }
    out
}

/// Serde adapter for listing entries whose `types` may be stringified.
pub(crate) fn deserialize_types<'de, D>(deserializer: D) -> Result<Vec<PokemonType>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(types(Some(&raw)))
}

// ── Bodies ───────────────────────────────────────────────────────────

/// Decode a detail body, running every nested repair pass.
pub fn detail(body: Value) -> Result<PokemonDetail, serde_json::Error> {
    let Value::Object(mut record) = body else {
        return serde_json::from_value(body);
    };

    let evolutions = evolutions(record.remove("evolutions").as_ref());
    let types = types(record.remove("types").as_ref());
    let stats = stats(record.remove("stats").as_ref());

    let mut detail: PokemonDetail = serde_json::from_value(Value::Object(record))?;
    detail.pokemon.types = types;
    detail.evolutions = evolutions;
    detail.stats = stats;
    Ok(detail)
}

/// Decode a listing body. A bare array is wrapped in a synthesized envelope;
/// an object is taken to be the envelope already.
pub fn list(
    body: Value,
    filters: &Filters,
    base_url: &Url,
    catalog_size: u32,
) -> Result<ListResponse, serde_json::Error> {
    match body {
        Value::Array(_) => {
            debug!("listing arrived bare, synthesizing envelope");
            let results: Vec<Pokemon> = serde_json::from_value(body)?;
            Ok(list_envelope(results, filters, base_url, catalog_size))
        }
        other => serde_json::from_value(other),
    }
}

/// Build the envelope for a bare listing.
///
/// `next` exists iff `page * limit < catalog_size`; `previous` exists iff
/// `page > 1`. Both carry the URL of the neighbouring page.
pub fn list_envelope(
    results: Vec<Pokemon>,
    filters: &Filters,
    base_url: &Url,
    catalog_size: u32,
) -> ListResponse {
    let page = filters.page_or_default();
    let limit = filters.limit_or_default();
    let base = base_url.as_str().trim_end_matches('/');
    let page_url = |page: u32| format!("{base}/pokemons?page={page}&limit={limit}");

    let has_next = u64::from(page) * u64::from(limit) < u64::from(catalog_size);

    ListResponse {
        count: catalog_size,
        next: has_next.then(|| page_url(page.saturating_add(1))),
        previous: (page > 1).then(|| page_url(page - 1)),
        results,
    }
}

/// Decode the type taxonomy: a bare array, or an object wrapping the array
/// under `value`. Any other shape is reported rather than guessed at.
pub fn type_listing(body: Value) -> Result<Vec<PokemonType>, serde_json::Error> {
    match body {
        Value::Object(mut wrapper) if matches!(wrapper.get("value"), Some(Value::Array(_))) => {
            debug!("type listing wrapped in `value`, unwrapping");
            serde_json::from_value(wrapper.remove("value").unwrap_or_default())
        }
        other => serde_json::from_value(other),
    }
}
