// Async HTTP client for the public Pokedex catalog API.
//
// Endpoints (relative to the base URL):
//   GET pokemons?page&limit&typeId&types&name   listing
//   GET pokemons/{id}                           detail
//   GET types                                   type taxonomy

use serde_json::Value;
use tracing::{debug, trace};
use url::Url;

use crate::Error;
use crate::models::{Filters, ListResponse, PokemonDetail, PokemonType};
use crate::normalize;
use crate::transport::TransportConfig;

/// Public deployment of the catalog API.
pub const DEFAULT_BASE_URL: &str = "https://nestjs-pokedex-api.vercel.app";

/// Number of entries in the catalog. Used to synthesize pagination links
/// when the listing endpoint answers with a bare array.
pub const DEFAULT_CATALOG_SIZE: u32 = 151;

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the catalog API.
///
/// Stateless between calls; every operation produces exactly one GET.
/// Cloning is cheap since `reqwest::Client` is reference counted.
#[derive(Debug, Clone)]
pub struct PokedexClient {
    http: reqwest::Client,
    base_url: Url,
    catalog_size: u32,
}

impl PokedexClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client with its own connection pool.
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::with_client(base_url, http)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        Ok(Self {
            http,
            base_url: Self::normalize_base_url(base_url)?,
            catalog_size: DEFAULT_CATALOG_SIZE,
        })
    }

    /// Override the catalog size used for synthesized pagination links.
    pub fn with_catalog_size(mut self, catalog_size: u32) -> Self {
        self.catalog_size = catalog_size;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn catalog_size(&self) -> u32 {
        self.catalog_size
    }

    /// Ensure the base path ends in `/` so relative joins append.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    // ── URL builder ──────────────────────────────────────────────────

    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    // ── HTTP ─────────────────────────────────────────────────────────

    /// GET `path`, fail on non-success status, and decode the body as
    /// untyped JSON. Returns the raw text alongside for error reports.
    async fn get_json(
        &self,
        operation: &'static str,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<(Value, String), Error> {
        let url = self.url(path)?;
        debug!("GET {url} params={params:?}");

        let resp = self.http.get(url).query(params).send().await?;
        let status = resp.status();
        if !status.is_success() {
            debug!(operation, status = status.as_u16(), "request failed");
            return Err(Error::Status {
                operation,
                status: status.as_u16(),
            });
        }

        let body = resp.text().await?;
        trace!(operation, bytes = body.len(), "response body received");

        let value = serde_json::from_str(&body).map_err(|e| Error::deserialization(&e, &body))?;
        Ok((value, body))
    }

    // ── Operations ───────────────────────────────────────────────────

    /// Fetch one page of the listing.
    ///
    /// A bare array response is wrapped in an envelope whose `next` and
    /// `previous` links are derived from `filters` and the catalog size.
    pub async fn list_pokemon(&self, filters: &Filters) -> Result<ListResponse, Error> {
        let (value, body) = self
            .get_json("Pokemon list", "pokemons", &filters.query_pairs())
            .await?;

        normalize::list(value, filters, &self.base_url, self.catalog_size)
            .map_err(|e| Error::deserialization(&e, &body))
    }

    /// Fetch the extended record for one pokedex id, with stringified
    /// nested fields repaired.
    pub async fn pokemon_detail(&self, pokedex_id: u32) -> Result<PokemonDetail, Error> {
        let (value, body) = self
            .get_json("Pokemon detail", &format!("pokemons/{pokedex_id}"), &[])
            .await?;

        normalize::detail(value).map_err(|e| Error::deserialization(&e, &body))
    }

    /// Fetch the full type taxonomy.
    pub async fn pokemon_types(&self) -> Result<Vec<PokemonType>, Error> {
        let (value, body) = self.get_json("Pokemon types", "types", &[]).await?;

        normalize::type_listing(value).map_err(|e| Error::deserialization(&e, &body))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gains_trailing_slash() {
        let client =
            PokedexClient::with_client("https://example.test/api", reqwest::Client::new()).unwrap();
        assert_eq!(client.base_url().as_str(), "https://example.test/api/");
        assert_eq!(
            client.url("pokemons/25").unwrap().as_str(),
            "https://example.test/api/pokemons/25"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = PokedexClient::with_client("not a url", reqwest::Client::new()).unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));
    }
}
