// ── Runtime catalog configuration ──
//
// Describes *where* the catalog lives and how it is paged. Never touches
// disk: the CLI/TUI resolve their config files and hand a `CatalogConfig` in.

use std::time::Duration;

use pokedex_api::{
    DEFAULT_BASE_URL, DEFAULT_CATALOG_SIZE, DEFAULT_LIMIT, DEFAULT_TIMEOUT, PokedexClient,
    TransportConfig,
};
use url::Url;

use crate::error::CoreError;

/// Connection and paging settings for one catalog API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    /// API root (e.g., `https://nestjs-pokedex-api.vercel.app`).
    pub base_url: Url,
    /// Request timeout.
    pub timeout: Duration,
    /// Upstream roster size, used when synthesizing pagination links.
    pub catalog_size: u32,
    /// Entries requested per page.
    pub page_size: u32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            timeout: DEFAULT_TIMEOUT,
            catalog_size: DEFAULT_CATALOG_SIZE,
            page_size: DEFAULT_LIMIT,
        }
    }
}

impl CatalogConfig {
    /// Build an HTTP client for this catalog.
    pub fn client(&self) -> Result<PokedexClient, CoreError> {
        if self.catalog_size == 0 {
            return Err(CoreError::Config {
                message: "catalog size must be greater than zero".into(),
            });
        }
        if self.page_size == 0 {
            return Err(CoreError::Config {
                message: "page size must be greater than zero".into(),
            });
        }

        let transport = TransportConfig::default().with_timeout(self.timeout);
        let client = PokedexClient::new(self.base_url.as_str(), &transport)?;
        Ok(client.with_catalog_size(self.catalog_size))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_public_deployment() {
        let config = CatalogConfig::default();
        assert_eq!(config.base_url.as_str(), "https://nestjs-pokedex-api.vercel.app/");
        assert_eq!(config.catalog_size, 151);
        assert_eq!(config.page_size, 50);
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let config = CatalogConfig {
            page_size: 0,
            ..CatalogConfig::default()
        };
        assert!(matches!(config.client(), Err(CoreError::Config { .. })));
    }

    #[test]
    fn client_carries_catalog_size() {
        let config = CatalogConfig {
            catalog_size: 20,
            ..CatalogConfig::default()
        };
        assert_eq!(config.client().unwrap().catalog_size(), 20);
    }
}
