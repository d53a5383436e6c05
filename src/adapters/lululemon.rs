//! Lululemon product page adapter

use async_trait::async_trait;
use reqwest::Client;

use crate::error::TrackError;
use crate::page::{CompiledSelectors, PageSelectors};
use crate::traits::{RetailerAdapter, RetailerConfig};

/// Adapter for shop.lululemon.com product pages.
///
/// Product URLs follow the Demandware layout: the product identifier
/// appears both as the final path segment and as the scope key of the
/// `dwvar_` variant query parameters.
#[derive(Debug)]
pub struct LululemonAdapter {
    client: Client,
    config: RetailerConfig,
    selectors: CompiledSelectors,
}

impl LululemonAdapter {
    /// Create a new Lululemon adapter with default configuration
    pub fn new() -> Result<Self, TrackError> {
        Self::with_base_url("https://shop.lululemon.com")
    }

    /// Create an adapter pointed at a different host, keeping the page
    /// layout and URL template. Used to target a local test server.
    pub fn with_base_url(base_url: &str) -> Result<Self, TrackError> {
        let config = RetailerConfig {
            retailer_id: "lululemon".to_string(),
            display_name: "Lululemon".to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            product_url_template:
                "/p/{name}/{id}.html?dwvar_{id}_color={color}&dwvar_{id}_size={size}".to_string(),
            selectors: PageSelectors {
                color_group: ".product-colors .color-group".to_string(),
                group_price: ".color-group__price".to_string(),
                swatch: ".color-group__swatches .swatch".to_string(),
                swatch_name_attr: "data-color-name".to_string(),
                selected_class: "is-selected".to_string(),
                size_input: ".size-tiles input.size-tile__input".to_string(),
                size_name_attr: "value".to_string(),
                not_found: "h1.page-not-found__heading".to_string(),
            },
        };

        let selectors = config.selectors.compile()?;
        let client = super::http_client()?;

        Ok(Self {
            client,
            config,
            selectors,
        })
    }
}

#[async_trait]
impl RetailerAdapter for LululemonAdapter {
    fn config(&self) -> &RetailerConfig {
        &self.config
    }

    fn client(&self) -> &Client {
        &self.client
    }

    fn selectors(&self) -> &CompiledSelectors {
        &self.selectors
    }
}
