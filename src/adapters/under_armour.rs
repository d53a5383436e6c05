//! Under Armour product page adapter

use async_trait::async_trait;
use reqwest::Client;

use crate::error::TrackError;
use crate::page::{CompiledSelectors, PageSelectors};
use crate::traits::{RetailerAdapter, RetailerConfig};

/// Adapter for www.underarmour.com product pages.
///
/// Product URLs carry only a color variant parameter; sizes are not
/// addressable through the URL, so the size availability always comes
/// from the size controls on the fetched page.
#[derive(Debug)]
pub struct UnderArmourAdapter {
    client: Client,
    config: RetailerConfig,
    selectors: CompiledSelectors,
}

impl UnderArmourAdapter {
    /// Create a new Under Armour adapter with default configuration
    pub fn new() -> Result<Self, TrackError> {
        Self::with_base_url("https://www.underarmour.com")
    }

    /// Create an adapter pointed at a different host, keeping the page
    /// layout and URL template. Used to target a local test server.
    pub fn with_base_url(base_url: &str) -> Result<Self, TrackError> {
        let config = RetailerConfig {
            retailer_id: "underarmour".to_string(),
            display_name: "Under Armour".to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            product_url_template: "/en-us/p/{name}-{id}.html?dwvar_{id}_color={color}".to_string(),
            selectors: PageSelectors {
                color_group: ".colorways .colorway-group".to_string(),
                group_price: ".colorway-group .price-value".to_string(),
                swatch: ".colorway-group .swatch-circle".to_string(),
                swatch_name_attr: "title".to_string(),
                selected_class: "selected".to_string(),
                size_input: ".size-selector input.js-size-select".to_string(),
                size_name_attr: "value".to_string(),
                not_found: ".error-page-message".to_string(),
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
impl RetailerAdapter for UnderArmourAdapter {
    fn config(&self) -> &RetailerConfig {
        &self.config
    }

    fn client(&self) -> &Client {
        &self.client
    }

    fn selectors(&self) -> &CompiledSelectors {
        &self.selectors
    }

    // Orders created before the id was normalized still use the hyphenated form
    fn matches(&self, retailer_id: &str) -> bool {
        let id = retailer_id.to_ascii_lowercase();
        id == "underarmour" || id == "under-armour"
    }
}
