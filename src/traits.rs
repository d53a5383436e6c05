//! Traits and interfaces for retailer-agnostic variant tracking

use async_trait::async_trait;
use reqwest::Client;
use scraper::Html;
use tracing::debug;

use crate::error::TrackError;
use crate::models::{Observation, ObservationReason, TrackedOrder};
use crate::page::{self, CompiledSelectors, PageOutcome, PageSelectors};
use crate::resolver::resolve_variant;

/// Configuration for a retailer adapter
#[derive(Debug, Clone)]
pub struct RetailerConfig {
    /// Identifier tracked orders use to pick this adapter
    pub retailer_id: String,
    /// Display name for the retailer
    pub display_name: String,
    /// Scheme + host the product URL template is appended to
    pub base_url: String,
    /// Product page URL template with `{name}`, `{id}`, `{color}` and
    /// `{size}` placeholders; `{id}` may appear more than once
    pub product_url_template: String,
    /// CSS selectors for extracting data
    pub selectors: PageSelectors,
}

/// Trait for retailer-specific product page adapters
#[async_trait]
pub trait RetailerAdapter: Send + Sync + std::fmt::Debug {
    /// Get the configuration for this adapter
    fn config(&self) -> &RetailerConfig;

    /// HTTP client used for page fetches
    fn client(&self) -> &Client;

    /// Selector set compiled at construction
    fn selectors(&self) -> &CompiledSelectors;

    /// Whether this adapter serves the given retailer id
    fn matches(&self, retailer_id: &str) -> bool {
        self.config().retailer_id.eq_ignore_ascii_case(retailer_id)
    }

    /// Builds the retailer's canonical product page URL for an order.
    ///
    /// Pure and deterministic: the same order always produces the same
    /// URL. An empty color substitutes a blank query value, keeping the
    /// key in place so the URL shape never changes.
    fn build_url(&self, order: &TrackedOrder) -> String {
        let config = self.config();
        let filled = config
            .product_url_template
            .replace("{id}", &urlencoding::encode(&order.product_identifier))
            .replace("{name}", &urlencoding::encode(&order.name))
            .replace("{color}", &urlencoding::encode(&order.color))
            .replace("{size}", &urlencoding::encode(&order.size));

        format!("{}{}", config.base_url, filled)
    }

    /// Fetches the product page and parses it into a page model.
    ///
    /// Non-2xx statuses, timeouts and connection failures are fetch
    /// errors; only the retailer's own not-found marker produces
    /// [`PageOutcome::NotFound`]. A failed fetch is never treated as
    /// evidence that the product is gone.
    async fn fetch_page(&self, url: &str) -> Result<PageOutcome, TrackError> {
        let response = self
            .client()
            .get(url)
            .send()
            .await
            .map_err(|e| TrackError::Fetch {
                url: url.to_string(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TrackError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await.map_err(|e| TrackError::Fetch {
            url: url.to_string(),
            source: e,
        })?;

        // Html is not Send; no await may happen while it lives
        let document = Html::parse_document(&body);
        if page::is_not_found_page(&document, self.selectors()) {
            return Ok(PageOutcome::NotFound);
        }

        Ok(PageOutcome::Found(page::extract_page_model(
            &document,
            self.selectors(),
        )))
    }

    /// Produces one timestamped observation for the order's variant.
    ///
    /// A not-found page short-circuits before any color/size extraction
    /// and is recorded as a zero-price/unavailable observation.
    async fn observe(&self, order: &TrackedOrder) -> Result<Observation, TrackError> {
        let url = self.build_url(order);
        debug!(
            "Fetching {} from {} at {}",
            order.product_identifier,
            self.config().display_name,
            url
        );

        match self.fetch_page(&url).await? {
            PageOutcome::NotFound => Ok(Observation::unavailable(ObservationReason::PageGone)),
            PageOutcome::Found(model) => {
                let resolved = resolve_variant(&model, &order.color, &order.size);
                Ok(Observation::new(
                    resolved.price,
                    resolved.available,
                    resolved.reason,
                ))
            }
        }
    }
}
