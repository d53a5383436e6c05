//! Domain models for tracked orders and their observation history

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One product variant tracked at one retailer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackedOrder {
    pub id: String,
    /// Which retailer adapter applies to this order.
    pub retailer_id: String,
    /// Retailer-scoped product code, e.g. `prod9200786`.
    pub product_identifier: String,
    /// Product slug, used by retailers whose URLs embed it.
    pub name: String,
    /// Tracked color; empty means "whichever color group the page
    /// currently selects".
    pub color: String,
    pub size: String,
    pub history: EntryHistory,
    /// Incremented once per successful tracking cycle touching this order.
    pub search_count: i64,
}

impl TrackedOrder {
    pub fn new(
        retailer_id: &str,
        product_identifier: &str,
        name: &str,
        color: &str,
        size: &str,
    ) -> Self {
        // Generate a stable ID from the retailer/product/variant tuple
        let id = format!(
            "{:x}",
            md5::compute(format!("{retailer_id}:{product_identifier}:{color}:{size}"))
        );

        Self {
            id,
            retailer_id: retailer_id.to_string(),
            product_identifier: product_identifier.to_string(),
            name: name.to_string(),
            color: color.to_string(),
            size: size.to_string(),
            history: EntryHistory::default(),
            search_count: 0,
        }
    }
}

/// Why an observation carries the values it does.
///
/// Keeps the zero-price sentinel interpretable: a `price` of 0.0 with
/// reason `VariantMissing` or `PageGone` means "could not determine",
/// never "confirmed free".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObservationReason {
    /// Price and availability read off a live product page.
    Priced,
    /// The page exists but the requested color/size is not on it.
    VariantMissing,
    /// The retailer reports the product page itself as gone.
    PageGone,
}

impl ObservationReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Priced => "priced",
            Self::VariantMissing => "variant_missing",
            Self::PageGone => "page_gone",
        }
    }
}

impl From<&str> for ObservationReason {
    fn from(value: &str) -> Self {
        match value {
            "priced" => Self::Priced,
            "page_gone" => Self::PageGone,
            _ => Self::VariantMissing,
        }
    }
}

/// One point-in-time price/availability reading.
///
/// Created once by a retailer adapter, immutable afterwards, owned by
/// the history it is appended to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub price: f64,
    /// Whether the exact requested size is currently purchasable.
    pub available: bool,
    pub reason: ObservationReason,
    pub recorded_at: DateTime<Utc>,
}

impl Observation {
    pub fn new(price: f64, available: bool, reason: ObservationReason) -> Self {
        Self {
            price,
            available,
            reason,
            recorded_at: Utc::now(),
        }
    }

    /// Zero-price/unavailable reading recorded when the variant or the
    /// whole page is gone. Still appended to history: a vanished variant
    /// is tracked information, not a fault.
    pub fn unavailable(reason: ObservationReason) -> Self {
        Self::new(0.0, false, reason)
    }
}

/// Append-only time series of observations for one tracked order.
///
/// Only exposes `append`; nothing else in the crate may reorder or
/// rewrite recorded entries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntryHistory {
    entries: Vec<Observation>,
}

impl EntryHistory {
    /// Rehydrates a history loaded from the order store.
    pub(crate) fn from_entries(entries: Vec<Observation>) -> Self {
        Self { entries }
    }

    pub fn append(&mut self, observation: Observation) {
        self.entries.push(observation);
    }

    pub fn entries(&self) -> &[Observation] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&Observation> {
        self.entries.last()
    }
}
