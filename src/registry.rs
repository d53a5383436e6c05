//! Registry mapping retailer identifiers to their adapters

use std::sync::Arc;

use crate::adapters::{LululemonAdapter, UnderArmourAdapter};
use crate::error::TrackError;
use crate::traits::RetailerAdapter;

/// Read-only set of registered retailer adapters.
///
/// Built once at startup and shared freely afterwards.
pub struct AdapterRegistry {
    adapters: Vec<Arc<dyn RetailerAdapter>>,
}

impl AdapterRegistry {
    /// Registry with every production adapter registered.
    pub fn new() -> Result<Self, TrackError> {
        Ok(Self::with_adapters(vec![
            Arc::new(LululemonAdapter::new()?),
            Arc::new(UnderArmourAdapter::new()?),
        ]))
    }

    pub fn with_adapters(adapters: Vec<Arc<dyn RetailerAdapter>>) -> Self {
        Self { adapters }
    }

    /// First registered adapter claiming the retailer id.
    ///
    /// A miss means an order references a retailer nothing was deployed
    /// for: a configuration defect, reported loudly but scoped to that
    /// one order.
    pub fn resolve(&self, retailer_id: &str) -> Result<Arc<dyn RetailerAdapter>, TrackError> {
        self.adapters
            .iter()
            .find(|adapter| adapter.matches(retailer_id))
            .cloned()
            .ok_or_else(|| TrackError::AdapterNotFound {
                retailer_id: retailer_id.to_string(),
            })
    }
}
