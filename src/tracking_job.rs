//! Scheduled batch job walking every tracked order once per trigger

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::database::Database;
use crate::error::TrackError;
use crate::models::TrackedOrder;
use crate::registry::AdapterRegistry;

/// Delay between consecutive order fetches within one cycle, to be
/// respectful to the retailers' servers.
const INTER_ORDER_DELAY: Duration = Duration::from_millis(500);

/// One order that could not be processed this cycle.
#[derive(Debug, Clone, Serialize)]
pub struct CycleFailure {
    pub order_id: String,
    pub retailer_id: String,
    pub step: &'static str,
    pub error: String,
}

/// Per-cycle outcome report: which orders advanced, which were skipped.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CycleReport {
    pub succeeded: Vec<String>,
    pub failed: Vec<CycleFailure>,
}

/// Polling tracker over the full set of tracked orders.
///
/// Owns only its dependencies; the cadence lives with the external
/// scheduler that calls [`TrackingJob::run_once`].
#[derive(Clone)]
pub struct TrackingJob {
    registry: Arc<AdapterRegistry>,
    database: Database,
    running: Arc<Mutex<()>>,
}

impl TrackingJob {
    pub fn new(registry: Arc<AdapterRegistry>, database: Database) -> Self {
        Self {
            registry,
            database,
            running: Arc::new(Mutex::new(())),
        }
    }

    /// Runs one tracking cycle over all tracked orders.
    ///
    /// Returns `None` when a previous cycle is still running; the trigger
    /// is dropped, not queued. Failures never cross order boundaries: a
    /// failed order is skipped with nothing persisted and simply retried
    /// on the next trigger.
    pub async fn run_once(&self) -> Result<Option<CycleReport>, TrackError> {
        let Ok(_guard) = self.running.try_lock() else {
            warn!("Previous tracking cycle still running, dropping this trigger");
            return Ok(None);
        };

        let orders = self.database.list_tracked().await?;
        info!("Tracking cycle started for {} orders", orders.len());

        let mut report = CycleReport::default();

        for (index, mut order) in orders.into_iter().enumerate() {
            if index > 0 {
                tokio::time::sleep(INTER_ORDER_DELAY).await;
            }

            match self.process_order(&mut order).await {
                Ok(()) => report.succeeded.push(order.id),
                Err(e) => {
                    let failure = CycleFailure {
                        order_id: order.id.clone(),
                        retailer_id: order.retailer_id.clone(),
                        step: e.step(),
                        error: e.to_string(),
                    };

                    // A missing adapter is a deployment gap, not flakiness
                    if matches!(e, TrackError::AdapterNotFound { .. }) {
                        error!(
                            order_id = %failure.order_id,
                            retailer_id = %failure.retailer_id,
                            step = failure.step,
                            "Order skipped this cycle: {e}"
                        );
                    } else {
                        warn!(
                            order_id = %failure.order_id,
                            retailer_id = %failure.retailer_id,
                            step = failure.step,
                            "Order skipped this cycle: {e}"
                        );
                    }

                    report.failed.push(failure);
                }
            }
        }

        info!(
            "Tracking cycle finished: {} succeeded, {} failed",
            report.succeeded.len(),
            report.failed.len()
        );

        Ok(Some(report))
    }

    /// Resolve adapter → observe → append → increment → persist for one
    /// order. Nothing is written unless every step succeeds.
    async fn process_order(&self, order: &mut TrackedOrder) -> Result<(), TrackError> {
        let adapter = self.registry.resolve(&order.retailer_id)?;
        let observation = adapter.observe(order).await?;

        info!(
            "Observed {} at {}: price {}, available {}",
            order.product_identifier, order.retailer_id, observation.price, observation.available
        );

        order.history.append(observation);
        order.search_count += 1;
        self.database.save(order).await?;

        Ok(())
    }
}
