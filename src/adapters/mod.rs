//! Concrete retailer adapters

use std::time::Duration;

use reqwest::Client;

use crate::error::TrackError;

pub mod lululemon;
pub mod under_armour;

pub use lululemon::LululemonAdapter;
pub use under_armour::UnderArmourAdapter;

const USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// HTTP client shared by adapter constructors: browser User-Agent and
/// bounded timeouts so a hung fetch cannot stall a whole cycle.
pub(crate) fn http_client() -> Result<Client, TrackError> {
    let client = Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(20))
        .connect_timeout(Duration::from_secs(10))
        .build()?;

    Ok(client)
}
