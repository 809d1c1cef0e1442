//! HTTP Client Pool for maintaining persistent connections per base URL.
//!
//! Every provider client asks this pool for its `reqwest::Client`, so the three
//! participants of a conversation reuse one connection pool per endpoint
//! instead of paying DNS and TLS setup on every turn.
//!
//! The timeout policy of an upstream call lives here as well: the orchestrator
//! never cancels a participant, it only waits for the outcome.

use lazy_static::lazy_static;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// Maximum time a single request (connect + body) may take.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Maximum time to establish a connection.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

lazy_static! {
    static ref HTTP_CLIENT_POOL: Mutex<HashMap<String, reqwest::Client>> =
        Mutex::new(HashMap::new());
}

/// Get or create a shared HTTP client for the given base URL.
///
/// The client is configured with:
/// - up to 10 idle connections per host, kept for 90 seconds
/// - TCP keepalive every 60 seconds
/// - [`CONNECT_TIMEOUT`] and [`REQUEST_TIMEOUT`]
pub fn get_http_client(base_url: &str) -> Result<reqwest::Client, reqwest::Error> {
    // A poisoned pool still holds valid clients.
    let mut pool = HTTP_CLIENT_POOL
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());

    if let Some(client) = pool.get(base_url) {
        return Ok(client.clone());
    }

    let client = reqwest::ClientBuilder::new()
        .pool_idle_timeout(Some(Duration::from_secs(90)))
        .pool_max_idle_per_host(10)
        .tcp_keepalive(Some(Duration::from_secs(60)))
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(REQUEST_TIMEOUT)
        .build()?;

    pool.insert(base_url.to_string(), client.clone());
    Ok(client)
}

#[cfg(test)]
fn pool_contains(base_url: &str) -> bool {
    HTTP_CLIENT_POOL
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .contains_key(base_url)
}
