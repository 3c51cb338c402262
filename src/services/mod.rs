use std::time::Duration;

use reqwest::Client;
use tracing::warn;

pub mod launcher;
pub mod llm;
pub mod search;

pub(crate) fn try_http_client(timeout: Duration, user_agent: Option<&str>) -> reqwest::Result<Client> {
    let mut builder = Client::builder().timeout(timeout);
    if let Some(agent) = user_agent {
        builder = builder.user_agent(agent);
    }
    builder.build()
}

/// Builds the shared HTTP client for a lookup collaborator.
///
/// A builder failure falls back to a default client, which has no request timeout.
pub(crate) fn http_client(timeout: Duration, user_agent: Option<&str>) -> Client {
    match try_http_client(timeout, user_agent) {
        Ok(client) => client,
        Err(e) => {
            warn!(error = %e, ?timeout, "HTTP client build failed, falling back to an unbounded default client");
            Client::new()
        }
    }
}
