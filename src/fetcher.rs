use std::time::Duration;

use reqwest::Client;

use crate::error::LookupError;
use crate::query::SearchRequest;

/// Issues the one GET a lookup needs. No retries; redirects follow the
/// client's default policy.
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(timeout: Option<Duration>) -> Result<Fetcher, LookupError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Fetcher {
            client: builder.build()?,
        })
    }

    /// Returns the body of a 2xx response. Any other status comes back as
    /// `LookupError::Http` carrying the error page body.
    pub async fn fetch(&self, request: &SearchRequest) -> Result<String, LookupError> {
        log::debug!("fetching {}", request.url());
        let res = self
            .client
            .get(request.url().clone())
            .headers(request.headers().clone())
            .send()
            .await?;

        let status = res.status();
        log::info!("search endpoint answered {status}");
        let body = res.text().await?;

        if !status.is_success() {
            return Err(LookupError::Http { status, body });
        }
        Ok(body)
    }
}
