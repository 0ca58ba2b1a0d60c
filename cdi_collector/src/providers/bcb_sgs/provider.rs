use async_trait::async_trait;
use reqwest::Client;
use snafu::ResultExt;
use tracing::debug;

use crate::providers::{
    ProviderError, ProviderInitError, RateProvider,
    bcb_sgs::{params::SgsParams, response::parse_latest_rate},
    errors::{ClientBuildSnafu, RequestSnafu, StatusSnafu},
};

/// Banco Central do Brasil SGS client for a single series.
pub struct BcbSgsProvider {
    client: Client,
    params: SgsParams,
}

impl BcbSgsProvider {
    /// Creates a new SGS provider.
    ///
    /// The underlying client enforces `params.timeout` on every request.
    pub fn new(params: SgsParams) -> Result<Self, ProviderInitError> {
        let client = Client::builder()
            .timeout(params.timeout)
            .build()
            .context(ClientBuildSnafu)?;

        Ok(Self { client, params })
    }

    pub fn params(&self) -> &SgsParams {
        &self.params
    }
}

#[async_trait]
impl RateProvider for BcbSgsProvider {
    async fn fetch_latest(&self) -> Result<f64, ProviderError> {
        let url = self.params.latest_url();
        debug!(%url, series = self.params.series_code, "requesting latest value");

        let response = self
            .client
            .get(&url)
            .query(&self.params.query())
            .send()
            .await
            .context(RequestSnafu)?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown API error".to_string());
            return StatusSnafu {
                status: status.as_u16(),
                message,
            }
            .fail();
        }

        let body = response.text().await.context(RequestSnafu)?;
        parse_latest_rate(&body)
    }

    fn name(&self) -> &str {
        "bcb-sgs"
    }
}
