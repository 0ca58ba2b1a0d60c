use std::time::Duration;

/// Root of the SGS series API.
pub const DEFAULT_BASE_URL: &str = "https://api.bcb.gov.br/dados/serie";

/// SGS code of the daily CDI rate.
pub const CDI_SERIES_CODE: u32 = 12;

/// Upper bound on a single fetch, connection and body included.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Request parameters for the SGS "last N values" endpoint.
#[derive(Clone, Debug, PartialEq)]
pub struct SgsParams {
    /// Base URL without the `bcdata.sgs.<code>` segment.
    pub base_url: String,
    /// SGS series code.
    pub series_code: u32,
    /// How many trailing values to request. Only the last one is used.
    pub last: u32,
    /// Total request timeout.
    pub timeout: Duration,
}

impl Default for SgsParams {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            series_code: CDI_SERIES_CODE,
            last: 1,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl SgsParams {
    /// Endpoint for the trailing values of the series, without the query string.
    pub fn latest_url(&self) -> String {
        format!(
            "{}/bcdata.sgs.{}/dados/ultimos/{}",
            self.base_url.trim_end_matches('/'),
            self.series_code,
            self.last.max(1)
        )
    }

    pub fn query(&self) -> [(&'static str, &'static str); 1] {
        [("formato", "json")]
    }
}
