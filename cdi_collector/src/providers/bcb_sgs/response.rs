use serde::Deserialize;
use snafu::{OptionExt, ResultExt};

use crate::providers::errors::{DecodeSnafu, EmptyPayloadSnafu, InvalidValueSnafu, ProviderError};

/// `valor` is published as a string (`"13.65"`), but numbers are accepted too.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum SgsValue {
    Number(f64),
    Text(String),
}

impl SgsValue {
    /// Coerces the value to a finite float.
    pub fn to_rate(&self) -> Result<f64, ProviderError> {
        let rate = match self {
            SgsValue::Number(n) => *n,
            SgsValue::Text(s) => s.trim().parse::<f64>().map_err(|e| {
                InvalidValueSnafu {
                    value: s.as_str(),
                    message: e.to_string(),
                }
                .build()
            })?,
        };

        if !rate.is_finite() {
            return InvalidValueSnafu {
                value: rate.to_string(),
                message: "not a finite number",
            }
            .fail();
        }
        Ok(rate)
    }
}

#[derive(Deserialize, Debug)]
pub struct SgsPoint {
    #[serde(rename = "valor")]
    pub value: SgsValue,
}

/// Decodes an SGS response body and returns the value of its last point.
pub fn parse_latest_rate(body: &str) -> Result<f64, ProviderError> {
    let points: Vec<SgsPoint> = serde_json::from_str(body).context(DecodeSnafu)?;
    let last = points.last().context(EmptyPayloadSnafu)?;
    last.value.to_rate()
}
