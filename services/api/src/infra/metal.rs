//! Upstream metal price API. AED-base quotes for gold and silver, reported
//! as metal-per-AED troy-ounce rates.

use anyhow::Context as _;
use serde::Deserialize;

use crate::domain::repository::MetalPriceSource;
use crate::domain::types::MetalRates;
use crate::error::ApiError;

#[derive(Clone)]
pub struct MetalPriceClient {
    pub http: reqwest::Client,
    pub api_url: String,
    pub api_key: String,
}

#[derive(Debug, Deserialize)]
struct LatestResponse {
    rates: Rates,
}

#[derive(Debug, Deserialize)]
struct Rates {
    #[serde(rename = "XAU")]
    xau: f64,
    #[serde(rename = "XAG")]
    xag: f64,
}

impl MetalPriceSource for MetalPriceClient {
    async fn latest_rates(&self) -> Result<MetalRates, ApiError> {
        let response = self
            .http
            .get(&self.api_url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("base", "AED"),
                ("currencies", "XAU,XAG"),
            ])
            .send()
            .await
            .context("metal price request")?
            .error_for_status()
            .context("metal price response status")?;

        let parsed: LatestResponse = response
            .json()
            .await
            .context("metal price response body")?;
        Ok(MetalRates {
            xau: parsed.rates.xau,
            xag: parsed.rates.xag,
        })
    }
}
