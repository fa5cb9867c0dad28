//! Derived gold and silver quotes in AED from upstream troy-ounce rates.

use crate::domain::repository::MetalPriceSource;
use crate::error::ApiError;

pub const TROY_OUNCE_GRAMS: f64 = 31.1035;
pub const TOLA_GRAMS: f64 = 11.6638;
pub const KG_GRAMS: f64 = 1000.0;

pub const PURITY_JEWELLERY_22K: f64 = 0.916;
pub const PURITY_JEWELLERY_24K: f64 = 0.999;
pub const PURITY_KILO_995: f64 = 0.995;
pub const PURITY_KILO_9999: f64 = 0.9999;

#[derive(Debug, Clone, PartialEq)]
pub struct MetalQuote {
    pub name: &'static str,
    /// Human-readable weight the price applies to.
    pub weight: &'static str,
    /// AED, rounded to 2 decimals.
    pub price: f64,
}

pub struct GetMetalPricesUseCase<M: MetalPriceSource> {
    pub source: M,
}

impl<M: MetalPriceSource> GetMetalPricesUseCase<M> {
    /// Upstream reports AED-base rates as metal-per-AED, so AED per troy
    /// ounce is the reciprocal. Everything else is unit and purity
    /// arithmetic from there.
    pub async fn execute(&self) -> Result<Vec<MetalQuote>, ApiError> {
        let rates = self.source.latest_rates().await?;
        let gold_per_gram = (1.0 / rates.xau) / TROY_OUNCE_GRAMS;
        let silver_per_gram = (1.0 / rates.xag) / TROY_OUNCE_GRAMS;

        Ok(vec![
            MetalQuote {
                name: "gold_22k",
                weight: "1g",
                price: round2(gold_per_gram * PURITY_JEWELLERY_22K),
            },
            MetalQuote {
                name: "gold_24k",
                weight: "1g",
                price: round2(gold_per_gram * PURITY_JEWELLERY_24K),
            },
            MetalQuote {
                name: "gold_ten_tola",
                weight: "10 tola",
                price: round2(gold_per_gram * TOLA_GRAMS * 10.0),
            },
            MetalQuote {
                name: "gold_kilo_995",
                weight: "1kg",
                price: round2(gold_per_gram * KG_GRAMS * PURITY_KILO_995),
            },
            MetalQuote {
                name: "gold_kilo_9999",
                weight: "1kg",
                price: round2(gold_per_gram * KG_GRAMS * PURITY_KILO_9999),
            },
            MetalQuote {
                name: "silver_kilo",
                weight: "1kg",
                price: round2(silver_per_gram * KG_GRAMS),
            },
        ])
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
