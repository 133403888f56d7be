//! Average exchange rates published by the National Bank of Poland

use crate::error::KnowledgeError;
use crate::http::get_json;
use serde::Deserialize;

pub const NBP_URL: &str = "http://api.nbp.pl";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExchangeRate {
    #[serde(default)]
    pub no: String,
    #[serde(rename = "effectiveDate", default)]
    pub effective_date: String,
    pub mid: f64,
}

#[derive(Debug, Deserialize)]
struct RatesTable {
    #[serde(default)]
    rates: Vec<ExchangeRate>,
}

pub struct CurrencyKnowledge {
    client: reqwest::Client,
    base_url: String,
}

impl CurrencyKnowledge {
    pub fn new() -> Self {
        Self::with_base_url(NBP_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Today's mid rate of `code` against PLN, from table A
    pub async fn todays_rate(&self, code: &str) -> Result<f64, KnowledgeError> {
        let url = format!("{}/api/exchangerates/rates/a/{code}/today/", self.base_url);
        let table: RatesTable = get_json(&self.client, &url).await?;
        match table.rates.as_slice() {
            [rate] => Ok(rate.mid),
            rates => Err(KnowledgeError::AmbiguousResult {
                url,
                count: rates.len(),
            }),
        }
    }
}

impl Default for CurrencyKnowledge {
    fn default() -> Self {
        Self::new()
    }
}
