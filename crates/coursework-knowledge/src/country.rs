//! Country facts from the REST Countries API

use crate::error::KnowledgeError;
use crate::http::get_json;
use serde::Deserialize;
use std::collections::HashMap;

pub const RESTCOUNTRIES_URL: &str = "https://restcountries.com";

/// Optional fields requested next to the name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoField {
    Population,
    Currencies,
}

impl InfoField {
    pub fn as_str(&self) -> &'static str {
        match self {
            InfoField::Population => "population",
            InfoField::Currencies => "currencies",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CountryName {
    #[serde(default)]
    pub common: String,
    #[serde(default)]
    pub official: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Currency {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub symbol: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CountryInfo {
    pub name: CountryName,
    /// Keyed by ISO 4217 code
    #[serde(default)]
    pub currencies: HashMap<String, Currency>,
    #[serde(default)]
    pub population: u64,
}

pub struct CountryKnowledge {
    client: reqwest::Client,
    base_url: String,
}

impl CountryKnowledge {
    pub fn new() -> Self {
        Self::with_base_url(RESTCOUNTRIES_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Country name goes in as a single escaped path segment
    fn url(&self, name: &str, fields: &[InfoField]) -> Result<String, KnowledgeError> {
        let invalid = |reason: String| KnowledgeError::InvalidUrl {
            base: self.base_url.clone(),
            reason,
        };
        let mut url = reqwest::Url::parse(&self.base_url).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| invalid("cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend(["v3.1", "name", name]);

        let mut requested = vec!["name"];
        requested.extend(fields.iter().map(InfoField::as_str));
        url.set_query(Some(&format!("fields={}", requested.join(","))));
        Ok(url.into())
    }

    /// The single country matching `name`
    pub async fn info(&self, name: &str, fields: &[InfoField]) -> Result<CountryInfo, KnowledgeError> {
        let url = self.url(name, fields)?;
        let mut found: Vec<CountryInfo> = get_json(&self.client, &url).await?;
        if found.len() != 1 {
            return Err(KnowledgeError::AmbiguousResult {
                url,
                count: found.len(),
            });
        }
        Ok(found.remove(0))
    }
}

impl Default for CountryKnowledge {
    fn default() -> Self {
        Self::new()
    }
}
