//! Public data sources and the plain-text scraper used as lesson context

mod country;
mod currency;
mod error;
mod http;
mod scraper;

pub use country::{CountryInfo, CountryKnowledge, CountryName, Currency, InfoField, RESTCOUNTRIES_URL};
pub use currency::{CurrencyKnowledge, ExchangeRate, NBP_URL};
pub use error::KnowledgeError;
pub use scraper::{Scraper, SCRAPE_BACKOFF, SCRAPE_TIMEOUT};
