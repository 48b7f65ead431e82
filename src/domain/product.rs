//! Tracked Product
//!
//! A product page the user asked the remote store to watch, as returned by
//! the list endpoint.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use super::price::{parse_price, PriceError};

/// Opaque identifier assigned by the remote store
///
/// The store may send it as a JSON number or string; it is always sent
/// back as a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ProductId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => ProductId(text),
            RawId::Number(number) => ProductId(number.to_string()),
        })
    }
}

/// Target price as stored remotely: a JSON number, a string, or absent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PriceField {
    Number(f64),
    Text(String),
    #[default]
    Missing,
}

impl PriceField {
    /// Numeric value, parsing the text form like any other price string
    pub fn value(&self) -> Result<f64, PriceError> {
        match self {
            PriceField::Number(value) => Ok(*value),
            PriceField::Text(text) => parse_price(text).map(|parsed| parsed.amount),
            PriceField::Missing => Err(PriceError::NoAmount(String::new())),
        }
    }
}

impl fmt::Display for PriceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriceField::Number(value) => write!(f, "{}", value),
            PriceField::Text(text) => f.write_str(text),
            PriceField::Missing => Ok(()),
        }
    }
}

/// Treat an explicit `null` like a missing key
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Product record mirrored from the remote store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedProduct {
    pub id: ProductId,
    /// Display name scraped from the product page
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Product image URL
    #[serde(default, deserialize_with = "null_as_default")]
    pub image: String,
    /// Product page, used for scraping and "visit site"
    pub url: String,
    /// Last observed price, currency-prefixed (e.g. "$12.5")
    #[serde(default, deserialize_with = "null_as_default")]
    pub current_price: String,
    #[serde(default)]
    pub target_price: PriceField,
}

impl TrackedProduct {
    pub fn current_price_value(&self) -> Result<f64, PriceError> {
        parse_price(&self.current_price).map(|parsed| parsed.amount)
    }

    pub fn target_price_value(&self) -> Result<f64, PriceError> {
        self.target_price.value()
    }

    /// Whether the last observed price reached the target
    pub fn at_or_below_target(&self) -> Option<bool> {
        let current = self.current_price_value().ok()?;
        let target = self.target_price_value().ok()?;
        Some(current <= target)
    }
}
