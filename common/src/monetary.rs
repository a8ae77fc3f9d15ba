//! Currency codes and currency pairs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CurrencyError, Result};

/// Characters stripped from both ends of a raw currency code.
fn is_code_padding(c: char) -> bool {
    c.is_whitespace() || c == '"' || c == '\''
}

/// Canonical currency code: trimmed, unquoted, uppercase, never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Currency(String);

impl Currency {
    /// Normalize a raw code such as `" usd "` or `"'etb'"`.
    pub fn parse(raw: &str) -> Result<Self> {
        let code = raw.trim_matches(is_code_padding);
        if code.is_empty() {
            return Err(CurrencyError::Empty {
                input: raw.to_string(),
            });
        }
        Ok(Self(code.to_uppercase()))
    }

    /// Get the currency code.
    pub fn code(&self) -> &str {
        &self.0
    }

    /// Common currencies
    pub fn usd() -> Self {
        Self("USD".to_string())
    }

    pub fn etb() -> Self {
        Self("ETB".to_string())
    }

    pub fn eur() -> Self {
        Self("EUR".to_string())
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Currency {
    type Err = CurrencyError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Currency {
    type Error = CurrencyError;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl From<Currency> for String {
    fn from(c: Currency) -> Self {
        c.0
    }
}

/// An ordered currency pair: how many `to` units one `from` unit buys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurrencyPair {
    /// Source currency.
    pub from: Currency,
    /// Target currency.
    pub to: Currency,
}

impl CurrencyPair {
    /// Create a new currency pair.
    pub fn new(from: Currency, to: Currency) -> Self {
        Self { from, to }
    }

    /// Normalize both sides of a raw pair.
    pub fn parse(from: &str, to: &str) -> Result<Self> {
        Ok(Self {
            from: Currency::parse(from)?,
            to: Currency::parse(to)?,
        })
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.from, self.to)
    }
}
