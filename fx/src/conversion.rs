//! Conversion records and amount parsing.

use fxgate_common::{Currency, CurrencyPair};
use serde::{Deserialize, Serialize};

use crate::error::{FxError, FxResult};

/// Amount used when the caller gives none.
pub const DEFAULT_AMOUNT: f64 = 1.0;

/// A rate applied to an amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversion {
    /// Source currency.
    pub from: Currency,
    /// Target currency.
    pub to: Currency,
    /// Units of `to` per unit of `from`.
    pub rate: f64,
    /// Input amount in `from`.
    pub amount: f64,
    /// `rate * amount`, in `to`.
    pub converted: f64,
}

impl Conversion {
    /// Create a new conversion record.
    pub fn new(pair: CurrencyPair, rate: f64, amount: f64) -> Self {
        Self {
            from: pair.from,
            to: pair.to,
            rate,
            amount,
            converted: rate * amount,
        }
    }

    /// Get the currency pair.
    pub fn pair(&self) -> CurrencyPair {
        CurrencyPair::new(self.from.clone(), self.to.clone())
    }
}

/// Parse a caller-supplied amount.
///
/// Absent or blank input means [`DEFAULT_AMOUNT`]. Anything else must be a
/// finite, non-negative number.
pub fn parse_amount(raw: Option<&str>) -> FxResult<f64> {
    let raw = match raw.map(str::trim) {
        None | Some("") => return Ok(DEFAULT_AMOUNT),
        Some(raw) => raw,
    };

    match raw.parse::<f64>() {
        Ok(amount) if amount.is_finite() && amount >= 0.0 => Ok(amount),
        _ => Err(FxError::InvalidArgument(format!("invalid amount: {raw:?}"))),
    }
}
