//! Request URL construction for the supported rate APIs.
//!
//! A configured template may carry `{FROM}`, `{TO}` and `{APIKEY}`
//! placeholders. Templates pointing at a known provider but missing that
//! provider's mandatory parameter are rewritten into its canonical form.

use fxgate_common::CurrencyPair;
use urlencoding::encode;

/// Template used when none is configured.
pub const DEFAULT_URL_TEMPLATE: &str = "https://api.exchangerate.host/convert?from={FROM}&to={TO}";

/// Rate APIs whose URL shape is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnownProvider {
    /// `from`/`to` query parameters.
    ExchangerateHost,
    /// `apikey`/`symbols` query parameters.
    CurrencyFreaks,
    /// Base code in the path: `/latest/{FROM}`.
    OpenErApi,
    /// Key and base code in the path: `/{APIKEY}/latest/{FROM}`.
    ExchangeRateApiV6,
}

impl KnownProvider {
    const ALL: [KnownProvider; 4] = [
        KnownProvider::ExchangerateHost,
        KnownProvider::CurrencyFreaks,
        KnownProvider::OpenErApi,
        KnownProvider::ExchangeRateApiV6,
    ];

    /// Host fragment identifying this provider.
    fn host(self) -> &'static str {
        match self {
            KnownProvider::ExchangerateHost => "exchangerate.host",
            KnownProvider::CurrencyFreaks => "currencyfreaks.com",
            KnownProvider::OpenErApi => "open.er-api.com",
            KnownProvider::ExchangeRateApiV6 => "v6.exchangerate-api.com",
        }
    }

    /// Fragment that must be present for the URL to be usable as-is.
    fn required_fragment(self) -> &'static str {
        match self {
            KnownProvider::ExchangerateHost => "from=",
            KnownProvider::CurrencyFreaks => "apikey=",
            KnownProvider::OpenErApi | KnownProvider::ExchangeRateApiV6 => "/latest/",
        }
    }

    /// Identify the provider a URL points at.
    pub fn detect(url: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| url.contains(p.host()))
    }

    /// Canonical request URL for this provider.
    pub fn canonical_url(self, pair: &CurrencyPair, api_key: &str) -> String {
        let from = encode(pair.from.code());
        let to = encode(pair.to.code());

        match self {
            KnownProvider::ExchangerateHost => {
                format!("https://api.exchangerate.host/convert?from={from}&to={to}")
            }
            KnownProvider::CurrencyFreaks => {
                if api_key.is_empty() {
                    format!("https://api.currencyfreaks.com/latest?symbols={to}")
                } else {
                    format!(
                        "https://api.currencyfreaks.com/latest?apikey={}&symbols={to}",
                        encode(api_key)
                    )
                }
            }
            KnownProvider::OpenErApi => format!("https://open.er-api.com/v6/latest/{from}"),
            KnownProvider::ExchangeRateApiV6 => format!(
                "https://v6.exchangerate-api.com/v6/{}/latest/{from}",
                encode(api_key)
            ),
        }
    }
}

/// Expand a URL template for one pair.
pub fn build_request_url(template: &str, api_key: &str, pair: &CurrencyPair) -> String {
    let template = if template.trim().is_empty() {
        DEFAULT_URL_TEMPLATE
    } else {
        template
    };

    let url = template
        .replace("{FROM}", &encode(pair.from.code()))
        .replace("{TO}", &encode(pair.to.code()))
        .replace("{APIKEY}", &encode(api_key));

    match KnownProvider::detect(&url) {
        Some(provider) if !url.contains(provider.required_fragment()) => {
            provider.canonical_url(pair, api_key)
        }
        _ => url,
    }
}

/// Mask the API key in a request URL before it is logged or returned.
pub fn redact_api_key(url: &str, api_key: &str) -> String {
    if api_key.is_empty() {
        return url.to_string();
    }
    let encoded = encode(api_key);
    url.replace(&*encoded, "***").replace(api_key, "***")
}
