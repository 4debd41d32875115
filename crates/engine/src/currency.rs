use serde::{Deserialize, Serialize};

use crate::EngineError;

/// ISO-like currency code used for a user's money values.
///
/// The engine stores monetary values as an `i64` number of **minor units**
/// (see `Money`). `minor_units()` returns how many decimal digits are used
/// when converting between:
/// - major units (human input/output, e.g. `10.50 USD`)
/// - minor units (stored integers, e.g. `1050`)
///
/// Display conventions differ per currency: INR uses Indian digit grouping
/// and the lakh/crore compact scale, the others use Western grouping and
/// the thousand/million scale.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Inr,
    Usd,
    Eur,
}

/// One step of the compact-notation scale: values at or above `threshold`
/// (in major units) are divided by it and tagged with `suffix`.
pub(crate) struct Magnitude {
    pub threshold: f64,
    pub suffix: &'static str,
}

const INDIAN_MAGNITUDES: &[Magnitude] = &[
    Magnitude { threshold: 1e7, suffix: "Cr" },
    Magnitude { threshold: 1e5, suffix: "L" },
    Magnitude { threshold: 1e3, suffix: "K" },
];

const WESTERN_MAGNITUDES: &[Magnitude] = &[
    Magnitude { threshold: 1e6, suffix: "M" },
    Magnitude { threshold: 1e3, suffix: "K" },
];

impl Currency {
    /// Canonical currency code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Currency::Inr => "INR",
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
        }
    }

    /// Number of fraction digits used when formatting/parsing amounts.
    #[must_use]
    pub const fn minor_units(self) -> u8 {
        match self {
            Currency::Inr | Currency::Usd | Currency::Eur => 2,
        }
    }

    /// Currency symbol as it precedes the value, including any separator.
    ///
    /// INR is conventionally written with a space after the sign
    /// (`₹ 1,000.00`), the others without (`$1,000.00`).
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Currency::Inr => "₹ ",
            Currency::Usd => "$",
            Currency::Eur => "€",
        }
    }

    /// Whether amounts group digits in the Indian 2-2-3 pattern
    /// (`12,34,567`) instead of the Western 3-3-3 pattern (`1,234,567`).
    #[must_use]
    pub const fn indian_grouping(self) -> bool {
        matches!(self, Currency::Inr)
    }

    pub(crate) fn magnitudes(self) -> &'static [Magnitude] {
        if self.indian_grouping() {
            INDIAN_MAGNITUDES
        } else {
            WESTERN_MAGNITUDES
        }
    }
}

impl core::fmt::Display for Currency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

impl TryFrom<&str> for Currency {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "INR" => Ok(Currency::Inr),
            "USD" => Ok(Currency::Usd),
            "EUR" => Ok(Currency::Eur),
            other => Err(EngineError::CurrencyMismatch(format!(
                "unsupported currency: {other}"
            ))),
        }
    }
}
