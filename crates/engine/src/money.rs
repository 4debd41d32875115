use std::{
    fmt,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
    str::FromStr,
};

use crate::{Currency, EngineError};

/// Signed money amount represented as **integer minor units**.
///
/// Use this type for **all** monetary values in the engine (amounts, limits,
/// EMIs) to avoid floating-point drift. Floats only ever appear at the
/// display edge, inside [`Money::format_compact`].
///
/// The value is signed:
/// - positive = income / increase
/// - negative = expense / decrease
///
/// # Examples
///
/// ```rust
/// use engine::{Currency, Money};
///
/// let amount = Money::new(1_23_456_78);
/// assert_eq!(amount.minor(), 12345678);
/// assert_eq!(amount.format(Currency::Inr), "₹ 1,23,456.78");
/// assert_eq!(amount.format(Currency::Usd), "$123,456.78");
/// ```
///
/// Parsing from user input (accepts `.` or `,` as decimal separator; rejects
/// more than 2 decimals):
///
/// ```rust
/// use engine::Money;
///
/// assert_eq!("10".parse::<Money>().unwrap().minor(), 1000);
/// assert_eq!("10,5".parse::<Money>().unwrap().minor(), 1050);
/// assert!("12.345".parse::<Money>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Creates a new amount from integer minor units.
    #[must_use]
    pub const fn new(minor: i64) -> Self {
        Self(minor)
    }

    /// Returns the raw value in minor units.
    #[must_use]
    pub const fn minor(self) -> i64 {
        self.0
    }

    /// Returns `true` if the amount is 0.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if the amount is positive.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Returns `true` if the amount is negative.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Checked addition (returns `None` on overflow).
    #[must_use]
    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    /// Checked subtraction (returns `None` on overflow).
    #[must_use]
    pub fn checked_sub(self, rhs: Money) -> Option<Money> {
        self.0.checked_sub(rhs.0).map(Money)
    }

    /// Full localized form: symbol, grouped integer digits, 2 decimals.
    ///
    /// Negative amounts format the absolute value and prefix `-`, so the
    /// minus sign always precedes the symbol: `-₹ 500.00`.
    #[must_use]
    pub fn format(self, currency: Currency) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let major = abs / 100;
        let cents = abs % 100;
        let grouped = group_digits(major, currency.indian_grouping());
        format!("{sign}{}{grouped}.{cents:02}", currency.symbol())
    }

    /// Compact abbreviated form, one decimal: `₹ 1.3Cr`, `$12.5K`.
    ///
    /// The magnitude scale is currency-specific (lakh/crore for INR,
    /// thousand/million otherwise). Below the smallest magnitude the full
    /// form without decimals is used. Rounding is half away from zero on
    /// the single displayed decimal.
    #[must_use]
    pub fn format_compact(self, currency: Currency) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let major = (self.0.unsigned_abs() / 100) as f64 + (self.0.unsigned_abs() % 100) as f64 / 100.0;

        for magnitude in currency.magnitudes() {
            if major >= magnitude.threshold {
                let scaled = (major / magnitude.threshold * 10.0).round() / 10.0;
                return format!("{sign}{}{scaled:.1}{}", currency.symbol(), magnitude.suffix);
            }
        }

        let grouped = group_digits(major.round() as u64, currency.indian_grouping());
        format!("{sign}{}{grouped}", currency.symbol())
    }
}

/// Groups the digits of `value` with commas.
///
/// Indian grouping separates the last three digits, then pairs:
/// `12,34,567`. Western grouping uses triplets throughout: `1,234,567`.
fn group_digits(value: u64, indian: bool) -> String {
    let digits = value.to_string();
    if digits.len() <= 3 {
        return digits;
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let step = if indian { 2 } else { 3 };

    let mut groups = Vec::new();
    let head_bytes = head.as_bytes();
    let mut end = head_bytes.len();
    while end > step {
        groups.push(&head[end - step..end]);
        end -= step;
    }
    groups.push(&head[..end]);
    groups.reverse();

    format!("{},{}", groups.join(","), tail)
}

impl fmt::Display for Money {
    /// Plain decimal form without currency decoration, e.g. `-10.50`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl From<i64> for Money {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Money> for i64 {
    fn from(value: Money) -> Self {
        value.0
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Self::Output {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Self::Output {
        Money(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Self::Output {
        Money(-self.0)
    }
}

impl FromStr for Money {
    type Err = EngineError;

    /// Parses a decimal string into minor units.
    ///
    /// Accepts `.` or `,` as decimal separator and an optional leading
    /// `+`/`-`.
    ///
    /// Validation rules:
    /// - max 2 fractional digits (rejects `12.345`)
    /// - rejects empty/invalid strings
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let empty = || EngineError::InvalidAmount("empty amount".to_string());
        let invalid = || EngineError::InvalidAmount("invalid amount".to_string());
        let overflow = || EngineError::InvalidAmount("amount too large".to_string());

        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(empty());
        }

        let (sign, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
            (-1i64, stripped)
        } else if let Some(stripped) = trimmed.strip_prefix('+') {
            (1i64, stripped)
        } else {
            (1i64, trimmed)
        };

        let rest = rest.trim();
        if rest.is_empty() {
            return Err(empty());
        }

        let rest = rest.replace(',', ".");
        let mut parts = rest.split('.');
        let major_str = parts.next().ok_or_else(invalid)?;
        let minor_str = parts.next();

        if parts.next().is_some() {
            return Err(invalid());
        }

        if major_str.is_empty() || !major_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let major: i64 = major_str.parse().map_err(|_| invalid())?;

        let minor: i64 = match minor_str {
            None => 0,
            Some("") => 0,
            Some(frac) => {
                if !frac.chars().all(|c| c.is_ascii_digit()) {
                    return Err(invalid());
                }
                match frac.len() {
                    1 => frac.parse::<i64>().map_err(|_| invalid())? * 10,
                    2 => frac.parse::<i64>().map_err(|_| invalid())?,
                    _ => return Err(EngineError::InvalidAmount("too many decimals".to_string())),
                }
            }
        };

        let total = major
            .checked_mul(100)
            .and_then(|v| v.checked_add(minor))
            .ok_or_else(overflow)?;

        let signed = if sign < 0 {
            total.checked_neg().ok_or_else(overflow)?
        } else {
            total
        };

        Ok(Money(signed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_form_uses_indian_grouping_for_inr() {
        assert_eq!(Money::new(0).format(Currency::Inr), "₹ 0.00");
        assert_eq!(Money::new(95_000).format(Currency::Inr), "₹ 950.00");
        assert_eq!(Money::new(1_23_456_78).format(Currency::Inr), "₹ 1,23,456.78");
        assert_eq!(
            Money::new(12_34_56_789_00).format(Currency::Inr),
            "₹ 12,34,56,789.00"
        );
    }

    #[test]
    fn full_form_uses_western_grouping_elsewhere() {
        assert_eq!(Money::new(1_234_567_89).format(Currency::Usd), "$1,234,567.89");
        assert_eq!(Money::new(1_050).format(Currency::Eur), "€10.50");
    }

    #[test]
    fn negative_amounts_prefix_minus_after_formatting_abs() {
        assert_eq!(Money::new(-50_000).format(Currency::Inr), "-₹ 500.00");
        assert_eq!(Money::new(-1_050).format(Currency::Usd), "-$10.50");
        assert_eq!(Money::new(-12_500_00).format(Currency::Usd), "-$12.5K");
    }

    #[test]
    fn compact_form_matches_currency_scale() {
        // 1,25,00,000.00 INR is 1.25 crore, rounded to one decimal.
        assert_eq!(
            Money::new(12_500_000_00).format_compact(Currency::Inr),
            "₹ 1.3Cr"
        );
        assert_eq!(Money::new(2_50_000_00).format_compact(Currency::Inr), "₹ 2.5L");
        assert_eq!(Money::new(1_500_00).format_compact(Currency::Inr), "₹ 1.5K");
        assert_eq!(Money::new(12_500_00).format_compact(Currency::Usd), "$12.5K");
        assert_eq!(
            Money::new(3_250_000_00).format_compact(Currency::Usd),
            "$3.3M"
        );
    }

    #[test]
    fn compact_form_below_scale_drops_decimals() {
        assert_eq!(Money::new(950_49).format_compact(Currency::Inr), "₹ 950");
        assert_eq!(Money::new(999_99).format_compact(Currency::Usd), "$1,000");
    }

    #[test]
    fn formatting_is_idempotent() {
        let amount = Money::new(12_500_000_00);
        let first = amount.format_compact(Currency::Inr);
        let second = amount.format_compact(Currency::Inr);
        assert_eq!(first, second);
    }

    #[test]
    fn parse_accepts_dot_or_comma() {
        assert_eq!("10".parse::<Money>().unwrap().minor(), 1000);
        assert_eq!("10.5".parse::<Money>().unwrap().minor(), 1050);
        assert_eq!("10,50".parse::<Money>().unwrap().minor(), 1050);
        assert_eq!("-0.01".parse::<Money>().unwrap().minor(), -1);
        assert_eq!("+1.00".parse::<Money>().unwrap().minor(), 100);
        assert_eq!("  2.30 ".parse::<Money>().unwrap().minor(), 230);
    }

    #[test]
    fn parse_rejects_more_than_two_decimals() {
        assert!("12.345".parse::<Money>().is_err());
        assert!("0.001".parse::<Money>().is_err());
    }
}
