//! Fixed-point monetary type with euro-style localized formatting.
//!
//! Uses `rust_decimal` internally with scale enforcement so monetary
//! arithmetic never accumulates floating-point error. Backing-store cells
//! hold amounts as localized text (`"1.234,50 €"`); parsing that text is
//! deliberately lenient and degrades to zero instead of failing, so a
//! malformed or placeholder cell never aborts a total computation.

use rust_decimal::Decimal;
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use std::str::FromStr;

/// A monetary value with exactly 2 decimal places.
///
/// # Examples
///
/// ```
/// use cashbox::Money;
///
/// let amount = Money::parse_lenient("1.234,50 €");
/// assert_eq!(amount.format_eur(), "1.234,50 €");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Money(Decimal);

impl Money {
    /// The number of decimal places to maintain.
    pub const SCALE: u32 = 2;

    /// Zero value.
    pub const ZERO: Self = Money(Decimal::ZERO);

    /// Creates a new `Money` from a `Decimal`, normalizing to 2 decimal places.
    pub fn new(value: Decimal) -> Self {
        let mut normalized = value;
        normalized.rescale(Self::SCALE);
        Money(normalized)
    }

    /// Returns `true` if this value is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns `true` if this value is below zero.
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Leniently parses localized monetary text: thousands grouped with
    /// `.`, decimal separator `,`, optional trailing `€`, surrounding
    /// whitespace. Plain integer text passes through as a raw number.
    ///
    /// Any residue that still fails to parse yields [`Money::ZERO`] rather
    /// than an error, so placeholder cells (`"-"`, `"???"`) and stale text
    /// never abort a total computation.
    pub fn parse_lenient(text: &str) -> Self {
        let clean = text.replace('€', "").replace('.', "").replace(',', ".");
        match Decimal::from_str(clean.trim()) {
            Ok(value) => Money::new(value),
            Err(_) => Money::ZERO,
        }
    }

    /// Formats as localized euro text, the exact inverse of
    /// [`Money::parse_lenient`]: `1234.5` becomes `"1.234,50 €"`.
    pub fn format_eur(&self) -> String {
        let unsigned = self.0.abs().to_string();
        let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned.as_str(), "00"));

        let mut grouped: Vec<char> = Vec::with_capacity(int_part.len() + int_part.len() / 3);
        for (i, ch) in int_part.chars().rev().enumerate() {
            if i > 0 && i % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }
        let integer: String = grouped.into_iter().rev().collect();

        let sign = if self.is_negative() { "-" } else { "" };
        format!("{sign}{integer},{frac_part} €")
    }

    /// Multiplies by a unit count: the value of `units` pieces of a
    /// denomination with this face value.
    pub fn times(&self, units: i64) -> Money {
        Money::new(self.0 * Decimal::from(units))
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    /// Strict dot-decimal parse for operator-entered amounts.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let decimal = Decimal::from_str(s.trim())?;
        Ok(Money::new(decimal))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Money::new(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
        self.0.rescale(Self::SCALE);
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Money::new(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
        self.0.rescale(Self::SCALE);
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Money::new(-self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eur(s: &str) -> Money {
        Money::from_str(s).unwrap()
    }

    #[test]
    fn test_from_str_normalizes_scale() {
        assert_eq!(eur("1").to_string(), "1.00");
        assert_eq!(eur("1.5").to_string(), "1.50");
        assert_eq!(eur("  2.5  ").to_string(), "2.50");
    }

    #[test]
    fn test_format_eur_groups_thousands() {
        assert_eq!(eur("0").format_eur(), "0,00 €");
        assert_eq!(eur("7.5").format_eur(), "7,50 €");
        assert_eq!(eur("1234.5").format_eur(), "1.234,50 €");
        assert_eq!(eur("1234567.89").format_eur(), "1.234.567,89 €");
        assert_eq!(eur("-1000.5").format_eur(), "-1.000,50 €");
    }

    #[test]
    fn test_parse_lenient_reads_localized_text() {
        assert_eq!(Money::parse_lenient("1.000,50 €"), eur("1000.50"));
        assert_eq!(Money::parse_lenient("  0,50 €  "), eur("0.50"));
        assert_eq!(Money::parse_lenient("-32,50 €"), eur("-32.50"));
        assert_eq!(Money::parse_lenient("20"), eur("20"));
    }

    #[test]
    fn test_parse_lenient_degrades_to_zero() {
        assert_eq!(Money::parse_lenient(""), Money::ZERO);
        assert_eq!(Money::parse_lenient("-"), Money::ZERO);
        assert_eq!(Money::parse_lenient("???"), Money::ZERO);
        assert_eq!(Money::parse_lenient("n/a €"), Money::ZERO);
    }

    #[test]
    fn test_round_trip_to_two_decimals() {
        for text in ["0", "0.50", "17.50", "-12.50", "350", "1234.56", "-9876543.21"] {
            let amount = eur(text);
            assert_eq!(Money::parse_lenient(&amount.format_eur()), amount);
        }
    }

    #[test]
    fn test_arithmetic_preserves_scale() {
        let a = eur("1.5");
        let b = eur("2.5");

        assert_eq!((a + b).to_string(), "4.00");
        assert_eq!((b - a).to_string(), "1.00");
        assert_eq!((-a).to_string(), "-1.50");

        let mut acc = Money::ZERO;
        acc += eur("50");
        acc -= eur("32.50");
        assert_eq!(acc.to_string(), "17.50");
    }

    #[test]
    fn test_times_unit_counts() {
        assert_eq!(eur("50").times(2), eur("100"));
        assert_eq!(eur("0.50").times(3), eur("1.50"));
        assert_eq!(eur("20").times(-1), eur("-20"));
        assert_eq!(eur("5").times(0), Money::ZERO);
    }

    #[test]
    fn test_negative_detection() {
        assert!(eur("-0.01").is_negative());
        assert!(!eur("0").is_negative());
        assert!(!eur("0.01").is_negative());
    }
}
