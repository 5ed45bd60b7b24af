use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Sub},
    str::FromStr,
};

use thiserror::Error;

/// Signed money amount represented as **integer minor units** (cents).
///
/// Budget slices store plain `i64` values on the wire (`*_minor` fields); the
/// store's selectors hand them out as `MoneyCents` so totals never go through
/// floating point.
///
/// # Examples
///
/// ```rust
/// use engine::MoneyCents;
///
/// assert_eq!(MoneyCents::new(12_34).to_string(), "12.34");
/// assert_eq!("10,5".parse::<MoneyCents>().unwrap().cents(), 1050);
/// assert!("12.345".parse::<MoneyCents>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct MoneyCents(i64);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("empty amount")]
    Empty,
    #[error("invalid amount: {0}")]
    Invalid(String),
    #[error("too many decimals: {0}")]
    TooManyDecimals(String),
    #[error("amount too large: {0}")]
    Overflow(String),
}

impl MoneyCents {
    pub const ZERO: MoneyCents = MoneyCents(0);

    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Share of `total` covered by `self`, clamped to `0..=100`.
    ///
    /// A zero or negative total yields 0 (nothing to make progress on).
    #[must_use]
    pub fn percent_of(self, total: MoneyCents) -> u8 {
        if total.0 <= 0 || self.0 <= 0 {
            return 0;
        }
        let percent = (i128::from(self.0) * 100) / i128::from(total.0);
        percent.clamp(0, 100) as u8
    }
}

impl fmt::Display for MoneyCents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl From<i64> for MoneyCents {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<MoneyCents> for i64 {
    fn from(value: MoneyCents) -> Self {
        value.0
    }
}

impl Add for MoneyCents {
    type Output = MoneyCents;

    fn add(self, rhs: MoneyCents) -> Self::Output {
        MoneyCents(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for MoneyCents {
    fn add_assign(&mut self, rhs: MoneyCents) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Sub for MoneyCents {
    type Output = MoneyCents;

    fn sub(self, rhs: MoneyCents) -> Self::Output {
        MoneyCents(self.0.saturating_sub(rhs.0))
    }
}

impl Sum for MoneyCents {
    fn sum<I: Iterator<Item = MoneyCents>>(iter: I) -> Self {
        iter.fold(MoneyCents::ZERO, Add::add)
    }
}

impl FromStr for MoneyCents {
    type Err = MoneyError;

    /// Parses a decimal string into cents.
    ///
    /// Accepts `.` or `,` as decimal separator and an optional leading `+`/`-`;
    /// at most two fractional digits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || MoneyError::Invalid(s.trim().to_string());

        let trimmed = s.trim();
        let (negative, digits) = match trimmed.as_bytes().first() {
            None => return Err(MoneyError::Empty),
            Some(b'-') => (true, trimmed[1..].trim_start()),
            Some(b'+') => (false, trimmed[1..].trim_start()),
            Some(_) => (false, trimmed),
        };
        if digits.is_empty() {
            return Err(MoneyError::Empty);
        }

        let normalized = digits.replace(',', ".");
        let (units, fraction) = match normalized.split_once('.') {
            Some((units, fraction)) => (units, fraction),
            None => (normalized.as_str(), ""),
        };

        let all_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
        if units.is_empty() || !all_digits(units) || !all_digits(fraction) {
            return Err(invalid());
        }

        let units: i64 = units
            .parse()
            .map_err(|_| MoneyError::Overflow(s.trim().to_string()))?;
        let cents: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| invalid())? * 10,
            2 => fraction.parse::<i64>().map_err(|_| invalid())?,
            _ => return Err(MoneyError::TooManyDecimals(s.trim().to_string())),
        };

        let total = units
            .checked_mul(100)
            .and_then(|v| v.checked_add(cents))
            .ok_or_else(|| MoneyError::Overflow(s.trim().to_string()))?;

        Ok(MoneyCents(if negative { -total } else { total }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_has_two_decimals() {
        assert_eq!(MoneyCents::new(0).to_string(), "0.00");
        assert_eq!(MoneyCents::new(5).to_string(), "0.05");
        assert_eq!(MoneyCents::new(420_000).to_string(), "4200.00");
        assert_eq!(MoneyCents::new(-1050).to_string(), "-10.50");
    }

    #[test]
    fn parse_accepts_dot_comma_and_sign() {
        assert_eq!("10".parse::<MoneyCents>().unwrap().cents(), 1000);
        assert_eq!("10.5".parse::<MoneyCents>().unwrap().cents(), 1050);
        assert_eq!("10,50".parse::<MoneyCents>().unwrap().cents(), 1050);
        assert_eq!("-0.01".parse::<MoneyCents>().unwrap().cents(), -1);
        assert_eq!("+ 1.00".parse::<MoneyCents>().unwrap().cents(), 100);
        assert_eq!("  2.30 ".parse::<MoneyCents>().unwrap().cents(), 230);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!("".parse::<MoneyCents>(), Err(MoneyError::Empty));
        assert_eq!("-".parse::<MoneyCents>(), Err(MoneyError::Empty));
        assert!(matches!(
            "12.345".parse::<MoneyCents>(),
            Err(MoneyError::TooManyDecimals(_))
        ));
        assert!(matches!("1.2.3".parse::<MoneyCents>(), Err(MoneyError::Invalid(_))));
        assert!(matches!(".50".parse::<MoneyCents>(), Err(MoneyError::Invalid(_))));
        assert!(matches!("abc".parse::<MoneyCents>(), Err(MoneyError::Invalid(_))));
    }

    #[test]
    fn percent_is_clamped() {
        let target = MoneyCents::new(10_000);
        assert_eq!(MoneyCents::new(2_500).percent_of(target), 25);
        assert_eq!(MoneyCents::new(20_000).percent_of(target), 100);
        assert_eq!(MoneyCents::new(-5).percent_of(target), 0);
        assert_eq!(MoneyCents::new(100).percent_of(MoneyCents::ZERO), 0);
    }
}
