use std::fmt;

/// Fixed-point monetary amount with 2 decimal places, stored as a count of cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct Amount(i64);

impl Amount {
    const SCALE: i64 = 100;

    pub const ZERO: Amount = Amount(0);

    /// Convert a float to the nearest cent, rounding half-up on the magnitude.
    ///
    /// Saturates for values outside the representable range; use
    /// [`Amount::checked_from_float`] for untrusted input.
    pub fn from_float(value: f64) -> Self {
        // f64::round rounds half away from zero
        Amount((value * Self::SCALE as f64).round() as i64)
    }

    /// Like [`Amount::from_float`], but `None` for NaN, infinities and out-of-range values.
    pub fn checked_from_float(value: f64) -> Option<Self> {
        let cents = (value * Self::SCALE as f64).round();
        // i64::MAX as f64 rounds up to 2^63, which is itself out of range
        if !cents.is_finite() || cents.abs() >= i64::MAX as f64 {
            return None;
        }
        Some(Amount(cents as i64))
    }

    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Amount)
    }

    pub fn from_cents(value: i64) -> Self {
        Amount(value)
    }

    pub fn from_units(value: i64) -> Self {
        Amount(value * Self::SCALE)
    }

    pub fn cents(self) -> i64 {
        self.0
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    pub fn abs(self) -> Self {
        Amount(self.0.abs())
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.abs();
        let whole = abs / Self::SCALE;
        let frac = abs % Self::SCALE;
        write!(f, "{sign}{whole}.{frac:02}")
    }
}

impl std::ops::Add for Amount {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Amount(self.0 + rhs.0)
    }
}

impl std::ops::Sub for Amount {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Amount(self.0 - rhs.0)
    }
}

impl std::ops::AddAssign for Amount {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl std::ops::SubAssign for Amount {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl std::iter::Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, |acc, amount| acc + amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_units_scales_to_cents() {
        assert_eq!(Amount::from_units(10_000), Amount::from_cents(1_000_000));
    }

    #[test]
    fn from_float_converts_correctly() {
        assert_eq!(Amount::from_float(100.0), Amount::from_cents(10_000));
        assert_eq!(Amount::from_float(1.5), Amount::from_cents(150));
        assert_eq!(Amount::from_float(0.01), Amount::from_cents(1));
    }

    #[test]
    fn from_float_rounds_half_up() {
        assert_eq!(Amount::from_float(1.234), Amount::from_cents(123));
        assert_eq!(Amount::from_float(1.236), Amount::from_cents(124));
        assert_eq!(Amount::from_float(0.125), Amount::from_cents(13));
        assert_eq!(Amount::from_float(0.375), Amount::from_cents(38));
    }

    #[test]
    fn from_float_rounds_negative_magnitude_up() {
        assert_eq!(Amount::from_float(-0.125), Amount::from_cents(-13));
        assert_eq!(Amount::from_float(-6000.0), Amount::from_cents(-600_000));
    }

    #[test]
    fn checked_from_float_accepts_finite_values() {
        assert_eq!(Amount::checked_from_float(1.5), Some(Amount::from_cents(150)));
        assert_eq!(
            Amount::checked_from_float(-0.125),
            Some(Amount::from_cents(-13))
        );
    }

    #[test]
    fn checked_from_float_rejects_unrepresentable_values() {
        assert_eq!(Amount::checked_from_float(1e300), None);
        assert_eq!(Amount::checked_from_float(-1e300), None);
        assert_eq!(Amount::checked_from_float(f64::NAN), None);
        assert_eq!(Amount::checked_from_float(f64::INFINITY), None);
        assert_eq!(Amount::checked_from_float(i64::MAX as f64 / 100.0), None);
    }

    #[test]
    fn checked_add_detects_overflow() {
        let max = Amount::from_cents(i64::MAX);
        assert_eq!(max.checked_add(Amount::from_cents(1)), None);
        assert_eq!(
            Amount::from_cents(1).checked_add(Amount::from_cents(2)),
            Some(Amount::from_cents(3))
        );
    }

    #[test]
    fn display_formats_positive() {
        assert_eq!(Amount::from_cents(1_000_000).to_string(), "10000.00");
        assert_eq!(Amount::from_cents(150).to_string(), "1.50");
        assert_eq!(Amount::from_cents(1).to_string(), "0.01");
        assert_eq!(Amount::ZERO.to_string(), "0.00");
    }

    #[test]
    fn display_formats_negative() {
        assert_eq!(Amount::from_cents(-5025).to_string(), "-50.25");
        assert_eq!(Amount::from_cents(-1).to_string(), "-0.01");
    }

    #[test]
    fn abs_and_sign() {
        let negative = Amount::from_cents(-600);
        assert!(negative.is_negative());
        assert_eq!(negative.abs(), Amount::from_cents(600));
        assert!(!Amount::ZERO.is_negative());
    }

    #[test]
    fn arithmetic() {
        let mut a = Amount::from_cents(100);
        a += Amount::from_cents(50);
        assert_eq!(a, Amount::from_cents(150));
        a -= Amount::from_cents(30);
        assert_eq!(a, Amount::from_cents(120));
        assert_eq!(a - Amount::from_cents(20), Amount::from_cents(100));
    }

    #[test]
    fn sum() {
        let total: Amount = [1, 2, 3].into_iter().map(Amount::from_cents).sum();
        assert_eq!(total, Amount::from_cents(6));
    }

    #[test]
    fn ordering() {
        let negative = Amount::from_cents(-100);
        let positive = Amount::from_cents(100);
        assert!(negative < Amount::ZERO);
        assert!(Amount::ZERO < positive);
    }
}
