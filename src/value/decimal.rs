use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;

/// Arbitrary-precision decimal with the special values a decimal context can
/// produce. Only finite values and infinities have a canonical string form
/// that the dumpers accept; `NaN` is rejected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DecimalValue {
    Finite(Decimal),
    Infinite { negative: bool },
    NaN,
}

impl DecimalValue {
    pub fn is_nan(&self) -> bool {
        matches!(self, DecimalValue::NaN)
    }

    pub fn is_finite(&self) -> bool {
        matches!(self, DecimalValue::Finite(_))
    }
}

impl From<Decimal> for DecimalValue {
    fn from(d: Decimal) -> Self {
        DecimalValue::Finite(d)
    }
}

impl FromStr for DecimalValue {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (negative, body) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };
        let lower = body.to_ascii_lowercase();
        match lower.as_str() {
            "nan" | "snan" => return Ok(DecimalValue::NaN),
            "inf" | "infinity" => return Ok(DecimalValue::Infinite { negative }),
            _ => {}
        }
        let d = match lower.split_once('e') {
            Some((mantissa, exponent)) => {
                let exponent = exponent
                    .parse::<i32>()
                    .map_err(|_| rust_decimal::Error::from("invalid exponent"))?;
                let digits = shift_point(mantissa, exponent)?;
                let sign = if negative { "-" } else { "" };
                Decimal::from_str_exact(&format!("{sign}{digits}"))?
            }
            None => Decimal::from_str_exact(s)?,
        };
        Ok(DecimalValue::Finite(d))
    }
}

/// Rewrites `mantissa × 10^exponent` positionally, keeping every mantissa
/// digit so that an exact parse can reject what does not fit.
fn shift_point(mantissa: &str, exponent: i32) -> Result<String, rust_decimal::Error> {
    // wider than any representable Decimal
    const MAX_SHIFT: i32 = 64;
    if exponent > MAX_SHIFT {
        return Err(rust_decimal::Error::ExceedsMaximumPossibleValue);
    }
    if exponent < -MAX_SHIFT {
        return Err(rust_decimal::Error::Underflow);
    }
    let (int, frac) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let digits = format!("{int}{frac}");
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(rust_decimal::Error::from("invalid mantissa"));
    }
    let point = int.len() as i32 + exponent;
    Ok(if point <= 0 {
        format!("0.{}{digits}", "0".repeat(point.unsigned_abs() as usize))
    } else if point as usize >= digits.len() {
        format!("{digits}{}", "0".repeat(point as usize - digits.len()))
    } else {
        let (head, tail) = digits.split_at(point as usize);
        format!("{head}.{tail}")
    })
}

impl fmt::Display for DecimalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecimalValue::Finite(d) => fmt::Display::fmt(d, f),
            DecimalValue::Infinite { negative: false } => f.write_str("Infinity"),
            DecimalValue::Infinite { negative: true } => f.write_str("-Infinity"),
            DecimalValue::NaN => f.write_str("NaN"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn special_values_parse() {
        assert!("NaN".parse::<DecimalValue>().unwrap().is_nan());
        assert!("-sNaN".parse::<DecimalValue>().unwrap().is_nan());
        assert_eq!(
            "-Infinity".parse::<DecimalValue>().unwrap(),
            DecimalValue::Infinite { negative: true }
        );
        assert_eq!("inf".parse::<DecimalValue>().unwrap().to_string(), "Infinity");
    }

    #[test]
    fn finite_values_keep_their_digits() {
        assert_eq!("3.14".parse::<DecimalValue>().unwrap().to_string(), "3.14");
        assert_eq!("42.0000".parse::<DecimalValue>().unwrap().to_string(), "42.0000");
        assert_eq!("-0.5".parse::<DecimalValue>().unwrap().to_string(), "-0.5");
        assert_eq!(
            "1.5e2".parse::<DecimalValue>().unwrap(),
            DecimalValue::Finite(Decimal::from(150))
        );
    }

    #[test]
    fn scientific_values_keep_mantissa_digits() {
        assert_eq!("1.50e1".parse::<DecimalValue>().unwrap().to_string(), "15.0");
        assert_eq!("-25E-3".parse::<DecimalValue>().unwrap().to_string(), "-0.025");
        assert_eq!("1E+2".parse::<DecimalValue>().unwrap().to_string(), "100");
    }

    #[test]
    fn digits_beyond_precision_are_rejected() {
        assert!("0.12345678901234567890123456789012".parse::<DecimalValue>().is_err());
        assert!("1.0000000000000000000000000000001".parse::<DecimalValue>().is_err());
        assert!("1.2345678901234567890123456789012e-3".parse::<DecimalValue>().is_err());
        assert!("1e300".parse::<DecimalValue>().is_err());
        assert!("1e-300".parse::<DecimalValue>().is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!("1.5e".parse::<DecimalValue>().is_err());
        assert!("e5".parse::<DecimalValue>().is_err());
        assert!("twelve".parse::<DecimalValue>().is_err());
    }
}
