//! Scalar field conversions shared by the result decoders.

use chrono::{DateTime, Utc};

use crate::error::DecodeError;

/// Parse a decimal money string (`"12.34"`, `"-0.5"`, `"7"`) into integer cents.
///
/// Digits past the second decimal place are truncated. No float arithmetic is
/// involved, so `"0.29"` is exactly 29.
pub fn parse_cents(what: &'static str, field: &'static str, value: &str) -> Result<i64, DecodeError> {
    let invalid = || DecodeError::Field {
        what,
        field,
        value: value.to_string(),
    };
    let trimmed = value.trim();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };
    let (whole, frac) = digits.split_once('.').unwrap_or((digits, ""));
    if whole.is_empty() && frac.is_empty() {
        return Err(invalid());
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let whole: i64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| invalid())?
    };
    let mut cents = 0i64;
    for (i, b) in frac.bytes().chain(std::iter::repeat(b'0')).take(2).enumerate() {
        let digit = i64::from(b - b'0');
        cents += if i == 0 { digit * 10 } else { digit };
    }
    let total = whole
        .checked_mul(100)
        .and_then(|w| w.checked_add(cents))
        .ok_or_else(invalid)?;
    Ok(if negative { -total } else { total })
}

/// Upper bound of a positive-feedback range: `"98-100%"` is 100, `"95%"` is 95.
pub fn parse_feedback_rating(value: &str) -> Option<u8> {
    let body = value.trim().strip_suffix('%')?;
    let start = body
        .rfind(|c: char| !c.is_ascii_digit())
        .map_or(0, |i| i + 1);
    body[start..].parse().ok()
}

/// Maximum shipping days from a range like `"0-2 days"` or `"14 or more days"`.
///
/// Takes the first number that is followed by a space and eventually by `days`.
pub fn parse_max_shipping_days(value: &str) -> Option<u32> {
    let bytes = value.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if !bytes[i].is_ascii_digit() {
            i += 1;
            continue;
        }
        let start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if bytes.get(i) == Some(&b' ') && value[i..].contains("days") {
            return value[start..i].parse().ok();
        }
    }
    None
}

/// `"True"`/`"true"` are true; anything else is false.
pub fn parse_bool(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

/// RFC 3339 timestamp, normalized to UTC.
pub fn parse_timestamp(
    what: &'static str,
    field: &'static str,
    value: &str,
) -> Result<DateTime<Utc>, DecodeError> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| DecodeError::Field {
            what,
            field,
            value: value.to_string(),
        })
}

/// Apply `parse_timestamp` to an optional, possibly blank field.
pub fn parse_opt_timestamp(
    what: &'static str,
    field: &'static str,
    value: Option<&str>,
) -> Result<Option<DateTime<Utc>>, DecodeError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => parse_timestamp(what, field, v).map(Some),
        None => Ok(None),
    }
}

/// Trimmed, non-empty text.
pub fn text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cents_without_float_rounding() {
        assert_eq!(parse_cents("t", "f", "12.34").unwrap(), 1234);
        assert_eq!(parse_cents("t", "f", "0.29").unwrap(), 29);
        assert_eq!(parse_cents("t", "f", "0.00").unwrap(), 0);
        assert_eq!(parse_cents("t", "f", "7").unwrap(), 700);
        assert_eq!(parse_cents("t", "f", "7.5").unwrap(), 750);
        assert_eq!(parse_cents("t", "f", "1.999").unwrap(), 199);
        assert_eq!(parse_cents("t", "f", "-3.10").unwrap(), -310);
        assert_eq!(parse_cents("t", "f", " .5 ").unwrap(), 50);
    }

    #[test]
    fn cents_rejects_garbage() {
        for bad in ["", ".", "abc", "1.2.3", "1,00", "$5"] {
            assert!(
                matches!(parse_cents("t", "price", bad), Err(DecodeError::Field { .. })),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn feedback_rating_takes_upper_bound() {
        assert_eq!(parse_feedback_rating("98-100%"), Some(100));
        assert_eq!(parse_feedback_rating("90-94%"), Some(94));
        assert_eq!(parse_feedback_rating("95%"), Some(95));
        assert_eq!(parse_feedback_rating("Just Launched"), None);
        assert_eq!(parse_feedback_rating(""), None);
    }

    #[test]
    fn shipping_days_take_max() {
        assert_eq!(parse_max_shipping_days("0-2 days"), Some(2));
        assert_eq!(parse_max_shipping_days("3-7 days"), Some(7));
        assert_eq!(parse_max_shipping_days("14 or more days"), Some(14));
        assert_eq!(parse_max_shipping_days("unknown"), None);
        assert_eq!(parse_max_shipping_days("2 weeks"), None);
    }

    #[test]
    fn bools_and_timestamps() {
        assert!(parse_bool("True"));
        assert!(parse_bool("true"));
        assert!(!parse_bool("False"));
        assert!(!parse_bool(""));

        let t = parse_timestamp("t", "f", "2009-02-20T02:10:35+00:00").unwrap();
        assert_eq!(t.to_rfc3339(), "2009-02-20T02:10:35+00:00");
        assert!(parse_timestamp("t", "f", "yesterday").is_err());
        assert_eq!(parse_opt_timestamp("t", "f", Some("  ")).unwrap(), None);
    }
}
