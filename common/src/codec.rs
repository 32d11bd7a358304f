//! Conversions from application values into the scalar encodings expected
//! by contract call arguments.
//!
//! - Short symbols: uppercase `[A-Z0-9_]` text of at most 9 characters
//! - Wide integers: a 128-bit value split into a signed high half and an
//!   unsigned low half
//! - Timestamps: whole seconds since the Unix epoch
//! - Currency: integer base units, 1/10,000,000 of the display unit
//!
//! Symbol encoding is lossy: distinct inputs such as `"Summer Fest"` and
//! `"summer-fest"` collapse to the same symbol `SUMMER_FE`. Callers that need
//! to tell them apart must do so before encoding.

use crate::{
    config::{BASE_UNITS_PER_COIN, COIN_DECIMALS, MAX_FUNCTION_NAME_LEN},
    serializer::{Reader, ReaderError, Serializer, Writer},
};
use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EncodingError {
    #[error("value {} is negative", _0)]
    NegativeValue(i128),
    #[error("value {} is out of the representable range", _0)]
    OutOfRange(String),
    #[error("timestamp {} is before the Unix epoch", _0)]
    NegativeTimestamp(i64),
    #[error("invalid date: {}", _0)]
    InvalidDate(String),
    #[error("invalid amount: {}", _0)]
    InvalidAmount(String),
    #[error("invalid address: {}", _0)]
    InvalidAddress(String),
    #[error("{} is not a contract identifier", _0)]
    InvalidContractId(String),
    #[error("invalid function name '{}'", _0)]
    InvalidFunctionName(String),
    #[error("too many arguments: {}", _0)]
    TooManyArguments(usize),
    #[error("sequence number {} cannot be incremented", _0)]
    SequenceOverflow(i64),
}

/// Two's complement split of a 128-bit integer:
/// `value == hi * 2^64 + lo`, `lo` being the unsigned low 64 bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Int128Parts {
    pub hi: i64,
    pub lo: u64,
}

impl Serializer for Int128Parts {
    fn write(&self, writer: &mut Writer) {
        writer.write_i64(&self.hi);
        writer.write_u64(&self.lo);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        let hi = reader.read_i64()?;
        let lo = reader.read_u64()?;
        Ok(Self { hi, lo })
    }

    fn size(&self) -> usize {
        16
    }
}

// Uppercase, replace every character outside [A-Z0-9_] by '_' and truncate.
// Never fails.
pub fn encode_symbol(text: &str, max_len: usize) -> String {
    text.chars()
        .flat_map(char::to_uppercase)
        .map(|c| {
            if c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .take(max_len)
        .collect()
}

// Check that a text is already a normalized symbol of at most `max_len` characters
pub fn is_valid_symbol(text: &str, max_len: usize) -> bool {
    text.len() <= max_len
        && text
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

// Split a non-negative amount into its high and low halves
pub fn encode_wide_int(value: i128) -> Result<Int128Parts, EncodingError> {
    if value < 0 {
        return Err(EncodingError::NegativeValue(value));
    }

    Ok(Int128Parts {
        hi: (value >> 64) as i64,
        lo: (value & u64::MAX as i128) as u64,
    })
}

// Same as `encode_wide_int` for an unsigned source value
pub fn encode_wide_uint(value: u128) -> Result<Int128Parts, EncodingError> {
    let value =
        i128::try_from(value).map_err(|_| EncodingError::OutOfRange(value.to_string()))?;
    encode_wide_int(value)
}

pub fn decode_wide_int(parts: Int128Parts) -> i128 {
    ((parts.hi as i128) << 64) | parts.lo as i128
}

// Whole seconds since epoch, floored
pub fn encode_timestamp<Tz: TimeZone>(date: &DateTime<Tz>) -> Result<u64, EncodingError> {
    let seconds = date.timestamp();
    u64::try_from(seconds).map_err(|_| EncodingError::NegativeTimestamp(seconds))
}

// Accepts RFC 3339 ("2025-01-01T00:00:00Z") or a local date-time
// ("2025-01-01T00:00" / "2025-01-01T00:00:00")
pub fn parse_datetime(text: &str) -> Result<DateTime<FixedOffset>, EncodingError> {
    let text = text.trim();
    if let Ok(date) = DateTime::parse_from_rfc3339(text) {
        return Ok(date);
    }

    let naive = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M"))
        .map_err(|e| EncodingError::InvalidDate(format!("{}: {}", text, e)))?;

    Local
        .from_local_datetime(&naive)
        .single()
        .map(|date| date.fixed_offset())
        .ok_or_else(|| EncodingError::InvalidDate(format!("{} is ambiguous in local time", text)))
}

// Convert a display amount to base units.
// Fractions below one base unit are truncated, not rounded.
pub fn to_base_units(display: f64) -> Result<i128, EncodingError> {
    if !display.is_finite() || display < 0.0 {
        return Err(EncodingError::InvalidAmount(display.to_string()));
    }

    let scaled = (display * BASE_UNITS_PER_COIN as f64).floor();
    if scaled >= i128::MAX as f64 {
        return Err(EncodingError::OutOfRange(display.to_string()));
    }

    Ok(scaled as i128)
}

// Render base units as a display amount, e.g. 10_000_000 => "1.0000000"
pub fn format_base_units(value: i128) -> String {
    let sign = if value < 0 { "-" } else { "" };
    let magnitude = value.unsigned_abs();
    let unit = BASE_UNITS_PER_COIN as u128;
    format!(
        "{}{}.{:0width$}",
        sign,
        magnitude / unit,
        magnitude % unit,
        width = COIN_DECIMALS as usize
    )
}

// Contract entry points are symbols of [A-Za-z0-9_]
pub fn validate_function_name(name: &str) -> Result<(), EncodingError> {
    if name.is_empty()
        || name.len() > MAX_FUNCTION_NAME_LEN
        || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(EncodingError::InvalidFunctionName(name.to_owned()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SYMBOL_SHORT_MAX_LEN;
    use chrono::Utc;
    use proptest::prelude::*;

    #[test]
    fn test_encode_symbol() {
        assert_eq!(encode_symbol("Summer Festival", 9), "SUMMER_FE");
        assert_eq!(encode_symbol("jazz", 9), "JAZZ");
        assert_eq!(encode_symbol("", 9), "");
        assert_eq!(encode_symbol("a-b.c", 9), "A_B_C");
        // Lossy: different inputs, same symbol
        assert_eq!(encode_symbol("rock night", 9), encode_symbol("rock-night", 9));
    }

    #[test]
    fn test_encode_symbol_expanding_uppercase_stays_bounded() {
        // 'ß' uppercases to "SS"
        let encoded = encode_symbol("ßßßßßßßßß", 9);
        assert_eq!(encoded, "SSSSSSSSS");
    }

    #[test]
    fn test_wide_int_split() {
        assert_eq!(
            encode_wide_int(10_000_000).unwrap(),
            Int128Parts { hi: 0, lo: 10_000_000 }
        );
        assert_eq!(
            encode_wide_int(1i128 << 64).unwrap(),
            Int128Parts { hi: 1, lo: 0 }
        );
        assert_eq!(
            encode_wide_int(u64::MAX as i128).unwrap(),
            Int128Parts { hi: 0, lo: u64::MAX }
        );
        assert_eq!(
            encode_wide_int(i128::MAX).unwrap(),
            Int128Parts { hi: i64::MAX, lo: u64::MAX }
        );
    }

    #[test]
    fn test_wide_int_rejects_negative_and_oversized() {
        assert_eq!(encode_wide_int(-1), Err(EncodingError::NegativeValue(-1)));
        assert!(matches!(
            encode_wide_uint(u128::MAX),
            Err(EncodingError::OutOfRange(_))
        ));
        assert!(encode_wide_uint(i128::MAX as u128).is_ok());
    }

    #[test]
    fn test_to_base_units() {
        assert_eq!(to_base_units(1.00).unwrap(), 10_000_000);
        assert_eq!(to_base_units(0.01).unwrap(), 100_000);
        assert_eq!(to_base_units(0.001).unwrap(), 10_000);
        // Sub base unit fractions are dropped
        assert_eq!(to_base_units(0.000_000_09).unwrap(), 0);
        assert_eq!(to_base_units(0.0).unwrap(), 0);
    }

    #[test]
    fn test_to_base_units_invalid() {
        assert!(to_base_units(-1.0).is_err());
        assert!(to_base_units(f64::NAN).is_err());
        assert!(to_base_units(f64::INFINITY).is_err());
        assert!(matches!(
            to_base_units(1e40),
            Err(EncodingError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_format_base_units() {
        assert_eq!(format_base_units(10_000_000), "1.0000000");
        assert_eq!(format_base_units(100_000), "0.0100000");
        assert_eq!(format_base_units(-5), "-0.0000005");
    }

    #[test]
    fn test_encode_timestamp() {
        let date = DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z").unwrap();
        assert_eq!(encode_timestamp(&date).unwrap(), 1_735_689_600);

        // Floored, not rounded
        let date = DateTime::parse_from_rfc3339("2025-01-01T00:00:00.999Z").unwrap();
        assert_eq!(encode_timestamp(&date).unwrap(), 1_735_689_600);

        let before_epoch = Utc.with_ymd_and_hms(1969, 12, 31, 23, 59, 59).unwrap();
        assert_eq!(
            encode_timestamp(&before_epoch),
            Err(EncodingError::NegativeTimestamp(-1))
        );
    }

    #[test]
    fn test_parse_datetime() {
        let date = parse_datetime("2025-01-01T00:00:00+00:00").unwrap();
        assert_eq!(date.timestamp(), 1_735_689_600);
        assert!(parse_datetime("2025-06-01T20:30").is_ok());
        assert!(parse_datetime("next friday").is_err());
    }

    #[test]
    fn test_validate_function_name() {
        assert!(validate_function_name("create_event").is_ok());
        assert!(validate_function_name("").is_err());
        assert!(validate_function_name("create event").is_err());
        assert!(validate_function_name(&"a".repeat(MAX_FUNCTION_NAME_LEN + 1)).is_err());
    }

    proptest! {
        #[test]
        fn prop_wide_int_roundtrip(value in 0..=i128::MAX) {
            let parts = encode_wide_int(value).unwrap();
            prop_assert_eq!(decode_wide_int(parts), value);
        }

        #[test]
        fn prop_symbol_is_normalized(text in any::<String>()) {
            let encoded = encode_symbol(&text, SYMBOL_SHORT_MAX_LEN);
            prop_assert!(encoded.chars().count() <= SYMBOL_SHORT_MAX_LEN);
            prop_assert!(is_valid_symbol(&encoded, SYMBOL_SHORT_MAX_LEN));
        }
    }
}
