//! Form parameter defaults, numeric coercion, and the service base origin.
//!
//! Steps and scale are held as raw text and only turned into numbers when a
//! request is built. The coercion mirrors a browser's `Number(text)`, so text
//! that is not a number becomes NaN and is forwarded rather than rejected.

/// Default text of the steps field.
pub const DEFAULT_STEPS: &str = "50";

/// Default text of the scale field.
pub const DEFAULT_SCALE: &str = "7.5";

/// Default scheme, host and port of the image service.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Path of the generation endpoint, relative to the base origin.
pub const GENERATE_PATH: &str = "/generate";

/// Largest integer a double holds exactly (`2^53 - 1`).
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Coerce raw field text to a number.
///
/// Whitespace around the value is ignored and empty text is `0`. Decimal and
/// exponent literals, `Infinity` with an optional sign, and unsigned
/// `0x`/`0o`/`0b` integers are accepted. Everything else is NaN.
#[must_use]
pub fn coerce_number(raw: &str) -> f64 {
    let text = raw.trim();
    if text.is_empty() {
        return 0.0;
    }

    match text {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    if let Some(value) = parse_prefixed_integer(text) {
        return value;
    }

    // Rust's float parser also takes "inf", "nan" and "infinity"; those are
    // not numbers here, so only digits, signs, dots and exponents get through.
    let decimal_chars =
        text.bytes().all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'));
    if decimal_chars {
        text.parse::<f64>().unwrap_or(f64::NAN)
    } else {
        f64::NAN
    }
}

/// Parse `0x`, `0o` and `0b` literals. Returns `None` when `text` has no such
/// prefix, and NaN when the prefix is followed by invalid or missing digits.
fn parse_prefixed_integer(text: &str) -> Option<f64> {
    let radix = match text.get(..2)? {
        "0x" | "0X" => 16,
        "0o" | "0O" => 8,
        "0b" | "0B" => 2,
        _ => return None,
    };
    let digits = &text[2..];
    if digits.is_empty() {
        return Some(f64::NAN);
    }
    let value = digits.chars().try_fold(0.0_f64, |acc, ch| {
        ch.to_digit(radix).map(|d| acc * f64::from(radix) + f64::from(d))
    });
    Some(value.unwrap_or(f64::NAN))
}

/// Format a coerced number the way it reads back in a form field.
///
/// Integral values drop the fraction (`50`), non-finite values read `NaN`,
/// `Infinity` or `-Infinity`.
#[must_use]
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        let sign = if value > 0.0 { "" } else { "-" };
        format!("{sign}Infinity")
    } else if value == 0.0 {
        "0".to_string()
    } else {
        format!("{value}")
    }
}

/// Scheme, host and port of the image service.
///
/// Image locations returned by the service are relative to this origin and
/// are joined by plain concatenation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseOrigin(String);

impl BaseOrigin {
    /// Create an origin, trimming trailing slashes.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is empty or not `http`/`https`.
    pub fn parse(url: &str) -> Result<Self, String> {
        let trimmed = url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err("Base URL must not be empty".to_string());
        }
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(format!("Unsupported base URL '{url}'. Expected http:// or https://"));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Concatenate a service-relative path onto the origin.
    #[must_use]
    pub fn join(&self, path: &str) -> String {
        format!("{}{path}", self.0)
    }

    /// The origin as a string, without trailing slash.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for BaseOrigin {
    fn default() -> Self {
        Self(DEFAULT_BASE_URL.to_string())
    }
}

/// Serde helper writing coerced numbers as JSON does in a browser.
///
/// Integral values become JSON integers, NaN and infinities become `null`.
/// On the way back `null` reads as NaN.
pub mod js_number {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::MAX_SAFE_INTEGER;

    /// Serialize a coerced number.
    #[allow(clippy::trivially_copy_pass_by_ref)] // signature required by `serde(with)`
    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if !value.is_finite() {
            return serializer.serialize_none();
        }
        if value.fract() == 0.0 && value.abs() <= MAX_SAFE_INTEGER {
            #[allow(clippy::cast_possible_truncation)] // integral and within i64 range
            return serializer.serialize_i64(*value as i64);
        }
        serializer.serialize_f64(*value)
    }

    /// Deserialize a number, mapping `null` to NaN.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerce_plain_numbers() {
        assert!((coerce_number("50") - 50.0).abs() < f64::EPSILON);
        assert!((coerce_number("7.5") - 7.5).abs() < f64::EPSILON);
        assert!((coerce_number("-3") + 3.0).abs() < f64::EPSILON);
        assert!((coerce_number(".5") - 0.5).abs() < f64::EPSILON);
        assert!((coerce_number("5.") - 5.0).abs() < f64::EPSILON);
        assert!((coerce_number("1e3") - 1000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn coerce_ignores_surrounding_whitespace() {
        assert!((coerce_number("  25 \n") - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn coerce_empty_is_zero() {
        assert!(coerce_number("").abs() < f64::EPSILON);
        assert!(coerce_number("   ").abs() < f64::EPSILON);
    }

    #[test]
    fn coerce_non_numeric_is_nan() {
        assert!(coerce_number("abc").is_nan());
        assert!(coerce_number("12abc").is_nan());
        assert!(coerce_number("1,5").is_nan());
        assert!(coerce_number("1e").is_nan());
        assert!(coerce_number(".").is_nan());
        assert!(coerce_number("1_000").is_nan());
    }

    #[test]
    fn coerce_rejects_rust_only_spellings() {
        assert!(coerce_number("inf").is_nan());
        assert!(coerce_number("infinity").is_nan());
        assert!(coerce_number("nan").is_nan());
        assert!(coerce_number("NaN").is_nan());
    }

    #[test]
    fn coerce_infinity() {
        assert_eq!(coerce_number("Infinity"), f64::INFINITY);
        assert_eq!(coerce_number("+Infinity"), f64::INFINITY);
        assert_eq!(coerce_number("-Infinity"), f64::NEG_INFINITY);
    }

    #[test]
    fn coerce_prefixed_integers() {
        assert!((coerce_number("0x10") - 16.0).abs() < f64::EPSILON);
        assert!((coerce_number("0o17") - 15.0).abs() < f64::EPSILON);
        assert!((coerce_number("0b101") - 5.0).abs() < f64::EPSILON);
        assert!(coerce_number("0x").is_nan());
        assert!(coerce_number("0xZZ").is_nan());
        assert!(coerce_number("-0x10").is_nan());
    }

    #[test]
    fn format_numbers() {
        assert_eq!(format_number(50.0), "50");
        assert_eq!(format_number(7.5), "7.5");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(f64::NAN), "NaN");
        assert_eq!(format_number(f64::INFINITY), "Infinity");
        assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn origin_joins_by_concatenation() {
        let origin = BaseOrigin::parse("http://localhost:8000").unwrap();
        assert_eq!(origin.join("/static/out.png"), "http://localhost:8000/static/out.png");
    }

    #[test]
    fn origin_trims_trailing_slashes() {
        let origin = BaseOrigin::parse("http://localhost:8000//").unwrap();
        assert_eq!(origin.as_str(), "http://localhost:8000");
    }

    #[test]
    fn origin_rejects_bad_urls() {
        assert!(BaseOrigin::parse("").is_err());
        assert!(BaseOrigin::parse("localhost:8000").is_err());
        assert!(BaseOrigin::parse("ftp://host").is_err());
    }

    #[test]
    fn default_origin() {
        assert_eq!(BaseOrigin::default().as_str(), DEFAULT_BASE_URL);
    }

    #[derive(serde::Serialize, serde::Deserialize)]
    struct Wrapper {
        #[serde(with = "js_number")]
        n: f64,
    }

    #[test]
    fn js_number_writes_integers_without_fraction() {
        let json = serde_json::to_string(&Wrapper { n: 50.0 }).unwrap();
        assert_eq!(json, r#"{"n":50}"#);
    }

    #[test]
    fn js_number_keeps_fractions() {
        let json = serde_json::to_string(&Wrapper { n: 7.5 }).unwrap();
        assert_eq!(json, r#"{"n":7.5}"#);
    }

    #[test]
    fn js_number_writes_non_finite_as_null() {
        assert_eq!(serde_json::to_string(&Wrapper { n: f64::NAN }).unwrap(), r#"{"n":null}"#);
        assert_eq!(serde_json::to_string(&Wrapper { n: f64::INFINITY }).unwrap(), r#"{"n":null}"#);
    }

    #[test]
    fn js_number_reads_null_as_nan() {
        let w: Wrapper = serde_json::from_str(r#"{"n":null}"#).unwrap();
        assert!(w.n.is_nan());
    }
}
