//! Fixed-width field extraction for the ASCII portions of an EDF file.
//!
//! EDF headers are space-padded ASCII columns. Real-world producers pad
//! sloppily or leave numeric columns blank, so the numeric helpers never
//! fail: an unparsable integer is `None` and an unparsable float is NaN.
//! Callers that cannot proceed without the value decide what to do.

/// Decodes a fixed-width field as text, dropping the space padding.
pub fn string_field(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).trim().to_string()
}

/// Decodes a fixed-width integer field. `None` marks an unparsable field.
pub fn int_field(bytes: &[u8]) -> Option<i64> {
    parse_int(&String::from_utf8_lossy(bytes))
}

/// Decodes a fixed-width float field. NaN marks an unparsable field.
pub fn float_field(bytes: &[u8]) -> f64 {
    parse_float(&String::from_utf8_lossy(bytes))
}

pub fn parse_int(s: &str) -> Option<i64> {
    s.trim().parse().ok()
}

pub fn parse_float(s: &str) -> f64 {
    s.trim().parse().unwrap_or(f64::NAN)
}
