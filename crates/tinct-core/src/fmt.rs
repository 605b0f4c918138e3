//! CSS numeric serialization.
//!
//! One rounding rule for every serialized channel and calc() result: six
//! significant digits, trailing zeros dropped, `-0` normalized to `0`.

/// Round to the given number of significant digits.
pub fn round_sig(value: f64, digits: i32) -> f64 {
    if value == 0.0 || !value.is_finite() {
        return value;
    }
    let magnitude = value.abs().log10().floor() as i32;
    let factor = 10f64.powi(digits - 1 - magnitude);
    (value * factor).round() / factor
}

/// Serialize a number the way CSS does.
pub fn serialize_number(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let v = round_sig(value, 6);
    if v == 0.0 {
        return "0".to_string();
    }
    if v.fract() == 0.0 && v.abs() < 1e15 {
        return format!("{}", v as i64);
    }
    // Display for f64 is the shortest representation that round-trips,
    // which after significant-digit rounding is already trimmed.
    format!("{v}")
}

/// Serialize a percentage value (the number followed by `%`).
pub fn serialize_percentage(value: f64) -> String {
    format!("{}%", serialize_number(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_sig() {
        assert_eq!(round_sig(0.123456789, 6), 0.123457);
        assert_eq!(round_sig(123456.789, 6), 123457.0);
        assert_eq!(round_sig(-0.000123456789, 6), -0.000123457);
        assert_eq!(round_sig(0.0, 6), 0.0);
    }

    #[test]
    fn test_serialize_trims() {
        assert_eq!(serialize_number(1.0), "1");
        assert_eq!(serialize_number(0.5), "0.5");
        assert_eq!(serialize_number(-0.0), "0");
        assert_eq!(serialize_number(127.5), "127.5");
        assert_eq!(serialize_number(0.40000000001), "0.4");
    }

    #[test]
    fn test_serialize_percentage() {
        assert_eq!(serialize_percentage(60.0), "60%");
        assert_eq!(serialize_percentage(33.333333333), "33.3333%");
    }
}
