//! Transfer functions (gamma encoding and decoding) per color space.
//!
//! All functions use the extended form: negative inputs are handled by
//! reflecting the curve through the origin, per the CSS Color 4 reference
//! conversions.

/// sRGB electro-optical transfer: gamma-encoded -> linear.
/// Display P3 shares this curve.
pub fn srgb_to_linear(c: f64) -> f64 {
    let abs = c.abs();
    if abs <= 0.04045 {
        c / 12.92
    } else {
        ((abs + 0.055) / 1.055).powf(2.4).copysign(c)
    }
}

/// sRGB opto-electronic transfer: linear -> gamma-encoded.
pub fn linear_to_srgb(c: f64) -> f64 {
    let abs = c.abs();
    if abs <= 0.0031308 {
        c * 12.92
    } else {
        (1.055 * abs.powf(1.0 / 2.4) - 0.055).copysign(c)
    }
}

/// Adobe RGB (1998) uses a pure 563/256 power curve.
pub fn a98_to_linear(c: f64) -> f64 {
    c.abs().powf(563.0 / 256.0).copysign(c)
}

pub fn linear_to_a98(c: f64) -> f64 {
    c.abs().powf(256.0 / 563.0).copysign(c)
}

/// ProPhoto: gamma 1.8 with a small linear toe.
pub fn prophoto_to_linear(c: f64) -> f64 {
    const ET2: f64 = 16.0 / 512.0;
    if c.abs() <= ET2 {
        c / 16.0
    } else {
        c.abs().powf(1.8).copysign(c)
    }
}

pub fn linear_to_prophoto(c: f64) -> f64 {
    const ET: f64 = 1.0 / 512.0;
    if c.abs() >= ET {
        c.abs().powf(1.0 / 1.8).copysign(c)
    } else {
        16.0 * c
    }
}

/// ITU-R BT.2020-2, 4.5-slope linear segment.
pub fn rec2020_to_linear(c: f64) -> f64 {
    const A: f64 = 1.09929682680944;
    const B: f64 = 0.018053968510807;
    let abs = c.abs();
    if abs < B * 4.5 {
        c / 4.5
    } else {
        ((abs + A - 1.0) / A).powf(1.0 / 0.45).copysign(c)
    }
}

pub fn linear_to_rec2020(c: f64) -> f64 {
    const A: f64 = 1.09929682680944;
    const B: f64 = 0.018053968510807;
    let abs = c.abs();
    if abs > B {
        (A * abs.powf(0.45) - (A - 1.0)).copysign(c)
    } else {
        4.5 * c
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_srgb_known_points() {
        assert_eq!(srgb_to_linear(0.0), 0.0);
        assert!((srgb_to_linear(1.0) - 1.0).abs() < 1e-12);
        // 0x80 / 255 decodes to ~0.2158 linear
        assert!((srgb_to_linear(128.0 / 255.0) - 0.2158).abs() < 1e-3);
    }

    #[test]
    fn test_negative_reflection() {
        assert_eq!(srgb_to_linear(-0.5), -srgb_to_linear(0.5));
        assert_eq!(linear_to_rec2020(-0.5), -linear_to_rec2020(0.5));
        assert_eq!(a98_to_linear(-0.5), -a98_to_linear(0.5));
    }

    proptest! {
        #[test]
        fn prop_transfer_round_trips(c in -1.5f64..1.5) {
            prop_assert!((linear_to_srgb(srgb_to_linear(c)) - c).abs() < 1e-9);
            prop_assert!((linear_to_a98(a98_to_linear(c)) - c).abs() < 1e-9);
            prop_assert!((linear_to_prophoto(prophoto_to_linear(c)) - c).abs() < 1e-9);
            prop_assert!((linear_to_rec2020(rec2020_to_linear(c)) - c).abs() < 1e-9);
        }
    }
}
