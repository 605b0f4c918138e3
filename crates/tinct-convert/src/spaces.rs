//! Conversions between color spaces, routed through an XYZ-D65 hub.
//!
//! Every source space knows how to reach XYZ-D65 and back; converting between
//! any two spaces is at most two hops. ProPhoto and Lab are D50-referenced
//! and go through Bradford adaptation on the way.

use tinct_core::{normalize_hue, Channel, ColorSpace, ColorTuple};

use crate::gamma;
use crate::matrix::{self, multiply};

const LAB_EPSILON: f64 = 216.0 / 24389.0;
const LAB_KAPPA: f64 = 24389.0 / 27.0;
const D50_WHITE: [f64; 3] = [0.9642956764295677, 1.0, 0.8251046025104602];

/// Convert a coordinate triple in the given space to XYZ-D65.
pub fn to_xyz_d65(space: ColorSpace, coords: [f64; 3]) -> [f64; 3] {
    match space {
        ColorSpace::XyzD65 => coords,
        ColorSpace::XyzD50 => multiply(&matrix::XYZ_D50_TO_XYZ_D65, coords),
        ColorSpace::Srgb => multiply(
            &matrix::LINEAR_SRGB_TO_XYZ_D65,
            coords.map(gamma::srgb_to_linear),
        ),
        ColorSpace::LegacyRgb => to_xyz_d65(ColorSpace::Srgb, coords.map(|c| c / 255.0)),
        ColorSpace::SrgbLinear => multiply(&matrix::LINEAR_SRGB_TO_XYZ_D65, coords),
        ColorSpace::DisplayP3 => multiply(
            &matrix::LINEAR_P3_TO_XYZ_D65,
            coords.map(gamma::srgb_to_linear),
        ),
        ColorSpace::A98Rgb => multiply(
            &matrix::LINEAR_A98_TO_XYZ_D65,
            coords.map(gamma::a98_to_linear),
        ),
        ColorSpace::Rec2020 => multiply(
            &matrix::LINEAR_REC2020_TO_XYZ_D65,
            coords.map(gamma::rec2020_to_linear),
        ),
        ColorSpace::ProPhotoRgb => {
            let d50 = multiply(
                &matrix::LINEAR_PROPHOTO_TO_XYZ_D50,
                coords.map(gamma::prophoto_to_linear),
            );
            multiply(&matrix::XYZ_D50_TO_XYZ_D65, d50)
        }
        ColorSpace::Hsl => to_xyz_d65(ColorSpace::Srgb, hsl_to_srgb(coords)),
        ColorSpace::Hwb => to_xyz_d65(ColorSpace::Srgb, hwb_to_srgb(coords)),
        ColorSpace::Lab => {
            multiply(&matrix::XYZ_D50_TO_XYZ_D65, lab_to_xyz_d50(coords))
        }
        ColorSpace::Lch => to_xyz_d65(ColorSpace::Lab, polar_to_rect(coords)),
        ColorSpace::Oklab => oklab_to_xyz_d65(coords),
        ColorSpace::Oklch => oklab_to_xyz_d65(polar_to_rect(coords)),
    }
}

/// Convert an XYZ-D65 triple to coordinates in the given space.
pub fn from_xyz_d65(space: ColorSpace, xyz: [f64; 3]) -> [f64; 3] {
    match space {
        ColorSpace::XyzD65 => xyz,
        ColorSpace::XyzD50 => multiply(&matrix::XYZ_D65_TO_XYZ_D50, xyz),
        ColorSpace::Srgb => {
            multiply(&matrix::XYZ_D65_TO_LINEAR_SRGB, xyz).map(gamma::linear_to_srgb)
        }
        ColorSpace::LegacyRgb => from_xyz_d65(ColorSpace::Srgb, xyz).map(|c| c * 255.0),
        ColorSpace::SrgbLinear => multiply(&matrix::XYZ_D65_TO_LINEAR_SRGB, xyz),
        ColorSpace::DisplayP3 => {
            multiply(&matrix::XYZ_D65_TO_LINEAR_P3, xyz).map(gamma::linear_to_srgb)
        }
        ColorSpace::A98Rgb => {
            multiply(&matrix::XYZ_D65_TO_LINEAR_A98, xyz).map(gamma::linear_to_a98)
        }
        ColorSpace::Rec2020 => {
            multiply(&matrix::XYZ_D65_TO_LINEAR_REC2020, xyz).map(gamma::linear_to_rec2020)
        }
        ColorSpace::ProPhotoRgb => {
            let d50 = multiply(&matrix::XYZ_D65_TO_XYZ_D50, xyz);
            multiply(&matrix::XYZ_D50_TO_LINEAR_PROPHOTO, d50).map(gamma::linear_to_prophoto)
        }
        ColorSpace::Hsl => srgb_to_hsl(from_xyz_d65(ColorSpace::Srgb, xyz)),
        ColorSpace::Hwb => srgb_to_hwb(from_xyz_d65(ColorSpace::Srgb, xyz)),
        ColorSpace::Lab => {
            xyz_d50_to_lab(multiply(&matrix::XYZ_D65_TO_XYZ_D50, xyz))
        }
        ColorSpace::Lch => rect_to_polar(from_xyz_d65(ColorSpace::Lab, xyz)),
        ColorSpace::Oklab => xyz_d65_to_oklab(xyz),
        ColorSpace::Oklch => rect_to_polar(xyz_d65_to_oklab(xyz)),
    }
}

/// Convert a color tuple to the target space.
///
/// Missing (`none`) channels are coerced to 0 for the math; the alpha channel
/// passes through untouched. Converting a tuple to its own space is a clone.
pub fn convert(tuple: &ColorTuple, target: ColorSpace) -> ColorTuple {
    if tuple.space == target {
        return tuple.clone();
    }
    let xyz = to_xyz_d65(tuple.space, tuple.coords());
    let out = from_xyz_d65(target, xyz);
    ColorTuple {
        space: target,
        channels: out.map(Channel::Number),
        alpha: tuple.alpha.clone(),
    }
}

/// Clamp out-of-gamut channels of an RGB-based tuple.
///
/// Plain per-channel clipping, not perceptual gamut mapping; hue can shift
/// for strongly out-of-gamut inputs. Non-RGB spaces are unbounded and pass
/// through unchanged.
pub fn clip_to_gamut(tuple: &ColorTuple) -> ColorTuple {
    let (lo, hi) = match tuple.space {
        ColorSpace::LegacyRgb => (0.0, 255.0),
        s if s.is_rgb_based() => (0.0, 1.0),
        _ => return tuple.clone(),
    };
    let clamp = |c: &Channel| match c {
        Channel::Number(n) => Channel::Number(n.clamp(lo, hi)),
        other => other.clone(),
    };
    ColorTuple {
        space: tuple.space,
        channels: [
            clamp(&tuple.channels[0]),
            clamp(&tuple.channels[1]),
            clamp(&tuple.channels[2]),
        ],
        alpha: tuple.alpha.clone(),
    }
}

/// Rectangular Lab-like coordinates to polar (L, C, H), hue in degrees.
pub fn rect_to_polar([l, a, b]: [f64; 3]) -> [f64; 3] {
    let c = a.hypot(b);
    // an achromatic color has no meaningful hue; pin it to 0
    let h = if c < 1e-7 {
        0.0
    } else {
        normalize_hue(b.atan2(a).to_degrees())
    };
    [l, c, h]
}

/// Polar (L, C, H) coordinates back to rectangular.
pub fn polar_to_rect([l, c, h]: [f64; 3]) -> [f64; 3] {
    let rad = h.to_radians();
    [l, c * rad.cos(), c * rad.sin()]
}

fn hsl_to_srgb([h, s, l]: [f64; 3]) -> [f64; 3] {
    let h = normalize_hue(h);
    let s = (s / 100.0).max(0.0);
    let l = l / 100.0;
    let a = s * l.min(1.0 - l);
    let f = |n: f64| {
        let k = (n + h / 30.0).rem_euclid(12.0);
        l - a * (k - 3.0).min(9.0 - k).clamp(-1.0, 1.0)
    };
    [f(0.0), f(8.0), f(4.0)]
}

fn srgb_to_hsl([r, g, b]: [f64; 3]) -> [f64; 3] {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;
    let d = max - min;
    let mut h = 0.0;
    let mut s = 0.0;
    if d != 0.0 {
        s = if l <= 0.0 || l >= 1.0 {
            0.0
        } else {
            (max - l) / l.min(1.0 - l)
        };
        h = 60.0
            * if max == r {
                (g - b) / d + if g < b { 6.0 } else { 0.0 }
            } else if max == g {
                (b - r) / d + 2.0
            } else {
                (r - g) / d + 4.0
            };
    }
    [normalize_hue(h), s * 100.0, l * 100.0]
}

fn hwb_to_srgb([h, w, bk]: [f64; 3]) -> [f64; 3] {
    let w = w / 100.0;
    let bk = bk / 100.0;
    if w + bk >= 1.0 {
        // fully desaturated: whiteness and blackness split the gray level
        return [w / (w + bk); 3];
    }
    hsl_to_srgb([h, 100.0, 50.0]).map(|c| c * (1.0 - w - bk) + w)
}

fn srgb_to_hwb(rgb: [f64; 3]) -> [f64; 3] {
    let [h, _, _] = srgb_to_hsl(rgb);
    let w = rgb[0].min(rgb[1]).min(rgb[2]);
    let bk = 1.0 - rgb[0].max(rgb[1]).max(rgb[2]);
    [h, w * 100.0, bk * 100.0]
}

fn xyz_d50_to_lab(xyz: [f64; 3]) -> [f64; 3] {
    let f = |t: f64| {
        if t > LAB_EPSILON {
            t.cbrt()
        } else {
            (LAB_KAPPA * t + 16.0) / 116.0
        }
    };
    let fx = f(xyz[0] / D50_WHITE[0]);
    let fy = f(xyz[1] / D50_WHITE[1]);
    let fz = f(xyz[2] / D50_WHITE[2]);
    [116.0 * fy - 16.0, 500.0 * (fx - fy), 200.0 * (fy - fz)]
}

fn lab_to_xyz_d50([l, a, b]: [f64; 3]) -> [f64; 3] {
    let fy = (l + 16.0) / 116.0;
    let fx = a / 500.0 + fy;
    let fz = fy - b / 200.0;
    let x = if fx.powi(3) > LAB_EPSILON {
        fx.powi(3)
    } else {
        (116.0 * fx - 16.0) / LAB_KAPPA
    };
    let y = if l > LAB_KAPPA * LAB_EPSILON {
        fy.powi(3)
    } else {
        l / LAB_KAPPA
    };
    let z = if fz.powi(3) > LAB_EPSILON {
        fz.powi(3)
    } else {
        (116.0 * fz - 16.0) / LAB_KAPPA
    };
    [x * D50_WHITE[0], y * D50_WHITE[1], z * D50_WHITE[2]]
}

fn xyz_d65_to_oklab(xyz: [f64; 3]) -> [f64; 3] {
    let lms = multiply(&matrix::XYZ_D65_TO_LMS, xyz).map(f64::cbrt);
    multiply(&matrix::LMS_TO_OKLAB, lms)
}

fn oklab_to_xyz_d65(lab: [f64; 3]) -> [f64; 3] {
    let lms = multiply(&matrix::OKLAB_TO_LMS, lab).map(|v| v.powi(3));
    multiply(&matrix::LMS_TO_XYZ_D65, lms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn assert_close(a: [f64; 3], b: [f64; 3], tol: f64) {
        for i in 0..3 {
            assert!((a[i] - b[i]).abs() < tol, "{a:?} != {b:?}");
        }
    }

    #[test]
    fn test_lab_green_is_srgb_green() {
        // CSS green in Lab coordinates
        let tuple = ColorTuple::new(ColorSpace::Lab, 46.2775, -47.5621, 48.5837, 1.0);
        let rgb = convert(&tuple, ColorSpace::LegacyRgb);
        assert_close(rgb.coords(), [0.0, 128.0, 0.0], 0.5);
    }

    #[test]
    fn test_hsl_green_round_trip() {
        let tuple = ColorTuple::new(ColorSpace::Hsl, 120.0, 100.0, 25.098, 1.0);
        let rgb = convert(&tuple, ColorSpace::LegacyRgb);
        assert_close(rgb.coords(), [0.0, 128.0, 0.0], 0.01);

        let back = convert(&rgb, ColorSpace::Hsl);
        assert_close(back.coords(), [120.0, 100.0, 25.098], 0.01);
    }

    #[test]
    fn test_rebeccapurple_to_srgb() {
        let tuple = ColorTuple::new(ColorSpace::LegacyRgb, 102.0, 51.0, 153.0, 1.0);
        let srgb = convert(&tuple, ColorSpace::Srgb);
        assert_close(srgb.coords(), [0.4, 0.2, 0.6], 1e-9);
    }

    #[test]
    fn test_white_in_oklab() {
        let white = ColorTuple::new(ColorSpace::Srgb, 1.0, 1.0, 1.0, 1.0);
        let ok = convert(&white, ColorSpace::Oklab);
        let [l, a, b] = ok.coords();
        assert!((l - 1.0).abs() < 1e-3);
        assert!(a.abs() < 1e-3);
        assert!(b.abs() < 1e-3);
    }

    #[test]
    fn test_hwb_gray_collapse() {
        // w + b >= 100% normalizes to a gray
        let tuple = ColorTuple::new(ColorSpace::Hwb, 200.0, 60.0, 60.0, 1.0);
        let srgb = convert(&tuple, ColorSpace::Srgb);
        assert_close(srgb.coords(), [0.5, 0.5, 0.5], 1e-9);
    }

    #[test]
    fn test_polar_achromatic_hue_pinned() {
        let [_, c, h] = rect_to_polar([50.0, 0.0, 0.0]);
        assert_eq!(c, 0.0);
        assert_eq!(h, 0.0);
    }

    #[test]
    fn test_clip_leaves_lab_alone() {
        let tuple = ColorTuple::new(ColorSpace::Lab, 150.0, -200.0, 300.0, 1.0);
        assert_eq!(clip_to_gamut(&tuple), tuple);
    }

    #[test]
    fn test_clip_clamps_srgb() {
        let tuple = ColorTuple::new(ColorSpace::Srgb, 1.2, -0.1, 0.5, 1.0);
        let clipped = clip_to_gamut(&tuple);
        assert_close(clipped.coords(), [1.0, 0.0, 0.5], 1e-12);
    }

    proptest! {
        #[test]
        fn prop_xyz_round_trip_per_space(
            r in 0.05f64..0.95,
            g in 0.05f64..0.95,
            b in 0.05f64..0.95,
        ) {
            for space in [
                ColorSpace::Srgb,
                ColorSpace::SrgbLinear,
                ColorSpace::DisplayP3,
                ColorSpace::Rec2020,
                ColorSpace::A98Rgb,
                ColorSpace::ProPhotoRgb,
            ] {
                let xyz = to_xyz_d65(space, [r, g, b]);
                let back = from_xyz_d65(space, xyz);
                for i in 0..3 {
                    prop_assert!((back[i] - [r, g, b][i]).abs() < 1e-9, "{space}");
                }
            }
        }

        #[test]
        fn prop_lab_round_trip(
            r in 0.0f64..1.0,
            g in 0.0f64..1.0,
            b in 0.0f64..1.0,
        ) {
            let xyz = to_xyz_d65(ColorSpace::Srgb, [r, g, b]);
            for space in [ColorSpace::Lab, ColorSpace::Lch, ColorSpace::Oklab, ColorSpace::Oklch] {
                let coords = from_xyz_d65(space, xyz);
                let back = to_xyz_d65(space, coords);
                for i in 0..3 {
                    prop_assert!((back[i] - xyz[i]).abs() < 1e-9, "{space}");
                }
            }
        }
    }
}
