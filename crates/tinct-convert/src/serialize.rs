//! Serialization of color tuples to CSS strings and hex notation.

use tinct_core::fmt::serialize_number;
use tinct_core::{Channel, ColorSpace, ColorTuple};

use crate::spaces::{clip_to_gamut, convert};

fn channel(c: &Channel) -> String {
    match c {
        Channel::Number(n) => serialize_number(*n),
        Channel::None => "none".to_string(),
        Channel::Unresolved(raw) => raw.clone(),
    }
}

fn channel_pct(c: &Channel) -> String {
    match c {
        Channel::Number(n) => format!("{}%", serialize_number(*n)),
        Channel::None => "none".to_string(),
        Channel::Unresolved(raw) => raw.clone(),
    }
}

/// Alpha suffix for modern (space-separated) notation: empty when fully
/// opaque, ` / a` otherwise. `none` alpha is preserved.
fn alpha_suffix(alpha: &Channel) -> String {
    match alpha {
        Channel::Number(a) if *a >= 1.0 => String::new(),
        Channel::Number(a) => format!(" / {}", serialize_number(*a)),
        Channel::None => " / none".to_string(),
        Channel::Unresolved(raw) => format!(" / {raw}"),
    }
}

/// Serialize a tuple in the canonical notation for its space.
///
/// Legacy RGB uses comma syntax (`rgb()`/`rgba()`); every other space uses
/// the modern space-separated form, with `color()` for the predefined
/// rectangular spaces.
pub fn to_css(tuple: &ColorTuple) -> String {
    match tuple.space {
        ColorSpace::LegacyRgb => {
            let [r, g, b] = tuple.coords().map(|c| c.round().clamp(0.0, 255.0));
            let a = tuple.alpha_value();
            if a >= 1.0 {
                format!(
                    "rgb({}, {}, {})",
                    serialize_number(r),
                    serialize_number(g),
                    serialize_number(b)
                )
            } else {
                format!(
                    "rgba({}, {}, {}, {})",
                    serialize_number(r),
                    serialize_number(g),
                    serialize_number(b),
                    serialize_number(a)
                )
            }
        }
        ColorSpace::Hsl => format!(
            "hsl({} {} {}{})",
            channel(&tuple.channels[0]),
            channel_pct(&tuple.channels[1]),
            channel_pct(&tuple.channels[2]),
            alpha_suffix(&tuple.alpha)
        ),
        ColorSpace::Hwb => format!(
            "hwb({} {} {}{})",
            channel(&tuple.channels[0]),
            channel_pct(&tuple.channels[1]),
            channel_pct(&tuple.channels[2]),
            alpha_suffix(&tuple.alpha)
        ),
        ColorSpace::Lab | ColorSpace::Lch | ColorSpace::Oklab | ColorSpace::Oklch => format!(
            "{}({} {} {}{})",
            tuple.space.as_str(),
            channel(&tuple.channels[0]),
            channel(&tuple.channels[1]),
            channel(&tuple.channels[2]),
            alpha_suffix(&tuple.alpha)
        ),
        _ => format!(
            "color({} {} {} {}{})",
            tuple.space.as_str(),
            channel(&tuple.channels[0]),
            channel(&tuple.channels[1]),
            channel(&tuple.channels[2]),
            alpha_suffix(&tuple.alpha)
        ),
    }
}

/// Serialize as `[c1, c2, c3, alpha]`.
pub fn to_array(tuple: &ColorTuple) -> String {
    let [c1, c2, c3] = tuple.coords();
    format!(
        "[{}, {}, {}, {}]",
        serialize_number(c1),
        serialize_number(c2),
        serialize_number(c3),
        serialize_number(tuple.alpha_value())
    )
}

/// Serialize as a lowercase hex literal, clipping to the sRGB gamut first.
///
/// The alpha byte is appended when `force_alpha` is set or alpha < 1.
pub fn to_hex(tuple: &ColorTuple, force_alpha: bool) -> String {
    let rgb = clip_to_gamut(&convert(tuple, ColorSpace::LegacyRgb));
    let byte = |v: f64| v.round().clamp(0.0, 255.0) as u8;
    let [r, g, b] = rgb.coords();
    let mut out = format!("#{:02x}{:02x}{:02x}", byte(r), byte(g), byte(b));
    let alpha = rgb.alpha_value().clamp(0.0, 1.0);
    if force_alpha || alpha < 1.0 {
        out.push_str(&format!("{:02x}", (alpha * 255.0).round() as u8));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_rgb_notation() {
        let opaque = ColorTuple::new(ColorSpace::LegacyRgb, 0.0, 128.0, 0.0, 1.0);
        assert_eq!(to_css(&opaque), "rgb(0, 128, 0)");

        let translucent = ColorTuple::new(ColorSpace::LegacyRgb, 255.0, 0.0, 0.0, 0.5);
        assert_eq!(to_css(&translucent), "rgba(255, 0, 0, 0.5)");
    }

    #[test]
    fn test_color_fn_notation() {
        let tuple = ColorTuple::new(ColorSpace::Srgb, 0.4, 0.2, 0.6, 1.0);
        assert_eq!(to_css(&tuple), "color(srgb 0.4 0.2 0.6)");
    }

    #[test]
    fn test_none_serializes_as_keyword() {
        let tuple = ColorTuple::with_channels(
            ColorSpace::Oklch,
            [Channel::Number(0.7), Channel::Number(0.1), Channel::None],
            Channel::Number(1.0),
        );
        assert_eq!(to_css(&tuple), "oklch(0.7 0.1 none)");
    }

    #[test]
    fn test_hsl_percent_channels() {
        let tuple = ColorTuple::new(ColorSpace::Hsl, 120.0, 100.0, 25.0, 0.25);
        assert_eq!(to_css(&tuple), "hsl(120 100% 25% / 0.25)");
    }

    #[test]
    fn test_hex_alpha_byte() {
        let tuple = ColorTuple::new(ColorSpace::LegacyRgb, 0.0, 128.0, 0.0, 1.0);
        assert_eq!(to_hex(&tuple, false), "#008000");
        assert_eq!(to_hex(&tuple, true), "#008000ff");

        let translucent = ColorTuple::new(ColorSpace::LegacyRgb, 255.0, 0.0, 0.0, 0.0);
        assert_eq!(to_hex(&translucent, false), "#ff000000");
    }

    #[test]
    fn test_hex_clips_out_of_gamut() {
        let tuple = ColorTuple::new(ColorSpace::Srgb, 1.2, -0.3, 0.5, 1.0);
        assert_eq!(to_hex(&tuple, false), "#ff0080");
    }

    #[test]
    fn test_array_form() {
        let tuple = ColorTuple::new(ColorSpace::Srgb, 0.5, 0.0, 0.5, 1.0);
        assert_eq!(to_array(&tuple), "[0.5, 0, 0.5, 1]");
    }
}
