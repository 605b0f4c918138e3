//! color-mix() interpolation.
//!
//! `color-mix(in <space> [<arc> hue]?, <color> [<pct>]?, <color> [<pct>]?)`.
//! Percentages normalize per CSS Color 5: a single percentage implies its
//! complement, a sum over 100 scales down, a sum under 100 becomes an alpha
//! multiplier. Rectangular channels interpolate premultiplied by alpha; hue
//! channels interpolate on the arc selected by the hue method.

use tinct_cache::memoized;
use tinct_core::{
    normalize_hue, Channel, ColorError, ColorSpace, ColorTuple, ResolveOptions, Token, TokenKind,
};
use tinct_parser::tokenize;

use crate::resolve::resolve_to_tuple;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum HueArc {
    #[default]
    Shorter,
    Longer,
    Increasing,
    Decreasing,
}

impl HueArc {
    fn from_ident(ident: &str) -> Option<Self> {
        match ident.to_ascii_lowercase().as_str() {
            "shorter" => Some(HueArc::Shorter),
            "longer" => Some(HueArc::Longer),
            "increasing" => Some(HueArc::Increasing),
            "decreasing" => Some(HueArc::Decreasing),
            _ => None,
        }
    }

    /// Adjust a pair of normalized hues so a plain lerp travels this arc.
    fn adjust(self, a: f64, b: f64) -> (f64, f64) {
        let delta = b - a;
        match self {
            HueArc::Shorter => {
                if delta > 180.0 {
                    (a + 360.0, b)
                } else if delta < -180.0 {
                    (a, b + 360.0)
                } else {
                    (a, b)
                }
            }
            HueArc::Longer => {
                if 0.0 < delta && delta < 180.0 {
                    (a + 360.0, b)
                } else if -180.0 < delta && delta <= 0.0 {
                    (a, b + 360.0)
                } else {
                    (a, b)
                }
            }
            HueArc::Increasing => {
                if b < a {
                    (a, b + 360.0)
                } else {
                    (a, b)
                }
            }
            HueArc::Decreasing => {
                if a < b {
                    (a + 360.0, b)
                } else {
                    (a, b)
                }
            }
        }
    }
}

/// Color spaces usable after `in`: the polar/lab notations plus every
/// predefined color() space.
fn interpolation_space(ident: &str) -> Option<ColorSpace> {
    match ident.to_ascii_lowercase().as_str() {
        "hsl" => Some(ColorSpace::Hsl),
        "hwb" => Some(ColorSpace::Hwb),
        "lab" => Some(ColorSpace::Lab),
        "lch" => Some(ColorSpace::Lch),
        "oklab" => Some(ColorSpace::Oklab),
        "oklch" => Some(ColorSpace::Oklch),
        other => ColorSpace::from_color_fn_ident(other),
    }
}

/// Resolve a color-mix() expression to a serialized color in the
/// interpolation space.
pub fn resolve_color_mix(
    input: &str,
    opts: &ResolveOptions,
) -> Result<Option<String>, ColorError> {
    let trimmed = input.trim();
    let key = format!("color-mix|{}|{}", trimmed, opts.cache_key_fragment());
    memoized(key, || {
        let Some(tuple) = resolve_mix(trimmed, opts)? else {
            return Ok(None);
        };
        Ok(Some(tinct_convert::to_css(&tuple)))
    })
}

pub(crate) fn resolve_mix(
    input: &str,
    opts: &ResolveOptions,
) -> Result<Option<ColorTuple>, ColorError> {
    let tokens = tokenize(input);

    let Some(head) = tokens.first().filter(|t| t.kind == TokenKind::Function) else {
        return Ok(None);
    };
    if !head
        .function_name()
        .is_some_and(|n| n.eq_ignore_ascii_case("color-mix"))
    {
        return Ok(None);
    }

    // Split the body into top-level comma-separated arguments.
    let mut args: Vec<(usize, usize)> = Vec::new();
    let mut arg_start = 1usize;
    let mut depth = 0usize;
    let mut closed = false;
    for (index, token) in tokens.iter().enumerate().skip(1) {
        match token.kind {
            TokenKind::Eof => break,
            TokenKind::Function | TokenKind::OpenParen => depth += 1,
            TokenKind::CloseParen => {
                if depth == 0 {
                    args.push((arg_start, index));
                    closed = true;
                    break;
                }
                depth -= 1;
            }
            TokenKind::Comma if depth == 0 => {
                args.push((arg_start, index));
                arg_start = index + 1;
            }
            _ => {}
        }
    }
    if !closed || args.len() != 3 {
        return Err(ColorError::syntax(input));
    }

    let (space, arc) = parse_in_clause(&tokens[args[0].0..args[0].1], input)?;
    let first = parse_mix_arg(&tokens[args[1].0..args[1].1], input, opts)?;
    let second = parse_mix_arg(&tokens[args[2].0..args[2].1], input, opts)?;
    let (Some((color_a, pct_a)), Some((color_b, pct_b))) = (first, second) else {
        return Ok(None);
    };

    let (w1, w2, alpha_mult) = normalize_percentages(pct_a, pct_b, input)?;

    let a = tinct_convert::convert(&color_a, space);
    let b = tinct_convert::convert(&color_b, space);

    Ok(Some(interpolate(&a, &b, space, arc, w1, w2, alpha_mult)))
}

/// Parse `in <space> [<arc> hue]?`.
fn parse_in_clause(tokens: &[Token], input: &str) -> Result<(ColorSpace, HueArc), ColorError> {
    let idents: Vec<&Token> = tokens
        .iter()
        .filter(|t| !t.is_trivia() && t.kind != TokenKind::Eof)
        .collect();

    let err = || ColorError::syntax(input);
    match idents.as_slice() {
        [kw, space] if kw.raw_eq_ignore_case("in") => {
            let space = interpolation_space(&space.raw).ok_or_else(err)?;
            Ok((space, HueArc::Shorter))
        }
        [kw, space, arc, hue]
            if kw.raw_eq_ignore_case("in") && hue.raw_eq_ignore_case("hue") =>
        {
            let space = interpolation_space(&space.raw).ok_or_else(err)?;
            let arc = HueArc::from_ident(&arc.raw).ok_or_else(err)?;
            // a hue method only makes sense for polar spaces
            if !space.is_polar() {
                return Err(err());
            }
            Ok((space, arc))
        }
        _ => Err(err()),
    }
}

type MixArg = Option<(ColorTuple, Option<f64>)>;

/// Parse `<color> <pct>?` or `<pct>? <color>`.
fn parse_mix_arg(
    tokens: &[Token],
    input: &str,
    opts: &ResolveOptions,
) -> Result<MixArg, ColorError> {
    let significant: Vec<&Token> = tokens
        .iter()
        .filter(|t| !t.is_trivia() && t.kind != TokenKind::Eof)
        .collect();
    if significant.is_empty() {
        return Err(ColorError::syntax(input));
    }

    let mut percentage: Option<f64> = None;
    let mut color_tokens = significant.as_slice();
    if let [first, rest @ ..] = color_tokens {
        if first.kind == TokenKind::Percentage {
            percentage = first.number_value();
            color_tokens = rest;
        }
    }
    if percentage.is_none() {
        if let [rest @ .., last] = color_tokens {
            if last.kind == TokenKind::Percentage {
                percentage = last.number_value();
                color_tokens = rest;
            }
        }
    }
    if color_tokens.is_empty() {
        return Err(ColorError::syntax(input));
    }
    if let Some(p) = percentage {
        if !(0.0..=100.0).contains(&p) {
            return Err(ColorError::range("color-mix percentage", format!("{p}%")));
        }
    }

    let start = color_tokens.first().map(|t| t.start).unwrap_or(0);
    let end = color_tokens.last().map(|t| t.end).unwrap_or(0);
    let color_text = &input[start..end];
    Ok(resolve_to_tuple(color_text, opts)?.map(|tuple| (tuple, percentage)))
}

/// Weights and the alpha multiplier from the two optional percentages.
fn normalize_percentages(
    p1: Option<f64>,
    p2: Option<f64>,
    input: &str,
) -> Result<(f64, f64, f64), ColorError> {
    let (p1, p2) = match (p1, p2) {
        (None, None) => (50.0, 50.0),
        (Some(p), None) => (p, 100.0 - p),
        (None, Some(p)) => (100.0 - p, p),
        (Some(p1), Some(p2)) => (p1, p2),
    };
    let sum = p1 + p2;
    if sum == 0.0 {
        return Err(ColorError::range("color-mix percentage sum", "0%"));
    }
    Ok((p1 / sum, p2 / sum, (sum / 100.0).min(1.0)))
}

fn interpolate(
    a: &ColorTuple,
    b: &ColorTuple,
    space: ColorSpace,
    arc: HueArc,
    w1: f64,
    w2: f64,
    alpha_mult: f64,
) -> ColorTuple {
    // A missing alpha takes the other endpoint's value before premultiplying.
    let (alpha_a, alpha_b) = match (a.alpha.value(), b.alpha.value()) {
        (Some(x), Some(y)) => (x.clamp(0.0, 1.0), y.clamp(0.0, 1.0)),
        (Some(x), None) | (None, Some(x)) => {
            let x = x.clamp(0.0, 1.0);
            (x, x)
        }
        (None, None) => (1.0, 1.0),
    };
    let alpha_out = w1 * alpha_a + w2 * alpha_b;
    let hue_index = space.hue_index();

    let mut channels: [Channel; 3] = [Channel::None, Channel::None, Channel::None];
    for i in 0..3 {
        channels[i] = match (&a.channels[i], &b.channels[i]) {
            (Channel::None, Channel::None) => Channel::None,
            // a missing channel takes the other side's value
            (Channel::None, other) | (other, Channel::None) => other.clone(),
            (ca, cb) => {
                let (va, vb) = (ca.to_number(), cb.to_number());
                if hue_index == Some(i) {
                    let (ha, hb) = arc.adjust(normalize_hue(va), normalize_hue(vb));
                    Channel::Number(normalize_hue(w1 * ha + w2 * hb))
                } else if alpha_out == 0.0 {
                    Channel::Number(w1 * va + w2 * vb)
                } else {
                    // premultiplied interpolation
                    Channel::Number((w1 * va * alpha_a + w2 * vb * alpha_b) / alpha_out)
                }
            }
        };
    }

    // Alpha missing on both sides stays missing.
    let alpha = match (a.alpha.value(), b.alpha.value()) {
        (None, None) => Channel::None,
        _ => Channel::Number((alpha_out * alpha_mult).clamp(0.0, 1.0)),
    };

    ColorTuple { space, channels, alpha }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mix(input: &str) -> Option<String> {
        resolve_color_mix(input, &ResolveOptions::default()).unwrap()
    }

    #[test]
    fn test_even_mix_in_srgb() {
        assert_eq!(
            mix("color-mix(in srgb, blue, red)"),
            Some("color(srgb 0.5 0 0.5)".to_string())
        );
    }

    #[test]
    fn test_single_percentage_implies_complement() {
        assert_eq!(
            mix("color-mix(in srgb, blue 25%, red)"),
            Some("color(srgb 0.75 0 0.25)".to_string())
        );
        assert_eq!(
            mix("color-mix(in srgb, 25% blue, red)"),
            Some("color(srgb 0.75 0 0.25)".to_string())
        );
    }

    #[test]
    fn test_sum_over_100_scales_down() {
        assert_eq!(
            mix("color-mix(in srgb, blue 100%, red 100%)"),
            Some("color(srgb 0.5 0 0.5)".to_string())
        );
    }

    #[test]
    fn test_sum_under_100_multiplies_alpha() {
        assert_eq!(
            mix("color-mix(in srgb, blue 25%, red 25%)"),
            Some("color(srgb 0.5 0 0.5 / 0.5)".to_string())
        );
    }

    #[test]
    fn test_premultiplied_alpha() {
        // opaque blue with transparent red: color leans fully to blue
        assert_eq!(
            mix("color-mix(in srgb, rgb(0 0 255 / 1), rgb(255 0 0 / 0))"),
            Some("color(srgb 0 0 1 / 0.5)".to_string())
        );
    }

    #[test]
    fn test_hue_shorter_arc() {
        // 30deg and 90deg meet at 60deg on the short arc
        let out = mix("color-mix(in hsl, hsl(30 100% 50%), hsl(90 100% 50%))").unwrap();
        assert!(out.starts_with("hsl(60"), "{out}");
    }

    #[test]
    fn test_hue_longer_arc() {
        let out =
            mix("color-mix(in hsl longer hue, hsl(30 100% 50%), hsl(90 100% 50%))").unwrap();
        assert!(out.starts_with("hsl(240"), "{out}");
    }

    #[test]
    fn test_hue_wraps_across_zero() {
        // 350deg to 10deg: the short arc crosses 0 and lands at 0
        let out = mix("color-mix(in hsl, hsl(350 100% 50%), hsl(10 100% 50%))").unwrap();
        assert!(out.starts_with("hsl(0 "), "{out}");
    }

    #[test]
    fn test_none_alpha_takes_other_side() {
        assert_eq!(
            mix("color-mix(in srgb, color(srgb 0 0 1 / none), color(srgb 1 0 0 / 0.5))"),
            Some("color(srgb 0.5 0 0.5 / 0.5)".to_string())
        );
    }

    #[test]
    fn test_both_none_alphas_stay_missing() {
        assert_eq!(
            mix("color-mix(in srgb, color(srgb 0 0 1 / none), color(srgb 1 0 0 / none))"),
            Some("color(srgb 0.5 0 0.5 / none)".to_string())
        );
    }

    #[test]
    fn test_none_channel_takes_other_side() {
        let out = mix("color-mix(in oklch, oklch(0.6 0.2 none), oklch(0.8 0.1 30))").unwrap();
        assert!(out.starts_with("oklch(0.7 "), "{out}");
        assert!(out.contains(" 30)"), "{out}");
    }

    #[test]
    fn test_nested_mix() {
        assert_eq!(
            mix("color-mix(in srgb, color-mix(in srgb, blue, red), color-mix(in srgb, blue, red))"),
            Some("color(srgb 0.5 0 0.5)".to_string())
        );
    }

    #[test]
    fn test_hue_method_in_rectangular_space_errors() {
        assert!(
            resolve_color_mix(
                "color-mix(in srgb longer hue, red, blue)",
                &ResolveOptions::default()
            )
            .is_err()
        );
    }

    #[test]
    fn test_zero_sum_errors() {
        assert!(
            resolve_color_mix("color-mix(in srgb, red 0%, blue 0%)", &ResolveOptions::default())
                .is_err()
        );
    }

    #[test]
    fn test_unresolvable_component_is_null() {
        assert_eq!(mix("color-mix(in srgb, notacolor, red)"), None);
    }

    #[test]
    fn test_not_a_mix_is_none() {
        assert_eq!(mix("rgb(1 2 3)"), None);
    }
}
