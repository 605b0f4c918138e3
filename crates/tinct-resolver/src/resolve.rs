//! Resolution orchestration.
//!
//! Routes an input value through var() substitution, then to the right
//! resolver (color-mix, relative syntax, math functions, or the plain color
//! grammar), evaluates any calc()-bearing channels, and formats the result.
//! Formatted results are memoized in the shared cache, including inputs that
//! resolve to nothing.

use tinct_cache::memoized;
use tinct_core::{Channel, ColorError, ColorSpace, ColorTuple, Format, ResolveOptions, TokenKind};
use tinct_parser::{parse_color_value, tokenize};

use crate::mix::resolve_mix;
use crate::relative::resolve_relative;
use crate::vars::substitute;

/// A resolved value plus the caller's pass-through tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub value: String,
    pub key: Option<String>,
}

/// Resolve a CSS color value to a string in the requested format.
///
/// `Ok(None)` is soft invalidity: unknown keywords, unresolvable var() or
/// calc(), disallowed relative channels. Results (including soft failures)
/// are memoized; callers using callback-based options own invalidation.
pub fn resolve(input: &str, opts: &ResolveOptions) -> Result<Option<Resolved>, ColorError> {
    let cache_key = format!("resolve|{}|{}", input, opts.cache_key_fragment());
    let result = memoized(cache_key, || resolve_uncached(input, opts))?;
    Ok(result.map(|value| Resolved { value, key: opts.key.clone() }))
}

fn resolve_uncached(input: &str, opts: &ResolveOptions) -> Result<Option<String>, ColorError> {
    let Some(substituted) = substitute(input, opts, &mut Vec::new())? else {
        return Ok(None);
    };
    let text = substituted.trim().to_string();
    if text.is_empty() {
        return Err(ColorError::type_error("a color value", "empty string"));
    }

    // Specified form: as-authored after substitution, calc() preserved.
    if opts.format == Format::SpecifiedValue {
        return Ok(Some(text));
    }

    // A bare math expression resolves through the calc evaluator.
    if leading_math_function(&text) {
        return tinct_calc::css_calc(&text, opts);
    }

    let Some(tuple) = resolve_to_tuple(&text, opts)? else {
        return Ok(None);
    };
    Ok(Some(format_tuple(&tuple, opts)))
}

fn leading_math_function(text: &str) -> bool {
    let tokens = tokenize(text);
    tokens
        .first()
        .filter(|t| t.kind == TokenKind::Function)
        .and_then(|t| t.function_name())
        .is_some_and(tinct_calc::is_math_function)
}

/// Resolve any already-substituted value text to a numeric tuple.
///
/// This is the re-entry point used by color-mix() components and relative
/// color origins, which may themselves be mixes or relative.
pub(crate) fn resolve_to_tuple(
    input: &str,
    opts: &ResolveOptions,
) -> Result<Option<ColorTuple>, ColorError> {
    let text = input.trim();

    if is_function_named(text, "color-mix") {
        return resolve_mix(text, opts);
    }
    if is_relative(text) {
        return resolve_relative(text, opts);
    }

    let Some(tuple) = parse_color_value(text, opts)? else {
        return Ok(None);
    };
    if tuple.has_unresolved() {
        return resolve_channels(text, opts);
    }
    Ok(Some(tuple))
}

/// Resolve a value with var() substitution applied first; tuple-level
/// counterpart of [`resolve`].
pub fn resolve_color_value(
    input: &str,
    opts: &ResolveOptions,
) -> Result<Option<ColorTuple>, ColorError> {
    let Some(substituted) = substitute(input, opts, &mut Vec::new())? else {
        return Ok(None);
    };
    resolve_to_tuple(&substituted, opts)
}

/// Resolve a `color()` function value to a formatted string.
pub fn resolve_color_func(
    input: &str,
    opts: &ResolveOptions,
) -> Result<Option<String>, ColorError> {
    let text = input.trim();
    if !is_function_named(text, "color") {
        return Ok(None);
    }
    let Some(tuple) = resolve_to_tuple(text, opts)? else {
        return Ok(None);
    };
    Ok(Some(format_tuple(&tuple, opts)))
}

fn is_function_named(text: &str, name: &str) -> bool {
    tokenize(text)
        .first()
        .filter(|t| t.kind == TokenKind::Function)
        .and_then(|t| t.function_name())
        .is_some_and(|n| n.eq_ignore_ascii_case(name))
}

fn is_relative(text: &str) -> bool {
    let tokens = tokenize(text);
    if tokens.first().map(|t| t.kind) != Some(TokenKind::Function) {
        return false;
    }
    tokens[1..]
        .iter()
        .find(|t| !t.is_trivia())
        .is_some_and(|t| t.kind == TokenKind::Ident && t.raw_eq_ignore_case("from"))
}

/// Evaluate calc()-bearing channels, splice the numeric results back into
/// the literal, and re-parse.
fn resolve_channels(
    text: &str,
    opts: &ResolveOptions,
) -> Result<Option<ColorTuple>, ColorError> {
    let tuple = match parse_color_value(text, opts)? {
        Some(tuple) => tuple,
        None => return Ok(None),
    };

    let mut rewritten = text.to_string();
    let unresolved = tuple
        .channels
        .iter()
        .chain(std::iter::once(&tuple.alpha))
        .filter_map(|c| match c {
            Channel::Unresolved(raw) => Some(raw.clone()),
            _ => None,
        });
    for raw in unresolved {
        let Some(value) = tinct_calc::evaluate(&raw, opts)? else {
            return Ok(None);
        };
        rewritten = rewritten.replacen(&raw, &value.serialize(), 1);
    }

    let resolved = parse_color_value(&rewritten, opts)?;
    // a channel that re-parses unresolved would loop; treat it as failed
    Ok(resolved.filter(|t| !t.has_unresolved()))
}

/// Serialize a resolved tuple per the requested output format.
fn format_tuple(tuple: &ColorTuple, opts: &ResolveOptions) -> String {
    match opts.format {
        Format::ComputedValue | Format::SpecifiedValue => {
            let tuple = maybe_d50(tuple, opts);
            match tuple.space {
                ColorSpace::LegacyRgb => {
                    tinct_convert::to_css(&tinct_convert::clip_to_gamut(&tuple))
                }
                _ => tinct_convert::to_css(&tuple),
            }
        }
        Format::Spec => {
            let tuple = match tuple.space {
                ColorSpace::LegacyRgb | ColorSpace::Hsl | ColorSpace::Hwb => {
                    tinct_convert::convert(tuple, ColorSpace::Srgb)
                }
                _ => tuple.clone(),
            };
            tinct_convert::to_css(&maybe_d50(&tuple, opts))
        }
        Format::Rgb => {
            let rgb = tinct_convert::convert(tuple, ColorSpace::LegacyRgb);
            tinct_convert::to_css(&tinct_convert::clip_to_gamut(&rgb))
        }
        Format::Array => tinct_convert::to_array(tuple),
        Format::Hex => tinct_convert::to_hex(tuple, opts.alpha),
        Format::HexAlpha => tinct_convert::to_hex(tuple, true),
    }
}

fn maybe_d50(tuple: &ColorTuple, opts: &ResolveOptions) -> ColorTuple {
    if opts.d50 && tuple.space == ColorSpace::XyzD65 {
        tinct_convert::convert(tuple, ColorSpace::XyzD50)
    } else {
        tuple.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use tinct_cache::clear_cache;
    use tinct_core::{DimensionSource, PropertySource};

    fn resolve_str(input: &str) -> Option<String> {
        clear_cache();
        resolve(input, &ResolveOptions::default())
            .unwrap()
            .map(|r| r.value)
    }

    #[test]
    fn test_named_color_tuple() {
        let tuple = resolve_color_value("green", &ResolveOptions::default())
            .unwrap()
            .unwrap();
        assert_eq!(tuple.space, ColorSpace::LegacyRgb);
        assert_eq!(tuple.coords(), [0.0, 128.0, 0.0]);
        assert_eq!(tuple.alpha_value(), 1.0);
    }

    #[test]
    fn test_computed_value_formats() {
        assert_eq!(resolve_str("green"), Some("rgb(0, 128, 0)".to_string()));
        assert_eq!(
            resolve_str("color(srgb 0.4 0.2 0.6)"),
            Some("color(srgb 0.4 0.2 0.6)".to_string())
        );
        assert_eq!(
            resolve_str("oklch(0.7 0.1 120)"),
            Some("oklch(0.7 0.1 120)".to_string())
        );
    }

    #[test]
    fn test_mix_routed_through_resolve() {
        assert_eq!(
            resolve_str("color-mix(in srgb, blue, red)"),
            Some("color(srgb 0.5 0 0.5)".to_string())
        );
    }

    #[test]
    fn test_relative_routed_through_resolve() {
        assert_eq!(
            resolve_str("rgb(from rebeccapurple r g b)"),
            Some("color(srgb 0.4 0.2 0.6)".to_string())
        );
    }

    #[test]
    fn test_calc_channel_resolution() {
        assert_eq!(
            resolve_str("rgb(calc(100 + 28) 0 0)"),
            Some("rgb(128, 0, 0)".to_string())
        );
    }

    #[test]
    fn test_var_then_parse() {
        clear_cache();
        let mut map = IndexMap::new();
        map.insert("--brand".to_string(), "rebeccapurple".to_string());
        let opts = ResolveOptions {
            custom_property: PropertySource::Map(map),
            ..Default::default()
        };
        let out = resolve("var(--brand)", &opts).unwrap().unwrap();
        assert_eq!(out.value, "rgb(102, 51, 153)");
    }

    #[test]
    fn test_unresolvable_var_is_null() {
        assert_eq!(resolve_str("var(--missing)"), None);
    }

    #[test]
    fn test_bare_calc_resolves() {
        clear_cache();
        let mut map = IndexMap::new();
        map.insert("em".to_string(), 16.0);
        let opts = ResolveOptions {
            dimension: DimensionSource::Map(map),
            ..Default::default()
        };
        let out = resolve("calc(50% + (sign(100em - 1px) * 10%))", &opts)
            .unwrap()
            .unwrap();
        assert_eq!(out.value, "60%");
    }

    #[test]
    fn test_unresolved_calc_is_null_in_computed() {
        assert_eq!(resolve_str("rgb(calc(10em) 0 0)"), None);
    }

    #[test]
    fn test_specified_value_preserves_calc() {
        clear_cache();
        let opts = ResolveOptions {
            format: Format::SpecifiedValue,
            ..Default::default()
        };
        let out = resolve("rgb(calc(10em) 0 0)", &opts).unwrap().unwrap();
        assert_eq!(out.value, "rgb(calc(10em) 0 0)");
    }

    #[test]
    fn test_hex_formats() {
        clear_cache();
        let opts = ResolveOptions {
            format: Format::Hex,
            ..Default::default()
        };
        assert_eq!(resolve("green", &opts).unwrap().unwrap().value, "#008000");

        let opts = ResolveOptions {
            format: Format::HexAlpha,
            ..Default::default()
        };
        assert_eq!(resolve("green", &opts).unwrap().unwrap().value, "#008000ff");
    }

    #[test]
    fn test_rgb_format_clamps() {
        clear_cache();
        let opts = ResolveOptions {
            format: Format::Rgb,
            ..Default::default()
        };
        let out = resolve("color(srgb 1.2 -0.1 0.5)", &opts).unwrap().unwrap();
        assert_eq!(out.value, "rgb(255, 0, 128)");
    }

    #[test]
    fn test_array_format() {
        clear_cache();
        let opts = ResolveOptions {
            format: Format::Array,
            ..Default::default()
        };
        let out = resolve("green", &opts).unwrap().unwrap();
        assert_eq!(out.value, "[0, 128, 0, 1]");
    }

    #[test]
    fn test_spec_format_canonicalizes_legacy() {
        clear_cache();
        let opts = ResolveOptions {
            format: Format::Spec,
            ..Default::default()
        };
        let out = resolve("rebeccapurple", &opts).unwrap().unwrap();
        assert_eq!(out.value, "color(srgb 0.4 0.2 0.6)");
    }

    #[test]
    fn test_d50_output() {
        clear_cache();
        let opts = ResolveOptions {
            d50: true,
            ..Default::default()
        };
        let out = resolve("color(xyz 0.2 0.3 0.4)", &opts).unwrap().unwrap();
        assert!(out.value.starts_with("color(xyz-d50 "), "{}", out.value);
    }

    #[test]
    fn test_key_pass_through() {
        clear_cache();
        let opts = ResolveOptions {
            key: Some("swatch-3".to_string()),
            ..Default::default()
        };
        let out = resolve("green", &opts).unwrap().unwrap();
        assert_eq!(out.key.as_deref(), Some("swatch-3"));
    }

    #[test]
    fn test_cache_transparency() {
        let opts = ResolveOptions::default();
        clear_cache();
        let cold = resolve("color-mix(in srgb, blue, red)", &opts).unwrap();
        let warm = resolve("color-mix(in srgb, blue, red)", &opts).unwrap();
        clear_cache();
        let again = resolve("color-mix(in srgb, blue, red)", &opts).unwrap();
        assert_eq!(cold, warm);
        assert_eq!(cold, again);
    }

    #[test]
    fn test_entry_points_keep_distinct_cache_entries() {
        clear_cache();
        let opts = ResolveOptions::default();
        // Same input through two operations: substitution output first, then
        // full resolution; the first result must not be served to the second.
        assert_eq!(
            crate::vars::css_var("var(--missing, blue)", &opts).unwrap(),
            Some("blue".to_string())
        );
        let out = resolve("var(--missing, blue)", &opts).unwrap().unwrap();
        assert_eq!(out.value, "rgb(0, 0, 255)");
    }

    #[test]
    fn test_css_calc_entry_point_is_memoized() {
        clear_cache();
        let opts = ResolveOptions::default();
        assert_eq!(
            crate::css_calc("calc(50% + 10%)", &opts).unwrap(),
            Some("60%".to_string())
        );
        assert_eq!(
            crate::css_calc("calc(50% + 10%)", &opts).unwrap(),
            Some("60%".to_string())
        );
    }

    #[test]
    fn test_soft_failures_are_cached() {
        clear_cache();
        let opts = ResolveOptions::default();
        assert_eq!(resolve("notacolor", &opts).unwrap(), None);
        // second call hits the KnownInvalid entry
        assert_eq!(resolve("notacolor", &opts).unwrap(), None);
    }

    #[test]
    fn test_resolve_color_func() {
        clear_cache();
        let opts = ResolveOptions::default();
        assert_eq!(
            resolve_color_func("color(srgb 0.4 0.2 0.6)", &opts).unwrap(),
            Some("color(srgb 0.4 0.2 0.6)".to_string())
        );
        assert_eq!(resolve_color_func("rgb(1 2 3)", &opts).unwrap(), None);
    }

    #[test]
    fn test_transparent_keyword() {
        assert_eq!(
            resolve_str("transparent"),
            Some("rgba(0, 0, 0, 0)".to_string())
        );
    }

    #[test]
    fn test_currentcolor_resolution() {
        clear_cache();
        let opts = ResolveOptions {
            current_color: Some("green".to_string()),
            ..Default::default()
        };
        let out = resolve("currentColor", &opts).unwrap().unwrap();
        assert_eq!(out.value, "rgb(0, 128, 0)");

        clear_cache();
        assert_eq!(resolve_str("currentColor"), None);
    }
}
