//! Pairwise string-to-string conversion entry points.
//!
//! Each function parses a color literal, converts it to a fixed destination
//! space, and serializes the result. Soft-invalid input (unknown keywords,
//! functions that need the resolver layer) yields `Ok(None)`; malformed
//! literals yield a syntax error.

use tinct_cache::memoized;
use tinct_core::{ColorError, ColorSpace, ColorTuple, ResolveOptions};
use tinct_parser::parse_color_value;

use crate::serialize;
use crate::spaces::{clip_to_gamut, convert};

fn parse(input: &str) -> Result<Option<ColorTuple>, ColorError> {
    parse_color_value(input, &ResolveOptions::default())
}

fn to_space(input: &str, space: ColorSpace) -> Result<Option<String>, ColorError> {
    let key = format!("convert:{}|{}", space.as_str(), input);
    memoized(key, || {
        let Some(tuple) = parse(input)? else {
            return Ok(None);
        };
        Ok(Some(serialize::to_css(&convert(&tuple, space))))
    })
}

/// Convert any color literal to legacy `rgb()`/`rgba()`, clamped to gamut.
pub fn color_to_rgb(input: &str) -> Result<Option<String>, ColorError> {
    memoized(format!("convert:rgb|{input}"), || {
        let Some(tuple) = parse(input)? else {
            return Ok(None);
        };
        let rgb = clip_to_gamut(&convert(&tuple, ColorSpace::LegacyRgb));
        Ok(Some(serialize::to_css(&rgb)))
    })
}

pub fn color_to_hsl(input: &str) -> Result<Option<String>, ColorError> {
    to_space(input, ColorSpace::Hsl)
}

pub fn color_to_hwb(input: &str) -> Result<Option<String>, ColorError> {
    to_space(input, ColorSpace::Hwb)
}

pub fn color_to_lab(input: &str) -> Result<Option<String>, ColorError> {
    to_space(input, ColorSpace::Lab)
}

pub fn color_to_lch(input: &str) -> Result<Option<String>, ColorError> {
    to_space(input, ColorSpace::Lch)
}

pub fn color_to_oklab(input: &str) -> Result<Option<String>, ColorError> {
    to_space(input, ColorSpace::Oklab)
}

pub fn color_to_oklch(input: &str) -> Result<Option<String>, ColorError> {
    to_space(input, ColorSpace::Oklch)
}

pub fn color_to_xyz(input: &str) -> Result<Option<String>, ColorError> {
    to_space(input, ColorSpace::XyzD65)
}

pub fn color_to_xyz_d50(input: &str) -> Result<Option<String>, ColorError> {
    to_space(input, ColorSpace::XyzD50)
}

/// Convert any color literal to lowercase hex, clipping to the sRGB gamut.
pub fn color_to_hex(input: &str) -> Result<Option<String>, ColorError> {
    memoized(format!("convert:hex|{input}"), || {
        let Some(tuple) = parse(input)? else {
            return Ok(None);
        };
        Ok(Some(serialize::to_hex(&tuple, false)))
    })
}

/// Convert an `rgb()`/`rgba()` literal (or any sRGB-representable color)
/// to hex.
pub fn rgb_to_hex(input: &str) -> Result<Option<String>, ColorError> {
    color_to_hex(input)
}

/// Expand a hex literal to legacy `rgb()`/`rgba()` notation.
pub fn hex_to_rgb(input: &str) -> Result<Option<String>, ColorError> {
    let trimmed = input.trim();
    if !trimmed.starts_with('#') {
        return Ok(None);
    }
    memoized(format!("convert:hex-to-rgb|{trimmed}"), || {
        let Some(tuple) = parse(trimmed)? else {
            return Ok(None);
        };
        Ok(Some(serialize::to_css(&tuple)))
    })
}
