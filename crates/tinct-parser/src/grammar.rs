//! Grammar rules for CSS color literals.
//!
//! Dispatches a color literal to its function grammar, extracts raw channel
//! components, and normalizes each channel into its numeric domain. Channels
//! that still contain math or substitution functions are carried as
//! `Channel::Unresolved` for the resolver layer to evaluate.

use tinct_core::{
    angle_to_deg, clamp_alpha, normalize_hue, Channel, ColorError, ColorSpace, ColorTuple,
    ResolveOptions, Token, TokenKind,
};

use crate::lexer::tokenize;
use crate::named::named_color;

/// A raw component extracted from a color function's argument list.
#[derive(Debug, Clone, PartialEq)]
pub enum Component {
    Number(f64),
    /// The raw percent value, e.g. `50%` is `50.0`.
    Percentage(f64),
    /// An angle already converted to degrees.
    Angle(f64),
    /// The `none` keyword.
    None,
    Ident(String),
    /// A nested function (calc(), var(), ...) kept as raw text.
    Unresolved(String),
}

/// The split argument list of one color function.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionBody {
    pub name: String,
    pub components: Vec<Component>,
    pub alpha: Option<Component>,
    /// True when the arguments were comma-separated (legacy syntax).
    pub legacy: bool,
}

/// Parse a color literal into a color tuple.
///
/// Soft-invalid input (unknown keyword, a function this layer does not own
/// such as color-mix() or relative syntax) yields `Ok(None)`; malformed
/// grammar yields a syntax error carrying the literal.
pub fn parse_color_value(
    input: &str,
    opts: &ResolveOptions,
) -> Result<Option<ColorTuple>, ColorError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ColorError::type_error("a color value", "empty string"));
    }

    if trimmed.eq_ignore_ascii_case("transparent") {
        return Ok(Some(ColorTuple::new(ColorSpace::LegacyRgb, 0.0, 0.0, 0.0, 0.0)));
    }
    if trimmed.eq_ignore_ascii_case("currentcolor") {
        return match &opts.current_color {
            Some(cc) if !cc.eq_ignore_ascii_case("currentcolor") => parse_color_value(cc, opts),
            _ => Ok(None),
        };
    }

    if let Some(hex) = trimmed.strip_prefix('#') {
        return parse_hex(hex).map(Some);
    }

    if let Some([r, g, b]) = named_color(trimmed) {
        return Ok(Some(ColorTuple::new(
            ColorSpace::LegacyRgb,
            r as f64,
            g as f64,
            b as f64,
            1.0,
        )));
    }

    let tokens = tokenize(trimmed);
    let Some(body) = parse_components(&tokens, trimmed)? else {
        return Ok(None);
    };

    // Relative syntax and mixing belong to the resolver layer.
    if matches!(body.components.first(), Some(Component::Ident(id)) if id.eq_ignore_ascii_case("from"))
    {
        return Ok(None);
    }

    let name = body.name.to_ascii_lowercase();
    match name.as_str() {
        "rgb" | "rgba" => parse_rgb(&body, trimmed).map(Some),
        "hsl" | "hsla" => parse_hsl(&body, trimmed).map(Some),
        "hwb" => parse_hwb(&body, trimmed).map(Some),
        "lab" => parse_lab_like(&body, trimmed, ColorSpace::Lab).map(Some),
        "lch" => parse_lab_like(&body, trimmed, ColorSpace::Lch).map(Some),
        "oklab" => parse_lab_like(&body, trimmed, ColorSpace::Oklab).map(Some),
        "oklch" => parse_lab_like(&body, trimmed, ColorSpace::Oklch).map(Some),
        "color" => parse_color_fn(&body, trimmed).map(Some),
        _ => Ok(None),
    }
}

/// Parse a hex literal (without the leading `#`) into a legacy RGB tuple.
pub fn parse_hex(hex: &str) -> Result<ColorTuple, ColorError> {
    let err = || ColorError::syntax(format!("#{hex}"));
    let digit = |b: u8| -> Result<u32, ColorError> {
        (b as char).to_digit(16).ok_or_else(err)
    };
    let bytes = hex.as_bytes();

    let (r, g, b, a) = match bytes.len() {
        3 | 4 => {
            let r = digit(bytes[0])? * 17;
            let g = digit(bytes[1])? * 17;
            let b = digit(bytes[2])? * 17;
            let a = if bytes.len() == 4 {
                digit(bytes[3])? as f64 * 17.0 / 255.0
            } else {
                1.0
            };
            (r, g, b, a)
        }
        6 | 8 => {
            let r = digit(bytes[0])? * 16 + digit(bytes[1])?;
            let g = digit(bytes[2])? * 16 + digit(bytes[3])?;
            let b = digit(bytes[4])? * 16 + digit(bytes[5])?;
            let a = if bytes.len() == 8 {
                (digit(bytes[6])? * 16 + digit(bytes[7])?) as f64 / 255.0
            } else {
                1.0
            };
            (r, g, b, a)
        }
        _ => return Err(err()),
    };

    Ok(ColorTuple::new(
        ColorSpace::LegacyRgb,
        r as f64,
        g as f64,
        b as f64,
        a,
    ))
}

/// Split a function token stream into components.
///
/// Returns `Ok(None)` when the input is not a single function invocation.
/// Comma and slash separators must not be mixed.
pub fn parse_components(
    tokens: &[Token],
    input: &str,
) -> Result<Option<FunctionBody>, ColorError> {
    let mut iter = tokens.iter().enumerate().filter(|(_, t)| !t.is_trivia());

    let Some((_, head)) = iter.next() else {
        return Ok(None);
    };
    if head.kind != TokenKind::Function {
        return Ok(None);
    }
    let name = head.function_name().unwrap_or_default().to_string();

    let mut components = Vec::new();
    let mut alpha: Option<Component> = None;
    let mut saw_comma = false;
    let mut comma_count = 0usize;
    let mut saw_slash = false;
    let mut after_slash = false;
    let mut run: Vec<&Token> = Vec::new();
    let mut depth = 0usize;
    let mut closed = false;

    let mut flush = |run: &mut Vec<&Token>,
                     components: &mut Vec<Component>,
                     alpha: &mut Option<Component>,
                     after_slash: bool|
     -> Result<(), ColorError> {
        if run.is_empty() {
            return Ok(());
        }
        let component = component_from_run(run, input)?;
        run.clear();
        if after_slash {
            if alpha.is_some() {
                return Err(ColorError::syntax(input));
            }
            *alpha = Some(component);
        } else {
            components.push(component);
        }
        Ok(())
    };

    for token in tokens
        .iter()
        .skip_while(|t| t.kind != TokenKind::Function)
        .skip(1)
    {
        if token.is_trivia() {
            if depth == 0 {
                flush(&mut run, &mut components, &mut alpha, after_slash)?;
            }
            continue;
        }
        match token.kind {
            TokenKind::Eof => break,
            TokenKind::Function | TokenKind::OpenParen => {
                depth += 1;
                run.push(token);
            }
            TokenKind::CloseParen => {
                if depth == 0 {
                    flush(&mut run, &mut components, &mut alpha, after_slash)?;
                    closed = true;
                    break;
                }
                depth -= 1;
                run.push(token);
            }
            TokenKind::Comma if depth == 0 => {
                flush(&mut run, &mut components, &mut alpha, after_slash)?;
                saw_comma = true;
                comma_count += 1;
            }
            TokenKind::Delim if depth == 0 && token.raw == "/" => {
                flush(&mut run, &mut components, &mut alpha, after_slash)?;
                saw_slash = true;
                after_slash = true;
            }
            _ => run.push(token),
        }
    }

    if !closed || (saw_comma && saw_slash) {
        return Err(ColorError::syntax(input));
    }
    // A slash promises an alpha component.
    if saw_slash && alpha.is_none() {
        return Err(ColorError::syntax(input));
    }

    // Legacy comma syntax carries alpha as a fourth argument; commas must
    // separate every argument, never mixed with whitespace separation.
    if saw_comma {
        if components.len() < 2 || comma_count != components.len() - 1 {
            return Err(ColorError::syntax(input));
        }
        if components.len() == 4 {
            alpha = components.pop();
        }
        if alpha.as_ref().is_some_and(|a| *a == Component::None)
            || components.contains(&Component::None)
        {
            return Err(ColorError::syntax(input));
        }
    }

    Ok(Some(FunctionBody {
        name,
        components,
        alpha,
        legacy: saw_comma,
    }))
}

/// Turn a run of adjacent tokens into one component.
fn component_from_run(run: &[&Token], input: &str) -> Result<Component, ColorError> {
    if run.len() > 1 || run[0].kind == TokenKind::Function {
        let start = run[0].start;
        let end = run[run.len() - 1].end;
        // A bare multi-token run that is not a nested function is malformed.
        if run[0].kind != TokenKind::Function {
            return Err(ColorError::syntax(&input[start..end]));
        }
        return Ok(Component::Unresolved(input[start..end].to_string()));
    }

    let token = run[0];
    match token.kind {
        TokenKind::Number => Ok(Component::Number(token.number_value().unwrap_or(0.0))),
        TokenKind::Percentage => Ok(Component::Percentage(token.number_value().unwrap_or(0.0))),
        TokenKind::Dimension => {
            let value = token.number_value().unwrap_or(0.0);
            let unit = token.unit().unwrap_or("");
            match angle_to_deg(value, unit) {
                Some(deg) => Ok(Component::Angle(deg)),
                None => Err(ColorError::syntax(&token.raw)),
            }
        }
        TokenKind::Ident if token.raw_eq_ignore_case("none") => Ok(Component::None),
        TokenKind::Ident => Ok(Component::Ident(token.raw.clone())),
        _ => Err(ColorError::syntax(&token.raw)),
    }
}

fn expect_three(body: &FunctionBody, input: &str) -> Result<(), ColorError> {
    if body.components.len() != 3 {
        return Err(ColorError::syntax(input));
    }
    Ok(())
}

fn parse_rgb(body: &FunctionBody, input: &str) -> Result<ColorTuple, ColorError> {
    expect_three(body, input)?;

    if body.legacy {
        let all_numbers = body
            .components
            .iter()
            .all(|c| matches!(c, Component::Number(_)));
        let all_percent = body
            .components
            .iter()
            .all(|c| matches!(c, Component::Percentage(_)));
        if !all_numbers && !all_percent {
            return Err(ColorError::syntax(input));
        }
    }

    let channel = |c: &Component| -> Result<Channel, ColorError> {
        match c {
            Component::Number(n) => Ok(Channel::Number(*n)),
            Component::Percentage(p) => Ok(Channel::Number(p * 255.0 / 100.0)),
            Component::None => Ok(Channel::None),
            Component::Unresolved(s) => Ok(Channel::Unresolved(s.clone())),
            _ => Err(ColorError::syntax(input)),
        }
    };

    Ok(ColorTuple::with_channels(
        ColorSpace::LegacyRgb,
        [
            channel(&body.components[0])?,
            channel(&body.components[1])?,
            channel(&body.components[2])?,
        ],
        parse_alpha_component(body.alpha.as_ref(), input)?,
    ))
}

fn parse_hsl(body: &FunctionBody, input: &str) -> Result<ColorTuple, ColorError> {
    expect_three(body, input)?;

    if body.legacy {
        // Legacy hsl() requires percentage saturation and lightness.
        for c in &body.components[1..] {
            if !matches!(c, Component::Percentage(_) | Component::Unresolved(_)) {
                return Err(ColorError::syntax(input));
            }
        }
    }

    Ok(ColorTuple::with_channels(
        ColorSpace::Hsl,
        [
            hue_channel(&body.components[0], input)?,
            percent_channel(&body.components[1], input)?,
            percent_channel(&body.components[2], input)?,
        ],
        parse_alpha_component(body.alpha.as_ref(), input)?,
    ))
}

fn parse_hwb(body: &FunctionBody, input: &str) -> Result<ColorTuple, ColorError> {
    expect_three(body, input)?;
    if body.legacy {
        return Err(ColorError::syntax(input));
    }

    Ok(ColorTuple::with_channels(
        ColorSpace::Hwb,
        [
            hue_channel(&body.components[0], input)?,
            percent_channel(&body.components[1], input)?,
            percent_channel(&body.components[2], input)?,
        ],
        parse_alpha_component(body.alpha.as_ref(), input)?,
    ))
}

/// lab(), lch(), oklab(), and oklch() share a shape: lightness, then two
/// channels whose percentage reference ranges differ per function.
fn parse_lab_like(
    body: &FunctionBody,
    input: &str,
    space: ColorSpace,
) -> Result<ColorTuple, ColorError> {
    expect_three(body, input)?;
    if body.legacy {
        return Err(ColorError::syntax(input));
    }

    // (lightness max, percent reference for the a/b or chroma channels)
    let (l_max, ab_ref, c_ref) = match space {
        ColorSpace::Lab => (100.0, 125.0, 0.0),
        ColorSpace::Lch => (100.0, 0.0, 150.0),
        ColorSpace::Oklab => (1.0, 0.4, 0.0),
        ColorSpace::Oklch => (1.0, 0.0, 0.4),
        _ => unreachable!("not a lab-family space"),
    };
    let polar = matches!(space, ColorSpace::Lch | ColorSpace::Oklch);

    let lightness = match &body.components[0] {
        Component::Number(n) => Channel::Number(n.clamp(0.0, l_max)),
        Component::Percentage(p) => Channel::Number((p * l_max / 100.0).clamp(0.0, l_max)),
        Component::None => Channel::None,
        Component::Unresolved(s) => Channel::Unresolved(s.clone()),
        _ => return Err(ColorError::syntax(input)),
    };

    let scaled = |c: &Component, reference: f64, floor: Option<f64>| -> Result<Channel, ColorError> {
        let value = match c {
            Component::Number(n) => *n,
            Component::Percentage(p) => p * reference / 100.0,
            Component::None => return Ok(Channel::None),
            Component::Unresolved(s) => return Ok(Channel::Unresolved(s.clone())),
            _ => return Err(ColorError::syntax(input)),
        };
        let value = match floor {
            Some(min) => value.max(min),
            None => value,
        };
        Ok(Channel::Number(value))
    };

    let (c2, c3) = if polar {
        (
            scaled(&body.components[1], c_ref, Some(0.0))?,
            hue_channel(&body.components[2], input)?,
        )
    } else {
        (
            scaled(&body.components[1], ab_ref, None)?,
            scaled(&body.components[2], ab_ref, None)?,
        )
    };

    Ok(ColorTuple::with_channels(
        space,
        [lightness, c2, c3],
        parse_alpha_component(body.alpha.as_ref(), input)?,
    ))
}

fn parse_color_fn(body: &FunctionBody, input: &str) -> Result<ColorTuple, ColorError> {
    if body.legacy {
        return Err(ColorError::syntax(input));
    }
    let Some(Component::Ident(space_ident)) = body.components.first() else {
        return Err(ColorError::syntax(input));
    };
    let Some(space) = ColorSpace::from_color_fn_ident(space_ident) else {
        return Err(ColorError::syntax(input));
    };
    if body.components.len() != 4 {
        return Err(ColorError::syntax(input));
    }

    let channel = |c: &Component| -> Result<Channel, ColorError> {
        match c {
            Component::Number(n) => Ok(Channel::Number(*n)),
            Component::Percentage(p) => Ok(Channel::Number(p / 100.0)),
            Component::None => Ok(Channel::None),
            Component::Unresolved(s) => Ok(Channel::Unresolved(s.clone())),
            _ => Err(ColorError::syntax(input)),
        }
    };

    Ok(ColorTuple::with_channels(
        space,
        [
            channel(&body.components[1])?,
            channel(&body.components[2])?,
            channel(&body.components[3])?,
        ],
        parse_alpha_component(body.alpha.as_ref(), input)?,
    ))
}

fn hue_channel(c: &Component, input: &str) -> Result<Channel, ColorError> {
    match c {
        Component::Number(n) => Ok(Channel::Number(normalize_hue(*n))),
        Component::Angle(deg) => Ok(Channel::Number(normalize_hue(*deg))),
        Component::None => Ok(Channel::None),
        Component::Unresolved(s) => Ok(Channel::Unresolved(s.clone())),
        _ => Err(ColorError::syntax(input)),
    }
}

/// Percent-domain channel (saturation, lightness, whiteness, blackness):
/// stored in the 0-100 domain, number form accepted in modern syntax.
fn percent_channel(c: &Component, input: &str) -> Result<Channel, ColorError> {
    match c {
        Component::Number(n) => Ok(Channel::Number(*n)),
        Component::Percentage(p) => Ok(Channel::Number(*p)),
        Component::None => Ok(Channel::None),
        Component::Unresolved(s) => Ok(Channel::Unresolved(s.clone())),
        _ => Err(ColorError::syntax(input)),
    }
}

fn parse_alpha_component(
    alpha: Option<&Component>,
    input: &str,
) -> Result<Channel, ColorError> {
    match alpha {
        None => Ok(Channel::Number(1.0)),
        Some(Component::Number(n)) => Ok(Channel::Number(clamp_alpha(*n))),
        Some(Component::Percentage(p)) => Ok(Channel::Number(clamp_alpha(p / 100.0))),
        Some(Component::None) => Ok(Channel::None),
        Some(Component::Unresolved(s)) => Ok(Channel::Unresolved(s.clone())),
        Some(_) => Err(ColorError::syntax(input)),
    }
}
