//! Relative color syntax: `func(from <origin> ch1 ch2 ch3 [/ alpha])`.
//!
//! The origin color is resolved (it may itself be relative, a color-mix(),
//! or currentColor), converted into the channel namespace of the enclosing
//! function, and its channels are bound by name for use inside the channel
//! expressions. Each expression is evaluated with those bindings, and the
//! final color is assembled in the declared notation.

use tinct_cache::memoized;
use tinct_calc::{self, Expr};
use tinct_core::fmt::serialize_number;
use tinct_core::{Channel, ColorError, ColorSpace, ColorTuple, ResolveOptions, TokenKind};
use tinct_parser::tokenize;

use crate::resolve::resolve_to_tuple;
use crate::vars::matching_paren;

/// Resolve a relative color expression to a serialized color.
///
/// `Ok(None)` for anything that is not relative syntax, for unresolvable
/// origins, and for channel identifiers outside the function's namespace.
pub fn resolve_relative_color(
    input: &str,
    opts: &ResolveOptions,
) -> Result<Option<String>, ColorError> {
    let trimmed = input.trim();
    let key = format!("relative|{}|{}", trimmed, opts.cache_key_fragment());
    memoized(key, || {
        let Some(tuple) = resolve_relative(trimmed, opts)? else {
            return Ok(None);
        };
        Ok(Some(serialize_relative(&tuple)))
    })
}

/// The rgb()/hsl()/hwb() forms resolve into sRGB and serialize as color();
/// the lab-family and color() forms keep their own notation.
fn serialize_relative(tuple: &ColorTuple) -> String {
    match tuple.space {
        ColorSpace::LegacyRgb | ColorSpace::Hsl | ColorSpace::Hwb => {
            tinct_convert::to_css(&tinct_convert::convert(tuple, ColorSpace::Srgb))
        }
        _ => tinct_convert::to_css(tuple),
    }
}

/// The channel namespace implied by a function keyword.
fn target_space(name: &str) -> Option<ColorSpace> {
    match name {
        "rgb" | "rgba" => Some(ColorSpace::LegacyRgb),
        "hsl" | "hsla" => Some(ColorSpace::Hsl),
        "hwb" => Some(ColorSpace::Hwb),
        "lab" => Some(ColorSpace::Lab),
        "lch" => Some(ColorSpace::Lch),
        "oklab" => Some(ColorSpace::Oklab),
        "oklch" => Some(ColorSpace::Oklch),
        _ => None,
    }
}

/// Channel identifiers for a space, in channel order.
fn channel_names(space: ColorSpace) -> [&'static str; 3] {
    match space {
        ColorSpace::Hsl => ["h", "s", "l"],
        ColorSpace::Hwb => ["h", "w", "b"],
        ColorSpace::Lab | ColorSpace::Oklab => ["l", "a", "b"],
        ColorSpace::Lch | ColorSpace::Oklch => ["l", "c", "h"],
        ColorSpace::XyzD65 | ColorSpace::XyzD50 => ["x", "y", "z"],
        _ => ["r", "g", "b"],
    }
}

pub(crate) fn resolve_relative(
    input: &str,
    opts: &ResolveOptions,
) -> Result<Option<ColorTuple>, ColorError> {
    let tokens = tokenize(input);

    let Some(head) = tokens.first().filter(|t| t.kind == TokenKind::Function) else {
        return Ok(None);
    };
    let name = head
        .function_name()
        .unwrap_or_default()
        .to_ascii_lowercase();
    let is_color_fn = name == "color";
    if !is_color_fn && target_space(&name).is_none() {
        return Ok(None);
    }

    // Walk non-trivia tokens after the head.
    let mut pos = 1;
    let mut next = |tokens: &[tinct_core::Token], pos: &mut usize| -> Option<usize> {
        while *pos < tokens.len() {
            let i = *pos;
            *pos += 1;
            if !tokens[i].is_trivia() {
                return Some(i);
            }
        }
        None
    };

    let Some(from_index) = next(&tokens, &mut pos) else {
        return Ok(None);
    };
    if !(tokens[from_index].kind == TokenKind::Ident
        && tokens[from_index].raw_eq_ignore_case("from"))
    {
        return Ok(None);
    }

    // Origin: a nested function through its matching paren, or one token.
    let Some(origin_start) = next(&tokens, &mut pos) else {
        return Err(ColorError::syntax(input));
    };
    let origin_end = if tokens[origin_start].kind == TokenKind::Function {
        let close = matching_paren(&tokens, origin_start).ok_or_else(|| ColorError::syntax(input))?;
        pos = close + 1;
        close
    } else {
        origin_start
    };
    let origin_text = &input[tokens[origin_start].start..tokens[origin_end].end];

    let Some(origin) = resolve_to_tuple(origin_text, opts)? else {
        return Ok(None);
    };

    // color(from <origin> <space> ...) declares its own space.
    let space = if is_color_fn {
        let Some(ident_index) = next(&tokens, &mut pos) else {
            return Err(ColorError::syntax(input));
        };
        let ident = &tokens[ident_index];
        if ident.kind != TokenKind::Ident {
            return Err(ColorError::syntax(input));
        }
        match ColorSpace::from_color_fn_ident(&ident.raw) {
            Some(space) => space,
            None => return Err(ColorError::syntax(input)),
        }
    } else {
        target_space(&name).unwrap_or(ColorSpace::LegacyRgb)
    };

    let origin = tinct_convert::convert(&origin, space);
    let names = channel_names(space);
    let bindings = [
        (names[0], origin.channels[0].clone()),
        (names[1], origin.channels[1].clone()),
        (names[2], origin.channels[2].clone()),
        ("alpha", origin.alpha.clone()),
    ];

    // Split the channel arguments: whitespace-separated at depth 0, with an
    // optional `/ alpha` tail.
    let mut components: Vec<&str> = Vec::new();
    let mut alpha_arg: Option<&str> = None;
    let mut after_slash = false;
    let mut run_start: Option<usize> = None;
    let mut run_end = 0usize;
    let mut depth = 0usize;
    let mut flush =
        |run_start: &mut Option<usize>, run_end: usize, after_slash: bool| -> Result<(), ColorError> {
            if let Some(start) = run_start.take() {
                let text = &input[start..run_end];
                if after_slash {
                    if alpha_arg.is_some() {
                        return Err(ColorError::syntax(input));
                    }
                    alpha_arg = Some(text);
                } else {
                    components.push(text);
                }
            }
            Ok(())
        };

    for token in &tokens[pos..] {
        match token.kind {
            TokenKind::Eof => break,
            TokenKind::Whitespace | TokenKind::Comment => {
                if depth == 0 {
                    flush(&mut run_start, run_end, after_slash)?;
                }
            }
            TokenKind::Function | TokenKind::OpenParen => {
                depth += 1;
                run_start.get_or_insert(token.start);
                run_end = token.end;
            }
            TokenKind::CloseParen => {
                if depth == 0 {
                    flush(&mut run_start, run_end, after_slash)?;
                    break;
                }
                depth -= 1;
                run_start.get_or_insert(token.start);
                run_end = token.end;
            }
            TokenKind::Delim if depth == 0 && token.raw == "/" => {
                flush(&mut run_start, run_end, after_slash)?;
                after_slash = true;
            }
            TokenKind::Comma if depth == 0 => return Err(ColorError::syntax(input)),
            _ => {
                run_start.get_or_insert(token.start);
                run_end = token.end;
            }
        }
    }

    if components.len() != 3 {
        return Err(ColorError::syntax(input));
    }

    let mut resolved = Vec::with_capacity(3);
    for text in &components {
        match resolve_channel_arg(text, &bindings, opts)? {
            Some(value) => resolved.push(value),
            None => return Ok(None),
        }
    }
    let alpha_text = match alpha_arg {
        Some(text) => match resolve_channel_arg(text, &bindings, opts)? {
            Some(value) => value,
            None => return Ok(None),
        },
        // omitted alpha inherits the origin's
        None => channel_text(&origin.alpha),
    };

    let assembled = if is_color_fn {
        format!(
            "color({} {} {} {} / {})",
            space.as_str(),
            resolved[0],
            resolved[1],
            resolved[2],
            alpha_text
        )
    } else {
        format!(
            "{}({} {} {} / {})",
            name, resolved[0], resolved[1], resolved[2], alpha_text
        )
    };
    tinct_parser::parse_color_value(&assembled, opts)
}

fn channel_text(channel: &Channel) -> String {
    match channel {
        Channel::Number(n) => serialize_number(*n),
        Channel::None => "none".to_string(),
        Channel::Unresolved(raw) => raw.clone(),
    }
}

/// Resolve one channel argument to literal channel text.
fn resolve_channel_arg(
    text: &str,
    bindings: &[(&str, Channel)],
    opts: &ResolveOptions,
) -> Result<Option<String>, ColorError> {
    let tokens = tokenize(text);
    let significant: Vec<_> = tokens
        .iter()
        .filter(|t| !t.is_trivia() && t.kind != TokenKind::Eof)
        .collect();

    match significant.as_slice() {
        [single] => match single.kind {
            TokenKind::Number | TokenKind::Percentage | TokenKind::Dimension => {
                Ok(Some(text.to_string()))
            }
            TokenKind::Ident if single.raw_eq_ignore_case("none") => {
                Ok(Some("none".to_string()))
            }
            TokenKind::Ident => {
                // a bare channel name outside the namespace resolves to null
                match lookup_binding(&single.raw, bindings) {
                    Some(channel) => Ok(Some(channel_text(channel))),
                    None => Ok(None),
                }
            }
            _ => Err(ColorError::syntax(text)),
        },
        [head, ..] if head.kind == TokenKind::Function => {
            let name = head.function_name().unwrap_or_default();
            if !tinct_calc::is_math_function(name) {
                return Err(ColorError::syntax(text));
            }
            let expr = tinct_calc::parse_expression(&tokens, text)?;
            let bound = bind_channels(expr, bindings);
            match tinct_calc::eval::eval(&bound, opts).filter(|v| v.value.is_finite()) {
                Some(value) => Ok(Some(value.serialize())),
                None => Ok(None),
            }
        }
        _ => Err(ColorError::syntax(text)),
    }
}

fn lookup_binding<'a>(name: &str, bindings: &'a [(&str, Channel)]) -> Option<&'a Channel> {
    bindings
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, channel)| channel)
}

/// Replace bound channel identifiers in a math expression with their values.
/// `none` channels coerce to 0 once referenced inside calc().
fn bind_channels(expr: Expr, bindings: &[(&str, Channel)]) -> Expr {
    match expr {
        Expr::Ident(name) => match lookup_binding(&name, bindings) {
            Some(channel) => Expr::Number(channel.to_number()),
            None => Expr::Ident(name),
        },
        Expr::Neg(inner) => Expr::Neg(Box::new(bind_channels(*inner, bindings))),
        Expr::Add(a, b) => Expr::Add(
            Box::new(bind_channels(*a, bindings)),
            Box::new(bind_channels(*b, bindings)),
        ),
        Expr::Sub(a, b) => Expr::Sub(
            Box::new(bind_channels(*a, bindings)),
            Box::new(bind_channels(*b, bindings)),
        ),
        Expr::Mul(a, b) => Expr::Mul(
            Box::new(bind_channels(*a, bindings)),
            Box::new(bind_channels(*b, bindings)),
        ),
        Expr::Div(a, b) => Expr::Div(
            Box::new(bind_channels(*a, bindings)),
            Box::new(bind_channels(*b, bindings)),
        ),
        Expr::Call(name, args) => Expr::Call(
            name,
            args.into_iter()
                .map(|arg| bind_channels(arg, bindings))
                .collect(),
        ),
        other => other,
    }
}
