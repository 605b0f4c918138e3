//! Custom property (var()) substitution.
//!
//! Substitution is textual: every `var(--name, fallback)` in the input is
//! replaced by its looked-up value, itself re-scanned for nested var() before
//! splicing. An unresolvable var() is not an error; it makes the whole value
//! resolve to nothing, which callers surface as `None`.

use tinct_cache::memoized;
use tinct_core::{ColorError, ResolveOptions, Token, TokenKind};
use tinct_parser::tokenize;

/// Substitute every var() in the input.
///
/// `Ok(None)` when some var() has no value and no usable fallback.
pub fn css_var(input: &str, opts: &ResolveOptions) -> Result<Option<String>, ColorError> {
    let key = format!("var|{}|{}", input, opts.cache_key_fragment());
    memoized(key, || substitute(input, opts, &mut Vec::new()))
}

pub(crate) fn substitute(
    input: &str,
    opts: &ResolveOptions,
    in_progress: &mut Vec<String>,
) -> Result<Option<String>, ColorError> {
    if !input.to_ascii_lowercase().contains("var(") {
        return Ok(Some(input.to_string()));
    }

    let tokens = tokenize(input);
    let mut out = String::new();
    let mut i = 0;
    while i < tokens.len() {
        let token = &tokens[i];
        if token.kind == TokenKind::Eof {
            break;
        }
        if token.kind == TokenKind::Function
            && token.function_name().is_some_and(|n| n.eq_ignore_ascii_case("var"))
        {
            let close = matching_paren(&tokens, i).ok_or_else(|| ColorError::syntax(input))?;
            match resolve_var_call(&tokens[i + 1..close], input, opts, in_progress)? {
                Some(text) => out.push_str(&text),
                None => return Ok(None),
            }
            i = close + 1;
            continue;
        }
        out.push_str(&token.raw);
        i += 1;
    }
    Ok(Some(out))
}

/// Index of the paren closing the function/paren token at `open`.
pub(crate) fn matching_paren(tokens: &[Token], open: usize) -> Option<usize> {
    let mut depth = 1usize;
    for (offset, token) in tokens[open + 1..].iter().enumerate() {
        match token.kind {
            TokenKind::Function | TokenKind::OpenParen => depth += 1,
            TokenKind::CloseParen => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + 1 + offset);
                }
            }
            _ => {}
        }
    }
    None
}

/// Resolve the inside of one var() call (tokens between the parens).
fn resolve_var_call(
    inner: &[Token],
    source: &str,
    opts: &ResolveOptions,
    in_progress: &mut Vec<String>,
) -> Result<Option<String>, ColorError> {
    let mut iter = inner.iter().enumerate().filter(|(_, t)| !t.is_trivia());

    let Some((_, name_token)) = iter.next() else {
        return Err(ColorError::syntax(source));
    };
    if name_token.kind != TokenKind::Ident || !name_token.raw.starts_with("--") {
        return Err(ColorError::syntax(source));
    }
    let name = name_token.raw.clone();

    // Fallback is everything after a top-level comma, raw.
    let mut fallback: Option<String> = None;
    let mut depth = 0usize;
    for (index, token) in inner.iter().enumerate() {
        match token.kind {
            TokenKind::Function | TokenKind::OpenParen => depth += 1,
            TokenKind::CloseParen => depth = depth.saturating_sub(1),
            TokenKind::Comma if depth == 0 => {
                let text: String = inner[index + 1..].iter().map(|t| t.raw.as_str()).collect();
                fallback = Some(text.trim().to_string());
                break;
            }
            _ => {}
        }
    }

    // Names already on the resolution chain are never re-substituted; they
    // fall through to the fallback.
    if !in_progress.contains(&name) {
        if let Some(value) = opts.lookup_custom_property(&name) {
            let value = value.trim().to_string();
            if !value.is_empty() && !value.eq_ignore_ascii_case("initial") {
                in_progress.push(name.clone());
                let resolved = substitute(&value, opts, in_progress);
                in_progress.pop();
                if let Some(text) = resolved? {
                    return Ok(Some(text));
                }
            }
        }
    }

    match fallback {
        Some(fb) => {
            in_progress.push(name);
            let resolved = substitute(&fb, opts, in_progress);
            in_progress.pop();
            resolved
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use tinct_core::PropertySource;

    fn opts_with(pairs: &[(&str, &str)]) -> ResolveOptions {
        let mut map = IndexMap::new();
        for (k, v) in pairs {
            map.insert(k.to_string(), v.to_string());
        }
        ResolveOptions {
            custom_property: PropertySource::Map(map),
            ..Default::default()
        }
    }

    #[test]
    fn test_simple_substitution() {
        let opts = opts_with(&[("--foo", "red")]);
        assert_eq!(css_var("var(--foo)", &opts).unwrap(), Some("red".to_string()));
    }

    #[test]
    fn test_substitution_inside_function() {
        let opts = opts_with(&[("--c", "255")]);
        assert_eq!(
            css_var("rgb(var(--c) 0 0)", &opts).unwrap(),
            Some("rgb(255 0 0)".to_string())
        );
    }

    #[test]
    fn test_fallback_used_when_missing() {
        let opts = ResolveOptions::default();
        assert_eq!(
            css_var("var(--missing, blue)", &opts).unwrap(),
            Some("blue".to_string())
        );
    }

    #[test]
    fn test_nested_fallback() {
        let opts = opts_with(&[("--b", "green")]);
        assert_eq!(
            css_var("var(--a, var(--b, blue))", &opts).unwrap(),
            Some("green".to_string())
        );
    }

    #[test]
    fn test_missing_without_fallback_is_null() {
        let opts = ResolveOptions::default();
        assert_eq!(css_var("var(--missing)", &opts).unwrap(), None);
    }

    #[test]
    fn test_initial_and_empty_fall_back() {
        let opts = opts_with(&[("--a", "initial"), ("--b", " ")]);
        assert_eq!(
            css_var("var(--a, red)", &opts).unwrap(),
            Some("red".to_string())
        );
        assert_eq!(
            css_var("var(--b, red)", &opts).unwrap(),
            Some("red".to_string())
        );
        assert_eq!(css_var("var(--a)", &opts).unwrap(), None);
    }

    #[test]
    fn test_value_rescanned_for_nested_var() {
        let opts = opts_with(&[("--a", "var(--b)"), ("--b", "rebeccapurple")]);
        assert_eq!(
            css_var("var(--a)", &opts).unwrap(),
            Some("rebeccapurple".to_string())
        );
    }

    #[test]
    fn test_cycle_resolves_via_fallback() {
        let opts = opts_with(&[("--a", "var(--b)"), ("--b", "var(--a, teal)")]);
        assert_eq!(css_var("var(--a)", &opts).unwrap(), Some("teal".to_string()));
    }

    #[test]
    fn test_self_cycle_is_null() {
        let opts = opts_with(&[("--a", "var(--a)")]);
        assert_eq!(css_var("var(--a)", &opts).unwrap(), None);
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let opts = opts_with(&[("--Foo", "red")]);
        assert_eq!(css_var("var(--foo)", &opts).unwrap(), None);
        assert_eq!(css_var("var(--Foo)", &opts).unwrap(), Some("red".to_string()));
    }

    #[test]
    fn test_unclosed_var_is_syntax_error() {
        let opts = ResolveOptions::default();
        assert!(css_var("var(--a", &opts).is_err());
    }

    #[test]
    fn test_non_dashed_name_is_syntax_error() {
        let opts = ResolveOptions::default();
        assert!(css_var("var(foo)", &opts).is_err());
    }
}
