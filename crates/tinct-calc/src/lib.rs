//! CSS math function evaluation: calc() and friends.
//!
//! Expressions are parsed with standard precedence climbing and evaluated
//! over a unit-tagged value algebra (number, percent, length in px, angle in
//! degrees). Dimensions with caller-supplied scales resolve through
//! [`ResolveOptions`]; anything that cannot be brought down to a number
//! evaluates to `None` rather than an error.

pub mod eval;
pub mod parse;
pub mod value;

pub use parse::{is_math_function, parse_expression, Expr};
pub use value::{CalcUnit, CalcValue};

use tinct_core::{ColorError, Format, ResolveOptions};
use tinct_parser::tokenize;

/// Evaluate a math expression to a unit-tagged value.
///
/// `Ok(None)` means the expression is well-formed but unresolvable with the
/// given options; syntax problems are hard errors.
pub fn evaluate(input: &str, opts: &ResolveOptions) -> Result<Option<CalcValue>, ColorError> {
    let trimmed = input.trim();
    let tokens = tokenize(trimmed);
    let expr = parse::parse_expression(&tokens, trimmed)?;
    Ok(eval::eval(&expr, opts).filter(|v| v.value.is_finite()))
}

/// Evaluate a math expression and serialize the result, e.g.
/// `calc(50% + 10%)` to `60%`.
///
/// Under [`Format::SpecifiedValue`] the result keeps its calc() wrapper:
/// a resolvable expression normalizes to `calc(<value>)`, and an
/// unresolvable one is preserved as authored instead of becoming `None`.
pub fn css_calc(input: &str, opts: &ResolveOptions) -> Result<Option<String>, ColorError> {
    let trimmed = input.trim();
    let tokens = tokenize(trimmed);
    let expr = parse::parse_expression(&tokens, trimmed)?;
    let value = eval::eval(&expr, opts).filter(|v| v.value.is_finite());
    if opts.format == Format::SpecifiedValue {
        return Ok(Some(match value {
            Some(v) => format!("calc({})", v.serialize()),
            None => trimmed.to_string(),
        }));
    }
    Ok(value.map(|v| v.serialize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use tinct_core::DimensionSource;

    #[test]
    fn test_css_calc_with_dimension_source() {
        let mut map = IndexMap::new();
        map.insert("em".to_string(), 16.0);
        let opts = ResolveOptions {
            dimension: DimensionSource::Map(map),
            ..Default::default()
        };
        assert_eq!(
            css_calc("calc(50% + (sign(100em - 1px) * 10%))", &opts).unwrap(),
            Some("60%".to_string())
        );
    }

    #[test]
    fn test_css_calc_unresolvable_without_source() {
        let opts = ResolveOptions::default();
        assert_eq!(
            css_calc("calc(50% + (sign(100em - 1px) * 10%))", &opts).unwrap(),
            None
        );
    }

    #[test]
    fn test_css_calc_syntax_error() {
        let opts = ResolveOptions::default();
        assert!(css_calc("calc(50% +", &opts).is_err());
    }

    #[test]
    fn test_specified_form_normalizes_resolvable_calc() {
        let opts = ResolveOptions {
            format: Format::SpecifiedValue,
            ..Default::default()
        };
        assert_eq!(
            css_calc("calc( 50% + 10% )", &opts).unwrap(),
            Some("calc(60%)".to_string())
        );
    }

    #[test]
    fn test_specified_form_preserves_unresolvable_calc() {
        let opts = ResolveOptions {
            format: Format::SpecifiedValue,
            ..Default::default()
        };
        assert_eq!(
            css_calc("calc(100em - 1px)", &opts).unwrap(),
            Some("calc(100em - 1px)".to_string())
        );
        // syntax problems stay hard errors in every format
        assert!(css_calc("calc(50% +", &opts).is_err());
    }

    #[test]
    fn test_non_finite_results_are_unresolvable() {
        let opts = ResolveOptions::default();
        assert_eq!(css_calc("calc(infinity)", &opts).unwrap(), None);
        assert_eq!(css_calc("calc(nan)", &opts).unwrap(), None);
    }
}
