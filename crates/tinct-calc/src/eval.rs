//! Evaluation of parsed math expressions.
//!
//! Everything here returns `Option<CalcValue>`: `None` means the expression
//! is syntactically fine but cannot be resolved to a number, either because a
//! dimension has no known scale or because units combine in a way that has no
//! numeric answer. Syntax was already validated by the parser.

use tinct_core::{angle_to_deg, ResolveOptions};

use crate::parse::Expr;
use crate::value::{CalcUnit, CalcValue};

// Font-relative units (and their root-relative forms) depend on metrics no
// caller can supply; they never resolve, even when a lookup offers a scale.
const FONT_METRIC_UNITS: &[&str] = &["ch", "ex", "lh", "rch", "rex", "rlh"];

pub fn eval(expr: &Expr, opts: &ResolveOptions) -> Option<CalcValue> {
    match expr {
        Expr::Number(v) => Some(CalcValue::number(*v)),
        Expr::Percent(v) => Some(CalcValue::percent(*v)),
        Expr::Dimension(value, unit) => eval_dimension(*value, unit, opts),
        Expr::Ident(name) => eval_constant(name),
        Expr::Neg(inner) => {
            let v = eval(inner, opts)?;
            Some(v.with_value(-v.value))
        }
        Expr::Add(a, b) => {
            let (a, b) = (eval(a, opts)?, eval(b, opts)?);
            same_unit(a, b).map(|unit| CalcValue { value: a.value + b.value, unit })
        }
        Expr::Sub(a, b) => {
            let (a, b) = (eval(a, opts)?, eval(b, opts)?);
            same_unit(a, b).map(|unit| CalcValue { value: a.value - b.value, unit })
        }
        Expr::Mul(a, b) => {
            let (a, b) = (eval(a, opts)?, eval(b, opts)?);
            match (a.unit, b.unit) {
                (_, CalcUnit::Number) => Some(a.with_value(a.value * b.value)),
                (CalcUnit::Number, _) => Some(b.with_value(a.value * b.value)),
                _ => None,
            }
        }
        Expr::Div(a, b) => {
            let (a, b) = (eval(a, opts)?, eval(b, opts)?);
            if b.unit != CalcUnit::Number || b.value == 0.0 {
                return None;
            }
            Some(a.with_value(a.value / b.value))
        }
        Expr::Call(name, args) => eval_call(name, args, opts),
    }
}

fn eval_constant(name: &str) -> Option<CalcValue> {
    let v = match name {
        "e" => std::f64::consts::E,
        "pi" => std::f64::consts::PI,
        "infinity" => f64::INFINITY,
        "-infinity" => f64::NEG_INFINITY,
        "nan" => f64::NAN,
        _ => return None,
    };
    Some(CalcValue::number(v))
}

fn eval_dimension(value: f64, unit: &str, opts: &ResolveOptions) -> Option<CalcValue> {
    if let Some(deg) = angle_to_deg(value, unit) {
        return Some(CalcValue::angle(deg));
    }
    if unit == "px" {
        return Some(CalcValue::length(value));
    }
    if FONT_METRIC_UNITS.contains(&unit) {
        return None;
    }
    // Caller-supplied scale: the lookup value is px per one unit.
    opts.lookup_dimension(unit)
        .map(|scale| CalcValue::length(value * scale))
}

fn same_unit(a: CalcValue, b: CalcValue) -> Option<CalcUnit> {
    (a.unit == b.unit).then_some(a.unit)
}

/// All arguments evaluated and sharing one unit.
fn eval_uniform_args(
    args: &[Expr],
    opts: &ResolveOptions,
) -> Option<(CalcUnit, Vec<f64>)> {
    let mut values = Vec::with_capacity(args.len());
    let mut unit = None;
    for arg in args {
        let v = eval(arg, opts)?;
        match unit {
            None => unit = Some(v.unit),
            Some(u) if u == v.unit => {}
            Some(_) => return None,
        }
        values.push(v.value);
    }
    unit.map(|u| (u, values))
}

/// An argument that must be a plain number.
fn eval_number(arg: &Expr, opts: &ResolveOptions) -> Option<f64> {
    let v = eval(arg, opts)?;
    (v.unit == CalcUnit::Number).then_some(v.value)
}

/// An argument that is a number (radians) or an angle (degrees), as radians.
fn eval_radians(arg: &Expr, opts: &ResolveOptions) -> Option<f64> {
    let v = eval(arg, opts)?;
    match v.unit {
        CalcUnit::Number => Some(v.value),
        CalcUnit::Angle => Some(v.value.to_radians()),
        _ => None,
    }
}

fn css_sign(v: f64) -> f64 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        // preserves -0 and NaN
        v
    }
}

fn eval_call(name: &str, args: &[Expr], opts: &ResolveOptions) -> Option<CalcValue> {
    match name {
        "calc" => match args {
            [inner] => eval(inner, opts),
            _ => None,
        },
        "min" => {
            let (unit, values) = eval_uniform_args(args, opts)?;
            let v = values.into_iter().fold(f64::INFINITY, f64::min);
            Some(CalcValue { value: v, unit })
        }
        "max" => {
            let (unit, values) = eval_uniform_args(args, opts)?;
            let v = values.into_iter().fold(f64::NEG_INFINITY, f64::max);
            Some(CalcValue { value: v, unit })
        }
        "clamp" => {
            let (unit, values) = eval_uniform_args(args, opts)?;
            let [lo, val, hi] = values.as_slice() else { return None };
            // lower bound wins when the bounds cross
            Some(CalcValue { value: lo.max(val.min(*hi)), unit })
        }
        "abs" => {
            let [arg] = args else { return None };
            let v = eval(arg, opts)?;
            Some(v.with_value(v.value.abs()))
        }
        "sign" => {
            let [arg] = args else { return None };
            let v = eval(arg, opts)?;
            Some(CalcValue::number(css_sign(v.value)))
        }
        "sin" | "cos" | "tan" => {
            let [arg] = args else { return None };
            let rad = eval_radians(arg, opts)?;
            let v = match name {
                "sin" => rad.sin(),
                "cos" => rad.cos(),
                _ => rad.tan(),
            };
            Some(CalcValue::number(v))
        }
        "asin" | "acos" | "atan" => {
            let [arg] = args else { return None };
            let n = eval_number(arg, opts)?;
            let rad = match name {
                "asin" => n.asin(),
                "acos" => n.acos(),
                _ => n.atan(),
            };
            Some(CalcValue::angle(rad.to_degrees()))
        }
        "atan2" => {
            let [a, b] = args else { return None };
            let (a, b) = (eval(a, opts)?, eval(b, opts)?);
            same_unit(a, b)?;
            Some(CalcValue::angle(a.value.atan2(b.value).to_degrees()))
        }
        "pow" => {
            let [base, exp] = args else { return None };
            let (base, exp) = (eval_number(base, opts)?, eval_number(exp, opts)?);
            Some(CalcValue::number(base.powf(exp)))
        }
        "sqrt" => {
            let [arg] = args else { return None };
            Some(CalcValue::number(eval_number(arg, opts)?.sqrt()))
        }
        "hypot" => {
            let (unit, values) = eval_uniform_args(args, opts)?;
            let v = values.into_iter().fold(0.0, f64::hypot);
            Some(CalcValue { value: v, unit })
        }
        "log" => match args {
            [x] => Some(CalcValue::number(eval_number(x, opts)?.ln())),
            [x, base] => {
                let (x, base) = (eval_number(x, opts)?, eval_number(base, opts)?);
                Some(CalcValue::number(x.log(base)))
            }
            _ => None,
        },
        "exp" => {
            let [arg] = args else { return None };
            Some(CalcValue::number(eval_number(arg, opts)?.exp()))
        }
        "round" => eval_round(args, opts),
        "mod" => {
            let [a, b] = args else { return None };
            let (a, b) = (eval(a, opts)?, eval(b, opts)?);
            let unit = same_unit(a, b)?;
            if b.value == 0.0 {
                return None;
            }
            // result sign follows the divisor
            Some(CalcValue { value: a.value - b.value * (a.value / b.value).floor(), unit })
        }
        "rem" => {
            let [a, b] = args else { return None };
            let (a, b) = (eval(a, opts)?, eval(b, opts)?);
            let unit = same_unit(a, b)?;
            if b.value == 0.0 {
                return None;
            }
            Some(CalcValue { value: a.value % b.value, unit })
        }
        _ => None,
    }
}

fn eval_round(args: &[Expr], opts: &ResolveOptions) -> Option<CalcValue> {
    let (strategy, rest) = match args {
        [Expr::Ident(s), rest @ ..] if ROUND_STRATEGIES.contains(&s.as_str()) => {
            (s.as_str(), rest)
        }
        rest => ("nearest", rest),
    };
    let (value, step) = match rest {
        [value] => (eval(value, opts)?, None),
        [value, step] => (eval(value, opts)?, Some(eval(step, opts)?)),
        _ => return None,
    };
    let step = match step {
        Some(s) => {
            same_unit(value, s)?;
            s.value
        }
        // a bare value only rounds when it is a plain number
        None if value.unit == CalcUnit::Number => 1.0,
        None => return None,
    };
    if step == 0.0 {
        return None;
    }
    let ratio = value.value / step;
    let rounded = match strategy {
        "up" => ratio.ceil(),
        "down" => ratio.floor(),
        "to-zero" => ratio.trunc(),
        // halfway cases round toward positive infinity
        _ => (ratio + 0.5).floor(),
    };
    Some(value.with_value(rounded * step))
}

const ROUND_STRATEGIES: &[&str] = &["nearest", "up", "down", "to-zero"];
