//! Value resolution for CSS colors.
//!
//! Ties the lower layers together: custom property (var()) substitution,
//! relative color syntax, color-mix() interpolation, calc()-bearing channel
//! evaluation, and the orchestrator that routes an input string to the right
//! resolver and formats the result. Resolution results are memoized in the
//! shared cache from `tinct-cache`.

pub mod mix;
pub mod relative;
pub mod resolve;
pub mod vars;

pub use mix::resolve_color_mix;
pub use relative::resolve_relative_color;
pub use resolve::{resolve, resolve_color_func, resolve_color_value, Resolved};
pub use vars::css_var;

// The grammar-level parser is part of the public resolution surface.
pub use tinct_parser::parse_color_value;

use tinct_core::{ColorError, ResolveOptions};

/// Evaluate a math expression and serialize the result, memoized like the
/// other entry points.
pub fn css_calc(input: &str, opts: &ResolveOptions) -> Result<Option<String>, ColorError> {
    let key = format!("calc|{}|{}", input.trim(), opts.cache_key_fragment());
    tinct_cache::memoized(key, || tinct_calc::css_calc(input, opts))
}
