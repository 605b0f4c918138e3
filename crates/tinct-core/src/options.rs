//! Resolution options shared by every public operation.

use indexmap::IndexMap;
use std::fmt;

/// Output format selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Format {
    /// Fully resolved numeric form (`rgb(...)` / `color(...)` / `lab(...)`).
    #[default]
    ComputedValue,
    /// As-authored form after var()/calc() substitution; unresolved calc()
    /// is preserved as a normalized `calc(...)`.
    SpecifiedValue,
    /// Always the spec-canonical `color()`/`lab()`-family notation.
    Spec,
    /// Legacy `rgb()`/`rgba()` with 0-255 channels.
    Rgb,
    /// A `[c1, c2, c3, alpha]` numeric array.
    Array,
    /// `#rrggbb`, alpha byte only when alpha != 1.
    Hex,
    /// `#rrggbbaa`, alpha byte always.
    HexAlpha,
}

/// A custom-property source: a static map or a caller callback.
///
/// Callback identity cannot participate in cache keys; callers using the
/// callback form must clear the cache when the data it reads changes.
pub enum PropertySource {
    Map(IndexMap<String, String>),
    Callback(Box<dyn Fn(&str) -> Option<String>>),
}

impl PropertySource {
    pub fn lookup(&self, name: &str) -> Option<String> {
        match self {
            PropertySource::Map(map) => map.get(name).cloned(),
            PropertySource::Callback(f) => f(name),
        }
    }

    pub fn is_callback(&self) -> bool {
        matches!(self, PropertySource::Callback(_))
    }
}

impl Default for PropertySource {
    fn default() -> Self {
        PropertySource::Map(IndexMap::new())
    }
}

impl fmt::Debug for PropertySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertySource::Map(map) => f.debug_tuple("Map").field(map).finish(),
            PropertySource::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}

/// A dimension (unit) source: a static unit→number map or a callback.
pub enum DimensionSource {
    Map(IndexMap<String, f64>),
    Callback(Box<dyn Fn(&str) -> Option<f64>>),
}

impl DimensionSource {
    pub fn lookup(&self, unit: &str) -> Option<f64> {
        match self {
            DimensionSource::Map(map) => map.get(unit).copied(),
            DimensionSource::Callback(f) => f(unit),
        }
    }

    pub fn is_callback(&self) -> bool {
        matches!(self, DimensionSource::Callback(_))
    }
}

impl Default for DimensionSource {
    fn default() -> Self {
        DimensionSource::Map(IndexMap::new())
    }
}

impl fmt::Debug for DimensionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DimensionSource::Map(map) => f.debug_tuple("Map").field(map).finish(),
            DimensionSource::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}

/// Options accepted by every resolve/parse entry point.
#[derive(Debug, Default)]
pub struct ResolveOptions {
    /// Convert XYZ output to the D50 white point instead of D65.
    pub d50: bool,
    pub format: Format,
    /// Substitution value for the `currentcolor` keyword.
    pub current_color: Option<String>,
    pub custom_property: PropertySource,
    pub dimension: DimensionSource,
    /// Opaque pass-through tag echoed back alongside the result.
    pub key: Option<String>,
    /// Include the alpha byte in hex output even when alpha == 1.
    pub alpha: bool,
}

impl ResolveOptions {
    pub fn lookup_custom_property(&self, name: &str) -> Option<String> {
        self.custom_property.lookup(name)
    }

    pub fn lookup_dimension(&self, unit: &str) -> Option<f64> {
        self.dimension.lookup(unit)
    }

    /// Whether any lookup goes through a callback the cache cannot observe.
    pub fn has_callback(&self) -> bool {
        self.custom_property.is_callback() || self.dimension.is_callback()
    }

    /// Deterministic serialization of the literal option fields, used as the
    /// option part of cache keys. Callback contents are excluded by design;
    /// the presence of a callback is marked so keyed entries from map-based
    /// calls are never served to callback-based ones.
    pub fn cache_key_fragment(&self) -> String {
        use std::fmt::Write;

        let mut out = String::new();
        let _ = write!(out, "d50:{};fmt:{:?};alpha:{}", self.d50, self.format, self.alpha);
        if let Some(cc) = &self.current_color {
            let _ = write!(out, ";cc:{cc}");
        }
        match &self.custom_property {
            PropertySource::Map(map) => {
                for (k, v) in map {
                    let _ = write!(out, ";cp:{k}={v}");
                }
            }
            PropertySource::Callback(_) => out.push_str(";cp:<callback>"),
        }
        match &self.dimension {
            DimensionSource::Map(map) => {
                for (k, v) in map {
                    let _ = write!(out, ";dim:{k}={v}");
                }
            }
            DimensionSource::Callback(_) => out.push_str(";dim:<callback>"),
        }
        out
    }
}
