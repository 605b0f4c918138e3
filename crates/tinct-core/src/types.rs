//! Core value types for CSS colors.

use std::fmt;

/// A color space tag. Every numeric tuple travels with one of these;
/// nothing interprets channel values without knowing the space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ColorSpace {
    /// Gamma-encoded sRGB, channels in [0, 1].
    Srgb,
    /// Linear-light sRGB.
    SrgbLinear,
    /// Display P3 (sRGB transfer function, wider primaries).
    DisplayP3,
    /// ITU-R BT.2020-2.
    Rec2020,
    /// Adobe RGB (1998).
    A98Rgb,
    /// ProPhoto RGB (D50-referenced).
    ProPhotoRgb,
    /// CIE XYZ with D65 white point.
    XyzD65,
    /// CIE XYZ with D50 white point.
    XyzD50,
    /// Hue/saturation/lightness polar form of sRGB.
    Hsl,
    /// Hue/whiteness/blackness polar form of sRGB.
    Hwb,
    /// CIE Lab (D50-referenced).
    Lab,
    /// Polar form of Lab.
    Lch,
    Oklab,
    /// Polar form of Oklab.
    Oklch,
    /// Legacy rgb()/rgba() with channels in [0, 255].
    LegacyRgb,
}

impl ColorSpace {
    /// The identifier used in `color()` and serialized output.
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorSpace::Srgb => "srgb",
            ColorSpace::SrgbLinear => "srgb-linear",
            ColorSpace::DisplayP3 => "display-p3",
            ColorSpace::Rec2020 => "rec2020",
            ColorSpace::A98Rgb => "a98-rgb",
            ColorSpace::ProPhotoRgb => "prophoto-rgb",
            ColorSpace::XyzD65 => "xyz-d65",
            ColorSpace::XyzD50 => "xyz-d50",
            ColorSpace::Hsl => "hsl",
            ColorSpace::Hwb => "hwb",
            ColorSpace::Lab => "lab",
            ColorSpace::Lch => "lch",
            ColorSpace::Oklab => "oklab",
            ColorSpace::Oklch => "oklch",
            ColorSpace::LegacyRgb => "rgb",
        }
    }

    /// Look up a space identifier as it appears inside `color()`.
    /// `xyz` is an alias for `xyz-d65`. Matching is ASCII case-insensitive.
    pub fn from_color_fn_ident(ident: &str) -> Option<Self> {
        let ident = ident.to_ascii_lowercase();
        match ident.as_str() {
            "srgb" => Some(ColorSpace::Srgb),
            "srgb-linear" => Some(ColorSpace::SrgbLinear),
            "display-p3" => Some(ColorSpace::DisplayP3),
            "rec2020" => Some(ColorSpace::Rec2020),
            "a98-rgb" => Some(ColorSpace::A98Rgb),
            "prophoto-rgb" => Some(ColorSpace::ProPhotoRgb),
            "xyz" | "xyz-d65" => Some(ColorSpace::XyzD65),
            "xyz-d50" => Some(ColorSpace::XyzD50),
            _ => None,
        }
    }

    /// Spaces whose first channel (or third, for LCH-likes) is a hue angle.
    pub fn is_polar(&self) -> bool {
        matches!(
            self,
            ColorSpace::Hsl | ColorSpace::Hwb | ColorSpace::Lch | ColorSpace::Oklch
        )
    }

    /// Index of the hue channel for polar spaces.
    pub fn hue_index(&self) -> Option<usize> {
        match self {
            ColorSpace::Hsl | ColorSpace::Hwb => Some(0),
            ColorSpace::Lch | ColorSpace::Oklch => Some(2),
            _ => None,
        }
    }

    /// Spaces that pass through gamma-encoded RGB in [0, 1].
    pub fn is_rgb_based(&self) -> bool {
        matches!(
            self,
            ColorSpace::Srgb
                | ColorSpace::SrgbLinear
                | ColorSpace::DisplayP3
                | ColorSpace::Rec2020
                | ColorSpace::A98Rgb
                | ColorSpace::ProPhotoRgb
                | ColorSpace::LegacyRgb
        )
    }
}

impl fmt::Display for ColorSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One channel of a color value.
///
/// `None` is the CSS `none` keyword: explicitly missing, preserved through
/// conversion, and only coerced to a number when a consumer demands one.
/// `Unresolved` holds a calc() expression that still needs evaluation and
/// exists only before resolution completes.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Channel {
    Number(f64),
    None,
    Unresolved(String),
}

impl Channel {
    /// The numeric value, if resolved to one.
    pub fn value(&self) -> Option<f64> {
        match self {
            Channel::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Coerce to a number. `none` becomes 0, which is only correct inside
    /// an explicit calc() binding or a conversion that has to produce
    /// numbers; callers preserve `None` everywhere else.
    pub fn to_number(&self) -> f64 {
        match self {
            Channel::Number(n) => *n,
            Channel::None => 0.0,
            Channel::Unresolved(_) => 0.0,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Channel::None)
    }

    pub fn is_unresolved(&self) -> bool {
        matches!(self, Channel::Unresolved(_))
    }
}

impl From<f64> for Channel {
    fn from(n: f64) -> Self {
        Channel::Number(n)
    }
}

/// A color: three channels plus alpha, tagged with their color space.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColorTuple {
    pub space: ColorSpace,
    pub channels: [Channel; 3],
    pub alpha: Channel,
}

impl ColorTuple {
    pub fn new(space: ColorSpace, c1: f64, c2: f64, c3: f64, alpha: f64) -> Self {
        Self {
            space,
            channels: [Channel::Number(c1), Channel::Number(c2), Channel::Number(c3)],
            alpha: Channel::Number(alpha),
        }
    }

    pub fn with_channels(space: ColorSpace, channels: [Channel; 3], alpha: Channel) -> Self {
        Self { space, channels, alpha }
    }

    /// Channel values with `none` coerced to 0, for math that needs numbers.
    pub fn coords(&self) -> [f64; 3] {
        [
            self.channels[0].to_number(),
            self.channels[1].to_number(),
            self.channels[2].to_number(),
        ]
    }

    /// Alpha as a number; `none` counts as fully opaque for compositing-free
    /// serialization decisions but coerces to 0 inside arithmetic, so callers
    /// pick via [`Channel`] directly when that distinction matters.
    pub fn alpha_value(&self) -> f64 {
        match &self.alpha {
            Channel::Number(n) => *n,
            _ => 1.0,
        }
    }

    /// A copy with every `none` channel replaced by 0.
    pub fn resolve_missing(&self) -> Self {
        let fix = |c: &Channel| match c {
            Channel::None => Channel::Number(0.0),
            other => other.clone(),
        };
        Self {
            space: self.space,
            channels: [
                fix(&self.channels[0]),
                fix(&self.channels[1]),
                fix(&self.channels[2]),
            ],
            alpha: fix(&self.alpha),
        }
    }

    pub fn has_none(&self) -> bool {
        self.channels.iter().any(Channel::is_none) || self.alpha.is_none()
    }

    pub fn has_unresolved(&self) -> bool {
        self.channels.iter().any(Channel::is_unresolved) || self.alpha.is_unresolved()
    }
}

/// Wrap an angle in degrees into [0, 360).
pub fn normalize_hue(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(360.0);
    // rem_euclid(-1e-16, 360.0) can round to 360.0 exactly
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Convert an angle with a CSS unit to degrees. Units are case-insensitive.
pub fn angle_to_deg(value: f64, unit: &str) -> Option<f64> {
    let deg = match unit.to_ascii_lowercase().as_str() {
        "deg" => value,
        "grad" => value * 360.0 / 400.0,
        "rad" => value.to_degrees(),
        "turn" => value * 360.0,
        _ => return None,
    };
    Some(deg)
}

/// Clamp alpha into [0, 1]. Out-of-range alpha clamps rather than wraps.
pub fn clamp_alpha(a: f64) -> f64 {
    a.clamp(0.0, 1.0)
}
