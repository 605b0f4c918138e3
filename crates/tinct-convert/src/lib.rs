//! Color space conversion and serialization.
//!
//! All conversions route through XYZ-D65: matrices and transfer functions per
//! RGB space, Bradford adaptation for the D50-referenced spaces, the CIE Lab
//! and OKLab formulas, and the polar forms on top of those. Serialization
//! covers the canonical CSS notations, hex, and the numeric array form.

pub mod gamma;
pub mod matrix;
pub mod serialize;
pub mod spaces;
pub mod table;

pub use serialize::{to_array, to_css, to_hex};
pub use spaces::{clip_to_gamut, convert, from_xyz_d65, polar_to_rect, rect_to_polar, to_xyz_d65};
pub use table::{
    color_to_hex, color_to_hsl, color_to_hwb, color_to_lab, color_to_lch, color_to_oklab,
    color_to_oklch, color_to_rgb, color_to_xyz, color_to_xyz_d50, hex_to_rgb, rgb_to_hex,
};
