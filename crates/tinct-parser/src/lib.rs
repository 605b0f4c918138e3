//! CSS tokenizer and color grammar dispatch.
//!
//! The tokenizer turns raw CSS text into the flat token array consumed by
//! every other tinct crate. The grammar module dispatches a color literal to
//! its function grammar and extracts raw channel values.

pub mod grammar;
pub mod lexer;
pub mod named;

pub use grammar::{parse_color_value, parse_components, Component};
pub use lexer::tokenize;
pub use named::named_color;
