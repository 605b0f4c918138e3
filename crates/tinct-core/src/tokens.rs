//! The CSS token shape shared by the parser, calc evaluator, and resolvers.
//!
//! Tokens are consumed positionally and never mutated. The shape matches the
//! collaborating tokenizer's output: kind, raw text, source range, and the
//! parsed payload for numeric kinds.

/// Token kinds produced by the tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TokenKind {
    Ident,
    /// A function name plus its opening paren, e.g. `rgb(`.
    Function,
    /// A number with a unit, e.g. `90deg`, `2em`.
    Dimension,
    Percentage,
    Number,
    /// `#` followed by hex-ish ident characters.
    Hash,
    /// A single punctuation character not covered by another kind.
    Delim,
    Comma,
    Whitespace,
    Comment,
    OpenParen,
    CloseParen,
    Eof,
}

/// Parsed payload carried by numeric and delimiter tokens.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TokenData {
    Number { value: f64 },
    Percentage { value: f64 },
    Dimension { value: f64, unit: String },
    Delim { ch: char },
}

/// One token: kind, raw source text, source offsets, and parsed data.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Token {
    pub kind: TokenKind,
    pub raw: String,
    pub start: usize,
    pub end: usize,
    pub data: Option<TokenData>,
}

impl Token {
    pub fn new(kind: TokenKind, raw: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            kind,
            raw: raw.into(),
            start,
            end,
            data: None,
        }
    }

    pub fn with_data(mut self, data: TokenData) -> Self {
        self.data = Some(data);
        self
    }

    /// Whitespace and comments are skippable everywhere in color grammars.
    pub fn is_trivia(&self) -> bool {
        matches!(self.kind, TokenKind::Whitespace | TokenKind::Comment)
    }

    /// The numeric value for Number, Percentage, and Dimension tokens.
    pub fn number_value(&self) -> Option<f64> {
        match &self.data {
            Some(TokenData::Number { value })
            | Some(TokenData::Percentage { value })
            | Some(TokenData::Dimension { value, .. }) => Some(*value),
            _ => None,
        }
    }

    /// The unit of a Dimension token.
    pub fn unit(&self) -> Option<&str> {
        match &self.data {
            Some(TokenData::Dimension { unit, .. }) => Some(unit),
            _ => None,
        }
    }

    /// ASCII case-insensitive comparison of the raw text against `s`.
    pub fn raw_eq_ignore_case(&self, s: &str) -> bool {
        self.raw.eq_ignore_ascii_case(s)
    }

    /// The function name of a Function token, without the trailing paren.
    pub fn function_name(&self) -> Option<&str> {
        if self.kind == TokenKind::Function {
            Some(self.raw.strip_suffix('(').unwrap_or(&self.raw))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_value_across_kinds() {
        let num = Token::new(TokenKind::Number, "1.5", 0, 3)
            .with_data(TokenData::Number { value: 1.5 });
        let pct = Token::new(TokenKind::Percentage, "50%", 0, 3)
            .with_data(TokenData::Percentage { value: 50.0 });
        let dim = Token::new(TokenKind::Dimension, "90deg", 0, 5).with_data(TokenData::Dimension {
            value: 90.0,
            unit: "deg".to_string(),
        });
        assert_eq!(num.number_value(), Some(1.5));
        assert_eq!(pct.number_value(), Some(50.0));
        assert_eq!(dim.number_value(), Some(90.0));
        assert_eq!(dim.unit(), Some("deg"));
    }

    #[test]
    fn test_function_name_strips_paren() {
        let tok = Token::new(TokenKind::Function, "oklch(", 0, 6);
        assert_eq!(tok.function_name(), Some("oklch"));
    }
}
