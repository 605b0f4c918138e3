//! Lexer/tokenizer for CSS component values.
//!
//! Produces the flat token array defined in tinct-core. Tokenization never
//! fails; unrecognizable bytes become Delim tokens and the stream always
//! ends with an Eof token.

use nom::{
    branch::alt,
    bytes::complete::{take_while, take_while1},
    character::complete::char,
    combinator::{map, opt, recognize},
    sequence::{pair, tuple},
    IResult,
};
use tinct_core::{Token, TokenData, TokenKind};

/// Parse a CSS identifier (letters, digits, `-`, `_`; must not start with a digit).
pub fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        take_while1(|c: char| c.is_alphabetic() || c == '_' || c == '-'),
        take_while(|c: char| c.is_alphanumeric() || c == '_' || c == '-'),
    ))(input)
}

/// Parse a CSS number (optional sign, fraction, exponent).
pub fn number(input: &str) -> IResult<&str, f64> {
    map(
        recognize(tuple((
            opt(alt((char('+'), char('-')))),
            alt((
                recognize(pair(
                    take_while1(|c: char| c.is_ascii_digit()),
                    opt(pair(char('.'), take_while1(|c: char| c.is_ascii_digit()))),
                )),
                recognize(pair(char('.'), take_while1(|c: char| c.is_ascii_digit()))),
            )),
            opt(tuple((
                alt((char('e'), char('E'))),
                opt(alt((char('+'), char('-')))),
                take_while1(|c: char| c.is_ascii_digit()),
            ))),
        ))),
        |s: &str| s.parse().unwrap_or(0.0),
    )(input)
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}

/// True when `rest` starts a numeric token rather than an ident or delim.
fn starts_number(rest: &str) -> bool {
    let mut chars = rest.chars();
    match chars.next() {
        Some(c) if c.is_ascii_digit() => true,
        Some('.') => matches!(chars.next(), Some(c) if c.is_ascii_digit()),
        Some('+') | Some('-') => match chars.next() {
            Some(c) if c.is_ascii_digit() => true,
            Some('.') => matches!(chars.next(), Some(c) if c.is_ascii_digit()),
            _ => false,
        },
        _ => false,
    }
}

fn starts_ident(rest: &str) -> bool {
    let mut chars = rest.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => true,
        Some('-') => matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_' || c == '-'),
        _ => false,
    }
}

/// Tokenize a CSS value into the shared token shape.
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < input.len() {
        let rest = &input[pos..];
        let Some(c) = rest.chars().next() else {
            break;
        };

        if c.is_whitespace() {
            let len = rest
                .char_indices()
                .find(|(_, ch)| !ch.is_whitespace())
                .map(|(i, _)| i)
                .unwrap_or(rest.len());
            tokens.push(Token::new(
                TokenKind::Whitespace,
                &rest[..len],
                pos,
                pos + len,
            ));
            pos += len;
            continue;
        }

        if rest.starts_with("/*") {
            let len = rest.find("*/").map(|i| i + 2).unwrap_or(rest.len());
            tokens.push(Token::new(TokenKind::Comment, &rest[..len], pos, pos + len));
            pos += len;
            continue;
        }

        match c {
            ',' => {
                tokens.push(Token::new(TokenKind::Comma, ",", pos, pos + 1));
                pos += 1;
                continue;
            }
            '(' => {
                tokens.push(Token::new(TokenKind::OpenParen, "(", pos, pos + 1));
                pos += 1;
                continue;
            }
            ')' => {
                tokens.push(Token::new(TokenKind::CloseParen, ")", pos, pos + 1));
                pos += 1;
                continue;
            }
            '#' => {
                let body_len = rest[1..]
                    .char_indices()
                    .find(|(_, ch)| !is_ident_char(*ch))
                    .map(|(i, _)| i)
                    .unwrap_or(rest.len() - 1);
                let len = 1 + body_len;
                tokens.push(Token::new(TokenKind::Hash, &rest[..len], pos, pos + len));
                pos += len;
                continue;
            }
            _ => {}
        }

        if starts_number(rest) {
            if let Ok((after, value)) = number(rest) {
                let num_len = rest.len() - after.len();
                if after.starts_with('%') {
                    let len = num_len + 1;
                    tokens.push(
                        Token::new(TokenKind::Percentage, &rest[..len], pos, pos + len)
                            .with_data(TokenData::Percentage { value }),
                    );
                    pos += len;
                    continue;
                }
                if starts_ident(after) {
                    let (after_unit, unit) = identifier(after).unwrap_or((after, ""));
                    let len = rest.len() - after_unit.len();
                    tokens.push(
                        Token::new(TokenKind::Dimension, &rest[..len], pos, pos + len).with_data(
                            TokenData::Dimension {
                                value,
                                unit: unit.to_string(),
                            },
                        ),
                    );
                    pos += len;
                    continue;
                }
                tokens.push(
                    Token::new(TokenKind::Number, &rest[..num_len], pos, pos + num_len)
                        .with_data(TokenData::Number { value }),
                );
                pos += num_len;
                continue;
            }
        }

        if starts_ident(rest) {
            if let Ok((after, ident)) = identifier(rest) {
                let len = ident.len();
                if after.starts_with('(') {
                    tokens.push(Token::new(
                        TokenKind::Function,
                        &rest[..len + 1],
                        pos,
                        pos + len + 1,
                    ));
                    pos += len + 1;
                    continue;
                }
                tokens.push(Token::new(TokenKind::Ident, ident, pos, pos + len));
                pos += len;
                continue;
            }
        }

        let len = c.len_utf8();
        tokens.push(
            Token::new(TokenKind::Delim, &rest[..len], pos, pos + len)
                .with_data(TokenData::Delim { ch: c }),
        );
        pos += len;
    }

    tokens.push(Token::new(TokenKind::Eof, "", input.len(), input.len()));
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_tokenize_modern_rgb() {
        assert_eq!(
            kinds("rgb(255 0 0 / 50%)"),
            vec![
                TokenKind::Function,
                TokenKind::Number,
                TokenKind::Whitespace,
                TokenKind::Number,
                TokenKind::Whitespace,
                TokenKind::Number,
                TokenKind::Whitespace,
                TokenKind::Delim,
                TokenKind::Whitespace,
                TokenKind::Percentage,
                TokenKind::CloseParen,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_tokenize_dimension() {
        let tokens = tokenize("-90deg");
        assert_eq!(tokens[0].kind, TokenKind::Dimension);
        assert_eq!(tokens[0].number_value(), Some(-90.0));
        assert_eq!(tokens[0].unit(), Some("deg"));
    }

    #[test]
    fn test_tokenize_custom_property_name() {
        let tokens = tokenize("var(--main-color)");
        assert_eq!(tokens[0].kind, TokenKind::Function);
        assert_eq!(tokens[0].function_name(), Some("var"));
        assert_eq!(tokens[1].kind, TokenKind::Ident);
        assert_eq!(tokens[1].raw, "--main-color");
    }

    #[test]
    fn test_tokenize_hash_and_comment() {
        let tokens = tokenize("#ff0000 /* red */");
        assert_eq!(tokens[0].kind, TokenKind::Hash);
        assert_eq!(tokens[0].raw, "#ff0000");
        assert_eq!(tokens[2].kind, TokenKind::Comment);
    }

    #[test]
    fn test_tokenize_scientific_notation() {
        let tokens = tokenize("1e2");
        assert_eq!(tokens[0].kind, TokenKind::Number);
        assert_eq!(tokens[0].number_value(), Some(100.0));
    }

    #[test]
    fn test_offsets_cover_input() {
        let input = "hsl(120deg, 50%, 25%)";
        let tokens = tokenize(input);
        assert_eq!(tokens.last().unwrap().kind, TokenKind::Eof);
        let mut expected = 0;
        for token in &tokens {
            assert_eq!(token.start, expected);
            expected = token.end;
        }
        assert_eq!(expected, input.len());
    }
}
