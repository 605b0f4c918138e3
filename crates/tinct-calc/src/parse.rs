//! Expression grammar for calc() and the other CSS math functions.
//!
//! Standard precedence climbing over the token stream: a sum of products of
//! unary-signed atoms. Function calls take comma-separated sums as arguments.
//! Syntax problems (unbalanced parens, missing operands, unknown functions)
//! are hard errors carrying the source text; unit and type problems are left
//! to the evaluator, which reports them as unresolvable.

use tinct_core::{ColorError, Token, TokenData, TokenKind};

/// A parsed math expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    /// Raw percent value: `50%` is 50.0.
    Percent(f64),
    /// A number with a unit, unit lowercased.
    Dimension(f64, String),
    /// A keyword: math constant or rounding strategy.
    Ident(String),
    Neg(Box<Expr>),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    Call(String, Vec<Expr>),
}

const MATH_FUNCTIONS: &[&str] = &[
    "calc", "min", "max", "clamp", "abs", "sign", "sin", "cos", "tan", "asin", "acos", "atan",
    "atan2", "pow", "sqrt", "hypot", "log", "exp", "round", "mod", "rem",
];

/// Whether a function name is one of the CSS math functions.
pub fn is_math_function(name: &str) -> bool {
    MATH_FUNCTIONS.iter().any(|f| name.eq_ignore_ascii_case(f))
}

/// Parse a complete math expression; trailing tokens are a syntax error.
pub fn parse_expression(tokens: &[Token], source: &str) -> Result<Expr, ColorError> {
    let mut parser = Parser {
        tokens: tokens.iter().filter(|t| !t.is_trivia()).collect(),
        pos: 0,
        source,
    };
    let expr = parser.parse_sum()?;
    parser.expect_end()?;
    Ok(expr)
}

struct Parser<'a> {
    tokens: Vec<&'a Token>,
    pos: usize,
    source: &'a str,
}

impl<'a> Parser<'a> {
    fn error(&self) -> ColorError {
        ColorError::syntax(self.source)
    }

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<&'a Token> {
        let tok = self.peek()?;
        self.pos += 1;
        Some(tok)
    }

    fn peek_delim(&self) -> Option<char> {
        match self.peek()?.data {
            Some(TokenData::Delim { ch }) => Some(ch),
            _ => None,
        }
    }

    fn expect_end(&self) -> Result<(), ColorError> {
        match self.peek() {
            None => Ok(()),
            Some(tok) if tok.kind == TokenKind::Eof => Ok(()),
            Some(_) => Err(self.error()),
        }
    }

    fn parse_sum(&mut self) -> Result<Expr, ColorError> {
        let mut left = self.parse_product()?;
        loop {
            match self.peek_delim() {
                Some('+') => {
                    self.pos += 1;
                    let right = self.parse_product()?;
                    left = Expr::Add(Box::new(left), Box::new(right));
                }
                Some('-') => {
                    self.pos += 1;
                    let right = self.parse_product()?;
                    left = Expr::Sub(Box::new(left), Box::new(right));
                }
                _ => return Ok(left),
            }
        }
    }

    fn parse_product(&mut self) -> Result<Expr, ColorError> {
        let mut left = self.parse_unary()?;
        loop {
            match self.peek_delim() {
                Some('*') => {
                    self.pos += 1;
                    let right = self.parse_unary()?;
                    left = Expr::Mul(Box::new(left), Box::new(right));
                }
                Some('/') => {
                    self.pos += 1;
                    let right = self.parse_unary()?;
                    left = Expr::Div(Box::new(left), Box::new(right));
                }
                _ => return Ok(left),
            }
        }
    }

    fn parse_unary(&mut self) -> Result<Expr, ColorError> {
        match self.peek_delim() {
            Some('-') => {
                self.pos += 1;
                Ok(Expr::Neg(Box::new(self.parse_unary()?)))
            }
            Some('+') => {
                self.pos += 1;
                self.parse_unary()
            }
            _ => self.parse_atom(),
        }
    }

    fn parse_atom(&mut self) -> Result<Expr, ColorError> {
        let tok = self.bump().ok_or_else(|| self.error())?;
        match tok.kind {
            TokenKind::Number => tok.number_value().map(Expr::Number).ok_or_else(|| self.error()),
            TokenKind::Percentage => {
                tok.number_value().map(Expr::Percent).ok_or_else(|| self.error())
            }
            TokenKind::Dimension => {
                let value = tok.number_value().ok_or_else(|| self.error())?;
                let unit = tok.unit().ok_or_else(|| self.error())?;
                Ok(Expr::Dimension(value, unit.to_ascii_lowercase()))
            }
            TokenKind::Ident => Ok(Expr::Ident(tok.raw.to_ascii_lowercase())),
            TokenKind::OpenParen => {
                let inner = self.parse_sum()?;
                self.expect_close_paren()?;
                Ok(inner)
            }
            TokenKind::Function => {
                let name = tok
                    .function_name()
                    .map(str::to_ascii_lowercase)
                    .ok_or_else(|| self.error())?;
                if !is_math_function(&name) {
                    return Err(self.error());
                }
                self.parse_call(name)
            }
            _ => Err(self.error()),
        }
    }

    fn parse_call(&mut self, name: String) -> Result<Expr, ColorError> {
        let mut args = vec![self.parse_sum()?];
        while matches!(self.peek().map(|t| t.kind), Some(TokenKind::Comma)) {
            self.pos += 1;
            args.push(self.parse_sum()?);
        }
        self.expect_close_paren()?;
        Ok(Expr::Call(name, args))
    }

    fn expect_close_paren(&mut self) -> Result<(), ColorError> {
        match self.bump() {
            Some(tok) if tok.kind == TokenKind::CloseParen => Ok(()),
            _ => Err(self.error()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tinct_parser::tokenize;

    fn parse(input: &str) -> Result<Expr, ColorError> {
        parse_expression(&tokenize(input), input)
    }

    #[test]
    fn test_sum_precedence() {
        let expr = parse("calc(1 + 2 * 3)").unwrap();
        let Expr::Call(name, args) = expr else { panic!() };
        assert_eq!(name, "calc");
        assert_eq!(
            args[0],
            Expr::Add(
                Box::new(Expr::Number(1.0)),
                Box::new(Expr::Mul(Box::new(Expr::Number(2.0)), Box::new(Expr::Number(3.0)))),
            )
        );
    }

    #[test]
    fn test_nested_parens() {
        let expr = parse("calc((1 + 2) * 3)").unwrap();
        let Expr::Call(_, args) = expr else { panic!() };
        assert!(matches!(args[0], Expr::Mul(_, _)));
    }

    #[test]
    fn test_dimension_unit_lowercased() {
        let expr = parse("calc(100EM)").unwrap();
        let Expr::Call(_, args) = expr else { panic!() };
        assert_eq!(args[0], Expr::Dimension(100.0, "em".to_string()));
    }

    #[test]
    fn test_unbalanced_parens_error() {
        assert!(parse("calc(1 + (2").is_err());
        assert!(parse("calc(1))").is_err());
    }

    #[test]
    fn test_missing_operand_error() {
        assert!(parse("calc(1 +)").is_err());
        assert!(parse("calc(* 2)").is_err());
    }

    #[test]
    fn test_unknown_function_error() {
        assert!(parse("foo(1)").is_err());
    }

    #[test]
    fn test_call_args_split_on_commas() {
        let expr = parse("clamp(0%, 50% + 10%, 100%)").unwrap();
        let Expr::Call(name, args) = expr else { panic!() };
        assert_eq!(name, "clamp");
        assert_eq!(args.len(), 3);
    }
}
