//! Arithmetic evaluator
//!
//! Recursive descent over `+ - * /`, unary minus and parentheses. Nothing
//! else is accepted, so spoken input can never reach anything but arithmetic.

use crate::{Error, Result};

/// Deepest nesting of parentheses and unary signs accepted
const MAX_DEPTH: usize = 64;

/// Evaluate an arithmetic expression
///
/// # Errors
///
/// Returns error if the expression is malformed or divides by zero
pub fn evaluate(expression: &str) -> Result<f64> {
    let tokens = tokenize(expression)?;
    if tokens.is_empty() {
        return Err(Error::InvalidInput("empty expression".to_string()));
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let value = parser.expr()?;
    if parser.pos != parser.tokens.len() {
        return Err(Error::InvalidInput(format!(
            "unexpected input in expression: {expression}"
        )));
    }
    if !value.is_finite() {
        return Err(Error::InvalidInput("result is not a finite number".to_string()));
    }
    Ok(value)
}

/// Format a result the way it is spoken
///
/// Whole numbers drop the fraction; others keep up to four decimals.
#[must_use]
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        return format!("{value:.0}");
    }
    let text = format!("{value:.4}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Num(f64),
    Plus,
    Minus,
    Star,
    Slash,
    Open,
    Close,
}

fn tokenize(input: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        match c {
            ' ' | '\t' => {
                chars.next();
            }
            '+' | '-' | '*' | '/' | '(' | ')' => {
                chars.next();
                tokens.push(match c {
                    '+' => Token::Plus,
                    '-' => Token::Minus,
                    '*' => Token::Star,
                    '/' => Token::Slash,
                    '(' => Token::Open,
                    _ => Token::Close,
                });
            }
            c if c.is_ascii_digit() || c == '.' => {
                let mut end = start;
                while let Some(&(i, d)) = chars.peek() {
                    if d.is_ascii_digit() || d == '.' {
                        end = i + d.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                let literal = &input[start..end];
                let value = literal
                    .parse()
                    .map_err(|_| Error::InvalidInput(format!("bad number: {literal}")))?;
                tokens.push(Token::Num(value));
            }
            other => {
                return Err(Error::InvalidInput(format!(
                    "unsupported character in expression: {other}"
                )));
            }
        }
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.peek();
        self.pos += 1;
        token
    }

    // expr := term (('+' | '-') term)*
    fn expr(&mut self) -> Result<f64> {
        let mut value = self.term()?;
        while let Some(op @ (Token::Plus | Token::Minus)) = self.peek() {
            self.pos += 1;
            let rhs = self.term()?;
            value = if op == Token::Plus { value + rhs } else { value - rhs };
        }
        Ok(value)
    }

    // term := factor (('*' | '/') factor)*
    fn term(&mut self) -> Result<f64> {
        let mut value = self.factor()?;
        while let Some(op @ (Token::Star | Token::Slash)) = self.peek() {
            self.pos += 1;
            let rhs = self.factor()?;
            if op == Token::Star {
                value *= rhs;
            } else {
                if rhs == 0.0 {
                    return Err(Error::InvalidInput("division by zero".to_string()));
                }
                value /= rhs;
            }
        }
        Ok(value)
    }

    fn factor(&mut self) -> Result<f64> {
        if self.depth >= MAX_DEPTH {
            return Err(Error::InvalidInput("expression too deeply nested".to_string()));
        }
        self.depth += 1;
        let value = self.unary();
        self.depth -= 1;
        value
    }

    // factor := '-' factor | '+' factor | number | '(' expr ')'
    fn unary(&mut self) -> Result<f64> {
        match self.advance() {
            Some(Token::Minus) => Ok(-self.factor()?),
            Some(Token::Plus) => self.factor(),
            Some(Token::Num(n)) => Ok(n),
            Some(Token::Open) => {
                let value = self.expr()?;
                match self.advance() {
                    Some(Token::Close) => Ok(value),
                    _ => Err(Error::InvalidInput("unbalanced parentheses".to_string())),
                }
            }
            _ => Err(Error::InvalidInput("incomplete expression".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(expr: &str) -> f64 {
        evaluate(expr).unwrap()
    }

    #[test]
    fn test_precedence() {
        assert!((eval("2 + 3 * 4") - 14.0).abs() < f64::EPSILON);
        assert!((eval("(2 + 3) * 4") - 20.0).abs() < f64::EPSILON);
        assert!((eval("12 / 4 + 1") - 4.0).abs() < f64::EPSILON);
        assert!((eval("10 - 4 - 3") - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unary_and_decimals() {
        assert!((eval("-3 + 5") - 2.0).abs() < f64::EPSILON);
        assert!((eval("2.5 * 2") - 5.0).abs() < f64::EPSILON);
        assert!((eval("-(2 + 3)") + 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(evaluate("").is_err());
        assert!(evaluate("2 +").is_err());
        assert!(evaluate("(2 + 3").is_err());
        assert!(evaluate("2 3").is_err());
        assert!(evaluate("1 / 0").is_err());
        assert!(evaluate("2 ^ 3").is_err());
        assert!(evaluate("1..2").is_err());
    }

    #[test]
    fn test_nesting_is_bounded() {
        let nested = |n: usize| format!("{}1{}", "(".repeat(n), ")".repeat(n));
        assert!((eval(&nested(20)) - 1.0).abs() < f64::EPSILON);

        let deep = evaluate(&nested(200_000)).unwrap_err();
        assert!(deep.to_string().contains("too deeply nested"), "{deep}");

        let signs = format!("{}1", "-".repeat(200_000));
        assert!(matches!(evaluate(&signs), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(100.0), "100");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(1.0 / 3.0), "0.3333");
        assert_eq!(format_number(-4.0), "-4");
    }
}
