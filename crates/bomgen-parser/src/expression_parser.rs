//! Expression parser
//!
//! Parses condition and quantity strings into Expression AST nodes.
//!
//! Supported syntax, lowest precedence first:
//! - Conditional: `0 if not needs_cables else num_cables * 2`
//! - Logical: `or` / `||`, `and` / `&&`, `not` / `!`
//! - Comparison (non-chaining): `==`, `!=`, `<`, `<=`, `>`, `>=`
//! - Additive: `+`, `-`
//! - Multiplicative: `*`, `/`, `%`
//! - Unary minus: `-x`
//! - Primaries: integers, floats, quoted strings, `True`/`False`, variable
//!   names and parenthesized expressions
//!
//! Nesting (parentheses, `not`, unary minus, chained conditionals) is limited to
//! [`MAX_NESTING`] levels and input to [`MAX_TOKENS`] tokens, so evaluation of
//! the resulting tree stays within a small stack.

use crate::error::{ParseError, Result};
use crate::lexer::{Lexer, SpannedToken, Token};
use bomgen_core::ast::{Expression, Operator, UnaryOperator};
use bomgen_core::Value;

/// Deepest allowed nesting of sub-expressions
pub const MAX_NESTING: usize = 64;

/// Longest accepted expression, in tokens
pub const MAX_TOKENS: usize = 1024;

/// Expression parser
pub struct ExpressionParser {
    tokens: Vec<SpannedToken>,
    pos: usize,
    depth: usize,
}

impl ExpressionParser {
    /// Parse an expression from a string
    pub fn parse(input: &str) -> Result<Expression> {
        if input.trim().is_empty() {
            return Err(ParseError::invalid_expression("Empty expression", 0));
        }

        let tokens = Lexer::tokenize(input)?;
        if tokens.len() > MAX_TOKENS {
            return Err(ParseError::invalid_expression(
                "Expression is too long",
                tokens[MAX_TOKENS].position,
            ));
        }

        let mut parser = Self {
            tokens,
            pos: 0,
            depth: 0,
        };
        let expr = parser.parse_conditional()?;

        let trailing = parser.current();
        if trailing.token != Token::Eof {
            return Err(ParseError::invalid_expression(
                format!("Unexpected {}", trailing.token.describe()),
                trailing.position,
            ));
        }

        Ok(expr)
    }

    fn current(&self) -> &SpannedToken {
        // tokenize always ends with Eof, and the parser never advances past it
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Token {
        let token = self.current().token.clone();
        if token != Token::Eof {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if &self.current().token == expected {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: Token) -> Result<()> {
        if self.eat(&expected) {
            Ok(())
        } else {
            let found = self.current();
            Err(ParseError::invalid_expression(
                format!("Expected {}, found {}", expected.describe(), found.token.describe()),
                found.position,
            ))
        }
    }

    /// Run `parse` one nesting level deeper
    fn nested<T>(&mut self, parse: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if self.depth >= MAX_NESTING {
            return Err(ParseError::invalid_expression(
                "Expression is nested too deeply",
                self.current().position,
            ));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    /// conditional := or_expr ( "if" or_expr "else" conditional )?
    fn parse_conditional(&mut self) -> Result<Expression> {
        let then_expr = self.parse_or()?;
        if self.eat(&Token::If) {
            let condition = self.parse_or()?;
            self.expect(Token::Else)?;
            let else_expr = self.nested(Self::parse_conditional)?;
            return Ok(Expression::conditional(condition, then_expr, else_expr));
        }
        Ok(then_expr)
    }

    fn parse_or(&mut self) -> Result<Expression> {
        let mut left = self.parse_and()?;
        while self.eat(&Token::Or) {
            let right = self.parse_and()?;
            left = Expression::binary(left, Operator::Or, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expression> {
        let mut left = self.parse_not()?;
        while self.eat(&Token::And) {
            let right = self.parse_not()?;
            left = Expression::binary(left, Operator::And, right);
        }
        Ok(left)
    }

    fn parse_not(&mut self) -> Result<Expression> {
        if self.eat(&Token::Not) {
            let operand = self.nested(Self::parse_not)?;
            return Ok(Expression::unary(UnaryOperator::Not, operand));
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> Result<Expression> {
        let left = self.parse_additive()?;
        let op = match self.current().token {
            Token::EqEq => Operator::Eq,
            Token::NotEq => Operator::Ne,
            Token::Lt => Operator::Lt,
            Token::Le => Operator::Le,
            Token::Gt => Operator::Gt,
            Token::Ge => Operator::Ge,
            _ => return Ok(left),
        };
        self.advance();
        let right = self.parse_additive()?;

        let next = self.current();
        if matches!(
            next.token,
            Token::EqEq | Token::NotEq | Token::Lt | Token::Le | Token::Gt | Token::Ge
        ) {
            return Err(ParseError::invalid_expression(
                "Comparisons cannot be chained; combine them with 'and'",
                next.position,
            ));
        }

        Ok(Expression::binary(left, op, right))
    }

    fn parse_additive(&mut self) -> Result<Expression> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.current().token {
                Token::Plus => Operator::Add,
                Token::Minus => Operator::Sub,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            left = Expression::binary(left, op, right);
        }
    }

    fn parse_multiplicative(&mut self) -> Result<Expression> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.current().token {
                Token::Star => Operator::Mul,
                Token::Slash => Operator::Div,
                Token::Percent => Operator::Mod,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_unary()?;
            left = Expression::binary(left, op, right);
        }
    }

    fn parse_unary(&mut self) -> Result<Expression> {
        if self.eat(&Token::Minus) {
            let operand = self.nested(Self::parse_unary)?;
            return Ok(Expression::unary(UnaryOperator::Negate, operand));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expression> {
        let position = self.current().position;
        match self.advance() {
            Token::Integer(n) => Ok(Expression::Literal(Value::Integer(n))),
            Token::Float(x) => Ok(Expression::Literal(Value::Float(x))),
            Token::Str(s) => Ok(Expression::Literal(Value::String(s))),
            Token::True => Ok(Expression::Literal(Value::Boolean(true))),
            Token::False => Ok(Expression::Literal(Value::Boolean(false))),
            Token::Ident(name) => Ok(Expression::Variable(name)),
            Token::LParen => {
                let inner = self.nested(Self::parse_conditional)?;
                self.expect(Token::RParen)?;
                Ok(inner)
            }
            Token::Eof => Err(ParseError::invalid_expression(
                "Unexpected end of expression",
                position,
            )),
            other => Err(ParseError::invalid_expression(
                format!("Unexpected {}", other.describe()),
                position,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(name: &str) -> Expression {
        Expression::variable(name)
    }

    #[test]
    fn test_parse_number_literal() {
        assert_eq!(ExpressionParser::parse("42").unwrap(), Expression::literal(42));
        assert_eq!(ExpressionParser::parse("3.25").unwrap(), Expression::literal(3.25));
    }

    #[test]
    fn test_parse_boolean_literal() {
        assert_eq!(ExpressionParser::parse("True").unwrap(), Expression::literal(true));
        assert_eq!(ExpressionParser::parse("false").unwrap(), Expression::literal(false));
    }

    #[test]
    fn test_parse_variable() {
        assert_eq!(ExpressionParser::parse("num_racks").unwrap(), var("num_racks"));
    }

    #[test]
    fn test_multiplicative_binds_tighter_than_additive() {
        // a + b * 2  =>  a + (b * 2)
        let expr = ExpressionParser::parse("a + b * 2").unwrap();
        assert_eq!(
            expr,
            Expression::binary(
                var("a"),
                Operator::Add,
                Expression::binary(var("b"), Operator::Mul, Expression::literal(2)),
            )
        );
    }

    #[test]
    fn test_additive_is_left_associative() {
        // 10 - 3 - 2  =>  (10 - 3) - 2
        let expr = ExpressionParser::parse("10 - 3 - 2").unwrap();
        assert_eq!(
            expr,
            Expression::binary(
                Expression::binary(Expression::literal(10), Operator::Sub, Expression::literal(3)),
                Operator::Sub,
                Expression::literal(2),
            )
        );
    }

    #[test]
    fn test_comparison_is_below_arithmetic() {
        let expr = ExpressionParser::parse("num_racks * 2 > 4").unwrap();
        assert_eq!(
            expr,
            Expression::binary(
                Expression::binary(var("num_racks"), Operator::Mul, Expression::literal(2)),
                Operator::Gt,
                Expression::literal(4),
            )
        );
    }

    #[test]
    fn test_parentheses_override_precedence() {
        let expr = ExpressionParser::parse("(a + b) * c").unwrap();
        assert_eq!(
            expr,
            Expression::binary(
                Expression::binary(var("a"), Operator::Add, var("b")),
                Operator::Mul,
                var("c"),
            )
        );
    }

    #[test]
    fn test_unary_minus() {
        let expr = ExpressionParser::parse("-x * 2").unwrap();
        assert_eq!(
            expr,
            Expression::binary(
                Expression::unary(UnaryOperator::Negate, var("x")),
                Operator::Mul,
                Expression::literal(2),
            )
        );
    }

    #[test]
    fn test_logical_operators() {
        let expr = ExpressionParser::parse("a == 1 or b and not c").unwrap();
        assert_eq!(
            expr,
            Expression::binary(
                Expression::binary(var("a"), Operator::Eq, Expression::literal(1)),
                Operator::Or,
                Expression::binary(
                    var("b"),
                    Operator::And,
                    Expression::unary(UnaryOperator::Not, var("c")),
                ),
            )
        );

        assert_eq!(
            ExpressionParser::parse("a && b").unwrap(),
            ExpressionParser::parse("a and b").unwrap()
        );
    }

    #[test]
    fn test_conditional_expression() {
        let expr = ExpressionParser::parse("0 if not needs_cables else num_cables * 2").unwrap();
        assert_eq!(
            expr,
            Expression::conditional(
                Expression::unary(UnaryOperator::Not, var("needs_cables")),
                Expression::literal(0),
                Expression::binary(var("num_cables"), Operator::Mul, Expression::literal(2)),
            )
        );
    }

    #[test]
    fn test_display_reparses_to_same_tree() {
        let source = "0 if not (a or b) else -(x + 1) * 2 % 3";
        let expr = ExpressionParser::parse(source).unwrap();
        let reparsed = ExpressionParser::parse(&expr.to_string()).unwrap();
        assert_eq!(expr, reparsed);
    }

    #[test]
    fn test_syntax_errors() {
        assert!(matches!(
            ExpressionParser::parse(""),
            Err(ParseError::InvalidExpression { position: 0, .. })
        ));
        assert!(matches!(
            ExpressionParser::parse("num_cables *"),
            Err(ParseError::InvalidExpression { position: 12, .. })
        ));
        assert!(matches!(
            ExpressionParser::parse("(a + b"),
            Err(ParseError::InvalidExpression { .. })
        ));
        assert!(matches!(
            ExpressionParser::parse("a b"),
            Err(ParseError::InvalidExpression { position: 2, .. })
        ));
        assert!(ExpressionParser::parse("1 < x < 3").is_err());
        assert!(ExpressionParser::parse("x if y").is_err());
    }

    #[test]
    fn test_nesting_limit() {
        let within = format!("{}1{}", "(".repeat(MAX_NESTING), ")".repeat(MAX_NESTING));
        assert_eq!(ExpressionParser::parse(&within).unwrap(), Expression::literal(1));

        let deep = format!("{}1{}", "(".repeat(100), ")".repeat(100));
        match ExpressionParser::parse(&deep) {
            Err(ParseError::InvalidExpression { message, position }) => {
                assert_eq!(message, "Expression is nested too deeply");
                assert_eq!(position, MAX_NESTING + 1);
            }
            other => panic!("Expected nesting error, got {:?}", other),
        }

        let negations = format!("{}x", "not ".repeat(MAX_NESTING + 1));
        assert!(ExpressionParser::parse(&negations).is_err());
        let minuses = format!("{}1", "-".repeat(MAX_NESTING + 1));
        assert!(ExpressionParser::parse(&minuses).is_err());
    }

    #[test]
    fn test_token_limit() {
        let long = vec!["1"; MAX_TOKENS].join(" + ");
        assert!(matches!(
            ExpressionParser::parse(&long),
            Err(ParseError::InvalidExpression { ref message, .. }) if message == "Expression is too long"
        ));

        let short = vec!["1"; 100].join(" + ");
        assert!(ExpressionParser::parse(&short).is_ok());
    }
}
