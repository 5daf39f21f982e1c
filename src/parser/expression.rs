//! Expression parser for trc.
//!
//! Precedence, lowest to highest:
//! assignment -> or -> and -> equality -> comparison -> term -> factor
//! -> unary -> call -> primary

use super::{AssignTarget, Expr, LiteralValue, Parser};
use crate::diagnostics::codes;
use crate::lexer::{Token, TokenKind, Type};

/// Trait extension for expression parsing
pub trait ExpressionParser {
    fn expression(&mut self) -> Option<Expr>;
}

impl<'a> ExpressionParser for Parser<'a> {
    fn expression(&mut self) -> Option<Expr> {
        self.parse_assignment()
    }
}

impl<'a> Parser<'a> {
    /// Parse assignment (lowest precedence). Compound assignments and
    /// increments are desugared here, once, into a `Binary` built from
    /// the compound token's base operator.
    fn parse_assignment(&mut self) -> Option<Expr> {
        let expr = self.parse_or()?;

        if self.match_token(TokenKind::PlusEqual)
            || self.match_token(TokenKind::MinusEqual)
            || self.match_token(TokenKind::StarEqual)
            || self.match_token(TokenKind::SlashEqual)
        {
            let operator = base_operator(self.previous());
            let rhs = self.parse_assignment()?;
            let value = Expr::Binary {
                left: Box::new(expr.clone()),
                operator,
                right: Box::new(rhs),
            };
            return self.assign(expr, value);
        }

        if self.match_token(TokenKind::PlusPlus) || self.match_token(TokenKind::MinusMinus) {
            let operator = base_operator(self.previous());
            let value = Expr::Binary {
                left: Box::new(expr.clone()),
                operator,
                right: Box::new(Expr::Literal(LiteralValue::Number("1".to_string()))),
            };
            return self.assign(expr, value);
        }

        if self.match_token(TokenKind::Equal) {
            let value = self.parse_assignment()?;
            return self.assign(expr, value);
        }

        Some(expr)
    }

    /// Validate the left side of an assignment: only a variable or an
    /// array element may be assigned to
    fn assign(&mut self, target: Expr, value: Expr) -> Option<Expr> {
        let target = match target {
            Expr::Variable(name) => AssignTarget::Variable(name),
            Expr::ArrayAccess { name, index } => AssignTarget::Index { name, index },
            _ => {
                self.error_at_current(codes::INVALID_ASSIGN_TARGET, "Invalid assignment target.");
                return None;
            }
        };

        Some(Expr::Assign {
            target,
            value: Box::new(value),
        })
    }

    fn parse_or(&mut self) -> Option<Expr> {
        let mut expr = self.parse_and()?;

        while self.match_token(TokenKind::Or) {
            let operator = self.previous().clone();
            let right = self.parse_and()?;
            expr = Expr::Logical {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }

        Some(expr)
    }

    fn parse_and(&mut self) -> Option<Expr> {
        let mut expr = self.parse_equality()?;

        while self.match_token(TokenKind::And) {
            let operator = self.previous().clone();
            let right = self.parse_equality()?;
            expr = Expr::Logical {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }

        Some(expr)
    }

    fn parse_equality(&mut self) -> Option<Expr> {
        let mut expr = self.parse_comparison()?;

        while self.match_token(TokenKind::EqualEqual) || self.match_token(TokenKind::BangEqual) {
            let operator = self.previous().clone();
            let right = self.parse_comparison()?;
            expr = Expr::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }

        Some(expr)
    }

    fn parse_comparison(&mut self) -> Option<Expr> {
        let mut expr = self.parse_term()?;

        while self.match_token(TokenKind::Greater)
            || self.match_token(TokenKind::GreaterEqual)
            || self.match_token(TokenKind::Less)
            || self.match_token(TokenKind::LessEqual)
        {
            let operator = self.previous().clone();
            let right = self.parse_term()?;
            expr = Expr::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }

        Some(expr)
    }

    fn parse_term(&mut self) -> Option<Expr> {
        let mut expr = self.parse_factor()?;

        while self.match_token(TokenKind::Minus) || self.match_token(TokenKind::Plus) {
            let operator = self.previous().clone();
            let right = self.parse_factor()?;
            expr = Expr::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }

        Some(expr)
    }

    fn parse_factor(&mut self) -> Option<Expr> {
        let mut expr = self.parse_unary()?;

        while self.match_token(TokenKind::Slash)
            || self.match_token(TokenKind::Star)
            || self.match_token(TokenKind::Percent)
        {
            let operator = self.previous().clone();
            let right = self.parse_unary()?;
            expr = Expr::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }

        Some(expr)
    }

    fn parse_unary(&mut self) -> Option<Expr> {
        if self.match_token(TokenKind::Bang) || self.match_token(TokenKind::Minus) {
            let operator = self.previous().clone();
            let operand = self.parse_unary()?;
            return Some(Expr::Unary {
                operator,
                operand: Box::new(operand),
            });
        }

        self.parse_call()
    }

    /// A primary followed by zero or more argument lists
    fn parse_call(&mut self) -> Option<Expr> {
        let mut expr = self.parse_primary()?;

        while self.match_token(TokenKind::LeftParen) {
            expr = self.finish_call(expr)?;
        }

        Some(expr)
    }

    fn finish_call(&mut self, callee: Expr) -> Option<Expr> {
        let mut args = Vec::new();

        if !self.check(TokenKind::RightParen) {
            loop {
                if args.len() >= 255 {
                    self.error_at_current(
                        codes::TOO_MANY_ARGUMENTS,
                        "Cannot have more than 255 arguments.",
                    );
                    return None;
                }
                args.push(self.expression()?);
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }

        let paren = self
            .expect(TokenKind::RightParen, "Expect ')' after arguments.")?
            .clone();

        Some(Expr::Call {
            callee: Box::new(callee),
            paren,
            args,
        })
    }

    fn parse_primary(&mut self) -> Option<Expr> {
        if self.match_token(TokenKind::False) {
            return Some(Expr::Literal(LiteralValue::Bool(false)));
        }
        if self.match_token(TokenKind::True) {
            return Some(Expr::Literal(LiteralValue::Bool(true)));
        }
        if self.match_token(TokenKind::Null) {
            return Some(Expr::Literal(LiteralValue::Null));
        }

        // `[expr]` - an array literal carrying only a size expression
        if self.match_token(TokenKind::LeftBracket) {
            let size = self.expression()?;
            self.expect(TokenKind::RightBracket, "Expect ']' after expression.")?;
            return Some(Expr::ArrayLiteral {
                elements: Vec::new(),
                element_type: Type::Int,
                size: Box::new(size),
            });
        }

        if self.match_token(TokenKind::Number) {
            return Some(Expr::Literal(LiteralValue::Number(literal_text(
                self.previous(),
            ))));
        }
        if self.match_token(TokenKind::String) {
            return Some(Expr::Literal(LiteralValue::Str(literal_text(
                self.previous(),
            ))));
        }

        if self.match_token(TokenKind::Identifier) {
            let name = self.previous().clone();
            if self.match_token(TokenKind::LeftBracket) {
                let index = self.expression()?;
                self.expect(TokenKind::RightBracket, "Expect ']' after expression.")?;
                return Some(Expr::ArrayAccess {
                    name,
                    index: Box::new(index),
                });
            }
            return Some(Expr::Variable(name));
        }

        if self.match_token(TokenKind::LeftParen) {
            let expr = self.expression()?;
            self.expect(TokenKind::RightParen, "Expect ')' after expression.")?;
            return Some(Expr::Grouping(Box::new(expr)));
        }

        self.error_at_current(codes::EXPECTED_EXPRESSION, "Expect expression.");
        None
    }
}

/// Underlying binary operator implied by a compound-assignment or
/// increment/decrement token
fn base_operator(token: &Token) -> Token {
    match token.kind {
        TokenKind::PlusPlus | TokenKind::PlusEqual => Token::synthetic(TokenKind::Plus, "+"),
        TokenKind::MinusMinus | TokenKind::MinusEqual => Token::synthetic(TokenKind::Minus, "-"),
        TokenKind::StarEqual => Token::synthetic(TokenKind::Star, "*"),
        TokenKind::SlashEqual => Token::synthetic(TokenKind::Slash, "/"),
        // parse_assignment only calls this for the four kinds above
        _ => unreachable!("token has no base operation: {:?}", token.kind),
    }
}

fn literal_text(token: &Token) -> String {
    token.literal.clone().unwrap_or_default()
}
