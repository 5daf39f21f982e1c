//! Parser module for building AST from tokens.

mod ast;
mod expression;
mod statement;

pub use ast::*;
pub use expression::ExpressionParser;
pub use statement::StatementParser;

use crate::diagnostics::{codes, Diagnostic, DiagnosticReporter};
use crate::lexer::{Token, TokenKind};

/// Recursive descent parser for trc
pub struct Parser<'a> {
    tokens: Vec<Token>,
    current: usize,
    reporter: &'a mut DiagnosticReporter,
    panic_mode: bool,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: Vec<Token>, reporter: &'a mut DiagnosticReporter) -> Self {
        Self {
            tokens,
            current: 0,
            reporter,
            panic_mode: false,
        }
    }

    /// Parse the entire program: a sequence of top-level statements.
    /// A parse error abandons the current statement and resynchronizes,
    /// so one malformed statement does not hide later diagnostics.
    pub fn parse(&mut self) -> Vec<Stmt> {
        let mut statements = Vec::new();

        while !self.is_at_end() {
            match self.declaration() {
                Some(stmt) => statements.push(stmt),
                None => self.synchronize(),
            }
        }

        statements
    }

    pub(crate) fn declaration(&mut self) -> Option<Stmt> {
        if self.match_token(TokenKind::Func) {
            return self.func_declaration();
        }
        if self.match_token(TokenKind::Let) {
            return self.let_declaration();
        }
        self.statement()
    }

    /// `func NAME ( IDENT* ) -> TYPE { stmt* }` - parameters carry no
    /// types in this grammar
    fn func_declaration(&mut self) -> Option<Stmt> {
        let name = self
            .expect(TokenKind::Identifier, "Expect function name.")?
            .clone();
        self.expect(TokenKind::LeftParen, "Expect '(' after function name.")?;

        let mut params = Vec::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                if params.len() >= 255 {
                    self.error_at_current(
                        codes::TOO_MANY_PARAMETERS,
                        "Cannot have more than 255 parameters.",
                    );
                    return None;
                }
                params.push(
                    self.expect(TokenKind::Identifier, "Expect parameter name.")?
                        .clone(),
                );
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }

        self.expect(TokenKind::RightParen, "Expect ')' after parameters.")?;
        self.expect(TokenKind::Arrow, "Expect '->' before function body.")?;
        let return_type = self
            .expect_kind(TokenKind::Type, codes::EXPECTED_TYPE, "Expect return type after '->'.")?
            .clone();

        self.expect(TokenKind::LeftBrace, "Expect '{' before function body.")?;
        let body = self.block()?;

        Some(Stmt::Func {
            name,
            params,
            body,
            return_type,
        })
    }

    /// `let NAME : TYPE (= expr)? ;`
    pub(crate) fn let_declaration(&mut self) -> Option<Stmt> {
        let name = self
            .expect(TokenKind::Identifier, "Expect variable name.")?
            .clone();
        self.expect(TokenKind::Colon, "Expect ':' after variable name.")?;
        let declared_type = self
            .expect_kind(TokenKind::Type, codes::EXPECTED_TYPE, "Expect type after ':'.")?
            .clone();

        let initializer = if self.match_token(TokenKind::Equal) {
            Some(self.expression()?)
        } else {
            None
        };

        self.expect(TokenKind::Semicolon, "Expect ';' after variable declaration.")?;

        Some(Stmt::Let {
            name,
            declared_type,
            initializer,
        })
    }

    /// Parse the statements of a `{ ... }` body. The opening brace has
    /// already been consumed. Erroneous statements are skipped after
    /// resynchronization, like at the top level.
    pub(crate) fn block(&mut self) -> Option<Vec<Stmt>> {
        let mut statements = Vec::new();

        while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
            match self.declaration() {
                Some(stmt) => statements.push(stmt),
                None => self.synchronize(),
            }
        }

        self.expect(TokenKind::RightBrace, "Expect '}' after block.")?;
        Some(statements)
    }

    // === Helper methods ===

    pub(crate) fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    pub(crate) fn previous(&self) -> &Token {
        &self.tokens[self.current - 1]
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    pub(crate) fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    pub(crate) fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(&mut self, kind: TokenKind, message: &str) -> Option<&Token> {
        self.expect_kind(kind, codes::EXPECTED_TOKEN, message)
    }

    pub(crate) fn expect_kind(
        &mut self,
        kind: TokenKind,
        code: &str,
        message: &str,
    ) -> Option<&Token> {
        if self.check(kind) {
            Some(self.advance())
        } else {
            self.error_at_current(code, message);
            None
        }
    }

    pub(crate) fn error_at_current(&mut self, code: &str, message: &str) {
        if self.panic_mode {
            return;
        }
        self.panic_mode = true;

        let (offset, length) = {
            let token = self.peek();
            (token.offset, token.length.max(1))
        };
        self.reporter
            .report(Diagnostic::error(code, message), offset, length);
    }

    /// Error recovery: discard tokens until just past a `;` or just
    /// before a token that begins a new statement, then resume
    fn synchronize(&mut self) {
        self.panic_mode = false;
        self.advance();

        while !self.is_at_end() {
            if self.previous().kind == TokenKind::Semicolon {
                return;
            }

            match self.peek().kind {
                TokenKind::Func
                | TokenKind::Let
                | TokenKind::If
                | TokenKind::While
                | TokenKind::For
                | TokenKind::Return => return,
                _ => {}
            }

            self.advance();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticReporter;
    use crate::lexer::{Scanner, Type};
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> (Vec<Stmt>, DiagnosticReporter) {
        let mut reporter = DiagnosticReporter::new("test.trc", source);
        let tokens = Scanner::new(source, &mut reporter).scan_tokens();
        let statements = Parser::new(tokens, &mut reporter).parse();
        (statements, reporter)
    }

    fn parse_ok(source: &str) -> Vec<Stmt> {
        let (statements, reporter) = parse(source);
        assert!(
            !reporter.has_errors(),
            "unexpected parse errors: {:?}",
            reporter.diagnostics()
        );
        statements
    }

    #[test]
    fn parses_func_declaration() {
        let stmts = parse_ok("func add(a, b) -> int { return a + b; }");
        match &stmts[0] {
            Stmt::Func {
                name,
                params,
                body,
                return_type,
            } => {
                assert_eq!(name.lexeme, "add");
                assert_eq!(params.len(), 2);
                assert_eq!(return_type.ty, Some(Type::Int));
                assert_eq!(body.len(), 1);
            }
            other => panic!("expected func, got {:?}", other),
        }
    }

    #[test]
    fn parses_let_with_and_without_initializer() {
        let stmts = parse_ok("let x: int = 5; let y: str;");
        assert!(matches!(
            &stmts[0],
            Stmt::Let {
                initializer: Some(_),
                ..
            }
        ));
        assert!(matches!(&stmts[1], Stmt::Let { initializer: None, .. }));
    }

    #[test]
    fn binary_precedence_factor_binds_tighter_than_term() {
        let stmts = parse_ok("1 + 2 * 3;");
        let Stmt::Expression(Expr::Binary { left, operator, right }) = &stmts[0] else {
            panic!("expected binary expression");
        };
        assert_eq!(operator.lexeme, "+");
        assert_eq!(**left, Expr::Literal(LiteralValue::Number("1".into())));
        assert!(matches!(**right, Expr::Binary { .. }));
    }

    #[test]
    fn logical_operators_nest_or_above_and() {
        let stmts = parse_ok("a or b and c;");
        let Stmt::Expression(Expr::Logical { operator, right, .. }) = &stmts[0] else {
            panic!("expected logical expression");
        };
        assert_eq!(operator.kind, TokenKind::Or);
        assert!(matches!(**right, Expr::Logical { .. }));
    }

    #[test]
    fn compound_assignment_desugars_to_base_operator() {
        let stmts = parse_ok("x += 1;");
        let Stmt::Expression(Expr::Assign { target, value }) = &stmts[0] else {
            panic!("expected assignment");
        };
        assert!(matches!(target, AssignTarget::Variable(t) if t.lexeme == "x"));
        let Expr::Binary { operator, right, .. } = value.as_ref() else {
            panic!("expected desugared binary value");
        };
        assert_eq!(operator.kind, TokenKind::Plus);
        assert_eq!(**right, Expr::Literal(LiteralValue::Number("1".into())));
    }

    #[test]
    fn increment_desugars_to_plus_one() {
        let stmts = parse_ok("x++;");
        let Stmt::Expression(Expr::Assign { value, .. }) = &stmts[0] else {
            panic!("expected assignment");
        };
        let Expr::Binary { operator, right, .. } = value.as_ref() else {
            panic!("expected desugared binary value");
        };
        assert_eq!(operator.kind, TokenKind::Plus);
        assert_eq!(**right, Expr::Literal(LiteralValue::Number("1".into())));
    }

    #[test]
    fn array_element_is_a_valid_assignment_target() {
        let stmts = parse_ok("a[0] = 1;");
        let Stmt::Expression(Expr::Assign { target, .. }) = &stmts[0] else {
            panic!("expected assignment");
        };
        assert!(matches!(target, AssignTarget::Index { name, .. } if name.lexeme == "a"));
    }

    #[test]
    fn invalid_assignment_target_is_a_parse_error() {
        let (_, reporter) = parse("1 = 2;");
        assert!(reporter
            .diagnostics()
            .iter()
            .any(|d| d.message == "Invalid assignment target."));
    }

    #[test]
    fn call_with_non_name_target_still_parses() {
        let stmts = parse_ok("f(1)(2);");
        let Stmt::Expression(Expr::Call { callee, .. }) = &stmts[0] else {
            panic!("expected call");
        };
        assert!(matches!(**callee, Expr::Call { .. }));
    }

    #[test]
    fn array_literal_records_size_and_empty_elements() {
        let stmts = parse_ok("let a: int[] = [10];");
        let Stmt::Let {
            initializer: Some(Expr::ArrayLiteral {
                elements,
                element_type,
                size,
            }),
            ..
        } = &stmts[0]
        else {
            panic!("expected array literal initializer");
        };
        assert!(elements.is_empty());
        assert_eq!(*element_type, Type::Int);
        assert_eq!(**size, Expr::Literal(LiteralValue::Number("10".into())));
    }

    #[test]
    fn empty_for_desugars_to_while_true() {
        let desugared = parse_ok("for (;;) { 1; }");
        let explicit = parse_ok("while (true) { 1; }");
        assert_eq!(desugared, explicit);
    }

    #[test]
    fn full_for_desugars_to_init_while_increment() {
        let stmts = parse_ok("for (let i: int = 0; i < 10; i++) { f(i); }");
        // Block[init, While(cond, Block[body, Expression(incr)])]
        let Stmt::Block(outer) = &stmts[0] else {
            panic!("expected outer block");
        };
        assert!(matches!(&outer[0], Stmt::Let { .. }));
        let Stmt::While { body, .. } = &outer[1] else {
            panic!("expected while");
        };
        let Stmt::Block(inner) = body.as_ref() else {
            panic!("expected inner block");
        };
        assert_eq!(inner.len(), 2);
        assert!(matches!(&inner[1], Stmt::Expression(Expr::Assign { .. })));
    }

    #[test]
    fn parse_error_does_not_hide_later_declarations() {
        let (stmts, reporter) = parse("let x: = 5;\nlet y: int = 2;\nfunc main() -> int { return 0; }");
        assert!(reporter.has_errors());
        assert_eq!(stmts.len(), 2);
        assert!(matches!(&stmts[0], Stmt::Let { .. }));
        assert!(matches!(&stmts[1], Stmt::Func { .. }));
    }

    #[test]
    fn two_errors_in_one_file_are_both_reported() {
        let (_, reporter) = parse("let x: = 1;\nlet y: = 2;");
        assert_eq!(reporter.error_count(), 2);
    }
}
