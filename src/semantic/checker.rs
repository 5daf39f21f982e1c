//! Semantic checker for trc.
//!
//! A small validation pass between parsing and generation. It walks
//! the statement tree and reports errors through the shared reporter;
//! the generator itself never assumes this pass ran.

use crate::diagnostics::{codes, Diagnostic, DiagnosticReporter};
use crate::lexer::{Token, Type};
use crate::parser::{Expr, LiteralValue, Stmt};

/// Validates the AST before code generation
pub struct Checker<'a> {
    reporter: &'a mut DiagnosticReporter,
}

impl<'a> Checker<'a> {
    pub fn new(reporter: &'a mut DiagnosticReporter) -> Self {
        Self { reporter }
    }

    /// Check an entire program
    pub fn check(&mut self, program: &[Stmt]) {
        for stmt in program {
            self.check_stmt(stmt);
        }
    }

    fn check_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Func {
                name,
                body,
                return_type,
                ..
            } => self.check_function(name, body, return_type),
            Stmt::Let {
                name,
                declared_type,
                initializer,
            } => self.check_let(name, declared_type, initializer.as_ref()),
            Stmt::Block(statements) => {
                for stmt in statements {
                    self.check_stmt(stmt);
                }
            }
            Stmt::If {
                then_branch,
                else_branch,
                ..
            } => {
                self.check_stmt(then_branch);
                if let Some(else_branch) = else_branch {
                    self.check_stmt(else_branch);
                }
            }
            Stmt::While { body, .. } => self.check_stmt(body),
            Stmt::Return { .. } | Stmt::Expression(_) => {}
        }
    }

    fn check_function(&mut self, name: &Token, body: &[Stmt], return_type: &Token) {
        if name.lexeme == "main" && return_type.ty != Some(Type::Int) {
            self.error(
                codes::MAIN_RETURN_TYPE,
                "Function 'main' must return 'int'.",
                return_type,
            );
        }

        if return_type.ty != Some(Type::Void)
            && !matches!(body.last(), Some(Stmt::Return { .. }))
        {
            self.error(
                codes::MISSING_RETURN,
                format!(
                    "Function '{}' must end with a return statement.",
                    name.lexeme
                ),
                name,
            );
        }

        for stmt in body {
            self.check_stmt(stmt);
        }
    }

    /// Compare a declared type against the lexical shape of a literal
    /// initializer. Non-literal initializers are not checked.
    fn check_let(&mut self, name: &Token, declared_type: &Token, initializer: Option<&Expr>) {
        let Some(Expr::Literal(value)) = initializer else {
            return;
        };

        match declared_type.ty {
            Some(Type::Str) => {
                if !matches!(value, LiteralValue::Str(_)) {
                    self.error(
                        codes::TYPE_MISMATCH,
                        format!("Variable '{}' of type 'str' needs a string value.", name.lexeme),
                        name,
                    );
                }
            }
            Some(Type::Int) | Some(Type::Uint) => {
                let is_whole_number =
                    matches!(value, LiteralValue::Number(text) if !text.contains('.'));
                if !is_whole_number {
                    self.error(
                        codes::TYPE_MISMATCH,
                        format!(
                            "Variable '{}' of type '{}' needs a whole number value.",
                            name.lexeme, declared_type.lexeme
                        ),
                        name,
                    );
                }
            }
            _ => {}
        }
    }

    fn error(&mut self, code: &str, message: impl Into<String>, token: &Token) {
        self.reporter
            .report(Diagnostic::error(code, message), token.offset, token.length.max(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Scanner;
    use crate::parser::Parser;

    fn check(source: &str) -> DiagnosticReporter {
        let mut reporter = DiagnosticReporter::new("test.trc", source);
        let tokens = Scanner::new(source, &mut reporter).scan_tokens();
        let program = Parser::new(tokens, &mut reporter).parse();
        assert!(!reporter.has_errors(), "source must parse cleanly");
        Checker::new(&mut reporter).check(&program);
        reporter
    }

    #[test]
    fn accepts_well_typed_program() {
        let reporter = check("func main() -> int { let x: int = 5; return 0; }");
        assert!(!reporter.has_errors());
    }

    #[test]
    fn main_must_return_int() {
        let reporter = check("func main() -> void { }");
        assert!(reporter
            .diagnostics()
            .iter()
            .any(|d| d.message == "Function 'main' must return 'int'."));
    }

    #[test]
    fn non_void_function_must_end_with_return() {
        let reporter = check("func f() -> int { let x: int = 1; }");
        assert!(reporter
            .diagnostics()
            .iter()
            .any(|d| d.code == "E201"));
    }

    #[test]
    fn void_function_needs_no_return() {
        let reporter = check("func f() -> void { 1; }");
        assert!(!reporter.has_errors());
    }

    #[test]
    fn str_variable_rejects_number_literal() {
        let reporter = check("func main() -> int { let s: str = 5; return 0; }");
        assert_eq!(reporter.error_count(), 1);
    }

    #[test]
    fn int_variable_rejects_fractional_literal() {
        let reporter = check("func main() -> int { let x: int = 1.5; return 0; }");
        assert_eq!(reporter.error_count(), 1);
    }

    #[test]
    fn int_variable_accepts_whole_literal_with_separators() {
        let reporter = check("func main() -> int { let x: int = 1_000; return 0; }");
        assert!(!reporter.has_errors());
    }

    #[test]
    fn non_literal_initializer_is_not_checked() {
        let reporter = check("func main() -> int { let x: int = y + 1; return 0; }");
        assert!(!reporter.has_errors());
    }
}
