//! Driver that orchestrates the compilation pipeline.

use crate::codegen::CEmitter;
use crate::diagnostics::{codes, Diagnostic, DiagnosticReporter};
use crate::lexer::Scanner;
use crate::parser::Parser;
use crate::semantic::Checker;

/// The compilation driver. Runs lex, parse, check and generate in
/// order, stopping at the first stage that produced errors so every
/// diagnostic from that stage is reported together.
pub struct Driver {
    file: String,
    source: String,
    dump_ast: bool,
    dump_tokens: bool,
}

impl Driver {
    pub fn new(file: String, source: String) -> Self {
        Self {
            file,
            source,
            dump_ast: false,
            dump_tokens: false,
        }
    }

    pub fn set_dump_ast(&mut self, enabled: bool) {
        self.dump_ast = enabled;
    }

    pub fn set_dump_tokens(&mut self, enabled: bool) {
        self.dump_tokens = enabled;
    }

    /// Run the compilation pipeline
    pub fn compile(&mut self) -> Result<String, Vec<Diagnostic>> {
        let mut reporter = DiagnosticReporter::new(&self.file, &self.source);

        // === Lexical Analysis ===
        let scanner = Scanner::new(&self.source, &mut reporter);
        let tokens = scanner.scan_tokens();

        if self.dump_tokens {
            eprintln!("=== Tokens ===");
            for token in &tokens {
                eprintln!("  {}", token);
            }
            eprintln!();
        }

        if reporter.has_errors() {
            return Err(reporter.take_diagnostics());
        }

        // === Parsing ===
        let mut parser = Parser::new(tokens, &mut reporter);
        let program = parser.parse();

        if self.dump_ast {
            eprintln!("=== AST ===");
            eprintln!("{:#?}", program);
            eprintln!();
        }

        if reporter.has_errors() {
            return Err(reporter.take_diagnostics());
        }

        // === Semantic Analysis ===
        let mut checker = Checker::new(&mut reporter);
        checker.check(&program);

        let diagnostics = reporter.take_diagnostics();
        if diagnostics.iter().any(|d| d.is_error()) {
            return Err(diagnostics);
        }

        // warnings do not block generation
        for diag in &diagnostics {
            eprintln!("{}", diag);
        }

        // === Code Generation ===
        let emitter = CEmitter::new();
        match emitter.emit(&program) {
            Ok(c_code) => Ok(c_code),
            Err(err) => Err(vec![Diagnostic::error(
                codes::CODEGEN,
                format!("internal code generation failure: {}", err),
            )]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn compile(source: &str) -> Result<String, Vec<Diagnostic>> {
        Driver::new("test.trc".to_string(), source.to_string()).compile()
    }

    #[test]
    fn compiles_a_minimal_program() {
        let output = compile("func main() -> int { return 0; }").unwrap();
        assert!(output.ends_with("int main() {\nreturn 0;\n}\n"));
    }

    #[test]
    fn lex_errors_stop_the_pipeline_before_parsing() {
        let diagnostics = compile("let @x: int = 1;").unwrap_err();
        assert_eq!(diagnostics[0].code, "E001");
    }

    #[test]
    fn parse_errors_are_all_reported() {
        let diagnostics = compile("let x: = 1;\nlet y: = 2;").unwrap_err();
        assert_eq!(diagnostics.len(), 2);
    }

    #[test]
    fn semantic_errors_block_generation() {
        let diagnostics = compile("func main() -> int { let s: str = 5; return 0; }").unwrap_err();
        assert_eq!(diagnostics[0].code, "E202");
    }

    #[test]
    fn generation_failure_surfaces_as_internal_diagnostic() {
        let diagnostics = compile("func main() -> int { f(1)(2); return 0; }").unwrap_err();
        assert_eq!(diagnostics[0].code, "E900");
    }
}
