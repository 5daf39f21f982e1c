//! End-to-end pipeline tests: source text in, C text out.

use pretty_assertions::assert_eq;
use trc::Driver;

fn compile(source: &str) -> String {
    Driver::new("test.trc".to_string(), source.to_string())
        .compile()
        .unwrap_or_else(|diagnostics| panic!("compilation failed: {:#?}", diagnostics))
}

fn compile_err(source: &str) -> Vec<trc::Diagnostic> {
    Driver::new("test.trc".to_string(), source.to_string())
        .compile()
        .expect_err("compilation should fail")
}

#[test]
fn minimal_program() {
    let output = compile("func main() -> int { return 0; }");
    assert!(output.starts_with("#include <stdio.h>\n"));
    assert!(output.ends_with("int main() {\nreturn 0;\n}\n"));
}

#[test]
fn let_with_binary_initializer() {
    let output = compile("func main() -> int {\n  let x: int = 5 + 3;\n  return 0;\n}");
    assert!(output.contains("int x = 5 + 3;\n"));
}

#[test]
fn array_declaration_is_zero_initialized() {
    let output = compile("func main() -> int {\n  let a: int[] = [10];\n  return 0;\n}");
    assert!(output.contains("int a[10] = {};\n"));
}

#[test]
fn compound_assignment_expands() {
    let output = compile("func main() -> int {\n  let x: int = 0;\n  x += 1;\n  return 0;\n}");
    assert!(output.contains("x = x + 1;"));
}

#[test]
fn for_loop_generates_the_same_c_as_its_while_form() {
    let desugared = compile(
        "func main() -> int { for (let i: int = 0; i < 3; i++) { f(i); } return 0; }",
    );
    let explicit = compile(
        "func main() -> int { { let i: int = 0; while (i < 3) { { f(i); } i = i + 1; } } return 0; }",
    );
    assert_eq!(desugared, explicit);
}

#[test]
fn string_function_maps_return_type_to_char_pointer() {
    let output = compile("func name() -> str { return \"trc\"; }\nfunc main() -> int { return 0; }");
    assert!(output.contains("char* name() {\nreturn \"trc\";\n}\n"));
}

#[test]
fn print_macro_calls_pass_through() {
    let output = compile("func main() -> int {\n  println(\"%d\", 42);\n  return 0;\n}");
    assert!(output.contains("println(\"%d\", 42);"));
}

#[test]
fn huge_integer_literal_keeps_its_suffix_end_to_end() {
    let output =
        compile("func main() -> int {\n  let big: u64 = 18446744073709551615;\n  return 0;\n}");
    assert!(output.contains("unsigned long big = 18446744073709551615lu;\n"));
}

#[test]
fn invalid_assignment_target_names_the_problem() {
    let diagnostics = compile_err("func main() -> int { 1 = 2; return 0; }");
    assert!(diagnostics
        .iter()
        .any(|d| d.message == "Invalid assignment target."));
}

#[test]
fn multiple_syntax_errors_surface_in_one_run() {
    let diagnostics = compile_err("let x: = 1;\nlet y: = 2;\n");
    assert_eq!(diagnostics.len(), 2);
}
