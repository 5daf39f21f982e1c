//! C code emitter for transpiling the trc AST to C.
//!
//! A pure mapping from statements to C source text. The emitter does
//! no I/O and keeps no state between runs; writing the output file is
//! the driver's job. Any node shape it does not recognize aborts the
//! whole run with a [`GenError`], there is no partial output.

use crate::lexer::{Token, Type};
use crate::parser::{AssignTarget, Expr, LiteralValue, Stmt};
use std::fmt;

/// Standard headers plus the print/println convenience macros. Every
/// translation unit starts with this text.
const PREAMBLE: &str = "#include <stdio.h>\n\
#include <stdbool.h>\n\
#include <string.h>\n\
\n\
#define print(value, ...) printf(value, ##__VA_ARGS__)\n\
#define println(value, ...) { printf(value, ##__VA_ARGS__); printf(\"\\n\"); }\n\
\n\
\n";

/// Internal generation failure. A well-formed AST from the parser
/// never triggers one of these; reaching them means the parser and
/// generator disagree about the tree's shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenError {
    /// A type token with no source-level type mapping to C
    UnmappedType(Type),
    /// A declaration token that carries no type at all
    UntypedToken(String),
    /// An array type token without an element type
    MissingElementType(String),
    /// An array declaration whose initializer is not an array literal
    ExpectedArrayLiteral(String),
    /// A scalar declaration with no initializer
    MissingInitializer(String),
    /// A call whose callee is not a bare name
    CalleeNotName,
    /// A unary expression; the language defines none that reach C
    UnsupportedUnary(String),
    /// An array literal outside a declaration initializer
    BareArrayLiteral,
}

impl fmt::Display for GenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenError::UnmappedType(ty) => write!(f, "no C mapping for type {:?}", ty),
            GenError::UntypedToken(lexeme) => {
                write!(f, "declaration token '{}' carries no type", lexeme)
            }
            GenError::MissingElementType(name) => {
                write!(f, "array type for '{}' has no element type", name)
            }
            GenError::ExpectedArrayLiteral(name) => {
                write!(f, "array variable '{}' requires an array literal initializer", name)
            }
            GenError::MissingInitializer(name) => {
                write!(f, "variable '{}' has no initializer", name)
            }
            GenError::CalleeNotName => write!(f, "call target is not a function name"),
            GenError::UnsupportedUnary(op) => {
                write!(f, "unary operator '{}' cannot be generated", op)
            }
            GenError::BareArrayLiteral => {
                write!(f, "array literal outside a declaration initializer")
            }
        }
    }
}

impl std::error::Error for GenError {}

/// Emits C code from the trc AST
pub struct CEmitter;

impl CEmitter {
    pub fn new() -> Self {
        Self
    }

    /// Emit a full translation unit: the fixed preamble followed by
    /// every top-level statement
    pub fn emit(&self, program: &[Stmt]) -> Result<String, GenError> {
        let mut output = String::from(PREAMBLE);
        for stmt in program {
            output.push_str(&self.emit_statement(stmt)?);
        }
        Ok(output)
    }

    fn emit_statement(&self, stmt: &Stmt) -> Result<String, GenError> {
        match stmt {
            Stmt::Func {
                name,
                body,
                return_type,
                ..
            } => {
                // parameters carry no types, so the C signature is empty
                let ret = c_type(declared_type(return_type)?)?;
                let body = body
                    .iter()
                    .map(|stmt| self.emit_statement(stmt))
                    .collect::<Result<Vec<_>, _>>()?
                    .join("\n");
                Ok(format!("{} {}() {{\n{}\n}}\n", ret, name.lexeme, body))
            }

            Stmt::Return { value, .. } => match value {
                Some(value) => Ok(format!("return {};", self.emit_expression(value)?)),
                None => Ok("return;".to_string()),
            },

            Stmt::Expression(expr) => Ok(format!("{};", self.emit_expression(expr)?)),

            Stmt::Let {
                name,
                declared_type: type_token,
                initializer,
            } => {
                let ty = declared_type(type_token)?;

                if ty == Type::Array {
                    let element = type_token
                        .subtype
                        .ok_or_else(|| GenError::MissingElementType(name.lexeme.clone()))?;
                    let Some(Expr::ArrayLiteral { size, .. }) = initializer else {
                        return Err(GenError::ExpectedArrayLiteral(name.lexeme.clone()));
                    };
                    return Ok(format!(
                        "{} {}[{}] = {{}};\n",
                        c_type(element)?,
                        name.lexeme,
                        self.emit_expression(size)?
                    ));
                }

                let initializer = initializer
                    .as_ref()
                    .ok_or_else(|| GenError::MissingInitializer(name.lexeme.clone()))?;
                Ok(format!(
                    "{} {} = {};\n",
                    c_type(ty)?,
                    name.lexeme,
                    self.emit_expression(initializer)?
                ))
            }

            Stmt::Block(statements) => {
                let body = statements
                    .iter()
                    .map(|stmt| self.emit_statement(stmt))
                    .collect::<Result<Vec<_>, _>>()?
                    .join("");
                Ok(format!("{{\n{}}}\n", body))
            }

            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                let mut output = format!(
                    "if ({}) {{\n{}}}\n",
                    self.emit_expression(condition)?,
                    self.emit_statement(then_branch)?
                );
                if let Some(else_branch) = else_branch {
                    output.push_str(&format!(
                        "else {{\n{}}}\n",
                        self.emit_statement(else_branch)?
                    ));
                }
                Ok(output)
            }

            Stmt::While { condition, body } => Ok(format!(
                "while ({}) {{\n{}}}\n",
                self.emit_expression(condition)?,
                self.emit_statement(body)?
            )),
        }
    }

    fn emit_expression(&self, expr: &Expr) -> Result<String, GenError> {
        match expr {
            Expr::Call { callee, args, .. } => {
                let Expr::Variable(name) = callee.as_ref() else {
                    return Err(GenError::CalleeNotName);
                };
                let args = args
                    .iter()
                    .map(|arg| self.emit_expression(arg))
                    .collect::<Result<Vec<_>, _>>()?
                    .join(", ");
                Ok(format!("{}({})", name.lexeme, args))
            }

            Expr::Binary {
                left,
                operator,
                right,
            } => Ok(format!(
                "{} {} {}",
                self.emit_expression(left)?,
                operator.lexeme,
                self.emit_expression(right)?
            )),

            Expr::Logical {
                left,
                operator,
                right,
            } => {
                let op = if operator.lexeme == "or" { "||" } else { "&&" };
                Ok(format!(
                    "{} {} {}",
                    self.emit_expression(left)?,
                    op,
                    self.emit_expression(right)?
                ))
            }

            Expr::Grouping(inner) => Ok(format!("({})", self.emit_expression(inner)?)),

            Expr::Variable(name) => Ok(name.lexeme.clone()),

            Expr::ArrayAccess { name, index } => {
                Ok(format!("{}[{}]", name.lexeme, self.emit_expression(index)?))
            }

            Expr::Assign { target, value } => {
                let target = match target {
                    AssignTarget::Variable(name) => name.lexeme.clone(),
                    AssignTarget::Index { name, index } => {
                        format!("{}[{}]", name.lexeme, self.emit_expression(index)?)
                    }
                };
                Ok(format!("{} = {}", target, self.emit_expression(value)?))
            }

            Expr::Literal(value) => Ok(match value {
                LiteralValue::Bool(true) => "true".to_string(),
                LiteralValue::Bool(false) => "false".to_string(),
                LiteralValue::Null => "NULL".to_string(),
                LiteralValue::Str(text) => format!("\"{}\"", text),
                LiteralValue::Number(text) => c_number_literal(text),
            }),

            Expr::Unary { operator, .. } => {
                Err(GenError::UnsupportedUnary(operator.lexeme.clone()))
            }

            Expr::ArrayLiteral { .. } => Err(GenError::BareArrayLiteral),
        }
    }
}

impl Default for CEmitter {
    fn default() -> Self {
        Self::new()
    }
}

fn declared_type(token: &Token) -> Result<Type, GenError> {
    token
        .ty
        .ok_or_else(|| GenError::UntypedToken(token.lexeme.clone()))
}

/// Source type to C type. The generator assumes the lexer only ever
/// attaches types from this table; anything else is fatal.
fn c_type(ty: Type) -> Result<&'static str, GenError> {
    match ty {
        Type::Str => Ok("char*"),
        Type::Int | Type::I32 => Ok("int"),
        Type::Bool => Ok("bool"),
        Type::Void => Ok("void"),
        Type::F32 => Ok("float"),
        Type::F64 => Ok("double"),
        Type::Uint | Type::U32 => Ok("unsigned int"),
        Type::U8 => Ok("unsigned char"),
        Type::U16 => Ok("unsigned short"),
        Type::U64 => Ok("unsigned long"),
        other => Err(GenError::UnmappedType(other)),
    }
}

/// Numeric literal formatting. Texts with `.` pass through as floating
/// form. Integer texts that survive a signed round-trip are emitted as
/// parsed; anything else (out of signed range, leading zeros) gets an
/// explicit `lu` suffix so C does not reinterpret it.
fn c_number_literal(text: &str) -> String {
    if text.contains('.') {
        return text.to_string();
    }

    match text.parse::<i64>() {
        Ok(n) if n.to_string() == text => n.to_string(),
        _ => format!("{}lu", text),
    }
}
