//! Abstract Syntax Tree definitions for trc.
//!
//! Expressions and statements are two closed variant sets. Every node
//! exclusively owns its children; the tree is built once by the parser
//! and read exactly once by the code generator.

use crate::lexer::{Token, Type};

/// Literal values, paired with their lexical category
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    /// Decimal source text, separators already stripped
    Number(String),
    /// Raw text between the quotes
    Str(String),
    Bool(bool),
    Null,
}

/// The target of an assignment. Anything else on the left of `=` is
/// rejected at parse time, so the generator never re-validates it.
#[derive(Debug, Clone, PartialEq)]
pub enum AssignTarget {
    Variable(Token),
    Index { name: Token, index: Box<Expr> },
}

/// Expressions
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(LiteralValue),

    Variable(Token),

    Grouping(Box<Expr>),

    Unary {
        operator: Token,
        operand: Box<Expr>,
    },

    Binary {
        left: Box<Expr>,
        operator: Token,
        right: Box<Expr>,
    },

    /// Short-circuit `and`/`or`; the generator maps the operator to
    /// `&&`/`||`
    Logical {
        left: Box<Expr>,
        operator: Token,
        right: Box<Expr>,
    },

    Call {
        callee: Box<Expr>,
        /// Closing paren, kept for diagnostics
        paren: Token,
        args: Vec<Expr>,
    },

    Assign {
        target: AssignTarget,
        value: Box<Expr>,
    },

    ArrayAccess {
        name: Token,
        index: Box<Expr>,
    },

    /// `[size]` - records an element type and a size expression only.
    /// The grammar never lets an array literal enumerate initial values,
    /// so `elements` is always empty; generation zero-initializes.
    ArrayLiteral {
        elements: Vec<Expr>,
        element_type: Type,
        size: Box<Expr>,
    },
}

/// Statements
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Func {
        name: Token,
        params: Vec<Token>,
        body: Vec<Stmt>,
        return_type: Token,
    },

    Let {
        name: Token,
        declared_type: Token,
        initializer: Option<Expr>,
    },

    Block(Vec<Stmt>),

    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },

    While {
        condition: Expr,
        body: Box<Stmt>,
    },

    Return {
        keyword: Token,
        value: Option<Expr>,
    },

    /// An expression evaluated for side effect
    Expression(Expr),
}
