//! Token definitions for the trc lexer.

use std::fmt;

/// A token with its kind, lexeme, decoded literal, and position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    /// Decoded value for string/number literals, absent otherwise.
    /// Numbers keep their decimal source text (separators stripped) so
    /// arbitrary-precision literals survive into code generation.
    pub literal: Option<String>,
    /// 1-based source line for diagnostics
    pub line: usize,
    pub offset: usize,
    pub length: usize,
    /// Set only for tokens classified as a type name
    pub ty: Option<Type>,
    /// Element type when the type name is an array form, e.g. `int[]`
    pub subtype: Option<Type>,
}

impl Token {
    pub fn new(
        kind: TokenKind,
        lexeme: impl Into<String>,
        line: usize,
        offset: usize,
        length: usize,
    ) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            literal: None,
            line,
            offset,
            length,
            ty: None,
            subtype: None,
        }
    }

    pub fn with_literal(mut self, literal: impl Into<String>) -> Self {
        self.literal = Some(literal.into());
        self
    }

    pub fn with_type(mut self, ty: Type) -> Self {
        self.ty = Some(ty);
        self
    }

    pub fn with_subtype(mut self, subtype: Type) -> Self {
        self.subtype = Some(subtype);
        self
    }

    pub fn eof(line: usize, offset: usize) -> Self {
        Self::new(TokenKind::Eof, "", line, offset, 0)
    }

    /// A token with no source position, used for operators synthesized
    /// by the parser's compound-assignment desugaring.
    pub fn synthetic(kind: TokenKind, lexeme: &str) -> Self {
        Self::new(kind, lexeme, 0, 0, 0)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}('{}')", self.kind, self.lexeme)
    }
}

/// All token kinds in trc
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Delimiters
    LeftParen,      // (
    RightParen,     // )
    LeftBracket,    // [
    RightBracket,   // ]
    LeftBrace,      // {
    RightBrace,     // }

    // Punctuation
    Comma,          // ,
    Dot,            // .
    Semicolon,      // ;
    Colon,          // :

    // Operators
    Plus,           // +
    Minus,          // -
    Star,           // *
    Slash,          // /
    Percent,        // %
    Bang,           // !
    Equal,          // =
    Less,           // <
    Greater,        // >

    // Compound operators
    PlusPlus,       // ++
    MinusMinus,     // --
    PlusEqual,      // +=
    MinusEqual,     // -=
    StarEqual,      // *=
    SlashEqual,     // /=
    BangEqual,      // !=
    EqualEqual,     // ==
    LessEqual,      // <=
    GreaterEqual,   // >=
    Arrow,          // ->

    // Literals
    Identifier,
    String,
    Number,

    // Keywords
    Let,
    And,
    Or,
    If,
    Else,
    Func,
    For,
    While,
    Null,
    False,
    True,
    Return,

    // Reserved type name (`int`, `str`, `int[]`, ...)
    Type,

    Eof,
}

/// The closed set of trc types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Void,
    Bool,
    U8,
    U16,
    U32,
    U64,
    Uint,
    I8,
    I16,
    I32,
    I64,
    Int,
    F32,
    F64,
    Float,
    Char,
    Str,
    /// Element type lives in the token's `subtype`
    Array,
}

/// Map string to keyword token kind
pub fn lookup_keyword(ident: &str) -> Option<TokenKind> {
    match ident {
        "let" => Some(TokenKind::Let),
        "and" => Some(TokenKind::And),
        "or" => Some(TokenKind::Or),
        "if" => Some(TokenKind::If),
        "else" => Some(TokenKind::Else),
        "func" => Some(TokenKind::Func),
        "for" => Some(TokenKind::For),
        "while" => Some(TokenKind::While),
        "null" => Some(TokenKind::Null),
        "false" => Some(TokenKind::False),
        "true" => Some(TokenKind::True),
        "return" => Some(TokenKind::Return),
        _ => None,
    }
}

/// Map string to reserved primitive type name
pub fn lookup_type(ident: &str) -> Option<Type> {
    match ident {
        "void" => Some(Type::Void),
        "bool" => Some(Type::Bool),

        "u8" => Some(Type::U8),     // unsigned char
        "u16" => Some(Type::U16),   // unsigned short
        "u32" => Some(Type::U32),   // unsigned int
        "u64" => Some(Type::U64),   // unsigned long
        "uint" => Some(Type::Uint), // alias for u32

        "i8" => Some(Type::I8),
        "i16" => Some(Type::I16),
        "i32" => Some(Type::I32),
        "i64" => Some(Type::I64),
        "int" => Some(Type::Int),   // alias for i32

        "f32" => Some(Type::F32),
        "f64" => Some(Type::F64),
        "float" => Some(Type::Float), // alias for f32

        "char" => Some(Type::Char),
        "str" => Some(Type::Str),   // char*

        _ => None,
    }
}
