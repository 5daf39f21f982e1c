//! Scanner for trc source code tokenization.

use super::token::{lookup_keyword, lookup_type, Token, TokenKind, Type};
use crate::diagnostics::{codes, Diagnostic, DiagnosticReporter};

/// Scanner that produces tokens from source code
pub struct Scanner<'a> {
    source: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    current_offset: usize,
    start_offset: usize,
    line: usize,
    reporter: &'a mut DiagnosticReporter,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str, reporter: &'a mut DiagnosticReporter) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            current_offset: 0,
            start_offset: 0,
            line: 1,
            reporter,
        }
    }

    /// Tokenize the entire source
    pub fn scan_tokens(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        loop {
            match self.scan_token() {
                Some(token) => {
                    let is_eof = token.kind == TokenKind::Eof;
                    tokens.push(token);
                    if is_eof {
                        break;
                    }
                }
                // Malformed input was reported as a diagnostic; keep scanning
                None => {}
            }
        }

        tokens
    }

    /// Scan a single token. `None` means the offending input was reported
    /// and skipped rather than turned into a token.
    fn scan_token(&mut self) -> Option<Token> {
        self.skip_whitespace_and_comments();
        self.start_offset = self.current_offset;

        match self.advance() {
            None => Some(Token::eof(self.line, self.current_offset)),
            Some((offset, c)) => {
                self.start_offset = offset;

                match c {
                    '(' => Some(self.make_token(TokenKind::LeftParen)),
                    ')' => Some(self.make_token(TokenKind::RightParen)),
                    '[' => Some(self.make_token(TokenKind::LeftBracket)),
                    ']' => Some(self.make_token(TokenKind::RightBracket)),
                    '{' => Some(self.make_token(TokenKind::LeftBrace)),
                    '}' => Some(self.make_token(TokenKind::RightBrace)),
                    ',' => Some(self.make_token(TokenKind::Comma)),
                    '.' => Some(self.make_token(TokenKind::Dot)),
                    ';' => Some(self.make_token(TokenKind::Semicolon)),
                    ':' => Some(self.make_token(TokenKind::Colon)),
                    '%' => Some(self.make_token(TokenKind::Percent)),

                    '+' => Some(self.match_compound(
                        &[('+', TokenKind::PlusPlus), ('=', TokenKind::PlusEqual)],
                        TokenKind::Plus,
                    )),

                    '-' => Some(self.match_compound(
                        &[
                            ('>', TokenKind::Arrow),
                            ('-', TokenKind::MinusMinus),
                            ('=', TokenKind::MinusEqual),
                        ],
                        TokenKind::Minus,
                    )),

                    '*' => Some(self.match_compound(
                        &[('=', TokenKind::StarEqual)],
                        TokenKind::Star,
                    )),

                    // `//` comments were consumed above, so a remaining
                    // slash is division or a compound assignment
                    '/' => Some(self.match_compound(
                        &[('=', TokenKind::SlashEqual)],
                        TokenKind::Slash,
                    )),

                    '!' => Some(self.match_compound(
                        &[('=', TokenKind::BangEqual)],
                        TokenKind::Bang,
                    )),

                    '=' => Some(self.match_compound(
                        &[('=', TokenKind::EqualEqual)],
                        TokenKind::Equal,
                    )),

                    '<' => Some(self.match_compound(
                        &[('=', TokenKind::LessEqual)],
                        TokenKind::Less,
                    )),

                    '>' => Some(self.match_compound(
                        &[('=', TokenKind::GreaterEqual)],
                        TokenKind::Greater,
                    )),

                    '"' => self.scan_string(),

                    '0'..='9' => Some(self.scan_number()),

                    c if is_ident_start(c) => Some(self.scan_identifier()),

                    _ => {
                        self.reporter.report(
                            Diagnostic::error(
                                codes::UNEXPECTED_CHARACTER,
                                format!("unexpected character '{}'", c),
                            ),
                            self.start_offset,
                            c.len_utf8(),
                        );
                        None
                    }
                }
            }
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek() {
                Some(' ' | '\t' | '\r') => {
                    self.advance();
                }
                Some('\n') => {
                    self.line += 1;
                    self.advance();
                }
                Some('/') => {
                    if self.peek_next() == Some('/') {
                        // Line comment, consumed to end-of-line
                        while self.peek().map_or(false, |c| c != '\n') {
                            self.advance();
                        }
                    } else {
                        break;
                    }
                }
                _ => break,
            }
        }
    }

    fn advance(&mut self) -> Option<(usize, char)> {
        let result = self.chars.next();
        if let Some((_, c)) = result {
            self.current_offset += c.len_utf8();
        }
        result
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn peek_next(&mut self) -> Option<char> {
        let mut chars = self.chars.clone();
        chars.next();
        chars.next().map(|(_, c)| c)
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn match_compound(&mut self, options: &[(char, TokenKind)], default: TokenKind) -> Token {
        for (c, kind) in options {
            if self.match_char(*c) {
                return self.make_token(*kind);
            }
        }
        self.make_token(default)
    }

    fn make_token(&self, kind: TokenKind) -> Token {
        let lexeme = &self.source[self.start_offset..self.current_offset];
        Token::new(
            kind,
            lexeme,
            self.line,
            self.start_offset,
            self.current_offset - self.start_offset,
        )
    }

    /// Scan a string literal. The literal value is the raw substring
    /// between the quotes; escape sequences are not decoded.
    fn scan_string(&mut self) -> Option<Token> {
        loop {
            match self.peek() {
                Some('"') => {
                    self.advance();
                    let value =
                        self.source[self.start_offset + 1..self.current_offset - 1].to_string();
                    return Some(self.make_token(TokenKind::String).with_literal(value));
                }
                Some('\\') => {
                    self.advance();
                    self.advance();
                }
                Some('\n') => {
                    self.line += 1;
                    self.advance();
                }
                Some(_) => {
                    self.advance();
                }
                None => {
                    self.reporter.report(
                        Diagnostic::error(codes::UNTERMINATED_STRING, "unterminated string")
                            .with_help("add a closing '\"' at the end of the string"),
                        self.start_offset,
                        self.current_offset - self.start_offset,
                    );
                    return None;
                }
            }
        }
    }

    /// Scan a number: digit run, optional fractional part, with `_`
    /// accepted as a digit-group separator and stripped from the literal.
    fn scan_number(&mut self) -> Token {
        while self.peek().map_or(false, is_digit_or_separator) {
            self.advance();
        }

        // Fractional part
        if self.peek() == Some('.') && self.peek_next().map_or(false, is_digit_or_separator) {
            self.advance(); // consume '.'
            while self.peek().map_or(false, is_digit_or_separator) {
                self.advance();
            }
        }

        let text = &self.source[self.start_offset..self.current_offset];
        let literal = text.replace('_', "");
        self.make_token(TokenKind::Number).with_literal(literal)
    }

    /// Scan an identifier, reclassifying it as a type name or keyword.
    /// A type name immediately followed by `[]` becomes an array type
    /// token whose subtype is the base type.
    fn scan_identifier(&mut self) -> Token {
        while self.peek().map_or(false, is_ident_continue) {
            self.advance();
        }

        let text = &self.source[self.start_offset..self.current_offset];

        if let Some(ty) = lookup_type(text) {
            if self.peek() == Some('[') && self.peek_next() == Some(']') {
                self.advance();
                self.advance();
                return self
                    .make_token(TokenKind::Type)
                    .with_type(Type::Array)
                    .with_subtype(ty);
            }
            return self.make_token(TokenKind::Type).with_type(ty);
        }

        let kind = lookup_keyword(text).unwrap_or(TokenKind::Identifier);
        self.make_token(kind)
    }
}

fn is_digit_or_separator(c: char) -> bool {
    c.is_ascii_digit() || c == '_'
}

fn is_ident_start(c: char) -> bool {
    c == '_' || unicode_xid::UnicodeXID::is_xid_start(c)
}

fn is_ident_continue(c: char) -> bool {
    c == '_' || unicode_xid::UnicodeXID::is_xid_continue(c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::TokenKind as T;

    fn scan(source: &str) -> (Vec<Token>, DiagnosticReporter) {
        let mut reporter = DiagnosticReporter::new("test.trc", source);
        let tokens = Scanner::new(source, &mut reporter).scan_tokens();
        (tokens, reporter)
    }

    fn kinds(source: &str) -> Vec<TokenKind> {
        scan(source).0.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn punctuation_and_operators() {
        assert_eq!(
            kinds("( ) [ ] { } , . ; : + - * / % !"),
            vec![
                T::LeftParen,
                T::RightParen,
                T::LeftBracket,
                T::RightBracket,
                T::LeftBrace,
                T::RightBrace,
                T::Comma,
                T::Dot,
                T::Semicolon,
                T::Colon,
                T::Plus,
                T::Minus,
                T::Star,
                T::Slash,
                T::Percent,
                T::Bang,
                T::Eof,
            ]
        );
    }

    #[test]
    fn compound_operators_use_one_token_lookahead() {
        assert_eq!(
            kinds("== != <= >= ++ -- += -= *= /= ->"),
            vec![
                T::EqualEqual,
                T::BangEqual,
                T::LessEqual,
                T::GreaterEqual,
                T::PlusPlus,
                T::MinusMinus,
                T::PlusEqual,
                T::MinusEqual,
                T::StarEqual,
                T::SlashEqual,
                T::Arrow,
                T::Eof,
            ]
        );
    }

    #[test]
    fn line_comment_runs_to_end_of_line() {
        assert_eq!(kinds("a // b c d\n/"), vec![T::Identifier, T::Slash, T::Eof]);
    }

    #[test]
    fn newlines_advance_the_line_counter() {
        let (tokens, _) = scan("a\nb\n\nc");
        let lines: Vec<usize> = tokens.iter().map(|t| t.line).collect();
        assert_eq!(lines, vec![1, 2, 4, 4]);
    }

    #[test]
    fn keywords_and_identifiers() {
        assert_eq!(
            kinds("let and or if else func for while null false true return foo"),
            vec![
                T::Let,
                T::And,
                T::Or,
                T::If,
                T::Else,
                T::Func,
                T::For,
                T::While,
                T::Null,
                T::False,
                T::True,
                T::Return,
                T::Identifier,
                T::Eof,
            ]
        );
    }

    #[test]
    fn number_literal_strips_separators() {
        let (tokens, _) = scan("1_000_000 3.14");
        assert_eq!(tokens[0].kind, T::Number);
        assert_eq!(tokens[0].lexeme, "1_000_000");
        assert_eq!(tokens[0].literal.as_deref(), Some("1000000"));
        assert_eq!(tokens[1].literal.as_deref(), Some("3.14"));
    }

    #[test]
    fn string_literal_keeps_raw_contents() {
        let (tokens, reporter) = scan("\"hello\\n\"");
        assert!(!reporter.has_errors());
        assert_eq!(tokens[0].kind, T::String);
        assert_eq!(tokens[0].literal.as_deref(), Some("hello\\n"));
    }

    #[test]
    fn string_spanning_lines_counts_them() {
        let (tokens, _) = scan("\"a\nb\" x");
        assert_eq!(tokens[0].kind, T::String);
        assert_eq!(tokens[1].line, 2);
    }

    #[test]
    fn unterminated_string_is_reported_and_scanning_continues() {
        let (tokens, reporter) = scan("\"oops");
        assert!(reporter.has_errors());
        assert_eq!(tokens.last().map(|t| t.kind), Some(T::Eof));
    }

    #[test]
    fn unexpected_character_is_reported_and_skipped() {
        let (tokens, reporter) = scan("a @ b");
        assert!(reporter.has_errors());
        assert_eq!(
            tokens.iter().map(|t| t.kind).collect::<Vec<_>>(),
            vec![T::Identifier, T::Identifier, T::Eof]
        );
    }

    #[test]
    fn type_names_become_type_tokens() {
        let (tokens, _) = scan("int str bool u64");
        for token in &tokens[..4] {
            assert_eq!(token.kind, T::Type);
        }
        assert_eq!(tokens[0].ty, Some(Type::Int));
        assert_eq!(tokens[1].ty, Some(Type::Str));
        assert_eq!(tokens[2].ty, Some(Type::Bool));
        assert_eq!(tokens[3].ty, Some(Type::U64));
    }

    #[test]
    fn array_type_suffix_sets_subtype() {
        let (tokens, _) = scan("int[]");
        assert_eq!(tokens[0].kind, T::Type);
        assert_eq!(tokens[0].lexeme, "int[]");
        assert_eq!(tokens[0].ty, Some(Type::Array));
        assert_eq!(tokens[0].subtype, Some(Type::Int));
    }
}
