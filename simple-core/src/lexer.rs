//! Lexer for the Simple language.
//!
//! A single left-to-right scan over the source text. Lexical errors never
//! stop the scan: they are reported as diagnostics and the lexer moves on,
//! so the token stream always ends with exactly one `Eof` token.

use crate::diagnostic::{Diagnostic, DiagnosticBag};
use crate::span::Span;

/// Kind of a token produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Special
    Eof,
    /// Sentinel for an unrecognized character. Never reaches the parser.
    BadToken,

    // Identifiers and literals
    Identifier,
    IntLiteral,
    FloatLiteral,
    StringLiteral,
    CharLiteral,

    // Punctuation
    LParen,   // (
    RParen,   // )
    LBrace,   // {
    RBrace,   // }
    LBracket, // [
    RBracket, // ]
    Comma,    // ,
    Semi,     // ;
    Dot,      // .
    Colon,    // :
    DoubleColon, // ::

    // Operators
    Plus,                // +
    PlusPlus,            // ++
    PlusEqual,           // +=
    Minus,               // -
    MinusMinus,          // --
    MinusEqual,          // -=
    Star,                // *
    StarEqual,           // *=
    Slash,               // /
    SlashEqual,          // /=
    Percent,             // %
    PercentEqual,        // %=
    Bang,                // !
    BangEqual,           // !=
    Equal,               // =
    EqualEqual,          // ==
    Less,                // <
    LessEqual,           // <=
    LessLess,            // <<
    LessLessEqual,       // <<=
    Greater,             // >
    GreaterEqual,        // >=
    GreaterGreater,      // >>
    GreaterGreaterEqual, // >>=
    Amp,                 // &
    AmpAmp,              // &&
    AmpEqual,            // &=
    Pipe,                // |
    PipePipe,            // ||
    PipeEqual,           // |=
    PipeArrow,           // |>
    Caret,               // ^
    CaretEqual,          // ^=

    // Keywords
    While,
    For,
    Break,
    Skip,
    Return,
    Default,
    Fn,
    SelfKeyword,
    Artifact,
    Enum,
    Module,
    Union,
    True,
    False,
}

impl TokenKind {
    /// Precedence of a prefix operator, or 0 if `self` is not one.
    ///
    /// Prefix operators bind tighter than every binary operator.
    pub fn unary_precedence(self) -> u8 {
        match self {
            TokenKind::Plus | TokenKind::Minus | TokenKind::Bang => 13,
            _ => 0,
        }
    }

    /// Precedence of a binary operator, or 0 if `self` is not one.
    pub fn binary_precedence(self) -> u8 {
        use TokenKind::*;
        match self {
            Star | Slash | Percent => 12,
            Plus | Minus => 11,
            LessLess | GreaterGreater => 10,
            Less | Greater | LessEqual | GreaterEqual => 9,
            EqualEqual | BangEqual => 8,
            Amp => 7,
            Caret => 6,
            Pipe => 5,
            AmpAmp => 4,
            PipePipe => 3,
            _ => 0,
        }
    }

    pub fn is_assignment_operator(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Equal
                | PlusEqual
                | MinusEqual
                | StarEqual
                | SlashEqual
                | PercentEqual
                | AmpEqual
                | PipeEqual
                | CaretEqual
                | LessLessEqual
                | GreaterGreaterEqual
        )
    }

    pub fn is_keyword(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            While
                | For
                | Break
                | Skip
                | Return
                | Default
                | Fn
                | SelfKeyword
                | Artifact
                | Enum
                | Module
                | Union
                | True
                | False
        )
    }
}

/// Decoded value carried by literal tokens.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    String(String),
    Char(char),
}

/// A single token: kind, raw source text, decoded literal value and span.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub value: Option<LiteralValue>,
    pub span: Span,
}

impl Token {
    /// A zero-length token synthesized during error recovery.
    pub fn missing(kind: TokenKind, offset: u32) -> Self {
        Token {
            kind,
            text: String::new(),
            value: None,
            span: Span::empty(offset),
        }
    }
}

/// Result of lexing a source text.
#[derive(Debug)]
pub struct LexResult {
    pub tokens: Vec<Token>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Lex a source string into tokens.
pub fn lex(source: &str) -> LexResult {
    let mut lexer = Lexer {
        source,
        index: 0,
        diagnostics: DiagnosticBag::new(),
    };
    lexer.run()
}

fn keyword_kind(text: &str) -> Option<TokenKind> {
    let kind = match text {
        "while" => TokenKind::While,
        "for" => TokenKind::For,
        "break" => TokenKind::Break,
        "skip" => TokenKind::Skip,
        "return" => TokenKind::Return,
        "default" => TokenKind::Default,
        "Fn" => TokenKind::Fn,
        "self" => TokenKind::SelfKeyword,
        "Artifact" => TokenKind::Artifact,
        "Enum" => TokenKind::Enum,
        "Module" => TokenKind::Module,
        "Union" => TokenKind::Union,
        "true" => TokenKind::True,
        "false" => TokenKind::False,
        _ => return None,
    };
    Some(kind)
}

/// Operators starting with `first`, longest spelling first.
fn operators_starting_with(first: char) -> &'static [(&'static str, TokenKind)] {
    use TokenKind::*;
    match first {
        '(' => &[("(", LParen)],
        ')' => &[(")", RParen)],
        '{' => &[("{", LBrace)],
        '}' => &[("}", RBrace)],
        '[' => &[("[", LBracket)],
        ']' => &[("]", RBracket)],
        ',' => &[(",", Comma)],
        ';' => &[(";", Semi)],
        '.' => &[(".", Dot)],
        ':' => &[("::", DoubleColon), (":", Colon)],
        '+' => &[("++", PlusPlus), ("+=", PlusEqual), ("+", Plus)],
        '-' => &[("--", MinusMinus), ("-=", MinusEqual), ("-", Minus)],
        '*' => &[("*=", StarEqual), ("*", Star)],
        '/' => &[("/=", SlashEqual), ("/", Slash)],
        '%' => &[("%=", PercentEqual), ("%", Percent)],
        '!' => &[("!=", BangEqual), ("!", Bang)],
        '=' => &[("==", EqualEqual), ("=", Equal)],
        '<' => &[
            ("<<=", LessLessEqual),
            ("<<", LessLess),
            ("<=", LessEqual),
            ("<", Less),
        ],
        '>' => &[
            (">>=", GreaterGreaterEqual),
            (">>", GreaterGreater),
            (">=", GreaterEqual),
            (">", Greater),
        ],
        '&' => &[("&&", AmpAmp), ("&=", AmpEqual), ("&", Amp)],
        '|' => &[
            ("||", PipePipe),
            ("|=", PipeEqual),
            ("|>", PipeArrow),
            ("|", Pipe),
        ],
        '^' => &[("^=", CaretEqual), ("^", Caret)],
        _ => &[],
    }
}

struct Lexer<'src> {
    source: &'src str,
    index: usize,
    diagnostics: DiagnosticBag,
}

impl<'src> Lexer<'src> {
    fn run(&mut self) -> LexResult {
        let mut tokens = Vec::new();

        loop {
            let token = self.next_token();
            let kind = token.kind;
            if kind != TokenKind::BadToken {
                tokens.push(token);
            }
            if kind == TokenKind::Eof {
                break;
            }
        }

        LexResult {
            tokens,
            diagnostics: core::mem::take(&mut self.diagnostics).into_vec(),
        }
    }

    fn next_token(&mut self) -> Token {
        self.skip_trivia();

        let start = self.index;
        let Some(ch) = self.peek_char() else {
            return Token::missing(TokenKind::Eof, start as u32);
        };

        if is_ident_start(ch) {
            return self.lex_ident_or_keyword(start);
        }
        if ch.is_ascii_digit() {
            return self.lex_number(start);
        }
        if ch == '"' {
            return self.lex_string(start);
        }
        if ch == '\'' {
            return self.lex_char(start);
        }

        let rest = &self.source[start..];
        for &(spelling, kind) in operators_starting_with(ch) {
            if rest.starts_with(spelling) {
                self.index += spelling.len();
                return self.token(kind, start, None);
            }
        }

        self.consume_char();
        self.diagnostics.report(
            "LEX001",
            self.span_from(start),
            format!("Unexpected character '{ch}'."),
        );
        self.token(TokenKind::BadToken, start, None)
    }

    fn skip_trivia(&mut self) {
        loop {
            match self.peek_char() {
                Some(ch) if ch.is_whitespace() => self.consume_char(),
                Some('/') if self.peek_next() == Some('/') => {
                    while let Some(ch) = self.peek_char() {
                        if ch == '\n' {
                            break;
                        }
                        self.consume_char();
                    }
                }
                Some('/') if self.peek_next() == Some('*') => {
                    let start = self.index;
                    self.index += 2;
                    let mut terminated = false;
                    while let Some(ch) = self.peek_char() {
                        if ch == '*' && self.peek_next() == Some('/') {
                            self.index += 2;
                            terminated = true;
                            break;
                        }
                        self.consume_char();
                    }
                    if !terminated {
                        self.diagnostics.report(
                            "LEX002",
                            self.span_from(start),
                            "Unterminated block comment.",
                        );
                    }
                }
                _ => break,
            }
        }
    }

    fn lex_ident_or_keyword(&mut self, start: usize) -> Token {
        while let Some(ch) = self.peek_char() {
            if is_ident_continue(ch) {
                self.consume_char();
            } else {
                break;
            }
        }

        let text = &self.source[start..self.index];
        match keyword_kind(text) {
            Some(TokenKind::True) => {
                self.token(TokenKind::True, start, Some(LiteralValue::Bool(true)))
            }
            Some(TokenKind::False) => {
                self.token(TokenKind::False, start, Some(LiteralValue::Bool(false)))
            }
            Some(kind) => self.token(kind, start, None),
            None => self.token(TokenKind::Identifier, start, None),
        }
    }

    fn lex_number(&mut self, start: usize) -> Token {
        if self.peek_char() == Some('0') {
            match self.peek_next() {
                Some('x' | 'X') => {
                    return self.lex_radix_integer(start, 16, "LEX003", "Invalid hex literal.");
                }
                Some('b' | 'B') => {
                    return self.lex_radix_integer(start, 2, "LEX004", "Invalid binary literal.");
                }
                _ => {}
            }
        }

        self.consume_digits();

        let mut is_float = false;
        if self.peek_char() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            is_float = true;
            self.consume_char(); // '.'
            self.consume_digits();
        }

        if matches!(self.peek_char(), Some('e' | 'E')) {
            is_float = true;
            self.consume_char();
            if matches!(self.peek_char(), Some('+' | '-')) {
                self.consume_char();
            }
            self.consume_digits();
        }

        let text = &self.source[start..self.index];
        if is_float {
            let value = match text.parse::<f64>() {
                Ok(value) => value,
                Err(_) => {
                    self.diagnostics
                        .report("LEX005", self.span_from(start), "Invalid float literal.");
                    0.0
                }
            };
            self.token(TokenKind::FloatLiteral, start, Some(LiteralValue::Float(value)))
        } else {
            let value = match text.parse::<i64>() {
                Ok(value) => value,
                Err(_) => {
                    self.diagnostics
                        .report("LEX006", self.span_from(start), "Invalid integer literal.");
                    0
                }
            };
            self.token(TokenKind::IntLiteral, start, Some(LiteralValue::Int(value)))
        }
    }

    /// `0x...` / `0b...`; values use the full 64 bits (two's complement).
    fn lex_radix_integer(
        &mut self,
        start: usize,
        radix: u32,
        code: &'static str,
        message: &'static str,
    ) -> Token {
        self.index += 2; // 0x / 0b
        while let Some(ch) = self.peek_char() {
            if ch.is_digit(radix) {
                self.consume_char();
            } else {
                break;
            }
        }

        let digits = &self.source[start + 2..self.index];
        let value = match u64::from_str_radix(digits, radix) {
            Ok(value) => value as i64,
            Err(_) => {
                self.diagnostics.report(code, self.span_from(start), message);
                0
            }
        };
        self.token(TokenKind::IntLiteral, start, Some(LiteralValue::Int(value)))
    }

    fn lex_string(&mut self, start: usize) -> Token {
        self.consume_char(); // opening quote

        let mut value = String::new();
        let mut terminated = false;
        while let Some(ch) = self.peek_char() {
            match ch {
                '"' => {
                    self.consume_char();
                    terminated = true;
                    break;
                }
                '\\' => {
                    self.consume_char();
                    let Some(escaped) = self.peek_char() else {
                        break;
                    };
                    value.push(unescape(escaped));
                    self.consume_char();
                }
                _ => {
                    value.push(ch);
                    self.consume_char();
                }
            }
        }

        if !terminated {
            self.diagnostics
                .report("LEX007", self.span_from(start), "Unterminated string literal.");
        }
        self.token(TokenKind::StringLiteral, start, Some(LiteralValue::String(value)))
    }

    fn lex_char(&mut self, start: usize) -> Token {
        self.consume_char(); // opening quote

        let value = match self.peek_char() {
            Some('\\') => {
                self.consume_char();
                let escaped = self.peek_char().map(unescape).unwrap_or('\0');
                self.consume_char();
                escaped
            }
            Some('\'') => {
                self.diagnostics
                    .report("LEX009", self.span_from(start), "Empty char literal.");
                '\0'
            }
            Some(ch) => {
                self.consume_char();
                ch
            }
            None => '\0',
        };

        if self.peek_char() == Some('\'') {
            self.consume_char();
        } else {
            self.diagnostics
                .report("LEX008", self.span_from(start), "Unterminated char literal.");
        }
        self.token(TokenKind::CharLiteral, start, Some(LiteralValue::Char(value)))
    }

    fn token(&self, kind: TokenKind, start: usize, value: Option<LiteralValue>) -> Token {
        Token {
            kind,
            text: self.source[start..self.index].to_string(),
            value,
            span: self.span_from(start),
        }
    }

    fn span_from(&self, start: usize) -> Span {
        Span::from_bounds(start as u32, self.index as u32)
    }

    fn consume_digits(&mut self) {
        while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
            self.consume_char();
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.source[self.index..].chars().next()
    }

    fn peek_next(&self) -> Option<char> {
        let mut chars = self.source[self.index..].chars();
        chars.next();
        chars.next()
    }

    fn consume_char(&mut self) {
        if let Some(ch) = self.peek_char() {
            self.index += ch.len_utf8();
        }
    }
}

fn unescape(ch: char) -> char {
    match ch {
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        '0' => '\0',
        // '\\', '\'', '"' and unknown escapes stand for themselves
        other => other,
    }
}

fn is_ident_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_'
}

fn is_ident_continue(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}
