//! Comment- and string-aware tokenizer for C# source text.
//!
//! This is not a full C# lexer. It recognizes just enough structure for the
//! declaration heuristics to run over tokens instead of raw text:
//! identifiers, numbers, string/char literals (as opaque tokens) and
//! punctuation. Comments and preprocessor lines are dropped.
//!
//! `>` is always emitted as a single token so that nested generic argument
//! lists (`List<List<int>>`) close one level per token.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Ident,
    Number,
    Str,
    Char,
    Punct,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
    /// 1-based line of the first character.
    pub line: u32,
}

impl<'a> Token<'a> {
    pub fn is_ident(&self) -> bool {
        self.kind == TokenKind::Ident
    }

    pub fn is_ident_text(&self, text: &str) -> bool {
        self.kind == TokenKind::Ident && self.text == text
    }

    pub fn is_punct(&self, text: &str) -> bool {
        self.kind == TokenKind::Punct && self.text == text
    }
}

/// Punctuation longer than one byte, longest first.
const MULTI_PUNCT: &[&str] = &[
    "??=", "<<=", "&&", "||", "=>", "??", "?.", "::", "==", "!=", "<=", ">=", "<<", "++", "--",
    "->", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=",
];

const BOM: char = '\u{FEFF}';

/// Tokenize `source`. Never fails: unterminated literals and comments run to
/// end of input.
pub fn tokenize(source: &str) -> Vec<Token<'_>> {
    Lexer::new(source).run()
}

struct Lexer<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    line: u32,
    at_line_start: bool,
    tokens: Vec<Token<'a>>,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            // A leading byte-order mark is not part of the first token.
            pos: src.strip_prefix(BOM).map_or(0, |_| BOM.len_utf8()),
            line: 1,
            at_line_start: true,
            tokens: Vec::new(),
        }
    }

    fn run(mut self) -> Vec<Token<'a>> {
        while self.pos < self.bytes.len() {
            let b = self.bytes[self.pos];
            match b {
                b'\n' => {
                    self.line += 1;
                    self.pos += 1;
                    self.at_line_start = true;
                }
                b' ' | b'\t' | b'\r' | 0x0b | 0x0c => self.pos += 1,
                b'/' if self.peek(1) == Some(b'/') => self.skip_line(),
                b'/' if self.peek(1) == Some(b'*') => self.skip_block_comment(),
                b'#' if self.at_line_start => self.skip_line(),
                _ => {
                    self.at_line_start = false;
                    self.lex_token();
                }
            }
        }
        self.tokens
    }

    fn peek(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn skip_line(&mut self) {
        while self.pos < self.bytes.len() && self.bytes[self.pos] != b'\n' {
            self.pos += 1;
        }
    }

    fn skip_block_comment(&mut self) {
        self.pos += 2;
        while self.pos < self.bytes.len() {
            if self.bytes[self.pos] == b'*' && self.peek(1) == Some(b'/') {
                self.pos += 2;
                return;
            }
            if self.bytes[self.pos] == b'\n' {
                self.line += 1;
            }
            self.pos += 1;
        }
    }

    fn push(&mut self, kind: TokenKind, start: usize, line: u32) {
        self.tokens.push(Token {
            kind,
            text: &self.src[start..self.pos],
            start,
            end: self.pos,
            line,
        });
    }

    fn lex_token(&mut self) {
        let start = self.pos;
        let line = self.line;
        let b = self.bytes[self.pos];

        if let Some(prefix_len) = self.string_prefix_len() {
            self.lex_string(prefix_len);
            self.push(TokenKind::Str, start, line);
            return;
        }

        match b {
            b'\'' => {
                self.lex_char();
                self.push(TokenKind::Char, start, line);
            }
            b'0'..=b'9' => {
                self.lex_number();
                self.push(TokenKind::Number, start, line);
            }
            b'.' if self.peek(1).is_some_and(|n| n.is_ascii_digit()) => {
                self.lex_number();
                self.push(TokenKind::Number, start, line);
            }
            b'@' if self.peek(1).is_some_and(is_ident_start) => {
                self.pos += 1;
                self.lex_ident();
                self.push(TokenKind::Ident, start, line);
            }
            _ if is_ident_start(b) => {
                self.lex_ident();
                self.push(TokenKind::Ident, start, line);
            }
            _ => {
                let rest = &self.src[self.pos..];
                let len = MULTI_PUNCT
                    .iter()
                    .find(|p| rest.starts_with(**p))
                    .map_or(1, |p| p.len());
                self.pos += len;
                self.push(TokenKind::Punct, start, line);
            }
        }
    }

    /// Length of a string literal prefix (`"`, `@"`, `$"`, `$@"`, `@$"`,
    /// `$$"""` ...) starting at the cursor, measured up to but excluding the
    /// first quote.
    fn string_prefix_len(&self) -> Option<usize> {
        let mut i = 0;
        while let Some(b) = self.peek(i) {
            match b {
                b'$' | b'@' => i += 1,
                b'"' => return Some(i),
                _ => return None,
            }
        }
        None
    }

    fn lex_string(&mut self, prefix_len: usize) {
        let prefix = &self.bytes[self.pos..self.pos + prefix_len];
        let verbatim = prefix.contains(&b'@');
        let interpolated = prefix.contains(&b'$');
        self.pos += prefix_len;

        let quotes = self.bytes[self.pos..]
            .iter()
            .take_while(|&&b| b == b'"')
            .count();
        if quotes >= 3 {
            self.lex_raw_string(quotes);
            return;
        }

        self.pos += 1;
        let mut hole_depth = 0usize;
        while self.pos < self.bytes.len() {
            let b = self.bytes[self.pos];
            if hole_depth > 0 {
                match b {
                    b'{' => hole_depth += 1,
                    b'}' => hole_depth -= 1,
                    b'"' | b'\'' | b'$' | b'@' => {
                        // Nested literal inside an interpolation hole.
                        if let Some(len) = self.string_prefix_len() {
                            self.lex_string(len);
                            continue;
                        }
                        if b == b'\'' {
                            self.lex_char();
                            continue;
                        }
                    }
                    b'\n' => self.line += 1,
                    _ => {}
                }
                self.pos += 1;
                continue;
            }
            match b {
                b'\\' if !verbatim => self.pos += 2,
                b'"' if verbatim && self.peek(1) == Some(b'"') => self.pos += 2,
                b'"' => {
                    self.pos += 1;
                    return;
                }
                b'{' if interpolated && self.peek(1) == Some(b'{') => self.pos += 2,
                b'{' if interpolated => {
                    hole_depth = 1;
                    self.pos += 1;
                }
                b'\n' if !verbatim => return,
                b'\n' => {
                    self.line += 1;
                    self.pos += 1;
                }
                _ => self.pos += 1,
            }
        }
        self.pos = self.pos.min(self.bytes.len());
    }

    fn lex_raw_string(&mut self, quotes: usize) {
        self.pos += quotes;
        while self.pos < self.bytes.len() {
            if self.bytes[self.pos] == b'"' {
                let run = self.bytes[self.pos..]
                    .iter()
                    .take_while(|&&b| b == b'"')
                    .count();
                self.pos += run;
                if run >= quotes {
                    return;
                }
                continue;
            }
            if self.bytes[self.pos] == b'\n' {
                self.line += 1;
            }
            self.pos += 1;
        }
    }

    fn lex_char(&mut self) {
        self.pos += 1;
        while self.pos < self.bytes.len() {
            match self.bytes[self.pos] {
                b'\\' => self.pos += 2,
                b'\'' => {
                    self.pos += 1;
                    return;
                }
                b'\n' => return,
                _ => self.pos += 1,
            }
        }
        self.pos = self.pos.min(self.bytes.len());
    }

    fn lex_number(&mut self) {
        while self.pos < self.bytes.len() {
            let b = self.bytes[self.pos];
            let continues = b.is_ascii_alphanumeric()
                || b == b'_'
                || (b == b'.' && self.peek(1).is_some_and(|n| n.is_ascii_digit()));
            if !continues {
                break;
            }
            self.pos += 1;
        }
    }

    fn lex_ident(&mut self) {
        while self.pos < self.bytes.len() && is_ident_continue(self.bytes[self.pos]) {
            self.pos += 1;
        }
    }
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b >= 0x80
}

fn is_ident_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b >= 0x80
}
