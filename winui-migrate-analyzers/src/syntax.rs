//! Token scanner for C# sources.
//!
//! Only what the migration rules need: identifiers, punctuation and literal
//! boundaries. Comments, preprocessor lines and whitespace are trivia and do
//! not produce tokens. Literals are kept as single opaque tokens so rules
//! never match inside strings.

use winui_migrate_types::TextSpan;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Ident,
    Punct,
    Number,
    String,
    Char,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: TextSpan,
}

impl Token {
    pub fn text<'a>(&self, src: &'a str) -> &'a str {
        &src[self.span.start..self.span.end]
    }

    pub fn is_ident(&self, src: &str, word: &str) -> bool {
        self.kind == TokenKind::Ident && self.text(src) == word
    }

    pub fn is_punct(&self, src: &str, c: char) -> bool {
        self.kind == TokenKind::Punct && self.text(src).starts_with(c)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub offset: usize,
    pub message: String,
}

pub fn tokenize(src: &str) -> Result<Vec<Token>, LexError> {
    Lexer {
        src,
        bytes: src.as_bytes(),
        pos: 0,
        line_start: true,
        out: Vec::new(),
    }
    .run()
}

struct Lexer<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    line_start: bool,
    out: Vec<Token>,
}

impl Lexer<'_> {
    fn run(mut self) -> Result<Vec<Token>, LexError> {
        while let Some(c) = self.peek_char() {
            let start = self.pos;
            match c {
                '\n' => {
                    self.pos += 1;
                    self.line_start = true;
                    continue;
                }
                c if c.is_whitespace() => {
                    self.pos += c.len_utf8();
                    continue;
                }
                '#' if self.line_start => {
                    self.skip_line();
                    continue;
                }
                '/' if self.at("//") => {
                    self.skip_line();
                    continue;
                }
                '/' if self.at("/*") => {
                    let Some(end) = self.src[start + 2..].find("*/") else {
                        return Err(self.error(start, "unterminated block comment"));
                    };
                    self.pos = start + 2 + end + 2;
                    continue;
                }
                '"' => self.string(start, false, false)?,
                '@' if self.at("@\"") => self.string(start, true, false)?,
                '$' if self.at("$\"") => self.string(start, false, true)?,
                '$' if self.at("$@\"") || self.at("@$\"") => self.string(start, true, true)?,
                '@' if self.at("@$\"") => self.string(start, true, true)?,
                '\'' => self.char_literal(start)?,
                c if c == '_' || c == '@' || c.is_alphabetic() => {
                    self.pos += c.len_utf8();
                    self.eat_while(|c| c == '_' || c.is_alphanumeric());
                    self.push(TokenKind::Ident, start);
                }
                c if c.is_ascii_digit() => {
                    self.pos += 1;
                    self.number_tail();
                    self.push(TokenKind::Number, start);
                }
                c => {
                    self.pos += c.len_utf8();
                    self.push(TokenKind::Punct, start);
                }
            }
            self.line_start = false;
        }
        Ok(self.out)
    }

    fn peek_char(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn at(&self, s: &str) -> bool {
        self.src[self.pos..].starts_with(s)
    }

    fn push(&mut self, kind: TokenKind, start: usize) {
        self.out.push(Token {
            kind,
            span: TextSpan::new(start, self.pos),
        });
    }

    fn error(&self, offset: usize, message: &str) -> LexError {
        LexError {
            offset,
            message: message.to_string(),
        }
    }

    fn eat_while(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(c) = self.peek_char() {
            if !pred(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn skip_line(&mut self) {
        match self.src[self.pos..].find('\n') {
            Some(n) => self.pos += n,
            None => self.pos = self.src.len(),
        }
    }

    fn number_tail(&mut self) {
        while self.pos < self.bytes.len() {
            let b = self.bytes[self.pos];
            let decimal_point =
                b == b'.' && self.bytes.get(self.pos + 1).is_some_and(|n| n.is_ascii_digit());
            if b.is_ascii_alphanumeric() || b == b'_' || decimal_point {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn char_literal(&mut self, start: usize) -> Result<(), LexError> {
        self.pos += 1;
        loop {
            match self.bytes.get(self.pos) {
                None | Some(b'\n') => return Err(self.error(start, "unterminated character literal")),
                Some(b'\\') => self.pos += 2,
                Some(b'\'') => {
                    self.pos += 1;
                    break;
                }
                Some(_) => self.pos += 1,
            }
        }
        self.push(TokenKind::Char, start);
        Ok(())
    }

    /// Strings, including verbatim (`@"..."`) and interpolated (`$"..."`) forms.
    fn string(&mut self, start: usize, verbatim: bool, interpolated: bool) -> Result<(), LexError> {
        self.pos = start + self.src[start..].find('"').unwrap_or(0) + 1;
        self.string_body(start, verbatim, interpolated)?;
        self.push(TokenKind::String, start);
        Ok(())
    }

    fn string_body(&mut self, start: usize, verbatim: bool, interpolated: bool) -> Result<(), LexError> {
        let mut holes = 0usize;
        loop {
            let Some(&b) = self.bytes.get(self.pos) else {
                return Err(self.error(start, "unterminated string literal"));
            };
            match b {
                b'\n' if !verbatim && holes == 0 => {
                    return Err(self.error(start, "unterminated string literal"));
                }
                b'\\' if !verbatim && holes == 0 => self.pos += 2,
                b'"' if holes > 0 => {
                    // nested string inside an interpolation hole
                    self.pos += 1;
                    self.string_body(self.pos - 1, false, false)?;
                }
                b'"' if verbatim && self.bytes.get(self.pos + 1) == Some(&b'"') => self.pos += 2,
                b'"' => {
                    self.pos += 1;
                    return Ok(());
                }
                b'{' if interpolated => {
                    if holes == 0 && self.bytes.get(self.pos + 1) == Some(&b'{') {
                        self.pos += 2;
                    } else {
                        holes += 1;
                        self.pos += 1;
                    }
                }
                b'}' if interpolated && holes > 0 => {
                    holes -= 1;
                    self.pos += 1;
                }
                _ => self.pos += 1,
            }
        }
    }
}

/// A maximal `Ident (. Ident)*` run, e.g. `Windows.UI.Xaml.Thickness`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DottedName {
    /// Indices of the identifier tokens, in order.
    pub segments: Vec<usize>,
    pub span: TextSpan,
}

impl DottedName {
    pub fn text(&self, src: &str, tokens: &[Token]) -> String {
        self.segments
            .iter()
            .map(|&i| tokens[i].text(src))
            .collect::<Vec<_>>()
            .join(".")
    }

    pub fn is_qualified(&self) -> bool {
        self.segments.len() > 1
    }

    /// Index of the token just after the name.
    pub fn next_token(&self) -> usize {
        self.segments.last().map(|i| i + 1).unwrap_or(0)
    }
}

/// All dotted names, skipping ones that are member accesses on something
/// other than a name (e.g. `foo().Bar`) and `global::` aliases.
pub fn dotted_names(src: &str, tokens: &[Token]) -> Vec<DottedName> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        let t = tokens[i];
        let after_dot = i > 0 && tokens[i - 1].is_punct(src, '.');
        let after_alias =
            i > 1 && tokens[i - 1].is_punct(src, ':') && tokens[i - 2].is_punct(src, ':');
        if t.kind != TokenKind::Ident || after_dot || after_alias {
            i += 1;
            continue;
        }
        let mut segments = vec![i];
        let mut j = i + 1;
        while j + 1 < tokens.len()
            && tokens[j].is_punct(src, '.')
            && tokens[j + 1].kind == TokenKind::Ident
        {
            segments.push(j + 1);
            j += 2;
        }
        let last = *segments.last().unwrap_or(&i);
        out.push(DottedName {
            span: TextSpan::new(t.span.start, tokens[last].span.end),
            segments,
        });
        i = j;
    }
    out
}

/// Number of top-level arguments between `open` (a `(` token) and its match.
///
/// Returns `None` when the parentheses are unbalanced.
pub fn argument_count(src: &str, tokens: &[Token], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut commas = 0usize;
    let mut any = false;
    for t in &tokens[open..] {
        if t.kind == TokenKind::Punct {
            match t.text(src) {
                "(" | "[" | "{" => {
                    depth += 1;
                    if depth == 1 {
                        continue;
                    }
                }
                ")" | "]" | "}" => {
                    depth = depth.checked_sub(1)?;
                    if depth == 0 {
                        return Some(if any { commas + 1 } else { 0 });
                    }
                }
                "," if depth == 1 => {
                    commas += 1;
                    continue;
                }
                _ => {}
            }
        }
        if depth >= 1 {
            any = true;
        }
    }
    None
}
