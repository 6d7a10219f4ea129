//! Reading data in presentation format.
//!
//! Presentation format is the textual representation of DNS data used in
//! zone files. Each record is a sequence of whitespace separated tokens.
//! A token may be quoted in which case it may contain whitespace. Within
//! tokens, a backslash introduces an escape sequence: either a backslash
//! followed by three decimal digits giving an octet value or a backslash
//! followed by a single printable character which is then taken literally.
//!
//! The [`Scanner`] splits a string into tokens and offers methods to
//! convert them into the basic data types. The [`Symbol`] type deals with
//! the escape sequences within a token.
//!
//! Errors report the index of the token they were encountered at so that
//! a user can locate the problem.

use core::fmt;

//------------ Scanner -------------------------------------------------------

/// A scanner producing tokens from a string in presentation format.
///
/// Parentheses are accepted for grouping and otherwise ignored. A
/// semicolon starts a comment running to the end of the line.
#[derive(Clone, Debug)]
pub struct Scanner<'a> {
    /// The tokens of the input.
    tokens: Vec<Token<'a>>,

    /// The index of the next token.
    next: usize,
}

impl<'a> Scanner<'a> {
    /// Creates a scanner by splitting `s` into tokens.
    pub fn new(s: &'a str) -> Result<Self, ScanError> {
        Ok(Scanner {
            tokens: Self::tokenize(s)?,
            next: 0,
        })
    }

    fn tokenize(s: &'a str) -> Result<Vec<Token<'a>>, ScanError> {
        let mut res = Vec::new();
        let bytes = s.as_bytes();
        let mut pos = 0;
        while pos < bytes.len() {
            match bytes[pos] {
                b' ' | b'\t' | b'\r' | b'\n' | b'(' | b')' => pos += 1,
                b';' => {
                    while pos < bytes.len() && bytes[pos] != b'\n' {
                        pos += 1
                    }
                }
                b'"' => {
                    let start = pos + 1;
                    pos = start;
                    loop {
                        match bytes.get(pos) {
                            None => {
                                return Err(ScanError::new(
                                    "unterminated quoted string",
                                    res.len(),
                                ))
                            }
                            Some(b'\\') => pos += 2,
                            Some(b'"') => break,
                            Some(_) => pos += 1,
                        }
                    }
                    res.push(Token {
                        text: &s[start..pos],
                        quoted: true,
                    });
                    pos += 1;
                }
                _ => {
                    let start = pos;
                    while pos < bytes.len() {
                        match bytes[pos] {
                            b'\\' => pos += 2,
                            b' ' | b'\t' | b'\r' | b'\n' | b'(' | b')'
                            | b';' | b'"' => break,
                            _ => pos += 1,
                        }
                    }
                    let pos_end = pos.min(bytes.len());
                    if !s.is_char_boundary(pos_end) {
                        return Err(ScanError::new("bad escape", res.len()));
                    }
                    res.push(Token {
                        text: &s[start..pos_end],
                        quoted: false,
                    });
                    pos = pos_end;
                }
            }
        }
        Ok(res)
    }

    /// Returns whether there are tokens left.
    pub fn has_more(&self) -> bool {
        self.next < self.tokens.len()
    }

    /// Returns the index of the next token.
    pub fn pos(&self) -> usize {
        self.next
    }

    /// Returns the next token without consuming it.
    pub fn peek(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.next)
    }

    /// Returns the next token.
    pub fn next_token(&mut self) -> Result<Token<'a>, ScanError> {
        match self.tokens.get(self.next) {
            Some(token) => {
                self.next += 1;
                Ok(*token)
            }
            None => Err(ScanError::new("unexpected end of input", self.next)),
        }
    }

    /// Creates an error for the most recently returned token.
    pub fn error(&self, msg: &'static str) -> ScanError {
        ScanError::new(msg, self.next.saturating_sub(1))
    }

    /// Returns the next unquoted token as a string slice.
    pub fn scan_str(&mut self) -> Result<&'a str, ScanError> {
        let token = self.next_token()?;
        if token.quoted {
            return Err(self.error("unexpected quoted string"));
        }
        Ok(token.text)
    }

    /// Scans a decimal integer.
    pub fn scan_int<T: core::str::FromStr>(&mut self) -> Result<T, ScanError> {
        let token = self.scan_str()?;
        token.parse().map_err(|_| self.error("invalid integer"))
    }

    /// Scans a token and converts it via its `FromStr` impl.
    pub fn scan_parse<T: core::str::FromStr>(
        &mut self,
        msg: &'static str,
    ) -> Result<T, ScanError> {
        let token = self.scan_str()?;
        token.parse().map_err(|_| self.error(msg))
    }

    /// Scans a token and returns its unescaped octets.
    pub fn scan_octets(&mut self) -> Result<Vec<u8>, ScanError> {
        let token = self.next_token()?;
        token.to_octets().map_err(|_| self.error("bad escape"))
    }

    /// Concatenates all remaining tokens.
    ///
    /// This is used for data such as Base 64 or hex that may be split into
    /// several tokens.
    pub fn scan_remaining(&mut self) -> String {
        let mut res = String::new();
        while let Some(token) = self.tokens.get(self.next) {
            res.push_str(token.text);
            self.next += 1;
        }
        res
    }

    /// Scans all remaining tokens as hex data.
    pub fn scan_hex_remaining(&mut self) -> Result<Vec<u8>, ScanError> {
        let text = self.scan_remaining();
        crate::utils::base16::decode(&text)
            .map_err(|_| self.error("invalid hex data"))
    }

    /// Scans all remaining tokens as Base 64 data.
    pub fn scan_base64_remaining(&mut self) -> Result<Vec<u8>, ScanError> {
        use base64::Engine;

        let text = self.scan_remaining();
        base64::engine::general_purpose::STANDARD
            .decode(text)
            .map_err(|_| self.error("invalid base64 data"))
    }

    /// Returns an error if there are tokens left.
    pub fn done(&self) -> Result<(), ScanError> {
        if self.has_more() {
            Err(ScanError::new("trailing data", self.next))
        } else {
            Ok(())
        }
    }
}

//------------ Token ---------------------------------------------------------

/// A single token of presentation format data.
///
/// The text of the token still contains all escape sequences. For quoted
/// tokens, the quotes have been removed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub quoted: bool,
}

impl<'a> Token<'a> {
    /// Returns an iterator over the symbols of the token.
    pub fn symbols(&self) -> Symbols<'a> {
        Symbols {
            chars: self.text.chars(),
        }
    }

    /// Returns the octets represented by the token.
    pub fn to_octets(&self) -> Result<Vec<u8>, SymbolCharsError> {
        let mut res = Vec::with_capacity(self.text.len());
        for sym in self.symbols() {
            res.push(sym?.into_octet()?);
        }
        Ok(res)
    }
}

//------------ Symbols -------------------------------------------------------

/// An iterator over the symbols of a string.
#[derive(Clone, Debug)]
pub struct Symbols<'a> {
    chars: core::str::Chars<'a>,
}

impl<'a> Iterator for Symbols<'a> {
    type Item = Result<Symbol, SymbolCharsError>;

    fn next(&mut self) -> Option<Self::Item> {
        Symbol::from_chars(&mut self.chars).transpose()
    }
}

//------------ Symbol --------------------------------------------------------

/// The octet representation of a single symbol of presentation format.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Symbol {
    /// An unescaped Unicode character.
    Char(char),

    /// An escape character by simply being backslash-escaped.
    SimpleEscape(u8),

    /// An escaped character using the decimal escape sequence.
    DecimalEscape(u8),
}

impl Symbol {
    /// Reads a symbol from a character source.
    ///
    /// Returns the next symbol in the source, `Ok(None)` if the source has
    /// been exhausted, or an error if there wasn’t a valid symbol.
    pub fn from_chars<C>(chars: C) -> Result<Option<Self>, SymbolCharsError>
    where
        C: IntoIterator<Item = char>,
    {
        let mut chars = chars.into_iter();
        let ch = match chars.next() {
            Some(ch) => ch,
            None => return Ok(None),
        };
        if ch != '\\' {
            return Ok(Some(Symbol::Char(ch)));
        }
        match chars.next() {
            Some(ch) if ch.is_ascii_digit() => {
                let mut res = (ch as u32) - u32::from(b'0');
                for _ in 0..2 {
                    let digit = chars
                        .next()
                        .ok_or(SymbolCharsError::ShortInput)?
                        .to_digit(10)
                        .ok_or(SymbolCharsError::BadEscape)?;
                    res = res * 10 + digit;
                }
                let res =
                    u8::try_from(res).map_err(|_| SymbolCharsError::BadEscape)?;
                Ok(Some(Symbol::DecimalEscape(res)))
            }
            Some(ch) => {
                let ch =
                    u8::try_from(ch).map_err(|_| SymbolCharsError::BadEscape)?;
                if !(0x20..=0x7e).contains(&ch) {
                    Err(SymbolCharsError::BadEscape)
                } else {
                    Ok(Some(Symbol::SimpleEscape(ch)))
                }
            }
            None => Err(SymbolCharsError::ShortInput),
        }
    }

    /// Provides the best symbol for an octet.
    ///
    /// Printable ASCII characters other than those in `specials` are
    /// represented as themselves, the special characters are simply
    /// escaped, and everything else uses a decimal escape.
    pub fn display_from_octet(ch: u8, specials: &[u8]) -> Self {
        if ch == b'\\' || specials.contains(&ch) {
            Symbol::SimpleEscape(ch)
        } else if (0x21..0x7f).contains(&ch) {
            Symbol::Char(ch.into())
        } else {
            Symbol::DecimalEscape(ch)
        }
    }

    /// Converts the symbol into an octet if it represents one.
    ///
    /// Unescaped characters must be ASCII.
    pub fn into_octet(self) -> Result<u8, SymbolCharsError> {
        match self {
            Symbol::Char(ch) => {
                u8::try_from(ch).map_err(|_| SymbolCharsError::BadEscape)
            }
            Symbol::SimpleEscape(ch) | Symbol::DecimalEscape(ch) => Ok(ch),
        }
    }

    /// Returns whether the symbol is the unescaped character `ch`.
    pub fn is_char(self, ch: char) -> bool {
        self == Symbol::Char(ch)
    }
}

//--- Display

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Symbol::Char(ch) => write!(f, "{}", ch),
            Symbol::SimpleEscape(ch) => write!(f, "\\{}", ch as char),
            Symbol::DecimalEscape(ch) => write!(f, "\\{:03}", ch),
        }
    }
}

//============ Error Types ===================================================

//------------ SymbolCharsError ----------------------------------------------

/// An error happened when reading a symbol.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SymbolCharsError {
    /// An illegal escape sequence was encountered.
    BadEscape,

    /// Unexpected end of input.
    ShortInput,
}

impl fmt::Display for SymbolCharsError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            SymbolCharsError::BadEscape => f.write_str("illegal escape sequence"),
            SymbolCharsError::ShortInput => f.write_str("unexpected end of input"),
        }
    }
}

impl std::error::Error for SymbolCharsError {}

//------------ ScanError -----------------------------------------------------

/// Presentation format data could not be scanned.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ScanError {
    /// What went wrong.
    msg: &'static str,

    /// The index of the offending token.
    token: usize,
}

impl ScanError {
    /// Creates a new error for the token with the given index.
    pub fn new(msg: &'static str, token: usize) -> Self {
        ScanError { msg, token }
    }

    /// Returns the error message.
    pub fn msg(&self) -> &'static str {
        self.msg
    }

    /// Returns the index of the token that caused the error.
    pub fn token(&self) -> usize {
        self.token
    }
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} at token {}", self.msg, self.token)
    }
}

impl std::error::Error for ScanError {}

//============ Testing =======================================================
