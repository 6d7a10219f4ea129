//! Character strings.
//!
//! The somewhat ill-named `<character-string>` is defined in [RFC 1035] as
//! binary information of up to 255 octets. As such, it doesn’t necessarily
//! contain (ASCII-) characters nor is it a string in a Rust-sense.
//!
//! In wire format, a character string is preceded by a single octet
//! giving its length. In presentation format, it is a token, typically
//! quoted, with non-printable octets escaped.
//!
//! [RFC 1035]: https://tools.ietf.org/html/rfc1035

use super::scan::{Scanner, ScanError, Symbol};
use super::wire::{Composer, ParseError, Parser};
use bytes::Bytes;
use core::fmt;

//------------ CharStr -------------------------------------------------------

/// The content of a DNS character string.
#[derive(Clone, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct CharStr(Bytes);

impl CharStr {
    /// The maximum length of a character string.
    pub const MAX_LEN: usize = 255;

    /// Creates a character string from octets.
    pub fn from_octets(octets: impl Into<Bytes>) -> Result<Self, CharStrError> {
        let octets = octets.into();
        if octets.len() > Self::MAX_LEN {
            Err(CharStrError)
        } else {
            Ok(CharStr(octets))
        }
    }

    /// Returns the octets of the string.
    pub fn as_slice(&self) -> &[u8] {
        self.0.as_ref()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the length of the wire format.
    pub fn compose_len(&self) -> usize {
        self.0.len() + 1
    }

    /// Takes a character string from the beginning of a parser.
    pub fn parse(parser: &mut Parser) -> Result<Self, ParseError> {
        let data = parser.parse_u8_prefixed()?;
        Ok(CharStr(Bytes::copy_from_slice(data)))
    }

    /// Appends the wire format of the string.
    pub fn compose(&self, target: &mut Composer) {
        // The length is limited to 255 by construction.
        target.append_u8(self.0.len() as u8);
        target.append_slice(self.as_slice());
    }

    /// Scans a character string from the next token.
    pub fn scan(scanner: &mut Scanner) -> Result<Self, ScanError> {
        let octets = scanner.scan_octets()?;
        Self::from_octets(octets)
            .map_err(|_| scanner.error("character string too long"))
    }
}

//--- Display and Debug

impl fmt::Display for CharStr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("\"")?;
        for &ch in self.as_slice() {
            match ch {
                b' ' => f.write_str(" ")?,
                _ => fmt::Display::fmt(
                    &Symbol::display_from_octet(ch, b"\""),
                    f,
                )?,
            }
        }
        f.write_str("\"")
    }
}

impl fmt::Debug for CharStr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("CharStr")
            .field(&format_args!("{}", self))
            .finish()
    }
}

//------------ CharStrError --------------------------------------------------

/// A byte sequence does not represent a valid character string.
///
/// This can only mean that the sequence is longer than 255 bytes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CharStrError;

impl fmt::Display for CharStrError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("long character string")
    }
}

impl std::error::Error for CharStrError {}

//============ Testing =======================================================
