//! Record data for types consisting of character strings.
//!
//! This is a private module. It’s content is re-exported by the parent.

use crate::base::charstr::CharStr;
use crate::base::iana::Rtype;
use crate::base::name::Compressor;
use crate::base::rdata::ComposeRecordData;
use crate::base::scan::{ScanError, Scanner};
use crate::base::wire::{Composer, ParseError, Parser};
use core::fmt;

//------------ Strings -------------------------------------------------------

/// Record data consisting of a sequence of character strings.
///
/// This shape is used by the TXT type of [RFC 1035, section 3.3.14][1]
/// which carries one or more strings, the SPF type of [RFC 4408] which
/// shares TXT’s format, and the HINFO type of
/// [RFC 1035, section 3.3.2][2] which has exactly two strings for the CPU
/// and OS of a host.
///
/// [1]: https://tools.ietf.org/html/rfc1035#section-3.3.14
/// [2]: https://tools.ietf.org/html/rfc1035#section-3.3.2
/// [RFC 4408]: https://tools.ietf.org/html/rfc4408
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Strings {
    rtype: Rtype,
    strings: Vec<CharStr>,
}

impl Strings {
    /// Creates new record data from a list of strings.
    ///
    /// Returns an error if the number of strings isn’t acceptable for the
    /// record type.
    pub fn new(
        rtype: Rtype,
        strings: Vec<CharStr>,
    ) -> Result<Self, StringsError> {
        Self::check_count(rtype, strings.len())?;
        Ok(Strings { rtype, strings })
    }

    /// Creates TXT record data from a single string.
    pub fn txt(text: CharStr) -> Self {
        Strings {
            rtype: Rtype::TXT,
            strings: vec![text],
        }
    }

    /// Creates HINFO record data.
    pub fn hinfo(cpu: CharStr, os: CharStr) -> Self {
        Strings {
            rtype: Rtype::HINFO,
            strings: vec![cpu, os],
        }
    }

    fn check_count(rtype: Rtype, count: usize) -> Result<(), StringsError> {
        let ok = match rtype {
            Rtype::HINFO => count == 2,
            _ => count > 0,
        };
        if ok {
            Ok(())
        } else {
            Err(StringsError)
        }
    }

    /// Returns an iterator over the strings.
    pub fn iter(&self) -> impl Iterator<Item = &CharStr> + '_ {
        self.strings.iter()
    }

    /// Returns the concatenated content of all strings.
    pub fn text(&self) -> Vec<u8> {
        self.strings
            .iter()
            .flat_map(|s| s.as_slice().iter().copied())
            .collect()
    }

    pub fn parse(rtype: Rtype, parser: &mut Parser) -> Result<Self, ParseError> {
        let mut strings = Vec::new();
        while parser.remaining() > 0 {
            strings.push(CharStr::parse(parser)?);
        }
        Self::new(rtype, strings)
            .map_err(|_| ParseError::form_error("invalid number of strings"))
    }

    pub fn scan(rtype: Rtype, scanner: &mut Scanner) -> Result<Self, ScanError> {
        let mut strings = Vec::new();
        while scanner.has_more() {
            strings.push(CharStr::scan(scanner)?);
        }
        Self::new(rtype, strings)
            .map_err(|_| scanner.error("invalid number of strings"))
    }
}

//--- ComposeRecordData

impl ComposeRecordData for Strings {
    fn rtype(&self) -> Rtype {
        self.rtype
    }

    fn compose_rdata(
        &self,
        target: &mut Composer,
        _compressor: Option<&mut Compressor>,
    ) {
        for s in &self.strings {
            s.compose(target)
        }
    }

    fn compose_canonical_rdata(&self, target: &mut Composer) {
        self.compose_rdata(target, None)
    }
}

//--- Display

impl fmt::Display for Strings {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut first = true;
        for s in &self.strings {
            if !first {
                f.write_str(" ")?;
            }
            first = false;
            fmt::Display::fmt(s, f)?;
        }
        Ok(())
    }
}

//------------ StringsError --------------------------------------------------

/// The number of strings is not valid for the record type.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct StringsError;

impl fmt::Display for StringsError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("invalid number of strings")
    }
}

impl std::error::Error for StringsError {}

//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::*;

    fn cs(s: &'static str) -> CharStr {
        CharStr::from_octets(s.as_bytes()).unwrap()
    }

    #[test]
    fn txt() {
        let mut scanner =
            Scanner::new("\"v=spf1 -all\" more \"\\\"quoted\\\"\"").unwrap();
        let rdata = Strings::scan(Rtype::TXT, &mut scanner).unwrap();
        assert_eq!(rdata.iter().count(), 3);
        assert_eq!(rdata.text(), b"v=spf1 -allmore\"quoted\"");
        assert_eq!(
            rdata.to_string(),
            "\"v=spf1 -all\" \"more\" \"\\\"quoted\\\"\""
        );

        let mut target = Composer::new();
        rdata.compose_rdata(&mut target, None);
        let mut parser = Parser::from_ref(target.as_slice());
        assert_eq!(Strings::parse(Rtype::TXT, &mut parser), Ok(rdata));
    }

    #[test]
    fn counts() {
        assert!(Strings::new(Rtype::TXT, Vec::new()).is_err());
        assert!(Strings::new(Rtype::HINFO, vec![cs("x86")]).is_err());
        let hinfo = Strings::hinfo(cs("x86"), cs("Linux"));
        assert_eq!(hinfo.to_string(), "\"x86\" \"Linux\"");

        let mut parser = Parser::from_ref(b"\x03x86");
        assert_eq!(
            Strings::parse(Rtype::HINFO, &mut parser),
            Err(ParseError::form_error("invalid number of strings"))
        );
    }
}
