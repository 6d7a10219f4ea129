//! Record data for the A record.
//!
//! This is a private module. It’s content is re-exported by the parent.

use crate::base::iana::Rtype;
use crate::base::name::Compressor;
use crate::base::rdata::ComposeRecordData;
use crate::base::scan::{ScanError, Scanner};
use crate::base::wire::{Composer, ParseError, Parser};
use core::fmt;
use core::str::FromStr;
use std::net::Ipv4Addr;

//------------ A ------------------------------------------------------------

/// A record data.
///
/// A records convey the IPv4 address of a host. The wire format is the 32
/// bit IPv4 address in network byte order. The representation file format
/// is the usual dotted notation.
///
/// The A record type is defined in [RFC 1035, section 3.4.1][1].
///
/// [1]: https://tools.ietf.org/html/rfc1035#section-3.4.1
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct A {
    addr: Ipv4Addr,
}

impl A {
    /// The rtype of this record data type.
    pub(crate) const RTYPE: Rtype = Rtype::A;

    /// Creates a new A record data from an IPv4 address.
    #[must_use]
    pub fn new(addr: Ipv4Addr) -> A {
        A { addr }
    }

    /// Creates a new A record from the IPv4 address components.
    #[must_use]
    pub fn from_octets(a: u8, b: u8, c: u8, d: u8) -> A {
        A::new(Ipv4Addr::new(a, b, c, d))
    }

    #[must_use]
    pub fn addr(&self) -> Ipv4Addr {
        self.addr
    }

    pub fn parse(parser: &mut Parser) -> Result<Self, ParseError> {
        parser.parse_u32().map(|addr| A::new(addr.into()))
    }

    pub fn scan(scanner: &mut Scanner) -> Result<Self, ScanError> {
        scanner.scan_parse("invalid IPv4 address").map(A::new)
    }
}

//--- From and FromStr

impl From<Ipv4Addr> for A {
    fn from(addr: Ipv4Addr) -> Self {
        Self::new(addr)
    }
}

impl From<A> for Ipv4Addr {
    fn from(a: A) -> Self {
        a.addr
    }
}

impl FromStr for A {
    type Err = <Ipv4Addr as FromStr>::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ipv4Addr::from_str(s).map(A::new)
    }
}

//--- ComposeRecordData

impl ComposeRecordData for A {
    fn rtype(&self) -> Rtype {
        A::RTYPE
    }

    fn compose_rdata(
        &self,
        target: &mut Composer,
        _compressor: Option<&mut Compressor>,
    ) {
        target.append_slice(&self.addr.octets())
    }

    fn compose_canonical_rdata(&self, target: &mut Composer) {
        self.compose_rdata(target, None)
    }
}

//--- Display

impl fmt::Display for A {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.addr, f)
    }
}

//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn a_wire_and_text() {
        let rdata = A::from_octets(192, 0, 2, 1);
        let mut target = Composer::new();
        rdata.compose_rdata(&mut target, None);
        assert_eq!(target.as_slice(), b"\xc0\x00\x02\x01");
        let mut parser = Parser::from_ref(target.as_slice());
        assert_eq!(A::parse(&mut parser), Ok(rdata));

        let mut scanner = Scanner::new("192.0.2.1").unwrap();
        assert_eq!(A::scan(&mut scanner), Ok(rdata));
        assert_eq!(rdata.to_string(), "192.0.2.1");

        let mut scanner = Scanner::new("192.0.2").unwrap();
        assert!(A::scan(&mut scanner).is_err());
    }
}
