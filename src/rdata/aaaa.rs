//! Record data from [RFC 3596]: AAAA records.
//!
//! This RFC defines the Aaaa record type.
//!
//! [RFC 3596]: https://tools.ietf.org/html/rfc3596

use crate::base::iana::Rtype;
use crate::base::name::Compressor;
use crate::base::rdata::ComposeRecordData;
use crate::base::scan::{ScanError, Scanner};
use crate::base::wire::{Composer, ParseError, Parser};
use core::fmt;
use core::str::FromStr;
use std::net::Ipv6Addr;

//------------ Aaaa ---------------------------------------------------------

/// Aaaa record data.
///
/// Aaaa records convey the IPv6 address of a host.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Aaaa {
    addr: Ipv6Addr,
}

impl Aaaa {
    /// The rtype of this record data type.
    pub(crate) const RTYPE: Rtype = Rtype::AAAA;

    #[must_use]
    pub fn new(addr: Ipv6Addr) -> Aaaa {
        Aaaa { addr }
    }

    #[must_use]
    pub fn addr(&self) -> Ipv6Addr {
        self.addr
    }

    pub fn parse(parser: &mut Parser) -> Result<Self, ParseError> {
        let octets = parser.parse_octets(16)?;
        let mut buf = [0u8; 16];
        buf.copy_from_slice(octets);
        Ok(Self::new(buf.into()))
    }

    pub fn scan(scanner: &mut Scanner) -> Result<Self, ScanError> {
        scanner.scan_parse("invalid IPv6 address").map(Self::new)
    }
}

//--- From and FromStr

impl From<Ipv6Addr> for Aaaa {
    fn from(addr: Ipv6Addr) -> Self {
        Self::new(addr)
    }
}

impl From<Aaaa> for Ipv6Addr {
    fn from(data: Aaaa) -> Self {
        data.addr
    }
}

impl FromStr for Aaaa {
    type Err = <Ipv6Addr as FromStr>::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ipv6Addr::from_str(s).map(Aaaa::new)
    }
}

//--- ComposeRecordData

impl ComposeRecordData for Aaaa {
    fn rtype(&self) -> Rtype {
        Aaaa::RTYPE
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

impl fmt::Display for Aaaa {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.addr, f)
    }
}

//============ Testing =======================================================
