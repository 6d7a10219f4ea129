//! Record data for the SOA record.
//!
//! This is a private module. It’s content is re-exported by the parent.

use crate::base::iana::Rtype;
use crate::base::name::{Compressor, Name};
use crate::base::rdata::{
    compose_canonical_rdata_name, compose_rdata_name, ComposeRecordData,
    Compression,
};
use crate::base::scan::{ScanError, Scanner};
use crate::base::wire::{Composer, ParseError, Parser};
use core::fmt;

//------------ Soa ----------------------------------------------------------

/// Soa record data.
///
/// Soa records mark the top of a zone and contain information pertinent to
/// name server maintenance operations.
///
/// The Soa record type is defined in [RFC 1035, section 3.3.13][1].
///
/// [1]: https://tools.ietf.org/html/rfc1035#section-3.3.13
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Soa {
    mname: Name,
    rname: Name,
    serial: u32,
    refresh: u32,
    retry: u32,
    expire: u32,
    minimum: u32,
}

impl Soa {
    /// The rtype of this record data type.
    pub(crate) const RTYPE: Rtype = Rtype::SOA;

    /// Creates new Soa record data from content.
    pub fn new(
        mname: Name,
        rname: Name,
        serial: u32,
        refresh: u32,
        retry: u32,
        expire: u32,
        minimum: u32,
    ) -> Self {
        Soa {
            mname,
            rname,
            serial,
            refresh,
            retry,
            expire,
            minimum,
        }
    }

    /// The primary name server for the zone.
    pub fn mname(&self) -> &Name {
        &self.mname
    }

    /// The mailbox for the person responsible for this zone.
    pub fn rname(&self) -> &Name {
        &self.rname
    }

    /// The serial number of the original copy of the zone.
    pub fn serial(&self) -> u32 {
        self.serial
    }

    /// The time interval in seconds before the zone should be refreshed.
    pub fn refresh(&self) -> u32 {
        self.refresh
    }

    /// The time in seconds before a failed refresh is retried.
    pub fn retry(&self) -> u32 {
        self.retry
    }

    /// The upper limit of time in seconds the zone is authoritative.
    pub fn expire(&self) -> u32 {
        self.expire
    }

    /// The TTL in seconds for negative responses from this zone.
    pub fn minimum(&self) -> u32 {
        self.minimum
    }

    pub fn parse(parser: &mut Parser) -> Result<Self, ParseError> {
        Ok(Self::new(
            Name::parse(parser)?,
            Name::parse(parser)?,
            parser.parse_u32()?,
            parser.parse_u32()?,
            parser.parse_u32()?,
            parser.parse_u32()?,
            parser.parse_u32()?,
        ))
    }

    pub fn scan(
        scanner: &mut Scanner,
        origin: Option<&Name>,
    ) -> Result<Self, ScanError> {
        Ok(Self::new(
            Name::scan_absolute(scanner, origin)?,
            Name::scan_absolute(scanner, origin)?,
            scanner.scan_int()?,
            scanner.scan_int()?,
            scanner.scan_int()?,
            scanner.scan_int()?,
            scanner.scan_int()?,
        ))
    }

    fn compose_fixed(&self, target: &mut Composer) {
        target.append_u32(self.serial);
        target.append_u32(self.refresh);
        target.append_u32(self.retry);
        target.append_u32(self.expire);
        target.append_u32(self.minimum);
    }
}

//--- ComposeRecordData

impl ComposeRecordData for Soa {
    fn rtype(&self) -> Rtype {
        Soa::RTYPE
    }

    fn compose_rdata(
        &self,
        target: &mut Composer,
        mut compressor: Option<&mut Compressor>,
    ) {
        compose_rdata_name(
            &self.mname,
            target,
            compressor.as_deref_mut(),
            Compression::Allowed,
        );
        compose_rdata_name(
            &self.rname,
            target,
            compressor,
            Compression::Allowed,
        );
        self.compose_fixed(target)
    }

    fn compose_canonical_rdata(&self, target: &mut Composer) {
        compose_canonical_rdata_name(&self.mname, target, true);
        compose_canonical_rdata_name(&self.rname, target, true);
        self.compose_fixed(target)
    }
}

//--- Display

impl fmt::Display for Soa {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {} {}",
            self.mname,
            self.rname,
            self.serial,
            self.refresh,
            self.retry,
            self.expire,
            self.minimum
        )
    }
}

//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::*;
    use core::str::FromStr;

    #[test]
    fn soa_compose_parse() {
        let rdata = Soa::new(
            Name::from_str("m.example.com.").unwrap(),
            Name::from_str("r.example.com.").unwrap(),
            11,
            12,
            13,
            14,
            15,
        );
        let mut target = Composer::new();
        let mut compressor = Compressor::new();
        rdata.compose_rdata(&mut target, Some(&mut compressor));
        // The second name refers back to the first one.
        assert_eq!(
            &target.as_slice()[..19],
            b"\x01m\x07example\x03com\x00\x01r\xc0\x02"
        );
        assert_eq!(target.len(), 39);
        let mut parser = Parser::from_ref(target.as_slice());
        assert_eq!(Soa::parse(&mut parser), Ok(rdata.clone()));
        assert_eq!(parser.remaining(), 0);
    }

    #[test]
    fn soa_text() {
        let text = "ns.example.com. hostmaster.example.com. \
                    ( 2024010101 7200 3600 1209600 300 )";
        let mut scanner = Scanner::new(text).unwrap();
        let rdata = Soa::scan(&mut scanner, None).unwrap();
        assert_eq!(rdata.serial(), 2024010101);
        assert_eq!(rdata.minimum(), 300);
        assert_eq!(
            rdata.to_string(),
            "ns.example.com. hostmaster.example.com. \
             2024010101 7200 3600 1209600 300"
        );
    }
}
