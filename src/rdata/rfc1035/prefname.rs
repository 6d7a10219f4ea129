//! Record data for types consisting of a preference and a domain name.
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

//------------ PrefName ------------------------------------------------------

/// Record data consisting of a 16 bit value and a domain name.
///
/// This shape is used by the MX record type defined in
/// [RFC 1035, section 3.3.9][1] where the value is the preference of the
/// mail exchange. AFSDB and RT from [RFC 1183] as well as KX from
/// [RFC 2230] have the same structure.
///
/// [1]: https://tools.ietf.org/html/rfc1035#section-3.3.9
/// [RFC 1183]: https://tools.ietf.org/html/rfc1183
/// [RFC 2230]: https://tools.ietf.org/html/rfc2230
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct PrefName {
    rtype: Rtype,
    preference: u16,
    name: Name,
}

impl PrefName {
    /// Creates new record data for the given type.
    pub fn new(rtype: Rtype, preference: u16, name: Name) -> Self {
        PrefName {
            rtype,
            preference,
            name,
        }
    }

    /// Creates new MX record data.
    pub fn mx(preference: u16, exchange: Name) -> Self {
        Self::new(Rtype::MX, preference, exchange)
    }

    /// The preference for this record.
    ///
    /// For MX, this defines an order if there are several records for the
    /// same owner. Lower values are preferred. For AFSDB, it is the subtype.
    pub fn preference(&self) -> u16 {
        self.preference
    }

    /// The domain name of the record.
    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn parse(rtype: Rtype, parser: &mut Parser) -> Result<Self, ParseError> {
        let preference = parser.parse_u16()?;
        let name = Name::parse(parser)?;
        Ok(Self::new(rtype, preference, name))
    }

    pub fn scan(
        rtype: Rtype,
        scanner: &mut Scanner,
        origin: Option<&Name>,
    ) -> Result<Self, ScanError> {
        let preference = scanner.scan_int()?;
        let name = Name::scan_absolute(scanner, origin)?;
        Ok(Self::new(rtype, preference, name))
    }
}

//--- ComposeRecordData

impl ComposeRecordData for PrefName {
    fn rtype(&self) -> Rtype {
        self.rtype
    }

    fn compose_rdata(
        &self,
        target: &mut Composer,
        compressor: Option<&mut Compressor>,
    ) {
        target.append_u16(self.preference);
        compose_rdata_name(
            &self.name,
            target,
            compressor,
            Compression::for_rtype(self.rtype),
        )
    }

    fn compose_canonical_rdata(&self, target: &mut Composer) {
        target.append_u16(self.preference);
        compose_canonical_rdata_name(
            &self.name,
            target,
            self.rtype.rdata_canonical_lowercase(),
        )
    }
}

//--- Display

impl fmt::Display for PrefName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.preference, self.name)
    }
}

//============ Testing =======================================================
