//! Record data for types that consist of a single domain name.
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

//------------ SingleName ----------------------------------------------------

/// Record data consisting of a single domain name.
///
/// This shape is used by the NS, CNAME, PTR, MB, MD, MF, MG, and MR types
/// of [RFC 1035] as well as DNAME from [RFC 6672]. Since the meaning of the
/// name differs between the types, the record type is kept alongside the
/// name.
///
/// Whether the name may be compressed and whether it is lowercased in
/// canonical form is determined by the record type.
///
/// [RFC 1035]: https://tools.ietf.org/html/rfc1035
/// [RFC 6672]: https://tools.ietf.org/html/rfc6672
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct SingleName {
    rtype: Rtype,
    name: Name,
}

impl SingleName {
    /// Creates new record data for the given type.
    pub fn new(rtype: Rtype, name: Name) -> Self {
        SingleName { rtype, name }
    }

    pub fn ns(name: Name) -> Self {
        Self::new(Rtype::NS, name)
    }

    pub fn cname(name: Name) -> Self {
        Self::new(Rtype::CNAME, name)
    }

    pub fn ptr(name: Name) -> Self {
        Self::new(Rtype::PTR, name)
    }

    pub fn dname(name: Name) -> Self {
        Self::new(Rtype::DNAME, name)
    }

    /// Returns the domain name.
    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn into_name(self) -> Name {
        self.name
    }

    pub fn parse(rtype: Rtype, parser: &mut Parser) -> Result<Self, ParseError> {
        Name::parse(parser).map(|name| Self::new(rtype, name))
    }

    pub fn scan(
        rtype: Rtype,
        scanner: &mut Scanner,
        origin: Option<&Name>,
    ) -> Result<Self, ScanError> {
        Name::scan_absolute(scanner, origin).map(|name| Self::new(rtype, name))
    }
}

//--- ComposeRecordData

impl ComposeRecordData for SingleName {
    fn rtype(&self) -> Rtype {
        self.rtype
    }

    fn compose_rdata(
        &self,
        target: &mut Composer,
        compressor: Option<&mut Compressor>,
    ) {
        compose_rdata_name(
            &self.name,
            target,
            compressor,
            Compression::for_rtype(self.rtype),
        )
    }

    fn compose_canonical_rdata(&self, target: &mut Composer) {
        compose_canonical_rdata_name(
            &self.name,
            target,
            self.rtype.rdata_canonical_lowercase(),
        )
    }
}

//--- Display

impl fmt::Display for SingleName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.name, f)
    }
}

//============ Testing =======================================================
