//! Record data implementations.
//!
//! This module contains the implementations for the record data of the
//! record types this crate understands, as well as [`RecordData`], an enum
//! over all of them that is used as the data of a [`Record`].
//!
//! The types are grouped into submodules for the RFCs they are defined in
//! and are all re-exported at the top level here. Several record types that
//! share the same structure share one type; for instance, [`SingleName`]
//! covers NS, CNAME, PTR, and DNAME as well as a number of obsolete types.
//!
//! Which type is used for which record type is decided by a [`Registry`].
//! A process-wide registry is pre-populated with all standard types and can
//! be extended at runtime via [`register`]. Record types without an entry
//! are kept as opaque [`UnknownRecordData`].
//!
//! [`Record`]: crate::base::Record

pub mod aaaa;
pub mod dnssec;
pub mod rfc1035;
pub mod tsig;

pub use self::aaaa::Aaaa;
pub use self::dnssec::{Nsec, Rrsig, RtypeBitmap, Timestamp};
pub use self::rfc1035::{PrefName, SingleName, Soa, Strings, A};
pub use self::tsig::{Time48, Tsig};

use crate::base::iana::Rtype;
use crate::base::name::{Compressor, Name};
use crate::base::opt::Opt;
use crate::base::rdata::{ComposeRecordData, UnknownRecordData};
use crate::base::scan::{ScanError, Scanner};
use crate::base::wire::{Composer, ParseError, Parser};
use core::fmt;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::trace;

//------------ RecordData ----------------------------------------------------

/// The data of a resource record.
///
/// There is one variant for each shape of record data this crate knows
/// about. Data for record types not known is kept in the
/// [`Unknown`][Self::Unknown] variant. The [`Empty`][Self::Empty] variant
/// is used for records without any data which can appear in dynamic update
/// messages.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum RecordData {
    A(A),
    Aaaa(Aaaa),
    Name(SingleName),
    PrefName(PrefName),
    Strings(Strings),
    Soa(Soa),
    Nsec(Nsec),
    Rrsig(Rrsig),
    Opt(Opt),
    Tsig(Tsig),
    Empty(Rtype),
    Unknown(UnknownRecordData),
}

impl RecordData {
    /// Parses record data of the given type.
    ///
    /// The parser needs to be limited to the record data. The type is
    /// looked up in the process-wide registry. If it isn’t found there, the
    /// data is kept as unknown record data.
    pub fn parse(rtype: Rtype, parser: &mut Parser) -> Result<Self, ParseError> {
        match lookup(rtype) {
            Some(codec) => (codec.parse)(rtype, parser),
            None => {
                trace!(%rtype, "no codec registered, keeping data opaque");
                UnknownRecordData::parse(rtype, parser).map(RecordData::Unknown)
            }
        }
    }

    /// Scans record data of the given type from presentation format.
    ///
    /// The generic format of RFC 3597 is accepted for all types. If the
    /// type is known, the data is converted into its specific form.
    pub fn scan(
        rtype: Rtype,
        scanner: &mut Scanner,
        origin: Option<&Name>,
    ) -> Result<Self, ScanError> {
        let generic = matches!(
            scanner.peek(),
            Some(token) if !token.quoted && token.text == "\\#"
        );
        let codec = lookup(rtype);
        if generic {
            let data = UnknownRecordData::scan(rtype, scanner)?;
            return match codec {
                Some(codec) => {
                    let mut parser = Parser::from_ref(data.data());
                    let res = (codec.parse)(rtype, &mut parser)
                        .map_err(|_| scanner.error("invalid record data"))?;
                    if parser.remaining() != 0 {
                        return Err(scanner.error("trailing record data"));
                    }
                    Ok(res)
                }
                None => Ok(RecordData::Unknown(data)),
            };
        }
        match codec {
            Some(codec) => (codec.scan)(rtype, scanner, origin),
            None => Err(scanner.error("unknown record type, use '\\#'")),
        }
    }

    /// Creates empty record data for the given type.
    pub fn empty(rtype: Rtype) -> Self {
        RecordData::Empty(rtype)
    }

    /// Returns whether this is empty record data.
    pub fn is_empty(&self) -> bool {
        matches!(self, RecordData::Empty(_))
    }
}

//--- From

macro_rules! record_data_from {
    ( $( $variant:ident($ty:ty) ),* ) => {
        $(
            impl From<$ty> for RecordData {
                fn from(data: $ty) -> Self {
                    RecordData::$variant(data)
                }
            }
        )*
    }
}

record_data_from!(
    A(A),
    Aaaa(Aaaa),
    Name(SingleName),
    PrefName(PrefName),
    Strings(Strings),
    Soa(Soa),
    Nsec(Nsec),
    Rrsig(Rrsig),
    Opt(Opt),
    Tsig(Tsig),
    Unknown(UnknownRecordData)
);

//--- ComposeRecordData

impl ComposeRecordData for RecordData {
    fn rtype(&self) -> Rtype {
        match self {
            RecordData::A(data) => data.rtype(),
            RecordData::Aaaa(data) => data.rtype(),
            RecordData::Name(data) => data.rtype(),
            RecordData::PrefName(data) => data.rtype(),
            RecordData::Strings(data) => data.rtype(),
            RecordData::Soa(data) => data.rtype(),
            RecordData::Nsec(data) => data.rtype(),
            RecordData::Rrsig(data) => data.rtype(),
            RecordData::Opt(data) => data.rtype(),
            RecordData::Tsig(data) => data.rtype(),
            RecordData::Empty(rtype) => *rtype,
            RecordData::Unknown(data) => data.rtype(),
        }
    }

    fn compose_rdata(
        &self,
        target: &mut Composer,
        compressor: Option<&mut Compressor>,
    ) {
        match self {
            RecordData::A(data) => data.compose_rdata(target, compressor),
            RecordData::Aaaa(data) => data.compose_rdata(target, compressor),
            RecordData::Name(data) => data.compose_rdata(target, compressor),
            RecordData::PrefName(data) => {
                data.compose_rdata(target, compressor)
            }
            RecordData::Strings(data) => {
                data.compose_rdata(target, compressor)
            }
            RecordData::Soa(data) => data.compose_rdata(target, compressor),
            RecordData::Nsec(data) => data.compose_rdata(target, compressor),
            RecordData::Rrsig(data) => data.compose_rdata(target, compressor),
            RecordData::Opt(data) => data.compose_rdata(target, compressor),
            RecordData::Tsig(data) => data.compose_rdata(target, compressor),
            RecordData::Empty(_) => {}
            RecordData::Unknown(data) => {
                data.compose_rdata(target, compressor)
            }
        }
    }

    fn compose_canonical_rdata(&self, target: &mut Composer) {
        match self {
            RecordData::A(data) => data.compose_canonical_rdata(target),
            RecordData::Aaaa(data) => data.compose_canonical_rdata(target),
            RecordData::Name(data) => data.compose_canonical_rdata(target),
            RecordData::PrefName(data) => data.compose_canonical_rdata(target),
            RecordData::Strings(data) => data.compose_canonical_rdata(target),
            RecordData::Soa(data) => data.compose_canonical_rdata(target),
            RecordData::Nsec(data) => data.compose_canonical_rdata(target),
            RecordData::Rrsig(data) => data.compose_canonical_rdata(target),
            RecordData::Opt(data) => data.compose_canonical_rdata(target),
            RecordData::Tsig(data) => data.compose_canonical_rdata(target),
            RecordData::Empty(_) => {}
            RecordData::Unknown(data) => data.compose_canonical_rdata(target),
        }
    }
}

//--- Display

impl fmt::Display for RecordData {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RecordData::A(data) => fmt::Display::fmt(data, f),
            RecordData::Aaaa(data) => fmt::Display::fmt(data, f),
            RecordData::Name(data) => fmt::Display::fmt(data, f),
            RecordData::PrefName(data) => fmt::Display::fmt(data, f),
            RecordData::Strings(data) => fmt::Display::fmt(data, f),
            RecordData::Soa(data) => fmt::Display::fmt(data, f),
            RecordData::Nsec(data) => fmt::Display::fmt(data, f),
            RecordData::Rrsig(data) => fmt::Display::fmt(data, f),
            RecordData::Opt(data) => fmt::Display::fmt(data, f),
            RecordData::Tsig(data) => fmt::Display::fmt(data, f),
            RecordData::Empty(_) => Ok(()),
            RecordData::Unknown(data) => fmt::Display::fmt(data, f),
        }
    }
}

//------------ RdataCodec ----------------------------------------------------

/// The functions for converting the data of one record type.
///
/// A codec is registered with a [`Registry`] for a record type. The same
/// codec can serve several record types that share a shape; the record
/// type is passed to the functions.
///
/// A codec only covers the decoding directions. Composing the wire format
/// and displaying the presentation format are provided by the
/// [`RecordData`] variant the codec produces. A type registered at runtime
/// thus picks one of the existing shapes, such as
/// [`single_name`][Self::single_name], or stays unregistered and keeps its
/// data opaque.
#[derive(Clone, Copy)]
pub struct RdataCodec {
    /// The mnemonic used for the record type in presentation format.
    pub mnemonic: &'static str,

    /// Parses the record data from a parser limited to the data.
    pub parse: fn(Rtype, &mut Parser) -> Result<RecordData, ParseError>,

    /// Scans the record data from presentation format.
    pub scan: fn(
        Rtype,
        &mut Scanner,
        Option<&Name>,
    ) -> Result<RecordData, ScanError>,
}

impl RdataCodec {
    /// Returns a codec for data consisting of a single domain name.
    pub fn single_name(mnemonic: &'static str) -> Self {
        RdataCodec {
            mnemonic,
            parse: parse_single_name,
            scan: scan_single_name,
        }
    }

    /// Returns a codec for data consisting of a preference and a name.
    pub fn pref_name(mnemonic: &'static str) -> Self {
        RdataCodec {
            mnemonic,
            parse: parse_pref_name,
            scan: scan_pref_name,
        }
    }

    /// Returns a codec for data consisting of character strings.
    pub fn strings(mnemonic: &'static str) -> Self {
        RdataCodec {
            mnemonic,
            parse: parse_strings,
            scan: scan_strings,
        }
    }

    fn new(
        mnemonic: &'static str,
        parse: fn(Rtype, &mut Parser) -> Result<RecordData, ParseError>,
        scan: fn(
            Rtype,
            &mut Scanner,
            Option<&Name>,
        ) -> Result<RecordData, ScanError>,
    ) -> Self {
        RdataCodec {
            mnemonic,
            parse,
            scan,
        }
    }
}

impl fmt::Debug for RdataCodec {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("RdataCodec")
            .field("mnemonic", &self.mnemonic)
            .finish_non_exhaustive()
    }
}

fn parse_single_name(
    rtype: Rtype,
    parser: &mut Parser,
) -> Result<RecordData, ParseError> {
    SingleName::parse(rtype, parser).map(Into::into)
}

fn scan_single_name(
    rtype: Rtype,
    scanner: &mut Scanner,
    origin: Option<&Name>,
) -> Result<RecordData, ScanError> {
    SingleName::scan(rtype, scanner, origin).map(Into::into)
}

fn parse_pref_name(
    rtype: Rtype,
    parser: &mut Parser,
) -> Result<RecordData, ParseError> {
    PrefName::parse(rtype, parser).map(Into::into)
}

fn scan_pref_name(
    rtype: Rtype,
    scanner: &mut Scanner,
    origin: Option<&Name>,
) -> Result<RecordData, ScanError> {
    PrefName::scan(rtype, scanner, origin).map(Into::into)
}

fn parse_strings(
    rtype: Rtype,
    parser: &mut Parser,
) -> Result<RecordData, ParseError> {
    Strings::parse(rtype, parser).map(Into::into)
}

fn scan_strings(
    rtype: Rtype,
    scanner: &mut Scanner,
    _origin: Option<&Name>,
) -> Result<RecordData, ScanError> {
    Strings::scan(rtype, scanner).map(Into::into)
}

//------------ Registry ------------------------------------------------------

/// A mapping from record types to their codecs.
#[derive(Clone, Debug, Default)]
pub struct Registry {
    codecs: HashMap<Rtype, RdataCodec>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry containing all record types of this crate.
    pub fn standard() -> Self {
        let mut res = Self::new();
        res.register(
            Rtype::A,
            RdataCodec::new(
                "A",
                |_, parser| A::parse(parser).map(Into::into),
                |_, scanner, _| A::scan(scanner).map(Into::into),
            ),
        );
        res.register(
            Rtype::AAAA,
            RdataCodec::new(
                "AAAA",
                |_, parser| Aaaa::parse(parser).map(Into::into),
                |_, scanner, _| Aaaa::scan(scanner).map(Into::into),
            ),
        );
        for (rtype, mnemonic) in [
            (Rtype::NS, "NS"),
            (Rtype::MD, "MD"),
            (Rtype::MF, "MF"),
            (Rtype::CNAME, "CNAME"),
            (Rtype::MB, "MB"),
            (Rtype::MG, "MG"),
            (Rtype::MR, "MR"),
            (Rtype::PTR, "PTR"),
            (Rtype::DNAME, "DNAME"),
        ] {
            res.register(rtype, RdataCodec::single_name(mnemonic));
        }
        for (rtype, mnemonic) in [
            (Rtype::MX, "MX"),
            (Rtype::AFSDB, "AFSDB"),
            (Rtype::RT, "RT"),
            (Rtype::KX, "KX"),
        ] {
            res.register(rtype, RdataCodec::pref_name(mnemonic));
        }
        for (rtype, mnemonic) in [
            (Rtype::TXT, "TXT"),
            (Rtype::SPF, "SPF"),
            (Rtype::HINFO, "HINFO"),
        ] {
            res.register(rtype, RdataCodec::strings(mnemonic));
        }
        res.register(
            Rtype::SOA,
            RdataCodec::new(
                "SOA",
                |_, parser| Soa::parse(parser).map(Into::into),
                |_, scanner, origin| Soa::scan(scanner, origin).map(Into::into),
            ),
        );
        res.register(
            Rtype::RRSIG,
            RdataCodec::new(
                "RRSIG",
                |_, parser| Rrsig::parse(parser).map(Into::into),
                |_, scanner, origin| {
                    Rrsig::scan(scanner, origin).map(Into::into)
                },
            ),
        );
        res.register(
            Rtype::NSEC,
            RdataCodec::new(
                "NSEC",
                |_, parser| Nsec::parse(parser).map(Into::into),
                |_, scanner, origin| {
                    Nsec::scan(scanner, origin).map(Into::into)
                },
            ),
        );
        res.register(
            Rtype::OPT,
            RdataCodec::new(
                "OPT",
                |_, parser| Opt::parse(parser).map(Into::into),
                |_, scanner, _| {
                    Err(scanner.error("OPT records have no presentation format"))
                },
            ),
        );
        res.register(
            Rtype::TSIG,
            RdataCodec::new(
                "TSIG",
                |_, parser| Tsig::parse(parser).map(Into::into),
                |_, scanner, origin| {
                    Tsig::scan(scanner, origin).map(Into::into)
                },
            ),
        );
        res
    }

    /// Registers a codec for a record type.
    ///
    /// Returns the codec previously registered for the type, if any.
    pub fn register(
        &mut self,
        rtype: Rtype,
        codec: RdataCodec,
    ) -> Option<RdataCodec> {
        self.codecs.insert(rtype, codec)
    }

    /// Returns the codec for a record type.
    pub fn get(&self, rtype: Rtype) -> Option<RdataCodec> {
        self.codecs.get(&rtype).copied()
    }

    /// Returns the record type registered under the given mnemonic.
    ///
    /// The comparison ignores ASCII case.
    pub fn rtype_from_mnemonic(&self, mnemonic: &str) -> Option<Rtype> {
        self.codecs.iter().find_map(|(rtype, codec)| {
            codec.mnemonic.eq_ignore_ascii_case(mnemonic).then_some(*rtype)
        })
    }
}

//------------ Process-wide Registry -----------------------------------------

fn global() -> &'static RwLock<Registry> {
    static REGISTRY: OnceLock<RwLock<Registry>> = OnceLock::new();
    REGISTRY.get_or_init(|| RwLock::new(Registry::standard()))
}

/// Registers a codec with the process-wide registry.
///
/// Records of the type parsed or scanned after this call use the codec.
/// Returns the codec previously registered for the type, if any.
pub fn register(rtype: Rtype, codec: RdataCodec) -> Option<RdataCodec> {
    trace!(%rtype, mnemonic = codec.mnemonic, "registering record data codec");
    global().write().register(rtype, codec)
}

/// Returns the codec for a record type from the process-wide registry.
pub fn lookup(rtype: Rtype) -> Option<RdataCodec> {
    global().read().get(rtype)
}

/// Converts a record type mnemonic into a record type.
///
/// This accepts the well-known mnemonics, the generic `TYPEnnn` form, and
/// the mnemonics of all types registered at runtime.
pub fn rtype_from_str(s: &str) -> Option<Rtype> {
    s.parse()
        .ok()
        .or_else(|| global().read().rtype_from_mnemonic(s))
}

/// Returns a value displaying the mnemonic of a record type.
///
/// In addition to the well-known mnemonics, this uses the mnemonics of
/// types registered at runtime.
pub fn display_rtype(rtype: Rtype) -> impl fmt::Display {
    RtypeMnemonic(rtype)
}

struct RtypeMnemonic(Rtype);

impl fmt::Display for RtypeMnemonic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.0.to_mnemonic_str().is_some() {
            return fmt::Display::fmt(&self.0, f);
        }
        match lookup(self.0) {
            Some(codec) => f.write_str(codec.mnemonic),
            None => fmt::Display::fmt(&self.0, f),
        }
    }
}

//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::*;
    use core::str::FromStr;

    fn scan(rtype: Rtype, s: &str) -> Result<RecordData, ScanError> {
        let mut scanner = Scanner::new(s).unwrap();
        RecordData::scan(rtype, &mut scanner, None)
    }

    #[test]
    fn parse_known_and_unknown() {
        let mut parser = Parser::from_ref(b"\xc0\x00\x02\x01");
        assert_eq!(
            RecordData::parse(Rtype::A, &mut parser).unwrap(),
            RecordData::A(A::from_octets(192, 0, 2, 1))
        );

        let mut parser = Parser::from_ref(b"\xc0\x00\x02\x01");
        let data = RecordData::parse(Rtype::from_int(65281), &mut parser)
            .unwrap();
        assert!(matches!(data, RecordData::Unknown(_)));
        assert_eq!(data.rtype(), Rtype::from_int(65281));
        assert_eq!(data.to_string(), "\\# 4 C0000201");
    }

    #[test]
    fn generic_text_for_known_type() {
        assert_eq!(
            scan(Rtype::A, "\\# 4 C0000201").unwrap(),
            scan(Rtype::A, "192.0.2.1").unwrap()
        );
        assert!(scan(Rtype::A, "\\# 3 C00002").is_err());
        assert!(matches!(
            scan(Rtype::from_int(65282), "\\# 2 ABCD").unwrap(),
            RecordData::Unknown(_)
        ));
        assert!(scan(Rtype::from_int(65282), "ABCD").is_err());
    }

    #[test]
    fn runtime_registration() {
        let rtype = Rtype::from_int(65400);
        assert_eq!(rtype_from_str("MYNAME"), None);
        register(rtype, RdataCodec::single_name("MYNAME"));
        assert_eq!(rtype_from_str("myname"), Some(rtype));
        assert_eq!(display_rtype(rtype).to_string(), "MYNAME");

        let data = scan(rtype, "host.example.").unwrap();
        assert_eq!(
            data,
            RecordData::Name(SingleName::new(
                rtype,
                Name::from_str("host.example.").unwrap()
            ))
        );
        // Names in data of non-RFC 1035 types are never compressed.
        let mut compressor = Compressor::new();
        let mut target = Composer::new();
        Name::from_str("host.example.")
            .unwrap()
            .compose(&mut target, Some(&mut compressor));
        data.compose_rdata(&mut target, Some(&mut compressor));
        assert_eq!(target.len(), 28);

        // Wire and text conversions go through the registered shape.
        let rdata = target.as_slice()[14..].to_vec();
        let mut parser = Parser::from_ref(rdata.as_slice());
        assert_eq!(RecordData::parse(rtype, &mut parser).unwrap(), data);
        assert_eq!(data.to_string(), "host.example.");
    }

    #[test]
    fn standard_mnemonics() {
        let registry = Registry::standard();
        assert_eq!(registry.rtype_from_mnemonic("cname"), Some(Rtype::CNAME));
        assert!(registry.get(Rtype::NULL).is_none());
        assert_eq!(display_rtype(Rtype::MX).to_string(), "MX");
        assert_eq!(display_rtype(Rtype::from_int(65399)).to_string(), "TYPE65399");
    }
}
