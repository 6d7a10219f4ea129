//! Resource record data.
//!
//! Each resource record type has its own definition of the content and
//! formatting of its data. This module provides the basics for implementing
//! specific types for this record data. The concrete implementations for
//! the supported record types live in the top-level [rdata] module.
//!
//! Any type that represents record data implements [`ComposeRecordData`].
//! The trait allows composing the data both in its regular form, possibly
//! using name compression, and in its canonical form.
//!
//! The module also provides a type, [`UnknownRecordData`], that is used to
//! deal with record types whose specification is not known. It also
//! implements the generic presentation format of [RFC 3597] which is
//! available for all record types.
//!
//! [rdata]: crate::rdata
//! [RFC 3597]: https://tools.ietf.org/html/rfc3597

use super::iana::Rtype;
use super::name::{Compressor, Name};
use super::scan::{ScanError, Scanner};
use super::wire::{Composer, ParseError, Parser};
use crate::utils::base16;
use bytes::Bytes;
use core::fmt;

//----------- ComposeRecordData ----------------------------------------------

/// A type that represents record data that can be composed.
pub trait ComposeRecordData {
    /// Returns the record type associated with this record data instance.
    ///
    /// This is a method rather than an associated function to allow one
    /// type to be used for several real record types.
    fn rtype(&self) -> Rtype;

    /// Appends the wire format of the record data into `target`.
    ///
    /// If a compressor is given, names may be compressed if the record type
    /// allows it.
    fn compose_rdata(
        &self,
        target: &mut Composer,
        compressor: Option<&mut Compressor>,
    );

    /// Appends the canonical wire format of the record data into `target`.
    fn compose_canonical_rdata(&self, target: &mut Composer);

    /// Returns the canonical wire format of the record data.
    fn to_canonical_rdata(&self) -> Bytes {
        let mut target = Composer::new();
        self.compose_canonical_rdata(&mut target);
        target.freeze()
    }
}

//------------ Compression ---------------------------------------------------

/// Whether a domain name within record data may be compressed.
///
/// Each record data type decides this for each name field it contains.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Compression {
    Allowed,
    Forbidden,
}

impl Compression {
    /// Returns the compression mode for names in the data of `rtype`.
    pub fn for_rtype(rtype: Rtype) -> Self {
        if rtype.rdata_compressible() {
            Compression::Allowed
        } else {
            Compression::Forbidden
        }
    }
}

/// Appends a name contained in record data.
pub fn compose_rdata_name(
    name: &Name,
    target: &mut Composer,
    compressor: Option<&mut Compressor>,
    compression: Compression,
) {
    match compression {
        Compression::Allowed => name.compose(target, compressor),
        Compression::Forbidden => name.compose(target, None),
    }
}

/// Appends a name contained in canonical record data.
///
/// The name is converted to lowercase if `lowercase` is true and left as
/// is otherwise.
pub fn compose_canonical_rdata_name(
    name: &Name,
    target: &mut Composer,
    lowercase: bool,
) {
    if lowercase {
        name.compose_canonical(target)
    } else {
        name.compose(target, None)
    }
}

//------------ UnknownRecordData ---------------------------------------------

/// A type for parsing any type of record data.
///
/// This type accepts any record type and stores the plain, unparsed record
/// data as an octets sequence.
///
/// Because some record types allow compressed domain names in their record
/// data, this type cannot be used safely with these record types. For these
/// record types, the structure of the content needs to be known.
///
/// The presentation format of this type is the generic form defined in
/// [RFC 3597]: the token `\#` followed by the length of the data and the
/// data itself in hex.
///
/// [RFC 3597]: https://tools.ietf.org/html/rfc3597
#[derive(Clone, Eq, Hash, PartialEq)]
pub struct UnknownRecordData {
    /// The record type of this data.
    rtype: Rtype,

    /// The record data.
    data: Bytes,
}

impl UnknownRecordData {
    /// Creates generic record data from a bytes value containing the data.
    pub fn from_octets(
        rtype: Rtype,
        data: impl Into<Bytes>,
    ) -> Result<Self, LongRecordData> {
        let data = data.into();
        LongRecordData::check_len(data.len())?;
        Ok(UnknownRecordData { rtype, data })
    }

    /// Returns the record type this data is for.
    pub fn rtype(&self) -> Rtype {
        self.rtype
    }

    /// Returns a reference to the record data.
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// Parses any record type as unknown record data.
    ///
    /// The parser needs to be limited to the record data.
    pub fn parse(rtype: Rtype, parser: &mut Parser) -> Result<Self, ParseError> {
        let data = parser.parse_remaining();
        Ok(UnknownRecordData {
            rtype,
            data: Bytes::copy_from_slice(data),
        })
    }

    /// Scans the generic presentation format of record data.
    pub fn scan(rtype: Rtype, scanner: &mut Scanner) -> Result<Self, ScanError> {
        let token = scanner.scan_str()?;
        if token != "\\#" {
            return Err(scanner.error("expected '\\#'"));
        }
        let len = scanner.scan_int::<u16>()?;
        let data = if len == 0 {
            Vec::new()
        } else {
            scanner.scan_hex_remaining()?
        };
        if data.len() != usize::from(len) {
            return Err(scanner.error("generic data length mismatch"));
        }
        Ok(UnknownRecordData {
            rtype,
            data: data.into(),
        })
    }
}

//--- ComposeRecordData

impl ComposeRecordData for UnknownRecordData {
    fn rtype(&self) -> Rtype {
        self.rtype
    }

    fn compose_rdata(
        &self,
        target: &mut Composer,
        _compressor: Option<&mut Compressor>,
    ) {
        target.append_slice(&self.data)
    }

    fn compose_canonical_rdata(&self, target: &mut Composer) {
        target.append_slice(&self.data)
    }
}

//--- Display and Debug

impl fmt::Display for UnknownRecordData {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "\\# {}", self.data.len())?;
        if !self.data.is_empty() {
            write!(f, " {}", base16::encode_display(&self.data))?;
        }
        Ok(())
    }
}

impl fmt::Debug for UnknownRecordData {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("UnknownRecordData")
            .field("rtype", &self.rtype)
            .field("data", &self.data.as_ref())
            .finish()
    }
}

//------------ LongRecordData ------------------------------------------------

/// The octets sequence to be used for record data is too long.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct LongRecordData;

impl LongRecordData {
    /// Checks whether a length is acceptable for record data.
    pub fn check_len(len: usize) -> Result<(), Self> {
        if len > usize::from(u16::MAX) {
            Err(LongRecordData)
        } else {
            Ok(())
        }
    }
}

impl fmt::Display for LongRecordData {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("record data too long")
    }
}

impl std::error::Error for LongRecordData {}

//============ Testing ======================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn unknown_text() {
        let mut scanner = Scanner::new("\\# 4 0A00 0001").unwrap();
        let data =
            UnknownRecordData::scan(Rtype::from_int(65280), &mut scanner)
                .unwrap();
        assert_eq!(data.data().as_ref(), b"\x0a\x00\x00\x01");
        assert_eq!(data.to_string(), "\\# 4 0A000001");

        let mut scanner = Scanner::new("\\# 0").unwrap();
        let data = UnknownRecordData::scan(Rtype::NULL, &mut scanner).unwrap();
        assert!(data.data().is_empty());
        assert_eq!(data.to_string(), "\\# 0");
    }

    #[test]
    fn unknown_text_errors() {
        let mut scanner = Scanner::new("\\# 3 0A00").unwrap();
        assert_eq!(
            UnknownRecordData::scan(Rtype::NULL, &mut scanner).unwrap_err().msg(),
            "generic data length mismatch"
        );
        let mut scanner = Scanner::new("# 1 00").unwrap();
        assert!(UnknownRecordData::scan(Rtype::NULL, &mut scanner).is_err());
    }

    #[test]
    fn unknown_wire() {
        let mut parser = Parser::from_ref(b"\x01\x02\x03");
        let data = UnknownRecordData::parse(Rtype::NULL, &mut parser).unwrap();
        assert_eq!(parser.remaining(), 0);
        let mut target = Composer::new();
        data.compose_rdata(&mut target, None);
        assert_eq!(target.as_slice(), b"\x01\x02\x03");
        assert_eq!(data.to_canonical_rdata().as_ref(), b"\x01\x02\x03");
    }

    #[test]
    fn long_data() {
        assert!(
            UnknownRecordData::from_octets(Rtype::NULL, vec![0; 65535]).is_ok()
        );
        assert_eq!(
            UnknownRecordData::from_octets(Rtype::NULL, vec![0; 65536]),
            Err(LongRecordData)
        );
    }
}
