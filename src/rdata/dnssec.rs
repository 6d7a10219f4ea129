//! Record data from [RFC 4034]: RRSIG and NSEC records.
//!
//! This RFC defines the record types for DNSSEC. Only the data formats are
//! provided here; creating and checking signatures is not.
//!
//! [RFC 4034]: https://tools.ietf.org/html/rfc4034

use crate::base::iana::Rtype;
use crate::base::name::{Compressor, Name};
use crate::base::rdata::{
    compose_canonical_rdata_name, compose_rdata_name, ComposeRecordData,
    Compression,
};
use crate::base::scan::{ScanError, Scanner};
use crate::base::wire::{Composer, ParseError, Parser};
use base64::Engine;
use bytes::Bytes;
use core::{fmt, str};
use std::collections::BTreeSet;
use std::time::{SystemTime, UNIX_EPOCH};
use time::{Date, Month, OffsetDateTime, PrimitiveDateTime, Time};

//------------ Timestamp ------------------------------------------------------

/// A timestamp for RRSIG records.
///
/// [RFC 4034] defines timestamps as the number of seconds elapsed since
/// 1 January 1970 00:00:00 UTC, ignoring leap seconds, modulo 2^32.
///
/// The presentation format is either the plain integer or a date in
/// `YYYYMMDDHHmmSS` format in UTC. The latter is used when displaying.
///
/// [RFC 4034]: https://tools.ietf.org/html/rfc4034
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Timestamp(u32);

impl Timestamp {
    /// Returns a timestamp for the current Unix time.
    #[must_use]
    pub fn now() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self(secs as u32)
    }

    /// Returns the timestamp as a raw integer.
    #[must_use]
    pub fn into_int(self) -> u32 {
        self.0
    }

    pub fn parse(parser: &mut Parser) -> Result<Self, ParseError> {
        parser.parse_u32().map(Self)
    }

    pub fn compose(self, target: &mut Composer) {
        target.append_u32(self.0)
    }

    pub fn scan(scanner: &mut Scanner) -> Result<Self, ScanError> {
        scanner.scan_parse("illegal signature time")
    }
}

//--- From and FromStr

impl From<u32> for Timestamp {
    fn from(item: u32) -> Self {
        Self(item)
    }
}

impl str::FromStr for Timestamp {
    type Err = IllegalSignatureTime;

    /// Parses a timestamp value from a string.
    ///
    /// The presentation format can either be their integer value or a
    /// specific date in `YYYYMMDDHHmmSS` format.
    fn from_str(src: &str) -> Result<Self, Self::Err> {
        if !src.is_ascii() {
            return Err(IllegalSignatureTime);
        }
        if src.len() != 14 {
            return u32::from_str(src)
                .map(Timestamp)
                .map_err(|_| IllegalSignatureTime);
        }
        let num = |range: core::ops::Range<usize>| {
            u16::from_str(&src[range]).map_err(|_| IllegalSignatureTime)
        };
        let month = Month::try_from(num(4..6)? as u8)
            .map_err(|_| IllegalSignatureTime)?;
        let date =
            Date::from_calendar_date(i32::from(num(0..4)?), month, num(6..8)? as u8)
                .map_err(|_| IllegalSignatureTime)?;
        let time = Time::from_hms(
            num(8..10)? as u8,
            num(10..12)? as u8,
            num(12..14)? as u8,
        )
        .map_err(|_| IllegalSignatureTime)?;
        let secs = PrimitiveDateTime::new(date, time)
            .assume_utc()
            .unix_timestamp();
        Ok(Timestamp(secs as u32))
    }
}

//--- Display

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match OffsetDateTime::from_unix_timestamp(i64::from(self.0)) {
            Ok(dt) => write!(
                f,
                "{:04}{:02}{:02}{:02}{:02}{:02}",
                dt.year(),
                u8::from(dt.month()),
                dt.day(),
                dt.hour(),
                dt.minute(),
                dt.second()
            ),
            Err(_) => write!(f, "{}", self.0),
        }
    }
}

//------------ Rrsig ---------------------------------------------------------

/// RRSIG record data.
///
/// The RRSIG record carries a signature over an RRset. The signer name is
/// never compressed. In canonical form it is lowercased.
///
/// The RRSIG type is defined in [RFC 4034, section 3][1].
///
/// [1]: https://tools.ietf.org/html/rfc4034#section-3
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Rrsig {
    type_covered: Rtype,
    algorithm: u8,
    labels: u8,
    original_ttl: u32,
    expiration: Timestamp,
    inception: Timestamp,
    key_tag: u16,
    signer_name: Name,
    signature: Bytes,
}

impl Rrsig {
    /// The rtype of this record data type.
    pub(crate) const RTYPE: Rtype = Rtype::RRSIG;

    #[allow(clippy::too_many_arguments)]
    pub fn new(
        type_covered: Rtype,
        algorithm: u8,
        labels: u8,
        original_ttl: u32,
        expiration: Timestamp,
        inception: Timestamp,
        key_tag: u16,
        signer_name: Name,
        signature: Bytes,
    ) -> Self {
        Rrsig {
            type_covered,
            algorithm,
            labels,
            original_ttl,
            expiration,
            inception,
            key_tag,
            signer_name,
            signature,
        }
    }

    /// The type of the records covered by the signature.
    pub fn type_covered(&self) -> Rtype {
        self.type_covered
    }

    pub fn algorithm(&self) -> u8 {
        self.algorithm
    }

    pub fn labels(&self) -> u8 {
        self.labels
    }

    pub fn original_ttl(&self) -> u32 {
        self.original_ttl
    }

    pub fn expiration(&self) -> Timestamp {
        self.expiration
    }

    pub fn inception(&self) -> Timestamp {
        self.inception
    }

    pub fn key_tag(&self) -> u16 {
        self.key_tag
    }

    pub fn signer_name(&self) -> &Name {
        &self.signer_name
    }

    pub fn signature(&self) -> &Bytes {
        &self.signature
    }

    pub fn parse(parser: &mut Parser) -> Result<Self, ParseError> {
        let type_covered = Rtype::parse(parser)?;
        let algorithm = parser.parse_u8()?;
        let labels = parser.parse_u8()?;
        let original_ttl = parser.parse_u32()?;
        let expiration = Timestamp::parse(parser)?;
        let inception = Timestamp::parse(parser)?;
        let key_tag = parser.parse_u16()?;
        let signer_name = Name::parse(parser)?;
        let signature = Bytes::copy_from_slice(parser.parse_remaining());
        Ok(Self::new(
            type_covered,
            algorithm,
            labels,
            original_ttl,
            expiration,
            inception,
            key_tag,
            signer_name,
            signature,
        ))
    }

    pub fn scan(
        scanner: &mut Scanner,
        origin: Option<&Name>,
    ) -> Result<Self, ScanError> {
        Ok(Self::new(
            scanner.scan_parse("unknown record type")?,
            scanner.scan_int()?,
            scanner.scan_int()?,
            scanner.scan_int()?,
            Timestamp::scan(scanner)?,
            Timestamp::scan(scanner)?,
            scanner.scan_int()?,
            Name::scan_absolute(scanner, origin)?,
            scanner.scan_base64_remaining()?.into(),
        ))
    }

    fn compose_head(&self, target: &mut Composer) {
        self.type_covered.compose(target);
        target.append_u8(self.algorithm);
        target.append_u8(self.labels);
        target.append_u32(self.original_ttl);
        self.expiration.compose(target);
        self.inception.compose(target);
        target.append_u16(self.key_tag);
    }
}

//--- ComposeRecordData

impl ComposeRecordData for Rrsig {
    fn rtype(&self) -> Rtype {
        Rrsig::RTYPE
    }

    fn compose_rdata(
        &self,
        target: &mut Composer,
        compressor: Option<&mut Compressor>,
    ) {
        self.compose_head(target);
        compose_rdata_name(
            &self.signer_name,
            target,
            compressor,
            Compression::Forbidden,
        );
        target.append_slice(&self.signature);
    }

    fn compose_canonical_rdata(&self, target: &mut Composer) {
        self.compose_head(target);
        compose_canonical_rdata_name(&self.signer_name, target, true);
        target.append_slice(&self.signature);
    }
}

//--- Display

impl fmt::Display for Rrsig {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {} {} {} {}",
            self.type_covered,
            self.algorithm,
            self.labels,
            self.original_ttl,
            self.expiration,
            self.inception,
            self.key_tag,
            self.signer_name,
            base64::engine::general_purpose::STANDARD.encode(&self.signature)
        )
    }
}

//------------ Nsec ----------------------------------------------------------

/// NSEC record data.
///
/// The NSEC record points to the next owner name in canonical order and
/// lists the record types present at the owner. The next name is never
/// compressed and, following [RFC 6840], keeps its case in canonical form.
///
/// The NSEC type is defined in [RFC 4034, section 4][1].
///
/// [1]: https://tools.ietf.org/html/rfc4034#section-4
/// [RFC 6840]: https://tools.ietf.org/html/rfc6840
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Nsec {
    next_name: Name,
    types: RtypeBitmap,
}

impl Nsec {
    /// The rtype of this record data type.
    pub(crate) const RTYPE: Rtype = Rtype::NSEC;

    pub fn new(next_name: Name, types: RtypeBitmap) -> Self {
        Nsec { next_name, types }
    }

    pub fn next_name(&self) -> &Name {
        &self.next_name
    }

    pub fn types(&self) -> &RtypeBitmap {
        &self.types
    }

    pub fn parse(parser: &mut Parser) -> Result<Self, ParseError> {
        Ok(Nsec::new(Name::parse(parser)?, RtypeBitmap::parse(parser)?))
    }

    pub fn scan(
        scanner: &mut Scanner,
        origin: Option<&Name>,
    ) -> Result<Self, ScanError> {
        Ok(Nsec::new(
            Name::scan_absolute(scanner, origin)?,
            RtypeBitmap::scan(scanner)?,
        ))
    }
}

//--- ComposeRecordData

impl ComposeRecordData for Nsec {
    fn rtype(&self) -> Rtype {
        Nsec::RTYPE
    }

    fn compose_rdata(
        &self,
        target: &mut Composer,
        compressor: Option<&mut Compressor>,
    ) {
        compose_rdata_name(
            &self.next_name,
            target,
            compressor,
            Compression::Forbidden,
        );
        self.types.compose(target)
    }

    fn compose_canonical_rdata(&self, target: &mut Composer) {
        compose_canonical_rdata_name(&self.next_name, target, false);
        self.types.compose(target)
    }
}

//--- Display

impl fmt::Display for Nsec {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.next_name)?;
        if !self.types.is_empty() {
            write!(f, " {}", self.types)?;
        }
        Ok(())
    }
}

//------------ RtypeBitmap ---------------------------------------------------

/// The set of record types present at a name.
///
/// The bitmap is kept in its wire format: a sequence of windows, each
/// starting with the window number, i.e., the upper eight bits of the types
/// it covers, followed by the length of the bitmap and the bitmap itself.
/// Windows appear in ascending order and their bitmaps are between 1 and
/// 32 octets long.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct RtypeBitmap(Bytes);

impl RtypeBitmap {
    /// Creates a bitmap from the wire format.
    pub fn from_octets(octets: impl Into<Bytes>) -> Result<Self, RtypeBitmapError> {
        let octets = octets.into();
        let mut data = octets.as_ref();
        let mut last_window: Option<u8> = None;
        while !data.is_empty() {
            if data.len() < 2 {
                return Err(RtypeBitmapError::ShortInput);
            }
            let window = data[0];
            if last_window.map(|last| window <= last).unwrap_or(false) {
                return Err(RtypeBitmapError::BadRtypeBitmap);
            }
            last_window = Some(window);
            let len = usize::from(data[1]);
            // Blocks with no types present must not be included.
            if len == 0 || len > 32 {
                return Err(RtypeBitmapError::BadRtypeBitmap);
            }
            if data.len() < len + 2 {
                return Err(RtypeBitmapError::ShortInput);
            }
            data = &data[len + 2..];
        }
        Ok(RtypeBitmap(octets))
    }

    /// Creates a bitmap containing the given types.
    pub fn from_types<I: IntoIterator<Item = Rtype>>(types: I) -> Self {
        let types: BTreeSet<u16> =
            types.into_iter().map(Rtype::to_int).collect();
        let mut res = Vec::new();
        let mut block: Option<(u8, [u8; 32], usize)> = None;
        for rtype in types {
            let (window, octet, mask) = split_rtype(rtype);
            match block {
                Some((num, ref mut bits, ref mut len)) if num == window => {
                    bits[octet] |= mask;
                    *len = octet + 1;
                }
                _ => {
                    if let Some((num, bits, len)) = block.take() {
                        push_block(&mut res, num, &bits[..len]);
                    }
                    let mut bits = [0u8; 32];
                    bits[octet] = mask;
                    block = Some((window, bits, octet + 1));
                }
            }
        }
        if let Some((num, bits, len)) = block {
            push_block(&mut res, num, &bits[..len]);
        }
        RtypeBitmap(res.into())
    }

    pub fn as_slice(&self) -> &[u8] {
        self.0.as_ref()
    }

    /// Returns whether the bitmap contains no types at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the types in ascending order.
    pub fn iter(&self) -> RtypeBitmapIter {
        RtypeBitmapIter {
            data: self.as_slice(),
            bit: 0,
        }
    }

    /// Returns whether the bitmap contains `rtype`.
    pub fn contains(&self, rtype: Rtype) -> bool {
        let (window, octet, mask) = split_rtype(rtype.to_int());
        let mut data = self.as_slice();
        while !data.is_empty() {
            let len = usize::from(data[1]);
            if data[0] == window {
                return octet < len && data[2 + octet] & mask != 0;
            }
            data = &data[len + 2..];
        }
        false
    }

    /// Takes a bitmap from the rest of the parser’s window.
    pub fn parse(parser: &mut Parser) -> Result<Self, ParseError> {
        RtypeBitmap::from_octets(Bytes::copy_from_slice(
            parser.parse_remaining(),
        ))
        .map_err(Into::into)
    }

    /// Scans all remaining tokens as record type mnemonics.
    pub fn scan(scanner: &mut Scanner) -> Result<Self, ScanError> {
        let mut types = Vec::new();
        while scanner.has_more() {
            types.push(scanner.scan_parse("unknown record type")?);
        }
        Ok(Self::from_types(types))
    }

    pub fn compose(&self, target: &mut Composer) {
        target.append_slice(self.as_slice())
    }
}

//--- Display

impl fmt::Display for RtypeBitmap {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut first = true;
        for rtype in self.iter() {
            if !first {
                f.write_str(" ")?;
            }
            first = false;
            fmt::Display::fmt(&rtype, f)?;
        }
        Ok(())
    }
}

//------------ RtypeBitmapIter -----------------------------------------------

/// An iterator over the types in a bitmap.
#[derive(Clone, Debug)]
pub struct RtypeBitmapIter<'a> {
    /// The data starting with the current window.
    data: &'a [u8],

    /// The index of the next bit to look at in the current window.
    bit: usize,
}

impl<'a> Iterator for RtypeBitmapIter<'a> {
    type Item = Rtype;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.data.len() < 2 {
                return None;
            }
            let len = usize::from(self.data[1]);
            while self.bit < len * 8 {
                let bit = self.bit;
                self.bit += 1;
                if self.data[2 + bit / 8] & (0x80 >> (bit % 8)) != 0 {
                    return Some(Rtype::from_int(
                        u16::from(self.data[0]) << 8 | bit as u16,
                    ));
                }
            }
            self.data = &self.data[len + 2..];
            self.bit = 0;
        }
    }
}

//============ Error Types ===================================================

//------------ IllegalSignatureTime ------------------------------------------

/// An illegal time value was encountered.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct IllegalSignatureTime;

impl fmt::Display for IllegalSignatureTime {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("illegal signature time")
    }
}

impl std::error::Error for IllegalSignatureTime {}

//------------ RtypeBitmapError ----------------------------------------------

/// The wire format of a record type bitmap is invalid.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RtypeBitmapError {
    ShortInput,
    BadRtypeBitmap,
}

impl From<RtypeBitmapError> for ParseError {
    fn from(err: RtypeBitmapError) -> ParseError {
        match err {
            RtypeBitmapError::ShortInput => ParseError::ShortInput,
            RtypeBitmapError::BadRtypeBitmap => {
                ParseError::form_error("invalid NSEC bitmap")
            }
        }
    }
}

impl fmt::Display for RtypeBitmapError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            RtypeBitmapError::ShortInput => {
                f.write_str("unexpected end of input")
            }
            RtypeBitmapError::BadRtypeBitmap => {
                f.write_str("invalid record type bitmap")
            }
        }
    }
}

impl std::error::Error for RtypeBitmapError {}

//============ Friendly Helper Functions =====================================

/// Splits an Rtype value into window number, octet number, and octet mask.
fn split_rtype(rtype: u16) -> (u8, usize, u8) {
    (
        (rtype >> 8) as u8,
        usize::from((rtype & 0xFF) >> 3),
        0b1000_0000 >> (rtype & 0x07),
    )
}

fn push_block(target: &mut Vec<u8>, window: u8, bits: &[u8]) {
    target.push(window);
    target.push(bits.len() as u8);
    target.extend_from_slice(bits);
}

//============ Test ==========================================================

#[cfg(test)]
mod test {
    use super::*;
    use core::str::FromStr;

    #[test]
    fn rtype_bitmap_types() {
        let bitmap =
            RtypeBitmap::from_types([Rtype::SOA, Rtype::A, Rtype::NS, Rtype::A]);
        assert_eq!(bitmap.as_slice(), b"\x00\x01\x62");
        let types: Vec<u16> = bitmap.iter().map(Rtype::to_int).collect();
        assert_eq!(types, [1, 2, 6]);
        assert_eq!(bitmap.to_string(), "A NS SOA");

        let mut parser = Parser::from_ref(bitmap.as_slice());
        assert_eq!(RtypeBitmap::parse(&mut parser), Ok(bitmap.clone()));
        assert!(bitmap.contains(Rtype::NS));
        assert!(!bitmap.contains(Rtype::MX));
        assert!(!bitmap.contains(Rtype::CAA));
    }

    #[test]
    fn rtype_bitmap_windows() {
        let bitmap = RtypeBitmap::from_types([
            Rtype::A,
            Rtype::MX,
            Rtype::RRSIG,
            Rtype::NSEC,
            Rtype::from_int(1234),
        ]);
        assert_eq!(
            bitmap.as_slice(),
            b"\x00\x06\x40\x01\x00\x00\x00\x03\
              \x04\x1b\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\
              \x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\
              \x20"
        );
        let types: Vec<_> = bitmap.iter().collect();
        assert_eq!(
            types,
            [
                Rtype::A,
                Rtype::MX,
                Rtype::RRSIG,
                Rtype::NSEC,
                Rtype::from_int(1234)
            ]
        );
        assert!(bitmap.contains(Rtype::from_int(1234)));
        assert_eq!(bitmap.to_string(), "A MX RRSIG NSEC TYPE1234");
    }

    #[test]
    fn rtype_bitmap_errors() {
        assert_eq!(
            RtypeBitmap::from_octets(&b"\x00"[..]),
            Err(RtypeBitmapError::ShortInput)
        );
        assert_eq!(
            RtypeBitmap::from_octets(&b"\x00\x00"[..]),
            Err(RtypeBitmapError::BadRtypeBitmap)
        );
        assert_eq!(
            RtypeBitmap::from_octets(&b"\x00\x21"[..]),
            Err(RtypeBitmapError::BadRtypeBitmap)
        );
        assert_eq!(
            RtypeBitmap::from_octets(&b"\x01\x01\x40\x00\x01\x40"[..]),
            Err(RtypeBitmapError::BadRtypeBitmap)
        );
        assert_eq!(
            RtypeBitmap::from_octets(&b"\x00\x02\x40"[..]),
            Err(RtypeBitmapError::ShortInput)
        );
        let mut parser = Parser::from_ref(b"\x00\x00");
        assert_eq!(
            RtypeBitmap::parse(&mut parser),
            Err(ParseError::form_error("invalid NSEC bitmap"))
        );
    }

    #[test]
    fn nsec() {
        let mut scanner = Scanner::new("Host.example.com. A MX RRSIG NSEC").unwrap();
        let nsec = Nsec::scan(&mut scanner, None).unwrap();
        assert_eq!(nsec.to_string(), "Host.example.com. A MX RRSIG NSEC");
        let canonical = nsec.to_canonical_rdata();
        assert!(canonical.starts_with(b"\x04Host\x07example\x03com\x00"));

        let mut target = Composer::new();
        nsec.compose_rdata(&mut target, None);
        let mut parser = Parser::from_ref(target.as_slice());
        assert_eq!(Nsec::parse(&mut parser), Ok(nsec));
    }

    #[test]
    fn timestamp() {
        let ts = Timestamp::from_str("20240102030405").unwrap();
        assert_eq!(ts.into_int(), 1704164645);
        assert_eq!(ts.to_string(), "20240102030405");
        assert_eq!(Timestamp::from_str("1704164645"), Ok(ts));
        assert!(Timestamp::from_str("20241302030405").is_err());
        assert!(Timestamp::from_str("x").is_err());
    }

    #[test]
    fn rrsig() {
        let text = "A 8 3 86400 20240102030405 20231202030405 12345 \
                    Example.com. AQID BA==";
        let mut scanner = Scanner::new(text).unwrap();
        let rrsig = Rrsig::scan(&mut scanner, None).unwrap();
        assert_eq!(rrsig.type_covered(), Rtype::A);
        assert_eq!(rrsig.signature().as_ref(), b"\x01\x02\x03\x04");
        assert_eq!(
            rrsig.to_string(),
            "A 8 3 86400 20240102030405 20231202030405 12345 \
             Example.com. AQIDBA=="
        );
        let mut target = Composer::new();
        let mut compressor = Compressor::new();
        Name::from_str("example.com.")
            .unwrap()
            .compose(&mut target, Some(&mut compressor));
        let start = target.pos();
        rrsig.compose_rdata(&mut target, Some(&mut compressor));
        let mut parser = Parser::from_ref(target.as_slice());
        parser.seek(start).unwrap();
        assert_eq!(Rrsig::parse(&mut parser), Ok(rrsig.clone()));
        // The signer name is not compressed.
        assert_eq!(target.len() - start, 18 + 13 + 4);
        assert!(rrsig
            .to_canonical_rdata()
            .ends_with(b"\x07example\x03com\x00\x01\x02\x03\x04"));
    }
}
