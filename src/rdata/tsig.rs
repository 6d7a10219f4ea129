//! Record data from [RFC 8945]: TSIG records.
//!
//! This RFC defines the TSIG record type used for signing DNS messages.
//! The processing of TSIG records lives in the [tsig] module.
//!
//! [RFC 8945]: https://tools.ietf.org/html/rfc8945
//! [tsig]: crate::tsig

use crate::base::iana::{Rtype, TsigRcode};
use crate::base::name::{Compressor, Name};
use crate::base::rdata::{
    compose_canonical_rdata_name, compose_rdata_name, ComposeRecordData,
    Compression, LongRecordData,
};
use crate::base::scan::{ScanError, Scanner};
use crate::base::wire::{Composer, ParseError, Parser};
use base64::Engine;
use bytes::Bytes;
use core::fmt;
use std::time::SystemTime;

//------------ Tsig ----------------------------------------------------------

/// TSIG record data.
///
/// The algorithm name is never compressed. The MAC and other data are
/// limited to 65535 octets each by their 16 bit length fields.
#[derive(Clone, Eq, Hash, PartialEq)]
pub struct Tsig {
    /// The signature algorithm as a domain name.
    algorithm: Name,

    /// The Unix epoch time at which the signature was created.
    ///
    /// Note that this is an unsigned 48 bit value in wire format.
    time_signed: Time48,

    /// Seconds of error perimitted in time signed.
    fudge: u16,

    /// MAC.
    ///
    /// In wire format, consists of a unsigned 16 bit integer containing the
    /// length followed by that many octets of actual MAC.
    mac: Bytes,

    /// Original message ID.
    original_id: u16,

    /// TSIG response code.
    error: TsigRcode,

    /// Other.
    ///
    /// This is normally empty unless a BADTIME error happened. In wire
    /// format, it is encoded as a unsigned 16 bit integer followed by that
    /// many octets.
    other: Bytes,
}

impl Tsig {
    /// The rtype of this record data type.
    pub(crate) const RTYPE: Rtype = Rtype::TSIG;

    /// Creates new TSIG record data from its components.
    ///
    /// See the access methods for an explanation of these components. The
    /// function will return an error if the wire format length of the MAC
    /// or other data would exceed 65,535 octets.
    pub fn new(
        algorithm: Name,
        time_signed: Time48,
        fudge: u16,
        mac: impl Into<Bytes>,
        original_id: u16,
        error: TsigRcode,
        other: impl Into<Bytes>,
    ) -> Result<Self, LongRecordData> {
        let mac = mac.into();
        let other = other.into();
        LongRecordData::check_len(mac.len())?;
        LongRecordData::check_len(other.len())?;
        Ok(Tsig {
            algorithm,
            time_signed,
            fudge,
            mac,
            original_id,
            error,
            other,
        })
    }

    /// Returns a reference to the algorithm name.
    ///
    /// TSIG encodes the algorithm used for keys and signatures as a domain
    /// name. It does, however, only use the format. No structure is used at
    /// all.
    pub fn algorithm(&self) -> &Name {
        &self.algorithm
    }

    /// Returns the Unix time when the signature is created.
    pub fn time_signed(&self) -> Time48 {
        self.time_signed
    }

    /// Return the number of seconds of offset from signing time permitted.
    ///
    /// When a signature is checked, the local system time needs to be
    /// within this many seconds from `time_signed` to be accepted.
    pub fn fudge(&self) -> u16 {
        self.fudge
    }

    /// Returns a reference to the bytes value containing the MAC.
    pub fn mac(&self) -> &Bytes {
        &self.mac
    }

    /// Returns the original message ID.
    ///
    /// Since the message ID is part of the signature generation but may be
    /// changed for a forwarded message, it is included in the TSIG record.
    pub fn original_id(&self) -> u16 {
        self.original_id
    }

    /// Returns the TSIG error.
    pub fn error(&self) -> TsigRcode {
        self.error
    }

    /// Returns a reference to the other bytes.
    ///
    /// This field is only used for BADTIME errors to return the server time.
    /// Otherwise it is empty.
    pub fn other(&self) -> &Bytes {
        &self.other
    }

    /// Returns the other bytes as the server time.
    ///
    /// If the other bytes field is exactly 6 bytes long, this methods
    /// returns the Unix time contained.
    pub fn other_time(&self) -> Option<Time48> {
        if self.other.len() == 6 {
            Some(Time48::from_slice(&self.other))
        } else {
            None
        }
    }

    /// Returns whether the record is valid at the given time.
    ///
    /// The method checks whether the given time is within [`fudge`]
    /// seconds of the [`time_signed`].
    ///
    /// [`fudge`]: Self::fudge
    /// [`time_signed`]: Self::time_signed
    pub fn is_valid_at(&self, now: Time48) -> bool {
        now.eq_fudged(self.time_signed, self.fudge.into())
    }

    pub fn parse(parser: &mut Parser) -> Result<Self, ParseError> {
        let algorithm = Name::parse(parser)?;
        let time_signed = Time48::parse(parser)?;
        let fudge = parser.parse_u16()?;
        let mac = Bytes::copy_from_slice(parser.parse_u16_prefixed()?);
        let original_id = parser.parse_u16()?;
        let error = TsigRcode::parse(parser)?;
        let other = Bytes::copy_from_slice(parser.parse_u16_prefixed()?);
        Ok(Tsig {
            algorithm,
            time_signed,
            fudge,
            mac,
            original_id,
            error,
            other,
        })
    }

    /// Scans the presentation format.
    ///
    /// The format is the algorithm, time signed, fudge, MAC size, MAC in
    /// Base 64, original ID, error, other size, and other data in Base 64.
    pub fn scan(
        scanner: &mut Scanner,
        origin: Option<&Name>,
    ) -> Result<Self, ScanError> {
        let algorithm = Name::scan_absolute(scanner, origin)?;
        let time_signed = Time48::scan(scanner)?;
        let fudge = scanner.scan_int()?;
        let mac = scan_sized_base64(scanner)?;
        let original_id = scanner.scan_int()?;
        let error = scanner.scan_parse("invalid TSIG error")?;
        let other = scan_sized_base64(scanner)?;
        Tsig::new(algorithm, time_signed, fudge, mac, original_id, error, other)
            .map_err(|_| scanner.error("long TSIG data"))
    }

    fn compose_tail(&self, target: &mut Composer) {
        self.time_signed.compose(target);
        target.append_u16(self.fudge);
        // Lengths are checked upon creation.
        target.append_u16(self.mac.len() as u16);
        target.append_slice(&self.mac);
        target.append_u16(self.original_id);
        self.error.compose(target);
        target.append_u16(self.other.len() as u16);
        target.append_slice(&self.other);
    }
}

fn scan_sized_base64(scanner: &mut Scanner) -> Result<Bytes, ScanError> {
    let len = scanner.scan_int::<u16>()?;
    if len == 0 {
        return Ok(Bytes::new());
    }
    let token = scanner.scan_str()?;
    let data = base64::engine::general_purpose::STANDARD
        .decode(token)
        .map_err(|_| scanner.error("invalid base64 data"))?;
    if data.len() != usize::from(len) {
        return Err(scanner.error("data length mismatch"));
    }
    Ok(data.into())
}

//--- ComposeRecordData

impl ComposeRecordData for Tsig {
    fn rtype(&self) -> Rtype {
        Tsig::RTYPE
    }

    fn compose_rdata(
        &self,
        target: &mut Composer,
        compressor: Option<&mut Compressor>,
    ) {
        compose_rdata_name(
            &self.algorithm,
            target,
            compressor,
            Compression::Forbidden,
        );
        self.compose_tail(target)
    }

    fn compose_canonical_rdata(&self, target: &mut Composer) {
        compose_canonical_rdata_name(&self.algorithm, target, false);
        self.compose_tail(target)
    }
}

//--- Display and Debug

impl fmt::Display for Tsig {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let engine = base64::engine::general_purpose::STANDARD;
        write!(
            f,
            "{} {} {} {}",
            self.algorithm,
            self.time_signed,
            self.fudge,
            self.mac.len()
        )?;
        if !self.mac.is_empty() {
            write!(f, " {}", engine.encode(&self.mac))?;
        }
        write!(f, " {} {} {}", self.original_id, self.error, self.other.len())?;
        if !self.other.is_empty() {
            write!(f, " {}", engine.encode(&self.other))?;
        }
        Ok(())
    }
}

impl fmt::Debug for Tsig {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Tsig")
            .field("algorithm", &self.algorithm)
            .field("time_signed", &self.time_signed)
            .field("fudge", &self.fudge)
            .field("mac", &self.mac.as_ref())
            .field("original_id", &self.original_id)
            .field("error", &self.error)
            .field("other", &self.other.as_ref())
            .finish()
    }
}

//------------ Time48 --------------------------------------------------------

/// A 48-bit Unix timestamp.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Time48(u64);

impl Time48 {
    /// Returns the timestamp of the current moment.
    ///
    /// A clock set before the Unix epoch results in a time of zero.
    pub fn now() -> Time48 {
        Self::from_u64(
            SystemTime::now()
                .duration_since(SystemTime::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
        )
    }

    /// Creates a value from a 64 bit integer.
    ///
    /// The upper 16 bits of the arument must be zero or else this function
    /// panics. This is also why we don’t implement `From`.
    pub fn from_u64(value: u64) -> Self {
        assert!(value & 0xFFFF_0000_0000_0000 == 0);
        Time48(value)
    }

    /// Creates a value from an octet slice.
    ///
    /// # Panics
    ///
    /// The function panics if the slice is shorter than 6 octets.
    fn from_slice(slice: &[u8]) -> Self {
        let mut buf = [0u8; 8];
        buf[2..].copy_from_slice(&slice[..6]);
        Time48(u64::from_be_bytes(buf))
    }

    /// Converts a value into its wire format.
    ///
    /// Returns the octets of the encoded value in network byte order.
    pub fn into_octets(self) -> [u8; 6] {
        let mut res = [0u8; 6];
        res.copy_from_slice(&self.0.to_be_bytes()[2..]);
        res
    }

    /// Returns whether the time is within a given period.
    ///
    /// Returns `true` iff `other` is at most `fudge` seconds before or after
    /// this value’s time.
    pub fn eq_fudged(self, other: Self, fudge: u64) -> bool {
        self.0.saturating_sub(fudge) <= other.0
            && self.0.saturating_add(fudge) >= other.0
    }

    pub fn parse(parser: &mut Parser) -> Result<Self, ParseError> {
        parser.parse_u48().map(Time48)
    }

    pub fn compose(self, target: &mut Composer) {
        target.append_u48(self.0)
    }

    pub fn scan(scanner: &mut Scanner) -> Result<Self, ScanError> {
        let value = scanner.scan_int::<u64>()?;
        if value >> 48 != 0 {
            return Err(scanner.error("time value too large"));
        }
        Ok(Time48(value))
    }
}

//--- From

impl From<Time48> for u64 {
    fn from(value: Time48) -> u64 {
        value.0
    }
}

//--- Display

impl fmt::Display for Time48 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::*;
    use core::str::FromStr;

    fn tsig() -> Tsig {
        Tsig::new(
            Name::from_str("hmac-sha256.").unwrap(),
            Time48::from_u64(1_700_000_000),
            300,
            &b"\x01\x02\x03\x04"[..],
            0x1234,
            TsigRcode::BADTIME,
            Bytes::copy_from_slice(&Time48::from_u64(1_700_000_500).into_octets()),
        )
        .unwrap()
    }

    #[test]
    fn tsig_compose_parse() {
        let rdata = tsig();
        let mut target = Composer::new();
        let mut compressor = Compressor::new();
        rdata.compose_rdata(&mut target, Some(&mut compressor));
        assert!(compressor.is_empty());
        let mut parser = Parser::from_ref(target.as_slice());
        assert_eq!(Tsig::parse(&mut parser), Ok(rdata.clone()));
        assert_eq!(parser.remaining(), 0);
        assert_eq!(rdata.other_time(), Some(Time48::from_u64(1_700_000_500)));
    }

    #[test]
    fn tsig_text() {
        let rdata = tsig();
        let text = rdata.to_string();
        assert_eq!(
            text,
            "hmac-sha256. 1700000000 300 4 AQIDBA== 4660 BADTIME 6 AABlU/L0"
        );
        let mut scanner = Scanner::new(&text).unwrap();
        assert_eq!(Tsig::scan(&mut scanner, None), Ok(rdata));
    }

    #[test]
    fn time48() {
        let time = Time48::from_u64(0x0102_0304_0506);
        assert_eq!(time.into_octets(), [1, 2, 3, 4, 5, 6]);
        assert!(time.eq_fudged(Time48::from_u64(0x0102_0304_0506 + 300), 300));
        assert!(!time.eq_fudged(Time48::from_u64(0x0102_0304_0506 + 301), 300));
        assert!(Time48::from_u64(10).eq_fudged(Time48::from_u64(0), 300));
    }
}
