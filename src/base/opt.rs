//! Record data for OPT records.
//!
//! OPT records are meta records used by EDNS to convey additional data about
//! clients, servers, and the query being performed. Because these records
//! are fundamental for modern DNS operations, they are here instead of in
//! the `rdata` module and the types defined for operating on them differ
//! from how other record types are handled.
//!
//! The record data of an OPT record is a sequence of options, each
//! consisting of an option code and the data of the option. This crate
//! keeps the data of all options as opaque octets.
//!
//! Parts of the OPT record’s header are used to carry information, too.
//! The [`OptRecord`] type provides access to them.

use super::header::Header;
use super::iana::{Class, Rtype};
use super::name::{Compressor, Name};
use super::rdata::{ComposeRecordData, LongRecordData};
use super::record::Record;
use super::wire::{Composer, ParseError, Parser};
use crate::rdata::RecordData;
use crate::utils::base16;
use crate::utils::config::DefMinMax;
use bytes::Bytes;
use core::fmt;

//------------ Configuration Constants ---------------------------------------

/// The UDP payload size advertised in OPT records.
///
/// Values outside of the range are clamped.
pub const UDP_PAYLOAD_SIZE: DefMinMax<u16> = DefMinMax::new(1232, 512, 4096);

//------------ Opt -----------------------------------------------------------

/// OPT record data.
///
/// This is the record data type for OPT records and can be used as such
/// with a [`Record`]. Its content is the sequence of EDNS options.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct Opt {
    options: Vec<OptOption>,
}

impl Opt {
    /// The record type of OPT record data.
    pub const RTYPE: Rtype = Rtype::OPT;

    /// Creates empty OPT record data.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates OPT record data from a list of options.
    pub fn from_options(
        options: Vec<OptOption>,
    ) -> Result<Self, LongRecordData> {
        let res = Opt { options };
        LongRecordData::check_len(res.compose_len())?;
        Ok(res)
    }

    /// Returns an iterator over the options.
    pub fn iter(&self) -> impl Iterator<Item = &OptOption> + '_ {
        self.options.iter()
    }

    /// Returns whether there are no options.
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Returns the first option with the given code.
    pub fn get(&self, code: u16) -> Option<&OptOption> {
        self.options.iter().find(|opt| opt.code == code)
    }

    /// Appends an option.
    pub fn push(&mut self, option: OptOption) -> Result<(), LongRecordData> {
        LongRecordData::check_len(self.compose_len() + option.compose_len())?;
        self.options.push(option);
        Ok(())
    }

    fn compose_len(&self) -> usize {
        self.options.iter().map(OptOption::compose_len).sum()
    }

    /// Parses OPT record data.
    ///
    /// The parser needs to be limited to the record data.
    pub fn parse(parser: &mut Parser) -> Result<Self, ParseError> {
        let mut options = Vec::new();
        while parser.remaining() > 0 {
            options.push(OptOption::parse(parser)?);
        }
        Ok(Opt { options })
    }
}

//--- ComposeRecordData

impl ComposeRecordData for Opt {
    fn rtype(&self) -> Rtype {
        Rtype::OPT
    }

    fn compose_rdata(
        &self,
        target: &mut Composer,
        _compressor: Option<&mut Compressor>,
    ) {
        self.compose_canonical_rdata(target)
    }

    fn compose_canonical_rdata(&self, target: &mut Composer) {
        for option in &self.options {
            option.compose(target)
        }
    }
}

//--- Display

impl fmt::Display for Opt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut first = true;
        for option in &self.options {
            if first {
                first = false;
            } else {
                f.write_str(" ")?;
            }
            fmt::Display::fmt(option, f)?;
        }
        Ok(())
    }
}

//------------ OptOption -----------------------------------------------------

/// A single EDNS option.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct OptOption {
    code: u16,
    data: Bytes,
}

impl OptOption {
    /// Creates an option from its code and data.
    pub fn new(
        code: u16,
        data: impl Into<Bytes>,
    ) -> Result<Self, LongRecordData> {
        let data = data.into();
        LongRecordData::check_len(data.len())?;
        Ok(OptOption { code, data })
    }

    /// Returns the option code.
    pub fn code(&self) -> u16 {
        self.code
    }

    /// Returns the option data.
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    fn compose_len(&self) -> usize {
        self.data.len() + 4
    }

    pub fn parse(parser: &mut Parser) -> Result<Self, ParseError> {
        let code = parser.parse_u16()?;
        let data = parser.parse_u16_prefixed()?;
        Ok(OptOption {
            code,
            data: Bytes::copy_from_slice(data),
        })
    }

    pub fn compose(&self, target: &mut Composer) {
        target.append_u16(self.code);
        // The length was checked upon creation.
        target.append_u16(self.data.len() as u16);
        target.append_slice(&self.data);
    }
}

impl fmt::Display for OptOption {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.code, base16::encode_display(&self.data))
    }
}

//------------ OptRecord -----------------------------------------------------

/// An entire OPT record.
///
/// Because the EDNS specification uses parts of the header of the OPT record
/// to convey some information, a special record type is necessary for OPT
/// records. The class field carries the UDP payload size and the TTL field
/// carries the upper bits of the extended rcode, the EDNS version, and the
/// flags.
///
/// You can convert a normal record with OPT record data into an
/// `OptRecord` via [`from_record`][Self::from_record] and back via
/// [`to_record`][Self::to_record].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OptRecord {
    udp_payload_size: u16,
    ext_rcode: u8,
    version: u8,
    flags: u16,
    data: Opt,
}

impl OptRecord {
    /// Creates an OPT record advertising the default payload size.
    pub fn new() -> Self {
        OptRecord {
            udp_payload_size: UDP_PAYLOAD_SIZE.default(),
            ext_rcode: 0,
            version: 0,
            flags: 0,
            data: Opt::new(),
        }
    }

    /// Creates an OPT record advertising the given payload size.
    ///
    /// The size is clamped into the range of [`UDP_PAYLOAD_SIZE`].
    pub fn with_payload_size(size: u16) -> Self {
        let mut res = Self::new();
        res.set_udp_payload_size(size);
        res
    }

    /// Converts a regular record into an OPT record.
    ///
    /// Returns `None` if the record does not contain OPT record data.
    pub fn from_record(record: &Record) -> Option<Self> {
        let data = match record.data() {
            RecordData::Opt(data) => data.clone(),
            _ => return None,
        };
        let ttl = record.ttl().to_be_bytes();
        Some(OptRecord {
            udp_payload_size: record.class().to_int(),
            ext_rcode: ttl[0],
            version: ttl[1],
            flags: u16::from_be_bytes([ttl[2], ttl[3]]),
            data,
        })
    }

    /// Converts the OPT record into a regular record.
    pub fn to_record(&self) -> Record {
        let flags = self.flags.to_be_bytes();
        Record::new(
            Name::root(),
            Class::from_int(self.udp_payload_size),
            u32::from_be_bytes([self.ext_rcode, self.version, flags[0], flags[1]]),
            RecordData::Opt(self.data.clone()),
        )
    }

    /// Returns the UDP payload size.
    ///
    /// Through this field a sender of a message can signal the maximum size
    /// of UDP payload the sender is able to handle when receiving messages.
    pub fn udp_payload_size(&self) -> u16 {
        self.udp_payload_size
    }

    /// Sets the UDP payload size, clamping it into the permitted range.
    pub fn set_udp_payload_size(&mut self, size: u16) {
        self.udp_payload_size = UDP_PAYLOAD_SIZE.limit(size)
    }

    /// Returns the upper eight bits of the extended rcode.
    pub fn ext_rcode(&self) -> u8 {
        self.ext_rcode
    }

    /// Returns the full twelve bit rcode.
    ///
    /// Some of the bits of the rcode are stored in the regular message
    /// header. Such a header needs to be passed to the method.
    pub fn rcode(&self, header: Header) -> u16 {
        u16::from(self.ext_rcode) << 4 | u16::from(header.rcode().to_int())
    }

    /// Sets the full rcode.
    ///
    /// The lower four bits go into `header`, the upper eight bits are kept
    /// in the OPT record.
    pub fn set_rcode(&mut self, header: &mut Header, rcode: u16) {
        header.set_rcode(super::iana::Rcode::from_int((rcode & 0x0F) as u8));
        self.ext_rcode = (rcode >> 4) as u8;
    }

    /// Returns the EDNS version.
    pub fn version(&self) -> u8 {
        self.version
    }

    /// Sets the EDNS version.
    pub fn set_version(&mut self, version: u8) {
        self.version = version
    }

    /// Returns the value of the DNSSEC OK (DO) bit.
    pub fn dnssec_ok(&self) -> bool {
        self.flags & 0x8000 != 0
    }

    /// Sets the DNSSEC OK (DO) bit.
    pub fn set_dnssec_ok(&mut self, value: bool) {
        if value {
            self.flags |= 0x8000
        } else {
            self.flags &= 0x7FFF
        }
    }

    /// Returns a reference to the options.
    pub fn opt(&self) -> &Opt {
        &self.data
    }

    /// Returns a mutable reference to the options.
    pub fn opt_mut(&mut self) -> &mut Opt {
        &mut self.data
    }
}

impl Default for OptRecord {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OptRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "EDNS: version: {}, flags:{}; udp: {}",
            self.version,
            if self.dnssec_ok() { " do" } else { "" },
            self.udp_payload_size
        )?;
        for option in self.data.iter() {
            write!(f, "\n; OPT={}", option)?;
        }
        Ok(())
    }
}

//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::*;
    use crate::base::iana::Rcode;

    #[test]
    fn opt_wire() {
        let mut parser =
            Parser::from_ref(b"\x00\x0a\x00\x02\xab\xcd\x00\x0c\x00\x00");
        let opt = Opt::parse(&mut parser).unwrap();
        assert_eq!(opt.iter().count(), 2);
        assert_eq!(opt.get(10).unwrap().data().as_ref(), b"\xab\xcd");
        assert!(opt.get(12).unwrap().data().is_empty());
        assert_eq!(
            opt.to_canonical_rdata().as_ref(),
            b"\x00\x0a\x00\x02\xab\xcd\x00\x0c\x00\x00"
        );

        let mut parser = Parser::from_ref(b"\x00\x0a\x00\x05\xab");
        assert!(Opt::parse(&mut parser).is_err());
    }

    #[test]
    fn record_fields() {
        let mut opt = OptRecord::with_payload_size(100);
        assert_eq!(opt.udp_payload_size(), 512);
        opt.set_udp_payload_size(1400);
        opt.set_dnssec_ok(true);
        let mut header = Header::new();
        opt.set_rcode(&mut header, 16);
        assert_eq!(header.rcode(), Rcode::NOERROR);
        assert_eq!(opt.ext_rcode(), 1);

        let record = opt.to_record();
        assert_eq!(record.class().to_int(), 1400);
        assert_eq!(record.ttl(), 0x0100_8000);
        let back = OptRecord::from_record(&record).unwrap();
        assert_eq!(back, opt);
        assert_eq!(back.rcode(header), 16);
        assert!(back.dnssec_ok());
    }

    #[test]
    fn default_payload() {
        assert_eq!(OptRecord::new().udp_payload_size(), 1232);
        assert_eq!(OptRecord::with_payload_size(9000).udp_payload_size(), 4096);
    }
}
