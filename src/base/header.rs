//! The header of a DNS message.
//!
//! Each DNS message starts with a twelve octet long header section
//! containing some general information related to the message as well as
//! the number of records in each of the four sections that follow the header.
//! Its content and format are defined in section 4.1.1 of [RFC 1035].
//!
//! In order to reflect the fact that changing the section counts may
//! invalidate the rest of the message whereas the other elements of the
//! header section can safely be modified, the whole header has been split
//! into two separate types: [`Header`] contains the safely modifyable part
//! at the beginning and [`HeaderCounts`] contains the section counts. In
//! addition, the [`HeaderSection`] type wraps both of them into a single
//! type.
//!
//! [RFC 1035]: https://tools.ietf.org/html/rfc1035

use super::iana::{Opcode, Rcode};
use super::wire::{Composer, ParseError, Parser};
use core::{fmt, str::FromStr};

//------------ Header --------------------------------------------------

/// The first part of the header of a DNS message.
///
/// This type represents the information contained in the first four octets
/// of the header: the message ID, opcode, rcode, and the various flags. It
/// keeps those four octets in wire representation, i.e., in network byte
/// order. The data is layed out like this:
///
/// ```text
///                                 1  1  1  1  1  1
///   0  1  2  3  4  5  6  7  8  9  0  1  2  3  4  5
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                      ID                       |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |QR|   Opcode  |AA|TC|RD|RA|Z |AD|CD|   RCODE   |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// ```
///
/// The basic structure and most of the fields are defined in [RFC 1035],
/// except for the AD and CD flags, which are defined in [RFC 4035].
///
/// [RFC 1035]: https://tools.ietf.org/html/rfc1035
/// [RFC 4035]: https://tools.ietf.org/html/rfc4035
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Header {
    /// The actual header in its wire format representation.
    inner: [u8; 4],
}

impl Header {
    /// Creates a new header.
    ///
    /// The new header has all fields as either zero or false. Thus, the
    /// opcode will be [`Opcode::QUERY`] and the response code will be
    /// [`Rcode::NOERROR`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a reference to the underlying octets slice.
    pub fn as_slice(&self) -> &[u8] {
        &self.inner
    }

    /// Returns the value of the ID field.
    pub fn id(self) -> u16 {
        u16::from_be_bytes([self.inner[0], self.inner[1]])
    }

    /// Sets the value of the ID field.
    pub fn set_id(&mut self, value: u16) {
        self.inner[..2].copy_from_slice(&value.to_be_bytes())
    }

    /// Sets the value of the ID field to a randomly chosen number.
    #[cfg(feature = "rand")]
    pub fn set_random_id(&mut self) {
        self.set_id(::rand::random())
    }

    /// Returns whether the QR bit is set, i.e., the message is a response.
    pub fn qr(self) -> bool {
        self.get_bit(2, 7)
    }

    /// Sets the value of the QR bit.
    pub fn set_qr(&mut self, set: bool) {
        self.set_bit(2, 7, set)
    }

    /// Returns the value of the Opcode field.
    pub fn opcode(self) -> Opcode {
        Opcode::from_int((self.inner[2] >> 3) & 0x0F)
    }

    /// Sets the value of the opcode field.
    pub fn set_opcode(&mut self, opcode: Opcode) {
        self.inner[2] = self.inner[2] & 0x87 | ((opcode.to_int() & 0x0F) << 3);
    }

    /// Returns all flags contained in the header.
    pub fn flags(self) -> Flags {
        Flags {
            qr: self.qr(),
            aa: self.aa(),
            tc: self.tc(),
            rd: self.rd(),
            ra: self.ra(),
            ad: self.ad(),
            cd: self.cd(),
        }
    }

    /// Sets all flag bits.
    pub fn set_flags(&mut self, flags: Flags) {
        self.set_qr(flags.qr);
        self.set_aa(flags.aa);
        self.set_tc(flags.tc);
        self.set_rd(flags.rd);
        self.set_ra(flags.ra);
        self.set_ad(flags.ad);
        self.set_cd(flags.cd);
    }

    /// Returns whether the AA bit is set.
    pub fn aa(self) -> bool {
        self.get_bit(2, 2)
    }

    /// Sets the value of the AA bit.
    pub fn set_aa(&mut self, set: bool) {
        self.set_bit(2, 2, set)
    }

    /// Returns whether the TC bit is set.
    ///
    /// The bit is set when composing a message had to drop records because
    /// they didn’t fit into the available space.
    pub fn tc(self) -> bool {
        self.get_bit(2, 1)
    }

    /// Sets the value of the TC bit.
    pub fn set_tc(&mut self, set: bool) {
        self.set_bit(2, 1, set)
    }

    /// Returns whether the RD bit is set.
    pub fn rd(self) -> bool {
        self.get_bit(2, 0)
    }

    /// Sets the value of the RD bit.
    pub fn set_rd(&mut self, set: bool) {
        self.set_bit(2, 0, set)
    }

    /// Returns whether the RA bit is set.
    pub fn ra(self) -> bool {
        self.get_bit(3, 7)
    }

    /// Sets the value of the RA bit.
    pub fn set_ra(&mut self, set: bool) {
        self.set_bit(3, 7, set)
    }

    /// Returns whether the reserved bit is set.
    ///
    /// This bit must be `false` in all queries and responses.
    pub fn z(self) -> bool {
        self.get_bit(3, 6)
    }

    /// Sets the value of the reserved bit.
    pub fn set_z(&mut self, set: bool) {
        self.set_bit(3, 6, set)
    }

    /// Returns whether the AD bit is set.
    pub fn ad(self) -> bool {
        self.get_bit(3, 5)
    }

    /// Sets the value of the AD bit.
    pub fn set_ad(&mut self, set: bool) {
        self.set_bit(3, 5, set)
    }

    /// Returns whether the CD bit is set.
    pub fn cd(self) -> bool {
        self.get_bit(3, 4)
    }

    /// Sets the value of the CD bit.
    pub fn set_cd(&mut self, set: bool) {
        self.set_bit(3, 4, set)
    }

    /// Returns the value of the RCODE field.
    pub fn rcode(self) -> Rcode {
        Rcode::from_int(self.inner[3] & 0x0F)
    }

    /// Sets the value of the RCODE field.
    ///
    /// Only the lower four bits of `rcode` are used.
    pub fn set_rcode(&mut self, rcode: Rcode) {
        self.inner[3] = self.inner[3] & 0xF0 | (rcode.to_int() & 0x0F);
    }

    //--- Internal helpers

    /// Returns the value of the bit at the given position.
    ///
    /// The argument `offset` gives the byte offset of the underlying bytes
    /// slice and `bit` gives the number of the bit with the most significant
    /// bit being 7.
    fn get_bit(self, offset: usize, bit: usize) -> bool {
        self.inner[offset] & (1 << bit) != 0
    }

    /// Sets or resets the given bit.
    fn set_bit(&mut self, offset: usize, bit: usize, set: bool) {
        if set {
            self.inner[offset] |= 1 << bit
        } else {
            self.inner[offset] &= !(1 << bit)
        }
    }
}

//------------ Flags ---------------------------------------------------

/// The flags contained in the DNS message header.
///
/// Each flag that is set is represented in text by its two-letter
/// uppercase name. Multiple flags are separated by a space.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Flags {
    /// Query response.
    pub qr: bool,

    /// Authoritative answer.
    pub aa: bool,

    /// Truncated.
    pub tc: bool,

    /// Recursion desired.
    pub rd: bool,

    /// Recursion available.
    pub ra: bool,

    /// Authentic data.
    pub ad: bool,

    /// Checking disabled.
    pub cd: bool,
}

impl Flags {
    /// Creates new flags.
    ///
    /// All flags will be unset.
    pub fn new() -> Self {
        Self::default()
    }
}

//--- Display & FromStr

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let all = [
            (self.qr, "QR"),
            (self.aa, "AA"),
            (self.tc, "TC"),
            (self.rd, "RD"),
            (self.ra, "RA"),
            (self.ad, "AD"),
            (self.cd, "CD"),
        ];
        let mut sep = "";
        for (_, name) in all.iter().filter(|(set, _)| *set) {
            write!(f, "{}{}", sep, name)?;
            sep = " ";
        }
        Ok(())
    }
}

impl FromStr for Flags {
    type Err = FlagsFromStrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut flags = Flags::new();
        for token in s.split_ascii_whitespace() {
            match token.to_ascii_uppercase().as_str() {
                "QR" => flags.qr = true,
                "AA" => flags.aa = true,
                "TC" => flags.tc = true,
                "RD" => flags.rd = true,
                "RA" => flags.ra = true,
                "AD" => flags.ad = true,
                "CD" => flags.cd = true,
                _ => return Err(FlagsFromStrError),
            }
        }
        Ok(flags)
    }
}

//------------ Section -------------------------------------------------------

/// The four sections of a DNS message.
///
/// In UPDATE messages, the sections are reused as the zone, prerequisite,
/// update, and additional sections. Associated constants with these names
/// are provided.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Section {
    Question,
    Answer,
    Authority,
    Additional,
}

impl Section {
    /// The zone section of an UPDATE message.
    pub const ZONE: Section = Section::Question;

    /// The prerequisite section of an UPDATE message.
    pub const PREREQUISITE: Section = Section::Answer;

    /// The update section of an UPDATE message.
    pub const UPDATE: Section = Section::Authority;

    /// All sections in message order.
    pub const ALL: [Section; 4] = [
        Section::Question,
        Section::Answer,
        Section::Authority,
        Section::Additional,
    ];

    /// Returns the index of the section within the message.
    pub fn index(self) -> usize {
        match self {
            Section::Question => 0,
            Section::Answer => 1,
            Section::Authority => 2,
            Section::Additional => 3,
        }
    }

    /// Returns the sections following this one.
    pub fn following(self) -> &'static [Section] {
        &Self::ALL[self.index() + 1..]
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match *self {
            Section::Question => "QUESTION",
            Section::Answer => "ANSWER",
            Section::Authority => "AUTHORITY",
            Section::Additional => "ADDITIONAL",
        })
    }
}

//------------ HeaderCounts -------------------------------------------------

/// The section count part of the header section of a DNS message.
///
/// This part consists of four 16 bit counters for the number of entries in
/// the four sections of a DNS message. The type contains the sequence of
/// these for values in wire format, i.e., in network byte order.
///
/// Counters can be accessed by [`Section`] or through the named methods
/// for regular and UPDATE messages. Increasing a counter beyond its maximum
/// returns an error, decreasing a counter below zero panics.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct HeaderCounts {
    /// The actual headers in their wire-format representation.
    inner: [u8; 8],
}

impl HeaderCounts {
    /// Creates a new value with all counters set to zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a reference to the raw octets slice of the header counts.
    pub fn as_slice(&self) -> &[u8] {
        &self.inner
    }

    /// Returns the count for the given section.
    pub fn get(self, section: Section) -> u16 {
        let offset = section.index() * 2;
        u16::from_be_bytes([self.inner[offset], self.inner[offset + 1]])
    }

    /// Sets the count for the given section.
    pub fn set(&mut self, section: Section, value: u16) {
        let offset = section.index() * 2;
        self.inner[offset..offset + 2].copy_from_slice(&value.to_be_bytes())
    }

    /// Increases the count for the given section by one.
    ///
    /// If increasing the counter would result in an overflow, returns an
    /// error and leaves the counter untouched.
    pub fn inc(&mut self, section: Section) -> Result<(), CountOverflow> {
        match self.get(section).checked_add(1) {
            Some(count) => {
                self.set(section, count);
                Ok(())
            }
            None => Err(CountOverflow),
        }
    }

    /// Decreases the count for the given section by one.
    ///
    /// # Panics
    ///
    /// This method panics if the count is already zero.
    pub fn dec(&mut self, section: Section) {
        let count = self.get(section);
        assert!(count > 0, "{} count underflow", section);
        self.set(section, count - 1);
    }

    /// Returns the value of the QDCOUNT field.
    pub fn qdcount(self) -> u16 {
        self.get(Section::Question)
    }

    /// Returns the value of the ANCOUNT field.
    pub fn ancount(self) -> u16 {
        self.get(Section::Answer)
    }

    /// Returns the value of the NSCOUNT field.
    pub fn nscount(self) -> u16 {
        self.get(Section::Authority)
    }

    /// Returns the value of the ARCOUNT field.
    pub fn arcount(self) -> u16 {
        self.get(Section::Additional)
    }

    /// Returns the value of the ZOCOUNT field of an UPDATE message.
    pub fn zocount(self) -> u16 {
        self.get(Section::ZONE)
    }

    /// Returns the value of the PRCOUNT field of an UPDATE message.
    pub fn prcount(self) -> u16 {
        self.get(Section::PREREQUISITE)
    }

    /// Returns the value of the UPCOUNT field of an UPDATE message.
    pub fn upcount(self) -> u16 {
        self.get(Section::UPDATE)
    }

    /// Returns the value of the ADCOUNT field of an UPDATE message.
    pub fn adcount(self) -> u16 {
        self.get(Section::Additional)
    }
}

//------------ HeaderSection -------------------------------------------------

/// The complete header section of a DNS message.
///
/// Consists of a [`Header`] directly followed by a [`HeaderCounts`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct HeaderSection {
    header: Header,
    counts: HeaderCounts,
}

impl HeaderSection {
    /// The length of the header section in octets.
    pub const LEN: usize = 12;

    /// Creates a new header section.
    ///
    /// The value will have all header and header counts fields set to zero
    /// or false.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a header section from the start of a message.
    pub fn from_message_slice(s: &[u8]) -> Result<Self, ParseError> {
        Self::parse(&mut Parser::from_ref(s))
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn header_mut(&mut self) -> &mut Header {
        &mut self.header
    }

    pub fn counts(&self) -> &HeaderCounts {
        &self.counts
    }

    pub fn counts_mut(&mut self) -> &mut HeaderCounts {
        &mut self.counts
    }

    /// Takes a header section from the beginning of a parser.
    pub fn parse(parser: &mut Parser) -> Result<Self, ParseError> {
        let data = parser.parse_octets(Self::LEN)?;
        let mut res = Self::default();
        res.header.inner.copy_from_slice(&data[..4]);
        res.counts.inner.copy_from_slice(&data[4..]);
        Ok(res)
    }

    /// Appends the wire format of the header section.
    pub fn compose(&self, target: &mut Composer) {
        target.append_slice(&self.header.inner);
        target.append_slice(&self.counts.inner);
    }
}

//------------ CountOverflow -------------------------------------------------

/// A header count would have grown beyond 65535.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CountOverflow;

impl fmt::Display for CountOverflow {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("counter overflow")
    }
}

impl std::error::Error for CountOverflow {}

//------------ FlagsFromStrError --------------------------------------------

/// An error happened when converting string to flags.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FlagsFromStrError;

impl fmt::Display for FlagsFromStrError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("illegal flags token")
    }
}

impl std::error::Error for FlagsFromStrError {}

//============ Testing ======================================================

#[cfg(test)]
mod test {
    use super::*;
    use crate::base::iana::{Opcode, Rcode};

    macro_rules! test_field {
        ($get:ident, $set:ident, $default:expr, $($value:expr),*) => {
            $({
                let mut h = Header::new();
                assert_eq!(h.$get(), $default);
                h.$set($value);
                assert_eq!(h.$get(), $value);
            })*
        }
    }

    #[test]
    fn header() {
        test_field!(id, set_id, 0, 0x1234);
        test_field!(qr, set_qr, false, true, false);
        test_field!(opcode, set_opcode, Opcode::QUERY, Opcode::UPDATE);
        test_field!(
            flags,
            set_flags,
            Flags::new(),
            Flags {
                qr: true,
                ..Default::default()
            }
        );
        test_field!(aa, set_aa, false, true, false);
        test_field!(tc, set_tc, false, true, false);
        test_field!(rd, set_rd, false, true, false);
        test_field!(ra, set_ra, false, true, false);
        test_field!(z, set_z, false, true, false);
        test_field!(ad, set_ad, false, true, false);
        test_field!(cd, set_cd, false, true, false);
        test_field!(rcode, set_rcode, Rcode::NOERROR, Rcode::REFUSED);
    }

    #[test]
    fn wire_layout() {
        let mut h = Header::new();
        h.set_id(0xbeef);
        h.set_qr(true);
        h.set_opcode(Opcode::UPDATE);
        h.set_tc(true);
        h.set_rcode(Rcode::NXDOMAIN);
        assert_eq!(h.as_slice(), b"\xbe\xef\xaa\x03");
    }

    #[test]
    fn counts() {
        let mut c = HeaderCounts {
            inner: [1, 2, 3, 4, 5, 6, 7, 8],
        };
        assert_eq!(c.qdcount(), 0x0102);
        assert_eq!(c.ancount(), 0x0304);
        assert_eq!(c.nscount(), 0x0506);
        assert_eq!(c.arcount(), 0x0708);
        assert_eq!(c.prcount(), 0x0304);
        assert_eq!(c.upcount(), 0x0506);
        for section in Section::ALL {
            c.inc(section).unwrap();
        }
        assert_eq!(c.inner, [1, 3, 3, 5, 5, 7, 7, 9]);
        c.dec(Section::Answer);
        assert_eq!(c.ancount(), 0x0304);
    }

    #[test]
    fn inc_overflow() {
        let mut c = HeaderCounts::new();
        c.set(Section::Authority, 0xfffe);
        assert!(c.inc(Section::Authority).is_ok());
        assert_eq!(c.inc(Section::Authority), Err(CountOverflow));
        assert_eq!(c.nscount(), 0xffff);
    }

    #[test]
    #[should_panic]
    fn dec_underflow() {
        HeaderCounts::new().dec(Section::Question)
    }

    #[test]
    fn section_round_trip() {
        let data = b"\x12\x34\x81\x80\x00\x01\x00\x02\x00\x00\x00\x01";
        let section = HeaderSection::from_message_slice(data).unwrap();
        assert_eq!(section.header().id(), 0x1234);
        assert!(section.header().qr());
        assert!(section.header().rd());
        assert!(section.header().ra());
        assert_eq!(section.counts().ancount(), 2);
        let mut target = Composer::new();
        section.compose(&mut target);
        assert_eq!(target.as_slice(), data);
        assert_eq!(
            HeaderSection::from_message_slice(b"\x12\x34"),
            Err(ParseError::ShortInput)
        );
    }

    #[test]
    fn flags_text() {
        assert_eq!(Flags::new().to_string(), "");
        let f = Flags {
            rd: true,
            cd: true,
            ..Default::default()
        };
        assert_eq!(f.to_string(), "RD CD");
        assert_eq!(Flags::from_str("cd  Rd"), Ok(f));
        assert!(Flags::from_str("XXXX").is_err());
    }
}
