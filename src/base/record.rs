//! Resource records.
//!
//! This module defines the type [`Record`] representing DNS resource
//! records. A record consists of an owner name, a class, a time-to-live
//! value, and the record data. The record type is determined by the data.
//!
//! Records are immutable once created. Operations that change a record,
//! such as [`Record::with_ttl`], return a new record.

use super::iana::{Class, Rtype};
use super::name::{Compressor, Name, NameError};
use super::rdata::ComposeRecordData;
use super::scan::{ScanError, Scanner};
use super::wire::{ComposeError, Composer, ParseError, Parser};
use crate::rdata::{display_rtype, rtype_from_str, RecordData};
use core::cmp::Ordering;
use core::{fmt, hash, str};

//------------ Record --------------------------------------------------------

/// A DNS resource record.
///
/// Two records are equal if their owner names are equal ignoring ASCII
/// case, their types and classes are the same, and the canonical forms of
/// their record data are identical. The TTL is not considered. This is the
/// notion of equality used for deciding whether a record is already part
/// of an RRset.
#[derive(Clone, Debug)]
pub struct Record {
    /// The owner of the record.
    owner: Name,

    /// The class of the record.
    class: Class,

    /// The time-to-live value of the record.
    ttl: u32,

    /// The record data. This also determines the record type.
    data: RecordData,
}

/// # Creation and Element Access
///
impl Record {
    /// Creates a new record from its parts.
    ///
    /// # Panics
    ///
    /// The function panics if `owner` is a relative name. Use
    /// [`try_new`][Self::try_new] for a fallible version.
    pub fn new(owner: Name, class: Class, ttl: u32, data: RecordData) -> Self {
        Self::try_new(owner, class, ttl, data)
            .expect("relative owner name in record")
    }

    /// Creates a new record, checking that the owner is absolute.
    pub fn try_new(
        owner: Name,
        class: Class,
        ttl: u32,
        data: RecordData,
    ) -> Result<Self, NameError> {
        if !owner.is_absolute() {
            return Err(NameError::RelativeName);
        }
        Ok(Record {
            owner,
            class,
            ttl,
            data,
        })
    }

    /// Returns a reference to the owner domain name.
    pub fn owner(&self) -> &Name {
        &self.owner
    }

    /// Returns the record type.
    pub fn rtype(&self) -> Rtype {
        self.data.rtype()
    }

    /// Returns the record class.
    pub fn class(&self) -> Class {
        self.class
    }

    /// Returns the record’s time-to-live.
    pub fn ttl(&self) -> u32 {
        self.ttl
    }

    /// Returns a reference to the record data.
    pub fn data(&self) -> &RecordData {
        &self.data
    }

    /// Converts the record into its record data.
    pub fn into_data(self) -> RecordData {
        self.data
    }

    /// Returns a copy of the record with a different TTL.
    #[must_use]
    pub fn with_ttl(&self, ttl: u32) -> Self {
        Record {
            ttl,
            ..self.clone()
        }
    }

    /// Returns the type of the RRset this record belongs to.
    ///
    /// This is the record type for all records except RRSIG records for
    /// which it is the type covered by the signature.
    pub fn rrset_type(&self) -> Rtype {
        match self.data {
            RecordData::Rrsig(ref sig) => sig.type_covered(),
            _ => self.rtype(),
        }
    }

    /// Returns whether the record is a signature.
    pub fn is_signature(&self) -> bool {
        self.rtype() == Rtype::RRSIG
    }

    /// Returns whether `self` and `other` belong to the same RRset.
    pub fn same_rrset(&self, other: &Record) -> bool {
        self.owner == other.owner
            && self.class == other.class
            && self.rrset_type() == other.rrset_type()
    }
}

/// # Parsing and Composing
///
impl Record {
    /// Parses a record.
    ///
    /// If `empty_allowed` is true, a record with a record data length of
    /// zero will have [`RecordData::Empty`] as its data. This happens in
    /// the prerequisite and update sections of UPDATE messages.
    pub fn parse(
        parser: &mut Parser,
        empty_allowed: bool,
    ) -> Result<Self, ParseError> {
        let owner = Name::parse(parser)?;
        let rtype = Rtype::parse(parser)?;
        let class = Class::parse(parser)?;
        let ttl = parser.parse_u32()?;
        let rdlen = usize::from(parser.parse_u16()?);
        let data = if rdlen == 0 && empty_allowed {
            RecordData::Empty(rtype)
        } else {
            parser.enter_window(rdlen)?;
            let data = RecordData::parse(rtype, parser)?;
            parser.exit_window()?;
            data
        };
        Ok(Record {
            owner,
            class,
            ttl,
            data,
        })
    }

    /// Appends the wire format of the record to `target`.
    ///
    /// If the record doesn’t fit, nothing is appended and all names added
    /// to the compressor by this call are removed again.
    pub fn compose(
        &self,
        target: &mut Composer,
        mut compressor: Option<&mut Compressor>,
    ) -> Result<(), ComposeError> {
        let start = target.pos();
        self.owner.compose(target, compressor.as_deref_mut());
        self.rtype().compose(target);
        self.class.compose(target);
        target.append_u32(self.ttl);
        let res = target.compose_len_prefixed(|target| {
            self.data.compose_rdata(target, compressor.as_deref_mut());
            Ok(())
        });
        if res.is_err() {
            target.truncate(start);
            if let Some(compressor) = compressor {
                compressor.truncate(start);
            }
        }
        res
    }

    /// Appends the canonical wire format of the record to `target`.
    ///
    /// The owner name is lowercased and never compressed and the record
    /// data is in its canonical form.
    pub fn compose_canonical(
        &self,
        target: &mut Composer,
    ) -> Result<(), ComposeError> {
        let start = target.pos();
        self.owner.compose_canonical(target);
        self.rtype().compose(target);
        self.class.compose(target);
        target.append_u32(self.ttl);
        let res = target.compose_len_prefixed(|target| {
            self.data.compose_canonical_rdata(target);
            Ok(())
        });
        if res.is_err() {
            target.truncate(start);
        }
        res
    }

    /// Scans a record from presentation format.
    ///
    /// The format is the owner name, optionally the TTL and class in any
    /// order, the record type, and the record data. A missing TTL is taken
    /// from `default_ttl` and a missing class is IN.
    pub fn scan(
        scanner: &mut Scanner,
        origin: Option<&Name>,
        default_ttl: u32,
    ) -> Result<Self, ScanError> {
        let owner = Name::scan_absolute(scanner, origin)?;
        let mut ttl = None;
        let mut class = None;
        let rtype = loop {
            let token = scanner.scan_str()?;
            if ttl.is_none() {
                if let Ok(value) = token.parse::<u32>() {
                    ttl = Some(value);
                    continue;
                }
            }
            if class.is_none() {
                if let Ok(value) = token.parse::<Class>() {
                    class = Some(value);
                    continue;
                }
            }
            break rtype_from_str(token)
                .ok_or_else(|| scanner.error("unknown record type"))?;
        };
        let data = RecordData::scan(rtype, scanner, origin)?;
        Ok(Record {
            owner,
            class: class.unwrap_or(Class::IN),
            ttl: ttl.unwrap_or(default_ttl),
            data,
        })
    }
}

/// # Ordering
///
impl Record {
    /// Compares two records in canonical order.
    ///
    /// Records are ordered by owner name, class, type, and finally by the
    /// canonical wire format of their data as an unsigned octet sequence.
    pub fn canonical_cmp(&self, other: &Self) -> Ordering {
        self.owner
            .cmp(&other.owner)
            .then_with(|| self.class.cmp(&other.class))
            .then_with(|| self.rtype().cmp(&other.rtype()))
            .then_with(|| self.rdata_cmp(other))
    }

    /// Compares the canonical forms of the record data only.
    pub fn rdata_cmp(&self, other: &Self) -> Ordering {
        self.data
            .to_canonical_rdata()
            .cmp(&other.data.to_canonical_rdata())
    }
}

//--- FromStr

impl str::FromStr for Record {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut scanner = Scanner::new(s)?;
        let res = Self::scan(&mut scanner, None, 0)?;
        scanner.done()?;
        Ok(res)
    }
}

//--- PartialEq, Eq, and Hash

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.owner == other.owner
            && self.rtype() == other.rtype()
            && self.class == other.class
            && self.rdata_cmp(other) == Ordering::Equal
    }
}

impl Eq for Record {}

impl hash::Hash for Record {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.owner.hash(state);
        self.rtype().hash(state);
        self.class.hash(state);
        self.data.to_canonical_rdata().hash(state);
    }
}

//--- Display

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}",
            self.owner,
            self.ttl,
            self.class,
            display_rtype(self.rtype())
        )?;
        if !self.data.is_empty() {
            write!(f, "\t{}", self.data)?;
        }
        Ok(())
    }
}

//============ Testing =======================================================
