//! Basics.
//!
//! This module provides types for working with DNS data. The types allow
//! creating such data from scratch and processing it. Crucially, the module
//! provides means to extract the data from wire-format DNS messages and
//! assemble such messages.
//!
//!
//! ## Parsing and Composing Messages
//!
//! In order to easily distinguish the process of creating and dissecting
//! wire-format messages from other forms of representation conversion such
//! as reading from a master file, we use the term *parsing* for extracting
//! data from a wire-format representation and *composing* for producing such
//! a representation. The term *scanning* is used for reading the textual
//! presentation format.
//!
//! Both parsing and composing happen on buffers holding a complete DNS
//! message. This seems to be a reasonable choice given the limited size of
//! DNS messages and the complexities introduced by compressing domain names
//! in messages by referencing other parts of the message. The fundamental
//! types for parsing and composing, [`Parser`] and [`Composer`], live in the
//! [wire] module.
//!
//! The [`Message`] type holds a complete DNS message. It can be parsed from
//! and composed into wire format, including composing into a limited amount
//! of space by dropping whole RRsets.
//!
//!
//! # Types for DNS Data
//!
//! The module contains a number of types for DNS data, both fundamental
//! and composed. Because they often come with a number of support types,
//! they are arranged in submodules:
//!
//! * [charstr] for DNS character strings,
//! * [header] for the header of DNS messages,
//! * [iana] for the various parameter types,
//! * [name] for domain names and their compression,
//! * [opt] for the OPT record used in EDNS,
//! * [question] for questions,
//! * [rdata] for the basics of record data,
//! * [record] for DNS resource records, and
//! * [rrset] for sets of records sharing owner, class, and type.
//!
//! The record data types for the individual record types live in the
//! top-level [rdata][crate::rdata] module.

pub use self::charstr::CharStr;
pub use self::header::{Header, HeaderCounts, HeaderSection, Section};
pub use self::iana::{Class, Opcode, Rcode, Rtype, TsigRcode};
pub use self::message::{Message, TsigState};
pub use self::name::{Compressor, Name};
pub use self::opt::OptRecord;
pub use self::question::Question;
pub use self::rdata::{ComposeRecordData, UnknownRecordData};
pub use self::record::Record;
pub use self::rrset::Rrset;
pub use self::wire::{Composer, ParseError, Parser};

pub mod charstr;
pub mod header;
pub mod iana;
pub mod message;
pub mod name;
pub mod opt;
pub mod question;
pub mod rdata;
pub mod record;
pub mod rrset;
pub mod scan;
pub mod wire;
