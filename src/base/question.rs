//! A single question in a DNS message.
//!
//! This module defines the type [`Question`] which represents an entry in
//! the question section of a DNS message.

use super::iana::{Class, Rtype};
use super::name::{Compressor, Name};
use super::scan::{ScanError, Scanner};
use super::wire::{Composer, ParseError, Parser};
use core::{fmt, str};

//------------ Question ------------------------------------------------------

/// A question in a DNS message.
///
/// In DNS, a question describes what is requested in a query. It consists
/// of three elements: a domain name, a record type, and a class. This type
/// represents such a question.
///
/// Questions compare equal if their names are equal ignoring ASCII case
/// and their types and classes are the same.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Question {
    /// The domain name of the question.
    qname: Name,

    /// The record type of the question.
    qtype: Rtype,

    /// The class of the question.
    qclass: Class,
}

/// # Creation and Conversion
///
impl Question {
    /// Creates a new question from its three components.
    ///
    /// # Panics
    ///
    /// The function panics if `qname` is a relative name.
    pub fn new(qname: Name, qtype: Rtype, qclass: Class) -> Self {
        assert!(qname.is_absolute(), "relative name in question");
        Question {
            qname,
            qtype,
            qclass,
        }
    }

    /// Creates a new question from a name and record type, assuming class IN.
    pub fn new_in(qname: Name, qtype: Rtype) -> Self {
        Self::new(qname, qtype, Class::IN)
    }

    /// Converts the question into the qname.
    pub fn into_qname(self) -> Name {
        self.qname
    }
}

/// # Field Access
///
impl Question {
    /// Returns a reference to the domain name in the question.
    pub fn qname(&self) -> &Name {
        &self.qname
    }

    /// Returns the record type of the question.
    pub fn qtype(&self) -> Rtype {
        self.qtype
    }

    /// Returns the class of the question.
    pub fn qclass(&self) -> Class {
        self.qclass
    }
}

/// # Parsing and Composing
///
impl Question {
    pub fn parse(parser: &mut Parser) -> Result<Self, ParseError> {
        Ok(Question {
            qname: Name::parse(parser)?,
            qtype: Rtype::parse(parser)?,
            qclass: Class::parse(parser)?,
        })
    }

    pub fn compose(
        &self,
        target: &mut Composer,
        compressor: Option<&mut Compressor>,
    ) {
        self.qname.compose(target, compressor);
        self.qtype.compose(target);
        self.qclass.compose(target);
    }

    /// Scans a question from presentation format.
    ///
    /// The format is the name followed by an optional class and the type.
    pub fn scan(
        scanner: &mut Scanner,
        origin: Option<&Name>,
    ) -> Result<Self, ScanError> {
        let qname = Name::scan_absolute(scanner, origin)?;
        let token = scanner.scan_str()?;
        let (qclass, token) = match token.parse::<Class>() {
            Ok(class) => (class, scanner.scan_str()?),
            Err(_) => (Class::IN, token),
        };
        let qtype = crate::rdata::rtype_from_str(token)
            .ok_or_else(|| scanner.error("unknown record type"))?;
        Ok(Question {
            qname,
            qtype,
            qclass,
        })
    }
}

//--- FromStr

impl str::FromStr for Question {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut scanner = Scanner::new(s)?;
        let res = Self::scan(&mut scanner, None)?;
        scanner.done()?;
        Ok(res)
    }
}

//--- Display

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}",
            self.qname,
            self.qclass,
            crate::rdata::display_rtype(self.qtype)
        )
    }
}

//============ Testing =======================================================
