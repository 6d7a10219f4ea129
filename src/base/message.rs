//! Complete DNS messages.
//!
//! This module defines the [`Message`] type, a DNS message consisting of a
//! header and four sections. Messages are created either empty, to be
//! filled by adding questions and records, or by parsing wire-format data
//! via [`Message::from_octets`].
//!
//! The section counts in the header always reflect the number of entries
//! actually present in the sections. They are only changed by adding or
//! removing entries and cannot be set directly.
//!
//! A message is converted into its wire format by
//! [`to_wire`][Message::to_wire] or, if the result must not exceed a
//! certain size, by [`to_wire_bounded`][Message::to_wire_bounded]. The
//! latter drops whole RRsets from the end of the message until it fits and
//! sets the TC flag if it had to do so. If a TSIG key has been attached to
//! the message, it is signed as part of creating the wire format.

use super::header::{CountOverflow, Header, HeaderCounts, HeaderSection, Section};
use super::iana::{Opcode, Rtype};
use super::name::{Compressor, Name};
use super::opt::OptRecord;
use super::question::Question;
use super::record::Record;
use super::rrset::Rrset;
use super::wire::{ComposeError, Composer, ParseError, Parser};
use bytes::Bytes;
use core::fmt;
use std::collections::HashSet;
use tracing::{debug, trace};

#[cfg(feature = "tsig")]
use crate::tsig::TsigSigning;

//------------ Message -------------------------------------------------------

/// A DNS message.
///
/// The message keeps its questions and the records of the answer,
/// authority, and additional sections in insertion order. OPT and TSIG
/// pseudo records live in the additional section like any other record.
///
/// When a message is created from wire-format data, the original data is
/// kept so that a TSIG signature can be checked against the exact octets
/// that were signed.
#[derive(Clone, Debug)]
pub struct Message {
    /// The header without the section counts.
    header: Header,

    /// The section counts.
    counts: HeaderCounts,

    /// The question section.
    questions: Vec<Question>,

    /// The answer, authority, and additional sections.
    records: [Vec<Record>; 3],

    /// The data the message was parsed from.
    raw: Option<Bytes>,

    /// The offset of the TSIG record in the raw data.
    tsig_start: Option<usize>,

    /// The state of the message’s signature.
    tsig_state: TsigState,

    /// The key for signing the message when creating its wire format.
    #[cfg(feature = "tsig")]
    tsig: Option<TsigSigning>,

    /// The TSIG record created by the most recent call to `to_wire`.
    generated_tsig: Option<Record>,

    /// The length of the most recently created wire format.
    last_wire_len: usize,
}

/// # Creation
///
impl Message {
    /// The largest size of a message in wire format.
    pub const MAX_LEN: usize = 0xFFFF;

    /// Creates a new, empty message.
    ///
    /// If the `rand` feature is enabled, the message ID is chosen randomly.
    /// Otherwise it is zero.
    pub fn new() -> Self {
        let mut header = Header::new();
        #[cfg(feature = "rand")]
        header.set_random_id();
        Self::with_header(header)
    }

    /// Creates a new, empty message with the given message ID.
    pub fn with_id(id: u16) -> Self {
        let mut header = Header::new();
        header.set_id(id);
        Self::with_header(header)
    }

    fn with_header(header: Header) -> Self {
        Message {
            header,
            counts: HeaderCounts::new(),
            questions: Vec::new(),
            records: Default::default(),
            raw: None,
            tsig_start: None,
            tsig_state: TsigState::Unsigned,
            #[cfg(feature = "tsig")]
            tsig: None,
            generated_tsig: None,
            last_wire_len: 0,
        }
    }

    /// Creates a new query for the given question.
    ///
    /// The query has the RD flag set.
    pub fn new_query(question: Question) -> Self {
        let mut res = Self::new();
        res.header.set_opcode(Opcode::QUERY);
        res.header.set_rd(true);
        res.questions.push(question);
        res.counts.set(Section::Question, 1);
        res
    }

    /// Parses a message from its wire format.
    ///
    /// All sections are parsed completely. The data is kept with the
    /// message for verifying its signature later. A TSIG record must be the
    /// last record of the message.
    pub fn from_octets(octets: impl Into<Bytes>) -> Result<Self, ParseError> {
        let raw = octets.into();
        let mut parser = Parser::from_ref(raw.as_ref());
        let section = HeaderSection::parse(&mut parser)?;
        let mut res = Self::with_header(*section.header());
        let counts = *section.counts();
        let update = res.header.opcode() == Opcode::UPDATE;

        for _ in 0..counts.qdcount() {
            res.questions.push(Question::parse(&mut parser)?);
        }
        for section in &Section::ALL[1..] {
            let empty_allowed = update
                && (*section == Section::PREREQUISITE
                    || *section == Section::UPDATE);
            let count = counts.get(*section);
            for i in 0..count {
                let start = parser.pos();
                let record = Record::parse(&mut parser, empty_allowed)?;
                if record.rtype() == Rtype::TSIG {
                    if *section != Section::Additional || i + 1 != count {
                        return Err(ParseError::form_error(
                            "TSIG record not last in message",
                        ));
                    }
                    res.tsig_start = Some(start);
                }
                res.records[Self::record_index(*section)].push(record);
            }
        }
        trace!(
            id = res.header.id(),
            len = raw.len(),
            signed = res.tsig_start.is_some(),
            "parsed message"
        );
        res.counts = counts;
        res.raw = Some(raw);
        Ok(res)
    }
}

/// # Header and Sections
///
impl Message {
    /// Returns the message header.
    pub fn header(&self) -> Header {
        self.header
    }

    /// Returns a mutable reference to the message header.
    ///
    /// The section counts are not part of it and can’t be changed directly.
    pub fn header_mut(&mut self) -> &mut Header {
        &mut self.header
    }

    /// Returns the section counts.
    pub fn counts(&self) -> HeaderCounts {
        self.counts
    }

    fn record_index(section: Section) -> usize {
        match section {
            Section::Question => panic!("question section has no records"),
            Section::Answer => 0,
            Section::Authority => 1,
            Section::Additional => 2,
        }
    }

    /// Returns the questions of the message.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Returns the first question of the message.
    pub fn question(&self) -> Option<&Question> {
        self.questions.first()
    }

    /// Appends a question to the question section.
    pub fn push_question(
        &mut self,
        question: Question,
    ) -> Result<(), CountOverflow> {
        self.counts.inc(Section::Question)?;
        self.questions.push(question);
        Ok(())
    }

    /// Returns the records of a section.
    ///
    /// # Panics
    ///
    /// The method panics if `section` is the question section. Use
    /// [`questions`][Self::questions] for it instead.
    pub fn section(&self, section: Section) -> &[Record] {
        &self.records[Self::record_index(section)]
    }

    /// Appends a record to a section.
    ///
    /// A TSIG record at the end of the additional section stays last: other
    /// records are inserted before it.
    ///
    /// # Panics
    ///
    /// The method panics if `section` is the question section.
    pub fn add_record(
        &mut self,
        record: Record,
        section: Section,
    ) -> Result<(), CountOverflow> {
        let idx = Self::record_index(section);
        self.counts.inc(section)?;
        let list = &mut self.records[idx];
        let pos = match list.last() {
            Some(last)
                if last.rtype() == Rtype::TSIG
                    && record.rtype() != Rtype::TSIG =>
            {
                list.len() - 1
            }
            _ => list.len(),
        };
        list.insert(pos, record);
        Ok(())
    }

    /// Removes the first record equal to `record` from a section.
    ///
    /// Returns whether a record was removed. The section count is only
    /// changed if it was.
    pub fn remove_record(&mut self, record: &Record, section: Section) -> bool {
        let list = &mut self.records[Self::record_index(section)];
        match list.iter().position(|rr| rr == record) {
            Some(pos) => {
                list.remove(pos);
                self.counts.dec(section);
                true
            }
            None => false,
        }
    }

    /// Removes all entries from a section.
    pub fn remove_all(&mut self, section: Section) {
        match section {
            Section::Question => self.questions.clear(),
            _ => self.records[Self::record_index(section)].clear(),
        }
        self.counts.set(section, 0);
    }

    /// Returns whether a section contains a record equal to `record`.
    pub fn contains_record(&self, record: &Record, section: Section) -> bool {
        self.section(section).contains(record)
    }

    /// Returns the first section other than the question section that
    /// contains a record equal to `record`.
    pub fn find_record(&self, record: &Record) -> Option<Section> {
        Section::ALL[1..]
            .iter()
            .copied()
            .find(|section| self.contains_record(record, *section))
    }

    /// Returns whether a section contains records of the given RRset.
    pub fn find_rrset(&self, owner: &Name, rtype: Rtype, section: Section) -> bool {
        self.section(section)
            .iter()
            .any(|rr| rr.owner() == owner && rr.rrset_type() == rtype)
    }

    /// Returns the records of a section grouped into RRsets.
    ///
    /// The sets appear in the order their first record appears in the
    /// section.
    pub fn section_rrsets(&self, section: Section) -> Vec<Rrset> {
        let records = self.section(section);
        if let [record] = records {
            return vec![Rrset::from_record(record.clone())];
        }
        let mut res: Vec<Rrset> = Vec::new();
        let mut seen: HashSet<&Name> = HashSet::new();
        for record in records {
            if seen.contains(record.owner()) {
                let existing = res.iter().rev().find(|set| {
                    set.first().map_or(false, |first| first.same_rrset(record))
                });
                if let Some(set) = existing {
                    // Membership was checked above.
                    let _ = set.add(record.clone());
                    continue;
                }
            }
            seen.insert(record.owner());
            res.push(Rrset::from_record(record.clone()));
        }
        res
    }

    /// Returns the OPT record of the message if it has one.
    pub fn opt(&self) -> Option<OptRecord> {
        self.records[2].iter().find_map(OptRecord::from_record)
    }

    /// Sets the OPT record of the message.
    ///
    /// Any existing OPT record is replaced. A new OPT record is placed
    /// before a TSIG record.
    pub fn set_opt(&mut self, opt: OptRecord) -> Result<(), CountOverflow> {
        if let Some(pos) =
            self.records[2].iter().position(|rr| rr.rtype() == Rtype::OPT)
        {
            self.records[2][pos] = opt.to_record();
            Ok(())
        } else {
            self.add_record(opt.to_record(), Section::Additional)
        }
    }

    /// Returns the TSIG record if the message has one.
    pub fn tsig_record(&self) -> Option<&Record> {
        self.records[2].last().filter(|rr| rr.rtype() == Rtype::TSIG)
    }
}

/// # Signatures
///
impl Message {
    /// Attaches a TSIG key for signing the message.
    ///
    /// The message is signed whenever its wire format is created.
    #[cfg(feature = "tsig")]
    pub fn set_tsig(&mut self, signing: TsigSigning) {
        self.tsig = Some(signing);
    }

    /// Removes and returns the key attached for signing.
    #[cfg(feature = "tsig")]
    pub fn take_tsig(&mut self) -> Option<TsigSigning> {
        self.tsig.take()
    }

    /// Returns the data the message was parsed from.
    pub fn raw(&self) -> Option<&Bytes> {
        self.raw.as_ref()
    }

    /// Returns the offset of the TSIG record in the parsed data.
    pub fn tsig_start(&self) -> Option<usize> {
        self.tsig_start
    }

    /// Returns the TSIG record created by the last call to `to_wire`.
    pub fn generated_tsig(&self) -> Option<&Record> {
        self.generated_tsig.as_ref()
    }

    /// Returns the state of the message’s signature.
    pub fn tsig_state(&self) -> TsigState {
        self.tsig_state
    }

    pub(crate) fn set_tsig_state(&mut self, state: TsigState) {
        self.tsig_state = state
    }

    /// Returns whether the message was signed or a signature was checked.
    pub fn is_signed(&self) -> bool {
        self.tsig_state != TsigState::Unsigned
    }

    /// Returns whether the message’s signature was verified successfully.
    pub fn is_verified(&self) -> bool {
        self.tsig_state == TsigState::Verified
    }
}

/// # Wire Format
///
impl Message {
    /// Returns the wire format of the message.
    pub fn to_wire(&mut self) -> Result<Bytes, ComposeError> {
        self.to_wire_bounded(Self::MAX_LEN)
    }

    /// Returns the wire format of the message limited to `max_len` octets.
    ///
    /// If the message doesn’t fit, RRsets are dropped from the end until it
    /// does. Either all records of an RRset are included or none. The TC
    /// flag is set and the counts of the truncated section and all sections
    /// after it are adjusted. An OPT record and the TSIG signature are
    /// always included and space for them is reserved up front.
    ///
    /// Returns an error if `max_len` is smaller than a header.
    pub fn to_wire_bounded(
        &mut self,
        max_len: usize,
    ) -> Result<Bytes, ComposeError> {
        if max_len < HeaderSection::LEN {
            return Err(ComposeError::ShortBuf);
        }
        let mut budget = max_len;

        #[cfg(feature = "tsig")]
        if let Some(signing) = self.tsig.as_ref() {
            budget = budget.saturating_sub(signing.max_record_len());
        }

        let opt_wire =
            match self.records[2].iter().find(|rr| rr.rtype() == Rtype::OPT) {
                Some(record) => {
                    let wire = Self::compose_alone(record)?;
                    budget = budget.saturating_sub(wire.len());
                    Some(wire)
                }
                None => None,
            };

        // A parsed TSIG record is kept unless the message is signed anew.
        #[cfg(feature = "tsig")]
        let resign = self.tsig.is_some();
        #[cfg(not(feature = "tsig"))]
        let resign = false;
        let tsig_wire = match self.tsig_record() {
            Some(record) if !resign => {
                let wire = Self::compose_alone(record)?;
                budget = budget.saturating_sub(wire.len());
                Some(wire)
            }
            _ => None,
        };

        let mut target = Composer::with_capacity(budget.min(512));
        let mut compressor = Compressor::new();
        let mut section = HeaderSection::new();
        *section.header_mut() = self.header;
        section.compose(&mut target);

        let mut truncated = None;
        for (i, question) in self.questions.iter().enumerate() {
            let start = target.pos();
            question.compose(&mut target, Some(&mut compressor));
            if target.len() > budget {
                target.truncate(start);
                compressor.truncate(start);
                truncated = Some((Section::Question, i));
                break;
            }
        }
        if truncated.is_none() {
            section
                .counts_mut()
                .set(Section::Question, self.questions.len() as u16);
            for sect in &Section::ALL[1..] {
                let (kept, complete) = Self::compose_section(
                    &self.records[Self::record_index(*sect)],
                    &mut target,
                    &mut compressor,
                    budget,
                )?;
                section.counts_mut().set(*sect, kept);
                if !complete {
                    truncated = Some((*sect, usize::from(kept)));
                    break;
                }
            }
        }
        if let Some((sect, kept)) = truncated {
            debug!(section = %sect, kept, max_len, "truncating message");
            section.header_mut().set_tc(true);
            section.counts_mut().set(sect, kept as u16);
            for following in sect.following() {
                section.counts_mut().set(*following, 0);
            }
        }
        target.save();
        target.jump(0);
        section.compose(&mut target);
        target.restore();

        if let Some(opt) = opt_wire {
            target.append_slice(&opt);
            let count = section.counts().arcount() + 1;
            section.counts_mut().set(Section::Additional, count);
            target.patch_u16(10, count);
        }
        if let Some(tsig) = tsig_wire {
            target.append_slice(&tsig);
            let count = section.counts().arcount() + 1;
            section.counts_mut().set(Section::Additional, count);
            target.patch_u16(10, count);
        }

        self.generated_tsig = None;
        #[cfg(feature = "tsig")]
        if let Some(signing) = self.tsig.as_ref() {
            let record = signing.sign(target.as_slice());
            record.compose(&mut target, None)?;
            let count = section.counts().arcount() + 1;
            target.patch_u16(10, count);
            self.generated_tsig = Some(record);
            self.tsig_state = TsigState::Signed;
        }

        self.last_wire_len = target.len();
        Ok(target.freeze())
    }

    /// Composes the records of one section.
    ///
    /// Returns the number of records written and whether all of them were.
    /// OPT and TSIG records are skipped since they are added separately.
    fn compose_section(
        records: &[Record],
        target: &mut Composer,
        compressor: &mut Compressor,
        budget: usize,
    ) -> Result<(u16, bool), ComposeError> {
        let mut kept = 0u16;
        let mut rrset_start = target.pos();
        let mut rrset_kept = 0u16;
        let mut prev: Option<&Record> = None;
        for record in records {
            if record.rtype() == Rtype::OPT || record.rtype() == Rtype::TSIG {
                continue;
            }
            if !prev.map_or(false, |prev| prev.same_rrset(record)) {
                rrset_start = target.pos();
                rrset_kept = kept;
            }
            record.compose(target, Some(&mut *compressor))?;
            if target.len() > budget {
                target.truncate(rrset_start);
                compressor.truncate(rrset_start);
                return Ok((rrset_kept, false));
            }
            kept += 1;
            prev = Some(record);
        }
        Ok((kept, true))
    }

    /// Composes a single record without compression.
    fn compose_alone(record: &Record) -> Result<Bytes, ComposeError> {
        let mut target = Composer::new();
        record.compose(&mut target, None)?;
        Ok(target.freeze())
    }

    /// Returns the length of the most recently created wire format.
    ///
    /// Returns zero if the wire format has never been created.
    pub fn last_wire_len(&self) -> usize {
        self.last_wire_len
    }
}

//--- Default

impl Default for Message {
    fn default() -> Self {
        Self::new()
    }
}

//--- Display

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let header = self.header;
        writeln!(
            f,
            ";; ->>HEADER<<- opcode: {}, status: {}, id: {}",
            header.opcode(),
            header.rcode(),
            header.id()
        )?;
        let update = header.opcode() == Opcode::UPDATE;
        let names = if update {
            ["ZONE", "PREREQ", "UPDATE", "ADDITIONAL"]
        } else {
            ["QUERY", "ANSWER", "AUTHORITY", "ADDITIONAL"]
        };
        writeln!(
            f,
            ";; flags: {}; {}: {}, {}: {}, {}: {}, {}: {}",
            header.flags(),
            names[0],
            self.counts.qdcount(),
            names[1],
            self.counts.ancount(),
            names[2],
            self.counts.nscount(),
            names[3],
            self.counts.arcount()
        )?;
        if let Some(opt) = self.opt() {
            writeln!(f, "\n;; OPT PSEUDOSECTION:\n; {}", opt)?;
        }
        writeln!(f, "\n;; {} SECTION:", names[0])?;
        for question in &self.questions {
            writeln!(f, ";{}", question)?;
        }
        for (i, sect) in Section::ALL[1..].iter().enumerate() {
            writeln!(f, "\n;; {} SECTION:", names[i + 1])?;
            for record in self.section(*sect) {
                if record.rtype() != Rtype::OPT {
                    writeln!(f, "{}", record)?;
                }
            }
        }
        if self.last_wire_len > 0 {
            writeln!(f, "\n;; Message size: {} bytes", self.last_wire_len)?;
        }
        Ok(())
    }
}

//------------ TsigState -----------------------------------------------------

/// The state of a message’s transaction signature.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TsigState {
    /// The message has not been signed or checked.
    Unsigned,

    /// The message was signed when creating its wire format.
    Signed,

    /// The message’s signature was checked successfully.
    Verified,

    /// Checking the message’s signature failed.
    Failed,
}

//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::*;
    use crate::base::iana::Class;
    use crate::rdata::RecordData;
    use core::str::FromStr;

    fn rr(s: &str) -> Record {
        Record::from_str(s).unwrap()
    }

    fn query() -> Message {
        let mut msg = Message::new_query(
            Question::from_str("www.example.com. IN A").unwrap(),
        );
        msg.header_mut().set_id(0x1234);
        msg
    }

    #[test]
    fn counts_follow_sections() {
        let mut msg = query();
        let a = rr("www.example.com. 300 IN A 192.0.2.1");
        msg.add_record(a.clone(), Section::Answer).unwrap();
        msg.add_record(rr("www.example.com. 300 IN A 192.0.2.2"), Section::Answer)
            .unwrap();
        assert_eq!(msg.counts().ancount(), 2);
        assert!(msg.remove_record(&a, Section::Answer));
        assert!(!msg.remove_record(&a, Section::Answer));
        assert!(!msg.remove_record(&a, Section::Authority));
        assert_eq!(msg.counts().ancount(), 1);
        assert_eq!(msg.counts().nscount(), 0);
        msg.remove_all(Section::Answer);
        assert_eq!(msg.counts().ancount(), 0);
        assert!(msg.section(Section::Answer).is_empty());
        assert_eq!(msg.counts().qdcount(), 1);
    }

    #[test]
    fn wire_round_trip() {
        let mut msg = query();
        msg.header_mut().set_qr(true);
        msg.add_record(rr("www.example.com. 300 IN CNAME host.example.com."), Section::Answer)
            .unwrap();
        msg.add_record(rr("host.example.com. 300 IN A 192.0.2.1"), Section::Answer)
            .unwrap();
        msg.add_record(rr("example.com. 300 IN NS ns.example.com."), Section::Authority)
            .unwrap();
        msg.set_opt(OptRecord::new()).unwrap();
        let wire = msg.to_wire().unwrap();
        assert_eq!(msg.last_wire_len(), wire.len());

        let parsed = Message::from_octets(wire.clone()).unwrap();
        assert_eq!(parsed.header(), msg.header());
        assert_eq!(parsed.counts(), msg.counts());
        assert_eq!(parsed.questions(), msg.questions());
        for sect in &Section::ALL[1..] {
            assert_eq!(parsed.section(*sect), msg.section(*sect));
        }
        assert_eq!(parsed.opt().unwrap().udp_payload_size(), 1232);

        let mut parsed = parsed;
        assert_eq!(parsed.to_wire().unwrap(), wire);
    }

    #[test]
    fn bounded_header_only() {
        let mut msg = query();
        assert_eq!(msg.to_wire_bounded(11), Err(ComposeError::ShortBuf));
        let wire = msg.to_wire_bounded(12).unwrap();
        assert_eq!(wire.len(), 12);
        let parsed = Message::from_octets(wire).unwrap();
        assert!(parsed.header().tc());
        assert_eq!(parsed.counts().qdcount(), 0);
    }

    #[test]
    fn truncation_drops_whole_rrsets() {
        let mut msg = query();
        msg.add_record(rr("www.example.com. 300 IN A 192.0.2.1"), Section::Answer)
            .unwrap();
        for i in 1..=5 {
            msg.add_record(
                rr(&format!("mail.example.com. 300 IN A 192.0.2.{}", i)),
                Section::Answer,
            )
            .unwrap();
        }
        msg.add_record(rr("example.com. 300 IN NS ns.example.com."), Section::Authority)
            .unwrap();
        let full = msg.to_wire().unwrap().len();
        let wire = msg.to_wire_bounded(full - 20).unwrap();
        assert!(wire.len() <= full - 20);
        let parsed = Message::from_octets(wire).unwrap();
        assert!(parsed.header().tc());
        assert_eq!(parsed.counts().ancount(), 1);
        assert_eq!(parsed.counts().nscount(), 0);
        assert!(!msg.header().tc());
    }

    #[test]
    fn update_sections_allow_empty_data() {
        let mut msg = Message::with_id(7);
        msg.header_mut().set_opcode(Opcode::UPDATE);
        msg.push_question(Question::new(
            Name::from_str("example.com.").unwrap(),
            Rtype::SOA,
            Class::IN,
        ))
        .unwrap();
        msg.add_record(
            Record::new(
                Name::from_str("www.example.com.").unwrap(),
                Class::ANY,
                0,
                RecordData::empty(Rtype::A),
            ),
            Section::PREREQUISITE,
        )
        .unwrap();
        let wire = msg.to_wire().unwrap();
        let parsed = Message::from_octets(wire).unwrap();
        assert!(parsed.section(Section::PREREQUISITE)[0].data().is_empty());
        assert!(parsed.to_string().contains(";; PREREQ SECTION:"));
    }

    #[test]
    fn rrsets_of_section() {
        let mut msg = query();
        for text in [
            "a.example. 300 IN A 192.0.2.1",
            "b.example. 300 IN A 192.0.2.2",
            "a.example. 200 IN A 192.0.2.3",
            "a.example. 300 IN TXT \"hello\"",
        ] {
            msg.add_record(rr(text), Section::Answer).unwrap();
        }
        let sets = msg.section_rrsets(Section::Answer);
        assert_eq!(sets.len(), 3);
        assert_eq!(sets[0].size(), 2);
        assert_eq!(sets[0].ttl(), Some(200));
        assert_eq!(sets[1].owner(), Some(Name::from_str("b.example.").unwrap()));
        assert_eq!(sets[2].rtype(), Some(Rtype::TXT));
        assert!(msg.find_rrset(
            &Name::from_str("A.example.").unwrap(),
            Rtype::TXT,
            Section::Answer
        ));
        assert_eq!(
            msg.find_record(&rr("b.example. 1 IN A 192.0.2.2")),
            Some(Section::Answer)
        );
    }

    #[test]
    fn tsig_must_be_last() {
        // Header with ARCOUNT 2, followed by a TSIG and an A record.
        let mut target = Composer::new();
        let mut section = HeaderSection::new();
        section.counts_mut().set(Section::Additional, 2);
        section.compose(&mut target);
        let tsig = rr("key. 0 ANY TSIG hmac-sha256. 1700000000 300 0 1 0 0");
        tsig.compose(&mut target, None).unwrap();
        rr("a.example. 300 IN A 192.0.2.1")
            .compose(&mut target, None)
            .unwrap();
        assert!(Message::from_octets(target.freeze()).is_err());
    }

    #[test]
    fn display() {
        let mut msg = query();
        msg.add_record(rr("www.example.com. 300 IN A 192.0.2.1"), Section::Answer)
            .unwrap();
        let text = msg.to_string();
        assert!(text.starts_with(";; ->>HEADER<<- opcode: QUERY, status: NOERROR, id: 4660\n"));
        assert!(text.contains(";; flags: RD; QUERY: 1, ANSWER: 1, AUTHORITY: 0, ADDITIONAL: 0\n"));
        assert!(text.contains(";www.example.com.\tIN\tA\n"));
        assert!(text.contains("www.example.com.\t300\tIN\tA\t192.0.2.1\n"));
    }
}
