//! Sets of records sharing owner, type, and class.
//!
//! An RRset groups all records with the same owner name, record type, and
//! class. Signature records covering the set are kept alongside the data
//! records but stored separately. An [`Rrset`] can be shared between
//! threads; all access goes through a lock held by the set.

use super::iana::{Class, Rtype};
use super::name::Name;
use super::record::Record;
use core::fmt;
use parking_lot::Mutex;
use tracing::trace;

//------------ Rrset ---------------------------------------------------------

/// A set of records with the same owner, RRset type, and class.
///
/// All data records of a set have the same TTL. When a record with a
/// different TTL is added, all records are lowered to the smaller of the
/// TTLs. Signature records are kept apart and their TTLs are left alone.
///
/// The data records can be retrieved in rotating order via
/// [`rrs`][Self::rrs] which is handy for round-robin load distribution.
#[derive(Default)]
pub struct Rrset {
    inner: Mutex<Inner>,
}

#[derive(Clone, Debug, Default)]
struct Inner {
    /// The data records.
    rrs: Vec<Record>,

    /// The signature records.
    sigs: Vec<Record>,

    /// The rotation cursor.
    position: usize,
}

impl Inner {
    fn first(&self) -> Option<&Record> {
        self.rrs.first().or_else(|| self.sigs.first())
    }
}

impl Rrset {
    /// Creates a new, empty RRset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an RRset containing a single record.
    pub fn from_record(record: Record) -> Self {
        let res = Self::new();
        {
            let mut inner = res.inner.lock();
            if record.is_signature() {
                inner.sigs.push(record)
            } else {
                inner.rrs.push(record)
            }
        }
        res
    }

    /// Adds a record to the set.
    ///
    /// Returns an error if the record does not belong to the set. Adding a
    /// record equal to one already present does nothing.
    pub fn add(&self, record: Record) -> Result<(), RrsetError> {
        let mut inner = self.inner.lock();
        if let Some(first) = inner.first() {
            if !first.same_rrset(&record) {
                return Err(RrsetError::Mismatch);
            }
        }
        if record.is_signature() {
            if !inner.sigs.contains(&record) {
                inner.sigs.push(record);
            }
            return Ok(());
        }

        let record = match inner.rrs.first().map(Record::ttl) {
            Some(ttl) if record.ttl() > ttl => record.with_ttl(ttl),
            Some(ttl) if record.ttl() < ttl => {
                trace!(
                    owner = %record.owner(),
                    from = ttl,
                    to = record.ttl(),
                    "lowering RRset TTL"
                );
                let new_ttl = record.ttl();
                for rr in inner.rrs.iter_mut() {
                    *rr = rr.with_ttl(new_ttl);
                }
                record
            }
            _ => record,
        };
        if !inner.rrs.contains(&record) {
            inner.rrs.push(record);
        }
        Ok(())
    }

    /// Removes a record from the set.
    ///
    /// Returns whether the record was present.
    pub fn delete(&self, record: &Record) -> bool {
        let mut inner = self.inner.lock();
        let list = if record.is_signature() {
            &mut inner.sigs
        } else {
            &mut inner.rrs
        };
        match list.iter().position(|rr| rr == record) {
            Some(idx) => {
                list.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Removes all records from the set.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.rrs.clear();
        inner.sigs.clear();
        inner.position = 0;
    }

    /// Returns the data records of the set.
    ///
    /// If `cycle` is true, the records start at a position that advances
    /// by one with each call. Otherwise they are returned in the order
    /// they were added.
    pub fn rrs(&self, cycle: bool) -> std::vec::IntoIter<Record> {
        let mut inner = self.inner.lock();
        let len = inner.rrs.len();
        if !cycle || len == 0 {
            return inner.rrs.clone().into_iter();
        }
        let start = inner.position % len;
        inner.position = inner.position.wrapping_add(1);
        let mut res = Vec::with_capacity(len);
        res.extend_from_slice(&inner.rrs[start..]);
        res.extend_from_slice(&inner.rrs[..start]);
        res.into_iter()
    }

    /// Returns the signature records of the set.
    pub fn sigs(&self) -> std::vec::IntoIter<Record> {
        self.inner.lock().sigs.clone().into_iter()
    }

    /// Returns the number of data records in the set.
    pub fn size(&self) -> usize {
        self.inner.lock().rrs.len()
    }

    /// Returns the number of signature records in the set.
    pub fn sig_count(&self) -> usize {
        self.inner.lock().sigs.len()
    }

    /// Returns whether the set contains neither data nor signatures.
    pub fn is_empty(&self) -> bool {
        let inner = self.inner.lock();
        inner.rrs.is_empty() && inner.sigs.is_empty()
    }

    /// Returns the first record of the set.
    ///
    /// This is the first data record if there is one or the first
    /// signature otherwise.
    pub fn first(&self) -> Option<Record> {
        self.inner.lock().first().cloned()
    }

    /// Returns the owner name of the set.
    pub fn owner(&self) -> Option<Name> {
        self.first().map(|rr| rr.owner().clone())
    }

    /// Returns the RRset type of the set.
    pub fn rtype(&self) -> Option<Rtype> {
        self.first().map(|rr| rr.rrset_type())
    }

    /// Returns the class of the set.
    pub fn class(&self) -> Option<Class> {
        self.first().map(|rr| rr.class())
    }

    /// Returns the TTL of the set.
    pub fn ttl(&self) -> Option<u32> {
        self.first().map(|rr| rr.ttl())
    }
}

//--- Clone

impl Clone for Rrset {
    fn clone(&self) -> Self {
        Rrset {
            inner: Mutex::new(self.inner.lock().clone()),
        }
    }
}

//--- From

impl From<Record> for Rrset {
    fn from(record: Record) -> Self {
        Self::from_record(record)
    }
}

//--- Display and Debug

impl fmt::Display for Rrset {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let inner = self.inner.lock();
        let first = match inner.first() {
            Some(first) => first,
            None => return f.write_str("{empty}"),
        };
        write!(
            f,
            "{{ {} {} {} {} ",
            first.owner(),
            first.ttl(),
            first.class(),
            crate::rdata::display_rtype(first.rrset_type())
        )?;
        for rr in &inner.rrs {
            write!(f, "[{}] ", rr.data())?;
        }
        if !inner.sigs.is_empty() {
            f.write_str(" sigs: ")?;
            for rr in &inner.sigs {
                write!(f, "[{}] ", rr.data())?;
            }
        }
        f.write_str("}")
    }
}

impl fmt::Debug for Rrset {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("Rrset")
            .field("rrs", &inner.rrs)
            .field("sigs", &inner.sigs)
            .finish()
    }
}

//------------ RrsetError ----------------------------------------------------

/// A record could not be added to an RRset.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RrsetError {
    /// The record’s owner, type, or class differ from the set’s.
    Mismatch,
}

impl fmt::Display for RrsetError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            RrsetError::Mismatch => f.write_str("record does not match RRset"),
        }
    }
}

impl std::error::Error for RrsetError {}

//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::*;
    use core::str::FromStr;
    use std::sync::Arc;

    fn rr(s: &str) -> Record {
        Record::from_str(s).unwrap()
    }

    #[test]
    fn ttl_reconciliation() {
        let set = Rrset::new();
        set.add(rr("example.com. 100 IN A 192.0.2.1")).unwrap();
        set.add(rr("example.com. 50 IN A 192.0.2.2")).unwrap();
        assert!(set.rrs(false).all(|rr| rr.ttl() == 50));

        let set = Rrset::new();
        set.add(rr("example.com. 50 IN A 192.0.2.2")).unwrap();
        set.add(rr("example.com. 100 IN A 192.0.2.1")).unwrap();
        assert!(set.rrs(false).all(|rr| rr.ttl() == 50));
        assert_eq!(set.ttl(), Some(50));
        assert_eq!(set.size(), 2);
    }

    #[test]
    fn duplicates_and_mismatch() {
        let set = Rrset::from_record(rr("example.com. 100 IN A 192.0.2.1"));
        set.add(rr("EXAMPLE.com. 200 IN A 192.0.2.1")).unwrap();
        assert_eq!(set.size(), 1);
        assert_eq!(set.ttl(), Some(100));
        assert_eq!(
            set.add(rr("example.net. 100 IN A 192.0.2.1")),
            Err(RrsetError::Mismatch)
        );
        assert_eq!(
            set.add(rr("example.com. 100 IN AAAA 2001:db8::1")),
            Err(RrsetError::Mismatch)
        );
        assert_eq!(
            set.add(rr("example.com. 100 CH A 192.0.2.1")),
            Err(RrsetError::Mismatch)
        );
    }

    #[test]
    fn signatures() {
        let set = Rrset::from_record(rr("example.com. 100 IN A 192.0.2.1"));
        let sig = rr("example.com. 300 IN RRSIG A 8 2 100 \
                      20240102030405 20231202030405 1234 example.com. AQID");
        set.add(sig.clone()).unwrap();
        assert_eq!(set.size(), 1);
        assert_eq!(set.sig_count(), 1);
        assert_eq!(set.sigs().next().unwrap().ttl(), 300);
        assert_eq!(set.rtype(), Some(Rtype::A));
        assert!(set.delete(&sig));
        assert!(!set.delete(&sig));
        assert_eq!(set.sig_count(), 0);
    }

    #[test]
    fn rotation() {
        let set = Rrset::new();
        for i in 1..=3 {
            set.add(rr(&format!("example.com. 100 IN A 192.0.2.{}", i)))
                .unwrap();
        }
        let firsts: Vec<_> = (0..4)
            .map(|_| set.rrs(true).next().unwrap().to_string())
            .collect();
        assert!(firsts[0].ends_with("192.0.2.1"));
        assert!(firsts[1].ends_with("192.0.2.2"));
        assert!(firsts[2].ends_with("192.0.2.3"));
        assert!(firsts[3].ends_with("192.0.2.1"));
        assert_eq!(set.rrs(true).count(), 3);
        assert!(set.rrs(false).next().unwrap().to_string().ends_with(".1"));
    }

    #[test]
    fn clear_and_empty() {
        let set = Rrset::from_record(rr("example.com. 100 IN A 192.0.2.1"));
        assert!(!set.is_empty());
        set.clear();
        assert!(set.is_empty());
        assert_eq!(set.first(), None);
        assert_eq!(set.rrs(true).count(), 0);
        assert_eq!(set.to_string(), "{empty}");
    }

    #[test]
    fn shared_between_threads() {
        let set = Arc::new(Rrset::new());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let set = set.clone();
                std::thread::spawn(move || {
                    for j in 0..25 {
                        set.add(rr(&format!(
                            "example.com. {} IN A 10.0.{}.{}",
                            100 - i,
                            i,
                            j
                        )))
                        .unwrap();
                        let _ = set.rrs(true).count();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(set.size(), 100);
        assert!(set.rrs(false).all(|rr| rr.ttl() == 97));
    }
}
