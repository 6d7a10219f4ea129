//! Resource Record (RR) TYPEs

//------------ Rtype ---------------------------------------------------------

int_enum! {
    /// Resource Record Types.
    ///
    /// Each resource record has a 16 bit type value indicating what kind of
    /// information is represented by the record. A few additional types,
    /// called query types or meta types, can only appear in questions or
    /// as pseudo records. This type represents all of these.
    ///
    /// Only the types actually needed somewhere plus the commonly seen ones
    /// have named constants. All other values are displayed using the
    /// generic `TYPE` form, e.g., `TYPE65280`.
    ///
    /// The currently assigned values are maintained in an [IANA registry].
    ///
    /// [IANA registry]: http://www.iana.org/assignments/dns-parameters/dns-parameters.xhtml#dns-parameters-4
    =>
    Rtype, u16, parse_u16, append_u16;

    /// A host address.
    (A => 1, "A")

    /// An authoritative name server.
    (NS => 2, "NS")

    /// A mail destination (obsolete).
    (MD => 3, "MD")

    /// A mail forwarder (obsolete).
    (MF => 4, "MF")

    /// The canonical name for an alias.
    (CNAME => 5, "CNAME")

    /// Marks the start of a zone of authority.
    (SOA => 6, "SOA")

    /// A mailbox domain name.
    (MB => 7, "MB")

    /// A mail group member.
    (MG => 8, "MG")

    /// A mail rename domain name.
    (MR => 9, "MR")

    /// A null resource record.
    (NULL => 10, "NULL")

    /// A well known service description.
    (WKS => 11, "WKS")

    /// A domain name pointer.
    (PTR => 12, "PTR")

    /// Host information.
    (HINFO => 13, "HINFO")

    /// Mailbox or mail list information.
    (MINFO => 14, "MINFO")

    /// Mail exchange.
    (MX => 15, "MX")

    /// Text strings.
    (TXT => 16, "TXT")

    /// For responsible person.
    (RP => 17, "RP")

    /// For AFS data base location.
    (AFSDB => 18, "AFSDB")

    /// Route through.
    (RT => 21, "RT")

    /// For security signature.
    (SIG => 24, "SIG")

    /// For security key.
    (KEY => 25, "KEY")

    /// IPv6 address.
    (AAAA => 28, "AAAA")

    /// Location information.
    (LOC => 29, "LOC")

    /// Server selection.
    (SRV => 33, "SRV")

    /// Naming authority pointer.
    (NAPTR => 35, "NAPTR")

    /// Key exchanger.
    (KX => 36, "KX")

    /// Certificate.
    (CERT => 37, "CERT")

    /// Delegation of a subtree.
    (DNAME => 39, "DNAME")

    /// The EDNS pseudo record.
    (OPT => 41, "OPT")

    /// Delegation signer.
    (DS => 43, "DS")

    /// SSH key fingerprint.
    (SSHFP => 44, "SSHFP")

    /// IPsec key.
    (IPSECKEY => 45, "IPSECKEY")

    /// A DNSSEC signature.
    (RRSIG => 46, "RRSIG")

    /// Next secure record.
    (NSEC => 47, "NSEC")

    /// A DNSSEC public key.
    (DNSKEY => 48, "DNSKEY")

    /// Hashed next secure record.
    (NSEC3 => 50, "NSEC3")

    /// NSEC3 parameters.
    (NSEC3PARAM => 51, "NSEC3PARAM")

    /// TLSA certificate association.
    (TLSA => 52, "TLSA")

    /// Child DS.
    (CDS => 59, "CDS")

    /// Child DNSKEY.
    (CDNSKEY => 60, "CDNSKEY")

    /// Zone message digest.
    (ZONEMD => 63, "ZONEMD")

    /// General purpose service binding.
    (SVCB => 64, "SVCB")

    /// Service binding for HTTPS.
    (HTTPS => 65, "HTTPS")

    /// Sender policy framework (obsolete).
    (SPF => 99, "SPF")

    /// Transaction key.
    (TKEY => 249, "TKEY")

    /// Transaction signature.
    (TSIG => 250, "TSIG")

    /// Incremental zone transfer.
    (IXFR => 251, "IXFR")

    /// Transfer of an entire zone.
    (AXFR => 252, "AXFR")

    /// Mailbox related records.
    (MAILB => 253, "MAILB")

    /// Mail agent records (obsolete).
    (MAILA => 254, "MAILA")

    /// A request for all records.
    (ANY => 255, "ANY")

    /// Uniform resource identifier.
    (URI => 256, "URI")

    /// Certification authority restriction.
    (CAA => 257, "CAA")
}

int_enum_str_with_prefix!(Rtype, "TYPE", u16);
from_str_error!("unknown record type");

impl Rtype {
    /// Returns whether records of this type may only appear in questions.
    #[must_use]
    pub fn is_qtype(self) -> bool {
        matches!(
            self,
            Rtype::IXFR | Rtype::AXFR | Rtype::MAILB | Rtype::MAILA | Rtype::ANY
        )
    }

    /// Returns whether this is a pseudo type that never lives in a zone.
    #[must_use]
    pub fn is_pseudo(self) -> bool {
        matches!(self, Rtype::OPT | Rtype::TSIG | Rtype::TKEY)
    }

    /// Returns whether domain names in the record data may be compressed.
    ///
    /// This is only permitted for the types defined in RFC 1035.
    #[must_use]
    pub fn rdata_compressible(self) -> bool {
        matches!(
            self,
            Rtype::NS
                | Rtype::MD
                | Rtype::MF
                | Rtype::CNAME
                | Rtype::SOA
                | Rtype::MB
                | Rtype::MG
                | Rtype::MR
                | Rtype::PTR
                | Rtype::MINFO
                | Rtype::MX
        )
    }

    /// Returns whether names in the record data are lowercased in
    /// canonical form.
    ///
    /// This is the list from section 6.2 of RFC 4034 minus NSEC as amended
    /// by RFC 6840.
    #[must_use]
    pub fn rdata_canonical_lowercase(self) -> bool {
        self.rdata_compressible()
            || matches!(
                self,
                Rtype::RP
                    | Rtype::AFSDB
                    | Rtype::RT
                    | Rtype::SIG
                    | Rtype::NAPTR
                    | Rtype::KX
                    | Rtype::SRV
                    | Rtype::DNAME
                    | Rtype::RRSIG
            )
    }
}

//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::Rtype;
    use core::str::FromStr;

    #[test]
    fn text() {
        assert_eq!(Rtype::from_str("aaaa"), Ok(Rtype::AAAA));
        assert_eq!(Rtype::from_str("TYPE65280"), Ok(Rtype::from_int(65280)));
        assert_eq!(Rtype::from_str("type1"), Ok(Rtype::A));
        assert!(Rtype::from_str("TYPE").is_err());
        assert!(Rtype::from_str("BOGUS").is_err());
        assert_eq!(Rtype::NSEC.to_string(), "NSEC");
        assert_eq!(Rtype::from_int(65280).to_string(), "TYPE65280");
    }

    #[test]
    fn debug() {
        assert_eq!(format!("{:?}", Rtype::MX), "Rtype::MX");
        assert_eq!(format!("{:?}", Rtype::from_int(1234)), "Rtype(1234)");
    }

    #[test]
    fn rdata_names() {
        assert!(Rtype::MX.rdata_compressible());
        assert!(!Rtype::DNAME.rdata_compressible());
        assert!(Rtype::DNAME.rdata_canonical_lowercase());
        assert!(!Rtype::NSEC.rdata_canonical_lowercase());
    }
}
