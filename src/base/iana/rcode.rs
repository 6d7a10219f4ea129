//! DNS response codes.
//!
//! The header carries a four bit response code represented by [`Rcode`].
//! TSIG records carry a sixteen bit error field whose values share the
//! name space with the header codes but add a few TSIG specific ones. It
//! is represented by [`TsigRcode`].

//------------ Rcode ---------------------------------------------------------

int_enum! {
    /// DNS response codes as stored in the message header.
    ///
    /// Only the lower four bits are significant. Values above 15 are never
    /// placed into a header.
    ///
    /// [IANA DNS RCODEs]: http://www.iana.org/assignments/dns-parameters/dns-parameters.xhtml#dns-parameters-6
    =>
    Rcode, u8, parse_u8, append_u8;

    /// No error condition.
    (NOERROR => 0, "NOERROR")

    /// Format error.
    ///
    /// The name server was unable to interpret the query.
    (FORMERR => 1, "FORMERR")

    /// Server failure.
    (SERVFAIL => 2, "SERVFAIL")

    /// Name error.
    ///
    /// The domain name given in the query does not exist.
    (NXDOMAIN => 3, "NXDOMAIN")

    /// Not implemented.
    (NOTIMP => 4, "NOTIMP")

    /// Query refused.
    (REFUSED => 5, "REFUSED")

    /// Name exists when it should not.
    (YXDOMAIN => 6, "YXDOMAIN")

    /// RR set exists when it should not.
    (YXRRSET => 7, "YXRRSET")

    /// RR set that should exist does not.
    (NXRRSET => 8, "NXRRSET")

    /// Server not authoritative for zone or client not authorized.
    (NOTAUTH => 9, "NOTAUTH")

    /// Name not contained in zone.
    (NOTZONE => 10, "NOTZONE")
}

int_enum_str_with_decimal!(Rcode, u8);

//------------ TsigRcode -----------------------------------------------------

int_enum! {
    /// Response codes for transaction authentication (TSIG).
    ///
    /// TSIG records contain a 16 bit wide error field whose values are an
    /// extension of the standard DNS response codes. The values from zero
    /// to fifteen are identical to [`Rcode`]. This type is also used as the
    /// outcome of verifying a TSIG-signed message.
    =>
    TsigRcode, u16, parse_u16, append_u16;

    /// No error condition.
    (NOERROR => 0, "NOERROR")

    /// Format error.
    (FORMERR => 1, "FORMERR")

    /// Server failure.
    (SERVFAIL => 2, "SERVFAIL")

    /// Name error.
    (NXDOMAIN => 3, "NXDOMAIN")

    /// Not implemented.
    (NOTIMP => 4, "NOTIMP")

    /// Query refused.
    (REFUSED => 5, "REFUSED")

    /// Server not authoritative for zone or client not authorized.
    (NOTAUTH => 9, "NOTAUTH")

    /// TSIG signature failure.
    (BADSIG => 16, "BADSIG")

    /// Key not recognized.
    (BADKEY => 17, "BADKEY")

    /// Signature out of time window.
    (BADTIME => 18, "BADTIME")

    /// Bad TKEY mode.
    (BADMODE => 19, "BADMODE")

    /// Duplicate key name.
    (BADNAME => 20, "BADNAME")

    /// Algorithm not supported.
    (BADALG => 21, "BADALG")

    /// Bad truncation.
    (BADTRUNC => 22, "BADTRUNC")
}

int_enum_str_with_decimal!(TsigRcode, u16);
from_str_error!("unknown response code");

impl TsigRcode {
    /// Returns whether the code signals success.
    #[must_use]
    pub fn is_ok(self) -> bool {
        self == TsigRcode::NOERROR
    }
}

impl From<Rcode> for TsigRcode {
    fn from(value: Rcode) -> TsigRcode {
        TsigRcode::from_int(u16::from(value.to_int()))
    }
}

#[cfg(test)]
mod test {
    use super::{Rcode, TsigRcode};

    #[test]
    fn tsig_from_rcode() {
        assert_eq!(TsigRcode::from(Rcode::FORMERR), TsigRcode::FORMERR);
        assert_eq!(TsigRcode::BADTIME.to_string(), "BADTIME");
        assert_eq!("17".parse::<TsigRcode>(), Ok(TsigRcode::BADKEY));
    }
}
