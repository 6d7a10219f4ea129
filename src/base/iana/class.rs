//! DNS CLASSes.

//------------ Class ---------------------------------------------------------

int_enum! {
    /// DNS CLASSes.
    ///
    /// The domain name space is partitioned into separate classes for
    /// different network types. In practice, only the IN class is really
    /// relevant.
    ///
    /// In addition, there are query classes used in questions or UPDATE
    /// messages, namely NONE and ANY. TSIG records always use
    /// class ANY. The OPT pseudo record reuses the class field for the UDP
    /// payload size, so any value may turn up in its place.
    ///
    /// [DNS CLASSes IANA registry]: http://www.iana.org/assignments/dns-parameters/dns-parameters.xhtml#dns-parameters-2
    =>
    Class, u16, parse_u16, append_u16;

    /// Internet (IN).
    (IN => 1, "IN")

    /// Chaosnet (CH).
    (CH => 3, "CH")

    /// Hesiod (HS).
    (HS => 4, "HS")

    /// Query class NONE.
    ///
    /// Used in UPDATE messages to require that an RRset does not exist or
    /// to delete a record.
    (NONE => 0xFE, "NONE")

    /// Query class ANY.
    (ANY => 0xFF, "ANY")
}

int_enum_str_with_prefix!(Class, "CLASS", u16);
from_str_error!("unknown class");

//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::Class;
    use core::str::FromStr;

    #[test]
    fn text() {
        assert_eq!(Class::from_str("in"), Ok(Class::IN));
        assert_eq!(Class::from_str("any"), Ok(Class::ANY));
        assert_eq!(Class::from_str("CLASS5"), Ok(Class::from_int(5)));
        assert_eq!(Class::from_int(5).to_string(), "CLASS5");
        assert_eq!(Class::ANY.to_string(), "ANY");
    }

    #[test]
    fn debug() {
        assert_eq!(format!("{:?}", Class::IN), "Class::IN");
        assert_eq!(format!("{:?}", Class::from_int(69)), "Class(69)");
    }
}
