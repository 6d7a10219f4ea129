//! DNS OpCodes.

//------------ Opcode --------------------------------------------------------

int_enum! {
    /// DNS OpCodes.
    ///
    /// The opcode specifies the kind of query to be performed. It is a four
    /// bit value stored in the header. The wire methods of this type read
    /// and write a full octet and are of no use for the header itself.
    ///
    /// [IANA registry]: http://www.iana.org/assignments/dns-parameters/dns-parameters.xhtml#dns-parameters-5
    =>
    Opcode, u8, parse_u8, append_u8;

    /// A standard query (0).
    (QUERY => 0, "QUERY")

    /// An inverse query (1, obsolete).
    (IQUERY => 1, "IQUERY")

    /// A server status request (2).
    (STATUS => 2, "STATUS")

    /// A NOTIFY query (4).
    (NOTIFY => 4, "NOTIFY")

    /// An UPDATE query (5).
    ///
    /// In UPDATE messages, the four sections are reinterpreted as zone,
    /// prerequisite, update, and additional sections.
    (UPDATE => 5, "UPDATE")

    /// DNS stateful operations (6).
    (DSO => 6, "DSO")
}

int_enum_str_with_decimal!(Opcode, u8);
from_str_error!("unknown opcode");
