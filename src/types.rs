use std::net::IpAddr;
use strum_macros::{Display, EnumString};

/// A resource-record envelope in PowerDNS pipe form: one incoming query, or
/// one `DATA` answer line. Record content is the textual rdata the pipe
/// protocol uses, not wire format.
///
/// # Examples
///
/// ```rust
/// use autodns::types::*;
///
/// let query = Message {
///     name: "example.com".to_string(),
///     class: Class::Internet,
///     r#type: Type::A,
///     id: "-1".to_string(),
///     remote_addr: Some("127.0.0.1".parse().unwrap()),
///     ..Message::default()
/// };
/// let answer = Message::answer(&query, Type::A, 60, "192.0.2.1".to_string());
/// assert_eq!(answer.name, "example.com");
/// assert_eq!(answer.id, "-1");
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Message {
    /// The domain name this record belongs to. DNS treats names
    /// case-insensitively; the pipe front-end lowercases incoming names.
    pub name: String,

    /// The record's class.
    pub class: Class,

    /// The record's type.
    pub r#type: Type,

    /// The number of seconds that the resource record may be cached.
    pub ttl: u32,

    /// Opaque query identifier assigned by the host, echoed back verbatim in
    /// every answer belonging to the query.
    pub id: String,

    /// Textual rdata per the pipe protocol convention, e.g. `192.0.2.1` for
    /// an A record.
    pub content: String,

    /// Address of the querying resolver, when known.
    pub remote_addr: Option<IpAddr>,

    /// Local address the query arrived on, when known.
    pub local_addr: Option<IpAddr>,
}

impl Message {
    /// Answer skeleton for a query: echoes the name and id, class defaults
    /// to Internet.
    pub fn answer(query: &Message, r#type: Type, ttl: u32, content: String) -> Message {
        Message {
            name: query.name.clone(),
            class: Class::Internet,
            r#type,
            ttl,
            id: query.id.clone(),
            content,
            ..Message::default()
        }
    }
}

/// Resource Record Class. See [rfc1035] and [DNS Parameters].
///
/// The textual names double as the registry used by the pipe protocol and
/// the configuration loader; unknown names are rejected at the boundary.
///
/// [rfc1035]: https://datatracker.ietf.org/doc/html/rfc1035
/// [DNS Parameters]: https://www.iana.org/assignments/dns-parameters/dns-parameters.xhtml
#[derive(Copy, Clone, Debug, Display, EnumString, PartialEq)]
#[repr(u16)]
pub enum Class {
    /// Reserved per [rfc6895].
    ///
    /// [rfc6895]: https://datatracker.ietf.org/doc/html/rfc6895
    Reserved = 0,

    /// (Default) The Internet (IN).
    #[strum(serialize = "IN")]
    Internet = 1,

    /// CSNET (CS), obsolete.
    #[strum(serialize = "CS")]
    CsNet = 2,

    /// Chaosnet (CH), obsolete LAN protocol created at MIT in the mid-1970s.
    #[strum(serialize = "CH")]
    Chaos = 3,

    /// Hesiod (HS), an information service developed by MIT's Project Athena.
    #[strum(serialize = "HS")]
    Hesiod = 4,

    /// No class specified, see [rfc2136].
    ///
    /// [rfc2136]: https://datatracker.ietf.org/doc/html/rfc2136
    None = 254,

    /// * (ANY).
    #[strum(serialize = "*")]
    Any = 255,
}

/// Defaults to [`Class::Internet`].
impl Default for Class {
    fn default() -> Self {
        Class::Internet
    }
}

/// Resource Record Type, for example A, PTR or SOA. See [rfc1035] and
/// [DNS Parameters].
///
/// [rfc1035]: https://datatracker.ietf.org/doc/html/rfc1035
/// [DNS Parameters]: https://www.iana.org/assignments/dns-parameters/dns-parameters.xhtml
#[derive(Copy, Clone, Debug, Display, EnumString, PartialEq)]
#[allow(clippy::upper_case_acronyms)]
#[repr(u16)]
pub enum Type {
    Reserved = 0,

    /// IPv4 Address.
    A = 1,
    NS = 2,
    CNAME = 5,
    SOA = 6,

    /// Domain name pointer. See [`util::reverse_zone()`] for the matching
    /// zone apex of a network.
    ///
    /// [`util::reverse_zone()`]: crate::util::reverse_zone()
    PTR = 12,

    /// Mail exchange.
    MX = 15,

    /// Text strings.
    TXT = 16,

    /// IPv6 Address.
    AAAA = 28,

    /// Server Selection.
    SRV = 33,

    /// EDNS(0) Opt type. See [rfc6891].
    ///
    /// [rfc6891]: https://datatracker.ietf.org/doc/html/rfc6891
    OPT = 41,

    /// Any record type. Only valid as a question type.
    ANY = 255,
}

/// Defaults to [`Type::ANY`].
impl Default for Type {
    fn default() -> Self {
        Type::ANY
    }
}
