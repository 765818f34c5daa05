//! autodns is a [PowerDNS pipe backend] that synthesizes answers for forward
//! and reverse zones whose record content is derived algorithmically from IP
//! addresses rather than stored in a zone file.
//!
//! # Features
//! * Reversible address codecs:
//!   * base32-hex (RFC 4648 §7), with optional additive shift and XOR key, and
//!   * EUI-64, mapping IPv6 interface identifiers to `vendor-aa-bb-cc-dd-ee-ff`
//!     labels via the IEEE OUI registry.
//! * An `auto` backend answering A, AAAA, PTR, NS and SOA for configured
//!   CIDR networks, in both directions.
//! * A `geo` backend answering with preconfigured records selected by the
//!   country or continent of the querying resolver (MaxMind database).
//! * The pipe protocol (ABI version 2) over standard input/output.
//!
//! # Usage (library)
//!
//! ```rust
//! use autodns::config::Config;
//! use autodns::pdns::Pdns;
//! use std::io::Cursor;
//!
//! fn main() -> Result<(), autodns::ConfigError> {
//!     let config: Config = serde_yaml::from_str(
//!         r#"
//!         backend:
//!           auto:
//!             - encode:
//!                 base32: {}
//!               dns: [ns1.example.com]
//!               answers:
//!                 "10.0.0.0/8":
//!                   zone: ip.example.com
//!         "#,
//!     )?;
//!     let pdns = Pdns::new(config.backends()?);
//!
//!     let input = b"HELO\t2\nQ\t04.ip.example.com\tIN\tA\t-1\t127.0.0.1\t127.0.0.1\n";
//!     let mut output = Vec::new();
//!     pdns.serve(Cursor::new(&input[..]), &mut output)?;
//!
//!     assert!(output.starts_with(b"OK\tdns-pdns\n"));
//!     Ok(())
//! }
//! ```
//!
//! # Usage (co-process)
//!
//! PowerDNS launches the backend and speaks the line protocol over the pipe:
//!
//! ```text
//! launch=pipe
//! pipe-command=/usr/local/bin/autodns --config /etc/powerdns/autodns.yaml
//! pipe-abi-version=2
//! ```
//!
//! A dialog then looks like:
//!
//! ```text
//! <<< HELO	2
//! >>> OK	dns-pdns
//! <<< Q	04.ip.example.com	IN	A	-1	127.0.0.1	127.0.0.1
//! >>> DATA	04.ip.example.com	IN	A	60	-1	10.0.0.1
//! >>> END
//! ```
//!
//! # Testing
//!
//! ```shell
//! $ cargo test --all
//! ```
//!
//! ## Reference
//!
//! * [PowerDNS pipe backend]
//! * [rfc4648]: The Base16, Base32, and Base64 Data Encodings
//! * [rfc3596]: DNS Extensions to Support IP Version 6
//! * [Guidelines for use of EUI, OUI, and CID](https://standards.ieee.org/wp-content/uploads/import/documents/tutorials/eui.pdf)
//!
//! [PowerDNS pipe backend]: https://doc.powerdns.com/authoritative/backends/pipe.html
//! [rfc4648]: https://datatracker.ietf.org/doc/html/rfc4648
//! [rfc3596]: https://datatracker.ietf.org/doc/html/rfc3596

pub mod backend;
pub mod config;
pub mod encoder;
mod errors;
pub mod pdns;
pub mod types;
pub mod util;

#[macro_use]
extern crate lazy_static;

#[macro_use]
extern crate log;

// Pull up the various types that should be on the front page of the docs.
#[doc(inline)]
pub use crate::types::*;

pub use crate::errors::ConfigError;
pub use crate::errors::ProtocolError;
