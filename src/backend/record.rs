use crate::errors::ConfigError;
use crate::types::{Class, Message, Type};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// A preconfigured resource record as it appears in the configuration file.
/// Class and type are textual and validated against the registry during
/// `check()`; the class defaults to `IN`.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Record {
    pub class: String,
    pub r#type: String,
    pub ttl: u32,
    pub content: String,
}

impl Record {
    /// Build the answer skeleton for this record. The name and id are
    /// filled in from the query by the caller. Fails when the class or type
    /// name is not in the registry.
    pub fn to_message(&self) -> Result<Message, ConfigError> {
        let class = Class::from_str(&self.class)
            .map_err(|_| ConfigError::UnknownClass(self.class.clone()))?;
        let r#type =
            Type::from_str(&self.r#type).map_err(|_| ConfigError::UnknownType(self.r#type.clone()))?;

        Ok(Message {
            class,
            r#type,
            ttl: self.ttl,
            content: self.content.clone(),
            ..Message::default()
        })
    }
}

/// SOA template for synthesized zones. Fields left at zero or empty fall
/// back to the process-wide default when the record is rendered.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Soa {
    pub source: String,
    pub contact: String,
    pub serial: u64,
    pub refresh: u32,
    pub retry: u32,
    pub expire: u32,
    pub ttl: u32,
}

lazy_static! {
    static ref DEFAULT: Soa = Soa {
        source: "localhost".to_string(),
        contact: "hostmaster.localhost".to_string(),
        serial: 1,
        refresh: 3600,
        retry: 600,
        expire: 86400,
        ttl: 3600,
    };
}

impl Soa {
    /// TTL used for synthesized NS and SOA answers.
    pub fn ttl(&self) -> u32 {
        pick_u32(self.ttl, DEFAULT.ttl)
    }
}

/// Renders the SOA rdata in pipe form, e.g.
/// `ns1.example.com. hostmaster.example.com. 1 3600 600 86400 3600`.
impl fmt::Display for Soa {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let source = pick_str(&self.source, &DEFAULT.source);
        let contact = pick_str(&self.contact, &DEFAULT.contact).replacen('@', ".", 1);

        write!(
            f,
            "{source}. {contact}. {serial} {refresh} {retry} {expire} {ttl}",
            source = source.trim_end_matches('.'),
            contact = contact.trim_end_matches('.'),
            serial = pick_u64(self.serial, DEFAULT.serial),
            refresh = pick_u32(self.refresh, DEFAULT.refresh),
            retry = pick_u32(self.retry, DEFAULT.retry),
            expire = pick_u32(self.expire, DEFAULT.expire),
            ttl = pick_u32(self.ttl, DEFAULT.ttl),
        )
    }
}

fn pick_u32(a: u32, b: u32) -> u32 {
    if a > 0 {
        a
    } else {
        b
    }
}

fn pick_u64(a: u64, b: u64) -> u64 {
    if a > 0 {
        a
    } else {
        b
    }
}

fn pick_str<'a>(a: &'a str, b: &'a str) -> &'a str {
    if a.is_empty() {
        b
    } else {
        a
    }
}
