use super::record::Soa;
use crate::encoder::{Encoder, Options};
use crate::errors::ConfigError;
use crate::types::{Message, Type};
use crate::util;
use ipnet::IpNet;
use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use std::net::IpAddr;

/// TTL of synthesized A, AAAA and PTR answers.
const ANSWER_TTL: u32 = 60;

/// Synthesizes both directions of the algorithmic forward/reverse mapping:
/// host labels to addresses (A/AAAA) and addresses to host labels (PTR),
/// plus NS and SOA for the reverse zone apexes.
///
/// The backend-level fields are defaults inherited by every answer that
/// does not override them.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AutoBackend {
    /// Ordered codec name to options mapping, tried in file order.
    pub encode: Mapping,
    // TODO Synthesize filler answers for addresses no encoder covers.
    pub filler: bool,
    pub prefix: String,
    pub suffix: String,
    pub soa: Option<Soa>,
    pub dns: Vec<String>,
    /// CIDR string to per-network answer, in file order.
    pub answers: Mapping,

    #[serde(skip)]
    entries: Vec<AutoAnswer>,
    #[serde(skip)]
    encoders: Vec<Encoder>,
}

/// One network's answer configuration, materialized by `check()`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AutoAnswer {
    /// Forward zone apex, required.
    pub zone: String,
    /// Bit length of the network prefix; defaults to the mask's.
    pub size: u8,
    pub encode: Mapping,
    pub filler: bool,
    pub prefix: String,
    pub suffix: String,
    pub soa: Option<Soa>,
    pub dns: Vec<String>,
    pub version: u8,

    #[serde(skip)]
    cidr: String,
    #[serde(skip)]
    network: Option<IpNet>,
    #[serde(skip)]
    network_int: u128,
    #[serde(skip)]
    encoders: Vec<Encoder>,
}

impl AutoAnswer {
    /// Strip `.<zone>`, the required prefix and the required suffix from a
    /// query name, leaving the encoded host label.
    fn host_label<'a>(&self, name: &'a str) -> Option<&'a str> {
        let label = name.strip_suffix(&self.zone)?.strip_suffix('.')?;
        let label = if self.prefix.is_empty() {
            label
        } else {
            label.strip_prefix(self.prefix.as_str())?
        };
        if self.suffix.is_empty() {
            Some(label)
        } else {
            label.strip_suffix(self.suffix.as_str())
        }
    }
}

/// Materialize the codecs named by an `encode` mapping, preserving order.
fn load_encoders(encode: &Mapping) -> Result<Vec<Encoder>, ConfigError> {
    let mut encoders = Vec::new();

    for (name, value) in encode.iter() {
        let name = name
            .as_str()
            .ok_or_else(|| ConfigError::BadEncode(format!("bad encoder key {:?}", name)))?;
        let options = match value {
            Value::Null => Options::new(),
            Value::Mapping(mapping) => {
                let mut options = Options::new();
                for (key, value) in mapping.iter() {
                    let key = key.as_str().ok_or_else(|| {
                        ConfigError::BadEncode(format!("bad option key {:?} for {}", key, name))
                    })?;
                    options.insert(key.to_string(), value.clone());
                }
                options
            }
            _ => {
                return Err(ConfigError::BadEncode(format!(
                    "options for {} are not a mapping",
                    name
                )))
            }
        };
        encoders.push(Encoder::new(name, &options)?);
    }

    Ok(encoders)
}

impl AutoBackend {
    /// Validate the configuration and materialize every answer: parse the
    /// CIDR keys, resolve codecs, and fill unset fields from the backend
    /// defaults.
    pub fn check(&mut self) -> Result<(), ConfigError> {
        if self.dns.is_empty() {
            return Err(ConfigError::NoUpstreams);
        }

        let soa = match self.soa.take() {
            Some(soa) => soa,
            None => Soa {
                source: self.dns[0].clone(),
                ..Soa::default()
            },
        };
        self.soa = Some(soa.clone());

        self.encoders = load_encoders(&self.encode)?;

        let mut entries = Vec::new();
        for (cidr, value) in self.answers.iter() {
            let cidr = cidr
                .as_str()
                .ok_or_else(|| ConfigError::BadEncode(format!("bad answer key {:?}", cidr)))?;

            let mut answer: AutoAnswer = serde_yaml::from_value(value.clone())?;
            let network: IpNet = cidr
                .parse()
                .map_err(|e: ipnet::AddrParseError| ConfigError::BadCidr(cidr.to_string(), e.to_string()))?;

            answer.cidr = cidr.to_string();
            answer.network_int = util::ip_to_u128(&network.network());
            if answer.size == 0 {
                answer.size = network.prefix_len();
            }

            if answer.encode.is_empty() {
                if self.encoders.is_empty() {
                    return Err(ConfigError::NoEncoders(cidr.to_string()));
                }
                debug!("auto: using default encoders for {:?}", cidr);
                answer.encoders = self.encoders.clone();
            } else {
                answer.encoders = load_encoders(&answer.encode)?;
            }

            if answer.zone.is_empty() {
                return Err(ConfigError::NoForwardZone(cidr.to_string()));
            }
            if answer.prefix.is_empty() {
                answer.prefix = self.prefix.clone();
            }
            if answer.suffix.is_empty() {
                answer.suffix = self.suffix.clone();
            }
            if answer.dns.is_empty() {
                answer.dns = self.dns.clone();
            }

            let mut answer_soa = match answer.soa.take() {
                Some(soa) => soa,
                None => soa.clone(),
            };
            if let Some(first) = answer.dns.first() {
                answer_soa.source = first.clone();
            }
            answer.soa = Some(answer_soa);

            answer.network = Some(network);
            debug!(
                "auto: answer for {:?} in zone {:?} ({} encoders)",
                answer.cidr,
                answer.zone,
                answer.encoders.len()
            );
            entries.push(answer);
        }

        self.entries = entries;
        Ok(())
    }

    pub fn query(&self, message: &Message) -> Vec<Message> {
        debug!("auto: query for {} ({})", message.name, message.r#type);

        let mut answers = Vec::new();
        if let Type::ANY | Type::A = message.r#type {
            answers.extend(self.query_a(message));
        }
        if let Type::ANY | Type::AAAA = message.r#type {
            answers.extend(self.query_aaaa(message));
        }
        if let Type::ANY | Type::NS = message.r#type {
            answers.extend(self.query_ns(message));
        }
        if let Type::ANY | Type::PTR = message.r#type {
            answers.extend(self.query_ptr(message));
        }
        if let Type::ANY | Type::SOA = message.r#type {
            answers.extend(self.query_soa(message));
        }
        answers
    }

    /// Decode the query label against every answer and every codec,
    /// yielding all candidate addresses. Decode failures just mean a codec
    /// does not apply.
    fn forward_candidates(&self, name: &str) -> Vec<IpAddr> {
        let mut candidates = Vec::new();

        for answer in &self.entries {
            let network = match &answer.network {
                Some(network) => network,
                None => continue,
            };
            let label = match answer.host_label(name) {
                Some(label) => label,
                None => continue,
            };

            for encoder in &answer.encoders {
                let decoded = match encoder.decode(label) {
                    Ok(decoded) => decoded,
                    Err(_) => continue,
                };
                let value = match util::bytes_to_u128(&decoded) {
                    Some(value) => value,
                    None => continue,
                };
                let n = match answer.network_int.checked_add(value) {
                    Some(n) => n,
                    None => continue,
                };
                let v4 = matches!(network, IpNet::V4(_));
                if let Some(ip) = util::u128_to_ip(n, v4) {
                    debug!("auto: forward {:?} decoded to {}", label, ip);
                    candidates.push(ip);
                }
            }
        }

        candidates
    }

    fn query_a(&self, message: &Message) -> Vec<Message> {
        self.forward_candidates(&message.name)
            .into_iter()
            .filter_map(|ip| match ip {
                IpAddr::V4(v4) => Some(v4),
                IpAddr::V6(v6) if util::is_v4_mapped(&v6) => {
                    let octets = v6.octets();
                    Some(std::net::Ipv4Addr::new(
                        octets[12], octets[13], octets[14], octets[15],
                    ))
                }
                IpAddr::V6(_) => None,
            })
            .map(|v4| Message::answer(message, Type::A, ANSWER_TTL, v4.to_string()))
            .collect()
    }

    fn query_aaaa(&self, message: &Message) -> Vec<Message> {
        self.forward_candidates(&message.name)
            .into_iter()
            .filter_map(|ip| match ip {
                IpAddr::V6(v6) if !util::is_v4_mapped(&v6) => Some(v6),
                _ => None,
            })
            .map(|v6| Message::answer(message, Type::AAAA, ANSWER_TTL, v6.to_string()))
            .collect()
    }

    fn query_ptr(&self, message: &Message) -> Vec<Message> {
        let ip = match util::parse_arpa(&message.name) {
            Some(ip) => ip,
            None => return Vec::new(),
        };
        if ip.is_unspecified() {
            return Vec::new();
        }

        debug!("auto: PTR for {}", ip);
        let mut answers = Vec::new();

        for answer in &self.entries {
            let network = match &answer.network {
                Some(network) => network,
                None => continue,
            };
            if !network.contains(&ip) {
                continue;
            }

            // The caller-side containment check makes the XOR equal to the
            // host part of the address.
            let offset = util::ip_to_u128(&ip) ^ answer.network_int;
            let bytes = util::u128_bytes(offset);

            let mut content = String::new();
            for encoder in &answer.encoders {
                match encoder.encode(&bytes) {
                    Ok(label) if !label.is_empty() => {
                        debug!("auto: encoded {:?} as {:?}", bytes, label);
                        content = label;
                        break;
                    }
                    _ => continue,
                }
            }

            answers.push(Message::answer(
                message,
                Type::PTR,
                ANSWER_TTL,
                format!("{}{}{}.{}", answer.prefix, content, answer.suffix, answer.zone),
            ));
        }

        answers
    }

    fn query_ns(&self, message: &Message) -> Vec<Message> {
        // Only the first answer owning the queried apex contributes.
        for answer in &self.entries {
            let (network, soa) = match (&answer.network, &answer.soa) {
                (Some(network), Some(soa)) => (network, soa),
                _ => continue,
            };
            if util::reverse_zone(network) != message.name {
                continue;
            }
            return answer
                .dns
                .iter()
                .map(|server| Message::answer(message, Type::NS, soa.ttl(), server.clone()))
                .collect();
        }
        Vec::new()
    }

    fn query_soa(&self, message: &Message) -> Vec<Message> {
        for answer in &self.entries {
            let (network, soa) = match (&answer.network, &answer.soa) {
                (Some(network), Some(soa)) => (network, soa),
                _ => continue,
            };
            if util::reverse_zone(network) != message.name {
                continue;
            }
            return vec![Message::answer(
                message,
                Type::SOA,
                soa.ttl(),
                soa.to_string(),
            )];
        }
        Vec::new()
    }
}
