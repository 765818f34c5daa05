use super::base32::Base32;
use super::oui;
use super::{CodecError, Options};
use crate::errors::ConfigError;
use byteorder::{ByteOrder, BE};
use std::collections::HashMap;
use std::path::Path;

/// The universal/local bit of an OUI, at its position within the upper 24
/// bits of the interface identifier. A modified EUI-64 has it flipped.
const UL_BIT: u64 = 0x020000;

/// Mask of the `ff:fe` gap a MAC-48 grows when it becomes an EUI-64.
const EUI64_GAP: u64 = 0x0000_00ff_fe00_0000;

/// Codec between modified EUI-64 interface identifiers and hardware-address
/// labels of the form `vendor-00-16-3e-83-f1-11`.
///
/// The vendor prefix is looked up in an IEEE OUI registry file configured
/// with the `oui` option; without a table every label reads `unknown-…`.
/// Input that carries no EUI-64 identifier is handed to the fallback codec
/// when one is configured.
#[derive(Clone, Debug, Default)]
pub struct Eui64 {
    vendors: HashMap<String, String>,
    fallback: Option<Base32>,
}

impl Eui64 {
    pub fn new() -> Eui64 {
        Eui64::default()
    }

    pub fn configure(options: &Options, fallback: Option<Base32>) -> Result<Eui64, ConfigError> {
        let mut encoder = Eui64 {
            vendors: HashMap::new(),
            fallback,
        };
        for (key, value) in options {
            match key.as_str() {
                "oui" => {
                    let path = value.as_str().ok_or_else(|| {
                        ConfigError::BadOption("eui64", "oui", "expected a file path".to_string())
                    })?;
                    encoder.vendors = oui::parse_file(Path::new(path))
                        .map_err(|e| ConfigError::BadOption("eui64", "oui", e.to_string()))?;
                }
                _ => return Err(ConfigError::UnknownOption("eui64", key.clone())),
            }
        }
        Ok(encoder)
    }

    /// Vendor slug for a six-hex-character lowercased OUI, `"unknown"` when
    /// the table has no entry.
    pub fn vendor(&self, oui: &str) -> &str {
        match self.vendors.get(oui) {
            Some(vendor) => vendor.as_str(),
            None => "unknown",
        }
    }

    /// Encode the low 64 bits of an address. Anything that is not a modified
    /// EUI-64 identifier is delegated to the fallback codec, or fails.
    pub fn encode(&self, src: &[u8]) -> Result<String, CodecError> {
        if src.len() < 8 {
            return self.encode_fallback(src);
        }

        let n = BE::read_u64(&src[src.len() - 8..]);
        if n & EUI64_GAP == 0 {
            return self.encode_fallback(src);
        }

        let ih = (n >> 40) ^ UL_BIT;
        let il = n & 0x00ff_ffff;
        let oui = format!("{:06x}", ih);

        Ok(format!(
            "{}-{:02x}-{:02x}-{:02x}-{:02x}-{:02x}-{:02x}",
            self.vendor(&oui),
            (ih >> 16) & 0xff,
            (ih >> 8) & 0xff,
            ih & 0xff,
            (il >> 16) & 0xff,
            (il >> 8) & 0xff,
            il & 0xff,
        ))
    }

    /// Decode a hardware-address label back into a 16-byte address whose
    /// trailing 8 bytes carry the interface identifier. The vendor prefix,
    /// if any, is ignored: only the last six tokens count.
    pub fn decode(&self, src: &str) -> Result<Vec<u8>, CodecError> {
        let tokens: Vec<&str> = src.split('-').collect();
        if tokens.len() < 6 {
            return self.decode_fallback(src);
        }

        let mut n: u64 = 0;
        for token in &tokens[tokens.len() - 6..] {
            match u8::from_str_radix(token, 16) {
                Ok(byte) => n = (n << 8) | u64::from(byte),
                Err(_) => return self.decode_fallback(src),
            }
        }

        let ih = (n >> 24) ^ UL_BIT;
        let il = n & 0x00ff_ffff;

        let mut ip = vec![0u8; 16];
        ip[8] = (ih >> 16) as u8;
        ip[9] = (ih >> 8) as u8;
        ip[10] = ih as u8;
        ip[11] = 0xff;
        ip[12] = 0xfe;
        ip[13] = (il >> 16) as u8;
        ip[14] = (il >> 8) as u8;
        ip[15] = il as u8;
        Ok(ip)
    }

    fn encode_fallback(&self, src: &[u8]) -> Result<String, CodecError> {
        match &self.fallback {
            Some(fallback) => fallback.encode(src),
            None => Err(CodecError::NotEui64),
        }
    }

    fn decode_fallback(&self, src: &str) -> Result<Vec<u8>, CodecError> {
        match &self.fallback {
            Some(fallback) => fallback.decode(src),
            None => Err(CodecError::BadLabel(src.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::net::Ipv6Addr;

    const OUI_FILE: &str = "testdata/oui.txt";

    fn with_table() -> Eui64 {
        Eui64 {
            vendors: oui::parse_file(Path::new(OUI_FILE)).expect("oui table"),
            fallback: None,
        }
    }

    fn octets(addr: &str) -> [u8; 16] {
        addr.parse::<Ipv6Addr>().unwrap().octets()
    }

    #[test]
    fn encode() {
        let tests = [
            ("fe80::216:3eff:fe83:f111", "00-16-3e-83-f1-11"),
            ("fe80::5074:f2ff:feb1:a87f", "52-74-f2-b1-a8-7f"),
            ("fe80::608b:ccff:fe6b:82a9", "62-8b-cc-6b-82-a9"),
        ];

        let encoder = with_table();
        for (addr, want) in &tests {
            let label = encoder.encode(&octets(addr)).unwrap();
            assert!(label.ends_with(want), "got {:?} for {}", label, addr);
        }

        // The table knows XenSource's OUI.
        assert_eq!(
            encoder.encode(&octets("fe80::216:3eff:fe83:f111")).unwrap(),
            "xensource-00-16-3e-83-f1-11"
        );
    }

    #[test]
    fn encode_without_table() {
        let encoder = Eui64::new();
        assert_eq!(
            encoder.encode(&octets("fe80::216:3eff:fe83:f111")).unwrap(),
            "unknown-00-16-3e-83-f1-11"
        );
    }

    #[test]
    fn encode_rejects_non_eui64() {
        let encoder = Eui64::new();
        assert!(matches!(
            encoder.encode(&octets("::1")),
            Err(CodecError::NotEui64)
        ));
        assert!(matches!(encoder.encode(&[1, 2, 3]), Err(CodecError::NotEui64)));
    }

    #[test]
    fn encode_fallback() {
        let encoder = Eui64 {
            vendors: HashMap::new(),
            fallback: Some(Base32::new()),
        };
        assert_eq!(encoder.encode(&octets("::1")).unwrap(), "04");
    }

    #[test]
    fn decode() {
        let tests = [
            ("00-16-3e-83-f1-11", "::216:3eff:fe83:f111"),
            ("52-74-f2-b1-a8-7f", "::5074:f2ff:feb1:a87f"),
            ("xensource-00-16-3e-83-f1-11", "::216:3eff:fe83:f111"),
        ];

        let encoder = Eui64::new();
        for (label, want) in &tests {
            assert_eq!(
                encoder.decode(label).unwrap(),
                octets(want).to_vec(),
                "for {}",
                label
            );
        }
    }

    #[test]
    fn decode_rejects_bad_labels() {
        let encoder = Eui64::new();
        assert!(encoder.decode("").is_err());
        assert!(encoder.decode("00-16-3e").is_err());
        assert!(encoder.decode("00-16-3e-83-f1-zz").is_err());
        assert!(encoder.decode("300-16-3e-83-f1-11").is_err());
    }

    #[test]
    fn decode_fallback() {
        let encoder = Eui64 {
            vendors: HashMap::new(),
            fallback: Some(Base32::new()),
        };
        assert_eq!(encoder.decode("04").unwrap(), vec![1]);
    }

    #[test]
    fn round_trip() {
        let encoder = Eui64::new();
        let ip = octets("fe80::216:3eff:fe83:f111");

        let decoded = encoder.decode(&encoder.encode(&ip).unwrap()).unwrap();
        assert_eq!(decoded[8..], ip[8..]);
    }

    #[test]
    fn vendors() {
        let tests = [
            ("00003b", "i-controls"),
            ("00003c", "auspex"),
            ("00163e", "xensource"),
            ("002342", "coffee-equipment"),
            ("ffffff", "unknown"),
        ];

        let encoder = with_table();
        for (oui, want) in &tests {
            assert_eq!(&encoder.vendor(oui), want, "for {}", oui);
        }
    }
}
