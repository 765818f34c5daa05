use super::{u128_option, CodecError, Options};
use crate::errors::ConfigError;
use crate::util;
use data_encoding::BASE32HEX_NOPAD;

/// Base32 codec using the "extended hex" alphabet of [rfc4648] §7, which
/// preserves sort order. Output is lowercase and unpadded.
///
/// An optional additive `shift` and XOR `xor` key are applied to the value
/// in 128-bit number space, so that encoded labels do not trivially reveal
/// the host part of an address.
///
/// [rfc4648]: https://datatracker.ietf.org/doc/html/rfc4648
#[derive(Clone, Debug, Default)]
pub struct Base32 {
    shift: Option<u128>,
    xor: Option<u128>,
}

impl Base32 {
    pub fn new() -> Base32 {
        Base32::default()
    }

    pub fn configure(options: &Options) -> Result<Base32, ConfigError> {
        let mut encoder = Base32::new();
        for (key, value) in options {
            match key.as_str() {
                "shift" => encoder.shift = Some(u128_option("base32", "shift", value)?),
                "xor" => encoder.xor = Some(u128_option("base32", "xor", value)?),
                _ => return Err(ConfigError::UnknownOption("base32", key.clone())),
            }
        }
        Ok(encoder)
    }

    /// Encode bytes into a lowercase, unpadded base32-hex label. Leading
    /// zero bytes are stripped so short values produce short labels.
    pub fn encode(&self, src: &[u8]) -> Result<String, CodecError> {
        let start = src.iter().position(|&b| b != 0).unwrap_or(src.len());
        let src = &src[start..];

        if self.shift.is_none() && self.xor.is_none() {
            return Ok(BASE32HEX_NOPAD.encode(src).to_lowercase());
        }

        let mut n = util::bytes_to_u128(src).ok_or(CodecError::ValueTooWide)?;
        if let Some(shift) = self.shift {
            n = n.wrapping_add(shift);
        }
        if let Some(xor) = self.xor {
            n ^= xor;
        }
        Ok(BASE32HEX_NOPAD.encode(&util::u128_bytes(n)).to_lowercase())
    }

    /// Decode a label back into its minimal big-endian bytes. The caller
    /// left-pads the result to the address width it expects.
    pub fn decode(&self, src: &str) -> Result<Vec<u8>, CodecError> {
        let decoded = BASE32HEX_NOPAD.decode(src.to_uppercase().as_bytes())?;

        if self.shift.is_none() && self.xor.is_none() {
            return Ok(decoded);
        }

        let mut n = util::bytes_to_u128(&decoded).ok_or(CodecError::ValueTooWide)?;
        if let Some(xor) = self.xor {
            n ^= xor;
        }
        if let Some(shift) = self.shift {
            n = n.wrapping_sub(shift);
        }
        Ok(util::u128_bytes(n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::net::{Ipv4Addr, Ipv6Addr};

    const KEY: u128 = 0xc0ca_c01a_f00d_dead_beef_babe_cafe_d00d;

    fn keyed(xor: u128) -> Base32 {
        Base32 {
            xor: Some(xor),
            ..Base32::default()
        }
    }

    /// Left-pad decoded bytes back to an address width, as the auto backend
    /// does before materializing an address.
    fn pad(mut bytes: Vec<u8>, width: usize) -> Vec<u8> {
        while bytes.len() < width {
            bytes.insert(0, 0);
        }
        bytes
    }

    #[test]
    fn encode_ipv4() {
        let tests = [("127.0.0.1", "fs00008"), ("172.23.42.69", "lgbikh8")];

        let encoder = Base32::new();
        for (addr, want) in &tests {
            let ip: Ipv4Addr = addr.parse().unwrap();
            assert_eq!(&encoder.encode(&ip.octets()).unwrap(), want, "for {}", addr);
        }
    }

    #[test]
    fn encode_ipv6() {
        let tests = [
            ("::1", "04"),
            ("fe80::863a:4bff:fe11:fd1c", "vq000000000011hq9fvvs4ft3g"),
        ];

        let encoder = Base32::new();
        for (addr, want) in &tests {
            let ip: Ipv6Addr = addr.parse().unwrap();
            assert_eq!(&encoder.encode(&ip.octets()).unwrap(), want, "for {}", addr);
        }
    }

    #[test]
    fn decode() {
        let encoder = Base32::new();

        let ip: Ipv6Addr = "fe80::863a:4bff:fe11:fd1c".parse().unwrap();
        assert_eq!(
            pad(encoder.decode("vq000000000011hq9fvvs4ft3g").unwrap(), 16),
            ip.octets().to_vec()
        );

        let ip: Ipv4Addr = "127.0.0.1".parse().unwrap();
        assert_eq!(
            pad(encoder.decode("fs00008").unwrap(), 4),
            ip.octets().to_vec()
        );

        assert!(encoder.decode("not a label!").is_err());
    }

    #[test]
    fn xor_key() {
        let encoder = keyed(KEY);
        let ip: Ipv6Addr = "fe80::863a:4bff:fe11:fd1c".parse().unwrap();

        let label = encoder.encode(&ip.octets()).unwrap();
        assert_eq!(label, "7p5c06ng1nfaqe6lu50j9rpd24");
        assert_eq!(pad(encoder.decode(&label).unwrap(), 16), ip.octets().to_vec());
    }

    #[test]
    fn shift_is_symmetric() {
        let encoder = Base32 {
            shift: Some(1),
            ..Base32::default()
        };

        // 1 shifts to 2 on the wire and back on decode.
        assert_eq!(encoder.encode(&[0, 0, 0, 1]).unwrap(), "08");
        assert_eq!(encoder.decode("08").unwrap(), vec![1]);
    }

    #[test]
    fn zero_value() {
        let encoder = Base32::new();
        assert_eq!(encoder.encode(&[0, 0, 0, 0]).unwrap(), "");
        assert_eq!(encoder.decode("").unwrap(), Vec::<u8>::new());
    }
}
