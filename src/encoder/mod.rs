//! Reversible codecs between host labels and address bytes.
//!
//! A codec turns the host part of an address into a DNS label and back,
//! byte-exactly. Decoded bytes are minimal big-endian values; the caller is
//! responsible for re-padding them to the address width it expects.

mod base32;
mod eui64;
pub mod oui;

pub use self::base32::Base32;
pub use self::eui64::Eui64;

use crate::errors::ConfigError;
use serde_yaml::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// Per-codec configuration, as it appears under a codec's name in the
/// `encode` section: a free-form key/value map each codec narrows itself.
pub type Options = BTreeMap<String, Value>;

/// Error from a single codec application. A failed `decode` merely means the
/// codec does not apply to the label at hand; callers try the next one.
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("not an EUI-64 interface identifier")]
    NotEui64,

    #[error("no encoded hardware address in {0:?}")]
    BadLabel(String),

    #[error(transparent)]
    Base32(#[from] data_encoding::DecodeError),

    #[error("value does not fit in 128 bits")]
    ValueTooWide,
}

/// A configured codec. Stateless once constructed, and freely shareable.
#[derive(Clone, Debug)]
pub enum Encoder {
    Base32(Base32),
    Eui64(Eui64),
}

impl Encoder {
    /// Look up a codec by registry name and configure it. Unknown names and
    /// unknown option keys are configuration errors.
    ///
    /// `eui64+base32` is the EUI-64 codec with a base32 fallback for labels
    /// and addresses that carry no hardware address; its options are routed
    /// to whichever of the two codecs owns them.
    pub fn new(name: &str, options: &Options) -> Result<Encoder, ConfigError> {
        match name {
            "base32" => Ok(Encoder::Base32(Base32::configure(options)?)),
            "eui64" => Ok(Encoder::Eui64(Eui64::configure(options, None)?)),
            "eui64+base32" => {
                let mut base32 = Options::new();
                let mut eui64 = Options::new();
                for (key, value) in options {
                    match key.as_str() {
                        "shift" | "xor" => {
                            base32.insert(key.clone(), value.clone());
                        }
                        "oui" => {
                            eui64.insert(key.clone(), value.clone());
                        }
                        _ => return Err(ConfigError::UnknownOption("eui64+base32", key.clone())),
                    }
                }
                let fallback = Base32::configure(&base32)?;
                Ok(Encoder::Eui64(Eui64::configure(&eui64, Some(fallback))?))
            }
            _ => Err(ConfigError::UnknownEncoder(name.to_string())),
        }
    }

    pub fn encode(&self, src: &[u8]) -> Result<String, CodecError> {
        match self {
            Encoder::Base32(e) => e.encode(src),
            Encoder::Eui64(e) => e.encode(src),
        }
    }

    pub fn decode(&self, src: &str) -> Result<Vec<u8>, CodecError> {
        match self {
            Encoder::Base32(e) => e.decode(src),
            Encoder::Eui64(e) => e.decode(src),
        }
    }
}

/// Narrow a YAML option to an unsigned 128-bit value. Accepts integers,
/// `0x`-prefixed hex strings, decimal strings, and raw byte strings taken
/// as a big-endian value.
pub(crate) fn u128_option(
    codec: &'static str,
    key: &'static str,
    value: &Value,
) -> Result<u128, ConfigError> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .map(u128::from)
            .ok_or_else(|| ConfigError::BadOption(codec, key, "expected an unsigned integer".to_string())),
        Value::String(s) => {
            if let Some(hex) = s.strip_prefix("0x") {
                u128::from_str_radix(hex, 16)
                    .map_err(|e| ConfigError::BadOption(codec, key, e.to_string()))
            } else if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
                s.parse::<u128>()
                    .map_err(|e| ConfigError::BadOption(codec, key, e.to_string()))
            } else {
                let bytes = s.as_bytes();
                if bytes.len() > 16 {
                    return Err(ConfigError::BadOption(
                        codec,
                        key,
                        "byte string wider than 128 bits".to_string(),
                    ));
                }
                Ok(bytes.iter().fold(0u128, |n, &b| (n << 8) | u128::from(b)))
            }
        }
        _ => Err(ConfigError::BadOption(
            codec,
            key,
            "expected an integer or a string".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(yaml: &str) -> Options {
        serde_yaml::from_str(yaml).expect("options yaml")
    }

    #[test]
    fn registry() {
        assert!(matches!(
            Encoder::new("base32", &Options::new()),
            Ok(Encoder::Base32(_))
        ));
        assert!(matches!(
            Encoder::new("eui64", &Options::new()),
            Ok(Encoder::Eui64(_))
        ));
        assert!(matches!(
            Encoder::new("eui64+base32", &Options::new()),
            Ok(Encoder::Eui64(_))
        ));
        assert!(matches!(
            Encoder::new("rot13", &Options::new()),
            Err(ConfigError::UnknownEncoder(_))
        ));
    }

    #[test]
    fn unknown_options_fail() {
        assert!(matches!(
            Encoder::new("base32", &options("{rot: 13}")),
            Err(ConfigError::UnknownOption("base32", _))
        ));
        assert!(matches!(
            Encoder::new("eui64", &options("{shift: 1}")),
            Err(ConfigError::UnknownOption("eui64", _))
        ));
        assert!(matches!(
            Encoder::new("eui64+base32", &options("{filler: yes}")),
            Err(ConfigError::UnknownOption("eui64+base32", _))
        ));
    }

    #[test]
    fn u128_option_shapes() {
        let opt = |yaml| serde_yaml::from_str::<Value>(yaml).unwrap();

        assert_eq!(u128_option("base32", "shift", &opt("256")).unwrap(), 256);
        assert_eq!(
            u128_option("base32", "xor", &opt("\"0xc0cac01af00ddeadbeefbabecafed00d\"")).unwrap(),
            0xc0ca_c01a_f00d_dead_beef_babe_cafe_d00d
        );
        assert_eq!(u128_option("base32", "shift", &opt("\"42\"")).unwrap(), 42);
        assert_eq!(
            u128_option("base32", "xor", &opt("\"AB\"")).unwrap(),
            0x4142
        );
        assert!(u128_option("base32", "shift", &opt("[1, 2]")).is_err());
        assert!(u128_option("base32", "shift", &opt("-3")).is_err());
    }
}
