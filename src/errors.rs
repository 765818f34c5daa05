use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading and checking the configuration. All of these
/// are fatal: the process refuses to start serving.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid network {0:?}: {1}")]
    BadCidr(String, String),

    #[error("no encoders for network {0:?} and no default")]
    NoEncoders(String),

    #[error("no forward zone for network {0:?}")]
    NoForwardZone(String),

    #[error("no upstream dns servers configured")]
    NoUpstreams,

    #[error("no encoder with name {0:?} found")]
    UnknownEncoder(String),

    #[error("unknown option {1:?} for encoder {0:?}")]
    UnknownOption(&'static str, String),

    #[error("bad value for option {1:?} of encoder {0:?}: {2}")]
    BadOption(&'static str, &'static str, String),

    #[error("malformed encode section: {0}")]
    BadEncode(String),

    #[error("unknown class {0:?}")]
    UnknownClass(String),

    #[error("unknown type {0:?}")]
    UnknownType(String),

    #[error("error reading GeoIP database {0:?}: {1}")]
    BadGeoDatabase(PathBuf, #[source] maxminddb::MaxMindDBError),

    #[error("no backends configured")]
    NoBackends,

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

/// Errors on the request side of the pipe. These are answered with a `FAIL`
/// line and never terminate the process.
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("bad request line")]
    BadRequest,

    #[error("bad query class {0:?}")]
    UnknownClass(String),

    #[error("bad query type {0:?}")]
    UnknownType(String),

    #[error("request line too long")]
    LineTooLong,
}
