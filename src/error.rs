use std::fmt::{self, Display};

use serde::de;

/// Which half of a `key=value` pair failed to decode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecodePart {
    Key,
    Value,
}

impl Display for DecodePart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodePart::Key => f.write_str("key"),
            DecodePart::Value => f.write_str("value"),
        }
    }
}

/// Errors that can occur while parsing or deserializing a querystring.
///
/// Building the tree itself never fails. Errors only come from strict
/// percent-decoding (see [`Config::strict_decode`](crate::Config::strict_decode))
/// or from deserializing the tree into a typed value.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Custom error message, usually produced by a `Deserialize` impl.
    #[error("{0}")]
    Custom(String),

    /// A malformed `%XX` escape was found while strict decoding was enabled.
    #[error("decode {part} error: invalid percent-escape at byte {position}")]
    Decode { part: DecodePart, position: usize },

    /// The decoded bytes of a key or value were not valid UTF-8.
    #[error("decode {part} error: {source}")]
    Utf8 {
        part: DecodePart,
        #[source]
        source: std::str::Utf8Error,
    },

    /// The tree shape cannot be represented by the requested type.
    #[error("unsupported: {0}")]
    Unsupported(&'static str),
}

impl Error {
    /// Generate error to show top-level type cannot be deserialized.
    pub fn top_level(object: &'static str) -> Self {
        Error::Custom(format!(
            "cannot deserialize {object} at the top level. Try deserializing into a struct or map."
        ))
    }

    /// The part of the pair which failed to decode, if this is a decode error.
    pub fn decode_part(&self) -> Option<DecodePart> {
        match self {
            Error::Decode { part, .. } | Error::Utf8 { part, .. } => Some(*part),
            _ => None,
        }
    }
}

impl de::Error for Error {
    fn custom<T>(msg: T) -> Self
    where
        T: Display,
    {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T, E = Error> = core::result::Result<T, E>;
