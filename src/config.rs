use std::borrow::Cow;

use serde::de;

use crate::error::Result;
use crate::value::Tree;

const DEFAULT_SEPARATORS: &[char] = &['&', ';'];

/// Configuration for parsing behavior.
///
/// The `Config` struct is passed explicitly at the call boundary; there is
/// no global default that can be mutated.
///
/// ## Separators
///
/// The characters that split the querystring into `key=value` pairs.
/// Defaults to `&` and `;`. Setting an empty list restores the default.
///
/// ## Strict decoding
///
/// By default, malformed percent-escapes such as `%ZZ` are kept literally
/// and decoding never fails. With `strict_decode(true)` the whole parse
/// fails on the first malformed escape, reporting whether the key or the
/// value was at fault.
///
/// ```
/// use php_qs::Config;
///
/// let lenient = Config::new();
/// let tree = lenient.parse_str("bad=%ZZ").unwrap();
/// assert_eq!(tree["bad"].as_str(), Some("%ZZ"));
///
/// let strict = Config::new().strict_decode(true);
/// assert!(strict.parse_str("bad=%ZZ").is_err());
///
/// let piped = Config::new().separators(&['|']);
/// let tree = piped.parse_str("a=1|b=2").unwrap();
/// assert_eq!(tree["b"].as_str(), Some("2"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    separators: Cow<'static, [char]>,
    strict_decode: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub const fn new() -> Self {
        Self {
            separators: Cow::Borrowed(DEFAULT_SEPARATORS),
            strict_decode: false,
        }
    }

    /// Specifies the characters that separate pairs. Default is `&` and `;`.
    pub fn separators(mut self, separators: &[char]) -> Self {
        self.separators = if separators.is_empty() {
            Cow::Borrowed(DEFAULT_SEPARATORS)
        } else {
            Cow::Owned(separators.to_vec())
        };
        self
    }

    /// Fail on malformed percent-escapes and invalid UTF-8 instead of
    /// keeping them literally. Default is `false`.
    pub const fn strict_decode(mut self, strict_decode: bool) -> Self {
        self.strict_decode = strict_decode;
        self
    }

    pub(crate) fn separator_chars(&self) -> &[char] {
        &self.separators
    }

    pub(crate) fn is_strict(&self) -> bool {
        self.strict_decode
    }

    /// Parses a querystring into a `Tree` using this `Config`.
    pub fn parse_str(&self, input: &str) -> Result<Tree> {
        crate::de::parse::parse(input, self)
    }

    /// Parses a querystring and deserializes the resulting tree into `T`
    /// using this `Config`.
    pub fn deserialize_str<T: de::DeserializeOwned>(&self, input: &str) -> Result<T> {
        let tree = self.parse_str(input)?;
        T::deserialize(crate::Deserializer::new(tree))
    }
}
