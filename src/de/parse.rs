use tracing::trace;

use crate::config::Config;
use crate::error::{DecodePart, Result};
use crate::value::Tree;

mod decode;
mod insert;
mod key;

pub use insert::insert as insert_pair;
pub use key::{BracketKey, is_numeric, tokenize};

/// Parses a raw querystring into a fresh `Tree`.
///
/// Either every pair is applied, or the first decode error (strict mode
/// only) is returned and the partial tree is discarded.
pub fn parse(input: &str, config: &Config) -> Result<Tree> {
    let mut output = Tree::default();
    Parser::new(input, config).parse(&mut output)?;
    Ok(output)
}

/// The `Parser` walks the separator-delimited segments of a querystring.
///
/// Each segment is split on its first `=`, both halves are decoded and
/// trimmed, the key is tokenized, and the pair is handed to the tree
/// builder in input order.
struct Parser<'qs> {
    inner: &'qs str,
    config: &'qs Config,
}

impl<'qs> Parser<'qs> {
    fn new(input: &'qs str, config: &'qs Config) -> Self {
        Parser {
            inner: input.strip_prefix('?').unwrap_or(input),
            config,
        }
    }

    fn parse(&self, root: &mut Tree) -> Result<()> {
        if self.inner.is_empty() {
            // empty string -- nothing to parse
            return Ok(());
        }
        let strict = self.config.is_strict();

        for segment in self.inner.split(self.config.separator_chars()) {
            if segment.is_empty() {
                // doubled, leading or trailing separator
                continue;
            }

            // a key without `=` has an empty value
            let (key, value) = segment.split_once('=').unwrap_or((segment, ""));

            let key = decode::decode(key, DecodePart::Key, strict)?;
            let value = decode::decode(value, DecodePart::Value, strict)?;

            let key = key.trim();
            if key.is_empty() {
                trace!(segment, "skipping pair with empty key");
                continue;
            }

            insert::insert(root, tokenize(key), value.trim().to_owned());
        }
        Ok(())
    }
}
