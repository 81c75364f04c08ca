//! PHP `parse_str` compatible querystring parsing
//!
//! Querystrings are not formally defined and loosely take the form of
//! _nested_ urlencoded queries. This crate reproduces the bracket-key
//! semantics of PHP's [`parse_str`](https://www.php.net/manual/en/function.parse-str.php),
//! so systems that ingest form or query data recover the same nested
//! arrays and maps a PHP backend would have seen.
//!
//! ## The tree
//!
//! Parsing produces a [`Tree`]: a map from base key to [`Node`], where a
//! node is a string [`Node::Scalar`], a [`Node::Sequence`] of optional
//! nodes (`None` marks a hole left by `a[0]=x&a[2]=y`), or a
//! [`Node::Mapping`]. Leaves are always strings; no numeric coercion is
//! done while parsing.
//!
//! ```
//! use php_qs::Node;
//!
//! let tree = php_qs::parse_str("a[]=x&a[2]=y&b[c][d]=1&flag").unwrap();
//!
//! let a = tree["a"].as_sequence().unwrap();
//! assert_eq!(a, &[Some(Node::from("x")), None, Some(Node::from("y"))]);
//! assert_eq!(tree["b"].pointer(["c", "d"]).and_then(Node::as_str), Some("1"));
//! assert_eq!(tree["flag"].as_str(), Some(""));
//! ```
//!
//! ## Bracket rules
//!
//! - `a=1&a=2`: plain keys are last-write-wins.
//! - `a[]=1&a[]=2`: the empty token appends.
//! - `a[0]=1&a[2]=2`: numeric tokens index a sequence, leaving holes.
//! - `a[b][c]=1`: other tokens are map keys.
//! - `a=1&a[]=2`: a scalar base becomes the first element of a sequence.
//! - `a[]=1&a[k]=2`: a sequence hit by a map key becomes a map keyed
//!   `"0"`, `"1"`, ... A map never turns back into a sequence; further
//!   `a[]` pairs use the next free numeric key.
//! - `p[q=1` gives `p_q`, `b]=1` keeps `b]`, and `a[b]]=1` drops the extra
//!   bracket.
//!
//! ## Typed deserialization
//!
//! The tree can also be fed to `serde`, parsing leaf strings into the
//! types asked for:
//!
//! ```
//! use serde::Deserialize;
//!
//! #[derive(Debug, PartialEq, Deserialize)]
//! struct Address {
//!     city: String,
//!     postcode: String,
//! }
//!
//! #[derive(Debug, PartialEq, Deserialize)]
//! struct QueryParams {
//!     id: u8,
//!     name: String,
//!     address: Address,
//!     user_ids: Vec<u8>,
//! }
//!
//! let params: QueryParams = php_qs::from_str(
//!     "name=Acme&id=42&address[postcode]=12345&\
//!      address[city]=Carrot+City&user_ids[]=1&user_ids[]=2",
//! )
//! .unwrap();
//! assert_eq!(params.address.city, "Carrot City");
//! assert_eq!(params.user_ids, vec![1, 2]);
//! ```

mod config;
mod de;
mod error;
pub mod map;
mod value;

pub use config::Config;
#[doc(inline)]
pub use de::parse::{BracketKey, is_numeric, tokenize};
#[doc(inline)]
pub use de::{Deserializer, from_str};
pub use error::{DecodePart, Error, Result};
pub use value::{Mapping, Node, Tree};

/// Parses a querystring into a [`Tree`] using the default [`Config`].
///
/// The default configuration decodes leniently, so this only fails when
/// called through a strict `Config` (see [`Config::parse_str`]).
pub fn parse_str(input: &str) -> Result<Tree> {
    Config::default().parse_str(input)
}

/// Applies one already-decoded `key=value` pair to `tree`.
///
/// This is the building block behind [`parse_str`]: the key is tokenized
/// and the value inserted following the same rules. It never fails.
///
/// ```
/// let mut tree = php_qs::Tree::default();
/// php_qs::insert(&mut tree, "a[]", "1");
/// php_qs::insert(&mut tree, "a[]", "2");
/// assert_eq!(tree["a"].as_sequence().map(|s| s.len()), Some(2));
/// ```
pub fn insert(tree: &mut Tree, key: &str, value: impl Into<String>) {
    de::parse::insert_pair(tree, tokenize(key), value.into());
}
