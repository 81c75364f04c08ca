//! The dynamically-typed tree produced by parsing a querystring.

use std::fmt;

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::de::parse::is_numeric;
use crate::map::Map;

/// Children of a `Mapping` node.
///
/// Slots are optional so that holes survive when a `Sequence` is converted
/// into a `Mapping` (e.g. `a[]=x&a[2]=y&a[b]=z` keeps `"1"` as a hole).
pub type Mapping = Map<String, Option<Node>>;

/// The whole parse result: base key to node.
pub type Tree = Map<String, Node>;

/// A node in the parsed tree.
///
/// - `Scalar`: leaf values, always strings (`a=1`)
/// - `Sequence`: lists built from `a[]=..` or `a[0]=..`; `None` entries are
///   holes left behind by index-driven growth (`a[0]=x&a[2]=y`)
/// - `Mapping`: associative containers built from `a[b]=..`
#[derive(Clone, PartialEq, Eq)]
pub enum Node {
    Scalar(String),
    Sequence(Vec<Option<Node>>),
    Mapping(Mapping),
}

impl Node {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Option<Node>]> {
        match self {
            Node::Sequence(seq) => Some(seq),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Node::Mapping(map) => Some(map),
            _ => None,
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, Node::Scalar(_))
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self, Node::Sequence(_))
    }

    pub fn is_mapping(&self) -> bool {
        matches!(self, Node::Mapping(_))
    }

    /// Looks up a child by its bracket token.
    ///
    /// For a `Mapping` the token is used as the key verbatim. For a
    /// `Sequence` the token must be a decimal index. Holes and missing
    /// children both return `None`.
    pub fn get(&self, token: &str) -> Option<&Node> {
        match self {
            Node::Scalar(_) => None,
            Node::Sequence(seq) if is_numeric(token) => {
                let idx = token.parse::<usize>().ok()?;
                seq.get(idx)?.as_ref()
            }
            Node::Sequence(_) => None,
            Node::Mapping(map) => map.get(token)?.as_ref(),
        }
    }

    /// Follows a path of bracket tokens, e.g. `["b", "0"]` for `a[b][0]`.
    pub fn pointer<'a, I>(&self, path: I) -> Option<&Node>
    where
        I: IntoIterator<Item = &'a str>,
    {
        path.into_iter().try_fold(self, |node, token| node.get(token))
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Node::Scalar(s.to_owned())
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Node::Scalar(s)
    }
}

struct Slot<'a>(&'a Option<Node>);

impl fmt::Debug for Slot<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(node) => node.fmt(f),
            None => f.write_str("Hole"),
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Scalar(s) => write!(f, "{s:?}"),
            Node::Sequence(seq) => f.debug_list().entries(seq.iter().map(Slot)).finish(),
            Node::Mapping(map) => f
                .debug_map()
                .entries(map.iter().map(|(k, v)| (k, Slot(v))))
                .finish(),
        }
    }
}

impl Serialize for Node {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Node::Scalar(s) => serializer.serialize_str(s),
            Node::Sequence(seq) => {
                let mut state = serializer.serialize_seq(Some(seq.len()))?;
                for item in seq {
                    state.serialize_element(item)?;
                }
                state.end()
            }
            Node::Mapping(map) => {
                let mut state = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map {
                    state.serialize_entry(k, v)?;
                }
                state.end()
            }
        }
    }
}
