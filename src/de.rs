//! Deserialization of a parsed querystring into typed values.
//!
//! ### An overview of the design
//!
//! Parsing happens in two steps. The `parse` module turns the querystring
//! into a [`Tree`](crate::Tree): every pair is decoded, its key is split
//! into a base name and bracket tokens, and the value is inserted into the
//! tree following PHP's `parse_str` rules.
//!
//! From here, [`Deserializer`] drives any `serde::Deserialize` type over
//! the tree. The top level is always a map. Each child is handed to a
//! `NodeDeserializer`, which visits sequences and mappings recursively and
//! hands leaf strings to `StringParsingDeserializer`, which parses them
//! into the primitive the visitor asks for.
//!
//! Holes left in sequences (`a[0]=x&a[2]=y`) deserialize as `None`, so a
//! sparse list can be read into `Vec<Option<T>>`.

pub(crate) mod parse;
mod string_parser;

use serde::de::{
    self, Deserializer as _, IntoDeserializer,
    value::{MapAccessDeserializer, MapDeserializer, SeqDeserializer},
};

use crate::error::{Error, Result};
use crate::value::{Mapping, Node, Tree};

use string_parser::StringParsingDeserializer;

/// Deserializes a querystring from a `&str` using the default `Config`.
///
/// ```
/// use serde::Deserialize;
///
/// #[derive(Debug, Deserialize, PartialEq)]
/// struct Query {
///     name: String,
///     age: u8,
///     tags: Vec<String>,
/// }
///
/// let q: Query = php_qs::from_str("name=Alice&age=24&tags[]=a&tags[]=b").unwrap();
/// assert_eq!(
///     q,
///     Query {
///         name: "Alice".to_owned(),
///         age: 24,
///         tags: vec!["a".to_owned(), "b".to_owned()],
///     }
/// );
/// ```
pub fn from_str<T: de::DeserializeOwned>(input: &str) -> Result<T> {
    crate::Config::default().deserialize_str(input)
}

/// A deserializer over a parsed `Tree`.
///
/// Supported top-level outputs are structs, maps and enums (a single key
/// naming the variant).
pub struct Deserializer {
    root: Mapping,
}

impl Deserializer {
    pub fn new(tree: Tree) -> Self {
        Deserializer {
            root: tree.into_iter().map(|(k, v)| (k, Some(v))).collect(),
        }
    }
}

fn map_access<'de>(map: Mapping) -> impl de::MapAccess<'de, Error = Error> {
    MapDeserializer::<_, Error>::new(
        map.into_iter()
            .map(|(k, v)| (StringParsingDeserializer::<Error>::new(k), NodeDeserializer(v))),
    )
}

impl<'de> de::Deserializer<'de> for Deserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_map(map_access(self.root))
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_some(self)
    }

    fn deserialize_enum<V>(
        self,
        name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        NodeDeserializer(Some(Node::Mapping(self.root))).deserialize_enum(name, variants, visitor)
    }

    fn deserialize_seq<V>(self, _visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(Error::top_level("sequence"))
    }

    fn deserialize_tuple<V>(self, _len: usize, _visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(Error::top_level("tuple"))
    }

    serde::forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct tuple_struct map struct identifier
        ignored_any
    }
}

/// Deserializes one slot of the tree; `None` is a hole.
struct NodeDeserializer(Option<Node>);

impl<'de> IntoDeserializer<'de, Error> for NodeDeserializer {
    type Deserializer = Self;

    fn into_deserializer(self) -> Self {
        self
    }
}

macro_rules! deserialize_leaf {
    ($($method:ident)*) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value>
            where
                V: de::Visitor<'de>,
            {
                match self.0 {
                    Some(Node::Scalar(s)) => StringParsingDeserializer::<Error>::new(s).$method(visitor),
                    other => NodeDeserializer(other).deserialize_any(visitor),
                }
            }
        )*
    };
}

impl<'de> de::Deserializer<'de> for NodeDeserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.0 {
            None => visitor.visit_unit(),
            Some(Node::Scalar(s)) => visitor.visit_string(s),
            Some(Node::Sequence(seq)) => {
                let mut access =
                    SeqDeserializer::<_, Error>::new(seq.into_iter().map(NodeDeserializer));
                let value = visitor.visit_seq(&mut access)?;
                access.end()?;
                Ok(value)
            }
            Some(Node::Mapping(map)) => visitor.visit_map(map_access(map)),
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.0 {
            None => visitor.visit_none(),
            Some(Node::Scalar(s)) => StringParsingDeserializer::<Error>::new(s).deserialize_option(visitor),
            some => visitor.visit_some(NodeDeserializer(some)),
        }
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    /// Enums are either a bare string (`kind=Small`) or a mapping with a
    /// single key naming the variant (`kind[Sized]=12`).
    fn deserialize_enum<V>(
        self,
        name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.0 {
            Some(Node::Scalar(s)) => {
                StringParsingDeserializer::<Error>::new(s).deserialize_enum(name, variants, visitor)
            }
            Some(Node::Mapping(map)) if map.len() == 1 => {
                visitor.visit_enum(MapAccessDeserializer::new(map_access(map)))
            }
            Some(Node::Mapping(_)) => Err(Error::Unsupported(
                "an enum must be a single key naming the variant",
            )),
            Some(Node::Sequence(_)) => Err(Error::Unsupported("an enum cannot be a sequence")),
            None => Err(de::Error::invalid_type(de::Unexpected::Unit, &visitor)),
        }
    }

    deserialize_leaf! {
        deserialize_bool deserialize_i8 deserialize_i16 deserialize_i32
        deserialize_i64 deserialize_i128 deserialize_u8 deserialize_u16
        deserialize_u32 deserialize_u64 deserialize_u128 deserialize_f32
        deserialize_f64 deserialize_char deserialize_unit
    }

    serde::forward_to_deserialize_any! {
        str string bytes byte_buf unit_struct seq tuple tuple_struct map
        struct identifier ignored_any
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;
    use serde::Deserialize;

    use crate::{Config, from_str};

    #[derive(Debug, Deserialize, PartialEq)]
    struct Address {
        city: String,
        postcode: String,
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct QueryParams {
        id: u8,
        name: String,
        address: Address,
        user_ids: Vec<u8>,
    }

    #[test]
    fn deserialize_struct() {
        let params: QueryParams = from_str(
            "name=Acme&id=42&address[postcode]=12345&\
             address[city]=Carrot+City&user_ids[]=1&user_ids[]=2",
        )
        .unwrap();
        assert_eq!(
            params,
            QueryParams {
                id: 42,
                name: "Acme".to_owned(),
                address: Address {
                    city: "Carrot City".to_owned(),
                    postcode: "12345".to_owned(),
                },
                user_ids: vec![1, 2],
            }
        );
    }

    #[test]
    fn holes_are_none() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Sparse {
            a: Vec<Option<u32>>,
        }

        let sparse: Sparse = from_str("a[0]=1&a[2]=3").unwrap();
        assert_eq!(sparse.a, vec![Some(1), None, Some(3)]);
    }

    #[test]
    fn converted_mapping_keeps_holes() {
        let map: HashMap<String, HashMap<String, Option<String>>> =
            from_str("a[]=x&a[2]=y&a[b]=z").unwrap();
        let a = &map["a"];
        assert_eq!(a.len(), 4);
        assert_eq!(a["0"].as_deref(), Some("x"));
        assert_eq!(a["1"], None);
        assert_eq!(a["2"].as_deref(), Some("y"));
        assert_eq!(a["b"].as_deref(), Some("z"));
    }

    #[test]
    fn mapping_keys_parse_into_key_type() {
        // `x` is not a valid u32 key
        let res = from_str::<HashMap<String, HashMap<u32, u32>>>("a[]=1&a[x]=2");
        assert!(res.is_err(), "got: {res:?}");

        let map: HashMap<String, HashMap<String, u32>> = from_str("a[x]=1&a[]=2&a[]=3").unwrap();
        let a = &map["a"];
        assert_eq!((a["x"], a["0"], a["1"]), (1, 2, 3));
    }

    #[test]
    fn enums() {
        #[derive(Debug, Deserialize, PartialEq)]
        enum Size {
            Small,
            Sized(u32),
        }

        #[derive(Debug, Deserialize, PartialEq)]
        struct Shirt {
            a: Size,
            b: Size,
        }

        let shirt: Shirt = from_str("a=Small&b[Sized]=12").unwrap();
        assert_eq!(
            shirt,
            Shirt {
                a: Size::Small,
                b: Size::Sized(12)
            }
        );
    }

    #[test]
    fn empty_value_is_none() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Opt {
            a: Option<u32>,
            b: Option<String>,
            c: Option<u32>,
        }

        let opt: Opt = from_str("a=&b=x").unwrap();
        assert_eq!(
            opt,
            Opt {
                a: None,
                b: Some("x".to_owned()),
                c: None
            }
        );
    }

    #[test]
    fn top_level_sequence_is_rejected() {
        let err = from_str::<Vec<String>>("a=1").unwrap_err();
        assert!(err.to_string().contains("top level"), "got: {err}");
    }

    #[test]
    fn strict_config_errors_propagate() {
        let config = Config::new().strict_decode(true);
        assert!(config.deserialize_str::<HashMap<String, String>>("a=%G0").is_err());
    }
}
