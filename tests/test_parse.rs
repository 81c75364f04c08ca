use php_qs::{Config, DecodePart, Node, Tree};
use pretty_assertions::assert_eq;
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde_json::{Value, json};

/// macro for comparing a parsed querystring against a JSON rendering
///
/// Holes render as `null`.
macro_rules! parses_to {
    ($input:expr, $expected:tt) => {
        let tree = php_qs::parse_str($input).expect("parse");
        assert_eq!(render(&tree), json!($expected), "input: {}", $input);
    };
}

fn render(tree: &Tree) -> Value {
    serde_json::to_value(tree).expect("serialize tree")
}

// ========== SCALARS ==========

#[test]
fn plain_keys_last_write_wins() {
    parses_to!("a=b&a=c", { "a": "c" });
}

#[test]
fn plain_key_overwrites_established_container() {
    parses_to!("a[]=x&a=Y", { "a": "Y" });
    parses_to!("a[b]=x&a=Y", { "a": "Y" });
}

#[test]
fn pair_without_equals() {
    parses_to!("flag", { "flag": "" });
    parses_to!("a[b]", { "a": { "b": "" } });
}

#[test]
fn leading_question_mark_and_separators() {
    parses_to!("?x=1&y=2&", { "x": "1", "y": "2" });
    parses_to!(";a=b;c=d", { "a": "b", "c": "d" });
    parses_to!("a=1&&b=2", { "a": "1", "b": "2" });
    parses_to!("a=1;;b=2;", { "a": "1", "b": "2" });
    parses_to!(";x=1;y=2&a=3", { "x": "1", "y": "2", "a": "3" });
}

// ========== DECODING ==========

#[test]
fn decoding_is_single_pass() {
    parses_to!("q=%2B+%2520", { "q": "+ %20" });
}

#[test]
fn malformed_escape_is_literal_when_lenient() {
    parses_to!("bad=%ZZ", { "bad": "%ZZ" });
}

#[test]
fn unicode_keys_and_values() {
    parses_to!("城市=北京&k=%E4%B8%AD%E6%96%87", { "城市": "北京", "k": "中文" });
}

#[test]
fn surrounding_whitespace_is_trimmed() {
    parses_to!("   k   =   v   ", { "k": "v" });
}

#[test]
fn encoded_open_bracket_inside_token() {
    parses_to!("a[%5B]=y", { "a": { "[": "y" } });
}

// ========== BRACKETS ==========

#[test]
fn append() {
    parses_to!("a[]=b&a[]=c", { "a": ["b", "c"] });
}

#[test]
fn numeric_indices_leave_holes() {
    parses_to!("a[0]=b&a[2]=c", { "a": ["b", null, "c"] });
}

#[test]
fn nested_associative_merge() {
    parses_to!("a[b][c]=d&a[b][e]=f", { "a": { "b": { "c": "d", "e": "f" } } });
    parses_to!("a[b][c]=d&a[d]=c", { "a": { "b": { "c": "d" }, "d": "c" } });
}

#[test]
fn append_infers_child_container() {
    parses_to!("a[][b]=c&a[][b]=d", { "a": [{ "b": "c" }, { "b": "d" }] });
}

#[test]
fn nested_numeric_indices() {
    parses_to!("a[0][1]=x", { "a": [[null, "x"]] });
}

#[test]
fn associative_leaf_last_write_wins() {
    parses_to!("a[b]=x&a[b]=y", { "a": { "b": "y" } });
}

#[test]
fn deep_nesting() {
    parses_to!("a[b][c][d][e][f]=x", { "a": { "b": { "c": { "d": { "e": { "f": "x" } } } } } });
}

// ========== CONFLICTS ==========

#[test]
fn scalar_promoted_to_sequence() {
    parses_to!("a=1&a[]=2&a[]=3", { "a": ["1", "2", "3"] });
}

#[test]
fn scalar_discarded_for_mapping() {
    parses_to!("a=1&a[b]=2", { "a": { "b": "2" } });
}

#[test]
fn sequence_converted_to_mapping() {
    parses_to!("a[]=x&a[2]=y&a[b]=z", { "a": { "0": "x", "1": null, "2": "y", "b": "z" } });
}

#[test]
fn mapping_absorbs_appends() {
    parses_to!("a[b]=x&a[]=y&a[]=z", { "a": { "b": "x", "0": "y", "1": "z" } });
    parses_to!("a[b]=x&a[0]=y&a[]=z", { "a": { "b": "x", "0": "y", "1": "z" } });
    parses_to!("a[0]=x&a[b]=y&a[]=z", { "a": { "0": "x", "b": "y", "1": "z" } });
    parses_to!("a[b][c]=d&a[][d]=c", { "a": { "b": { "c": "d" }, "0": { "d": "c" } } });
}

// ========== MALFORMED KEYS ==========

#[test]
fn unmatched_open_bracket() {
    parses_to!("p[q=1", { "p_q": "1" });
    parses_to!(
        "a[b][c]=d&a[d]=c&a[=1",
        { "a": { "b": { "c": "d" }, "d": "c" }, "a_": "1" }
    );
    parses_to!("a[b][=1", { "a_": { "b": "1" } });
}

#[test]
fn stray_close_bracket() {
    parses_to!("b]=1", { "b]": "1" });
}

#[test]
fn extra_close_bracket_after_pair() {
    parses_to!("a[b]]=1", { "a": { "b": "1" } });
    parses_to!("a[b][c]=d&a[d]]=c", { "a": { "b": { "c": "d" }, "d": "c" } });
    parses_to!("a[b]][][c]=x", { "a": { "b": [{ "c": "x" }] } });
}

// ========== LIMITS ==========

#[test]
fn large_numeric_index() {
    let tree = php_qs::parse_str("a[1000]=x").unwrap();
    let a = tree["a"].as_sequence().expect("sequence");
    assert_eq!(a.len(), 1001);
    assert_eq!(a[1000], Some(Node::from("x")));
}

#[test]
fn auto_index_past_huge_key() {
    parses_to!(
        "a[k]=1&a[99999999999999999999]=2&a[]=3",
        { "a": { "k": "1", "99999999999999999999": "2", "100000000000000000000": "3" } }
    );
}

#[test]
fn unallocatable_index_becomes_mapping_key() {
    parses_to!("a[18446744073709551615]=x", { "a": { "18446744073709551615": "x" } });
    parses_to!("a[9223372036854775807]=x", { "a": { "9223372036854775807": "x" } });
    parses_to!("a[1152921504606846976]=x", { "a": { "1152921504606846976": "x" } });
    parses_to!(
        "a[]=y&a[18446744073709551615]=x",
        { "a": { "0": "y", "18446744073709551615": "x" } }
    );
}

// ========== CONFIG ==========

#[test]
fn strict_decode_fails_whole_parse() {
    let config = Config::new().strict_decode(true);
    let err = config.parse_str("a=1&b=%ZZ&c=3").unwrap_err();
    assert_eq!(err.decode_part(), Some(DecodePart::Value));
    assert!(err.to_string().starts_with("decode value error"), "got: {err}");

    let err = config.parse_str("a%=1").unwrap_err();
    assert_eq!(err.decode_part(), Some(DecodePart::Key));
}

#[test]
fn separators_are_configurable() {
    let config = Config::new().separators(&[',']);
    let tree = config.parse_str("a[]=1,a[]=2;3").unwrap();
    assert_eq!(render(&tree), json!({ "a": ["1", "2;3"] }));
}

#[test]
fn parses_are_independent() {
    let first = php_qs::parse_str("a[]=1").unwrap();
    let second = php_qs::parse_str("a[]=2").unwrap();
    assert_eq!(render(&first), json!({ "a": ["1"] }));
    assert_eq!(render(&second), json!({ "a": ["2"] }));
}

#[test]
fn parses_run_on_many_threads() {
    let handles: Vec<_> = (0..4)
        .map(|i| {
            std::thread::spawn(move || {
                let query = format!("a[{i}]=x&a[]=y");
                php_qs::parse_str(&query).unwrap()
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let tree = handle.join().unwrap();
        let a = tree["a"].as_sequence().unwrap();
        assert_eq!(a.len(), i + 2);
        assert_eq!(a[i + 1], Some(Node::from("y")));
    }
}

// ========== STRESS ==========

#[test]
fn random_bracket_soup_never_panics() {
    // digits only ever appear inside their own bracket pair, so the largest
    // index that can reach a sequence is one of these tokens
    const ALPHABET: &[&str] = &[
        "a", "b", "x", "[", "]", "[]", "[0]", "[12]", "[9223372036854775807]",
        "[18446744073709551615]", "[99999999999999999999]", "=", "&", ";", "%", "+",
    ];
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for _ in 0..2_000 {
        let len = rng.random_range(0..24);
        let query: String = (0..len)
            .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())])
            .collect();

        let lenient = php_qs::parse_str(&query).expect("lenient parse never fails");
        // every leaf is reachable and the tree renders
        let _ = render(&lenient);
        let _ = Config::new().strict_decode(true).parse_str(&query);
    }
}
