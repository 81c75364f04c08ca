use std::borrow::Cow;

/// A decoded key split into its base name and bracket tokens.
///
/// `a[b][]` becomes `base = "a"`, `tokens = ["b", ""]`.
#[derive(Debug, PartialEq, Eq)]
pub struct BracketKey<'a> {
    pub base: Cow<'a, str>,
    pub tokens: Vec<&'a str>,
}

/// Splits a decoded key into base text and bracket tokens.
///
/// - `[...]` with a closing bracket emits its contents as a token (possibly
///   empty); any `]` immediately following the pair are swallowed.
/// - A `[` without any later `]` becomes `_` in the base and scanning
///   carries on one byte further.
/// - A `]` outside a bracket pair is kept as literal base text.
///
/// This never fails. Brackets are ASCII, so every slice taken here is on a
/// char boundary.
pub fn tokenize(key: &str) -> BracketKey<'_> {
    let bytes = key.as_bytes();
    if !bytes.contains(&b'[') {
        return BracketKey {
            base: Cow::Borrowed(key),
            tokens: Vec::new(),
        };
    }

    let mut base = String::with_capacity(key.len());
    let mut tokens = Vec::new();
    // start of the pending run of plain base text
    let mut run = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'[' {
            i += 1;
            continue;
        }
        base.push_str(&key[run..i]);

        match bytes[i + 1..].iter().position(|&b| b == b']') {
            Some(offset) => {
                let close = i + 1 + offset;
                tokens.push(&key[i + 1..close]);
                i = close + 1;
                while bytes.get(i) == Some(&b']') {
                    i += 1;
                }
            }
            None => {
                base.push('_');
                i += 1;
            }
        }
        run = i;
    }
    base.push_str(&key[run..]);

    BracketKey {
        base: Cow::Owned(base),
        tokens,
    }
}

/// A token is numeric when it is non-empty and made only of ASCII digits.
///
/// No sign, no bound: `"007"` and a forty digit string are both numeric.
#[inline]
pub fn is_numeric(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit())
}

/// Tokens that select a `Sequence` when a container has to be created:
/// the append token `""` or a numeric index.
#[inline]
pub fn is_index(token: &str) -> bool {
    token.is_empty() || is_numeric(token)
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::{is_numeric, tokenize};

    fn split(key: &str) -> (String, Vec<&str>) {
        let parsed = tokenize(key);
        (parsed.base.into_owned(), parsed.tokens)
    }

    #[test]
    fn plain_key_has_no_tokens() {
        assert_eq!(split("abc"), ("abc".to_owned(), vec![]));
        assert_eq!(split("城市"), ("城市".to_owned(), vec![]));
    }

    #[test]
    fn matched_pairs() {
        assert_eq!(split("a[b][c]"), ("a".to_owned(), vec!["b", "c"]));
        assert_eq!(split("a[]"), ("a".to_owned(), vec![""]));
        assert_eq!(split("a[0][]"), ("a".to_owned(), vec!["0", ""]));
    }

    #[test]
    fn unmatched_open_bracket_becomes_underscore() {
        assert_eq!(split("p[q"), ("p_q".to_owned(), vec![]));
        assert_eq!(split("a["), ("a_".to_owned(), vec![]));
        assert_eq!(split("a[b]["), ("a_".to_owned(), vec!["b"]));
        assert_eq!(split("a[[b"), ("a__b".to_owned(), vec![]));
    }

    #[test]
    fn stray_close_bracket_is_literal() {
        assert_eq!(split("b]"), ("b]".to_owned(), vec![]));
        assert_eq!(split("]a[b]"), ("]a".to_owned(), vec!["b"]));
    }

    #[test]
    fn extra_close_brackets_after_pair_are_dropped() {
        assert_eq!(split("a[b]]"), ("a".to_owned(), vec!["b"]));
        assert_eq!(split("a[b]]]x"), ("ax".to_owned(), vec!["b"]));
        assert_eq!(split("a[b]][][c]"), ("a".to_owned(), vec!["b", "", "c"]));
    }

    #[test]
    fn token_may_contain_open_bracket() {
        assert_eq!(split("a[[]"), ("a".to_owned(), vec!["["]));
        assert_eq!(split("a[x[y]z"), ("az".to_owned(), vec!["x[y"]));
    }

    #[test]
    fn text_between_pairs_joins_base() {
        assert_eq!(split("a[b]c[d]"), ("ac".to_owned(), vec!["b", "d"]));
    }

    #[test]
    fn retokenizing_plain_key_is_identity() {
        let (base, tokens) = split("plain");
        assert!(tokens.is_empty());
        assert_eq!(split(&base), (base.clone(), vec![]));
    }

    #[test]
    fn numeric_tokens() {
        assert!(is_numeric("0"));
        assert!(is_numeric("007"));
        assert!(is_numeric("123456789012345678901234567890"));
        assert!(!is_numeric(""));
        assert!(!is_numeric("-1"));
        assert!(!is_numeric("+1"));
        assert!(!is_numeric("1a"));
        assert!(!is_numeric("١"));
    }
}
