use tracing::trace;

use crate::value::{Mapping, Node, Tree};

use super::key::{BracketKey, is_index, is_numeric};

/// Applies one decoded `key=value` pair to the tree.
///
/// Without bracket tokens the base key is simply overwritten. Otherwise the
/// base node is resolved (created, or converted from a scalar) and the
/// tokens are walked top-down, creating containers on the way. Containers
/// are only ever converted `Scalar -> Sequence | Mapping` and
/// `Sequence -> Mapping`; a `Mapping` never turns back into a `Sequence`.
pub fn insert(tree: &mut Tree, key: BracketKey<'_>, value: String) {
    let BracketKey { base, tokens } = key;

    let Some((&leaf, path)) = tokens.split_last() else {
        tree.insert(base.into_owned(), Node::Scalar(value));
        return;
    };

    let first = tokens[0];
    let root = tree
        .entry(base.into_owned())
        .or_insert_with(|| empty_container(first));

    if let Node::Scalar(prior) = root {
        if is_index(first) {
            trace!(token = first, "promoting scalar base to sequence");
            let prior = std::mem::take(prior);
            *root = Node::Sequence(vec![Some(Node::Scalar(prior))]);
        } else {
            trace!(token = first, "replacing scalar base with mapping");
            *root = Node::Mapping(Mapping::default());
        }
    }

    let mut current = root;
    for (idx, &token) in path.iter().enumerate() {
        current = descend(current, token, tokens[idx + 1]);
    }
    *slot(current, leaf) = Some(Node::Scalar(value));
}

/// Steps through `token` and returns the child container, creating it (or
/// replacing a scalar/hole) according to the token that follows.
fn descend<'a>(node: &'a mut Node, token: &str, next: &str) -> &'a mut Node {
    let child = slot(node, token);
    if matches!(child, Some(Node::Scalar(_))) {
        trace!(token, "replacing nested scalar with container");
        *child = None;
    }
    child.get_or_insert_with(|| empty_container(next))
}

/// Returns the slot addressed by `token` inside `node`, coercing `node` to
/// a container kind able to hold it.
///
/// - `""` appends: a new trailing slot of a `Sequence`, or the next
///   auto-index key of a `Mapping`.
/// - a numeric token indexes a `Sequence` (growing it with holes) or is
///   used verbatim as a `Mapping` key. An index the sequence cannot grow
///   to converts it to a `Mapping` like any other key.
/// - any other token is a `Mapping` key; a `Sequence` is converted first.
fn slot<'a>(node: &'a mut Node, token: &str) -> &'a mut Option<Node> {
    let mut index = if is_numeric(token) {
        token.parse::<usize>().ok()
    } else {
        None
    };
    if let (Node::Sequence(seq), Some(n)) = (&mut *node, index) {
        if !reserve_index(seq, n) {
            trace!(token, "index too large for a sequence");
            index = None;
        }
    }

    match node {
        Node::Scalar(_) => {
            *node = empty_container(token);
            slot(node, token)
        }
        Node::Sequence(_) if !token.is_empty() && index.is_none() => {
            trace!(token, "converting sequence to mapping");
            into_mapping(node);
            slot(node, token)
        }
        Node::Sequence(seq) => {
            let n = match index {
                Some(n) => n,
                None => {
                    seq.push(None);
                    seq.len() - 1
                }
            };
            if seq.len() <= n {
                seq.resize_with(n + 1, || None);
            }
            &mut seq[n]
        }
        Node::Mapping(map) => {
            let key = if token.is_empty() {
                next_auto_index(map)
            } else {
                token.to_owned()
            };
            map.entry(key).or_insert(None)
        }
    }
}

/// Makes room for `seq[n]`. Fails when `n + 1` slots cannot be allocated,
/// in which case the token is treated as a mapping key instead.
fn reserve_index(seq: &mut Vec<Option<Node>>, n: usize) -> bool {
    match n.checked_add(1) {
        Some(len) if len > seq.len() => seq.try_reserve(len - seq.len()).is_ok(),
        Some(_) => true,
        None => false,
    }
}

fn empty_container(token: &str) -> Node {
    if is_index(token) {
        Node::Sequence(Vec::new())
    } else {
        Node::Mapping(Mapping::default())
    }
}

/// Rewrites a `Sequence` in place as a `Mapping` keyed by position.
/// Holes are kept as empty slots.
fn into_mapping(node: &mut Node) {
    if let Node::Sequence(seq) = node {
        let mut buffer = itoa::Buffer::new();
        let map = std::mem::take(seq)
            .into_iter()
            .enumerate()
            .map(|(i, item)| (buffer.format(i).to_owned(), item))
            .collect();
        *node = Node::Mapping(map);
    }
}

/// One more than the largest numeric key, or `"0"` when there is none.
///
/// Computed on the decimal digits directly so arbitrarily long keys
/// neither overflow nor truncate.
fn next_auto_index(map: &Mapping) -> String {
    let max = map
        .keys()
        .filter(|k| is_numeric(k))
        .map(|k| k.trim_start_matches('0'))
        .max_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));

    match max {
        None => "0".to_owned(),
        Some(digits) => increment(digits),
    }
}

/// Adds one to a string of ASCII digits; `""` counts as zero.
fn increment(digits: &str) -> String {
    let mut out = digits.as_bytes().to_vec();
    let mut carry = true;
    for b in out.iter_mut().rev() {
        if *b == b'9' {
            *b = b'0';
        } else {
            *b += 1;
            carry = false;
            break;
        }
    }
    if carry {
        out.insert(0, b'1');
    }
    out.into_iter().map(char::from).collect()
}
