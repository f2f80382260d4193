//! # Dotted Paths
//!
//! Data addresses exchanged between the engine's components are dotted
//! paths: object keys and array indices joined with `.`, with no leading
//! dot at the root (the root itself is the empty string).
//!
//! The parser also accepts the forms validators commonly emit: a leading
//! dot (`.foo.bar`) and bracketed segments (`foo[0]`, `foo['bar baz']`).
//! JSON pointers (`/foo/0`) are converted with [`pointer_to_path`].
//!
//! Keys that would not survive a round trip through the dotted form (those
//! containing `.`, `[` or `]`, and the empty key) are written in quoted
//! bracket form by [`join_path`]: `a["b.c"]`.

use serde_json::Value;

/// Split a dotted or bracketed path into its segments.
///
/// ```
/// use formstate_core::parse_path;
/// assert_eq!(parse_path(".list[1]['title']"), vec!["list", "1", "title"]);
/// assert!(parse_path("").is_empty());
/// ```
pub fn parse_path(path: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = path.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '.' => {
                if !current.is_empty() {
                    segments.push(std::mem::take(&mut current));
                }
            }
            '[' => {
                if !current.is_empty() {
                    segments.push(std::mem::take(&mut current));
                }
                let quote = match chars.peek() {
                    Some(&q) if q == '\'' || q == '"' => {
                        chars.next();
                        Some(q)
                    }
                    _ => None,
                };
                let mut inner = String::new();
                while let Some(c) = chars.next() {
                    match quote {
                        Some(q) if c == q && chars.peek() == Some(&']') => {
                            chars.next();
                            break;
                        }
                        None if c == ']' => break,
                        _ => inner.push(c),
                    }
                }
                segments.push(inner);
            }
            _ => current.push(c),
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }
    segments
}

/// Append `key` to a dotted `parent` path.
///
/// ```
/// use formstate_core::{join_path, parse_path};
/// assert_eq!(join_path("list", "0"), "list.0");
/// assert_eq!(join_path("a", "b.c"), "a[\"b.c\"]");
/// assert_eq!(parse_path(&join_path("a", "b.c")), vec!["a", "b.c"]);
/// ```
pub fn join_path(parent: &str, key: &str) -> String {
    if needs_brackets(key) {
        let quote = if key.contains("\"]") { '\'' } else { '"' };
        return format!("{parent}[{quote}{key}{quote}]");
    }
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

fn needs_brackets(key: &str) -> bool {
    key.is_empty() || key.contains(['.', '[', ']'])
}

/// Convert a JSON pointer (`/list/0/title`) into a dotted path (`list.0.title`).
pub fn pointer_to_path(pointer: &str) -> String {
    pointer
        .split('/')
        .skip(1)
        .map(|segment| segment.replace("~1", "/").replace("~0", "~"))
        .fold(String::new(), |path, segment| join_path(&path, &segment))
}

/// Convert a dotted path into a JSON pointer usable with [`Value::pointer`].
pub fn path_to_pointer(path: &str) -> String {
    parse_path(path)
        .iter()
        .map(|segment| format!("/{}", segment.replace('~', "~0").replace('/', "~1")))
        .collect()
}

/// Look up the value addressed by a dotted path.
///
/// Returns `None` when any segment is missing, including array indices
/// that are out of range or not numeric.
pub fn value_at<'a>(data: &'a Value, path: &str) -> Option<&'a Value> {
    parse_path(path)
        .iter()
        .try_fold(data, |node, segment| match node {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn segment() -> impl Strategy<Value = String> {
        prop_oneof![
            "[a-zA-Z_][a-zA-Z0-9_ /~]{0,12}",
            "[a-z.\\[\\]]{0,6}",
            (0usize..50).prop_map(|i| i.to_string())
        ]
    }

    proptest! {
        /// Joining segments and parsing them back is lossless.
        #[test]
        fn join_then_parse(segments in prop::collection::vec(segment(), 0..6)) {
            let path = segments.iter().fold(String::new(), |acc, s| join_path(&acc, s));
            prop_assert_eq!(parse_path(&path), segments);
        }

        /// Dotted paths survive the trip through a JSON pointer.
        #[test]
        fn pointer_round_trip(segments in prop::collection::vec(segment(), 0..6)) {
            let path = segments.iter().fold(String::new(), |acc, s| join_path(&acc, s));
            prop_assert_eq!(pointer_to_path(&path_to_pointer(&path)), path);
        }
    }
}
