//! Request path parsing and path reconstruction
//!
//! Incoming paths look like `<prefix>/<seg>/<seg>...`. The prefix is removed,
//! the remainder is split on `/`, empty segments are dropped and each segment
//! is percent-decoded. Decoding happens per segment so an escaped `%2F` stays
//! part of its identifier instead of splitting it.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use std::fmt;

/// Characters escaped when a path is rendered. Matches the browser
/// `encodeURI` set: reserved URI characters such as `/`, `?` and `:` stay
/// literal.
const PATH_ESCAPE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Split a raw request path below `prefix` into decoded segments
pub fn parse_segments(raw_path: &str, prefix: &str) -> Vec<String> {
    let path = raw_path.split(['?', '#']).next().unwrap_or_default();
    let rest = path.strip_prefix(prefix).unwrap_or(path);

    rest.split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| percent_decode_str(segment).decode_utf8_lossy().into_owned())
        .filter(|segment| !segment.is_empty())
        .collect()
}

/// Address of a node: identifier values from just below the root down to it
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TreePath {
    segments: Vec<String>,
}

impl TreePath {
    /// The empty path, addressing the root
    pub fn root() -> Self {
        Self::default()
    }

    pub fn new(segments: Vec<String>) -> Self {
        Self { segments }
    }

    /// Parse a request path routed under `prefix`
    pub fn parse(raw_path: &str, prefix: &str) -> Self {
        Self::new(parse_segments(raw_path, prefix))
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// This path extended by one child identifier
    pub fn child(&self, id: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(id.into());
        Self { segments }
    }
}

impl From<Vec<String>> for TreePath {
    fn from(segments: Vec<String>) -> Self {
        Self::new(segments)
    }
}

impl From<&[&str]> for TreePath {
    fn from(segments: &[&str]) -> Self {
        Self::new(segments.iter().map(|s| s.to_string()).collect())
    }
}

impl fmt::Display for TreePath {
    /// `'/' + segments.join('/')`, escaped for use in a URI
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = format!("/{}", self.segments.join("/"));
        write!(f, "{}", utf8_percent_encode(&joined, PATH_ESCAPE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_prefix_is_root() {
        assert!(parse_segments("/node", "/node").is_empty());
        assert!(parse_segments("/node/", "/node").is_empty());
        assert!(parse_segments("/node//", "/node").is_empty());
    }

    #[test]
    fn test_segments_below_prefix() {
        assert_eq!(
            parse_segments("/node/child1/child2/child3", "/node"),
            vec!["child1", "child2", "child3"]
        );
        assert_eq!(parse_segments("/api/tree/a//b/", "/api/tree"), vec!["a", "b"]);
    }

    #[test]
    fn test_query_string_ignored() {
        assert_eq!(parse_segments("/children/a?depth=2", "/children"), vec!["a"]);
    }

    #[test]
    fn test_segments_are_decoded() {
        assert_eq!(
            parse_segments("/node/my%20file/r%C3%A9sum%C3%A9", "/node"),
            vec!["my file", "résumé"]
        );
        assert_eq!(parse_segments("/node/a%2Fb", "/node"), vec!["a/b"]);
    }

    #[test]
    fn test_root_path_display() {
        assert_eq!(TreePath::root().to_string(), "/");
    }

    #[test]
    fn test_path_display_joins_segments() {
        let path = TreePath::from(&["a", "b", "c"][..]);
        assert_eq!(path.to_string(), "/a/b/c");
    }

    #[test]
    fn test_path_display_encodes_like_encode_uri() {
        let path = TreePath::from(&["my file", "x:y", "100%", "résumé"][..]);
        assert_eq!(path.to_string(), "/my%20file/x:y/100%25/r%C3%A9sum%C3%A9");
    }

    #[test]
    fn test_child_extends_without_mutating() {
        let parent = TreePath::from(&["1"][..]);
        let child = parent.child("2");

        assert_eq!(parent.to_string(), "/1");
        assert_eq!(child.to_string(), "/1/2");
        assert_eq!(child.segments(), ["1", "2"]);
    }
}
