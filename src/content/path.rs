//! Request path resolution

/// Ordered, non-empty segments of a request path.
///
/// Built by splitting on `/` and discarding empty tokens, so `/somewhere/else`
/// and `somewhere//else/` resolve to the same sequence. Order is root-to-leaf
/// left-to-right; hierarchy walks iterate it in reverse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathSegments(Vec<String>);

impl PathSegments {
    /// Split a request path into segments.
    pub fn parse(path: &str) -> Self {
        Self(
            path.split('/')
                .filter(|part| !part.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    /// First segment, or the empty string for the root path.
    pub fn root(&self) -> &str {
        self.0.first().map(String::as_str).unwrap_or("")
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Owned copy of the segments, for walks that pop from the leaf end.
    pub fn to_vec(&self) -> Vec<String> {
        self.0.clone()
    }

    /// Canonical `/`-prefixed form, `/` for the empty sequence.
    pub fn to_path(&self) -> String {
        if self.0.is_empty() {
            "/".to_string()
        } else {
            format!("/{}", self.0.join("/"))
        }
    }
}

impl From<Vec<String>> for PathSegments {
    fn from(parts: Vec<String>) -> Self {
        Self(parts.into_iter().filter(|p| !p.is_empty()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_drops_empty_tokens() {
        let segments = PathSegments::parse("/somewhere//else/");
        assert_eq!(segments.as_slice(), ["somewhere", "else"]);
    }

    #[test]
    fn test_parse_preserves_order() {
        let segments = PathSegments::parse("/a/b/c");
        let collected: Vec<&str> = segments.iter().collect();
        assert_eq!(collected, ["a", "b", "c"]);
    }

    #[test]
    fn test_root_of_empty_path() {
        assert_eq!(PathSegments::parse("/").root(), "");
        assert_eq!(PathSegments::parse("").root(), "");
    }

    #[test]
    fn test_root_of_nested_path() {
        assert_eq!(PathSegments::parse("/somewhere/else").root(), "somewhere");
    }

    #[test]
    fn test_to_path_round_trip() {
        assert_eq!(PathSegments::parse("/somewhere/else").to_path(), "/somewhere/else");
        assert_eq!(PathSegments::parse("/").to_path(), "/");
    }
}
