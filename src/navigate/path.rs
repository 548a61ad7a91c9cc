//! Virtual paths
//!
//! A session's working directory is an ordered stack of segments below the
//! server root. Segments are validated on the way in, so a path can never
//! name anything outside the root.

use std::fmt;

use crate::error::NavigateError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VirtualPath {
    segments: Vec<String>,
}

impl VirtualPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Rejects segments that are empty, `.`/`..`, or contain a separator.
    pub fn validate_segment(segment: &str) -> Result<(), NavigateError> {
        let invalid = segment.is_empty()
            || segment == "."
            || segment == ".."
            || segment.contains(['/', '\\', '\0']);

        if invalid {
            Err(NavigateError::InvalidSegment(segment.to_string()))
        } else {
            Ok(())
        }
    }

    /// Returns this path extended by one segment.
    pub fn child(&self, segment: &str) -> Result<VirtualPath, NavigateError> {
        let mut child = self.clone();
        child.push(segment)?;
        Ok(child)
    }

    pub fn push(&mut self, segment: &str) -> Result<(), NavigateError> {
        Self::validate_segment(segment)?;
        self.segments.push(segment.to_string());
        Ok(())
    }

    /// Removes the last segment. Fails at the root.
    pub fn pop(&mut self) -> Result<String, NavigateError> {
        self.segments.pop().ok_or(NavigateError::AtRoot)
    }
}

impl fmt::Display for VirtualPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.segments {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_renders_as_slash() {
        assert_eq!(VirtualPath::root().to_string(), "/");
        assert!(VirtualPath::root().is_root());
    }

    #[test]
    fn test_nested_rendering() {
        let path = VirtualPath::root().child("a").unwrap().child("b").unwrap();
        assert_eq!(path.to_string(), "/a/b");
        assert_eq!(path.segments(), ["a", "b"]);
    }

    #[test]
    fn test_pop_stops_at_root() {
        let mut path = VirtualPath::root().child("docs").unwrap();
        assert_eq!(path.pop().unwrap(), "docs");
        assert!(matches!(path.pop(), Err(NavigateError::AtRoot)));
        assert!(path.is_root());
    }

    #[test]
    fn test_escaping_segments_are_rejected() {
        let root = VirtualPath::root();
        for bad in ["", ".", "..", "a/b", "..\\x", "/etc"] {
            assert!(root.child(bad).is_err(), "accepted {:?}", bad);
        }
    }

    #[test]
    fn test_child_does_not_modify_parent() {
        let root = VirtualPath::root();
        let _ = root.child("x").unwrap();
        assert!(root.is_root());
    }
}
