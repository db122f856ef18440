//! Materialized department paths
//!
//! A department's position in the tree is stored as the ordered list of
//! ancestor ids, root first, ending with the department's own id. The
//! database column holds the dot-separated decimal encoding ("1.2.3");
//! in-process code works with the structured segment list so prefix
//! semantics never depend on string handling.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Hard ceiling on tree depth. Nobody nests departments 64 levels deep;
/// anything past this is corrupt or hostile input.
pub const MAX_DEPTH: usize = 64;

/// Path validation and parsing failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("invalid path segment: {0} (segments must be positive ids)")]
    InvalidSegment(i64),

    #[error("malformed path: {0:?}")]
    MalformedPath(String),

    #[error("path depth exceeds {MAX_DEPTH} segments")]
    DepthExceeded,
}

/// Materialized path of a department: ancestor ids from the root down,
/// always ending with the department's own id.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DeptPath {
    segments: Vec<i64>,
}

impl DeptPath {
    /// Path of a department without a parent: its own id, single segment.
    pub fn root(id: i64) -> Result<Self, PathError> {
        Self::new(vec![id])
    }

    /// Build a path from an explicit segment list.
    pub fn new(segments: Vec<i64>) -> Result<Self, PathError> {
        if segments.is_empty() {
            return Err(PathError::MalformedPath(String::new()));
        }
        if segments.len() > MAX_DEPTH {
            return Err(PathError::DepthExceeded);
        }
        if let Some(&bad) = segments.iter().find(|&&s| s <= 0) {
            return Err(PathError::InvalidSegment(bad));
        }
        Ok(Self { segments })
    }

    /// Path of a child department created under `self`.
    pub fn child(&self, id: i64) -> Result<Self, PathError> {
        let mut segments = self.segments.clone();
        segments.push(id);
        Self::new(segments)
    }

    pub fn segments(&self) -> &[i64] {
        &self.segments
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Own id of the department this path belongs to (last segment).
    /// The constructor rejects empty paths, so the index is always valid.
    pub fn leaf(&self) -> i64 {
        self.segments[self.segments.len() - 1]
    }

    /// Non-strict prefix containment: a department is a descendant (and
    /// ancestor) of itself.
    pub fn is_descendant_of(&self, ancestor: &DeptPath) -> bool {
        self.segments.len() >= ancestor.segments.len()
            && self.segments[..ancestor.segments.len()] == ancestor.segments[..]
    }

    /// Every prefix of this path, shortest first, including the path itself.
    /// Each one identifies an ancestor department by its leaf segment.
    pub fn ancestor_paths(&self) -> Vec<DeptPath> {
        (1..=self.segments.len())
            .map(|n| DeptPath {
                segments: self.segments[..n].to_vec(),
            })
            .collect()
    }

    /// Replace the `old_root` prefix of this path with `new_root`, keeping
    /// the remaining suffix verbatim. Returns `None` when `old_root` is not
    /// a prefix of `self`. This is the whole of subtree relocation: the
    /// moved root maps to `new_root` itself, every descendant keeps its
    /// relative position.
    pub fn rebase(&self, old_root: &DeptPath, new_root: &DeptPath) -> Option<DeptPath> {
        if !self.is_descendant_of(old_root) {
            return None;
        }
        let mut segments = new_root.segments.clone();
        segments.extend_from_slice(&self.segments[old_root.segments.len()..]);
        // new_root is validated and the suffix came from a valid path
        Some(DeptPath { segments })
    }
}

impl fmt::Display for DeptPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for seg in &self.segments {
            if !first {
                write!(f, ".")?;
            }
            write!(f, "{}", seg)?;
            first = false;
        }
        Ok(())
    }
}

impl FromStr for DeptPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(PathError::MalformedPath(s.to_string()));
        }
        let mut segments = Vec::new();
        for part in s.split('.') {
            let id: i64 = part
                .parse()
                .map_err(|_| PathError::MalformedPath(s.to_string()))?;
            if id <= 0 {
                return Err(PathError::MalformedPath(s.to_string()));
            }
            segments.push(id);
        }
        Self::new(segments)
    }
}

impl From<DeptPath> for String {
    fn from(path: DeptPath) -> Self {
        path.to_string()
    }
}

impl TryFrom<String> for DeptPath {
    type Error = PathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> DeptPath {
        s.parse().unwrap()
    }

    #[test]
    fn test_root_and_child() {
        let root = DeptPath::root(1).unwrap();
        assert_eq!(root.to_string(), "1");
        let child = root.child(2).unwrap();
        assert_eq!(child.to_string(), "1.2");
        assert_eq!(child.leaf(), 2);
        assert_eq!(child.depth(), 2);
    }

    #[test]
    fn test_rejects_non_positive_segments() {
        assert_eq!(DeptPath::root(0), Err(PathError::InvalidSegment(0)));
        assert_eq!(
            DeptPath::new(vec![1, -5, 3]),
            Err(PathError::InvalidSegment(-5))
        );
    }

    #[test]
    fn test_parse_round_trip() {
        let path = p("1.2.3");
        assert_eq!(path.segments(), &[1, 2, 3]);
        assert_eq!(path.to_string(), "1.2.3");
    }

    #[test]
    fn test_parse_malformed() {
        for bad in ["", "1..2", "a.b", "1.2.", ".1", "1.-2", "1.0"] {
            assert!(
                matches!(bad.parse::<DeptPath>(), Err(PathError::MalformedPath(_))),
                "{bad:?} should be malformed"
            );
        }
    }

    #[test]
    fn test_depth_limit() {
        let segments: Vec<i64> = (1..=(MAX_DEPTH as i64 + 1)).collect();
        assert_eq!(DeptPath::new(segments), Err(PathError::DepthExceeded));
        let ok: Vec<i64> = (1..=(MAX_DEPTH as i64)).collect();
        assert!(DeptPath::new(ok).is_ok());
    }

    #[test]
    fn test_containment_is_non_strict() {
        let path = p("1.2.3");
        assert!(path.is_descendant_of(&path));
        assert!(path.is_descendant_of(&p("1.2")));
        assert!(path.is_descendant_of(&p("1")));
        assert!(!path.is_descendant_of(&p("1.3")));
        assert!(!p("1").is_descendant_of(&path));
        // segment-wise, not textual: "12" is not under "1"
        assert!(!p("12").is_descendant_of(&p("1")));
    }

    #[test]
    fn test_ancestor_paths_enumerate_chain() {
        let chain = p("1.2.3").ancestor_paths();
        assert_eq!(chain, vec![p("1"), p("1.2"), p("1.2.3")]);
    }

    #[test]
    fn test_rebase_preserves_suffix() {
        // Backend "1.2" moves under department with path "9"
        let old_root = p("1.2");
        let new_root = p("9.2");
        assert_eq!(old_root.rebase(&old_root, &new_root), Some(p("9.2")));
        assert_eq!(p("1.2.3").rebase(&old_root, &new_root), Some(p("9.2.3")));
        assert_eq!(p("1.2.3.7").rebase(&old_root, &new_root), Some(p("9.2.3.7")));
        // outside the subtree: untouched
        assert_eq!(p("1.4").rebase(&old_root, &new_root), None);
    }

    #[test]
    fn test_serde_as_string() {
        let path = p("4.8.15");
        let json = serde_json::to_string(&path).unwrap();
        assert_eq!(json, "\"4.8.15\"");
        let back: DeptPath = serde_json::from_str(&json).unwrap();
        assert_eq!(back, path);
        assert!(serde_json::from_str::<DeptPath>("\"x.y\"").is_err());
    }
}
