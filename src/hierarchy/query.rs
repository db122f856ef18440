//! Hierarchy query engine
//!
//! Pure prefix-containment algebra over materialized paths. The store uses
//! this for cycle checks and ancestor filtering; the same predicates could
//! scope authorization ("is X under the admin's department") without
//! touching the database layer.

use crate::hierarchy::path::DeptPath;

/// Which side of the prefix relation a query asks for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Paths that contain the target as a prefix (target's subtree).
    Descendants,
    /// Paths that are prefixes of the target (target's chain to the root).
    Ancestors,
}

/// Select from `paths` those related to `target` in the given direction.
/// Non-strict on both sides: the target itself always matches.
pub fn prefix_match<'a>(
    paths: impl IntoIterator<Item = &'a DeptPath>,
    target: &DeptPath,
    direction: Direction,
) -> Vec<&'a DeptPath> {
    paths
        .into_iter()
        .filter(|p| matches(p, target, direction))
        .collect()
}

/// Single-path form of [`prefix_match`].
pub fn matches(path: &DeptPath, target: &DeptPath, direction: Direction) -> bool {
    match direction {
        Direction::Descendants => path.is_descendant_of(target),
        Direction::Ancestors => target.is_descendant_of(path),
    }
}

/// Would re-parenting the subtree rooted at `subtree_root` under
/// `new_parent` create a cycle? True when the new parent lies inside the
/// subtree, including the root itself (a department is its own descendant
/// under the inclusive policy, so a self-move is always a cycle).
pub fn would_create_cycle(subtree_root: &DeptPath, new_parent: &DeptPath) -> bool {
    new_parent.is_descendant_of(subtree_root)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> DeptPath {
        s.parse().unwrap()
    }

    #[test]
    fn test_descendants_include_self_and_subtree() {
        let paths = [p("1"), p("1.2"), p("1.2.3"), p("1.4"), p("9")];
        let got = prefix_match(&paths, &p("1.2"), Direction::Descendants);
        assert_eq!(got, vec![&p("1.2"), &p("1.2.3")]);
    }

    #[test]
    fn test_ancestors_include_self_and_exclude_off_path() {
        let paths = [p("1"), p("1.2"), p("1.2.3"), p("1.4"), p("9")];
        let got = prefix_match(&paths, &p("1.2.3"), Direction::Ancestors);
        assert_eq!(got, vec![&p("1"), &p("1.2"), &p("1.2.3")]);
    }

    #[test]
    fn test_containment_is_transitive() {
        // every ancestor A of D satisfies D in descendants(A)
        let d = p("1.2.3.4");
        for a in d.ancestor_paths() {
            assert!(matches(&d, &a, Direction::Descendants));
        }
    }

    #[test]
    fn test_cycle_detection() {
        // self-move is a cycle
        assert!(would_create_cycle(&p("1.2"), &p("1.2")));
        // move under own descendant is a cycle
        assert!(would_create_cycle(&p("1.2"), &p("1.2.3")));
        // move under sibling or ancestor is fine
        assert!(!would_create_cycle(&p("1.2"), &p("1.4")));
        assert!(!would_create_cycle(&p("1.2"), &p("1")));
        assert!(!would_create_cycle(&p("1.2"), &p("9")));
    }
}
