//! Property-based tests for path handling.
//!
//! The inline suites next to normalize and the context cover translation
//! behavior; this opt-in module hammers the lexical primitives (cleaning,
//! relationship checks, prefix computation) with a larger case budget.

use super::normalize::clean;
use super::relationship::{common_prefix, PathRelationship};
use proptest::prelude::*;
use std::path::PathBuf;

// File names as a resolver sees them: ordinary names with dots and dashes
// allowed, never "." or ".." themselves (the leading letter rules those out).
fn name_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9._-]{0,14}"
}

fn names_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(name_strategy(), 1..6)
}

fn to_path(names: &[String]) -> PathBuf {
    let mut path = PathBuf::from("/");
    for name in names {
        path.push(name);
    }
    path
}

proptest! {
    #![proptest_config(ProptestConfig {
        // enough to shake out boundary handling without making the opt-in
        // suite minutes long
        cases: 2048,
        .. ProptestConfig::default()
    })]

    // A path is always Same as itself
    #[test]
    fn relationship_reflexive(names in names_strategy()) {
        let path = to_path(&names);
        prop_assert_eq!(
            PathRelationship::between(&path, &path),
            PathRelationship::Same
        );
    }

    // Extending a path by one name makes an Ancestor, and the converse holds
    #[test]
    fn prefixes_are_ancestors(names in names_strategy(), extra in name_strategy()) {
        let parent = to_path(&names);
        let child = parent.join(&extra);
        prop_assert_eq!(
            PathRelationship::between(&parent, &child),
            PathRelationship::Ancestor
        );
        prop_assert_eq!(
            PathRelationship::between(&child, &parent),
            PathRelationship::Descendant
        );
    }

    // Siblings differing in their final name are unrelated
    #[test]
    fn siblings_are_unrelated(
        names in names_strategy(),
        a in name_strategy(),
        b in name_strategy()
    ) {
        prop_assume!(a != b);
        let dir = to_path(&names);
        prop_assert_eq!(
            PathRelationship::between(&dir.join(&a), &dir.join(&b)),
            PathRelationship::Unrelated
        );
    }

    // The common prefix divides both paths and is order-independent
    #[test]
    fn common_prefix_is_shared(names in names_strategy(), other in names_strategy()) {
        let a = to_path(&names);
        let b = to_path(&other);
        let prefix = common_prefix(&a, &b);
        prop_assert!(a.starts_with(&prefix));
        prop_assert!(b.starts_with(&prefix));
        prop_assert_eq!(prefix, common_prefix(&b, &a));
    }

    // The common prefix of a directory with a path inside it is the directory
    #[test]
    fn common_prefix_with_contents(names in names_strategy(), extra in name_strategy()) {
        let dir = to_path(&names);
        let inside = dir.join(&extra);
        prop_assert_eq!(common_prefix(&dir, &inside), dir);
    }

    // Generated paths are already clean, so cleaning is the identity
    #[test]
    fn clean_is_identity_on_clean_paths(names in names_strategy()) {
        let path = to_path(&names);
        prop_assert_eq!(clean(&path), path);
    }

    // Interleaved "." components collapse to the same clean path
    #[test]
    fn dot_components_collapse(names in names_strategy()) {
        let plain = to_path(&names);
        let mut dotted = PathBuf::from("/");
        for name in &names {
            dotted.push(".");
            dotted.push(name);
        }
        prop_assert_eq!(clean(&dotted), plain);
    }

    // A detour through a name and back through ".." cancels out
    #[test]
    fn parent_components_cancel(names in names_strategy(), extra in name_strategy()) {
        let base = to_path(&names);
        let detour = base.join(&extra).join("..");
        prop_assert_eq!(clean(&detour), base);
    }
}
