// tests/property/path_equality_test.rs

//! Property-based tests for structural equality of `Path` values

use proptest::prelude::*;
use rejson::core::path::Path;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

fn hash_of(path: &Path) -> u64 {
    let mut hasher = DefaultHasher::new();
    path.hash(&mut hasher);
    hasher.finish()
}

proptest! {
    #[test]
    fn test_same_expression_is_equal(x in ".{0,64}") {
        let a = Path::of(x.clone());
        let b = Path::of(x.clone());
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(hash_of(&a), hash_of(&b));
        prop_assert_eq!(a.to_string(), x);
    }

    #[test]
    fn test_different_expressions_are_not_equal(x in ".{0,32}", y in ".{0,32}") {
        prop_assume!(x != y);
        prop_assert_ne!(Path::of(x), Path::of(y));
    }
}

#[test]
fn test_root_equals_dot_literal() {
    assert_eq!(Path::root(), Path::of("."));
    assert_eq!(hash_of(&Path::root()), hash_of(&Path::of(".")));
}
