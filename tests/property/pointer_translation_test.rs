// tests/property/pointer_translation_test.rs

//! Property-based tests for JSON Pointer translation

use proptest::prelude::*;
use rejson::core::ReJsonError;
use rejson::core::path::pointer_to_native;

/// Escapes a raw key the way a JSON Pointer writer would.
fn escape(key: &str) -> String {
    key.replace('~', "~0").replace('/', "~1")
}

fn expected_segment(key: &str) -> String {
    if !key.is_empty() && key.bytes().all(|b| b.is_ascii_digit()) {
        format!(".[{key}]")
    } else {
        format!(".[\"{key}\"]")
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 500,
        max_shrink_iters: 1000,
        ..ProptestConfig::default()
    })]

    #[test]
    fn test_translation_is_total_for_slash_prefixed_input(rest in ".{0,64}") {
        let pointer = format!("/{rest}");
        let native = pointer_to_native(Some(&pointer)).unwrap();
        prop_assert!(native.starts_with(".["));
    }

    #[test]
    fn test_input_without_leading_slash_is_rejected(pointer in "[^/].{0,32}") {
        let err = pointer_to_native(Some(&pointer)).unwrap_err();
        prop_assert_eq!(
            err,
            ReJsonError::InvalidArgument("pointer must start with '/'".to_string())
        );
    }

    #[test]
    fn test_escaped_keys_decode_to_input_keys(keys in prop::collection::vec(".{0,16}", 1..8)) {
        let pointer: String = keys.iter().map(|k| format!("/{}", escape(k))).collect();
        let expected: String = keys.iter().map(|k| expected_segment(k)).collect();
        prop_assert_eq!(pointer_to_native(Some(&pointer)).unwrap(), expected);
    }

    #[test]
    fn test_digit_segments_become_indices(indices in prop::collection::vec(0u32..100_000, 1..8)) {
        let pointer: String = indices.iter().map(|i| format!("/{i}")).collect();
        let expected: String = indices.iter().map(|i| format!(".[{i}]")).collect();
        prop_assert_eq!(pointer_to_native(Some(&pointer)).unwrap(), expected);
    }

    #[test]
    fn test_one_segment_per_separator(keys in prop::collection::vec("[a-z0-9]{0,6}", 1..10)) {
        let pointer: String = keys.iter().map(|k| format!("/{k}")).collect();
        let native = pointer_to_native(Some(&pointer)).unwrap();
        prop_assert_eq!(native.matches(".[").count(), keys.len());
    }

    #[test]
    fn test_translation_is_deterministic(rest in ".{0,64}") {
        let pointer = format!("/{rest}");
        prop_assert_eq!(
            pointer_to_native(Some(&pointer)).unwrap(),
            pointer_to_native(Some(&pointer)).unwrap()
        );
    }
}
