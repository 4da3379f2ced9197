//! Shared proptest generators.

use proptest::prelude::*;

/// Generate error codes in the application range.
pub fn code_strategy() -> impl Strategy<Value = i32> {
    1..100_000i32
}

/// Generate short human-readable messages.
pub fn message_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z ]{0,30}"
}

/// Generate a chain of distinct codes, outermost first.
pub fn code_chain_strategy() -> impl Strategy<Value = Vec<i32>> {
    prop::collection::hash_set(code_strategy(), 2..8).prop_map(|set| set.into_iter().collect())
}

/// Generate key/value context pairs.
pub fn kv_pairs_strategy() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::vec(("[a-z_]{1,10}", "[a-zA-Z0-9/._-]{0,20}"), 0..6)
}

/// Generate strftime file name patterns built from common specifiers.
pub fn pattern_strategy() -> impl Strategy<Value = String> {
    let specifier = prop_oneof![
        Just("%Y"),
        Just("%m"),
        Just("%d"),
        Just("%H"),
        Just("%M"),
        Just("%S"),
    ];
    (
        "[a-z]{1,8}",
        prop::collection::vec(specifier, 1..5),
        prop::option::of("\\.[a-z]{2,4}"),
    )
        .prop_map(|(stem, specs, ext)| {
            format!("{stem}.{}{}", specs.concat(), ext.unwrap_or_default())
        })
}
