//! Property-based tests for platform-rotatelog.
//!
//! These tests check pattern, glob and generation naming rules across
//! generated inputs using proptest.

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, FixedOffset};
use platform_rotatelog::FilePattern;
use platform_rotatelog::pattern::to_glob;
use platform_rotatelog::policy::{generation_name, next_free_name};
use proptest::prelude::*;
use test_utils::pattern_strategy;

fn instant_strategy() -> impl Strategy<Value = DateTime<FixedOffset>> {
    (0i64..4_000_000_000, -12i32..=12).prop_map(|(secs, hours)| {
        let offset = FixedOffset::east_opt(hours * 3600).unwrap();
        DateTime::from_timestamp(secs, 0).unwrap().with_timezone(&offset)
    })
}

// Every bucket a pattern produces is matched by its glob; generation
// suffixes only when the pattern ends in a specifier.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_bucket_names_match_glob(
        pattern in pattern_strategy(),
        now in instant_strategy(),
        hours in 0u64..48,
        generation in 0u32..20,
    ) {
        let pattern = FilePattern::new(pattern).unwrap();
        let glob = glob::Pattern::new(pattern.glob()).unwrap();
        let base = pattern.bucket_name(now, Duration::from_secs(hours * 3600)).unwrap();
        let name = generation_name(&base, generation);

        prop_assert!(glob.matches(&base), "{} !~ {}", base, pattern.glob());
        if pattern.glob().ends_with('*') {
            prop_assert!(glob.matches(&name), "{} !~ {}", name, pattern.glob());
        }
    }

    #[test]
    fn prop_glob_has_no_specifiers_or_runs(pattern in pattern_strategy()) {
        let glob = to_glob(&pattern);
        prop_assert!(!glob.contains('%'));
        prop_assert!(!glob.contains("**"));
    }
}

// Probing always yields a name that was free and at or after the start.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_next_free_name_is_fresh(
        taken in prop::collection::hash_set(0u32..12, 0..12),
        start in 0u32..6,
    ) {
        let names: HashSet<String> = taken.iter().map(|g| generation_name("app.log", *g)).collect();
        let (name, generation) =
            next_free_name("app.log", start, |p: &Path| names.contains(p.to_str().unwrap()));

        prop_assert!(!names.contains(&name));
        prop_assert!(generation >= start);
        prop_assert_eq!(name, generation_name("app.log", generation));
        for skipped in start..generation {
            prop_assert!(taken.contains(&skipped));
        }
    }
}
