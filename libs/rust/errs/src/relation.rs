//! Parent/child relations between error codes.

use std::collections::{HashMap, HashSet};

use parking_lot::RwLock;

use crate::{BaseError, StackError, predefined};

/// Fewest codes a relation chain may contain.
const MIN_CHAIN_LEN: usize = 2;

/// Registry of code descendants.
///
/// Each chain passed to [`CodeRelation::add`] is flattened at insertion time:
/// every code registers all codes after it as descendants, so lookups are a
/// single set probe. Entries are never removed. Cycles are not detected.
#[derive(Debug, Default)]
pub struct CodeRelation {
    descendants: RwLock<HashMap<i32, HashSet<i32>>>,
}

impl CodeRelation {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `codes` as a chain, first code outermost.
    ///
    /// ```
    /// use platform_errs::CodeRelation;
    ///
    /// let relation = CodeRelation::new();
    /// relation.add(&[1, 2, 3]).unwrap();
    /// assert!(relation.is(1, 3));
    /// assert!(!relation.is(3, 1));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an `ArgsError` coded error if fewer than two codes are given.
    pub fn add(&self, codes: &[i32]) -> Result<(), StackError> {
        if codes.len() < MIN_CHAIN_LEN {
            let listed = format!("{codes:?}");
            return Err(predefined::args()
                .wrap_msg("codes length must be at least 2", &[&"codes", &listed]));
        }

        let mut descendants = self.descendants.write();
        for (i, parent) in codes.iter().enumerate().take(codes.len() - 1) {
            descendants
                .entry(*parent)
                .or_default()
                .extend(&codes[i + 1..]);
        }
        Ok(())
    }

    /// Returns `true` if `child` equals `parent` or was registered below it.
    #[must_use]
    pub fn is(&self, parent: i32, child: i32) -> bool {
        if parent == child {
            return true;
        }
        self.descendants
            .read()
            .get(&parent)
            .is_some_and(|set| set.contains(&child))
    }
}
