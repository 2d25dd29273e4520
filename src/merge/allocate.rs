//! Collision-free name allocation for the skin and geometry namespaces.
//!
//! [`allocate`] is pure: given a candidate and the set of names already in
//! use, it returns the candidate itself if free, else the first free name in
//! the sequence `candidate_2`, `candidate_3`, …. It never touches `used`.
//!
//! [`Namespace`] couples the set with the allocator so mergers can resolve
//! and reserve a name in one call.
//!
//! # Determinism
//!
//! The result depends only on `candidate` and the contents of `used`. Since
//! packages are merged in input order, the first package to introduce a name
//! keeps it and later packages get the suffixed variants.

use std::collections::HashSet;

use thiserror::Error;

/// Upper bound on suffixes probed for a single candidate.
pub const MAX_PROBES: u64 = 1_000_000;

/// Errors from [`allocate`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AllocateError {
    /// Every suffix up to [`MAX_PROBES`] was already taken.
    #[error("no free name for `{candidate}` after {MAX_PROBES} suffixes")]
    Exhausted {
        /// The name that could not be made unique.
        candidate: String,
    },
}

/// Return a name not present in `used`, derived from `candidate`.
///
/// # Errors
/// Returns [`AllocateError::Exhausted`] if `candidate` and all of
/// `candidate_2` through `candidate_{MAX_PROBES + 1}` are taken.
pub fn allocate(candidate: &str, used: &HashSet<String>) -> Result<String, AllocateError> {
    if !used.contains(candidate) {
        return Ok(candidate.to_owned());
    }
    for counter in 2..=MAX_PROBES + 1 {
        let probe = format!("{candidate}_{counter}");
        if !used.contains(&probe) {
            return Ok(probe);
        }
    }
    Err(AllocateError::Exhausted {
        candidate: candidate.to_owned(),
    })
}

// ---------------------------------------------------------------------------
// Namespace
// ---------------------------------------------------------------------------

/// A set of names in use, owned by one merge session.
#[derive(Clone, Debug, Default)]
pub struct Namespace {
    used: HashSet<String>,
}

impl Namespace {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `candidate` against the names in use and reserve the result.
    ///
    /// # Errors
    /// Propagates [`AllocateError`] from [`allocate`].
    pub fn claim(&mut self, candidate: &str) -> Result<String, AllocateError> {
        let name = allocate(candidate, &self.used)?;
        self.used.insert(name.clone());
        Ok(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.used.contains(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.used.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }

    /// The underlying set, for callers using [`allocate`] directly.
    #[must_use]
    pub const fn as_set(&self) -> &HashSet<String> {
        &self.used
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn set(names: &[&str]) -> HashSet<String> {
        names.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn unused_candidate_is_returned_unchanged() {
        assert_eq!(allocate("Hero", &set(&["Villain"])).unwrap(), "Hero");
    }

    #[test]
    fn first_collision_gets_suffix_two() {
        assert_eq!(allocate("Hero", &set(&["Hero"])).unwrap(), "Hero_2");
    }

    #[test]
    fn probing_skips_taken_suffixes() {
        let used = set(&["Hero", "Hero_2", "Hero_3"]);
        assert_eq!(allocate("Hero", &used).unwrap(), "Hero_4");
    }

    #[test]
    fn gaps_are_filled_lowest_first() {
        let used = set(&["Hero", "Hero_3"]);
        assert_eq!(allocate("Hero", &used).unwrap(), "Hero_2");
    }

    #[test]
    fn allocate_has_no_side_effect() {
        let used = set(&["Hero"]);
        let _ = allocate("Hero", &used).unwrap();
        assert_eq!(used.len(), 1);
    }

    #[test]
    fn empty_candidate_is_an_ordinary_key() {
        assert_eq!(allocate("", &set(&[])).unwrap(), "");
        assert_eq!(allocate("", &set(&[""])).unwrap(), "_2");
    }

    #[test]
    fn suffixed_candidate_gets_its_own_suffix() {
        // "Hero_2" colliding becomes "Hero_2_2", not "Hero_3".
        let used = set(&["Hero", "Hero_2"]);
        assert_eq!(allocate("Hero_2", &used).unwrap(), "Hero_2_2");
    }

    #[test]
    fn namespace_claim_reserves_names() {
        let mut ns = Namespace::new();
        assert_eq!(ns.claim("Hero").unwrap(), "Hero");
        assert_eq!(ns.claim("Hero").unwrap(), "Hero_2");
        assert_eq!(ns.claim("Hero").unwrap(), "Hero_3");
        assert_eq!(ns.len(), 3);
        assert!(ns.contains("Hero_2"));
    }

    #[test]
    fn exhausted_error_names_candidate() {
        let err = AllocateError::Exhausted {
            candidate: "x".to_owned(),
        };
        assert!(err.to_string().contains("`x`"));
    }
}
