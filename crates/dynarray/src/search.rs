//! Search results and the sentinel convention used at the C boundary.

/// Result of a linear or binary search.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SearchOutcome {
    /// A matching element lives at this index.
    Found(usize),
    /// The search ran but no element matched.
    NotFound,
    /// The search was refused (missing key, width mismatch, missing
    /// comparator, or no instance).
    Invalid,
}

impl SearchOutcome {
    /// Sentinel returned for [`NotFound`](Self::NotFound).
    pub const NOT_FOUND: i64 = -1;

    /// Sentinel returned for [`Invalid`](Self::Invalid).
    pub const INVALID: i64 = -2;

    /// The matching index, if any.
    pub fn index(self) -> Option<usize> {
        match self {
            Self::Found(i) => Some(i),
            _ => None,
        }
    }

    /// Whether the search was accepted (found or not).
    pub fn is_valid(self) -> bool {
        !matches!(self, Self::Invalid)
    }

    /// Collapse to the integer convention: index, `-1`, or `-2`.
    ///
    /// Indices that do not fit in an `i64` cannot occur for in-memory
    /// containers; they saturate to `i64::MAX`.
    pub fn to_sentinel(self) -> i64 {
        match self {
            Self::Found(i) => i64::try_from(i).unwrap_or(i64::MAX),
            Self::NotFound => Self::NOT_FOUND,
            Self::Invalid => Self::INVALID,
        }
    }

    /// Inverse of [`to_sentinel`](Self::to_sentinel).
    ///
    /// Negative values other than the two sentinels map to `Invalid`.
    pub fn from_sentinel(raw: i64) -> Self {
        match raw {
            Self::NOT_FOUND => Self::NotFound,
            i if i >= 0 => usize::try_from(i).map_or(Self::Invalid, Self::Found),
            _ => Self::Invalid,
        }
    }
}

impl From<SearchOutcome> for i64 {
    fn from(outcome: SearchOutcome) -> Self {
        outcome.to_sentinel()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinels_match_c_convention() {
        assert_eq!(SearchOutcome::NotFound.to_sentinel(), -1);
        assert_eq!(SearchOutcome::Invalid.to_sentinel(), -2);
        assert_eq!(SearchOutcome::Found(5).to_sentinel(), 5);
        assert_eq!(i64::from(SearchOutcome::Found(0)), 0);
    }

    #[test]
    fn from_sentinel_inverts() {
        for outcome in [
            SearchOutcome::Found(0),
            SearchOutcome::Found(42),
            SearchOutcome::NotFound,
            SearchOutcome::Invalid,
        ] {
            assert_eq!(SearchOutcome::from_sentinel(outcome.to_sentinel()), outcome);
        }
        assert_eq!(SearchOutcome::from_sentinel(-7), SearchOutcome::Invalid);
    }

    #[test]
    fn index_and_validity() {
        assert_eq!(SearchOutcome::Found(3).index(), Some(3));
        assert_eq!(SearchOutcome::NotFound.index(), None);
        assert!(SearchOutcome::NotFound.is_valid());
        assert!(!SearchOutcome::Invalid.is_valid());
    }
}
