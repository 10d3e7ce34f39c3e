//! Idempotent filesystem primitives (check + apply pattern).
pub mod chatmate;
pub mod helpers;

/// State of an installed chatmate relative to its source.
///
/// # Examples
///
/// ```
/// use chatmate::resources::ResourceState;
///
/// let missing = ResourceState::Missing;
/// let stale = ResourceState::Incorrect { current: "12 bytes differ".into() };
///
/// assert_ne!(missing, ResourceState::Correct);
/// assert!(stale.needs_change());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceState {
    /// Not present in the destination.
    Missing,
    /// Present and byte-identical to the source.
    Correct,
    /// Present but different from the source.
    Incorrect {
        /// Short description of the difference.
        current: String,
    },
}

impl ResourceState {
    /// Return `true` when applying the resource would change the destination.
    #[must_use]
    pub const fn needs_change(&self) -> bool {
        matches!(self, Self::Missing | Self::Incorrect { .. })
    }
}

/// Result of applying or removing a resource.
///
/// # Examples
///
/// ```
/// use chatmate::resources::ResourceChange;
///
/// let applied = ResourceChange::Applied;
/// let noop = ResourceChange::AlreadyCorrect;
///
/// assert_ne!(applied, noop);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceChange {
    /// The destination was created, replaced or deleted.
    Applied,
    /// Nothing needed to change.
    AlreadyCorrect,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn needs_change_for_missing_and_incorrect() {
        assert!(ResourceState::Missing.needs_change());
        assert!(
            ResourceState::Incorrect {
                current: "differs".to_string()
            }
            .needs_change()
        );
    }

    #[test]
    fn no_change_when_correct() {
        assert!(!ResourceState::Correct.needs_change());
    }
}
